use crate::render::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the species table.
    #[arg(short, long, value_name = "FILE", default_value = "fish_data.csv")]
    pub input_file: PathBuf,

    /// Order to browse; defaults to the first Order in the table.
    #[arg(short, long, value_name = "ORDER")]
    pub order: Option<String>,

    /// Print the available Orders and exit.
    #[arg(short, long)]
    pub list_orders: bool,

    /// Also print the full normalized table.
    #[arg(short = 'r', long)]
    pub show_raw: bool,

    /// Output format.
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Field delimiter of the input file.
    #[arg(short, long, default_value_t = ',')]
    pub delimiter: char,

    /// Enable debug logging (RUST_LOG still takes precedence).
    #[arg(short, long)]
    pub verbose: bool,
}

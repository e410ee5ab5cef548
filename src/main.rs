pub mod cli;
pub mod csv_handler;
pub mod error;
pub mod render;
pub mod taxon;

use clap::Parser;
use cli::Cli;
use csv_handler::{CsvTableSource, load_table};
use error::Result;
use log::{LevelFilter, error, info};
use render::{RenderOptions, Selection, render_browser, render_order_list};
use std::io::{self, BufWriter, Write};
use std::time::Instant;
use taxon::normalizer::{count_records, list_distinct_orders};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if let Err(e) = env_logger::Builder::new()
        .format_target(false)
        .format_timestamp_secs()
        .filter_level(default_level)
        .parse_default_env()
        .try_init()
    {
        eprintln!("Logger already initialized: {}", e);
    }

    info!("Starting fish taxonomy browser...");
    info!("Input file: {:?}", cli.input_file);
    let start_time = Instant::now();

    // 1. Load, validate and forward-fill the table
    let source = CsvTableSource::with_delimiter(cli.delimiter)?;
    let table = match load_table(&source, &cli.input_file) {
        Ok(table) => {
            info!("Loaded {} species records.", count_records(&table));
            table
        }
        Err(e) => {
            error!("Failed to load species table: {}", e);
            return Err(e);
        }
    };

    if table.is_empty() {
        info!("Species table is empty. Exiting.");
        return Ok(());
    }

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());

    // 2. Selector options only
    if cli.list_orders {
        render_order_list(&table, cli.format, &mut writer)?;
        writer.flush()?;
        return Ok(());
    }

    // 3. Group the selected Order and render it
    let orders = list_distinct_orders(&table);
    let order = match cli.order.as_deref() {
        Some(order) => order,
        None => orders.first().copied().unwrap_or_default(),
    };
    info!("Selected Order: {}", order);

    let selection = Selection::resolve(&table, order)?;
    if let Some(tree) = &selection.tree {
        info!(
            "{} species across {} families",
            tree.species_count(),
            tree.families.len()
        );
    }
    let options = RenderOptions {
        format: cli.format,
        show_raw: cli.show_raw,
    };
    render_browser(&table, &selection, options, &mut writer)?;
    writer.flush()?;

    info!("Total execution time: {:.2?}", start_time.elapsed());
    Ok(())
}

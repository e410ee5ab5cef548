//! Terminal rendering of the taxonomy browser.
use crate::csv_handler::{REQUIRED_HEADERS, SpeciesRecord};
use crate::error::{CrateError, Result};
use crate::taxon::grouper::{TaxonomyTree, group_by_taxonomy};
use crate::taxon::normalizer::{NormalizedTable, count_records, list_distinct_orders};
use csv::WriterBuilder;
use log::warn;
use serde::Serialize;
use std::io::Write;

pub const TITLE: &str = "Interactive Fish Taxonomy Browser";

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable nested listing.
    #[value(name = "text")]
    Text,
    /// A single JSON document.
    #[value(name = "json")]
    Json,
}

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub format: OutputFormat,
    pub show_raw: bool,
}

/// The Order the user picked and what grouping it produced.
///
/// `tree` is `None` when the Order is absent from the table, which the views
/// show as an empty result instead of failing.
pub struct Selection<'a> {
    pub order: &'a str,
    pub tree: Option<TaxonomyTree>,
}

impl<'a> Selection<'a> {
    pub fn resolve(table: &NormalizedTable, order: &'a str) -> Result<Self> {
        let tree = match group_by_taxonomy(table, order) {
            Ok(tree) => Some(tree),
            Err(CrateError::UnknownOrder(missing)) => {
                warn!("Order '{}' is not present in the table", missing);
                None
            }
            Err(e) => return Err(e),
        };
        Ok(Self { order, tree })
    }
}

#[derive(Serialize)]
struct BrowserReport<'a> {
    title: &'static str,
    class: Option<&'a str>,
    record_count: usize,
    orders: Vec<&'a str>,
    selected_order: &'a str,
    tree: Option<&'a TaxonomyTree>,
    #[serde(skip_serializing_if = "Option::is_none")]
    records: Option<&'a [SpeciesRecord]>,
}

/// Writes the browser view for `selection`.
pub fn render_browser(
    table: &NormalizedTable,
    selection: &Selection<'_>,
    options: RenderOptions,
    writer: &mut dyn Write,
) -> Result<()> {
    let tree = selection.tree.as_ref();

    match options.format {
        OutputFormat::Json => {
            let report = BrowserReport {
                title: TITLE,
                class: table.first_class(),
                record_count: count_records(table),
                orders: list_distinct_orders(table),
                selected_order: selection.order,
                tree,
                records: options.show_raw.then(|| table.records()),
            };
            serde_json::to_writer_pretty(&mut *writer, &report)?;
            writeln!(writer)?;
        }
        OutputFormat::Text => {
            write_header(table, writer)?;
            writeln!(writer)?;
            writeln!(writer, "Order: {}", selection.order)?;
            match tree {
                Some(tree) => write_tree(tree, writer)?,
                None => writeln!(
                    writer,
                    "  No species recorded for Order '{}'.",
                    selection.order
                )?,
            }
            if options.show_raw {
                writeln!(writer)?;
                writeln!(writer, "--- Raw Data Table ---")?;
                write_raw_table(table, writer)?;
            }
        }
    }
    Ok(())
}

fn write_header(table: &NormalizedTable, writer: &mut dyn Write) -> Result<()> {
    writeln!(writer, "{}", TITLE)?;
    if let Some(class) = table.first_class() {
        writeln!(
            writer,
            "Explore the {} Class of fishes and their lower taxonomic ranks.",
            class
        )?;
    }
    writeln!(
        writer,
        "{} Total Fish Species Records Indexed",
        count_records(table)
    )?;
    Ok(())
}

fn write_tree(tree: &TaxonomyTree, writer: &mut dyn Write) -> Result<()> {
    for (family, group) in &tree.families {
        writeln!(
            writer,
            "[+] Family: {} ({} Species)",
            family,
            group.species_count()
        )?;
        writeln!(writer, "    Species List:")?;
        for (genus, lines) in &group.genera {
            writeln!(writer, "    Genus: {}", genus)?;
            for line in lines {
                writeln!(writer, "      - {}", bullet_label(genus, line))?;
            }
        }
    }
    Ok(())
}

fn bullet_label(genus: &str, line: &str) -> String {
    match (genus.is_empty(), line.is_empty()) {
        (true, _) => line.to_string(),
        (false, true) => genus.to_string(),
        (false, false) => format!("{} {}", genus, line),
    }
}

/// The selector's options with the number of records under each.
pub fn render_order_list(
    table: &NormalizedTable,
    format: OutputFormat,
    writer: &mut dyn Write,
) -> Result<()> {
    let orders: Vec<(&str, usize)> = list_distinct_orders(table)
        .into_iter()
        .map(|order| {
            let count = table.records().iter().filter(|r| r.order == order).count();
            (order, count)
        })
        .collect();

    match format {
        OutputFormat::Json => {
            let entries: Vec<serde_json::Value> = orders
                .iter()
                .map(|(order, count)| serde_json::json!({ "order": order, "records": count }))
                .collect();
            serde_json::to_writer_pretty(&mut *writer, &entries)?;
            writeln!(writer)?;
        }
        OutputFormat::Text => {
            for (order, count) in orders {
                writeln!(writer, "{}\t{}", order, count)?;
            }
        }
    }
    Ok(())
}

/// Dumps the normalized table as tab-separated values, header first.
pub fn write_raw_table(table: &NormalizedTable, writer: &mut dyn Write) -> Result<()> {
    let mut csv_writer = WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(REQUIRED_HEADERS)?;
    for row in table.records() {
        csv_writer.write_record([
            row.class.as_str(),
            row.order.as_str(),
            row.family.as_str(),
            row.fish.as_str(),
            row.species_scientific.as_str(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

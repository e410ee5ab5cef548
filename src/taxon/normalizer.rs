//! Forward-fill of the higher taxonomic ranks.
use crate::csv_handler::SpeciesRecord;
use crate::error::{CrateError, Result};
use indexmap::IndexSet;
use log::debug;

/// Species rows whose Class, Order and Family have been forward-filled.
///
/// Only [`normalize`] builds one, so holding a `NormalizedTable` means every
/// row carries all three ranks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedTable {
    records: Vec<SpeciesRecord>,
}

impl NormalizedTable {
    pub fn records(&self) -> &[SpeciesRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Class of the first record, used as the table's headline.
    pub fn first_class(&self) -> Option<&str> {
        self.records.first().map(|r| r.class.as_str())
    }
}

fn is_missing(value: &str) -> bool {
    value.trim().is_empty()
}

/// Carries the last seen value of `column` into `value` when it is missing.
fn carry<'a>(
    value: &'a str,
    last_seen: &mut Option<&'a str>,
    column: &str,
    row: usize,
) -> Result<(String, bool)> {
    if !is_missing(value) {
        *last_seen = Some(value);
        return Ok((value.to_string(), false));
    }
    match *last_seen {
        Some(previous) => Ok((previous.to_string(), true)),
        None => Err(CrateError::MissingAnchor {
            column: column.to_string(),
            row,
        }),
    }
}

/// Forward-fills Class, Order and Family in row order.
///
/// Each column carries its own "last seen" value; a row's own non-empty value
/// always wins. The first row has nothing to inherit from, so a gap there is a
/// [`CrateError::MissingAnchor`]. The input is left untouched.
pub fn normalize(rows: &[SpeciesRecord]) -> Result<NormalizedTable> {
    let mut last_class: Option<&str> = None;
    let mut last_order: Option<&str> = None;
    let mut last_family: Option<&str> = None;
    let mut filled = 0usize;

    let mut records = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        // Data rows count from 1; the header line is not included.
        let row_num = index + 1;
        let (class, c) = carry(&row.class, &mut last_class, "Class", row_num)?;
        let (order, o) = carry(&row.order, &mut last_order, "Order", row_num)?;
        let (family, f) = carry(&row.family, &mut last_family, "Family", row_num)?;
        filled += [c, o, f].iter().filter(|was_filled| **was_filled).count();

        records.push(SpeciesRecord {
            class,
            order,
            family,
            fish: row.fish.clone(),
            species_scientific: row.species_scientific.clone(),
        });
    }

    debug!(
        "Normalized {} rows, forward-filled {} cells",
        records.len(),
        filled
    );
    Ok(NormalizedTable { records })
}

/// Distinct Order values, in the order they first appear.
pub fn list_distinct_orders(table: &NormalizedTable) -> Vec<&str> {
    table
        .records()
        .iter()
        .map(|r| r.order.as_str())
        .collect::<IndexSet<&str>>()
        .into_iter()
        .collect()
}

pub fn count_records(table: &NormalizedTable) -> usize {
    table.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(class: &str, order: &str, family: &str, scientific: &str) -> SpeciesRecord {
        SpeciesRecord {
            class: class.to_string(),
            order: order.to_string(),
            family: family.to_string(),
            fish: scientific.to_string(),
            species_scientific: scientific.to_string(),
        }
    }

    fn sample_rows() -> Vec<SpeciesRecord> {
        vec![
            row("Actinopterygii", "Cypriniformes", "Cyprinidae", "Cyprinus carpio"),
            row("", "", "", "Carassius auratus"),
            row("", "", "Cobitidae", "Cobitis taenia"),
            row("", "Perciformes", "Cichlidae", "Oreochromis niloticus"),
            row(" ", "", "  ", "Betta splendens"),
        ]
    }

    #[test]
    fn fills_missing_order_from_previous_row() {
        let table = normalize(&sample_rows()).unwrap();
        let second = &table.records()[1];
        assert_eq!(second.class, "Actinopterygii");
        assert_eq!(second.order, "Cypriniformes");
        assert_eq!(second.family, "Cyprinidae");
    }

    #[test]
    fn columns_fill_independently() {
        let table = normalize(&sample_rows()).unwrap();
        let loach = &table.records()[2];
        assert_eq!(loach.order, "Cypriniformes");
        assert_eq!(loach.family, "Cobitidae");

        let tilapia = &table.records()[3];
        assert_eq!(tilapia.class, "Actinopterygii");
        assert_eq!(tilapia.order, "Perciformes");

        let betta = &table.records()[4];
        assert_eq!(betta.class, "Actinopterygii");
        assert_eq!(betta.order, "Perciformes");
        assert_eq!(betta.family, "Cichlidae");
    }

    #[test]
    fn leaves_no_missing_ranks() {
        let table = normalize(&sample_rows()).unwrap();
        for record in table.records() {
            assert!(!is_missing(&record.class));
            assert!(!is_missing(&record.order));
            assert!(!is_missing(&record.family));
        }
    }

    #[test]
    fn keeps_input_untouched() {
        let rows = sample_rows();
        let snapshot = rows.clone();
        let _ = normalize(&rows).unwrap();
        assert_eq!(rows, snapshot);
    }

    #[test]
    fn is_idempotent() {
        let once = normalize(&sample_rows()).unwrap();
        let twice = normalize(once.records()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn first_row_without_order_is_rejected() {
        let rows = vec![
            row("Actinopterygii", "", "Cichlidae", "Oreochromis niloticus"),
            row("", "Perciformes", "", "Betta splendens"),
        ];
        let result = normalize(&rows);
        assert!(matches!(
            result,
            Err(CrateError::MissingAnchor { column, row }) if column == "Order" && row == 1
        ));
    }

    #[test]
    fn empty_input_gives_empty_table() {
        let table = normalize(&[]).unwrap();
        assert!(table.is_empty());
        assert_eq!(count_records(&table), 0);
        assert!(table.first_class().is_none());
        assert!(list_distinct_orders(&table).is_empty());
    }

    #[test]
    fn distinct_orders_follow_first_occurrence() {
        let rows = vec![
            row("Actinopterygii", "Siluriformes", "Ictaluridae", "Ictalurus punctatus"),
            row("", "Cypriniformes", "Cyprinidae", "Cyprinus carpio"),
            row("", "Siluriformes", "Siluridae", "Silurus glanis"),
            row("", "", "", "Silurus asotus"),
            row("", "Anguilliformes", "Anguillidae", "Anguilla anguilla"),
        ];
        let table = normalize(&rows).unwrap();
        assert_eq!(
            list_distinct_orders(&table),
            vec!["Siluriformes", "Cypriniformes", "Anguilliformes"]
        );
        assert_eq!(count_records(&table), 5);
        assert_eq!(table.first_class(), Some("Actinopterygii"));
    }
}

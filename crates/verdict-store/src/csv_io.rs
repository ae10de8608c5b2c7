//! CSV interchange with the survey spreadsheet
//!
//! The sheets are exchanged as CSV exports:
//!
//! - examples: `example_id, claim, sentence_1 .. sentence_N` (sparse; empty cell = absent)
//! - assignments: `user_id, example_ids` (e.g. `user_1, "[7, 3]"`)
//! - results: [`RESULT_COLUMNS`]
//!
//! Imports run in one transaction; the first bad row aborts the whole import.

use crate::{write_assignment, write_example, SqliteStore, StoreError};
use csv::StringRecord;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{info, warn};
use verdict_domain::{Assignment, AssignmentRow, Example, ExampleId, SurveyStore, RESULT_COLUMNS};

const SENTENCE_PREFIX: &str = "sentence_";

impl SqliteStore {
    /// Import the examples sheet from a CSV file
    pub fn import_examples_csv<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, StoreError> {
        let file = File::open(path.as_ref())?;
        self.import_examples_from_reader(file)
    }

    /// Import the examples sheet from any reader
    ///
    /// Returns the number of examples written.
    pub fn import_examples_from_reader<R: Read>(&mut self, reader: R) -> Result<usize, StoreError> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);
        let layout = ExampleLayout::from_headers(reader.headers()?)?;

        let tx = self.conn.transaction()?;
        let mut count = 0;
        for (idx, record) in reader.records().enumerate() {
            let line = idx + 2;
            let record = record?;
            let example = layout
                .parse(&record)
                .map_err(|e| StoreError::InvalidData(format!("examples line {}: {}", line, e)))?;
            write_example(&tx, &example)?;
            count += 1;
        }
        tx.commit()?;

        info!("Imported {} examples", count);
        Ok(count)
    }

    /// Import the assignments sheet from a CSV file
    pub fn import_assignments_csv<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, StoreError> {
        let file = File::open(path.as_ref())?;
        self.import_assignments_from_reader(file)
    }

    /// Import the assignments sheet from any reader
    ///
    /// Rows are stored raw. A row whose id list does not parse is still stored
    /// (it only fails for its own user at login) but is reported.
    pub fn import_assignments_from_reader<R: Read>(&mut self, reader: R) -> Result<usize, StoreError> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let headers = reader.headers()?.clone();
        let user_col = column(&headers, "user_id")?;
        let ids_col = column(&headers, "example_ids")?;

        let tx = self.conn.transaction()?;
        let mut count = 0;
        for (idx, record) in reader.records().enumerate() {
            let line = idx + 2;
            let record = record?;
            let user_id = record.get(user_col).unwrap_or_default();
            if user_id.is_empty() {
                return Err(StoreError::InvalidData(format!("assignments line {}: empty user_id", line)));
            }

            let row = AssignmentRow::new(user_id, record.get(ids_col).unwrap_or_default());
            if let Err(e) = Assignment::parse(&row) {
                warn!("assignments line {}: {}", line, e);
            }
            write_assignment(&tx, &row)?;
            count += 1;
        }
        tx.commit()?;

        info!("Imported {} assignment rows", count);
        Ok(count)
    }

    /// Export the results table to a CSV file
    pub fn export_results_csv<P: AsRef<Path>>(&self, path: P) -> Result<usize, StoreError> {
        let file = File::create(path.as_ref())?;
        self.export_results_to_writer(file)
    }

    /// Export the results table to any writer, header first
    pub fn export_results_to_writer<W: Write>(&self, writer: W) -> Result<usize, StoreError> {
        let records = self.load_results()?;
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(RESULT_COLUMNS)?;
        for record in &records {
            writer.write_record(record.to_row())?;
        }
        writer.flush()?;

        info!("Exported {} results", records.len());
        Ok(records.len())
    }
}

/// Column positions of the examples sheet
struct ExampleLayout {
    id_col: usize,
    claim_col: usize,
    /// Sentence columns ordered by their slot number
    sentence_cols: Vec<usize>,
}

impl ExampleLayout {
    fn from_headers(headers: &StringRecord) -> Result<Self, StoreError> {
        let id_col = column(headers, "example_id")?;
        let claim_col = column(headers, "claim")?;

        let mut slots: Vec<(usize, usize)> = headers
            .iter()
            .enumerate()
            .filter_map(|(col, name)| {
                name.strip_prefix(SENTENCE_PREFIX)
                    .and_then(|n| n.parse::<usize>().ok())
                    .map(|slot| (slot, col))
            })
            .collect();
        slots.sort_unstable();

        Ok(Self {
            id_col,
            claim_col,
            sentence_cols: slots.into_iter().map(|(_, col)| col).collect(),
        })
    }

    fn parse(&self, record: &StringRecord) -> Result<Example, StoreError> {
        let id: ExampleId = record.get(self.id_col).unwrap_or_default().parse()?;
        let claim = record.get(self.claim_col).unwrap_or_default();

        let mut slots: Vec<&str> = self
            .sentence_cols
            .iter()
            .map(|&col| record.get(col).unwrap_or_default())
            .collect();
        while slots.last().is_some_and(|s| s.trim().is_empty()) {
            slots.pop();
        }

        Ok(Example::from_slots(id, claim, slots)?)
    }
}

fn column(headers: &StringRecord, name: &str) -> Result<usize, StoreError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| StoreError::InvalidData(format!("missing column '{}'", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_empty_slots_do_not_count() {
        let mut header = vec!["example_id".to_string(), "claim".to_string()];
        let mut row = vec!["1".to_string(), "c".to_string()];
        for n in 1..=60 {
            header.push(format!("sentence_{}", n));
            row.push(if n <= 50 { format!("s{}", n) } else { String::new() });
        }

        let layout = ExampleLayout::from_headers(&StringRecord::from(header)).unwrap();
        let example = layout.parse(&StringRecord::from(row)).unwrap();
        assert_eq!(example.evidence.len(), 50);
    }

    #[test]
    fn test_sentence_columns_sorted_by_slot() {
        let header = StringRecord::from(vec!["sentence_2", "claim", "sentence_10", "example_id", "sentence_1"]);
        let layout = ExampleLayout::from_headers(&header).unwrap();
        let example = layout
            .parse(&StringRecord::from(vec!["b", "c", "j", "4", "a"]))
            .unwrap();
        assert_eq!(example.evidence, vec!["a", "b", "j"]);
    }

    #[test]
    fn test_missing_column() {
        let header = StringRecord::from(vec!["id", "claim"]);
        assert!(matches!(
            ExampleLayout::from_headers(&header),
            Err(StoreError::InvalidData(_))
        ));
    }
}

use std::io::Read;

use serde::Deserialize;
use serde_json::Value;

use crate::application::{AppError, ImportMode, LedgerStore, parse_amount};
use crate::domain::{Entry, EntryId};

/// Result of an import operation
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub imported: usize,
    /// Entries whose id clashed in replace mode and were given a new one
    pub rekeyed: usize,
    pub errors: Vec<ImportError>,
}

/// Error that occurred during import
#[derive(Debug, Clone)]
pub struct ImportError {
    /// 1-based record number (CSV line, or array position for JSON)
    pub line: usize,
    pub field: Option<String>,
    pub error: String,
}

/// Options for import operations
#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub mode: ImportMode,
    pub dry_run: bool,
    /// Import the good records even when some are invalid
    pub skip_invalid: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            mode: ImportMode::Append,
            dry_run: false,
            skip_invalid: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CsvRecord {
    id: Option<EntryId>,
    text: String,
    amount: String,
}

/// Importer for loading entries into the ledger
pub struct Importer<'a> {
    store: &'a mut LedgerStore,
}

impl<'a> Importer<'a> {
    pub fn new(store: &'a mut LedgerStore) -> Self {
        Self { store }
    }

    /// Import a JSON array in the persisted shape.
    ///
    /// A document that is not an array is an error; bad items are reported
    /// per position.
    pub async fn import_json<R: Read>(
        &mut self,
        reader: R,
        options: ImportOptions,
    ) -> Result<ImportReport, AppError> {
        let items: Vec<Value> = serde_json::from_reader(reader)?;

        let mut entries = Vec::with_capacity(items.len());
        let mut errors = Vec::new();
        for (index, item) in items.into_iter().enumerate() {
            match serde_json::from_value::<Entry>(item) {
                Ok(entry) => entries.push(entry),
                Err(e) => errors.push(ImportError {
                    line: index + 1,
                    field: None,
                    error: e.to_string(),
                }),
            }
        }

        self.apply(entries, errors, options).await
    }

    /// Import CSV with an `id,text,amount` header. The id column may be empty.
    pub async fn import_csv<R: Read>(
        &mut self,
        reader: R,
        options: ImportOptions,
    ) -> Result<ImportReport, AppError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut entries = Vec::new();
        let mut errors = Vec::new();

        for (line_num, result) in csv_reader.deserialize::<CsvRecord>().enumerate() {
            let line = line_num + 2; // +2 for header and 0-indexing

            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    errors.push(ImportError {
                        line,
                        field: None,
                        error: format!("CSV parse error: {}", e),
                    });
                    continue;
                }
            };

            match parse_amount(&record.amount) {
                Ok(amount_cents) => {
                    // Rows without an id get one past anything seen so far
                    let id = record.id.unwrap_or_else(|| {
                        entries.iter().map(|e: &Entry| e.id).max().unwrap_or(0) + 1
                    });
                    entries.push(Entry::new(id, record.text, amount_cents));
                }
                Err(e) => errors.push(ImportError {
                    line,
                    field: Some("amount".to_string()),
                    error: e.to_string(),
                }),
            }
        }

        self.apply(entries, errors, options).await
    }

    async fn apply(
        &mut self,
        entries: Vec<Entry>,
        errors: Vec<ImportError>,
        options: ImportOptions,
    ) -> Result<ImportReport, AppError> {
        let mut report = ImportReport {
            imported: entries.len(),
            rekeyed: 0,
            errors,
        };

        if !report.errors.is_empty() && !options.skip_invalid {
            report.imported = 0;
            return Ok(report);
        }
        if options.dry_run {
            return Ok(report);
        }

        let result = self.store.import(entries, options.mode).await?;
        report.imported = result.imported;
        report.rekeyed = result.rekeyed;
        Ok(report)
    }
}

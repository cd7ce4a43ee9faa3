use std::io::Write;

use anyhow::Result;

use crate::application::LedgerStore;
use crate::domain::format_cents;

/// Exporter for writing the ledger out in portable formats
pub struct Exporter<'a> {
    store: &'a LedgerStore,
}

impl<'a> Exporter<'a> {
    pub fn new(store: &'a LedgerStore) -> Self {
        Self { store }
    }

    /// Export entries as a JSON array in the persisted shape
    pub fn export_json<W: Write>(&self, mut writer: W) -> Result<usize> {
        let entries = self.store.entries();
        serde_json::to_writer_pretty(&mut writer, entries)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(entries.len())
    }

    /// Export entries to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let entries = self.store.entries();
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "text", "amount"])?;
        for entry in entries {
            csv_writer.write_record([
                entry.id.to_string(),
                entry.text.clone(),
                format_cents(entry.amount_cents),
            ])?;
        }

        csv_writer.flush()?;
        Ok(entries.len())
    }
}

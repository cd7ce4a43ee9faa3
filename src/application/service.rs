use anyhow::Context;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::config::Settings;
use crate::domain::{
    Cents, Entry, EntryId, Ledger, ParseCentsError, Restored, Totals, check_amount, format_cents,
    parse_cents, totals,
};
use crate::storage::{Repository, decode_entries, encode_entries};

use super::{AppError, Intent, LedgerView, Outcome};

/// Owns the ledger and keeps it in step with the key/value store.
/// This is the primary interface for any client (CLI, shell, tests).
pub struct LedgerStore {
    repo: Repository,
    key: String,
    ledger: Ledger,
}

/// How imported entries are combined with the current ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Keep current entries and append the imported ones under fresh ids
    Append,
    /// Drop current entries and take the imported sequence as-is
    Replace,
}

/// Result of an import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportResult {
    pub imported: usize,
    /// Imported entries whose id clashed and was replaced (replace mode only)
    pub rekeyed: usize,
}

/// Parse user-entered amount text, rejecting anything that is not a number.
pub fn parse_amount(input: &str) -> Result<Cents, AppError> {
    parse_cents(input).map_err(|e| invalid_amount(input.to_string(), e))
}

fn validate_amount(amount_cents: Cents) -> Result<Cents, AppError> {
    check_amount(amount_cents).map_err(|e| invalid_amount(format_cents(amount_cents), e))
}

fn invalid_amount(input: String, error: ParseCentsError) -> AppError {
    AppError::InvalidAmount {
        input,
        reason: error.to_string(),
    }
}

impl LedgerStore {
    /// Open the store described by `settings`, creating the database if needed,
    /// and load the ledger.
    pub async fn open(settings: &Settings) -> Result<Self, AppError> {
        let repo = Repository::open(&settings.database).await?;
        Self::with_repository(repo, settings.storage_key.clone()).await
    }

    /// Build a store over an existing repository and load the ledger kept
    /// under `key`.
    pub async fn with_repository(repo: Repository, key: impl Into<String>) -> Result<Self, AppError> {
        let mut store = Self {
            repo,
            key: key.into(),
            ledger: Ledger::new(),
        };
        store.reload().await?;
        Ok(store)
    }

    /// Replace the in-memory ledger with what is persisted.
    ///
    /// Duplicate ids found in stored data are re-keyed and the result is
    /// written back straight away.
    pub async fn reload(&mut self) -> Result<(), AppError> {
        let entries = self.load().await?;
        let Restored { ledger, reassigned } = Ledger::restore(entries);
        self.ledger = ledger;

        if reassigned > 0 {
            warn!(reassigned, "stored ledger had duplicate ids, re-keyed");
            self.persist(self.ledger.entries()).await?;
        }

        debug!(entries = self.ledger.len(), key = %self.key, "ledger loaded");
        Ok(())
    }

    // ========================
    // Persistence
    // ========================

    /// Read the persisted entries. Absent or malformed data reads as empty;
    /// only a failing store is an error.
    pub async fn load(&self) -> Result<Vec<Entry>, AppError> {
        let Some(stored) = self.repo.get(&self.key).await? else {
            return Ok(Vec::new());
        };

        let decoded = decode_entries(&stored.value);
        if decoded.skipped > 0 {
            warn!(skipped = decoded.skipped, "dropped unreadable entries from stored ledger");
        }
        Ok(decoded.entries)
    }

    /// Write `entries` under the store key, replacing the prior value.
    pub async fn persist(&self, entries: &[Entry]) -> Result<(), AppError> {
        let json = encode_entries(entries).context("Failed to encode ledger")?;
        self.repo.set(&self.key, &json).await?;
        debug!(entries = entries.len(), key = %self.key, "ledger persisted");
        Ok(())
    }

    /// Persist the current ledger, or put `previous` back if that fails.
    async fn commit(&mut self, previous: Ledger) -> Result<(), AppError> {
        if let Err(e) = self.persist(self.ledger.entries()).await {
            self.ledger = previous;
            return Err(e);
        }
        Ok(())
    }

    // ========================
    // Ledger operations
    // ========================

    /// Append an entry with a fresh id and persist.
    pub async fn add(&mut self, text: &str, amount_cents: Cents) -> Result<Entry, AppError> {
        validate_amount(amount_cents)?;
        let previous = self.ledger.clone();
        let entry = self.ledger.add(text.trim(), amount_cents);
        self.commit(previous).await?;

        debug!(id = entry.id, amount_cents, "entry added");
        Ok(entry)
    }

    /// Remove the entry with `id` and persist. Unknown ids are a no-op.
    pub async fn remove(&mut self, id: EntryId) -> Result<Option<Entry>, AppError> {
        let previous = self.ledger.clone();
        let removed = self.ledger.remove(id);
        self.commit(previous).await?;

        match &removed {
            Some(entry) => debug!(id = entry.id, "entry removed"),
            None => debug!(id, "no entry to remove"),
        }
        Ok(removed)
    }

    /// Apply a user intent coming from a presentation layer.
    pub async fn dispatch(&mut self, intent: Intent) -> Result<Outcome, AppError> {
        match intent {
            Intent::Add { text, amount } => {
                let amount_cents = parse_amount(&amount)?;
                let entry = self.add(&text, amount_cents).await?;
                Ok(Outcome::Added(entry))
            }
            Intent::Delete(id) => Ok(match self.remove(id).await? {
                Some(entry) => Outcome::Removed(entry),
                None => Outcome::NotFound(id),
            }),
        }
    }

    /// Bring entries from elsewhere (an export, a browser dump) into the ledger.
    pub async fn import(
        &mut self,
        entries: Vec<Entry>,
        mode: ImportMode,
    ) -> Result<ImportResult, AppError> {
        for entry in &entries {
            validate_amount(entry.amount_cents)?;
        }
        let previous = self.ledger.clone();
        let imported = entries.len();

        let rekeyed = match mode {
            ImportMode::Append => {
                self.ledger.extend_fresh(entries);
                0
            }
            ImportMode::Replace => {
                let restored = Ledger::restore(entries);
                self.ledger = restored.ledger;
                restored.reassigned
            }
        };
        self.commit(previous).await?;

        debug!(imported, rekeyed, ?mode, "entries imported");
        Ok(ImportResult { imported, rekeyed })
    }

    /// Delete the persisted ledger and start over empty.
    /// Returns whether anything was stored.
    pub async fn clear(&mut self) -> Result<bool, AppError> {
        let existed = self.repo.remove(&self.key).await?;
        self.ledger = Ledger::new();
        debug!(key = %self.key, existed, "ledger cleared");
        Ok(existed)
    }

    // ========================
    // Queries
    // ========================

    pub fn entries(&self) -> &[Entry] {
        self.ledger.entries()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn totals(&self) -> Totals {
        totals(self.ledger.entries())
    }

    pub fn view(&self) -> LedgerView<'_> {
        LedgerView {
            entries: self.ledger.entries(),
            totals: self.totals(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// When the ledger was last written, if it has ever been.
    pub async fn last_saved(&self) -> Result<Option<DateTime<Utc>>, AppError> {
        Ok(self.repo.get(&self.key).await?.map(|v| v.updated_at))
    }

    /// All keys present in the underlying store.
    pub async fn stored_keys(&self) -> Result<Vec<String>, AppError> {
        Ok(self.repo.keys().await?)
    }
}

// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::path::PathBuf;

use anyhow::Result;
use tally::application::LedgerStore;
use tally::config::Settings;
use tally::storage::Repository;
use tempfile::TempDir;

/// Helper to create a test store with a temporary database
pub async fn test_store() -> Result<(LedgerStore, TempDir)> {
    let temp_dir = TempDir::new()?;
    let store = LedgerStore::open(&settings_in(&temp_dir)).await?;
    Ok((store, temp_dir))
}

/// Settings pointing at the database inside `temp_dir`
pub fn settings_in(temp_dir: &TempDir) -> Settings {
    Settings::with_database(db_path(temp_dir).to_str().unwrap())
}

pub fn db_path(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("test.db")
}

/// Reopen the store from disk, as a new session would
pub async fn reopen(temp_dir: &TempDir) -> Result<LedgerStore> {
    Ok(LedgerStore::open(&settings_in(temp_dir)).await?)
}

/// Write a raw value under the ledger key, bypassing the store
pub async fn write_raw(temp_dir: &TempDir, value: &str) -> Result<()> {
    let settings = settings_in(temp_dir);
    let repo = Repository::open(&settings.database).await?;
    repo.set(&settings.storage_key, value).await?;
    Ok(())
}

/// Read the raw value under the ledger key
pub async fn read_raw(temp_dir: &TempDir) -> Result<Option<String>> {
    let settings = settings_in(temp_dir);
    let repo = Repository::open(&settings.database).await?;
    Ok(repo.get(&settings.storage_key).await?.map(|v| v.value))
}

/// Test fixture: the salary/rent ledger
pub async fn add_salary_and_rent(store: &mut LedgerStore) -> Result<()> {
    store.add("Salary", 100000).await?;
    store.add("Rent", -40000).await?;
    Ok(())
}

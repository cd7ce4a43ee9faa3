mod common;

use anyhow::Result;
use common::{reopen, test_store};
use tally::cli::run_shell;

async fn run_script(script: &str) -> Result<(String, tempfile::TempDir)> {
    let (mut store, temp) = test_store().await?;
    let mut out = Vec::new();
    run_shell(&mut store, script.as_bytes(), &mut out, "$").await?;
    Ok((String::from_utf8(out)?, temp))
}

#[tokio::test]
async fn test_shell_add_and_delete_cycle() -> Result<()> {
    let (output, temp) = run_script("add Salary 1000\nadd Rent -400\nrm 2\nquit\n").await?;

    assert!(output.contains("Added #1: Salary $ 1000.00"));
    assert!(output.contains("Added #2: Rent $ -400.00"));
    assert!(output.contains("Balance:  $ 600.00 (income)"));
    assert!(output.contains("Removed #2: Rent"));
    assert!(output.contains("Balance:  $ 1000.00 (income)"));

    // Every change was persisted
    let store = reopen(&temp).await?;
    assert_eq!(store.entries().len(), 1);
    assert_eq!(store.entries()[0].text, "Salary");

    Ok(())
}

#[tokio::test]
async fn test_shell_survives_bad_input() -> Result<()> {
    let (output, temp) =
        run_script("add Lunch twelve\nrm abc\nbogus\nrm 42\n\nadd Lunch -12\n").await?;

    assert!(output.contains("error: Invalid amount 'twelve'"));
    assert!(output.contains("error: 'abc' is not an entry id"));
    assert!(output.contains("error: unknown command 'bogus'"));
    assert!(output.contains("No entry with id 42"));
    assert!(output.contains("Added #1: Lunch $ -12.00"));

    let store = reopen(&temp).await?;
    assert_eq!(store.totals().expense_display(), 1200);

    Ok(())
}

#[tokio::test]
async fn test_shell_renders_on_start_and_list() -> Result<()> {
    let (output, _temp) = run_script("help\ntotals\nlist\n").await?;

    assert!(output.starts_with("tally shell."));
    assert!(output.contains("No entries yet."));
    assert!(output.contains("Commands:"));
    assert_eq!(output.matches("Expense:  $ 0.00").count(), 3);

    Ok(())
}

#[tokio::test]
async fn test_shell_keeps_label_spacing() -> Result<()> {
    let (output, temp) = run_script("add   Rent  and   bills   -900\n").await?;

    assert!(output.contains("Added #1: Rent  and   bills $ -900.00"));
    let store = reopen(&temp).await?;
    assert_eq!(store.entries()[0].text, "Rent  and   bills");

    Ok(())
}

mod common;

use anyhow::Result;
use common::{add_salary_and_rent, test_store};
use tally::application::{AppError, ImportMode};
use tally::io::{Exporter, ImportOptions, Importer};

#[tokio::test]
async fn test_export_json_is_stored_shape() -> Result<()> {
    let (mut store, _temp) = test_store().await?;
    add_salary_and_rent(&mut store).await?;

    let mut out = Vec::new();
    let count = Exporter::new(&store).export_json(&mut out)?;
    assert_eq!(count, 2);

    let value: serde_json::Value = serde_json::from_slice(&out)?;
    assert_eq!(
        value,
        serde_json::json!([
            {"id": 1, "text": "Salary", "amount": 1000},
            {"id": 2, "text": "Rent", "amount": -400}
        ])
    );

    Ok(())
}

#[tokio::test]
async fn test_export_csv() -> Result<()> {
    let (mut store, _temp) = test_store().await?;
    add_salary_and_rent(&mut store).await?;
    store.add("Lunch, with tip", -1275).await?;

    let mut out = Vec::new();
    let count = Exporter::new(&store).export_csv(&mut out)?;
    assert_eq!(count, 3);

    let csv = String::from_utf8(out)?;
    assert_eq!(
        csv,
        "id,text,amount\n1,Salary,1000.00\n2,Rent,-400.00\n3,\"Lunch, with tip\",-12.75\n"
    );

    Ok(())
}

#[tokio::test]
async fn test_json_export_import_between_stores() -> Result<()> {
    let (mut source, _source_temp) = test_store().await?;
    add_salary_and_rent(&mut source).await?;
    let mut exported = Vec::new();
    Exporter::new(&source).export_json(&mut exported)?;

    let (mut target, _target_temp) = test_store().await?;
    let options = ImportOptions {
        mode: ImportMode::Replace,
        ..ImportOptions::default()
    };
    let report = Importer::new(&mut target)
        .import_json(exported.as_slice(), options)
        .await?;

    assert_eq!(report.imported, 2);
    assert!(report.errors.is_empty());
    assert_eq!(target.entries(), source.entries());
    assert_eq!(target.totals(), source.totals());

    Ok(())
}

#[tokio::test]
async fn test_import_json_reports_bad_items() -> Result<()> {
    let (mut store, _temp) = test_store().await?;
    let input = r#"[
        {"id": 1, "text": "Salary", "amount": 1000},
        {"id": 2, "text": "Broken", "amount": null}
    ]"#;

    // Without --skip-invalid nothing is imported
    let report = Importer::new(&mut store)
        .import_json(input.as_bytes(), ImportOptions::default())
        .await?;
    assert_eq!(report.imported, 0);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].line, 2);
    assert!(store.entries().is_empty());

    let options = ImportOptions {
        skip_invalid: true,
        ..ImportOptions::default()
    };
    let report = Importer::new(&mut store)
        .import_json(input.as_bytes(), options)
        .await?;
    assert_eq!(report.imported, 1);
    assert_eq!(store.entries().len(), 1);
    assert_eq!(store.entries()[0].text, "Salary");

    Ok(())
}

#[tokio::test]
async fn test_import_json_rejects_non_array() -> Result<()> {
    let (mut store, _temp) = test_store().await?;

    let result = Importer::new(&mut store)
        .import_json(r#"{"entries": []}"#.as_bytes(), ImportOptions::default())
        .await;

    assert!(matches!(result, Err(AppError::InvalidSnapshot(_))));
    Ok(())
}

#[tokio::test]
async fn test_import_csv_appends() -> Result<()> {
    let (mut store, _temp) = test_store().await?;
    add_salary_and_rent(&mut store).await?;

    let input = "id,text,amount\n,Coffee,-3.5\n77,Gift,25\n,Bad,abc\n";
    let options = ImportOptions {
        skip_invalid: true,
        ..ImportOptions::default()
    };
    let report = Importer::new(&mut store)
        .import_csv(input.as_bytes(), options)
        .await?;

    assert_eq!(report.imported, 2);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].line, 4);
    assert_eq!(report.errors[0].field.as_deref(), Some("amount"));

    let ids: Vec<i64> = store.entries().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
    assert_eq!(store.totals().balance, 100000 - 40000 - 350 + 2500);

    Ok(())
}

#[tokio::test]
async fn test_import_dry_run_changes_nothing() -> Result<()> {
    let (mut store, _temp) = test_store().await?;

    let options = ImportOptions {
        dry_run: true,
        ..ImportOptions::default()
    };
    let report = Importer::new(&mut store)
        .import_csv("id,text,amount\n1,Salary,1000\n".as_bytes(), options)
        .await?;

    assert_eq!(report.imported, 1);
    assert!(store.entries().is_empty());

    Ok(())
}

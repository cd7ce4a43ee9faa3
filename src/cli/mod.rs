mod render;
mod shell;

use std::io::{Read, Write, stdin, stdout};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;

use crate::application::{ImportMode, LedgerStore, Render, parse_amount};
use crate::config::Settings;
use crate::domain::{EntryId, format_money};
use crate::io::{Exporter, ImportOptions, Importer};

pub use render::{JsonRenderer, Section, TextRenderer};
pub use shell::{ShellCommand, parse_command, run_shell};

/// Tally - income and expense tracker
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Keep a running ledger of income and expenses with balance totals")]
#[command(version)]
pub struct Cli {
    /// Database file path (overrides configuration)
    #[arg(short, long, global = true)]
    pub database: Option<String>,

    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for rendered views
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ViewFormat {
    Table,
    Json,
}

/// File format for export and import
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DataFormat {
    Json,
    Csv,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record an entry (positive amount for income, negative for an expense)
    Add {
        /// Label for the entry
        text: String,

        /// Amount (e.g., "1000", "-400", "12.50")
        #[arg(allow_negative_numbers = true)]
        amount: String,
    },

    /// Delete an entry by id
    #[command(visible_aliases = ["rm", "delete"])]
    Remove {
        /// Entry id, as shown by `list`
        id: EntryId,
    },

    /// Show all entries with balance, income and expense
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = ViewFormat::Table)]
        format: ViewFormat,
    },

    /// Show balance, income and expense only
    Totals {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = ViewFormat::Table)]
        format: ViewFormat,
    },

    /// Interactive session: add and delete entries, re-rendering after each change
    Shell,

    /// Export entries to JSON or CSV
    Export {
        /// Format: json (the stored shape) or csv
        #[arg(short, long, value_enum, default_value_t = DataFormat::Json)]
        format: DataFormat,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Import entries from JSON or CSV
    Import {
        /// Input file (stdin if omitted)
        input: Option<String>,

        /// Format: json (the stored shape) or csv
        #[arg(short, long, value_enum, default_value_t = DataFormat::Json)]
        format: DataFormat,

        /// Replace the current ledger instead of appending
        #[arg(long)]
        replace: bool,

        /// Preview without importing
        #[arg(long)]
        dry_run: bool,

        /// Import valid records even if some are invalid
        #[arg(long)]
        skip_invalid: bool,
    },

    /// Delete every entry and the stored ledger
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },

    /// Show where the ledger is stored and its state
    Info,
}

impl Cli {
    fn settings(&self) -> Result<Settings> {
        let mut settings =
            Settings::load(self.config.as_deref()).context("Failed to load configuration")?;
        if let Some(database) = &self.database {
            settings.database = database.clone();
        }
        debug!(
            database = %settings.database,
            storage_key = %settings.storage_key,
            "settings resolved"
        );
        Ok(settings)
    }

    pub async fn run(self) -> Result<()> {
        let settings = self.settings()?;
        let mut store = LedgerStore::open(&settings)
            .await
            .with_context(|| format!("Failed to open ledger at {}", settings.database))?;
        let symbol = settings.currency_symbol.as_str();

        match self.command {
            Commands::Add { text, amount } => {
                let amount_cents = parse_amount(&amount)?;
                let entry = store.add(&text, amount_cents).await?;
                println!(
                    "Recorded entry #{}: {} {}",
                    entry.id,
                    entry.text,
                    format_money(symbol, entry.amount_cents)
                );
                println!("Balance: {}", format_money(symbol, store.totals().balance));
            }

            Commands::Remove { id } => match store.remove(id).await? {
                Some(entry) => {
                    println!("Removed entry #{}: {}", entry.id, entry.text);
                    println!("Balance: {}", format_money(symbol, store.totals().balance));
                }
                None => println!("No entry with id {}", id),
            },

            Commands::List { format } => render_view(&store, format, Section::Full, symbol)?,

            Commands::Totals { format } => render_view(&store, format, Section::Totals, symbol)?,

            Commands::Shell => {
                run_shell(&mut store, stdin().lock(), stdout(), symbol).await?;
            }

            Commands::Export { format, output } => {
                run_export_command(&store, format, output.as_deref())?;
            }

            Commands::Import {
                input,
                format,
                replace,
                dry_run,
                skip_invalid,
            } => {
                let options = ImportOptions {
                    mode: if replace {
                        ImportMode::Replace
                    } else {
                        ImportMode::Append
                    },
                    dry_run,
                    skip_invalid,
                };
                run_import_command(&mut store, input.as_deref(), format, options).await?;
            }

            Commands::Clear { yes } => {
                let count = store.entries().len();
                if !yes {
                    anyhow::bail!(
                        "Refusing to clear {} entries without --yes",
                        count
                    );
                }
                if store.clear().await? {
                    println!("Cleared {} entries", count);
                } else {
                    println!("Nothing stored; ledger already empty");
                }
            }

            Commands::Info => {
                println!("Database:     {}", settings.database);
                println!("Storage key:  {}", store.key());
                println!("Entries:      {}", store.entries().len());
                println!("Next id:      {}", store.ledger().next_id());
                match store.last_saved().await? {
                    Some(at) => println!("Last saved:   {}", at.format("%Y-%m-%d %H:%M:%S")),
                    None => println!("Last saved:   never"),
                }
                println!("Stored keys:  {}", store.stored_keys().await?.join(", "));
            }
        }

        Ok(())
    }
}

fn render_view(store: &LedgerStore, format: ViewFormat, section: Section, symbol: &str) -> Result<()> {
    let view = store.view();
    let out = stdout().lock();
    match format {
        ViewFormat::Table => TextRenderer::new(out, symbol)
            .with_section(section)
            .render(&view)?,
        ViewFormat::Json => JsonRenderer::new(out).with_section(section).render(&view)?,
    }
    Ok(())
}

fn run_export_command(store: &LedgerStore, format: DataFormat, output: Option<&str>) -> Result<()> {
    use std::fs::File;

    let exporter = Exporter::new(store);

    // Determine output writer
    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    let count = match format {
        DataFormat::Json => exporter.export_json(writer)?,
        DataFormat::Csv => exporter.export_csv(writer)?,
    };
    if output.is_some() {
        eprintln!("Exported {} entries", count);
    }

    Ok(())
}

async fn run_import_command(
    store: &mut LedgerStore,
    input: Option<&str>,
    format: DataFormat,
    options: ImportOptions,
) -> Result<()> {
    use std::fs::File;

    let dry_run = options.dry_run;
    let mut importer = Importer::new(store);

    // Determine input reader
    let reader: Box<dyn Read> = match input {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("Failed to open input file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdin()),
    };

    let report = match format {
        DataFormat::Json => importer.import_json(reader, options).await?,
        DataFormat::Csv => importer.import_csv(reader, options).await?,
    };

    if dry_run {
        println!("Dry run, nothing imported");
    } else if report.imported == 0 && !report.errors.is_empty() {
        println!("Import aborted (use --skip-invalid to import the valid records)");
    } else {
        println!("Import complete");
    }
    println!("  Imported: {}", report.imported);
    println!("  Re-keyed: {}", report.rekeyed);
    println!("  Errors:   {}", report.errors.len());

    if !report.errors.is_empty() {
        println!("\nErrors:");
        for error in report.errors.iter().take(10) {
            println!(
                "  Line {}: {}",
                error.line,
                error
                    .field
                    .as_ref()
                    .map(|f| format!("{}: ", f))
                    .unwrap_or_default()
                    + &error.error
            );
        }
        if report.errors.len() > 10 {
            println!("  ... and {} more errors", report.errors.len() - 10);
        }
    }

    Ok(())
}

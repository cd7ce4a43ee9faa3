use std::io::{BufRead, Write};

use anyhow::Result;

use crate::application::{AppError, Intent, LedgerStore, Outcome, Render};
use crate::domain::{EntryId, format_money};

use super::render::{Section, TextRenderer};

const HELP: &str = "\
Commands:
  add <label...> <amount>   record an entry (negative amount for an expense)
  rm <id>                   delete an entry (also: del, delete)
  list                      show entries and totals (also: ls)
  totals                    show balance, income and expense
  help                      show this help
  quit                      leave the shell (also: exit, Ctrl-D)";

/// One parsed line of shell input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Intent(Intent),
    List,
    Totals,
    Help,
    Quit,
}

/// Parse a line of input. Blank lines parse to `None`.
pub fn parse_command(line: &str) -> Result<Option<ShellCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim_start()),
        None => (line, ""),
    };

    let parsed = match command.to_lowercase().as_str() {
        "add" => {
            if rest.is_empty() {
                return Err("usage: add <label...> <amount>".to_string());
            }
            // The label is everything before the last word, spacing intact
            let (label, amount) = rest.rsplit_once(char::is_whitespace).unwrap_or(("", rest));
            ShellCommand::Intent(Intent::Add {
                text: label.trim_end().to_string(),
                amount: amount.to_string(),
            })
        }
        "rm" | "del" | "delete" => match rest.split_whitespace().collect::<Vec<_>>().as_slice() {
            [id] => {
                let id: EntryId = id
                    .parse()
                    .map_err(|_| format!("'{}' is not an entry id", id))?;
                ShellCommand::Intent(Intent::Delete(id))
            }
            _ => return Err("usage: rm <id>".to_string()),
        },
        "list" | "ls" => ShellCommand::List,
        "totals" => ShellCommand::Totals,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(format!("unknown command '{}', try 'help'", other)),
    };
    Ok(Some(parsed))
}

/// Run the interactive loop until `quit` or end of input.
///
/// Each add or delete is applied, persisted and followed by a fresh render.
/// Bad input is reported and the loop carries on; a storage failure ends it.
pub async fn run_shell<R: BufRead, W: Write>(
    store: &mut LedgerStore,
    mut input: R,
    mut out: W,
    currency_symbol: &str,
) -> Result<()> {
    writeln!(out, "tally shell. Type 'help' for commands.")?;
    render(store, &mut out, currency_symbol, Section::Full)?;

    let mut line = String::new();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                writeln!(out, "error: {}", message)?;
                continue;
            }
        };

        match command {
            ShellCommand::Quit => break,
            ShellCommand::Help => writeln!(out, "{}", HELP)?,
            ShellCommand::List => render(store, &mut out, currency_symbol, Section::Full)?,
            ShellCommand::Totals => render(store, &mut out, currency_symbol, Section::Totals)?,
            ShellCommand::Intent(intent) => match store.dispatch(intent).await {
                Ok(outcome) => {
                    report(&outcome, &mut out, currency_symbol)?;
                    if outcome.changed() {
                        render(store, &mut out, currency_symbol, Section::Full)?;
                    }
                }
                Err(e @ AppError::InvalidAmount { .. }) => writeln!(out, "error: {}", e)?,
                Err(e) => return Err(e.into()),
            },
        }
    }

    Ok(())
}

fn render<W: Write>(
    store: &LedgerStore,
    out: &mut W,
    currency_symbol: &str,
    section: Section,
) -> Result<()> {
    TextRenderer::new(out, currency_symbol)
        .with_section(section)
        .render(&store.view())?;
    Ok(())
}

fn report<W: Write>(outcome: &Outcome, out: &mut W, currency_symbol: &str) -> Result<()> {
    match outcome {
        Outcome::Added(entry) => writeln!(
            out,
            "Added #{}: {} {}",
            entry.id,
            entry.text,
            format_money(currency_symbol, entry.amount_cents)
        )?,
        Outcome::Removed(entry) => writeln!(out, "Removed #{}: {}", entry.id, entry.text)?,
        Outcome::NotFound(id) => writeln!(out, "No entry with id {}", id)?,
    }
    Ok(())
}

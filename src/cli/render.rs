use std::io::{self, Write};

use serde::Serialize;

use crate::application::{LedgerView, Render};
use crate::domain::{Entry, TotalCents, Totals, amount_units, format_cents, format_money};

/// What part of the ledger to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Entry list followed by totals
    Full,
    /// Only balance, income and expense
    Totals,
}

/// Plain-text table renderer.
pub struct TextRenderer<W: Write> {
    out: W,
    currency_symbol: String,
    section: Section,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W, currency_symbol: impl Into<String>) -> Self {
        Self {
            out,
            currency_symbol: currency_symbol.into(),
            section: Section::Full,
        }
    }

    pub fn with_section(mut self, section: Section) -> Self {
        self.section = section;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_entries(&mut self, entries: &[Entry]) -> io::Result<()> {
        if entries.is_empty() {
            writeln!(self.out, "No entries yet.")?;
            return Ok(());
        }

        writeln!(self.out, "{:<6} {:<30} {:>14}", "ID", "DESCRIPTION", "AMOUNT")?;
        writeln!(self.out, "{}", "-".repeat(52))?;
        for entry in entries {
            writeln!(
                self.out,
                "{:<6} {:<30} {} {:>12}",
                entry.id,
                truncate(&entry.text, 30),
                entry.kind().sign(),
                format_cents(entry.amount_cents.unsigned_abs())
            )?;
        }
        Ok(())
    }

    fn write_totals(&mut self, totals: &Totals) -> io::Result<()> {
        let symbol = &self.currency_symbol;
        writeln!(
            self.out,
            "Balance:  {} ({})",
            format_money(symbol, totals.balance),
            totals.balance_kind()
        )?;
        writeln!(self.out, "Income:   {}", format_money(symbol, totals.income))?;
        writeln!(
            self.out,
            "Expense:  {}",
            format_money(symbol, totals.expense_display())
        )?;
        Ok(())
    }
}

impl<W: Write> Render for TextRenderer<W> {
    fn render(&mut self, view: &LedgerView<'_>) -> io::Result<()> {
        if self.section == Section::Full {
            self.write_entries(view.entries)?;
            writeln!(self.out)?;
        }
        self.write_totals(&view.totals)?;
        self.out.flush()
    }
}

#[derive(Serialize)]
struct TotalsJson {
    #[serde(with = "amount_units")]
    balance: TotalCents,
    #[serde(with = "amount_units")]
    income: TotalCents,
    #[serde(with = "amount_units")]
    expense: TotalCents,
}

impl From<&Totals> for TotalsJson {
    fn from(totals: &Totals) -> Self {
        Self {
            balance: totals.balance,
            income: totals.income,
            expense: totals.expense_display(),
        }
    }
}

#[derive(Serialize)]
struct ViewJson<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    entries: Option<&'a [Entry]>,
    totals: TotalsJson,
}

/// Machine-readable renderer: one JSON document per render.
pub struct JsonRenderer<W: Write> {
    out: W,
    section: Section,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            section: Section::Full,
        }
    }

    pub fn with_section(mut self, section: Section) -> Self {
        self.section = section;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Render for JsonRenderer<W> {
    fn render(&mut self, view: &LedgerView<'_>) -> io::Result<()> {
        let doc = ViewJson {
            entries: (self.section == Section::Full).then_some(view.entries),
            totals: TotalsJson::from(&view.totals),
        };
        serde_json::to_writer_pretty(&mut self.out, &doc)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

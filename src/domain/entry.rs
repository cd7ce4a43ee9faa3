use serde::{Deserialize, Serialize};

use super::Cents;

pub type EntryId = i64;

/// Whether an entry (or a balance) reads as money in or money out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    /// Anything that is not strictly positive reads as an expense.
    pub fn of(amount_cents: Cents) -> Self {
        if amount_cents > 0 {
            EntryKind::Income
        } else {
            EntryKind::Expense
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Income => "income",
            EntryKind::Expense => "expense",
        }
    }

    /// One-character marker used in rendered lists.
    pub fn sign(&self) -> char {
        match self {
            EntryKind::Income => '+',
            EntryKind::Expense => '-',
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One line of the ledger.
///
/// The serialized shape is `{"id": number, "text": string, "amount": number}`,
/// with `amount` in whole currency units rather than cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    /// Human-readable label
    pub text: String,
    /// Signed amount: positive is income, negative is expense
    #[serde(rename = "amount", with = "crate::domain::amount_units")]
    pub amount_cents: Cents,
}

impl Entry {
    pub fn new(id: EntryId, text: impl Into<String>, amount_cents: Cents) -> Self {
        Self {
            id,
            text: text.into(),
            amount_cents,
        }
    }

    pub fn kind(&self) -> EntryKind {
        EntryKind::of(self.amount_cents)
    }

    pub fn is_income(&self) -> bool {
        self.amount_cents > 0
    }

    pub fn is_expense(&self) -> bool {
        self.amount_cents < 0
    }
}

use super::{Entry, EntryKind, TotalCents};

/// Summary figures derived from a set of entries.
///
/// Sums are wider than a single amount, so no ledger of `i64` amounts can
/// overflow them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    /// Sum of all amounts
    pub balance: TotalCents,
    /// Sum of positive amounts
    pub income: TotalCents,
    /// Sum of negative amounts (kept negative)
    pub expense: TotalCents,
}

impl Totals {
    /// Expense as a positive figure, the way it is shown to the user.
    pub fn expense_display(&self) -> TotalCents {
        self.expense.abs()
    }

    pub fn balance_kind(&self) -> EntryKind {
        if self.balance > 0 {
            EntryKind::Income
        } else {
            EntryKind::Expense
        }
    }
}

/// Compute balance, income and expense for the given entries.
pub fn totals(entries: &[Entry]) -> Totals {
    entries.iter().fold(Totals::default(), |mut acc, entry| {
        let amount = TotalCents::from(entry.amount_cents);
        acc.balance += amount;
        if entry.is_income() {
            acc.income += amount;
        } else if entry.is_expense() {
            acc.expense += amount;
        }
        acc
    })
}

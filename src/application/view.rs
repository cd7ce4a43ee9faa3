use std::io;

use crate::domain::{Entry, EntryId, Totals};

/// Everything a presentation needs to draw the ledger.
#[derive(Debug, Clone)]
pub struct LedgerView<'a> {
    pub entries: &'a [Entry],
    pub totals: Totals,
}

/// A request coming from the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Record a new entry. The amount is still raw user input.
    Add { text: String, amount: String },
    /// Delete the entry with this id.
    Delete(EntryId),
}

/// What happened as a result of an [`Intent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Added(Entry),
    Removed(Entry),
    /// Delete of an id that is not in the ledger; nothing changed.
    NotFound(EntryId),
}

impl Outcome {
    /// Whether the ledger changed and should be drawn again.
    pub fn changed(&self) -> bool {
        !matches!(self, Outcome::NotFound(_))
    }
}

/// Presentation hook. Implementations draw the entries and totals; each
/// entry's id is the handle the user passes back in [`Intent::Delete`].
pub trait Render {
    fn render(&mut self, view: &LedgerView<'_>) -> io::Result<()>;
}

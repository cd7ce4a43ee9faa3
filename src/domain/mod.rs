mod entry;
mod ledger;
mod money;
mod totals;

pub use entry::*;
pub use ledger::*;
pub use money::*;
pub use totals::*;

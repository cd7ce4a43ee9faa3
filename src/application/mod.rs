// Application layer: the ledger store and the contract presentations use
// to talk to it.

pub mod error;
mod service;
mod view;

pub use error::*;
pub use service::*;
pub use view::*;

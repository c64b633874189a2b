pub mod connection;
pub mod queries;
pub mod schema;

pub use connection::{Ledger, LedgerHandle};

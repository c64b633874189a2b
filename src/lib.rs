// Pedantic lint configuration for the crate.
// Most of these are reasonable but too strict for this codebase:
// - cast_possible_truncation: Ledger row counts fit comfortably in usize
// - cast_sign_loss: COUNT(*) is never negative
// - missing_errors_doc: Error handling is self-evident from Result types
// - missing_panics_doc: Panics are rare and documented inline
// - items_after_statements: Output structs are clearer near their usage
// - module_name_repetitions: Types like ConvertError read better in full
// - needless_pass_by_value: Sometimes clearer semantically
// - manual_let_else: match with early return is often clearer in context
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::items_after_statements,
    clippy::module_name_repetitions,
    clippy::needless_pass_by_value,
    clippy::manual_let_else
)]

pub mod cli;
pub mod config;
pub mod converter;
pub mod db;
pub mod driver;
pub mod error;
pub mod extract;
pub mod models;
pub mod operations;
pub mod pipeline;
pub mod report;

#[cfg(test)]
pub(crate) mod test_utils;

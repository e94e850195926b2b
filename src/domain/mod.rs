//! Domain module
//!
//! Core transfer types and the error-code taxonomy.

pub mod transfer;

pub use transfer::{codes, TransferCommand, TransferOutcome};

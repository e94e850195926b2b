//! banking_transfer Library
//!
//! Re-exports modules for integration testing and external use.

pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod idempotency;
pub mod ledger;
pub mod saga;

pub use config::Config;
pub use domain::{codes, TransferCommand, TransferOutcome};
pub use error::{AppError, AppResult};
pub use gateway::{HttpMovementGateway, MovementGateway, MovementRequest, MovementResult};
pub use ledger::{PgTransferLedger, TransferLedger, TransferRecord, TransferStatus};
pub use saga::TransferSaga;

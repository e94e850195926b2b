//! Transfer saga
//!
//! Validation and orchestration of the two-leg transfer with compensating
//! reversal.

mod orchestrator;
pub mod validator;


pub use orchestrator::TransferSaga;
pub use validator::{validate, ValidationFailure};

//! API module
//!
//! HTTP endpoints for the banking transfer service.

pub mod routes;


pub use routes::{create_router, AppState};

//! Database models for the AgroSat Monitor backend
//!
//! Re-exports models from the shared crate; row structs live beside their
//! services.

pub use shared::models::*;

//! HTTP handlers for the AgroSat Monitor API

pub mod alerts;
pub mod farms;
pub mod health;
pub mod readings;
pub mod tasks;
pub mod users;
pub mod weather;

pub use alerts::*;
pub use farms::*;
pub use health::*;
pub use readings::*;
pub use tasks::*;
pub use users::*;
pub use weather::*;

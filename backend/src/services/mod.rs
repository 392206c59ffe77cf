//! Business logic services for the AgroSat Monitor backend

pub mod alerts;
pub mod farms;
pub mod readings;
pub mod rules;
pub mod tasks;
pub mod users;

pub use alerts::{AlertEngine, AlertService};
pub use farms::FarmService;
pub use readings::ReadingService;
pub use tasks::TaskService;
pub use users::UserService;

//! Centsible Core - budget allocation, ledger aggregation, and monthly
//! reconciliation for the Centsible finance tracker.
//!
//! The crate owns the SQLite row store and the domain services around it.
//! It is UI-agnostic: direct user actions and advisor-originated commands
//! drive the same validated operations through the same contracts.

pub mod advisor;
pub mod budgets;
pub mod constants;
pub mod db;
pub mod errors;
pub mod goals;
pub mod ledger;
pub mod reconciliation;
pub mod schema;
pub mod session;
pub mod settings;

pub use errors::Error;
pub use errors::Result;
pub use session::SessionContext;

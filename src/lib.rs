// Pillbox — Library root
//
// Re-exports the store, application facade, configuration and CLI modules.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod store;

pub use app::{App, DEFAULT_TIMEOUT};
pub use error::{PillboxError, Result};

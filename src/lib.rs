pub mod cli;
pub mod config;
pub mod error;
pub mod keys;
pub mod report;
pub mod scanner;
pub mod ui;

pub use config::Config;
pub use error::{CatalogError, Result};

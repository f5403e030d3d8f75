pub mod checker;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod output;
pub mod scanner;

pub use checker::CompromisedDb;
pub use config::Config;
pub use engine::{ScanEngine, ScanOptions, ScanOutcome};
pub use model::{ScanReport, ScanStatus, ScannedPackage, Vulnerability};

//! Compromised-version matching.
//!
//! - `version` orders dotted versions
//! - `range` parses range strings and tests membership
//! - `database` holds the compromised name to range list

mod database;
mod range;
mod version;

pub use database::CompromisedDb;
pub use range::{is_compromised, VersionRange};
pub use version::{compare_versions, normalize};

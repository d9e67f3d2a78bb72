//! Configuration for Information Assistant.
//!
//! Settings live in `.infoassist/config.yaml` under a project directory.
//! Every section is optional; absent values take their defaults.

pub mod env;
pub mod loader;
pub mod types;

pub use env::*;
pub use loader::*;
pub use types::*;

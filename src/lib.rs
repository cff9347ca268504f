pub mod config;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod part;
pub mod strategy;
pub mod template;
pub mod ui;
pub mod version;
pub mod version_config;

pub use context::Context;
pub use error::{BumpSemverError, Result};
pub use part::VersionPart;
pub use strategy::BumpStrategy;
pub use version::Version;
pub use version_config::VersionConfig;

pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{JsonFileStore, MemoryStore};
pub use app::response::ResultBox;
pub use config::TomlConfig;
pub use crate::core::{engine::ShipmentEngine, ShipmentService, ShipmentStore};
pub use utils::error::{MergeError, Result, ShipmentError, SplitError};

// Adapters layer: concrete storage backends for the shipment tables.

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

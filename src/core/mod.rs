pub mod engine;
pub mod input;
pub mod merge;
pub mod records;
pub mod reweigh;
pub mod split;
pub mod tables;

pub use crate::domain::model::{
    Entity, Kilograms, MergedShipment, RootShipment, ShipmentId, StandardShipment,
};
pub use crate::domain::ports::{Repository, ShipmentService, ShipmentStore};
pub use crate::utils::error::Result;

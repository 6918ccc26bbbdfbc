// Domain layer: entity models and ports (interfaces).

pub mod model;
pub mod ports;

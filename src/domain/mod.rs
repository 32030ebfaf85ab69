// Domain layer: core models and ports (interfaces) to the shop services.

pub mod model;
pub mod ports;

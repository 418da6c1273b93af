// Domain layer: models, the program catalog and ports (interfaces).

pub mod model;
pub mod ports;
pub mod program;

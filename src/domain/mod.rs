// Domain layer: catalog entities and ports (interfaces) to the remote
// catalog service. No I/O here.

pub mod model;
pub mod ports;

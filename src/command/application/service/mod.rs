pub mod command_service;
pub mod invoke_service;
pub mod mutation_service;
pub mod projection_service;
pub mod resolve_service;

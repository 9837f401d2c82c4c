pub mod assets;
pub mod auth;
pub mod error;
pub mod memory;
pub mod telemetry;

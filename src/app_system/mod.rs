//! System configuration, startup, and shutdown logic.

pub mod cart_system;
pub mod config;
pub mod telemetry;

pub use cart_system::*;
pub use config::*;
pub use telemetry::*;

//! Gateway configuration
//!
//! gofer has no configuration file. Everything is a fixed constant:
//! - `defaults`: the constant values
//! - `gateway_config`: the structure that carries them through the process

pub mod defaults;
pub mod gateway_config;

pub use gateway_config::GatewayConfig;

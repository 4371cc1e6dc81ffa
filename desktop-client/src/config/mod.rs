mod client_config;
mod window_config;

pub use client_config::{get_config_store, ClientConfig};
pub use window_config::WindowConfig;

//! Application command handlers for micscope.
//!
//! # Commands
//! - `scope`: Live waveform and history display (default)
//! - `list_devices`: List available audio input devices
//! - `config`: Show the effective configuration or write the default file
//! - `logs`: Display recent log entries

pub mod config;
pub mod list_devices;
pub mod logs;
pub mod scope;

pub use config::handle_config;
pub use list_devices::handle_list_devices;
pub use logs::handle_logs;
pub use scope::handle_scope;

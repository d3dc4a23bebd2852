//! Command implementations.

pub mod chat;
pub mod config;
pub mod scan;

pub use self::chat::execute_chat;
pub use self::config::execute_config;
pub use self::scan::execute_scan;

pub mod commands;
pub mod handlers;
pub mod server;

pub use commands::{CLAP_STYLING, command_argument_builder};
pub use handlers::{load_config_from_matches, resolve_bind_addr};
pub use server::build_app;

// Re-export search functionality from wikihop-core
pub use wikihop_core::search::{SearchOptions, execute_search};

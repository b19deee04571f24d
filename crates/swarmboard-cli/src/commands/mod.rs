//! Command implementations.

pub mod run;
pub mod settings;

pub use self::run::{execute_run, run_swarm};
pub use self::settings::execute_config;

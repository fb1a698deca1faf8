pub mod config;
pub mod core;
pub mod error;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod report;
#[cfg(test)]
pub mod test_helpers;
pub mod trading;
pub mod watcher;

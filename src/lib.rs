// Crate root library declaration and module exports.
pub mod agent;
pub mod cli;
pub mod client;
pub mod config;
pub mod context;
pub mod contract;
pub mod history;
pub mod model;
pub mod store;

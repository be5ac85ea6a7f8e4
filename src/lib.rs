pub mod cli;
pub mod command;
pub mod config;
pub mod executor;
pub mod toolkit;

pub mod adapters;
pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod views;

#[cfg(test)]
mod test_support;

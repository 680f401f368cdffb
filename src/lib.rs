// ABOUTME: Library root for berth - container and network provisioning on one host.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod output;
pub mod provision;
pub mod runtime;
pub mod types;

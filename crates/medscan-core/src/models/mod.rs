//! Data models and configuration.

pub mod config;
pub mod medication;

//! db-relay - A natural-language to SQL gateway with per-statement permission control.
//!
//! This library exposes the core modules for use in integration tests.

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod llm;
pub mod logging;
pub mod permissions;
pub mod pipeline;
pub mod safety;
pub mod service;

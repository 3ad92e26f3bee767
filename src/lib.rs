//! Statusctl — status-change log reporting and retention library.
//!
//! This library exposes the core components of statusctl for integration
//! testing and programmatic use. The binary entrypoint is in `main.rs`.

// Many items are pub for use by integration tests, which are separate
// compilation units; suppress false dead_code warnings.
#![allow(dead_code)]

pub mod cli;
pub mod config;
pub mod feed;
pub mod mock;
pub mod record;
pub mod report;
pub mod retention;
pub mod store;

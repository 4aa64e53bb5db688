//! artifactl: declarative configuration applier and CLI for the Artifactory
//! REST API.
//!
//! The crate is a thin binary over a library so that the reconciliation
//! engine, resolution layer, and document model are testable without a
//! terminal or a live server.

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod resolve;
pub mod ui;

pub use error::{Error, Result};

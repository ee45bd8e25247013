//! `skinwise-wizard` library crate.
//!
//! Holds the wizard controller, its configuration and the terminal front
//! end. The binary entrypoint lives in `main.rs`.

pub mod config;
pub mod controller;
pub mod terminal;

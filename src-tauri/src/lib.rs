//! Lightning Timer library
//!
//! This library exposes the countdown core and services for testing
//! and potential future library use.

pub mod app;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod services;

//! dockdash: a dashboard for the local Docker engine.
//!
//! This library exposes the core modules for use by the binary and by tests.

pub mod model;
pub mod view;
pub mod layout;
pub mod error;
pub mod config;
pub mod stats;
pub mod validate;
pub mod docker;
pub mod compose;
pub mod docker_controller;
pub mod server;
pub mod app;

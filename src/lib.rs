//! Touchgrass is a focus tracking companion. A background daemon watches the active window,
//! scores the user's focus, drives a small on-screen pet through a shared character state
//! file, and serves the productivity dashboard's state over a local HTTP API.
//!

pub mod cli;
pub mod daemon;
pub mod server;
pub mod state;
pub mod utils;
pub mod window_api;

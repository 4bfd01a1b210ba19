//! Shared fixtures: config builder, mock backend, test server
//!
//! Each test binary uses a different subset of these.

#![allow(dead_code)]

pub mod config;
pub mod mock_gemini;
pub mod server;

//! Core components, types, and utilities for autoreply.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - Common types, error kinds, and result handling.

pub mod config;
pub mod types;

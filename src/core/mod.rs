//! Core application modules
//!
//! This module contains configuration, constants, logging, the provider
//! abstraction and the request runner.

pub mod config;
pub mod constants;
pub mod logging;
pub mod provider;
pub mod providers;
pub mod runner;

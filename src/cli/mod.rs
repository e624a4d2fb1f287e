//! CLI command handlers
//!
//! This module contains all the command handlers for the appraise CLI.
//! Each command group lives in its own module and exposes a `handle`
//! function; every session-bound command enters its page route through the
//! authentication guard first.

pub mod appraisals;
pub mod auth;
pub mod config;
pub mod cycles;
pub mod dashboard;
pub mod helpers;
pub mod projects;

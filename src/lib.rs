//! pr-timer - a countdown that watches a GitHub pull request
//!
//! The timer runs for a fixed duration. When the target link is a pull
//! request, it polls the PR's merge state and CI checks and stops early on a
//! terminal condition (merged, failed check, or checks passed for
//! repositories that allow it).

pub mod auth;
pub mod config;
pub mod error;
pub mod link;
pub mod platform;
pub mod policy;
pub mod types;
pub mod wait;

//! jobctl Core
//!
//! Core types for the jobctl CI job launcher.
//!
//! This crate contains:
//! - Job specifications: the validated description of a freestyle job,
//!   loaded from a YAML configuration file
//! - Build status: the mapping from the server-reported status string to a
//!   typed value

pub mod spec;
pub mod status;

pub use spec::{ConfigError, JobSpec, ScmConfig, ScmProvider};
pub use status::BuildStatus;

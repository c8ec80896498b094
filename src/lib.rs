//! Assessment service for writing applicants.
//!
//! The library exposes the assessment workflow (rubric scoring, plagiarism
//! check, authorship verification) behind a storage-agnostic service facade,
//! plus the configuration, telemetry, and HTTP plumbing used by the binary.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;

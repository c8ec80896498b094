//! Writing-applicant assessment workflow.
//!
//! Covers the full lifecycle of a writing applicant: profile intake, baseline
//! sample collection, the timed assessment itself, and the three-way analysis
//! (rubric scoring, plagiarism check, authorship verification) that feeds the
//! final review decision. External analysis capabilities sit behind the traits
//! in [`services`]; persistence sits behind [`repository::ProfileStore`].

pub mod client;
pub mod domain;
pub mod pipeline;
pub mod proctor;
pub mod repository;
pub mod router;
pub mod rubric;
pub mod service;
pub mod services;
pub(crate) mod stages;

#[cfg(test)]
mod tests;

pub use client::HttpAnalysisClient;
pub use domain::{
    ApplicationStatus, AssessmentRecord, AssessmentResult, PlagiarismResult, PlagiarismSource,
    ProfileEvent, RubricScore, SampleKind, StatusTransitionError, StyleMetrics, WriterId,
    WriterProfile, WritingSample, WritingTrack,
};
pub use pipeline::{AssessmentError, AssessmentPipeline};
pub use proctor::{ProctorSession, TelemetrySnapshot};
pub use repository::{ProfileStore, StoreError};
pub use router::assessment_router;
pub use rubric::{default_rubric, total_points, RubricCriterion, RubricValidationError};
pub use service::{ApplicantService, ApplicantServiceError, NewApplicant, ReviewDecision};
pub use services::{
    AnalysisServiceError, LanguageAnalysisService, SearchAnalysisService,
};

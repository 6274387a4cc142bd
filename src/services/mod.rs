// src/services/mod.rs

pub mod grading;
pub mod projection;
pub mod submission;

pub use submission::SubmissionCoordinator;

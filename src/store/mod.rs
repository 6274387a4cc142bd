// src/store/mod.rs

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{
        question::{AnswerOption, Question, QuestionType},
        quiz::Quiz,
        submission::{NewSubmission, Submission},
    },
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Read-only access to quizzes and their question/option snapshots.
#[async_trait]
pub trait QuizCatalog: Send + Sync {
    async fn get_quiz(&self, quiz_id: i64) -> Result<Option<Quiz>, AppError>;

    /// Questions of a quiz ordered by `question_order`, each with its ordered options.
    async fn questions_ordered(&self, quiz_id: i64) -> Result<Vec<Question>, AppError>;
}

/// Persistence of graded submissions.
/// Submissions are written once and never updated.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Persists the submission and all of its answers atomically,
    /// assigning ids and timestamps.
    async fn save(&self, submission: NewSubmission) -> Result<Submission, AppError>;

    /// Loads a submission with its answers bound to their questions.
    async fn find_by_id(&self, submission_id: i64) -> Result<Option<Submission>, AppError>;
}

/// Catalog management used by the operator endpoints.
///
/// Methods addressing a child through its parent return `None`/`false` when
/// the child does not exist or belongs to a different parent.
#[async_trait]
pub trait CatalogAdmin: Send + Sync {
    async fn list_quizzes(&self) -> Result<Vec<Quiz>, AppError>;

    async fn create_quiz(&self, title: &str, description: Option<&str>) -> Result<Quiz, AppError>;

    async fn update_quiz(
        &self,
        quiz_id: i64,
        title: &str,
        description: Option<&str>,
    ) -> Result<Option<Quiz>, AppError>;

    /// Deletes the quiz with its questions, options and submissions.
    async fn delete_quiz(&self, quiz_id: i64) -> Result<bool, AppError>;

    /// Appends a question after the quiz's current last question.
    async fn add_question(
        &self,
        quiz_id: i64,
        question_type: &QuestionType,
        question_text: &str,
    ) -> Result<Option<Question>, AppError>;

    async fn update_question(
        &self,
        quiz_id: i64,
        question_id: i64,
        question_text: &str,
    ) -> Result<Option<Question>, AppError>;

    async fn delete_question(&self, quiz_id: i64, question_id: i64) -> Result<bool, AppError>;

    async fn add_option(
        &self,
        question_id: i64,
        option_text: &str,
        is_correct: bool,
        option_order: i32,
    ) -> Result<Option<AnswerOption>, AppError>;

    async fn update_option(
        &self,
        question_id: i64,
        option_id: i64,
        option_text: &str,
        is_correct: bool,
    ) -> Result<Option<AnswerOption>, AppError>;

    async fn delete_option(&self, question_id: i64, option_id: i64) -> Result<bool, AppError>;
}

/// Everything the HTTP layer needs from a backend.
pub trait Store: QuizCatalog + SubmissionStore + CatalogAdmin {}

impl<T> Store for T where T: QuizCatalog + SubmissionStore + CatalogAdmin {}

pub type DynStore = Arc<dyn Store>;

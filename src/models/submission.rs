// src/models/submission.rs

use serde::{Deserialize, Serialize};

use crate::models::question::Question;

/// DTO for submitting a quiz attempt.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub quiz_id: i64,
    #[serde(default)]
    pub answers: Vec<AnswerInput>,
}

/// One raw answer from the taker.
/// For MCQ/TRUE_FALSE this is the selected option id, for TEXT the typed answer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerInput {
    pub question_id: i64,
    #[serde(default)]
    pub user_answer: Option<String>,
}

/// Outcome of grading a single question.
#[derive(Debug, Clone, PartialEq)]
pub struct GradedAnswer {
    pub question_id: i64,
    pub user_answer: String,
    pub is_correct: bool,
}

/// A graded answer ready to be persisted, bound to the question snapshot it was graded against.
#[derive(Debug, Clone)]
pub struct NewAnswer {
    pub question: Question,
    pub user_answer: String,
    pub is_correct: bool,
}

/// A graded submission that has not been assigned an id or timestamp yet.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub quiz_id: i64,
    pub score: i32,
    pub total_questions: i32,
    pub answers: Vec<NewAnswer>,
}

/// Persisted answer. Lives and dies with its `Submission`.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub id: i64,
    pub question: Question,
    pub user_answer: String,
    pub is_correct: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Immutable record of one grading pass over a quiz.
/// `total_questions` is frozen at submission time.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub id: i64,
    pub quiz_id: i64,
    pub score: i32,
    pub total_questions: i32,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub answers: Vec<Answer>,
}

/// Result view returned by both submit and result lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub submission_id: i64,
    pub quiz_id: i64,
    pub score: i32,
    pub total_questions: i32,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub answers: Vec<AnswerResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResult {
    pub question_id: i64,
    pub question_text: String,
    pub question_type: String,
    pub user_answer: String,
    pub is_correct: bool,
    /// Display text of the correct option, or "N/A".
    pub correct_answer: String,
}

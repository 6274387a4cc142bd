// src/services/submission.rs

use crate::{
    error::AppError,
    models::submission::{NewAnswer, NewSubmission, SubmissionResponse, SubmitRequest},
    services::{grading, projection},
    store::{QuizCatalog, SubmissionStore},
};

/// Runs a submission through catalog lookup, grading, persistence and projection.
///
/// Holds no state of its own; every call works on a fresh snapshot of the quiz.
pub struct SubmissionCoordinator<'a, C: ?Sized, S: ?Sized> {
    catalog: &'a C,
    store: &'a S,
}

impl<'a, C, S> SubmissionCoordinator<'a, C, S>
where
    C: QuizCatalog + ?Sized,
    S: SubmissionStore + ?Sized,
{
    pub fn new(catalog: &'a C, store: &'a S) -> Self {
        Self { catalog, store }
    }

    /// Grades and persists a new submission, returning its result view.
    pub async fn submit(&self, req: SubmitRequest) -> Result<SubmissionResponse, AppError> {
        let quiz = self
            .catalog
            .get_quiz(req.quiz_id)
            .await?
            .ok_or(AppError::QuizNotFound(req.quiz_id))?;

        let questions = self.catalog.questions_ordered(quiz.id).await?;
        let total_questions = questions.len() as i32;

        let outcome = grading::grade(&questions, &grading::answer_map(&req.answers));

        let answers = questions
            .into_iter()
            .zip(outcome.answers)
            .map(|(question, graded)| NewAnswer {
                question,
                user_answer: graded.user_answer,
                is_correct: graded.is_correct,
            })
            .collect();

        let submission = self
            .store
            .save(NewSubmission {
                quiz_id: quiz.id,
                score: outcome.score,
                total_questions,
                answers,
            })
            .await?;

        tracing::info!(
            "Graded submission {} for quiz {}: {}/{}",
            submission.id,
            quiz.id,
            submission.score,
            submission.total_questions
        );

        Ok(projection::project(&submission))
    }

    /// Re-reads a persisted submission. Nothing is re-graded.
    pub async fn results(&self, submission_id: i64) -> Result<SubmissionResponse, AppError> {
        let submission = self
            .store
            .find_by_id(submission_id)
            .await?
            .ok_or(AppError::SubmissionNotFound(submission_id))?;

        Ok(projection::project(&submission))
    }
}

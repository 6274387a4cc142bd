// src/store/postgres.rs

use std::borrow::Cow;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::{
    error::AppError,
    models::{
        question::{AnswerOption, Question, QuestionType},
        quiz::Quiz,
        submission::{Answer, NewSubmission, Submission},
    },
    store::{CatalogAdmin, QuizCatalog, SubmissionStore},
};

const QUESTION_COLUMNS: &str =
    "id, quiz_id, question_type, question_text, question_order, created_at";
const OPTION_COLUMNS: &str = "id, question_id, option_text, is_correct, option_order";

/// PostgreSQL TEXT cannot hold NUL bytes; they are dropped from taker answers before storage.
fn strip_nul(value: &str) -> Cow<'_, str> {
    if value.contains('\0') {
        Cow::Owned(value.replace('\0', ""))
    } else {
        Cow::Borrowed(value)
    }
}

/// PostgreSQL-backed store. Schema lives in `migrations/`.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

/// Row of the 'questions' table; `question_type` is kept as raw text.
#[derive(FromRow)]
struct QuestionRow {
    id: i64,
    quiz_id: i64,
    question_type: String,
    question_text: String,
    question_order: i32,
    created_at: DateTime<Utc>,
}

impl QuestionRow {
    fn into_question(self, options: Vec<AnswerOption>) -> Question {
        Question {
            id: self.id,
            quiz_id: self.quiz_id,
            question_type: QuestionType::from(self.question_type),
            question_text: self.question_text,
            question_order: self.question_order,
            created_at: self.created_at,
            options,
        }
    }
}

#[derive(FromRow)]
struct SubmissionRow {
    id: i64,
    quiz_id: i64,
    score: i32,
    total_questions: i32,
    submitted_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct AnswerRow {
    id: i64,
    question_id: i64,
    user_answer: String,
    is_correct: bool,
    created_at: DateTime<Utc>,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Loads the options of the given question rows and binds them,
    /// keeping the rows' order.
    async fn attach_options(&self, rows: Vec<QuestionRow>) -> Result<Vec<Question>, AppError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let options = sqlx::query_as::<_, AnswerOption>(&format!(
            "SELECT {} FROM options WHERE question_id = ANY($1) ORDER BY option_order, id",
            OPTION_COLUMNS
        ))
        .bind(ids.as_slice())
        .fetch_all(&self.pool)
        .await?;

        let mut by_question: HashMap<i64, Vec<AnswerOption>> = HashMap::new();
        for option in options {
            by_question.entry(option.question_id).or_default().push(option);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let options = by_question.remove(&row.id).unwrap_or_default();
                row.into_question(options)
            })
            .collect())
    }
}

#[async_trait]
impl QuizCatalog for PgStore {
    async fn get_quiz(&self, quiz_id: i64) -> Result<Option<Quiz>, AppError> {
        let quiz = sqlx::query_as::<_, Quiz>(
            "SELECT id, title, description, created_at FROM quizzes WHERE id = $1",
        )
        .bind(quiz_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(quiz)
    }

    async fn questions_ordered(&self, quiz_id: i64) -> Result<Vec<Question>, AppError> {
        let rows = sqlx::query_as::<_, QuestionRow>(&format!(
            "SELECT {} FROM questions WHERE quiz_id = $1 ORDER BY question_order, id",
            QUESTION_COLUMNS
        ))
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch questions for quiz {}: {:?}", quiz_id, e);
            AppError::from(e)
        })?;

        self.attach_options(rows).await
    }
}

#[async_trait]
impl SubmissionStore for PgStore {
    async fn save(&self, submission: NewSubmission) -> Result<Submission, AppError> {
        // Submission and answers become visible together or not at all.
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, SubmissionRow>(
            r#"
            INSERT INTO submissions (quiz_id, score, total_questions)
            VALUES ($1, $2, $3)
            RETURNING id, quiz_id, score, total_questions, submitted_at
            "#,
        )
        .bind(submission.quiz_id)
        .bind(submission.score)
        .bind(submission.total_questions)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert submission: {:?}", e);
            AppError::from(e)
        })?;

        let mut answers = Vec::with_capacity(submission.answers.len());
        for (position, new_answer) in submission.answers.into_iter().enumerate() {
            let answer_row = sqlx::query_as::<_, AnswerRow>(
                r#"
                INSERT INTO answers (submission_id, question_id, position, user_answer, is_correct)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, question_id, user_answer, is_correct, created_at
                "#,
            )
            .bind(row.id)
            .bind(new_answer.question.id)
            .bind(position as i32)
            .bind(strip_nul(&new_answer.user_answer).as_ref())
            .bind(new_answer.is_correct)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert answer: {:?}", e);
                AppError::from(e)
            })?;

            answers.push(Answer {
                id: answer_row.id,
                question: new_answer.question,
                user_answer: answer_row.user_answer,
                is_correct: answer_row.is_correct,
                created_at: answer_row.created_at,
            });
        }

        tx.commit().await?;

        Ok(Submission {
            id: row.id,
            quiz_id: row.quiz_id,
            score: row.score,
            total_questions: row.total_questions,
            submitted_at: row.submitted_at,
            answers,
        })
    }

    async fn find_by_id(&self, submission_id: i64) -> Result<Option<Submission>, AppError> {
        let Some(row) = sqlx::query_as::<_, SubmissionRow>(
            "SELECT id, quiz_id, score, total_questions, submitted_at FROM submissions WHERE id = $1",
        )
        .bind(submission_id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let answer_rows = sqlx::query_as::<_, AnswerRow>(
            r#"
            SELECT id, question_id, user_answer, is_correct, created_at
            FROM answers
            WHERE submission_id = $1
            ORDER BY position
            "#,
        )
        .bind(submission_id)
        .fetch_all(&self.pool)
        .await?;

        let question_ids: Vec<i64> = answer_rows.iter().map(|a| a.question_id).collect();
        let question_rows = sqlx::query_as::<_, QuestionRow>(&format!(
            "SELECT {} FROM questions WHERE id = ANY($1)",
            QUESTION_COLUMNS
        ))
        .bind(question_ids.as_slice())
        .fetch_all(&self.pool)
        .await?;

        let questions: HashMap<i64, Question> = self
            .attach_options(question_rows)
            .await?
            .into_iter()
            .map(|question| (question.id, question))
            .collect();

        let answers = answer_rows
            .into_iter()
            .filter_map(|answer| {
                questions.get(&answer.question_id).map(|question| Answer {
                    id: answer.id,
                    question: question.clone(),
                    user_answer: answer.user_answer,
                    is_correct: answer.is_correct,
                    created_at: answer.created_at,
                })
            })
            .collect();

        Ok(Some(Submission {
            id: row.id,
            quiz_id: row.quiz_id,
            score: row.score,
            total_questions: row.total_questions,
            submitted_at: row.submitted_at,
            answers,
        }))
    }
}

#[async_trait]
impl CatalogAdmin for PgStore {
    async fn list_quizzes(&self) -> Result<Vec<Quiz>, AppError> {
        let quizzes = sqlx::query_as::<_, Quiz>(
            "SELECT id, title, description, created_at FROM quizzes ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(quizzes)
    }

    async fn create_quiz(&self, title: &str, description: Option<&str>) -> Result<Quiz, AppError> {
        let quiz = sqlx::query_as::<_, Quiz>(
            r#"
            INSERT INTO quizzes (title, description)
            VALUES ($1, $2)
            RETURNING id, title, description, created_at
            "#,
        )
        .bind(title)
        .bind(description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create quiz: {:?}", e);
            AppError::from(e)
        })?;

        Ok(quiz)
    }

    async fn update_quiz(
        &self,
        quiz_id: i64,
        title: &str,
        description: Option<&str>,
    ) -> Result<Option<Quiz>, AppError> {
        let quiz = sqlx::query_as::<_, Quiz>(
            r#"
            UPDATE quizzes SET title = $1, description = $2
            WHERE id = $3
            RETURNING id, title, description, created_at
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(quiz_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(quiz)
    }

    async fn delete_quiz(&self, quiz_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM quizzes WHERE id = $1")
            .bind(quiz_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete quiz: {:?}", e);
                AppError::from(e)
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_question(
        &self,
        quiz_id: i64,
        question_type: &QuestionType,
        question_text: &str,
    ) -> Result<Option<Question>, AppError> {
        let row = sqlx::query_as::<_, QuestionRow>(&format!(
            r#"
            INSERT INTO questions (quiz_id, question_type, question_text, question_order)
            SELECT z.id, $2, $3,
                   COALESCE((SELECT MAX(question_order) FROM questions WHERE quiz_id = z.id), 0) + 1
            FROM quizzes z
            WHERE z.id = $1
            RETURNING {}
            "#,
            QUESTION_COLUMNS
        ))
        .bind(quiz_id)
        .bind(question_type.as_str())
        .bind(question_text)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to add question: {:?}", e);
            AppError::from(e)
        })?;

        Ok(row.map(|row| row.into_question(Vec::new())))
    }

    async fn update_question(
        &self,
        quiz_id: i64,
        question_id: i64,
        question_text: &str,
    ) -> Result<Option<Question>, AppError> {
        let Some(row) = sqlx::query_as::<_, QuestionRow>(&format!(
            "UPDATE questions SET question_text = $1 WHERE id = $2 AND quiz_id = $3 RETURNING {}",
            QUESTION_COLUMNS
        ))
        .bind(question_text)
        .bind(question_id)
        .bind(quiz_id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        Ok(self.attach_options(vec![row]).await?.into_iter().next())
    }

    async fn delete_question(&self, quiz_id: i64, question_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1 AND quiz_id = $2")
            .bind(question_id)
            .bind(quiz_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_option(
        &self,
        question_id: i64,
        option_text: &str,
        is_correct: bool,
        option_order: i32,
    ) -> Result<Option<AnswerOption>, AppError> {
        let option = sqlx::query_as::<_, AnswerOption>(&format!(
            r#"
            INSERT INTO options (question_id, option_text, is_correct, option_order)
            SELECT id, $2, $3, $4 FROM questions WHERE id = $1
            RETURNING {}
            "#,
            OPTION_COLUMNS
        ))
        .bind(question_id)
        .bind(option_text)
        .bind(is_correct)
        .bind(option_order)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to add option: {:?}", e);
            AppError::from(e)
        })?;

        Ok(option)
    }

    async fn update_option(
        &self,
        question_id: i64,
        option_id: i64,
        option_text: &str,
        is_correct: bool,
    ) -> Result<Option<AnswerOption>, AppError> {
        let option = sqlx::query_as::<_, AnswerOption>(&format!(
            r#"
            UPDATE options SET option_text = $1, is_correct = $2
            WHERE id = $3 AND question_id = $4
            RETURNING {}
            "#,
            OPTION_COLUMNS
        ))
        .bind(option_text)
        .bind(is_correct)
        .bind(option_id)
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(option)
    }

    async fn delete_option(&self, question_id: i64, option_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM options WHERE id = $1 AND question_id = $2")
            .bind(option_id)
            .bind(question_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// src/handlers/question.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::question::{CreateQuestionRequest, QuestionType, UpdateQuestionRequest},
    store::{CatalogAdmin, DynStore},
};

/// Appends a question to a quiz.
/// The question is placed after the quiz's current last question.
pub async fn add_question(
    State(store): State<DynStore>,
    Path(quiz_id): Path<i64>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let question_type = QuestionType::parse_known(&payload.question_type).ok_or_else(|| {
        AppError::BadRequest(format!(
            "Unknown question type '{}'. Expected MCQ, TRUE_FALSE or TEXT.",
            payload.question_type
        ))
    })?;

    let question = store
        .add_question(quiz_id, &question_type, &payload.question_text)
        .await?
        .ok_or(AppError::QuizNotFound(quiz_id))?;

    Ok((StatusCode::CREATED, Json(question)))
}

pub async fn update_question(
    State(store): State<DynStore>,
    Path((quiz_id, question_id)): Path<(i64, i64)>,
    Json(payload): Json<UpdateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let question = store
        .update_question(quiz_id, question_id, &payload.question_text)
        .await?
        .ok_or_else(|| question_not_found(question_id))?;

    Ok(Json(question))
}

/// Deletes a question and its options.
/// Stored answers to it disappear from past results; their scores stay as graded.
pub async fn delete_question(
    State(store): State<DynStore>,
    Path((quiz_id, question_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    if !store.delete_question(quiz_id, question_id).await? {
        return Err(question_not_found(question_id));
    }

    Ok(StatusCode::NO_CONTENT)
}

fn question_not_found(question_id: i64) -> AppError {
    AppError::NotFound(format!("Question not found with id: {}", question_id))
}

// src/handlers/quiz.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        question::PublicQuestion,
        quiz::{QuizDetail, QuizPaper, QuizRequest},
    },
    store::{CatalogAdmin, DynStore, QuizCatalog},
};

/// Lists all quizzes (without questions).
pub async fn list_quizzes(State(store): State<DynStore>) -> Result<impl IntoResponse, AppError> {
    let quizzes = store.list_quizzes().await?;
    Ok(Json(quizzes))
}

/// Creates a new quiz.
pub async fn create_quiz(
    State(store): State<DynStore>,
    Json(payload): Json<QuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let quiz = store
        .create_quiz(&payload.title, payload.description.as_deref())
        .await?;
    tracing::info!("Created quiz {} ({})", quiz.id, quiz.title);

    Ok((StatusCode::CREATED, Json(quiz)))
}

/// Retrieves a quiz with its ordered questions and options, correctness flags included.
pub async fn get_quiz(
    State(store): State<DynStore>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = store.get_quiz(id).await?.ok_or(AppError::QuizNotFound(id))?;
    let questions = store.questions_ordered(id).await?;

    Ok(Json(QuizDetail { quiz, questions }))
}

/// Retrieves a quiz for a taker.
/// Same shape as `get_quiz` but options carry no correctness flag.
pub async fn get_quiz_paper(
    State(store): State<DynStore>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = store.get_quiz(id).await?.ok_or(AppError::QuizNotFound(id))?;
    let questions = store
        .questions_ordered(id)
        .await?
        .into_iter()
        .map(PublicQuestion::from)
        .collect();

    Ok(Json(QuizPaper { quiz, questions }))
}

/// Updates a quiz's title and description.
pub async fn update_quiz(
    State(store): State<DynStore>,
    Path(id): Path<i64>,
    Json(payload): Json<QuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let quiz = store
        .update_quiz(id, &payload.title, payload.description.as_deref())
        .await?
        .ok_or(AppError::QuizNotFound(id))?;

    Ok(Json(quiz))
}

/// Deletes a quiz together with its questions, options and submissions.
pub async fn delete_quiz(
    State(store): State<DynStore>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !store.delete_quiz(id).await? {
        return Err(AppError::QuizNotFound(id));
    }
    tracing::info!("Deleted quiz {}", id);

    Ok(StatusCode::NO_CONTENT)
}

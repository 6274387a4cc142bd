// src/handlers/submission.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::AppError, models::submission::SubmitRequest, services::SubmissionCoordinator,
    store::DynStore,
};

/// Submits a taker's answers for grading.
///
/// Every question of the quiz is graded, answered or not.
/// Returns 201 Created with the graded result including the correct answers.
pub async fn submit_quiz(
    State(store): State<DynStore>,
    Json(req): Json<SubmitRequest>,
) -> Result<impl IntoResponse, AppError> {
    let coordinator = SubmissionCoordinator::new(&*store, &*store);
    let result = coordinator.submit(req).await?;

    Ok((StatusCode::CREATED, Json(result)))
}

/// Retrieves the stored result of a previous submission.
pub async fn get_submission_results(
    State(store): State<DynStore>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let coordinator = SubmissionCoordinator::new(&*store, &*store);
    let result = coordinator.results(id).await?;

    Ok(Json(result))
}

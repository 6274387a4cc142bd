// src/handlers/option.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::question::{CreateOptionRequest, UpdateOptionRequest},
    store::{CatalogAdmin, DynStore},
};

/// Adds an option to a question.
/// For TEXT questions the option flagged correct holds the expected answer.
pub async fn add_option(
    State(store): State<DynStore>,
    Path(question_id): Path<i64>,
    Json(payload): Json<CreateOptionRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let option = store
        .add_option(
            question_id,
            &payload.option_text,
            payload.is_correct,
            payload.option_order,
        )
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Question not found with id: {}", question_id))
        })?;

    Ok((StatusCode::CREATED, Json(option)))
}

pub async fn update_option(
    State(store): State<DynStore>,
    Path((question_id, option_id)): Path<(i64, i64)>,
    Json(payload): Json<UpdateOptionRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let option = store
        .update_option(
            question_id,
            option_id,
            &payload.option_text,
            payload.is_correct,
        )
        .await?
        .ok_or_else(|| option_not_found(option_id))?;

    Ok(Json(option))
}

pub async fn delete_option(
    State(store): State<DynStore>,
    Path((question_id, option_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    if !store.delete_option(question_id, option_id).await? {
        return Err(option_not_found(option_id));
    }

    Ok(StatusCode::NO_CONTENT)
}

fn option_not_found(option_id: i64) -> AppError {
    AppError::NotFound(format!("Option not found with id: {}", option_id))
}

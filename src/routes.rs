// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post, put},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{option, question, quiz, submission},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (quizzes, questions, options, submissions).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (store and config).
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    let quiz_routes = Router::new()
        .route("/", get(quiz::list_quizzes).post(quiz::create_quiz))
        .route(
            "/{id}",
            get(quiz::get_quiz)
                .put(quiz::update_quiz)
                .delete(quiz::delete_quiz),
        )
        .route("/{id}/paper", get(quiz::get_quiz_paper))
        .route("/{id}/questions", post(question::add_question))
        .route(
            "/{id}/questions/{question_id}",
            put(question::update_question).delete(question::delete_question),
        );

    let option_routes = Router::new()
        .route("/{question_id}/options", post(option::add_option))
        .route(
            "/{question_id}/options/{option_id}",
            put(option::update_option).delete(option::delete_option),
        );

    let submission_routes = Router::new()
        .route("/", post(submission::submit_quiz))
        .route("/{id}", get(submission::get_submission_results));

    Router::new()
        .nest("/api/quizzes", quiz_routes)
        .nest("/api/questions", option_routes)
        .nest("/api/submissions", submission_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

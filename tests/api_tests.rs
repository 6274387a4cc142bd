// tests/api_tests.rs

use std::sync::Arc;

use quiz_backend::{config::Config, routes, state::AppState, store::MemoryStore};
use serde_json::{Value, json};

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
async fn spawn_app() -> String {
    // 1. Create test configuration and state backed by the in-memory store
    let config = Config {
        database_url: None,
        rust_log: "error".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        log_dir: "logs".to_string(),
    };

    let state = AppState {
        store: Arc::new(MemoryStore::new()),
        config,
    };

    // 2. Create the router with the app state
    let app = routes::create_router(state);

    // 3. Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    // 4. Spawn the server in the background
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

async fn post_json(client: &reqwest::Client, url: String, body: Value) -> Value {
    let response = client
        .post(url)
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 201);
    response.json().await.expect("Failed to parse json")
}

/// Seeds the three-question quiz used by the grading scenarios.
/// Returns (quiz_id, [question ids], [correct option ids]).
async fn seed_quiz(client: &reqwest::Client, address: &str) -> (i64, Vec<i64>, Vec<i64>) {
    let quiz = post_json(
        client,
        format!("{}/api/quizzes", address),
        json!({"title": "General knowledge", "description": "Warm-up"}),
    )
    .await;
    let quiz_id = quiz["id"].as_i64().unwrap();

    let mut question_ids = Vec::new();
    let mut correct_ids = Vec::new();

    let layout: [(&str, &str, &[(&str, bool)]); 3] = [
        ("MCQ", "Capital of France?", &[("Paris", true), ("Lyon", false)]),
        ("TRUE_FALSE", "The sky is green.", &[("True", false), ("False", true)]),
        ("TEXT", "6 x 7?", &[("42", true)]),
    ];

    for (kind, text, options) in layout {
        let question = post_json(
            client,
            format!("{}/api/quizzes/{}/questions", address, quiz_id),
            json!({"type": kind, "questionText": text}),
        )
        .await;
        let question_id = question["id"].as_i64().unwrap();
        question_ids.push(question_id);

        for (order, (option_text, is_correct)) in options.iter().enumerate() {
            let option = post_json(
                client,
                format!("{}/api/questions/{}/options", address, question_id),
                json!({"optionText": option_text, "isCorrect": is_correct, "optionOrder": order}),
            )
            .await;
            if *is_correct {
                correct_ids.push(option["id"].as_i64().unwrap());
            }
        }
    }

    (quiz_id, question_ids, correct_ids)
}

#[tokio::test]
async fn health_check_404() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(&format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn submit_grades_quiz_end_to_end() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let (quiz_id, q, correct) = seed_quiz(&client, &address).await;

    // Act: right MCQ, wrong TRUE_FALSE, right TEXT
    let result = post_json(
        &client,
        format!("{}/api/submissions", address),
        json!({
            "quizId": quiz_id,
            "answers": [
                {"questionId": q[0], "userAnswer": correct[0].to_string()},
                {"questionId": q[1], "userAnswer": "99"},
                {"questionId": q[2], "userAnswer": "42"}
            ]
        }),
    )
    .await;

    // Assert
    assert_eq!(result["quizId"], quiz_id);
    assert_eq!(result["score"], 2);
    assert_eq!(result["totalQuestions"], 3);
    assert!(result["submissionId"].as_i64().is_some());
    assert!(result["submittedAt"].as_str().is_some());

    let answers = result["answers"].as_array().unwrap();
    assert_eq!(answers.len(), 3);
    assert_eq!(answers[0]["questionType"], "MCQ");
    assert_eq!(answers[0]["isCorrect"], true);
    assert_eq!(answers[0]["correctAnswer"], "Paris");
    assert_eq!(answers[1]["questionId"], q[1]);
    assert_eq!(answers[1]["isCorrect"], false);
    assert_eq!(answers[1]["userAnswer"], "99");
    assert_eq!(answers[1]["correctAnswer"], "False");
    assert_eq!(answers[2]["questionText"], "6 x 7?");
    assert_eq!(answers[2]["isCorrect"], true);
}

#[tokio::test]
async fn fetch_results_returns_same_view() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let (quiz_id, q, _) = seed_quiz(&client, &address).await;

    let submitted = post_json(
        &client,
        format!("{}/api/submissions", address),
        json!({
            "quizId": quiz_id,
            "answers": [{"questionId": q[2], "userAnswer": " 42 "}]
        }),
    )
    .await;
    let submission_id = submitted["submissionId"].as_i64().unwrap();

    // Act
    let mut fetched = Vec::new();
    for _ in 0..2 {
        let response = client
            .get(&format!("{}/api/submissions/{}", address, submission_id))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 200);
        fetched.push(response.json::<Value>().await.unwrap());
    }

    // Assert
    assert_eq!(fetched[0], submitted);
    assert_eq!(fetched[0], fetched[1]);
    assert_eq!(submitted["score"], 1);
    // Unanswered questions are graded as empty answers
    assert_eq!(submitted["answers"][0]["userAnswer"], "");
    assert_eq!(submitted["answers"][0]["isCorrect"], false);
}

#[tokio::test]
async fn submit_unknown_quiz_is_404() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(&format!("{}/api/submissions", address))
        .json(&json!({"quizId": 987654, "answers": []}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Quiz not found with id: 987654");
}

#[tokio::test]
async fn fetch_unknown_submission_is_404() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!("{}/api/submissions/424242", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Submission not found with id: 424242");
}

#[tokio::test]
async fn malformed_answers_degrade_to_incorrect() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let (quiz_id, q, _) = seed_quiz(&client, &address).await;

    // Act: unparsable option id, null answer, punctuation on text
    let result = post_json(
        &client,
        format!("{}/api/submissions", address),
        json!({
            "quizId": quiz_id,
            "answers": [
                {"questionId": q[0], "userAnswer": "abc"},
                {"questionId": q[1], "userAnswer": null},
                {"questionId": q[2], "userAnswer": "42!"},
                {"questionId": 999999, "userAnswer": "ignored"}
            ]
        }),
    )
    .await;

    // Assert
    assert_eq!(result["score"], 0);
    assert_eq!(result["totalQuestions"], 3);
    let answers = result["answers"].as_array().unwrap();
    assert_eq!(answers.len(), 3);
    assert!(answers.iter().all(|a| a["isCorrect"] == false));
}

#[tokio::test]
async fn question_without_correct_option_shows_na() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let quiz = post_json(
        &client,
        format!("{}/api/quizzes", address),
        json!({"title": "Unfinished"}),
    )
    .await;
    let quiz_id = quiz["id"].as_i64().unwrap();
    let question = post_json(
        &client,
        format!("{}/api/quizzes/{}/questions", address, quiz_id),
        json!({"type": "MCQ", "questionText": "Pick one"}),
    )
    .await;
    let question_id = question["id"].as_i64().unwrap();
    let option = post_json(
        &client,
        format!("{}/api/questions/{}/options", address, question_id),
        json!({"optionText": "A"}),
    )
    .await;
    assert_eq!(option["isCorrect"], false);

    // Act
    let result = post_json(
        &client,
        format!("{}/api/submissions", address),
        json!({
            "quizId": quiz_id,
            "answers": [{"questionId": question_id, "userAnswer": option["id"].to_string()}]
        }),
    )
    .await;

    // Assert
    assert_eq!(result["score"], 0);
    assert_eq!(result["answers"][0]["isCorrect"], false);
    assert_eq!(result["answers"][0]["correctAnswer"], "N/A");
}

// src/services/grading.rs

use std::collections::HashMap;

use crate::models::{
    question::{Question, QuestionType},
    submission::{AnswerInput, GradedAnswer},
};

/// Result of grading a whole snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeOutcome {
    /// One entry per question, in the snapshot's order.
    pub answers: Vec<GradedAnswer>,
    /// Number of answers graded correct.
    pub score: i32,
}

/// Collects raw answers into a lookup keyed by question id.
/// A later entry for the same question replaces an earlier one; a `null` answer counts as empty.
pub fn answer_map(inputs: &[AnswerInput]) -> HashMap<i64, String> {
    inputs
        .iter()
        .map(|input| {
            (
                input.question_id,
                input.user_answer.clone().unwrap_or_default(),
            )
        })
        .collect()
}

/// Grades every question of the snapshot against the taker's answers.
///
/// Questions without an entry in `answers` are graded as an empty answer.
/// Entries for question ids outside the snapshot are ignored. Never fails:
/// anything that cannot be graded counts as incorrect.
pub fn grade(questions: &[Question], answers: &HashMap<i64, String>) -> GradeOutcome {
    let graded: Vec<GradedAnswer> = questions
        .iter()
        .map(|question| {
            let user_answer = answers.get(&question.id).cloned().unwrap_or_default();
            let is_correct = grade_answer(question, &user_answer);
            GradedAnswer {
                question_id: question.id,
                user_answer,
                is_correct,
            }
        })
        .collect();

    let score = graded.iter().filter(|answer| answer.is_correct).count() as i32;

    GradeOutcome {
        answers: graded,
        score,
    }
}

/// Grades a single raw answer against a question's correct option.
pub fn grade_answer(question: &Question, user_answer: &str) -> bool {
    let trimmed = user_answer.trim();
    if trimmed.is_empty() {
        return false;
    }

    let Some(correct) = question.correct_option() else {
        return false;
    };

    match &question.question_type {
        // The raw answer is the selected option id.
        QuestionType::Mcq | QuestionType::TrueFalse => user_answer
            .parse::<i64>()
            .is_ok_and(|selected| selected == correct.id),
        QuestionType::Text => eq_ignore_case(trimmed, correct.option_text.trim()),
        QuestionType::Unrecognized(_) => false,
    }
}

/// Case-insensitive equality, compared one character at a time (no context-sensitive casing).
fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars().count() == b.chars().count()
        && a.chars().zip(b.chars()).all(|(x, y)| {
            x == y
                || x.to_uppercase().eq(y.to_uppercase())
                || x.to_lowercase().eq(y.to_lowercase())
        })
}

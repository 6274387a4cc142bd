// src/services/projection.rs

use crate::models::{
    question::Question,
    submission::{AnswerResult, Submission, SubmissionResponse},
};

/// Shown as the correct answer when a question has no option flagged correct.
pub const NO_CORRECT_ANSWER: &str = "N/A";

/// Builds the caller-facing result view of a persisted submission.
/// Reads only the submission itself; nothing is re-graded.
pub fn project(submission: &Submission) -> SubmissionResponse {
    let answers = submission
        .answers
        .iter()
        .map(|answer| AnswerResult {
            question_id: answer.question.id,
            question_text: answer.question.question_text.clone(),
            question_type: answer.question.question_type.to_string(),
            user_answer: answer.user_answer.clone(),
            is_correct: answer.is_correct,
            correct_answer: correct_answer_text(&answer.question),
        })
        .collect();

    SubmissionResponse {
        submission_id: submission.id,
        quiz_id: submission.quiz_id,
        score: submission.score,
        total_questions: submission.total_questions,
        submitted_at: submission.submitted_at,
        answers,
    }
}

/// Display text of the correct option, for every question type.
/// MCQ answers are stored as option ids but are always shown with option text here.
pub fn correct_answer_text(question: &Question) -> String {
    question
        .correct_option()
        .map(|option| option.option_text.clone())
        .unwrap_or_else(|| NO_CORRECT_ANSWER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        question::{AnswerOption, QuestionType},
        submission::Answer,
    };

    fn question(id: i64, question_type: QuestionType, options: Vec<(i64, &str, bool)>) -> Question {
        Question {
            id,
            quiz_id: 5,
            question_type,
            question_text: format!("Question {}", id),
            question_order: id as i32,
            created_at: chrono::Utc::now(),
            options: options
                .into_iter()
                .map(|(option_id, text, is_correct)| AnswerOption {
                    id: option_id,
                    question_id: id,
                    option_text: text.to_string(),
                    is_correct,
                    option_order: 0,
                })
                .collect(),
        }
    }

    fn submission() -> Submission {
        let now = chrono::Utc::now();
        Submission {
            id: 77,
            quiz_id: 5,
            score: 1,
            total_questions: 3,
            submitted_at: now,
            answers: vec![
                Answer {
                    id: 1,
                    question: question(
                        1,
                        QuestionType::Mcq,
                        vec![(10, "Paris", true), (11, "Lyon", false)],
                    ),
                    user_answer: "10".to_string(),
                    is_correct: true,
                    created_at: now,
                },
                Answer {
                    id: 2,
                    question: question(2, QuestionType::Text, vec![(20, "A", false)]),
                    user_answer: "A".to_string(),
                    is_correct: false,
                    created_at: now,
                },
                Answer {
                    id: 3,
                    question: question(3, QuestionType::Unrecognized("ESSAY".to_string()), vec![]),
                    user_answer: String::new(),
                    is_correct: false,
                    created_at: now,
                },
            ],
        }
    }

    #[test]
    fn test_project_copies_submission_header() {
        let sub = submission();
        let view = project(&sub);

        assert_eq!(view.submission_id, 77);
        assert_eq!(view.quiz_id, 5);
        assert_eq!(view.score, 1);
        assert_eq!(view.total_questions, 3);
        assert_eq!(view.submitted_at, sub.submitted_at);
    }

    #[test]
    fn test_project_shows_option_text_for_mcq() {
        let view = project(&submission());

        let first = &view.answers[0];
        assert_eq!(first.question_type, "MCQ");
        assert_eq!(first.user_answer, "10");
        assert_eq!(first.correct_answer, "Paris");
        assert!(first.is_correct);
    }

    #[test]
    fn test_project_uses_na_without_correct_option() {
        let view = project(&submission());

        assert_eq!(view.answers[1].correct_answer, NO_CORRECT_ANSWER);
        assert_eq!(view.answers[2].correct_answer, NO_CORRECT_ANSWER);
        assert_eq!(view.answers[2].question_type, "ESSAY");
    }

    #[test]
    fn test_project_keeps_answer_order() {
        let view = project(&submission());
        let ids: Vec<i64> = view.answers.iter().map(|a| a.question_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_project_is_idempotent() {
        let sub = submission();
        assert_eq!(project(&sub), project(&sub));
    }

    #[test]
    fn test_correct_answer_text_tie_break_matches_grading() {
        let q = question(9, QuestionType::Text, vec![(92, "second", true), (91, "first", true)]);
        assert_eq!(correct_answer_text(&q), "first");
    }
}

// src/models/question.rs

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use sqlx::FromRow;
use validator::Validate;

/// Question kind. Closed set; rows carrying any other value in the `question_type`
/// column come back as `Unrecognized` and are never graded correct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionType {
    Mcq,
    TrueFalse,
    Text,
    Unrecognized(String),
}

impl QuestionType {
    /// Parses one of the known wire names (`MCQ`, `TRUE_FALSE`, `TEXT`).
    pub fn parse_known(raw: &str) -> Option<Self> {
        match raw {
            "MCQ" => Some(QuestionType::Mcq),
            "TRUE_FALSE" => Some(QuestionType::TrueFalse),
            "TEXT" => Some(QuestionType::Text),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            QuestionType::Mcq => "MCQ",
            QuestionType::TrueFalse => "TRUE_FALSE",
            QuestionType::Text => "TEXT",
            QuestionType::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for QuestionType {
    fn from(raw: String) -> Self {
        QuestionType::parse_known(&raw).unwrap_or(QuestionType::Unrecognized(raw))
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for QuestionType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Represents the 'options' table in the database.
/// Named `AnswerOption` to stay clear of `std::option::Option`.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOption {
    pub id: i64,
    pub question_id: i64,
    pub option_text: String,
    pub is_correct: bool,
    pub option_order: i32,
}

/// A question with its options, ordered by `option_order` then id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i64,
    pub quiz_id: i64,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub question_text: String,
    pub question_order: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub options: Vec<AnswerOption>,
}

impl Question {
    /// The option used as this question's answer key.
    ///
    /// When several options are flagged correct the one with the lowest id wins,
    /// so grading and result display always agree on the same option.
    pub fn correct_option(&self) -> Option<&AnswerOption> {
        self.options
            .iter()
            .filter(|option| option.is_correct)
            .min_by_key(|option| option.id)
    }
}

/// DTO for sending a question to a quiz taker (excludes correctness flags).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuestion {
    pub id: i64,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub question_text: String,
    pub question_order: i32,
    pub options: Vec<PublicOption>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicOption {
    pub id: i64,
    pub option_text: String,
    pub option_order: i32,
}

impl From<Question> for PublicQuestion {
    fn from(question: Question) -> Self {
        // A TEXT question's only option is its answer key.
        let options = match question.question_type {
            QuestionType::Text => Vec::new(),
            _ => question
                .options
                .into_iter()
                .map(|option| PublicOption {
                    id: option.id,
                    option_text: option.option_text,
                    option_order: option.option_order,
                })
                .collect(),
        };

        PublicQuestion {
            id: question.id,
            question_type: question.question_type,
            question_text: question.question_text,
            question_order: question.question_order,
            options,
        }
    }
}

/// DTO for adding a question to a quiz.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionRequest {
    /// One of `MCQ`, `TRUE_FALSE`, `TEXT`.
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 20))]
    pub question_type: String,
    #[validate(length(min = 1, max = 2000))]
    pub question_text: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuestionRequest {
    #[validate(length(min = 1, max = 2000))]
    pub question_text: String,
}

/// DTO for adding an option to a question.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOptionRequest {
    #[validate(length(min = 1, max = 500))]
    pub option_text: String,
    #[serde(default)]
    pub is_correct: bool,
    #[serde(default)]
    pub option_order: i32,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOptionRequest {
    #[validate(length(min = 1, max = 500))]
    pub option_text: String,
    #[serde(default)]
    pub is_correct: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(id: i64, text: &str, is_correct: bool) -> AnswerOption {
        AnswerOption {
            id,
            question_id: 1,
            option_text: text.to_string(),
            is_correct,
            option_order: 0,
        }
    }

    fn question(options: Vec<AnswerOption>) -> Question {
        Question {
            id: 1,
            quiz_id: 1,
            question_type: QuestionType::Mcq,
            question_text: "Capital of France?".to_string(),
            question_order: 1,
            created_at: chrono::Utc::now(),
            options,
        }
    }

    #[test]
    fn test_question_type_round_trips_known_names() {
        for name in ["MCQ", "TRUE_FALSE", "TEXT"] {
            assert_eq!(QuestionType::from(name.to_string()).as_str(), name);
        }
    }

    #[test]
    fn test_question_type_keeps_unknown_raw_value() {
        let kind = QuestionType::from("ESSAY".to_string());
        assert_eq!(kind, QuestionType::Unrecognized("ESSAY".to_string()));
        assert_eq!(kind.to_string(), "ESSAY");
        assert!(QuestionType::parse_known("mcq").is_none());
    }

    #[test]
    fn test_correct_option_prefers_lowest_id() {
        let q = question(vec![
            option(9, "B", true),
            option(3, "A", true),
            option(1, "C", false),
        ]);
        assert_eq!(q.correct_option().map(|o| o.id), Some(3));
    }

    #[test]
    fn test_correct_option_none_when_unflagged() {
        let q = question(vec![option(1, "A", false), option(2, "B", false)]);
        assert!(q.correct_option().is_none());
    }

    #[test]
    fn test_public_question_hides_correctness() {
        let public = PublicQuestion::from(question(vec![option(1, "Paris", true)]));
        let json = serde_json::to_value(&public).unwrap();
        assert_eq!(json["type"], "MCQ");
        assert_eq!(json["options"][0]["optionText"], "Paris");
        assert!(json["options"][0].get("isCorrect").is_none());
    }

    #[test]
    fn test_public_text_question_has_no_options() {
        let mut q = question(vec![option(1, "42", true)]);
        q.question_type = QuestionType::Text;
        q.question_text = "6 x 7?".to_string();

        let json = serde_json::to_value(PublicQuestion::from(q)).unwrap();
        assert_eq!(json["type"], "TEXT");
        assert_eq!(json["options"], serde_json::json!([]));
    }
}

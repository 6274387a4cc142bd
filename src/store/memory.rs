// src/store/memory.rs

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::{
    error::AppError,
    models::{
        question::{AnswerOption, Question, QuestionType},
        quiz::Quiz,
        submission::{Answer, NewSubmission, Submission},
    },
    store::{CatalogAdmin, QuizCatalog, SubmissionStore},
};

/// Process-local store used when no database is configured, and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    last_id: i64,
    quizzes: BTreeMap<i64, Quiz>,
    questions: BTreeMap<i64, Question>,
    submissions: BTreeMap<i64, StoredSubmission>,
}

/// Answers keep only a question id; the question is re-attached on read,
/// just like the answers table does with its foreign key.
#[derive(Debug, Clone)]
struct StoredSubmission {
    id: i64,
    quiz_id: i64,
    score: i32,
    total_questions: i32,
    submitted_at: DateTime<Utc>,
    answers: Vec<StoredAnswer>,
}

#[derive(Debug, Clone)]
struct StoredAnswer {
    id: i64,
    question_id: i64,
    user_answer: String,
    is_correct: bool,
    created_at: DateTime<Utc>,
}

impl Inner {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn question_in_quiz(&mut self, quiz_id: i64, question_id: i64) -> Option<&mut Question> {
        self.questions
            .get_mut(&question_id)
            .filter(|question| question.quiz_id == quiz_id)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sort_options(options: &mut [AnswerOption]) {
    options.sort_by_key(|option| (option.option_order, option.id));
}

#[async_trait]
impl QuizCatalog for MemoryStore {
    async fn get_quiz(&self, quiz_id: i64) -> Result<Option<Quiz>, AppError> {
        Ok(self.inner.read().await.quizzes.get(&quiz_id).cloned())
    }

    async fn questions_ordered(&self, quiz_id: i64) -> Result<Vec<Question>, AppError> {
        let inner = self.inner.read().await;
        let mut questions: Vec<Question> = inner
            .questions
            .values()
            .filter(|question| question.quiz_id == quiz_id)
            .cloned()
            .collect();
        questions.sort_by_key(|question| (question.question_order, question.id));
        Ok(questions)
    }
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    async fn save(&self, submission: NewSubmission) -> Result<Submission, AppError> {
        let mut inner = self.inner.write().await;
        let submitted_at = Utc::now();
        let id = inner.next_id();

        let mut stored_answers = Vec::with_capacity(submission.answers.len());
        let mut answers = Vec::with_capacity(submission.answers.len());
        for new_answer in submission.answers {
            let answer = Answer {
                id: inner.next_id(),
                question: new_answer.question,
                user_answer: new_answer.user_answer,
                is_correct: new_answer.is_correct,
                created_at: submitted_at,
            };
            stored_answers.push(StoredAnswer {
                id: answer.id,
                question_id: answer.question.id,
                user_answer: answer.user_answer.clone(),
                is_correct: answer.is_correct,
                created_at: answer.created_at,
            });
            answers.push(answer);
        }

        inner.submissions.insert(
            id,
            StoredSubmission {
                id,
                quiz_id: submission.quiz_id,
                score: submission.score,
                total_questions: submission.total_questions,
                submitted_at,
                answers: stored_answers,
            },
        );

        Ok(Submission {
            id,
            quiz_id: submission.quiz_id,
            score: submission.score,
            total_questions: submission.total_questions,
            submitted_at,
            answers,
        })
    }

    async fn find_by_id(&self, submission_id: i64) -> Result<Option<Submission>, AppError> {
        let inner = self.inner.read().await;
        let Some(stored) = inner.submissions.get(&submission_id) else {
            return Ok(None);
        };

        // Answers whose question was deleted are gone, as with ON DELETE CASCADE.
        let answers = stored
            .answers
            .iter()
            .filter_map(|answer| {
                inner.questions.get(&answer.question_id).map(|question| Answer {
                    id: answer.id,
                    question: question.clone(),
                    user_answer: answer.user_answer.clone(),
                    is_correct: answer.is_correct,
                    created_at: answer.created_at,
                })
            })
            .collect();

        Ok(Some(Submission {
            id: stored.id,
            quiz_id: stored.quiz_id,
            score: stored.score,
            total_questions: stored.total_questions,
            submitted_at: stored.submitted_at,
            answers,
        }))
    }
}

#[async_trait]
impl CatalogAdmin for MemoryStore {
    async fn list_quizzes(&self) -> Result<Vec<Quiz>, AppError> {
        Ok(self.inner.read().await.quizzes.values().cloned().collect())
    }

    async fn create_quiz(&self, title: &str, description: Option<&str>) -> Result<Quiz, AppError> {
        let mut inner = self.inner.write().await;
        let quiz = Quiz {
            id: inner.next_id(),
            title: title.to_string(),
            description: description.map(str::to_string),
            created_at: Utc::now(),
        };
        inner.quizzes.insert(quiz.id, quiz.clone());
        Ok(quiz)
    }

    async fn update_quiz(
        &self,
        quiz_id: i64,
        title: &str,
        description: Option<&str>,
    ) -> Result<Option<Quiz>, AppError> {
        let mut inner = self.inner.write().await;
        Ok(inner.quizzes.get_mut(&quiz_id).map(|quiz| {
            quiz.title = title.to_string();
            quiz.description = description.map(str::to_string);
            quiz.clone()
        }))
    }

    async fn delete_quiz(&self, quiz_id: i64) -> Result<bool, AppError> {
        let mut inner = self.inner.write().await;
        if inner.quizzes.remove(&quiz_id).is_none() {
            return Ok(false);
        }
        inner.questions.retain(|_, question| question.quiz_id != quiz_id);
        inner.submissions.retain(|_, submission| submission.quiz_id != quiz_id);
        Ok(true)
    }

    async fn add_question(
        &self,
        quiz_id: i64,
        question_type: &QuestionType,
        question_text: &str,
    ) -> Result<Option<Question>, AppError> {
        let mut inner = self.inner.write().await;
        if !inner.quizzes.contains_key(&quiz_id) {
            return Ok(None);
        }

        let next_order = inner
            .questions
            .values()
            .filter(|question| question.quiz_id == quiz_id)
            .map(|question| question.question_order)
            .max()
            .unwrap_or(0)
            + 1;

        let question = Question {
            id: inner.next_id(),
            quiz_id,
            question_type: question_type.clone(),
            question_text: question_text.to_string(),
            question_order: next_order,
            created_at: Utc::now(),
            options: Vec::new(),
        };
        inner.questions.insert(question.id, question.clone());
        Ok(Some(question))
    }

    async fn update_question(
        &self,
        quiz_id: i64,
        question_id: i64,
        question_text: &str,
    ) -> Result<Option<Question>, AppError> {
        let mut inner = self.inner.write().await;
        Ok(inner.question_in_quiz(quiz_id, question_id).map(|question| {
            question.question_text = question_text.to_string();
            question.clone()
        }))
    }

    async fn delete_question(&self, quiz_id: i64, question_id: i64) -> Result<bool, AppError> {
        let mut inner = self.inner.write().await;
        if inner.question_in_quiz(quiz_id, question_id).is_none() {
            return Ok(false);
        }
        inner.questions.remove(&question_id);
        Ok(true)
    }

    async fn add_option(
        &self,
        question_id: i64,
        option_text: &str,
        is_correct: bool,
        option_order: i32,
    ) -> Result<Option<AnswerOption>, AppError> {
        let mut inner = self.inner.write().await;
        if !inner.questions.contains_key(&question_id) {
            return Ok(None);
        }

        let option = AnswerOption {
            id: inner.next_id(),
            question_id,
            option_text: option_text.to_string(),
            is_correct,
            option_order,
        };
        if let Some(question) = inner.questions.get_mut(&question_id) {
            question.options.push(option.clone());
            sort_options(&mut question.options);
        }
        Ok(Some(option))
    }

    async fn update_option(
        &self,
        question_id: i64,
        option_id: i64,
        option_text: &str,
        is_correct: bool,
    ) -> Result<Option<AnswerOption>, AppError> {
        let mut inner = self.inner.write().await;
        let Some(question) = inner.questions.get_mut(&question_id) else {
            return Ok(None);
        };
        Ok(question
            .options
            .iter_mut()
            .find(|option| option.id == option_id)
            .map(|option| {
                option.option_text = option_text.to_string();
                option.is_correct = is_correct;
                option.clone()
            }))
    }

    async fn delete_option(&self, question_id: i64, option_id: i64) -> Result<bool, AppError> {
        let mut inner = self.inner.write().await;
        let Some(question) = inner.questions.get_mut(&question_id) else {
            return Ok(false);
        };
        let before = question.options.len();
        question.options.retain(|option| option.id != option_id);
        Ok(question.options.len() != before)
    }
}

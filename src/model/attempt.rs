use crate::model::kinds::AttemptStatus;
use crate::schema::{exam_attempts, question_attempts};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Queryable, Selectable, Identifiable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = exam_attempts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ExamAttempt {
    pub id: i32,
    pub student_id: i32,
    pub exam_id: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: AttemptStatus,
    pub total_score: Option<BigDecimal>,
    pub attempted_questions: Option<i32>,
    pub correct_questions: Option<i32>,
    pub incorrect_questions: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = exam_attempts)]
pub struct NewExamAttempt {
    pub student_id: i32,
    pub exam_id: i32,
    pub start_time: DateTime<Utc>,
    pub status: AttemptStatus,
    // end_time, total_score and the counters stay NULL until completion
}

/// Columns written when an attempt finishes.
#[derive(AsChangeset, Debug, Clone, PartialEq)]
#[diesel(table_name = exam_attempts)]
pub struct AttemptCompletion {
    pub end_time: DateTime<Utc>,
    pub status: AttemptStatus,
    pub total_score: BigDecimal,
    pub attempted_questions: i32,
    pub correct_questions: i32,
    pub incorrect_questions: i32,
}

#[derive(Queryable, Selectable, Identifiable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = question_attempts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct QuestionAttempt {
    pub id: i32,
    pub exam_attempt_id: i32,
    pub question_id: i32,
    pub student_answer: Option<String>,
    pub is_correct: Option<bool>,
    pub score: Option<BigDecimal>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub flagged_for_review: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = question_attempts)]
pub struct NewQuestionAttempt {
    pub exam_attempt_id: i32,
    pub question_id: i32,
    pub student_answer: Option<String>,
    pub is_correct: Option<bool>,
    pub score: Option<BigDecimal>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub flagged_for_review: bool,
}

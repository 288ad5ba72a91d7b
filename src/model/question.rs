use crate::model::kinds::{Difficulty, QuestionKind};
use crate::schema::{mcq_options, qa_answers, questions};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Queryable, Selectable, Identifiable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = questions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Question {
    pub id: i32,
    pub subject_id: i32,
    pub kind: QuestionKind,
    pub content: String,
    pub difficulty_level: Difficulty,
    pub assigned_marks: BigDecimal,
    pub chapter: i32,
    pub grade_level: i32,
    pub created_at: DateTime<Utc>,
}

/// Raw question row. Prefer [`crate::authoring::QuestionDraft`], which
/// inserts the options or model answer alongside it.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = questions)]
pub struct NewQuestion {
    pub subject_id: i32,
    pub kind: QuestionKind,
    pub content: String,
    pub difficulty_level: Difficulty,
    pub assigned_marks: BigDecimal,
    pub chapter: i32,
    pub grade_level: i32,
}

#[derive(Queryable, Selectable, Identifiable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = mcq_options)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct McqOption {
    pub id: i32,
    pub question_id: i32,
    pub content: String,
    pub is_correct: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = mcq_options)]
pub struct NewMcqOption {
    pub question_id: i32,
    pub content: String,
    pub is_correct: bool,
}

#[derive(Queryable, Selectable, Identifiable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = qa_answers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct QaAnswer {
    pub id: i32,
    pub question_id: i32,
    pub content: String,
    pub explanation: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = qa_answers)]
pub struct NewQaAnswer {
    pub question_id: i32,
    pub content: String,
    pub explanation: String,
}

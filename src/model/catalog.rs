use crate::model::kinds::ExamKind;
use crate::schema::{exam_questions, exams, subjects};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Queryable, Selectable, Identifiable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = subjects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Subject {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Deserialize, Debug, Clone)]
#[diesel(table_name = subjects)]
pub struct NewSubject {
    pub name: String,
}

impl NewSubject {
    pub fn named(name: impl Into<String>) -> Self {
        NewSubject { name: name.into() }
    }
}

#[derive(Queryable, Selectable, Identifiable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = exams)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Exam {
    pub id: i32,
    pub subject_id: i32,
    pub name: String,
    pub kind: ExamKind,
    /// Minutes; `None` means untimed.
    pub duration: Option<i32>,
    pub total_questions: i32,
    pub mcq_count: i32,
    pub qa_count: i32,
    pub negative_marking: bool,
    pub free_navigation: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = exams)]
pub struct NewExam {
    pub subject_id: i32,
    pub name: String,
    pub kind: ExamKind,
    pub duration: Option<i32>,
    pub total_questions: i32,
    pub mcq_count: i32,
    pub qa_count: i32,
    pub negative_marking: bool,
    pub free_navigation: bool,
}

#[derive(Queryable, Selectable, Identifiable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = exam_questions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ExamQuestion {
    pub id: i32,
    pub exam_id: i32,
    pub question_id: i32,
    /// 1-based position inside the exam.
    pub order_number: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = exam_questions)]
pub struct NewExamQuestion {
    pub exam_id: i32,
    pub question_id: i32,
    pub order_number: i32,
}

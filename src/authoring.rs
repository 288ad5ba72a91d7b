//! Creation paths that uphold the contracts the schema cannot express on its
//! own: exactly one correct option per MCQ, `mcq + qa == total` per exam, and
//! dense 1-based ordering of the questions placed into an exam.

use crate::errors::StoreError;
use crate::model::{
    Difficulty, NewExam, NewExamQuestion, NewMcqOption, NewQaAnswer, NewQuestion, QuestionKind,
};
use crate::store;
use bigdecimal::BigDecimal;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info, instrument};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct OptionDraft {
    pub content: String,
    pub is_correct: bool,
}

impl OptionDraft {
    pub fn new(content: impl Into<String>, is_correct: bool) -> Self {
        OptionDraft {
            content: content.into(),
            is_correct,
        }
    }
}

/// What hangs off a question; also decides its [`QuestionKind`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum QuestionBody {
    Mcq { options: Vec<OptionDraft> },
    Qa { answer: String, explanation: String },
}

impl QuestionBody {
    pub fn kind(&self) -> QuestionKind {
        match self {
            QuestionBody::Mcq { .. } => QuestionKind::Mcq,
            QuestionBody::Qa { .. } => QuestionKind::Qa,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct QuestionDraft {
    pub subject_id: i32,
    pub content: String,
    pub difficulty: Difficulty,
    pub assigned_marks: BigDecimal,
    pub chapter: i32,
    pub grade_level: i32,
    pub body: QuestionBody,
}

/// Ids produced by [`author_question`].
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AuthoredQuestion {
    pub question_id: i32,
    pub kind: QuestionKind,
    /// MCQ option ids in draft order; empty for QA questions.
    pub option_ids: Vec<i32>,
    pub answer_id: Option<i32>,
}

impl QuestionDraft {
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.content.trim().is_empty() {
            return Err(StoreError::invariant("question content must not be empty"));
        }
        if self.assigned_marks <= BigDecimal::from(0) {
            return Err(StoreError::invariant(format!(
                "assigned marks must be positive, got {}",
                self.assigned_marks
            )));
        }
        if self.chapter < 1 {
            return Err(StoreError::invariant(format!(
                "chapter must be at least 1, got {}",
                self.chapter
            )));
        }
        if self.grade_level < 1 {
            return Err(StoreError::invariant(format!(
                "grade level must be at least 1, got {}",
                self.grade_level
            )));
        }

        match &self.body {
            QuestionBody::Mcq { options } => {
                if options.len() < 2 {
                    return Err(StoreError::invariant(format!(
                        "an MCQ question needs at least two options, got {}",
                        options.len()
                    )));
                }
                let correct = options.iter().filter(|option| option.is_correct).count();
                if correct != 1 {
                    return Err(StoreError::invariant(format!(
                        "an MCQ question needs exactly one correct option, got {}",
                        correct
                    )));
                }
            }
            QuestionBody::Qa {
                answer,
                explanation,
            } => {
                if answer.trim().is_empty() || explanation.trim().is_empty() {
                    return Err(StoreError::invariant(
                        "a QA question needs a model answer and an explanation",
                    ));
                }
            }
        }
        Ok(())
    }

    fn to_new_question(&self) -> NewQuestion {
        NewQuestion {
            subject_id: self.subject_id,
            kind: self.body.kind(),
            content: self.content.clone(),
            difficulty_level: self.difficulty,
            assigned_marks: self.assigned_marks.clone(),
            chapter: self.chapter,
            grade_level: self.grade_level,
        }
    }
}

/// Validates `draft` and inserts the question with its options or model answer.
///
/// Everything happens in one transaction: a rejected option or a missing
/// subject leaves no question row behind.
#[instrument(skip(conn, draft), fields(subject_id = draft.subject_id, kind = %draft.body.kind()))]
pub fn author_question(
    conn: &mut PgConnection,
    draft: &QuestionDraft,
) -> Result<AuthoredQuestion, StoreError> {
    draft.validate()?;

    conn.transaction::<_, StoreError, _>(|tx_conn| {
        let question_id = store::question::insert_question(tx_conn, &draft.to_new_question())?;
        debug!("Inserted question {}", question_id);

        let mut authored = AuthoredQuestion {
            question_id,
            kind: draft.body.kind(),
            option_ids: Vec::new(),
            answer_id: None,
        };

        match &draft.body {
            QuestionBody::Mcq { options } => {
                for option in options {
                    let option_id = store::question::insert_mcq_option(
                        tx_conn,
                        &NewMcqOption {
                            question_id,
                            content: option.content.clone(),
                            is_correct: option.is_correct,
                        },
                    )?;
                    authored.option_ids.push(option_id);
                }
            }
            QuestionBody::Qa {
                answer,
                explanation,
            } => {
                let answer_id = store::question::insert_qa_answer(
                    tx_conn,
                    &NewQaAnswer {
                        question_id,
                        content: answer.clone(),
                        explanation: explanation.clone(),
                    },
                )?;
                authored.answer_id = Some(answer_id);
            }
        }

        Ok(authored)
    })
}

/// Checks the per-exam counting contract before anything reaches storage.
pub fn check_exam_counts(exam: &NewExam) -> Result<(), StoreError> {
    if exam.name.trim().is_empty() {
        return Err(StoreError::invariant("exam name must not be empty"));
    }
    if exam.total_questions < 0 || exam.mcq_count < 0 || exam.qa_count < 0 {
        return Err(StoreError::invariant(format!(
            "question counts must not be negative (total {}, mcq {}, qa {})",
            exam.total_questions, exam.mcq_count, exam.qa_count
        )));
    }
    if exam.mcq_count.checked_add(exam.qa_count) != Some(exam.total_questions) {
        return Err(StoreError::invariant(format!(
            "mcq_count ({}) + qa_count ({}) must equal total_questions ({})",
            exam.mcq_count, exam.qa_count, exam.total_questions
        )));
    }
    if let Some(minutes) = exam.duration {
        if minutes <= 0 {
            return Err(StoreError::invariant(format!(
                "duration must be positive when set, got {} minutes",
                minutes
            )));
        }
    }
    Ok(())
}

pub fn create_exam(conn: &mut PgConnection, exam: &NewExam) -> Result<i32, StoreError> {
    check_exam_counts(exam)?;
    let exam_id = store::catalog::insert_exam(conn, exam)?;
    info!("Created exam '{}' with id {}", exam.name, exam_id);
    Ok(exam_id)
}

/// Like [`create_exam`], but a no-op returning `None` when the subject already
/// has an exam with this name.
pub fn create_exam_if_absent(
    conn: &mut PgConnection,
    exam: &NewExam,
) -> Result<Option<i32>, StoreError> {
    check_exam_counts(exam)?;
    let inserted = store::catalog::insert_exam_if_absent(conn, exam)?;
    match inserted {
        Some(exam_id) => info!("Created exam '{}' with id {}", exam.name, exam_id),
        None => debug!("Exam '{}' already exists, skipped", exam.name),
    }
    Ok(inserted)
}

/// Appends `question_ids` to the exam, numbering them after the existing
/// placements. Returns the new placement ids.
///
/// The exam row is locked for the duration of the transaction so concurrent
/// placements into the same exam serialize instead of colliding on
/// `order_number`.
#[instrument(skip(conn, question_ids), fields(count = question_ids.len()))]
pub fn place_questions(
    conn: &mut PgConnection,
    exam_id: i32,
    question_ids: &[i32],
) -> Result<Vec<i32>, StoreError> {
    conn.transaction::<_, StoreError, _>(|tx_conn| {
        let exam = store::catalog::lock_exam(tx_conn, exam_id)?
            .ok_or_else(|| StoreError::NotFound(format!("Exam with ID {} not found", exam_id)))?;

        let existing = store::catalog::list_exam_questions_by_exam(tx_conn, exam_id)?;
        let mut placed: HashSet<i32> = existing.iter().map(|eq| eq.question_id).collect();

        let placed_kinds = store::catalog::list_exam_question_kinds(tx_conn, exam_id)?;
        let mut mcq_used = count_kind(&placed_kinds, QuestionKind::Mcq);
        let mut qa_used = count_kind(&placed_kinds, QuestionKind::Qa);

        let capacity = usize::try_from(exam.total_questions).unwrap_or(0);
        if existing.len() + question_ids.len() > capacity {
            return Err(StoreError::invariant(format!(
                "exam {} holds {} questions; {} placed, {} more requested",
                exam_id,
                exam.total_questions,
                existing.len(),
                question_ids.len()
            )));
        }

        let mut next_order = existing.iter().map(|eq| eq.order_number).max().unwrap_or(0);
        let mut placement_ids = Vec::with_capacity(question_ids.len());

        for &question_id in question_ids {
            let question = store::question::find_question(tx_conn, question_id)?.ok_or_else(|| {
                StoreError::NotFound(format!("Question with ID {} not found", question_id))
            })?;
            if question.subject_id != exam.subject_id {
                return Err(StoreError::invariant(format!(
                    "question {} belongs to subject {}, exam {} to subject {}",
                    question_id, question.subject_id, exam_id, exam.subject_id
                )));
            }
            if !placed.insert(question_id) {
                return Err(StoreError::invariant(format!(
                    "question {} is already placed in exam {}",
                    question_id, exam_id
                )));
            }
            match question.kind {
                QuestionKind::Mcq => {
                    mcq_used += 1;
                    if mcq_used > exam.mcq_count {
                        return Err(StoreError::invariant(format!(
                            "exam {} has room for {} MCQ questions",
                            exam_id, exam.mcq_count
                        )));
                    }
                }
                QuestionKind::Qa => {
                    qa_used += 1;
                    if qa_used > exam.qa_count {
                        return Err(StoreError::invariant(format!(
                            "exam {} has room for {} QA questions",
                            exam_id, exam.qa_count
                        )));
                    }
                }
            }

            next_order = next_order.checked_add(1).ok_or_else(|| {
                StoreError::invariant(format!("exam {} has no order number left", exam_id))
            })?;
            let placement_id = store::catalog::insert_exam_question(
                tx_conn,
                &NewExamQuestion {
                    exam_id,
                    question_id,
                    order_number: next_order,
                },
            )?;
            placement_ids.push(placement_id);
        }

        info!(
            "Placed {} questions into exam {} (now {} of {})",
            placement_ids.len(),
            exam_id,
            next_order,
            exam.total_questions
        );
        Ok(placement_ids)
    })
}

/// How many of `kinds` are `kind`, saturating at `i32::MAX`.
pub fn count_kind(kinds: &[QuestionKind], kind: QuestionKind) -> i32 {
    let count = kinds.iter().filter(|&&k| k == kind).count();
    i32::try_from(count).unwrap_or(i32::MAX)
}

/// Order numbers that occur more than once, each reported once, ascending.
pub fn duplicate_order_numbers(orders: &[i32]) -> Vec<i32> {
    let mut seen: BTreeMap<i32, usize> = BTreeMap::new();
    for &order in orders {
        *seen.entry(order).or_default() += 1;
    }
    seen.into_iter()
        .filter(|&(_, count)| count > 1)
        .map(|(order, _)| order)
        .collect()
}

/// True when `orders` is exactly `1..=total` in some order.
pub fn order_numbers_are_dense(orders: &[i32], total: i32) -> bool {
    if usize::try_from(total).ok() != Some(orders.len()) {
        return false;
    }
    let mut sorted = orders.to_vec();
    sorted.sort_unstable();
    sorted.iter().zip(1..).all(|(&order, expected)| order == expected)
}

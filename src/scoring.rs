use crate::errors::StoreError;
use crate::model::{AttemptCompletion, AttemptStatus, NewExamAttempt, NewQuestionAttempt, QuestionAttempt};
use crate::store;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use tracing::{info, instrument, warn};

/// Summary of the question attempts recorded under one exam attempt.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct AttemptTally {
    pub attempted: i32,
    pub correct: i32,
    pub incorrect: i32,
    pub total_score: BigDecimal,
}

impl AttemptTally {
    /// An attempt counts as attempted when it carries a non-blank answer.
    /// Scores are summed as recorded, so deductions from negative marking
    /// arrive here already signed.
    pub fn from_attempts(attempts: &[QuestionAttempt]) -> Self {
        let mut tally = AttemptTally {
            attempted: 0,
            correct: 0,
            incorrect: 0,
            total_score: BigDecimal::from(0),
        };

        for attempt in attempts {
            let answered = attempt
                .student_answer
                .as_deref()
                .is_some_and(|answer| !answer.trim().is_empty());
            if answered {
                tally.attempted += 1;
            }
            match attempt.is_correct {
                Some(true) => tally.correct += 1,
                Some(false) => tally.incorrect += 1,
                None => {}
            }
            if let Some(score) = &attempt.score {
                tally.total_score = &tally.total_score + score;
            }
        }

        tally
    }

    pub fn into_completion(self, end_time: DateTime<Utc>) -> AttemptCompletion {
        AttemptCompletion {
            end_time,
            status: AttemptStatus::Completed,
            total_score: self.total_score,
            attempted_questions: self.attempted,
            correct_questions: self.correct,
            incorrect_questions: self.incorrect,
        }
    }
}

/// Opens an `in_progress` attempt starting now.
pub fn start_attempt(
    conn: &mut PgConnection,
    student_id: i32,
    exam_id: i32,
) -> Result<i32, StoreError> {
    let attempt_id = store::attempt::insert_exam_attempt(
        conn,
        &NewExamAttempt {
            student_id,
            exam_id,
            start_time: Utc::now(),
            status: AttemptStatus::InProgress,
        },
    )?;
    info!(
        "Student {} started attempt {} on exam {}",
        student_id, attempt_id, exam_id
    );
    Ok(attempt_id)
}

/// Records one response. Only attempts that are still in progress accept
/// answers, and only to questions placed in the attempt's exam.
pub fn record_answer(
    conn: &mut PgConnection,
    answer: &NewQuestionAttempt,
) -> Result<i32, StoreError> {
    conn.transaction::<_, StoreError, _>(|tx_conn| {
        let attempt = store::attempt::lock_exam_attempt(tx_conn, answer.exam_attempt_id)?
            .ok_or_else(|| {
                StoreError::NotFound(format!(
                    "Exam attempt with ID {} not found",
                    answer.exam_attempt_id
                ))
            })?;
        if attempt.status != AttemptStatus::InProgress {
            warn!(
                "Rejected answer for attempt {} in status {}",
                attempt.id, attempt.status
            );
            return Err(StoreError::invariant(format!(
                "exam attempt {} is {}, not in_progress",
                attempt.id, attempt.status
            )));
        }
        if store::catalog::find_exam_question(tx_conn, attempt.exam_id, answer.question_id)?
            .is_none()
        {
            warn!(
                "Rejected answer for attempt {}: question {} is not in exam {}",
                attempt.id, answer.question_id, attempt.exam_id
            );
            return Err(StoreError::invariant(format!(
                "question {} is not placed in exam {}",
                answer.question_id, attempt.exam_id
            )));
        }
        Ok(store::attempt::insert_question_attempt(tx_conn, answer)?)
    })
}

/// Tallies the recorded answers and closes the attempt as `completed`.
#[instrument(skip(conn))]
pub fn complete_attempt(
    conn: &mut PgConnection,
    attempt_id: i32,
) -> Result<AttemptTally, StoreError> {
    conn.transaction::<_, StoreError, _>(|tx_conn| {
        let attempt = store::attempt::lock_exam_attempt(tx_conn, attempt_id)?.ok_or_else(|| {
            StoreError::NotFound(format!("Exam attempt with ID {} not found", attempt_id))
        })?;
        if attempt.status != AttemptStatus::InProgress {
            return Err(StoreError::invariant(format!(
                "exam attempt {} is already {}",
                attempt_id, attempt.status
            )));
        }

        let answers = store::attempt::list_question_attempts_by_attempt(tx_conn, attempt_id)?;
        let tally = AttemptTally::from_attempts(&answers);
        store::attempt::update_exam_attempt(
            tx_conn,
            attempt_id,
            &tally.clone().into_completion(Utc::now()),
        )?;

        info!(
            "Completed attempt {}: {} attempted, {} correct, {} incorrect, score {}",
            attempt_id, tally.attempted, tally.correct, tally.incorrect, tally.total_score
        );
        Ok(tally)
    })
}

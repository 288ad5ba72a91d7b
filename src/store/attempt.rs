use crate::model::{
    AttemptCompletion, ExamAttempt, NewExamAttempt, NewQuestionAttempt, QuestionAttempt,
};
use crate::schema::{exam_attempts, question_attempts};
use diesel::prelude::*;

pub fn insert_exam_attempt(conn: &mut PgConnection, new: &NewExamAttempt) -> QueryResult<i32> {
    diesel::insert_into(exam_attempts::table)
        .values(new)
        .returning(exam_attempts::id)
        .get_result(conn)
}

pub fn find_exam_attempt(
    conn: &mut PgConnection,
    attempt_id: i32,
) -> QueryResult<Option<ExamAttempt>> {
    exam_attempts::table
        .find(attempt_id)
        .select(ExamAttempt::as_select())
        .first(conn)
        .optional()
}

/// Same as [`find_exam_attempt`] but holds a row lock until the transaction ends.
pub fn lock_exam_attempt(
    conn: &mut PgConnection,
    attempt_id: i32,
) -> QueryResult<Option<ExamAttempt>> {
    exam_attempts::table
        .find(attempt_id)
        .select(ExamAttempt::as_select())
        .for_update()
        .first(conn)
        .optional()
}

pub fn list_exam_attempts(conn: &mut PgConnection) -> QueryResult<Vec<ExamAttempt>> {
    exam_attempts::table
        .order(exam_attempts::id)
        .select(ExamAttempt::as_select())
        .load(conn)
}

pub fn list_exam_attempts_by_student(
    conn: &mut PgConnection,
    student_id: i32,
) -> QueryResult<Vec<ExamAttempt>> {
    exam_attempts::table
        .filter(exam_attempts::student_id.eq(student_id))
        .order(exam_attempts::id)
        .select(ExamAttempt::as_select())
        .load(conn)
}

pub fn list_exam_attempts_by_exam(
    conn: &mut PgConnection,
    exam_id: i32,
) -> QueryResult<Vec<ExamAttempt>> {
    exam_attempts::table
        .filter(exam_attempts::exam_id.eq(exam_id))
        .order(exam_attempts::id)
        .select(ExamAttempt::as_select())
        .load(conn)
}

pub fn update_exam_attempt(
    conn: &mut PgConnection,
    attempt_id: i32,
    completion: &AttemptCompletion,
) -> QueryResult<usize> {
    diesel::update(exam_attempts::table.find(attempt_id))
        .set(completion)
        .execute(conn)
}

pub fn insert_question_attempt(
    conn: &mut PgConnection,
    new: &NewQuestionAttempt,
) -> QueryResult<i32> {
    diesel::insert_into(question_attempts::table)
        .values(new)
        .returning(question_attempts::id)
        .get_result(conn)
}

pub fn list_question_attempts(conn: &mut PgConnection) -> QueryResult<Vec<QuestionAttempt>> {
    question_attempts::table
        .order(question_attempts::id)
        .select(QuestionAttempt::as_select())
        .load(conn)
}

pub fn list_question_attempts_by_attempt(
    conn: &mut PgConnection,
    exam_attempt_id: i32,
) -> QueryResult<Vec<QuestionAttempt>> {
    question_attempts::table
        .filter(question_attempts::exam_attempt_id.eq(exam_attempt_id))
        .order(question_attempts::id)
        .select(QuestionAttempt::as_select())
        .load(conn)
}

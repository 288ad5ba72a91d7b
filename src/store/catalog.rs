use crate::model::{
    Exam, ExamQuestion, NewExam, NewExamQuestion, NewSubject, QuestionKind, Subject,
};
use crate::schema::{exam_questions, exams, questions, subjects};
use diesel::prelude::*;

pub fn insert_subject(conn: &mut PgConnection, new: &NewSubject) -> QueryResult<i32> {
    diesel::insert_into(subjects::table)
        .values(new)
        .returning(subjects::id)
        .get_result(conn)
}

/// Returns `None` without touching the table when the name is already taken.
pub fn insert_subject_if_absent(
    conn: &mut PgConnection,
    new: &NewSubject,
) -> QueryResult<Option<i32>> {
    diesel::insert_into(subjects::table)
        .values(new)
        .on_conflict(subjects::name)
        .do_nothing()
        .returning(subjects::id)
        .get_result(conn)
        .optional()
}

pub fn find_subject_by_name(conn: &mut PgConnection, name: &str) -> QueryResult<Option<Subject>> {
    subjects::table
        .filter(subjects::name.eq(name))
        .select(Subject::as_select())
        .first(conn)
        .optional()
}

pub fn list_subjects(conn: &mut PgConnection) -> QueryResult<Vec<Subject>> {
    subjects::table
        .order(subjects::id)
        .select(Subject::as_select())
        .load(conn)
}

pub fn insert_exam(conn: &mut PgConnection, new: &NewExam) -> QueryResult<i32> {
    diesel::insert_into(exams::table)
        .values(new)
        .returning(exams::id)
        .get_result(conn)
}

/// Conflicts on `(subject_id, name)`, which identifies an exam template.
pub fn insert_exam_if_absent(conn: &mut PgConnection, new: &NewExam) -> QueryResult<Option<i32>> {
    diesel::insert_into(exams::table)
        .values(new)
        .on_conflict((exams::subject_id, exams::name))
        .do_nothing()
        .returning(exams::id)
        .get_result(conn)
        .optional()
}

pub fn find_exam(conn: &mut PgConnection, exam_id: i32) -> QueryResult<Option<Exam>> {
    exams::table
        .find(exam_id)
        .select(Exam::as_select())
        .first(conn)
        .optional()
}

/// Same as [`find_exam`] but holds a row lock until the transaction ends.
pub fn lock_exam(conn: &mut PgConnection, exam_id: i32) -> QueryResult<Option<Exam>> {
    exams::table
        .find(exam_id)
        .select(Exam::as_select())
        .for_update()
        .first(conn)
        .optional()
}

pub fn list_exams(conn: &mut PgConnection) -> QueryResult<Vec<Exam>> {
    exams::table
        .order(exams::id)
        .select(Exam::as_select())
        .load(conn)
}

pub fn list_exams_by_subject(conn: &mut PgConnection, subject_id: i32) -> QueryResult<Vec<Exam>> {
    exams::table
        .filter(exams::subject_id.eq(subject_id))
        .order(exams::id)
        .select(Exam::as_select())
        .load(conn)
}

pub fn list_exams_by_name(conn: &mut PgConnection, name: &str) -> QueryResult<Vec<Exam>> {
    exams::table
        .filter(exams::name.eq(name))
        .order(exams::id)
        .select(Exam::as_select())
        .load(conn)
}

pub fn insert_exam_question(conn: &mut PgConnection, new: &NewExamQuestion) -> QueryResult<i32> {
    diesel::insert_into(exam_questions::table)
        .values(new)
        .returning(exam_questions::id)
        .get_result(conn)
}

pub fn list_exam_questions(conn: &mut PgConnection) -> QueryResult<Vec<ExamQuestion>> {
    exam_questions::table
        .order(exam_questions::id)
        .select(ExamQuestion::as_select())
        .load(conn)
}

pub fn list_exam_questions_by_exam(
    conn: &mut PgConnection,
    exam_id: i32,
) -> QueryResult<Vec<ExamQuestion>> {
    exam_questions::table
        .filter(exam_questions::exam_id.eq(exam_id))
        .order(exam_questions::id)
        .select(ExamQuestion::as_select())
        .load(conn)
}

/// Kind of every question placed in the exam, in placement order.
pub fn list_exam_question_kinds(
    conn: &mut PgConnection,
    exam_id: i32,
) -> QueryResult<Vec<QuestionKind>> {
    exam_questions::table
        .inner_join(questions::table.on(exam_questions::question_id.eq(questions::id)))
        .filter(exam_questions::exam_id.eq(exam_id))
        .order(exam_questions::id)
        .select(questions::kind)
        .load(conn)
}

pub fn find_exam_question(
    conn: &mut PgConnection,
    exam_id: i32,
    question_id: i32,
) -> QueryResult<Option<ExamQuestion>> {
    exam_questions::table
        .filter(exam_questions::exam_id.eq(exam_id))
        .filter(exam_questions::question_id.eq(question_id))
        .select(ExamQuestion::as_select())
        .first(conn)
        .optional()
}

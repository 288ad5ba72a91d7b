use crate::model::{
    McqOption, NewMcqOption, NewQaAnswer, NewQuestion, QaAnswer, Question, QuestionKind,
};
use crate::schema::{mcq_options, qa_answers, questions};
use diesel::prelude::*;

pub fn insert_question(conn: &mut PgConnection, new: &NewQuestion) -> QueryResult<i32> {
    diesel::insert_into(questions::table)
        .values(new)
        .returning(questions::id)
        .get_result(conn)
}

pub fn find_question(conn: &mut PgConnection, question_id: i32) -> QueryResult<Option<Question>> {
    questions::table
        .find(question_id)
        .select(Question::as_select())
        .first(conn)
        .optional()
}

pub fn list_questions(conn: &mut PgConnection) -> QueryResult<Vec<Question>> {
    questions::table
        .order(questions::id)
        .select(Question::as_select())
        .load(conn)
}

pub fn list_questions_by_subject(
    conn: &mut PgConnection,
    subject_id: i32,
) -> QueryResult<Vec<Question>> {
    questions::table
        .filter(questions::subject_id.eq(subject_id))
        .order(questions::id)
        .select(Question::as_select())
        .load(conn)
}

pub fn list_questions_by_kind(
    conn: &mut PgConnection,
    kind: QuestionKind,
) -> QueryResult<Vec<Question>> {
    questions::table
        .filter(questions::kind.eq(kind))
        .order(questions::id)
        .select(Question::as_select())
        .load(conn)
}

pub fn insert_mcq_option(conn: &mut PgConnection, new: &NewMcqOption) -> QueryResult<i32> {
    diesel::insert_into(mcq_options::table)
        .values(new)
        .returning(mcq_options::id)
        .get_result(conn)
}

pub fn list_mcq_options(conn: &mut PgConnection) -> QueryResult<Vec<McqOption>> {
    mcq_options::table
        .order(mcq_options::id)
        .select(McqOption::as_select())
        .load(conn)
}

pub fn list_mcq_options_by_question(
    conn: &mut PgConnection,
    question_id: i32,
) -> QueryResult<Vec<McqOption>> {
    mcq_options::table
        .filter(mcq_options::question_id.eq(question_id))
        .order(mcq_options::id)
        .select(McqOption::as_select())
        .load(conn)
}

pub fn insert_qa_answer(conn: &mut PgConnection, new: &NewQaAnswer) -> QueryResult<i32> {
    diesel::insert_into(qa_answers::table)
        .values(new)
        .returning(qa_answers::id)
        .get_result(conn)
}

pub fn list_qa_answers(conn: &mut PgConnection) -> QueryResult<Vec<QaAnswer>> {
    qa_answers::table
        .order(qa_answers::id)
        .select(QaAnswer::as_select())
        .load(conn)
}

pub fn list_qa_answers_by_question(
    conn: &mut PgConnection,
    question_id: i32,
) -> QueryResult<Vec<QaAnswer>> {
    qa_answers::table
        .filter(qa_answers::question_id.eq(question_id))
        .order(qa_answers::id)
        .select(QaAnswer::as_select())
        .load(conn)
}

use crate::model::{Admin, NewAdmin, NewStudent, Student};
use crate::schema::{admins, students};
use diesel::prelude::*;

pub fn insert_student(conn: &mut PgConnection, new: &NewStudent) -> QueryResult<i32> {
    diesel::insert_into(students::table)
        .values(new)
        .returning(students::id)
        .get_result(conn)
}

/// Inserts unless a student with the same identity or email exists.
pub fn insert_student_if_absent(
    conn: &mut PgConnection,
    new: &NewStudent,
) -> QueryResult<Option<i32>> {
    diesel::insert_into(students::table)
        .values(new)
        .on_conflict_do_nothing()
        .returning(students::id)
        .get_result(conn)
        .optional()
}

pub fn find_student_by_clerk_id(
    conn: &mut PgConnection,
    clerk_user_id: &str,
) -> QueryResult<Option<Student>> {
    students::table
        .filter(students::clerk_user_id.eq(clerk_user_id))
        .select(Student::as_select())
        .first(conn)
        .optional()
}

pub fn list_students(conn: &mut PgConnection) -> QueryResult<Vec<Student>> {
    students::table
        .order(students::id)
        .select(Student::as_select())
        .load(conn)
}

pub fn insert_admin(conn: &mut PgConnection, new: &NewAdmin) -> QueryResult<i32> {
    diesel::insert_into(admins::table)
        .values(new)
        .returning(admins::id)
        .get_result(conn)
}

pub fn insert_admin_if_absent(conn: &mut PgConnection, new: &NewAdmin) -> QueryResult<Option<i32>> {
    diesel::insert_into(admins::table)
        .values(new)
        .on_conflict(admins::email)
        .do_nothing()
        .returning(admins::id)
        .get_result(conn)
        .optional()
}

pub fn find_admin_by_email(conn: &mut PgConnection, email: &str) -> QueryResult<Option<Admin>> {
    admins::table
        .filter(admins::email.eq(email))
        .select(Admin::as_select())
        .first(conn)
        .optional()
}

pub fn list_admins(conn: &mut PgConnection) -> QueryResult<Vec<Admin>> {
    admins::table
        .order(admins::id)
        .select(Admin::as_select())
        .load(conn)
}

// Mirrors the DDL in `schema.sql`; keep both in step.

diesel::table! {
    admins (id) {
        id -> Int4,
        email -> Text,
        name -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    exam_attempts (id) {
        id -> Int4,
        student_id -> Int4,
        exam_id -> Int4,
        start_time -> Timestamptz,
        end_time -> Nullable<Timestamptz>,
        status -> Text,
        total_score -> Nullable<Numeric>,
        attempted_questions -> Nullable<Int4>,
        correct_questions -> Nullable<Int4>,
        incorrect_questions -> Nullable<Int4>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    exam_questions (id) {
        id -> Int4,
        exam_id -> Int4,
        question_id -> Int4,
        order_number -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    exams (id) {
        id -> Int4,
        subject_id -> Int4,
        name -> Text,
        #[sql_name = "type"]
        kind -> Text,
        duration -> Nullable<Int4>,
        total_questions -> Int4,
        mcq_count -> Int4,
        qa_count -> Int4,
        negative_marking -> Bool,
        free_navigation -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    mcq_options (id) {
        id -> Int4,
        question_id -> Int4,
        content -> Text,
        is_correct -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    qa_answers (id) {
        id -> Int4,
        question_id -> Int4,
        content -> Text,
        explanation -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    question_attempts (id) {
        id -> Int4,
        exam_attempt_id -> Int4,
        question_id -> Int4,
        student_answer -> Nullable<Text>,
        is_correct -> Nullable<Bool>,
        score -> Nullable<Numeric>,
        start_time -> Timestamptz,
        end_time -> Nullable<Timestamptz>,
        flagged_for_review -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    questions (id) {
        id -> Int4,
        subject_id -> Int4,
        #[sql_name = "type"]
        kind -> Text,
        content -> Text,
        difficulty_level -> Text,
        assigned_marks -> Numeric,
        chapter -> Int4,
        grade_level -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    students (id) {
        id -> Int4,
        clerk_user_id -> Text,
        email -> Text,
        name -> Text,
        auth_provider -> Text,
        grade_level -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    subjects (id) {
        id -> Int4,
        name -> Text,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(exam_attempts -> exams (exam_id));
diesel::joinable!(exam_attempts -> students (student_id));
diesel::joinable!(exam_questions -> exams (exam_id));
diesel::joinable!(exam_questions -> questions (question_id));
diesel::joinable!(exams -> subjects (subject_id));
diesel::joinable!(mcq_options -> questions (question_id));
diesel::joinable!(qa_answers -> questions (question_id));
diesel::joinable!(question_attempts -> exam_attempts (exam_attempt_id));
diesel::joinable!(question_attempts -> questions (question_id));
diesel::joinable!(questions -> subjects (subject_id));

diesel::allow_tables_to_appear_in_same_query!(
    admins,
    exam_attempts,
    exam_questions,
    exams,
    mcq_options,
    qa_answers,
    question_attempts,
    questions,
    students,
    subjects,
);

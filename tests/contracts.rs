use bigdecimal::BigDecimal;
use chrono::Utc;
use exam_store::StoreError;
use exam_store::authoring::{
    OptionDraft, QuestionBody, QuestionDraft, check_exam_counts, count_kind,
    duplicate_order_numbers, order_numbers_are_dense,
};
use exam_store::model::{
    AttemptStatus, Difficulty, Exam, ExamKind, ExamQuestion, McqOption, NewExam, QaAnswer,
    Question, QuestionAttempt, QuestionKind,
};
use exam_store::scoring::AttemptTally;
use exam_store::seed::{self, SUBJECT_NAMES};
use exam_store::verify::{Snapshot, VerificationReport, Violation, inspect};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::str::FromStr;

// fixtures

fn exam_row(id: i32, total: i32, mcq: i32, qa: i32) -> Exam {
    Exam {
        id,
        subject_id: 1,
        name: format!("Exam {}", id),
        kind: ExamKind::Practice,
        duration: None,
        total_questions: total,
        mcq_count: mcq,
        qa_count: qa,
        negative_marking: false,
        free_navigation: true,
        created_at: Utc::now(),
    }
}

fn question_row(id: i32, kind: QuestionKind) -> Question {
    Question {
        id,
        subject_id: 1,
        kind,
        content: format!("Question {}", id),
        difficulty_level: Difficulty::Simple,
        assigned_marks: BigDecimal::from(1),
        chapter: 1,
        grade_level: 6,
        created_at: Utc::now(),
    }
}

fn option_row(id: i32, question_id: i32, is_correct: bool) -> McqOption {
    McqOption {
        id,
        question_id,
        content: format!("Option {}", id),
        is_correct,
        created_at: Utc::now(),
    }
}

fn answer_row(id: i32, question_id: i32) -> QaAnswer {
    QaAnswer {
        id,
        question_id,
        content: "Model answer".to_string(),
        explanation: "Explanation".to_string(),
        created_at: Utc::now(),
    }
}

fn placement_row(id: i32, exam_id: i32, order_number: i32) -> ExamQuestion {
    ExamQuestion {
        id,
        exam_id,
        question_id: id,
        order_number,
        created_at: Utc::now(),
    }
}

fn attempt_row(answer: Option<&str>, is_correct: Option<bool>, score: Option<&str>) -> QuestionAttempt {
    QuestionAttempt {
        id: 1,
        exam_attempt_id: 1,
        question_id: 1,
        student_answer: answer.map(str::to_string),
        is_correct,
        score: score.map(|s| BigDecimal::from_str(s).unwrap()),
        start_time: Utc::now(),
        end_time: None,
        flagged_for_review: false,
        created_at: Utc::now(),
    }
}

fn draft(body: QuestionBody) -> QuestionDraft {
    QuestionDraft {
        subject_id: 1,
        content: "What is inertia?".to_string(),
        difficulty: Difficulty::Difficult,
        assigned_marks: BigDecimal::from(1),
        chapter: 4,
        grade_level: 9,
        body,
    }
}

fn mcq_body(correct: &[bool]) -> QuestionBody {
    QuestionBody::Mcq {
        options: correct
            .iter()
            .enumerate()
            .map(|(i, &is_correct)| OptionDraft::new(format!("Option {}", i + 1), is_correct))
            .collect(),
    }
}

fn new_exam(total: i32, mcq: i32, qa: i32, duration: Option<i32>) -> NewExam {
    NewExam {
        subject_id: 1,
        name: "Physics Live Exam".to_string(),
        kind: ExamKind::Live,
        duration,
        total_questions: total,
        mcq_count: mcq,
        qa_count: qa,
        negative_marking: false,
        free_navigation: false,
    }
}

// kinds

#[test]
fn test_kinds_use_stored_spellings() {
    assert_eq!(ExamKind::Practice.as_str(), "practice");
    assert_eq!(ExamKind::Live.to_string(), "live");
    assert_eq!(QuestionKind::from_str("mcq"), Ok(QuestionKind::Mcq));
    assert_eq!(QuestionKind::from_str("qa"), Ok(QuestionKind::Qa));
    assert_eq!(Difficulty::from_str("Challenging"), Ok(Difficulty::Challenging));
    assert_eq!(AttemptStatus::InProgress.as_str(), "in_progress");
    assert_eq!(
        serde_json::to_string(&AttemptStatus::Completed).unwrap(),
        "\"completed\""
    );
}

#[test]
fn test_unknown_kind_is_rejected() {
    let err = ExamKind::from_str("Live Exam").unwrap_err();
    assert_eq!(err.kind, "ExamKind");
    assert_eq!(err.value, "Live Exam");
    assert!(Difficulty::from_str("simple").is_err());
}

// question drafts

#[test]
fn test_mcq_draft_with_one_correct_option_is_valid() {
    let question = draft(mcq_body(&[true, false, false, false]));
    assert!(question.validate().is_ok());
    assert_eq!(question.body.kind(), QuestionKind::Mcq);
}

#[test]
fn test_mcq_draft_needs_exactly_one_correct_option() {
    for correct in [&[false, false, false][..], &[true, true, false][..]] {
        let result = draft(mcq_body(correct)).validate();
        assert!(matches!(result, Err(StoreError::Invariant(_))), "{:?}", correct);
    }
}

#[test]
fn test_mcq_draft_needs_two_options() {
    let result = draft(mcq_body(&[true])).validate();
    assert!(matches!(result, Err(StoreError::Invariant(_))));
}

#[test]
fn test_question_draft_rejects_non_positive_marks_and_levels() {
    let mut question = draft(mcq_body(&[false, true]));
    question.assigned_marks = BigDecimal::from(0);
    assert!(question.validate().is_err());

    let mut question = draft(mcq_body(&[false, true]));
    question.chapter = 0;
    assert!(question.validate().is_err());

    let mut question = draft(mcq_body(&[false, true]));
    question.grade_level = -1;
    assert!(question.validate().is_err());
}

#[test]
fn test_qa_draft_needs_answer_and_explanation() {
    let valid = draft(QuestionBody::Qa {
        answer: "An object's resistance to change in motion".to_string(),
        explanation: "Newton's first law".to_string(),
    });
    assert!(valid.validate().is_ok());
    assert_eq!(valid.body.kind(), QuestionKind::Qa);

    let missing = draft(QuestionBody::Qa {
        answer: "  ".to_string(),
        explanation: "Newton's first law".to_string(),
    });
    assert!(matches!(missing.validate(), Err(StoreError::Invariant(_))));
}

// exam counts

#[test]
fn test_exam_counts_must_add_up() {
    assert!(check_exam_counts(&new_exam(30, 20, 10, Some(120))).is_ok());
    assert!(check_exam_counts(&new_exam(30, 20, 10, None)).is_ok());
    assert!(matches!(
        check_exam_counts(&new_exam(30, 20, 9, None)),
        Err(StoreError::Invariant(_))
    ));
    assert!(check_exam_counts(&new_exam(0, -1, 1, None)).is_err());
    assert!(check_exam_counts(&new_exam(30, 20, 10, Some(0))).is_err());
}

#[test]
fn test_exam_counts_that_overflow_are_rejected() {
    let result = check_exam_counts(&new_exam(5, i32::MAX, 1, None));
    assert!(matches!(result, Err(StoreError::Invariant(_))), "{:?}", result);

    let result = check_exam_counts(&new_exam(i32::MAX, i32::MAX, i32::MAX, None));
    assert!(matches!(result, Err(StoreError::Invariant(_))), "{:?}", result);
}

// ordering

#[test]
fn test_order_number_helpers() {
    assert!(order_numbers_are_dense(&[3, 1, 2], 3));
    assert!(order_numbers_are_dense(&[], 0));
    assert!(!order_numbers_are_dense(&[1, 2, 4], 3));
    assert!(!order_numbers_are_dense(&[1, 2], 3));
    assert!(!order_numbers_are_dense(&[1, 1, 2], 3));

    assert!(duplicate_order_numbers(&[1, 2, 3]).is_empty());
    assert_eq!(duplicate_order_numbers(&[4, 2, 4, 2, 4, 1]), vec![2, 4]);
}

#[test]
fn test_count_kind() {
    let kinds = [QuestionKind::Mcq, QuestionKind::Qa, QuestionKind::Mcq];
    assert_eq!(count_kind(&kinds, QuestionKind::Mcq), 2);
    assert_eq!(count_kind(&kinds, QuestionKind::Qa), 1);
    assert_eq!(count_kind(&[], QuestionKind::Qa), 0);
}

// tally

#[test]
fn test_tally_counts_answers_and_sums_signed_scores() {
    let attempts = vec![
        attempt_row(Some("B"), Some(true), Some("1")),
        attempt_row(Some("C"), Some(false), Some("-0.25")),
        attempt_row(Some("   "), None, None),
        attempt_row(None, None, None),
        attempt_row(Some("free text"), Some(true), Some("1.5")),
    ];

    let tally = AttemptTally::from_attempts(&attempts);

    assert_eq!(tally.attempted, 3);
    assert_eq!(tally.correct, 2);
    assert_eq!(tally.incorrect, 1);
    assert_eq!(tally.total_score, BigDecimal::from_str("2.25").unwrap());

    let completion = tally.into_completion(Utc::now());
    assert_eq!(completion.status, AttemptStatus::Completed);
    assert_eq!(completion.attempted_questions, 3);
}

#[test]
fn test_tally_of_no_answers_is_zero() {
    let tally = AttemptTally::from_attempts(&[]);
    assert_eq!(tally.attempted, 0);
    assert_eq!(tally.correct, 0);
    assert_eq!(tally.incorrect, 0);
    assert_eq!(tally.total_score, BigDecimal::from(0));
}

// seed templates

#[test]
fn test_exam_templates_follow_practice_and_live_rules() {
    let [practice, live] = seed::exam_templates(3, "Physics");

    assert_eq!(practice.name, "Physics Practice Test");
    assert_eq!(practice.kind, ExamKind::Practice);
    assert_eq!(practice.duration, None);
    assert!(practice.free_navigation);

    assert_eq!(live.name, "Physics Live Exam");
    assert_eq!(live.kind, ExamKind::Live);
    assert_eq!(live.duration, Some(120));
    assert!(!live.free_navigation);

    for exam in [&practice, &live] {
        assert_eq!(exam.subject_id, 3);
        assert_eq!(exam.total_questions, 30);
        assert_eq!(exam.mcq_count, 20);
        assert_eq!(exam.qa_count, 10);
        assert!(!exam.negative_marking);
        assert!(check_exam_counts(exam).is_ok());
    }
}

#[test]
fn test_sample_questions_satisfy_authoring_contracts() {
    let mut rng = StdRng::seed_from_u64(11);
    for (subject_id, subject) in (1..).zip(SUBJECT_NAMES) {
        for index in 1..=3 {
            let mcq = seed::mcq_draft(subject_id, subject, index, &mut rng);
            assert!(mcq.validate().is_ok());
            assert_eq!(mcq.assigned_marks, BigDecimal::from(1));
            assert!((1..=10).contains(&mcq.chapter));
            assert!((6..=10).contains(&mcq.grade_level));
            let QuestionBody::Mcq { options } = &mcq.body else {
                panic!("expected an MCQ body");
            };
            assert_eq!(options.len(), 4);
            assert!(options[0].is_correct);
            assert_eq!(options[0].content, format!("{} MCQ {} Option 1", subject, index));

            let qa = seed::qa_draft(subject_id, subject, index, &mut rng);
            assert!(qa.validate().is_ok());
            assert_eq!(qa.assigned_marks, BigDecimal::from(2));
            assert_eq!(qa.content, format!("{} Q&A Question {}", subject, index));
        }
    }
}

#[test]
fn test_sample_questions_are_reproducible_with_a_fixed_seed() {
    let mut first = StdRng::seed_from_u64(99);
    let mut second = StdRng::seed_from_u64(99);
    for index in 1..=5 {
        assert_eq!(
            seed::mcq_draft(1, "Math", index, &mut first),
            seed::mcq_draft(1, "Math", index, &mut second)
        );
    }
}

// verification

fn consistent_snapshot() -> Snapshot {
    Snapshot {
        exams: vec![exam_row(1, 2, 1, 1)],
        questions: vec![question_row(10, QuestionKind::Mcq), question_row(11, QuestionKind::Qa)],
        mcq_options: vec![
            option_row(100, 10, true),
            option_row(101, 10, false),
            option_row(102, 10, false),
            option_row(103, 10, false),
        ],
        qa_answers: vec![answer_row(200, 11)],
        exam_questions: vec![placement_row(10, 1, 1), placement_row(11, 1, 2)],
        ..Snapshot::default()
    }
}

#[test]
fn test_consistent_snapshot_has_no_violations() {
    assert!(inspect(&consistent_snapshot()).is_empty());
}

#[test]
fn test_inspect_flags_exam_count_mismatch() {
    let mut snapshot = consistent_snapshot();
    snapshot.exams.push(exam_row(2, 30, 20, 5));

    assert_eq!(
        inspect(&snapshot),
        vec![Violation::ExamCountMismatch {
            exam_id: 2,
            total_questions: 30,
            mcq_count: 20,
            qa_count: 5,
        }]
    );
}

#[test]
fn test_inspect_reports_overflowing_exam_counts() {
    let snapshot = Snapshot {
        exams: vec![exam_row(7, 5, i32::MAX, 1)],
        ..Snapshot::default()
    };

    assert_eq!(
        inspect(&snapshot),
        vec![Violation::ExamCountMismatch {
            exam_id: 7,
            total_questions: 5,
            mcq_count: i32::MAX,
            qa_count: 1,
        }]
    );
}

#[test]
fn test_inspect_flags_mcq_without_single_correct_option() {
    let mut snapshot = consistent_snapshot();
    snapshot.mcq_options[1].is_correct = true;
    snapshot.questions.push(question_row(12, QuestionKind::Mcq));

    let violations = inspect(&snapshot);
    assert!(violations.contains(&Violation::McqCorrectOptions {
        question_id: 10,
        correct_options: 2,
    }));
    assert!(violations.contains(&Violation::McqCorrectOptions {
        question_id: 12,
        correct_options: 0,
    }));
}

#[test]
fn test_inspect_flags_children_of_the_wrong_kind() {
    let mut snapshot = consistent_snapshot();
    snapshot.mcq_options.push(option_row(104, 11, false));
    snapshot.qa_answers.push(answer_row(201, 10));
    snapshot.questions.push(question_row(13, QuestionKind::Qa));

    let violations = inspect(&snapshot);
    assert!(violations.contains(&Violation::OptionsOnQaQuestion {
        question_id: 11,
        options: 1,
    }));
    assert!(violations.contains(&Violation::AnswersOnMcqQuestion {
        question_id: 10,
        answers: 1,
    }));
    assert!(violations.contains(&Violation::QaAnswerCount {
        question_id: 13,
        answers: 0,
    }));
}

#[test]
fn test_inspect_flags_duplicate_and_sparse_ordering() {
    let mut snapshot = consistent_snapshot();
    snapshot.exam_questions[1].order_number = 1;

    let violations = inspect(&snapshot);
    assert!(violations.contains(&Violation::DuplicateOrderNumber {
        exam_id: 1,
        order_number: 1,
    }));
    assert!(violations.contains(&Violation::SparseOrdering {
        exam_id: 1,
        placed: 2,
        total_questions: 2,
    }));
}

#[test]
fn test_partially_populated_exam_may_have_gaps() {
    let mut snapshot = consistent_snapshot();
    snapshot.exams[0] = exam_row(1, 3, 2, 1);
    snapshot.exam_questions[1].order_number = 3;

    assert!(inspect(&snapshot).is_empty());
}

#[test]
fn test_report_counts_and_samples() {
    let snapshot = consistent_snapshot();
    let report = VerificationReport::from_snapshot(&snapshot);

    assert_eq!(report.counts.exams, 1);
    assert_eq!(report.counts.questions, 2);
    assert_eq!(report.counts.mcq_questions, 1);
    assert_eq!(report.counts.qa_questions, 1);
    assert_eq!(report.counts.mcq_options, 4);
    assert_eq!(report.counts.qa_answers, 1);
    assert_eq!(report.counts.exam_questions, 2);
    assert_eq!(report.sample_questions.len(), 2);
    assert_eq!(report.sample_mcq_options.len(), 4);
    assert!(report.is_consistent());

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["counts"]["mcq_options"], 4);
    assert_eq!(json["violations"], serde_json::json!([]));
}

#[test]
fn test_violation_serializes_with_tag() {
    let violation = Violation::DuplicateOrderNumber {
        exam_id: 5,
        order_number: 2,
    };
    let json = serde_json::to_value(&violation).unwrap();
    assert_eq!(json["violation"], "duplicate_order_number");
    assert_eq!(json["exam_id"], 5);
    assert_eq!(
        violation.to_string(),
        "exam 5 uses order number 2 more than once"
    );
}

use crate::authoring::{duplicate_order_numbers, order_numbers_are_dense};
use crate::db::run_query;
use crate::errors::StoreError;
use crate::model::{
    Admin, Exam, ExamAttempt, ExamQuestion, McqOption, QaAnswer, Question, QuestionAttempt,
    QuestionKind, Student, Subject,
};
use crate::store;
use deadpool_diesel::postgres::Pool;
use diesel::PgConnection;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tracing::{info, instrument, warn};

/// Every row of every table, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub students: Vec<Student>,
    pub admins: Vec<Admin>,
    pub subjects: Vec<Subject>,
    pub exams: Vec<Exam>,
    pub questions: Vec<Question>,
    pub mcq_options: Vec<McqOption>,
    pub qa_answers: Vec<QaAnswer>,
    pub exam_questions: Vec<ExamQuestion>,
    pub exam_attempts: Vec<ExamAttempt>,
    pub question_attempts: Vec<QuestionAttempt>,
}

impl Snapshot {
    /// Reads all tables inside one read-only repeatable-read transaction, so
    /// a parent row and its children are always seen together.
    pub fn load(conn: &mut PgConnection) -> Result<Self, StoreError> {
        conn.build_transaction()
            .read_only()
            .repeatable_read()
            .run::<_, StoreError, _>(|tx_conn| {
                Ok(Snapshot {
                    students: store::account::list_students(tx_conn)?,
                    admins: store::account::list_admins(tx_conn)?,
                    subjects: store::catalog::list_subjects(tx_conn)?,
                    exams: store::catalog::list_exams(tx_conn)?,
                    questions: store::question::list_questions(tx_conn)?,
                    mcq_options: store::question::list_mcq_options(tx_conn)?,
                    qa_answers: store::question::list_qa_answers(tx_conn)?,
                    exam_questions: store::catalog::list_exam_questions(tx_conn)?,
                    exam_attempts: store::attempt::list_exam_attempts(tx_conn)?,
                    question_attempts: store::attempt::list_question_attempts(tx_conn)?,
                })
            })
    }
}

/// A stored row set that breaks one of the data-model contracts.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "violation", rename_all = "snake_case")]
pub enum Violation {
    ExamCountMismatch {
        exam_id: i32,
        total_questions: i32,
        mcq_count: i32,
        qa_count: i32,
    },
    McqCorrectOptions {
        question_id: i32,
        correct_options: usize,
    },
    QaAnswerCount {
        question_id: i32,
        answers: usize,
    },
    OptionsOnQaQuestion {
        question_id: i32,
        options: usize,
    },
    AnswersOnMcqQuestion {
        question_id: i32,
        answers: usize,
    },
    DuplicateOrderNumber {
        exam_id: i32,
        order_number: i32,
    },
    SparseOrdering {
        exam_id: i32,
        placed: usize,
        total_questions: i32,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::ExamCountMismatch {
                exam_id,
                total_questions,
                mcq_count,
                qa_count,
            } => write!(
                f,
                "exam {}: mcq_count {} + qa_count {} != total_questions {}",
                exam_id, mcq_count, qa_count, total_questions
            ),
            Violation::McqCorrectOptions {
                question_id,
                correct_options,
            } => write!(
                f,
                "MCQ question {} has {} correct options, expected 1",
                question_id, correct_options
            ),
            Violation::QaAnswerCount {
                question_id,
                answers,
            } => write!(
                f,
                "QA question {} has {} model answers, expected 1",
                question_id, answers
            ),
            Violation::OptionsOnQaQuestion {
                question_id,
                options,
            } => write!(f, "QA question {} carries {} MCQ options", question_id, options),
            Violation::AnswersOnMcqQuestion {
                question_id,
                answers,
            } => write!(
                f,
                "MCQ question {} carries {} model answers",
                question_id, answers
            ),
            Violation::DuplicateOrderNumber {
                exam_id,
                order_number,
            } => write!(
                f,
                "exam {} uses order number {} more than once",
                exam_id, order_number
            ),
            Violation::SparseOrdering {
                exam_id,
                placed,
                total_questions,
            } => write!(
                f,
                "exam {} is fully populated ({} of {}) but its order numbers are not 1..={}",
                exam_id, placed, total_questions, total_questions
            ),
        }
    }
}

/// Checks every stored row against the data-model contracts.
pub fn inspect(snapshot: &Snapshot) -> Vec<Violation> {
    let mut violations = Vec::new();

    for exam in &snapshot.exams {
        if exam.mcq_count.checked_add(exam.qa_count) != Some(exam.total_questions) {
            violations.push(Violation::ExamCountMismatch {
                exam_id: exam.id,
                total_questions: exam.total_questions,
                mcq_count: exam.mcq_count,
                qa_count: exam.qa_count,
            });
        }
    }

    let mut options_by_question: HashMap<i32, (usize, usize)> = HashMap::new();
    for option in &snapshot.mcq_options {
        let entry = options_by_question.entry(option.question_id).or_default();
        entry.0 += 1;
        if option.is_correct {
            entry.1 += 1;
        }
    }
    let mut answers_by_question: HashMap<i32, usize> = HashMap::new();
    for answer in &snapshot.qa_answers {
        *answers_by_question.entry(answer.question_id).or_default() += 1;
    }

    for question in &snapshot.questions {
        let (options, correct) = options_by_question
            .get(&question.id)
            .copied()
            .unwrap_or((0, 0));
        let answers = answers_by_question.get(&question.id).copied().unwrap_or(0);

        match question.kind {
            QuestionKind::Mcq => {
                if correct != 1 {
                    violations.push(Violation::McqCorrectOptions {
                        question_id: question.id,
                        correct_options: correct,
                    });
                }
                if answers > 0 {
                    violations.push(Violation::AnswersOnMcqQuestion {
                        question_id: question.id,
                        answers,
                    });
                }
            }
            QuestionKind::Qa => {
                if answers != 1 {
                    violations.push(Violation::QaAnswerCount {
                        question_id: question.id,
                        answers,
                    });
                }
                if options > 0 {
                    violations.push(Violation::OptionsOnQaQuestion {
                        question_id: question.id,
                        options,
                    });
                }
            }
        }
    }

    let mut orders_by_exam: HashMap<i32, Vec<i32>> = HashMap::new();
    for placement in &snapshot.exam_questions {
        orders_by_exam
            .entry(placement.exam_id)
            .or_default()
            .push(placement.order_number);
    }
    for exam in &snapshot.exams {
        let Some(orders) = orders_by_exam.get(&exam.id) else {
            continue;
        };
        for order_number in duplicate_order_numbers(orders) {
            violations.push(Violation::DuplicateOrderNumber {
                exam_id: exam.id,
                order_number,
            });
        }
        let fully_populated = usize::try_from(exam.total_questions).ok() == Some(orders.len());
        if fully_populated && !order_numbers_are_dense(orders, exam.total_questions) {
            violations.push(Violation::SparseOrdering {
                exam_id: exam.id,
                placed: orders.len(),
                total_questions: exam.total_questions,
            });
        }
    }

    violations
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TableCounts {
    pub students: usize,
    pub admins: usize,
    pub subjects: usize,
    pub exams: usize,
    pub questions: usize,
    pub mcq_questions: usize,
    pub qa_questions: usize,
    pub mcq_options: usize,
    pub qa_answers: usize,
    pub exam_questions: usize,
    pub exam_attempts: usize,
    pub question_attempts: usize,
}

#[derive(Serialize, Debug, Clone)]
pub struct VerificationReport {
    pub counts: TableCounts,
    pub subjects: Vec<Subject>,
    pub exams: Vec<Exam>,
    pub sample_questions: Vec<Question>,
    pub sample_mcq_options: Vec<McqOption>,
    pub sample_qa_answers: Vec<QaAnswer>,
    pub sample_exam_questions: Vec<ExamQuestion>,
    pub violations: Vec<Violation>,
}

impl VerificationReport {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let count_kind = |kind: QuestionKind| snapshot.questions.iter().filter(|q| q.kind == kind).count();

        VerificationReport {
            counts: TableCounts {
                students: snapshot.students.len(),
                admins: snapshot.admins.len(),
                subjects: snapshot.subjects.len(),
                exams: snapshot.exams.len(),
                questions: snapshot.questions.len(),
                mcq_questions: count_kind(QuestionKind::Mcq),
                qa_questions: count_kind(QuestionKind::Qa),
                mcq_options: snapshot.mcq_options.len(),
                qa_answers: snapshot.qa_answers.len(),
                exam_questions: snapshot.exam_questions.len(),
                exam_attempts: snapshot.exam_attempts.len(),
                question_attempts: snapshot.question_attempts.len(),
            },
            subjects: snapshot.subjects.clone(),
            exams: snapshot.exams.clone(),
            sample_questions: sample(&snapshot.questions, 2),
            sample_mcq_options: sample(&snapshot.mcq_options, 4),
            sample_qa_answers: sample(&snapshot.qa_answers, 2),
            sample_exam_questions: sample(&snapshot.exam_questions, 3),
            violations: inspect(snapshot),
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.violations.is_empty()
    }

    /// Writes the report through `tracing` at info level, violations at warn.
    pub fn log(&self) {
        let c = &self.counts;
        info!("Subjects: {}", c.subjects);
        for subject in &self.subjects {
            info!("  {:?}", subject);
        }
        info!("Exams: {}", c.exams);
        for exam in &self.exams {
            info!("  {:?}", exam);
        }
        info!("Questions: {} (MCQ {}, QA {})", c.questions, c.mcq_questions, c.qa_questions);
        for question in &self.sample_questions {
            info!("  {:?}", question);
        }
        info!("MCQ Options: {}", c.mcq_options);
        for option in &self.sample_mcq_options {
            info!("  {:?}", option);
        }
        info!("QA Answers: {}", c.qa_answers);
        for answer in &self.sample_qa_answers {
            info!("  {:?}", answer);
        }
        info!("Exam Questions: {}", c.exam_questions);
        for placement in &self.sample_exam_questions {
            info!("  {:?}", placement);
        }
        info!(
            "Students: {}, Admins: {}, Exam Attempts: {}, Question Attempts: {}",
            c.students, c.admins, c.exam_attempts, c.question_attempts
        );

        if self.violations.is_empty() {
            info!("No data-model violations found");
        } else {
            warn!("{} data-model violations found", self.violations.len());
            for violation in &self.violations {
                warn!("  {}", violation);
            }
        }
    }
}

fn sample<T: Clone>(rows: &[T], limit: usize) -> Vec<T> {
    rows.iter().take(limit).cloned().collect()
}

#[instrument(skip(pool))]
pub async fn run(pool: &Pool) -> Result<VerificationReport, StoreError> {
    info!("Verifying database contents...");
    let snapshot = run_query(pool, Snapshot::load).await?;
    Ok(VerificationReport::from_snapshot(&snapshot))
}

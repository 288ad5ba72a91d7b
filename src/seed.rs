use crate::authoring::{self, OptionDraft, QuestionBody, QuestionDraft};
use crate::db::run_query;
use crate::errors::StoreError;
use crate::model::{Difficulty, ExamKind, NewExam, NewSubject, QuestionKind};
use crate::store;
use bigdecimal::BigDecimal;
use deadpool_diesel::postgres::Pool;
use diesel::PgConnection;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, instrument};

pub const SUBJECT_NAMES: [&str; 7] = [
    "History",
    "Geography",
    "Physics",
    "Chemistry",
    "Biology",
    "Math",
    "Computer Applications",
];

pub const EXAM_TOTAL_QUESTIONS: i32 = 30;
pub const EXAM_MCQ_COUNT: i32 = 20;
pub const EXAM_QA_COUNT: i32 = 10;
pub const LIVE_EXAM_MINUTES: i32 = 120;

const OPTIONS_PER_MCQ: usize = 4;

#[derive(Debug, Clone)]
pub struct SeedOptions {
    /// MCQ and QA questions generated per subject (each).
    pub questions_per_subject: u32,
    /// Fixes the sample data generator; `None` draws from OS entropy.
    pub rng_seed: Option<u64>,
}

impl Default for SeedOptions {
    fn default() -> Self {
        SeedOptions {
            questions_per_subject: 3,
            rng_seed: None,
        }
    }
}

#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub subjects_created: usize,
    pub subjects_existing: usize,
    pub exams_created: usize,
    pub exams_existing: usize,
    pub mcq_questions: usize,
    pub qa_questions: usize,
    pub placements: usize,
}

/// Display name of an exam template, e.g. `"Physics Live Exam"`.
pub fn exam_name(subject: &str, kind: ExamKind) -> String {
    match kind {
        ExamKind::Practice => format!("{} Practice Test", subject),
        ExamKind::Live => format!("{} Live Exam", subject),
    }
}

/// The practice and live templates every subject gets. Practice runs are
/// untimed with free navigation; live sittings last two hours in fixed order.
pub fn exam_templates(subject_id: i32, subject: &str) -> [NewExam; 2] {
    [ExamKind::Practice, ExamKind::Live].map(|kind| NewExam {
        subject_id,
        name: exam_name(subject, kind),
        kind,
        duration: match kind {
            ExamKind::Live => Some(LIVE_EXAM_MINUTES),
            ExamKind::Practice => None,
        },
        total_questions: EXAM_TOTAL_QUESTIONS,
        mcq_count: EXAM_MCQ_COUNT,
        qa_count: EXAM_QA_COUNT,
        negative_marking: false,
        free_navigation: kind == ExamKind::Practice,
    })
}

/// Sample MCQ number `index` for a subject: one mark, four options, the
/// first one correct.
pub fn mcq_draft<R: Rng>(subject_id: i32, subject: &str, index: u32, rng: &mut R) -> QuestionDraft {
    let options = (1..=OPTIONS_PER_MCQ)
        .map(|j| OptionDraft::new(format!("{} MCQ {} Option {}", subject, index, j), j == 1))
        .collect();

    QuestionDraft {
        subject_id,
        content: format!("{} MCQ Question {}", subject, index),
        difficulty: random_difficulty(rng),
        assigned_marks: BigDecimal::from(1),
        chapter: rng.gen_range(1..=10),
        grade_level: rng.gen_range(6..=10),
        body: QuestionBody::Mcq { options },
    }
}

/// Sample open-answer question number `index` for a subject, worth two marks.
pub fn qa_draft<R: Rng>(subject_id: i32, subject: &str, index: u32, rng: &mut R) -> QuestionDraft {
    QuestionDraft {
        subject_id,
        content: format!("{} Q&A Question {}", subject, index),
        difficulty: random_difficulty(rng),
        assigned_marks: BigDecimal::from(2),
        chapter: rng.gen_range(1..=10),
        grade_level: rng.gen_range(6..=10),
        body: QuestionBody::Qa {
            answer: format!("Model answer for {} Q&A {}", subject, index),
            explanation: format!("Explanation for {} Q&A {}", subject, index),
        },
    }
}

fn random_difficulty<R: Rng>(rng: &mut R) -> Difficulty {
    Difficulty::ALL[rng.gen_range(0..Difficulty::ALL.len())]
}

/// Seeds reference data and sample questions.
///
/// Subjects and exam templates are conditionally inserted, so re-running is
/// safe for them; every run adds a fresh batch of sample questions. Each
/// subject's questions and placements are written in their own transaction.
#[instrument(skip(pool))]
pub async fn run(pool: &Pool, options: &SeedOptions) -> Result<SeedSummary, StoreError> {
    info!("Seeding database...");

    let seed = options.rng_seed;
    let per_subject = options.questions_per_subject;

    let summary = run_query(pool, move |conn| {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut summary = SeedSummary::default();

        seed_subjects(conn, &mut summary)?;

        for name in SUBJECT_NAMES {
            let subject = store::catalog::find_subject_by_name(conn, name)?.ok_or_else(|| {
                StoreError::NotFound(format!("Subject '{}' vanished while seeding", name))
            })?;
            seed_exams(conn, subject.id, name, &mut summary)?;
            seed_questions(conn, subject.id, name, per_subject, &mut rng, &mut summary)?;
        }

        Ok::<_, StoreError>(summary)
    })
    .await?;

    info!("Database seeded successfully: {:?}", summary);
    Ok(summary)
}

fn seed_subjects(conn: &mut PgConnection, summary: &mut SeedSummary) -> Result<(), StoreError> {
    for name in SUBJECT_NAMES {
        match store::catalog::insert_subject_if_absent(conn, &NewSubject::named(name))? {
            Some(id) => {
                debug!("Created subject '{}' with id {}", name, id);
                summary.subjects_created += 1;
            }
            None => summary.subjects_existing += 1,
        }
    }
    Ok(())
}

fn seed_exams(
    conn: &mut PgConnection,
    subject_id: i32,
    subject: &str,
    summary: &mut SeedSummary,
) -> Result<(), StoreError> {
    for template in exam_templates(subject_id, subject) {
        match authoring::create_exam_if_absent(conn, &template)? {
            Some(_) => summary.exams_created += 1,
            None => summary.exams_existing += 1,
        }
    }
    Ok(())
}

fn seed_questions(
    conn: &mut PgConnection,
    subject_id: i32,
    subject: &str,
    per_subject: u32,
    rng: &mut StdRng,
    summary: &mut SeedSummary,
) -> Result<(), StoreError> {
    use diesel::Connection;

    let drafts: Vec<QuestionDraft> = (1..=per_subject)
        .flat_map(|i| [mcq_draft(subject_id, subject, i, rng), qa_draft(subject_id, subject, i, rng)])
        .collect();

    conn.transaction::<_, StoreError, _>(|tx_conn| {
        let mut mcq_ids = Vec::new();
        let mut qa_ids = Vec::new();
        for draft in &drafts {
            let authored = authoring::author_question(tx_conn, draft)?;
            match authored.kind {
                QuestionKind::Mcq => mcq_ids.push(authored.question_id),
                QuestionKind::Qa => qa_ids.push(authored.question_id),
            }
        }
        summary.mcq_questions += mcq_ids.len();
        summary.qa_questions += qa_ids.len();

        for exam in store::catalog::list_exams_by_subject(tx_conn, subject_id)? {
            // Held until commit so the room computed below stays accurate.
            store::catalog::lock_exam(tx_conn, exam.id)?;
            let placed_kinds = store::catalog::list_exam_question_kinds(tx_conn, exam.id)?;
            let mcq_placed = authoring::count_kind(&placed_kinds, QuestionKind::Mcq);
            let qa_placed = authoring::count_kind(&placed_kinds, QuestionKind::Qa);

            let mcq_room = usize::try_from(exam.mcq_count.saturating_sub(mcq_placed)).unwrap_or(0);
            let qa_room = usize::try_from(exam.qa_count.saturating_sub(qa_placed)).unwrap_or(0);
            let batch: Vec<i32> = mcq_ids
                .iter()
                .take(mcq_room)
                .chain(qa_ids.iter().take(qa_room))
                .copied()
                .collect();
            if batch.is_empty() {
                continue;
            }
            summary.placements += authoring::place_questions(tx_conn, exam.id, &batch)?.len();
        }
        Ok(())
    })?;

    debug!("Seeded {} questions for '{}'", drafts.len(), subject);
    Ok(())
}

pub mod account;
pub mod attempt;
pub mod catalog;
pub mod kinds;
pub mod question;

pub use account::{Admin, NewAdmin, NewStudent, Student};
pub use attempt::{AttemptCompletion, ExamAttempt, NewExamAttempt, NewQuestionAttempt, QuestionAttempt};
pub use catalog::{Exam, ExamQuestion, NewExam, NewExamQuestion, NewSubject, Subject};
pub use kinds::{AttemptStatus, Difficulty, ExamKind, QuestionKind, UnknownVariant};
pub use question::{McqOption, NewMcqOption, NewQaAnswer, NewQuestion, QaAnswer, Question};

mod answers;
mod bank;
mod engine;

pub use answers::RiskAnswers;
pub use bank::{Question, QuestionBank};
pub use engine::{QuizEngine, DEFAULT_VALIDATION_MESSAGE};

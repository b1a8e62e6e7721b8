pub mod question_bank;

pub use question_bank::{QuestionBank, StaticQuestionBank};

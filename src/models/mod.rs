pub mod bank;
pub mod grade;
pub mod loaders;
pub mod paper;
pub mod question;
pub mod section;
pub mod subject;

pub use bank::{bank_key, BankFile, ChapterEntries};
pub use grade::Grade;
pub use loaders::{load_bank_file, load_bank_folder};
pub use paper::{ExportedArtifact, PaperHeader, PaperMetadata, SavedPaper};
pub use question::{BankEntry, BilingualText, McqOption, Outline, Question, QuestionKind, QuestionType};
pub use section::{parse_sections, required_counts, PaperTotals, SectionRequest, SelectionSummary};
pub use subject::Subject;

pub mod paper_assembler;
pub mod paper_exporter;
pub mod paper_renderer;

pub use paper_assembler::{commit, compute_totals, randomize, validate_for_export, PaperAssembler};
pub use paper_exporter::{PaperExporter, TextPaperExporter};
pub use paper_renderer::{answer_key, AnswerKeyRow, PaperRenderer};

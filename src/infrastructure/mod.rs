pub mod artifact_writer;
pub mod paper_store;

pub use artifact_writer::ArtifactWriter;
pub use paper_store::{download_paper, JsonFileStore, MemoryStore, PaperStore, SavedPapersState};

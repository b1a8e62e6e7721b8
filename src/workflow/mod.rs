pub mod paper_session;

pub use paper_session::PaperSession;

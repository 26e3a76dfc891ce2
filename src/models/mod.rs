pub mod book;
pub mod run_state;

pub use book::{BookRequest, GeneratedImage, GeneratedPage, MAX_PAGE_COUNT};
pub use run_state::{RunProgress, RunState};

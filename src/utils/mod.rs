pub mod filename;
pub mod logging;

pub use filename::{document_file_name, is_plain_file_name, page_file_name, sanitize_theme};

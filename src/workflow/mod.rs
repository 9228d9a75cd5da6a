pub mod file_flow;
pub mod listening_section;
pub mod question_parser;
pub mod reading_section;

pub use file_flow::{FileFlow, FileResult, RootKind};
pub use listening_section::{parse_listening_section, ListeningQuestion};
pub use reading_section::parse_reading_section;

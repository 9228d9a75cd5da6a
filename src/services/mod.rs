pub mod choice_extractor;
pub mod chunk_builder;
pub mod content_parser;
pub mod diagnostics;
pub mod flatten;
pub mod text_classifier;
pub mod warn_writer;
pub mod word_order;

pub use chunk_builder::build_chunks;
pub use diagnostics::Diagnostics;
pub use flatten::{flatten_text, flatten_with_answers};
pub use text_classifier::{classify, normalize_whitespace};
pub use warn_writer::WarnWriter;

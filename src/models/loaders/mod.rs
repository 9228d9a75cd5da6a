pub mod markup_loader;

pub use markup_loader::{load_sources, parse_jsonl, test_id_for, LoadedSources, ROOT_TEST_ID};

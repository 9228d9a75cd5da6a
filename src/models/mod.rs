pub mod chunk;
pub mod choice;
pub mod content;
pub mod diagnostic;
pub mod loaders;
pub mod question;
pub mod section;
pub mod source_file;
pub mod test_document;

pub use chunk::{Chunk, Conversation, ConversationLine, Sentence, Text};
pub use choice::Choice;
pub use content::{Content, ContentKind};
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use loaders::{load_sources, LoadedSources};
pub use question::{
    AnswerIndex, ContentQuestion, JapaneseTranslateWordOrderCombination, Question, Reallife,
    ReallifePart, SelectResponseByConversation, SelectSentenceByEnglishSentence,
    SelectTrueSentence, SentenceCompletion, ShortSentenceCloze,
};
pub use section::{ListeningSection, ReadContentPart, ReadingSection};
pub use source_file::SourceFile;
pub use test_document::TestDocument;

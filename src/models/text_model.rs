//! A buffer held by the editor host.

use crate::kernel::language::LanguageId;
use crate::kernel::services::adapters::searcher::LiteralSearcher;
use crate::kernel::services::ports::search::Match;
use ropey::Rope;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("model {0} is read-only")]
pub struct ReadOnlyError(pub String);

#[derive(Debug, Clone)]
pub struct TextModel {
    uri: String,
    language: Option<LanguageId>,
    rope: Rope,
    read_only: bool,
    version: u64,
}

impl TextModel {
    pub fn new(uri: impl Into<String>, content: &str, language: Option<LanguageId>) -> Self {
        Self {
            uri: uri.into(),
            language,
            rope: Rope::from_str(content),
            read_only: false,
            version: 1,
        }
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn language(&self) -> Option<LanguageId> {
        self.language
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    pub fn set_text(&mut self, content: &str) -> Result<(), ReadOnlyError> {
        if self.read_only {
            return Err(ReadOnlyError(self.uri.clone()));
        }
        self.rope = Rope::from_str(content);
        self.version = self.version.saturating_add(1);
        Ok(())
    }

    /// Literal, case-sensitive matches in offset order.
    pub fn find_matches(&self, query: &str) -> Vec<Match> {
        match LiteralSearcher::new(query) {
            Some(searcher) => searcher.find_in_chunks(self.rope.chunks()),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/text_model.rs"]
mod tests;

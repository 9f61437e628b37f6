//! Editor host contract: the code-editing component the bootstrap pipeline configures.

use super::search::Match;
use crate::kernel::language::LanguageId;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// URI of the browser DOM typings bundled with the host. Never a search target.
pub const DOM_LIB_URI: &str = "file:///lib.dom.d.ts";

/// 1-based cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const START: Self = Self { line: 1, column: 1 };

    pub fn new(line: u32, column: u32) -> Self {
        Self {
            line: line.max(1),
            column: column.max(1),
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

/// Request from the host to reveal a code location in the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorOpenRequest {
    pub uri: String,
    pub position: Option<Position>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptTarget {
    Es3 = 0,
    Es5 = 1,
    Es2015 = 2,
    Es2016 = 3,
    Es2017 = 4,
    Es2018 = 5,
    Es2019 = 6,
    Es2020 = 7,
    Es2021 = 8,
    Es2022 = 9,
    EsNext = 99,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    None = 0,
    CommonJs = 1,
    Amd = 2,
    Umd = 3,
    System = 4,
    Es2015 = 5,
    Es2020 = 6,
    Es2022 = 7,
    EsNext = 99,
    Node16 = 100,
    NodeNext = 199,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleResolution {
    Classic = 1,
    NodeJs = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsxEmit {
    None = 0,
    Preserve = 1,
    React = 2,
    ReactNative = 3,
    ReactJsx = 4,
    ReactJsxDev = 5,
}

/// Compiler options in the host's language-service vocabulary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompilerOptions {
    pub target: Option<ScriptTarget>,
    pub module: Option<ModuleKind>,
    pub module_resolution: Option<ModuleResolution>,
    pub jsx: Option<JsxEmit>,
    pub strict: Option<bool>,
    pub allow_js: Option<bool>,
    pub base_url: Option<String>,
    pub paths: BTreeMap<String, Vec<String>>,
    pub lib: Vec<String>,
    pub types: Vec<String>,
    /// Keys without a typed counterpart, forwarded as-is.
    pub extra: Map<String, Value>,
}

/// A highlighted span inside one line, in byte offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSpan {
    pub start: usize,
    pub end: usize,
    pub scope: &'static str,
}

pub trait TokenProvider: Send + Sync {
    fn supports(&self, language: LanguageId) -> bool;

    fn tokenize(&self, language: LanguageId, text: &str) -> Vec<Vec<TokenSpan>>;

    fn themes(&self) -> Vec<&str>;
}

pub trait LinkOpener: Send + Sync {
    /// Returns `true` when the link was handled.
    fn open(&self, url: &str) -> bool;
}

pub trait EditOpener: Send + Sync {
    fn open_code_editor(&self, uri: &str, position: Option<Position>) -> bool;
}

/// Snapshot of one buffer held by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    pub uri: String,
    pub language: Option<LanguageId>,
    pub read_only: bool,
}

pub trait EditorHost: Send + Sync {
    fn register_language(&self, language: LanguageId);

    fn set_token_provider(&self, provider: Arc<dyn TokenProvider>);

    fn set_theme(&self, theme: &str);

    fn set_eager_model_sync(&self, enabled: bool);

    fn set_compiler_options(&self, options: CompilerOptions);

    fn add_extra_lib(&self, content: String, uri: String);

    /// Returns `false` when a model with `uri` already exists.
    fn create_model(
        &self,
        content: String,
        language: Option<LanguageId>,
        uri: String,
        read_only: bool,
    ) -> bool;

    fn has_model(&self, uri: &str) -> bool;

    fn models(&self) -> Vec<ModelInfo>;

    fn register_link_opener(&self, opener: Box<dyn LinkOpener>);

    fn register_edit_opener(&self, opener: Box<dyn EditOpener>);

    /// Literal matches of `query` in the buffer at `uri`, in offset order.
    fn find_matches(&self, uri: &str, query: &str) -> Vec<Match>;
}

//! Tree-sitter backed syntax highlighter and the bundled color themes.

use crate::kernel::language::LanguageId;
use crate::kernel::services::ports::editor::{TokenProvider, TokenSpan};
use rustc_hash::FxHashMap;
use tree_sitter::{Node, Parser, Tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightKind {
    Comment,
    String,
    Keyword,
    Type,
    Number,
    Attribute,
    Function,
    Property,
}

impl HighlightKind {
    pub const ALL: [Self; 8] = [
        Self::Comment,
        Self::String,
        Self::Keyword,
        Self::Type,
        Self::Number,
        Self::Attribute,
        Self::Function,
        Self::Property,
    ];

    /// TextMate scope the host themes key on.
    pub fn scope(self) -> &'static str {
        match self {
            Self::Comment => "comment",
            Self::String => "string",
            Self::Keyword => "keyword",
            Self::Type => "entity.name.type",
            Self::Number => "constant.numeric",
            Self::Attribute => "entity.other.attribute-name",
            Self::Function => "entity.name.function",
            Self::Property => "variable.other.property",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightSpan {
    pub start: usize,
    pub end: usize,
    pub kind: HighlightKind,
}

#[derive(Debug)]
pub struct Theme {
    pub name: &'static str,
    pub dark: bool,
    pub foreground: &'static str,
    pub background: &'static str,
    /// Indexed like [`HighlightKind::ALL`].
    palette: [&'static str; 8],
}

impl Theme {
    pub fn color(&self, kind: HighlightKind) -> &'static str {
        let index = HighlightKind::ALL
            .iter()
            .position(|k| *k == kind)
            .unwrap_or_default();
        self.palette[index]
    }
}

pub static THEMES: [Theme; 4] = [
    Theme {
        name: "min-light",
        dark: false,
        foreground: "#212121",
        background: "#ffffff",
        palette: [
            "#c2c3c5", "#22aa44", "#d32f2f", "#1976d2", "#1976d2", "#6f42c1", "#6f42c1",
            "#212121",
        ],
    },
    Theme {
        name: "houston",
        dark: true,
        foreground: "#eef0f9",
        background: "#17191e",
        palette: [
            "#545864", "#ffd493", "#4bf3c8", "#00daef", "#ffd493", "#acafff", "#00daef",
            "#eef0f9",
        ],
    },
    Theme {
        name: "github-light",
        dark: false,
        foreground: "#24292e",
        background: "#ffffff",
        palette: [
            "#6a737d", "#032f62", "#d73a49", "#6f42c1", "#005cc5", "#22863a", "#6f42c1",
            "#005cc5",
        ],
    },
    Theme {
        name: "github-dark",
        dark: true,
        foreground: "#e1e4e8",
        background: "#24292e",
        palette: [
            "#6a737d", "#9ecbff", "#f97583", "#b392f0", "#79b8ff", "#85e89d", "#b392f0",
            "#79b8ff",
        ],
    },
];

pub fn find_theme(name: &str) -> Option<&'static Theme> {
    THEMES.iter().find(|theme| theme.name == name)
}

#[derive(Debug, thiserror::Error)]
pub enum HighlighterError {
    #[error("no languages requested")]
    NoLanguages,
    #[error("no themes requested")]
    NoThemes,
    #[error("unknown theme `{0}`")]
    UnknownTheme(String),
    #[error("cannot load {language} grammar: {message}")]
    Grammar {
        language: &'static str,
        message: String,
    },
}

pub struct Highlighter {
    languages: Vec<LanguageId>,
    grammars: FxHashMap<LanguageId, tree_sitter::Language>,
    themes: Vec<&'static Theme>,
}

impl std::fmt::Debug for Highlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Highlighter")
            .field("languages", &self.languages)
            .field(
                "themes",
                &self.themes.iter().map(|t| t.name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Highlighter {
    /// Loads every grammar and theme up front. Languages without a grammar are plain text.
    pub fn new<S: AsRef<str>>(
        languages: &[LanguageId],
        themes: &[S],
    ) -> Result<Self, HighlighterError> {
        if languages.is_empty() {
            return Err(HighlighterError::NoLanguages);
        }
        if themes.is_empty() {
            return Err(HighlighterError::NoThemes);
        }

        let mut grammars = FxHashMap::default();
        let mut parser = Parser::new();
        for language in languages {
            let Some(grammar) = language.grammar() else {
                continue;
            };
            parser
                .set_language(grammar)
                .map_err(|e| HighlighterError::Grammar {
                    language: language.display_name(),
                    message: e.to_string(),
                })?;
            grammars.insert(*language, grammar);
        }

        let themes = themes
            .iter()
            .map(|name| {
                find_theme(name.as_ref())
                    .ok_or_else(|| HighlighterError::UnknownTheme(name.as_ref().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut languages = languages.to_vec();
        languages.dedup();
        tracing::debug!(
            languages = languages.len(),
            grammars = grammars.len(),
            themes = themes.len(),
            "highlighter ready"
        );
        Ok(Self {
            languages,
            grammars,
            themes,
        })
    }

    pub fn languages(&self) -> &[LanguageId] {
        &self.languages
    }

    pub fn theme(&self, name: &str) -> Option<&'static Theme> {
        self.themes.iter().copied().find(|theme| theme.name == name)
    }

    /// `name` when it was loaded, otherwise the first loaded theme.
    pub fn resolve_theme(&self, name: &str) -> &'static Theme {
        self.theme(name).unwrap_or(self.themes[0])
    }

    /// Per-line spans with offsets relative to each line start.
    pub fn highlight(&self, language: LanguageId, text: &str) -> Vec<Vec<HighlightSpan>> {
        let line_starts = line_starts(text);
        let mut per_line = vec![Vec::new(); line_starts.len()];

        let Some(tree) = self.parse(language, text) else {
            return per_line;
        };

        for span in collect_highlights(&tree) {
            let first = line_of(&line_starts, span.start);
            let last = line_of(&line_starts, span.end.saturating_sub(1).max(span.start));
            for line in first..=last {
                let line_start = line_starts[line];
                let line_end = line_starts
                    .get(line + 1)
                    .map(|next| next - 1)
                    .unwrap_or(text.len());
                let s = span.start.max(line_start);
                let e = span.end.min(line_end);
                if s >= e {
                    continue;
                }
                per_line[line].push(HighlightSpan {
                    start: s - line_start,
                    end: e - line_start,
                    kind: span.kind,
                });
            }
        }

        for spans in &mut per_line {
            spans.sort_by(|a, b| a.start.cmp(&b.start).then(a.end.cmp(&b.end)));
            merge_adjacent_spans(spans);
        }
        per_line
    }

    fn parse(&self, language: LanguageId, text: &str) -> Option<Tree> {
        let grammar = self.grammars.get(&language)?;
        let mut parser = Parser::new();
        parser.set_language(*grammar).ok()?;
        parser.parse(text, None)
    }
}

impl TokenProvider for Highlighter {
    fn supports(&self, language: LanguageId) -> bool {
        self.languages.contains(&language)
    }

    fn tokenize(&self, language: LanguageId, text: &str) -> Vec<Vec<TokenSpan>> {
        self.highlight(language, text)
            .into_iter()
            .map(|line| {
                line.into_iter()
                    .map(|span| TokenSpan {
                        start: span.start,
                        end: span.end,
                        scope: span.kind.scope(),
                    })
                    .collect()
            })
            .collect()
    }

    fn themes(&self) -> Vec<&str> {
        self.themes.iter().map(|theme| theme.name).collect()
    }
}

fn line_starts(text: &str) -> Vec<usize> {
    let mut starts = vec![0];
    starts.extend(memchr::memchr_iter(b'\n', text.as_bytes()).map(|nl| nl + 1));
    starts
}

fn line_of(line_starts: &[usize], byte: usize) -> usize {
    match line_starts.binary_search(&byte) {
        Ok(line) => line,
        Err(next) => next.saturating_sub(1),
    }
}

fn collect_highlights(tree: &Tree) -> Vec<HighlightSpan> {
    let mut stack = vec![tree.root_node()];
    let mut spans = Vec::new();

    while let Some(node) = stack.pop() {
        if let Some(kind) = classify_node(node) {
            spans.push(HighlightSpan {
                start: node.start_byte(),
                end: node.end_byte(),
                kind,
            });
            if matches!(
                kind,
                HighlightKind::Comment | HighlightKind::String | HighlightKind::Attribute
            ) {
                continue;
            }
        }

        for i in (0..node.child_count()).rev() {
            if let Some(child) = node.child(i) {
                stack.push(child);
            }
        }
    }

    spans.sort_by(|a, b| a.start.cmp(&b.start).then(a.end.cmp(&b.end)));
    spans
}

fn classify_node(node: Node<'_>) -> Option<HighlightKind> {
    let kind = node.kind();
    if !node.is_named() {
        // Anonymous word tokens are the grammar's keywords.
        let is_word =
            !kind.is_empty() && kind.chars().all(|c| c.is_ascii_alphabetic() || c == '_');
        return is_word.then_some(HighlightKind::Keyword);
    }
    if kind.contains("comment") {
        return Some(HighlightKind::Comment);
    }
    if kind.contains("string") || matches!(kind, "char_literal" | "raw_text") {
        return Some(HighlightKind::String);
    }
    if kind.contains("integer") || kind.contains("float") || kind.contains("number") {
        return Some(HighlightKind::Number);
    }
    if matches!(
        kind,
        "type_identifier" | "primitive_type" | "predefined_type" | "tag_name"
    ) {
        return Some(HighlightKind::Type);
    }
    if matches!(
        kind,
        "attribute_item" | "inner_attribute_item" | "decorator" | "attribute_name"
    ) {
        return Some(HighlightKind::Attribute);
    }
    if matches!(kind, "true" | "false" | "null" | "none" | "boolean") {
        return Some(HighlightKind::Number);
    }
    if matches!(
        kind,
        "property_identifier" | "field_identifier" | "property_name" | "bare_key"
    ) {
        return Some(HighlightKind::Property);
    }
    if kind == "identifier" {
        let parent = node.parent()?;
        let field = match parent.kind() {
            "call_expression" | "call" => "function",
            "function_declaration"
            | "function_item"
            | "function_definition"
            | "method_definition" => "name",
            _ => return None,
        };
        let is_field = parent
            .child_by_field_name(field)
            .is_some_and(|f| f.id() == node.id());
        return is_field.then_some(HighlightKind::Function);
    }
    None
}

fn merge_adjacent_spans(spans: &mut Vec<HighlightSpan>) {
    if spans.len() <= 1 {
        return;
    }

    let mut out: Vec<HighlightSpan> = Vec::with_capacity(spans.len());
    for span in spans.drain(..) {
        if let Some(prev) = out.last_mut() {
            if prev.kind == span.kind && span.start <= prev.end {
                prev.end = prev.end.max(span.end);
                continue;
            }
        }
        out.push(span);
    }
    *spans = out;
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/bootstrap/highlighter.rs"]
mod tests;

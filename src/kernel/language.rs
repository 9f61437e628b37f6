use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum LanguageId {
    Rust,
    Go,
    Python,
    JavaScript,
    TypeScript,
    Jsx,
    Tsx,
    Json,
    Css,
    Html,
    Toml,
    Bash,
    Markdown,
}

impl LanguageId {
    pub const ALL: [Self; 13] = [
        Self::Rust,
        Self::Go,
        Self::Python,
        Self::JavaScript,
        Self::TypeScript,
        Self::Jsx,
        Self::Tsx,
        Self::Json,
        Self::Css,
        Self::Html,
        Self::Toml,
        Self::Bash,
        Self::Markdown,
    ];

    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name().and_then(|s| s.to_str())?;
        if name.ends_with(".d.ts") {
            return Some(Self::TypeScript);
        }
        match path.extension().and_then(|s| s.to_str())? {
            "rs" => Some(Self::Rust),
            "go" => Some(Self::Go),
            "py" | "pyi" => Some(Self::Python),
            "js" | "mjs" | "cjs" => Some(Self::JavaScript),
            "jsx" => Some(Self::Jsx),
            "ts" | "mts" | "cts" => Some(Self::TypeScript),
            "tsx" => Some(Self::Tsx),
            "json" | "jsonc" => Some(Self::Json),
            "css" => Some(Self::Css),
            "html" | "htm" | "svelte" | "vue" => Some(Self::Html),
            "toml" => Some(Self::Toml),
            "sh" | "bash" | "zsh" => Some(Self::Bash),
            "md" | "markdown" => Some(Self::Markdown),
            _ => None,
        }
    }

    pub fn language_id(self) -> &'static str {
        match self {
            Self::Rust => "rust",
            Self::Go => "go",
            Self::Python => "python",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Jsx => "javascriptreact",
            Self::Tsx => "typescriptreact",
            Self::Json => "json",
            Self::Css => "css",
            Self::Html => "html",
            Self::Toml => "toml",
            Self::Bash => "shellscript",
            Self::Markdown => "markdown",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Rust => "Rust",
            Self::Go => "Go",
            Self::Python => "Python",
            Self::JavaScript => "JavaScript",
            Self::TypeScript => "TypeScript",
            Self::Jsx => "JSX",
            Self::Tsx => "TSX",
            Self::Json => "JSON",
            Self::Css => "CSS",
            Self::Html => "HTML",
            Self::Toml => "TOML",
            Self::Bash => "Bash",
            Self::Markdown => "Markdown",
        }
    }

    /// Grammar backing the highlighter; `None` for plain-text languages.
    pub fn grammar(self) -> Option<tree_sitter::Language> {
        match self {
            Self::Rust => Some(tree_sitter_rust::language()),
            Self::Go => Some(tree_sitter_go::language()),
            Self::Python => Some(tree_sitter_python::language()),
            Self::JavaScript | Self::Jsx => Some(tree_sitter_javascript::language()),
            Self::TypeScript => Some(tree_sitter_typescript::language_typescript()),
            Self::Tsx => Some(tree_sitter_typescript::language_tsx()),
            Self::Json => Some(tree_sitter_json::language()),
            Self::Css => Some(tree_sitter_css::language()),
            Self::Html => Some(tree_sitter_html::language()),
            Self::Toml => Some(tree_sitter_toml::language()),
            Self::Bash => Some(tree_sitter_bash::language()),
            Self::Markdown => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/language.rs"]
mod tests;

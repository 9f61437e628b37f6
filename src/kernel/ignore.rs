//! Gitignore-style matching over layered rule blocks.

use ignore::gitignore::{Gitignore, GitignoreBuilder};

/// Names excluded from every scan regardless of `.gitignore` contents.
pub const BASE_IGNORE_LIST: &[&str] = &[
    ".git",
    "node_modules",
    ".DS_Store",
    "Thumbs.db",
    ".svelte-kit",
    ".turbo",
    ".next",
    "dist",
    "build",
    "target",
    ".vercel",
    ".output",
    "package-lock.json",
    "pnpm-lock.yaml",
    "yarn.lock",
    "bun.lockb",
    "bun.lock",
    "Cargo.lock",
];

#[derive(Debug, thiserror::Error)]
#[error("cannot build ignore matcher: {0}")]
pub struct IgnoreError(#[from] ignore::Error);

/// `BASE_IGNORE_LIST` as one newline-separated rule block.
pub fn base_ignore_block() -> String {
    BASE_IGNORE_LIST.join("\n")
}

pub fn is_base_ignored(name: &str) -> bool {
    BASE_IGNORE_LIST.contains(&name)
}

/// Compiled matcher over an ordered stack of rule blocks.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    matcher: Gitignore,
}

impl IgnoreRules {
    pub fn empty() -> Self {
        Self {
            matcher: Gitignore::empty(),
        }
    }

    /// All lines from all blocks feed one matcher, so later blocks override earlier ones.
    pub fn from_blocks<S: AsRef<str>>(blocks: &[S]) -> Result<Self, IgnoreError> {
        let mut builder = GitignoreBuilder::new("");
        for block in blocks {
            for line in block.as_ref().lines() {
                if let Err(e) = builder.add_line(None, line) {
                    tracing::warn!(line, error = %e, "skipping malformed ignore pattern");
                }
            }
        }
        Ok(Self {
            matcher: builder.build()?,
        })
    }

    pub fn is_ignored(&self, name: &str, is_dir: bool) -> bool {
        self.matcher.matched(name, is_dir).is_ignore()
    }

    pub fn is_empty(&self) -> bool {
        self.matcher.is_empty()
    }

    /// One-shot form; an unbuildable rule set matches nothing.
    pub fn matches<S: AsRef<str>>(blocks: &[S], name: &str, is_dir: bool) -> bool {
        match Self::from_blocks(blocks) {
            Ok(rules) => rules.is_ignored(name, is_dir),
            Err(e) => {
                tracing::warn!(error = %e, "ignore rules unusable, matching nothing");
                false
            }
        }
    }
}

impl Default for IgnoreRules {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/ignore.rs"]
mod tests;

//! Brings the editor host into a usable state for the opened workspace.
//!
//! The highlighter is the only fatal stage. Compiler options, type definitions and
//! model preloading run concurrently afterwards and only degrade the result when they
//! fail; their outcomes are collected in a [`BootstrapReport`].

pub mod highlighter;
pub mod openers;
pub mod preload;
pub mod tsconfig;
pub mod typedefs;

pub use highlighter::{Highlighter, HighlighterError, Theme, THEMES};
pub use openers::{SystemLinkOpener, WorkspaceEditOpener};

use crate::kernel::language::LanguageId;
use crate::kernel::services::bus::KernelBusSender;
use crate::kernel::services::ports::editor::{EditorHost, DOM_LIB_URI};
use crate::kernel::services::ports::fs::FileSystem;
use crate::kernel::services::ports::search::SearchHit;
use crate::kernel::services::ports::settings::{Settings, BUILTIN_THEMES};
use std::path::Path;
use std::sync::Arc;

pub const DEFAULT_MAX_TYPE_DEFINITIONS: usize = 2000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BootstrapState {
    #[default]
    NotReady,
    Loading,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Done(String),
    Skipped,
    Failed(String),
}

impl StageOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    pub theme: &'static str,
    pub languages: usize,
    pub tsconfig: StageOutcome,
    pub type_definitions: StageOutcome,
    pub preload: StageOutcome,
}

impl BootstrapReport {
    pub fn stages(&self) -> [(&'static str, &StageOutcome); 3] {
        [
            ("tsconfig", &self.tsconfig),
            ("type_definitions", &self.type_definitions),
            ("preload", &self.preload),
        ]
    }

    pub fn has_failures(&self) -> bool {
        self.stages().iter().any(|(_, outcome)| outcome.is_failed())
    }
}

#[derive(Debug, Clone)]
pub struct BootstrapOptions {
    pub languages: Vec<LanguageId>,
    pub themes: Vec<String>,
    pub max_type_definitions: usize,
    pub system_prefers_dark: bool,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self {
            languages: LanguageId::ALL.to_vec(),
            themes: BUILTIN_THEMES.iter().map(|t| t.to_string()).collect(),
            max_type_definitions: DEFAULT_MAX_TYPE_DEFINITIONS,
            system_prefers_dark: false,
        }
    }
}

/// Everything one bootstrap run needs.
pub struct BootstrapContext<'a> {
    pub root: Option<&'a Path>,
    pub fs: &'a dyn FileSystem,
    pub host: &'a dyn EditorHost,
    pub bus: KernelBusSender,
    pub settings: Settings,
    pub options: BootstrapOptions,
}

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("no workspace folder is open")]
    NoWorkspace,
    #[error("syntax highlighter failed to load: {0}")]
    Highlighter(#[from] HighlighterError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("editor is not ready")]
    NotReady,
}

#[derive(Debug, Default)]
pub struct EditorBootstrap {
    state: BootstrapState,
    report: Option<BootstrapReport>,
}

impl EditorBootstrap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> BootstrapState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == BootstrapState::Ready
    }

    pub fn report(&self) -> Option<&BootstrapReport> {
        self.report.as_ref()
    }

    pub async fn run(
        &mut self,
        ctx: BootstrapContext<'_>,
    ) -> Result<BootstrapReport, BootstrapError> {
        self.state = BootstrapState::NotReady;
        self.report = None;

        let Some(root) = ctx.root else {
            return Err(BootstrapError::NoWorkspace);
        };
        self.state = BootstrapState::Loading;
        tracing::info!(root = %root.display(), "editor bootstrap started");

        let options = &ctx.options;
        let highlighter = match Highlighter::new(&options.languages, &options.themes[..]) {
            Ok(highlighter) => highlighter,
            Err(e) => {
                self.state = BootstrapState::NotReady;
                tracing::error!(error = %e, "editor bootstrap aborted");
                return Err(e.into());
            }
        };

        let host = ctx.host;
        let languages = highlighter.languages().to_vec();
        for language in &languages {
            host.register_language(*language);
        }
        let requested = ctx.settings.effective_theme(ctx.options.system_prefers_dark);
        let theme = highlighter.resolve_theme(requested);
        if theme.name != requested {
            tracing::warn!(requested, using = theme.name, "theme not loaded, falling back");
        }
        host.set_token_provider(Arc::new(highlighter));
        host.set_theme(theme.name);
        host.set_eager_model_sync(true);

        host.register_link_opener(Box::new(SystemLinkOpener::new()));
        host.register_edit_opener(Box::new(WorkspaceEditOpener::new(ctx.bus.clone())));

        let (tsconfig, type_definitions, preload) = tokio::join!(
            apply_tsconfig(ctx.fs, host, root),
            load_type_definitions(ctx.fs, host, root, ctx.options.max_type_definitions),
            preload_models(ctx.fs, host, root),
        );

        let report = BootstrapReport {
            theme: theme.name,
            languages: languages.len(),
            tsconfig,
            type_definitions,
            preload,
        };

        if report.has_failures() {
            let failures = report
                .stages()
                .iter()
                .filter_map(|(stage, outcome)| match outcome {
                    StageOutcome::Failed(message) => Some(format!("{stage}: {message}")),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("; ");
            tracing::warn!(%failures, "editor bootstrap degraded");
        }

        self.state = BootstrapState::Ready;
        self.report = Some(report.clone());
        tracing::info!(theme = report.theme, languages = report.languages, "editor ready");
        Ok(report)
    }

    /// Literal matches of `query` across workspace buffers, ordered by URI then offset.
    /// Bundled DOM typings and anything under `node_modules` are excluded.
    pub fn search(
        &self,
        host: &dyn EditorHost,
        query: &str,
    ) -> Result<Vec<SearchHit>, SearchError> {
        if !self.is_ready() {
            return Err(SearchError::NotReady);
        }
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let mut uris: Vec<String> = host
            .models()
            .into_iter()
            .map(|model| model.uri)
            .filter(|uri| uri != DOM_LIB_URI && !uri.contains("/node_modules/"))
            .collect();
        uris.sort();

        let mut hits = Vec::new();
        for uri in uris {
            for range in host.find_matches(&uri, query) {
                hits.push(SearchHit {
                    uri: uri.clone(),
                    range,
                });
            }
        }
        Ok(hits)
    }
}

async fn apply_tsconfig(fs: &dyn FileSystem, host: &dyn EditorHost, root: &Path) -> StageOutcome {
    match tsconfig::resolve(fs, root).await {
        Ok(None) => StageOutcome::Skipped,
        Ok(Some(resolved)) => match resolved.options {
            Some(options) => {
                host.set_compiler_options(options);
                StageOutcome::Done(format!("applied {}", resolved.path.display()))
            }
            None => StageOutcome::Skipped,
        },
        Err(e) => StageOutcome::Failed(e.to_string()),
    }
}

async fn load_type_definitions(
    fs: &dyn FileSystem,
    host: &dyn EditorHost,
    root: &Path,
    max: usize,
) -> StageOutcome {
    match typedefs::load(fs, host, root, max).await {
        Ok(None) => StageOutcome::Skipped,
        Ok(Some(summary)) => {
            let mut message = format!("{} declaration files", summary.loaded);
            if summary.truncated {
                message.push_str(" (truncated)");
            }
            StageOutcome::Done(message)
        }
        Err(e) => StageOutcome::Failed(e.to_string()),
    }
}

async fn preload_models(fs: &dyn FileSystem, host: &dyn EditorHost, root: &Path) -> StageOutcome {
    match preload::load(fs, host, root).await {
        Ok(summary) => StageOutcome::Done(format!("{} models", summary.created)),
        Err(e) => StageOutcome::Failed(e.to_string()),
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/bootstrap/pipeline.rs"]
mod tests;

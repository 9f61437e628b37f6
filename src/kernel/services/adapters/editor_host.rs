//! Headless editor host: keeps models and configuration in memory.

use crate::kernel::language::LanguageId;
use crate::kernel::services::ports::editor::{
    CompilerOptions, EditOpener, EditorHost, LinkOpener, ModelInfo, Position, TokenProvider,
    DOM_LIB_URI,
};
use crate::kernel::services::ports::search::Match;
use crate::models::TextModel;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct HostState {
    languages: Vec<LanguageId>,
    token_provider: Option<Arc<dyn TokenProvider>>,
    theme: Option<String>,
    eager_model_sync: bool,
    compiler_options: Option<CompilerOptions>,
    extra_libs: BTreeMap<String, String>,
    models: BTreeMap<String, TextModel>,
    link_openers: Vec<Arc<dyn LinkOpener>>,
    edit_openers: Vec<Arc<dyn EditOpener>>,
}

/// Extra libs are exposed as read-only TypeScript models so they are searchable
/// like any other buffer.
#[derive(Default)]
pub struct InMemoryEditorHost {
    state: Mutex<HostState>,
}

impl InMemoryEditorHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host preloaded with bundled DOM typings at [`DOM_LIB_URI`].
    pub fn with_dom_lib(content: &str) -> Self {
        let host = Self::new();
        host.add_extra_lib(content.to_string(), DOM_LIB_URI.to_string());
        host
    }

    fn state(&self) -> MutexGuard<'_, HostState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn registered_languages(&self) -> Vec<LanguageId> {
        self.state().languages.clone()
    }

    pub fn token_provider(&self) -> Option<Arc<dyn TokenProvider>> {
        self.state().token_provider.clone()
    }

    pub fn theme(&self) -> Option<String> {
        self.state().theme.clone()
    }

    pub fn eager_model_sync(&self) -> bool {
        self.state().eager_model_sync
    }

    pub fn compiler_options(&self) -> Option<CompilerOptions> {
        self.state().compiler_options.clone()
    }

    pub fn extra_lib_uris(&self) -> Vec<String> {
        self.state().extra_libs.keys().cloned().collect()
    }

    pub fn model_text(&self, uri: &str) -> Option<String> {
        self.state().models.get(uri).map(TextModel::text)
    }

    /// Runs link openers in registration order until one handles `url`.
    pub fn open_link(&self, url: &str) -> bool {
        let openers = self.state().link_openers.clone();
        openers.iter().any(|opener| opener.open(url))
    }

    /// Runs edit openers in registration order until one handles the request.
    pub fn open_code_editor(&self, uri: &str, position: Option<Position>) -> bool {
        let openers = self.state().edit_openers.clone();
        openers
            .iter()
            .any(|opener| opener.open_code_editor(uri, position))
    }
}

impl EditorHost for InMemoryEditorHost {
    fn register_language(&self, language: LanguageId) {
        let mut state = self.state();
        if !state.languages.contains(&language) {
            state.languages.push(language);
        }
    }

    fn set_token_provider(&self, provider: Arc<dyn TokenProvider>) {
        self.state().token_provider = Some(provider);
    }

    fn set_theme(&self, theme: &str) {
        self.state().theme = Some(theme.to_string());
    }

    fn set_eager_model_sync(&self, enabled: bool) {
        self.state().eager_model_sync = enabled;
    }

    fn set_compiler_options(&self, options: CompilerOptions) {
        self.state().compiler_options = Some(options);
    }

    fn add_extra_lib(&self, content: String, uri: String) {
        let mut state = self.state();
        let model = TextModel::new(uri.clone(), &content, Some(LanguageId::TypeScript))
            .read_only(true);
        state.models.insert(uri.clone(), model);
        state.extra_libs.insert(uri, content);
    }

    fn create_model(
        &self,
        content: String,
        language: Option<LanguageId>,
        uri: String,
        read_only: bool,
    ) -> bool {
        let mut state = self.state();
        if state.models.contains_key(&uri) {
            return false;
        }
        let model = TextModel::new(uri.clone(), &content, language).read_only(read_only);
        state.models.insert(uri, model);
        true
    }

    fn has_model(&self, uri: &str) -> bool {
        self.state().models.contains_key(uri)
    }

    fn models(&self) -> Vec<ModelInfo> {
        self.state()
            .models
            .values()
            .map(|model| ModelInfo {
                uri: model.uri().to_string(),
                language: model.language(),
                read_only: model.is_read_only(),
            })
            .collect()
    }

    fn register_link_opener(&self, opener: Box<dyn LinkOpener>) {
        self.state().link_openers.push(Arc::from(opener));
    }

    fn register_edit_opener(&self, opener: Box<dyn EditOpener>) {
        self.state().edit_openers.push(Arc::from(opener));
    }

    fn find_matches(&self, uri: &str, query: &str) -> Vec<Match> {
        self.state()
            .models
            .get(uri)
            .map(|model| model.find_matches(query))
            .unwrap_or_default()
    }
}

use super::*;
use crate::kernel::services::adapters::editor_host::InMemoryEditorHost;
use crate::kernel::services::bus::{kernel_bus, KernelBusReceiver};
use crate::kernel::services::ports::editor::{ModuleResolution, Position};
use crate::kernel::services::ports::search::Match;
use crate::kernel::services::ports::settings::ThemeMode;
use crate::kernel::workspace::Workspace;
use crate::test_support::{block_on, MemoryFs};
use std::path::PathBuf;

fn project() -> MemoryFs {
    let fs = MemoryFs::new();
    fs.add_file(
        "/ws/tsconfig.json",
        r#"{
  // editor config
  "compilerOptions": { "moduleResolution": "bundler", "strict": true, },
}"#,
    );
    fs.add_file("/ws/src/app.ts", "const needle = 1;\nneedle + needle;");
    fs.add_file("/ws/src/b.ts", "// needle");
    fs.add_file(
        "/ws/node_modules/pkg/index.d.ts",
        "export declare const needle: number;",
    );
    fs
}

fn host() -> InMemoryEditorHost {
    InMemoryEditorHost::with_dom_lib("declare var needle: string;")
}

fn context<'a>(
    fs: &'a MemoryFs,
    host: &'a InMemoryEditorHost,
    root: Option<&'a Path>,
) -> (BootstrapContext<'a>, KernelBusReceiver) {
    let (bus, rx) = kernel_bus();
    let ctx = BootstrapContext {
        root,
        fs,
        host,
        bus,
        settings: Settings::default(),
        options: BootstrapOptions::default(),
    };
    (ctx, rx)
}

#[test]
fn without_workspace_stays_not_ready() {
    let fs = project();
    let host = host();
    let (ctx, _rx) = context(&fs, &host, None);
    let mut bootstrap = EditorBootstrap::new();

    let err = block_on(bootstrap.run(ctx)).unwrap_err();

    assert!(matches!(err, BootstrapError::NoWorkspace));
    assert_eq!(bootstrap.state(), BootstrapState::NotReady);
    assert!(host.registered_languages().is_empty());
}

#[test]
fn highlighter_failure_is_never_ready() {
    let fs = project();
    let host = host();
    let (mut ctx, _rx) = context(&fs, &host, Some(Path::new("/ws")));
    ctx.options.themes = vec!["no-such-theme".to_string()];
    let mut bootstrap = EditorBootstrap::new();

    let err = block_on(bootstrap.run(ctx)).unwrap_err();

    assert!(matches!(
        err,
        BootstrapError::Highlighter(HighlighterError::UnknownTheme(_))
    ));
    assert_eq!(bootstrap.state(), BootstrapState::NotReady);
    assert!(bootstrap.report().is_none());
    assert_eq!(bootstrap.search(&host, "needle"), Err(SearchError::NotReady));
    assert!(host.token_provider().is_none());
}

#[test]
fn full_run_configures_host() {
    let fs = project();
    let host = host();
    let (ctx, _rx) = context(&fs, &host, Some(Path::new("/ws")));
    let mut bootstrap = EditorBootstrap::new();

    let report = block_on(bootstrap.run(ctx)).unwrap();

    assert!(bootstrap.is_ready());
    assert!(!report.has_failures());
    assert_eq!(report.theme, "min-light");
    assert_eq!(report.languages, LanguageId::ALL.len());
    assert!(matches!(report.tsconfig, StageOutcome::Done(_)));
    assert_eq!(
        report.type_definitions,
        StageOutcome::Done("1 declaration files".to_string())
    );
    // tsconfig.json is preloaded as a JSON model.
    assert_eq!(report.preload, StageOutcome::Done("3 models".to_string()));

    assert_eq!(host.registered_languages().len(), LanguageId::ALL.len());
    assert_eq!(host.theme().as_deref(), Some("min-light"));
    assert!(host.eager_model_sync());
    assert!(host
        .token_provider()
        .is_some_and(|provider| provider.supports(LanguageId::Tsx)));

    let options = host.compiler_options().unwrap();
    assert_eq!(options.module_resolution, Some(ModuleResolution::NodeJs));
    assert_eq!(options.strict, Some(true));
    assert!(host
        .extra_lib_uris()
        .contains(&"file:///node_modules/pkg/index.d.ts".to_string()));
    assert_eq!(bootstrap.report(), Some(&report));
}

#[test]
fn dark_system_appearance_selects_dark_theme() {
    let fs = project();
    let host = host();
    let (mut ctx, _rx) = context(&fs, &host, Some(Path::new("/ws")));
    ctx.options.system_prefers_dark = true;
    let mut bootstrap = EditorBootstrap::new();

    let report = block_on(bootstrap.run(ctx)).unwrap();
    assert_eq!(report.theme, "houston");
}

#[test]
fn unloaded_theme_falls_back_to_first_loaded() {
    let fs = project();
    let host = host();
    let (mut ctx, _rx) = context(&fs, &host, Some(Path::new("/ws")));
    ctx.settings.editor.theme_mode = ThemeMode::Light;
    ctx.options.themes = vec!["github-dark".to_string()];
    let mut bootstrap = EditorBootstrap::new();

    let report = block_on(bootstrap.run(ctx)).unwrap();
    assert_eq!(report.theme, "github-dark");
    assert_eq!(host.theme().as_deref(), Some("github-dark"));
}

#[test]
fn malformed_tsconfig_still_ready_and_searchable() {
    let fs = project();
    fs.add_file("/ws/tsconfig.json", "{ \"compilerOptions\": { ");
    let host = host();
    let (ctx, _rx) = context(&fs, &host, Some(Path::new("/ws")));
    let mut bootstrap = EditorBootstrap::new();

    let report = block_on(bootstrap.run(ctx)).unwrap();

    assert!(bootstrap.is_ready());
    assert!(report.has_failures());
    assert!(report.tsconfig.is_failed());
    assert!(host.compiler_options().is_none());

    let hits = bootstrap.search(&host, "needle").unwrap();
    assert_eq!(
        hits,
        vec![
            SearchHit {
                uri: "file:///ws/src/app.ts".to_string(),
                range: Match::new(6, 12, 0, 6),
            },
            SearchHit {
                uri: "file:///ws/src/app.ts".to_string(),
                range: Match::new(18, 24, 1, 0),
            },
            SearchHit {
                uri: "file:///ws/src/app.ts".to_string(),
                range: Match::new(27, 33, 1, 9),
            },
            SearchHit {
                uri: "file:///ws/src/b.ts".to_string(),
                range: Match::new(3, 9, 0, 3),
            },
        ]
    );
}

#[test]
fn missing_optional_inputs_are_skipped() {
    let fs = MemoryFs::new();
    fs.add_file("/ws/main.rs", "fn main() {}");
    let host = InMemoryEditorHost::new();
    let (ctx, _rx) = context(&fs, &host, Some(Path::new("/ws")));
    let mut bootstrap = EditorBootstrap::new();

    let report = block_on(bootstrap.run(ctx)).unwrap();

    assert_eq!(report.tsconfig, StageOutcome::Skipped);
    assert_eq!(report.type_definitions, StageOutcome::Skipped);
    assert_eq!(report.preload, StageOutcome::Done("1 models".to_string()));
    assert!(!report.has_failures());
}

#[test]
fn failing_stages_are_isolated() {
    let fs = project();
    fs.fail_read_dir("/ws/node_modules");
    fs.fail_read_file("/ws/tsconfig.json");
    let host = host();
    let (ctx, _rx) = context(&fs, &host, Some(Path::new("/ws")));
    let mut bootstrap = EditorBootstrap::new();

    let report = block_on(bootstrap.run(ctx)).unwrap();

    assert!(report.tsconfig.is_failed());
    assert!(report.type_definitions.is_failed());
    assert_eq!(report.preload, StageOutcome::Done("2 models".to_string()));
    assert!(host.has_model("file:///ws/src/app.ts"));
    assert!(bootstrap.is_ready());
}

#[test]
fn search_before_run_is_not_ready() {
    let bootstrap = EditorBootstrap::new();
    let host = host();
    assert_eq!(bootstrap.search(&host, "x"), Err(SearchError::NotReady));
}

#[test]
fn empty_query_has_no_hits() {
    let fs = project();
    let host = host();
    let (ctx, _rx) = context(&fs, &host, Some(Path::new("/ws")));
    let mut bootstrap = EditorBootstrap::new();
    block_on(bootstrap.run(ctx)).unwrap();

    assert_eq!(bootstrap.search(&host, ""), Ok(Vec::new()));
}

#[test]
fn edit_opener_reaches_workspace_through_bus() {
    let fs = project();
    let host = host();
    let (ctx, mut rx) = context(&fs, &host, Some(Path::new("/ws")));
    let mut bootstrap = EditorBootstrap::new();
    block_on(bootstrap.run(ctx)).unwrap();

    let mut ws = Workspace::default();
    ws.set_root_dir("/ws");
    assert!(host.open_code_editor("file:///ws/src/b.ts", Some(Position::new(1, 4))));
    assert_eq!(ws.pump_bus(&mut rx), 1);

    let tab = ws.layout().current_tab().unwrap();
    assert_eq!(tab.file_path, PathBuf::from("/ws/src/b.ts"));
    assert_eq!(tab.initial_position, Some(Position::new(1, 4)));
    assert!(!tab.external);
}

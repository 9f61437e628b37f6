mod logging;

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use xide::kernel::bootstrap::{
    BootstrapContext, BootstrapOptions, BootstrapReport, EditorBootstrap, StageOutcome,
};
use xide::kernel::scanner::{ScanFailurePolicy, ScanOptions};
use xide::kernel::services::adapters::{
    run_agent, FileWatcher, InMemoryEditorHost, LocalFileSystem, SettingsStore,
    DEFAULT_AGENT_PROGRAM,
};
use xide::kernel::services::kernel_bus;
use xide::kernel::services::ports::settings::{ConfigGateway, Settings};
use xide::kernel::workspace::{Workspace, WorkspaceOptions};

const USAGE: &str = "\
usage: xide <command> [options]

commands:
  scan <dir> [--skip-unreadable]          list workspace files
  open <dir> [--dark] [--max-typedefs=N]  bootstrap the editor and print the report
  search <dir> <query>                    literal search across workspace buffers
  settings                                create or validate the settings file
  agent <prompt> [--program=P] [--model=M]
  watch <dir> [--seconds=N]               print file changes

global options:
  --verbose                               echo log lines to stderr";

struct Args {
    command: String,
    positional: Vec<String>,
    skip_unreadable: bool,
    dark: bool,
    verbose: bool,
    max_typedefs: Option<usize>,
    program: Option<String>,
    model: Option<String>,
    seconds: u64,
}

impl Args {
    fn parse() -> Option<Self> {
        let mut raw = std::env::args().skip(1);
        let command = raw.next()?;
        let mut args = Self {
            command,
            positional: Vec::new(),
            skip_unreadable: false,
            dark: false,
            verbose: false,
            max_typedefs: None,
            program: None,
            model: None,
            seconds: 10,
        };

        for arg in raw {
            if arg == "--skip-unreadable" {
                args.skip_unreadable = true;
            } else if arg == "--dark" {
                args.dark = true;
            } else if arg == "--verbose" {
                args.verbose = true;
            } else if let Some(value) = arg.strip_prefix("--max-typedefs=") {
                args.max_typedefs = value.parse().ok();
            } else if let Some(value) = arg.strip_prefix("--program=") {
                args.program = Some(value.to_string());
            } else if let Some(value) = arg.strip_prefix("--model=") {
                args.model = Some(value.to_string());
            } else if let Some(value) = arg.strip_prefix("--seconds=") {
                args.seconds = value.parse().unwrap_or(args.seconds);
            } else {
                args.positional.push(arg);
            }
        }
        Some(args)
    }

    fn dir(&self) -> Result<PathBuf> {
        let Some(dir) = self.positional.first() else {
            bail!("missing <dir>\n\n{USAGE}");
        };
        std::fs::canonicalize(dir).with_context(|| format!("cannot open {dir}"))
    }
}

fn main() -> Result<()> {
    let Some(args) = Args::parse() else {
        eprintln!("{USAGE}");
        return Ok(());
    };

    let logging = logging::init(args.verbose);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("cannot start async runtime")?;
    let result = runtime.block_on(run(&args));

    if let (Err(_), Some(guard)) = (&result, &logging) {
        eprintln!("logs: {}", guard.log_dir().display());
    }
    result
}

async fn run(args: &Args) -> Result<()> {
    match args.command.as_str() {
        "scan" => scan(args).await,
        "open" => open(args).await.map(|_| ()),
        "search" => search(args).await,
        "settings" => settings().await,
        "agent" => agent(args).await,
        "watch" => watch(args).await,
        other => bail!("unknown command `{other}`\n\n{USAGE}"),
    }
}

async fn load_settings() -> Settings {
    let store = SettingsStore::new(Arc::new(LocalFileSystem::new()));
    match store.init().await {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(error = %e, "using default settings");
            Settings::default()
        }
    }
}

async fn scan(args: &Args) -> Result<()> {
    let root = args.dir()?;
    let fs = LocalFileSystem::new();
    let failure_policy = if args.skip_unreadable {
        ScanFailurePolicy::SkipWithWarning
    } else {
        ScanFailurePolicy::Abort
    };
    let mut workspace = Workspace::new(WorkspaceOptions {
        scan: ScanOptions { failure_policy },
        ..WorkspaceOptions::default()
    });
    workspace.set_root_dir(&root);
    workspace
        .build_file_list(&fs)
        .await
        .with_context(|| format!("cannot scan {}", root.display()))?;

    for file in workspace.file_list() {
        println!("{}", file.display());
    }
    for warning in workspace.scan_warnings() {
        eprintln!("skipped {}: {}", warning.path.display(), warning.message);
    }
    Ok(())
}

async fn bootstrap(
    args: &Args,
    root: &Path,
    host: &InMemoryEditorHost,
) -> Result<(EditorBootstrap, BootstrapReport)> {
    let fs = LocalFileSystem::new();
    let (bus, _rx) = kernel_bus();
    let mut options = BootstrapOptions {
        system_prefers_dark: args.dark,
        ..BootstrapOptions::default()
    };
    if let Some(max) = args.max_typedefs {
        options.max_type_definitions = max;
    }

    let mut bootstrap = EditorBootstrap::new();
    let report = bootstrap
        .run(BootstrapContext {
            root: Some(root),
            fs: &fs,
            host,
            bus,
            settings: load_settings().await,
            options,
        })
        .await?;
    Ok((bootstrap, report))
}

async fn open(args: &Args) -> Result<BootstrapReport> {
    let root = args.dir()?;
    let host = InMemoryEditorHost::new();
    let (_, report) = bootstrap(args, &root, &host).await?;

    println!("theme      {}", report.theme);
    println!("languages  {}", report.languages);
    for (stage, outcome) in report.stages() {
        let text = match outcome {
            StageOutcome::Done(summary) => summary.clone(),
            StageOutcome::Skipped => "skipped".to_string(),
            StageOutcome::Failed(error) => format!("FAILED: {error}"),
        };
        println!("{stage:<10} {text}");
    }
    Ok(report)
}

async fn search(args: &Args) -> Result<()> {
    let root = args.dir()?;
    let Some(query) = args.positional.get(1) else {
        bail!("missing <query>\n\n{USAGE}");
    };
    let host = InMemoryEditorHost::new();
    let (bootstrap, _) = bootstrap(args, &root, &host).await?;

    for hit in bootstrap.search(&host, query)? {
        println!("{}:{}:{}", hit.uri, hit.range.line + 1, hit.range.col + 1);
    }
    Ok(())
}

async fn settings() -> Result<()> {
    let store = SettingsStore::new(Arc::new(LocalFileSystem::new()));
    store.init().await.context("cannot load settings")?;
    let path = store.settings_path().await?;
    println!("{}", path.display());
    Ok(())
}

async fn agent(args: &Args) -> Result<()> {
    let prompt = args.positional.join(" ");
    if prompt.is_empty() {
        bail!("missing <prompt>\n\n{USAGE}");
    }
    let settings = load_settings().await;
    if !settings.ai.agent.enabled {
        bail!("the agent is disabled in settings");
    }
    let program = args.program.as_deref().unwrap_or(DEFAULT_AGENT_PROGRAM);
    let model = args.model.as_deref().unwrap_or(&settings.ai.agent.model);

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let printer = async {
        while let Some(event) = rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!(error = %e, "cannot encode agent event"),
            }
        }
    };
    let (result, ()) = tokio::join!(run_agent(program, model, &prompt, tx), printer);
    result?;
    Ok(())
}

async fn watch(args: &Args) -> Result<()> {
    let root = args.dir()?;
    let mut watcher = FileWatcher::new(&root)?;
    watcher.watch(&root, true)?;

    let deadline = Instant::now() + Duration::from_secs(args.seconds);
    while Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(250)).await;
        for change in watcher.drain_changes() {
            println!("{:?} {}", change.kind, change.path.display());
        }
    }
    Ok(())
}

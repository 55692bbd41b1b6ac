use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use alactic::app::App;
use alactic::config::{Config, DirectoryContext};
use alactic::storage::{DiskStore, RecordStore};

#[derive(Parser, Debug)]
#[command(name = "alactic", version, about = "A tabbed plain-text editor")]
struct Args {
    /// Files to open, each in its own tab.
    files: Vec<PathBuf>,

    /// Theme for this run, overriding the persisted choice.
    #[arg(long, value_name = "NAME")]
    theme: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let dirs = DirectoryContext::from_system().context("resolving state directories")?;
    std::fs::create_dir_all(&dirs.data_dir)
        .with_context(|| format!("creating {}", dirs.data_dir.display()))?;
    init_tracing(&dirs)?;

    let config = Config::load_or_default(&dirs.config_path());
    let store = DiskStore::open(dirs.records_path())
        .with_context(|| format!("opening {}", dirs.records_path().display()))?;
    let records = RecordStore::new(store);

    // Exports land next to wherever the editor was launched, named after
    // that directory.
    let cwd = std::env::current_dir().context("resolving working directory")?;
    let folder_label = cwd
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "workspace".to_string());

    let mut app = App::new(config, records, cwd, folder_label, args.theme.as_deref());
    app.bootstrap(&args.files);

    let terminal = ratatui::init();
    let result = app.run(terminal);
    ratatui::restore();
    result
}

/// Log to a file in the data directory. The terminal is owned by the UI, so
/// nothing goes to stderr while the editor runs.
fn init_tracing(dirs: &DirectoryContext) -> anyhow::Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(dirs.log_path())
        .with_context(|| format!("opening {}", dirs.log_path().display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Arc::new(file))
                .with_ansi(false),
        )
        .init();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "alactic starting");
    Ok(())
}

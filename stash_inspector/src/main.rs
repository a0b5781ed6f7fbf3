use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};

use clap::Parser;
use color_eyre::Result;
use tracing::{info, warn};

mod app;
mod inspection;
mod ui;
mod watch;

use app::InspectorApp;
use inspection::Inspection;

#[derive(Clone)]
struct ChannelWriter {
    sender: Sender<String>,
}

impl std::io::Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Ok(text) = String::from_utf8(buf.to_vec()) {
            let _ = self.sender.send(text);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Shiny stash snapshot inspector", long_about = None)]
struct Cli {
    /// Raw stash block captured from process memory.
    snapshot: PathBuf,
    /// Reader config file. Falls back to $STASH_READER_CONFIG, then the builtin config.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory that relative data paths in the config resolve against.
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Print the decoded snapshot as JSON and exit.
    #[arg(long)]
    json: bool,
    /// Do not reload when the snapshot file changes.
    #[arg(long)]
    no_watch: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    if cli.json {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
        let inspection = Inspection::load(cli.snapshot, cli.config, cli.data_dir);
        let snapshot = inspection.snapshot()?;
        println!("{}", stash_proto::encode_snapshot_json_pretty(&snapshot)?);
        return Ok(());
    }

    let (log_tx, log_rx) = mpsc::channel::<String>();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .with_writer(move || ChannelWriter {
            sender: log_tx.clone(),
        })
        .init();

    let inspection = Inspection::load(cli.snapshot, cli.config, cli.data_dir);
    info!("Inspecting {}", inspection.snapshot_path().display());

    let watcher = if cli.no_watch {
        None
    } else {
        match watch::watch_file(inspection.snapshot_path()) {
            Ok(watcher) => Some(watcher),
            Err(err) => {
                warn!("Snapshot watch unavailable: {}", err);
                None
            }
        }
    };

    let app = InspectorApp::new(inspection, watcher, log_rx)?;
    app.run()
}

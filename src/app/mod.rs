// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Application entry point wiring the command line to the export pipeline.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::host::EpubHost;
use crate::host::epub::EPUB_HOST_VERSION;
use crate::logic::export::{self, ExportConfig};
use crate::models::prefs::PrefsFile;
use crate::ui::{DialogOptions, FolderPicker, NativeFolderPicker, PresetFolder};

#[derive(Debug, Parser)]
#[command(
    name = "folderout",
    version,
    about = "Export the files of an EPUB into a folder",
    long_about = None
)]
pub struct Cli {
    /// EPUB file to export.
    pub book: PathBuf,

    /// Destination folder; a folder dialog is shown when omitted.
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// Preferences file [default: ~/.config/folderout/prefs.json].
    #[arg(long)]
    pub prefs: Option<PathBuf>,

    /// Host build stamp (YYYYMMDD) to report to the exporter.
    #[arg(long, value_name = "N", default_value_t = EPUB_HOST_VERSION)]
    pub launcher_version: u32,
}

/// Parse arguments, set up logging and run one export.
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let config = ExportConfig::default();
    let prefs_path = cli
        .prefs
        .or_else(PrefsFile::default_path)
        .unwrap_or_else(|| PathBuf::from("folderout-prefs.json"));

    let prefs_file = PrefsFile::new(prefs_path);
    tracing::debug!(path = %prefs_file.path().display(), "Using preferences file");

    let mut host = match EpubHost::open(&cli.book, prefs_file) {
        Ok(host) => host.with_launcher_version(cli.launcher_version),
        Err(err) => {
            tracing::error!("{err:#}");
            return ExitCode::FAILURE;
        }
    };

    let picker: Box<dyn FolderPicker> = match cli.dest {
        Some(dest) => Box::new(PresetFolder(dest)),
        None => Box::new(NativeFolderPicker::new(DialogOptions::default())),
    };

    match export::run(&mut host, &*picker, &config) {
        0 => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

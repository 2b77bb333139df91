//! Rolling Logger
//!
//! File logger for the kanban backend:
//! - one log file per local day (`{app}_{YYYY-MM-DD}.log`), switched when the
//!   date changes while the process runs
//! - a bounded number of daily files kept on disk
//!
//! Records emitted through the `log` facade are bridged into `tracing`.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use chrono::NaiveDate;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Daily files kept on disk by default
pub const DEFAULT_RETAINED_FILES: usize = 7;

static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Logger options
#[derive(Debug, Clone, Copy)]
pub struct LoggerOptions {
    pub level: log::LevelFilter,
    pub retained_files: usize,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self {
            level: log::LevelFilter::Info,
            retained_files: DEFAULT_RETAINED_FILES,
        }
    }
}

/// Append-only writer over the current day's log file
///
/// The first write on a new date opens that day's file and prunes the oldest ones.
pub struct DailyFile {
    log_dir: PathBuf,
    app_name: String,
    retained_files: usize,
    current: Mutex<Option<(NaiveDate, File)>>,
}

impl DailyFile {
    /// Open (or create) the file for `date`
    pub fn open(log_dir: &Path, app_name: &str, retained_files: usize, date: NaiveDate) -> io::Result<Self> {
        let file = open_append(&log_file_path(log_dir, app_name, date))?;
        Ok(Self {
            log_dir: log_dir.to_path_buf(),
            app_name: app_name.to_string(),
            retained_files,
            current: Mutex::new(Some((date, file))),
        })
    }

    /// Write `buf` to the file for `date`, switching files if needed
    pub fn write_on(&self, date: NaiveDate, buf: &[u8]) -> io::Result<usize> {
        let mut current = self.current.lock().map_err(|_| io::Error::other("log file lock poisoned"))?;

        if current.as_ref().map(|(day, _)| *day) != Some(date) {
            let file = open_append(&log_file_path(&self.log_dir, &self.app_name, date))?;
            *current = Some((date, file));
            if let Err(e) = prune_old_logs(&self.log_dir, &self.app_name, self.retained_files) {
                eprintln!("Failed to prune old logs: {}", e);
            }
        }

        match current.as_mut() {
            Some((_, file)) => file.write(buf),
            None => Err(io::Error::other("log file unavailable")),
        }
    }
}

impl Write for &DailyFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_on(chrono::Local::now().date_naive(), buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut current = self.current.lock().map_err(|_| io::Error::other("log file lock poisoned"))?;
        match current.as_mut() {
            Some((_, file)) => file.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for DailyFile {
    type Writer = &'a DailyFile;

    fn make_writer(&'a self) -> Self::Writer {
        self
    }
}

/// Initialize the global logger with default options
pub fn init_logger(log_dir: PathBuf, app_name: &str) -> Result<(), String> {
    init_logger_with(log_dir, app_name, LoggerOptions::default())
}

/// Initialize the global logger
///
/// Fails if a global subscriber is already installed.
pub fn init_logger_with(log_dir: PathBuf, app_name: &str, options: LoggerOptions) -> Result<(), String> {
    fs::create_dir_all(&log_dir).map_err(|e| format!("Failed to create log dir: {}", e))?;

    let today = chrono::Local::now().date_naive();
    let path = log_file_path(&log_dir, app_name, today);
    let writer = DailyFile::open(&log_dir, app_name, options.retained_files, today)
        .map_err(|e| format!("Failed to open log file {}: {}", path.display(), e))?;

    let removed = prune_old_logs(&log_dir, app_name, options.retained_files)
        .map_err(|e| format!("Failed to prune old logs: {}", e))?;

    tracing_subscriber::registry()
        .with(level_filter(options.level))
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .map_err(|e| format!("Failed to install logger: {}", e))?;

    let _ = INITIALIZED.set(());
    tracing::info!("Logging to {} ({} old files pruned)", path.display(), removed);
    Ok(())
}

/// Path of the log file for a given day
pub fn log_file_path(log_dir: &Path, app_name: &str, date: NaiveDate) -> PathBuf {
    log_dir.join(format!("{}_{}.log", app_name, date.format("%Y-%m-%d")))
}

/// Delete the oldest daily files so that at most `retained` remain
///
/// Returns the number of files removed.
pub fn prune_old_logs(log_dir: &Path, app_name: &str, retained: usize) -> io::Result<usize> {
    let prefix = format!("{}_", app_name);
    let mut files: Vec<PathBuf> = fs::read_dir(log_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .map(|name| name.starts_with(&prefix) && name.ends_with(".log"))
                .unwrap_or(false)
        })
        .collect();

    // Date suffixes sort lexicographically
    files.sort();
    files.reverse();

    let mut removed = 0;
    for path in files.iter().skip(retained) {
        fs::remove_file(path)?;
        removed += 1;
    }
    Ok(removed)
}

pub fn info(msg: &str) -> Result<(), String> {
    ensure_initialized()?;
    tracing::info!("{}", msg);
    Ok(())
}

pub fn error(msg: &str) -> Result<(), String> {
    ensure_initialized()?;
    tracing::error!("{}", msg);
    Ok(())
}

fn ensure_initialized() -> Result<(), String> {
    INITIALIZED
        .get()
        .ok_or_else(|| "Logger not initialized".to_string()).copied()
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn level_filter(level: log::LevelFilter) -> LevelFilter {
    match level {
        log::LevelFilter::Off => LevelFilter::OFF,
        log::LevelFilter::Error => LevelFilter::ERROR,
        log::LevelFilter::Warn => LevelFilter::WARN,
        log::LevelFilter::Info => LevelFilter::INFO,
        log::LevelFilter::Debug => LevelFilter::DEBUG,
        log::LevelFilter::Trace => LevelFilter::TRACE,
    }
}

//! Log and query log control.
//!
//! Logging goes through `tracing`. [`init`] installs a subscriber with two
//! outputs: the main log (stderr or a file) and an optional query log that
//! receives only events with target [`QUERY_LOG_TARGET`], i.e. every
//! command sent by a [`Context`](crate::context::Context).
//!
//! Log files can be rotated externally: move the file away, then call
//! [`LoggerHandle::reopen`] to start a fresh one at the configured path.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;
use tracing::Dispatch;
use tracing_subscriber::filter::{filter_fn, EnvFilter};
use tracing_subscriber::fmt::{self, writer::BoxMakeWriter, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Layer;

use crate::config::{LoggerSettings, SettingsError};

/// Target of query log events.
pub const QUERY_LOG_TARGET: &str = "grnbind::query";

/// Errors raised while setting up logging.
#[derive(Error, Debug)]
pub enum LoggingError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("failed to open log file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("a global logger is already installed")]
    AlreadyInitialized,
}

/// An append-mode log file that can be reopened at the same path.
#[derive(Debug, Clone)]
pub struct ReopenableFile {
    path: PathBuf,
    file: Arc<Mutex<File>>,
}

impl ReopenableFile {
    /// Open `path` for appending, creating it and its parent directory.
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let file = Self::open_file(&path)?;
        Ok(Self {
            path,
            file: Arc::new(Mutex::new(file)),
        })
    }

    fn open_file(path: &Path) -> io::Result<File> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        OpenOptions::new().create(true).append(true).open(path)
    }

    /// Close the current file and open `path` again.
    pub fn reopen(&self) -> io::Result<()> {
        let fresh = Self::open_file(&self.path)?;
        let mut file = self.lock();
        file.flush()?;
        *file = fresh;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, File> {
        self.file.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Write for ReopenableFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock().flush()
    }
}

impl<'a> MakeWriter<'a> for ReopenableFile {
    type Writer = ReopenableFile;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Control over the files of an installed logger.
#[derive(Debug, Clone, Default)]
pub struct LoggerHandle {
    log_file: Option<ReopenableFile>,
    query_log_file: Option<ReopenableFile>,
}

impl LoggerHandle {
    /// Reopen the main log and query log files.
    pub fn reopen(&self) -> io::Result<()> {
        for file in self.log_file.iter().chain(self.query_log_file.iter()) {
            file.reopen()?;
        }
        Ok(())
    }

    pub fn log_path(&self) -> Option<&Path> {
        self.log_file.as_ref().map(ReopenableFile::path)
    }

    pub fn query_log_path(&self) -> Option<&Path> {
        self.query_log_file.as_ref().map(ReopenableFile::path)
    }
}

fn open_log(path: Option<PathBuf>) -> Result<Option<ReopenableFile>, LoggingError> {
    path.map(|path| {
        ReopenableFile::open(&path).map_err(|source| LoggingError::Open { path, source })
    })
    .transpose()
}

/// Build a dispatcher for `settings` without installing it.
///
/// `RUST_LOG` overrides `settings.level` for the main log. The query log
/// is unaffected by either.
pub fn build(settings: &LoggerSettings) -> Result<(Dispatch, LoggerHandle), LoggingError> {
    let log_file = open_log(settings.resolved_log_path()?)?;
    let query_log_file = open_log(settings.resolved_query_log_path()?)?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level));

    let (writer, ansi) = match &log_file {
        Some(file) => (BoxMakeWriter::new(file.clone()), false),
        None => (BoxMakeWriter::new(io::stderr), true),
    };
    let main_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_filter(filter_fn(|meta| meta.target() != QUERY_LOG_TARGET))
        .with_filter(env_filter);

    let query_layer = query_log_file.clone().map(|file| {
        fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(false)
            .with_filter(filter_fn(|meta| meta.target() == QUERY_LOG_TARGET))
    });

    let subscriber = tracing_subscriber::registry()
        .with(main_layer)
        .with(query_layer);

    Ok((
        Dispatch::new(subscriber),
        LoggerHandle {
            log_file,
            query_log_file,
        },
    ))
}

/// Build and install the global logger.
pub fn init(settings: &LoggerSettings) -> Result<LoggerHandle, LoggingError> {
    let (dispatch, handle) = build(settings)?;
    tracing::dispatcher::set_global_default(dispatch)
        .map_err(|_| LoggingError::AlreadyInitialized)?;
    Ok(handle)
}

//! Logging setup for the `smmlv` binary.
//!
//! One registry with a level filter, a stderr layer and a file layer that
//! discards output until [`enable_file_logging`] points it at a file. Stdout
//! is left to command output so `--json` can be piped.

use std::{
    fs::File,
    io::{self, IsTerminal, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard, OnceLock},
};

use anyhow::{Result, anyhow, bail};
use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        FmtContext, MakeWriter,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

/// Local-time formatter: timestamp, level, `file:line`, fields.
struct LocalFmt;

impl<S, N> FormatEvent<S, N> for LocalFmt
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let ansi = writer.has_ansi_escapes();
        let timestamp = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");

        let (pre, post) = match (ansi, *meta.level()) {
            (false, _) => ("", ""),
            (true, Level::ERROR) => ("\x1b[1;31m", "\x1b[0m"),
            (true, Level::WARN) => ("\x1b[1;33m", "\x1b[0m"),
            (true, Level::INFO) => ("\x1b[1;32m", "\x1b[0m"),
            (true, Level::DEBUG) => ("\x1b[1;34m", "\x1b[0m"),
            (true, Level::TRACE) => ("\x1b[1;35m", "\x1b[0m"),
        };
        write!(writer, "{timestamp} {pre}{:>5}{post} ", meta.level())?;

        if let (Some(file), Some(line)) = (meta.file(), meta.line()) {
            let file = file
                .rsplit_once("src/")
                .map(|(_, rest)| rest)
                .unwrap_or(file);
            write!(writer, "{file}:{line} ")?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

type FileHandle = Arc<Mutex<Option<File>>>;

/// Late-bound file writer. Writes are discarded while no file is set.
#[derive(Clone)]
struct FileSlot(FileHandle);

struct SlotWriter<'a>(MutexGuard<'a, Option<File>>);

impl Write for SlotWriter<'_> {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> io::Result<usize> {
        match &mut *self.0 {
            Some(f) => f.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut *self.0 {
            Some(f) => f.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for FileSlot {
    type Writer = SlotWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        SlotWriter(self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner()))
    }
}

static FILE_SLOT: OnceLock<FileHandle> = OnceLock::new();

/// `RUST_LOG` when set, otherwise `level`.
fn make_filter(level: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level).map_err(|e| anyhow!("invalid log level '{level}': {e}")),
    }
}

/// Installs the global subscriber. Calling it again is a no-op.
pub fn init_logging(level: &str) -> Result<()> {
    let file_inner: FileHandle = Arc::new(Mutex::new(None));
    let level_filter = make_filter(level)?;

    let console_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalFmt)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr);

    let file_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalFmt)
        .with_ansi(false)
        .with_writer(FileSlot(file_inner.clone()));

    if tracing_subscriber::registry()
        .with(level_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .is_ok()
    {
        let _ = FILE_SLOT.set(file_inner);
    }
    Ok(())
}

/// Starts appending log output to `path`, replacing any open log file.
/// The directory must already exist.
pub fn enable_file_logging(path: &Path) -> Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| anyhow!("cannot open log file '{}': {e}", path.display()))?;

    let Some(slot) = FILE_SLOT.get() else {
        bail!("logging not yet initialized");
    };
    *slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(file);
    Ok(())
}

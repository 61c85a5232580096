use crate::ingest::constants::{IDLE_SLEEP, RETRY_SLEEP};
use std::fs::{self, File, Metadata};
use std::io::{self, BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/// Stable identity of an open file, used to detect rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileIdentity {
    dev: u64,
    ino: u64,
}

impl FileIdentity {
    #[cfg(unix)]
    pub fn of(meta: &Metadata) -> Self {
        use std::os::unix::fs::MetadataExt;
        Self {
            dev: meta.dev(),
            ino: meta.ino(),
        }
    }

    #[cfg(not(unix))]
    pub fn of(meta: &Metadata) -> Self {
        let created = meta
            .created()
            .ok()
            .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Self {
            dev: 0,
            ino: created,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReopenReason {
    /// The path now names a different file.
    Rotated,
    /// The file is shorter than what has already been read.
    Truncated,
    /// The path can no longer be stat'ed.
    Vanished,
}

impl ReopenReason {
    pub fn as_str(self) -> &'static str {
        match self {
            ReopenReason::Rotated => "rotated",
            ReopenReason::Truncated => "truncated",
            ReopenReason::Vanished => "vanished",
        }
    }
}

/// Result of one [`Tailer::poll`].
#[derive(Debug)]
pub enum TailEvent {
    /// The log was opened and positioned at its end.
    Opened,
    /// A complete line, without its line terminator.
    Line(String),
    /// Nothing new; the tailer slept and the file is unchanged.
    Idle,
    /// The handle was closed; the next poll reopens the path.
    Reopen(ReopenReason),
    /// Opening or reading failed; the next poll backs off before retrying.
    Unavailable(io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailerState {
    Closed,
    Tailing,
    ErrorBackoff,
}

#[derive(Debug, Clone, Copy)]
pub struct TailTiming {
    /// Sleep after reaching end-of-file, before probing the path.
    pub idle: Duration,
    /// Sleep in the error-backoff state before the next open attempt.
    pub retry: Duration,
}

impl Default for TailTiming {
    fn default() -> Self {
        Self {
            idle: IDLE_SLEEP,
            retry: RETRY_SLEEP,
        }
    }
}

struct OpenLog {
    reader: BufReader<File>,
    identity: FileIdentity,
    /// Bytes consumed so far, including any buffered partial line.
    offset: u64,
}

/// Follows a growing log file across rotation and truncation.
///
/// Only data appended after the file is (re)opened is ever returned; each
/// byte is returned at most once.
pub struct Tailer {
    path: PathBuf,
    timing: TailTiming,
    open: Option<OpenLog>,
    backoff: bool,
    partial: Vec<u8>,
}

impl Tailer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_timing(path, TailTiming::default())
    }

    pub fn with_timing(path: impl Into<PathBuf>, timing: TailTiming) -> Self {
        Self {
            path: path.into(),
            timing,
            open: None,
            backoff: false,
            partial: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> TailerState {
        match (&self.open, self.backoff) {
            (Some(_), _) => TailerState::Tailing,
            (None, true) => TailerState::ErrorBackoff,
            (None, false) => TailerState::Closed,
        }
    }

    /// Advance the state machine by one step.
    pub fn poll(&mut self) -> TailEvent {
        if self.backoff {
            thread::sleep(self.timing.retry);
            self.backoff = false;
        }

        let Some(open) = self.open.as_mut() else {
            return match open_at_end(&self.path) {
                Ok(open) => {
                    self.open = Some(open);
                    TailEvent::Opened
                }
                Err(e) => {
                    self.backoff = true;
                    TailEvent::Unavailable(e)
                }
            };
        };

        match open.reader.read_until(b'\n', &mut self.partial) {
            Ok(0) => {}
            Ok(n) => {
                open.offset += n as u64;
                if self.partial.ends_with(b"\n") {
                    return TailEvent::Line(take_line(&mut self.partial));
                }
                // Partial line: wait for the writer to finish it.
            }
            Err(e) => {
                self.close();
                self.backoff = true;
                return TailEvent::Unavailable(e);
            }
        }

        thread::sleep(self.timing.idle);
        self.probe()
    }

    /// Close the handle and forget any partial line.
    pub fn close(&mut self) {
        self.open = None;
        self.partial.clear();
    }

    /// Compare the path's current identity and size with the open handle.
    fn probe(&mut self) -> TailEvent {
        let Some(open) = self.open.as_ref() else {
            return TailEvent::Idle;
        };

        let reason = match fs::metadata(&self.path) {
            Ok(meta) if FileIdentity::of(&meta) != open.identity => ReopenReason::Rotated,
            Ok(meta) if meta.len() < open.offset => ReopenReason::Truncated,
            Ok(_) => return TailEvent::Idle,
            Err(_) => ReopenReason::Vanished,
        };

        self.close();
        TailEvent::Reopen(reason)
    }
}

fn open_at_end(path: &Path) -> io::Result<OpenLog> {
    let mut file = File::open(path)?;
    let identity = FileIdentity::of(&file.metadata()?);
    let offset = file.seek(SeekFrom::End(0))?;

    Ok(OpenLog {
        reader: BufReader::new(file),
        identity,
        offset,
    })
}

/// Decode and drain a complete line, dropping `\n` or `\r\n`.
fn take_line(buf: &mut Vec<u8>) -> String {
    let mut end = buf.len();
    if buf[..end].ends_with(b"\n") {
        end -= 1;
    }
    if buf[..end].ends_with(b"\r") {
        end -= 1;
    }
    let line = String::from_utf8_lossy(&buf[..end]).into_owned();
    buf.clear();
    line
}

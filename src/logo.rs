//! One-shot, fire-and-forget logo loading.
//!
//! A load produces exactly one [`LogoOutcome`]. The receiving half,
//! [`LogoTicket`], is polled by the renderer between frames; dropping it
//! abandons the load without affecting anything else.

use std::fmt;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use crate::error::CubeError;
use crate::texture_bake::LogoImage;

pub type LogoOutcome = Result<LogoImage, CubeError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoSource {
    Path(PathBuf),
    Url(String),
}

impl LogoSource {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            LogoSource::Url(trimmed.to_string())
        } else {
            LogoSource::Path(PathBuf::from(trimmed))
        }
    }

    pub fn fetch_bytes(&self) -> Result<Vec<u8>, CubeError> {
        match self {
            LogoSource::Path(path) => std::fs::read(path).map_err(|e| CubeError::LogoFetch {
                location: path.display().to_string(),
                reason: e.to_string(),
            }),
            LogoSource::Url(url) => fetch_url(url),
        }
    }

    /// Fetches and decodes; the whole load in one call.
    pub fn load(&self) -> LogoOutcome {
        let bytes = self.fetch_bytes()?;
        LogoImage::decode(&bytes)
    }
}

impl fmt::Display for LogoSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogoSource::Path(path) => write!(f, "{}", path.display()),
            LogoSource::Url(url) => f.write_str(url),
        }
    }
}

#[cfg(feature = "remote-logo")]
fn fetch_url(url: &str) -> Result<Vec<u8>, CubeError> {
    let fail = |reason: String| CubeError::LogoFetch {
        location: url.to_string(),
        reason,
    };
    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|e| fail(e.to_string()))?;
    let body = response.bytes().map_err(|e| fail(e.to_string()))?;
    Ok(body.to_vec())
}

#[cfg(not(feature = "remote-logo"))]
fn fetch_url(url: &str) -> Result<Vec<u8>, CubeError> {
    Err(CubeError::LogoFetch {
        location: url.to_string(),
        reason: "built without the `remote-logo` feature".into(),
    })
}

/// Sending half of a load. Consumed by its single resolution.
#[derive(Debug)]
pub struct LogoResolver {
    tx: Sender<LogoOutcome>,
}

impl LogoResolver {
    /// Delivers the outcome. Returns `false` when the ticket is already gone,
    /// i.e. nobody is waiting any more.
    pub fn resolve(self, outcome: LogoOutcome) -> bool {
        self.tx.send(outcome).is_ok()
    }
}

/// Receiving half of a load.
#[derive(Debug)]
pub struct LogoTicket {
    rx: Receiver<LogoOutcome>,
}

impl LogoTicket {
    /// Non-blocking check. `None` while the load is still running; a resolver
    /// dropped without resolving reads as a failed load.
    pub fn try_take(&self) -> Option<LogoOutcome> {
        match self.rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(abandoned())),
        }
    }

    /// Blocks up to `timeout`; for hosts and tests that want to wait.
    pub fn wait(self, timeout: Duration) -> Option<LogoOutcome> {
        match self.rx.recv_timeout(timeout) {
            Ok(outcome) => Some(outcome),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(Err(abandoned())),
        }
    }
}

fn abandoned() -> CubeError {
    CubeError::LogoFetch {
        location: "<loader>".into(),
        reason: "load abandoned without a result".into(),
    }
}

pub fn logo_channel() -> (LogoResolver, LogoTicket) {
    let (tx, rx) = mpsc::channel();
    (LogoResolver { tx }, LogoTicket { rx })
}

/// Starts a logo load and hands back its ticket.
pub trait LogoLoader {
    fn load(&self, source: &LogoSource) -> LogoTicket;
}

/// Fetches and decodes on a short-lived background thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadLogoLoader;

impl LogoLoader for ThreadLogoLoader {
    fn load(&self, source: &LogoSource) -> LogoTicket {
        let (resolver, ticket) = logo_channel();
        let source = source.clone();
        let spawned = thread::Builder::new()
            .name("logo-load".into())
            .spawn(move || {
                let outcome = source.load();
                if !resolver.resolve(outcome) {
                    log::debug!("logo {source} finished after its renderer went away");
                }
            });
        if let Err(e) = spawned {
            // the resolver went down with the closure; the ticket reads as failed
            log::warn!("could not start logo load thread: {e}");
        }
        ticket
    }
}

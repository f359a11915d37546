//! One-shot background loading of timeline content.
//!
//! The content source is queried on a worker thread and polled from the UI
//! thread every frame until it resolves. The timeline itself is only built
//! once the records are in hand.

use std::path::PathBuf;
use std::thread::JoinHandle;

use crate::error::{LoadError, Result};
use crate::record::{load_records, records_from_json, RawEntry};

/// Anything that can produce experience records.
pub trait ContentSource: Send + 'static {
    fn fetch(&self) -> Result<Vec<RawEntry>>;

    fn describe(&self) -> String;
}

impl<S: ContentSource + ?Sized> ContentSource for Box<S> {
    fn fetch(&self) -> Result<Vec<RawEntry>> {
        (**self).fetch()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Records read from a JSON file on disk.
#[derive(Clone, Debug)]
pub struct JsonFileSource {
    pub path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ContentSource for JsonFileSource {
    fn fetch(&self) -> Result<Vec<RawEntry>> {
        load_records(&self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Records that are already in memory.
#[derive(Clone, Debug, Default)]
pub struct StaticSource {
    pub records: Vec<RawEntry>,
}

impl StaticSource {
    pub fn new(records: Vec<RawEntry>) -> Self {
        Self { records }
    }

    /// Parse an embedded JSON document.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(Self::new(records_from_json(text)?))
    }
}

impl ContentSource for StaticSource {
    fn fetch(&self) -> Result<Vec<RawEntry>> {
        Ok(self.records.clone())
    }

    fn describe(&self) -> String {
        format!("{} bundled records", self.records.len())
    }
}

pub enum Fetch<T> {
    Pending(JoinHandle<Result<T>>),
    Ready(T),
    Failed(LoadError),
}

impl<T: Send + 'static> Fetch<T> {
    pub fn spawn(action: impl FnOnce() -> Result<T> + Send + 'static) -> Self {
        Fetch::Pending(std::thread::spawn(action))
    }

    /// Resolve the fetch if the worker finished. Returns `true` exactly on the
    /// call that resolved it.
    pub fn poll(&mut self) -> bool {
        let finished = matches!(self, Fetch::Pending(handle) if handle.is_finished());
        if !finished {
            return false;
        }
        // Swap in a placeholder while the handle is joined.
        let Fetch::Pending(handle) = std::mem::replace(self, Fetch::Failed(LoadError::FetchPanicked))
        else {
            return false;
        };
        *self = match handle.join() {
            Ok(Ok(value)) => Fetch::Ready(value),
            Ok(Err(err)) => Fetch::Failed(err),
            Err(_) => Fetch::Failed(LoadError::FetchPanicked),
        };
        true
    }

    /// Block until the worker is done.
    pub fn wait(self) -> Result<T> {
        match self {
            Fetch::Pending(handle) => handle.join().unwrap_or(Err(LoadError::FetchPanicked)),
            Fetch::Ready(value) => Ok(value),
            Fetch::Failed(err) => Err(err),
        }
    }
}

impl<T> Fetch<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Fetch::Pending(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Fetch::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&LoadError> {
        match self {
            Fetch::Failed(err) => Some(err),
            _ => None,
        }
    }
}

impl Fetch<Vec<RawEntry>> {
    pub fn from_source(source: impl ContentSource) -> Self {
        log::info!("fetching timeline content from {}", source.describe());
        Self::spawn(move || source.fetch())
    }
}

impl<T> std::fmt::Debug for Fetch<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Fetch::Pending(_) => write!(f, "Pending"),
            Fetch::Ready(_) => write!(f, "Ready"),
            Fetch::Failed(err) => write!(f, "Failed({err})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settle<T: Send + 'static>(fetch: &mut Fetch<T>) {
        while fetch.is_pending() {
            fetch.poll();
            std::thread::yield_now();
        }
    }

    #[test]
    fn static_sources_resolve_to_their_records() {
        let source = StaticSource::from_json(r#"[{"role": "Dev", "start": 2020}]"#).unwrap();
        let mut fetch = Fetch::from_source(source);
        settle(&mut fetch);
        assert_eq!(fetch.ready().map(Vec::len), Some(1));
    }

    #[test]
    fn missing_files_fail_softly() {
        let mut fetch = Fetch::from_source(JsonFileSource::new("/no/such/records.json"));
        settle(&mut fetch);
        assert!(matches!(fetch.error(), Some(LoadError::Io { .. })));
    }

    #[test]
    fn panicking_workers_become_errors() {
        let fetch: Fetch<()> = Fetch::spawn(|| panic!("boom"));
        assert!(matches!(fetch.wait(), Err(LoadError::FetchPanicked)));
    }

    #[test]
    fn poll_reports_resolution_once() {
        let mut fetch = Fetch::spawn(|| Ok(3));
        let mut resolutions = 0;
        while fetch.is_pending() {
            if fetch.poll() {
                resolutions += 1;
            }
        }
        assert!(!fetch.poll());
        assert_eq!(resolutions, 1);
        assert_eq!(fetch.ready(), Some(&3));
    }
}

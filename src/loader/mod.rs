//! Dataset sources and the process-wide snapshot cache.
//!
//! A source turns a dataset identifier (e.g. `payroll.csv`) into raw rows.
//! Local files and HTTP(S) endpoints are supported; either way the rows
//! are fetched at most once per identifier for the life of the process.

mod csv_rows;

pub use csv_rows::parse_csv;

use crate::error::LoadError;
use crate::models::RawRecord;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Something that can produce the raw rows of a dataset.
pub trait DatasetSource {
    /// Human-readable location, used in logs and report metadata.
    fn describe(&self) -> String;

    /// Retrieve every raw row of the dataset named `source_id`.
    async fn fetch(&self, source_id: &str) -> Result<Vec<RawRecord>, LoadError>;
}

/// Reads `<root>/<source_id>` from the local filesystem.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DatasetSource for FileSource {
    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    async fn fetch(&self, source_id: &str) -> Result<Vec<RawRecord>, LoadError> {
        let path = self.root.join(source_id);
        info!("Reading dataset from: {}", path.display());

        let data = tokio::fs::read(&path)
            .await
            .map_err(|e| LoadError::SourceUnavailable {
                source_id: path.display().to_string(),
                reason: e.to_string(),
            })?;

        parse_csv(source_id, &data)
    }
}

/// Downloads `<base_url>/<source_id>` over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpSource {
    base_url: String,
    client: reqwest::Client,
    timeout_seconds: u64,
    show_progress: bool,
}

impl HttpSource {
    /// Create a source with a request timeout.
    pub fn new(
        base_url: impl Into<String>,
        timeout_seconds: u64,
        show_progress: bool,
    ) -> Result<Self, LoadError> {
        let base_url = base_url.into();
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| LoadError::SourceUnavailable {
                source_id: base_url.clone(),
                reason: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            base_url,
            client,
            timeout_seconds,
            show_progress,
        })
    }

    fn url_for(&self, source_id: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), source_id)
    }
}

impl DatasetSource for HttpSource {
    fn describe(&self) -> String {
        self.base_url.clone()
    }

    async fn fetch(&self, source_id: &str) -> Result<Vec<RawRecord>, LoadError> {
        let url = self.url_for(source_id);
        info!("Downloading dataset: {}", url);

        let unavailable = |reason: String| LoadError::SourceUnavailable {
            source_id: url.clone(),
            reason,
        };

        let spinner = if self.show_progress {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
                pb.set_style(style);
            }
            pb.set_message(format!("Fetching {}", source_id));
            pb.enable_steady_tick(Duration::from_millis(120));
            Some(pb)
        } else {
            None
        };

        let download = async {
            let response = self.client.get(&url).send().await.map_err(|e| {
                if e.is_timeout() {
                    unavailable(format!("request timed out after {}s", self.timeout_seconds))
                } else if e.is_connect() {
                    unavailable("cannot connect".to_string())
                } else {
                    unavailable(e.to_string())
                }
            })?;

            if !response.status().is_success() {
                return Err(unavailable(format!("HTTP {}", response.status())));
            }

            let body = response
                .bytes()
                .await
                .map_err(|e| unavailable(format!("failed to read body: {}", e)))?;
            Ok::<_, LoadError>(body)
        };
        let result = download.await;

        if let Some(pb) = spinner {
            match result {
                Ok(ref body) => pb.finish_with_message(format!("Fetched {} bytes", body.len())),
                Err(_) => pb.finish_and_clear(),
            }
        }

        parse_csv(source_id, &result?)
    }
}

/// A source chosen at runtime from a location string.
#[derive(Debug, Clone)]
pub enum AnySource {
    File(FileSource),
    Http(HttpSource),
}

impl DatasetSource for AnySource {
    fn describe(&self) -> String {
        match self {
            AnySource::File(source) => source.describe(),
            AnySource::Http(source) => source.describe(),
        }
    }

    async fn fetch(&self, source_id: &str) -> Result<Vec<RawRecord>, LoadError> {
        match self {
            AnySource::File(source) => source.fetch(source_id).await,
            AnySource::Http(source) => source.fetch(source_id).await,
        }
    }
}

/// Returns true if the location should be fetched over HTTP.
pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Split a location into a source and a dataset identifier.
///
/// With an explicit `dataset_id`, `location` is the directory or base URL
/// holding it. Otherwise the last path segment of `location` is the id.
pub fn open_source(
    location: &str,
    dataset_id: Option<&str>,
    timeout_seconds: u64,
    show_progress: bool,
) -> Result<(AnySource, String), LoadError> {
    let (base, id) = match dataset_id {
        Some(id) => (location.to_string(), id.to_string()),
        None => split_location(location)?,
    };

    let source = if is_remote(&base) {
        AnySource::Http(HttpSource::new(base, timeout_seconds, show_progress)?)
    } else {
        AnySource::File(FileSource::new(base))
    };

    Ok((source, id))
}

fn split_location(location: &str) -> Result<(String, String), LoadError> {
    let no_dataset = || LoadError::SourceUnavailable {
        source_id: location.to_string(),
        reason: "location does not name a dataset".to_string(),
    };

    if is_remote(location) {
        let (base, id) = location.rsplit_once('/').ok_or_else(no_dataset)?;
        if id.is_empty() || base.ends_with('/') {
            return Err(no_dataset());
        }
        return Ok((base.to_string(), id.to_string()));
    }

    let path = Path::new(location);
    let id = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(no_dataset)?;
    let root = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    Ok((root.display().to_string(), id.to_string()))
}

/// Memoizes raw snapshots by dataset identifier.
///
/// Entries are never invalidated; a new process starts with an empty cache.
pub struct DatasetCache<S> {
    source: S,
    snapshots: HashMap<String, Arc<Vec<RawRecord>>>,
}

impl<S: DatasetSource> DatasetCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            snapshots: HashMap::new(),
        }
    }

    /// The underlying source.
    #[allow(dead_code)] // Accessor for inspecting the wrapped source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Return the cached snapshot for `dataset_id`, fetching it on first use.
    pub async fn get_or_fetch(&mut self, dataset_id: &str) -> Result<Arc<Vec<RawRecord>>, LoadError> {
        if let Some(rows) = self.snapshots.get(dataset_id) {
            debug!("Cache hit for dataset {}", dataset_id);
            return Ok(Arc::clone(rows));
        }

        let rows = Arc::new(self.source.fetch(dataset_id).await?);
        info!("Loaded {} raw rows for {}", rows.len(), dataset_id);
        self.snapshots
            .insert(dataset_id.to_string(), Arc::clone(&rows));

        Ok(rows)
    }
}

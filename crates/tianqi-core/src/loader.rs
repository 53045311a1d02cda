//! Data loader: three documents per base, fetched concurrently and joined all-or-nothing.
//! Candidate bases are probed in order until one serves all three.

use crate::model::{
    CharacterData, ProjectsData, ReportsData, Snapshot, CHARACTER_FILE, PROJECTS_FILE, REPORTS_FILE,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to load {document}: HTTP {status}")]
    Status { document: String, status: u16 },

    #[error("failed to read {document}: {source}")]
    Io {
        document: String,
        #[source]
        source: std::io::Error,
    },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid {document}: {source}")]
    Parse {
        document: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no data locations configured")]
    NoCandidates,
}

/// One base location serving the three documents.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Human-readable base, for logs.
    fn describe(&self) -> String;

    /// Raw bytes of `name`; any non-success outcome is an error.
    async fn fetch(&self, name: &str) -> Result<Vec<u8>, LoadError>;
}

/// Documents on the local filesystem under `root`.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl DocumentSource for DirSource {
    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    async fn fetch(&self, name: &str) -> Result<Vec<u8>, LoadError> {
        let path = self.root.join(name);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(LoadError::Status {
                document: name.to_string(),
                status: 404,
            }),
            Err(e) => Err(LoadError::Io {
                document: name.to_string(),
                source: e,
            }),
        }
    }
}

/// Documents served over HTTP relative to `base_url`.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { client, base_url }
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    fn describe(&self) -> String {
        self.base_url.clone()
    }

    async fn fetch(&self, name: &str) -> Result<Vec<u8>, LoadError> {
        let url = format!("{}{}", self.base_url, name);
        let res = self.client.get(&url).send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                document: name.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(res.bytes().await?.to_vec())
    }
}

/// Source for a configured base: `http(s)://` is remote, anything else a directory.
pub fn source_for(base: &str, client: &reqwest::Client) -> Box<dyn DocumentSource> {
    if base.starts_with("http://") || base.starts_with("https://") {
        Box::new(HttpSource::new(client.clone(), base))
    } else {
        Box::new(DirSource::new(base))
    }
}

async fn fetch_json<T: DeserializeOwned>(
    source: &dyn DocumentSource,
    name: &str,
) -> Result<T, LoadError> {
    let bytes = source.fetch(name).await?;
    serde_json::from_slice(&bytes).map_err(|e| LoadError::Parse {
        document: name.to_string(),
        source: e,
    })
}

/// Loads all three documents from one source. The first failure aborts the whole load.
pub async fn load_snapshot(source: &dyn DocumentSource) -> Result<Snapshot, LoadError> {
    let (character, reports, projects) = tokio::try_join!(
        fetch_json::<CharacterData>(source, CHARACTER_FILE),
        fetch_json::<ReportsData>(source, REPORTS_FILE),
        fetch_json::<ProjectsData>(source, PROJECTS_FILE),
    )?;
    Ok(Snapshot {
        character,
        reports,
        projects,
    })
}

/// Probes candidates in order; the first complete load wins, else the last error is returned.
pub async fn load_from_candidates(
    sources: &[Box<dyn DocumentSource>],
) -> Result<Snapshot, LoadError> {
    let mut last_err = LoadError::NoCandidates;
    for source in sources {
        tracing::info!(base = %source.describe(), "loading dashboard data");
        match load_snapshot(source.as_ref()).await {
            Ok(snapshot) => {
                tracing::info!(
                    base = %source.describe(),
                    reports = snapshot.reports.reports.len(),
                    projects = snapshot.projects.projects.len(),
                    "dashboard data loaded"
                );
                return Ok(snapshot);
            }
            Err(e) => {
                tracing::warn!(base = %source.describe(), error = %e, "candidate base failed");
                last_err = e;
            }
        }
    }
    Err(last_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapSource(HashMap<&'static str, Result<&'static str, u16>>);

    #[async_trait]
    impl DocumentSource for MapSource {
        fn describe(&self) -> String {
            "memory".to_string()
        }

        async fn fetch(&self, name: &str) -> Result<Vec<u8>, LoadError> {
            match self.0.get(name) {
                Some(Ok(body)) => Ok(body.as_bytes().to_vec()),
                Some(Err(status)) => Err(LoadError::Status {
                    document: name.to_string(),
                    status: *status,
                }),
                None => Err(LoadError::Status {
                    document: name.to_string(),
                    status: 404,
                }),
            }
        }
    }

    const CHARACTER: &str = r#"{"character": {"level": 7}}"#;
    const REPORTS: &str = r#"{"reports": [{"date": "2026-03-01"}]}"#;
    const PROJECTS: &str = r#"{"projects": []}"#;

    fn full() -> MapSource {
        MapSource(HashMap::from([
            (CHARACTER_FILE, Ok(CHARACTER)),
            (REPORTS_FILE, Ok(REPORTS)),
            (PROJECTS_FILE, Ok(PROJECTS)),
        ]))
    }

    #[tokio::test]
    async fn loads_all_three_documents() {
        let snap = load_snapshot(&full()).await.unwrap();
        assert_eq!(snap.character.character.level, 7);
        assert_eq!(snap.reports.reports[0].date, "2026-03-01");
        assert!(snap.projects.projects.is_empty());
    }

    #[tokio::test]
    async fn one_failed_document_fails_the_load() {
        let mut src = full();
        src.0.insert(REPORTS_FILE, Err(500));
        let err = load_snapshot(&src).await.unwrap_err();
        assert!(matches!(err, LoadError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn malformed_json_is_a_parse_error() {
        let mut src = full();
        src.0.insert(PROJECTS_FILE, Ok("{not json"));
        let err = load_snapshot(&src).await.unwrap_err();
        match err {
            LoadError::Parse { document, .. } => assert_eq!(document, PROJECTS_FILE),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn falls_back_to_next_candidate() {
        let broken = MapSource(HashMap::new());
        let sources: Vec<Box<dyn DocumentSource>> = vec![Box::new(broken), Box::new(full())];
        let snap = load_from_candidates(&sources).await.unwrap();
        assert_eq!(snap.character.character.level, 7);
    }

    #[tokio::test]
    async fn no_candidates_is_an_error() {
        let err = load_from_candidates(&[]).await.unwrap_err();
        assert!(matches!(err, LoadError::NoCandidates));
    }
}

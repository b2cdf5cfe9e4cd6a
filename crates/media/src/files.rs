//! Local filesystem access for media: `file://` reads and the type-scoped
//! data directory search.

use std::path::{Component, Path, PathBuf};

use {cqbridge_config::MediaConfig, tracing::debug};

use crate::kind::MediaKind;

/// Read a file if it exists and is readable; anything else is `None`.
pub async fn read_if_readable(path: &Path) -> Option<Vec<u8>> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => {},
        _ => {
            debug!(path = %path.display(), "media file not found");
            return None;
        },
    }
    match tokio::fs::read(path).await {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "media file not readable");
            None
        },
    }
}

/// Search roots for named media.
///
/// For a name `n` of kind `k`, candidates are `<root>/k/n` for each root in
/// order, then `n` itself relative to the working directory.
#[derive(Debug, Clone)]
pub struct DataDirs {
    roots: Vec<PathBuf>,
}

impl DataDirs {
    #[must_use]
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// Configured data dir (or the platform default), `./data`, then any
    /// extra search paths.
    #[must_use]
    pub fn from_config(config: &MediaConfig) -> Self {
        let mut roots = vec![
            config
                .data_dir
                .clone()
                .unwrap_or_else(cqbridge_config::default_data_dir),
            PathBuf::from("data"),
        ];
        roots.extend(config.search_paths.iter().cloned());
        roots.dedup();
        Self { roots }
    }

    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Candidate paths for `name`, in search order. Absolute names and names
    /// that climb out of a root with `..` yield no candidates.
    #[must_use]
    pub fn candidates(&self, kind: MediaKind, name: &str) -> Vec<PathBuf> {
        let rel = Path::new(name);
        if rel.components().any(|c| {
            matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_))
        }) {
            debug!(name, "media name escapes the data directories");
            return Vec::new();
        }
        self.roots
            .iter()
            .map(|root| root.join(kind.as_str()).join(rel))
            .chain(std::iter::once(rel.to_path_buf()))
            .collect()
    }

    /// Bytes of the first readable candidate.
    pub async fn read(&self, kind: MediaKind, name: &str) -> Option<Vec<u8>> {
        for path in self.candidates(kind, name) {
            if let Some(bytes) = read_if_readable(&path).await {
                debug!(path = %path.display(), "media found in data directory");
                return Some(bytes);
            }
        }
        None
    }
}

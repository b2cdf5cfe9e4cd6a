use std::path::{Path, PathBuf};

use {
    anyhow::Context,
    tracing::{debug, warn},
};

use crate::{env_subst::substitute_env, schema::BridgeConfig};

/// File names tried in each search directory, in order.
const CONFIG_FILENAMES: &[&str] = &[
    "cqbridge.toml",
    "cqbridge.yaml",
    "cqbridge.yml",
    "cqbridge.json",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Yaml,
    Json,
}

impl Format {
    fn of(path: &Path) -> anyhow::Result<Self> {
        match path.extension().and_then(|e| e.to_str()).unwrap_or("toml") {
            "toml" => Ok(Self::Toml),
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            other => anyhow::bail!("unsupported config format: .{other}"),
        }
    }

    fn parse(self, raw: &str) -> anyhow::Result<BridgeConfig> {
        Ok(match self {
            Self::Toml => toml::from_str(raw)?,
            Self::Yaml => serde_yaml::from_str(raw)?,
            Self::Json => serde_json::from_str(raw)?,
        })
    }
}

/// Load a config file, expanding `${ENV}` placeholders first.
///
/// Relative `media.data_dir` and `media.search_paths` entries are taken
/// relative to the file's own directory, so a config can sit next to its
/// media folders.
pub fn load_config(path: &Path) -> anyhow::Result<BridgeConfig> {
    let format = Format::of(path)?;
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let mut config = format
        .parse(&substitute_env(&raw))
        .with_context(|| format!("failed to parse {}", path.display()))?;
    if let Some(base) = path.parent() {
        anchor_media_paths(&mut config, base);
    }
    Ok(config)
}

fn anchor_media_paths(config: &mut BridgeConfig, base: &Path) {
    let anchor = |p: &mut PathBuf| {
        if p.is_relative() {
            *p = base.join(&*p);
        }
    };
    if let Some(dir) = config.media.data_dir.as_mut() {
        anchor(dir);
    }
    config.media.search_paths.iter_mut().for_each(anchor);
}

/// Directories searched for a config file.
#[derive(Debug, Clone)]
pub struct ConfigSearch {
    dirs: Vec<PathBuf>,
}

impl ConfigSearch {
    #[must_use]
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// The working directory, then the user config dir
    /// (`~/.config/cqbridge/` on Linux).
    #[must_use]
    pub fn standard() -> Self {
        let mut dirs = vec![PathBuf::from(".")];
        dirs.extend(config_dir());
        Self { dirs }
    }

    /// First existing config file: directories in order, and within each
    /// directory the names in [`CONFIG_FILENAMES`] order.
    #[must_use]
    pub fn find(&self) -> Option<PathBuf> {
        self.dirs
            .iter()
            .flat_map(|dir| CONFIG_FILENAMES.iter().map(move |name| dir.join(name)))
            .find(|p| p.is_file())
    }

    /// Load the first config found, or the defaults when there is none or it
    /// cannot be loaded.
    #[must_use]
    pub fn load_or_default(&self) -> BridgeConfig {
        let Some(path) = self.find() else {
            debug!("no config file found, using defaults");
            return BridgeConfig::default();
        };
        debug!(path = %path.display(), "loading config");
        load_config(&path).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %format!("{e:#}"), "failed to load config, using defaults");
            BridgeConfig::default()
        })
    }
}

/// [`ConfigSearch::standard`] then [`ConfigSearch::load_or_default`].
#[must_use]
pub fn discover_and_load() -> BridgeConfig {
    ConfigSearch::standard().load_or_default()
}

/// Returns the user-global config directory.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "cqbridge").map(|d| d.config_dir().to_path_buf())
}

/// Returns the platform data directory, falling back to `./data`.
///
/// Media data directories live under it as `image/` and `record/`.
pub fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "cqbridge")
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("data"))
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_toml_and_anchors_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cqbridge.toml");
        std::fs::write(
            &path,
            "[media]\ndefault_timeout_secs = 5\ndata_dir = \"assets\"\nsearch_paths = [\"/srv/media\", \"extra\"]\n",
        )
        .unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.media.default_timeout_secs, 5);
        assert_eq!(cfg.media.data_dir, Some(dir.path().join("assets")));
        assert_eq!(cfg.media.search_paths, vec![
            PathBuf::from("/srv/media"),
            dir.path().join("extra"),
        ]);
    }

    #[test]
    fn loads_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cqbridge.json");
        std::fs::write(&path, r#"{"reply": {"enabled": false}}"#).unwrap();

        let cfg = load_config(&path).unwrap();
        assert!(!cfg.reply.enabled);
        assert!(cfg.media.cache_enabled);
        assert!(cfg.media.data_dir.is_none());
    }

    #[test]
    fn rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cqbridge.ini");
        std::fs::write(&path, "media=1").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported config format"));
    }

    #[test]
    fn errors_name_the_file() {
        let err = load_config(Path::new("/nonexistent/cqbridge.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/cqbridge.toml"));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cqbridge.yaml");
        std::fs::write(&path, "media: [not, a, table]\n").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().starts_with("failed to parse"));
    }

    #[test]
    fn search_order_is_directory_then_name() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        std::fs::write(second.path().join("cqbridge.json"), "{}").unwrap();
        std::fs::write(second.path().join("cqbridge.toml"), "").unwrap();

        let search = ConfigSearch::new(vec![
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ]);
        assert_eq!(search.find(), Some(second.path().join("cqbridge.toml")));

        std::fs::write(first.path().join("cqbridge.yml"), "reply:\n  enabled: false\n").unwrap();
        assert_eq!(search.find(), Some(first.path().join("cqbridge.yml")));
        assert!(!search.load_or_default().reply.enabled);
    }

    #[test]
    fn broken_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cqbridge.toml"), "[reply]\nenabled = \"sometimes\"\n").unwrap();

        let cfg = ConfigSearch::new(vec![dir.path().to_path_buf()]).load_or_default();
        assert!(cfg.reply.enabled);
    }

    #[test]
    fn nothing_found_is_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let search = ConfigSearch::new(vec![dir.path().to_path_buf()]);
        assert!(search.find().is_none());
        assert!(search.load_or_default().media.cache_enabled);
    }
}

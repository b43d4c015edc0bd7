// File-backed queue source
// reason: config crate for yaml/json/toml lookup, serde for entry decoding

use config::{Config, File};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use queue_daemon_core::domain::QueueParams;
use queue_daemon_core::port::{ConfigError, QueueSource};

/// Config file name without extension
pub const CONFIG_FILE_STEM: &str = "config";

/// Extensions probed, in order, when looking up the config in a directory
pub const CONFIG_EXTENSIONS: &[&str] = &["yaml", "yml", "json", "toml"];

/// One queue entry as written in the file.
///
/// Numbers are accepted as strings or integers and kept as strings.
#[derive(Debug, Default, Deserialize)]
struct RawQueue {
    #[serde(default)]
    processes: Option<String>,
    #[serde(default)]
    interval: Option<String>,
    #[serde(default)]
    environment: Option<String>,
    #[serde(default)]
    project: Option<String>,
}

impl From<RawQueue> for QueueParams {
    fn from(raw: RawQueue) -> Self {
        QueueParams::new(
            raw.processes.unwrap_or_default(),
            raw.interval.unwrap_or_default(),
            raw.environment.unwrap_or_default(),
            raw.project.unwrap_or_default(),
        )
    }
}

/// Queue source loaded once from a config file
#[derive(Debug, Clone)]
pub struct FileQueueSource {
    path: PathBuf,
    queues: BTreeMap<String, QueueParams>,
}

impl FileQueueSource {
    /// Load `config.<ext>` from the directory holding the running executable
    pub fn load_beside_executable() -> Result<Self, ConfigError> {
        let dir = executable_dir()?;
        Self::load_from_dir(&dir)
    }

    /// Load `config.<ext>` from `dir`, first matching extension wins
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let path = CONFIG_EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{}.{}", CONFIG_FILE_STEM, ext)))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| ConfigError::NotFound(dir.to_path_buf()))?;
        Self::load(&path)
    }

    /// Load an explicit file; the format follows its extension
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        debug!(path = %path.display(), "Reading queue configuration");

        let read_error = |e: config::ConfigError| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        let settings = Config::builder()
            .add_source(File::from(path).required(true))
            .build()
            .map_err(read_error)?;

        let raw: BTreeMap<String, RawQueue> = settings.try_deserialize().map_err(read_error)?;
        let queues: BTreeMap<String, QueueParams> = raw
            .into_iter()
            .map(|(name, entry)| (name, QueueParams::from(entry)))
            .collect();

        info!(
            path = %path.display(),
            queues = queues.len(),
            "Queue configuration loaded"
        );

        Ok(Self {
            path: path.to_path_buf(),
            queues,
        })
    }

    /// File this source was read from
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl QueueSource for FileQueueSource {
    fn queue_names(&self) -> Vec<String> {
        self.queues.keys().cloned().collect()
    }

    fn queue_params(&self, name: &str) -> Result<QueueParams, ConfigError> {
        self.queues.queue_params(name)
    }
}

/// Directory containing the running executable
pub fn executable_dir() -> Result<PathBuf, ConfigError> {
    let exe = std::env::current_exe().map_err(|e| ConfigError::ExecutablePath(e.to_string()))?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| ConfigError::ExecutablePath(format!("{} has no parent", exe.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use queue_daemon_core::application::resolve_queue_specs;
    use std::fs;
    use tempfile::TempDir;

    const YAML: &str = r#"
emails:
  processes: "2"
  interval: "10"
  environment: prod
  project: shop
thumbnails:
  processes: 1
  interval: 60
  environment: dev
  project: media
"#;

    #[test]
    fn test_load_yaml_from_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.yaml"), YAML).unwrap();

        let source = FileQueueSource::load_from_dir(dir.path()).unwrap();
        assert_eq!(source.path(), dir.path().join("config.yaml"));
        assert_eq!(source.queue_names(), vec!["emails", "thumbnails"]);

        let emails = source.queue_params("emails").unwrap();
        assert_eq!(emails, QueueParams::new("2", "10", "prod", "shop"));

        // Integers are read back as strings
        let thumbs = source.queue_params("thumbnails").unwrap();
        assert_eq!(thumbs.processes, "1");
        assert_eq!(thumbs.interval, "60");
    }

    #[test]
    fn test_load_json_by_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("queues.json");
        fs::write(
            &path,
            r#"{"q1": {"processes": "3", "interval": "1", "environment": "dev", "project": "p"}}"#,
        )
        .unwrap();

        let source = FileQueueSource::load(&path).unwrap();
        let specs = resolve_queue_specs(&source).unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].worker_count(), 3);
    }

    #[test]
    fn test_missing_fields_become_empty() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.yml"), "q1:\n  processes: \"1\"\n").unwrap();

        let source = FileQueueSource::load_from_dir(dir.path()).unwrap();
        let params = source.queue_params("q1").unwrap();
        assert_eq!(params.interval, "");
        assert_eq!(params.project, "");
        assert!(resolve_queue_specs(&source).is_err());
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = FileQueueSource::load_from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_malformed_file_is_read_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.yaml"), "q1: [unclosed").unwrap();

        let err = FileQueueSource::load_from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_unknown_queue() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.yaml"), YAML).unwrap();

        let source = FileQueueSource::load_from_dir(dir.path()).unwrap();
        assert!(matches!(
            source.queue_params("nope"),
            Err(ConfigError::UnknownQueue(_))
        ));
    }

    #[test]
    fn test_executable_dir_exists() {
        assert!(executable_dir().unwrap().is_dir());
    }
}

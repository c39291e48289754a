//! Configuration module
//!
//! Resolves the publisher's settings once from the process environment (after
//! loading `.env`), so the publisher itself never reads global state.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::artifact::{ArtifactDescriptor, SuffixRule};
use crate::storage_types::StorageBackend;

const DEFAULT_ARTIFACT_VARS: &[&str] = &["NGROK", "NGROKD"];
const DEFAULT_REGION: &str = "us-east-1";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(String),

    #[error("invalid value {value:?} for {var}: {reason}")]
    Invalid {
        var: String,
        value: String,
        reason: String,
    },
}

/// Resolved publisher configuration.
#[derive(Clone, Debug)]
pub struct PublisherConfig {
    pub version: String,
    /// (variable name, path) in publish order.
    pub artifacts: Vec<(String, PathBuf)>,
    pub target_os: Option<String>,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub bucket: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub region: String,
    pub endpoint: Option<String>, // S3-compatible providers (MinIO, Spaces, ...)
    pub local_storage_path: Option<PathBuf>,
    pub local_storage_base_url: Option<String>,
    // Run behaviour
    pub upload_timeout: Option<Duration>,
    pub dry_run: bool,
}

impl PublisherConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(env::vars())
    }

    /// Build from an explicit set of variables.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let get = |name: &str| vars.get(name).filter(|v| !v.is_empty()).cloned();

        let version = vars
            .get("VERSION")
            .cloned()
            .ok_or_else(|| ConfigError::Missing("VERSION".to_string()))?;

        let artifact_vars: Vec<String> = match get("ARTIFACT_VARS") {
            Some(list) => list
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => DEFAULT_ARTIFACT_VARS.iter().map(|s| s.to_string()).collect(),
        };

        let artifacts = artifact_vars
            .into_iter()
            .map(|var| {
                get(&var)
                    .map(|path| (var.clone(), PathBuf::from(path)))
                    .ok_or(ConfigError::Missing(var))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let storage_backend = match get("STORAGE_BACKEND") {
            Some(raw) => raw.parse::<StorageBackend>().map_err(|e| ConfigError::Invalid {
                var: "STORAGE_BACKEND".to_string(),
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => StorageBackend::default(),
        };

        let upload_timeout = match get("UPLOAD_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                    ConfigError::Invalid {
                        var: "UPLOAD_TIMEOUT_SECS".to_string(),
                        value: raw.clone(),
                        reason: e.to_string(),
                    }
                })?;
                (secs > 0).then_some(Duration::from_secs(secs))
            }
            None => None,
        };

        let dry_run = match get("DRY_RUN") {
            Some(raw) => parse_bool("DRY_RUN", &raw)?,
            None => false,
        };

        Ok(PublisherConfig {
            version,
            artifacts,
            target_os: get("GOOS"),
            storage_backend,
            bucket: get("BUCKET"),
            access_key: get("AWS_ACCESS_KEY"),
            secret_key: get("AWS_SECRET_KEY"),
            region: get("S3_REGION")
                .or_else(|| get("AWS_REGION"))
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
            endpoint: get("S3_ENDPOINT"),
            local_storage_path: get("LOCAL_STORAGE_PATH").map(PathBuf::from),
            local_storage_base_url: get("LOCAL_STORAGE_BASE_URL"),
            upload_timeout,
            dry_run,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version.is_empty() {
            return Err(ConfigError::Missing("VERSION".to_string()));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.bucket.is_none() {
                    return Err(ConfigError::Missing("BUCKET".to_string()));
                }
                if self.access_key.is_none() {
                    return Err(ConfigError::Missing("AWS_ACCESS_KEY".to_string()));
                }
                if self.secret_key.is_none() {
                    return Err(ConfigError::Missing("AWS_SECRET_KEY".to_string()));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(ConfigError::Missing("LOCAL_STORAGE_PATH".to_string()));
                }
            }
        }

        Ok(())
    }

    /// Descriptors for every configured artifact, in configuration order.
    pub fn descriptors(&self) -> Vec<ArtifactDescriptor> {
        self.artifacts
            .iter()
            .map(|(_, path)| {
                let descriptor = ArtifactDescriptor::new(path.clone(), self.version.clone());
                match &self.target_os {
                    Some(os) => descriptor.with_suffix_rule(SuffixRule::windows_exe(os.clone())),
                    None => descriptor,
                }
            })
            .collect()
    }

    /// Human-readable destination, e.g. `s3://releases` or a local directory.
    pub fn destination(&self) -> String {
        match self.storage_backend {
            StorageBackend::S3 => format!("s3://{}", self.bucket.as_deref().unwrap_or_default()),
            StorageBackend::Local => self
                .local_storage_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        }
    }
}

fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var: var.to_string(),
            value: raw.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_vars() -> Vec<(&'static str, &'static str)> {
        vec![
            ("AWS_ACCESS_KEY", "AKIDEXAMPLE"),
            ("AWS_SECRET_KEY", "secret"),
            ("BUCKET", "releases"),
            ("VERSION", "2.1.3"),
            ("NGROK", "/rel/linux_amd64/ngrok"),
            ("NGROKD", "/rel/linux_amd64/ngrokd"),
        ]
    }

    fn with(extra: &[(&'static str, &'static str)]) -> Vec<(&'static str, &'static str)> {
        let mut vars = base_vars();
        vars.extend_from_slice(extra);
        vars
    }

    #[test]
    fn loads_defaults() {
        let config = PublisherConfig::from_vars(base_vars()).unwrap();
        config.validate().unwrap();

        assert_eq!(config.version, "2.1.3");
        assert_eq!(config.storage_backend, StorageBackend::S3);
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.upload_timeout, None);
        assert!(!config.dry_run);
        assert_eq!(config.destination(), "s3://releases");
        assert_eq!(
            config.artifacts,
            vec![
                ("NGROK".to_string(), PathBuf::from("/rel/linux_amd64/ngrok")),
                ("NGROKD".to_string(), PathBuf::from("/rel/linux_amd64/ngrokd")),
            ]
        );
    }

    #[test]
    fn missing_artifact_path_is_reported_by_name() {
        let vars: Vec<_> = base_vars()
            .into_iter()
            .filter(|(k, _)| *k != "NGROKD")
            .collect();
        let err = PublisherConfig::from_vars(vars).unwrap_err();
        assert_eq!(err, ConfigError::Missing("NGROKD".to_string()));
    }

    #[test]
    fn missing_version_rejected() {
        let vars: Vec<_> = base_vars()
            .into_iter()
            .filter(|(k, _)| *k != "VERSION")
            .collect();
        assert_eq!(
            PublisherConfig::from_vars(vars).unwrap_err(),
            ConfigError::Missing("VERSION".to_string())
        );
    }

    #[test]
    fn empty_version_fails_validation() {
        let config = PublisherConfig::from_vars(with(&[("VERSION", "")])).unwrap();
        assert_eq!(
            config.validate().unwrap_err(),
            ConfigError::Missing("VERSION".to_string())
        );
    }

    #[test]
    fn s3_requires_credentials() {
        let vars: Vec<_> = base_vars()
            .into_iter()
            .filter(|(k, _)| *k != "AWS_SECRET_KEY")
            .collect();
        let config = PublisherConfig::from_vars(vars).unwrap();
        assert_eq!(
            config.validate().unwrap_err(),
            ConfigError::Missing("AWS_SECRET_KEY".to_string())
        );
    }

    #[test]
    fn local_backend_requires_path() {
        let config =
            PublisherConfig::from_vars(with(&[("STORAGE_BACKEND", "local")])).unwrap();
        assert_eq!(
            config.validate().unwrap_err(),
            ConfigError::Missing("LOCAL_STORAGE_PATH".to_string())
        );
    }

    #[test]
    fn goos_windows_adds_exe_to_every_descriptor() {
        let config = PublisherConfig::from_vars(with(&[("GOOS", "windows")])).unwrap();
        let paths: Vec<_> = config
            .descriptors()
            .iter()
            .map(|d| d.effective_path())
            .collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/rel/linux_amd64/ngrok.exe"),
                PathBuf::from("/rel/linux_amd64/ngrokd.exe"),
            ]
        );
    }

    #[test]
    fn goos_linux_keeps_paths() {
        let config = PublisherConfig::from_vars(with(&[("GOOS", "linux")])).unwrap();
        let descriptors = config.descriptors();
        assert_eq!(
            descriptors[0].effective_path(),
            PathBuf::from("/rel/linux_amd64/ngrok")
        );
        assert!(descriptors.iter().all(|d| d.version == "2.1.3"));
    }

    #[test]
    fn artifact_vars_override() {
        let config = PublisherConfig::from_vars(with(&[
            ("ARTIFACT_VARS", "AGENT, NGROK"),
            ("AGENT", "/rel/linux_arm/agent"),
        ]))
        .unwrap();
        let names: Vec<_> = config.artifacts.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["AGENT", "NGROK"]);
    }

    #[test]
    fn parses_run_options() {
        let config = PublisherConfig::from_vars(with(&[
            ("UPLOAD_TIMEOUT_SECS", "30"),
            ("DRY_RUN", "true"),
            ("AWS_REGION", "eu-west-1"),
        ]))
        .unwrap();
        assert_eq!(config.upload_timeout, Some(Duration::from_secs(30)));
        assert!(config.dry_run);
        assert_eq!(config.region, "eu-west-1");

        let config = PublisherConfig::from_vars(with(&[("UPLOAD_TIMEOUT_SECS", "0")])).unwrap();
        assert_eq!(config.upload_timeout, None);
    }

    #[test]
    fn rejects_malformed_values() {
        for (var, value) in [
            ("UPLOAD_TIMEOUT_SECS", "soon"),
            ("DRY_RUN", "maybe"),
            ("STORAGE_BACKEND", "ftp"),
        ] {
            let err = PublisherConfig::from_vars(with(&[(var, value)])).unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid { var: ref v, .. } if v == var),
                "{var}: {err:?}"
            );
        }
    }
}

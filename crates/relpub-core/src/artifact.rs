//! Artifact descriptors and path resolution.
//!
//! A descriptor names one local build output. Resolving it applies the
//! optional suffix rule, then reads the platform tag and file name off the
//! effective path: `.../{platform}/{file name}`.

use crate::keys::{storage_key, StorageKey};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Target OS that triggers the executable suffix.
pub const WINDOWS_OS: &str = "windows";
/// Suffix appended to artifact paths when building for Windows.
pub const EXE_SUFFIX: &str = ".exe";

/// Reasons a descriptor cannot be turned into a storage key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("no artifacts to publish")]
    NoArtifacts,

    #[error("version is empty")]
    EmptyVersion,

    #[error("path {0} has no file name")]
    EmptyBaseName(PathBuf),

    #[error("path {0} has no platform directory")]
    EmptyPlatform(PathBuf),

    #[error("path {0} is not valid UTF-8")]
    NonUtf8Path(PathBuf),
}

/// Conditional suffix applied to an artifact path.
///
/// Holds when `target_os` equals `trigger_os`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuffixRule {
    pub target_os: String,
    pub trigger_os: String,
    pub suffix: String,
}

impl SuffixRule {
    pub fn new(
        target_os: impl Into<String>,
        trigger_os: impl Into<String>,
        suffix: impl Into<String>,
    ) -> Self {
        Self {
            target_os: target_os.into(),
            trigger_os: trigger_os.into(),
            suffix: suffix.into(),
        }
    }

    /// `.exe` when `target_os` is `windows`.
    pub fn windows_exe(target_os: impl Into<String>) -> Self {
        Self::new(target_os, WINDOWS_OS, EXE_SUFFIX)
    }

    pub fn holds(&self) -> bool {
        self.target_os == self.trigger_os
    }

    /// Append the suffix to `path` when the rule holds.
    pub fn apply(&self, path: &Path) -> PathBuf {
        if !self.holds() {
            return path.to_path_buf();
        }
        let mut raw = path.as_os_str().to_os_string();
        raw.push(&self.suffix);
        PathBuf::from(raw)
    }
}

/// One local build output to publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactDescriptor {
    pub local_path: PathBuf,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix_rule: Option<SuffixRule>,
}

impl ArtifactDescriptor {
    pub fn new(local_path: impl Into<PathBuf>, version: impl Into<String>) -> Self {
        Self {
            local_path: local_path.into(),
            version: version.into(),
            suffix_rule: None,
        }
    }

    pub fn with_suffix_rule(mut self, rule: SuffixRule) -> Self {
        self.suffix_rule = Some(rule);
        self
    }

    /// Path after the suffix rule, if any, has been applied.
    pub fn effective_path(&self) -> PathBuf {
        match &self.suffix_rule {
            Some(rule) => rule.apply(&self.local_path),
            None => self.local_path.clone(),
        }
    }

    /// Platform tag taken from the directory that contains the artifact.
    pub fn platform_tag(&self) -> Result<String, DescriptorError> {
        let path = self.effective_path();
        let (dir, _) = split_path(&path)?;
        platform_of(&path, dir)
    }

    /// Resolve the effective path, platform tag, file name and storage key.
    pub fn resolve(&self) -> Result<ResolvedArtifact, DescriptorError> {
        if self.version.is_empty() {
            return Err(DescriptorError::EmptyVersion);
        }

        let effective_path = self.effective_path();
        let (dir, base_name) = split_path(&effective_path)?;
        let platform_tag = platform_of(&effective_path, dir)?;
        let base_name = base_name.to_string();
        let key = storage_key(&platform_tag, &self.version, &base_name);

        Ok(ResolvedArtifact {
            effective_path,
            platform_tag,
            base_name,
            key,
        })
    }
}

/// A descriptor with its path and key worked out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedArtifact {
    pub effective_path: PathBuf,
    pub platform_tag: String,
    pub base_name: String,
    pub key: StorageKey,
}

/// Split into (parent directory, file name). A trailing separator means no file name.
fn split_path(path: &Path) -> Result<(&Path, &str), DescriptorError> {
    let raw = path
        .to_str()
        .ok_or_else(|| DescriptorError::NonUtf8Path(path.to_path_buf()))?;

    if raw.ends_with(std::path::is_separator) {
        return Err(DescriptorError::EmptyBaseName(path.to_path_buf()));
    }

    let base_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| DescriptorError::EmptyBaseName(path.to_path_buf()))?;

    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    Ok((dir, base_name))
}

fn platform_of(path: &Path, dir: &Path) -> Result<String, DescriptorError> {
    dir.file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .map(String::from)
        .ok_or_else(|| DescriptorError::EmptyPlatform(path.to_path_buf()))
}

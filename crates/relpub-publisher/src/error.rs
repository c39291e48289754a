use relpub_core::artifact::DescriptorError;
use relpub_core::StorageKey;
use relpub_storage::StorageError;
use std::path::PathBuf;
use thiserror::Error;

/// Publishing errors. Every variant is terminal for the run.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("invalid artifact {artifact}: {source}")]
    InvalidDescriptor {
        artifact: String,
        #[source]
        source: DescriptorError,
    },

    #[error("artifact {} not found or unreadable: {source}", path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("upload of {} to {key} rejected: {source}", path.display())]
    StoreRejected {
        path: PathBuf,
        key: StorageKey,
        #[source]
        source: StorageError,
    },
}

impl PublishError {
    /// Stage of the pipeline that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            PublishError::InvalidDescriptor { .. } => "resolve",
            PublishError::FileNotFound { .. } => "read",
            PublishError::StoreRejected { .. } => "upload",
        }
    }

    pub(crate) fn no_artifacts() -> Self {
        PublishError::InvalidDescriptor {
            artifact: "(none)".to_string(),
            source: DescriptorError::NoArtifacts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relpub_core::storage_key;

    #[test]
    fn messages_name_artifact_and_stage() {
        let err = PublishError::StoreRejected {
            path: PathBuf::from("/rel/linux_amd64/ngrok"),
            key: storage_key("linux_amd64", "2.1.3", "ngrok"),
            source: StorageError::UploadFailed("403 Forbidden".to_string()),
        };
        assert_eq!(err.stage(), "upload");
        assert_eq!(
            err.to_string(),
            "upload of /rel/linux_amd64/ngrok to linux_amd64/2.1.3/ngrok rejected: Upload failed: 403 Forbidden"
        );

        let err = PublishError::FileNotFound {
            path: PathBuf::from("/rel/linux_amd64/ngrokd"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(err.stage(), "read");
        assert!(err.to_string().contains("/rel/linux_amd64/ngrokd"));
    }

    #[test]
    fn empty_input_is_invalid_descriptor() {
        let err = PublishError::no_artifacts();
        assert_eq!(err.stage(), "resolve");
        assert!(matches!(
            err,
            PublishError::InvalidDescriptor {
                source: DescriptorError::NoArtifacts,
                ..
            }
        ));
    }
}

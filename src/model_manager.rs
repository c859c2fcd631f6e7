use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

use crate::models::BuiltinModel;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Model not downloaded: {0}")]
    NotDownloaded(String),
    #[error("Download error: {0}")]
    DownloadError(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Model verification failed")]
    VerificationFailed,
    #[error("Hash mismatch: expected {expected}, got {actual} for {file_type} file")]
    HashMismatch {
        file_type: String,
        expected: String,
        actual: String,
    },
}

/// Downloads and caches the model/tokenizer pair for a [`BuiltinModel`].
///
/// The pair is fetched at most once; later runs find the files on disk and
/// skip the network entirely. Concurrent downloads within one process are
/// serialized by an async mutex.
#[derive(Clone)]
pub struct ModelManager {
    models_dir: PathBuf,
    download_lock: Arc<Mutex<()>>,
}

impl ModelManager {
    /// Creates a new ModelManager with the default models directory
    pub fn new_default() -> io::Result<Self> {
        Self::new(Self::get_default_models_dir())
    }

    /// Returns the default models directory path
    pub fn get_default_models_dir() -> PathBuf {
        // 1. Check environment variable
        if let Ok(path) = env::var("INTELLILABEL_CACHE") {
            return PathBuf::from(path).join("models");
        }

        // 2. Use platform-specific cache directory
        if let Some(cache_dir) = dirs::cache_dir() {
            return cache_dir.join("intellilabel").join("models");
        }

        // 3. Fallback to user's home directory
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(".cache").join("intellilabel").join("models");
        }

        // 4. If all else fails, use system temp directory (platform agnostic)
        env::temp_dir().join("intellilabel").join("models")
    }

    pub fn new<P: AsRef<Path>>(models_dir: P) -> io::Result<Self> {
        let models_dir = models_dir.as_ref().to_path_buf();
        fs::create_dir_all(&models_dir)?;
        Ok(Self {
            models_dir,
            download_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn get_model_path(&self, model: BuiltinModel) -> PathBuf {
        let info = model.get_model_info();
        self.models_dir.join(info.name).join("model.onnx")
    }

    pub fn get_tokenizer_path(&self, model: BuiltinModel) -> PathBuf {
        let info = model.get_model_info();
        self.models_dir.join(info.name).join("tokenizer.json")
    }

    pub fn is_model_downloaded(&self, model: BuiltinModel) -> bool {
        let model_path = self.get_model_path(model);
        let tokenizer_path = self.get_tokenizer_path(model);
        log::debug!(
            "Model file {:?} exists: {}; tokenizer file {:?} exists: {}",
            model_path,
            model_path.exists(),
            tokenizer_path,
            tokenizer_path.exists()
        );
        model_path.exists() && tokenizer_path.exists()
    }

    /// Downloads both files of the pair, verifying each against its hash pin
    /// when the model publishes one. A failure on either file removes any
    /// partial download so the cache never holds a broken pair.
    pub async fn download_model(&self, model: BuiltinModel) -> Result<(), ModelError> {
        let info = model.get_model_info();
        let _lock = self.download_lock.lock().await;

        let model_dir = self.models_dir.join(&info.name);
        log::info!("Creating model directory at {:?}", model_dir);
        fs::create_dir_all(&model_dir)?;

        let files = [
            (
                "model",
                &info.model_url,
                self.get_model_path(model),
                info.model_hash.as_deref(),
            ),
            (
                "tokenizer",
                &info.tokenizer_url,
                self.get_tokenizer_path(model),
                info.tokenizer_hash.as_deref(),
            ),
        ];

        for (file_type, url, path, expected_hash) in files {
            let up_to_date = path.exists() && self.verify_file(&path, expected_hash)?;
            if up_to_date {
                log::info!("Existing {} file at {:?} verified, keeping it", file_type, path);
                continue;
            }
            if path.exists() {
                log::warn!("{} file at {:?} failed verification, redownloading", file_type, path);
            }
            if let Err(e) = self
                .download_and_verify_file(url, &path, expected_hash, file_type)
                .await
            {
                log::error!("Failed to set up {} file: {}", file_type, e);
                if let Err(cleanup_err) = self.remove_download(model) {
                    // A leftover partial pair would look downloaded later.
                    log::warn!(
                        "Failed to clean up partial download for {}: {}",
                        info.name,
                        cleanup_err
                    );
                }
                return Err(e);
            }
        }

        log::info!("Model and tokenizer ready to use");
        Ok(())
    }

    /// Checks a file against a SHA-256 pin. Files without a pin are accepted
    /// as long as they are non-empty.
    fn verify_file(&self, path: &Path, expected_hash: Option<&str>) -> Result<bool, ModelError> {
        let bytes = fs::read(path)?;
        let Some(expected) = expected_hash else {
            return Ok(!bytes.is_empty());
        };
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let hash = format!("{:x}", hasher.finalize());
        log::debug!("Hash for {:?}: calculated {}, expected {}", path, hash, expected);
        Ok(hash == expected)
    }

    pub fn verify_model(&self, model: BuiltinModel) -> Result<bool, ModelError> {
        let info = model.get_model_info();
        let model_path = self.get_model_path(model);
        let tokenizer_path = self.get_tokenizer_path(model);

        if !model_path.exists() || !tokenizer_path.exists() {
            log::info!("One or both model files do not exist");
            return Ok(false);
        }

        let model_ok = self.verify_file(&model_path, info.model_hash.as_deref())?;
        let tokenizer_ok = self.verify_file(&tokenizer_path, info.tokenizer_hash.as_deref())?;
        log::info!(
            "Verification results: model {}, tokenizer {}",
            model_ok,
            tokenizer_ok
        );

        Ok(model_ok && tokenizer_ok)
    }

    async fn download_and_verify_file(
        &self,
        url: &str,
        path: &Path,
        expected_hash: Option<&str>,
        file_type: &str,
    ) -> Result<(), ModelError> {
        log::info!("Downloading {} file from {} to {:?}", file_type, url, path);
        let response = reqwest::get(url).await?.error_for_status()?;
        let bytes = response.bytes().await?;
        log::info!("Downloaded {} bytes", bytes.len());

        if let Some(expected) = expected_hash {
            let mut hasher = Sha256::new();
            hasher.update(&bytes);
            let hash = format!("{:x}", hasher.finalize());
            if hash != expected {
                log::error!("{} hash mismatch: expected {}, got {}", file_type, expected, hash);
                return Err(ModelError::HashMismatch {
                    file_type: file_type.to_string(),
                    expected: expected.to_string(),
                    actual: hash,
                });
            }
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, bytes)?;

        // Verify after writing
        if !self.verify_file(path, expected_hash)? {
            return Err(ModelError::VerificationFailed);
        }

        log::info!("{} file downloaded and verified successfully", file_type);
        Ok(())
    }

    pub fn remove_download(&self, model: BuiltinModel) -> Result<(), ModelError> {
        let model_path = self.get_model_path(model);
        let tokenizer_path = self.get_tokenizer_path(model);

        if model_path.exists() {
            fs::remove_file(&model_path)?;
        }
        if tokenizer_path.exists() {
            fs::remove_file(&tokenizer_path)?;
        }
        Ok(())
    }

    /// Ensures that a model is downloaded and verified.
    /// If the model doesn't exist, it will be downloaded.
    /// If verification fails, it will be re-downloaded.
    pub async fn ensure_model_downloaded(&self, model: BuiltinModel) -> Result<(), ModelError> {
        if !self.is_model_downloaded(model) {
            log::info!("Model not found, downloading...");
            self.download_model(model).await?;
        } else if !self.verify_model(model)? {
            log::info!("Model verification failed, re-downloading...");
            self.remove_download(model)?;
            self.download_model(model).await?;
        } else {
            log::info!("Model already downloaded and verified");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_path_layout() {
        let dir = tempdir().unwrap();
        let manager = ModelManager::new(dir.path()).unwrap();
        let model = BuiltinModel::DistilBertGithubIssues;

        let model_path = manager.get_model_path(model);
        let tokenizer_path = manager.get_tokenizer_path(model);
        assert!(model_path.ends_with("distil-bert-uncased-finetuned-github-issues/model.onnx"));
        assert!(
            tokenizer_path.ends_with("distil-bert-uncased-finetuned-github-issues/tokenizer.json")
        );
        assert!(!manager.is_model_downloaded(model));
    }

    #[test]
    fn test_default_models_dir() {
        // Test with environment variable
        env::set_var("INTELLILABEL_CACHE", "/tmp/test-cache");
        let path = ModelManager::get_default_models_dir();
        assert!(path.to_str().unwrap().contains("/tmp/test-cache/models"));
        env::remove_var("INTELLILABEL_CACHE");

        // Test without environment variable
        let path = ModelManager::get_default_models_dir();
        assert!(path.to_str().unwrap().contains("intellilabel"));
    }

    #[test]
    fn test_unpinned_file_verification() {
        let dir = tempdir().unwrap();
        let manager = ModelManager::new(dir.path()).unwrap();

        let path = dir.path().join("file.bin");
        fs::write(&path, b"payload").unwrap();
        assert!(manager.verify_file(&path, None).unwrap());

        fs::write(&path, b"").unwrap();
        assert!(!manager.verify_file(&path, None).unwrap());
    }

    #[test]
    fn test_pinned_file_verification() {
        let dir = tempdir().unwrap();
        let manager = ModelManager::new(dir.path()).unwrap();

        let path = dir.path().join("file.bin");
        fs::write(&path, b"payload").unwrap();

        let mut hasher = Sha256::new();
        hasher.update(b"payload");
        let good = format!("{:x}", hasher.finalize());

        assert!(manager.verify_file(&path, Some(&good)).unwrap());
        assert!(!manager.verify_file(&path, Some("deadbeef")).unwrap());
    }

    #[test]
    fn test_remove_download_deletes_partial_pair() {
        let dir = tempdir().unwrap();
        let manager = ModelManager::new(dir.path()).unwrap();
        let model = BuiltinModel::DistilBertGithubIssues;

        // A pair with only one file present reads as not downloaded, but the
        // leftover must still be removable.
        let model_path = manager.get_model_path(model);
        fs::create_dir_all(model_path.parent().unwrap()).unwrap();
        fs::write(&model_path, b"partial").unwrap();
        assert!(!manager.is_model_downloaded(model));

        manager.remove_download(model).unwrap();
        assert!(!model_path.exists());
        assert!(!manager.get_tokenizer_path(model).exists());
    }

    #[tokio::test]
    #[ignore = "downloads the model from HuggingFace"]
    async fn test_model_download() -> Result<(), ModelError> {
        let manager = ModelManager::new_default()?;
        let model = BuiltinModel::DistilBertGithubIssues;

        manager.ensure_model_downloaded(model).await?;
        assert!(manager.is_model_downloaded(model));
        assert!(manager.get_model_path(model).exists());
        assert!(manager.get_tokenizer_path(model).exists());

        Ok(())
    }
}

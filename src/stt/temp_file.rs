use log::{error, info};
use std::io::{self, ErrorKind};
use std::path::Path;
use tempfile::{Builder, TempPath};
use tokio::io::AsyncWriteExt;

const DEFAULT_SUFFIX: &str = ".wav";

/// An uploaded audio file staged on disk. The file is removed when the guard
/// drops, whichever way the request ends.
#[derive(Debug)]
pub struct TempAudioFile {
    path: Option<TempPath>,
}

impl TempAudioFile {
    /// Writes `bytes` to a uniquely named file in `dir`, keeping the extension of `file_name`.
    pub async fn persist(dir: &Path, file_name: &str, bytes: &[u8]) -> io::Result<Self> {
        let (file, path) = Builder::new()
            .prefix("upload-")
            .suffix(&suffix_for(file_name))
            .tempfile_in(dir)?
            .into_parts();
        // Guard first, so a half-written file is still cleaned up.
        let guard = Self { path: Some(path) };

        let mut file = tokio::fs::File::from_std(file);
        file.write_all(bytes).await?;
        file.flush().await?;

        Ok(guard)
    }

    pub fn path(&self) -> &Path {
        match &self.path {
            Some(path) => path,
            None => Path::new(""),
        }
    }
}

impl Drop for TempAudioFile {
    fn drop(&mut self) {
        let Some(path) = self.path.take() else {
            return;
        };
        let display = path.display().to_string();
        match path.close() {
            Ok(()) => info!("Deleted temporary audio file: {}", display),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => error!("Error deleting temporary file {}: {}", display, e),
        }
    }
}

/// `.ext` of the uploaded name, or `.wav` when there is none usable.
pub fn suffix_for(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext))
        .unwrap_or_else(|| DEFAULT_SUFFIX.to_string())
}

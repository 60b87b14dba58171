use std::path::{
    Path,
    PathBuf,
};

use async_trait::async_trait;
use tokio::process::Command;

use crate::core::FarmError;

/// Turns a scanned image into raw text.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize(&self, image: &Path) -> Result<String, FarmError>;
}

/// Runs the `tesseract` binary and reads the recognized text from stdout.
#[derive(Debug, Clone)]
pub struct TesseractCommand {
    pub binary: PathBuf,
    /// Tesseract language packs, joined with `+` (e.g. `eng+hin`).
    pub languages: Vec<String>,
}

impl Default for TesseractCommand {
    fn default() -> Self {
        Self { binary: PathBuf::from("tesseract"), languages: vec!["eng".to_string()] }
    }
}

impl TesseractCommand {
    pub fn with_languages(languages: &[&str]) -> Self {
        Self { languages: languages.iter().map(|l| l.to_string()).collect(), ..Default::default() }
    }

    fn language_arg(&self) -> String {
        if self.languages.is_empty() {
            "eng".to_string()
        } else {
            self.languages.join("+")
        }
    }
}

#[async_trait]
impl TextRecognizer for TesseractCommand {
    async fn recognize(&self, image: &Path) -> Result<String, FarmError> {
        if !image.exists() {
            return Err(FarmError::Ocr(format!("Image not found: {}", image.display())));
        }

        tracing::info!("Running OCR on {}", image.display());

        let output = Command::new(&self.binary)
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(self.language_arg())
            .output()
            .await
            .map_err(|e| {
                FarmError::Ocr(format!("Failed to launch {}: {}", self.binary.display(), e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FarmError::Ocr(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).to_string();
        if text.trim().is_empty() {
            return Err(FarmError::Ocr("No text recognized".to_string()));
        }

        tracing::debug!("OCR produced {} characters", text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_argument() {
        assert_eq!(TesseractCommand::default().language_arg(), "eng");
        assert_eq!(TesseractCommand::with_languages(&["eng", "hin", "ben"]).language_arg(), "eng+hin+ben");
        assert_eq!(TesseractCommand::with_languages(&[]).language_arg(), "eng");
    }

    #[tokio::test]
    async fn test_missing_image_is_ocr_error() {
        let result = TesseractCommand::default().recognize(Path::new("/no/such/scan.png")).await;
        assert!(matches!(result, Err(FarmError::Ocr(_))));
    }

    #[tokio::test]
    async fn test_missing_binary_is_ocr_error() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("scan.png");
        std::fs::write(&image, b"not really a png").unwrap();

        let recognizer = TesseractCommand {
            binary: PathBuf::from("/definitely/not/tesseract"),
            ..Default::default()
        };
        let result = recognizer.recognize(&image).await;
        assert!(matches!(result, Err(FarmError::Ocr(_))));
    }
}

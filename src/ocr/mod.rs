pub mod extractor;
pub mod recognizer;

use std::path::Path;

pub use extractor::{
    extract_prescription,
    extract_prescription_on,
    Extraction,
    Field,
};
pub use recognizer::{
    TesseractCommand,
    TextRecognizer,
};

use crate::core::FarmError;

/// Recognize an image and pull a pending prescription out of the text.
pub async fn scan_prescription(
    recognizer: &dyn TextRecognizer,
    image: &Path,
) -> Result<Extraction, FarmError> {
    let text = recognizer.recognize(image).await?;
    let mut extraction = extract_prescription(&text);
    extraction.prescription.source_image = Some(image.display().to_string());

    let missing = extraction.missing_fields();
    if !missing.is_empty() {
        tracing::info!(
            "Scan of {} left {} field(s) empty: {:?}",
            image.display(),
            missing.len(),
            missing.iter().map(Field::name).collect::<Vec<_>>()
        );
    }

    Ok(extraction)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;

    struct FixedText(&'static str);

    #[async_trait]
    impl TextRecognizer for FixedText {
        async fn recognize(&self, _image: &Path) -> Result<String, FarmError> {
            Ok(self.0.to_string())
        }
    }

    struct Failing;

    #[async_trait]
    impl TextRecognizer for Failing {
        async fn recognize(&self, _image: &Path) -> Result<String, FarmError> {
            Err(FarmError::Ocr("camera glare".to_string()))
        }
    }

    #[tokio::test]
    async fn test_scan_sets_source_image() {
        let recognizer = FixedText("Drug: Amoxicillin\nDosage: 10 ml");
        let extraction = scan_prescription(&recognizer, Path::new("scans/rx-1.jpg")).await.unwrap();

        assert_eq!(extraction.prescription.drug_name, "Amoxicillin");
        assert_eq!(extraction.prescription.source_image.as_deref(), Some("scans/rx-1.jpg"));
    }

    #[tokio::test]
    async fn test_scan_propagates_ocr_failure() {
        let result = scan_prescription(&Failing, Path::new("scans/rx-2.jpg")).await;
        assert!(matches!(result, Err(FarmError::Ocr(_))));
    }
}

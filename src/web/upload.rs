//! Multipart form parsing for the single-file PDF upload.

use crate::pipeline::text;
use axum::extract::Multipart;

/// An uploaded PDF with its original filename.
pub struct UploadedPdf {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Parse the multipart upload into PDF bytes.
///
/// Only the `pdf` field is read; unknown fields are drained and ignored.
/// The magic bytes are checked here so obviously wrong files are rejected
/// before the pipeline runs.
pub async fn parse_multipart(mut multipart: Multipart) -> Result<UploadedPdf, String> {
    let mut file: Option<UploadedPdf> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("failed to read form field: {e}"))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "pdf" => {
                let filename = field.file_name().unwrap_or("upload.pdf").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| format!("failed to read file data: {e}"))?
                    .to_vec();

                if data.is_empty() {
                    return Err("uploaded file is empty".to_string());
                }
                if !text::is_pdf(&data) {
                    return Err("uploaded file does not appear to be a PDF".to_string());
                }

                file = Some(UploadedPdf { filename, data });
            }
            _ => {
                let _ = field.bytes().await;
            }
        }
    }

    file.ok_or_else(|| "no file uploaded".to_string())
}

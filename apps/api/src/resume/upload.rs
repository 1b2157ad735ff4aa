//! Multipart resume uploads: PDF validation, text extraction and S3 storage.

use aws_sdk_s3::primitives::ByteStream;
use axum::extract::Multipart;
use bytes::Bytes;
use tokio::task::JoinError;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::resume::analyzer::check_resume_length;

pub const MAX_PDF_BYTES: usize = 5 * 1024 * 1024;
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Fields read from the upload form.
#[derive(Debug)]
pub struct ResumeUpload {
    pub file_name: String,
    pub bytes: Bytes,
    pub job_description: Option<String>,
    pub target_role: Option<String>,
}

/// Reads `file`, `job_description` and `target_role` from the form.
/// Unknown fields are ignored.
pub async fn read_upload(mut multipart: Multipart) -> Result<ResumeUpload, AppError> {
    let mut file: Option<(String, Bytes)> = None;
    let mut job_description = None;
    let mut target_role = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field
                    .file_name()
                    .map(String::from)
                    .unwrap_or_else(|| "resume.pdf".to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;
                file = Some((file_name, bytes));
            }
            "job_description" | "target_role" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read {name}: {e}")))?;
                let text = Some(text.trim().to_string()).filter(|t| !t.is_empty());
                if name == "job_description" {
                    job_description = text;
                } else {
                    target_role = text;
                }
            }
            _ => {}
        }
    }

    let (file_name, bytes) =
        file.ok_or_else(|| AppError::Validation("file is required".to_string()))?;
    check_pdf(&bytes)?;

    Ok(ResumeUpload {
        file_name,
        bytes,
        job_description,
        target_role,
    })
}

/// Size and signature checks, run before any parsing.
pub fn check_pdf(bytes: &[u8]) -> Result<(), AppError> {
    if bytes.is_empty() {
        return Err(AppError::Validation("file is empty".to_string()));
    }
    if bytes.len() > MAX_PDF_BYTES {
        return Err(AppError::Validation(format!(
            "file exceeds {} MiB",
            MAX_PDF_BYTES / (1024 * 1024)
        )));
    }
    if !bytes.starts_with(PDF_MAGIC) {
        return Err(AppError::Validation("file must be a PDF".to_string()));
    }
    Ok(())
}

/// Extracts plain text from the PDF on the blocking pool.
///
/// Malformed PDFs can make the parser panic; those are reported as unreadable.
pub async fn extract_pdf_text(bytes: Bytes) -> Result<String, AppError> {
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(extraction_task_error)?
        .map_err(|e| AppError::UnprocessableEntity(format!("Could not read PDF: {e}")))?;

    finish_extracted_text(&text)
}

fn extraction_task_error(e: JoinError) -> AppError {
    if e.is_panic() {
        warn!("PDF parser panicked on upload");
        AppError::UnprocessableEntity("Could not read PDF".to_string())
    } else {
        AppError::Internal(anyhow::anyhow!("PDF extraction task failed: {e}"))
    }
}

/// Normalises extracted text and applies the same limits as typed resumes.
fn finish_extracted_text(raw: &str) -> Result<String, AppError> {
    let text = normalize_whitespace(raw);
    if text.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "No text could be extracted from the PDF. Scanned images are not supported."
                .to_string(),
        ));
    }
    check_resume_length("Extracted PDF text", &text)?;
    Ok(text)
}

/// Collapses runs of spaces and blank lines left behind by PDF layout.
fn normalize_whitespace(text: &str) -> String {
    let mut out = Vec::new();
    let mut blank_run = false;
    for line in text.lines() {
        let line = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if line.is_empty() {
            if !blank_run && !out.is_empty() {
                out.push(String::new());
            }
            blank_run = true;
        } else {
            out.push(line);
            blank_run = false;
        }
    }
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out.join("\n")
}

pub fn resume_object_key(user_email: &str) -> String {
    format!("resumes/{}/{}.pdf", user_email, Uuid::new_v4())
}

/// Uploads the original PDF and returns its object key.
pub async fn store_pdf(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    user_email: &str,
    bytes: Bytes,
) -> Result<String, AppError> {
    let key = resume_object_key(user_email);
    s3.put_object()
        .bucket(bucket)
        .key(&key)
        .body(ByteStream::from(bytes))
        .content_type("application/pdf")
        .send()
        .await
        .map_err(|e| AppError::S3(format!("Resume upload failed: {e}")))?;

    info!("Uploaded resume to s3://{}/{}", bucket, key);
    Ok(key)
}

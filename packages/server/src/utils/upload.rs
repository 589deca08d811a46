use std::collections::HashMap;
use std::path::PathBuf;

use axum::extract::Multipart;
use axum::extract::multipart::Field;
use spice_common::storage::BoxReader;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::AppError;

/// An uploaded file parked in a temp file until its final name is known.
///
/// The temp file is removed when the value is dropped.
#[derive(Debug)]
pub struct StagedUpload {
    pub file_name: String,
    pub size: u64,
    temp_path: PathBuf,
}

impl StagedUpload {
    /// Reopen the staged bytes for writing into a store.
    pub async fn open(&self) -> Result<BoxReader, AppError> {
        let file = tokio::fs::File::open(&self.temp_path)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to reopen staged upload: {e}")))?;
        Ok(Box::new(file))
    }
}

impl Drop for StagedUpload {
    fn drop(&mut self) {
        // Best effort.
        let _ = std::fs::remove_file(&self.temp_path);
    }
}

/// Every text field of a multipart form plus the first uploaded file.
#[derive(Debug, Default)]
pub struct RawForm {
    fields: HashMap<String, String>,
    pub upload: Option<StagedUpload>,
}

impl RawForm {
    /// Raw value of a text field, if it was submitted.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    #[cfg(test)]
    pub fn from_fields(fields: &[(&str, &str)]) -> Self {
        Self {
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            upload: None,
        }
    }
}

/// Read a multipart form, staging the first non-empty file part to disk.
///
/// File parts with an empty file name are what browsers send when no file was
/// chosen; they are skipped.
pub async fn read_form(mut multipart: Multipart, max_size: u64) -> Result<RawForm, AppError> {
    let mut form = RawForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match field.file_name().map(str::to_string) {
            Some(file_name) if !file_name.trim().is_empty() => {
                if form.upload.is_none() {
                    form.upload = Some(stage_field(field, file_name, max_size).await?);
                }
            }
            Some(_) => {}
            None => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read '{name}': {e}")))?;
                form.fields.insert(name, text);
            }
        }
    }

    Ok(form)
}

/// Stream a multipart field to a temp file.
async fn stage_field(
    mut field: Field<'_>,
    file_name: String,
    max_size: u64,
) -> Result<StagedUpload, AppError> {
    let temp_path = std::env::temp_dir().join(format!("spice-upload-{}", Uuid::new_v4()));
    let mut staged = StagedUpload {
        file_name,
        size: 0,
        temp_path,
    };

    let mut temp_file = tokio::fs::File::create(&staged.temp_path)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to create temp file: {e}")))?;

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
    {
        staged.size += chunk.len() as u64;
        if staged.size > max_size {
            return Err(AppError::Validation(format!(
                "File exceeds maximum size of {max_size} bytes"
            )));
        }
        temp_file
            .write_all(&chunk)
            .await
            .map_err(|e| AppError::Internal(format!("Temp file write failed: {e}")))?;
    }

    temp_file
        .flush()
        .await
        .map_err(|e| AppError::Internal(format!("Temp file flush failed: {e}")))?;

    Ok(staged)
}

use anyhow::{Context, Result, anyhow};
use axum::extract::Multipart;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::report::ReportParameters;
use crate::server::uploads::UploadGuard;

pub const MODELS_FIELD: &str = "models_book";
pub const BRANDS_FIELD: &str = "brands_book";

/// Fields of a `/generate` request with both workbooks stored on disk.
#[derive(Debug, Default)]
pub struct ReportForm {
    fields: HashMap<String, String>,
    files: HashMap<String, PathBuf>,
}

impl ReportForm {
    /// Reads the multipart body, storing file fields in `upload_dir` through
    /// `uploads`.
    pub async fn read(
        mut multipart: Multipart,
        upload_dir: &Path,
        uploads: &mut UploadGuard,
    ) -> Result<Self> {
        let mut form = ReportForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .context("Malformed multipart body")?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == MODELS_FIELD || name == BRANDS_FIELD {
                let original_name = field.file_name().unwrap_or(&name).to_string();
                let bytes = field
                    .bytes()
                    .await
                    .with_context(|| format!("Failed to read upload: {}", name))?;
                let path = uploads.store(upload_dir, &name, &original_name, &bytes).await?;
                form.files.insert(name, path);
            } else {
                let value = field
                    .text()
                    .await
                    .with_context(|| format!("Failed to read form field: {}", name))?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    fn field(&self, name: &str) -> Result<String> {
        self.fields
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow!("missing form field: {}", name))
    }

    pub fn file(&self, name: &str) -> Result<&Path> {
        self.files
            .get(name)
            .map(PathBuf::as_path)
            .ok_or_else(|| anyhow!("missing form field: {}", name))
    }

    pub fn parameters(&self) -> Result<ReportParameters> {
        Ok(ReportParameters {
            country: self.field("country")?,
            year: self.field("year")?,
            month: self.field("month")?,
            day: self.field("day")?,
            language: self.field("language")?,
            segments: self.field("segments")?,
            segmentation: self.field("segmentation")?,
        })
    }
}

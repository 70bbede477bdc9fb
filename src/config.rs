use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct ServerConfig {
    /// Address the web server listens on
    #[arg(long, env = "BENEF_BIND", default_value = "127.0.0.1:5000")]
    pub bind: String,

    /// Directory for uploaded workbooks while a request is processed
    #[arg(long, env = "BENEF_UPLOAD_DIR", default_value = "uploads")]
    pub upload_dir: PathBuf,

    /// Directory generated reports are written to
    #[arg(long, env = "BENEF_OUTPUT_DIR", default_value = "generated_reports")]
    pub output_dir: PathBuf,

    /// Largest accepted request body, in megabytes
    #[arg(long, env = "BENEF_MAX_UPLOAD_MB", default_value = "64")]
    pub max_upload_mb: usize,
}

impl ServerConfig {
    pub fn new(upload_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
            upload_dir: upload_dir.into(),
            output_dir: output_dir.into(),
            max_upload_mb: 64,
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.upload_dir, &self.output_dir] {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        Ok(())
    }
}

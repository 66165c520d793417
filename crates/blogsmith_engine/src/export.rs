use std::fmt;
use std::path::{Path, PathBuf};

use crate::persist::{AtomicFileWriter, PersistError};
use crate::{markdown_to_html, markdown_to_plain_text, render_pdf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Markdown,
    Html,
    Pdf,
    Text,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Markdown,
        ExportFormat::Html,
        ExportFormat::Pdf,
        ExportFormat::Text,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Html => "html",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Text => "txt",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Markdown => "text/markdown",
            ExportFormat::Html => "text/html",
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Text => "text/plain",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub extension: &'static str,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("pdf rendering failed: {0}")]
    Pdf(String),
    #[error("file name '{0}' is not usable")]
    InvalidFileStem(String),
    #[error("export task stopped: {0}")]
    Interrupted(String),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

/// Converts the final markdown into the bytes offered for download.
pub fn export(markdown: &str, format: ExportFormat) -> Result<ExportArtifact, ExportError> {
    let bytes = match format {
        ExportFormat::Markdown => markdown.as_bytes().to_vec(),
        ExportFormat::Html => markdown_to_html(markdown).into_bytes(),
        ExportFormat::Text => markdown_to_plain_text(markdown).into_bytes(),
        ExportFormat::Pdf => render_pdf(&markdown_to_html(markdown))?,
    };
    Ok(ExportArtifact {
        bytes,
        mime_type: format.mime_type(),
        extension: format.extension(),
    })
}

/// Writes `{dir}/{file_stem}.{extension}`, replacing any earlier export.
pub fn save_artifact(
    dir: &Path,
    file_stem: &str,
    artifact: &ExportArtifact,
) -> Result<PathBuf, ExportError> {
    let usable = !file_stem.is_empty()
        && file_stem
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'));
    if !usable {
        return Err(ExportError::InvalidFileStem(file_stem.to_string()));
    }
    let filename = format!("{file_stem}.{}", artifact.extension);
    let writer = AtomicFileWriter::new(dir.to_path_buf());
    Ok(writer.write(&filename, &artifact.bytes)?)
}

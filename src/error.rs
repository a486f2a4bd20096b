//! Error types for loading documents and catalogs

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Errors that can occur while loading a document
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Failed to read document: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid document: {message}")]
    Toml { message: String, span: Option<Span> },
}

impl From<toml::de::Error> for DocumentError {
    fn from(err: toml::de::Error) -> Self {
        DocumentError::Toml {
            message: err.message().to_string(),
            span: err.span(),
        }
    }
}

impl DocumentError {
    /// Get the source span if available
    pub fn span(&self) -> Option<&Span> {
        match self {
            DocumentError::Toml { span, .. } => span.as_ref(),
            DocumentError::Io(_) => None,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let (message, span) = match self {
            DocumentError::Toml {
                message,
                span: Some(span),
            } => (message, span),
            _ => return self.to_string(),
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message("invalid document")
            .with_label(
                Label::new((filename, span.clone()))
                    .with_message(message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

/// Errors that can occur when loading theme, platform, or preset catalogs
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse catalog TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Preset not found: {name}")]
    PresetNotFound { name: String },
}

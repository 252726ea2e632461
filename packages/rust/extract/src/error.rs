//! Internal failure reasons for the per-format extractors.
//!
//! These never leave the crate as errors: [`crate::extract_text`] folds them
//! into an [`crate::Extraction`] variant.

#[derive(Debug, thiserror::Error)]
pub(crate) enum ExtractError {
    #[error("failed to load PDF: {0}")]
    PdfLoad(lopdf::Error),

    #[error("failed to extract text from page {page}: {source}")]
    PdfPage { page: u32, source: lopdf::Error },

    #[error("not a Word document archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("document part {0} is missing")]
    MissingPart(&'static str),

    #[error("failed to read {part}: {source}")]
    Io {
        part: String,
        source: std::io::Error,
    },

    #[error("malformed XML in {part}: {message}")]
    Xml { part: String, message: String },
}

//! Document text extraction for uploaded course materials.
//!
//! [`extract_text`] turns one [`UploadedFile`] into an [`Extraction`]. It
//! never fails: unsupported, empty, corrupt and otherwise unreadable files
//! come back as distinct variants, and the matching message has already been
//! sent to the [`Notifier`] by the time the call returns.

mod error;
mod pdf;
mod word;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, instrument, warn};

use studybuddy_shared::{DocumentKind, Notifier, UploadedFile};

pub use pdf::{PAGE_SEPARATOR, join_pages};

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Outcome of extracting one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Plain text, possibly empty if the document has no text layer.
    Text(String),
    /// The filename does not end in `.pdf`, `.doc` or `.docx`.
    Unsupported,
    /// A zero-byte PDF. No parse was attempted.
    Empty,
    /// The PDF could not be parsed.
    Corrupt { reason: String },
    /// Any other failure while reading the document.
    Failed { reason: String },
}

impl Extraction {
    /// The extracted text, or `""` for every non-text outcome.
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) => text,
            _ => "",
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            _ => String::new(),
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Extract plain text from an uploaded PDF or Word document.
///
/// Emits at most one message through `notifier`: a warning for unsupported,
/// empty or corrupt files and an error for any other failure.
#[instrument(skip_all, fields(file = %file.name, size = file.size()))]
pub fn extract_text(file: &UploadedFile, notifier: &dyn Notifier) -> Extraction {
    let extraction = panic::catch_unwind(AssertUnwindSafe(|| extract_by_kind(file)))
        .unwrap_or_else(|payload| Extraction::Failed {
            reason: format!("parser panicked: {}", panic_message(payload.as_ref())),
        });

    report(&file.name, &extraction, notifier);
    extraction
}

fn extract_by_kind(file: &UploadedFile) -> Extraction {
    match file.kind() {
        None => Extraction::Unsupported,
        Some(DocumentKind::Pdf) => {
            if file.size() == 0 {
                return Extraction::Empty;
            }
            match pdf::extract(&file.content) {
                Ok(text) => Extraction::Text(text),
                Err(e) => Extraction::Corrupt {
                    reason: e.to_string(),
                },
            }
        }
        Some(DocumentKind::Word) => match word::extract(&file.content) {
            Ok(text) => Extraction::Text(text),
            Err(e) => Extraction::Failed {
                reason: e.to_string(),
            },
        },
    }
}

fn report(name: &str, extraction: &Extraction, notifier: &dyn Notifier) {
    match extraction {
        Extraction::Text(text) => {
            debug!(chars = text.chars().count(), "text extracted");
        }
        Extraction::Unsupported => {
            warn!("unsupported file type");
            notifier.warning(&format!("Unsupported file type: {name}"));
        }
        Extraction::Empty => {
            warn!("empty PDF");
            notifier.warning(&format!(
                "The uploaded PDF '{name}' is empty. Please upload a valid file."
            ));
        }
        Extraction::Corrupt { reason } => {
            debug!(%reason, "PDF could not be parsed");
            notifier.warning(&format!(
                "The uploaded PDF '{name}' appears to be empty or corrupted. \
                 Please check the file and try again."
            ));
        }
        Extraction::Failed { reason } => {
            warn!(%reason, "extraction failed");
            notifier.error(&format!(
                "An error occurred while processing '{name}': {reason}"
            ));
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{docx_with_paragraphs, pdf_with_pages};
    use studybuddy_shared::{RecordingNotifier, Severity};

    #[test]
    fn unsupported_extensions_warn_once() {
        for name in ["slides.pptx", "notes.txt", "README", "SCAN.PDF", "essay.DOCX"] {
            let notifier = RecordingNotifier::new();
            let file = UploadedFile::new(name, b"whatever".to_vec());

            let extraction = extract_text(&file, &notifier);

            assert_eq!(extraction, Extraction::Unsupported, "{name}");
            assert_eq!(extraction.text(), "");
            let messages = notifier.messages();
            assert_eq!(messages.len(), 1, "{name}");
            assert_eq!(messages[0].0, Severity::Warning);
            assert_eq!(messages[0].1, format!("Unsupported file type: {name}"));
        }
    }

    #[test]
    fn zero_byte_pdf_is_empty_without_parsing() {
        let notifier = RecordingNotifier::new();
        let file = UploadedFile::new("blank.pdf", Vec::new());

        let extraction = extract_text(&file, &notifier);

        // Corrupt would mean the parser ran; Empty means it was skipped.
        assert_eq!(extraction, Extraction::Empty);
        assert_eq!(
            notifier.with_severity(Severity::Warning),
            vec!["The uploaded PDF 'blank.pdf' is empty. Please upload a valid file."]
        );
    }

    #[test]
    fn corrupt_pdf_warns_and_yields_empty_text() {
        let notifier = RecordingNotifier::new();
        let file = UploadedFile::new("broken.pdf", b"%PDF-1.4 garbage".to_vec());

        let extraction = extract_text(&file, &notifier);

        assert!(matches!(extraction, Extraction::Corrupt { .. }));
        assert_eq!(extraction.into_text(), "");
        let warnings = notifier.with_severity(Severity::Warning);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("appears to be empty or corrupted"));
        assert!(notifier.with_severity(Severity::Error).is_empty());
    }

    #[test]
    fn well_formed_pdf_pages_joined_in_order() {
        let notifier = RecordingNotifier::new();
        let file = UploadedFile::new("a.pdf", pdf_with_pages(&["First page", "Second page"]));

        let extraction = extract_text(&file, &notifier);

        let text = extraction.text();
        let (first, second) = text.split_once(PAGE_SEPARATOR).expect("two pages");
        assert!(first.contains("First page"));
        assert!(second.contains("Second page"));
        assert!(notifier.messages().is_empty());
    }

    #[test]
    fn docx_is_extracted() {
        let notifier = RecordingNotifier::new();
        let file = UploadedFile::new("b.docx", docx_with_paragraphs(&["Syllabus", "Week 1"]));

        let extraction = extract_text(&file, &notifier);

        assert_eq!(extraction, Extraction::Text("Syllabus\n\nWeek 1".into()));
        assert!(notifier.messages().is_empty());
    }

    #[test]
    fn broken_word_file_reports_error() {
        let notifier = RecordingNotifier::new();
        let file = UploadedFile::new("old.doc", b"not a zip archive".to_vec());

        let extraction = extract_text(&file, &notifier);

        assert!(matches!(extraction, Extraction::Failed { .. }));
        let errors = notifier.with_severity(Severity::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("An error occurred while processing 'old.doc': "));
    }

    #[test]
    fn empty_word_file_has_no_size_precheck() {
        let notifier = RecordingNotifier::new();
        let file = UploadedFile::new("empty.docx", Vec::new());

        let extraction = extract_text(&file, &notifier);

        assert!(matches!(extraction, Extraction::Failed { .. }));
        assert_eq!(notifier.with_severity(Severity::Error).len(), 1);
    }

    #[test]
    fn panic_payloads_are_described() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        let payload: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }
}

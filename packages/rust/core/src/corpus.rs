//! Aggregation of every uploaded file's text into one corpus.

use tracing::{info, instrument};

use studybuddy_extract::extract_text;
use studybuddy_shared::{Notifier, UploadedFile};

/// Appended after each file's text, including the last one.
pub const FILE_SEPARATOR: &str = "\n\n";

/// Concatenated text of a set of files, in upload order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    text: String,
    files: usize,
    empty: usize,
}

impl Corpus {
    /// Extract each file and append its text followed by [`FILE_SEPARATOR`].
    ///
    /// A file that yields no text still contributes its separator. Extraction
    /// problems are reported through `notifier` and never stop aggregation.
    #[instrument(skip_all, fields(files = files.len()))]
    pub fn build(files: &[UploadedFile], notifier: &dyn Notifier) -> Self {
        let mut corpus = Self::default();
        for file in files {
            let text = extract_text(file, notifier).into_text();
            if text.is_empty() {
                corpus.empty += 1;
            }
            corpus.text.push_str(&text);
            corpus.text.push_str(FILE_SEPARATOR);
            corpus.files += 1;
        }
        info!(
            chars = corpus.text.len(),
            contributing = corpus.contributing(),
            empty = corpus.empty,
            "corpus built"
        );
        corpus
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Number of files aggregated.
    pub fn file_count(&self) -> usize {
        self.files
    }

    /// Files that yielded non-empty text.
    pub fn contributing(&self) -> usize {
        self.files - self.empty
    }

    /// Files that yielded no text (unsupported, empty, corrupt or failed).
    pub fn empty(&self) -> usize {
        self.empty
    }

    /// True when no file yielded any text.
    pub fn has_no_text(&self) -> bool {
        self.contributing() == 0
    }
}

impl std::fmt::Display for Corpus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studybuddy_extract::PAGE_SEPARATOR;
    use studybuddy_extract::fixtures::{docx_with_paragraphs, pdf_with_pages};
    use studybuddy_shared::{RecordingNotifier, Severity, SilentNotifier};

    #[test]
    fn pdf_then_docx_in_upload_order() {
        let pdf = UploadedFile::new(
            "a.pdf",
            pdf_with_pages(&["Lecture one", "Lecture one continued"]),
        );
        let docx = UploadedFile::new("b.docx", docx_with_paragraphs(&["Lecture two"]));
        let pdf_text = extract_text(&pdf, &SilentNotifier).into_text();
        let docx_text = extract_text(&docx, &SilentNotifier).into_text();

        let corpus = Corpus::build(&[pdf, docx], &SilentNotifier);

        assert_eq!(corpus.as_str(), format!("{pdf_text}\n\n{docx_text}\n\n"));
        let (first, rest) = corpus.as_str().split_once(PAGE_SEPARATOR).expect("page break");
        assert!(first.contains("Lecture one"));
        assert!(rest.contains("Lecture one continued"));
        assert!(rest.find("continued") < rest.find("Lecture two"));
        assert_eq!(corpus.file_count(), 2);
        assert_eq!(corpus.contributing(), 2);
    }

    #[test]
    fn failed_files_leave_only_their_separator() {
        let notifier = RecordingNotifier::new();
        let files = [
            UploadedFile::new("x.txt", b"plain".to_vec()),
            UploadedFile::new("b.docx", docx_with_paragraphs(&["Kept"])),
            UploadedFile::new("blank.pdf", Vec::new()),
        ];

        let corpus = Corpus::build(&files, &notifier);

        assert_eq!(corpus.as_str(), "\n\nKept\n\n\n\n");
        assert_eq!(corpus.contributing(), 1);
        assert_eq!(corpus.empty(), 2);
        assert_eq!(notifier.with_severity(Severity::Warning).len(), 2);
    }

    #[test]
    fn duplicates_are_not_collapsed() {
        let file = UploadedFile::new("b.docx", docx_with_paragraphs(&["Same"]));
        let corpus = Corpus::build(&[file.clone(), file], &SilentNotifier);
        assert_eq!(corpus.as_str(), "Same\n\nSame\n\n");
    }

    #[test]
    fn no_files_is_empty() {
        let corpus = Corpus::build(&[], &SilentNotifier);
        assert_eq!(corpus.as_str(), "");
        assert!(corpus.has_no_text());
        assert_eq!(corpus.file_count(), 0);
    }
}

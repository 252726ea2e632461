//! PDF text extraction via `lopdf`, parsed entirely in memory.

use lopdf::Document;
use tracing::debug;

use crate::error::ExtractError;

/// Separator placed between consecutive pages.
pub const PAGE_SEPARATOR: &str = "\n\n";

/// Extract the text of every page, in page order, joined by [`PAGE_SEPARATOR`].
pub(crate) fn extract(bytes: &[u8]) -> Result<String, ExtractError> {
    let doc = Document::load_mem(bytes).map_err(ExtractError::PdfLoad)?;

    let pages = doc.get_pages();
    debug!(pages = pages.len(), "PDF loaded");

    let mut texts = Vec::with_capacity(pages.len());
    // BTreeMap keys are page numbers, so iteration is already in page order.
    for page in pages.keys() {
        let text = doc
            .extract_text(&[*page])
            .map_err(|source| ExtractError::PdfPage {
                page: *page,
                source,
            })?;
        texts.push(text);
    }

    Ok(join_pages(&texts))
}

/// Join page texts with [`PAGE_SEPARATOR`]. Trailing whitespace the parser
/// leaves at the end of each page is dropped so pages are separated by
/// exactly one blank line.
pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    pages
        .iter()
        .map(|p| p.as_ref().trim_end())
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::pdf_with_pages;

    #[test]
    fn join_pages_uses_blank_line() {
        assert_eq!(join_pages(&["one", "two", "three"]), "one\n\ntwo\n\nthree");
    }

    #[test]
    fn join_pages_trims_page_tails() {
        assert_eq!(join_pages(&["one\n", "two \n"]), "one\n\ntwo");
    }

    #[test]
    fn join_single_and_empty() {
        assert_eq!(join_pages(&["only"]), "only");
        assert_eq!(join_pages::<&str>(&[]), "");
    }

    #[test]
    fn extracts_pages_in_order() {
        let bytes = pdf_with_pages(&["Alpha page", "Bravo page", "Charlie page"]);
        let text = extract(&bytes).expect("extract");

        let a = text.find("Alpha").expect("first page");
        let b = text.find("Bravo").expect("second page");
        let c = text.find("Charlie").expect("third page");
        assert!(a < b && b < c);
        assert_eq!(text.matches(PAGE_SEPARATOR).count(), 2);
    }

    #[test]
    fn garbage_fails_to_load() {
        let err = extract(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, ExtractError::PdfLoad(_)));
    }
}

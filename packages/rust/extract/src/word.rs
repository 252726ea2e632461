//! Word (OOXML) text extraction.
//!
//! A `.docx` file is a zip archive; text lives in `word/document.xml` plus
//! optional `word/headerN.xml` / `word/footerN.xml` parts. Headers come first,
//! then the body, then footers. Paragraphs end with a blank line, `<w:tab/>`
//! becomes a tab and `<w:br/>` a newline. Legacy binary `.doc` files are not
//! zip archives and fail with [`ExtractError::Archive`].

use std::io::{Cursor, Read};

use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::debug;
use zip::ZipArchive;

use crate::error::ExtractError;

const BODY_PART: &str = "word/document.xml";

pub(crate) fn extract(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let names: Vec<String> = archive.file_names().map(str::to_owned).collect();
    if !names.iter().any(|n| n == BODY_PART) {
        return Err(ExtractError::MissingPart(BODY_PART));
    }
    let parts = ordered_parts(&names);
    debug!(parts = parts.len(), "Word archive opened");

    let mut text = String::new();
    for part in &parts {
        let mut xml = String::new();
        archive
            .by_name(part)?
            .read_to_string(&mut xml)
            .map_err(|source| ExtractError::Io {
                part: part.clone(),
                source,
            })?;
        text.push_str(&xml_to_text(part, &xml)?);
    }

    Ok(text.trim().to_string())
}

/// Headers, then the body, then footers; each group sorted by name.
fn ordered_parts(names: &[String]) -> Vec<String> {
    let is_part = |name: &str, prefix: &str| name.starts_with(prefix) && name.ends_with(".xml");

    let mut headers: Vec<String> = names
        .iter()
        .filter(|n| is_part(n.as_str(), "word/header"))
        .cloned()
        .collect();
    let mut footers: Vec<String> = names
        .iter()
        .filter(|n| is_part(n.as_str(), "word/footer"))
        .cloned()
        .collect();
    headers.sort();
    footers.sort();

    let mut parts = headers;
    parts.push(BODY_PART.to_string());
    parts.extend(footers);
    parts
}

fn xml_to_text(part: &str, xml: &str) -> Result<String, ExtractError> {
    let xml_err = |message: String| ExtractError::Xml {
        part: part.to_string(),
        message,
    };

    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event().map_err(|e| xml_err(e.to_string()))? {
            // Local names, so any prefix bound to the WordprocessingML
            // namespace (or none, when it is the default) is accepted.
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_text = true,
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => out.push_str("\n\n"),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" => out.push('\t'),
                b"br" | b"cr" => out.push('\n'),
                b"p" => out.push_str("\n\n"),
                _ => {}
            },
            Event::Text(t) if in_text => {
                let unescaped = t.unescape().map_err(|e| xml_err(e.to_string()))?;
                out.push_str(&unescaped);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(out)
}

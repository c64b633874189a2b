use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use crate::error::{ConvertError, Result};

/// Archive member holding the main document body.
const DOCUMENT_PART: &str = "word/document.xml";

/// Word (.docx) text extractor: body paragraphs in document order, each
/// followed by a newline.
pub struct DocxExtractor;

impl Default for DocxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocxExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Extract text from a .docx file path.
    pub fn extract_from_file(&self, path: &Path) -> Result<String> {
        let file = File::open(path)?;
        let mut archive = ZipArchive::new(BufReader::new(file))
            .map_err(|e| ConvertError::extraction(path, format!("not a docx archive: {e}")))?;
        let mut part = archive
            .by_name(DOCUMENT_PART)
            .map_err(|e| ConvertError::extraction(path, format!("missing {DOCUMENT_PART}: {e}")))?;
        let mut xml = String::new();
        part.read_to_string(&mut xml)?;
        drop(part);

        let paragraphs = body_paragraphs(&xml)
            .map_err(|e| ConvertError::extraction(path, format!("malformed {DOCUMENT_PART}: {e}")))?;
        Ok(paragraphs.iter().fold(String::new(), |mut out, p| {
            out.push_str(p);
            out.push('\n');
            out
        }))
    }
}

/// Collect the text of every paragraph that is a direct child of `w:body`.
///
/// Paragraphs nested in tables or text boxes are not body paragraphs and are
/// skipped. Inside a paragraph, `w:t` text is kept verbatim, `w:tab` becomes a
/// tab and `w:br`/`w:cr` become newlines.
pub fn body_paragraphs(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut paragraphs = Vec::new();
    // Open body paragraph: (stack depth of its parent, text so far)
    let mut current: Option<(usize, String)> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let name = e.local_name().as_ref().to_vec();
                if current.is_none() && name == b"p" && parent_is(&stack, b"body") {
                    current = Some((stack.len(), String::new()));
                }
                stack.push(name);
            }
            Event::Empty(e) => {
                let name = e.local_name();
                match current.as_mut() {
                    Some((_, text)) if parent_is(&stack, b"r") => match name.as_ref() {
                        b"tab" => text.push('\t'),
                        b"br" | b"cr" => text.push('\n'),
                        _ => {}
                    },
                    None if name.as_ref() == b"p" && parent_is(&stack, b"body") => {
                        paragraphs.push(String::new());
                    }
                    _ => {}
                }
            }
            Event::Text(t) => {
                if let Some((_, text)) = current.as_mut() {
                    if parent_is(&stack, b"t") {
                        text.push_str(&t.unescape()?);
                    }
                }
            }
            Event::End(_) => {
                stack.pop();
                if current.as_ref().is_some_and(|(depth, _)| *depth == stack.len()) {
                    if let Some((_, text)) = current.take() {
                        paragraphs.push(text);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs)
}

fn parent_is(stack: &[Vec<u8>], local_name: &[u8]) -> bool {
    stack.last().is_some_and(|n| n == local_name)
}

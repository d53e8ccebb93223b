//! Word document I/O
//!
//! A `.docx` file is a zip container; the body lives in
//! `word/document.xml`. Reading splits the body into paragraph and
//! inter-paragraph segments; writing copies every untouched part and
//! paragraph byte-for-byte and rebuilds only paragraphs whose text changed.
//!
//! A rebuilt paragraph keeps its `<w:pPr>` properties but collapses its
//! runs into a single run, so character-level formatting inside a
//! substituted paragraph is lost. Paragraphs without substitutions keep
//! their formatting verbatim.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::error::{DocmillError, Result};
use crate::template::Template;

const BODY_PART: &str = "word/document.xml";

/// A parsed `.docx` container.
#[derive(Debug, Clone)]
pub struct WordDocument {
    /// Zip parts in original order; the body part is the `Body` marker.
    parts: Vec<Part>,
    /// Parsed body segments, paragraph texts decoded.
    segments: Vec<Segment>,
}

#[derive(Debug, Clone)]
enum Part {
    Blob { name: String, bytes: Vec<u8> },
    Body,
}

#[derive(Debug, Clone)]
enum Segment {
    /// XML outside any `<w:p>` element, kept verbatim.
    Raw(String),
    Paragraph {
        raw: String,
        text: String,
    },
}

impl WordDocument {
    /// Open and parse a `.docx` file.
    pub fn open(path: &Path) -> Result<Self> {
        let invalid = |reason: String| DocmillError::InvalidDocument {
            path: path.to_path_buf(),
            reason,
        };

        let file = File::open(path)?;
        let mut archive = ZipArchive::new(file).map_err(|e| invalid(e.to_string()))?;

        let mut parts = Vec::with_capacity(archive.len());
        let mut body_xml = None;

        for index in 0..archive.len() {
            let mut entry = archive
                .by_index(index)
                .map_err(|e| invalid(e.to_string()))?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().to_string();
            let mut bytes = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut bytes)?;

            if name == BODY_PART {
                let xml = String::from_utf8(bytes)
                    .map_err(|_| invalid(format!("{BODY_PART} is not valid UTF-8")))?;
                body_xml = Some(xml);
                parts.push(Part::Body);
            } else {
                parts.push(Part::Blob { name, bytes });
            }
        }

        let body_xml = body_xml.ok_or_else(|| invalid(format!("missing {BODY_PART}")))?;
        let segments = split_segments(&body_xml);

        Ok(Self { parts, segments })
    }

    /// The template view: the text of every paragraph, in document order.
    pub fn template(&self) -> Template {
        Template::from_blocks(self.segments.iter().filter_map(|segment| match segment {
            Segment::Paragraph { text, .. } => Some(text.clone()),
            Segment::Raw(_) => None,
        }))
    }

    /// Write a copy of this document with the given paragraph texts.
    ///
    /// `blocks` must line up one-to-one with the document's paragraphs
    /// (the substituter preserves count and order). Paragraphs whose text
    /// is unchanged are emitted byte-for-byte.
    pub fn write_substituted(&self, blocks: &[String], path: &Path) -> Result<()> {
        let paragraphs = self
            .segments
            .iter()
            .filter(|s| matches!(s, Segment::Paragraph { .. }))
            .count();
        if blocks.len() != paragraphs {
            return Err(DocmillError::InvalidDocument {
                path: path.to_path_buf(),
                reason: format!(
                    "substituted block count {} does not match {} paragraphs",
                    blocks.len(),
                    paragraphs
                ),
            });
        }

        let body = self.render_body(blocks, path)?;

        let file = File::create(path)?;
        let mut writer = ZipWriter::new(file);
        let options = SimpleFileOptions::default();

        for part in &self.parts {
            match part {
                Part::Blob { name, bytes } => {
                    writer.start_file(name.as_str(), options)?;
                    writer.write_all(bytes)?;
                }
                Part::Body => {
                    writer.start_file(BODY_PART, options)?;
                    writer.write_all(body.as_bytes())?;
                }
            }
        }

        writer.finish()?;
        Ok(())
    }

    fn render_body(&self, blocks: &[String], path: &Path) -> Result<String> {
        let mut body = String::new();
        let mut next_block = blocks.iter();

        for segment in &self.segments {
            match segment {
                Segment::Raw(xml) => body.push_str(xml),
                Segment::Paragraph { raw, text } => {
                    let block = next_block.next().ok_or_else(|| {
                        DocmillError::InvalidDocument {
                            path: path.to_path_buf(),
                            reason: "fewer substituted blocks than paragraphs".to_string(),
                        }
                    })?;
                    if block == text {
                        body.push_str(raw);
                    } else {
                        body.push_str(&rebuild_paragraph(raw, block));
                    }
                }
            }
        }

        Ok(body)
    }
}

/// Split `word/document.xml` into paragraph and inter-paragraph segments.
fn split_segments(xml: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut rest = xml;

    while let Some(start) = find_tag(rest, "<w:p") {
        if start > 0 {
            segments.push(Segment::Raw(rest[..start].to_string()));
        }
        let tail = &rest[start..];

        let Some(open_end) = tail.find('>') else {
            segments.push(Segment::Raw(tail.to_string()));
            return segments;
        };

        if tail[..open_end].ends_with('/') {
            // Self-closing empty paragraph
            let raw = &tail[..open_end + 1];
            segments.push(Segment::Paragraph {
                raw: raw.to_string(),
                text: String::new(),
            });
            rest = &tail[open_end + 1..];
            continue;
        }

        match tail.find("</w:p>") {
            Some(end) => {
                let raw = &tail[..end + "</w:p>".len()];
                segments.push(Segment::Paragraph {
                    raw: raw.to_string(),
                    text: paragraph_text(raw),
                });
                rest = &tail[end + "</w:p>".len()..];
            }
            None => {
                segments.push(Segment::Raw(tail.to_string()));
                return segments;
            }
        }
    }

    if !rest.is_empty() {
        segments.push(Segment::Raw(rest.to_string()));
    }
    segments
}

/// Find the next occurrence of `prefix` that starts a real element, i.e.
/// followed by `>`, a space, or `/`. Avoids matching `<w:pPr` when looking
/// for `<w:p`.
fn find_tag(xml: &str, prefix: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(found) = xml[from..].find(prefix) {
        let pos = from + found;
        match xml.as_bytes().get(pos + prefix.len()) {
            Some(b'>') | Some(b' ') | Some(b'/') => return Some(pos),
            _ => from = pos + prefix.len(),
        }
    }
    None
}

/// Concatenated text of a paragraph's `<w:t>` runs, entities decoded.
fn paragraph_text(paragraph_xml: &str) -> String {
    let mut text = String::new();
    let mut rest = paragraph_xml;

    while let Some(start) = find_tag(rest, "<w:t") {
        let tail = &rest[start..];
        let Some(open_end) = tail.find('>') else {
            break;
        };
        if tail[..open_end].ends_with('/') {
            rest = &tail[open_end + 1..];
            continue;
        }
        let content = &tail[open_end + 1..];
        match content.find("</w:t>") {
            Some(end) => {
                text.push_str(&unescape_xml(&content[..end]));
                rest = &content[end + "</w:t>".len()..];
            }
            None => break,
        }
    }

    text
}

/// Rebuild a paragraph with new text: open tag and `<w:pPr>` kept
/// verbatim, runs collapsed into one.
fn rebuild_paragraph(raw: &str, new_text: &str) -> String {
    let open_end = raw.find('>').map(|i| i + 1).unwrap_or(raw.len());
    let open = &raw[..open_end];

    let properties = find_properties(&raw[open_end..]).unwrap_or("");

    format!(
        "{open}{properties}<w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>",
        escape_xml(new_text)
    )
}

/// The paragraph's `<w:pPr>…</w:pPr>` element, if present.
fn find_properties(paragraph_body: &str) -> Option<&str> {
    let start = find_tag(paragraph_body, "<w:pPr")?;
    let tail = &paragraph_body[start..];
    let open_end = tail.find('>')?;
    if tail[..open_end].ends_with('/') {
        return Some(&tail[..open_end + 1]);
    }
    let end = tail.find("</w:pPr>")?;
    Some(&tail[..end + "</w:pPr>".len()])
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn unescape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let replaced = [
            ("&amp;", "&"),
            ("&lt;", "<"),
            ("&gt;", ">"),
            ("&quot;", "\""),
            ("&apos;", "'"),
        ]
        .iter()
        .find(|(entity, _)| tail.starts_with(entity));

        match replaced {
            Some((entity, value)) => {
                out.push_str(value);
                rest = &tail[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

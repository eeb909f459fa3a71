//! TTML document parsing and LRC rendering.
//!
//! A TTML document is a tree of `p` (paragraph) elements, each carrying a
//! `begin` clock time and inline text. Conversion flattens those into
//! `[MM:SS.CC] text` lines plus one closing marker line.

use crate::models::Cue;
use crate::timecode::{format_lrc_timestamp, parse_clock_time};
use anyhow::{Context, Result};
use roxmltree::{Document, Node};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

/// TTML content namespace. Documents in the wild also use bare tag names.
const TTML_NS: &str = "http://www.w3.org/ns/ttml";

/// Converts one TTML document into LRC lines. Unparsable markup is fatal for
/// this document only; callers converting a batch keep going.
pub fn convert_document(xml: &str) -> Result<Vec<String>> {
    let doc = Document::parse(xml).context("failed parsing TTML as XML")?;
    let paragraphs = find_paragraphs(&doc);
    let cues = collect_cues(&paragraphs);
    Ok(render_lrc(&cues, &paragraphs))
}

/// Paragraph elements in document order. Tries the TTML namespace first and
/// falls back to a raw tag-name scan for documents without one.
fn find_paragraphs<'a, 'input>(doc: &'a Document<'input>) -> Vec<Node<'a, 'input>> {
    let namespaced: Vec<Node> = doc
        .descendants()
        .filter(|n| {
            n.is_element()
                && n.tag_name().name() == "p"
                && n.tag_name().namespace() == Some(TTML_NS)
        })
        .collect();
    if !namespaced.is_empty() {
        return namespaced;
    }
    doc.descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "p")
        .collect()
}

/// Concatenation of all descendant text nodes, trimmed.
fn paragraph_text(p: &Node) -> String {
    p.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect::<String>()
        .trim()
        .to_string()
}

/// One cue per paragraph that has both a begin time and non-empty text;
/// everything else produces no output line.
fn collect_cues(paragraphs: &[Node]) -> Vec<Cue> {
    let mut cues = Vec::new();
    for p in paragraphs {
        let begin = match p.attribute("begin") {
            Some(b) if !b.is_empty() => b,
            _ => continue,
        };
        let text = paragraph_text(p);
        if text.is_empty() {
            continue;
        }
        cues.push(Cue {
            seconds: parse_clock_time(begin),
            text,
        });
    }
    cues
}

fn render_lrc(cues: &[Cue], paragraphs: &[Node]) -> Vec<String> {
    let mut lines: Vec<String> = cues
        .iter()
        .map(|cue| format!("{} {}", format_lrc_timestamp(cue.seconds), cue.text))
        .collect();

    // Closing marker one second after the last paragraph carrying a begin
    // attribute, in source order: a trailing paragraph dropped for empty
    // text still anchors the marker.
    if !lines.is_empty() {
        let last_begin = paragraphs
            .iter()
            .rev()
            .find_map(|p| p.attribute("begin"))
            .map(parse_clock_time)
            .unwrap_or(0.0);
        lines.push(format_lrc_timestamp(last_begin + 1.0));
    }
    lines
}

/// Writes LRC lines, each followed by a newline. Zero lines produce a
/// zero-byte file, not an error.
pub fn write_lrc(path: &Path, lines: &[String]) -> Result<()> {
    let file = fs::File::create(path)
        .with_context(|| format!("failed creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for line in lines {
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

//! Best-effort XML reader that turns quick-xml events into an [`Element`] tree.
//!
//! Report exports are frequently hand-edited or truncated, so the reader
//! recovers the way libxml2 does in `recover` mode instead of rejecting the
//! whole document:
//!
//! * a mismatched end tag closes the nearest open element of that name,
//!   implicitly closing everything opened after it;
//! * an end tag with no open element of that name is dropped;
//! * elements left open at end of input are closed;
//! * a `<` that does not start a valid tag is kept as text, and any markup
//!   the reader swallowed after it is read again;
//! * entity references that cannot be resolved are kept verbatim, one by one;
//! * a reader error after the root element was opened truncates the tree.
//!
//! Only input that never yields a root element is rejected.
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{FlattenError, Result};
use crate::xml::encoding::decode_document;
use crate::xml::tree::{Element, Node};

/// A parsed report document.
#[derive(Debug, Clone)]
pub struct Document {
    root: Element,
    recovered: Vec<String>,
}

impl Document {
    /// Parse an in-memory XML document.
    pub fn parse_str(xml: &str) -> Result<Self> {
        let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
        let mut reader = tolerant_reader(xml);

        let mut builder = TreeBuilder::default();
        loop {
            match reader.read_event() {
                Ok(Event::Eof) => break,
                Ok(event) => builder.apply(event),
                Err(err) => {
                    let position = reader.error_position() as u64;
                    if !builder.has_started() {
                        return Err(FlattenError::Parse {
                            position,
                            message: err.to_string(),
                        });
                    }
                    builder.recover(format!(
                        "truncated document at byte {}: {}",
                        position, err
                    ));
                    break;
                }
            }

            // Anything after the root element closes is extra content.
            if builder.is_complete() {
                break;
            }
        }

        let position = reader.buffer_position() as u64;
        builder.finish(position)
    }

    /// Read, decode and parse an XML file.
    ///
    /// The character set comes from the byte-order mark or the XML
    /// declaration; UTF-8 is assumed otherwise.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| FlattenError::io(path, e))?;
        let content = decode_document(&bytes)?;
        Self::parse_str(&content)
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Malformations that were repaired while building the tree.
    pub fn recovered(&self) -> &[String] {
        &self.recovered
    }
}

fn tolerant_reader(xml: &str) -> Reader<&[u8]> {
    let mut reader = Reader::from_str(xml);
    let config = reader.config_mut();
    config.trim_text(false);
    config.check_end_names = false;
    config.allow_unmatched_ends = true;
    reader
}

/// `None` when the tag name is not a valid XML name, which means the `<`
/// was prose rather than markup.
fn element_from_start(start: &BytesStart<'_>) -> Option<Element> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    if !is_xml_name(&name) {
        return None;
    }
    let mut element = Element::new(name);
    for attr in start.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let (value, _) = unescape_lenient(&String::from_utf8_lossy(&attr.value));
        element.attributes.push((key, value));
    }
    Some(element)
}

fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let name_start = |c: char| c.is_alphabetic() || c == '_' || c == ':' || !c.is_ascii();
    name_start(first)
        && chars.all(|c| name_start(c) || c.is_ascii_digit() || c == '-' || c == '.')
}

/// Resolve entity references one at a time, keeping unresolvable ones as
/// written. Returns the text and how many references were left unresolved.
fn unescape_lenient(raw: &str) -> (String, usize) {
    let mut out = String::with_capacity(raw.len());
    let mut unresolved = 0;
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let reference = tail
            .find(';')
            .map(|semi| &tail[..=semi])
            .filter(|r| !r[1..].contains(|c: char| c == '&' || c.is_whitespace()));
        let Some(reference) = reference else {
            // Bare ampersand.
            out.push('&');
            unresolved += 1;
            rest = &tail[1..];
            continue;
        };
        match quick_xml::escape::unescape(reference) {
            Ok(decoded) => out.push_str(&decoded),
            Err(_) => {
                out.push_str(reference);
                unresolved += 1;
            }
        }
        rest = &tail[reference.len()..];
    }
    out.push_str(rest);
    (out, unresolved)
}

#[derive(Debug, Default)]
struct TreeBuilder {
    open: Vec<Element>,
    root: Option<Element>,
    recovered: Vec<String>,
}

impl TreeBuilder {
    fn apply(&mut self, event: Event<'_>) {
        match event {
            Event::Start(ref e) => match element_from_start(e) {
                Some(element) => self.open(element),
                None => self.stray_markup(e, false),
            },
            Event::Empty(ref e) => match element_from_start(e) {
                Some(element) => {
                    self.open(element);
                    self.close_current();
                }
                None => self.stray_markup(e, true),
            },
            Event::End(ref e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                self.close(&name);
            }
            Event::Text(ref e) => {
                let (text, unresolved) = unescape_lenient(&String::from_utf8_lossy(e));
                if unresolved > 0 {
                    self.recover(format!(
                        "kept {} unresolved entity reference(s) verbatim",
                        unresolved
                    ));
                }
                self.text(text);
            }
            Event::CData(e) => {
                self.text(String::from_utf8_lossy(&e.into_inner()).into_owned());
            }
            // Declarations, comments, processing instructions and DOCTYPE carry no report data.
            _ => {}
        }
    }

    /// Handle `<...>` whose name is invalid, e.g. `a < b</text>` read as one tag.
    ///
    /// The leading `<` and everything up to the next `<` inside the tag
    /// become text; the remainder is markup the reader swallowed and is
    /// parsed again.
    fn stray_markup(&mut self, start: &BytesStart<'_>, empty: bool) {
        let raw = String::from_utf8_lossy(start);
        let markup = format!("<{}{}>", raw, if empty { "/" } else { "" });
        self.recover(format!("kept stray '<' as text in {:?}", markup));

        match markup[1..].find('<') {
            None => self.text(markup),
            Some(offset) => {
                let split = offset + 1;
                self.text(markup[..split].to_string());
                self.reparse(&markup[split..]);
            }
        }
    }

    fn reparse(&mut self, fragment: &str) {
        let mut reader = tolerant_reader(fragment);
        loop {
            let consumed = reader.buffer_position() as usize;
            match reader.read_event() {
                Ok(Event::Eof) => break,
                Ok(event) => self.apply(event),
                Err(_) => {
                    self.text(fragment[consumed.min(fragment.len())..].to_string());
                    break;
                }
            }
        }
    }

    fn has_started(&self) -> bool {
        !self.open.is_empty() || self.root.is_some()
    }

    fn is_complete(&self) -> bool {
        self.open.is_empty() && self.root.is_some()
    }

    fn open(&mut self, element: Element) {
        self.open.push(element);
    }

    fn text(&mut self, text: String) {
        // Whitespace or stray text outside the root is not part of the tree.
        if let Some(current) = self.open.last_mut() {
            current.children.push(Node::Text(text));
        }
    }

    fn close(&mut self, name: &str) {
        let Some(depth) = self.open.iter().rposition(|element| element.name == name) else {
            self.recover(format!("dropped unmatched end tag </{}>", name));
            return;
        };
        while self.open.len() > depth + 1 {
            let unclosed = self.open.last().map(|e| e.name.clone()).unwrap_or_default();
            self.recover(format!("implicitly closed <{}> at </{}>", unclosed, name));
            self.close_current();
        }
        self.close_current();
    }

    fn close_current(&mut self) {
        let Some(element) = self.open.pop() else {
            return;
        };
        match self.open.last_mut() {
            Some(parent) => parent.children.push(Node::Element(element)),
            None => self.root = Some(element),
        }
    }

    fn recover(&mut self, note: String) {
        log::warn!("Recovered malformed XML: {}", note);
        self.recovered.push(note);
    }

    fn finish(mut self, position: u64) -> Result<Document> {
        while let Some(unclosed) = self.open.last().map(|e| e.name.clone()) {
            self.recover(format!("closed <{}> left open at end of input", unclosed));
            self.close_current();
        }
        let root = self.root.ok_or_else(|| FlattenError::Parse {
            position,
            message: "Document is empty".to_string(),
        })?;
        Ok(Document {
            root,
            recovered: self.recovered,
        })
    }
}

//! Minimal markup loader.
//!
//! Builds a [`DomTree`] from a small HTML subset: start/end tags, quoted,
//! unquoted and bare attributes, text, comments, doctypes, void and
//! self-closing elements, and raw text inside `<script>`/`<style>`.
//!
//! This is not an HTML5 tree builder. There are no insertion modes and no
//! implied tags; an end tag closes back to the nearest open element with the
//! same name and is ignored when no such element is open.

use thiserror::Error;

use crate::{DomTree, ElementData, NodeId, NodeType};

/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
/// "Void elements only have a start tag; end tags must not be specified for void elements."
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose content is raw text up to the matching end tag.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Error produced when markup cannot be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkupError {
    /// A `<` opened a tag that never reached `>`.
    #[error("unterminated tag starting at byte {offset}")]
    UnterminatedTag {
        /// Byte offset of the `<`.
        offset: usize,
    },
    /// A `<!--` comment never reached `-->`.
    #[error("unterminated comment starting at byte {offset}")]
    UnterminatedComment {
        /// Byte offset of the `<!--`.
        offset: usize,
    },
    /// A quoted attribute value never reached its closing quote.
    #[error("unterminated attribute value starting at byte {offset}")]
    UnterminatedAttributeValue {
        /// Byte offset of the opening quote.
        offset: usize,
    },
    /// A tag with no name, such as `< >` or `</>`.
    #[error("missing tag name at byte {offset}")]
    MissingTagName {
        /// Byte offset of the `<`.
        offset: usize,
    },
}

/// Parse markup into a fresh tree rooted at a Document node.
///
/// # Errors
///
/// Returns a [`MarkupError`] for unterminated tags, comments or attribute
/// values, and for tags without a name.
pub fn parse_markup(input: &str) -> Result<DomTree, MarkupError> {
    let mut parser = MarkupParser::new(input);
    parser.run()?;
    Ok(parser.tree)
}

struct MarkupParser<'a> {
    input: &'a str,
    pos: usize,
    tree: DomTree,
    /// Stack of open elements; the Document is always at the bottom.
    open: Vec<NodeId>,
}

impl<'a> MarkupParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            tree: DomTree::new(),
            open: vec![NodeId::ROOT],
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            let _ = self.consume();
        }
    }

    fn current_parent(&self) -> NodeId {
        self.open.last().copied().unwrap_or(NodeId::ROOT)
    }

    fn run(&mut self) -> Result<(), MarkupError> {
        while self.pos < self.input.len() {
            if self.rest().starts_with("<!--") {
                self.comment()?;
            } else if self.rest().starts_with("<!") || self.rest().starts_with("<?") {
                self.bogus_declaration()?;
            } else if self.rest().starts_with("</") {
                self.end_tag()?;
            } else if self
                .rest()
                .strip_prefix('<')
                .and_then(|r| r.chars().next())
                .is_some_and(|c| c.is_ascii_alphabetic())
            {
                self.start_tag()?;
            } else {
                self.text();
            }
        }
        Ok(())
    }

    fn text(&mut self) {
        let start = self.pos;
        // A stray '<' that does not open a tag is literal text.
        let _ = self.consume();
        let end = self.rest().find('<').map_or(self.input.len(), |i| self.pos + i);
        self.pos = end;
        let text = &self.input[start..end];
        let parent = self.current_parent();
        let _ = self.tree.append_text(parent, text);
    }

    fn comment(&mut self) -> Result<(), MarkupError> {
        let offset = self.pos;
        self.pos += "<!--".len();
        let Some(end) = self.rest().find("-->") else {
            return Err(MarkupError::UnterminatedComment { offset });
        };
        let data = self.rest()[..end].to_string();
        self.pos += end + "-->".len();
        let comment = self.tree.alloc(NodeType::Comment(data));
        let parent = self.current_parent();
        self.tree.append_child(parent, comment);
        Ok(())
    }

    /// `<!DOCTYPE ...>` and processing instructions carry nothing we keep.
    fn bogus_declaration(&mut self) -> Result<(), MarkupError> {
        let offset = self.pos;
        let Some(end) = self.rest().find('>') else {
            return Err(MarkupError::UnterminatedTag { offset });
        };
        self.pos += end + 1;
        Ok(())
    }

    fn tag_name(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_whitespace() || c == '/' || c == '>' {
                break;
            }
            name.push(c.to_ascii_lowercase());
            let _ = self.consume();
        }
        name
    }

    fn end_tag(&mut self) -> Result<(), MarkupError> {
        let offset = self.pos;
        self.pos += "</".len();
        let name = self.tag_name();
        if name.is_empty() {
            return Err(MarkupError::MissingTagName { offset });
        }
        let Some(end) = self.rest().find('>') else {
            return Err(MarkupError::UnterminatedTag { offset });
        };
        self.pos += end + 1;

        // Pop back to the matching open element; ignore unmatched end tags.
        let matching = self.open.iter().rposition(|&id| {
            self.tree
                .as_element(id)
                .is_some_and(|e| e.tag_name == name)
        });
        if let Some(index) = matching {
            self.open.truncate(index);
        }
        Ok(())
    }

    fn start_tag(&mut self) -> Result<(), MarkupError> {
        let offset = self.pos;
        let _ = self.consume(); // '<'
        let name = self.tag_name();
        if name.is_empty() {
            return Err(MarkupError::MissingTagName { offset });
        }

        let mut data = ElementData::new(&name);
        let mut self_closing = false;
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(MarkupError::UnterminatedTag { offset }),
                Some('>') => {
                    let _ = self.consume();
                    break;
                }
                Some('/') => {
                    let _ = self.consume();
                    if self.peek() == Some('>') {
                        self_closing = true;
                    }
                }
                Some(_) => {
                    let (attr_name, value) = self.attribute()?;
                    if attr_name.is_empty() {
                        continue;
                    }
                    // "If there is already an attribute on the token with the exact
                    // same name, then this is a duplicate-attribute parse error and
                    // the new attribute must be removed from the token."
                    let _ = data.attrs.entry(attr_name).or_insert(value);
                }
            }
        }

        let parent = self.current_parent();
        let element = self.tree.append_element(parent, data);

        if RAW_TEXT_ELEMENTS.contains(&name.as_str()) && !self_closing {
            self.raw_text(element, &name);
        } else if !self_closing && !VOID_ELEMENTS.contains(&name.as_str()) {
            self.open.push(element);
        }
        Ok(())
    }

    fn attribute(&mut self) -> Result<(String, String), MarkupError> {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_whitespace() || matches!(c, '/' | '>' | '=') {
                break;
            }
            name.push(c.to_ascii_lowercase());
            let _ = self.consume();
        }
        if name.is_empty() {
            // A lone '=' or similar junk; consume it so the tag loop advances.
            let _ = self.consume();
        }

        self.skip_whitespace();
        if self.peek() != Some('=') {
            return Ok((name, String::new()));
        }
        let _ = self.consume();
        self.skip_whitespace();

        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                let offset = self.pos;
                let _ = self.consume();
                let Some(end) = self.rest().find(quote) else {
                    return Err(MarkupError::UnterminatedAttributeValue { offset });
                };
                let value = self.rest()[..end].to_string();
                self.pos += end + 1;
                value
            }
            _ => {
                let mut value = String::new();
                while let Some(c) = self.peek() {
                    if c.is_ascii_whitespace() || c == '>' {
                        break;
                    }
                    value.push(c);
                    let _ = self.consume();
                }
                value
            }
        };
        Ok((name, value))
    }

    fn raw_text(&mut self, element: NodeId, name: &str) {
        let close = format!("</{name}");
        let lower = self.rest().to_ascii_lowercase();
        let end = lower.find(&close).unwrap_or(lower.len());
        let text = &self.rest()[..end];
        if !text.is_empty() {
            let _ = self.tree.append_text(element, text);
        }
        self.pos += end;
        // Skip the end tag here; raw text elements are never pushed as open.
        if self.rest().starts_with("</") {
            if let Some(gt) = self.rest().find('>') {
                self.pos += gt + 1;
            } else {
                self.pos = self.input.len();
            }
        }
    }
}

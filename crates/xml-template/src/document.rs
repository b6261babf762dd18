//! In-memory XML document model.
//!
//! A [`Template`] is parsed once and never mutated. Every generation attempt
//! works on its own [`Document`] obtained from [`Template::clone_for_attempt`],
//! which is a full structural copy of the template tree.
//!
//! Elements are addressed through [`ElementHandle`]s: the sequence of child
//! indices leading from the root element to the target. Handles sort in
//! document order and are only meaningful for the document they were
//! resolved against.

use crate::error::DocumentError;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
    DocType(String),
}

/// An XML element with its qualified name, attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Qualified name as written in the source (`prefix:Local` or `Local`)
    pub name: String,
    /// Attributes in source order, values unescaped
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Name with any namespace prefix removed.
    pub fn local_name(&self) -> &str {
        match self.name.split_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Concatenated text and CDATA content of the direct children.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|child| match child {
                Node::Text(t) | Node::CData(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Replace the element's leading text with `value`.
    ///
    /// Text and CDATA nodes before the first non-text child are removed;
    /// child elements and anything after them are kept.
    pub fn set_text(&mut self, value: &str) {
        let leading = self
            .children
            .iter()
            .take_while(|child| matches!(child, Node::Text(_) | Node::CData(_)))
            .count();
        self.children.drain(..leading);
        if !value.is_empty() {
            self.children.insert(0, Node::Text(value.to_string()));
        }
    }

    /// Child elements paired with their index in `children`.
    pub fn child_elements(&self) -> impl Iterator<Item = (usize, &Element)> {
        self.children
            .iter()
            .enumerate()
            .filter_map(|(idx, child)| match child {
                Node::Element(el) => Some((idx, el)),
                _ => None,
            })
    }
}

/// Path of child indices from the root element to an element.
///
/// The empty path addresses the root. Ordering follows document order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ElementHandle(Vec<usize>);

impl ElementHandle {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn child(&self, index: usize) -> Self {
        let mut path = self.0.clone();
        path.push(index);
        Self(path)
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

/// A parsed, mutable XML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    prolog: Vec<Node>,
    root: Element,
    epilog: Vec<Node>,
}

impl Document {
    /// Wrap a root element into a document without prolog or epilog.
    pub fn from_root(root: Element) -> Self {
        Self {
            prolog: Vec::new(),
            root,
            epilog: Vec::new(),
        }
    }

    /// Parse a complete XML document.
    ///
    /// Processing instructions and the source declaration are dropped; a
    /// fresh declaration is written on serialization.
    pub fn parse(xml: &str) -> Result<Self, DocumentError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;
        let mut prolog = Vec::new();
        let mut epilog = Vec::new();

        loop {
            let event = reader.read_event().map_err(|e| {
                DocumentError::Parse(format!("at byte {}: {e}", reader.buffer_position()))
            })?;

            match event {
                Event::Start(start) => {
                    if stack.is_empty() && root.is_some() {
                        return Err(DocumentError::Malformed(
                            "multiple root elements".to_string(),
                        ));
                    }
                    stack.push(element_from_start(&start)?);
                }
                Event::Empty(start) => {
                    let element = element_from_start(&start)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack.pop().ok_or_else(|| {
                        DocumentError::Malformed("closing tag without matching start".to_string())
                    })?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    let text = text
                        .unescape()
                        .map_err(|e| DocumentError::Parse(e.to_string()))?
                        .into_owned();
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::Text(text)),
                        None if text.trim().is_empty() => {}
                        None => {
                            return Err(DocumentError::Malformed(
                                "text content outside the root element".to_string(),
                            ))
                        }
                    }
                }
                Event::CData(cdata) => {
                    let content = utf8(&cdata)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::CData(content)),
                        None => {
                            return Err(DocumentError::Malformed(
                                "CDATA section outside the root element".to_string(),
                            ))
                        }
                    }
                }
                Event::Comment(comment) => {
                    let node = Node::Comment(utf8(&comment)?);
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(node),
                        None if root.is_none() => prolog.push(node),
                        None => epilog.push(node),
                    }
                }
                Event::DocType(doctype) => {
                    if root.is_some() || !stack.is_empty() {
                        return Err(DocumentError::Malformed(
                            "DOCTYPE after the root element".to_string(),
                        ));
                    }
                    prolog.push(Node::DocType(utf8(&doctype)?));
                }
                Event::Eof => break,
                other => debug!("Skipping XML event {:?}", other),
            }
        }

        if let Some(open) = stack.last() {
            return Err(DocumentError::Malformed(format!(
                "unclosed element <{}>",
                open.name
            )));
        }

        let root = root.ok_or_else(|| {
            DocumentError::Malformed("document has no root element".to_string())
        })?;

        Ok(Self {
            prolog,
            root,
            epilog,
        })
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// Look up the element addressed by `handle`.
    pub fn element(&self, handle: &ElementHandle) -> Option<&Element> {
        let mut current = &self.root;
        for &idx in handle.indices() {
            match current.children.get(idx) {
                Some(Node::Element(el)) => current = el,
                _ => return None,
            }
        }
        Some(current)
    }

    /// Mutable lookup of the element addressed by `handle`.
    pub fn element_mut(&mut self, handle: &ElementHandle) -> Option<&mut Element> {
        let mut current = &mut self.root;
        for &idx in handle.indices() {
            match current.children.get_mut(idx) {
                Some(Node::Element(el)) => current = el,
                _ => return None,
            }
        }
        Some(current)
    }

    /// Handles of the element children of `handle`, in order.
    pub fn child_handles(&self, handle: &ElementHandle) -> Vec<ElementHandle> {
        self.element(handle)
            .map(|el| el.child_elements().map(|(idx, _)| handle.child(idx)).collect())
            .unwrap_or_default()
    }

    /// Handles of every element below `handle`, excluding itself, in document order.
    pub fn descendant_handles(&self, handle: &ElementHandle) -> Vec<ElementHandle> {
        let mut out = Vec::new();
        if let Some(el) = self.element(handle) {
            collect_descendants(el, handle, &mut out);
        }
        out
    }

    /// Every element of the document, root first, in document order.
    pub fn elements(&self) -> Vec<(ElementHandle, &Element)> {
        let mut handles = vec![ElementHandle::root()];
        handles.extend(self.descendant_handles(&ElementHandle::root()));
        handles
            .into_iter()
            .filter_map(|h| self.element(&h).map(|el| (h, el)))
            .collect()
    }

    /// Serialize the document with a UTF-8 XML declaration.
    pub fn to_xml_string(&self) -> Result<String, DocumentError> {
        let mut writer = Writer::new(Vec::new());
        write_event(
            &mut writer,
            Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
        )?;
        write_event(&mut writer, Event::Text(BytesText::from_escaped("\n")))?;

        for node in &self.prolog {
            write_node(&mut writer, node)?;
            write_event(&mut writer, Event::Text(BytesText::from_escaped("\n")))?;
        }
        write_element(&mut writer, &self.root)?;
        for node in &self.epilog {
            write_event(&mut writer, Event::Text(BytesText::from_escaped("\n")))?;
            write_node(&mut writer, node)?;
        }

        String::from_utf8(writer.into_inner())
            .map_err(|e| DocumentError::Serialize(e.to_string()))
    }
}

/// The immutable reference document every variant is cloned from.
#[derive(Debug, Clone)]
pub struct Template {
    source: Option<PathBuf>,
    document: Document,
}

impl Template {
    /// Read and parse a template file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let document = Document::parse(&content)?;
        debug!(
            "Loaded template '{}' with root <{}>",
            path.display(),
            document.root().name
        );
        Ok(Self {
            source: Some(path.to_path_buf()),
            document,
        })
    }

    /// Parse a template from an in-memory string.
    pub fn from_xml(xml: &str) -> Result<Self, DocumentError> {
        Ok(Self {
            source: None,
            document: Document::parse(xml)?,
        })
    }

    /// Path the template was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// File stem used to name variant outputs (`template` when unknown).
    pub fn stem(&self) -> String {
        self.source
            .as_deref()
            .and_then(Path::file_stem)
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "template".to_string())
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Independent deep copy for one generation attempt.
    pub fn clone_for_attempt(&self) -> Document {
        self.document.clone()
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element, DocumentError> {
    let mut element = Element::new(utf8(start.name().as_ref())?);
    for attr in start.attributes() {
        let attr = attr.map_err(|e| DocumentError::Parse(e.to_string()))?;
        let key = utf8(attr.key.as_ref())?;
        let value = attr
            .unescape_value()
            .map_err(|e| DocumentError::Parse(e.to_string()))?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), DocumentError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(element));
    } else if root.is_some() {
        return Err(DocumentError::Malformed(
            "multiple root elements".to_string(),
        ));
    } else {
        *root = Some(element);
    }
    Ok(())
}

fn utf8(bytes: &[u8]) -> Result<String, DocumentError> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| DocumentError::Parse(e.to_string()))
}

fn collect_descendants(element: &Element, handle: &ElementHandle, out: &mut Vec<ElementHandle>) {
    for (idx, child) in element.child_elements() {
        let child_handle = handle.child(idx);
        out.push(child_handle.clone());
        collect_descendants(child, &child_handle, out);
    }
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), DocumentError> {
    writer
        .write_event(event)
        .map_err(|e| DocumentError::Serialize(e.to_string()))
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &Node) -> Result<(), DocumentError> {
    match node {
        Node::Element(el) => write_element(writer, el),
        Node::Text(text) => write_event(
            writer,
            Event::Text(BytesText::from_escaped(partial_escape(text.as_str()))),
        ),
        Node::CData(text) => write_event(writer, Event::CData(BytesCData::new(text.as_str()))),
        Node::Comment(text) => {
            write_event(writer, Event::Comment(BytesText::from_escaped(text.as_str())))
        }
        Node::DocType(text) => {
            write_event(writer, Event::DocType(BytesText::from_escaped(text.as_str())))
        }
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<(), DocumentError> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        return write_event(writer, Event::Empty(start));
    }

    write_event(writer, Event::Start(start))?;
    for child in &element.children {
        write_node(writer, child)?;
    }
    write_event(writer, Event::End(BytesEnd::new(element.name.as_str())))
}

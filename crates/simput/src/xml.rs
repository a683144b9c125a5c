// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Pre-parsed text tree consumed by schema nodes.
//!
//! Schema nodes never tokenize raw text; they walk an [`XmlNode`] built by
//! [`XmlNode::parse_str`], which delegates tokenizing to `roxmltree`.

use crate::error::Result;
use roxmltree::Document;

/// Pseudo-name under which inline text is stored in [`XmlNode::fields`].
pub const TEXT: &str = "_text";

/// Child entry of a tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlField {
    Text(String),
    Node(XmlNode),
}

/// One tag of the text tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlNode {
    pub name: String,
    pub attribs: Vec<(String, String)>,
    pub fields: Vec<(String, XmlField)>,
}

impl XmlNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add an attribute (builder style).
    pub fn with_attrib(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attribs.push((name.into(), value.into()));
        self
    }

    /// Add an inline text child (builder style).
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.fields
            .push((TEXT.to_string(), XmlField::Text(text.into())));
        self
    }

    /// Add a child tag (builder style). The entry is keyed by the child's name.
    pub fn with_child(mut self, child: XmlNode) -> Self {
        self.fields.push((child.name.clone(), XmlField::Node(child)));
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attribs
            .iter()
            .find(|(a, _)| a == name)
            .map(|(_, v)| v.as_str())
    }

    /// Concatenated inline text, trimmed.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for (_, field) in &self.fields {
            if let XmlField::Text(t) = field {
                out.push_str(t);
            }
        }
        out.trim().to_string()
    }

    /// Child tags, skipping inline text.
    pub fn children(&self) -> impl Iterator<Item = (&str, &XmlNode)> {
        self.fields.iter().filter_map(|(name, field)| match field {
            XmlField::Node(n) => Some((name.as_str(), n)),
            XmlField::Text(_) => None,
        })
    }

    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children().find(|(n, _)| *n == name).map(|(_, n)| n)
    }

    /// Parse a document and return its root element as a tree.
    pub fn parse_str(content: &str) -> Result<Self> {
        let doc = Document::parse(content)?;
        Ok(Self::from_roxml(doc.root_element()))
    }

    fn from_roxml(node: roxmltree::Node<'_, '_>) -> Self {
        let mut out = XmlNode::new(node.tag_name().name());

        for attr in node.attributes() {
            out.attribs
                .push((attr.name().to_string(), attr.value().to_string()));
        }

        for child in node.children() {
            if child.is_element() {
                let sub = Self::from_roxml(child);
                out.fields.push((sub.name.clone(), XmlField::Node(sub)));
            } else if child.is_text() {
                if let Some(t) = child.text() {
                    if !t.trim().is_empty() {
                        out.fields.push((TEXT.to_string(), XmlField::Text(t.to_string())));
                    }
                }
            }
        }

        out
    }
}

/// Escape text for use inside a tag body or a quoted attribute.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_attributes_children_and_text() {
        let xml = r#"<motion mode='minimize'>
  <fixcom> False </fixcom>
  <!-- ignored -->
  <fixatoms shape='(2)'> [ 3, 7 ] </fixatoms>
</motion>"#;

        let root = XmlNode::parse_str(xml).expect("valid document should parse");

        assert_eq!(root.name, "motion");
        assert_eq!(root.attribute("mode"), Some("minimize"));
        let names: Vec<&str> = root.children().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["fixcom", "fixatoms"]);
        assert_eq!(root.child("fixcom").map(XmlNode::text), Some("False".into()));
        assert_eq!(
            root.child("fixatoms").and_then(|n| n.attribute("shape")),
            Some("(2)")
        );
    }

    #[test]
    fn test_whitespace_only_text_is_dropped() {
        let root = XmlNode::parse_str("<a>\n   <b>x</b>\n</a>").expect("parse");
        assert!(root.fields.iter().all(|(n, _)| n != TEXT));
    }

    #[test]
    fn test_malformed_document_is_rejected() {
        assert!(XmlNode::parse_str("<a><b></a>").is_err());
    }

    #[test]
    fn test_escape_round_trips_through_parser() {
        let raw = "a<b & 'c'";
        let doc = format!("<x name='{}'>{}</x>", escape(raw), escape(raw));
        let root = XmlNode::parse_str(&doc).expect("parse");
        assert_eq!(root.attribute("name"), Some(raw));
        assert_eq!(root.text(), raw);
    }
}

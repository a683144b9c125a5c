// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema nodes.
//!
//! A schema node converts between a domain value and its text-tree form:
//!
//! - [`Input::store`] / [`Input::fetch`] move values in and out of the node
//! - [`Node::parse`] / [`Node::write`] move the node to and from a text tree
//! - [`Node::check`] validates that a mandatory node was given a value
//!
//! Three node families exist: scalar leaves ([`InputValue`]), array leaves
//! ([`InputArray`]) and composites (see [`composite`]). Every node carries an
//! [`InputMeta`] recording its help text, unit metadata and whether its
//! current value was supplied explicitly or comes from the default.
//!
//! # Example
//!
//! ```rust
//! use simput::input::{Input, InputValue, Node, NodeSpec};
//!
//! let mut step = InputValue::<f64>::new(
//!     NodeSpec::new().help("Time step.").dimension("time").default(1.0),
//! )?;
//! assert!(!step.is_explicit());
//!
//! step.parse_text("0.5")?;
//! assert!(step.is_explicit());
//! assert_eq!(step.fetch()?, 0.5);
//! # Ok::<(), simput::InputError>(())
//! ```

pub mod array;
pub mod composite;
pub mod value;

pub use array::InputArray;
pub use composite::{Composite, NoExtra};
pub use value::InputValue;

use crate::error::{InputError, Result};
use crate::units::UNDEFINED;
use crate::xml::XmlNode;
use std::fmt;
use std::sync::Arc;

/// Indentation added per nesting level by `write`.
pub const INDENT: &str = "  ";

/// Kind-level defaults shared by every instance of a node kind.
#[derive(Debug, Clone, Copy)]
pub struct KindDefaults {
    pub kind: &'static str,
    pub help: &'static str,
    pub dimension: &'static str,
    pub units: &'static str,
    pub label: &'static str,
}

impl KindDefaults {
    pub const fn new(kind: &'static str, help: &'static str) -> Self {
        Self {
            kind,
            help,
            dimension: UNDEFINED,
            units: "",
            label: "",
        }
    }

    /// Label used as a section anchor in cross-referenced manuals.
    pub const fn with_label(self, label: &'static str) -> Self {
        Self { label, ..self }
    }
}

/// Per-instance metadata of a schema node.
#[derive(Debug, Clone)]
pub struct InputMeta {
    kind: &'static str,
    help: String,
    dimension: String,
    units: String,
    label: String,
    optional: bool,
    explicit: bool,
}

impl InputMeta {
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn dimension(&self) -> &str {
        &self.dimension
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// True if the node was declared with a default.
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// True once a value was supplied by `store` or `parse`.
    pub fn is_explicit(&self) -> bool {
        self.explicit
    }

    /// True if values of this node carry a physical dimension.
    pub fn has_dimension(&self) -> bool {
        self.dimension != UNDEFINED
    }

    pub(crate) fn set_explicit(&mut self, explicit: bool) {
        self.explicit = explicit;
    }

    pub(crate) fn set_units(&mut self, units: &str) {
        self.units = units.to_string();
    }

    /// Fails if the node is mandatory and was never given a value.
    pub fn check(&self) -> Result<()> {
        if self.explicit || self.optional {
            Ok(())
        } else {
            Err(InputError::MissingValue {
                type_name: self.kind,
            })
        }
    }
}

/// Deferred construction of a default value.
///
/// Holds the recipe rather than the value, so each node instance gets a
/// freshly built default and no two configuration trees share one object.
pub struct InputDefault<V> {
    factory: Arc<dyn Fn() -> V + Send + Sync>,
}

impl<V: 'static> InputDefault<V> {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> V + Send + Sync + 'static,
    {
        Self {
            factory: Arc::new(factory),
        }
    }

    /// Default built by calling `factory(args)`.
    pub fn with_args<A>(factory: fn(A) -> V, args: A) -> Self
    where
        A: Clone + Send + Sync + 'static,
    {
        Self::new(move || factory(args.clone()))
    }
}

impl<V> InputDefault<V> {
    /// Build a new default value.
    pub fn materialize(&self) -> V {
        (self.factory)()
    }
}

impl<V> Clone for InputDefault<V> {
    fn clone(&self) -> Self {
        Self {
            factory: Arc::clone(&self.factory),
        }
    }
}

impl<V> fmt::Debug for InputDefault<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("InputDefault(..)")
    }
}

/// Default declared for a node.
#[derive(Debug, Clone)]
pub enum DefaultValue<V> {
    /// No default: the node is mandatory.
    Required,
    Literal(V),
    Deferred(InputDefault<V>),
}

impl<V> DefaultValue<V> {
    pub fn is_optional(&self) -> bool {
        !matches!(self, DefaultValue::Required)
    }

    /// Resolve to a value. Deferred defaults are materialized on every call.
    pub fn resolve(self) -> Option<V> {
        match self {
            DefaultValue::Required => None,
            DefaultValue::Literal(v) => Some(v),
            DefaultValue::Deferred(d) => Some(d.materialize()),
        }
    }
}

/// Construction options of a node: metadata overrides and the default.
#[derive(Debug, Clone)]
pub struct NodeSpec<V> {
    help: Option<String>,
    dimension: Option<String>,
    units: Option<String>,
    default: DefaultValue<V>,
}

#[allow(clippy::new_without_default)]
impl<V> NodeSpec<V> {
    pub fn new() -> Self {
        Self {
            help: None,
            dimension: None,
            units: None,
            default: DefaultValue::Required,
        }
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn dimension(mut self, dimension: impl Into<String>) -> Self {
        self.dimension = Some(dimension.into());
        self
    }

    pub fn units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    /// Literal default; makes the node optional.
    pub fn default(mut self, value: impl Into<V>) -> Self {
        self.default = DefaultValue::Literal(value.into());
        self
    }

    /// Deferred default; makes the node optional.
    pub fn deferred(mut self, default: InputDefault<V>) -> Self {
        self.default = DefaultValue::Deferred(default);
        self
    }

    /// Split into metadata and the resolved default value.
    pub(crate) fn resolve(self, kind: &KindDefaults) -> (InputMeta, Option<V>) {
        let meta = InputMeta {
            kind: kind.kind,
            help: self.help.unwrap_or_else(|| kind.help.to_string()),
            dimension: self
                .dimension
                .unwrap_or_else(|| kind.dimension.to_string()),
            units: self.units.unwrap_or_else(|| kind.units.to_string()),
            label: kind.label.to_string(),
            optional: self.default.is_optional(),
            explicit: false,
        };
        (meta, self.default.resolve())
    }
}

/// Object-safe part of a schema node: text-tree handling and metadata.
pub trait Node {
    fn meta(&self) -> &InputMeta;

    fn meta_mut(&mut self) -> &mut InputMeta;

    /// Populate the node from a tag of the text tree.
    fn parse(&mut self, xml: &XmlNode) -> Result<()>;

    /// Populate the node from an attribute value.
    fn parse_text(&mut self, text: &str) -> Result<()> {
        Err(InputError::conversion(self.meta().kind(), text))
    }

    /// Serialize the node as tag `name`. Returns an empty string when the
    /// node has nothing to write.
    fn write(&self, name: &str, indent: &str) -> Result<String>;

    /// Value of the node as written inline in an attribute.
    fn attribute_text(&self) -> Result<String> {
        Err(InputError::MissingValue {
            type_name: self.meta().kind(),
        })
    }

    fn check(&self) -> Result<()>;

    fn is_explicit(&self) -> bool {
        self.meta().is_explicit()
    }

    fn is_optional(&self) -> bool {
        self.meta().is_optional()
    }

    fn is_composite(&self) -> bool {
        false
    }

    /// Name of the stored data type, for leaves.
    fn type_name(&self) -> Option<&'static str> {
        None
    }

    /// Text form of the default value, for leaves.
    fn default_text(&self) -> Option<String> {
        None
    }

    /// Text form of the enumerated options, if the node has any.
    fn options_text(&self) -> Option<Vec<String>> {
        None
    }

    fn attribs(&self) -> Vec<(&'static str, &dyn Node)> {
        Vec::new()
    }

    fn fields(&self) -> Vec<(&'static str, &dyn Node)> {
        Vec::new()
    }

    /// Fresh instances of each dynamic child template.
    fn templates(&self) -> Result<Vec<(&'static str, Box<dyn Node>)>> {
        Ok(Vec::new())
    }
}

/// Typed part of a schema node: conversion to and from domain values.
pub trait Input: Node {
    type Value;

    fn store(&mut self, value: &Self::Value) -> Result<()>;

    fn fetch(&self) -> Result<Self::Value>;
}

/// Store the constructor default, then report default provenance.
pub(crate) fn apply_default<I: Input>(node: &mut I, default: Option<&I::Value>) -> Result<()> {
    if let Some(value) = default {
        node.store(value)?;
        node.meta_mut().set_explicit(false);
    }
    Ok(())
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Scalar leaf: `<tag units='...'> value </tag>`.

use super::{apply_default, Input, InputMeta, KindDefaults, Node, NodeSpec};
use crate::error::{InputError, Result};
use crate::value::ValueType;
use crate::xml::{escape, XmlField, XmlNode};
use tracing::debug;

const KIND: KindDefaults = KindDefaults::new("InputValue", "Generic input value");

/// Schema node holding one typed value, optionally restricted to a set of
/// options and optionally carrying a physical dimension.
#[derive(Debug, Clone)]
pub struct InputValue<T: ValueType> {
    meta: InputMeta,
    value: Option<T>,
    default: Option<T>,
    valid: Option<Vec<T>>,
}

impl<T: ValueType> InputValue<T> {
    pub fn new(spec: NodeSpec<T>) -> Result<Self> {
        Self::build(spec, None)
    }

    /// Leaf restricted to `options`. The default, if any, must be one of them.
    pub fn with_options(spec: NodeSpec<T>, options: Vec<T>) -> Result<Self> {
        Self::build(spec, Some(options))
    }

    fn build(spec: NodeSpec<T>, valid: Option<Vec<T>>) -> Result<Self> {
        let (meta, default) = spec.resolve(&KIND);
        let mut node = Self {
            meta,
            value: None,
            default: default.clone(),
            valid,
        };
        if let Some(d) = &default {
            node.validate(d)?;
        }
        apply_default(&mut node, default.as_ref())?;
        Ok(node)
    }

    /// Raw stored value, in user units.
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn options(&self) -> Option<&[T]> {
        self.valid.as_deref()
    }

    /// Store a value given in internal units, converting it to the node's
    /// user units first.
    pub fn store_internal(&mut self, value: &T) -> Result<()> {
        let user = if self.meta.has_dimension() {
            value.to_user(self.meta.dimension(), self.meta.units())?
        } else {
            value.clone()
        };
        self.store(&user)
    }

    fn validate(&self, value: &T) -> Result<()> {
        value.check_text()?;
        match &self.valid {
            Some(valid) if !valid.contains(value) => Err(InputError::InvalidOption {
                value: value.write(),
                options: format_options(valid),
            }),
            _ => Ok(()),
        }
    }

    fn set_from_text(&mut self, text: &str) -> Result<()> {
        let value = T::read(text)?;
        self.validate(&value)?;
        self.value = Some(value);
        Ok(())
    }
}

fn format_options<T: ValueType>(valid: &[T]) -> String {
    let quoted: Vec<String> = valid.iter().map(|v| format!("'{}'", v.write())).collect();
    format!("[{}]", quoted.join(", "))
}

impl<T: ValueType> Input for InputValue<T> {
    type Value = T;

    /// Store a value given in user units.
    fn store(&mut self, value: &T) -> Result<()> {
        self.validate(value)?;
        self.meta.set_explicit(true);
        self.value = Some(value.clone());
        Ok(())
    }

    /// Stored value, converted to internal units when the leaf has a dimension.
    fn fetch(&self) -> Result<T> {
        self.check()?;
        let value = self.value.clone().ok_or(InputError::MissingValue {
            type_name: T::TYPE_NAME,
        })?;
        if self.meta.has_dimension() {
            value.to_internal(self.meta.dimension(), self.meta.units())
        } else {
            Ok(value)
        }
    }
}

impl<T: ValueType> Node for InputValue<T> {
    fn meta(&self) -> &InputMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut InputMeta {
        &mut self.meta
    }

    fn parse(&mut self, xml: &XmlNode) -> Result<()> {
        self.meta.set_explicit(true);

        for (name, value) in &xml.attribs {
            if name == "units" {
                self.meta.set_units(value);
            } else {
                return Err(InputError::UnrecognizedAttribute {
                    attribute: name.clone(),
                    node: xml.name.clone(),
                });
            }
        }

        for (name, field) in &xml.fields {
            if let XmlField::Node(_) = field {
                return Err(InputError::UnrecognizedTag {
                    tag: name.clone(),
                    node: xml.name.clone(),
                });
            }
        }

        if self.meta.has_dimension() && self.meta.units().is_empty() {
            debug!(tag = %xml.name, dimension = self.meta.dimension(), "no units given, using atomic units");
        }
        self.set_from_text(&xml.text())
    }

    fn parse_text(&mut self, text: &str) -> Result<()> {
        self.meta.set_explicit(true);
        self.set_from_text(text)
    }

    fn write(&self, name: &str, indent: &str) -> Result<String> {
        let value = self.value.as_ref().ok_or(InputError::MissingValue {
            type_name: T::TYPE_NAME,
        })?;
        if value.is_empty_value() {
            return Ok(String::new());
        }

        let mut out = format!("{indent}<{name}");
        if self.meta.has_dimension() && !self.meta.units().is_empty() {
            out.push_str(&format!(" units='{}'", escape(self.meta.units())));
        }
        out.push_str(&format!(">{}</{name}>\n", escape(&value.write())));
        Ok(out)
    }

    fn attribute_text(&self) -> Result<String> {
        self.check()?;
        self.value
            .as_ref()
            .map(ValueType::write)
            .ok_or(InputError::MissingValue {
                type_name: T::TYPE_NAME,
            })
    }

    fn check(&self) -> Result<()> {
        self.meta.check()?;
        match &self.value {
            Some(v) => self.validate(v),
            None => Ok(()),
        }
    }

    fn type_name(&self) -> Option<&'static str> {
        Some(T::TYPE_NAME)
    }

    fn default_text(&self) -> Option<String> {
        self.default.as_ref().map(ValueType::write)
    }

    fn options_text(&self) -> Option<Vec<String>> {
        self.valid
            .as_ref()
            .map(|valid| valid.iter().map(ValueType::write).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::unit_to_internal;

    fn modes() -> Vec<String> {
        ["sd", "cg", "bfgs"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_is_applied_but_not_explicit() {
        let node = InputValue::<bool>::new(NodeSpec::new().default(true)).expect("build");
        assert!(node.is_optional());
        assert!(!node.is_explicit());
        assert!(node.fetch().expect("defaulted value"));
    }

    #[test]
    fn test_mandatory_leaf_fails_until_set() {
        let mut node = InputValue::<i64>::new(NodeSpec::new()).expect("build");
        assert!(matches!(
            node.fetch(),
            Err(InputError::MissingValue { type_name: "InputValue" })
        ));

        // Zero is a real value, not "unset".
        node.store(&0).expect("store");
        assert!(node.is_explicit());
        assert_eq!(node.fetch().expect("fetch"), 0);
    }

    #[test]
    fn test_round_trip_values() {
        let mut f = InputValue::<f64>::new(NodeSpec::new()).expect("build");
        f.store(&-3.25e-4).expect("store");
        assert_eq!(f.fetch().expect("fetch"), -3.25e-4);

        let mut s = InputValue::<String>::new(NodeSpec::new().default("x")).expect("build");
        s.store(&String::new()).expect("store");
        assert_eq!(s.fetch().expect("fetch"), "");
        assert_eq!(s.write("prefix", "").expect("write"), "");
    }

    #[test]
    fn test_padded_string_is_rejected() {
        let mut node = InputValue::<String>::new(NodeSpec::new().default("out")).expect("build");
        assert!(matches!(
            node.store(&" out ".to_string()),
            Err(InputError::TypeConversion { type_name: "string", ref text }) if text == " out "
        ));
        assert!(!node.is_explicit());
        assert!(InputValue::<String>::new(NodeSpec::new().default("out\n")).is_err());

        node.store(&"traj out".to_string()).expect("inner spaces are kept");
        let xml = XmlNode::parse_str(&node.write("prefix", "").expect("write")).expect("xml");
        node.parse(&xml).expect("parse");
        assert_eq!(node.fetch().expect("fetch"), "traj out");
    }

    #[test]
    fn test_default_outside_options_is_rejected() {
        let err = InputValue::with_options(NodeSpec::new().default("lbfgs"), modes()).unwrap_err();
        assert!(matches!(err, InputError::InvalidOption { value, .. } if value == "lbfgs"));
    }

    #[test]
    fn test_store_and_parse_validate_options() {
        let mut node =
            InputValue::with_options(NodeSpec::new().default("sd"), modes()).expect("build");

        assert!(matches!(
            node.store(&"newton".to_string()),
            Err(InputError::InvalidOption { .. })
        ));
        assert!(!node.is_explicit());

        assert!(node.parse_text("nope").is_err());

        node.parse_text("cg").expect("valid option");
        assert_eq!(node.fetch().expect("fetch"), "cg");
    }

    #[test]
    fn test_unit_conversion_on_fetch() {
        let mut node = InputValue::<f64>::new(
            NodeSpec::new()
                .dimension("length")
                .units("angstrom")
                .default(0.0),
        )
        .expect("build");

        node.store(&1.0).expect("store");
        let expected = unit_to_internal("length", "angstrom", 1.0).expect("known unit");
        assert_eq!(node.fetch().expect("fetch"), expected);

        node.store_internal(&expected).expect("store internal");
        let back = node.value().copied().expect("stored");
        assert!((back - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_parse_reads_units_attribute() {
        let mut node =
            InputValue::<f64>::new(NodeSpec::new().dimension("length")).expect("build");
        let xml = XmlNode::new("step")
            .with_attrib("units", "angstrom")
            .with_text(" 2.0 ");

        node.parse(&xml).expect("parse");
        assert_eq!(node.meta().units(), "angstrom");
        let expected = unit_to_internal("length", "angstrom", 2.0).expect("known unit");
        assert_eq!(node.fetch().expect("fetch"), expected);

        let written = node.write("step", "  ").expect("write");
        assert_eq!(written, "  <step units='angstrom'>2.0</step>\n");
    }

    #[test]
    fn test_parse_rejects_unknown_attribute_and_children() {
        let mut node = InputValue::<i64>::new(NodeSpec::new()).expect("build");

        let bad_attr = XmlNode::new("n").with_attrib("shape", "(1)").with_text("1");
        assert!(matches!(
            node.parse(&bad_attr),
            Err(InputError::UnrecognizedAttribute { attribute, node }) if attribute == "shape" && node == "n"
        ));

        let bad_child = XmlNode::new("n").with_child(XmlNode::new("inner"));
        assert!(matches!(
            node.parse(&bad_child),
            Err(InputError::UnrecognizedTag { tag, .. }) if tag == "inner"
        ));
    }

    #[test]
    fn test_parse_type_conversion_error() {
        let mut node = InputValue::<i64>::new(NodeSpec::new()).expect("build");
        assert!(matches!(
            node.parse_text("3.5"),
            Err(InputError::TypeConversion { type_name: "int", .. })
        ));
    }
}

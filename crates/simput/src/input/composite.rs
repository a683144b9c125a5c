// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Composite nodes: a fixed set of attributes and fields, plus an ordered
//! list of dynamic children instantiated from named templates.
//!
//! Concrete kinds are plain structs holding one child node per declared
//! attribute or field. The [`composite_node!`] macro generates the
//! [`Node`] and [`Composite`] plumbing from a single declaration:
//!
//! ```ignore
//! composite_node! {
//!     InputGeopTolerances {
//!         meta: meta,
//!         attribs: {},
//!         fields: {
//!             "energy" => energy,
//!             "force" => force,
//!             "position" => position,
//!         },
//!     }
//! }
//! ```
//!
//! An optional `adapt: Type::method` entry after `fields` overrides
//! [`Composite::adapt`]. Kinds with dynamic children name the entry type
//! and one template method per tag; the struct then needs an `extra` field:
//!
//! ```ignore
//! composite_node! {
//!     InputMotion {
//!         meta: base.meta,
//!         attribs: { "mode" => base.mode },
//!         fields: { "fixcom" => base.fixcom },
//!         extra: InputMotionBase,
//!         dynamic: { "motion" => InputMotion::motion_template },
//!     }
//! }
//! ```

use super::{InputMeta, Node, INDENT};
use crate::error::{InputError, ItemKind, Result};
use crate::xml::{escape, XmlNode};
use tracing::debug;

/// Structural side of a composite node.
pub trait Composite: Node {
    /// Node type of dynamic children.
    type Extra: Node;

    fn attribs_mut(&mut self) -> Vec<(&'static str, &mut dyn Node)>;

    fn fields_mut(&mut self) -> Vec<(&'static str, &mut dyn Node)>;

    /// Dynamic children in insertion order.
    fn extra(&self) -> &[(String, Self::Extra)] {
        &[]
    }

    /// Storage for dynamic children; `None` for kinds without templates.
    fn extra_mut(&mut self) -> Option<&mut Vec<(String, Self::Extra)>> {
        None
    }

    /// Fresh node for dynamic tag `name`, if a template is registered.
    fn template(&self, _name: &str) -> Result<Option<Self::Extra>> {
        Ok(None)
    }

    /// Hook run after attributes and before fields are parsed.
    fn adapt(&mut self) -> Result<()> {
        Ok(())
    }

    /// Instantiate the template registered under `name`, parse `xml` into
    /// it and append it to the dynamic children.
    fn extend(&mut self, name: &str, xml: &XmlNode) -> Result<()> {
        let kind = self.meta().kind();
        let unknown = || InputError::UnrecognizedTag {
            tag: name.to_string(),
            node: kind.to_string(),
        };

        let mut node = self.template(name)?.ok_or_else(unknown)?;
        node.parse(xml)?;
        self.extra_mut()
            .ok_or_else(unknown)?
            .push((name.to_string(), node));
        Ok(())
    }
}

/// Entry type of composites that take no dynamic children.
#[derive(Debug, Clone)]
pub enum NoExtra {}

impl Node for NoExtra {
    fn meta(&self) -> &InputMeta {
        match *self {}
    }

    fn meta_mut(&mut self) -> &mut InputMeta {
        match *self {}
    }

    fn parse(&mut self, _xml: &XmlNode) -> Result<()> {
        match *self {}
    }

    fn write(&self, _name: &str, _indent: &str) -> Result<String> {
        match *self {}
    }

    fn check(&self) -> Result<()> {
        match *self {}
    }
}

fn lookup<'a, 'n>(
    items: &'a mut [(&'static str, &'n mut dyn Node)],
    name: &str,
) -> Option<&'a mut (dyn Node + 'n)> {
    items
        .iter_mut()
        .find(|(n, _)| *n == name)
        .map(|(_, node)| &mut **node)
}

fn missing_item(items: &[(&'static str, &dyn Node)]) -> Option<&'static str> {
    items
        .iter()
        .find(|(_, n)| !(n.is_explicit() || n.is_optional()))
        .map(|(name, _)| *name)
}

fn check_items<C: Composite>(node: &C, owner: &str) -> Result<()> {
    if let Some(name) = missing_item(&node.attribs()) {
        return Err(InputError::MissingField {
            kind: ItemKind::Attribute,
            name: name.to_string(),
            node: owner.to_string(),
        });
    }
    if let Some(name) = missing_item(&node.fields()) {
        return Err(InputError::MissingField {
            kind: ItemKind::Field,
            name: name.to_string(),
            node: owner.to_string(),
        });
    }
    Ok(())
}

/// Populate a composite from `xml`.
///
/// Attributes are parsed first, then [`Composite::adapt`] runs, then child
/// tags are routed to declared fields or dynamic templates. Mandatory items
/// that are still unset afterwards fail with `MissingField`, attributes
/// before fields.
pub fn parse_composite<C: Composite>(node: &mut C, xml: &XmlNode) -> Result<()> {
    debug!(tag = %xml.name, kind = node.meta().kind(), "parsing composite");

    if let Some(extra) = node.extra_mut() {
        extra.clear();
    }
    node.meta_mut().set_explicit(true);

    for (name, value) in &xml.attribs {
        let mut attribs = node.attribs_mut();
        let attr = lookup(&mut attribs, name).ok_or_else(|| InputError::UnrecognizedAttribute {
            attribute: name.clone(),
            node: xml.name.clone(),
        })?;
        attr.parse_text(value)?;
    }

    node.adapt()?;

    for (name, child) in xml.children() {
        let declared = {
            let mut fields = node.fields_mut();
            match lookup(&mut fields, name) {
                Some(field) => {
                    field.parse(child)?;
                    true
                }
                None => false,
            }
        };
        if declared {
            continue;
        }

        let unknown = || InputError::UnrecognizedTag {
            tag: name.to_string(),
            node: xml.name.clone(),
        };
        let mut extra = node.template(name)?.ok_or_else(unknown)?;
        extra.parse(child)?;
        node.extra_mut()
            .ok_or_else(unknown)?
            .push((name.to_string(), extra));
    }

    check_items(node, &xml.name)
}

/// Serialize a composite: attributes inline, then fields, then dynamic
/// children, one nesting level deeper.
pub fn write_composite<C: Composite>(node: &C, name: &str, indent: &str) -> Result<String> {
    let mut out = format!("{indent}<{name}");
    for (attr, value) in node.attribs() {
        out.push_str(&format!(" {attr}='{}'", escape(&value.attribute_text()?)));
    }
    out.push_str(">\n");

    let inner = format!("{indent}{INDENT}");
    for (field, value) in node.fields() {
        // Untouched composite fields re-parse to their defaults anyway.
        if value.is_composite() && !value.is_explicit() {
            continue;
        }
        out.push_str(&value.write(field, &inner)?);
    }
    for (tag, value) in node.extra() {
        out.push_str(&value.write(tag, &inner)?);
    }

    out.push_str(&format!("{indent}</{name}>\n"));
    Ok(out)
}

/// Mandatory-item check of a composite.
pub fn check_composite<C: Composite>(node: &C) -> Result<()> {
    node.meta().check()?;
    check_items(node, node.meta().kind())
}

/// Dynamic tags that share a name with a declared attribute or field.
/// Children are routed to fields first, so such templates are unreachable.
#[cfg(test)]
pub(crate) fn shadowed_templates(node: &dyn Node) -> Result<Vec<&'static str>> {
    let declared: Vec<&str> = node
        .attribs()
        .into_iter()
        .chain(node.fields())
        .map(|(name, _)| name)
        .collect();
    Ok(node
        .templates()?
        .into_iter()
        .map(|(name, _)| name)
        .filter(|name| declared.contains(name))
        .collect())
}

/// Declare the [`Node`] and [`Composite`] impls of a composite kind.
macro_rules! composite_node {
    (@node $ty:ident, [$($mp:ident).+],
        [$($an:literal => $($ap:ident).+),*], [$($fname:literal => $($fp:ident).+),*],
        [$($tn:literal => $tf:path),*]) => {
        impl $crate::input::Node for $ty {
            fn meta(&self) -> &$crate::input::InputMeta {
                &self $(.$mp)+
            }

            fn meta_mut(&mut self) -> &mut $crate::input::InputMeta {
                &mut self $(.$mp)+
            }

            fn parse(&mut self, xml: &$crate::xml::XmlNode) -> $crate::error::Result<()> {
                $crate::input::composite::parse_composite(self, xml)
            }

            fn write(&self, name: &str, indent: &str) -> $crate::error::Result<String> {
                $crate::input::composite::write_composite(self, name, indent)
            }

            fn check(&self) -> $crate::error::Result<()> {
                $crate::input::composite::check_composite(self)
            }

            fn is_composite(&self) -> bool {
                true
            }

            fn attribs(&self) -> Vec<(&'static str, &dyn $crate::input::Node)> {
                vec![$(($an, &self $(.$ap)+ as &dyn $crate::input::Node)),*]
            }

            fn fields(&self) -> Vec<(&'static str, &dyn $crate::input::Node)> {
                vec![$(($fname, &self $(.$fp)+ as &dyn $crate::input::Node)),*]
            }

            fn templates(
                &self,
            ) -> $crate::error::Result<Vec<(&'static str, Box<dyn $crate::input::Node>)>> {
                Ok(vec![$(($tn, Box::new($tf(self)?) as Box<dyn $crate::input::Node>)),*])
            }
        }
    };

    (@mut [$($an:literal => $($ap:ident).+),*], [$($fname:literal => $($fp:ident).+),*]) => {
        fn attribs_mut(&mut self) -> Vec<(&'static str, &mut dyn $crate::input::Node)> {
            vec![$(($an, &mut self $(.$ap)+ as &mut dyn $crate::input::Node)),*]
        }

        fn fields_mut(&mut self) -> Vec<(&'static str, &mut dyn $crate::input::Node)> {
            vec![$(($fname, &mut self $(.$fp)+ as &mut dyn $crate::input::Node)),*]
        }
    };

    (
        $ty:ident {
            meta: $($mp:ident).+,
            attribs: { $($an:literal => $($ap:ident).+),* $(,)? },
            fields: { $($fname:literal => $($fp:ident).+),* $(,)? }
            $(, adapt: $af:path)? $(,)?
        }
    ) => {
        $crate::input::composite::composite_node!(@node $ty, [$($mp).+],
            [$($an => $($ap).+),*], [$($fname => $($fp).+),*], []);

        impl $crate::input::composite::Composite for $ty {
            type Extra = $crate::input::composite::NoExtra;

            $crate::input::composite::composite_node!(@mut
                [$($an => $($ap).+),*], [$($fname => $($fp).+),*]);

            $(
                fn adapt(&mut self) -> $crate::error::Result<()> {
                    $af(self)
                }
            )?
        }
    };

    (
        $ty:ident {
            meta: $($mp:ident).+,
            attribs: { $($an:literal => $($ap:ident).+),* $(,)? },
            fields: { $($fname:literal => $($fp:ident).+),* $(,)? },
            $(adapt: $af:path,)?
            extra: $ety:ty,
            dynamic: { $($tn:literal => $tf:path),* $(,)? } $(,)?
        }
    ) => {
        $crate::input::composite::composite_node!(@node $ty, [$($mp).+],
            [$($an => $($ap).+),*], [$($fname => $($fp).+),*], [$($tn => $tf),*]);

        impl $crate::input::composite::Composite for $ty {
            type Extra = $ety;

            $crate::input::composite::composite_node!(@mut
                [$($an => $($ap).+),*], [$($fname => $($fp).+),*]);

            $(
                fn adapt(&mut self) -> $crate::error::Result<()> {
                    $af(self)
                }
            )?

            fn extra(&self) -> &[(String, $ety)] {
                &self.extra
            }

            fn extra_mut(&mut self) -> Option<&mut Vec<(String, $ety)>> {
                Some(&mut self.extra)
            }

            fn template(&self, name: &str) -> $crate::error::Result<Option<$ety>> {
                match name {
                    $($tn => Ok(Some($tf(self)?)),)*
                    _ => Ok(None),
                }
            }
        }
    };
}

pub(crate) use composite_node;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Input, InputValue, KindDefaults, NodeSpec};

    #[derive(Debug)]
    struct Inner {
        meta: InputMeta,
        depth: InputValue<i64>,
    }

    impl Inner {
        fn new() -> Result<Self> {
            let (meta, _) = NodeSpec::<()>::new()
                .default(())
                .resolve(&KindDefaults::new("Inner", "inner block"));
            Ok(Self {
                meta,
                depth: InputValue::new(NodeSpec::new().default(2))?,
            })
        }
    }

    composite_node! {
        Inner {
            meta: meta,
            attribs: {},
            fields: { "depth" => depth },
        }
    }

    #[derive(Debug)]
    struct Gauge {
        meta: InputMeta,
        label: InputValue<String>,
        count: InputValue<i64>,
        weight: InputValue<i64>,
        inner: Inner,
        extra: Vec<(String, InputValue<f64>)>,
        // (label explicit, weight explicit) as seen by the last adapt.
        adapted: Option<(bool, bool)>,
    }

    impl Gauge {
        fn new() -> Result<Self> {
            let (meta, _) = NodeSpec::<()>::new()
                .resolve(&KindDefaults::new("Gauge", "test composite"));
            Ok(Self {
                meta,
                label: InputValue::new(NodeSpec::new())?,
                count: InputValue::new(NodeSpec::new().default(1))?,
                weight: InputValue::new(NodeSpec::new())?,
                inner: Inner::new()?,
                extra: Vec::new(),
                adapted: None,
            })
        }

        fn record_adapt(&mut self) -> Result<()> {
            self.adapted = Some((self.label.is_explicit(), self.weight.is_explicit()));
            Ok(())
        }

        fn sample(&self) -> Result<InputValue<f64>> {
            InputValue::new(NodeSpec::new().default(0.0))
        }
    }

    composite_node! {
        Gauge {
            meta: meta,
            attribs: { "label" => label },
            fields: {
                "count" => count,
                "weight" => weight,
                "inner" => inner,
            },
            adapt: Gauge::record_adapt,
            extra: InputValue<f64>,
            dynamic: { "sample" => Gauge::sample },
        }
    }

    fn gauge_xml() -> XmlNode {
        XmlNode::parse_str(
            "<gauge label='a'><sample>1.5</sample><count>4</count>\
             <weight>5</weight><sample>2.5</sample></gauge>",
        )
        .expect("parse")
    }

    #[test]
    fn test_parse_routes_fields_and_dynamic_children() {
        let mut gauge = Gauge::new().expect("build");
        gauge.parse(&gauge_xml()).expect("parse");

        assert!(gauge.is_explicit());
        assert_eq!(gauge.label.fetch().expect("label"), "a");
        assert_eq!(gauge.count.fetch().expect("count"), 4);
        let samples: Vec<f64> = gauge
            .extra()
            .iter()
            .map(|(_, n)| n.fetch().expect("sample"))
            .collect();
        assert_eq!(samples, vec![1.5, 2.5]);
    }

    #[test]
    fn test_parse_resets_extra() {
        let mut gauge = Gauge::new().expect("build");
        gauge.parse(&gauge_xml()).expect("parse");
        gauge
            .parse(&XmlNode::new("gauge").with_attrib("label", "b"))
            .expect("parse");
        assert!(gauge.extra().is_empty());
    }

    #[test]
    fn test_unknown_tag_names_tag_and_parent() {
        let mut gauge = Gauge::new().expect("build");
        let xml = XmlNode::new("gauge")
            .with_attrib("label", "a")
            .with_child(XmlNode::new("bogus"));
        assert!(matches!(
            gauge.parse(&xml),
            Err(InputError::UnrecognizedTag { tag, node }) if tag == "bogus" && node == "gauge"
        ));
    }

    #[test]
    fn test_unknown_attribute() {
        let mut gauge = Gauge::new().expect("build");
        let xml = XmlNode::new("gauge").with_attrib("colour", "red");
        assert!(matches!(
            gauge.parse(&xml),
            Err(InputError::UnrecognizedAttribute { attribute, .. }) if attribute == "colour"
        ));
    }

    #[test]
    fn test_missing_mandatory_attribute() {
        let mut gauge = Gauge::new().expect("build");
        // Both label and weight are missing: attributes are reported first.
        let xml = XmlNode::new("gauge").with_child(XmlNode::new("count").with_text("3"));
        assert!(matches!(
            gauge.parse(&xml),
            Err(InputError::MissingField { kind: ItemKind::Attribute, name, .. }) if name == "label"
        ));
    }

    #[test]
    fn test_missing_mandatory_field() {
        let mut gauge = Gauge::new().expect("build");
        let xml = XmlNode::new("gauge")
            .with_attrib("label", "a")
            .with_child(XmlNode::new("count").with_text("3"));
        assert!(matches!(
            gauge.parse(&xml),
            Err(InputError::MissingField { kind: ItemKind::Field, ref name, ref node })
                if name == "weight" && node == "gauge"
        ));
        assert!(matches!(
            gauge.check(),
            Err(InputError::MissingField { kind: ItemKind::Field, ref node, .. }) if node == "Gauge"
        ));

        let xml = xml.with_child(XmlNode::new("weight").with_text("0"));
        gauge.parse(&xml).expect("zero is a value");
        assert!(gauge.weight.is_explicit());
        assert_eq!(gauge.weight.fetch().expect("weight"), 0);
        gauge.check().expect("complete");
    }

    #[test]
    fn test_adapt_runs_between_attributes_and_fields() {
        let mut gauge = Gauge::new().expect("build");
        assert_eq!(gauge.adapted, None);
        gauge.parse(&gauge_xml()).expect("parse");
        assert_eq!(gauge.adapted, Some((true, false)));
        assert!(gauge.weight.is_explicit());
    }

    #[test]
    fn test_extend_appends_in_order() {
        let mut gauge = Gauge::new().expect("build");
        gauge
            .extend("sample", &XmlNode::new("sample").with_text("3.0"))
            .expect("extend");
        gauge
            .extend("sample", &XmlNode::new("sample").with_text("4.0"))
            .expect("extend");
        assert_eq!(gauge.extra().len(), 2);
        assert_eq!(gauge.extra()[1].1.fetch().expect("sample"), 4.0);

        assert!(matches!(
            gauge.extend("count", &XmlNode::new("count")),
            Err(InputError::UnrecognizedTag { .. })
        ));
    }

    #[test]
    fn test_write_skips_untouched_composite_fields() {
        let mut gauge = Gauge::new().expect("build");
        gauge.label.store(&"a".to_string()).expect("store");
        gauge.weight.store(&0).expect("store");

        let text = gauge.write("gauge", "").expect("write");
        assert_eq!(
            text,
            "<gauge label='a'>\n  <count>1</count>\n  <weight>0</weight>\n</gauge>\n"
        );

        gauge.parse(&gauge_xml()).expect("parse");
        gauge.inner.meta_mut().set_explicit(true);
        let text = gauge.write("gauge", "").expect("write");
        let expected = "<gauge label='a'>\n  <count>4</count>\n  <weight>5</weight>\n  <inner>\n    <depth>2</depth>\n  </inner>\n  <sample>1.5</sample>\n  <sample>2.5</sample>\n</gauge>\n";
        assert_eq!(text, expected);

        let mut back = Gauge::new().expect("build");
        back.parse(&XmlNode::parse_str(&text).expect("reparse"))
            .expect("parse");
        assert_eq!(back.write("gauge", "").expect("write"), expected);
    }

    #[test]
    fn test_templates_are_fresh() {
        let gauge = Gauge::new().expect("build");
        let templates = gauge.templates().expect("templates");
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].0, "sample");
        assert!(!templates[0].1.is_explicit());
        assert!(Inner::new().expect("build").templates().expect("none").is_empty());
    }

    #[test]
    fn test_dynamic_tags_do_not_shadow_fields() {
        let gauge = Gauge::new().expect("build");
        assert!(shadowed_templates(&gauge).expect("templates").is_empty());
        assert!(shadowed_templates(&Inner::new().expect("build"))
            .expect("templates")
            .is_empty());
    }
}

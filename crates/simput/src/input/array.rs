// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Array leaf: `<tag shape='(2, 3)' units='...'> [ a, b, ... ] </tag>`.

use super::{apply_default, Input, InputMeta, InputValue, KindDefaults, Node, NodeSpec, INDENT};
use crate::error::{InputError, Result};
use crate::value::{read_list, ArrayValue, ValueType};
use crate::xml::{escape, XmlField, XmlNode};
use tracing::debug;

const KIND: KindDefaults = KindDefaults::new("InputArray", "A generic input value");

/// Elements written per line in array bodies.
pub const ELPERLINE: usize = 5;

/// Schema node holding a flattened array of `T` and its shape.
///
/// A shape of `(0,)` means "nothing stored". Storing an array always
/// records its true shape; parsing infers the shape from the element count
/// unless the source carries an explicit `shape` attribute.
#[derive(Debug, Clone)]
pub struct InputArray<T: ValueType> {
    meta: InputMeta,
    value: Vec<T>,
    shape: InputValue<Vec<usize>>,
    default: Option<ArrayValue<T>>,
}

impl<T: ValueType> InputArray<T> {
    pub fn new(spec: NodeSpec<ArrayValue<T>>) -> Result<Self> {
        let (meta, default) = spec.resolve(&KIND);
        let shape = InputValue::new(
            NodeSpec::new()
                .help("The shape of the array.")
                .default(vec![0usize]),
        )?;
        let mut node = Self {
            meta,
            value: Vec::new(),
            shape,
            default: default.clone(),
        };
        apply_default(&mut node, default.as_ref())?;
        Ok(node)
    }

    /// Stored shape, `(0,)` if nothing was stored.
    pub fn shape(&self) -> Result<Vec<usize>> {
        self.shape.fetch()
    }

    /// Raw flattened elements, in user units.
    pub fn values(&self) -> &[T] {
        &self.value
    }

    /// Store an array given in internal units.
    pub fn store_internal(&mut self, value: &ArrayValue<T>) -> Result<()> {
        let user = if self.meta.has_dimension() {
            let (dim, units) = (self.meta.dimension(), self.meta.units());
            value.try_map(|v| v.to_user(dim, units))?
        } else {
            value.clone()
        };
        self.store(&user)
    }

    fn body(&self, indent: &str) -> String {
        let wrap = self.value.len() > ELPERLINE;
        let mut out = String::from(if wrap { "\n" } else { " " });
        if wrap {
            out.push_str(indent);
            out.push_str(INDENT);
        }
        out.push_str("[ ");
        for (i, v) in self.value.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
                if wrap && i % ELPERLINE == 0 {
                    out.push('\n');
                    out.push_str(indent);
                    out.push_str(INDENT);
                    out.push_str("  ");
                }
            }
            out.push_str(&escape(&v.write()));
        }
        out.push_str(" ]");
        if wrap {
            out.push('\n');
            out.push_str(indent);
        } else {
            out.push(' ');
        }
        out
    }
}

impl<T: ValueType> Input for InputArray<T> {
    type Value = ArrayValue<T>;

    fn store(&mut self, value: &ArrayValue<T>) -> Result<()> {
        for item in value.as_slice() {
            item.check_item()?;
        }
        self.meta.set_explicit(true);
        self.value = value.as_slice().to_vec();
        self.shape.store(&value.shape().to_vec())
    }

    fn fetch(&self) -> Result<ArrayValue<T>> {
        self.check()?;
        let shape = self.shape.fetch()?;
        let array = if shape == [0] {
            ArrayValue::empty()
        } else {
            ArrayValue::from_shape_vec(shape, self.value.clone())?
        };
        if self.meta.has_dimension() {
            let (dim, units) = (self.meta.dimension(), self.meta.units());
            array.try_map(|v| v.to_internal(dim, units))
        } else {
            Ok(array)
        }
    }
}

impl<T: ValueType> Node for InputArray<T> {
    fn meta(&self) -> &InputMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut InputMeta {
        &mut self.meta
    }

    fn parse(&mut self, xml: &XmlNode) -> Result<()> {
        self.meta.set_explicit(true);

        for (name, field) in &xml.fields {
            if let XmlField::Node(_) = field {
                return Err(InputError::UnrecognizedTag {
                    tag: name.clone(),
                    node: xml.name.clone(),
                });
            }
        }

        let values: Vec<T> = read_list(&xml.text())?;
        let mut shape = None;
        for (name, text) in &xml.attribs {
            match name.as_str() {
                "units" => self.meta.set_units(text),
                "shape" => shape = Some(Vec::<usize>::read(text)?),
                _ => {
                    return Err(InputError::UnrecognizedAttribute {
                        attribute: name.clone(),
                        node: xml.name.clone(),
                    })
                }
            }
        }

        if self.meta.has_dimension() && self.meta.units().is_empty() {
            debug!(tag = %xml.name, dimension = self.meta.dimension(), "no units given, using atomic units");
        }

        let shape = shape.unwrap_or_else(|| vec![values.len()]);
        if shape.iter().product::<usize>() != values.len() {
            return Err(InputError::MalformedArrayShape {
                shape,
                len: values.len(),
            });
        }

        self.value = values;
        self.shape.store(&shape)
    }

    fn parse_text(&mut self, text: &str) -> Result<()> {
        self.meta.set_explicit(true);
        self.value = read_list(text)?;
        self.shape.store(&vec![self.value.len()])
    }

    fn write(&self, name: &str, indent: &str) -> Result<String> {
        if self.value.is_empty() {
            return Ok(String::new());
        }

        let shape = self.shape.fetch()?;
        let mut out = format!("{indent}<{name} shape='{}'", shape.write());
        if self.meta.has_dimension() && !self.meta.units().is_empty() {
            out.push_str(&format!(" units='{}'", escape(self.meta.units())));
        }
        out.push('>');
        out.push_str(&self.body(indent));
        out.push_str(&format!("</{name}>\n"));
        Ok(out)
    }

    fn attribute_text(&self) -> Result<String> {
        self.check()?;
        let items: Vec<String> = self.value.iter().map(ValueType::write).collect();
        Ok(format!("[ {} ]", items.join(", ")))
    }

    fn check(&self) -> Result<()> {
        self.meta.check()
    }

    fn type_name(&self) -> Option<&'static str> {
        Some(T::TYPE_NAME)
    }

    fn default_text(&self) -> Option<String> {
        self.default.as_ref().map(|d| {
            let items: Vec<String> = d.as_slice().iter().map(ValueType::write).collect();
            format!("[ {} ]", items.join(", "))
        })
    }

    fn attribs(&self) -> Vec<(&'static str, &dyn Node)> {
        vec![("shape", &self.shape as &dyn Node)]
    }
}

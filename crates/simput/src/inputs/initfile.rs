// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `<file mode='xyz' units='angstrom'>in.xyz</file>`

use crate::engine::InitFile;
use crate::error::{InputError, Result};
use crate::input::{apply_default, Input, InputMeta, InputValue, KindDefaults, Node, NodeSpec};
use crate::xml::{escape, XmlNode};

const KIND: KindDefaults =
    KindDefaults::new("InputInitFile", "This is the class to initialize from file.");

/// Leaf naming a file, with its format and units as attributes.
#[derive(Debug, Clone)]
pub struct InputInitFile {
    meta: InputMeta,
    mode: InputValue<String>,
    units: InputValue<String>,
    filename: String,
}

impl InputInitFile {
    pub fn new(spec: NodeSpec<InitFile>) -> Result<Self> {
        let (meta, default) = spec.resolve(&KIND);
        let mode = InputValue::with_options(
            NodeSpec::new()
                .help("The input data format. 'xyz' and 'pdb' stand for xyz and pdb input files respectively. 'chk' stands for initialization from a checkpoint file.")
                .default("xyz"),
            ["xyz", "pdb", "chk"].map(String::from).to_vec(),
        )?;
        let units = InputValue::new(
            NodeSpec::new()
                .help("The units in which the positions in the file are given.")
                .default(""),
        )?;

        let mut node = Self {
            meta,
            mode,
            units,
            filename: String::new(),
        };
        apply_default(&mut node, default.as_ref())?;
        Ok(node)
    }
}

impl Input for InputInitFile {
    type Value = InitFile;

    fn store(&mut self, value: &InitFile) -> Result<()> {
        self.mode.store(&value.mode)?;
        self.units.store(&value.units)?;
        self.filename = value.filename.clone();
        self.meta.set_explicit(true);
        Ok(())
    }

    fn fetch(&self) -> Result<InitFile> {
        self.check()?;
        Ok(InitFile {
            mode: self.mode.fetch()?,
            units: self.units.fetch()?,
            filename: self.filename.clone(),
        })
    }
}

impl Node for InputInitFile {
    fn meta(&self) -> &InputMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut InputMeta {
        &mut self.meta
    }

    fn parse(&mut self, xml: &XmlNode) -> Result<()> {
        self.meta.set_explicit(true);

        for (name, value) in &xml.attribs {
            match name.as_str() {
                "mode" => self.mode.parse_text(value)?,
                "units" => self.units.parse_text(value)?,
                _ => {
                    return Err(InputError::UnrecognizedAttribute {
                        attribute: name.clone(),
                        node: xml.name.clone(),
                    })
                }
            }
        }
        if let Some((tag, _)) = xml.children().next() {
            return Err(InputError::UnrecognizedTag {
                tag: tag.to_string(),
                node: xml.name.clone(),
            });
        }

        self.filename = xml.text();
        Ok(())
    }

    fn parse_text(&mut self, text: &str) -> Result<()> {
        self.meta.set_explicit(true);
        self.filename = text.trim().to_string();
        Ok(())
    }

    fn write(&self, name: &str, indent: &str) -> Result<String> {
        if self.filename.is_empty() {
            return Ok(String::new());
        }

        let mut out = format!("{indent}<{name} mode='{}'", escape(&self.mode.attribute_text()?));
        let units = self.units.attribute_text()?;
        if !units.is_empty() {
            out.push_str(&format!(" units='{}'", escape(&units)));
        }
        out.push_str(&format!(">{}</{name}>\n", escape(&self.filename)));
        Ok(out)
    }

    fn attribute_text(&self) -> Result<String> {
        self.check()?;
        Ok(self.filename.clone())
    }

    fn check(&self) -> Result<()> {
        self.meta.check()
    }

    fn type_name(&self) -> Option<&'static str> {
        Some("string")
    }

    fn attribs(&self) -> Vec<(&'static str, &dyn Node)> {
        vec![
            ("mode", &self.mode as &dyn Node),
            ("units", &self.units as &dyn Node),
        ]
    }
}

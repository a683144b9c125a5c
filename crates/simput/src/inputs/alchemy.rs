// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Alchemical exchange input.

use crate::engine::AlchemyOptions;
use crate::error::Result;
use crate::input::composite::composite_node;
use crate::input::{
    apply_default, Input, InputArray, InputMeta, InputValue, KindDefaults, Node, NodeSpec,
};

const KIND: KindDefaults = KindDefaults::new(
    "InputAlchemy",
    "Monte Carlo exchanges of isotopes between atoms of the same element",
);

#[derive(Debug, Clone)]
pub struct InputAlchemy {
    meta: InputMeta,
    names: InputArray<String>,
    nxi: InputValue<f64>,
    ealc: InputValue<f64>,
}

impl InputAlchemy {
    pub fn new(spec: NodeSpec<AlchemyOptions>) -> Result<Self> {
        let (meta, default) = spec.resolve(&KIND);
        let d = AlchemyOptions::default();
        let mut node = Self {
            meta,
            names: InputArray::new(
                NodeSpec::new()
                    .help("The names of the atoms to be to exchanged, in the format [name1, name2, ... ].")
                    .default(d.names),
            )?,
            nxi: InputValue::new(
                NodeSpec::new()
                    .help("The average number of exchanges per step to be attempted.")
                    .default(d.nxi),
            )?,
            ealc: InputValue::new(
                NodeSpec::new()
                    .help("The contribution to the conserved quantity for the alchemical exchanger.")
                    .dimension("energy")
                    .default(d.ealc),
            )?,
        };
        apply_default(&mut node, default.as_ref())?;
        Ok(node)
    }
}

composite_node! {
    InputAlchemy {
        meta: meta,
        attribs: {},
        fields: {
            "names" => names,
            "nxi" => nxi,
            "ealc" => ealc,
        },
    }
}

impl Input for InputAlchemy {
    type Value = AlchemyOptions;

    fn store(&mut self, value: &AlchemyOptions) -> Result<()> {
        self.meta.set_explicit(true);
        self.names.store(&value.names.clone().into())?;
        self.nxi.store(&value.nxi)?;
        self.ealc.store_internal(&value.ealc)
    }

    fn fetch(&self) -> Result<AlchemyOptions> {
        self.check()?;
        Ok(AlchemyOptions {
            names: self.names.fetch()?.into_vec(),
            nxi: self.nxi.fetch()?,
            ealc: self.ealc.fetch()?,
        })
    }
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Nudged elastic band input.

use super::geop::{InputGeopTolerances, GEOP_MODES};
use crate::engine::{NebOptions, Tolerances};
use crate::error::Result;
use crate::input::composite::composite_node;
use crate::input::{
    apply_default, Input, InputDefault, InputMeta, InputValue, KindDefaults, Node, NodeSpec,
};

const KIND: KindDefaults = KindDefaults::new(
    "InputNeb",
    "Contains the required parameters for performing nudged elastic band (NEB) calculations",
);

#[derive(Debug, Clone)]
pub struct InputNeb {
    meta: InputMeta,
    mode: InputValue<String>,
    spring: InputValue<f64>,
    climb: InputValue<bool>,
    tolerances: InputGeopTolerances,
}

impl InputNeb {
    pub fn new(spec: NodeSpec<NebOptions>) -> Result<Self> {
        let (meta, default) = spec.resolve(&KIND);
        let d = NebOptions::default();
        let mut node = Self {
            meta,
            mode: InputValue::with_options(
                NodeSpec::new()
                    .help("The geometry optimization algorithm to be used for the band")
                    .default(d.mode),
                GEOP_MODES.map(String::from).to_vec(),
            )?,
            spring: InputValue::new(
                NodeSpec::new()
                    .help("The elastic constant of the springs between replicas.")
                    .default(d.spring),
            )?,
            climb: InputValue::new(
                NodeSpec::new()
                    .help("Use climbing image NEB once the band has converged.")
                    .default(d.climb),
            )?,
            tolerances: InputGeopTolerances::new(
                NodeSpec::new()
                    .help("Convergence criteria for the band.")
                    .deferred(InputDefault::new(Tolerances::default)),
            )?,
        };
        apply_default(&mut node, default.as_ref())?;
        Ok(node)
    }
}

composite_node! {
    InputNeb {
        meta: meta,
        attribs: { "mode" => mode },
        fields: {
            "spring" => spring,
            "climb" => climb,
            "tolerances" => tolerances,
        },
    }
}

impl Input for InputNeb {
    type Value = NebOptions;

    fn store(&mut self, value: &NebOptions) -> Result<()> {
        self.meta.set_explicit(true);
        self.mode.store(&value.mode)?;
        self.spring.store(&value.spring)?;
        self.climb.store(&value.climb)?;
        self.tolerances.store(&value.tolerances)
    }

    fn fetch(&self) -> Result<NebOptions> {
        self.check()?;
        Ok(NebOptions {
            mode: self.mode.fetch()?,
            spring: self.spring.fetch()?,
            climb: self.climb.fetch()?,
            tolerances: self.tolerances.fetch()?,
        })
    }
}

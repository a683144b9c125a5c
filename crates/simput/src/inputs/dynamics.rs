// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Molecular dynamics input.

use crate::engine::DynamicsOptions;
use crate::error::Result;
use crate::input::composite::composite_node;
use crate::input::{
    apply_default, Input, InputArray, InputMeta, InputValue, KindDefaults, Node, NodeSpec,
};

const KIND: KindDefaults = KindDefaults::new(
    "InputDynamics",
    "Holds all the information for the MD integrator, such as timestep, the thermostats and barostats that control it.",
);

const ENSEMBLES: [&str; 6] = ["nve", "nvt", "npt", "nst", "sc", "scnpt"];

const SPLITTINGS: [&str; 2] = ["obabo", "baoab"];

#[derive(Debug, Clone)]
pub struct InputDynamics {
    meta: InputMeta,
    mode: InputValue<String>,
    timestep: InputValue<f64>,
    nmts: InputArray<i64>,
    splitting: InputValue<String>,
}

impl InputDynamics {
    pub fn new(spec: NodeSpec<DynamicsOptions>) -> Result<Self> {
        let (meta, default) = spec.resolve(&KIND);
        let d = DynamicsOptions::default();
        let mut node = Self {
            meta,
            mode: InputValue::with_options(
                NodeSpec::new()
                    .help("The ensemble that will be sampled during the simulation.")
                    .default(d.mode),
                ENSEMBLES.map(String::from).to_vec(),
            )?,
            timestep: InputValue::new(
                NodeSpec::new()
                    .help("The time step.")
                    .dimension("time")
                    .default(d.timestep),
            )?,
            nmts: InputArray::new(
                NodeSpec::new()
                    .help("Number of iterations for each MTS level (including the outer loop, that should in most cases have just one iteration).")
                    .default(d.nmts),
            )?,
            splitting: InputValue::with_options(
                NodeSpec::new()
                    .help("The Louiville splitting used for sampling the target ensemble.")
                    .default(d.splitting),
                SPLITTINGS.map(String::from).to_vec(),
            )?,
        };
        apply_default(&mut node, default.as_ref())?;
        Ok(node)
    }
}

composite_node! {
    InputDynamics {
        meta: meta,
        attribs: { "mode" => mode },
        fields: {
            "timestep" => timestep,
            "nmts" => nmts,
            "splitting" => splitting,
        },
    }
}

impl Input for InputDynamics {
    type Value = DynamicsOptions;

    fn store(&mut self, value: &DynamicsOptions) -> Result<()> {
        self.meta.set_explicit(true);
        self.mode.store(&value.mode)?;
        self.timestep.store_internal(&value.timestep)?;
        self.nmts.store(&value.nmts.clone().into())?;
        self.splitting.store(&value.splitting)
    }

    fn fetch(&self) -> Result<DynamicsOptions> {
        self.check()?;
        Ok(DynamicsOptions {
            mode: self.mode.fetch()?,
            timestep: self.timestep.fetch()?,
            nmts: self.nmts.fetch()?.into_vec(),
            splitting: self.splitting.fetch()?,
        })
    }
}

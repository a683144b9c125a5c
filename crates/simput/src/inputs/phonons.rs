// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamical matrix (phonon) input.

use crate::engine::DynMatrixOptions;
use crate::error::Result;
use crate::input::composite::composite_node;
use crate::input::{
    apply_default, Input, InputArray, InputMeta, InputValue, KindDefaults, Node, NodeSpec,
};

const KIND: KindDefaults = KindDefaults::new(
    "InputDynMatrix",
    "Option for phonon computation",
);

const MODES: [&str; 3] = ["fd", "nmfd", "enmfd"];

const ASR: [&str; 3] = ["none", "crystal", "poly"];

#[derive(Debug, Clone)]
pub struct InputDynMatrix {
    meta: InputMeta,
    mode: InputValue<String>,
    pos_shift: InputValue<f64>,
    energy_shift: InputValue<f64>,
    output_shift: InputValue<f64>,
    prefix: InputValue<String>,
    asr: InputValue<String>,
    dynmat: InputArray<f64>,
    refdynmat: InputArray<f64>,
}

impl InputDynMatrix {
    pub fn new(spec: NodeSpec<DynMatrixOptions>) -> Result<Self> {
        let (meta, default) = spec.resolve(&KIND);
        let d = DynMatrixOptions::default();
        let mut node = Self {
            meta,
            mode: InputValue::with_options(
                NodeSpec::new()
                    .help("The algorithm to be used: finite differences (fd), normal modes finite differences (nmfd), and energy-scaled normal mode finite differences (enmfd).")
                    .default(d.mode),
                MODES.map(String::from).to_vec(),
            )?,
            pos_shift: InputValue::new(
                NodeSpec::new()
                    .help("The finite displacement in position used to compute derivative of force.")
                    .dimension("length")
                    .default(d.pos_shift),
            )?,
            energy_shift: InputValue::new(
                NodeSpec::new()
                    .help("The finite displacement in energy used to compute derivative of force.")
                    .dimension("energy")
                    .default(d.energy_shift),
            )?,
            output_shift: InputValue::new(
                NodeSpec::new()
                    .help("Shift by the dynamical matrix diagonally before outputting.")
                    .dimension("frequency")
                    .default(d.output_shift),
            )?,
            prefix: InputValue::new(
                NodeSpec::new()
                    .help("Prefix of the output files.")
                    .default(d.prefix),
            )?,
            asr: InputValue::with_options(
                NodeSpec::new()
                    .help("Removes the zero frequency vibrational modes depending on the symmetry of the system.")
                    .default(d.asr),
                ASR.map(String::from).to_vec(),
            )?,
            dynmat: InputArray::new(
                NodeSpec::new()
                    .help("Portion of the dynamical matrix known up to now.")
                    .default(d.dynmat),
            )?,
            refdynmat: InputArray::new(
                NodeSpec::new()
                    .help("Portion of the refined dynamical matrix known up to now.")
                    .default(d.refdynmat),
            )?,
        };
        apply_default(&mut node, default.as_ref())?;
        Ok(node)
    }
}

composite_node! {
    InputDynMatrix {
        meta: meta,
        attribs: { "mode" => mode },
        fields: {
            "pos_shift" => pos_shift,
            "energy_shift" => energy_shift,
            "output_shift" => output_shift,
            "prefix" => prefix,
            "asr" => asr,
            "dynmat" => dynmat,
            "refdynmat" => refdynmat,
        },
    }
}

impl Input for InputDynMatrix {
    type Value = DynMatrixOptions;

    fn store(&mut self, value: &DynMatrixOptions) -> Result<()> {
        self.meta.set_explicit(true);
        self.mode.store(&value.mode)?;
        self.pos_shift.store_internal(&value.pos_shift)?;
        self.energy_shift.store_internal(&value.energy_shift)?;
        self.output_shift.store_internal(&value.output_shift)?;
        self.prefix.store(&value.prefix)?;
        self.asr.store(&value.asr)?;
        self.dynmat.store(&value.dynmat.clone().into())?;
        self.refdynmat.store(&value.refdynmat.clone().into())
    }

    fn fetch(&self) -> Result<DynMatrixOptions> {
        self.check()?;
        Ok(DynMatrixOptions {
            mode: self.mode.fetch()?,
            pos_shift: self.pos_shift.fetch()?,
            energy_shift: self.energy_shift.fetch()?,
            output_shift: self.output_shift.fetch()?,
            prefix: self.prefix.fetch()?,
            asr: self.asr.fetch()?,
            dynmat: self.dynmat.fetch()?.into_vec(),
            refdynmat: self.refdynmat.fetch()?.into_vec(),
        })
    }
}

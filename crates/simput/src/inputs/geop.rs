// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Geometry optimization input.

use crate::engine::{GeopOptions, Tolerances};
use crate::error::Result;
use crate::input::composite::composite_node;
use crate::input::{
    apply_default, Input, InputDefault, InputMeta, InputValue, KindDefaults, Node, NodeSpec,
};

const TOLERANCES: KindDefaults = KindDefaults::new(
    "InputGeopTolerances",
    "Convergence thresholds for the optimization.",
);

const GEOP: KindDefaults = KindDefaults::new(
    "InputGeop",
    "A Geometry Optimization class implementing most of the standard methods",
);

/// Optimizer algorithms.
pub const GEOP_MODES: [&str; 4] = ["sd", "cg", "bfgs", "lbfgs"];

/// Energy, force and position convergence thresholds.
#[derive(Debug, Clone)]
pub struct InputGeopTolerances {
    meta: InputMeta,
    energy: InputValue<f64>,
    force: InputValue<f64>,
    position: InputValue<f64>,
}

impl InputGeopTolerances {
    pub fn new(spec: NodeSpec<Tolerances>) -> Result<Self> {
        let (meta, default) = spec.resolve(&TOLERANCES);
        let d = Tolerances::default();
        let mut node = Self {
            meta,
            energy: InputValue::new(
                NodeSpec::new()
                    .help("Tolerance criteria for energy.")
                    .dimension("energy")
                    .default(d.energy),
            )?,
            force: InputValue::new(
                NodeSpec::new()
                    .help("Tolerance criteria for forces.")
                    .dimension("force")
                    .default(d.force),
            )?,
            position: InputValue::new(
                NodeSpec::new()
                    .help("Tolerance criteria for the step in positions.")
                    .dimension("length")
                    .default(d.position),
            )?,
        };
        apply_default(&mut node, default.as_ref())?;
        Ok(node)
    }
}

composite_node! {
    InputGeopTolerances {
        meta: meta,
        attribs: {},
        fields: {
            "energy" => energy,
            "force" => force,
            "position" => position,
        },
    }
}

impl Input for InputGeopTolerances {
    type Value = Tolerances;

    fn store(&mut self, value: &Tolerances) -> Result<()> {
        self.meta.set_explicit(true);
        self.energy.store_internal(&value.energy)?;
        self.force.store_internal(&value.force)?;
        self.position.store_internal(&value.position)
    }

    fn fetch(&self) -> Result<Tolerances> {
        self.check()?;
        Ok(Tolerances {
            energy: self.energy.fetch()?,
            force: self.force.fetch()?,
            position: self.position.fetch()?,
        })
    }
}

/// Optimizer settings of a `minimize` motion.
#[derive(Debug, Clone)]
pub struct InputGeop {
    meta: InputMeta,
    mode: InputValue<String>,
    max_step: InputValue<f64>,
    corrections: InputValue<i64>,
    tolerances: InputGeopTolerances,
}

impl InputGeop {
    pub fn new(spec: NodeSpec<GeopOptions>) -> Result<Self> {
        let (meta, default) = spec.resolve(&GEOP);
        let d = GeopOptions::default();
        let mut node = Self {
            meta,
            mode: InputValue::with_options(
                NodeSpec::new()
                    .help("The geometry optimization algorithm to be used")
                    .default(d.mode),
                GEOP_MODES.map(String::from).to_vec(),
            )?,
            max_step: InputValue::new(
                NodeSpec::new()
                    .help("The largest step allowed in a line search.")
                    .dimension("length")
                    .default(d.max_step),
            )?,
            corrections: InputValue::new(
                NodeSpec::new()
                    .help("The number of past steps stored by L-BFGS.")
                    .default(d.corrections),
            )?,
            tolerances: InputGeopTolerances::new(
                NodeSpec::new()
                    .help("Convergence criteria for optimization.")
                    .deferred(InputDefault::new(Tolerances::default)),
            )?,
        };
        apply_default(&mut node, default.as_ref())?;
        Ok(node)
    }
}

composite_node! {
    InputGeop {
        meta: meta,
        attribs: { "mode" => mode },
        fields: {
            "max_step" => max_step,
            "corrections" => corrections,
            "tolerances" => tolerances,
        },
    }
}

impl Input for InputGeop {
    type Value = GeopOptions;

    fn store(&mut self, value: &GeopOptions) -> Result<()> {
        self.meta.set_explicit(true);
        self.mode.store(&value.mode)?;
        self.max_step.store_internal(&value.max_step)?;
        self.corrections.store(&value.corrections)?;
        self.tolerances.store(&value.tolerances)
    }

    fn fetch(&self) -> Result<GeopOptions> {
        self.check()?;
        Ok(GeopOptions {
            mode: self.mode.fetch()?,
            max_step: self.max_step.fetch()?,
            corrections: self.corrections.fetch()?,
            tolerances: self.tolerances.fetch()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InputError;
    use crate::units::unit_to_internal;
    use crate::xml::XmlNode;

    fn optimizer() -> InputGeop {
        InputGeop::new(NodeSpec::new().default(GeopOptions::default())).expect("build")
    }

    #[test]
    fn test_defaults() {
        let node = optimizer();
        assert!(!node.is_explicit());
        assert_eq!(node.fetch().expect("fetch"), GeopOptions::default());
    }

    #[test]
    fn test_parse_partial_block() {
        let mut node = optimizer();
        let xml = XmlNode::parse_str(
            "<optimizer mode='bfgs'>
               <max_step units='angstrom'>0.5</max_step>
               <tolerances><force>1e-4</force></tolerances>
             </optimizer>",
        )
        .expect("parse");
        node.parse(&xml).expect("parse");

        let options = node.fetch().expect("fetch");
        assert_eq!(options.mode, "bfgs");
        let step = unit_to_internal("length", "angstrom", 0.5).expect("known unit");
        assert_eq!(options.max_step, step);
        assert_eq!(options.corrections, 5);
        assert_eq!(options.tolerances.force, 1e-4);
        assert_eq!(options.tolerances.energy, Tolerances::default().energy);
    }

    #[test]
    fn test_invalid_mode() {
        let mut node = optimizer();
        let xml = XmlNode::new("optimizer").with_attrib("mode", "newton");
        assert!(matches!(
            node.parse(&xml),
            Err(InputError::InvalidOption { .. })
        ));
    }

    #[test]
    fn test_store_write_parse() {
        let mut options = GeopOptions::default();
        options.mode = "cg".into();
        options.tolerances.position = 2e-3;

        let mut node = optimizer();
        node.store(&options).expect("store");
        let text = node.write("optimizer", "").expect("write");
        assert!(text.starts_with("<optimizer mode='cg'>\n"));
        assert!(text.contains("<position>0.002</position>"));

        let mut back = optimizer();
        back.parse(&XmlNode::parse_str(&text).expect("reparse"))
            .expect("parse");
        assert_eq!(back.fetch().expect("fetch"), options);
    }
}

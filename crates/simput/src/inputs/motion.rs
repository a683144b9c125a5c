// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Motion selection.
//!
//! [`InputMotionBase`] is a variant dispatcher: its `mode` attribute names
//! one [`Motion`] kind, and only the field slot of that kind is stored or
//! read back. [`InputMotion`] adds the `multi` kind, which keeps an ordered
//! list of independent `<motion>` children.
//!
//! ```text
//! <motion mode='multi'>
//!   <fixcom>True</fixcom>
//!   <motion mode='replay'>
//!     <fixcom>True</fixcom>
//!     <file mode='xyz'>in.xyz</file>
//!   </motion>
//!   <motion mode='minimize'>
//!     <fixcom>False</fixcom>
//!     <fixatoms shape='(2,)'> [ 3, 7 ] </fixatoms>
//!     <optimizer mode='lbfgs'>
//!       <max_step>100.0</max_step>
//!       <corrections>5</corrections>
//!       <tolerances>
//!         <energy>1e-6</energy>
//!         <force>1e-5</force>
//!         <position>0.001</position>
//!       </tolerances>
//!     </optimizer>
//!   </motion>
//! </motion>
//! ```

use super::{InputAlchemy, InputDynMatrix, InputDynamics, InputGeop, InputInitFile, InputNeb};
use crate::config::DispatchPolicy;
use crate::engine::{
    AlchemyMc, AlchemyOptions, DynMatrixMover, DynMatrixOptions, Dynamics, DynamicsOptions,
    GeopMotion, GeopOptions, InitFile, Motion, MotionMode, MultiMotion, NebMover, NebOptions,
    Replay,
};
use crate::error::{InputError, Result};
use crate::input::composite::composite_node;
use crate::input::{
    apply_default, Input, InputArray, InputDefault, InputMeta, InputValue, KindDefaults, Node,
    NodeSpec,
};
use tracing::{debug, warn};

const HELP: &str = "Allow choosing the type of calculation to be performed. Holds all the information that is calculation specific, such as geometry optimization parameters, etc.";

const BASE: KindDefaults = KindDefaults::new("InputMotionBase", HELP).with_label("MOTION");

const MOTION: KindDefaults = KindDefaults::new("InputMotion", HELP).with_label("MOTION");

/// Tag of dynamic children of a `multi` motion.
pub const MOTION_TAG: &str = "motion";

/// Dispatcher over the single (non-`multi`) motion kinds.
#[derive(Debug, Clone)]
pub struct InputMotionBase {
    meta: InputMeta,
    mode: InputValue<String>,
    fixcom: InputValue<bool>,
    fixatoms: InputArray<i64>,
    optimizer: InputGeop,
    neb_optimizer: InputNeb,
    dynamics: InputDynamics,
    file: InputInitFile,
    vibrations: InputDynMatrix,
    alchemy: InputAlchemy,
    policy: DispatchPolicy,
}

impl InputMotionBase {
    pub fn new(spec: NodeSpec<Motion>) -> Result<Self> {
        let (meta, default) = spec.resolve(&BASE);
        let mut node = Self::build(meta, &MotionMode::SINGLE)?;
        apply_default(&mut node, default.as_ref())?;
        Ok(node)
    }

    /// Choose how the `dummy` discriminator is fetched.
    pub fn with_policy(mut self, policy: DispatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> DispatchPolicy {
        self.policy
    }

    fn build(meta: InputMeta, modes: &[MotionMode]) -> Result<Self> {
        Ok(Self {
            meta,
            mode: InputValue::with_options(
                NodeSpec::new().help("How atoms should be moved at each step in the simulation. 'replay' means that a simulation is restarted from a previous simulation."),
                modes.iter().map(|m| m.tag().to_string()).collect(),
            )?,
            fixcom: InputValue::new(
                NodeSpec::new()
                    .help("This describes whether the centre of mass of the particles is fixed.")
                    .default(true),
            )?,
            fixatoms: InputArray::new(
                NodeSpec::new()
                    .help("Indices of the atoms that should be held fixed.")
                    .default(Vec::<i64>::new()),
            )?,
            optimizer: InputGeop::new(
                NodeSpec::new()
                    .help("Option for geometry optimization")
                    .deferred(InputDefault::new(GeopOptions::default)),
            )?,
            neb_optimizer: InputNeb::new(
                NodeSpec::new()
                    .help("Option for nudged elastic band optimization")
                    .deferred(InputDefault::new(NebOptions::default)),
            )?,
            dynamics: InputDynamics::new(
                NodeSpec::new()
                    .help("Option for (path integral) molecular dynamics")
                    .deferred(InputDefault::new(DynamicsOptions::default)),
            )?,
            file: InputInitFile::new(
                NodeSpec::new()
                    .help("This describes the location to read a trajectory file from.")
                    .deferred(InputDefault::with_args(InitFile::with_mode, "xyz".to_string())),
            )?,
            vibrations: InputDynMatrix::new(
                NodeSpec::new()
                    .help("Option for phonon computation")
                    .deferred(InputDefault::new(DynMatrixOptions::default)),
            )?,
            alchemy: InputAlchemy::new(
                NodeSpec::new()
                    .help("Option for alchemical exchanges")
                    .deferred(InputDefault::new(AlchemyOptions::default)),
            )?,
            policy: DispatchPolicy::default(),
        })
    }

    fn store_common(&mut self, fixcom: bool, fixatoms: &[i64]) -> Result<()> {
        self.fixcom.store(&fixcom)?;
        self.fixatoms.store(&fixatoms.to_vec().into())
    }

    fn fixatoms(&self) -> Result<Vec<i64>> {
        Ok(self.fixatoms.fetch()?.into_vec())
    }

    fn fetch_kind(&self, mode: MotionMode) -> Result<Motion> {
        let motion = match mode {
            MotionMode::Dummy => match self.policy {
                DispatchPolicy::Lenient => {
                    warn!("motion mode 'dummy' selects no motion; atoms will not move");
                    Motion::Dummy
                }
                DispatchPolicy::Strict => {
                    return Err(InputError::UnsupportedKind {
                        kind: mode.tag().to_string(),
                    })
                }
            },
            MotionMode::Replay => Motion::Replay(Replay::new(self.file.fetch()?)),
            MotionMode::Minimize => Motion::Minimize(GeopMotion::new(
                self.fixcom.fetch()?,
                self.fixatoms()?,
                self.optimizer.fetch()?,
            )),
            MotionMode::Neb => Motion::Neb(NebMover::new(
                self.fixcom.fetch()?,
                self.fixatoms()?,
                self.neb_optimizer.fetch()?,
            )),
            MotionMode::Dynamics => Motion::Dynamics(Dynamics::new(
                self.fixcom.fetch()?,
                self.fixatoms()?,
                self.dynamics.fetch()?,
            )),
            MotionMode::Vibrations => Motion::Vibrations(DynMatrixMover::new(
                self.fixcom.fetch()?,
                self.fixatoms()?,
                self.vibrations.fetch()?,
            )),
            MotionMode::Alchemy => Motion::Alchemy(AlchemyMc::new(
                self.fixcom.fetch()?,
                self.fixatoms()?,
                self.alchemy.fetch()?,
            )),
            MotionMode::Multi => {
                return Err(InputError::UnsupportedKind {
                    kind: mode.tag().to_string(),
                })
            }
        };
        Ok(motion)
    }
}

composite_node! {
    InputMotionBase {
        meta: meta,
        attribs: { "mode" => mode },
        fields: {
            "fixcom" => fixcom,
            "fixatoms" => fixatoms,
            "optimizer" => optimizer,
            "neb_optimizer" => neb_optimizer,
            "dynamics" => dynamics,
            "file" => file,
            "vibrations" => vibrations,
            "alchemy" => alchemy,
        },
    }
}

impl Input for InputMotionBase {
    type Value = Motion;

    fn store(&mut self, motion: &Motion) -> Result<()> {
        let mode = motion.mode();
        debug!(mode = %mode, "storing motion");

        if mode == MotionMode::Multi {
            return Err(InputError::UnsupportedKind {
                kind: mode.tag().to_string(),
            });
        }
        self.meta.set_explicit(true);
        self.mode.store(&mode.tag().to_string())?;

        match motion {
            Motion::Dummy | Motion::Multi(_) => Ok(()),
            Motion::Replay(replay) => self.file.store(&replay.intraj),
            Motion::Minimize(m) => {
                self.optimizer.store(&m.options)?;
                self.store_common(m.fixcom, &m.fixatoms)
            }
            Motion::Neb(m) => {
                self.neb_optimizer.store(&m.options)?;
                self.store_common(m.fixcom, &m.fixatoms)
            }
            Motion::Dynamics(m) => {
                self.dynamics.store(&m.options)?;
                self.store_common(m.fixcom, &m.fixatoms)
            }
            Motion::Vibrations(m) => {
                self.vibrations.store(&m.options)?;
                self.store_common(m.fixcom, &m.fixatoms)
            }
            Motion::Alchemy(m) => {
                self.alchemy.store(&m.options)?;
                self.store_common(m.fixcom, &m.fixatoms)
            }
        }
    }

    fn fetch(&self) -> Result<Motion> {
        self.check()?;
        let tag = self.mode.fetch()?;
        let mode = MotionMode::from_tag(&tag).ok_or(InputError::UnsupportedKind { kind: tag })?;
        self.fetch_kind(mode)
    }
}

/// Top-level motion dispatcher, accepting `multi`.
#[derive(Debug, Clone)]
pub struct InputMotion {
    base: InputMotionBase,
    extra: Vec<(String, InputMotionBase)>,
}

impl InputMotion {
    pub fn new(spec: NodeSpec<Motion>) -> Result<Self> {
        let (meta, default) = spec.resolve(&MOTION);
        let modes: Vec<MotionMode> = MotionMode::SINGLE
            .into_iter()
            .chain([MotionMode::Multi])
            .collect();
        let mut node = Self {
            base: InputMotionBase::build(meta, &modes)?,
            extra: Vec::new(),
        };
        apply_default(&mut node, default.as_ref())?;
        Ok(node)
    }

    /// Choose how the `dummy` discriminator is fetched, here and in every
    /// child created afterwards.
    pub fn with_policy(mut self, policy: DispatchPolicy) -> Self {
        self.base.policy = policy;
        self
    }

    pub fn policy(&self) -> DispatchPolicy {
        self.base.policy
    }

    /// Dynamic children of a `multi` motion.
    pub fn children(&self) -> impl Iterator<Item = &InputMotionBase> {
        self.extra.iter().map(|(_, m)| m)
    }

    /// Template of a `<motion>` child.
    pub fn motion_template(&self) -> Result<InputMotionBase> {
        let child = InputMotionBase::new(
            NodeSpec::new()
                .help("A motion class that can be included as a member of a 'multi' integrator.")
                .deferred(InputDefault::new(Motion::default)),
        )?;
        Ok(child.with_policy(self.base.policy))
    }
}

composite_node! {
    InputMotion {
        meta: base.meta,
        attribs: { "mode" => base.mode },
        fields: {
            "fixcom" => base.fixcom,
            "fixatoms" => base.fixatoms,
            "optimizer" => base.optimizer,
            "neb_optimizer" => base.neb_optimizer,
            "dynamics" => base.dynamics,
            "file" => base.file,
            "vibrations" => base.vibrations,
            "alchemy" => base.alchemy,
        },
        extra: InputMotionBase,
        dynamic: { "motion" => InputMotion::motion_template },
    }
}

impl Input for InputMotion {
    type Value = Motion;

    fn store(&mut self, motion: &Motion) -> Result<()> {
        self.extra.clear();
        let Motion::Multi(multi) = motion else {
            return self.base.store(motion);
        };

        debug!(count = multi.motionlist.len(), "storing multi motion");
        self.base.meta.set_explicit(true);
        self.base.mode.store(&MotionMode::Multi.tag().to_string())?;
        for m in &multi.motionlist {
            let mut child = self.motion_template()?;
            child.store(m)?;
            self.extra.push((MOTION_TAG.to_string(), child));
        }
        Ok(())
    }

    fn fetch(&self) -> Result<Motion> {
        self.check()?;
        if self.base.mode.fetch()? != MotionMode::Multi.tag() {
            return self.base.fetch();
        }

        let motionlist = self
            .extra
            .iter()
            .map(|(_, m)| m.fetch())
            .collect::<Result<Vec<_>>>()?;
        Ok(Motion::Multi(MultiMotion::new(motionlist)))
    }
}

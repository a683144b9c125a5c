// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Motion calculations.
//!
//! A [`Motion`] decides how atoms move at each step. All quantities are in
//! atomic units.

use std::fmt;

/// Source of a trajectory or configuration file.
#[derive(Debug, Clone, PartialEq)]
pub struct InitFile {
    /// File format: `xyz`, `pdb` or `chk`.
    pub mode: String,
    /// Length units of the coordinates in the file.
    pub units: String,
    pub filename: String,
}

impl InitFile {
    /// Empty reference in the given format.
    pub fn with_mode(mode: String) -> Self {
        Self {
            mode,
            units: String::new(),
            filename: String::new(),
        }
    }

    pub fn xyz(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            ..Self::with_mode("xyz".to_string())
        }
    }
}

/// Convergence thresholds of an optimizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Tolerances {
    pub energy: f64,
    pub force: f64,
    pub position: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            energy: 1e-6,
            force: 1e-5,
            position: 1e-3,
        }
    }
}

/// Geometry optimization settings.
#[derive(Debug, Clone, PartialEq)]
pub struct GeopOptions {
    pub mode: String,
    /// Largest step allowed in a line search.
    pub max_step: f64,
    /// Number of past steps kept by L-BFGS.
    pub corrections: i64,
    pub tolerances: Tolerances,
}

impl Default for GeopOptions {
    fn default() -> Self {
        Self {
            mode: "lbfgs".to_string(),
            max_step: 100.0,
            corrections: 5,
            tolerances: Tolerances::default(),
        }
    }
}

/// Nudged elastic band settings.
#[derive(Debug, Clone, PartialEq)]
pub struct NebOptions {
    pub mode: String,
    /// Spring constant between images.
    pub spring: f64,
    /// Climbing-image variant.
    pub climb: bool,
    pub tolerances: Tolerances,
}

impl Default for NebOptions {
    fn default() -> Self {
        Self {
            mode: "lbfgs".to_string(),
            spring: 0.05,
            climb: false,
            tolerances: Tolerances::default(),
        }
    }
}

/// Molecular dynamics settings.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicsOptions {
    /// Ensemble: `nve`, `nvt`, `npt`, `nst`, `sc` or `scnpt`.
    pub mode: String,
    pub timestep: f64,
    /// Multiple time step factors, outermost first.
    pub nmts: Vec<i64>,
    /// Integrator splitting: `obabo` or `baoab`.
    pub splitting: String,
}

impl Default for DynamicsOptions {
    fn default() -> Self {
        Self {
            mode: "nve".to_string(),
            timestep: 1.0,
            nmts: Vec::new(),
            splitting: "obabo".to_string(),
        }
    }
}

/// Finite-difference dynamical matrix settings.
#[derive(Debug, Clone, PartialEq)]
pub struct DynMatrixOptions {
    pub mode: String,
    pub pos_shift: f64,
    pub energy_shift: f64,
    pub output_shift: f64,
    pub prefix: String,
    /// Acoustic sum rule: `none`, `crystal` or `poly`.
    pub asr: String,
    pub dynmat: Vec<f64>,
    pub refdynmat: Vec<f64>,
}

impl Default for DynMatrixOptions {
    fn default() -> Self {
        Self {
            mode: "fd".to_string(),
            pos_shift: 0.001,
            energy_shift: 0.0,
            output_shift: 0.0,
            prefix: "phonons".to_string(),
            asr: "none".to_string(),
            dynmat: Vec::new(),
            refdynmat: Vec::new(),
        }
    }
}

/// Alchemical exchange Monte Carlo settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AlchemyOptions {
    /// Atom names that may be exchanged.
    pub names: Vec<String>,
    /// Average number of exchanges per step.
    pub nxi: f64,
    /// Accumulated exchange energy.
    pub ealc: f64,
}

impl Default for AlchemyOptions {
    fn default() -> Self {
        Self {
            names: Vec::new(),
            nxi: 1.0,
            ealc: 0.0,
        }
    }
}

/// A motion that moves atoms, optionally holding the centre of mass and
/// some atoms in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Mover<O> {
    pub fixcom: bool,
    pub fixatoms: Vec<i64>,
    pub options: O,
}

impl<O> Mover<O> {
    pub fn new(fixcom: bool, fixatoms: Vec<i64>, options: O) -> Self {
        Self {
            fixcom,
            fixatoms,
            options,
        }
    }
}

pub type GeopMotion = Mover<GeopOptions>;
pub type NebMover = Mover<NebOptions>;
pub type Dynamics = Mover<DynamicsOptions>;
pub type DynMatrixMover = Mover<DynMatrixOptions>;
pub type AlchemyMc = Mover<AlchemyOptions>;

/// Replays a stored trajectory instead of computing new positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Replay {
    pub intraj: InitFile,
}

impl Replay {
    pub fn new(intraj: InitFile) -> Self {
        Self { intraj }
    }
}

/// Several motions applied in sequence at each step.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultiMotion {
    pub motionlist: Vec<Motion>,
}

impl MultiMotion {
    pub fn new(motionlist: Vec<Motion>) -> Self {
        Self { motionlist }
    }
}

/// Every motion calculation the schema can express.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Motion {
    /// Atoms do not move.
    #[default]
    Dummy,
    Replay(Replay),
    Minimize(GeopMotion),
    Neb(NebMover),
    Dynamics(Dynamics),
    Vibrations(DynMatrixMover),
    Alchemy(AlchemyMc),
    Multi(MultiMotion),
}

impl Motion {
    pub fn mode(&self) -> MotionMode {
        match self {
            Motion::Dummy => MotionMode::Dummy,
            Motion::Replay(_) => MotionMode::Replay,
            Motion::Minimize(_) => MotionMode::Minimize,
            Motion::Neb(_) => MotionMode::Neb,
            Motion::Dynamics(_) => MotionMode::Dynamics,
            Motion::Vibrations(_) => MotionMode::Vibrations,
            Motion::Alchemy(_) => MotionMode::Alchemy,
            Motion::Multi(_) => MotionMode::Multi,
        }
    }
}

/// Discriminator of a [`Motion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionMode {
    Vibrations,
    Minimize,
    Replay,
    Neb,
    Dynamics,
    Alchemy,
    Dummy,
    Multi,
}

impl MotionMode {
    /// Modes a single dispatcher can select, in manual order.
    pub const SINGLE: [MotionMode; 7] = [
        MotionMode::Vibrations,
        MotionMode::Minimize,
        MotionMode::Replay,
        MotionMode::Neb,
        MotionMode::Dynamics,
        MotionMode::Alchemy,
        MotionMode::Dummy,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            MotionMode::Vibrations => "vibrations",
            MotionMode::Minimize => "minimize",
            MotionMode::Replay => "replay",
            MotionMode::Neb => "neb",
            MotionMode::Dynamics => "dynamics",
            MotionMode::Alchemy => "alchemy",
            MotionMode::Dummy => "dummy",
            MotionMode::Multi => "multi",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::SINGLE
            .into_iter()
            .chain([MotionMode::Multi])
            .find(|m| m.tag() == tag)
    }
}

impl fmt::Display for MotionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_tags_round_trip() {
        for mode in MotionMode::SINGLE.into_iter().chain([MotionMode::Multi]) {
            assert_eq!(MotionMode::from_tag(mode.tag()), Some(mode));
        }
        assert_eq!(MotionMode::from_tag("MINIMIZE"), None);
        assert_eq!(MotionMode::Neb.to_string(), "neb");
    }

    #[test]
    fn test_motion_mode_of_each_kind() {
        let geop = Motion::Minimize(GeopMotion::new(false, vec![3, 7], GeopOptions::default()));
        assert_eq!(geop.mode(), MotionMode::Minimize);
        assert_eq!(Motion::default().mode(), MotionMode::Dummy);
        let multi = Motion::Multi(MultiMotion::new(vec![geop, Motion::Dummy]));
        assert_eq!(multi.mode(), MotionMode::Multi);
    }

    #[test]
    fn test_init_file_constructors() {
        let f = InitFile::xyz("in.xyz");
        assert_eq!(f.mode, "xyz");
        assert_eq!(f.filename, "in.xyz");
        assert!(f.units.is_empty());
        assert_eq!(InitFile::with_mode("pdb".into()).mode, "pdb");
    }
}

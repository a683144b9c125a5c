// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema kinds of the motion input.

pub mod alchemy;
pub mod dynamics;
pub mod geop;
pub mod initfile;
pub mod motion;
pub mod neb;
pub mod phonons;

pub use alchemy::InputAlchemy;
pub use dynamics::InputDynamics;
pub use geop::{InputGeop, InputGeopTolerances};
pub use initfile::InputInitFile;
pub use motion::{InputMotion, InputMotionBase, MOTION_TAG};
pub use neb::InputNeb;
pub use phonons::InputDynMatrix;

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Domain objects configured by the input schema.

pub mod motion;

pub use motion::{
    AlchemyMc, AlchemyOptions, DynMatrixMover, DynMatrixOptions, Dynamics, DynamicsOptions,
    GeopMotion, GeopOptions, InitFile, Motion, MotionMode, Mover, MultiMotion, NebMover,
    NebOptions, Replay, Tolerances,
};

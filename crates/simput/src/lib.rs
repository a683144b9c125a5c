// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Simput: schema-driven simulation input
//!
//! Converts motion configuration objects to and from an XML text tree,
//! validating every value against a declarative schema.
//!
//! # Features
//!
//! - **Scalar and array leaves**: typed values with options, defaults and units
//! - **Composites**: fixed attributes and fields plus dynamic repeated children
//! - **Variant dispatch**: one `mode` attribute selects the motion kind, `multi` nests them
//! - **Reference manual**: LaTeX and XML documentation from schema metadata
//!
//! # Quick Start
//!
//! ```bash
//! # Validate a motion document
//! simput check motion.xml
//!
//! # Normalize it through store/write
//! simput roundtrip motion.xml -o normalized.xml
//!
//! # Render the manual
//! simput manual --format latex --cross-ref -o motion.tex
//! ```
//!
//! # Configuration File
//!
//! ```toml
//! dispatch = "strict"
//! log_level = "debug"
//!
//! [manual]
//! format = "xml"
//! stop_level = 2
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod inputs;
pub mod loader;
pub mod manual;
pub mod units;
pub mod value;
pub mod xml;

pub use config::{ConfigError, DispatchPolicy, ManualConfig, ManualFormat, SimputConfig};
pub use engine::{Motion, MotionMode};
pub use error::{InputError, ItemKind, Result};
pub use input::{Input, InputArray, InputValue, Node, NodeSpec};
pub use inputs::InputMotion;
pub use loader::{load_motion_file, load_motion_str, write_motion};
pub use xml::XmlNode;

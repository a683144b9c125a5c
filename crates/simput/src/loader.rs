// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Motion document loading and writing.
//!
//! Reads a `<motion>` document into a [`Motion`] and writes one back.
//!
//! # Example
//!
//! ```rust
//! use simput::config::DispatchPolicy;
//! use simput::loader::{load_motion_str, write_motion};
//!
//! let motion = load_motion_str(
//!     "<motion mode='minimize'><optimizer mode='bfgs'/></motion>",
//!     DispatchPolicy::Lenient,
//! )?;
//! assert!(write_motion(&motion)?.starts_with("<motion mode='minimize'>"));
//! # Ok::<(), simput::InputError>(())
//! ```

use crate::config::DispatchPolicy;
use crate::engine::Motion;
use crate::error::{InputError, Result};
use crate::input::{Input, Node, NodeSpec};
use crate::inputs::{InputMotion, MOTION_TAG};
use crate::xml::XmlNode;
use std::path::Path;
use tracing::{debug, info};

fn motion_node(policy: DispatchPolicy) -> Result<InputMotion> {
    Ok(InputMotion::new(NodeSpec::new())?.with_policy(policy))
}

/// Parse a motion document held in memory.
pub fn load_motion_str(content: &str, policy: DispatchPolicy) -> Result<Motion> {
    let root = XmlNode::parse_str(content)?;
    if root.name != MOTION_TAG {
        return Err(InputError::UnrecognizedTag {
            tag: root.name,
            node: "document".into(),
        });
    }

    let mut node = motion_node(policy)?;
    node.parse(&root)?;
    let motion = node.fetch()?;
    debug!(mode = %motion.mode(), "motion loaded");
    Ok(motion)
}

/// Parse a motion document from disk.
///
/// Every failure is reported with the offending path attached.
pub fn load_motion_file<P: AsRef<Path>>(path: P, policy: DispatchPolicy) -> Result<Motion> {
    let path = path.as_ref();
    info!("Loading motion from {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| InputError::from(e).in_file(path))?;
    load_motion_str(&content, policy).map_err(|e| e.in_file(path))
}

/// Store `motion` in a fresh schema and write it as a `<motion>` document.
pub fn write_motion(motion: &Motion) -> Result<String> {
    let mut node = motion_node(DispatchPolicy::default())?;
    node.store(motion)?;
    node.write(MOTION_TAG, "")
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error taxonomy for schema nodes.
//!
//! Every variant is raised at the point of detection and propagated to the
//! caller untouched. Only the loading layer adds context (see [`InputError::Context`]).

use std::path::PathBuf;
use thiserror::Error;

/// Which part of a composite a missing item was declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Attribute,
    Field,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemKind::Attribute => write!(f, "Attribute"),
            ItemKind::Field => write!(f, "Field"),
        }
    }
}

/// Errors raised while parsing, storing, fetching or writing schema nodes.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Cannot convert '{text}' to {type_name}")]
    TypeConversion {
        type_name: &'static str,
        text: String,
    },

    #[error("Uninitialized input value of type {type_name}")]
    MissingValue { type_name: &'static str },

    #[error("'{value}' is not a valid option ({options})")]
    InvalidOption { value: String, options: String },

    #[error("Attribute name '{attribute}' is not a recognized property of '{node}' objects")]
    UnrecognizedAttribute { attribute: String, node: String },

    #[error("Tag name '{tag}' is not a recognized property of '{node}' objects")]
    UnrecognizedTag { tag: String, node: String },

    #[error("{kind} name '{name}' is mandatory and was not found in the input for the property {node}")]
    MissingField {
        kind: ItemKind,
        name: String,
        node: String,
    },

    #[error("Cannot store object of kind '{kind}'")]
    UnsupportedKind { kind: String },

    #[error("Array shape {shape:?} does not match {len} stored elements")]
    MalformedArrayShape { shape: Vec<usize>, len: usize },

    #[error("Unknown unit '{unit}' for dimension '{dimension}'")]
    UnknownUnit { dimension: String, unit: String },

    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{}: {source}", .path.display())]
    Context {
        path: PathBuf,
        #[source]
        source: Box<InputError>,
    },
}

impl InputError {
    /// Build a conversion error for `text` that failed to read as `type_name`.
    pub fn conversion(type_name: &'static str, text: impl Into<String>) -> Self {
        Self::TypeConversion {
            type_name,
            text: text.into(),
        }
    }

    /// Wrap this error with the file it was raised for.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        Self::Context {
            path: path.into(),
            source: Box::new(self),
        }
    }

    /// Innermost error, skipping any [`InputError::Context`] layers.
    pub fn root_cause(&self) -> &InputError {
        match self {
            Self::Context { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, InputError>;

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Scalar element types understood by leaf nodes, and the shaped array value.

use crate::error::{InputError, Result};
use crate::units::{unit_to_internal, unit_to_user};
use std::fmt::Debug;

/// A type that can live inside a scalar or array leaf.
pub trait ValueType: Clone + PartialEq + Debug + 'static {
    /// Name shown in error messages and in the manual.
    const TYPE_NAME: &'static str;

    /// Read a value from its text form.
    fn read(text: &str) -> Result<Self>;

    /// Text form of the value. `read(&v.write()) == v` must hold.
    fn write(&self) -> String;

    /// Empty values are not written out at all.
    fn is_empty_value(&self) -> bool {
        false
    }

    /// Fails if the value would not read back unchanged from a tag body.
    fn check_text(&self) -> Result<()> {
        Ok(())
    }

    /// Fails if the value would not read back unchanged as one item of a
    /// `[ a, b ]` list.
    fn check_item(&self) -> Result<()> {
        self.check_text()
    }

    /// Convert from user `units` of `dimension` to internal units.
    /// Only floating-point values carry units; other types pass through.
    fn to_internal(&self, _dimension: &str, _units: &str) -> Result<Self> {
        Ok(self.clone())
    }

    /// Convert from internal units to user `units` of `dimension`.
    fn to_user(&self, _dimension: &str, _units: &str) -> Result<Self> {
        Ok(self.clone())
    }
}

impl ValueType for bool {
    const TYPE_NAME: &'static str = "bool";

    fn read(text: &str) -> Result<Self> {
        match text.trim().to_uppercase().as_str() {
            "TRUE" | "T" | "1" => Ok(true),
            "FALSE" | "F" | "0" => Ok(false),
            _ => Err(InputError::conversion(Self::TYPE_NAME, text.trim())),
        }
    }

    fn write(&self) -> String {
        let text = if *self { "True" } else { "False" };
        text.to_string()
    }
}

impl ValueType for i64 {
    const TYPE_NAME: &'static str = "int";

    fn read(text: &str) -> Result<Self> {
        text.trim()
            .parse::<i64>()
            .map_err(|_| InputError::conversion(Self::TYPE_NAME, text.trim()))
    }

    fn write(&self) -> String {
        self.to_string()
    }
}

impl ValueType for f64 {
    const TYPE_NAME: &'static str = "float";

    fn read(text: &str) -> Result<Self> {
        // Fortran-style exponents ("1.0d-3") show up in hand-written inputs.
        let t = text.trim().replace(|c: char| c == 'd' || c == 'D', "e");
        t.parse::<f64>()
            .map_err(|_| InputError::conversion(Self::TYPE_NAME, text.trim()))
    }

    fn write(&self) -> String {
        // {:?} keeps enough digits to read back the identical value.
        format!("{:?}", self)
    }

    fn to_internal(&self, dimension: &str, units: &str) -> Result<Self> {
        unit_to_internal(dimension, units, *self)
    }

    fn to_user(&self, dimension: &str, units: &str) -> Result<Self> {
        unit_to_user(dimension, units, *self)
    }
}

impl ValueType for String {
    const TYPE_NAME: &'static str = "string";

    fn read(text: &str) -> Result<Self> {
        Ok(text.trim().to_string())
    }

    fn write(&self) -> String {
        self.clone()
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }

    /// Tag bodies are trimmed on read.
    fn check_text(&self) -> Result<()> {
        if self.trim() != self {
            return Err(InputError::conversion(Self::TYPE_NAME, self.as_str()));
        }
        Ok(())
    }

    /// List items are split on commas and empty items are dropped.
    fn check_item(&self) -> Result<()> {
        self.check_text()?;
        if self.is_empty() || self.contains(',') {
            return Err(InputError::conversion(Self::TYPE_NAME, self.as_str()));
        }
        Ok(())
    }
}

/// Tuples of sizes, as used for array shapes.
impl ValueType for Vec<usize> {
    const TYPE_NAME: &'static str = "tuple";

    fn read(text: &str) -> Result<Self> {
        let t = text.trim();
        let inner = t
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .unwrap_or(t);
        inner
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<usize>()
                    .map_err(|_| InputError::conversion(Self::TYPE_NAME, t))
            })
            .collect()
    }

    fn write(&self) -> String {
        let parts: Vec<String> = self.iter().map(ToString::to_string).collect();
        if parts.len() == 1 {
            format!("({},)", parts[0])
        } else {
            format!("({})", parts.join(", "))
        }
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

/// Read a bracketed, comma separated list: `[ 1, 2, 3 ]`.
///
/// Brackets are optional. `[ ]` yields an empty list.
pub fn read_list<T: ValueType>(text: &str) -> Result<Vec<T>> {
    let t = text.trim();
    let inner = t
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(t);
    inner
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(T::read)
        .collect()
}

/// A flattened array together with its shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayValue<T> {
    shape: Vec<usize>,
    data: Vec<T>,
}

impl<T: Clone> ArrayValue<T> {
    /// One-dimensional array over `data`.
    pub fn from_vec(data: Vec<T>) -> Self {
        Self {
            shape: vec![data.len()],
            data,
        }
    }

    /// Array with an explicit shape; the element count must match.
    pub fn from_shape_vec(shape: Vec<usize>, data: Vec<T>) -> Result<Self> {
        if shape.iter().product::<usize>() != data.len() {
            return Err(InputError::MalformedArrayShape {
                shape,
                len: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Zero-length array with shape `(0,)`.
    pub fn empty() -> Self {
        Self::from_vec(Vec::new())
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Element at a multi-dimensional index (row-major).
    pub fn get(&self, index: &[usize]) -> Option<&T> {
        if index.len() != self.shape.len() {
            return None;
        }
        let mut flat = 0;
        for (i, n) in index.iter().zip(&self.shape) {
            if i >= n {
                return None;
            }
            flat = flat * n + i;
        }
        self.data.get(flat)
    }

    pub(crate) fn try_map<F: Fn(&T) -> Result<T>>(&self, f: F) -> Result<Self> {
        Ok(Self {
            shape: self.shape.clone(),
            data: self.data.iter().map(f).collect::<Result<Vec<T>>>()?,
        })
    }
}

impl<T: Clone> Default for ArrayValue<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: Clone> From<Vec<T>> for ArrayValue<T> {
    fn from(data: Vec<T>) -> Self {
        Self::from_vec(data)
    }
}

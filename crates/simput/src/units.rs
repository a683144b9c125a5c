// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Unit conversion table.
//!
//! Internal values are atomic units. Each dimension maps a lowercase unit
//! name to the factor that converts one user unit into atomic units.
//! Unit names may carry an SI prefix (`femtosecond`, `nanometer`, ...).

use crate::error::{InputError, Result};

/// Dimension name of values that carry no unit.
pub const UNDEFINED: &str = "undefined";

const DIMENSIONLESS: &[(&str, f64)] = &[];

const ENERGY: &[(&str, f64)] = &[
    ("atomic_unit", 1.0),
    ("electronvolt", 0.036749326),
    ("j/mol", 0.00000038087989),
    ("cal/mol", 0.0000015946679),
    ("kelvin", 3.1668152e-06),
];

const TEMPERATURE: &[(&str, f64)] = &[("atomic_unit", 1.0), ("kelvin", 3.1668152e-06)];

const TIME: &[(&str, f64)] = &[("atomic_unit", 1.0), ("second", 4.1341373e+16)];

const LENGTH: &[(&str, f64)] = &[
    ("atomic_unit", 1.0),
    ("angstrom", 1.8897261),
    ("meter", 1.8897261e+10),
];

const MASS: &[(&str, f64)] = &[
    ("atomic_unit", 1.0),
    ("dalton", 1.8228885e+3),
    ("electronmass", 1.0),
];

const FORCE: &[(&str, f64)] = &[
    ("atomic_unit", 1.0),
    ("newton", 12137805.0),
    ("ev/ang", 0.019446904),
];

const PRESSURE: &[(&str, f64)] = &[
    ("atomic_unit", 1.0),
    ("bar", 3.398827377e-09),
    ("atmosphere", 3.44386184e-09),
    ("pascal", 3.398827377e-14),
    ("ev/ang3", 0.0054456877),
];

const FREQUENCY: &[(&str, f64)] = &[
    ("atomic_unit", 1.0),
    ("inversecm", 4.5563353e-06),
    ("hertz", 1.5198298e-16),
];

const PREFIXES: &[(&str, f64)] = &[
    ("femto", 1e-15),
    ("pico", 1e-12),
    ("nano", 1e-9),
    ("micro", 1e-6),
    ("milli", 1e-3),
    ("centi", 1e-2),
    ("kilo", 1e3),
    ("mega", 1e6),
    ("giga", 1e9),
];

fn table(dimension: &str) -> Option<&'static [(&'static str, f64)]> {
    match dimension {
        UNDEFINED => Some(DIMENSIONLESS),
        "energy" => Some(ENERGY),
        "temperature" => Some(TEMPERATURE),
        "time" => Some(TIME),
        "length" => Some(LENGTH),
        "mass" => Some(MASS),
        "force" => Some(FORCE),
        "pressure" => Some(PRESSURE),
        "frequency" => Some(FREQUENCY),
        _ => None,
    }
}

/// Factor converting one `unit` of `dimension` into atomic units.
pub fn unit_factor(dimension: &str, unit: &str) -> Result<f64> {
    let unknown = || InputError::UnknownUnit {
        dimension: dimension.to_string(),
        unit: unit.to_string(),
    };

    let entries = table(dimension).ok_or_else(unknown)?;
    let unit = unit.trim().to_lowercase();
    if unit.is_empty() {
        return Ok(1.0);
    }

    let lookup = |name: &str| entries.iter().find(|(n, _)| *n == name).map(|(_, f)| *f);

    if let Some(f) = lookup(&unit) {
        return Ok(f);
    }

    for (prefix, scale) in PREFIXES {
        if let Some(base) = unit.strip_prefix(prefix) {
            if let Some(f) = lookup(base) {
                return Ok(scale * f);
            }
        }
    }

    Err(unknown())
}

/// Convert `value` expressed in `unit` to atomic units.
pub fn unit_to_internal(dimension: &str, unit: &str, value: f64) -> Result<f64> {
    Ok(value * unit_factor(dimension, unit)?)
}

/// Convert an atomic-unit `value` to `unit`.
pub fn unit_to_user(dimension: &str, unit: &str, value: f64) -> Result<f64> {
    Ok(value / unit_factor(dimension, unit)?)
}

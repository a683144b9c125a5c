// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Leaf behavior through the public API: defaults, options, units and
// array shapes, each exercised through store/fetch and parse/write.

#![allow(clippy::float_cmp)]

use simput::engine::GeopOptions;
use simput::input::{Input, InputArray, InputDefault, InputValue, Node, NodeSpec};
use simput::inputs::InputGeop;
use simput::units::unit_to_internal;
use simput::value::ArrayValue;
use simput::{InputError, XmlNode};

fn reparse<N: Node>(node: &mut N, text: &str) {
    let xml = XmlNode::parse_str(text).expect("written text is valid xml");
    node.parse(&xml).expect("reparse");
}

#[test]
fn test_zero_value_counts_as_explicit() {
    let mut count = InputValue::<i64>::new(NodeSpec::new().help("Mandatory count.")).expect("build");
    assert!(!count.is_explicit());
    assert!(count.check().is_err());

    count.parse_text("0").expect("parse");
    assert!(count.is_explicit());
    count.check().expect("explicit zero satisfies check");
    assert_eq!(count.fetch().expect("fetch"), 0);
}

#[test]
fn test_option_whitelist() {
    let options = || vec!["xyz".to_string(), "pdb".to_string()];

    let err = InputValue::with_options(NodeSpec::new().default("chk".to_string()), options())
        .unwrap_err();
    assert!(matches!(err, InputError::InvalidOption { ref value, .. } if value == "chk"));

    let mut mode =
        InputValue::with_options(NodeSpec::new().default("xyz".to_string()), options()).expect("build");
    assert!(mode.store(&"gro".to_string()).is_err());
    mode.store(&"pdb".to_string()).expect("listed option");

    let text = mode.write("mode", "").expect("write");
    let mut back =
        InputValue::with_options(NodeSpec::new().default("xyz".to_string()), options()).expect("build");
    reparse(&mut back, &text);
    assert_eq!(back.fetch().expect("fetch"), "pdb");
}

#[test]
fn test_empty_string_is_omitted_and_restored() {
    let spec = || NodeSpec::new().default(String::new());
    let mut prefix = InputValue::<String>::new(spec()).expect("build");
    prefix.store(&String::new()).expect("store");
    assert_eq!(prefix.write("prefix", "").expect("write"), "");

    let fresh = InputValue::<String>::new(spec()).expect("build");
    assert_eq!(fresh.fetch().expect("fetch"), "");
}

#[test]
fn test_length_in_angstrom() {
    let spec = || NodeSpec::new().dimension("length").units("angstrom");
    let mut step = InputValue::<f64>::new(spec()).expect("build");
    step.store(&1.0).expect("store");

    let internal = unit_to_internal("length", "angstrom", 1.0).expect("known unit");
    assert_eq!(step.fetch().expect("fetch"), internal);

    let text = step.write("max_step", "").expect("write");
    assert!(text.contains("units='angstrom'"));

    let mut back = InputValue::<f64>::new(NodeSpec::new().dimension("length")).expect("build");
    reparse(&mut back, &text);
    assert!((back.fetch().expect("fetch") - internal).abs() < 1e-12);
}

#[test]
fn test_unknown_unit_fails_on_fetch() {
    let mut step = InputValue::<f64>::new(NodeSpec::new().dimension("length")).expect("build");
    reparse(&mut step, "<max_step units='furlong'>1.0</max_step>");
    assert!(matches!(
        step.fetch(),
        Err(InputError::UnknownUnit { ref unit, .. }) if unit == "furlong"
    ));
}

#[test]
fn test_store_records_array_shape() {
    let mut matrix = InputArray::<f64>::new(NodeSpec::new().default(Vec::<f64>::new())).expect("build");
    assert_eq!(matrix.shape().expect("shape"), vec![0]);

    let value = ArrayValue::from_shape_vec(vec![2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
        .expect("consistent shape");
    matrix.store(&value).expect("store");
    assert_eq!(matrix.shape().expect("shape"), vec![2, 3]);

    let text = matrix.write("dynmat", "").expect("write");
    assert!(text.starts_with("<dynmat shape='(2, 3)'>"));

    let mut back = InputArray::<f64>::new(NodeSpec::new().default(Vec::<f64>::new())).expect("build");
    reparse(&mut back, &text);
    assert_eq!(back.fetch().expect("fetch"), value);
}

#[test]
fn test_inconsistent_shape_attribute() {
    let mut matrix = InputArray::<f64>::new(NodeSpec::new().default(Vec::<f64>::new())).expect("build");
    let xml = XmlNode::parse_str("<dynmat shape='(2, 2)'>[ 1.0, 2.0, 3.0 ]</dynmat>").expect("xml");
    assert!(matches!(
        matrix.parse(&xml),
        Err(InputError::MalformedArrayShape { len: 3, .. })
    ));
}

#[test]
fn test_empty_array_is_omitted_and_restored() {
    let spec = || NodeSpec::new().default(Vec::<i64>::new());
    let mut atoms = InputArray::<i64>::new(spec()).expect("build");
    atoms.store(&ArrayValue::empty()).expect("store");
    assert_eq!(atoms.write("fixatoms", "").expect("write"), "");

    let fresh = InputArray::<i64>::new(spec()).expect("build");
    assert!(fresh.fetch().expect("fetch").is_empty());
}

#[test]
fn test_defaulted_composites_are_independent() {
    let spec = NodeSpec::new().deferred(InputDefault::new(GeopOptions::default));
    let mut first = InputGeop::new(spec.clone()).expect("build");
    let second = InputGeop::new(spec).expect("build");

    reparse(
        &mut first,
        "<optimizer mode='cg'><tolerances><energy>0.5</energy></tolerances></optimizer>",
    );

    let changed = first.fetch().expect("fetch");
    assert_eq!(changed.mode, "cg");
    assert_eq!(changed.tolerances.energy, 0.5);

    let untouched = second.fetch().expect("fetch");
    assert_eq!(untouched, GeopOptions::default());
    assert!(!second.is_explicit());
}

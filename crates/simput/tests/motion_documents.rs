// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// End-to-end motion documents: dispatch on the mode attribute, nested
// multi motions, rejection of unknown content, and file loading.

use simput::engine::{
    Dynamics, DynamicsOptions, GeopMotion, GeopOptions, InitFile, MultiMotion, Replay,
};
use simput::{
    load_motion_file, load_motion_str, write_motion, DispatchPolicy, InputError, ItemKind, Motion,
    MotionMode, XmlNode,
};
use std::io::Write;

fn replay_then_minimize() -> Motion {
    Motion::Multi(MultiMotion::new(vec![
        Motion::Replay(Replay::new(InitFile::xyz("in.xyz"))),
        Motion::Minimize(GeopMotion::new(false, vec![3, 7], GeopOptions::default())),
    ]))
}

#[test]
fn test_multi_motion_keeps_child_order() {
    let motion = replay_then_minimize();
    let text = write_motion(&motion).expect("write");

    let root = XmlNode::parse_str(&text).expect("valid xml");
    assert_eq!(root.attribute("mode"), Some("multi"));
    let modes: Vec<&str> = root
        .children()
        .filter(|(tag, _)| *tag == "motion")
        .filter_map(|(_, child)| child.attribute("mode"))
        .collect();
    assert_eq!(modes, ["replay", "minimize"]);

    let back = load_motion_str(&text, DispatchPolicy::Lenient).expect("load");
    let Motion::Multi(multi) = &back else {
        panic!("expected multi, got {back:?}");
    };
    assert_eq!(multi.motionlist.len(), 2);
    let Motion::Replay(replay) = &multi.motionlist[0] else {
        panic!("expected replay first");
    };
    assert_eq!(replay.intraj.filename, "in.xyz");
    let Motion::Minimize(geop) = &multi.motionlist[1] else {
        panic!("expected minimize second");
    };
    assert!(!geop.fixcom);
    assert_eq!(geop.fixatoms, vec![3, 7]);
    assert_eq!(back, motion);
}

#[test]
fn test_multi_motion_text() {
    let expected = "\
<motion mode='multi'>
  <fixcom>True</fixcom>
  <motion mode='replay'>
    <fixcom>True</fixcom>
    <file mode='xyz'>in.xyz</file>
  </motion>
  <motion mode='minimize'>
    <fixcom>False</fixcom>
    <fixatoms shape='(2,)'> [ 3, 7 ] </fixatoms>
    <optimizer mode='lbfgs'>
      <max_step>100.0</max_step>
      <corrections>5</corrections>
      <tolerances>
        <energy>1e-6</energy>
        <force>1e-5</force>
        <position>0.001</position>
      </tolerances>
    </optimizer>
  </motion>
</motion>
";
    assert_eq!(write_motion(&replay_then_minimize()).expect("write"), expected);
}

#[test]
fn test_hand_written_multi_document() {
    let motion = load_motion_str(
        "<motion mode='multi'>
           <motion mode='dynamics'>
             <dynamics mode='nvt'>
               <timestep units='femtosecond'>0.5</timestep>
             </dynamics>
           </motion>
           <motion mode='replay'>
             <file mode='pdb'>traj.pdb</file>
           </motion>
         </motion>",
        DispatchPolicy::Strict,
    )
    .expect("load");

    let Motion::Multi(multi) = motion else {
        panic!("expected multi");
    };
    let modes: Vec<MotionMode> = multi.motionlist.iter().map(Motion::mode).collect();
    assert_eq!(modes, [MotionMode::Dynamics, MotionMode::Replay]);

    let Motion::Dynamics(dynamics) = &multi.motionlist[0] else {
        panic!("expected dynamics");
    };
    assert_eq!(dynamics.options.mode, "nvt");
    assert!(dynamics.options.timestep > 0.5);
}

#[test]
fn test_unknown_child_tag_names_tag_and_node() {
    let err = load_motion_str(
        "<motion mode='dynamics'><thermostat mode='langevin'/></motion>",
        DispatchPolicy::Lenient,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        InputError::UnrecognizedTag { ref tag, ref node } if tag == "thermostat" && node == "motion"
    ));
}

#[test]
fn test_missing_mode_attribute() {
    let err = load_motion_str("<motion><fixcom>True</fixcom></motion>", DispatchPolicy::Lenient)
        .unwrap_err();
    assert!(matches!(
        err,
        InputError::MissingField { kind: ItemKind::Attribute, ref name, .. } if name == "mode"
    ));
}

#[test]
fn test_dummy_follows_dispatch_policy() {
    let doc = "<motion mode='dummy'/>";
    assert_eq!(
        load_motion_str(doc, DispatchPolicy::Lenient).expect("lenient"),
        Motion::Dummy
    );
    assert!(matches!(
        load_motion_str(doc, DispatchPolicy::Strict),
        Err(InputError::UnsupportedKind { ref kind }) if kind == "dummy"
    ));
}

#[test]
fn test_nested_multi_cannot_be_stored() {
    let nested = Motion::Multi(MultiMotion::new(vec![Motion::Multi(MultiMotion::default())]));
    assert!(matches!(
        write_motion(&nested),
        Err(InputError::UnsupportedKind { ref kind }) if kind == "multi"
    ));
}

#[test]
fn test_single_motion_round_trip() {
    let motion = Motion::Dynamics(Dynamics::new(
        true,
        vec![0],
        DynamicsOptions {
            mode: "nve".into(),
            timestep: 41.341,
            nmts: vec![1, 4],
            splitting: "baoab".into(),
        },
    ));
    let text = write_motion(&motion).expect("write");
    assert!(text.contains("<nmts shape='(2,)'> [ 1, 4 ] </nmts>"));
    assert_eq!(load_motion_str(&text, DispatchPolicy::Strict).expect("load"), motion);
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    file.write_all(write_motion(&replay_then_minimize()).expect("write").as_bytes())
        .expect("write file");

    let loaded = load_motion_file(file.path(), DispatchPolicy::Lenient).expect("load");
    assert_eq!(loaded, replay_then_minimize());
}

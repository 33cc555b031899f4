// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::collections::{BTreeMap, BTreeSet};

use hifitime::Epoch;
use ndarray::prelude::*;
use vec1::{vec1, Vec1};

use super::*;
use crate::context::{Antenna, Field, MeasurementSet};

fn alma_ms() -> MeasurementSet {
    let antennas = (0..4)
        .map(|id| Antenna {
            id,
            name: format!("DA4{}", id + 1),
        })
        .collect();
    let fields = vec![
        Field {
            name: "M100".to_string(),
            intents: [Intent::Bandpass, Intent::Phase].into_iter().collect(),
        },
        Field {
            name: "NGC1333".to_string(),
            intents: [Intent::Target].into_iter().collect(),
        },
    ];
    MeasurementSet::new("alma.ms".to_string(), antennas, fields, None)
}

fn cmd(antenna: &str, field: &str, intent: Option<&str>, spw: usize) -> FlagCmd {
    FlagCmd {
        antenna: Some(antenna.to_string()),
        field: Some(field.to_string()),
        intent: intent.map(String::from),
        spw: Some(spw),
        time: None,
    }
}

#[test]
fn test_flagcmds_classification() {
    let ms = alma_ms();
    let cmds = [
        cmd("1", "M100", Some("CALIBRATE_PHASE#ON_SOURCE"), 0),
        cmd("1", "M100", Some("CALIBRATE_PHASE#ON_SOURCE"), 1),
        cmd("2", "M100", None, 0),
    ];

    let fully_flagged = from_flagcmds(&ms, &cmds).unwrap();
    assert_eq!(fully_flagged.len(), 2);
    let expected: BTreeSet<FieldIntentSpw> = [
        FieldIntentSpw {
            field: "M100".to_string(),
            intent: Some(Intent::Phase),
            spw: 0,
        },
        FieldIntentSpw {
            field: "M100".to_string(),
            intent: Some(Intent::Phase),
            spw: 1,
        },
    ]
    .into_iter()
    .collect();
    assert_eq!(fully_flagged["DA42"], expected);
    // An intent-agnostic command keeps a null intent.
    let expected: BTreeSet<FieldIntentSpw> = [FieldIntentSpw {
        field: "M100".to_string(),
        intent: None,
        spw: 0,
    }]
    .into_iter()
    .collect();
    assert_eq!(fully_flagged["DA43"], expected);
}

#[test]
fn test_flagcmds_classification_is_idempotent() {
    let ms = alma_ms();
    let cmds = [
        cmd("0", "M100", Some("CALIBRATE_BANDPASS#ON_SOURCE"), 3),
        cmd("1", "NGC1333", Some("OBSERVE_TARGET#ON_SOURCE"), 2),
        // A duplicate command folds into set semantics.
        cmd("0", "M100", Some("CALIBRATE_BANDPASS#ON_SOURCE"), 3),
    ];

    let first = from_flagcmds(&ms, &cmds).unwrap();
    let second = from_flagcmds(&ms, &cmds).unwrap();
    assert_eq!(first, second);
    assert_eq!(first["DA41"].len(), 1);
}

#[test]
fn test_flagcmds_skip_rules() {
    let ms = alma_ms();

    // No antenna.
    let no_antenna = FlagCmd {
        field: Some("M100".to_string()),
        spw: Some(0),
        ..Default::default()
    };
    // A baseline pair, not a single antenna.
    let baseline = cmd("0&1", "M100", None, 0);
    // Time-restricted.
    let timed = FlagCmd {
        time: Some(Epoch::from_gpst_seconds(1090008640.0)),
        ..cmd("0", "M100", None, 0)
    };
    // No field or no spw: not a (field, intent, spw) slice.
    let no_field = FlagCmd {
        antenna: Some("0".to_string()),
        spw: Some(0),
        ..Default::default()
    };
    let no_spw = FlagCmd {
        antenna: Some("0".to_string()),
        field: Some("M100".to_string()),
        ..Default::default()
    };

    let fully_flagged =
        from_flagcmds(&ms, &[no_antenna, baseline, timed, no_field, no_spw]).unwrap();
    assert!(fully_flagged.is_empty());
}

#[test]
fn test_flagcmds_unknown_antenna_propagates() {
    let ms = alma_ms();
    let result = from_flagcmds(&ms, &[cmd("17", "M100", None, 0)]);
    assert!(matches!(
        result,
        Err(FlagClassifyError::Context(
            crate::context::ContextError::UnknownAntenna(17)
        ))
    ));
}

/// Three scans on field M100; an antenna must be flagged in all three before
/// it counts as fully flagged for (M100, intent, 5).
#[test]
fn test_flagviews_require_every_scan_flagged() {
    let ms = alma_ms();
    let scan_to_fields: BTreeMap<usize, Vec1<String>> = [
        (10, vec1!["M100".to_string()]),
        (11, vec1!["M100".to_string()]),
        (12, vec1!["M100".to_string()]),
    ]
    .into_iter()
    .collect();

    // DA42 (row 1) is flagged in only two of three scans; DA44 (row 3) in all
    // three.
    let flags = array![
        [false, false, false],
        [true, true, false],
        [false, false, false],
        [true, true, true],
    ];
    let view = FlagView::new(5, vec1![10, 11, 12], flags).unwrap();

    let bandpass_only: BTreeSet<Intent> = [Intent::Bandpass].into_iter().collect();
    let fully_flagged =
        from_flagviews(&ms, &[view], &scan_to_fields, Some(&bandpass_only)).unwrap();

    assert!(!fully_flagged.contains_key("DA42"));
    let expected: BTreeSet<FieldIntentSpw> = [FieldIntentSpw {
        field: "M100".to_string(),
        intent: Some(Intent::Bandpass),
        spw: 5,
    }]
    .into_iter()
    .collect();
    assert_eq!(fully_flagged["DA44"], expected);
}

#[test]
fn test_flagviews_intent_fanout_and_filter() {
    let ms = alma_ms();
    let scan_to_fields: BTreeMap<usize, Vec1<String>> =
        [(1, vec1!["M100".to_string()])].into_iter().collect();
    let flags = array![[true], [false], [false], [false]];
    let view = FlagView::new(0, vec1![1], flags).unwrap();

    // Without a filter, M100's two intents both appear.
    let fully_flagged = from_flagviews(&ms, &[view.clone()], &scan_to_fields, None).unwrap();
    let intents: Vec<Option<Intent>> = fully_flagged["DA41"].iter().map(|s| s.intent).collect();
    assert_eq!(intents, [Some(Intent::Bandpass), Some(Intent::Phase)]);

    // With a filter, only the intent of interest survives.
    let phase_only: BTreeSet<Intent> = [Intent::Phase].into_iter().collect();
    let fully_flagged = from_flagviews(&ms, &[view], &scan_to_fields, Some(&phase_only)).unwrap();
    let intents: Vec<Option<Intent>> = fully_flagged["DA41"].iter().map(|s| s.intent).collect();
    assert_eq!(intents, [Some(Intent::Phase)]);
}

/// A mosaic shares one scan across two pointings: the scan's column counts
/// towards both fields.
#[test]
fn test_flagviews_mosaic_scan_maps_to_multiple_fields() {
    let mut ms = alma_ms();
    ms.fields[1].intents = [Intent::Phase].into_iter().collect();
    let scan_to_fields: BTreeMap<usize, Vec1<String>> =
        [(7, vec1!["M100".to_string(), "NGC1333".to_string()])]
            .into_iter()
            .collect();
    let flags = array![[false], [false], [true], [false]];
    let view = FlagView::new(2, vec1![7], flags).unwrap();

    let phase_only: BTreeSet<Intent> = [Intent::Phase].into_iter().collect();
    let fully_flagged = from_flagviews(&ms, &[view], &scan_to_fields, Some(&phase_only)).unwrap();
    let fields: Vec<&str> = fully_flagged["DA43"]
        .iter()
        .map(|s| s.field.as_str())
        .collect();
    assert_eq!(fields, ["M100", "NGC1333"]);
}

#[test]
fn test_flagviews_unmapped_scan_propagates() {
    let ms = alma_ms();
    let scan_to_fields: BTreeMap<usize, Vec1<String>> =
        [(1, vec1!["M100".to_string()])].into_iter().collect();
    let flags = Array2::from_elem((4, 2), false);
    let view = FlagView::new(0, vec1![1, 2], flags).unwrap();

    let result = from_flagviews(&ms, &[view], &scan_to_fields, None);
    assert!(matches!(
        result,
        Err(FlagClassifyError::UnmappedScan { scan: 2 })
    ));
}

#[test]
fn test_flagview_shape_checks() {
    let result = FlagView::new(0, vec1![1, 2], Array2::from_elem((4, 3), false));
    assert!(matches!(
        result,
        Err(FlagClassifyError::ViewShape {
            spw: 0,
            expected: 2,
            found: 3,
        })
    ));

    let ms = alma_ms();
    let scan_to_fields: BTreeMap<usize, Vec1<String>> =
        [(1, vec1!["M100".to_string()])].into_iter().collect();
    let view = FlagView::new(0, vec1![1], Array2::from_elem((3, 1), false)).unwrap();
    let result = from_flagviews(&ms, &[view], &scan_to_fields, None);
    assert!(matches!(
        result,
        Err(FlagClassifyError::AntennaAxis {
            spw: 0,
            expected: 4,
            found: 3,
        })
    ));
}

#[test]
fn test_merge_unions_per_antenna_sets() {
    let mut first = FullyFlaggedAntennas::new();
    first.add(
        "DA41",
        FieldIntentSpw {
            field: "M100".to_string(),
            intent: Some(Intent::Phase),
            spw: 0,
        },
    );
    let mut second = FullyFlaggedAntennas::new();
    second.add(
        "DA41",
        FieldIntentSpw {
            field: "M100".to_string(),
            intent: Some(Intent::Phase),
            spw: 1,
        },
    );
    second.add(
        "DA42",
        FieldIntentSpw {
            field: "M100".to_string(),
            intent: None,
            spw: 0,
        },
    );

    first.merge(second);
    assert_eq!(first.len(), 2);
    assert_eq!(first["DA41"].len(), 2);
    assert_eq!(first["DA42"].len(), 1);
}

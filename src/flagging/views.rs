// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Classifying fully flagged antennas from flagging views.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use ndarray::prelude::*;
use vec1::Vec1;

use super::{FieldIntentSpw, FlagClassifyError, FullyFlaggedAntennas};
use crate::{context::MeasurementSet, intent::Intent};

/// A flagging view: the final 2-D flag state an upstream calibration or
/// flagging task produced for one spectral window.
#[derive(Debug, Clone)]
pub struct FlagView {
    pub spw: usize,

    /// The scan IDs labelling the scan axis, in axis order.
    pub scans: Vec1<usize>,

    /// The flags, shaped (antenna, scan). The antenna axis follows the order
    /// of the MS's antenna list.
    pub flags: Array2<bool>,
}

impl FlagView {
    /// Create a [`FlagView`], checking that the scan labels match the scan
    /// axis.
    pub fn new(
        spw: usize,
        scans: Vec1<usize>,
        flags: Array2<bool>,
    ) -> Result<FlagView, FlagClassifyError> {
        if scans.len() != flags.ncols() {
            return Err(FlagClassifyError::ViewShape {
                spw,
                expected: scans.len(),
                found: flags.ncols(),
            });
        }
        Ok(FlagView { spw, scans, flags })
    }
}

/// Scan a set of flagging views and collect, per antenna, the (field, intent,
/// spw) slices in which that antenna is flagged in *every* scan associated
/// with the slice.
///
/// `scan_to_fields` maps a scan ID to the field(s) observed during it (a
/// mosaic can share a scan across pointings); a scan the map doesn't know is
/// a contract violation and propagates. If `intents_of_interest` is given,
/// only those canonical intents are considered.
pub fn from_flagviews(
    ms: &MeasurementSet,
    views: &[FlagView],
    scan_to_fields: &BTreeMap<usize, Vec1<String>>,
    intents_of_interest: Option<&BTreeSet<Intent>>,
) -> Result<FullyFlaggedAntennas, FlagClassifyError> {
    // Accumulate the per-scan flag columns contributing to each slice. Only
    // slices that actually receive columns can later be declared fully
    // flagged; "no data inspected" never counts as "flagged".
    let mut accumulated: BTreeMap<FieldIntentSpw, Vec<ArrayView1<bool>>> = BTreeMap::new();

    for view in views {
        if view.flags.nrows() != ms.antennas.len() {
            return Err(FlagClassifyError::AntennaAxis {
                spw: view.spw,
                expected: ms.antennas.len(),
                found: view.flags.nrows(),
            });
        }

        for (i_scan, scan) in view.scans.iter().enumerate() {
            let fields = scan_to_fields
                .get(scan)
                .ok_or(FlagClassifyError::UnmappedScan { scan: *scan })?;

            for field in fields.iter() {
                let intents = ms
                    .intents_for_field(field)
                    .ok_or_else(|| FlagClassifyError::UnknownField(field.clone()))?;
                for intent in intents {
                    if let Some(of_interest) = intents_of_interest {
                        if !of_interest.contains(intent) {
                            continue;
                        }
                    }
                    accumulated
                        .entry(FieldIntentSpw {
                            field: field.clone(),
                            intent: Some(*intent),
                            spw: view.spw,
                        })
                        .or_default()
                        .push(view.flags.column(i_scan));
                }
            }
        }
    }

    // An antenna is fully flagged for a slice only if every contributing scan
    // flags it: AND-reduce the columns.
    let mut fully_flagged = FullyFlaggedAntennas::new();
    for (slice, columns) in accumulated {
        let mut columns = columns.into_iter();
        let Some(first) = columns.next() else {
            continue;
        };
        let mut reduced = first.to_owned();
        for column in columns {
            reduced.zip_mut_with(&column, |acc, &flagged| *acc &= flagged);
        }

        for (i_antenna, &flagged) in reduced.iter().enumerate() {
            if flagged {
                fully_flagged.add(ms.antennas[i_antenna].name.clone(), slice.clone());
            }
        }
    }

    debug!(
        "{}: {} flagging views yielded {} fully flagged antennas",
        ms.name,
        views.len(),
        fully_flagged.len()
    );
    Ok(fully_flagged)
}

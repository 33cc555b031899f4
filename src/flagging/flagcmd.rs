// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Classifying fully flagged antennas from flat flagging commands.

use hifitime::Epoch;
use log::{debug, trace};

use super::{FieldIntentSpw, FlagClassifyError, FullyFlaggedAntennas};
use crate::{context::MeasurementSet, intent::Intent};

/// The token separating the two antennas of a baseline in antenna selection
/// syntax.
pub const BASELINE_SEPARATOR: char = '&';

/// One flagging command, as recorded by an upstream flagging task. All
/// members are optional; a command constrains only the members it sets.
#[derive(Debug, Clone, Default)]
pub struct FlagCmd {
    /// The antenna ID in selection syntax. May encode a baseline (two IDs
    /// joined by [`BASELINE_SEPARATOR`]).
    pub antenna: Option<String>,

    pub field: Option<String>,

    /// The intent in native obs-mode syntax, untranslated.
    pub intent: Option<String>,

    pub spw: Option<usize>,

    /// A time restriction. A command with one flags an instant, not a whole
    /// slice.
    pub time: Option<Epoch>,
}

/// Scan a list of flagging commands and collect, per antenna, the (field,
/// intent, spw) slices in which that antenna was flagged outright.
///
/// Commands that apply to no single antenna (no antenna, or a baseline pair)
/// and commands with a time restriction can't assert "fully flagged" and are
/// skipped. Antenna IDs are resolved to display names by the MS; an ID the MS
/// doesn't know is a contract violation and propagates.
pub fn from_flagcmds(
    ms: &MeasurementSet,
    flagcmds: &[FlagCmd],
) -> Result<FullyFlaggedAntennas, FlagClassifyError> {
    let mut fully_flagged = FullyFlaggedAntennas::new();

    for cmd in flagcmds {
        let Some(antenna) = cmd.antenna.as_deref() else {
            trace!("Skipping flagging command with no antenna");
            continue;
        };
        if cmd.time.is_some() {
            trace!("Skipping time-restricted flagging command for antenna {antenna}");
            continue;
        }
        if antenna.contains(BASELINE_SEPARATOR) {
            trace!("Skipping baseline flagging command ({antenna})");
            continue;
        }
        let Some(field) = cmd.field.as_deref() else {
            trace!("Skipping flagging command with no field for antenna {antenna}");
            continue;
        };
        // A command without a spw doesn't name a (field, intent, spw) slice.
        let Some(spw) = cmd.spw else {
            trace!("Skipping flagging command with no spw for antenna {antenna}");
            continue;
        };

        let intent = cmd
            .intent
            .as_deref()
            .map(Intent::from_obs_mode)
            .transpose()?;
        let antenna_name = ms.antenna_name(antenna)?;

        fully_flagged.add(
            antenna_name,
            FieldIntentSpw {
                field: field.to_string(),
                intent,
                spw,
            },
        );
    }

    debug!(
        "{}: {} flagging commands yielded {} fully flagged antennas",
        ms.name,
        flagcmds.len(),
        fully_flagged.len()
    );
    Ok(fully_flagged)
}

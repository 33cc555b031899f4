// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Classifying fully flagged antennas.

An antenna is "fully flagged" for a (field, intent, spw) slice when it has no
usable data anywhere in that slice. Two upstream representations can assert
this: flat flagging commands (see [`from_flagcmds`]) and per-spw
antenna-by-scan flagging views (see [`from_flagviews`]). Both classifiers
produce the same [`FullyFlaggedAntennas`] map, which the refant decider and
the QA notification aggregator consume.
 */

mod error;
mod flagcmd;
#[cfg(test)]
mod tests;
mod views;

pub use error::FlagClassifyError;
pub use flagcmd::{from_flagcmds, FlagCmd, BASELINE_SEPARATOR};
pub use views::{from_flagviews, FlagView};

use std::{
    collections::{BTreeMap, BTreeSet},
    ops::{Deref, DerefMut},
};

use serde::Serialize;

use crate::intent::Intent;

/// A slice of a measurement set: one field, one intent, one spectral window.
///
/// The intent is `None` only for flagging commands that carry no intent
/// (commands may be intent-agnostic); flagging views always supply one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct FieldIntentSpw {
    pub field: String,
    pub intent: Option<Intent>,
    pub spw: usize,
}

/// A (field, intent, antenna) grouping key used when re-grouping
/// classifications for QA reporting.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldIntentAntenna {
    pub field: String,
    pub intent: Option<Intent>,
    pub antenna: String,
}

/// A (field, intent) grouping key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldIntent {
    pub field: String,
    pub intent: Option<Intent>,
}

/// Antenna name -> the set of (field, intent, spw) slices in which that
/// antenna is fully flagged.
///
/// Built fresh by a classifier per invocation and consumed immediately;
/// never persisted (the `Serialize` impl exists for QA report payloads). The
/// BTree containers make iteration deterministic, so everything derived from
/// this map is reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FullyFlaggedAntennas(BTreeMap<String, BTreeSet<FieldIntentSpw>>);

impl FullyFlaggedAntennas {
    pub fn new() -> FullyFlaggedAntennas {
        FullyFlaggedAntennas::default()
    }

    /// Record that `antenna` is fully flagged for `slice`.
    pub fn add(&mut self, antenna: impl Into<String>, slice: FieldIntentSpw) {
        self.0.entry(antenna.into()).or_default().insert(slice);
    }

    /// Union another map into this one. A stage that classifies both flagging
    /// commands and flagging views combines the two maps before deciding.
    pub fn merge(&mut self, other: FullyFlaggedAntennas) {
        for (antenna, slices) in other.0 {
            self.0.entry(antenna).or_default().extend(slices);
        }
    }
}

impl Deref for FullyFlaggedAntennas {
    type Target = BTreeMap<String, BTreeSet<FieldIntentSpw>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for FullyFlaggedAntennas {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

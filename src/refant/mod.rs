// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Deciding how the ranked reference-antenna list must react to fully flagged
antennas.

An antenna fully flagged for *some* slice makes a poor reference and is
demoted to the end of the ranked list; an antenna fully flagged in *all*
spectral windows under consideration for some field and intent is removed
outright. The one hard invariant: no update may leave the list empty. An
update that would is downgraded to a no-op with a warning.
 */


use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

use itertools::Itertools;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{context::MeasurementSet, flagging::FullyFlaggedAntennas, intent::Intent};

/// The decided update to a measurement set's ranked reference-antenna list.
///
/// The sets are disjoint. This is attached to the calling task's result
/// object; the MS collaborator applies it when the result is accepted (see
/// [`RefantUpdateResult::apply`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefantUpdateResult {
    /// Antennas to move to the end of the ranked list.
    pub to_demote: BTreeSet<String>,

    /// Antennas to drop from the ranked list.
    pub to_remove: BTreeSet<String>,
}

impl RefantUpdateResult {
    pub fn is_empty(&self) -> bool {
        self.to_demote.is_empty() && self.to_remove.is_empty()
    }

    /// Merge this update into the MS, via the collaborator's single mutator.
    pub fn apply(&self, ms: &mut MeasurementSet) {
        ms.update_reference_antennas(&self.to_demote, &self.to_remove);
    }
}

impl std::fmt::Display for RefantUpdateResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = String::new();
        if !self.to_remove.is_empty() {
            write!(s, "remove: {}", self.to_remove.iter().join(", "))?;
        }
        if !self.to_demote.is_empty() {
            if !s.is_empty() {
                s.push_str("; ");
            }
            write!(s, "demote: {}", self.to_demote.iter().join(", "))?;
        }
        if s.is_empty() {
            s.push_str("no change");
        }
        write!(f, "{s}")
    }
}

/// Decide which reference antennas to demote or remove, given the fully
/// flagged classifications and the full set of spw IDs under consideration.
///
/// Removal is decided before demotion, and removed antennas are excluded from
/// the demotion candidates, so an antenna is never both. Both decisions
/// degrade to a no-op (with a warning) rather than emptying the ranked list;
/// an MS without a ranked list yields an empty result.
pub fn decide_refant_update(
    ms: &MeasurementSet,
    fully_flagged: &FullyFlaggedAntennas,
    all_spw_ids: &BTreeSet<usize>,
) -> RefantUpdateResult {
    // Reduce to antenna -> the intents for which some field has the antenna
    // fully flagged in every spw under consideration.
    let mut fully_flagged_all_spws: BTreeMap<&str, BTreeSet<Option<Intent>>> = BTreeMap::new();
    for (antenna, slices) in fully_flagged.iter() {
        let mut spws_per_group: BTreeMap<(&str, Option<Intent>), BTreeSet<usize>> = BTreeMap::new();
        for slice in slices {
            spws_per_group
                .entry((slice.field.as_str(), slice.intent))
                .or_default()
                .insert(slice.spw);
        }
        let intents: BTreeSet<Option<Intent>> = spws_per_group
            .into_iter()
            .filter(|(_, spws)| spws == all_spw_ids)
            .map(|((_, intent), _)| intent)
            .collect();
        if !intents.is_empty() {
            fully_flagged_all_spws.insert(antenna, intents);
        }
    }

    let Some(refants) = ms.reference_antennas() else {
        warn!(
            "{}: no reference antenna list set; cannot update it for fully flagged antennas",
            ms.name
        );
        return RefantUpdateResult::default();
    };
    let all_refants: BTreeSet<String> = refants.iter().cloned().collect();

    // Removal first. Removing every ranked antenna would empty the list;
    // downgrade that to a no-op.
    let candidate_remove: BTreeSet<String> = refants
        .iter()
        .filter(|refant| fully_flagged_all_spws.contains_key(refant.as_str()))
        .cloned()
        .collect();
    let to_remove = if candidate_remove == all_refants {
        let affected_intents: BTreeSet<Option<Intent>> = candidate_remove
            .iter()
            .flat_map(|antenna| &fully_flagged_all_spws[antenna.as_str()])
            .copied()
            .collect();
        warn!(
            "{}: antennas {} are fully flagged in all spws for intents {}, but removing them \
             would leave no reference antennas; not removing any",
            ms.name,
            candidate_remove.iter().join(", "),
            intent_list(affected_intents),
        );
        BTreeSet::new()
    } else {
        candidate_remove
    };

    // Then demotion, excluding anything already removed.
    let candidate_demote: BTreeSet<String> = refants
        .iter()
        .filter(|refant| fully_flagged.contains_key(refant.as_str()))
        .filter(|refant| !to_remove.contains(refant.as_str()))
        .cloned()
        .collect();
    let to_demote = if candidate_demote == all_refants {
        warn!(
            "{}: antennas {} are all fully flagged for some data selection, but demoting them \
             would reorder the entire reference antenna list; not demoting any",
            ms.name,
            candidate_demote.iter().join(", "),
        );
        BTreeSet::new()
    } else {
        candidate_demote
    };

    let result = RefantUpdateResult {
        to_demote,
        to_remove,
    };
    debug!("{}: reference antenna update: {}", ms.name, result);
    result
}

fn intent_list(intents: impl IntoIterator<Item = Option<Intent>>) -> String {
    intents
        .into_iter()
        .map(|intent| match intent {
            Some(intent) => intent.to_string(),
            None => "(no intent)".to_string(),
        })
        .join(", ")
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Aggregating fully flagged antennas into notifications for QA reporting.

The per-antenna classification map is re-grouped (spw set, then antenna set,
then field) so that the QA report gets one compact line per distinct
combination instead of one line per antenna per slice. A spw set covering
every spw under consideration collapses to the "all spws" sentinel.
 */


use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use serde::Serialize;

use crate::{
    flagging::{FieldIntent, FieldIntentAntenna, FullyFlaggedAntennas},
    intent::Intent,
};

/// The spectral windows a notification covers: either every spw under
/// consideration, or an explicit sorted subset.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum SpwSelection {
    AllSpws,
    Spws(Vec<usize>),
}

impl std::fmt::Display for SpwSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpwSelection::AllSpws => write!(f, "all spws"),
            SpwSelection::Spws(spws) if spws.len() == 1 => write!(f, "spw {}", spws[0]),
            SpwSelection::Spws(spws) => write!(f, "spws {}", spws.iter().join(", ")),
        }
    }
}

/// One human-reportable notification: these antennas are fully flagged for
/// these intents on this field, over these spws. All members are sorted, so
/// identical inputs aggregate to identical notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub field: String,
    pub intents: Vec<Option<Intent>>,
    pub spws: SpwSelection,
    pub antennas: Vec<String>,
}

/// Re-group a [`FullyFlaggedAntennas`] map into a compact notification list.
///
/// Three passes, each swapping the grouping axis: (field, intent, antenna) ->
/// spw set; then per spw selection, (field, intent) -> antenna set; then per
/// (spw selection, antenna set, field), collect intents. The output order is
/// deterministic.
pub fn aggregate_notifications(
    fully_flagged: &FullyFlaggedAntennas,
    all_spw_ids: &BTreeSet<usize>,
) -> Vec<Notification> {
    // Pass 1: which spws is each (field, intent, antenna) fully flagged in?
    let mut spws_per_fia: BTreeMap<FieldIntentAntenna, BTreeSet<usize>> = BTreeMap::new();
    for (antenna, slices) in fully_flagged.iter() {
        for slice in slices {
            spws_per_fia
                .entry(FieldIntentAntenna {
                    field: slice.field.clone(),
                    intent: slice.intent,
                    antenna: antenna.clone(),
                })
                .or_default()
                .insert(slice.spw);
        }
    }

    // Pass 2: group by spw selection, collapsing a full cover to the
    // sentinel, then by (field, intent).
    let mut antennas_per_selection: BTreeMap<SpwSelection, BTreeMap<FieldIntent, BTreeSet<String>>> =
        BTreeMap::new();
    for (fia, spws) in spws_per_fia {
        let selection = if &spws == all_spw_ids {
            SpwSelection::AllSpws
        } else {
            SpwSelection::Spws(spws.into_iter().collect())
        };
        antennas_per_selection
            .entry(selection)
            .or_default()
            .entry(FieldIntent {
                field: fia.field,
                intent: fia.intent,
            })
            .or_default()
            .insert(fia.antenna);
    }

    // Pass 3: within a spw selection, identical antenna sets on the same
    // field merge their intents into one notification.
    let mut notifications = vec![];
    for (selection, antennas_per_fi) in antennas_per_selection {
        let mut intents_per_group: BTreeMap<(Vec<String>, String), BTreeSet<Option<Intent>>> =
            BTreeMap::new();
        for (fi, antennas) in antennas_per_fi {
            intents_per_group
                .entry((antennas.into_iter().collect(), fi.field))
                .or_default()
                .insert(fi.intent);
        }
        for ((antennas, field), intents) in intents_per_group {
            notifications.push(Notification {
                field,
                intents: intents.into_iter().collect(),
                spws: selection.clone(),
                antennas,
            });
        }
    }
    notifications
}

/// Format one notification for log/QA display.
pub fn format_notification(ms_name: &str, notification: &Notification) -> String {
    let mut criteria = vec![];
    // A lone null intent (an intent-agnostic flagging command) is omitted.
    if notification.intents != [None] {
        let plural = if notification.intents.len() == 1 {
            "intent"
        } else {
            "intents"
        };
        let intents = notification
            .intents
            .iter()
            .map(|intent| match intent {
                Some(intent) => intent.to_string(),
                None => "(no intent)".to_string(),
            })
            .join(", ");
        criteria.push(format!("{plural} {intents}"));
    }
    criteria.push(format!("field {}", notification.field));
    criteria.push(notification.spws.to_string());

    let (noun, verb) = if notification.antennas.len() == 1 {
        ("antenna", "is")
    } else {
        ("antennas", "are")
    };
    format!(
        "For {}, {noun} {} {verb} fully flagged in {ms_name}",
        prose_list(&criteria),
        notification.antennas.iter().join(", "),
    )
}

/// Join list items the way prose does: "a", "a and b", "a, b and c".
fn prose_list(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {last}", init.iter().join(", ")),
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Metadata on a measurement set.

This is a thin in-memory model of the pipeline's measurement-set collaborator:
just the antennas, fields and ranked reference-antenna list that the flagging
aggregation needs. Visibility data, spectral-window geometry and everything
else about an MS live with the collaborator, not here.
 */

mod error;

pub use error::ContextError;

use std::collections::BTreeSet;

use indexmap::IndexSet;
use itertools::Itertools;
use log::debug;

use crate::intent::Intent;

/// An antenna in a measurement set. Created at MS-load time; never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Antenna {
    /// The antenna ID, as the instrument numbers them. Zero indexed, but not
    /// necessarily contiguous (antennas can be absent from an array).
    pub id: usize,

    /// The display name (e.g. "ea02", "DA41").
    pub name: String,
}

/// A field (pointing) in a measurement set, with the canonical intents the
/// observation declares for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub intents: BTreeSet<Intent>,
}

/// Measurement-set metadata.
///
/// The ranked reference-antenna list is stored the way the pipeline persists
/// it, as a comma-separated string of antenna names in preference order. The
/// list is only ever rewritten through [`MeasurementSet::update_reference_antennas`];
/// callers must serialise access per MS, as the refant list is shared mutable
/// state across pipeline stages.
#[derive(Debug, Clone)]
pub struct MeasurementSet {
    /// The MS basename, used in log and QA lines.
    pub name: String,

    pub antennas: Vec<Antenna>,

    pub fields: Vec<Field>,

    /// The ranked reference-antenna list. `None` means no list has been set
    /// (e.g. the refant heuristics haven't run yet).
    reference_antennas: Option<String>,

    /// Bumped every time the reference-antenna list is rewritten.
    refant_version: u64,
}

impl MeasurementSet {
    pub fn new(
        name: String,
        antennas: Vec<Antenna>,
        fields: Vec<Field>,
        reference_antennas: Option<String>,
    ) -> MeasurementSet {
        MeasurementSet {
            name,
            antennas,
            fields,
            reference_antennas,
            refant_version: 0,
        }
    }

    /// Resolve an antenna ID (in selection syntax, e.g. "3") to its display
    /// name. The ID string is treated as opaque until it's looked up; an ID
    /// that doesn't parse or doesn't exist is a contract violation by the
    /// caller.
    pub fn antenna_name(&self, id: &str) -> Result<&str, ContextError> {
        let id: usize = id
            .trim()
            .parse()
            .map_err(|_| ContextError::InvalidAntennaId(id.to_string()))?;
        self.antennas
            .iter()
            .find(|a| a.id == id)
            .map(|a| a.name.as_str())
            .ok_or(ContextError::UnknownAntenna(id))
    }

    /// The canonical intents the observation declares for a field, or `None`
    /// if the MS has no such field.
    pub fn intents_for_field(&self, field_name: &str) -> Option<&BTreeSet<Intent>> {
        self.fields
            .iter()
            .find(|f| f.name == field_name)
            .map(|f| &f.intents)
    }

    /// The ranked reference-antenna list, best first. `None` when no list has
    /// been set.
    pub fn reference_antennas(&self) -> Option<IndexSet<String>> {
        let refants: IndexSet<String> = self
            .reference_antennas
            .as_deref()?
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect();
        if refants.is_empty() {
            None
        } else {
            Some(refants)
        }
    }

    pub fn refant_version(&self) -> u64 {
        self.refant_version
    }

    /// Rewrite the ranked reference-antenna list: drop the antennas in
    /// `to_remove`, move the antennas in `to_demote` to the end (preserving
    /// their relative order). This is the only mutator of the list.
    ///
    /// The never-empty invariant is enforced upstream by
    /// [`decide_refant_update`](crate::refant::decide_refant_update); this
    /// method applies whatever it is given.
    pub fn update_reference_antennas(
        &mut self,
        to_demote: &BTreeSet<String>,
        to_remove: &BTreeSet<String>,
    ) {
        let Some(current) = self.reference_antennas() else {
            return;
        };

        let (demoted, kept): (Vec<&String>, Vec<&String>) = current
            .iter()
            .filter(|name| !to_remove.contains(*name))
            .partition(|name| to_demote.contains(*name));
        let updated = kept.into_iter().chain(demoted).join(",");

        debug!(
            "{}: reference antenna list updated from '{}' to '{}'",
            self.name,
            self.reference_antennas.as_deref().unwrap_or(""),
            updated
        );
        self.reference_antennas = if updated.is_empty() {
            None
        } else {
            Some(updated)
        };
        self.refant_version += 1;
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The pipeline's canonical intent vocabulary and the translation from
//! native-syntax obs modes.
//!
//! The instrument writes scan intents in its own vocabulary (e.g.
//! `CALIBRATE_PHASE#ON_SOURCE`); everything downstream of ingestion works
//! with the canonical [`Intent`] values instead.

mod error;

pub use error::IntentError;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// A canonical pipeline intent.
///
/// The variant order is alphabetical; as `Ord` is derived, sorted intent
/// collections come out in alphabetical order, which is what the QA report
/// lines expect.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Intent {
    Amplitude,
    Atmosphere,
    Bandpass,
    Check,
    Delay,
    Flux,
    Phase,
    Pointing,
    Polarization,
    Sideband,
    Target,
    Wvr,
}

lazy_static! {
    /// Native obs-mode patterns and the canonical intent each maps to.
    /// `CALIBRATE_POL` is deliberately truncated so that it catches
    /// `CALIBRATE_POLARIZATION`, `CALIBRATE_POL_ANGLE` and
    /// `CALIBRATE_POL_LEAKAGE` alike.
    static ref OBS_MODE_TABLE: Vec<(Regex, Intent)> = vec![
        (Regex::new(r"CALIBRATE_AMPLI").unwrap(), Intent::Amplitude),
        (Regex::new(r"CALIBRATE_ATMOSPHERE").unwrap(), Intent::Atmosphere),
        (Regex::new(r"CALIBRATE_BANDPASS").unwrap(), Intent::Bandpass),
        (Regex::new(r"CALIBRATE_DELAY").unwrap(), Intent::Delay),
        (Regex::new(r"CALIBRATE_FLUX").unwrap(), Intent::Flux),
        (Regex::new(r"CALIBRATE_PHASE").unwrap(), Intent::Phase),
        (Regex::new(r"CALIBRATE_POINTING").unwrap(), Intent::Pointing),
        (Regex::new(r"CALIBRATE_POL").unwrap(), Intent::Polarization),
        (Regex::new(r"CALIBRATE_SIDEBAND_RATIO").unwrap(), Intent::Sideband),
        (Regex::new(r"CALIBRATE_WVR").unwrap(), Intent::Wvr),
        (Regex::new(r"OBSERVE_CHECK_SOURCE").unwrap(), Intent::Check),
        (Regex::new(r"OBSERVE_TARGET").unwrap(), Intent::Target),
    ];
}

impl Intent {
    /// Translate a native-syntax obs-mode string to a canonical intent.
    ///
    /// Compound obs modes (comma-separated states, as the instrument writes
    /// them) resolve to the first recognised token. An obs mode that matches
    /// nothing is a contract violation by the caller.
    pub fn from_obs_mode(obs_mode: &str) -> Result<Intent, IntentError> {
        obs_mode
            .split(',')
            .find_map(|token| {
                OBS_MODE_TABLE
                    .iter()
                    .find(|(regex, _)| regex.is_match(token))
                    .map(|(_, intent)| *intent)
            })
            .ok_or_else(|| IntentError::Unrecognised(obs_mode.to_string()))
    }
}

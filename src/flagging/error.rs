// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with classifying fully flagged antennas.

use thiserror::Error;

use crate::{context::ContextError, intent::IntentError};

#[derive(Error, Debug)]
pub enum FlagClassifyError {
    #[error("Flagging view for spw {spw} labels {expected} scans but has {found} scan columns")]
    ViewShape {
        spw: usize,
        expected: usize,
        found: usize,
    },

    #[error(
        "Flagging view for spw {spw} has {found} antenna rows, but the measurement set has {expected} antennas"
    )]
    AntennaAxis {
        spw: usize,
        expected: usize,
        found: usize,
    },

    #[error("Scan {scan} isn't present in the scan-to-field mapping")]
    UnmappedScan { scan: usize },

    #[error("Field '{0}' doesn't exist in the measurement set")]
    UnknownField(String),

    #[error(transparent)]
    Context(#[from] ContextError),

    #[error(transparent)]
    Intent(#[from] IntentError),
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with measurement-set metadata lookups.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContextError {
    #[error("'{0}' isn't a valid antenna ID")]
    InvalidAntennaId(String),

    #[error("Antenna ID {0} doesn't exist in the measurement set")]
    UnknownAntenna(usize),
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with translating native obs modes.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IntentError {
    #[error("Obs mode '{0}' does not map to any pipeline intent")]
    Unrecognised(String),
}

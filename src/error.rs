// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all refantflag-related errors. This should be the *only*
//! error enum that is publicly visible.

use thiserror::Error;

use crate::{context::ContextError, flagging::FlagClassifyError, intent::IntentError};

/// The *only* publicly visible error from refantflag. Every fallible operation
/// in the crate converges on this type.
#[derive(Error, Debug)]
pub enum RefantFlagError {
    #[error(transparent)]
    Context(#[from] ContextError),

    #[error(transparent)]
    Intent(#[from] IntentError),

    #[error(transparent)]
    FlagClassify(#[from] FlagClassifyError),
}

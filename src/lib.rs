// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Reference-antenna flagging aggregation for radio-interferometry calibration
pipelines.

When a calibration stage completely flags an antenna for some slice of an
observation, the pipeline's ranked reference-antenna list has to react: an
antenna with no usable data for a field and intent is a poor phase reference.
This crate classifies "fully flagged" antennas out of two upstream flagging
representations (flat flagging commands and per-spw antenna-by-scan flagging
views), decides which reference antennas to demote or remove, and aggregates
the same classifications into compact notifications for quality-assessment
reporting.

The measurement-set metadata consumed here (antennas, fields, intents, the
ranked reference-antenna list) is a thin in-memory model of the pipeline's
measurement-set collaborator; flagging itself, calibration and imaging live
elsewhere.
 */

pub mod context;
mod error;
pub mod flagging;
pub mod intent;
pub mod qa;
pub mod refant;

// Re-exports.
pub use context::{Antenna, Field, MeasurementSet};
pub use error::RefantFlagError;
pub use flagging::{
    from_flagcmds, from_flagviews, FieldIntentSpw, FlagCmd, FlagView, FullyFlaggedAntennas,
};
pub use intent::Intent;
pub use qa::{aggregate_notifications, format_notification, Notification, SpwSelection};
pub use refant::{decide_refant_update, RefantUpdateResult};

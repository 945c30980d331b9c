// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! ISO 8601 timestamp conversion at the storage boundary.

use time::OffsetDateTime;
use time::format_description::well_known::Iso8601;

use crate::error::PersistenceError;

/// Formats a timestamp for storage.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be formatted.
pub fn to_storage(value: OffsetDateTime) -> Result<String, PersistenceError> {
    value
        .format(&Iso8601::DEFAULT)
        .map_err(|e| PersistenceError::Other(format!("Failed to format timestamp: {e}")))
}

/// Parses a stored timestamp.
///
/// # Errors
///
/// Returns `PersistenceError::CorruptRecord` if the stored text does not
/// parse as ISO 8601.
pub fn from_storage(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Iso8601::DEFAULT)
        .map_err(|e| PersistenceError::CorruptRecord(format!("Bad timestamp '{value}': {e}")))
}

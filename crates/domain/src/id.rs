//! ID generation utilities.

use uuid::Uuid;

/// Generates a new UUID v7 as a string.
///
/// UUID v7 includes timestamp information and is sortable, which keeps
/// run identifiers in chronological order.
#[must_use]
pub fn generate_id_v7() -> String {
    Uuid::now_v7().to_string()
}

/// PostgREST response types for deserialization.
///
/// Successful responses decode straight into the catalog records; only the
/// error body needs a dedicated shape.
use serde::Deserialize;

/// The JSON error body returned by PostgREST for failed requests.
#[derive(Debug, Deserialize)]
pub(super) struct PostgrestError {
    /// Human readable error message
    pub message: String,
    /// PostgreSQL or PostgREST error code (e.g. "42P01" for unknown relations)
    pub code: Option<String>,
    /// Additional detail, frequently null
    pub details: Option<String>,
    /// Suggested fix, frequently null
    pub hint: Option<String>,
}

impl PostgrestError {
    /// Code PostgreSQL uses for a relation that does not exist.
    pub const UNDEFINED_TABLE: &'static str = "42P01";

    /// Flattens message, details and hint into a single line.
    pub fn describe(&self) -> String {
        let mut text = self.message.clone();
        if let Some(details) = self.details.as_deref().filter(|d| !d.is_empty()) {
            text.push_str(&format!(" ({})", details));
        }
        if let Some(hint) = self.hint.as_deref().filter(|h| !h.is_empty()) {
            text.push_str(&format!(" hint: {}", hint));
        }
        text
    }
}

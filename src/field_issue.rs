use serde::Serialize;

/// A problem with one field of a request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    /// The path to the offending field, e.g. `transactions[0].amount`.
    pub field: String,
    /// What is wrong with the field.
    #[serde(rename = "msg")]
    pub message: String,
}

impl FieldIssue {
    /// Create an issue for a top-level field.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an issue for a field of the item at `index` in a batch request.
    pub fn at(index: usize, field: &str, message: impl Into<String>) -> Self {
        Self::new(format!("transactions[{index}].{field}"), message)
    }
}

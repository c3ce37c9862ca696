use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("{message}")]
    MissingRequiredFields { message: &'static str, fields: Vec<&'static str> },
}

impl DomainError {
    pub fn missing(message: &'static str, fields: Vec<&'static str>) -> Self {
        Self::MissingRequiredFields { message, fields }
    }

    /// Field names (wire spelling) that were absent or empty.
    pub fn fields(&self) -> &[&'static str] {
        match self {
            Self::MissingRequiredFields { fields, .. } => fields,
        }
    }
}

/// Collects the names of required fields that are absent or empty.
pub(crate) fn missing_fields<'a>(
    fields: impl IntoIterator<Item = (&'static str, Option<&'a str>)>,
) -> Vec<&'static str> {
    fields
        .into_iter()
        .filter(|(_, value)| value.map(str::is_empty).unwrap_or(true))
        .map(|(name, _)| name)
        .collect()
}

use super::descriptor::ValueKind;
use thiserror::Error;

/// Errors that can occur while encoding or decoding a filter string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterCodecError {
    #[error("Malformed filter string at offset {position}: {reason}")]
    MalformedGrammar { position: usize, reason: String },

    #[error("Unknown filter token: '{0}'. Valid tokens are: values, value, status, category, in, notIn, empty")]
    UnknownToken(String),

    #[error("Token '{token}' is not allowed inside {context}")]
    UnexpectedToken {
        token: &'static str,
        context: &'static str,
    },

    #[error("Missing '{token}' inside {context}")]
    MissingToken {
        token: &'static str,
        context: &'static str,
    },

    #[error("Invalid filter id '{0}': expected '<runsetId>_<columnName>_<columnId>'")]
    InvalidFilterId(String),

    #[error("No {table} domain values for runset '{runset_id}', column '{column_id}'")]
    ConfigurationMismatch {
        table: ValueKind,
        runset_id: String,
        column_id: String,
    },

    #[error("Runset '{0}' is not present in the domain tables")]
    UnknownRunset(String),
}

impl FilterCodecError {
    pub(crate) fn malformed(position: usize, reason: impl Into<String>) -> Self {
        FilterCodecError::MalformedGrammar {
            position,
            reason: reason.into(),
        }
    }

    /// True when the domain tables do not match the filters, as opposed to a broken string
    pub fn is_configuration_mismatch(&self) -> bool {
        matches!(
            self,
            FilterCodecError::ConfigurationMismatch { .. } | FilterCodecError::UnknownRunset(_)
        )
    }
}

use super::error::FilterCodecError;
use std::fmt;
use std::str::FromStr;

/// Top-level clause key for the exact task-id filter
pub const IDS_KEY: &str = "id";
/// Top-level clause key for the free-text task-id filter
pub const ANY_ID_KEY: &str = "id_any";

/// Keywords of the filter grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// Exact task-id list inside `id(...)`
    Values,
    /// Single literal (`id_any(...)` or a plain column)
    Value,
    /// Status side of a status column
    Status,
    /// Category side of a status column
    Category,
    /// Inclusion list
    In,
    /// Exclusion list
    NotIn,
    /// Nothing selected
    Empty,
}

impl FromStr for Token {
    type Err = FilterCodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "values" => Ok(Token::Values),
            "value" => Ok(Token::Value),
            "status" => Ok(Token::Status),
            "category" => Ok(Token::Category),
            "in" => Ok(Token::In),
            "notIn" => Ok(Token::NotIn),
            "empty" => Ok(Token::Empty),
            _ => Err(FilterCodecError::UnknownToken(s.to_string())),
        }
    }
}

impl Token {
    /// Get the wire name of this token
    pub fn canonical_name(&self) -> &'static str {
        match self {
            Token::Values => "values",
            Token::Value => "value",
            Token::Status => "status",
            Token::Category => "category",
            Token::In => "in",
            Token::NotIn => "notIn",
            Token::Empty => "empty",
        }
    }

    /// Reject this token at a parse site where it is not legal
    pub(crate) fn unexpected(self, context: &'static str) -> FilterCodecError {
        FilterCodecError::UnexpectedToken {
            token: self.canonical_name(),
            context,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

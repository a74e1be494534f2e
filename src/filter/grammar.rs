//! Typed form of the filter string.
//!
//! Values held here are unescaped; [`fmt::Display`] escapes them on the way
//! out and [`FilterDocument::parse`] unescapes them on the way in. Category
//! literals are stored without their marker space.

use super::error::FilterCodecError;
use super::escape::{escape, unescape};
use super::token::{ANY_ID_KEY, IDS_KEY, Token};
use super::tokenizer::{split_values, tokenize_part};
use std::fmt;

/// A whole filter string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterDocument {
    pub clauses: Vec<Clause>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// `id(values(...))`
    Ids(Vec<String>),
    /// `id_any(value(...))`
    AnyId(String),
    /// `<runsetId>(<column>,...)`
    Runset {
        runset_id: String,
        columns: Vec<ColumnClause>,
    },
}

/// `<columnId>*<columnName>*(<filter>,...)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnClause {
    pub column_id: String,
    pub column_name: String,
    pub filters: Vec<FilterExpr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterExpr {
    Value(String),
    Status(DistinctExpr),
    Category(DistinctExpr),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DistinctExpr {
    In(Vec<String>),
    NotIn(Vec<String>),
    Empty,
}

impl FilterDocument {
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Parse a filter string. The empty string is the empty document.
    pub fn parse(input: &str) -> Result<Self, FilterCodecError> {
        let clauses = tokenize_part(input)?
            .into_iter()
            .map(|(key, body)| Clause::parse(key, body))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { clauses })
    }
}

impl Clause {
    fn parse(key: &str, body: &str) -> Result<Self, FilterCodecError> {
        match key {
            IDS_KEY => {
                let values = single_token(body, Token::Values, "id(...)")?;
                Ok(Clause::Ids(split_values(values).map(unescape).collect()))
            }
            ANY_ID_KEY => {
                let value = single_token(body, Token::Value, "id_any(...)")?;
                Ok(Clause::AnyId(unescape(value)))
            }
            runset_id => {
                let columns = tokenize_part(body)?
                    .into_iter()
                    .map(|(header, filters)| ColumnClause::parse(header, filters))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Clause::Runset {
                    runset_id: runset_id.to_string(),
                    columns,
                })
            }
        }
    }
}

/// Body of `id(...)` and `id_any(...)`: exactly the expected token
fn single_token<'a>(
    body: &'a str,
    expected: Token,
    context: &'static str,
) -> Result<&'a str, FilterCodecError> {
    let mut found = None;
    for (key, inner) in tokenize_part(body)? {
        let token: Token = key.parse()?;
        if token != expected {
            return Err(token.unexpected(context));
        }
        found = Some(inner);
    }
    found.ok_or(FilterCodecError::MissingToken {
        token: expected.canonical_name(),
        context,
    })
}

impl ColumnClause {
    fn parse(header: &str, body: &str) -> Result<Self, FilterCodecError> {
        let mut segments = header.split('*');
        let (Some(column_id), Some(column_name)) = (segments.next(), segments.next()) else {
            return Err(FilterCodecError::malformed(
                0,
                format!("column header '{header}' must look like '<columnId>*<columnName>*'"),
            ));
        };

        let filters = tokenize_part(body)?
            .into_iter()
            .map(|(key, inner)| FilterExpr::parse(key, inner))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            column_id: column_id.to_string(),
            column_name: unescape(column_name),
            filters,
        })
    }
}

impl FilterExpr {
    fn parse(key: &str, body: &str) -> Result<Self, FilterCodecError> {
        let token: Token = key.parse()?;
        match token {
            Token::Value => Ok(FilterExpr::Value(unescape(body))),
            Token::Status => Ok(FilterExpr::Status(DistinctExpr::parse(body)?)),
            Token::Category => Ok(FilterExpr::Category(DistinctExpr::parse(body)?)),
            Token::Values | Token::In | Token::NotIn | Token::Empty => {
                Err(token.unexpected("a column filter"))
            }
        }
    }
}

impl DistinctExpr {
    fn parse(body: &str) -> Result<Self, FilterCodecError> {
        let mut expr = None;
        for (key, inner) in tokenize_part(body)? {
            let token: Token = key.parse()?;
            expr = Some(match token {
                Token::In => DistinctExpr::In(split_values(inner).map(unescape).collect()),
                Token::NotIn => DistinctExpr::NotIn(split_values(inner).map(unescape).collect()),
                Token::Empty => DistinctExpr::Empty,
                Token::Values | Token::Value | Token::Status | Token::Category => {
                    return Err(token.unexpected("status(...) or category(...)"));
                }
            });
        }
        expr.ok_or(FilterCodecError::MissingToken {
            token: "in, notIn or empty",
            context: "status(...) or category(...)",
        })
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, values: &[String]) -> fmt::Result {
    for (idx, value) in values.iter().enumerate() {
        if idx > 0 {
            f.write_str(",")?;
        }
        f.write_str(&escape(value))?;
    }
    Ok(())
}

fn write_joined<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (idx, item) in items.iter().enumerate() {
        if idx > 0 {
            f.write_str(",")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for FilterDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(f, &self.clauses)
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::Ids(values) => {
                write!(f, "{IDS_KEY}({}(", Token::Values)?;
                write_list(f, values)?;
                f.write_str("))")
            }
            Clause::AnyId(value) => {
                write!(f, "{ANY_ID_KEY}({}({}))", Token::Value, escape(value))
            }
            Clause::Runset { runset_id, columns } => {
                write!(f, "{runset_id}(")?;
                write_joined(f, columns)?;
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for ColumnClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}*{}*(", self.column_id, escape(&self.column_name))?;
        write_joined(f, &self.filters)?;
        f.write_str(")")
    }
}

impl fmt::Display for FilterExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterExpr::Value(value) => write!(f, "{}({})", Token::Value, escape(value)),
            FilterExpr::Status(expr) => write!(f, "{}({expr})", Token::Status),
            FilterExpr::Category(expr) => write!(f, "{}({expr})", Token::Category),
        }
    }
}

impl fmt::Display for DistinctExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (token, values) = match self {
            DistinctExpr::In(values) => (Token::In, values.as_slice()),
            DistinctExpr::NotIn(values) => (Token::NotIn, values.as_slice()),
            DistinctExpr::Empty => (Token::Empty, &[][..]),
        };
        write!(f, "{token}(")?;
        write_list(f, values)?;
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str =
        "id(values(a%2Cb,c)),1(0*status*(status(notIn(true)),category(in(correct,missing))),1*cputime*(value(%3A1120)))";

    #[test]
    fn test_parse_sample_document() {
        let doc = FilterDocument::parse(SAMPLE).unwrap();
        assert_eq!(
            doc.clauses,
            vec![
                Clause::Ids(vec!["a,b".to_string(), "c".to_string()]),
                Clause::Runset {
                    runset_id: "1".to_string(),
                    columns: vec![
                        ColumnClause {
                            column_id: "0".to_string(),
                            column_name: "status".to_string(),
                            filters: vec![
                                FilterExpr::Status(DistinctExpr::NotIn(vec!["true".to_string()])),
                                FilterExpr::Category(DistinctExpr::In(vec![
                                    "correct".to_string(),
                                    "missing".to_string()
                                ])),
                            ],
                        },
                        ColumnClause {
                            column_id: "1".to_string(),
                            column_name: "cputime".to_string(),
                            filters: vec![FilterExpr::Value(":1120".to_string())],
                        },
                    ],
                },
            ]
        );
        assert_eq!(doc.to_string(), SAMPLE);
    }

    #[test]
    fn test_render_escapes_column_name() {
        let clause = ColumnClause {
            column_id: "2".to_string(),
            column_name: "mem*(MB)".to_string(),
            filters: vec![FilterExpr::Status(DistinctExpr::Empty)],
        };
        assert_eq!(clause.to_string(), "2*mem%2A%28MB%29*(status(empty()))");
    }

    #[test]
    fn test_parse_any_id() {
        let doc = FilterDocument::parse("id_any(value(foo%20bar))").unwrap();
        assert_eq!(doc.clauses, vec![Clause::AnyId("foo bar".to_string())]);
    }

    #[test]
    fn test_parse_rejects_unknown_tokens() {
        assert_eq!(
            FilterDocument::parse("1(0*status*(statusFilter(in(a))))"),
            Err(FilterCodecError::UnknownToken("statusFilter".to_string()))
        );
        assert!(FilterDocument::parse("1(0*status*(in(a)))").is_err());
        assert!(FilterDocument::parse("1(0*status*(status(value(a))))").is_err());
        assert!(FilterDocument::parse("id(value(a))").is_err());
    }

    #[test]
    fn test_parse_requires_distinct_form() {
        assert!(matches!(
            FilterDocument::parse("1(0*status*(status()))"),
            Err(FilterCodecError::MissingToken { .. })
        ));
        assert!(matches!(
            FilterDocument::parse("1(0*status*(status(in(a)"),
            Err(FilterCodecError::MalformedGrammar { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_bad_column_header() {
        assert!(FilterDocument::parse("1(0(value(a)))").is_err());
    }
}

//! Filter string codec
//!
//! Translates the table's active column filters into one compact, URL-safe
//! string and back, so a filtered view can be bookmarked and restored.
//!
//! # Syntax
//!
//! ```text
//! document     := clause ("," clause)*
//! clause       := "id(values(" valuelist "))"
//!               | "id_any(value(" value "))"
//!               | runsetId "(" columnClause ("," columnClause)* ")"
//! columnClause := columnId "*" columnName "*(" filterExpr ("," filterExpr)* ")"
//! filterExpr   := "value(" value ")"
//!               | "status(" distinctExpr ")"
//!               | "category(" distinctExpr ")"
//! distinctExpr := "in(" valuelist ")" | "notIn(" valuelist ")" | "empty()"
//! ```
//!
//! Every value and column name is percent-escaped, so `(`, `)`, `,` and `*`
//! only ever appear as delimiters.
//!
//! # Examples
//!
//! ```text
//! 1(0*status*(status(in(true)),category(empty())))   # status "true", no category
//! 1(0*status*(status(notIn(true))))                  # every status but "true", all categories
//! id(values(a,b)),0(1*cputime*(value(%3A1120)))      # two task ids and a cputime range
//! ```

pub mod descriptor;
pub mod deserializer;
pub mod distinct;
pub mod domain;
pub mod error;
pub mod escape;
pub mod grammar;
pub mod selection;
pub mod serializer;
pub mod token;
pub mod tokenizer;

pub use descriptor::{ColumnKey, FilterDescriptor, FilterValue, TASK_ID, ValueKind};
pub use deserializer::{deserialize, from_document};
pub use distinct::encode_distinct;
pub use domain::{DomainTable, DomainTables};
pub use error::FilterCodecError;
pub use escape::{escape, unescape};
pub use grammar::{Clause, ColumnClause, DistinctExpr, FilterDocument, FilterExpr};
pub use selection::{EffectiveColumn, Selections, effective_selections};
pub use serializer::{serialize, to_document};
pub use token::Token;
pub use tokenizer::tokenize_part;

//! The dialect abstraction: naming, typing, quoting and constraint rules of
//! one target SQL engine.

use std::sync::LazyLock;

use regex::Regex;
use yeti_core::{Attribute, AttributeName};

static NUMERIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+(\.\d+)?$").unwrap());

/// Database-specific generation rules.
///
/// The default methods implement the behavior shared by ANSI-ish targets;
/// a dialect overrides only what differs.
pub trait SqlDialect {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Returns the auto-increment integer type, used for the `serial`
    /// field type.
    fn serial_type(&self) -> &'static str;

    /// Returns the current-timestamp keyword the `now()` default maps to.
    fn current_timestamp(&self) -> &'static str;

    /// Returns true when the target has native enum types.
    fn supports_enums(&self) -> bool;

    /// Maps a primitive type name (lower-cased) to the target's type.
    fn type_name(&self, ty: &str) -> Option<&'static str>;

    /// Returns the column type used for enum fields when the target has no
    /// native enum support.
    fn enum_fallback(&self) -> &'static str {
        "VARCHAR(255)"
    }

    /// Quotes an identifier, doubling embedded quote characters so the
    /// result is safe to interpolate.
    fn quote_identifier(&self, id: &str) -> String {
        format!("\"{}\"", id.replace('"', "\"\""))
    }

    /// Escapes a string for use inside a single-quoted SQL literal.
    fn escape_string(&self, value: &str) -> String {
        value.replace('\'', "''")
    }

    /// Returns the inline column constraint for one attribute, or `None`
    /// when the attribute produces no inline clause (foreign keys are
    /// emitted in the trailing pass; unknown attributes are ignored here).
    fn constraint(&self, attr: &Attribute, _field_type: &str) -> Option<String> {
        match &attr.name {
            AttributeName::PrimaryKey => Some("PRIMARY KEY".to_owned()),
            AttributeName::Unique => Some("UNIQUE".to_owned()),
            // An absent default value is no constraint, never an empty clause.
            AttributeName::Default => attr
                .first_param()
                .map(|value| format!("DEFAULT {}", self.default_value(value))),
            AttributeName::ForeignKey | AttributeName::Other(_) => None,
        }
    }

    /// Renders a default value: numeric and boolean literals pass through
    /// unquoted, `now()` maps to the current-timestamp keyword, and
    /// everything else becomes an escaped string literal.
    fn default_value(&self, value: &str) -> String {
        if value == "now()" {
            return self.current_timestamp().to_owned();
        }
        if value == "true" || value == "false" || NUMERIC_RE.is_match(value) {
            return value.to_owned();
        }
        format!("'{}'", self.escape_string(value))
    }
}

//! Naming helpers shared by descriptors and the schema engine
//!
//! Table and column names derived from model names follow one convention:
//! snake_case, with table names pluralised.

use heck::ToSnakeCase;

/// Convert a name to `snake_case` (e.g. "OrderToItem" → "order_to_item").
pub fn snake(name: &str) -> String {
    name.to_snake_case()
}

/// Pluralise a snake_case word with simple English heuristics.
pub fn pluralize(word: &str) -> String {
    let s = word.to_snake_case();
    if s.ends_with('s') || s.ends_with('x') || s.ends_with("ch") || s.ends_with("sh") {
        format!("{}es", s)
    } else if s.ends_with('y')
        && !s.ends_with("ey")
        && !s.ends_with("ay")
        && !s.ends_with("oy")
        && !s.ends_with("uy")
    {
        format!("{}ies", &s[..s.len() - 1])
    } else {
        format!("{}s", s)
    }
}

/// Model name → table name (snake_case plural, e.g. "Story" → "stories").
pub fn table_name(model_name: &str) -> String {
    pluralize(&snake(model_name))
}

/// Model name → default foreign key column (e.g. "User" → "user_id").
pub fn fk_column_name(model_name: &str) -> String {
    format!("{}_id", snake(model_name))
}

// ============================================================================
// Tests
// ============================================================================

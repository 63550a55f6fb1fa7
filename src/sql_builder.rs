//! SELECT builder with parameterized query construction.
//!
//! All caller-supplied values go through DuckDB's parameter binding (`?`
//! placeholders) as typed [`Value`]s, never through string interpolation.
//! Builder methods return `&mut Self` for chaining.
//!
//! # Example
//!
//! ```rust
//! use deckbuilder::SqlBuilder;
//! use duckdb::types::Value;
//!
//! let (sql, params) = SqlBuilder::new("trainers")
//!     .where_eq("id", Value::BigInt(7))
//!     .limit(1)
//!     .build();
//! assert_eq!(sql, "SELECT *\nFROM trainers\nWHERE id = ?\nLIMIT 1");
//! assert_eq!(params, vec![Value::BigInt(7)]);
//! ```

use duckdb::types::Value;

/// Builds parameterized SELECT statements against a single table.
pub struct SqlBuilder {
    select_cols: Vec<String>,
    from_table: String,
    where_clauses: Vec<String>,
    params: Vec<Value>,
    order_by_cols: Vec<String>,
    limit_val: Option<usize>,
}

impl SqlBuilder {
    /// Create a builder targeting the given table.
    pub fn new(table: &str) -> Self {
        Self {
            select_cols: vec!["*".to_string()],
            from_table: table.to_string(),
            where_clauses: Vec::new(),
            params: Vec::new(),
            order_by_cols: Vec::new(),
            limit_val: None,
        }
    }

    /// Set the columns to select (replaces the default `*`).
    pub fn select(&mut self, cols: &[&str]) -> &mut Self {
        self.select_cols = cols.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Add an equality condition: `{column} = ?`.
    pub fn where_eq(&mut self, column: &str, value: Value) -> &mut Self {
        self.where_clauses.push(format!("{} = ?", column));
        self.params.push(value);
        self
    }

    /// Add a case-insensitive substring condition.
    ///
    /// Generates: `LOWER({column}) LIKE LOWER(?) ESCAPE '\'` with the value
    /// wrapped in `%`. `%`, `_` and `\` in the fragment match literally.
    pub fn where_contains(&mut self, column: &str, fragment: &str) -> &mut Self {
        self.where_clauses
            .push(format!("LOWER({}) LIKE LOWER(?) ESCAPE '\\'", column));
        self.params
            .push(Value::Text(format!("%{}%", escape_like(fragment))));
        self
    }

    /// Add ORDER BY clauses (e.g. `"id ASC"`).
    pub fn order_by(&mut self, clauses: &[&str]) -> &mut Self {
        self.order_by_cols
            .extend(clauses.iter().map(|c| c.to_string()));
        self
    }

    /// Set the maximum number of rows to return.
    pub fn limit(&mut self, n: usize) -> &mut Self {
        self.limit_val = Some(n);
        self
    }

    /// Build the final SQL string and parameter list.
    pub fn build(&self) -> (String, Vec<Value>) {
        let mut parts = vec![
            format!("SELECT {}", self.select_cols.join(", ")),
            format!("FROM {}", self.from_table),
        ];

        if !self.where_clauses.is_empty() {
            parts.push(format!("WHERE {}", self.where_clauses.join(" AND ")));
        }

        if !self.order_by_cols.is_empty() {
            parts.push(format!("ORDER BY {}", self.order_by_cols.join(", ")));
        }

        if let Some(n) = self.limit_val {
            parts.push(format!("LIMIT {}", n));
        }

        (parts.join("\n"), self.params.clone())
    }
}

/// Escape `LIKE` wildcards so they match themselves under `ESCAPE '\'`.
fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

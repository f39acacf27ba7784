//! Query shape classification and extraction.
//!
//! A [`QueryShape`] is derived once per query string and records everything
//! the caching layer needs: whether the statement reads data, which tables it
//! references (first = the cache-key table), which columns it projects, and
//! the canonical fetch-all rewrite.

use sqlparser::ast::{Expr, SelectItem, SetExpr, Statement, TableFactor, TableWithJoins};
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;

use crate::error::{ShapeError, ShapeResult};
use crate::rewrite;

/// Returns `true` iff the statement's leading keyword denotes a
/// data-retrieval statement.
///
/// Matching is keyword-based and case-insensitive; leading whitespace and
/// `--` / `/* */` comments are skipped. This never errors: text that cannot
/// even produce a leading keyword is simply not a read query.
///
/// # Examples
///
/// ```
/// use tablesnap_sql::is_read_query;
///
/// assert!(is_read_query("SELECT * FROM users"));
/// assert!(is_read_query("  -- fetch\n select id from users"));
/// assert!(!is_read_query("INSERT INTO users VALUES (1)"));
/// assert!(!is_read_query("CREATE TABLE users (id INT)"));
/// ```
#[must_use]
pub fn is_read_query(sql: &str) -> bool {
    matches!(leading_keyword(sql), Some(kw) if kw.eq_ignore_ascii_case("SELECT"))
}

/// Extracts the first keyword of a statement, skipping comments.
fn leading_keyword(sql: &str) -> Option<String> {
    let mut rest = sql.trim_start();
    loop {
        if let Some(after) = rest.strip_prefix("--") {
            rest = after.split_once('\n').map_or("", |(_, r)| r).trim_start();
        } else if let Some(after) = rest.strip_prefix("/*") {
            rest = after.split_once("*/").map_or("", |(_, r)| r).trim_start();
        } else {
            break;
        }
    }
    let word: String = rest.chars().take_while(|c| c.is_ascii_alphabetic()).collect();
    if word.is_empty() {
        None
    } else {
        Some(word)
    }
}

/// Case-normalizes a table name into its cache identity.
///
/// Delimiter quotes are stripped and the identifier is uppercased, so
/// `person`, `Person` and `"PERSON"` all key the same cache entry.
#[must_use]
pub fn table_identity(name: &str) -> String {
    name.trim().trim_matches('"').to_uppercase()
}

/// The column list a query asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// A lone `*`: all columns of the primary table, in table order.
    ///
    /// Kept as a marker rather than expanded eagerly; only the cursor
    /// builder, which has the snapshot's column list in hand, expands it.
    All,
    /// Explicit column names, in written order.
    Columns(Vec<String>),
}

impl Projection {
    /// Returns `true` for the wildcard marker.
    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Returns the explicit column names, or `None` for the wildcard.
    #[must_use]
    pub fn columns(&self) -> Option<&[String]> {
        match self {
            Self::All => None,
            Self::Columns(cols) => Some(cols),
        }
    }
}

/// The analyzed shape of one query string.
///
/// Immutable once derived; it has no identity beyond its source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryShape {
    read: bool,
    tables: Vec<String>,
    projection: Projection,
    rewrite: String,
}

impl QueryShape {
    /// Analyze a single SQL statement.
    ///
    /// Read queries come back fully populated: table list (FROM then JOINs,
    /// left-to-right, qualifiers and aliases stripped, duplicates preserved
    /// positionally), projection, and canonical rewrite. Non-read statements
    /// come back with `is_read() == false` and no table/projection content;
    /// callers bypass the cache before touching either.
    ///
    /// # Errors
    ///
    /// [`ShapeError`] for text that cannot be parsed or uses statement
    /// shapes this analyzer does not model (derived tables, CTEs, set
    /// operations, expression projections). Callers must treat any error as
    /// "do not cache, execute directly".
    pub fn analyze(sql: &str) -> ShapeResult<Self> {
        if sql.trim().is_empty() {
            return Err(ShapeError::EmptyQuery);
        }

        let dialect = GenericDialect {};
        let mut statements = Parser::parse_sql(&dialect, sql)?;
        if statements.len() != 1 {
            return Err(ShapeError::unsupported(format!(
                "expected 1 statement, found {}",
                statements.len()
            )));
        }
        let statement = statements.remove(0);

        let Statement::Query(ref query) = statement else {
            return Ok(Self {
                read: false,
                tables: Vec::new(),
                projection: Projection::Columns(Vec::new()),
                rewrite: sql.trim().to_owned(),
            });
        };

        if query.with.is_some() {
            return Err(ShapeError::unsupported("WITH (common table expressions)"));
        }
        let SetExpr::Select(select) = query.body.as_ref() else {
            return Err(ShapeError::unsupported("set operation or VALUES query body"));
        };

        let tables = extract_tables(&select.from)?;
        if tables.is_empty() {
            return Err(ShapeError::unsupported("SELECT without a FROM clause"));
        }
        let projection = extract_projection(&select.projection)?;
        let rewrite = rewrite::canonical(statement)?;

        Ok(Self { read: true, tables, projection, rewrite })
    }

    /// Returns `true` if the statement reads data.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        self.read
    }

    /// Referenced tables, left-to-right. First is the cache-key table.
    #[must_use]
    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    /// The primary (cache-key) table, as written in the query.
    #[must_use]
    pub fn primary_table(&self) -> Option<&str> {
        self.tables.first().map(String::as_str)
    }

    /// Case-normalized identity of the primary table.
    #[must_use]
    pub fn cache_key(&self) -> Option<String> {
        self.primary_table().map(table_identity)
    }

    /// The requested column list.
    #[must_use]
    pub const fn projection(&self) -> &Projection {
        &self.projection
    }

    /// The canonical fetch-all rewrite: projection widened to `*`, every
    /// table and column identifier uppercased and delimiter-quoted, the rest
    /// of the clause structure preserved.
    ///
    /// Serves both as the cache-population query and as a stable text for
    /// comparing two queries that touch the same table identically.
    #[must_use]
    pub fn rewrite(&self) -> &str {
        &self.rewrite
    }
}

/// Collects base table names from the FROM clause, joins included.
fn extract_tables(from: &[TableWithJoins]) -> ShapeResult<Vec<String>> {
    let mut tables = Vec::new();
    for table in from {
        tables.push(base_table_name(&table.relation)?);
        for join in &table.joins {
            tables.push(base_table_name(&join.relation)?);
        }
    }
    Ok(tables)
}

/// Strips schema qualifiers and aliases down to the base identifier.
fn base_table_name(relation: &TableFactor) -> ShapeResult<String> {
    match relation {
        TableFactor::Table { name, .. } => name
            .0
            .last()
            .and_then(|part| part.as_ident())
            .map(|ident| ident.value.clone())
            .ok_or_else(|| ShapeError::unsupported("table reference without a plain identifier")),
        other => Err(ShapeError::unsupported(format!("table factor: {other}"))),
    }
}

/// Extracts the projected column names, or the wildcard marker.
fn extract_projection(items: &[SelectItem]) -> ShapeResult<Projection> {
    if let [SelectItem::Wildcard(_)] = items {
        return Ok(Projection::All);
    }

    let mut columns = Vec::with_capacity(items.len());
    for item in items {
        match item {
            SelectItem::UnnamedExpr(Expr::Identifier(ident)) => {
                columns.push(ident.value.clone());
            }
            SelectItem::UnnamedExpr(Expr::CompoundIdentifier(parts)) => {
                let ident = parts
                    .last()
                    .ok_or_else(|| ShapeError::unsupported("empty compound identifier"))?;
                columns.push(ident.value.clone());
            }
            other => {
                return Err(ShapeError::unsupported(format!("projection item: {other}")));
            }
        }
    }
    Ok(Projection::Columns(columns))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_classification_is_keyword_based() {
        assert!(is_read_query("SELECT * FROM t"));
        assert!(is_read_query("select\n*\nfrom t"));
        assert!(!is_read_query("INSERT INTO t VALUES (1)"));
        assert!(!is_read_query("UPDATE t SET a = 1"));
        assert!(!is_read_query("DELETE FROM t"));
        assert!(!is_read_query("CREATE TABLE t (a INT)"));
        assert!(!is_read_query("DROP TABLE t"));
        assert!(!is_read_query(""));
        assert!(!is_read_query("   "));
    }

    #[test]
    fn read_classification_skips_comments() {
        assert!(is_read_query("-- comment\nSELECT 1 FROM t"));
        assert!(is_read_query("/* block */ SELECT 1 FROM t"));
        assert!(is_read_query("/* a */ -- b\n /* c */ select x from t"));
        assert!(!is_read_query("-- only a comment"));
        assert!(!is_read_query("/* unterminated"));
    }

    #[test]
    fn analyze_simple_select() {
        let shape = QueryShape::analyze("SELECT id, name FROM person").unwrap();
        assert!(shape.is_read());
        assert_eq!(shape.tables(), &["person"]);
        assert_eq!(
            shape.projection(),
            &Projection::Columns(vec!["id".to_owned(), "name".to_owned()])
        );
    }

    #[test]
    fn analyze_wildcard_is_a_marker() {
        let shape = QueryShape::analyze("SELECT * FROM person").unwrap();
        assert!(shape.projection().is_all());
        assert_eq!(shape.projection().columns(), None);
    }

    #[test]
    fn analyze_strips_schema_qualifier_and_alias() {
        let shape = QueryShape::analyze("SELECT p.id FROM app.person p").unwrap();
        assert_eq!(shape.tables(), &["person"]);
        assert_eq!(shape.projection(), &Projection::Columns(vec!["id".to_owned()]));
    }

    #[test]
    fn analyze_join_order_is_left_to_right() {
        let shape = QueryShape::analyze(
            "SELECT a.x FROM alpha a JOIN beta b ON a.id = b.id JOIN alpha a2 ON a2.id = b.id",
        )
        .unwrap();
        // Duplicates preserved positionally; first is the cache-key table.
        assert_eq!(shape.tables(), &["alpha", "beta", "alpha"]);
        assert_eq!(shape.primary_table(), Some("alpha"));
    }

    #[test]
    fn analyze_non_read_statement() {
        let shape = QueryShape::analyze("INSERT INTO person (id) VALUES (1)").unwrap();
        assert!(!shape.is_read());
        assert!(shape.tables().is_empty());
        assert_eq!(shape.primary_table(), None);
        assert_eq!(shape.cache_key(), None);
    }

    #[test]
    fn analyze_rejects_unsupported_shapes() {
        assert!(matches!(QueryShape::analyze(""), Err(ShapeError::EmptyQuery)));
        assert!(matches!(QueryShape::analyze("   \n"), Err(ShapeError::EmptyQuery)));
        assert!(matches!(QueryShape::analyze("SELECT FROM WHERE"), Err(ShapeError::Syntax(_))));
        assert!(matches!(
            QueryShape::analyze("SELECT 1"),
            Err(ShapeError::Unsupported(_))
        ));
        assert!(matches!(
            QueryShape::analyze("SELECT count(*) FROM t"),
            Err(ShapeError::Unsupported(_))
        ));
        assert!(matches!(
            QueryShape::analyze("SELECT a AS b FROM t"),
            Err(ShapeError::Unsupported(_))
        ));
        assert!(matches!(
            QueryShape::analyze("SELECT x FROM (SELECT x FROM t) d"),
            Err(ShapeError::Unsupported(_))
        ));
        assert!(matches!(
            QueryShape::analyze("WITH c AS (SELECT 1 AS x) SELECT x FROM c"),
            Err(ShapeError::Unsupported(_))
        ));
        assert!(matches!(
            QueryShape::analyze("SELECT a FROM t UNION SELECT a FROM u"),
            Err(ShapeError::Unsupported(_))
        ));
        assert!(matches!(
            QueryShape::analyze("SELECT a FROM t; SELECT b FROM u"),
            Err(ShapeError::Unsupported(_))
        ));
    }

    #[test]
    fn table_identity_normalizes_case_and_quotes() {
        assert_eq!(table_identity("person"), "PERSON");
        assert_eq!(table_identity("Person"), "PERSON");
        assert_eq!(table_identity("\"PERSON\""), "PERSON");
        assert_eq!(table_identity("  person  "), "PERSON");
    }

    #[test]
    fn cache_key_is_projection_and_case_independent() {
        let a = QueryShape::analyze("select id,name from Person").unwrap();
        let b = QueryShape::analyze("SELECT name, id FROM person").unwrap();
        assert_eq!(a.cache_key().as_deref(), Some("PERSON"));
        assert_eq!(a.cache_key(), b.cache_key());
    }
}

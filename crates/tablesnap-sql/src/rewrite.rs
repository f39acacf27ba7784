//! Canonical fetch-all rewriting.
//!
//! The rewrite widens the projection to `*` and normalizes every table and
//! column identifier (uppercased, delimiter-quoted) while leaving the rest of
//! the clause structure intact. Normalizing avoids cache fragmentation from
//! superficially different but semantically identical queries: different
//! casing, or logically equal projections written in different orders.

use std::ops::ControlFlow;

use sqlparser::ast::{
    visit_expressions_mut, visit_relations_mut, Expr, Ident, ObjectName, ObjectNamePart,
    SelectItem, SetExpr, Statement, WildcardAdditionalOptions,
};

use crate::error::{ShapeError, ShapeResult};

/// Produces the canonical fetch-all text for an already-parsed SELECT.
pub(crate) fn canonical(mut statement: Statement) -> ShapeResult<String> {
    {
        let Statement::Query(query) = &mut statement else {
            return Err(ShapeError::unsupported("only read queries have a canonical rewrite"));
        };
        let SetExpr::Select(select) = query.body.as_mut() else {
            return Err(ShapeError::unsupported("set operation or VALUES query body"));
        };
        select.projection = vec![SelectItem::Wildcard(WildcardAdditionalOptions::default())];
    }

    let _ = visit_relations_mut(&mut statement, |name: &mut ObjectName| {
        for part in &mut name.0 {
            if let ObjectNamePart::Identifier(ident) = part {
                normalize_ident(ident);
            }
        }
        ControlFlow::<()>::Continue(())
    });

    let _ = visit_expressions_mut(&mut statement, |expr: &mut Expr| {
        match expr {
            Expr::Identifier(ident) => normalize_ident(ident),
            Expr::CompoundIdentifier(parts) => parts.iter_mut().for_each(normalize_ident),
            _ => {}
        }
        ControlFlow::<()>::Continue(())
    });

    Ok(statement.to_string())
}

/// Uppercases an identifier and forces double-quote delimiting.
fn normalize_ident(ident: &mut Ident) {
    ident.value = ident.value.to_uppercase();
    ident.quote_style = Some('"');
}

#[cfg(test)]
mod tests {
    use crate::QueryShape;

    fn rewrite(sql: &str) -> String {
        QueryShape::analyze(sql).unwrap().rewrite().to_owned()
    }

    #[test]
    fn projection_is_widened_to_wildcard() {
        assert_eq!(rewrite("SELECT id, name FROM person"), r#"SELECT * FROM "PERSON""#);
        assert_eq!(rewrite("SELECT * FROM person"), r#"SELECT * FROM "PERSON""#);
    }

    #[test]
    fn identifiers_are_uppercased_and_quoted() {
        assert_eq!(
            rewrite("select id from Person where id > 3"),
            r#"SELECT * FROM "PERSON" WHERE "ID" > 3"#
        );
    }

    #[test]
    fn casing_and_projection_order_collapse_to_one_rewrite() {
        let a = rewrite("select id,name from Person");
        let b = rewrite("SELECT name, id FROM person");
        assert_eq!(a, b);
        assert_eq!(a, r#"SELECT * FROM "PERSON""#);
    }

    #[test]
    fn where_clause_structure_is_preserved() {
        let text = rewrite("SELECT name FROM person WHERE age >= 21 AND city = 'Oslo'");
        assert_eq!(text, r#"SELECT * FROM "PERSON" WHERE "AGE" >= 21 AND "CITY" = 'Oslo'"#);
    }

    #[test]
    fn join_and_order_by_identifiers_are_normalized() {
        let text = rewrite("SELECT a.x FROM alpha a JOIN beta b ON a.id = b.id ORDER BY x");
        assert!(text.starts_with("SELECT * FROM \"ALPHA\""));
        assert!(text.contains(r#"JOIN "BETA""#));
        assert!(text.contains(r#""A"."ID" = "B"."ID""#));
        assert!(text.ends_with(r#"ORDER BY "X""#));
    }

    #[test]
    fn string_literals_are_untouched() {
        let text = rewrite("SELECT name FROM person WHERE name = 'lower case'");
        assert!(text.contains("'lower case'"));
    }
}

// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! End-to-end frontend tests: source buffer in, translated raw statements
//! out, with the container and wrapper invariants the shared analyzer
//! depends on checked structurally.

use spansql_ast::{Node, NullTestKind, RawStmt, ResTarget, SelectStmt};
use spansql_frontend::SpannerParser;

fn parse_all(src: &str) -> Vec<RawStmt> {
    SpannerParser::new().parse(src).expect("parse")
}

fn parse_one(src: &str) -> RawStmt {
    let mut stmts = parse_all(src);
    assert_eq!(stmts.len(), 1, "expected one statement in {src:?}");
    stmts.remove(0)
}

fn as_select(raw: &RawStmt) -> &SelectStmt {
    match &raw.stmt {
        Node::SelectStmt(stmt) => stmt,
        other => panic!("expected select, got {}", other.kind()),
    }
}

fn res_target(node: &Node) -> &ResTarget {
    match node {
        Node::ResTarget(rt) => rt,
        other => panic!("expected res target, got {}", other.kind()),
    }
}

#[test]
fn accepted_statement_kinds() {
    struct Case {
        name: &'static str,
        input: &'static str,
        want_err: bool,
    }
    let cases = [
        Case {
            name: "create table",
            input: "CREATE TABLE users (id INT64 NOT NULL, name STRING(100)) PRIMARY KEY (id);",
            want_err: false,
        },
        Case {
            name: "select simple",
            input: "SELECT * FROM users;",
            want_err: false,
        },
        Case {
            name: "select with where",
            input: "SELECT id, name FROM users WHERE id = 1;",
            want_err: false,
        },
        Case {
            name: "insert",
            input: "INSERT INTO users (id, name) VALUES (1, 'Alice');",
            want_err: false,
        },
        Case {
            name: "update",
            input: "UPDATE users SET name = 'Bob' WHERE id = 1;",
            want_err: false,
        },
        Case {
            name: "delete",
            input: "DELETE FROM users WHERE id = 1;",
            want_err: false,
        },
        Case {
            name: "safe prefixed function",
            input: "SELECT SAFE.SUBSTR(name, 0, -2) FROM users;",
            want_err: false,
        },
        Case {
            name: "multiple statements",
            input: "SELECT * FROM users; SELECT * FROM products;",
            want_err: false,
        },
        Case {
            name: "syntax error",
            input: "SELECT FROM users;",
            want_err: true,
        },
        Case {
            name: "unknown keyword",
            input: "SELEKT * FROM users;",
            want_err: true,
        },
        Case {
            name: "unclosed string",
            input: "SELECT * FROM users WHERE name = 'unclosed;",
            want_err: true,
        },
    ];

    let parser = SpannerParser::new();
    for case in cases {
        let result = parser.parse(case.input);
        if case.want_err {
            let err = result.expect_err(case.name);
            assert_eq!(err.message, "syntax error", "{}", case.name);
            assert!(err.line >= 1 && err.column >= 1, "{}", case.name);
        } else {
            let stmts = result.unwrap_or_else(|e| panic!("{}: {e}", case.name));
            assert!(!stmts.is_empty(), "{}", case.name);
            for stmt in stmts {
                assert!(!stmt.stmt.is_todo(), "{}: got placeholder root", case.name);
            }
        }
    }
}

// Splitter position round-trip: the recorded span covers exactly the
// comments, the SQL body and the terminator.
#[test]
fn statement_spans_round_trip_through_the_buffer() {
    let src = "\n-- name: GetUser :one\nSELECT id, name FROM users WHERE id = @user_id;\n\n-- name: ListUsers :many\nSELECT id FROM users;\n";
    let stmts = parse_all(src);
    assert_eq!(stmts.len(), 2);

    let first = &src[stmts[0].stmt_location..stmts[0].stmt_location + stmts[0].stmt_len];
    assert_eq!(
        first,
        "-- name: GetUser :one\nSELECT id, name FROM users WHERE id = @user_id;"
    );
    let second = &src[stmts[1].stmt_location..stmts[1].stmt_location + stmts[1].stmt_len];
    assert_eq!(second, "-- name: ListUsers :many\nSELECT id FROM users;");
}

#[test]
fn semicolons_inside_literals_do_not_split_statements() {
    let stmts = parse_all("SELECT 'a;b' FROM t; SELECT 1;");
    assert_eq!(stmts.len(), 2);
}

// Scenario: simple select with a named parameter.
#[test]
fn simple_select_scenario() {
    let raw = parse_one("SELECT id, name, email FROM users WHERE id = @user_id;");
    let select = as_select(&raw);

    let names: Vec<Option<&str>> = select
        .target_list
        .iter()
        .map(|item| res_target(item).name.as_deref())
        .collect();
    assert_eq!(names, vec![Some("id"), Some("name"), Some("email")]);

    for item in &select.target_list {
        assert!(matches!(
            res_target(item).val,
            Some(Node::ColumnRef(_))
        ));
    }

    match select.where_clause.as_ref().expect("where") {
        Node::AExpr(expr) => {
            assert_eq!(expr.name, vec![Node::String("=".into())]);
            match expr.rexpr.as_ref().expect("rexpr") {
                Node::ParamRef(param) => assert_eq!(param.number, 1),
                other => panic!("expected param, got {}", other.kind()),
            }
        }
        other => panic!("expected a_expr, got {}", other.kind()),
    }
}

// Scenario: THEN RETURN on INSERT.
#[test]
fn then_return_scenario() {
    let raw = parse_one(
        "INSERT INTO users (id, name, email) VALUES (@id, @name, @email) \
         THEN RETURN id, name, email;",
    );
    let insert = match &raw.stmt {
        Node::InsertStmt(stmt) => stmt,
        other => panic!("expected insert, got {}", other.kind()),
    };

    let cols: Vec<String> = insert
        .cols
        .iter()
        .map(|col| match col {
            Node::ColumnRef(cr) => match &cr.fields[0] {
                Node::String(s) => s.clone(),
                other => panic!("expected string, got {}", other.kind()),
            },
            other => panic!("expected column ref, got {}", other.kind()),
        })
        .collect();
    assert_eq!(cols, vec!["id", "name", "email"]);

    let values = match insert.select_stmt.as_ref().expect("values") {
        Node::SelectStmt(stmt) => stmt.values_lists.as_ref().expect("values lists"),
        other => panic!("expected select, got {}", other.kind()),
    };
    match &values[0] {
        Node::List(row) => {
            let numbers: Vec<i32> = row
                .iter()
                .map(|node| match node {
                    Node::ParamRef(p) => p.number,
                    other => panic!("expected param, got {}", other.kind()),
                })
                .collect();
            assert_eq!(numbers, vec![1, 2, 3]);
        }
        other => panic!("expected list, got {}", other.kind()),
    }

    assert_eq!(insert.returning_list.len(), 3);
}

// THEN RETURN produces the same result-target shapes as a SELECT
// projection of the same items.
#[test]
fn then_return_matches_select_projection_shape() {
    let insert = parse_one("INSERT INTO t (a) VALUES (1) THEN RETURN a, b AS c, *;");
    let returning = match &insert.stmt {
        Node::InsertStmt(stmt) => &stmt.returning_list,
        other => panic!("expected insert, got {}", other.kind()),
    };

    let select_raw = parse_one("SELECT a, b AS c, * FROM t;");
    let projection = &as_select(&select_raw).target_list;

    assert_eq!(returning.len(), projection.len());
    for (ret, proj) in returning.iter().zip(projection.iter()) {
        let (ret, proj) = (res_target(ret), res_target(proj));
        assert_eq!(ret.name, proj.name);
        // Values match structurally modulo byte positions.
        assert_eq!(
            strip_locations(ret.val.clone().expect("val")),
            strip_locations(proj.val.clone().expect("val"))
        );
    }
}

fn strip_locations(node: Node) -> String {
    // Positions differ between the two sources; compare shape via the
    // debug rendering with location fields zeroed out.
    let json = serde_json::to_value(&node).expect("serialize");
    fn zero(v: &mut serde_json::Value) {
        match v {
            serde_json::Value::Object(map) => {
                if let Some(loc) = map.get_mut("location") {
                    *loc = serde_json::Value::from(0);
                }
                for value in map.values_mut() {
                    zero(value);
                }
            }
            serde_json::Value::Array(items) => items.iter_mut().for_each(zero),
            _ => {}
        }
    }
    let mut json = json;
    zero(&mut json);
    json.to_string()
}

// Scenario: UNNEST with offset alias.
#[test]
fn unnest_with_offset_scenario() {
    let raw = parse_one("SELECT value, pos FROM UNNEST(@arr) AS value WITH OFFSET AS pos;");
    let select = as_select(&raw);
    match &select.from_clause[0] {
        Node::RangeFunction(rf) => {
            assert!(rf.ordinality);
            assert_eq!(rf.alias.as_ref().expect("alias").aliasname, "value");
            match &rf.functions[0] {
                Node::List(fns) => match &fns[0] {
                    Node::FuncCall(call) => {
                        assert_eq!(call.func.name, "unnest");
                        match &call.args[0] {
                            Node::ParamRef(p) => assert_eq!(p.number, 1),
                            other => panic!("expected param, got {}", other.kind()),
                        }
                    }
                    other => panic!("expected func call, got {}", other.kind()),
                },
                other => panic!("expected list, got {}", other.kind()),
            }
        }
        other => panic!("expected range function, got {}", other.kind()),
    }
}

// Scenario: SAFE. and namespaced calls keep their case and resolve in the
// catalog.
#[test]
fn safe_and_namespaced_function_scenario() {
    let raw = parse_one("SELECT SAFE.SUBSTR(name, 0, -2), NET.IPV4_TO_INT64(ip) FROM t;");
    let select = as_select(&raw);

    let names: Vec<String> = select
        .target_list
        .iter()
        .map(|item| match res_target(item).val.as_ref().expect("val") {
            Node::FuncCall(call) => call.func.name.clone(),
            other => panic!("expected call, got {}", other.kind()),
        })
        .collect();
    assert_eq!(names, vec!["SAFE.SUBSTR", "NET.IPV4_TO_INT64"]);

    let catalog = spansql_frontend::default_catalog();
    let schema = catalog.default_schema().expect("schema");
    let safe_substr = schema
        .funcs_named("SAFE.SUBSTR")
        .next()
        .expect("SAFE.SUBSTR resolves");
    assert!(safe_substr.nullable);
    assert!(schema.funcs_named("NET.IPV4_TO_INT64").next().is_some());
}

// Scenario: typed struct field access keeps the "name:TYPE" sidechannel.
#[test]
fn typed_struct_field_access_scenario() {
    let raw = parse_one("SELECT STRUCT<id INT64, name STRING>(42, 'Alice').name;");
    let select = as_select(&raw);
    match res_target(&select.target_list[0]).val.as_ref().expect("val") {
        Node::AIndirection(ind) => {
            assert_eq!(ind.indirection, vec![Node::String("name".into())]);
            match &ind.arg {
                Node::RowExpr(row) => {
                    assert_eq!(
                        row.colnames,
                        vec![
                            Node::String("id:INT64".into()),
                            Node::String("name:STRING".into())
                        ]
                    );
                    assert_eq!(row.args.len(), 2);
                }
                other => panic!("expected row expr, got {}", other.kind()),
            }
        }
        other => panic!("expected indirection, got {}", other.kind()),
    }
}

// Scenario: parameter reuse keeps the first index.
#[test]
fn parameter_reuse_scenario() {
    let raw = parse_one("UPDATE users SET name = @name WHERE id = @id AND name != @name;");
    let update = match &raw.stmt {
        Node::UpdateStmt(stmt) => stmt,
        other => panic!("expected update, got {}", other.kind()),
    };

    let mut numbers = Vec::new();
    collect_params(&Node::UpdateStmt(update.clone()), &mut numbers);
    numbers.sort_unstable();
    assert_eq!(numbers, vec![1, 1, 2]);
}

fn collect_params(node: &Node, out: &mut Vec<i32>) {
    let json = serde_json::to_value(node).expect("serialize");
    fn walk(v: &serde_json::Value, out: &mut Vec<i32>) {
        match v {
            serde_json::Value::Object(map) => {
                if let Some(param) = map.get("ParamRef") {
                    if let Some(number) = param.get("number").and_then(|n| n.as_i64()) {
                        out.push(number as i32);
                    }
                }
                for value in map.values() {
                    walk(value, out);
                }
            }
            serde_json::Value::Array(items) => {
                for item in items {
                    walk(item, out);
                }
            }
            _ => {}
        }
    }
    walk(&json, out);
}

// Parameter numbering restarts per statement.
#[test]
fn parameter_numbering_is_per_statement() {
    let stmts = parse_all("SELECT @a, @b; SELECT @c;");
    let mut first = Vec::new();
    collect_params(&stmts[0].stmt, &mut first);
    let mut second = Vec::new();
    collect_params(&stmts[1].stmt, &mut second);
    assert_eq!(first, vec![1, 2]);
    assert_eq!(second, vec![1]);
}

// Container discipline on every DML kind.
#[test]
fn always_iterable_lists_are_present_and_optionals_absent() {
    let select_raw = parse_one("SELECT 1;");
    let select = as_select(&select_raw);
    assert!(select.from_clause.is_empty());
    assert!(select.where_clause.is_none());
    assert!(select.group_clause.is_none());
    assert!(select.sort_clause.is_none());
    assert!(select.limit_count.is_none());
    assert!(select.limit_offset.is_none());
    assert!(select.with_clause.is_none());
    assert!(select.values_lists.is_none());

    let insert_raw = parse_one("INSERT INTO t VALUES (1);");
    match &insert_raw.stmt {
        Node::InsertStmt(stmt) => {
            assert!(stmt.cols.is_empty());
            assert!(stmt.returning_list.is_empty());
        }
        other => panic!("expected insert, got {}", other.kind()),
    }

    let delete_raw = parse_one("DELETE FROM t;");
    match &delete_raw.stmt {
        Node::DeleteStmt(stmt) => {
            assert_eq!(stmt.relations.len(), 1);
            assert!(stmt.using_clause.is_empty());
            assert!(stmt.where_clause.is_none());
            assert!(stmt.returning_list.is_empty());
        }
        other => panic!("expected delete, got {}", other.kind()),
    }

    let update_raw = parse_one("UPDATE t SET a = 1;");
    match &update_raw.stmt {
        Node::UpdateStmt(stmt) => {
            assert_eq!(stmt.relations.len(), 1);
            assert!(stmt.from_clause.is_empty());
            assert!(stmt.returning_list.is_empty());
            assert!(stmt.with_clause.is_none());
        }
        other => panic!("expected update, got {}", other.kind()),
    }
}

// Star wrapping everywhere a projection can appear.
#[test]
fn stars_are_always_wrapped_in_column_refs() {
    for src in [
        "SELECT * FROM t;",
        "SELECT t.* FROM t;",
        "INSERT INTO t (a) VALUES (1) THEN RETURN *;",
        "DELETE FROM t THEN RETURN *;",
    ] {
        let raw = parse_one(src);
        let targets: Vec<Node> = match &raw.stmt {
            Node::SelectStmt(stmt) => stmt.target_list.clone(),
            Node::InsertStmt(stmt) => stmt.returning_list.clone(),
            Node::DeleteStmt(stmt) => stmt.returning_list.clone(),
            other => panic!("unexpected root {}", other.kind()),
        };
        for target in &targets {
            match res_target(target).val.as_ref().expect("val") {
                Node::ColumnRef(cr) => {
                    assert_eq!(cr.fields.last(), Some(&Node::AStar), "{src}");
                }
                other => panic!("{src}: expected column ref, got {}", other.kind()),
            }
        }
    }
}

// Identifier case-insensitivity yields structurally identical trees.
#[test]
fn identifier_case_does_not_change_the_tree() {
    let upper = parse_one("SELECT Id FROM Users;");
    let lower = parse_one("select id from users;");
    assert_eq!(upper.stmt, lower.stmt);
}

// Name inference for bare columns and aliases.
#[test]
fn projection_names_support_column_inference() {
    let raw = parse_one("SELECT c, expr_col + 1 AS a, t.other FROM t;");
    let select = as_select(&raw);
    let names: Vec<Option<&str>> = select
        .target_list
        .iter()
        .map(|item| res_target(item).name.as_deref())
        .collect();
    assert_eq!(names, vec![Some("c"), Some("a"), Some("other")]);
}

// IFNULL lowering places the fallback in the default branch.
#[test]
fn conditional_functions_lower_to_case() {
    let raw = parse_one("SELECT IF(a, 1, 2), IFNULL(b, 0), NULLIF(c, ''), COALESCE(d, e);");
    let select = as_select(&raw);

    match res_target(&select.target_list[0]).val.as_ref().expect("val") {
        Node::CaseExpr(case) => assert_eq!(case.args.len(), 1),
        other => panic!("IF: expected case, got {}", other.kind()),
    }
    match res_target(&select.target_list[1]).val.as_ref().expect("val") {
        Node::CaseExpr(case) => match &case.args[0] {
            Node::CaseWhen(when) => match &when.expr {
                Node::NullTest(test) => {
                    assert_eq!(test.null_test_kind, NullTestKind::IsNotNull)
                }
                other => panic!("IFNULL: expected null test, got {}", other.kind()),
            },
            other => panic!("IFNULL: expected when, got {}", other.kind()),
        },
        other => panic!("IFNULL: expected case, got {}", other.kind()),
    }
    match res_target(&select.target_list[2]).val.as_ref().expect("val") {
        Node::CaseExpr(case) => assert!(case.defresult.is_some()),
        other => panic!("NULLIF: expected case, got {}", other.kind()),
    }
    match res_target(&select.target_list[3]).val.as_ref().expect("val") {
        Node::CoalesceExpr(c) => assert_eq!(c.args.len(), 2),
        other => panic!("COALESCE: expected coalesce, got {}", other.kind()),
    }
}

// Unsupported roots are skipped, not fatal.
#[test]
fn unsupported_statements_are_skipped() {
    let stmts = parse_all("SELECT 1 UNION ALL SELECT 2; SELECT 3;");
    assert_eq!(stmts.len(), 1);
    match &stmts[0].stmt {
        Node::SelectStmt(stmt) => assert_eq!(stmt.target_list.len(), 1),
        other => panic!("expected select, got {}", other.kind()),
    }
}

// Positions in the translated tree are absolute buffer offsets.
#[test]
fn expression_positions_are_buffer_absolute() {
    let src = "SELECT 1;\n-- name: GetUser :one\nSELECT id FROM users WHERE id = @uid;";
    let stmts = parse_all(src);
    assert_eq!(stmts.len(), 2);
    let select = as_select(&stmts[1]);
    match select.where_clause.as_ref().expect("where") {
        Node::AExpr(expr) => match expr.rexpr.as_ref().expect("rexpr") {
            Node::ParamRef(param) => {
                assert_eq!(param.location as usize, src.find("@uid").expect("param"));
            }
            other => panic!("expected param, got {}", other.kind()),
        },
        other => panic!("expected a_expr, got {}", other.kind()),
    }
}

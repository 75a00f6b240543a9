// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Reserved-keyword partition over a representative vocabulary.

use spansql_grammar::is_keyword;

#[test]
fn reserved_keywords() {
    let reserved = [
        "SELECT", "select", "FROM", "WHERE", "CREATE", "JOIN", "LEFT", "RIGHT", "INNER",
        "OUTER", "AS", "AND", "OR", "NOT", "NULL", "TRUE", "FALSE", "CASE", "WHEN", "THEN",
        "ELSE", "END", "GROUP", "BY", "ORDER", "HAVING", "LIMIT", "UNION", "ALL", "DISTINCT",
        "BETWEEN", "IN", "EXISTS", "LIKE", "IS", "CAST", "EXTRACT", "INTERVAL", "ARRAY",
        "STRUCT", "WITH", "WINDOW", "PARTITION", "OVER", "ROWS", "RANGE", "UNBOUNDED",
        "PRECEDING", "FOLLOWING", "CURRENT", "EXCLUDE", "GROUPS", "NO", "RECURSIVE", "CROSS",
        "FULL", "NATURAL", "USING", "ON", "IF", "DEFAULT", "SET", "COLLATE", "ASC", "DESC",
        "NULLS", "ESCAPE", "INTERSECT", "EXCEPT", "FOR", "TABLESAMPLE", "CUBE", "ROLLUP",
        "GROUPING", "LATERAL", "UNNEST", "RESPECT", "IGNORE", "FETCH", "OF", "TO", "AT",
        "CONTAINS", "MERGE", "HASH", "WITHIN", "LOOKUP", "PROTO", "ENUM", "DEFINE",
        "ASSERT_ROWS_MODIFIED",
    ];
    for word in reserved {
        assert!(is_keyword(word), "expected {word} to be reserved");
    }
}

#[test]
fn context_keywords_can_be_identifiers() {
    let context = [
        "INSERT", "UPDATE", "DELETE", "DROP", "ALTER", "TABLE", "INDEX", "VIEW", "FUNCTION",
        "PROCEDURE", "TRIGGER", "MATCHED", "OTHERS", "TIES", "FIRST", "LAST", "ORDINALITY",
        "REPEATABLE", "SETS", "QUALIFY", "VALUE", "VALUES", "OFFSET",
    ];
    for word in context {
        assert!(!is_keyword(word), "expected {word} to be usable as identifier");
    }
}

#[test]
fn ordinary_identifiers_are_not_keywords() {
    for word in ["mycolumn", "user_id", "customer_name", "order_date", "_underscore"] {
        assert!(!is_keyword(word), "{word} is a plain identifier");
    }
}

#[test]
fn garbage_inputs_are_not_keywords() {
    for word in ["", "123", "@param", "SELECT FROM", "ORDER BY"] {
        assert!(!is_keyword(word), "{word:?} is not a single keyword");
    }
}

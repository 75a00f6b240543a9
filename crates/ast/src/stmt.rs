// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Query and DML statement nodes.
//!
//! The container discipline documented at the crate root is enforced here
//! structurally: fields the analyzer iterates unconditionally are `Vec`s
//! (empty when no items exist), fields it checks first are `Option`s.

use serde::{Deserialize, Serialize};

use crate::{Location, Node};

/// `SELECT` statement. Also the carrier for `VALUES` lists: an `INSERT …
/// VALUES` input becomes a select node whose `values_lists` is set and whose
/// `target_list` is empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SelectStmt {
    /// Projection. Always present; walked unconditionally.
    pub target_list: Vec<Node>,
    /// FROM sources. Always present; walked unconditionally.
    pub from_clause: Vec<Node>,
    pub where_clause: Option<Node>,
    pub group_clause: Option<Vec<Node>>,
    pub having_clause: Option<Node>,
    /// List of [`Node::SortBy`] items.
    pub sort_clause: Option<Vec<Node>>,
    pub limit_count: Option<Node>,
    pub limit_offset: Option<Node>,
    pub with_clause: Option<WithClause>,
    /// Rows of a `VALUES` clause, each a [`Node::List`].
    pub values_lists: Option<Vec<Node>>,
}

/// Projection or returning-list entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResTarget {
    /// Output column name: the alias, or the bare column identifier when the
    /// projection is a plain reference (used for column-name inference).
    pub name: Option<String>,
    pub val: Option<Node>,
    pub location: Location,
}

impl ResTarget {
    pub fn new(val: Node) -> Self {
        Self {
            name: None,
            val: Some(val),
            location: -1,
        }
    }

    pub fn named(name: impl Into<String>, val: Node) -> Self {
        Self {
            name: Some(name.into()),
            val: Some(val),
            location: -1,
        }
    }
}

/// Table alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasClause {
    pub aliasname: String,
    pub colnames: Vec<Node>,
}

impl AliasClause {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            aliasname: name.into(),
            colnames: Vec::new(),
        }
    }
}

/// Plain table reference in FROM (or the target of DML).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeVar {
    pub catalogname: Option<String>,
    pub schemaname: Option<String>,
    pub relname: String,
    pub alias: Option<AliasClause>,
    pub location: Location,
}

impl RangeVar {
    pub fn new(relname: impl Into<String>) -> Self {
        Self {
            catalogname: None,
            schemaname: None,
            relname: relname.into(),
            alias: None,
            location: -1,
        }
    }
}

/// Subquery in FROM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeSubselect {
    pub subquery: Node,
    pub alias: Option<AliasClause>,
}

/// Table-valued function in FROM (`UNNEST`). `functions` nests each call in
/// its own [`Node::List`], matching the grouped-function layout the analyzer
/// traverses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeFunction {
    pub functions: Vec<Node>,
    /// `WITH OFFSET` / `WITH ORDINALITY` marker.
    pub ordinality: bool,
    pub alias: Option<AliasClause>,
}

/// Join kind. Comma joins and `CROSS JOIN` are both expressed as `Inner`
/// with no qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
}

/// Join tree node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinExpr {
    pub jointype: JoinKind,
    pub larg: Node,
    pub rarg: Node,
    /// `ON` condition.
    pub quals: Option<Node>,
    /// `USING (…)` column names as string nodes.
    pub using_clause: Option<Vec<Node>>,
}

/// Sort direction for ORDER BY and index elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Default,
    Asc,
    Desc,
}

/// One ORDER BY item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortBy {
    pub node: Node,
    pub sortby_dir: SortDirection,
}

/// `WITH` clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithClause {
    /// List of [`Node::CommonTableExpr`] items.
    pub ctes: Vec<Node>,
    pub recursive: bool,
    pub location: Location,
}

/// One CTE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonTableExpr {
    pub ctename: String,
    pub ctequery: Node,
    pub location: Location,
}

/// `INSERT` statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertStmt {
    pub relation: RangeVar,
    /// Column names from the source. Empty when unspecified, never absent.
    pub cols: Vec<Node>,
    /// `VALUES` rows (as a select node with `values_lists`) or a subquery.
    pub select_stmt: Option<Node>,
    /// `THEN RETURN` projection. Empty when absent, never `None`.
    pub returning_list: Vec<Node>,
}

/// `UPDATE` statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateStmt {
    /// Single-element list holding the target [`Node::RangeVar`].
    pub relations: Vec<Node>,
    /// One [`Node::ResTarget`] per `SET` item.
    pub target_list: Vec<Node>,
    pub where_clause: Option<Node>,
    pub from_clause: Vec<Node>,
    pub returning_list: Vec<Node>,
    pub with_clause: Option<WithClause>,
}

/// `DELETE` statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteStmt {
    pub relations: Vec<Node>,
    pub using_clause: Vec<Node>,
    pub where_clause: Option<Node>,
    pub returning_list: Vec<Node>,
    pub with_clause: Option<WithClause>,
}

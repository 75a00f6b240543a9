// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! DDL statement nodes.

use serde::{Deserialize, Serialize};

use crate::stmt::{RangeVar, SortDirection};
use crate::{Node, TypeName};

/// Fully qualified table name, up to `catalog.schema.name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableName {
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub name: String,
}

impl TableName {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            catalog: None,
            schema: None,
            name: name.into(),
        }
    }
}

/// Column definition inside `CREATE TABLE` / `ADD COLUMN`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub colname: String,
    pub type_name: TypeName,
    pub is_not_null: bool,
    /// Extra constraints (`NOT NULL` expressed as a constraint node when the
    /// column arrives through `ALTER TABLE ADD COLUMN`).
    pub constraints: Vec<Node>,
}

/// Constraint kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ConstraintKind {
    NotNull,
}

/// Column or table constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub contype: ConstraintKind,
}

/// `CREATE TABLE`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTableStmt {
    pub if_not_exists: bool,
    pub name: TableName,
    pub cols: Vec<ColumnDef>,
}

/// `DROP TABLE`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropTableStmt {
    pub if_exists: bool,
    pub tables: Vec<TableName>,
}

/// `CREATE INDEX`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexStmt {
    pub idxname: String,
    pub relation: RangeVar,
    pub unique: bool,
    pub if_not_exists: bool,
    /// List of [`Node::IndexElem`] items. Always present.
    pub params: Vec<Node>,
}

/// One indexed column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexElem {
    pub name: Option<String>,
    pub ordering: SortDirection,
}

/// Object kind removed by a [`DropStmt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ObjectType {
    Index,
    View,
}

/// Generic `DROP` for non-table objects; `objects` holds name string nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropStmt {
    pub remove_type: ObjectType,
    pub if_exists: bool,
    pub objects: Vec<Node>,
}

/// `ALTER TABLE` and its command list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlterTableStmt {
    pub table: RangeVar,
    /// List of [`Node::AlterTableCmd`] items. Always present.
    pub cmds: Vec<Node>,
}

/// Subcommand discriminator for [`AlterTableCmd`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum AlterTableType {
    AddColumn,
    DropColumn,
    AlterColumnType,
    ColumnDefault,
    DropDefault,
}

/// One `ALTER TABLE` subcommand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlterTableCmd {
    pub subtype: AlterTableType,
    pub name: Option<String>,
    pub def: Option<Node>,
}

/// `CREATE [OR REPLACE] VIEW`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewStmt {
    pub view: RangeVar,
    pub query: Node,
    pub replace: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_name_defaults_to_bare() {
        let t = TableName::new("users");
        assert!(t.schema.is_none() && t.catalog.is_none());
        assert_eq!(t.name, "users");
    }
}

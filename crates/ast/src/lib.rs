// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Engine-Neutral AST
//!
//! This crate defines the PostgreSQL-shaped AST that the shared analyzer
//! operates on. Dialect frontends translate their native parse trees into
//! these nodes; the analyzer then resolves column types, output schemas and
//! parameter bindings without knowing which dialect produced them.
//!
//! ## Design
//!
//! The tree is a single [`Node`] sum type whose variants wrap one struct per
//! node kind. Two container conventions are load-bearing for the analyzer's
//! traversal:
//!
//! - **Always-iterable lists** are plain `Vec<Node>` fields. They are present
//!   even when empty (`target_list`, `from_clause`, `cols`, `relations`,
//!   `using_clause`, `returning_list`). The analyzer walks them
//!   unconditionally.
//! - **Optional clauses** are `Option<_>` fields and are absent when the
//!   source had no such clause (`where_clause`, `group_clause`,
//!   `sort_clause`, `limit_count`, `limit_offset`, `values_lists`,
//!   `with_clause`). The analyzer checks them before use.
//!
//! ## Wrapper shapes
//!
//! A handful of nestings are required verbatim by the analyzer:
//!
//! - `*` in a projection is `ResTarget` → `ColumnRef` → `AStar`. A bare
//!   [`Node::AStar`] outside a column reference is never produced.
//! - `table.*` is a `ColumnRef` whose fields are the path segments followed
//!   by the `AStar` sentinel.
//! - Typed literals (`DATE '…'`) are a [`TypeCast`] over a string constant
//!   with the same [`TypeName`] shape an explicit `CAST` produces.
//!
//! ## Positions
//!
//! `location` fields are byte offsets into the original source buffer
//! (`-1` when unknown). Frontends are responsible for rebasing positions
//! from per-statement substrings to the full buffer.

pub mod ddl;
pub mod expr;
pub mod stmt;

pub use ddl::{
    AlterTableCmd, AlterTableStmt, AlterTableType, ColumnDef, Constraint, ConstraintKind,
    CreateTableStmt, DropStmt, DropTableStmt, IndexElem, IndexStmt, ObjectType, TableName,
    ViewStmt,
};
pub use expr::{
    AArrayExpr, AConst, AExpr, AExprKind, AIndices, AIndirection, BoolExpr, BoolExprKind,
    CaseExpr, CaseWhen, CoalesceExpr, ColumnRef, FuncCall, FuncName, NullTest, NullTestKind,
    ParamRef, RowExpr, RowCoercion, SubLink, SubLinkKind, TypeCast, TypeName,
};
pub use stmt::{
    AliasClause, CommonTableExpr, DeleteStmt, InsertStmt, JoinExpr, JoinKind, RangeFunction,
    RangeSubselect, RangeVar, ResTarget, SelectStmt, SortBy, SortDirection, UpdateStmt,
    WithClause,
};

use serde::{Deserialize, Serialize};

/// Byte offset into the original source buffer, `-1` when unknown.
pub type Location = i32;

/// A node in the engine-neutral tree.
///
/// Value nodes (`String`, `Integer`, `Float`, `Null`, `AStar`) appear both
/// inside [`AConst`] and raw inside lists such as `ColumnRef::fields` or
/// `TypeName::names`, matching the PostgreSQL layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Node {
    // Values
    String(String),
    Integer(i64),
    Float(String),
    Null,
    /// The wildcard sentinel. Only valid inside a `ColumnRef`.
    AStar,
    /// Heterogeneous ordered container (IN-lists, grouped function lists).
    List(Vec<Node>),

    // Expressions
    AConst(AConst),
    ColumnRef(ColumnRef),
    ParamRef(ParamRef),
    AExpr(Box<AExpr>),
    BoolExpr(BoolExpr),
    NullTest(Box<NullTest>),
    CaseExpr(Box<CaseExpr>),
    CaseWhen(Box<CaseWhen>),
    CoalesceExpr(CoalesceExpr),
    SubLink(Box<SubLink>),
    AArrayExpr(AArrayExpr),
    RowExpr(RowExpr),
    AIndirection(Box<AIndirection>),
    AIndices(Box<AIndices>),
    TypeCast(Box<TypeCast>),
    FuncCall(FuncCall),

    // Query building blocks
    ResTarget(Box<ResTarget>),
    RangeVar(RangeVar),
    RangeSubselect(Box<RangeSubselect>),
    RangeFunction(RangeFunction),
    JoinExpr(Box<JoinExpr>),
    SortBy(Box<SortBy>),
    CommonTableExpr(Box<CommonTableExpr>),

    // Statements
    SelectStmt(Box<SelectStmt>),
    InsertStmt(Box<InsertStmt>),
    UpdateStmt(Box<UpdateStmt>),
    DeleteStmt(Box<DeleteStmt>),
    CreateTableStmt(CreateTableStmt),
    DropTableStmt(DropTableStmt),
    IndexStmt(IndexStmt),
    IndexElem(IndexElem),
    DropStmt(DropStmt),
    AlterTableStmt(AlterTableStmt),
    AlterTableCmd(Box<AlterTableCmd>),
    ViewStmt(Box<ViewStmt>),
    ColumnDef(Box<ColumnDef>),
    Constraint(Constraint),

    /// Placeholder for a dialect construct the translator does not handle.
    /// Statements whose root is a `Todo` are dropped by the frontend.
    Todo,
}

impl Node {
    /// Short tag for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::String(_) => "String",
            Node::Integer(_) => "Integer",
            Node::Float(_) => "Float",
            Node::Null => "Null",
            Node::AStar => "AStar",
            Node::List(_) => "List",
            Node::AConst(_) => "AConst",
            Node::ColumnRef(_) => "ColumnRef",
            Node::ParamRef(_) => "ParamRef",
            Node::AExpr(_) => "AExpr",
            Node::BoolExpr(_) => "BoolExpr",
            Node::NullTest(_) => "NullTest",
            Node::CaseExpr(_) => "CaseExpr",
            Node::CaseWhen(_) => "CaseWhen",
            Node::CoalesceExpr(_) => "CoalesceExpr",
            Node::SubLink(_) => "SubLink",
            Node::AArrayExpr(_) => "AArrayExpr",
            Node::RowExpr(_) => "RowExpr",
            Node::AIndirection(_) => "AIndirection",
            Node::AIndices(_) => "AIndices",
            Node::TypeCast(_) => "TypeCast",
            Node::FuncCall(_) => "FuncCall",
            Node::ResTarget(_) => "ResTarget",
            Node::RangeVar(_) => "RangeVar",
            Node::RangeSubselect(_) => "RangeSubselect",
            Node::RangeFunction(_) => "RangeFunction",
            Node::JoinExpr(_) => "JoinExpr",
            Node::SortBy(_) => "SortBy",
            Node::CommonTableExpr(_) => "CommonTableExpr",
            Node::SelectStmt(_) => "SelectStmt",
            Node::InsertStmt(_) => "InsertStmt",
            Node::UpdateStmt(_) => "UpdateStmt",
            Node::DeleteStmt(_) => "DeleteStmt",
            Node::CreateTableStmt(_) => "CreateTableStmt",
            Node::DropTableStmt(_) => "DropTableStmt",
            Node::IndexStmt(_) => "IndexStmt",
            Node::IndexElem(_) => "IndexElem",
            Node::DropStmt(_) => "DropStmt",
            Node::AlterTableStmt(_) => "AlterTableStmt",
            Node::AlterTableCmd(_) => "AlterTableCmd",
            Node::ViewStmt(_) => "ViewStmt",
            Node::ColumnDef(_) => "ColumnDef",
            Node::Constraint(_) => "Constraint",
            Node::Todo => "Todo",
        }
    }

    /// Whether this node is the unsupported-construct placeholder.
    pub fn is_todo(&self) -> bool {
        matches!(self, Node::Todo)
    }
}

/// One parsed statement together with its span in the original buffer.
///
/// `location` points at the first byte of the statement *including* any
/// metadata comments that precede it; `length` extends through the
/// terminating `;` when present. The invariant
/// `location <= first SQL token <= location + length` always holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawStmt {
    /// Translated statement root.
    pub stmt: Node,
    /// Byte offset of the statement including preceding comments.
    pub stmt_location: usize,
    /// Bytes from `stmt_location` through the terminator.
    pub stmt_len: usize,
}

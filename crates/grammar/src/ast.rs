// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Dialect AST.
//!
//! These nodes mirror GoogleSQL's surface grammar one-to-one: named
//! parameters, `THEN RETURN`, typed/typeless `STRUCT` literals, `UNNEST`
//! value tables, `SAFE.`-prefixed and namespaced function calls, interleaved
//! tables. Translation into the engine-neutral tree happens in a separate
//! crate; nothing here is analyzer-facing.
//!
//! All positions are absolute byte offsets into the text handed to the
//! parser.

use serde::{Deserialize, Serialize};

/// Identifier with its source position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ident {
    pub name: String,
    pub pos: usize,
}

impl Ident {
    pub fn new(name: impl Into<String>, pos: usize) -> Self {
        Self {
            name: name.into(),
            pos,
        }
    }
}

/// Dotted identifier path (`schema.table`, `NET.IPV4_TO_INT64`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    pub idents: Vec<Ident>,
}

impl Path {
    pub fn pos(&self) -> usize {
        self.idents.first().map_or(0, |i| i.pos)
    }

    /// Segments joined with `.`, case preserved.
    pub fn dotted(&self) -> String {
        let parts: Vec<&str> = self.idents.iter().map(|i| i.name.as_str()).collect();
        parts.join(".")
    }
}

/// Top-level statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Statement {
    Query(QueryStatement),
    Insert(Insert),
    Update(Update),
    Delete(Delete),
    CreateTable(CreateTable),
    DropTable(DropTable),
    CreateIndex(CreateIndex),
    DropIndex(DropIndex),
    AlterTable(AlterTable),
    CreateView(CreateView),
    DropView(DropView),
}

/// Wrapper over the actual query, matching the grammar's statement rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryStatement {
    pub query: Query,
}

/// A query: `WITH`, the query expression, then `ORDER BY` / `LIMIT` which
/// attach *outside* the inner `SELECT` in GoogleSQL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub with: Option<With>,
    pub expr: QueryExpr,
    pub order_by: Vec<OrderByItem>,
    pub limit: Option<Limit>,
}

/// Body of a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum QueryExpr {
    Select(Box<Select>),
    /// Parenthesized query.
    Sub(Box<Query>),
    /// `UNION` / `INTERSECT` / `EXCEPT` chain.
    Compound {
        op: SetOp,
        distinct: bool,
        queries: Vec<QueryExpr>,
    },
}

/// Set operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetOp {
    Union,
    Intersect,
    Except,
}

/// `WITH` clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct With {
    pub ctes: Vec<Cte>,
}

/// One common table expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cte {
    pub name: Ident,
    pub query: Query,
}

/// `ORDER BY` item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderByItem {
    pub expr: Expr,
    pub dir: Option<Direction>,
}

/// Explicit sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Asc,
    Desc,
}

/// `LIMIT count [OFFSET skip]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Limit {
    pub count: Expr,
    pub offset: Option<Expr>,
}

/// `SELECT AS STRUCT` / `SELECT AS VALUE` modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectAs {
    Struct,
    Value,
}

/// `SELECT` clause set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Select {
    pub distinct: bool,
    pub select_as: Option<SelectAs>,
    pub results: Vec<SelectItem>,
    pub from: Option<TableExpr>,
    pub where_clause: Option<Expr>,
    pub group_by: Vec<Expr>,
    pub having: Option<Expr>,
}

/// Projection item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum SelectItem {
    /// `*`, with optional `EXCEPT (…)` / `REPLACE (…)` modifiers.
    Star {
        pos: usize,
        except: Vec<Ident>,
        replace: Vec<StarReplaceItem>,
    },
    /// `expr.*`.
    DotStar {
        expr: Expr,
        except: Vec<Ident>,
        replace: Vec<StarReplaceItem>,
    },
    /// `expr AS alias`.
    Alias { expr: Expr, alias: Ident },
    /// Bare expression projection.
    Expr(Expr),
}

/// One `* REPLACE (expr AS name)` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarReplaceItem {
    pub expr: Expr,
    pub name: Ident,
}

/// Table expression in `FROM`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum TableExpr {
    /// Plain table reference.
    Table {
        name: Path,
        alias: Option<Ident>,
        sample: Option<TableSample>,
    },
    /// Join tree node.
    Join(Box<Join>),
    /// Parenthesized table expression.
    Paren(Box<TableExpr>),
    /// Subquery source.
    SubQuery {
        query: Box<Query>,
        alias: Option<Ident>,
        sample: Option<TableSample>,
    },
    /// `UNNEST(expr)` value table.
    Unnest(Unnest),
}

/// `UNNEST(expr) [AS v] [WITH OFFSET [AS o]]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unnest {
    pub pos: usize,
    pub expr: Expr,
    pub alias: Option<Ident>,
    pub with_offset: Option<WithOffset>,
}

/// `WITH OFFSET` and its optional alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithOffset {
    pub alias: Option<Ident>,
}

/// Join operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinOp {
    Comma,
    Cross,
    Inner,
    LeftOuter,
    RightOuter,
    FullOuter,
}

/// Join condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JoinCond {
    On(Expr),
    Using(Vec<Ident>),
    None,
}

/// Binary join node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    pub op: JoinOp,
    pub left: TableExpr,
    pub right: TableExpr,
    pub cond: JoinCond,
}

/// `TABLESAMPLE method (…)`; runtime-only, recorded but not interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSample {
    pub method: String,
}

/// Binary operator spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Concat,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Like,
    NotLike,
    And,
    Or,
}

impl BinaryOp {
    /// Source spelling, as carried into the engine-neutral operator name.
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Concat => "||",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::Eq => "=",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::Like => "LIKE",
            BinaryOp::NotLike => "NOT LIKE",
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
        }
    }
}

/// Unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Not,
    Plus,
    Minus,
    BitNot,
}

/// Subscript addressing mode: `a[i]`, `a[OFFSET(i)]`, `a[ORDINAL(i)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexKind {
    Plain,
    Offset,
    Ordinal,
}

/// Right side of `IN`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InCond {
    Values(Vec<Expr>),
    SubQuery(Box<Query>),
    Unnest(Box<Expr>),
}

/// Scalar type in expressions (`CAST` targets, typed struct fields).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Type {
    /// `INT64`, `STRING`, `DATE`, … name preserved uppercase as written.
    Simple(String),
    Array(Box<Type>),
    Struct(Vec<StructTypeField>),
}

/// One `name TYPE` entry of a `STRUCT<…>` type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructTypeField {
    pub name: Option<Ident>,
    pub ty: Type,
}

/// Column type in DDL, where `STRING`/`BYTES` carry a size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum SchemaType {
    Scalar(String),
    /// `STRING(n)` / `BYTES(n)` / `STRING(MAX)`.
    Sized {
        name: String,
        size: Option<u64>,
        max: bool,
    },
    Array(Box<SchemaType>),
}

/// Interval datetime part (`DAY`, `MONTH`, …), spelling preserved uppercase.
pub type DateTimePart = String;

/// Argument of a typeless struct literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StructArg {
    Expr(Expr),
    Alias { expr: Expr, alias: Ident },
}

/// One `[name] TYPE` field of a typed struct literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructLitField {
    pub name: Option<Ident>,
    pub ty: Type,
}

/// One `WHEN … THEN …` arm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseWhen {
    pub cond: Expr,
    pub then: Expr,
    pub pos: usize,
}

/// Expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Expr {
    Ident(Ident),
    Path(Path),
    Param {
        name: String,
        pos: usize,
    },
    IntLit {
        value: String,
        base: u32,
        pos: usize,
    },
    FloatLit {
        value: String,
        pos: usize,
    },
    StringLit {
        value: String,
        pos: usize,
    },
    BytesLit {
        value: Vec<u8>,
        pos: usize,
    },
    BoolLit {
        value: bool,
        pos: usize,
    },
    NullLit {
        pos: usize,
    },
    /// `DATE '…'`.
    DateLit {
        value: String,
        pos: usize,
    },
    /// `TIMESTAMP '…'`.
    TimestampLit {
        value: String,
        pos: usize,
    },
    /// `NUMERIC '…'`.
    NumericLit {
        value: String,
        pos: usize,
    },
    /// `JSON '…'`.
    JsonLit {
        value: String,
        pos: usize,
    },
    /// `[a, b, c]` or `ARRAY<T>[a, b, c]`.
    ArrayLit {
        values: Vec<Expr>,
        pos: usize,
    },
    /// `STRUCT<f T, …>(v, …)`.
    TypedStruct {
        fields: Vec<StructLitField>,
        values: Vec<Expr>,
        pos: usize,
    },
    /// `STRUCT(v [AS a], …)`.
    TypelessStruct {
        args: Vec<StructArg>,
        pos: usize,
    },
    /// `(a, b, …)` with at least two elements.
    TupleStruct {
        values: Vec<Expr>,
        pos: usize,
    },
    /// `INTERVAL n UNIT`.
    IntervalSingle {
        value: Box<Expr>,
        part: DateTimePart,
        pos: usize,
    },
    /// `INTERVAL '…' START TO END`.
    IntervalRange {
        value: String,
        start: DateTimePart,
        end: DateTimePart,
        pos: usize,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
        pos: usize,
    },
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
        pos: usize,
    },
    /// Function call; `func` keeps the namespaced path in original case.
    /// `over` records the presence of an analytic `OVER (…)` clause; the
    /// window specification itself does not affect type resolution.
    Call {
        func: Path,
        args: Vec<Expr>,
        distinct: bool,
        over: bool,
    },
    /// `COUNT(*)`.
    CountStar {
        pos: usize,
    },
    Case {
        operand: Option<Box<Expr>>,
        whens: Vec<CaseWhen>,
        else_result: Option<Box<Expr>>,
        pos: usize,
    },
    /// `CAST` / `SAFE_CAST`.
    Cast {
        expr: Box<Expr>,
        ty: Type,
        safe: bool,
        pos: usize,
    },
    In {
        left: Box<Expr>,
        not: bool,
        cond: InCond,
    },
    IsNull {
        left: Box<Expr>,
        not: bool,
        pos: usize,
    },
    /// `IS [NOT] TRUE/FALSE`; parsed for totality, no lowering today.
    IsBool {
        left: Box<Expr>,
        not: bool,
        value: bool,
        pos: usize,
    },
    Between {
        left: Box<Expr>,
        not: bool,
        low: Box<Expr>,
        high: Box<Expr>,
    },
    /// `EXTRACT(part FROM expr)`.
    Extract {
        part: Ident,
        expr: Box<Expr>,
        pos: usize,
    },
    /// `IF(cond, then, else)`.
    If {
        cond: Box<Expr>,
        then: Box<Expr>,
        else_result: Box<Expr>,
        pos: usize,
    },
    Paren(Box<Expr>),
    /// The `DEFAULT` keyword in DML value position.
    Default {
        pos: usize,
    },
    /// `(SELECT …)` in expression position.
    ScalarSubQuery {
        query: Box<Query>,
        pos: usize,
    },
    /// `ARRAY(SELECT …)`.
    ArraySubQuery {
        query: Box<Query>,
        pos: usize,
    },
    /// `EXISTS(SELECT …)`.
    ExistsSubQuery {
        query: Box<Query>,
        pos: usize,
    },
    /// `a[i]` family.
    Index {
        expr: Box<Expr>,
        index: Box<Expr>,
        kind: IndexKind,
    },
    /// Field access `s.f` on a non-path expression.
    Selector {
        expr: Box<Expr>,
        field: Ident,
    },
}

impl Expr {
    /// Byte position of the expression's first token, when recorded.
    pub fn pos(&self) -> usize {
        match self {
            Expr::Ident(id) => id.pos,
            Expr::Path(p) => p.pos(),
            Expr::Param { pos, .. }
            | Expr::IntLit { pos, .. }
            | Expr::FloatLit { pos, .. }
            | Expr::StringLit { pos, .. }
            | Expr::BytesLit { pos, .. }
            | Expr::BoolLit { pos, .. }
            | Expr::NullLit { pos }
            | Expr::DateLit { pos, .. }
            | Expr::TimestampLit { pos, .. }
            | Expr::NumericLit { pos, .. }
            | Expr::JsonLit { pos, .. }
            | Expr::ArrayLit { pos, .. }
            | Expr::TypedStruct { pos, .. }
            | Expr::TypelessStruct { pos, .. }
            | Expr::TupleStruct { pos, .. }
            | Expr::IntervalSingle { pos, .. }
            | Expr::IntervalRange { pos, .. }
            | Expr::Binary { pos, .. }
            | Expr::Unary { pos, .. }
            | Expr::CountStar { pos }
            | Expr::Case { pos, .. }
            | Expr::Cast { pos, .. }
            | Expr::IsNull { pos, .. }
            | Expr::IsBool { pos, .. }
            | Expr::Extract { pos, .. }
            | Expr::If { pos, .. }
            | Expr::Default { pos }
            | Expr::ScalarSubQuery { pos, .. }
            | Expr::ArraySubQuery { pos, .. }
            | Expr::ExistsSubQuery { pos, .. } => *pos,
            Expr::Call { func, .. } => func.pos(),
            Expr::In { left, .. } | Expr::Between { left, .. } => left.pos(),
            Expr::Paren(inner) => inner.pos(),
            Expr::Index { expr, .. } | Expr::Selector { expr, .. } => expr.pos(),
        }
    }
}

// --- DML ---

/// `INSERT [INTO] table [(cols)] input [THEN RETURN …]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insert {
    pub table: Path,
    pub columns: Vec<Ident>,
    pub input: InsertInput,
    pub then_return: Option<ThenReturn>,
}

/// Insert source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InsertInput {
    Values(Vec<Vec<Expr>>),
    Query(Box<Query>),
}

/// `UPDATE table SET … [WHERE …] [THEN RETURN …]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update {
    pub table: Path,
    pub alias: Option<Ident>,
    pub items: Vec<UpdateItem>,
    pub where_clause: Option<Expr>,
    pub then_return: Option<ThenReturn>,
}

/// One `SET path = value` item; `value` may be the `DEFAULT` keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateItem {
    pub path: Vec<Ident>,
    pub value: Expr,
}

/// `DELETE [FROM] table [WHERE …] [THEN RETURN …]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delete {
    pub table: Path,
    pub alias: Option<Ident>,
    pub where_clause: Option<Expr>,
    pub then_return: Option<ThenReturn>,
}

/// Spanner's spelling of `RETURNING`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThenReturn {
    pub items: Vec<SelectItem>,
}

// --- DDL ---

/// `CREATE TABLE`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTable {
    pub if_not_exists: bool,
    pub name: Path,
    pub columns: Vec<ColumnDef>,
    pub primary_key: Vec<IndexKey>,
    /// `INTERLEAVE IN PARENT …`; recognized, not interpreted.
    pub interleave_in_parent: Option<Path>,
    /// `ROW DELETION POLICY (…)` present.
    pub row_deletion_policy: bool,
}

/// Column definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: Ident,
    pub ty: SchemaType,
    pub not_null: bool,
    pub default: Option<Expr>,
}

/// One key part of a primary key or index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexKey {
    pub name: Path,
    pub dir: Option<Direction>,
}

/// `DROP TABLE`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropTable {
    pub if_exists: bool,
    pub name: Path,
}

/// `CREATE [UNIQUE] [NULL_FILTERED] INDEX`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateIndex {
    pub unique: bool,
    pub null_filtered: bool,
    pub if_not_exists: bool,
    pub name: Path,
    pub table: Path,
    pub keys: Vec<IndexKey>,
    pub storing: Vec<Ident>,
    pub interleave_in: Option<Path>,
}

/// `DROP INDEX`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropIndex {
    pub if_exists: bool,
    pub name: Path,
}

/// `ALTER TABLE`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlterTable {
    pub name: Path,
    pub alteration: TableAlteration,
}

/// Supported alterations; anything else is carried as `Other` so the
/// translator can emit a placeholder without failing the parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum TableAlteration {
    AddColumn { column: ColumnDef },
    DropColumn { name: Ident },
    AlterColumn { name: Ident, op: ColumnAlteration },
    Other { description: String },
}

/// `ALTER COLUMN` operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ColumnAlteration {
    SetType { ty: SchemaType, not_null: bool },
    SetDefault { expr: Expr },
    DropDefault,
}

/// `CREATE [OR REPLACE] VIEW … AS query`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateView {
    pub or_replace: bool,
    pub name: Path,
    pub query: Query,
}

/// `DROP VIEW`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropView {
    pub if_exists: bool,
    pub name: Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_joins_segments_with_dots_preserving_case() {
        let p = Path {
            idents: vec![Ident::new("NET", 0), Ident::new("IPV4_TO_INT64", 4)],
        };
        assert_eq!(p.dotted(), "NET.IPV4_TO_INT64");
        assert_eq!(p.pos(), 0);
    }

    #[test]
    fn expr_pos_walks_into_nested_shapes() {
        let e = Expr::Paren(Box::new(Expr::IntLit {
            value: "1".into(),
            base: 10,
            pos: 7,
        }));
        assert_eq!(e.pos(), 7);
    }
}

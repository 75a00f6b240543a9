// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Expression nodes.
//!
//! Expression shapes mirror PostgreSQL's parse nodes closely enough that the
//! shared analyzer cannot tell a translated dialect tree from a native one.
//! The notable conventions:
//!
//! - Operators are carried by name inside [`AExpr::name`] as a list of
//!   [`Node::String`] items (`["="]`, or `["<>", "ALL"]` for `NOT IN`).
//! - `COUNT(*)` is a [`FuncCall`] with `agg_star` set rather than an
//!   argument list containing a wildcard.
//! - [`TypeName::names`] holds the lowercase type name as a string node;
//!   typed literals and explicit casts must produce the identical shape.

use serde::{Deserialize, Serialize};

use crate::{Location, Node};

/// A constant wrapped in the PostgreSQL `A_Const` envelope.
///
/// The payload is one of the value variants of [`Node`]
/// (`String`/`Integer`/`Float`/`Null`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AConst {
    pub val: Box<Node>,
    pub location: Location,
}

impl AConst {
    pub fn string(s: impl Into<String>) -> Self {
        Self {
            val: Box::new(Node::String(s.into())),
            location: -1,
        }
    }

    pub fn integer(i: i64) -> Self {
        Self {
            val: Box::new(Node::Integer(i)),
            location: -1,
        }
    }

    pub fn null() -> Self {
        Self {
            val: Box::new(Node::Null),
            location: -1,
        }
    }
}

/// Column reference: an ordered list of path segments, each a
/// [`Node::String`], optionally terminated by the [`Node::AStar`] sentinel
/// for `table.*`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRef {
    pub fields: Vec<Node>,
    pub location: Location,
}

impl ColumnRef {
    /// A single-segment reference.
    pub fn single(name: impl Into<String>) -> Self {
        Self {
            fields: vec![Node::String(name.into())],
            location: -1,
        }
    }

    /// The wrapped-wildcard form the analyzer's star expansion requires.
    pub fn star() -> Self {
        Self {
            fields: vec![Node::AStar],
            location: -1,
        }
    }
}

/// Positional parameter reference. Numbering starts at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamRef {
    pub number: i32,
    pub location: Location,
}

/// Kind discriminator for [`AExpr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum AExprKind {
    /// Plain operator expression.
    Op,
    /// `IN` membership test; `name` still carries `"="`.
    In,
}

/// Generic binary/unary operator expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AExpr {
    pub kind: AExprKind,
    /// Operator name as string nodes.
    pub name: Vec<Node>,
    pub lexpr: Option<Node>,
    pub rexpr: Option<Node>,
    pub location: Location,
}

impl AExpr {
    /// Binary operator expression with the given symbol.
    pub fn binary(op: impl Into<String>, lexpr: Node, rexpr: Node) -> Self {
        Self {
            kind: AExprKind::Op,
            name: vec![Node::String(op.into())],
            lexpr: Some(lexpr),
            rexpr: Some(rexpr),
            location: -1,
        }
    }

    /// Prefix operator expression (`-x`, `~x`).
    pub fn unary(op: impl Into<String>, rexpr: Node) -> Self {
        Self {
            kind: AExprKind::Op,
            name: vec![Node::String(op.into())],
            lexpr: None,
            rexpr: Some(rexpr),
            location: -1,
        }
    }
}

/// Boolean connective kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoolExprKind {
    And,
    Or,
    Not,
}

/// `AND` / `OR` / `NOT` expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoolExpr {
    pub boolop: BoolExprKind,
    pub args: Vec<Node>,
    pub location: Location,
}

/// `IS NULL` / `IS NOT NULL` kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NullTestKind {
    IsNull,
    IsNotNull,
}

/// Dedicated null test node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NullTest {
    pub arg: Node,
    pub null_test_kind: NullTestKind,
    pub location: Location,
}

/// One `WHEN cond THEN result` arm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseWhen {
    pub expr: Node,
    pub result: Node,
    pub location: Location,
}

/// `CASE` expression. `arg` is the operand of the simple form
/// (`CASE x WHEN …`), absent for the searched form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseExpr {
    pub arg: Option<Node>,
    /// List of [`Node::CaseWhen`] arms.
    pub args: Vec<Node>,
    pub defresult: Option<Node>,
    pub location: Location,
}

/// `COALESCE(…)`. Kept as a dedicated node so the analyzer can unify the
/// result type across all arguments at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoalesceExpr {
    pub args: Vec<Node>,
    pub location: Location,
}

/// Sublink kind tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum SubLinkKind {
    /// `EXISTS (subquery)`
    Exists,
    /// Scalar subquery `(SELECT …)`
    Expr,
    /// `ARRAY(SELECT …)`
    Array,
}

/// Subquery expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubLink {
    pub sub_link_kind: SubLinkKind,
    pub subselect: Node,
    pub location: Location,
}

/// Array literal `[a, b, c]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AArrayExpr {
    pub elements: Vec<Node>,
    pub location: Location,
}

/// Coercion form of a [`RowExpr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowCoercion {
    /// Explicit constructor (`STRUCT(...)`).
    ExplicitCall,
    /// Implicit tuple (`(a, b)`).
    ImplicitCast,
}

/// Row/struct constructor. Field names (and, when recoverable, their types
/// encoded as `"name:TYPE"`) live in `colnames` as string nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowExpr {
    pub args: Vec<Node>,
    pub colnames: Vec<Node>,
    pub row_format: RowCoercion,
    pub location: Location,
}

/// Field access / subscripting over an expression. The indirection list
/// holds [`Node::String`] entries for field names and [`Node::AIndices`]
/// entries for subscripts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AIndirection {
    pub arg: Node,
    pub indirection: Vec<Node>,
}

/// One subscript. Only `lidx` is produced by frontends today; `uidx` exists
/// for slice shapes the analyzer already understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AIndices {
    pub lidx: Option<Node>,
    pub uidx: Option<Node>,
}

/// Type name. `names` carries the lowercase name as a single string node;
/// `name` duplicates it for direct access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeName {
    pub name: String,
    pub names: Vec<Node>,
}

impl TypeName {
    pub fn simple(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            names: vec![Node::String(name.clone())],
            name,
        }
    }
}

/// `CAST(expr AS type)` and typed literals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeCast {
    pub arg: Node,
    pub type_name: TypeName,
    pub location: Location,
}

impl TypeCast {
    /// A string constant cast to `type_name` — the shape shared by
    /// `DATE '…'`, `NUMERIC '…'`, `JSON '…'` and `INTERVAL` literals.
    pub fn string_to(value: impl Into<String>, type_name: &str, location: Location) -> Self {
        Self {
            arg: Node::AConst(AConst::string(value)),
            type_name: TypeName::simple(type_name),
            location,
        }
    }
}

/// Function name. Dotted namespaces (`NET.HOST`, `SAFE.SUBSTR`) are kept in
/// a single string, original case preserved; the catalog lowercases for
/// lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuncName {
    pub name: String,
}

/// Function call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncCall {
    pub func: FuncName,
    pub args: Vec<Node>,
    /// `COUNT(*)` marker.
    pub agg_star: bool,
    /// `DISTINCT` inside an aggregate call.
    pub agg_distinct: bool,
    pub location: Location,
}

impl FuncCall {
    pub fn new(name: impl Into<String>, args: Vec<Node>) -> Self {
        Self {
            func: FuncName { name: name.into() },
            args,
            agg_star: false,
            agg_distinct: false,
            location: -1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_ref_star_is_wrapped_sentinel() {
        let star = ColumnRef::star();
        assert_eq!(star.fields, vec![Node::AStar]);
    }

    #[test]
    fn binary_aexpr_carries_operator_as_string_list() {
        let e = AExpr::binary(
            "=",
            Node::ColumnRef(ColumnRef::single("id")),
            Node::AConst(AConst::integer(1)),
        );
        assert_eq!(e.kind, AExprKind::Op);
        assert_eq!(e.name, vec![Node::String("=".into())]);
        assert!(e.lexpr.is_some() && e.rexpr.is_some());
    }

    #[test]
    fn typed_string_cast_matches_explicit_cast_shape() {
        let lit = TypeCast::string_to("2024-01-01", "date", -1);
        let explicit = TypeName::simple("date");
        assert_eq!(lit.type_name, explicit);
        assert_eq!(lit.type_name.names, vec![Node::String("date".into())]);
    }
}

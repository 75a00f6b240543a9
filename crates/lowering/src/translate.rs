// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Dialect AST → engine-neutral AST translation.
//!
//! The translator is total: every dialect node produces a node, and
//! constructs with no engine-neutral counterpart produce [`Node::Todo`]
//! placeholders (with a `tracing` diagnostic naming the dialect node).
//! Statements whose *root* is a placeholder are dropped by the frontend.
//!
//! Shape rules the shared analyzer depends on:
//!
//! - `target_list` / `from_clause` / `cols` / `relations` / `using_clause` /
//!   `returning_list` are materialized as empty lists when no items exist;
//!   `where_clause`, `group_clause`, `sort_clause`, `limit_*`,
//!   `with_clause` and `values_lists` stay absent instead.
//! - `*` is always `ResTarget` → `ColumnRef` → `AStar`; `table.*` puts the
//!   lowered path segments before the sentinel.
//! - `THEN RETURN` fills `returning_list` with the same item shapes a
//!   `SELECT` projection produces.
//! - `IF` / `IFNULL` / `NULLIF` lower to `CASE` expressions because the
//!   analyzer type-infers `CASE` but not arbitrary functions; `COALESCE`
//!   keeps its dedicated node.
//! - Table, schema and column identifiers are lowered to ASCII lowercase;
//!   function names keep their original case (the catalog lowercases at
//!   lookup). Explicit projection aliases also keep their case, since they
//!   name generated output, not schema objects.
//!
//! Every retained byte position is rebased by the statement's offset in the
//! original buffer, so downstream diagnostics line up with the file the
//! user wrote.

use spansql_ast::{
    AArrayExpr, AConst, AExpr, AExprKind, AIndices, AIndirection, AliasClause, AlterTableCmd,
    AlterTableStmt, AlterTableType, BoolExpr, BoolExprKind, CaseExpr, CaseWhen, CoalesceExpr,
    ColumnDef, ColumnRef, CommonTableExpr, Constraint, ConstraintKind, CreateTableStmt,
    DeleteStmt, DropStmt, DropTableStmt, FuncCall, FuncName, IndexElem, IndexStmt, InsertStmt,
    JoinExpr, JoinKind, Node, NullTest, NullTestKind, ObjectType, ParamRef, RangeFunction,
    RangeSubselect, RangeVar, ResTarget, RowCoercion, RowExpr, SelectStmt, SortBy, SortDirection,
    SubLink, SubLinkKind, TableName, TypeCast, TypeName, UpdateStmt, ViewStmt, WithClause,
};
use spansql_grammar::ast as gast;

use crate::params::ParamTracker;

/// Spanner identifiers are case-insensitive; normalize at translation time.
fn identifier(name: &str) -> String {
    name.to_ascii_lowercase()
}

fn ident_node(name: &str) -> Node {
    Node::String(identifier(name))
}

/// Single-statement translator. Owns the parameter tracker for the
/// statement and the byte offset of the statement body in the original
/// buffer.
pub struct Translator {
    params: ParamTracker,
    offset: usize,
}

impl Translator {
    pub fn new(offset: usize) -> Self {
        Self {
            params: ParamTracker::new(),
            offset,
        }
    }

    pub fn params(&self) -> &ParamTracker {
        &self.params
    }

    pub fn into_params(self) -> ParamTracker {
        self.params
    }

    fn loc(&self, pos: usize) -> i32 {
        (pos + self.offset) as i32
    }

    fn todo(&self, site: &str, kind: &str) -> Node {
        tracing::debug!(site, node = kind, "unhandled dialect node");
        Node::Todo
    }

    // --- statements ---

    pub fn translate_statement(&mut self, stmt: &gast::Statement) -> Node {
        match stmt {
            gast::Statement::Query(q) => self.translate_query(&q.query),
            gast::Statement::Insert(n) => self.translate_insert(n),
            gast::Statement::Update(n) => self.translate_update(n),
            gast::Statement::Delete(n) => self.translate_delete(n),
            gast::Statement::CreateTable(n) => self.translate_create_table(n),
            gast::Statement::DropTable(n) => self.translate_drop_table(n),
            gast::Statement::CreateIndex(n) => self.translate_create_index(n),
            gast::Statement::DropIndex(n) => self.translate_drop_index(n),
            gast::Statement::AlterTable(n) => self.translate_alter_table(n),
            gast::Statement::CreateView(n) => self.translate_create_view(n),
            gast::Statement::DropView(n) => self.translate_drop_view(n),
            other => self.todo("translate_statement", stmt_kind(other)),
        }
    }

    /// `Query` carries WITH / ORDER BY / LIMIT outside the inner SELECT;
    /// they are attached onto the translated select node.
    fn translate_query(&mut self, query: &gast::Query) -> Node {
        let mut stmt = match self.translate_query_expr(&query.expr) {
            Node::SelectStmt(stmt) => *stmt,
            Node::Todo => return Node::Todo,
            _ => SelectStmt::default(),
        };

        if !query.order_by.is_empty() {
            let items = query
                .order_by
                .iter()
                .map(|item| {
                    Node::SortBy(Box::new(SortBy {
                        node: self.translate_expr(&item.expr),
                        sortby_dir: match item.dir {
                            Some(gast::Direction::Asc) => SortDirection::Asc,
                            Some(gast::Direction::Desc) => SortDirection::Desc,
                            None => SortDirection::Default,
                        },
                    }))
                })
                .collect();
            stmt.sort_clause = Some(items);
        }

        if let Some(limit) = &query.limit {
            stmt.limit_count = Some(self.translate_expr(&limit.count));
            if let Some(offset) = &limit.offset {
                stmt.limit_offset = Some(self.translate_expr(offset));
            }
        }

        if let Some(with) = &query.with {
            stmt.with_clause = Some(self.translate_with(with));
        }

        Node::SelectStmt(Box::new(stmt))
    }

    fn translate_query_expr(&mut self, expr: &gast::QueryExpr) -> Node {
        match expr {
            gast::QueryExpr::Select(select) => self.translate_select(select),
            gast::QueryExpr::Sub(query) => self.translate_query(query),
            gast::QueryExpr::Compound { .. } => self.todo("translate_query_expr", "Compound"),
            _ => self.todo("translate_query_expr", "QueryExpr"),
        }
    }

    fn translate_select(&mut self, select: &gast::Select) -> Node {
        // Always-walked lists start as empty vectors; checked clauses stay
        // absent until the source provides them.
        let mut stmt = SelectStmt::default();

        if let Some(select_as) = select.select_as {
            // The projection is emitted unchanged; see the module notes.
            tracing::debug!(?select_as, "SELECT AS STRUCT/VALUE not fully implemented");
        }

        for item in &select.results {
            stmt.target_list
                .push(Node::ResTarget(Box::new(self.translate_select_item(item))));
        }

        if let Some(from) = &select.from {
            stmt.from_clause.push(self.translate_table_expr(from));
        }

        if let Some(where_clause) = &select.where_clause {
            stmt.where_clause = Some(self.translate_expr(where_clause));
        }

        if !select.group_by.is_empty() {
            stmt.group_clause = Some(
                select
                    .group_by
                    .iter()
                    .map(|expr| self.translate_expr(expr))
                    .collect(),
            );
        }

        if let Some(having) = &select.having {
            stmt.having_clause = Some(self.translate_expr(having));
        }

        Node::SelectStmt(Box::new(stmt))
    }

    fn translate_select_item(&mut self, item: &gast::SelectItem) -> ResTarget {
        match item {
            gast::SelectItem::Star {
                pos,
                except,
                replace,
            } => {
                if !except.is_empty() {
                    tracing::debug!("SELECT * EXCEPT not fully implemented");
                }
                if !replace.is_empty() {
                    tracing::debug!("SELECT * REPLACE not fully implemented");
                }
                // The triple nesting ResTarget → ColumnRef → AStar is what
                // the analyzer's star expansion looks for.
                ResTarget {
                    name: None,
                    val: Some(Node::ColumnRef(ColumnRef {
                        fields: vec![Node::AStar],
                        location: self.loc(*pos),
                    })),
                    location: self.loc(*pos),
                }
            }
            gast::SelectItem::DotStar {
                expr,
                except,
                replace,
            } => {
                if !except.is_empty() || !replace.is_empty() {
                    tracing::debug!("table.* EXCEPT/REPLACE not fully implemented");
                }
                let mut fields = match expr {
                    gast::Expr::Ident(id) => vec![ident_node(&id.name)],
                    gast::Expr::Path(path) => path
                        .idents
                        .iter()
                        .map(|id| ident_node(&id.name))
                        .collect(),
                    other => vec![self.translate_expr(other)],
                };
                fields.push(Node::AStar);
                ResTarget {
                    name: None,
                    val: Some(Node::ColumnRef(ColumnRef {
                        fields,
                        location: self.loc(expr.pos()),
                    })),
                    location: self.loc(expr.pos()),
                }
            }
            gast::SelectItem::Alias { expr, alias } => ResTarget {
                name: Some(alias.name.clone()),
                val: Some(self.translate_expr(expr)),
                location: self.loc(expr.pos()),
            },
            gast::SelectItem::Expr(expr) => {
                // Bare column references keep their (lowered) name so the
                // analyzer can infer output column names.
                let name = match expr {
                    gast::Expr::Ident(id) => Some(identifier(&id.name)),
                    gast::Expr::Path(path) => {
                        path.idents.last().map(|id| identifier(&id.name))
                    }
                    _ => None,
                };
                ResTarget {
                    name,
                    val: Some(self.translate_expr(expr)),
                    location: self.loc(expr.pos()),
                }
            }
            _ => ResTarget {
                name: None,
                val: Some(self.todo("translate_select_item", "SelectItem")),
                location: -1,
            },
        }
    }

    fn translate_with(&mut self, with: &gast::With) -> WithClause {
        let ctes = with
            .ctes
            .iter()
            .map(|cte| {
                Node::CommonTableExpr(Box::new(CommonTableExpr {
                    ctename: identifier(&cte.name.name),
                    ctequery: self.translate_query(&cte.query),
                    location: self.loc(cte.name.pos),
                }))
            })
            .collect();
        WithClause {
            ctes,
            recursive: false,
            location: -1,
        }
    }

    // --- FROM ---

    fn translate_table_expr(&mut self, table: &gast::TableExpr) -> Node {
        match table {
            gast::TableExpr::Table {
                name,
                alias,
                sample,
            } => {
                if let Some(sample) = sample {
                    tracing::debug!(method = %sample.method, "TABLESAMPLE is runtime sampling only");
                }
                let mut range_var = range_var_from_path(name);
                range_var.location = self.loc(name.pos());
                if let Some(alias) = alias {
                    range_var.alias = Some(AliasClause::new(identifier(&alias.name)));
                }
                Node::RangeVar(range_var)
            }
            gast::TableExpr::Join(join) => self.translate_join(join),
            gast::TableExpr::Paren(inner) => self.translate_table_expr(inner),
            gast::TableExpr::SubQuery {
                query,
                alias,
                sample,
            } => {
                if sample.is_some() {
                    tracing::debug!("TABLESAMPLE on subquery is runtime sampling only");
                }
                Node::RangeSubselect(Box::new(RangeSubselect {
                    subquery: self.translate_query(query),
                    alias: alias
                        .as_ref()
                        .map(|a| AliasClause::new(identifier(&a.name))),
                }))
            }
            gast::TableExpr::Unnest(unnest) => self.translate_unnest(unnest),
            _ => self.todo("translate_table_expr", "TableExpr"),
        }
    }

    fn translate_join(&mut self, join: &gast::Join) -> Node {
        // Comma joins and CROSS JOIN have no qualifier and behave as inner
        // joins for column resolution.
        let jointype = match join.op {
            gast::JoinOp::Comma | gast::JoinOp::Cross | gast::JoinOp::Inner => JoinKind::Inner,
            gast::JoinOp::LeftOuter => JoinKind::Left,
            gast::JoinOp::RightOuter => JoinKind::Right,
            gast::JoinOp::FullOuter => JoinKind::Full,
        };

        let mut expr = JoinExpr {
            jointype,
            larg: self.translate_table_expr(&join.left),
            rarg: self.translate_table_expr(&join.right),
            quals: None,
            using_clause: None,
        };

        match &join.cond {
            gast::JoinCond::On(cond) => expr.quals = Some(self.translate_expr(cond)),
            gast::JoinCond::Using(idents) => {
                expr.using_clause =
                    Some(idents.iter().map(|id| ident_node(&id.name)).collect());
            }
            gast::JoinCond::None => {}
        }

        Node::JoinExpr(Box::new(expr))
    }

    /// `UNNEST(arr)` becomes a range function over `unnest(arr)` with the
    /// ordinality flag standing in for `WITH OFFSET`.
    fn translate_unnest(&mut self, unnest: &gast::Unnest) -> Node {
        let call = FuncCall {
            func: FuncName {
                name: "unnest".to_string(),
            },
            args: vec![self.translate_expr(&unnest.expr)],
            agg_star: false,
            agg_distinct: false,
            location: self.loc(unnest.pos),
        };

        let mut range_func = RangeFunction {
            functions: vec![Node::List(vec![Node::FuncCall(call)])],
            ordinality: false,
            alias: None,
        };

        if let Some(with_offset) = &unnest.with_offset {
            range_func.ordinality = true;
            if with_offset.alias.is_some() {
                // The engine-neutral tree names the ordinal column
                // "ordinality"; a custom offset alias cannot be carried.
                tracing::debug!("WITH OFFSET AS alias requires manual column aliasing");
            }
        }

        if let Some(alias) = &unnest.alias {
            range_func.alias = Some(AliasClause::new(identifier(&alias.name)));
        }

        Node::RangeFunction(range_func)
    }

    // --- DML ---

    fn translate_insert(&mut self, insert: &gast::Insert) -> Node {
        let mut stmt = InsertStmt {
            relation: range_var_from_path(&insert.table),
            cols: Vec::new(),
            select_stmt: None,
            returning_list: Vec::new(),
        };

        for col in &insert.columns {
            stmt.cols.push(Node::ColumnRef(ColumnRef {
                fields: vec![ident_node(&col.name)],
                location: self.loc(col.pos),
            }));
        }

        stmt.select_stmt = Some(match &insert.input {
            gast::InsertInput::Values(rows) => {
                let values_lists = rows
                    .iter()
                    .map(|row| {
                        Node::List(row.iter().map(|expr| self.translate_expr(expr)).collect())
                    })
                    .collect();
                Node::SelectStmt(Box::new(SelectStmt {
                    values_lists: Some(values_lists),
                    ..SelectStmt::default()
                }))
            }
            gast::InsertInput::Query(query) => self.translate_query(query),
        });

        if let Some(then_return) = &insert.then_return {
            stmt.returning_list = self.translate_then_return(then_return);
        }

        Node::InsertStmt(Box::new(stmt))
    }

    fn translate_update(&mut self, update: &gast::Update) -> Node {
        let mut stmt = UpdateStmt {
            relations: vec![Node::RangeVar(range_var_from_path(&update.table))],
            target_list: Vec::new(),
            where_clause: None,
            from_clause: Vec::new(),
            returning_list: Vec::new(),
            with_clause: None,
        };

        for item in &update.items {
            let Some(column) = item.path.last() else {
                continue;
            };
            stmt.target_list.push(Node::ResTarget(Box::new(ResTarget {
                name: Some(identifier(&column.name)),
                val: Some(self.translate_expr(&item.value)),
                location: self.loc(column.pos),
            })));
        }

        if let Some(where_clause) = &update.where_clause {
            stmt.where_clause = Some(self.translate_expr(where_clause));
        }

        if let Some(then_return) = &update.then_return {
            stmt.returning_list = self.translate_then_return(then_return);
        }

        Node::UpdateStmt(Box::new(stmt))
    }

    fn translate_delete(&mut self, delete: &gast::Delete) -> Node {
        let mut stmt = DeleteStmt {
            relations: vec![Node::RangeVar(range_var_from_path(&delete.table))],
            using_clause: Vec::new(),
            where_clause: None,
            returning_list: Vec::new(),
            with_clause: None,
        };

        if let Some(where_clause) = &delete.where_clause {
            stmt.where_clause = Some(self.translate_expr(where_clause));
        }

        if let Some(then_return) = &delete.then_return {
            stmt.returning_list = self.translate_then_return(then_return);
        }

        Node::DeleteStmt(Box::new(stmt))
    }

    /// `THEN RETURN` is Spanner's `RETURNING`; items translate exactly like
    /// projection items so star wrapping stays consistent.
    fn translate_then_return(&mut self, then_return: &gast::ThenReturn) -> Vec<Node> {
        then_return
            .items
            .iter()
            .map(|item| Node::ResTarget(Box::new(self.translate_select_item(item))))
            .collect()
    }

    // --- DDL ---

    fn translate_create_table(&mut self, create: &gast::CreateTable) -> Node {
        let cols = create
            .columns
            .iter()
            .map(|col| {
                let type_name = schema_type_string(&col.ty);
                ColumnDef {
                    colname: identifier(&col.name.name),
                    type_name: TypeName::simple(type_name),
                    is_not_null: col.not_null,
                    constraints: Vec::new(),
                }
            })
            .collect();

        if create.interleave_in_parent.is_some() {
            tracing::debug!("INTERLEAVE IN PARENT not carried into the engine-neutral tree");
        }
        if create.row_deletion_policy {
            tracing::debug!("ROW DELETION POLICY not carried into the engine-neutral tree");
        }

        Node::CreateTableStmt(CreateTableStmt {
            if_not_exists: create.if_not_exists,
            name: table_name_from_path(&create.name),
            cols,
        })
    }

    fn translate_drop_table(&mut self, drop: &gast::DropTable) -> Node {
        Node::DropTableStmt(DropTableStmt {
            if_exists: drop.if_exists,
            tables: vec![table_name_from_path(&drop.name)],
        })
    }

    fn translate_create_index(&mut self, create: &gast::CreateIndex) -> Node {
        let params = create
            .keys
            .iter()
            .map(|key| {
                Node::IndexElem(IndexElem {
                    name: Some(identifier(&key.name.dotted())),
                    ordering: match key.dir {
                        Some(gast::Direction::Asc) => SortDirection::Asc,
                        Some(gast::Direction::Desc) => SortDirection::Desc,
                        None => SortDirection::Default,
                    },
                })
            })
            .collect();

        if !create.storing.is_empty() {
            tracing::debug!("STORING clause not fully supported");
        }
        if create.interleave_in.is_some() {
            tracing::debug!("INTERLEAVE IN clause not fully supported");
        }

        Node::IndexStmt(IndexStmt {
            idxname: identifier(&create.name.dotted()),
            relation: range_var_from_path(&create.table),
            unique: create.unique,
            if_not_exists: create.if_not_exists,
            params,
        })
    }

    fn translate_drop_index(&mut self, drop: &gast::DropIndex) -> Node {
        Node::DropStmt(DropStmt {
            remove_type: ObjectType::Index,
            if_exists: drop.if_exists,
            objects: vec![Node::String(identifier(&drop.name.dotted()))],
        })
    }

    fn translate_alter_table(&mut self, alter: &gast::AlterTable) -> Node {
        let mut stmt = AlterTableStmt {
            table: range_var_from_path(&alter.name),
            cmds: Vec::new(),
        };

        match &alter.alteration {
            gast::TableAlteration::AddColumn { column } => {
                let mut def = ColumnDef {
                    colname: identifier(&column.name.name),
                    type_name: TypeName::simple(schema_type_string(&column.ty)),
                    is_not_null: false,
                    constraints: Vec::new(),
                };
                if column.not_null {
                    def.constraints.push(Node::Constraint(Constraint {
                        contype: ConstraintKind::NotNull,
                    }));
                }
                stmt.cmds.push(Node::AlterTableCmd(Box::new(AlterTableCmd {
                    subtype: AlterTableType::AddColumn,
                    name: None,
                    def: Some(Node::ColumnDef(Box::new(def))),
                })));
            }
            gast::TableAlteration::DropColumn { name } => {
                stmt.cmds.push(Node::AlterTableCmd(Box::new(AlterTableCmd {
                    subtype: AlterTableType::DropColumn,
                    name: Some(identifier(&name.name)),
                    def: None,
                })));
            }
            gast::TableAlteration::AlterColumn { name, op } => {
                let column = identifier(&name.name);
                let cmd = match op {
                    gast::ColumnAlteration::SetType { ty, .. } => Some(AlterTableCmd {
                        subtype: AlterTableType::AlterColumnType,
                        name: Some(column),
                        def: Some(Node::ColumnDef(Box::new(ColumnDef {
                            colname: String::new(),
                            type_name: TypeName::simple(schema_type_string(ty)),
                            is_not_null: false,
                            constraints: Vec::new(),
                        }))),
                    }),
                    gast::ColumnAlteration::SetDefault { expr } => Some(AlterTableCmd {
                        subtype: AlterTableType::ColumnDefault,
                        name: Some(column),
                        def: Some(self.translate_expr(expr)),
                    }),
                    gast::ColumnAlteration::DropDefault => Some(AlterTableCmd {
                        subtype: AlterTableType::DropDefault,
                        name: Some(column),
                        def: None,
                    }),
                    _ => {
                        tracing::debug!("unsupported column alteration");
                        None
                    }
                };
                if let Some(cmd) = cmd {
                    stmt.cmds.push(Node::AlterTableCmd(Box::new(cmd)));
                }
            }
            gast::TableAlteration::Other { description } => {
                tracing::debug!(alteration = %description, "unsupported table alteration");
            }
            _ => {
                tracing::debug!("unsupported table alteration");
            }
        }

        Node::AlterTableStmt(stmt)
    }

    fn translate_create_view(&mut self, create: &gast::CreateView) -> Node {
        Node::ViewStmt(Box::new(ViewStmt {
            view: RangeVar::new(identifier(&create.name.dotted())),
            query: self.translate_query(&create.query),
            replace: create.or_replace,
        }))
    }

    fn translate_drop_view(&mut self, drop: &gast::DropView) -> Node {
        Node::DropStmt(DropStmt {
            remove_type: ObjectType::View,
            if_exists: drop.if_exists,
            objects: vec![Node::String(identifier(&drop.name.dotted()))],
        })
    }

    // --- expressions ---

    pub fn translate_expr(&mut self, expr: &gast::Expr) -> Node {
        match expr {
            gast::Expr::Ident(id) => Node::ColumnRef(ColumnRef {
                fields: vec![ident_node(&id.name)],
                location: self.loc(id.pos),
            }),
            gast::Expr::Path(path) => Node::ColumnRef(ColumnRef {
                fields: path.idents.iter().map(|id| ident_node(&id.name)).collect(),
                location: self.loc(path.pos()),
            }),
            gast::Expr::Param { name, pos } => Node::ParamRef(ParamRef {
                number: self.params.intern(name),
                location: self.loc(*pos),
            }),
            gast::Expr::IntLit { value, base, pos } => {
                let parsed = i64::from_str_radix(value, *base).unwrap_or_default();
                Node::AConst(AConst {
                    val: Box::new(Node::Integer(parsed)),
                    location: self.loc(*pos),
                })
            }
            gast::Expr::FloatLit { value, pos } => Node::AConst(AConst {
                val: Box::new(Node::Float(value.clone())),
                location: self.loc(*pos),
            }),
            gast::Expr::StringLit { value, pos } => Node::AConst(AConst {
                val: Box::new(Node::String(value.clone())),
                location: self.loc(*pos),
            }),
            gast::Expr::BytesLit { value, pos } => Node::AConst(AConst {
                val: Box::new(Node::String(
                    String::from_utf8_lossy(value).into_owned(),
                )),
                location: self.loc(*pos),
            }),
            gast::Expr::BoolLit { value, pos } => {
                let text = if *value { "true" } else { "false" };
                Node::AConst(AConst {
                    val: Box::new(Node::String(text.to_string())),
                    location: self.loc(*pos),
                })
            }
            gast::Expr::NullLit { .. } => Node::Null,
            gast::Expr::DateLit { value, pos } => {
                Node::TypeCast(Box::new(TypeCast::string_to(value, "date", self.loc(*pos))))
            }
            gast::Expr::TimestampLit { value, pos } => Node::TypeCast(Box::new(
                TypeCast::string_to(value, "timestamp", self.loc(*pos)),
            )),
            gast::Expr::NumericLit { value, pos } => Node::TypeCast(Box::new(
                TypeCast::string_to(value, "numeric", self.loc(*pos)),
            )),
            gast::Expr::JsonLit { value, pos } => {
                Node::TypeCast(Box::new(TypeCast::string_to(value, "json", self.loc(*pos))))
            }
            gast::Expr::ArrayLit { values, pos } => Node::AArrayExpr(AArrayExpr {
                elements: values.iter().map(|v| self.translate_expr(v)).collect(),
                location: self.loc(*pos),
            }),
            gast::Expr::TypedStruct {
                fields,
                values,
                pos,
            } => self.translate_typed_struct(fields, values, *pos),
            gast::Expr::TypelessStruct { args, pos } => {
                self.translate_typeless_struct(args, *pos)
            }
            gast::Expr::TupleStruct { values, pos } => Node::RowExpr(RowExpr {
                args: values.iter().map(|v| self.translate_expr(v)).collect(),
                colnames: Vec::new(),
                row_format: RowCoercion::ImplicitCast,
                location: self.loc(*pos),
            }),
            gast::Expr::IntervalSingle { value, part, pos } => {
                self.translate_interval_single(value, part, *pos)
            }
            gast::Expr::IntervalRange {
                value,
                start,
                end,
                pos,
            } => {
                let text = format!("{value} {start} TO {end}");
                Node::TypeCast(Box::new(TypeCast::string_to(
                    text,
                    "interval",
                    self.loc(*pos),
                )))
            }
            gast::Expr::Binary {
                op,
                left,
                right,
                pos,
            } => Node::AExpr(Box::new(AExpr {
                kind: AExprKind::Op,
                name: vec![ident_node(op.as_str())],
                lexpr: Some(self.translate_expr(left)),
                rexpr: Some(self.translate_expr(right)),
                location: self.loc(*pos),
            })),
            gast::Expr::Unary { op, expr, pos } => self.translate_unary(*op, expr, *pos),
            gast::Expr::Call {
                func,
                args,
                distinct,
                over: _,
            } => self.translate_call(func, args, *distinct),
            gast::Expr::CountStar { pos } => Node::FuncCall(FuncCall {
                func: FuncName {
                    name: "count".to_string(),
                },
                args: Vec::new(),
                agg_star: true,
                agg_distinct: false,
                location: self.loc(*pos),
            }),
            gast::Expr::Case {
                operand,
                whens,
                else_result,
                pos,
            } => {
                let args = whens
                    .iter()
                    .map(|when| {
                        Node::CaseWhen(Box::new(CaseWhen {
                            expr: self.translate_expr(&when.cond),
                            result: self.translate_expr(&when.then),
                            location: self.loc(when.pos),
                        }))
                    })
                    .collect();
                Node::CaseExpr(Box::new(CaseExpr {
                    arg: operand.as_ref().map(|op| self.translate_expr(op)),
                    args,
                    defresult: else_result.as_ref().map(|e| self.translate_expr(e)),
                    location: self.loc(*pos),
                }))
            }
            gast::Expr::Cast { expr, ty, pos, .. } => Node::TypeCast(Box::new(TypeCast {
                arg: self.translate_expr(expr),
                type_name: TypeName::simple(type_string(ty)),
                location: self.loc(*pos),
            })),
            gast::Expr::In { left, not, cond } => self.translate_in(left, *not, cond),
            gast::Expr::IsNull { left, not, pos } => Node::NullTest(Box::new(NullTest {
                arg: self.translate_expr(left),
                null_test_kind: if *not {
                    NullTestKind::IsNotNull
                } else {
                    NullTestKind::IsNull
                },
                location: self.loc(*pos),
            })),
            gast::Expr::IsBool { .. } => self.todo("translate_expr", "IsBool"),
            gast::Expr::Between {
                left,
                not,
                low,
                high,
            } => self.translate_between(left, *not, low, high),
            gast::Expr::Extract { part, expr, pos } => Node::FuncCall(FuncCall {
                func: FuncName {
                    name: "extract".to_string(),
                },
                args: vec![
                    Node::String(part.name.clone()),
                    self.translate_expr(expr),
                ],
                agg_star: false,
                agg_distinct: false,
                location: self.loc(*pos),
            }),
            gast::Expr::If {
                cond,
                then,
                else_result,
                pos,
            } => {
                // IF is conditional, not a callable, as far as the analyzer
                // is concerned; lower it to a single-arm CASE.
                let when = CaseWhen {
                    expr: self.translate_expr(cond),
                    result: self.translate_expr(then),
                    location: self.loc(*pos),
                };
                Node::CaseExpr(Box::new(CaseExpr {
                    arg: None,
                    args: vec![Node::CaseWhen(Box::new(when))],
                    defresult: Some(self.translate_expr(else_result)),
                    location: self.loc(*pos),
                }))
            }
            gast::Expr::Paren(inner) => self.translate_expr(inner),
            gast::Expr::Default { pos } => Node::AConst(AConst {
                val: Box::new(Node::String("DEFAULT".to_string())),
                location: self.loc(*pos),
            }),
            gast::Expr::ScalarSubQuery { query, pos } => Node::SubLink(Box::new(SubLink {
                sub_link_kind: SubLinkKind::Expr,
                subselect: self.translate_query(query),
                location: self.loc(*pos),
            })),
            gast::Expr::ArraySubQuery { query, pos } => Node::AArrayExpr(AArrayExpr {
                elements: vec![Node::SubLink(Box::new(SubLink {
                    sub_link_kind: SubLinkKind::Array,
                    subselect: self.translate_query(query),
                    location: self.loc(*pos),
                }))],
                location: self.loc(*pos),
            }),
            gast::Expr::ExistsSubQuery { query, pos } => Node::SubLink(Box::new(SubLink {
                sub_link_kind: SubLinkKind::Exists,
                subselect: self.translate_query(query),
                location: self.loc(*pos),
            })),
            gast::Expr::Index { expr, index, .. } => {
                // OFFSET is 0-based and ORDINAL 1-based at runtime; the
                // subscript expression itself is carried unadjusted.
                Node::AIndirection(Box::new(AIndirection {
                    arg: self.translate_expr(expr),
                    indirection: vec![Node::AIndices(Box::new(AIndices {
                        lidx: Some(self.translate_expr(index)),
                        uidx: None,
                    }))],
                }))
            }
            gast::Expr::Selector { expr, field } => Node::AIndirection(Box::new(AIndirection {
                arg: self.translate_expr(expr),
                indirection: vec![Node::String(field.name.clone())],
            })),
            other => self.todo("translate_expr", expr_kind(other)),
        }
    }

    fn translate_unary(&mut self, op: gast::UnaryOp, expr: &gast::Expr, pos: usize) -> Node {
        match op {
            gast::UnaryOp::Not => Node::BoolExpr(BoolExpr {
                boolop: BoolExprKind::Not,
                args: vec![self.translate_expr(expr)],
                location: self.loc(pos),
            }),
            gast::UnaryOp::Plus | gast::UnaryOp::Minus => {
                let symbol = if op == gast::UnaryOp::Plus { "+" } else { "-" };
                Node::AExpr(Box::new(AExpr {
                    kind: AExprKind::Op,
                    name: vec![Node::String(symbol.to_string())],
                    lexpr: None,
                    rexpr: Some(self.translate_expr(expr)),
                    location: self.loc(pos),
                }))
            }
            gast::UnaryOp::BitNot => Node::AExpr(Box::new(AExpr {
                kind: AExprKind::Op,
                name: vec![Node::String("~".to_string())],
                lexpr: None,
                rexpr: Some(self.translate_expr(expr)),
                location: self.loc(pos),
            })),
        }
    }

    fn translate_call(&mut self, func: &gast::Path, args: &[gast::Expr], distinct: bool) -> Node {
        // Dotted path joined with "." in original case; the catalog matches
        // case-insensitively so generated code can keep this spelling.
        let func_name = func.dotted();
        let location = self.loc(func.pos());
        let args: Vec<Node> = args.iter().map(|arg| self.translate_expr(arg)).collect();

        match func_name.to_ascii_lowercase().as_str() {
            "ifnull" if args.len() == 2 => {
                let mut it = args.into_iter();
                let expr = it.next().expect("two args");
                let null_result = it.next().expect("two args");
                return self.ifnull_to_case(expr, null_result, location);
            }
            "nullif" if args.len() == 2 => {
                let mut it = args.into_iter();
                let expr = it.next().expect("two args");
                let to_match = it.next().expect("two args");
                return self.nullif_to_case(expr, to_match, location);
            }
            "coalesce" if !args.is_empty() => {
                return Node::CoalesceExpr(CoalesceExpr { args, location });
            }
            _ => {}
        }

        Node::FuncCall(FuncCall {
            func: FuncName { name: func_name },
            args,
            agg_star: false,
            agg_distinct: distinct,
            location,
        })
    }

    /// `IFNULL(e, r)` → `CASE WHEN e IS NOT NULL THEN e ELSE r END`.
    /// The negated form parks the replacement value in the default branch,
    /// where the analyzer's type inference handles literals best.
    fn ifnull_to_case(&mut self, expr: Node, null_result: Node, location: i32) -> Node {
        let null_test = Node::NullTest(Box::new(NullTest {
            arg: expr.clone(),
            null_test_kind: NullTestKind::IsNotNull,
            location,
        }));
        let when = CaseWhen {
            expr: null_test,
            result: expr,
            location,
        };
        Node::CaseExpr(Box::new(CaseExpr {
            arg: None,
            args: vec![Node::CaseWhen(Box::new(when))],
            defresult: Some(null_result),
            location,
        }))
    }

    /// `NULLIF(e, m)` → `CASE WHEN e = m THEN NULL ELSE e END`.
    fn nullif_to_case(&mut self, expr: Node, to_match: Node, location: i32) -> Node {
        let equals = Node::AExpr(Box::new(AExpr {
            kind: AExprKind::Op,
            name: vec![Node::String("=".to_string())],
            lexpr: Some(expr.clone()),
            rexpr: Some(to_match),
            location,
        }));
        let when = CaseWhen {
            expr: equals,
            result: Node::AConst(AConst::null()),
            location,
        };
        Node::CaseExpr(Box::new(CaseExpr {
            arg: None,
            args: vec![Node::CaseWhen(Box::new(when))],
            defresult: Some(expr),
            location,
        }))
    }

    fn translate_in(&mut self, left: &gast::Expr, not: bool, cond: &gast::InCond) -> Node {
        let rexpr = match cond {
            gast::InCond::Values(values) => {
                Node::List(values.iter().map(|v| self.translate_expr(v)).collect())
            }
            gast::InCond::SubQuery(query) => self.translate_query(query),
            gast::InCond::Unnest(expr) => self.translate_expr(expr),
        };
        let lexpr = self.translate_expr(left);

        if not {
            // NOT IN is `<> ALL`, which the analyzer resolves as an
            // any/all comparison.
            return Node::AExpr(Box::new(AExpr {
                kind: AExprKind::Op,
                name: vec![
                    Node::String("<>".to_string()),
                    Node::String("ALL".to_string()),
                ],
                lexpr: Some(lexpr),
                rexpr: Some(rexpr),
                location: -1,
            }));
        }

        Node::AExpr(Box::new(AExpr {
            kind: AExprKind::In,
            name: vec![Node::String("=".to_string())],
            lexpr: Some(lexpr),
            rexpr: Some(rexpr),
            location: -1,
        }))
    }

    /// `x BETWEEN a AND b` → `(x >= a) AND (x <= b)`, translating `x` once
    /// and reusing it on both sides.
    fn translate_between(
        &mut self,
        left: &gast::Expr,
        not: bool,
        low: &gast::Expr,
        high: &gast::Expr,
    ) -> Node {
        let operand = self.translate_expr(left);
        let ge = Node::AExpr(Box::new(AExpr {
            kind: AExprKind::Op,
            name: vec![Node::String(">=".to_string())],
            lexpr: Some(operand.clone()),
            rexpr: Some(self.translate_expr(low)),
            location: -1,
        }));
        let le = Node::AExpr(Box::new(AExpr {
            kind: AExprKind::Op,
            name: vec![Node::String("<=".to_string())],
            lexpr: Some(operand),
            rexpr: Some(self.translate_expr(high)),
            location: -1,
        }));
        let and = Node::BoolExpr(BoolExpr {
            boolop: BoolExprKind::And,
            args: vec![ge, le],
            location: -1,
        });
        if not {
            return Node::BoolExpr(BoolExpr {
                boolop: BoolExprKind::Not,
                args: vec![and],
                location: -1,
            });
        }
        and
    }

    fn translate_typed_struct(
        &mut self,
        fields: &[gast::StructLitField],
        values: &[gast::Expr],
        pos: usize,
    ) -> Node {
        let args = values.iter().map(|v| self.translate_expr(v)).collect();
        // Field types ride along in the colname as "name:TYPE" so struct
        // field access can recover them without catalog access.
        let colnames = fields
            .iter()
            .map(|field| {
                let name = field
                    .name
                    .as_ref()
                    .map(|id| id.name.clone())
                    .unwrap_or_default();
                match &field.ty {
                    gast::Type::Simple(ty) => Node::String(format!("{name}:{ty}")),
                    _ => Node::String(name),
                }
            })
            .collect();

        Node::RowExpr(RowExpr {
            args,
            colnames,
            row_format: RowCoercion::ExplicitCall,
            location: self.loc(pos),
        })
    }

    fn translate_typeless_struct(&mut self, struct_args: &[gast::StructArg], pos: usize) -> Node {
        let mut args = Vec::new();
        let mut colnames = Vec::new();

        for arg in struct_args {
            match arg {
                gast::StructArg::Expr(expr) => {
                    args.push(self.translate_expr(expr));
                    colnames.push(Node::String(String::new()));
                }
                gast::StructArg::Alias { expr, alias } => {
                    args.push(self.translate_expr(expr));
                    // Literal-valued fields get their type encoded; column
                    // references cannot be typed here because the catalog is
                    // out of reach at translation time.
                    let hint = literal_type_hint(expr);
                    let colname = match hint {
                        Some(hint) => format!("{}:{hint}", alias.name),
                        None => alias.name.clone(),
                    };
                    colnames.push(Node::String(colname));
                }
            }
        }

        Node::RowExpr(RowExpr {
            args,
            colnames,
            row_format: RowCoercion::ExplicitCall,
            location: self.loc(pos),
        })
    }

    fn translate_interval_single(
        &mut self,
        value: &gast::Expr,
        part: &str,
        pos: usize,
    ) -> Node {
        let amount = match value {
            gast::Expr::IntLit { value, .. } => value.clone(),
            gast::Expr::StringLit { value, .. } => value.clone(),
            // A parameterized interval keeps the parameter reference; the
            // unit cannot be recovered without the bound value.
            gast::Expr::Param { .. } => return self.translate_expr(value),
            _ => "0".to_string(),
        };
        let text = format!("{amount} {part}");
        Node::TypeCast(Box::new(TypeCast::string_to(
            text,
            "interval",
            self.loc(pos),
        )))
    }
}

/// Literal kinds whose engine-neutral type is known locally.
fn literal_type_hint(expr: &gast::Expr) -> Option<&'static str> {
    match expr {
        gast::Expr::IntLit { .. } => Some("INT64"),
        gast::Expr::StringLit { .. } => Some("STRING"),
        gast::Expr::BoolLit { .. } => Some("BOOL"),
        gast::Expr::FloatLit { .. } => Some("FLOAT64"),
        gast::Expr::DateLit { .. } => Some("DATE"),
        gast::Expr::TimestampLit { .. } => Some("TIMESTAMP"),
        gast::Expr::NumericLit { .. } => Some("NUMERIC"),
        gast::Expr::JsonLit { .. } => Some("JSON"),
        gast::Expr::BytesLit { .. } => Some("BYTES"),
        _ => None,
    }
}

/// Lowercase engine-neutral spelling of an expression-level type.
fn type_string(ty: &gast::Type) -> String {
    match ty {
        gast::Type::Simple(name) => name.to_ascii_lowercase(),
        gast::Type::Array(item) => format!("{}[]", type_string(item)),
        _ => "text".to_string(),
    }
}

/// Lowercase engine-neutral spelling of a DDL column type.
fn schema_type_string(ty: &gast::SchemaType) -> String {
    match ty {
        gast::SchemaType::Scalar(name) => name.to_ascii_lowercase(),
        gast::SchemaType::Sized { name, size, max } => {
            let name = name.to_ascii_lowercase();
            if *max {
                format!("{name}(max)")
            } else if let Some(size) = size {
                format!("{name}({size})")
            } else {
                name
            }
        }
        gast::SchemaType::Array(item) => format!("{}[]", schema_type_string(item)),
        _ => "text".to_string(),
    }
}

/// Split a 1–3 part dotted path into catalog/schema/name, lowered.
fn table_name_from_path(path: &gast::Path) -> TableName {
    let parts: Vec<String> = path
        .idents
        .iter()
        .map(|id| identifier(&id.name))
        .collect();
    match parts.len() {
        1 => TableName {
            catalog: None,
            schema: None,
            name: parts[0].clone(),
        },
        2 => TableName {
            catalog: None,
            schema: Some(parts[0].clone()),
            name: parts[1].clone(),
        },
        3 => TableName {
            catalog: Some(parts[0].clone()),
            schema: Some(parts[1].clone()),
            name: parts[2].clone(),
        },
        _ => TableName::new("unknown"),
    }
}

/// Range variable for a 1–3 part dotted path, lowered.
fn range_var_from_path(path: &gast::Path) -> RangeVar {
    let parts: Vec<String> = path
        .idents
        .iter()
        .map(|id| identifier(&id.name))
        .collect();
    let Some(name) = parts.last() else {
        return RangeVar::new("unknown");
    };
    let mut range_var = RangeVar::new(name.clone());
    if parts.len() >= 2 {
        range_var.schemaname = Some(parts[parts.len() - 2].clone());
    }
    if parts.len() >= 3 {
        range_var.catalogname = Some(parts[0].clone());
    }
    range_var
}

fn stmt_kind(stmt: &gast::Statement) -> &'static str {
    match stmt {
        gast::Statement::Query(_) => "Query",
        gast::Statement::Insert(_) => "Insert",
        gast::Statement::Update(_) => "Update",
        gast::Statement::Delete(_) => "Delete",
        gast::Statement::CreateTable(_) => "CreateTable",
        gast::Statement::DropTable(_) => "DropTable",
        gast::Statement::CreateIndex(_) => "CreateIndex",
        gast::Statement::DropIndex(_) => "DropIndex",
        gast::Statement::AlterTable(_) => "AlterTable",
        gast::Statement::CreateView(_) => "CreateView",
        gast::Statement::DropView(_) => "DropView",
        _ => "Statement",
    }
}

fn expr_kind(expr: &gast::Expr) -> &'static str {
    match expr {
        gast::Expr::IsBool { .. } => "IsBool",
        gast::Expr::TupleStruct { .. } => "TupleStruct",
        _ => "Expr",
    }
}

//! Arena-to-arena rewriting.
//!
//! The optimizer never mutates its input: every pass walks the source
//! arena and allocates the simplified tree into a fresh one. Cached
//! expression types travel with their nodes, so a validated input yields
//! an output whose caches are still populated.

use lux_ir::{AstArena, BranchArm, ConstantValue, ExprId, ExprKind, StmtId, StmtKind};
use smallvec::SmallVec;

use crate::fold;

/// Condition names paired with the caller's enabled-bit mask.
///
/// Bit `i` of the mask gates the condition at index `i` of the table.
pub(crate) struct ConditionSet<'a> {
    names: &'a [String],
    enabled: u64,
}

impl<'a> ConditionSet<'a> {
    pub(crate) fn new(names: &'a [String], enabled: u64) -> Self {
        ConditionSet { names, enabled }
    }

    /// Whether a named condition is switched on; `None` for names not in
    /// the table or beyond the mask's 64 bits, which are left for a later
    /// pass.
    fn is_enabled(&self, name: &str) -> Option<bool> {
        let index = self.names.iter().position(|n| n == name)?;
        let bit = 1u64.checked_shl(index as u32)?;
        Some(self.enabled & bit != 0)
    }
}

pub(crate) struct Rewriter<'a> {
    source: &'a AstArena,
    target: AstArena,
    conditions: Option<ConditionSet<'a>>,
}

impl<'a> Rewriter<'a> {
    pub(crate) fn new(source: &'a AstArena, conditions: Option<ConditionSet<'a>>) -> Self {
        Rewriter {
            source,
            target: AstArena::new(),
            conditions,
        }
    }

    pub(crate) fn finish(self) -> AstArena {
        self.target
    }

    /// Evaluate a source expression to a literal without allocating.
    ///
    /// Used to decide branch-arm elimination before any node of the arm
    /// lands in the target arena.
    fn eval_constant(&self, id: ExprId) -> Option<ConstantValue> {
        match &self.source.expr(id).kind {
            ExprKind::Constant(value) => Some(value.clone()),
            ExprKind::Binary { op, left, right } => {
                let left = self.eval_constant(*left)?;
                let right = self.eval_constant(*right)?;
                fold::binary(*op, &left, &right)
            }
            ExprKind::Conditional {
                condition,
                true_path,
                false_path,
            } => {
                let enabled = self.conditions.as_ref()?.is_enabled(condition)?;
                self.eval_constant(if enabled { *true_path } else { *false_path })
            }
            _ => None,
        }
    }

    pub(crate) fn rewrite_expr(&mut self, id: ExprId) -> ExprId {
        let node = self.source.expr(id);
        let cached = node.ty().cloned();

        let new_id = match node.kind.clone() {
            ExprKind::Constant(value) => self.target.alloc_expr(ExprKind::Constant(value)),

            ExprKind::Identifier(name) => self.target.alloc_expr(ExprKind::Identifier(name)),

            // Fold before rewriting the operands, so a fully constant
            // subtree lands in the target as one node.
            ExprKind::Binary { op, left, right } => match self.eval_constant(id) {
                Some(value) => {
                    let ty = value.type_of();
                    let folded = self.target.alloc_expr(ExprKind::Constant(value));
                    self.target.set_expr_type(folded, ty);
                    return folded;
                }
                None => {
                    let left = self.rewrite_expr(left);
                    let right = self.rewrite_expr(right);
                    self.target.alloc_expr(ExprKind::Binary { op, left, right })
                }
            },

            ExprKind::Assign { op, left, right } => {
                let left = self.rewrite_expr(left);
                let right = self.rewrite_expr(right);
                self.target.alloc_expr(ExprKind::Assign { op, left, right })
            }

            ExprKind::AccessMember { expr, member_path } => {
                let expr = self.rewrite_expr(expr);
                self.target
                    .alloc_expr(ExprKind::AccessMember { expr, member_path })
            }

            ExprKind::Cast {
                target,
                expressions,
            } => {
                let mut rewritten = [ExprId::INVALID; 4];
                for (slot, operand) in rewritten
                    .iter_mut()
                    .zip(ExprKind::cast_operands(&expressions))
                {
                    *slot = self.rewrite_expr(operand);
                }
                self.target.alloc_expr(ExprKind::Cast {
                    target,
                    expressions: rewritten,
                })
            }

            ExprKind::Conditional {
                condition,
                true_path,
                false_path,
            } => {
                let resolved = self
                    .conditions
                    .as_ref()
                    .and_then(|set| set.is_enabled(&condition));
                match resolved {
                    Some(true) => return self.rewrite_expr(true_path),
                    Some(false) => return self.rewrite_expr(false_path),
                    None => {
                        let true_path = self.rewrite_expr(true_path);
                        let false_path = self.rewrite_expr(false_path);
                        self.target.alloc_expr(ExprKind::Conditional {
                            condition,
                            true_path,
                            false_path,
                        })
                    }
                }
            }

            ExprKind::Intrinsic {
                intrinsic,
                parameters,
            } => {
                let parameters = parameters
                    .into_iter()
                    .map(|p| self.rewrite_expr(p))
                    .collect();
                self.target.alloc_expr(ExprKind::Intrinsic {
                    intrinsic,
                    parameters,
                })
            }

            ExprKind::Swizzle {
                expr,
                components,
                component_count,
            } => {
                let expr = self.rewrite_expr(expr);
                self.target.alloc_expr(ExprKind::Swizzle {
                    expr,
                    components,
                    component_count,
                })
            }
        };

        if let Some(ty) = cached {
            self.target.set_expr_type(new_id, ty);
        }
        new_id
    }

    pub(crate) fn rewrite_stmt(&mut self, id: StmtId) -> StmtId {
        match self.source.stmt(id).clone() {
            StmtKind::Block(statements) => {
                let statements = statements
                    .into_iter()
                    .map(|s| self.rewrite_stmt(s))
                    .collect();
                self.target.alloc_stmt(StmtKind::Block(statements))
            }

            StmtKind::Branch {
                arms,
                else_statement,
            } => self.rewrite_branch(arms, else_statement),

            StmtKind::Conditional {
                condition,
                statement,
            } => {
                let resolved = self
                    .conditions
                    .as_ref()
                    .and_then(|set| set.is_enabled(&condition));
                match resolved {
                    Some(true) => self.rewrite_stmt(statement),
                    Some(false) => self.target.alloc_stmt(StmtKind::NoOp),
                    None => {
                        let statement = self.rewrite_stmt(statement);
                        self.target.alloc_stmt(StmtKind::Conditional {
                            condition,
                            statement,
                        })
                    }
                }
            }

            StmtKind::DeclareVariable { variable, initial } => {
                let initial = initial.map(|e| self.rewrite_expr(e));
                self.target
                    .alloc_stmt(StmtKind::DeclareVariable { variable, initial })
            }

            StmtKind::Expression(expr) => {
                let expr = self.rewrite_expr(expr);
                self.target.alloc_stmt(StmtKind::Expression(expr))
            }

            StmtKind::Return(value) => {
                let value = value.map(|e| self.rewrite_expr(e));
                self.target.alloc_stmt(StmtKind::Return(value))
            }

            StmtKind::DeclareFunction {
                name,
                attributes,
                parameters,
                return_type,
                body,
            } => {
                let body = self.rewrite_stmt(body);
                self.target.alloc_stmt(StmtKind::DeclareFunction {
                    name,
                    attributes,
                    parameters,
                    return_type,
                    body,
                })
            }

            // Declarations without subtrees and trivial statements copy over.
            kind @ (StmtKind::DeclareExternal(_)
            | StmtKind::DeclareStruct(_)
            | StmtKind::Discard
            | StmtKind::NoOp) => self.target.alloc_stmt(kind),
        }
    }

    /// Arm-elimination for runtime branches.
    ///
    /// Constant-false arms are dropped. The first constant-true arm either
    /// replaces the whole branch (when no arm survived before it) or
    /// becomes the else clause, discarding everything after it. A branch
    /// with no surviving arms collapses to its else clause, or to NoOp.
    fn rewrite_branch(
        &mut self,
        arms: SmallVec<[BranchArm; 2]>,
        else_statement: Option<StmtId>,
    ) -> StmtId {
        let mut kept: SmallVec<[BranchArm; 2]> = SmallVec::new();
        let mut new_else = None;
        let mut truncated = false;

        for arm in arms {
            match self.eval_constant(arm.condition).and_then(|v| v.as_bool()) {
                Some(false) => continue,
                Some(true) => {
                    let statement = self.rewrite_stmt(arm.statement);
                    if kept.is_empty() {
                        return statement;
                    }
                    new_else = Some(statement);
                    truncated = true;
                    break;
                }
                None => {
                    let condition = self.rewrite_expr(arm.condition);
                    let statement = self.rewrite_stmt(arm.statement);
                    kept.push(BranchArm {
                        condition,
                        statement,
                    });
                }
            }
        }

        if !truncated {
            new_else = else_statement.map(|s| self.rewrite_stmt(s));
        }

        if kept.is_empty() {
            return match new_else {
                Some(statement) => statement,
                None => self.target.alloc_stmt(StmtKind::NoOp),
            };
        }

        self.target.alloc_stmt(StmtKind::Branch {
            arms: kept,
            else_statement: new_else,
        })
    }
}

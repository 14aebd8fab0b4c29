//! Structure-building rules: records, arrays, tuples, ranges, blocks,
//! ifs, lambdas, list comprehensions

use crate::context::ExprCx;
use crate::engine::ExpressionRule;
use crate::lowerer::Lowerer;
use au_ast as ast;
use au_diag::{CompileError, Result};
use au_sir as sir;
use au_sir::Type;

/// Builds record literals against their declared type
pub struct RecordRule;

impl ExpressionRule for RecordRule {
    fn name(&self) -> &'static str {
        "record"
    }

    fn applies(&self, node: &ast::Expr, _cx: &ExprCx) -> bool {
        matches!(node.kind, ast::ExprKind::RecordLit { .. })
    }

    fn apply(&self, node: &ast::Expr, lw: &mut Lowerer, cx: ExprCx) -> Result<sir::Expr> {
        let ast::ExprKind::RecordLit { type_name, .. } = &node.kind else {
            unreachable!("guarded by applies");
        };
        let provided = cx.children.into_fields(self.name())?;
        let origin = node.origin.clone();

        let Some(info) = lw.services.types.lookup(*type_name) else {
            return Err(CompileError::user_at(
                format!("Unknown record type '{}'", lw.resolve(*type_name)),
                origin,
            ));
        };
        let Some(declared_fields) = info.fields() else {
            return Err(CompileError::user_at(
                format!("Type '{}' is not a record", lw.resolve(*type_name)),
                origin,
            ));
        };
        let declared_fields = declared_fields.to_vec();
        let record_ty = info.ir_type.clone();

        // Reject unknown fields, check the known ones.
        for (field_name, value) in &provided {
            let Some(declared) = declared_fields
                .iter()
                .find(|field| field.name == *field_name)
            else {
                return Err(CompileError::user_at(
                    format!(
                        "Unknown field '{}' for type {}",
                        lw.resolve(*field_name),
                        lw.resolve(*type_name)
                    ),
                    value.origin.clone().or_else(|| origin.clone()),
                ));
            };
            lw.ensure_compatible(
                &value.ty,
                &declared.ty,
                &format!(
                    "field '{}' of '{}'",
                    lw.resolve(*field_name),
                    lw.resolve(*type_name)
                ),
                value.origin.as_ref().or(origin.as_ref()),
            )?;
        }

        // Emit fields in declaration order; every declared field must be
        // present.
        let mut provided = provided;
        let mut ordered = Vec::with_capacity(declared_fields.len());
        for declared in &declared_fields {
            let Some(position) = provided
                .iter()
                .position(|(field_name, _)| *field_name == declared.name)
            else {
                return Err(CompileError::user_at(
                    format!(
                        "Missing field '{}' for record '{}'",
                        lw.resolve(declared.name),
                        lw.resolve(*type_name)
                    ),
                    origin.clone(),
                ));
            };
            ordered.push(provided.remove(position));
        }

        Ok(sir::Expr::new(
            sir::ExprKind::Record {
                type_name: *type_name,
                fields: ordered,
            },
            record_ty,
            node.origin.clone(),
        ))
    }
}

/// Builds array literals with a common element type
pub struct ArrayRule;

impl ExpressionRule for ArrayRule {
    fn name(&self) -> &'static str {
        "array"
    }

    fn applies(&self, node: &ast::Expr, _cx: &ExprCx) -> bool {
        matches!(node.kind, ast::ExprKind::ArrayLit { .. })
    }

    fn apply(&self, node: &ast::Expr, lw: &mut Lowerer, cx: ExprCx) -> Result<sir::Expr> {
        let elements = cx.children.into_elements(self.name())?;

        let element_ty = match elements.first() {
            Some(first) => first.ty.clone(),
            None => lw.services.names.auto_ty(),
        };
        for (index, element) in elements.iter().enumerate().skip(1) {
            lw.ensure_compatible(
                &element.ty,
                &element_ty,
                &format!("array element {}", index + 1),
                element.origin.as_ref().or(node.origin.as_ref()),
            )?;
        }

        Ok(sir::Expr::new(
            sir::ExprKind::Array { elements },
            Type::Array {
                element: Box::new(element_ty),
            },
            node.origin.clone(),
        ))
    }
}

/// Builds tuple literals
pub struct TupleRule;

impl ExpressionRule for TupleRule {
    fn name(&self) -> &'static str {
        "tuple"
    }

    fn applies(&self, node: &ast::Expr, _cx: &ExprCx) -> bool {
        matches!(node.kind, ast::ExprKind::TupleLit { .. })
    }

    fn apply(&self, node: &ast::Expr, _lw: &mut Lowerer, cx: ExprCx) -> Result<sir::Expr> {
        let elements = cx.children.into_elements(self.name())?;
        let ty = Type::Tuple {
            elements: elements.iter().map(|element| element.ty.clone()).collect(),
        };
        Ok(sir::Expr::new(
            sir::ExprKind::Tuple { elements },
            ty,
            node.origin.clone(),
        ))
    }
}

/// Builds range values as `Range<element>`
pub struct RangeRule;

impl ExpressionRule for RangeRule {
    fn name(&self) -> &'static str {
        "range"
    }

    fn applies(&self, node: &ast::Expr, _cx: &ExprCx) -> bool {
        matches!(node.kind, ast::ExprKind::Range { .. })
    }

    fn apply(&self, node: &ast::Expr, lw: &mut Lowerer, cx: ExprCx) -> Result<sir::Expr> {
        let ast::ExprKind::Range { inclusive, .. } = &node.kind else {
            unreachable!("guarded by applies");
        };
        let (start, end) = cx.children.into_pair(self.name())?;
        lw.ensure_compatible(
            &end.ty,
            &start.ty,
            "range end",
            end.origin.as_ref().or(node.origin.as_ref()),
        )?;

        let ty = Type::Generic {
            base: Box::new(Type::Prim {
                name: lw.services.names.range,
            }),
            args: vec![start.ty.clone()],
        };
        Ok(sir::Expr::new(
            sir::ExprKind::Range {
                start: Box::new(start),
                end: Box::new(end),
                inclusive: *inclusive,
            },
            ty,
            node.origin.clone(),
        ))
    }
}

/// Builds block expressions; the type is the result's type
pub struct BlockRule;

impl ExpressionRule for BlockRule {
    fn name(&self) -> &'static str {
        "block"
    }

    fn applies(&self, node: &ast::Expr, _cx: &ExprCx) -> bool {
        matches!(node.kind, ast::ExprKind::Block { .. })
    }

    fn apply(&self, node: &ast::Expr, _lw: &mut Lowerer, cx: ExprCx) -> Result<sir::Expr> {
        let (statements, result) = cx.children.into_block(self.name())?;
        let ty = result.ty.clone();
        Ok(sir::Expr::new(
            sir::ExprKind::Block {
                statements,
                result: Box::new(result),
            },
            ty,
            node.origin.clone(),
        ))
    }
}

/// Types if expressions; branch types must agree, a missing else is unit
pub struct IfRule;

impl ExpressionRule for IfRule {
    fn name(&self) -> &'static str {
        "if"
    }

    fn applies(&self, node: &ast::Expr, _cx: &ExprCx) -> bool {
        matches!(node.kind, ast::ExprKind::If { .. })
    }

    fn apply(&self, node: &ast::Expr, lw: &mut Lowerer, cx: ExprCx) -> Result<sir::Expr> {
        let (condition, then_branch, else_branch) = cx.children.into_if(self.name())?;
        lw.ensure_boolean(&condition.ty, "if condition", node.origin.as_ref())?;

        let ty = match &else_branch {
            Some(else_branch) => {
                lw.ensure_compatible(
                    &else_branch.ty,
                    &then_branch.ty,
                    "if branches",
                    else_branch.origin.as_ref().or(node.origin.as_ref()),
                )?;
                then_branch.ty.clone()
            }
            None => Type::Unit,
        };

        Ok(sir::Expr::new(
            sir::ExprKind::If {
                condition: Box::new(condition),
                then_branch: Box::new(then_branch),
                else_branch: else_branch.map(Box::new),
            },
            ty,
            node.origin.clone(),
        ))
    }
}

/// Lowers lambdas (captures, parameter typing, scoped body)
pub struct LambdaRule;

impl ExpressionRule for LambdaRule {
    fn name(&self) -> &'static str {
        "lambda"
    }

    fn applies(&self, node: &ast::Expr, _cx: &ExprCx) -> bool {
        matches!(node.kind, ast::ExprKind::Lambda { .. })
    }

    fn apply(&self, node: &ast::Expr, lw: &mut Lowerer, cx: ExprCx) -> Result<sir::Expr> {
        let ast::ExprKind::Lambda {
            params,
            ret_type,
            body,
        } = &node.kind
        else {
            unreachable!("guarded by applies");
        };
        lw.build_lambda(node, params, ret_type.as_ref(), body, cx.expected.as_ref())
    }
}

/// Lowers list comprehensions; generators bind left to right
pub struct ListCompRule;

impl ExpressionRule for ListCompRule {
    fn name(&self) -> &'static str {
        "list-comp"
    }

    fn applies(&self, node: &ast::Expr, _cx: &ExprCx) -> bool {
        matches!(node.kind, ast::ExprKind::ListComp { .. })
    }

    fn apply(&self, node: &ast::Expr, lw: &mut Lowerer, _cx: ExprCx) -> Result<sir::Expr> {
        let ast::ExprKind::ListComp { output, generators } = &node.kind else {
            unreachable!("guarded by applies");
        };
        let origin = node.origin.clone();

        lw.with_scope(|lw| {
            let mut lowered_generators = Vec::with_capacity(generators.len());
            for generator in generators {
                let iterable = lw.visit_expr(&generator.iterable, None)?;
                let element_ty =
                    lw.infer_iterable_element(&iterable.ty, generator.origin.as_ref())?;
                lw.services.vars.set(generator.var, element_ty.clone());

                let condition = generator
                    .condition
                    .as_ref()
                    .map(|condition| lw.visit_expr(condition, None))
                    .transpose()?;
                if let Some(condition) = &condition {
                    lw.ensure_boolean(
                        &condition.ty,
                        "comprehension filter",
                        condition.origin.as_ref(),
                    )?;
                }

                lowered_generators.push(sir::Generator {
                    var: generator.var,
                    var_ty: element_ty,
                    iterable,
                    condition,
                });
            }

            let output = lw.visit_expr(output, None)?;
            let ty = Type::Array {
                element: Box::new(output.ty.clone()),
            };
            Ok(sir::Expr::new(
                sir::ExprKind::ListComp {
                    generators: lowered_generators,
                    output: Box::new(output),
                },
                ty,
                origin,
            ))
        })
    }
}

//! Lambda lowering
//!
//! Captures are computed *before* the lambda's parameters are bound, while
//! the variable registry still describes the enclosing scope. Parameter
//! types resolve, in order: explicit annotation → expected function-type
//! hint (from the surrounding call) → the default parameter type `i32`.

use crate::capture;
use crate::lowerer::Lowerer;
use au_ast as ast;
use au_diag::Result;
use au_sir as sir;
use au_sir::{Field, Type};

impl Lowerer {
    /// Lower a lambda expression
    pub fn build_lambda(
        &mut self,
        node: &ast::Expr,
        params: &[ast::LambdaParam],
        ret_annotation: Option<&ast::TypeExpr>,
        body: &ast::Expr,
        expected: Option<&Type>,
    ) -> Result<sir::Expr> {
        let captures = capture::analyze(params, body, &self.services);

        let expected_params: Vec<Type> = match expected {
            Some(Type::Function {
                params: hinted, ..
            }) => hinted.iter().map(|field| field.ty.clone()).collect(),
            _ => Vec::new(),
        };

        let ret_annotation = ret_annotation
            .map(|annotation| self.build_type(annotation, None))
            .transpose()?;

        let origin = node.origin.clone();
        self.with_scope(|lw| {
            let mut params_ir = Vec::with_capacity(params.len());
            for (index, param) in params.iter().enumerate() {
                let ty = match &param.ty {
                    Some(annotation) => lw.build_type(annotation, None)?,
                    None => expected_params
                        .get(index)
                        .cloned()
                        .unwrap_or_else(|| lw.services.names.i32_ty()),
                };
                lw.services.vars.set(param.name, ty.clone());
                params_ir.push(sir::Param {
                    name: param.name,
                    ty,
                    origin: param.origin.clone(),
                });
            }

            let body_ir = lw.visit_expr(body, ret_annotation.as_ref())?;
            if let Some(annotation) = &ret_annotation {
                lw.ensure_compatible(
                    &body_ir.ty,
                    annotation,
                    "lambda result",
                    body_ir.origin.as_ref(),
                )?;
            }

            let function_ty = Type::Function {
                params: params_ir
                    .iter()
                    .map(|param| Field::new(param.name, param.ty.clone()))
                    .collect(),
                ret: Box::new(body_ir.ty.clone()),
            };

            Ok(sir::Expr::new(
                sir::ExprKind::Lambda {
                    captures,
                    params: params_ir,
                    body: Box::new(body_ir),
                },
                function_ty,
                origin,
            ))
        })
    }
}

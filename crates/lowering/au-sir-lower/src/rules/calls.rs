//! Call, member access, indexing, and unwrapping rules

use crate::context::ExprCx;
use crate::engine::ExpressionRule;
use crate::lowerer::Lowerer;
use au_ast as ast;
use au_diag::{CompileError, Result};
use au_intern::Symbol;
use au_sir as sir;
use au_sir::{Field, Type};
use au_span::Origin;

/// Wrap a type in `Option<...>` for safe access results
fn option_of(lw: &Lowerer, inner: Type) -> Type {
    Type::Generic {
        base: Box::new(Type::Prim {
            name: lw.services.names.option,
        }),
        args: vec![inner],
    }
}

/// Unwrap `Option<T>` to `T`; other types pass through
fn unwrap_option(lw: &Lowerer, ty: &Type) -> Type {
    if let Type::Generic { base, args } = ty {
        if base.name() == Some(lw.services.names.option) && args.len() == 1 {
            return args[0].clone();
        }
    }
    ty.clone()
}

/// Resolves calls: named functions, generic instantiation, module
/// functions, builtin methods, and indirect (function-typed) callees
pub struct CallRule;

impl CallRule {
    /// A call through a registered signature, generic or not
    fn call_known(
        lw: &mut Lowerer,
        sig: &sir::FunctionSig,
        display_name: &str,
        args: &[sir::Expr],
        expected: Option<&Type>,
        origin: Option<&Origin>,
    ) -> Result<Type> {
        let arg_types: Vec<Type> = args.iter().map(|arg| arg.ty.clone()).collect();
        let names = lw.services.names;
        let inst = au_ty::instantiate(
            sig,
            &arg_types,
            display_name,
            expected,
            &names,
            &lw.services.interner,
            origin,
        )?;
        Ok(inst.ret_type)
    }

    /// A call through a function-typed value (lambda or function ref)
    fn call_function_value(
        lw: &Lowerer,
        params: &[Field],
        ret: &Type,
        args: &[sir::Expr],
        what: &str,
        origin: Option<&Origin>,
    ) -> Result<Type> {
        if params.len() != args.len() {
            return Err(CompileError::user_at(
                format!(
                    "{what} expects {} argument(s), got {}",
                    params.len(),
                    args.len()
                ),
                origin.cloned(),
            ));
        }
        for (index, (arg, param)) in args.iter().zip(params.iter()).enumerate() {
            lw.ensure_compatible(
                &arg.ty,
                &param.ty,
                &format!("{what} argument {}", index + 1),
                origin,
            )?;
        }
        Ok(ret.clone())
    }
}

impl ExpressionRule for CallRule {
    fn name(&self) -> &'static str {
        "call"
    }

    fn applies(&self, node: &ast::Expr, _cx: &ExprCx) -> bool {
        matches!(node.kind, ast::ExprKind::Call { .. })
    }

    fn apply(&self, node: &ast::Expr, lw: &mut Lowerer, cx: ExprCx) -> Result<sir::Expr> {
        let ast::ExprKind::Call { callee, .. } = &node.kind else {
            unreachable!("guarded by applies");
        };
        let expected = cx.expected;
        let (lowered_callee, args) = cx.children.into_call(self.name())?;
        let origin = node.origin.clone();

        // Module function call: Module.func(args). The visitor left the
        // callee unlowered.
        if lowered_callee.is_none() {
            let ast::ExprKind::Member { object, member } = &callee.kind else {
                return Err(CompileError::internal(
                    "call rule got a module call without a member callee",
                ));
            };
            let ast::ExprKind::Var { name: module } = &object.kind else {
                return Err(CompileError::internal(
                    "call rule got a module call without a module name",
                ));
            };
            let entry = lw
                .services
                .functions
                .fetch_module_member(*module, *member)
                .cloned()
                .ok_or_else(|| {
                    CompileError::internal("module call vanished between visit and apply")
                })?;

            let display_name = lw.resolve(*member);
            let ret = Self::call_known(
                lw,
                &entry.sig,
                &display_name,
                &args,
                expected.as_ref(),
                origin.as_ref(),
            )?;

            let callee_ir = sir::Expr::new(
                sir::ExprKind::Member {
                    object: Box::new(sir::Expr::new(
                        sir::ExprKind::Var { name: *module },
                        lw.services.names.auto_ty(),
                        object.origin.clone(),
                    )),
                    member: *member,
                },
                lw.function_type_from_sig(&entry.sig),
                callee.origin.clone(),
            );
            return Ok(sir::Expr::new(
                sir::ExprKind::Call {
                    callee: Box::new(callee_ir),
                    args,
                },
                ret,
                origin,
            ));
        }

        let lowered_callee =
            lowered_callee.ok_or_else(|| CompileError::internal("call children lost the callee"))?;

        // Method call on a receiver: the lowered "callee" is the object.
        if let ast::ExprKind::Member { member, .. } = &callee.kind {
            let ret =
                lw.infer_member_call_type(&lowered_callee.ty, *member, &args, origin.as_ref())?;
            let member_ty = Type::Function {
                params: args
                    .iter()
                    .enumerate()
                    .map(|(index, arg)| {
                        Field::new(
                            lw.services.interner.intern(&format!("arg{index}")),
                            arg.ty.clone(),
                        )
                    })
                    .collect(),
                ret: Box::new(ret.clone()),
            };
            let callee_ir = sir::Expr::new(
                sir::ExprKind::Member {
                    object: Box::new(lowered_callee),
                    member: *member,
                },
                member_ty,
                callee.origin.clone(),
            );
            return Ok(sir::Expr::new(
                sir::ExprKind::Call {
                    callee: Box::new(callee_ir),
                    args,
                },
                ret,
                origin,
            ));
        }

        // Plain call. Named callees resolve through the registries unless
        // shadowed by a local; everything else must be function-typed.
        let ret = if let sir::ExprKind::Var { name } = &lowered_callee.kind {
            self.resolve_named_call(lw, *name, &lowered_callee, &args, expected.as_ref(), origin.as_ref())?
        } else if let Type::Function { params, ret } = &lowered_callee.ty {
            Self::call_function_value(lw, params, ret, &args, "lambda", origin.as_ref())?
        } else {
            return Err(CompileError::user_at(
                format!(
                    "Cannot call value of type {}",
                    lw.describe(&lowered_callee.ty)
                ),
                origin.clone(),
            ));
        };

        Ok(sir::Expr::new(
            sir::ExprKind::Call {
                callee: Box::new(lowered_callee),
                args,
            },
            ret,
            origin,
        ))
    }
}

impl CallRule {
    fn resolve_named_call(
        &self,
        lw: &mut Lowerer,
        name: Symbol,
        callee: &sir::Expr,
        args: &[sir::Expr],
        expected: Option<&Type>,
        origin: Option<&Origin>,
    ) -> Result<Type> {
        // Locals shadow functions; a function-typed local is an indirect
        // call through its value.
        if lw.services.vars.has(name) {
            return match &callee.ty {
                Type::Function { params, ret } => {
                    Self::call_function_value(lw, params, ret, args, "lambda", origin)
                }
                other => Err(CompileError::user_at(
                    format!("Cannot call value of type {}", lw.describe(other)),
                    origin.cloned(),
                )),
            };
        }

        if let Some(ret) = lw.io_builtin_return_type(name) {
            return Ok(ret);
        }

        if let Some(sig) = lw.services.functions.fetch_sig(name).cloned() {
            let display_name = lw.resolve(name);
            return Self::call_known(lw, &sig, &display_name, args, expected, origin);
        }
        if let Some(sig) = lw.services.constructors.get(&name).cloned() {
            let display_name = lw.resolve(name);
            return Self::call_known(lw, &sig, &display_name, args, expected, origin);
        }

        match &callee.ty {
            Type::Function { params, ret } => {
                Self::call_function_value(lw, params, ret, args, "lambda", origin)
            }
            other => Err(CompileError::user_at(
                format!("Cannot call value of type {}", lw.describe(other)),
                origin.cloned(),
            )),
        }
    }
}

/// Null-safe method calls: `a?.f(x)` yields `Option<result>`
pub struct SafeCallRule;

impl ExpressionRule for SafeCallRule {
    fn name(&self) -> &'static str {
        "safe-call"
    }

    fn applies(&self, node: &ast::Expr, _cx: &ExprCx) -> bool {
        matches!(node.kind, ast::ExprKind::SafeCall { .. })
    }

    fn apply(&self, node: &ast::Expr, lw: &mut Lowerer, cx: ExprCx) -> Result<sir::Expr> {
        let ast::ExprKind::SafeCall { member, .. } = &node.kind else {
            unreachable!("guarded by applies");
        };
        let (object, args) = cx.children.into_call(self.name())?;
        let object =
            object.ok_or_else(|| CompileError::internal("safe call lost its receiver"))?;

        let inner = unwrap_option(lw, &object.ty);
        let ret = lw.infer_member_call_type(&inner, *member, &args, node.origin.as_ref())?;
        let ty = option_of(lw, ret);

        Ok(sir::Expr::new(
            sir::ExprKind::SafeCall {
                object: Box::new(object),
                member: *member,
                args,
            },
            ty,
            node.origin.clone(),
        ))
    }
}

/// Member access
pub struct MemberRule;

impl ExpressionRule for MemberRule {
    fn name(&self) -> &'static str {
        "member"
    }

    fn applies(&self, node: &ast::Expr, _cx: &ExprCx) -> bool {
        matches!(node.kind, ast::ExprKind::Member { .. })
    }

    fn apply(&self, node: &ast::Expr, lw: &mut Lowerer, cx: ExprCx) -> Result<sir::Expr> {
        let ast::ExprKind::Member { member, .. } = &node.kind else {
            unreachable!("guarded by applies");
        };
        let object = cx.children.into_operand(self.name())?;
        let ty = lw.infer_member_type(&object.ty, *member, node.origin.as_ref())?;
        Ok(sir::Expr::new(
            sir::ExprKind::Member {
                object: Box::new(object),
                member: *member,
            },
            ty,
            node.origin.clone(),
        ))
    }
}

/// Null-safe member access: `a?.b` yields `Option<field type>`
pub struct SafeMemberRule;

impl ExpressionRule for SafeMemberRule {
    fn name(&self) -> &'static str {
        "safe-member"
    }

    fn applies(&self, node: &ast::Expr, _cx: &ExprCx) -> bool {
        matches!(node.kind, ast::ExprKind::SafeMember { .. })
    }

    fn apply(&self, node: &ast::Expr, lw: &mut Lowerer, cx: ExprCx) -> Result<sir::Expr> {
        let ast::ExprKind::SafeMember { member, .. } = &node.kind else {
            unreachable!("guarded by applies");
        };
        let object = cx.children.into_operand(self.name())?;
        let inner = unwrap_option(lw, &object.ty);
        let member_ty = lw.infer_member_type(&inner, *member, node.origin.as_ref())?;
        let ty = option_of(lw, member_ty);
        Ok(sir::Expr::new(
            sir::ExprKind::SafeMember {
                object: Box::new(object),
                member: *member,
            },
            ty,
            node.origin.clone(),
        ))
    }
}

/// Index access on arrays and maps
pub struct IndexRule;

impl ExpressionRule for IndexRule {
    fn name(&self) -> &'static str {
        "index"
    }

    fn applies(&self, node: &ast::Expr, _cx: &ExprCx) -> bool {
        matches!(node.kind, ast::ExprKind::Index { .. })
    }

    fn apply(&self, node: &ast::Expr, lw: &mut Lowerer, cx: ExprCx) -> Result<sir::Expr> {
        let (object, index) = cx.children.into_index(self.name())?;
        let names = lw.services.names;
        let origin = node.origin.clone();

        let ty = match &object.ty {
            Type::Array { element } => {
                if !au_ty::is_integer(&index.ty, &names, lw.current_type_params()) {
                    return Err(CompileError::user_at(
                        format!("Array index must be an integer, got {}", lw.describe(&index.ty)),
                        origin,
                    ));
                }
                (**element).clone()
            }
            Type::Map { key, value } => {
                lw.ensure_compatible(&index.ty, key, "map key", origin.as_ref())?;
                (**value).clone()
            }
            other => {
                return Err(CompileError::user_at(
                    format!("Cannot index into type {}", lw.describe(other)),
                    origin,
                ));
            }
        };

        Ok(sir::Expr::new(
            sir::ExprKind::Index {
                object: Box::new(object),
                index: Box::new(index),
            },
            ty,
            node.origin.clone(),
        ))
    }
}

/// Slice access on arrays and strings
pub struct SliceRule;

impl ExpressionRule for SliceRule {
    fn name(&self) -> &'static str {
        "slice"
    }

    fn applies(&self, node: &ast::Expr, _cx: &ExprCx) -> bool {
        matches!(node.kind, ast::ExprKind::Slice { .. })
    }

    fn apply(&self, node: &ast::Expr, lw: &mut Lowerer, cx: ExprCx) -> Result<sir::Expr> {
        let (object, start, end) = cx.children.into_slice(self.name())?;
        let names = lw.services.names;
        let origin = node.origin.clone();

        for bound in [start.as_ref(), end.as_ref()].into_iter().flatten() {
            if !au_ty::is_integer(&bound.ty, &names, lw.current_type_params()) {
                return Err(CompileError::user_at(
                    format!("Slice bound must be an integer, got {}", lw.describe(&bound.ty)),
                    origin.clone(),
                ));
            }
        }

        let ty = match &object.ty {
            Type::Array { .. } => object.ty.clone(),
            other if au_ty::is_string(other, &names) => names.string_ty(),
            other => {
                return Err(CompileError::user_at(
                    format!("Cannot slice type {}", lw.describe(other)),
                    origin,
                ));
            }
        };

        Ok(sir::Expr::new(
            sir::ExprKind::Slice {
                object: Box::new(object),
                start: start.map(Box::new),
                end: end.map(Box::new),
            },
            ty,
            node.origin.clone(),
        ))
    }
}

/// Await unwraps a future-like wrapper type
pub struct AwaitRule;

impl ExpressionRule for AwaitRule {
    fn name(&self) -> &'static str {
        "await"
    }

    fn applies(&self, node: &ast::Expr, _cx: &ExprCx) -> bool {
        matches!(node.kind, ast::ExprKind::Await { .. })
    }

    fn apply(&self, node: &ast::Expr, lw: &mut Lowerer, cx: ExprCx) -> Result<sir::Expr> {
        let operand = cx.children.into_operand(self.name())?;
        let ty = lw.unwrap_future_type(&operand.ty);
        Ok(sir::Expr::new(
            sir::ExprKind::Await {
                operand: Box::new(operand),
            },
            ty,
            node.origin.clone(),
        ))
    }
}

/// `expr?` unwraps a result-like wrapper to its success type
pub struct TryRule;

impl ExpressionRule for TryRule {
    fn name(&self) -> &'static str {
        "try"
    }

    fn applies(&self, node: &ast::Expr, _cx: &ExprCx) -> bool {
        matches!(node.kind, ast::ExprKind::Try { .. })
    }

    fn apply(&self, node: &ast::Expr, lw: &mut Lowerer, cx: ExprCx) -> Result<sir::Expr> {
        let operand = cx.children.into_operand(self.name())?;
        let ty = lw.unwrap_result_type(&operand.ty, node.origin.as_ref())?;
        Ok(sir::Expr::new(
            sir::ExprKind::Try {
                operand: Box::new(operand),
            },
            ty,
            node.origin.clone(),
        ))
    }
}

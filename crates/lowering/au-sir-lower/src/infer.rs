//! Identifier, member, and builtin type inference
//!
//! The lookup logic rules lean on: variable/function reference typing,
//! member access over declared and builtin types, iterable element types,
//! and the future-like/result-like wrapper unwrapping used by `await` and
//! `?`.

use crate::lowerer::Lowerer;
use au_diag::{CompileError, Result};
use au_intern::Symbol;
use au_sir::{Field, FunctionSig, Type};
use au_span::Origin;
use au_ty::substitute;

impl Lowerer {
    /// Infer the type of a variable or function reference
    ///
    /// Locals shadow functions; unknown names are a user error listing
    /// the visible scope.
    pub fn infer_variable_type(&self, name: Symbol, origin: Option<&Origin>) -> Result<Type> {
        if let Some(ty) = self.services.vars.get(name) {
            return Ok(ty.clone());
        }
        if let Some(sig) = self.services.functions.fetch_sig(name) {
            return Ok(self.function_type_from_sig(sig));
        }
        if let Some(ret) = self.io_builtin_return_type(name) {
            return Ok(Type::Function {
                params: vec![],
                ret: Box::new(ret),
            });
        }

        let mut visible: Vec<String> = self
            .services
            .vars
            .names()
            .into_iter()
            .map(|visible| self.resolve(visible))
            .collect();
        visible.sort();
        Err(CompileError::user_at(
            format!(
                "Unknown identifier '{}' (in scope: {})",
                self.resolve(name),
                visible.join(", ")
            ),
            origin.cloned(),
        ))
    }

    /// The function type of a registered signature
    pub fn function_type_from_sig(&self, sig: &FunctionSig) -> Type {
        let params = sig
            .param_types
            .iter()
            .enumerate()
            .map(|(index, ty)| {
                Field::new(
                    self.services.interner.intern(&format!("arg{index}")),
                    ty.clone(),
                )
            })
            .collect();
        Type::Function {
            params,
            ret: Box::new(sig.ret_type.clone()),
        }
    }

    /// Return type of an IO builtin, if the name is one
    pub fn io_builtin_return_type(&self, name: Symbol) -> Option<Type> {
        let text = self.resolve(name);
        match text.as_str() {
            "println" | "print" | "write_file" => Some(Type::Unit),
            "read_line" | "read_file" => Some(self.services.names.string_ty()),
            _ => None,
        }
    }

    /// Infer the type of `object.member` (non-call position)
    pub fn infer_member_type(
        &self,
        object_ty: &Type,
        member: Symbol,
        origin: Option<&Origin>,
    ) -> Result<Type> {
        let names = self.services.names;

        // Generic instantiation: resolve the member on the base type, then
        // substitute the concrete type arguments positionally.
        if let Type::Generic { base, .. } = object_ty {
            if let Some(base_name) = base.name() {
                if let Some(info) = self.services.types.lookup(base_name) {
                    if let Some(member_ty) = self.services.types.resolve_member(base_name, member)
                    {
                        let subst = au_ty::infer_substitutions(
                            &info.type_params,
                            &info.ir_type,
                            object_ty,
                        );
                        return Ok(substitute(&member_ty, &subst));
                    }
                }
            }
        }

        if let Some(type_name) = object_ty.name() {
            if let Some(member_ty) = self.services.types.resolve_member(type_name, member) {
                return Ok(member_ty);
            }
        }

        if let Some(fields) = object_ty.fields() {
            return match fields.iter().find(|field| field.name == member) {
                Some(field) => Ok(field.ty.clone()),
                None => Err(CompileError::user_at(
                    format!(
                        "Unknown field '{}' for type {}",
                        self.resolve(member),
                        self.describe(object_ty)
                    ),
                    origin.cloned(),
                )),
            };
        }

        if matches!(object_ty, Type::Array { .. }) {
            return self.infer_array_member(member, origin);
        }
        if au_ty::is_string(object_ty, &names) {
            return self.infer_string_member(member, origin);
        }
        if au_ty::is_numeric(object_ty, &names, self.current_type_params())
            && self.resolve(member) == "sqrt"
        {
            return Ok(Type::Function {
                params: vec![],
                ret: Box::new(names.f32_ty()),
            });
        }

        Err(CompileError::user_at(
            format!(
                "Unknown member '{}' for type {}",
                self.resolve(member),
                self.describe(object_ty)
            ),
            origin.cloned(),
        ))
    }

    fn infer_array_member(&self, member: Symbol, origin: Option<&Origin>) -> Result<Type> {
        let names = self.services.names;
        match self.resolve(member).as_str() {
            "length" | "size" => Ok(names.i32_ty()),
            "is_empty" => Ok(names.bool_ty()),
            "map" | "filter" | "fold" => Ok(Type::Function {
                params: vec![],
                ret: Box::new(names.auto_ty()),
            }),
            other => Err(CompileError::user_at(
                format!(
                    "Unknown array member '{other}'. Known members: length, size, is_empty, map, filter, fold"
                ),
                origin.cloned(),
            )),
        }
    }

    fn infer_string_member(&self, member: Symbol, origin: Option<&Origin>) -> Result<Type> {
        let names = self.services.names;
        match self.resolve(member).as_str() {
            "split" => Ok(Type::Array {
                element: Box::new(names.string_ty()),
            }),
            "trim" | "trim_start" | "trim_end" | "upper" | "lower" => Ok(names.string_ty()),
            "is_empty" => Ok(names.bool_ty()),
            "length" => Ok(names.i32_ty()),
            other => Err(CompileError::user_at(
                format!(
                    "Unknown string member '{other}'. Known members: split, trim, trim_start, trim_end, upper, lower, is_empty, length"
                ),
                origin.cloned(),
            )),
        }
    }

    /// Infer the result type of a builtin method call
    pub fn infer_member_call_type(
        &self,
        object_ty: &Type,
        member: Symbol,
        args: &[au_sir::Expr],
        origin: Option<&Origin>,
    ) -> Result<Type> {
        let names = self.services.names;

        if let Type::Array { element } = object_ty {
            return match self.resolve(member).as_str() {
                "length" | "size" => {
                    self.ensure_argument_count(member, args, 0, origin)?;
                    Ok(names.i32_ty())
                }
                "is_empty" => {
                    self.ensure_argument_count(member, args, 0, origin)?;
                    Ok(names.bool_ty())
                }
                "map" => {
                    self.ensure_argument_count(member, args, 1, origin)?;
                    let element_ty = lambda_return_type(&args[0]).ok_or_else(|| {
                        CompileError::user_at(
                            "Unable to infer return type of map lambda",
                            origin.cloned(),
                        )
                    })?;
                    Ok(Type::Array {
                        element: Box::new(element_ty),
                    })
                }
                "filter" => {
                    self.ensure_argument_count(member, args, 1, origin)?;
                    Ok(Type::Array {
                        element: element.clone(),
                    })
                }
                "fold" => {
                    self.ensure_argument_count(member, args, 2, origin)?;
                    Ok(args[0].ty.clone())
                }
                other => Err(CompileError::user_at(
                    format!(
                        "Unknown array method '{other}'. Supported methods: length, size, is_empty, map, filter, fold"
                    ),
                    origin.cloned(),
                )),
            };
        }

        if au_ty::is_string(object_ty, &names) {
            return match self.resolve(member).as_str() {
                "split" => {
                    self.ensure_argument_count(member, args, 1, origin)?;
                    Ok(Type::Array {
                        element: Box::new(names.string_ty()),
                    })
                }
                "trim" | "trim_start" | "trim_end" | "upper" | "lower" => {
                    self.ensure_argument_count(member, args, 0, origin)?;
                    Ok(names.string_ty())
                }
                "is_empty" => {
                    self.ensure_argument_count(member, args, 0, origin)?;
                    Ok(names.bool_ty())
                }
                "length" => {
                    self.ensure_argument_count(member, args, 0, origin)?;
                    Ok(names.i32_ty())
                }
                other => Err(CompileError::user_at(
                    format!(
                        "Unknown string method '{other}'. Supported methods: split, trim, trim_start, trim_end, upper, lower, is_empty, length"
                    ),
                    origin.cloned(),
                )),
            };
        }

        if au_ty::is_numeric(object_ty, &names, self.current_type_params())
            && self.resolve(member) == "sqrt"
        {
            self.ensure_argument_count(member, args, 0, origin)?;
            return Ok(names.f32_ty());
        }

        Err(CompileError::user_at(
            format!(
                "Unknown member '{}' for type {}",
                self.resolve(member),
                self.describe(object_ty)
            ),
            origin.cloned(),
        ))
    }

    fn ensure_argument_count(
        &self,
        member: Symbol,
        args: &[au_sir::Expr],
        expected: usize,
        origin: Option<&Origin>,
    ) -> Result<()> {
        if args.len() == expected {
            Ok(())
        } else {
            Err(CompileError::user_at(
                format!(
                    "'{}' expects {} argument(s), got {}",
                    self.resolve(member),
                    expected,
                    args.len()
                ),
                origin.cloned(),
            ))
        }
    }

    /// The element type an iteration over `ty` produces
    pub fn infer_iterable_element(&self, ty: &Type, origin: Option<&Origin>) -> Result<Type> {
        if let Type::Array { element } = ty {
            return Ok((**element).clone());
        }
        if let Type::Generic { base, args } = ty {
            if base.name() == Some(self.services.names.range) && args.len() == 1 {
                return Ok(args[0].clone());
            }
        }
        Err(CompileError::user_at(
            format!(
                "Iterable expression must be an array, got {}",
                self.describe(ty)
            ),
            origin.cloned(),
        ))
    }

    /// Unwrap a future-like wrapper (`Future<T>`, `Task<T>`, ...) to `T`
    ///
    /// Non-wrapper types pass through unchanged; `await` on a plain value
    /// is structurally a no-op here.
    pub fn unwrap_future_type(&self, ty: &Type) -> Type {
        if let Type::Generic { base, args } = ty {
            if let Some(base_name) = base.name() {
                if self.services.names.is_future_like(base_name) && !args.is_empty() {
                    return args[0].clone();
                }
            }
        }
        ty.clone()
    }

    /// Unwrap a result-like wrapper (`Result<T, E>`) to its success type
    pub fn unwrap_result_type(&self, ty: &Type, origin: Option<&Origin>) -> Result<Type> {
        if let Type::Generic { base, args } = ty {
            if base.name() == Some(self.services.names.result) && !args.is_empty() {
                return Ok(args[0].clone());
            }
        }
        Err(CompileError::user_at(
            format!("'?' requires a Result value, got {}", self.describe(ty)),
            origin.cloned(),
        ))
    }

    /// Expected parameter types for a lambda passed to a builtin method
    ///
    /// `map` and `filter` lambdas receive the array's element type; other
    /// positions carry no hint.
    pub fn lambda_param_hint(
        &self,
        object_ty: &Type,
        member: Symbol,
        arg_index: usize,
    ) -> Option<Type> {
        let Type::Array { element } = object_ty else {
            return None;
        };
        let member = self.resolve(member);
        if (member == "map" || member == "filter") && arg_index == 0 {
            let param_name = self.services.interner.intern("arg0");
            Some(Type::Function {
                params: vec![Field::new(param_name, (**element).clone())],
                ret: Box::new(self.services.names.auto_ty()),
            })
        } else {
            None
        }
    }
}

/// The return type of a lowered lambda argument, if it is one
fn lambda_return_type(arg: &au_sir::Expr) -> Option<Type> {
    match &arg.ty {
        Type::Function { ret, .. } => Some((**ret).clone()),
        _ => None,
    }
}

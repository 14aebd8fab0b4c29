//! Declaration lowering
//!
//! Two passes over a module's declarations: every signature registers
//! before any body lowers, so bodies may call forward. Sum-type
//! declarations also register one constructor signature per variant —
//! both in the constructor table (for pattern specialization) and in the
//! function registry (so constructor calls resolve like ordinary calls).

use crate::lowerer::Lowerer;
use au_ast as ast;
use au_diag::{CompileError, Event, Result};
use au_intern::Symbol;
use au_resolve::{TypeDefKind, TypeInfo};
use au_sir as sir;
use au_sir::{FunctionSig, Type};

impl Lowerer {
    /// Lower and register a type declaration
    pub fn reduce_type_decl(
        &mut self,
        decl: &ast::TypeDecl,
        module_name: Option<Symbol>,
    ) -> Result<sir::TypeDecl> {
        let type_params = self.normalize_type_params(&decl.type_params);
        let params = type_params.clone();
        let ty =
            self.with_type_params(&params, |lw| lw.build_type(&decl.ty, Some(decl.name)))?;

        let kind = match &ty {
            Type::Record { .. } => TypeDefKind::Record,
            Type::Sum { .. } => TypeDefKind::Sum,
            Type::Opaque { .. } => TypeDefKind::Opaque,
            Type::Prim { name } if self.services.names.is_numeric_name(*name) => {
                TypeDefKind::Primitive
            }
            _ => TypeDefKind::Alias,
        };

        self.services.types.register(TypeInfo {
            name: decl.name,
            ir_type: ty.clone(),
            kind,
            type_params: type_params.clone(),
            exported: decl.exported,
            module_name,
        });

        if let Type::Sum { variants, .. } = &ty {
            let constructor_ret = if type_params.is_empty() {
                ty.clone()
            } else {
                Type::Generic {
                    base: Box::new(ty.clone()),
                    args: type_params
                        .iter()
                        .map(|param| Type::Var {
                            name: param.name,
                            constraint: param.constraint,
                        })
                        .collect(),
                }
            };

            let variant_sigs: Vec<FunctionSig> = variants
                .iter()
                .map(|variant| {
                    FunctionSig::new(
                        variant.name,
                        variant.fields.iter().map(|field| field.ty.clone()).collect(),
                        constructor_ret.clone(),
                        type_params.clone(),
                    )
                })
                .collect();
            for sig in variant_sigs {
                self.services.constructors.insert(sig.name, sig.clone());
                self.services
                    .functions
                    .register(sig, module_name, decl.exported, false);
            }
        }

        Ok(sir::TypeDecl {
            name: decl.name,
            ty,
            type_params,
            exported: decl.exported,
            origin: decl.origin.clone(),
        })
    }

    /// Register a function's signature without lowering its body
    pub fn register_function_signature(
        &mut self,
        decl: &ast::FuncDecl,
        module_name: Option<Symbol>,
    ) -> Result<FunctionSig> {
        if let Some(sig) = self.services.functions.fetch_sig(decl.name) {
            return Ok(sig.clone());
        }

        let type_params = self.normalize_type_params(&decl.type_params);
        let params = type_params.clone();
        self.with_type_params(&params, |lw| {
            let param_types = decl
                .params
                .iter()
                .map(|param| lw.build_type(&param.ty, None))
                .collect::<Result<Vec<_>>>()?;
            let ret_type = lw.build_type(&decl.ret_type, None)?;
            let sig = FunctionSig::new(decl.name, param_types, ret_type, type_params);
            lw.services
                .functions
                .register(sig.clone(), module_name, decl.exported, decl.external);
            Ok(sig)
        })
    }

    /// Lower a function declaration to IR
    pub fn reduce_function(
        &mut self,
        decl: &ast::FuncDecl,
        module_name: Option<Symbol>,
    ) -> Result<sir::Func> {
        let type_params = self.normalize_type_params(&decl.type_params);
        let params_frame = type_params.clone();
        self.with_type_params(&params_frame, |lw| {
            let sig = lw.register_function_signature(decl, module_name)?;

            if sig.param_types.len() != decl.params.len() {
                return Err(CompileError::user_at(
                    format!(
                        "Function '{}' expects {} parameter(s), got {}",
                        lw.resolve(decl.name),
                        sig.param_types.len(),
                        decl.params.len()
                    ),
                    decl.origin.clone(),
                ));
            }

            let params: Vec<sir::Param> = decl
                .params
                .iter()
                .zip(sig.param_types.iter())
                .map(|(param, ty)| sir::Param {
                    name: param.name,
                    ty: ty.clone(),
                    origin: param.origin.clone(),
                })
                .collect();

            let body = match &decl.body {
                None => None,
                Some(body_ast) => {
                    let ret_type = sig.ret_type.clone();
                    let body_ir = lw.with_scope(|lw| {
                        for param in &params {
                            lw.services.vars.set(param.name, param.ty.clone());
                        }
                        let expected = ret_type.clone();
                        lw.with_return_type(ret_type.clone(), |lw| {
                            lw.visit_expr(body_ast, Some(&expected))
                        })
                    })?;
                    lw.ensure_compatible(
                        &body_ir.ty,
                        &sig.ret_type,
                        &format!("function '{}' result", lw.resolve(decl.name)),
                        decl.origin.as_ref(),
                    )?;
                    Some(body_ir)
                }
            };

            let func = sir::Func {
                name: decl.name,
                params,
                ret_type: sig.ret_type.clone(),
                body,
                effects: Vec::new(),
                type_params,
                external: decl.external,
                exported: decl.exported,
                origin: decl.origin.clone(),
            };

            let engine = lw.engine();
            let func = engine.dispatch_function(func, lw)?;

            lw.services
                .functions
                .set_effects(decl.name, func.effects.clone());
            lw.services.events.emit(Event::FunctionLowered {
                name: lw.resolve(decl.name),
                effects: func
                    .effects
                    .iter()
                    .map(|effect| effect.as_str().to_string())
                    .collect(),
            });

            Ok(func)
        })
    }
}

//! Lowering type syntax to semantic types
//!
//! A name resolves, in order: in-scope type parameter → type variable;
//! `unit`/`void` → the unit type; anything else → a named primitive
//! (`str` normalized to `string`). Declared record and sum types are
//! looked up by name at their use sites, so a bare reference to `Point`
//! stays a named type here.

use crate::lowerer::Lowerer;
use au_ast as ast;
use au_diag::Result;
use au_intern::Symbol;
use au_sir::{Field, Type, TypeParam, Variant};

impl Lowerer {
    /// Lower a type expression
    ///
    /// `name_hint` names anonymous record/sum type literals; declaration
    /// lowering passes the declared name.
    pub fn build_type(&mut self, ty: &ast::TypeExpr, name_hint: Option<Symbol>) -> Result<Type> {
        match &ty.kind {
            ast::TypeExprKind::Name { name } => Ok(self.build_named_type(*name)),

            ast::TypeExprKind::Record { fields } => {
                let name =
                    name_hint.unwrap_or_else(|| self.services.interner.intern("record"));
                let fields = fields
                    .iter()
                    .map(|(field_name, field_ty)| {
                        Ok(Field::new(*field_name, self.build_type(field_ty, None)?))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Type::Record { name, fields })
            }

            ast::TypeExprKind::Sum { variants } => {
                let name = name_hint.unwrap_or_else(|| self.services.interner.intern("sum"));
                let variants = variants
                    .iter()
                    .map(|variant| {
                        let fields = variant
                            .fields
                            .iter()
                            .map(|(field_name, field_ty)| {
                                Ok(Field::new(*field_name, self.build_type(field_ty, None)?))
                            })
                            .collect::<Result<Vec<_>>>()?;
                        Ok(Variant {
                            name: variant.name,
                            fields,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Type::Sum { name, variants })
            }

            ast::TypeExprKind::Array { element } => Ok(Type::Array {
                element: Box::new(self.build_type(element, None)?),
            }),

            ast::TypeExprKind::Tuple { elements } => Ok(Type::Tuple {
                elements: elements
                    .iter()
                    .map(|element| self.build_type(element, None))
                    .collect::<Result<Vec<_>>>()?,
            }),

            ast::TypeExprKind::Map { key, value } => Ok(Type::Map {
                key: Box::new(self.build_type(key, None)?),
                value: Box::new(self.build_type(value, None)?),
            }),

            ast::TypeExprKind::Function { params, ret } => {
                let params = params
                    .iter()
                    .enumerate()
                    .map(|(index, param)| {
                        let name = self.services.interner.intern(&format!("arg{index}"));
                        Ok(Field::new(name, self.build_type(param, None)?))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Type::Function {
                    params,
                    ret: Box::new(self.build_type(ret, None)?),
                })
            }

            ast::TypeExprKind::Generic { base, args } => {
                let base = self.build_named_type(*base);
                let args = args
                    .iter()
                    .map(|arg| self.build_type(arg, None))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Type::Generic {
                    base: Box::new(base),
                    args,
                })
            }

            ast::TypeExprKind::Ref { inner } => Ok(Type::Ref {
                inner: Box::new(self.build_type(inner, None)?),
            }),

            ast::TypeExprKind::MutRef { inner } => Ok(Type::MutRef {
                inner: Box::new(self.build_type(inner, None)?),
            }),
        }
    }

    fn build_named_type(&self, name: Symbol) -> Type {
        if let Some(param) = self.find_type_param(name) {
            return Type::Var {
                name: param.name,
                constraint: param.constraint,
            };
        }
        self.services.names.prim(name)
    }

    /// Normalize AST type parameters into IR type parameters
    pub fn normalize_type_params(&self, params: &[ast::TypeParam]) -> Vec<TypeParam> {
        params
            .iter()
            .map(|param| TypeParam {
                name: param.name,
                constraint: param.constraint,
            })
            .collect()
    }
}

//! The lowering pipeline
//!
//! Wires the services container, the standard rule engine, and the
//! declaration reducers into one instance, and drives a module through
//! them: aliases from imports, then every signature, then every body.

use crate::engine::RuleEngine;
use crate::lowerer::Lowerer;
use crate::services::Services;
use au_ast as ast;
use au_diag::Result;
use au_sir as sir;
use std::rc::Rc;

/// One lowering pipeline instance
///
/// A pipeline owns its registries; lowering two unrelated modules through
/// one pipeline shares declarations, which is exactly what a multi-file
/// unit wants and a test usually does not.
pub struct Pipeline {
    lowerer: Lowerer,
}

impl Pipeline {
    /// A pipeline with fresh services and the standard rules
    pub fn new() -> Self {
        Self::with_services(Services::new())
    }

    /// A pipeline over an existing services container
    ///
    /// Callers use this to pre-register stdlib metadata or to swap in an
    /// event sink.
    pub fn with_services(services: Services) -> Self {
        Self {
            lowerer: Lowerer::new(services, Rc::new(RuleEngine::standard())),
        }
    }

    /// The shared services
    pub fn services(&self) -> &Services {
        &self.lowerer.services
    }

    /// Mutable access to the shared services
    pub fn services_mut(&mut self) -> &mut Services {
        &mut self.lowerer.services
    }

    /// The lowerer, for callers that drive lowering piecemeal
    pub fn lowerer_mut(&mut self) -> &mut Lowerer {
        &mut self.lowerer
    }

    /// Lower a parsed module to Semantic IR
    ///
    /// Declarations are processed in two passes — all signatures first,
    /// then all bodies — so functions may call forward. Item order in the
    /// result matches declaration order.
    pub fn lower_module(&mut self, module: &ast::Module) -> Result<sir::Module> {
        let lw = &mut self.lowerer;

        // Selective imports record their aliases; the canonical entries
        // come from stdlib metadata or other units, registered externally.
        for import in &module.imports {
            if let Some(items) = &import.items {
                for item in items {
                    if let Some(alias) = item.alias {
                        lw.services.functions.register_alias(alias, item.name);
                    }
                }
            }
        }

        let mut items: Vec<(usize, sir::Item)> = Vec::with_capacity(module.decls.len());

        for (index, decl) in module.decls.iter().enumerate() {
            match decl {
                ast::Decl::Type(type_decl) => {
                    let lowered = lw.reduce_type_decl(type_decl, module.name)?;
                    items.push((index, sir::Item::Type(lowered)));
                }
                ast::Decl::Func(func_decl) => {
                    lw.register_function_signature(func_decl, module.name)?;
                }
            }
        }

        for (index, decl) in module.decls.iter().enumerate() {
            if let ast::Decl::Func(func_decl) = decl {
                let lowered = lw.reduce_function(func_decl, module.name)?;
                items.push((index, sir::Item::Func(lowered)));
            }
        }

        items.sort_by_key(|(index, _)| *index);

        Ok(sir::Module {
            name: module.name,
            imports: module.imports.clone(),
            items: items.into_iter().map(|(_, item)| item).collect(),
        })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

//! Match analysis and pattern lowering
//!
//! Three responsibilities:
//!
//! * **Arm analysis** — [`analyze`] lowers every arm through a
//!   caller-supplied `transform_arm` callback, requires at least one arm,
//!   takes the first arm's body type as the match result type, and checks
//!   every later arm against it (errors name the 1-based arm index).
//! * **Exhaustiveness** — when the scrutinee resolves to a declared sum
//!   type and no arm is a wildcard or bare variable, every declared
//!   variant must be covered by some constructor pattern (or-patterns
//!   contribute all alternatives). All missing variants are reported
//!   together, sorted, in one error.
//! * **Pattern lowering** — [`Lowerer::lower_pattern`] converts an AST
//!   pattern to IR, computes the `bindings` list of constructor patterns,
//!   and binds pattern variables into the current scope. Constructor
//!   field types come from the constructor registry, specialized against
//!   the scrutinee type positionally.

use crate::lowerer::Lowerer;
use au_ast as ast;
use au_diag::{CompileError, Event, Result};
use au_intern::Symbol;
use au_sir as sir;
use au_sir::{FunctionSig, Type};
use au_span::Origin;
use au_ty::{infer_substitutions, substitute};
use rustc_hash::FxHashSet;

/// The result of analyzing a match expression's arms
pub struct MatchAnalysis {
    /// Lowered arms, in source order
    pub arms: Vec<sir::MatchArm>,
    /// The common result type (the first arm's body type)
    pub result_type: Type,
}

/// Analyze a match expression's arms
///
/// `transform_arm` lowers one arm; it receives the lowerer explicitly so
/// callers can supply any lowering strategy without borrowing conflicts.
pub fn analyze(
    lw: &mut Lowerer,
    scrutinee_ty: &Type,
    arms: &[ast::MatchArm],
    origin: Option<&Origin>,
    transform_arm: impl Fn(&mut Lowerer, &Type, &ast::MatchArm) -> Result<sir::MatchArm>,
) -> Result<MatchAnalysis> {
    let mut lowered = Vec::with_capacity(arms.len());
    for arm in arms {
        lowered.push(transform_arm(lw, scrutinee_ty, arm)?);
    }

    if lowered.is_empty() {
        return Err(CompileError::user_at(
            "match expression requires at least one arm",
            origin.cloned(),
        ));
    }

    let result_type = lowered[0].body.ty.clone();
    for (index, arm) in lowered.iter().enumerate().skip(1) {
        lw.ensure_compatible(
            &arm.body.ty,
            &result_type,
            &format!("match arm {}", index + 1),
            arm.body.origin.as_ref().or(origin),
        )?;
    }

    check_exhaustiveness(lw, scrutinee_ty, arms, origin)?;

    Ok(MatchAnalysis {
        arms: lowered,
        result_type,
    })
}

/// Check sum-type exhaustiveness for a match
///
/// Quiet unless checking is enabled, the scrutinee names a declared sum
/// type with variants, and no arm is a wildcard or bare variable.
pub fn check_exhaustiveness(
    lw: &Lowerer,
    scrutinee_ty: &Type,
    arms: &[ast::MatchArm],
    origin: Option<&Origin>,
) -> Result<()> {
    if !lw.services.check_exhaustiveness {
        return Ok(());
    }
    let Some(type_name) = scrutinee_ty.name() else {
        return Ok(());
    };
    let Some(info) = lw.services.types.lookup(type_name) else {
        return Ok(());
    };
    if !info.is_sum() {
        return Ok(());
    }
    let Some(variants) = info.variants() else {
        return Ok(());
    };
    if variants.is_empty() {
        return Ok(());
    }

    let has_catch_all = arms.iter().any(|arm| {
        matches!(
            arm.pattern.kind,
            ast::PatternKind::Wildcard | ast::PatternKind::Var { .. }
        )
    });
    if has_catch_all {
        return Ok(());
    }

    let mut covered = FxHashSet::default();
    for arm in arms {
        collect_constructors(&arm.pattern, &mut covered);
    }

    let mut missing: Vec<String> = variants
        .iter()
        .filter(|variant| !covered.contains(&variant.name))
        .map(|variant| lw.resolve(variant.name))
        .collect();

    if missing.is_empty() {
        lw.services.events.emit(Event::MatchChecked {
            scrutinee: lw.describe(scrutinee_ty),
            arms: arms.len(),
        });
        return Ok(());
    }

    missing.sort();
    Err(CompileError::user_at(
        format!(
            "Non-exhaustive match: missing patterns for {}",
            missing.join(", ")
        ),
        origin.cloned(),
    ))
}

/// Collect the constructor names a pattern covers
fn collect_constructors(pattern: &ast::Pattern, covered: &mut FxHashSet<Symbol>) {
    match &pattern.kind {
        ast::PatternKind::Constructor { name, .. } => {
            covered.insert(*name);
        }
        ast::PatternKind::Or { alternatives } => {
            for alternative in alternatives {
                collect_constructors(alternative, covered);
            }
        }
        _ => {}
    }
}

/// Whether a match can lower to statement form
///
/// Every arm must be guard-free, use a constructor, wildcard, or bare
/// variable pattern, and have a body that is a unit-valued block.
pub fn is_statement_match(arms: &[ast::MatchArm]) -> bool {
    !arms.is_empty()
        && arms.iter().all(|arm| {
            arm.guard.is_none()
                && matches!(
                    arm.pattern.kind,
                    ast::PatternKind::Constructor { .. }
                        | ast::PatternKind::Wildcard
                        | ast::PatternKind::Var { .. }
                )
                && is_unit_block(&arm.body)
        })
}

fn is_unit_block(expr: &ast::Expr) -> bool {
    match &expr.kind {
        ast::ExprKind::Block { result, .. } => match result.as_deref() {
            None => true,
            Some(result) => matches!(
                result.kind,
                ast::ExprKind::Literal {
                    value: ast::LitValue::Unit
                }
            ),
        },
        _ => false,
    }
}

impl Lowerer {
    /// Lower one expression-form match arm inside its own scope
    pub fn transform_expr_arm(
        &mut self,
        scrutinee_ty: &Type,
        arm: &ast::MatchArm,
    ) -> Result<sir::MatchArm> {
        self.with_scope(|lw| {
            let pattern = lw.lower_pattern(&arm.pattern, scrutinee_ty, true)?;
            let guard = arm
                .guard
                .as_ref()
                .map(|guard| lw.visit_expr(guard, None))
                .transpose()?;
            let body = lw.visit_expr(&arm.body, None)?;
            Ok(sir::MatchArm {
                pattern,
                guard,
                body,
            })
        })
    }

    /// Lower one statement-form match arm inside its own scope
    pub fn transform_stmt_arm(
        &mut self,
        scrutinee_ty: &Type,
        arm: &ast::MatchArm,
    ) -> Result<sir::StmtMatchArm> {
        self.with_scope(|lw| {
            let pattern = lw.lower_pattern(&arm.pattern, scrutinee_ty, true)?;
            let guard = arm
                .guard
                .as_ref()
                .map(|guard| lw.visit_expr(guard, None))
                .transpose()?;
            let body = lw.lower_body_as_stmts(&arm.body)?;
            Ok(sir::StmtMatchArm {
                pattern,
                guard,
                body,
            })
        })
    }

    /// Lower a pattern against the scrutinee type
    ///
    /// Computes constructor `bindings` (positional simple-binding names,
    /// ignored fields skipped) and, when `bind` is set, binds pattern
    /// variables into the current scope. Or-pattern alternatives beyond
    /// the first are lowered without binding — all alternatives must bind
    /// the same names, so the first is authoritative.
    pub fn lower_pattern(
        &mut self,
        pattern: &ast::Pattern,
        scrutinee_ty: &Type,
        bind: bool,
    ) -> Result<sir::Pattern> {
        let kind = match &pattern.kind {
            ast::PatternKind::Wildcard => sir::PatternKind::Wildcard,

            ast::PatternKind::Literal { value } => sir::PatternKind::Literal {
                value: value.clone(),
            },

            ast::PatternKind::Var { name } => {
                if bind && *name != self.services.names.underscore {
                    self.services.vars.set(*name, scrutinee_ty.clone());
                }
                sir::PatternKind::Var { name: *name }
            }

            ast::PatternKind::Constructor { name, fields } => {
                let field_types = self
                    .constructor_info_for(*name, scrutinee_ty)
                    .map(|sig| sig.param_types)
                    .unwrap_or_default();

                let mut lowered_fields = Vec::with_capacity(fields.len());
                let mut bindings = Vec::new();
                for (index, field) in fields.iter().enumerate() {
                    let field_ty = field_types
                        .get(index)
                        .cloned()
                        .unwrap_or_else(|| self.services.names.auto_ty());
                    match field {
                        ast::PatternField::Binding(binding) => {
                            if *binding != self.services.names.underscore {
                                if bind {
                                    self.services.vars.set(*binding, field_ty);
                                }
                                bindings.push(*binding);
                            }
                            lowered_fields.push(sir::PatternField::Binding(*binding));
                        }
                        ast::PatternField::Pattern(nested) => {
                            let lowered = self.lower_pattern(nested, &field_ty, bind)?;
                            lowered_fields.push(sir::PatternField::Nested(lowered));
                        }
                    }
                }

                sir::PatternKind::Constructor {
                    name: *name,
                    fields: lowered_fields,
                    bindings,
                }
            }

            ast::PatternKind::Or { alternatives } => {
                let mut lowered = Vec::with_capacity(alternatives.len());
                for (index, alternative) in alternatives.iter().enumerate() {
                    lowered.push(self.lower_pattern(
                        alternative,
                        scrutinee_ty,
                        bind && index == 0,
                    )?);
                }
                sir::PatternKind::Or {
                    alternatives: lowered,
                }
            }

            ast::PatternKind::Regex {
                pattern: source,
                flags,
                bindings,
            } => {
                if bind {
                    for binding in bindings {
                        if *binding != self.services.names.underscore {
                            self.services
                                .vars
                                .set(*binding, self.services.names.string_ty());
                        }
                    }
                }
                sir::PatternKind::Regex {
                    pattern: source.clone(),
                    flags: flags.clone(),
                    bindings: bindings.clone(),
                }
            }
        };

        Ok(sir::Pattern {
            kind,
            origin: pattern.origin.clone(),
        })
    }

    /// Constructor signature specialized for a concrete scrutinee type
    ///
    /// User-declared constructors specialize positionally via
    /// [`infer_substitutions`]. The stdlib `Some`/`None` constructors of
    /// `Option<T>` are synthesized from the scrutinee when no declaration
    /// exists.
    pub fn constructor_info_for(
        &self,
        name: Symbol,
        scrutinee_ty: &Type,
    ) -> Option<FunctionSig> {
        if let Some(sig) = self.services.constructors.get(&name) {
            let subst = infer_substitutions(&sig.type_params, &sig.ret_type, scrutinee_ty);
            if subst.is_empty() {
                return Some(sig.clone());
            }
            return Some(FunctionSig::new(
                sig.name,
                sig.param_types
                    .iter()
                    .map(|param| substitute(param, &subst))
                    .collect(),
                substitute(&sig.ret_type, &subst),
                sig.type_params.clone(),
            ));
        }

        let names = self.services.names;
        if name == names.some || name == names.none {
            if let Type::Generic { base, args } = scrutinee_ty {
                if base.name() == Some(names.option) && args.len() == 1 {
                    let params = if name == names.some {
                        vec![args[0].clone()]
                    } else {
                        vec![]
                    };
                    return Some(FunctionSig::new(name, params, scrutinee_ty.clone(), vec![]));
                }
            }
        }
        None
    }
}

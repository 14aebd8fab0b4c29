//! Function effect analysis
//!
//! A function with no body keeps its declared effects unchanged. A pure
//! body whose declared return type is a compile-time literal type earns
//! the `Comptime` effect, prepended so backends see it first. Effects are
//! deduplicated, keeping first occurrences.

use crate::purity::{is_non_literal_type, is_pure_expr};
use crate::services::Services;
use au_sir::{Effect, Func};

/// Compute the effect set for a lowered function
pub fn analyze_effects(func: &Func, services: &Services) -> Vec<Effect> {
    let Some(body) = &func.body else {
        return func.effects.clone();
    };

    let mut effects = func.effects.clone();
    if is_pure_expr(body, services) && !is_non_literal_type(&func.ret_type, services) {
        effects.insert(0, Effect::Comptime);
    }
    dedupe(effects)
}

fn dedupe(effects: Vec<Effect>) -> Vec<Effect> {
    let mut seen = Vec::with_capacity(effects.len());
    for effect in effects {
        if !seen.contains(&effect) {
            seen.push(effect);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use au_ast::LitValue;
    use au_sir::{Expr, ExprKind};

    fn pure_func(services: &Services, body: Option<Expr>) -> Func {
        Func {
            name: services.intern("answer"),
            params: vec![],
            ret_type: services.names.i32_ty(),
            body,
            effects: vec![],
            type_params: vec![],
            external: false,
            exported: false,
            origin: None,
        }
    }

    #[test]
    fn bodiless_functions_keep_declared_effects() {
        let services = Services::new();
        let mut func = pure_func(&services, None);
        func.effects = vec![Effect::NoExcept];
        assert_eq!(analyze_effects(&func, &services), vec![Effect::NoExcept]);
    }

    #[test]
    fn pure_literal_bodies_earn_comptime_first() {
        let services = Services::new();
        let body = Expr::new(
            ExprKind::Literal {
                value: LitValue::Int(42),
            },
            services.names.i32_ty(),
            None,
        );
        let mut func = pure_func(&services, Some(body));
        func.effects = vec![Effect::NoExcept];
        assert_eq!(
            analyze_effects(&func, &services),
            vec![Effect::Comptime, Effect::NoExcept]
        );
    }

    #[test]
    fn string_returning_functions_stay_runtime() {
        let services = Services::new();
        let body = Expr::new(
            ExprKind::Literal {
                value: LitValue::Str("hi".into()),
            },
            services.names.string_ty(),
            None,
        );
        let mut func = pure_func(&services, Some(body));
        func.ret_type = services.names.string_ty();
        assert!(analyze_effects(&func, &services).is_empty());
    }

    #[test]
    fn effects_are_deduplicated() {
        let services = Services::new();
        let body = Expr::new(
            ExprKind::Literal {
                value: LitValue::Int(1),
            },
            services.names.i32_ty(),
            None,
        );
        let mut func = pure_func(&services, Some(body));
        func.effects = vec![Effect::Comptime, Effect::NoExcept];
        assert_eq!(
            analyze_effects(&func, &services),
            vec![Effect::Comptime, Effect::NoExcept]
        );
    }
}

//! Function-stage rules

use crate::effects::analyze_effects;
use crate::engine::FunctionRule;
use crate::lowerer::Lowerer;
use au_diag::Result;
use au_sir::Func;

/// Attaches the analyzed effect set to a lowered function
pub struct EffectRule;

impl FunctionRule for EffectRule {
    fn name(&self) -> &'static str {
        "effects"
    }

    fn applies(&self, _func: &Func) -> bool {
        true
    }

    fn apply(&self, func: Func, lw: &mut Lowerer) -> Result<Func> {
        let effects = analyze_effects(&func, &lw.services);
        Ok(Func { effects, ..func })
    }
}

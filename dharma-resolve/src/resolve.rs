//! Cross-reference resolution (SPEC_FULL.md §4.3): binds every symbolic
//! reference collected during parsing to a concrete rule id.

use crate::symtab::RuleArena;
use dharma_util::error::{GrammarError, Result};
use dharma_util::Symbol;

/// Resolve every value/variable/element cross-reference in the arena in
/// place. Fails on the first unresolved reference, matching SPEC_FULL.md
/// §7 ("the first is fatal").
pub fn resolve_crossrefs(arena: &mut RuleArena) -> Result<()> {
    let value_ids: Vec<_> = arena.values.indices().collect();
    for id in value_ids {
        let (value_refs, variable_refs, element_refs) = {
            let rule = &arena.values[id];
            (rule.rule.meta.value_xref.clone(), rule.rule.meta.variable_xref.clone(), rule.rule.meta.element_xref.clone())
        };
        let referrer = arena.values[id].rule.meta.ident;
        let value_xref = resolve_set(&value_refs, &arena.value_names, referrer, "value")?;
        let variable_xref = resolve_set(&variable_refs, &arena.variable_names, referrer, "variable")?;
        let element_xref = resolve_set(&element_refs, &arena.variable_names, referrer, "element")?;
        let rule = &mut arena.values[id];
        rule.value_xref = value_xref;
        rule.variable_xref = variable_xref;
        rule.element_xref = element_xref;
    }

    let variable_ids: Vec<_> = arena.variables.indices().collect();
    for id in variable_ids {
        let (value_refs, variable_refs, element_refs) = {
            let rule = &arena.variables[id];
            (rule.rule.meta.value_xref.clone(), rule.rule.meta.variable_xref.clone(), rule.rule.meta.element_xref.clone())
        };
        let referrer = arena.variables[id].rule.meta.ident;
        let value_xref = resolve_set(&value_refs, &arena.value_names, referrer, "value")?;
        let variable_xref = resolve_set(&variable_refs, &arena.variable_names, referrer, "variable")?;
        let element_xref = resolve_set(&element_refs, &arena.variable_names, referrer, "element")?;
        let rule = &mut arena.variables[id];
        rule.value_xref = value_xref;
        rule.variable_xref = variable_xref;
        rule.element_xref = element_xref;
    }

    let variance_ids: Vec<_> = arena.variances.indices().collect();
    for id in variance_ids {
        let (value_refs, variable_refs, element_refs) = {
            let rule = &arena.variances[id];
            (rule.rule.meta.value_xref.clone(), rule.rule.meta.variable_xref.clone(), rule.rule.meta.element_xref.clone())
        };
        let referrer = arena.variances[id].rule.meta.ident;
        let value_xref = resolve_set(&value_refs, &arena.value_names, referrer, "value")?;
        let variable_xref = resolve_set(&variable_refs, &arena.variable_names, referrer, "variable")?;
        let element_xref = resolve_set(&element_refs, &arena.variable_names, referrer, "element")?;
        let rule = &mut arena.variances[id];
        rule.value_xref = value_xref;
        rule.variable_xref = variable_xref;
        rule.element_xref = element_xref;
    }

    if arena.variances.is_empty() {
        return Err(GrammarError::Resolve {
            location: "<grammar>".to_string(),
            message: "variance section is empty".to_string(),
        });
    }
    Ok(())
}

fn resolve_set<Id: Copy>(
    refs: &std::collections::HashSet<Symbol>,
    names: &std::collections::HashMap<Symbol, Id>,
    referrer: Symbol,
    kind: &str,
) -> Result<std::collections::HashMap<Symbol, Id>> {
    let mut resolved = std::collections::HashMap::with_capacity(refs.len());
    for &q in refs {
        match names.get(&q) {
            Some(id) => {
                resolved.insert(q, *id);
            }
            None => {
                return Err(GrammarError::UndefinedReference {
                    location: format!("referenced from `{referrer}` ({kind} reference)"),
                    reference: q.to_string(),
                });
            }
        }
    }
    Ok(resolved)
}

//! The rule arena: stable indices into owned rule storage, plus the
//! namespaced value/variable/variance symbol tables (SPEC_FULL.md §2, §9
//! "cyclic rule graph" design note).

use dharma_grammar::{ParsedGrammar, ValueRule, VariableRule, VarianceRule};
use dharma_util::error::{GrammarError, Result};
use dharma_util::{define_idx, IndexVec, Symbol};
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

define_idx!(ValueId);
define_idx!(VariableId);
define_idx!(VarianceId);

/// A value rule plus the resolved form of its cross-reference sets and the
/// leaf-path analysis results computed over it.
pub struct ResolvedValueRule {
    pub rule: ValueRule,
    pub value_xref: HashMap<Symbol, ValueId>,
    pub variable_xref: HashMap<Symbol, VariableId>,
    pub element_xref: HashMap<Symbol, VariableId>,
    /// Set of value-reference targets that provably shrink distance to a
    /// leaf (SPEC_FULL.md §4.4), filled in by `dharma_resolve::leaf`.
    pub path_idents: HashSet<ValueId>,
    /// Every `(leaf_id, next_hop_id, depth)` route this rule has toward some
    /// leaf, filled in by `dharma_resolve::leaf`.
    pub leaf_path: Vec<(ValueId, ValueId, u32)>,
    /// Lazily computed on first forced-leaf-mode expansion (SPEC_FULL.md §4.5).
    pub minimized: OnceLock<Vec<usize>>,
}

pub struct ResolvedVariableRule {
    pub rule: VariableRule,
    pub value_xref: HashMap<Symbol, ValueId>,
    pub variable_xref: HashMap<Symbol, VariableId>,
    pub element_xref: HashMap<Symbol, VariableId>,
}

pub struct ResolvedVarianceRule {
    pub rule: VarianceRule,
    pub value_xref: HashMap<Symbol, ValueId>,
    pub variable_xref: HashMap<Symbol, VariableId>,
    pub element_xref: HashMap<Symbol, VariableId>,
}

/// Owns every rule parsed across every grammar file in the run. Rules refer
/// to each other only through `ValueId`/`VariableId`/`VarianceId`, never
/// through borrows, so the graph can be freely cyclic.
#[derive(Default)]
pub struct RuleArena {
    pub values: IndexVec<ValueId, ResolvedValueRule>,
    pub variables: IndexVec<VariableId, ResolvedVariableRule>,
    pub variances: IndexVec<VarianceId, ResolvedVarianceRule>,
    pub value_names: HashMap<Symbol, ValueId>,
    pub variable_names: HashMap<Symbol, VariableId>,
    pub variance_names: HashMap<Symbol, VarianceId>,
}

impl RuleArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one parsed grammar file's rules into the arena, rejecting
    /// identifiers that collide with a rule already inserted in the same
    /// namespaced section (SPEC_FULL.md §3 invariant; this subsumes the
    /// single-file check already performed during parsing for the
    /// cross-file case).
    pub fn merge(&mut self, grammar: ParsedGrammar) -> Result<()> {
        for rule in grammar.values {
            let ident = rule.meta.ident;
            if self.value_names.contains_key(&ident) {
                return Err(dup_err(ident));
            }
            let id = self.values.push(ResolvedValueRule {
                rule,
                value_xref: HashMap::new(),
                variable_xref: HashMap::new(),
                element_xref: HashMap::new(),
                path_idents: HashSet::new(),
                leaf_path: Vec::new(),
                minimized: OnceLock::new(),
            });
            self.value_names.insert(ident, id);
        }
        for rule in grammar.variables {
            let ident = rule.meta.ident;
            if self.variable_names.contains_key(&ident) {
                return Err(dup_err(ident));
            }
            let id = self.variables.push(ResolvedVariableRule {
                rule,
                value_xref: HashMap::new(),
                variable_xref: HashMap::new(),
                element_xref: HashMap::new(),
            });
            self.variable_names.insert(ident, id);
        }
        for rule in grammar.variances {
            let ident = rule.meta.ident;
            if self.variance_names.contains_key(&ident) {
                return Err(dup_err(ident));
            }
            let id = self.variances.push(ResolvedVarianceRule {
                rule,
                value_xref: HashMap::new(),
                variable_xref: HashMap::new(),
                element_xref: HashMap::new(),
            });
            self.variance_names.insert(ident, id);
        }
        Ok(())
    }
}

fn dup_err(ident: Symbol) -> GrammarError {
    GrammarError::DuplicateDefinition { location: ident.namespace().to_string(), ident: ident.to_string() }
}

//! Cross-reference resolution and leaf-path analysis over the rule graph
//! parsed by `dharma-grammar` (SPEC_FULL.md §4.3, §4.4).

pub mod leaf;
pub mod resolve;
pub mod symtab;

pub use leaf::analyze_leaf_paths;
pub use resolve::resolve_crossrefs;
pub use symtab::{
    ResolvedValueRule, ResolvedVariableRule, ResolvedVarianceRule, RuleArena, ValueId, VariableId, VarianceId,
};

use dharma_grammar::ParsedGrammar;
use dharma_util::error::Result;

/// Merge every parsed grammar into one arena, resolve all cross-references,
/// and run leaf-path analysis. This is the full "symbol table + resolver +
/// leaf analyzer" stage of the pipeline in one call.
pub fn build_rule_graph(grammars: Vec<ParsedGrammar>) -> Result<RuleArena> {
    let mut arena = RuleArena::new();
    for grammar in grammars {
        arena.merge(grammar)?;
    }
    resolve_crossrefs(&mut arena)?;
    analyze_leaf_paths(&mut arena);
    Ok(arena)
}

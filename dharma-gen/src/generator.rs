//! The stochastic expansion engine (SPEC_FULL.md §4.5).

use crate::config::Config;
use crate::state::{GenState, VariableTable};
use dharma_grammar::{RangeSpec, Token};
use dharma_resolve::{RuleArena, ValueId, VariableId, VarianceId};
use dharma_util::error::{GrammarError, Result};
use dharma_util::Symbol;
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::{HashMap, HashSet};

/// Borrowed view of one rule's resolved cross-reference maps, passed down
/// through token expansion instead of re-deriving which rule "owns" a token.
struct XrefMaps<'a> {
    value: &'a HashMap<Symbol, ValueId>,
    variable: &'a HashMap<Symbol, VariableId>,
    element: &'a HashMap<Symbol, VariableId>,
}

struct TestCaseCtx {
    gen_state: GenState,
    variables: VariableTable,
}

/// Drives expansion over an immutable, resolved rule graph using a
/// caller-owned PRNG stream. Borrowing the RNG instead of owning it lets a
/// driver session keep one `StdRng` alive across many `generate_testcase`
/// calls (determinism requires the stream, not just the seed, to carry
/// across test cases) without making `Generator` self-referential.
pub struct Generator<'a> {
    arena: &'a RuleArena,
    config: &'a Config,
    rng: &'a mut StdRng,
}

impl<'a> Generator<'a> {
    pub fn new(arena: &'a RuleArena, config: &'a Config, rng: &'a mut StdRng) -> Self {
        Generator { arena, config, rng }
    }

    /// Produce one test case: clear per-variable state, draw a number of
    /// variance rules, expand each under a fresh leaf-mode state, and
    /// assemble `prefix + variables + variances + suffix`, optionally
    /// substituted into `template`'s `$testcase_content` placeholder.
    pub fn generate_testcase(&mut self, prefix: &str, suffix: &str, template: Option<&str>) -> Result<String> {
        if self.arena.variances.is_empty() {
            return Err(GrammarError::Generate {
                location: "<grammar>".to_string(),
                message: "variance section is empty".to_string(),
            });
        }

        let mut ctx = TestCaseCtx { gen_state: GenState::new(), variables: VariableTable::new() };
        let draws = self.rng.gen_range(self.config.variance_min..=self.config.variance_max).max(0) as u64;
        let variance_ids: Vec<VarianceId> = self.arena.variances.indices().collect();

        let mut variances_block = String::new();
        for _ in 0..draws {
            let id = variance_ids[self.rng.gen_range(0..variance_ids.len())];
            ctx.gen_state = GenState::new();
            let content = self.expand_variance(id, &mut ctx)?;
            variances_block.push_str(&wrap_and_terminate(&self.config.variance_template, &content));
        }

        let mut variables_block = String::new();
        for (_, state) in ctx.variables.touched() {
            variables_block.push_str(&wrap_and_terminate(&self.config.variance_template, &state.default));
        }

        let body = format!("{prefix}{variables_block}{variances_block}{suffix}");
        Ok(match template {
            Some(t) => t.replace("$testcase_content", &body),
            None => body,
        })
    }

    fn expand_variance(&mut self, id: VarianceId, ctx: &mut TestCaseCtx) -> Result<String> {
        let arena = self.arena;
        let rule = &arena.variances[id];
        if rule.rule.alternatives.is_empty() {
            return Err(GrammarError::Generate {
                location: rule.rule.meta.ident.to_string(),
                message: "variance rule has no alternatives".to_string(),
            });
        }
        let idx = self.rng.gen_range(0..rule.rule.alternatives.len());
        let alt = &rule.rule.alternatives[idx];
        let xref = XrefMaps { value: &rule.value_xref, variable: &rule.variable_xref, element: &rule.element_xref };
        self.expand_tokens(alt, &xref, ctx)
    }

    fn expand_value(&mut self, id: ValueId, ctx: &mut TestCaseCtx) -> Result<String> {
        let arena = self.arena;
        let rule = &arena.values[id];
        let leaf_mode = ctx.gen_state.tick(self.config.leaf_trigger);

        if rule.rule.alternatives.is_empty() {
            return Ok(String::new());
        }

        let alt_idx = if leaf_mode && !rule.rule.leaf.is_empty() {
            rule.rule.leaf[self.rng.gen_range(0..rule.rule.leaf.len())]
        } else if leaf_mode {
            tracing::debug!(rule = %rule.rule.meta.ident, "no direct leaf alternative, falling back to minimized set");
            let minimized = rule.minimized.get_or_init(|| {
                compute_minimized(&rule.rule.alternatives, &rule.value_xref, &rule.path_idents)
            });
            if minimized.is_empty() {
                return Err(GrammarError::Generate {
                    location: rule.rule.meta.ident.to_string(),
                    message: "no path to a leaf alternative in forced leaf mode".to_string(),
                });
            }
            minimized[self.rng.gen_range(0..minimized.len())]
        } else {
            self.rng.gen_range(0..rule.rule.alternatives.len())
        };

        let alt = &rule.rule.alternatives[alt_idx];
        let xref = XrefMaps { value: &rule.value_xref, variable: &rule.variable_xref, element: &rule.element_xref };
        self.expand_tokens(alt, &xref, ctx)
    }

    fn expand_variable(&mut self, id: VariableId, ctx: &mut TestCaseCtx) -> Result<String> {
        let arena = self.arena;
        let rule = &arena.variables[id];
        let count = ctx.variables.entry(id).count;
        let threshold = self.rng.gen_range(self.config.variable_min..=self.config.variable_max);
        if count > 0 && (count as i64) >= threshold {
            let k = self.rng.gen_range(1..=count);
            return Ok(format!("{}{}", rule.rule.meta.ident.local(), k));
        }

        if rule.rule.alternatives.is_empty() {
            return Err(GrammarError::Generate {
                location: rule.rule.meta.ident.to_string(),
                message: "variable rule has no alternatives".to_string(),
            });
        }
        let alt_idx = self.rng.gen_range(0..rule.rule.alternatives.len());
        let alt = rule.rule.alternatives[alt_idx].clone();
        let xref = XrefMaps { value: &rule.value_xref, variable: &rule.variable_xref, element: &rule.element_xref };
        let prefix = self.expand_tokens(&alt.prefix, &xref, ctx)?;
        let suffix = self.expand_tokens(&alt.suffix, &xref, ctx)?;

        let state = ctx.variables.entry(id);
        state.count += 1;
        let element_name = format!("{}{}", rule.rule.meta.ident.local(), state.count);
        let declaration = format!("{prefix}{element_name}{suffix}\n");
        state.default.push_str(&declaration);
        Ok(element_name)
    }

    fn expand_tokens(&mut self, tokens: &[Token], xref: &XrefMaps<'_>, ctx: &mut TestCaseCtx) -> Result<String> {
        let mut out = String::new();
        for tok in tokens {
            out.push_str(&self.expand_token(tok, xref, ctx)?);
        }
        Ok(out)
    }

    fn expand_token(&mut self, tok: &Token, xref: &XrefMaps<'_>, ctx: &mut TestCaseCtx) -> Result<String> {
        match tok {
            Token::Literal(s) => Ok(s.clone()),
            Token::ValueXRef(sym) => {
                let id = *xref.value.get(sym).ok_or_else(|| undefined(*sym))?;
                self.expand_value(id, ctx)
            }
            Token::VariableXRef(sym) => {
                let id = *xref.variable.get(sym).ok_or_else(|| undefined(*sym))?;
                self.expand_variable(id, ctx)
            }
            Token::ElementXRef(sym) => {
                let id = *xref.element.get(sym).ok_or_else(|| undefined(*sym))?;
                self.expand_variable(id, ctx)
            }
            Token::Repeat { inner, separator, nodups } => self.expand_repeat(inner, separator, *nodups, xref, ctx),
            Token::Range(spec) => Ok(self.expand_range(spec)),
            Token::Choice(items) => Ok(items[self.rng.gen_range(0..items.len())].clone()),
            Token::Uri(snapshot) => Ok(snapshot.entries[self.rng.gen_range(0..snapshot.entries.len())].clone()),
            Token::Block(content) => Ok(content.clone()),
        }
    }

    fn expand_repeat(
        &mut self,
        inner: &[Token],
        separator: &str,
        nodups: bool,
        xref: &XrefMaps<'_>,
        ctx: &mut TestCaseCtx,
    ) -> Result<String> {
        let power = self.rng.gen_range(1..=self.config.max_repeat_power);
        let max_count = 2u64.saturating_pow(power);
        let count = self.rng.gen_range(1..=max_count);
        let mut parts = Vec::with_capacity(count as usize);
        for _ in 0..count {
            parts.push(self.expand_tokens(inner, xref, ctx)?);
        }
        if nodups {
            let mut seen = HashSet::new();
            parts.retain(|p| seen.insert(p.clone()));
        }
        Ok(parts.join(separator))
    }

    fn expand_range(&mut self, spec: &RangeSpec) -> String {
        match spec {
            RangeSpec::Char(a, b) => {
                let n = self.rng.gen_range(*a as u32..=*b as u32);
                char::from_u32(n).map(String::from).unwrap_or_else(|| a.to_string())
            }
            RangeSpec::Int(a, b, base) => {
                let n = self.rng.gen_range(*a..=*b);
                if *base == 16 {
                    format!("{n:x}")
                } else {
                    n.to_string()
                }
            }
            RangeSpec::Float(a, b) => {
                let n = self.rng.gen_range(*a..=*b);
                n.to_string()
            }
        }
    }
}

fn undefined(sym: Symbol) -> GrammarError {
    GrammarError::UndefinedReference {
        location: "<generation>".to_string(),
        reference: sym.to_string(),
    }
}

/// Lazily computed per value rule (SPEC_FULL.md §4.5 step 4, §9 decision on
/// the non-repeat/repeat partition).
fn compute_minimized(
    alternatives: &[Vec<Token>],
    value_xref: &HashMap<Symbol, ValueId>,
    path_idents: &HashSet<ValueId>,
) -> Vec<usize> {
    struct Candidate {
        idx: usize,
        has_repeat: bool,
        count: usize,
    }

    let mut candidates = Vec::new();
    for (idx, alt) in alternatives.iter().enumerate() {
        let mut has_repeat = false;
        let mut count = 0usize;
        if scan_alt(alt, value_xref, path_idents, &mut has_repeat, &mut count) {
            candidates.push(Candidate { idx, has_repeat, count: count.clamp(1, 8) });
        }
    }
    if candidates.is_empty() {
        return Vec::new();
    }

    let any_non_repeat = candidates.iter().any(|c| !c.has_repeat);
    let pool: Vec<&Candidate> = if any_non_repeat {
        candidates.iter().filter(|c| !c.has_repeat).collect()
    } else {
        candidates.iter().collect()
    };
    let min_count = pool.iter().map(|c| c.count).min().expect("pool is non-empty");
    pool.into_iter().filter(|c| c.count == min_count).map(|c| c.idx).collect()
}

/// Returns false (ineligible) if `alt` references a value rule outside
/// `path_idents` anywhere, including inside a repeat's inner body.
fn scan_alt(
    alt: &[Token],
    value_xref: &HashMap<Symbol, ValueId>,
    path_idents: &HashSet<ValueId>,
    has_repeat: &mut bool,
    count: &mut usize,
) -> bool {
    for tok in alt {
        match tok {
            Token::ValueXRef(sym) => {
                *count += 1;
                match value_xref.get(sym) {
                    Some(target) if path_idents.contains(target) => {}
                    _ => return false,
                }
            }
            Token::Repeat { inner, .. } => {
                *has_repeat = true;
                if !scan_alt(inner, value_xref, path_idents, has_repeat, count) {
                    return false;
                }
            }
            _ => {}
        }
    }
    true
}

/// Wraps `content` with `template`'s single `%s` placeholder, then ensures a
/// trailing newline without doubling one the content already carries (a
/// variable rule's accumulated `default` always ends in `\n`; a variance
/// rule's expansion usually does not).
fn wrap_and_terminate(template: &str, content: &str) -> String {
    let wrapped = template.replacen("%s", content, 1);
    if wrapped.ends_with('\n') {
        wrapped
    } else {
        format!("{wrapped}\n")
    }
}

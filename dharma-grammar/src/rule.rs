//! Rule kinds (SPEC_FULL.md §3): value, variable, and variance rules, plus
//! the cross-reference bookkeeping every rule carries regardless of kind.

use crate::token::Token;
use dharma_util::{Span, Symbol};
use std::collections::HashSet;

/// The section a rule was declared under; also what a `%section%` directive
/// selects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Value,
    Variable,
    Variance,
}

/// Fields common to every rule kind: identity, source location, and the
/// reference sets accumulated while its alternatives were parsed.
///
/// `value_xref`/`variable_xref`/`element_xref` start out holding the
/// qualified identifiers referenced anywhere in this rule's alternatives;
/// `dharma-resolve` replaces that bookkeeping with concrete rule ids without
/// changing the rule's shape.
#[derive(Clone, Debug)]
pub struct RuleMeta {
    pub ident: Symbol,
    pub span: Span,
    pub value_xref: HashSet<Symbol>,
    pub variable_xref: HashSet<Symbol>,
    pub element_xref: HashSet<Symbol>,
}

impl RuleMeta {
    pub fn new(ident: Symbol, span: Span) -> Self {
        RuleMeta {
            ident,
            span,
            value_xref: HashSet::new(),
            variable_xref: HashSet::new(),
            element_xref: HashSet::new(),
        }
    }

    /// Record every cross-reference token found in `alt` into this rule's
    /// xref sets. Called once per alternative as it is appended.
    pub fn observe(&mut self, alt: &[Token]) {
        for tok in alt {
            self.observe_token(tok);
        }
    }

    fn observe_token(&mut self, tok: &Token) {
        match tok {
            Token::ValueXRef(q) => {
                self.value_xref.insert(*q);
            }
            Token::VariableXRef(q) => {
                self.variable_xref.insert(*q);
            }
            Token::ElementXRef(q) => {
                self.element_xref.insert(*q);
            }
            Token::Repeat { inner, .. } => {
                for t in inner {
                    self.observe_token(t);
                }
            }
            _ => {}
        }
    }
}

/// Whether an alternative is a "leaf" per SPEC_FULL.md §4.4: no
/// `ValueXRef`, no `Repeat`.
pub fn is_leaf_alternative(alt: &[Token]) -> bool {
    alt.iter().all(|t| !t.is_value_xref() && !t.is_repeat())
}

#[derive(Clone, Debug)]
pub struct ValueRule {
    pub meta: RuleMeta,
    pub alternatives: Vec<Vec<Token>>,
    /// Indices into `alternatives` that are leaf alternatives, collected
    /// incrementally as each alternative is appended.
    pub leaf: Vec<usize>,
}

impl ValueRule {
    pub fn new(ident: Symbol, span: Span) -> Self {
        ValueRule { meta: RuleMeta::new(ident, span), alternatives: Vec::new(), leaf: Vec::new() }
    }

    pub fn push_alternative(&mut self, alt: Vec<Token>) {
        self.meta.observe(&alt);
        if is_leaf_alternative(&alt) {
            self.leaf.push(self.alternatives.len());
        }
        self.alternatives.push(alt);
    }
}

/// A variable rule's alternative split around its single self-referential
/// `ElementXRef` (SPEC_FULL.md §3).
#[derive(Clone, Debug)]
pub struct VariableAlternative {
    pub prefix: Vec<Token>,
    pub suffix: Vec<Token>,
}

#[derive(Clone, Debug)]
pub struct VariableRule {
    pub meta: RuleMeta,
    pub alternatives: Vec<VariableAlternative>,
}

impl VariableRule {
    pub fn new(ident: Symbol, span: Span) -> Self {
        VariableRule { meta: RuleMeta::new(ident, span), alternatives: Vec::new() }
    }
}

#[derive(Clone, Debug)]
pub struct VarianceRule {
    pub meta: RuleMeta,
    pub alternatives: Vec<Vec<Token>>,
}

impl VarianceRule {
    pub fn new(ident: Symbol, span: Span) -> Self {
        VarianceRule { meta: RuleMeta::new(ident, span), alternatives: Vec::new() }
    }

    pub fn push_alternative(&mut self, alt: Vec<Token>) {
        self.meta.observe(&alt);
        self.alternatives.push(alt);
    }
}

//! Grammar file lexer/parser (SPEC_FULL.md §4.1, §4.2).
//!
//! The grammar DSL is line-oriented rather than token-oriented at the top
//! level, so the "lexer" here is a line classifier driving a small state
//! machine, and the interesting tokenizing happens only inside an
//! alternative's body (`parse_token_body`).

use crate::rule::{Section, ValueRule, VariableAlternative, VariableRule, VarianceRule};
use crate::token::{ConstValue, RangeSpec, Token, UriSnapshot};
use dharma_util::error::{GrammarError, Result};
use dharma_util::{FileId, Handler, SourceMap, Span, Symbol, UriTable};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static RE_CONST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^%const%\s+([A-Za-z_][A-Za-z0-9_]*)\s*:=\s*(.+)$").unwrap());
static RE_SECTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^%section%\s*:=\s*(value|variable|variance)\s*$").unwrap());
/// Matches both the canonical `ident :=` (rule body supplied by indented
/// lines that follow) and the compact `ident := body` single-alternative
/// shorthand; group 2 is empty in the first form.
static RE_TOPLEVEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\s*:=\s*(.*)$").unwrap());

/// Everything parsed out of one grammar file, still keyed by local
/// (unqualified) identifier within each section.
#[derive(Debug, Default)]
pub struct ParsedGrammar {
    pub namespace: String,
    pub values: Vec<ValueRule>,
    pub variables: Vec<VariableRule>,
    pub variances: Vec<VarianceRule>,
    pub consts: Vec<(String, ConstValue, Span)>,
}

enum RuleBuilder {
    Value(ValueRule),
    Variable(VariableRule),
    Variance(VarianceRule),
}

/// Parse one grammar file's contents into a [`ParsedGrammar`].
///
/// `namespace` is the file's stem (SPEC_FULL.md §3); `uri_table` and
/// `handler` are threaded through so `%uri%`/`%block%` tokens can resolve
/// and snapshot their targets at construction time, as required by §9's
/// "read once" decision.
pub fn parse_file(
    namespace: &str,
    path: &Path,
    contents: &str,
    file_id: FileId,
    uri_table: &UriTable,
    handler: &Handler,
) -> Result<ParsedGrammar> {
    let mut grammar = ParsedGrammar { namespace: namespace.to_string(), ..Default::default() };
    let mut section: Option<Section> = None;
    let mut current: Option<RuleBuilder> = None;

    for (idx, raw_line) in contents.lines().enumerate() {
        let line_no = (idx + 1) as u32;
        let span = Span::new(file_id, line_no);
        let trimmed = raw_line.trim();

        if trimmed.is_empty() {
            finalize(&mut current, &mut grammar);
            continue;
        }
        if trimmed.starts_with("%%%") {
            continue;
        }
        if let Some(caps) = RE_CONST.captures(trimmed) {
            let name = caps.get(1).unwrap().as_str().to_string();
            let value = parse_const_value(caps.get(2).unwrap().as_str());
            grammar.consts.push((name, value, span));
            continue;
        }
        if let Some(caps) = RE_SECTION.captures(trimmed) {
            finalize(&mut current, &mut grammar);
            section = Some(match caps.get(1).unwrap().as_str().to_ascii_lowercase().as_str() {
                "value" => Section::Value,
                "variable" => Section::Variable,
                "variance" => Section::Variance,
                _ => unreachable!("regex only matches the three section names"),
            });
            continue;
        }
        let is_indented = raw_line.starts_with(' ') || raw_line.starts_with('\t');
        if !is_indented {
            if let Some(caps) = RE_TOPLEVEL.captures(trimmed) {
                let Some(sect) = section else {
                    return Err(parse_err(path, line_no, "top-level rule before %section% declared"));
                };
                finalize(&mut current, &mut grammar);
                let ident = Symbol::qualified(namespace, caps.get(1).unwrap().as_str());
                check_not_duplicate(&grammar, sect, ident, path, line_no)?;
                let mut builder = match sect {
                    Section::Value => RuleBuilder::Value(ValueRule::new(ident, span)),
                    Section::Variable => RuleBuilder::Variable(VariableRule::new(ident, span)),
                    Section::Variance => RuleBuilder::Variance(VarianceRule::new(ident, span)),
                };
                // Compact `ident := body` shorthand: the rest of the line is
                // this rule's first alternative; indented lines may still
                // follow to add more.
                let inline_body = caps.get(2).unwrap().as_str();
                if !inline_body.trim().is_empty() {
                    let body_tokens =
                        parse_token_body(inline_body.trim(), namespace, file_id, line_no, uri_table, handler, path)?;
                    push_alternative(&mut builder, body_tokens, path, line_no)?;
                }
                current = Some(builder);
                continue;
            }
        } else if !trimmed.is_empty() {
            let Some(builder) = current.as_mut() else {
                return Err(parse_err(path, line_no, "alternative line with no active rule"));
            };
            let body_tokens = parse_token_body(trimmed, namespace, file_id, line_no, uri_table, handler, path)?;
            push_alternative(builder, body_tokens, path, line_no)?;
            continue;
        }
        if section.is_none() {
            return Err(parse_err(path, line_no, "content before %section% declared"));
        }
        return Err(parse_err(path, line_no, "malformed grammar line"));
    }
    finalize(&mut current, &mut grammar);
    Ok(grammar)
}

fn push_alternative(builder: &mut RuleBuilder, body_tokens: Vec<Token>, path: &Path, line_no: u32) -> Result<()> {
    match builder {
        RuleBuilder::Value(rule) => rule.push_alternative(body_tokens),
        RuleBuilder::Variance(rule) => rule.push_alternative(body_tokens),
        RuleBuilder::Variable(rule) => {
            let alt = split_variable_alternative(body_tokens, rule.meta.ident, path, line_no)?;
            rule.meta.observe(&alt.prefix);
            rule.meta.observe(&alt.suffix);
            rule.alternatives.push(alt);
        }
    }
    Ok(())
}

fn finalize(current: &mut Option<RuleBuilder>, grammar: &mut ParsedGrammar) {
    match current.take() {
        Some(RuleBuilder::Value(rule)) => grammar.values.push(rule),
        Some(RuleBuilder::Variable(rule)) => grammar.variables.push(rule),
        Some(RuleBuilder::Variance(rule)) => grammar.variances.push(rule),
        None => {}
    }
}

fn check_not_duplicate(
    grammar: &ParsedGrammar,
    section: Section,
    ident: Symbol,
    path: &Path,
    line_no: u32,
) -> Result<()> {
    let exists = match section {
        Section::Value => grammar.values.iter().any(|r| r.meta.ident == ident),
        Section::Variable => grammar.variables.iter().any(|r| r.meta.ident == ident),
        Section::Variance => grammar.variances.iter().any(|r| r.meta.ident == ident),
    };
    if exists {
        return Err(GrammarError::DuplicateDefinition {
            location: format!("{}:{}", path.display(), line_no),
            ident: ident.to_string(),
        });
    }
    Ok(())
}

/// Split a variable rule's alternative on its single self-referential
/// `ElementXRef` (SPEC_FULL.md §3, §9 open-question decision).
fn split_variable_alternative(
    tokens: Vec<Token>,
    own_ident: Symbol,
    path: &Path,
    line_no: u32,
) -> Result<VariableAlternative> {
    let split_at = tokens.iter().position(|t| matches!(t, Token::ElementXRef(q) if *q == own_ident));
    let Some(split_at) = split_at else {
        return Err(parse_err(
            path,
            line_no,
            &format!("variable rule `{own_ident}` alternative has no self-referential @{}@", own_ident.local()),
        ));
    };
    let mut rest = tokens;
    let suffix = rest.split_off(split_at + 1);
    rest.pop(); // drop the ElementXRef marker itself
    let second_self_ref = suffix.iter().any(|t| matches!(t, Token::ElementXRef(q) if *q == own_ident))
        || rest.iter().any(|t| matches!(t, Token::ElementXRef(q) if *q == own_ident));
    if second_self_ref {
        return Err(parse_err(
            path,
            line_no,
            &format!("variable rule `{own_ident}` alternative has more than one self-referential element reference"),
        ));
    }
    Ok(VariableAlternative { prefix: rest, suffix })
}

fn parse_err(path: &Path, line: u32, message: &str) -> GrammarError {
    GrammarError::Parse { location: format!("{}:{}", path.display(), line), message: message.to_string() }
}

fn parse_const_value(raw: &str) -> ConstValue {
    let raw = raw.trim();
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        return ConstValue::Str(raw[1..raw.len() - 1].to_string());
    }
    if let Ok(i) = raw.parse::<i64>() {
        return ConstValue::Int(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        return ConstValue::Float(f);
    }
    ConstValue::Str(raw.to_string())
}

/// Scan an alternative's body for meta-tokens left to right (SPEC_FULL.md §4.2).
#[allow(clippy::too_many_arguments)]
fn parse_token_body(
    body: &str,
    namespace: &str,
    file_id: FileId,
    line_no: u32,
    uri_table: &UriTable,
    handler: &Handler,
    path: &Path,
) -> Result<Vec<Token>> {
    let chars: Vec<char> = body.chars().collect();
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut i = 0usize;

    while i < chars.len() {
        let c = chars[i];
        if c == '+' {
            if let Some((ident, next)) = scan_delimited(&chars, i, '+') {
                flush_literal(&mut literal, &mut tokens);
                tokens.push(Token::ValueXRef(Symbol::from_reference(&ident, namespace)));
                i = next;
                continue;
            }
        } else if c == '!' {
            if let Some((ident, next)) = scan_delimited(&chars, i, '!') {
                flush_literal(&mut literal, &mut tokens);
                tokens.push(Token::VariableXRef(Symbol::from_reference(&ident, namespace)));
                i = next;
                continue;
            }
        } else if c == '@' {
            if let Some((ident, next)) = scan_delimited(&chars, i, '@') {
                flush_literal(&mut literal, &mut tokens);
                tokens.push(Token::ElementXRef(Symbol::from_reference(&ident, namespace)));
                i = next;
                continue;
            }
        } else if c == '%' {
            if let Some((kind, args, next)) = scan_meta(&chars, i) {
                flush_literal(&mut literal, &mut tokens);
                let tok = build_meta(&kind, &args, namespace, file_id, line_no, uri_table, handler, path)?;
                tokens.push(tok);
                i = next;
                continue;
            }
        }
        literal.push(c);
        i += 1;
    }
    flush_literal(&mut literal, &mut tokens);
    Ok(tokens)
}

fn flush_literal(literal: &mut String, tokens: &mut Vec<Token>) {
    if !literal.is_empty() {
        tokens.push(Token::Literal(literal.replace("\\n", "\n")));
        literal.clear();
    }
}

/// `+ident+`/`!ident!`/`@ident@`: scan from the opening delimiter to the next
/// matching delimiter, returning the identifier text and index just past it.
fn scan_delimited(chars: &[char], start: usize, delim: char) -> Option<(String, usize)> {
    let mut j = start + 1;
    while j < chars.len() {
        if chars[j] == delim {
            let ident: String = chars[start + 1..j].iter().collect();
            if ident.is_empty() || ident.contains(char::is_whitespace) {
                return None;
            }
            return Some((ident, j + 1));
        }
        j += 1;
    }
    None
}

const META_KINDS: [&str; 5] = ["uri", "repeat", "block", "range", "choice"];

/// `%kind%( ... )`: match the keyword, then scan a paren-balanced argument
/// list (nested metas, e.g. a `%uri%` inside a `%repeat%`, just add more
/// balanced parens).
fn scan_meta(chars: &[char], start: usize) -> Option<(String, String, usize)> {
    for kind in META_KINDS {
        let prefix: Vec<char> = format!("%{kind}%(").chars().collect();
        if start + prefix.len() > chars.len() {
            continue;
        }
        let candidate: String = chars[start..start + prefix.len()].iter().collect();
        if !candidate.eq_ignore_ascii_case(&format!("%{kind}%(")) {
            continue;
        }
        let args_start = start + prefix.len();
        let mut depth = 1i32;
        let mut j = args_start;
        while j < chars.len() {
            match chars[j] {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        let args: String = chars[args_start..j].iter().collect();
                        return Some((kind.to_string(), args, j + 1));
                    }
                }
                _ => {}
            }
            j += 1;
        }
        return None;
    }
    None
}

/// Split on top-level commas only: ignores commas nested inside parens or
/// double-quoted strings, needed for `%repeat%(inner, "a, b", nodups)`.
fn split_top_level(args: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut in_quotes = false;
    let mut current = String::new();
    for c in args.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            '(' if !in_quotes => {
                depth += 1;
                current.push(c);
            }
            ')' if !in_quotes => {
                depth -= 1;
                current.push(c);
            }
            ',' if depth == 0 && !in_quotes => {
                parts.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() || !parts.is_empty() {
        parts.push(current);
    }
    parts
}

#[allow(clippy::too_many_arguments)]
fn build_meta(
    kind: &str,
    args: &str,
    namespace: &str,
    file_id: FileId,
    line_no: u32,
    uri_table: &UriTable,
    handler: &Handler,
    path: &Path,
) -> Result<Token> {
    match kind {
        "choice" => {
            let items = split_top_level(args).into_iter().map(|s| s.trim().to_string()).collect();
            Ok(Token::Choice(items))
        }
        "range" => build_range(args, path, line_no),
        "uri" => Ok(Token::Uri(build_uri(args.trim(), uri_table, file_id, line_no, handler))),
        "block" => Ok(Token::Block(build_block(args.trim(), file_id, line_no, handler))),
        "repeat" => {
            let parts = split_top_level(args);
            let Some((inner_src, rest)) = parts.split_first() else {
                return Err(parse_err(path, line_no, "%repeat% requires an inner body"));
            };
            let inner = parse_token_body(inner_src, namespace, file_id, line_no, uri_table, handler, path)?;
            let mut separator = String::new();
            let mut nodups = false;
            for part in rest {
                let trimmed = part.trim();
                if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
                    separator = trimmed[1..trimmed.len() - 1].replace("\\n", "\n");
                } else if trimmed.eq_ignore_ascii_case("nodups") {
                    nodups = true;
                } else if !trimmed.is_empty() {
                    return Err(parse_err(path, line_no, &format!("unrecognized %repeat% argument `{trimmed}`")));
                }
            }
            Ok(Token::Repeat { inner, separator, nodups })
        }
        _ => unreachable!("scan_meta only returns known kinds"),
    }
}

fn build_range(args: &str, path: &Path, line_no: u32) -> Result<Token> {
    let trimmed = args.trim();
    let dash_idx = trimmed
        .char_indices()
        .skip(1)
        .find(|(_, c)| *c == '-')
        .map(|(i, _)| i)
        .ok_or_else(|| parse_err(path, line_no, "%range% requires an a-b pair"))?;
    let a = trimmed[..dash_idx].trim();
    let b = trimmed[dash_idx + 1..].trim();

    if a.chars().count() == 1 && b.chars().count() == 1 {
        return Ok(Token::Range(RangeSpec::Char(a.chars().next().unwrap(), b.chars().next().unwrap())));
    }
    if a.contains('.') || b.contains('.') {
        let (fa, fb) = (a.parse::<f64>(), b.parse::<f64>());
        return match (fa, fb) {
            (Ok(fa), Ok(fb)) => Ok(Token::Range(RangeSpec::Float(fa, fb))),
            _ => Err(parse_err(path, line_no, "mismatched endpoint types in %range%")),
        };
    }
    let is_hex = a.to_ascii_lowercase().contains("0x") && b.to_ascii_lowercase().contains("0x");
    let parse_one = |s: &str| -> Option<i64> {
        if is_hex {
            i64::from_str_radix(s.trim_start_matches("0x").trim_start_matches("0X"), 16).ok()
        } else {
            s.parse::<i64>().ok()
        }
    };
    match (parse_one(a), parse_one(b)) {
        (Some(ia), Some(ib)) => Ok(Token::Range(RangeSpec::Int(ia, ib, if is_hex { 16 } else { 0 }))),
        _ => Err(parse_err(path, line_no, "mismatched endpoint types in %range%")),
    }
}

fn build_uri(raw: &str, uri_table: &UriTable, file_id: FileId, line_no: u32, handler: &Handler) -> UriSnapshot {
    let resolved = uri_table.resolve(raw);
    if resolved.is_dir() {
        let mut entries: Vec<String> = std::fs::read_dir(&resolved)
            .into_iter()
            .flatten()
            .filter_map(|e| e.ok())
            .map(|e| e.path().to_string_lossy().into_owned())
            .collect();
        entries.sort();
        if entries.is_empty() {
            handler.warn(format!("%uri% directory `{}` is empty", resolved.display()), Span::new(file_id, line_no));
            entries.push(raw.to_string());
        }
        UriSnapshot { entries }
    } else if resolved.is_file() {
        UriSnapshot { entries: vec![resolved.to_string_lossy().into_owned()] }
    } else {
        handler.warn(format!("%uri% path `{}` does not exist", resolved.display()), Span::new(file_id, line_no));
        UriSnapshot { entries: vec![raw.to_string()] }
    }
}

fn build_block(raw: &str, file_id: FileId, line_no: u32, handler: &Handler) -> String {
    match std::fs::read_to_string(raw) {
        Ok(contents) => contents,
        Err(_) => {
            handler.warn(format!("%block% path `{raw}` does not exist"), Span::new(file_id, line_no));
            raw.to_string()
        }
    }
}

/// Convenience for callers that already have a [`SourceMap`] and want to
/// load+register a file's contents before parsing it.
pub fn load_and_register(sources: &SourceMap, path: &Path) -> Result<(FileId, String)> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| GrammarError::Io { path: path.display().to_string(), message: e.to_string() })?;
    let file_id = sources.load_file(path, contents.clone());
    Ok((file_id, contents))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dharma_util::SourceMap;

    fn parse(namespace: &str, src: &str) -> Result<ParsedGrammar> {
        let sources = SourceMap::new();
        let file_id = sources.load_file(Path::new("test.dg"), src.to_string());
        let handler = Handler::new();
        let uri_table = UriTable::new();
        parse_file(namespace, Path::new("test.dg"), src, file_id, &uri_table, &handler)
    }

    #[test]
    fn literal_only_value_rule() {
        let grammar = parse("t", "%section% := variance\nv := hello\n").unwrap();
        assert_eq!(grammar.variances.len(), 1);
        let alt = &grammar.variances[0].alternatives[0];
        assert!(matches!(&alt[0], Token::Literal(s) if s == "hello"));
    }

    #[test]
    fn choice_token_parses_items() {
        let grammar = parse("t", "%section% := value\nv := %choice%(a, b, c)\n").unwrap();
        let alt = &grammar.values[0].alternatives[0];
        match &alt[0] {
            Token::Choice(items) => assert_eq!(items, &vec!["a".to_string(), "b".to_string(), "c".to_string()]),
            other => panic!("expected Choice, got {other:?}"),
        }
    }

    #[test]
    fn value_xref_is_qualified_to_namespace() {
        let grammar = parse("t", "%section% := value\nv := +other+\n").unwrap();
        let alt = &grammar.values[0].alternatives[0];
        match &alt[0] {
            Token::ValueXRef(sym) => assert_eq!(sym.as_str(), "t:other"),
            other => panic!("expected ValueXRef, got {other:?}"),
        }
    }

    #[test]
    fn cross_namespace_reference_is_kept_explicit() {
        let grammar = parse("t", "%section% := value\nv := +other:thing+\n").unwrap();
        let alt = &grammar.values[0].alternatives[0];
        match &alt[0] {
            Token::ValueXRef(sym) => assert_eq!(sym.as_str(), "other:thing"),
            other => panic!("expected ValueXRef, got {other:?}"),
        }
    }

    #[test]
    fn repeat_with_separator_and_nodups() {
        let grammar = parse("t", "%section% := value\nv := %repeat%(x, \", \", nodups)\n").unwrap();
        let alt = &grammar.values[0].alternatives[0];
        match &alt[0] {
            Token::Repeat { inner, separator, nodups } => {
                assert!(matches!(&inner[0], Token::Literal(s) if s == "x"));
                assert_eq!(separator, ", ");
                assert!(*nodups);
            }
            other => panic!("expected Repeat, got {other:?}"),
        }
    }

    #[test]
    fn nested_repeat_parses_recursively() {
        let grammar = parse("t", "%section% := value\nv := %repeat%(%repeat%(x))\n").unwrap();
        let alt = &grammar.values[0].alternatives[0];
        match &alt[0] {
            Token::Repeat { inner, .. } => assert!(matches!(&inner[0], Token::Repeat { .. })),
            other => panic!("expected Repeat, got {other:?}"),
        }
    }

    #[test]
    fn char_range_detected() {
        let grammar = parse("t", "%section% := value\nv := %range%(a-c)\n").unwrap();
        let alt = &grammar.values[0].alternatives[0];
        assert!(matches!(&alt[0], Token::Range(RangeSpec::Char('a', 'c'))));
    }

    #[test]
    fn integer_range_detected() {
        let grammar = parse("t", "%section% := value\nv := %range%(0-9)\n").unwrap();
        let alt = &grammar.values[0].alternatives[0];
        assert!(matches!(&alt[0], Token::Range(RangeSpec::Int(0, 9, 0))));
    }

    #[test]
    fn hex_integer_range_detected() {
        let grammar = parse("t", "%section% := value\nv := %range%(0x0-0xff)\n").unwrap();
        let alt = &grammar.values[0].alternatives[0];
        assert!(matches!(&alt[0], Token::Range(RangeSpec::Int(0, 255, 16))));
    }

    #[test]
    fn float_range_detected() {
        let grammar = parse("t", "%section% := value\nv := %range%(0.0-1.5)\n").unwrap();
        let alt = &grammar.values[0].alternatives[0];
        assert!(matches!(&alt[0], Token::Range(RangeSpec::Float(a, b)) if *a == 0.0 && *b == 1.5));
    }

    #[test]
    fn const_directive_detects_types() {
        let grammar = parse(
            "t",
            "%const% NAME := \"str\"\n%const% COUNT := 3\n%const% RATIO := 1.5\n%section% := variance\nv := x\n",
        )
        .unwrap();
        assert_eq!(grammar.consts[0].1, ConstValue::Str("str".into()));
        assert_eq!(grammar.consts[1].1, ConstValue::Int(3));
        assert_eq!(grammar.consts[2].1, ConstValue::Float(1.5));
    }

    #[test]
    fn duplicate_rule_in_same_section_is_fatal() {
        let result = parse("t", "%section% := value\nv := a\n\nv := b\n");
        assert!(result.is_err());
    }

    #[test]
    fn content_before_section_is_fatal() {
        let result = parse("t", "v := a\n");
        assert!(result.is_err());
    }

    #[test]
    fn variable_rule_splits_on_element_xref() {
        let grammar = parse("t", "%section% := variable\nx := let @x@ = new Object\n").unwrap();
        let alt = &grammar.variables[0].alternatives[0];
        assert!(matches!(&alt.prefix[0], Token::Literal(s) if s == "let "));
        assert!(matches!(&alt.suffix[0], Token::Literal(s) if s == " = new Object"));
    }

    #[test]
    fn variable_rule_missing_element_xref_is_fatal() {
        let result = parse("t", "%section% := variable\nx := let y = new Object\n");
        assert!(result.is_err());
    }

    #[test]
    fn missing_uri_path_warns_and_falls_back_to_literal() {
        let sources = SourceMap::new();
        let src = "%section% := value\nv := %uri%(no/such/dir)\n";
        let file_id = sources.load_file(Path::new("test.dg"), src.to_string());
        let handler = Handler::new();
        let uri_table = UriTable::new();
        let grammar =
            parse_file("t", Path::new("test.dg"), src, file_id, &uri_table, &handler).unwrap();
        assert_eq!(handler.drain().len(), 1);
        match &grammar.values[0].alternatives[0][0] {
            Token::Uri(snap) => assert_eq!(snap.entries, vec!["no/such/dir".to_string()]),
            other => panic!("expected Uri, got {other:?}"),
        }
    }
}

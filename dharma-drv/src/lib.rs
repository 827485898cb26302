//! Pipeline-orchestrating driver (SPEC_FULL.md §3 "Lifecycle").
//!
//! A [`DharmaSession`] owns every piece of mutable state a run needs: the
//! resolved rule graph, the tuned [`Config`], and the PRNG stream. The PRNG
//! is a plain owned field rather than something threaded through the
//! generator's constructor, so its stream carries across every
//! `generate_testcase` call in the session (determinism requires the stream,
//! not just the seed, SPEC_FULL.md §8).

use dharma_gen::{Config, Generator};
use dharma_grammar::parser::parse_file;
use dharma_grammar::{ConstValue, ParsedGrammar};
use dharma_resolve::{analyze_leaf_paths, resolve_crossrefs, RuleArena};
use dharma_util::error::{GrammarError, Result};
use dharma_util::{Handler, SourceMap, UriTable};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Loaded into the `common` namespace before any user-supplied grammar
/// (SPEC_FULL.md §6 "Default grammars").
const BUNDLED_GRAMMAR: &str = include_str!("../grammars/common.dg");
const BUNDLED_NAMESPACE: &str = "common";
const BUNDLED_PATH: &str = "<bundled common.dg>";

/// Everything a [`DharmaSession`] needs to start a run.
pub struct SessionConfig {
    pub grammar_paths: Vec<PathBuf>,
    pub seed: u64,
    pub prefix: String,
    pub suffix: String,
    pub template: Option<String>,
    pub uri_table: UriTable,
    /// Constants from a settings file, applied before any grammar is parsed
    /// (SPEC_FULL.md §5 "Settings file").
    pub settings: HashMap<String, ConstValue>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            grammar_paths: Vec::new(),
            seed: 0,
            prefix: String::new(),
            suffix: String::new(),
            template: None,
            uri_table: Config::default().uri_table,
            settings: HashMap::new(),
        }
    }
}

/// Orchestrates the full pipeline: parse every grammar, resolve
/// cross-references, run leaf-path analysis, then generate test cases from
/// the resulting arena.
pub struct DharmaSession {
    arena: RuleArena,
    gen_config: Config,
    rng: StdRng,
    prefix: String,
    suffix: String,
    template: Option<String>,
    pub sources: SourceMap,
    pub handler: Handler,
}

impl DharmaSession {
    /// Parse the bundled grammar, then every user-supplied file in order
    /// (namespace derived from each file's stem), folding every `%const%`
    /// into one [`Config`] along the way, then resolve and leaf-analyze the
    /// combined rule graph.
    pub fn build(config: SessionConfig) -> Result<Self> {
        let sources = SourceMap::new();
        let handler = Handler::new();
        let mut gen_config = Config { uri_table: config.uri_table, ..Config::default() };
        let mut arena = RuleArena::new();
        let mut seen_consts: HashMap<String, ConstValue> = HashMap::new();

        for (name, value) in &config.settings {
            gen_config.apply_const(name, value)?;
            seen_consts.insert(name.clone(), value.clone());
        }

        let bundled_id = sources.load_file(Path::new(BUNDLED_PATH), BUNDLED_GRAMMAR.to_string());
        let bundled = parse_file(
            BUNDLED_NAMESPACE,
            Path::new(BUNDLED_PATH),
            BUNDLED_GRAMMAR,
            bundled_id,
            &gen_config.uri_table,
            &handler,
        )?;
        apply_consts(&bundled, &mut gen_config, &mut seen_consts, &handler)?;
        arena.merge(bundled)?;
        tracing::info!(namespace = BUNDLED_NAMESPACE, "loaded bundled grammar");

        for path in &config.grammar_paths {
            let namespace = namespace_of(path);
            let contents = fs::read_to_string(path)
                .map_err(|e| GrammarError::Io { path: path.display().to_string(), message: e.to_string() })?;
            let file_id = sources.load_file(path, contents.clone());
            let grammar = parse_file(&namespace, path, &contents, file_id, &gen_config.uri_table, &handler)?;
            apply_consts(&grammar, &mut gen_config, &mut seen_consts, &handler)?;
            arena.merge(grammar)?;
            tracing::info!(namespace, path = %path.display(), "loaded grammar");
        }

        resolve_crossrefs(&mut arena)?;
        analyze_leaf_paths(&mut arena);
        tracing::info!(
            values = arena.values.len(),
            variables = arena.variables.len(),
            variances = arena.variances.len(),
            "rule graph resolved"
        );

        Ok(DharmaSession {
            arena,
            gen_config,
            rng: StdRng::seed_from_u64(config.seed),
            prefix: config.prefix,
            suffix: config.suffix,
            template: config.template,
            sources,
            handler,
        })
    }

    /// Produce one test case, advancing the session's PRNG stream.
    pub fn generate_testcase(&mut self) -> Result<String> {
        let arena = &self.arena;
        let gen_config = &self.gen_config;
        let rng = &mut self.rng;
        let mut generator = Generator::new(arena, gen_config, rng);
        generator.generate_testcase(&self.prefix, &self.suffix, self.template.as_deref())
    }

    /// Write `n` test cases to `dir` as `1.<ext>` .. `n.<ext>`
    /// (SPEC_FULL.md §5 "Batch mode").
    pub fn generate_testcases(&mut self, dir: &Path, ext: &str, n: usize) -> Result<()> {
        fs::create_dir_all(dir)
            .map_err(|e| GrammarError::Io { path: dir.display().to_string(), message: e.to_string() })?;
        for i in 1..=n {
            let content = self.generate_testcase()?;
            let path = dir.join(format!("{i}.{ext}"));
            fs::write(&path, content)
                .map_err(|e| GrammarError::Io { path: path.display().to_string(), message: e.to_string() })?;
            tracing::debug!(file = %path.display(), "wrote test case");
        }
        tracing::info!(count = n, dir = %dir.display(), "batch generation complete");
        Ok(())
    }
}

fn namespace_of(path: &Path) -> String {
    path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_else(|| "grammar".to_string())
}

/// Apply every `%const%` found in `grammar` to `gen_config`, warning (not
/// failing) when the same name is redefined with a different value
/// (SPEC_FULL.md §7 tier-2 warning); an unrecognized name or wrong-kind value
/// is still fatal via [`Config::apply_const`].
fn apply_consts(
    grammar: &ParsedGrammar,
    gen_config: &mut Config,
    seen: &mut HashMap<String, ConstValue>,
    handler: &Handler,
) -> Result<()> {
    for (name, value, span) in &grammar.consts {
        if let Some(prior) = seen.get(name) {
            if prior != value {
                handler.warn(format!("constant `{name}` redefined with a different value"), *span);
            }
        }
        seen.insert(name.clone(), value.clone());
        gen_config.apply_const(name, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_grammar(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn bundled_grammar_loads_and_produces_output() {
        let config = SessionConfig { seed: 1, ..SessionConfig::default() };
        let mut session = DharmaSession::build(config).unwrap();
        let out = session.generate_testcase().unwrap();
        assert!(!out.is_empty());
    }

    #[test]
    fn user_grammar_is_merged_alongside_bundled_namespace() {
        let dir = tempdir().unwrap();
        let path = write_grammar(dir.path(), "demo.dg", "%section% := variance\nv := hello world\n");
        let config = SessionConfig { grammar_paths: vec![path], seed: 7, ..SessionConfig::default() };
        let mut session = DharmaSession::build(config).unwrap();
        // Two variance rules now exist (common:statement, demo:v); over
        // enough draws both namespaces should show up at least once.
        let mut saw_hello = false;
        for _ in 0..50 {
            if session.generate_testcase().unwrap().contains("hello world") {
                saw_hello = true;
                break;
            }
        }
        assert!(saw_hello);
    }

    #[test]
    fn same_seed_produces_identical_batches() {
        let dir = tempdir().unwrap();
        let path = write_grammar(dir.path(), "demo.dg", "%section% := variance\nv := %choice%(a, b, c)\n");
        let config_a = SessionConfig { grammar_paths: vec![path.clone()], seed: 42, ..SessionConfig::default() };
        let config_b = SessionConfig { grammar_paths: vec![path], seed: 42, ..SessionConfig::default() };
        let mut a = DharmaSession::build(config_a).unwrap();
        let mut b = DharmaSession::build(config_b).unwrap();
        for _ in 0..10 {
            assert_eq!(a.generate_testcase().unwrap(), b.generate_testcase().unwrap());
        }
    }

    #[test]
    fn conflicting_const_redefinition_warns_but_does_not_fail() {
        let dir = tempdir().unwrap();
        let path_a = write_grammar(dir.path(), "a.dg", "%const% LEAF_TRIGGER := 5\n%section% := variance\nv := x\n");
        let path_b = write_grammar(dir.path(), "b.dg", "%const% LEAF_TRIGGER := 9\n%section% := variance\nw := y\n");
        let config = SessionConfig { grammar_paths: vec![path_a, path_b], seed: 0, ..SessionConfig::default() };
        let session = DharmaSession::build(config).unwrap();
        let warnings = session.handler.render_all(&session.sources);
        assert!(warnings.iter().any(|w| w.contains("LEAF_TRIGGER")));
    }

    #[test]
    fn settings_constants_apply_before_grammars_are_parsed() {
        let mut settings = HashMap::new();
        settings.insert("LEAF_TRIGGER".to_string(), ConstValue::Int(0));
        let config = SessionConfig { seed: 0, settings, ..SessionConfig::default() };
        // LEAF_TRIGGER=0 forces leaf mode from the first value-rule expansion,
        // so the bundled `common:identifier` rule, which normally recurses,
        // always takes its direct leaf alternative immediately.
        let mut session = DharmaSession::build(config).unwrap();
        assert!(session.generate_testcase().is_ok());
    }

    #[test]
    fn unknown_const_name_is_fatal() {
        let dir = tempdir().unwrap();
        let path = write_grammar(dir.path(), "a.dg", "%const% NOT_REAL := 1\n%section% := variance\nv := x\n");
        let config = SessionConfig { grammar_paths: vec![path], seed: 0, ..SessionConfig::default() };
        assert!(DharmaSession::build(config).is_err());
    }

    #[test]
    fn generate_testcases_writes_numbered_files() {
        let dir = tempdir().unwrap();
        let out_dir = dir.path().join("out");
        let config = SessionConfig { seed: 3, ..SessionConfig::default() };
        let mut session = DharmaSession::build(config).unwrap();
        session.generate_testcases(&out_dir, "txt", 3).unwrap();
        for i in 1..=3 {
            assert!(out_dir.join(format!("{i}.txt")).exists());
        }
    }
}

//! hksl-driver - Compiler Driver
//!
//! The entry point that strings the four core phases together: lexing,
//! parsing, name resolution, type checking. There's exactly one knob
//! ([`Config::input_file`], plus a `verbose` toggle) — no optimization
//! level, no emit kind, no target triple, no incremental cache. Those
//! concern codegen stages this front-end doesn't have.
//!
//! Two entry points cover the two ways this crate is used:
//! - [`main`] is the CLI binary's `fn main` body: reads a file, compiles
//!   it, prints diagnostics, and calls [`hksl_sem::CompilationContext::abort_if_failure`]
//!   between resolution and type checking the way §7's propagation policy
//!   requires.
//! - [`compile_source`] is the embedding API (§6.4): given source text
//!   already in memory, it never touches the filesystem or the process
//!   exit code, returning a [`CompilationResult`] instead.

use std::path::PathBuf;

use hksl_lex::Lexer;
use hksl_par::Parser;
use hksl_sem::CompilationContext;

/// Compiler configuration. `faxc-drv`'s `Config` carries a target triple,
/// an optimization level, an emit kind, and a linker search path; this
/// front-end produces an annotated AST or a diagnostic list and nothing
/// else, so all of that drops away.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub input_file: PathBuf,
    pub verbose: bool,
}

impl Config {
    pub fn new(input_file: impl Into<PathBuf>) -> Self {
        Self { input_file: input_file.into(), verbose: false }
    }
}

/// One compiler invocation's state: the configuration plus the
/// [`CompilationContext`] built up across the phases.
pub struct Session {
    pub config: Config,
    pub context: CompilationContext,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self { config, context: CompilationContext::new() }
    }

    /// Reads `config.input_file`, compiles it, and prints diagnostics to
    /// standard output. Returns an error for I/O failures and for a
    /// compilation that produced any diagnostics — the latter carries no
    /// message of its own since the diagnostics were already printed.
    pub fn compile(&mut self) -> anyhow::Result<()> {
        if self.config.verbose {
            eprintln!("reading: {}", self.config.input_file.display());
        }
        let source = std::fs::read_to_string(&self.config.input_file)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", self.config.input_file.display()))?;

        let Some(ast) = self.parse(&source) else {
            self.print_errors();
            anyhow::bail!("compilation failed");
        };

        self.context.set_ast(ast);
        if self.config.verbose {
            eprintln!("resolving names");
        }
        self.context.resolve();
        self.context.abort_if_failure();

        if self.config.verbose {
            eprintln!("type checking");
        }
        self.context.typecheck();

        if !self.context.is_success() {
            self.print_errors();
            anyhow::bail!("compilation failed");
        }
        Ok(())
    }

    fn parse(&self, source: &str) -> Option<hksl_par::Ast> {
        let tokens = Lexer::collect_tokens(source, self.context.handler());
        if self.context.handler().has_errors() {
            return None;
        }
        Parser::new(tokens, self.context.handler()).parse()
    }

    fn print_errors(&self) {
        for line in self.context.errors() {
            println!("{line}");
        }
    }
}

/// The result of compiling in-memory source text through the embedding
/// API (§6.4): an empty `errors` list means success.
#[derive(Debug, Default, Clone)]
pub struct CompilationResult {
    pub errors: Vec<String>,
}

impl CompilationResult {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Compiles `source` in memory, never touching the filesystem or exiting
/// the process — the host decides what to do with the result.
/// `filename` is accepted for a future multi-file diagnostic prefix but is
/// not yet part of any diagnostic's text (see the Open Question tracked in
/// DESIGN.md).
pub fn compile_source(_filename: &str, source: &str) -> CompilationResult {
    let mut ctx = CompilationContext::new();

    let tokens = Lexer::collect_tokens(source, ctx.handler());
    if ctx.handler().has_errors() {
        return CompilationResult { errors: ctx.errors() };
    }
    let Some(ast) = Parser::new(tokens, ctx.handler()).parse() else {
        return CompilationResult { errors: ctx.errors() };
    };

    ctx.set_ast(ast);
    ctx.resolve();
    if ctx.is_failing() {
        return CompilationResult { errors: ctx.errors() };
    }

    ctx.typecheck();
    CompilationResult { errors: ctx.errors() }
}

/// The CLI binary's entry point: `hkslc <source-file>`.
pub fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let input_file = args
        .next()
        .ok_or_else(|| anyhow::anyhow!("usage: hkslc <source-file>"))?;

    let mut session = Session::new(Config::new(input_file));
    session.compile()
}

// src/emit/mod.rs

//! Rendering of compiled families into host-language source. The emitter
//! drives a small host-syntax trait in a fixed order: header, runtime types,
//! per-rule tables, family tables, driver, dispatch, user code. One syntax
//! ships ([`rust::RustSyntax`]); anything with integer-indexed tables and
//! per-state closures could implement another.

pub mod runtime;
pub mod rust;

use std::io::{self, Write};

use crate::automata::Automaton;
use crate::scanner::CompiledFamily;
use crate::spec::SpecFile;

pub trait HostSyntax {
    /// Conventional source-file extension of the host language.
    fn extension(&self) -> &'static str;

    fn header(&self, out: &mut dyn Write) -> io::Result<()>;

    /// Types shared by every emitted scanner.
    fn runtime_types(&self, out: &mut dyn Write) -> io::Result<()>;

    /// Accept bitmap and transition table of one rule's DFA.
    fn rule_tables(
        &self,
        out: &mut dyn Write,
        family: usize,
        rule: usize,
        dfa: &Automaton,
    ) -> io::Result<()>;

    /// Per-family DFA arrays plus the top-level family table.
    fn family_tables(&self, out: &mut dyn Write, rule_counts: &[usize]) -> io::Result<()>;

    /// The scanner driver, constant text.
    fn runtime_driver(&self, out: &mut dyn Write) -> io::Result<()>;

    /// Family dispatch with the user actions embedded. `tokens` selects the
    /// token-returning form with a `lex()` entry point; the standalone form
    /// returns nothing and gets neither entry point nor error hook.
    fn dispatch(
        &self,
        out: &mut dyn Write,
        spec: &SpecFile,
        tokens: bool,
        error_hook: bool,
    ) -> io::Result<()>;

    /// The driver expression substituted for NN_FUN in standalone output.
    fn standalone_fun(&self) -> String;
}

pub struct Emitter<S: HostSyntax> {
    syntax: S,
}

impl<S: HostSyntax> Emitter<S> {
    pub fn new(syntax: S) -> Emitter<S> {
        Emitter { syntax }
    }

    pub fn extension(&self) -> &'static str {
        self.syntax.extension()
    }

    pub fn emit(
        &self,
        out: &mut dyn Write,
        spec: &SpecFile,
        compiled: &[CompiledFamily],
        standalone: bool,
        error_hook: bool,
    ) -> io::Result<()> {
        self.syntax.header(out)?;
        self.syntax.runtime_types(out)?;
        for (f, fam) in compiled.iter().enumerate() {
            for (r, dfa) in fam.dfas.iter().enumerate() {
                self.syntax.rule_tables(out, f, r, dfa)?;
            }
        }
        let counts: Vec<usize> = compiled.iter().map(|f| f.dfas.len()).collect();
        self.syntax.family_tables(out, &counts)?;
        self.syntax.runtime_driver(out)?;
        if standalone {
            self.syntax.dispatch(out, spec, false, false)?;
            let code = spec.user_code.replace("NN_FUN", &self.syntax.standalone_fun());
            out.write_all(code.as_bytes())?;
        } else {
            self.syntax.dispatch(out, spec, true, error_hook)?;
            out.write_all(spec.user_code.as_bytes())?;
        }
        writeln!(out)
    }
}

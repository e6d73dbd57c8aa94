// src/generate.rs

//! Orchestration of one generator run: parse the spec, compile every rule
//! through the NFA and DFA stages, feed the optional diagnostic sinks, and
//! drive the emitter.

use std::io::{Read, Write};

use crate::automata::{dfa, dot, regex};
use crate::emit::rust::RustSyntax;
use crate::emit::Emitter;
use crate::error::Result;
use crate::scanner::CompiledFamily;
use crate::spec::SpecFile;

pub struct Options {
    pub standalone: bool,
    /// Emit the default error hook; off under -e.
    pub error_hook: bool,
    pub nfa_dot: Option<Box<dyn Write>>,
    pub dfa_dot: Option<Box<dyn Write>>,
    pub tables: Option<Box<dyn Write>>,
}

impl Options {
    pub fn new() -> Options {
        Options {
            standalone: false,
            error_hook: true,
            nfa_dot: None,
            dfa_dot: None,
            tables: None,
        }
    }
}

impl Default for Options {
    fn default() -> Options {
        Options::new()
    }
}

/// Compile every rule of every family. Close rules (index -1) carry no
/// regex and produce no DFA.
pub fn compile_spec(spec: &SpecFile, opts: &mut Options) -> Result<Vec<CompiledFamily>> {
    let mut compiled = Vec::with_capacity(spec.families.len());
    for (f, family) in spec.families.iter().enumerate() {
        let mut fam = CompiledFamily::default();
        for rule in &family.rules {
            if rule.index < 0 {
                continue;
            }
            let pattern: String = rule.regex.iter().collect();
            let (nfa, alphabet) = regex::parse(&pattern)?;
            if let Some(sink) = opts.nfa_dot.as_mut() {
                dot::write_dot(sink.as_mut(), &nfa, &format!("NFA_{f}_{}", rule.index))?;
            }
            let dfa = dfa::subset_construct(&nfa, &alphabet);
            log::debug!(
                "family {f} rule {}: /{pattern}/ has {} NFA states, {} DFA states",
                rule.index,
                nfa.len(),
                dfa.len()
            );
            if let Some(sink) = opts.dfa_dot.as_mut() {
                dot::write_dot(sink.as_mut(), &dfa, &format!("DFA_{f}_{}", rule.index))?;
            }
            fam.dfas.push(dfa);
        }
        compiled.push(fam);
    }
    Ok(compiled)
}

/// Parse a spec, compile it, and write the generated scanner to `out`.
pub fn generate(input: impl Read, out: &mut dyn Write, opts: &mut Options) -> Result<()> {
    let spec = SpecFile::parse(input)?;
    let compiled = compile_spec(&spec, opts)?;
    if let Some(sink) = opts.tables.as_mut() {
        crate::tables::TablesDump::build(&compiled).save_json(sink.as_mut())?;
    }
    let emitter = Emitter::new(RustSyntax);
    emitter.emit(out, &spec, &compiled, opts.standalone, opts.error_hook)?;
    Ok(())
}

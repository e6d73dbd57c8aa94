// src/emit/rust.rs

use std::io::{self, Write};

use crate::automata::{Automaton, EdgeKind};
use crate::emit::{runtime, HostSyntax};
use crate::spec::SpecFile;

/// The shipped host syntax: self-contained Rust. Per-state transition
/// functions are non-capturing closures coerced to `fn(char) -> i32` inside
/// static arrays; user actions become match arms of per-family methods.
pub struct RustSyntax;

fn char_lit(c: char) -> String {
    match c {
        '\'' => "'\\''".to_string(),
        '\\' => "'\\\\'".to_string(),
        c if (' '..='~').contains(&c) => format!("'{c}'"),
        c => format!("'\\u{{{:x}}}'", c as u32),
    }
}

impl HostSyntax for RustSyntax {
    fn extension(&self) -> &'static str {
        "rs"
    }

    fn header(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "// Code generated by relex. DO NOT EDIT.")?;
        writeln!(out, "#![allow(dead_code, unused_variables)]")
    }

    fn runtime_types(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(runtime::RUNTIME_TYPES.as_bytes())
    }

    fn rule_tables(
        &self,
        out: &mut dyn Write,
        family: usize,
        rule: usize,
        dfa: &Automaton,
    ) -> io::Result<()> {
        let n = dfa.len();
        let acc: Vec<&str> = dfa
            .nodes
            .iter()
            .map(|s| if s.accept { "true" } else { "false" })
            .collect();
        writeln!(
            out,
            "static ACC_{family}_{rule}: [bool; {n}] = [{}];",
            acc.join(", ")
        )?;
        writeln!(out, "static FUN_{family}_{rule}: [fn(char) -> i32; {n}] = [")?;
        for state in &dfa.nodes {
            let mut singles: Vec<(char, i32)> = Vec::new();
            let mut ranges: Vec<(char, char, i32)> = Vec::new();
            let mut wild = -1;
            for e in &state.edges {
                match &e.kind {
                    EdgeKind::Rune(r) => singles.push((*r, e.dst)),
                    EdgeKind::Class { limits, .. } => ranges.push((limits[0], limits[1], e.dst)),
                    EdgeKind::Wild => wild = e.dst,
                    EdgeKind::Nil => {}
                }
            }
            writeln!(out, "    |r| {{")?;
            if !singles.is_empty() {
                writeln!(out, "        match r {{")?;
                for (c, dst) in &singles {
                    writeln!(out, "            {} => return {dst},", char_lit(*c))?;
                }
                writeln!(out, "            _ => {{}}")?;
                writeln!(out, "        }}")?;
            }
            for (lo, hi, dst) in &ranges {
                writeln!(
                    out,
                    "        if {} <= r && r <= {} {{ return {dst}; }}",
                    char_lit(*lo),
                    char_lit(*hi)
                )?;
            }
            writeln!(out, "        {wild}")?;
            writeln!(out, "    }},")?;
        }
        writeln!(out, "];")
    }

    fn family_tables(&self, out: &mut dyn Write, rule_counts: &[usize]) -> io::Result<()> {
        for (f, &count) in rule_counts.iter().enumerate() {
            writeln!(out, "static FAM_{f}: [Dfa; {count}] = [")?;
            for r in 0..count {
                writeln!(out, "    Dfa {{ acc: &ACC_{f}_{r}, f: &FUN_{f}_{r} }},")?;
            }
            writeln!(out, "];")?;
        }
        writeln!(
            out,
            "static FAMILIES: [Family; {}] = [",
            rule_counts.len()
        )?;
        for f in 0..rule_counts.len() {
            writeln!(out, "    Family {{ a: &FAM_{f} }},")?;
        }
        writeln!(out, "];")
    }

    fn runtime_driver(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(runtime::RUNTIME_DRIVER.as_bytes())
    }

    fn dispatch(
        &self,
        out: &mut dyn Write,
        spec: &SpecFile,
        tokens: bool,
        error_hook: bool,
    ) -> io::Result<()> {
        let ret = if tokens { " -> i32" } else { "" };
        writeln!(out, "impl Lexer {{")?;
        for (f, family) in spec.families.iter().enumerate() {
            writeln!(out, "    fn family_{f}(&mut self){ret} {{")?;
            writeln!(out, "        loop {{")?;
            writeln!(out, "            match self.next_action() {{")?;
            for rule in &family.rules {
                if rule.index < 0 {
                    continue;
                }
                let pattern: String = rule.regex.iter().collect();
                writeln!(out, "                {} => {{ // /{pattern}/", rule.index)?;
                writeln!(out, "                    {}", rule.action)?;
                if let Some(k) = rule.nested_family {
                    writeln!(
                        out,
                        "                    let mut nested = Lexer::from_str(self.text(), {k});"
                    )?;
                    writeln!(out, "                    nested.family_{k}();")?;
                }
                writeln!(out, "                }}")?;
            }
            writeln!(out, "                _ => {{")?;
            if let Some(close) = family.rules.iter().find(|r| r.index < 0) {
                if !close.action.is_empty() {
                    writeln!(out, "                    {}", close.action)?;
                }
            }
            if tokens {
                writeln!(out, "                    return -1;")?;
            } else {
                writeln!(out, "                    return;")?;
            }
            writeln!(out, "                }}")?;
            writeln!(out, "            }}")?;
            writeln!(out, "        }}")?;
            writeln!(out, "    }}")?;
        }
        if tokens {
            writeln!(out, "    pub fn lex(&mut self) -> i32 {{")?;
            writeln!(out, "        self.family_0()")?;
            writeln!(out, "    }}")?;
            if error_hook {
                writeln!(out, "    pub fn error(&mut self, msg: &str) {{")?;
                writeln!(out, "        panic!(\"{{}}\", msg);")?;
                writeln!(out, "    }}")?;
            }
        }
        writeln!(out, "}}")
    }

    fn standalone_fun(&self) -> String {
        "(|yylex: &mut Lexer| { yylex.family_0(); })".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_literals_escape_cleanly() {
        assert_eq!(char_lit('a'), "'a'");
        assert_eq!(char_lit('\''), "'\\''");
        assert_eq!(char_lit('\\'), "'\\\\'");
        assert_eq!(char_lit('\n'), "'\\u{a}'");
        assert_eq!(char_lit('α'), "'\\u{3b1}'");
    }
}

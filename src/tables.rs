// src/tables.rs

//! Serializable dump of the compiled tables: a JSON sibling of the DOT
//! diagnostics, one record per rule DFA with its accept bitmap and the
//! transitions in the order the runtime checks them.

use std::io::{self, BufWriter, Write};

use serde::Serialize;

use crate::automata::EdgeKind;
use crate::scanner::CompiledFamily;

#[derive(Serialize)]
pub struct TablesDump {
    pub families: Vec<FamilyDump>,
}

#[derive(Serialize)]
pub struct FamilyDump {
    pub rules: Vec<RuleDump>,
}

#[derive(Serialize)]
pub struct RuleDump {
    pub states: usize,
    pub acc: Vec<bool>,
    /// Per state: (rune, next) pairs, checked first.
    pub singles: Vec<Vec<(char, i32)>>,
    /// Per state: (lo, hi, next) triples, checked after singles.
    pub ranges: Vec<Vec<(char, char, i32)>>,
    /// Per state: the catch-all destination.
    pub wild: Vec<i32>,
}

impl TablesDump {
    pub fn build(compiled: &[CompiledFamily]) -> TablesDump {
        let families = compiled
            .iter()
            .map(|fam| FamilyDump {
                rules: fam.dfas.iter().map(rule_dump).collect(),
            })
            .collect();
        TablesDump { families }
    }

    pub fn save_json(&self, out: impl Write) -> io::Result<()> {
        let mut w = BufWriter::new(out);
        serde_json::to_writer(&mut w, self)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        w.flush()
    }
}

fn rule_dump(dfa: &crate::automata::Automaton) -> RuleDump {
    let mut acc = Vec::with_capacity(dfa.len());
    let mut singles = Vec::with_capacity(dfa.len());
    let mut ranges = Vec::with_capacity(dfa.len());
    let mut wild = Vec::with_capacity(dfa.len());
    for node in &dfa.nodes {
        acc.push(node.accept);
        let mut s = Vec::new();
        let mut g = Vec::new();
        let mut w = -1;
        for e in &node.edges {
            match &e.kind {
                EdgeKind::Rune(r) => s.push((*r, e.dst)),
                EdgeKind::Class { limits, .. } => g.push((limits[0], limits[1], e.dst)),
                EdgeKind::Wild => w = e.dst,
                EdgeKind::Nil => {}
            }
        }
        singles.push(s);
        ranges.push(g);
        wild.push(w);
    }
    RuleDump {
        states: dfa.len(),
        acc,
        singles,
        ranges,
        wild,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automata::{dfa, regex};

    #[test]
    fn dump_serializes_every_section() {
        let (nfa, alphabet) = regex::parse("[a-c]x").unwrap();
        let compiled = CompiledFamily {
            dfas: vec![dfa::subset_construct(&nfa, &alphabet)],
        };
        let dump = TablesDump::build(&[compiled]);
        let mut buf = Vec::new();
        dump.save_json(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("\"families\""));
        assert!(text.contains("\"acc\""));
        assert!(text.contains("\"wild\""));
    }
}

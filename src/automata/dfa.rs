// src/automata/dfa.rs

//! Subset construction. Subsets of NFA node indices are keyed as '0'/'1'
//! bitmap strings; the all-zero key is the dead state and maps to -1, so
//! edges into it never materialize a node. Transitions are generated in
//! singles, ranges, wildcard order, matching the discipline of the emitted
//! code: a rune hitting both a single and a range takes the single's edge.

use hashbrown::HashMap;

use crate::automata::alphabet::Alphabet;
use crate::automata::{in_class, Automaton, Edge, EdgeKind, Node};

pub fn subset_construct(nfa: &Automaton, alphabet: &Alphabet) -> Automaton {
    let n = nfa.len();
    let singles = alphabet.sorted_singles();

    let mut dfa = Automaton::default();
    let mut table: HashMap<String, i32> = HashMap::new();
    table.insert("0".repeat(n), -1);
    let mut todo: Vec<usize> = Vec::new();

    let mut initial = vec![false; n];
    initial[0] = true;
    intern(nfa, &mut dfa, &mut table, &mut todo, initial);

    while let Some(v) = todo.pop() {
        let set = dfa.nodes[v].set.clone();

        for &r in &singles {
            let mut states = vec![false; n];
            for &i in &set {
                for e in &nfa.nodes[i].edges {
                    let hit = match &e.kind {
                        EdgeKind::Rune(er) => *er == r,
                        EdgeKind::Wild => true,
                        EdgeKind::Class { limits, negate } => *negate != in_class(r, limits),
                        EdgeKind::Nil => false,
                    };
                    if hit {
                        states[e.dst as usize] = true;
                    }
                }
            }
            let dst = intern(nfa, &mut dfa, &mut table, &mut todo, states);
            dfa.nodes[v].edges.push(Edge {
                kind: EdgeKind::Rune(r),
                dst,
            });
        }

        let mut j = 0;
        while j < alphabet.lim.len() {
            let (lo, hi) = (alphabet.lim[j], alphabet.lim[j + 1]);
            let mut states = vec![false; n];
            for &i in &set {
                for e in &nfa.nodes[i].edges {
                    // Alphabet ranges never straddle a class range, so the
                    // low endpoint decides membership for the whole range.
                    let hit = match &e.kind {
                        EdgeKind::Wild => true,
                        EdgeKind::Class { limits, negate } => *negate != in_class(lo, limits),
                        _ => false,
                    };
                    if hit {
                        states[e.dst as usize] = true;
                    }
                }
            }
            let dst = intern(nfa, &mut dfa, &mut table, &mut todo, states);
            dfa.nodes[v].edges.push(Edge {
                kind: EdgeKind::Class {
                    limits: vec![lo, hi],
                    negate: false,
                },
                dst,
            });
            j += 2;
        }

        let mut states = vec![false; n];
        for &i in &set {
            for e in &nfa.nodes[i].edges {
                let hit = match &e.kind {
                    EdgeKind::Wild => true,
                    EdgeKind::Class { negate, .. } => *negate,
                    _ => false,
                };
                if hit {
                    states[e.dst as usize] = true;
                }
            }
        }
        let dst = intern(nfa, &mut dfa, &mut table, &mut todo, states);
        dfa.nodes[v].edges.push(Edge {
            kind: EdgeKind::Wild,
            dst,
        });
    }

    dfa
}

/// Epsilon-close `states`, then look the subset up or create its DFA node.
fn intern(
    nfa: &Automaton,
    dfa: &mut Automaton,
    table: &mut HashMap<String, i32>,
    todo: &mut Vec<usize>,
    mut states: Vec<bool>,
) -> i32 {
    nil_close(nfa, &mut states);
    let key: String = states.iter().map(|&b| if b { '1' } else { '0' }).collect();
    if let Some(&idx) = table.get(&key) {
        return idx;
    }
    let set: Vec<usize> = states
        .iter()
        .enumerate()
        .filter_map(|(i, &b)| b.then_some(i))
        .collect();
    let accept = set.iter().any(|&i| nfa.nodes[i].accept);
    let idx = dfa.nodes.len();
    dfa.nodes.push(Node {
        edges: Vec::new(),
        accept,
        set,
    });
    table.insert(key, idx as i32);
    todo.push(idx);
    idx as i32
}

/// Expand to the fixed point over Nil edges.
fn nil_close(nfa: &Automaton, states: &mut [bool]) {
    let mut stack: Vec<usize> = states
        .iter()
        .enumerate()
        .filter_map(|(i, &b)| b.then_some(i))
        .collect();
    while let Some(i) = stack.pop() {
        for e in &nfa.nodes[i].edges {
            if matches!(e.kind, EdgeKind::Nil) {
                let d = e.dst as usize;
                if !states[d] {
                    states[d] = true;
                    stack.push(d);
                }
            }
        }
    }
}

// src/scanner.rs

//! Reference implementation of the multi-DFA longest-match driver. The
//! emitted runtime runs the same algorithm over generated tables; this one
//! walks the compiled automata directly and serves as the oracle for the
//! test suite and the fuzz tool.

use crate::automata::{in_class, Automaton, EdgeKind};

/// DFAs of one family, indexed by rule ordinal (the close rule compiles to
/// nothing).
#[derive(Debug, Default)]
pub struct CompiledFamily {
    pub dfas: Vec<Automaton>,
}

/// Step one DFA. Edges were generated singles first, then ranges, then the
/// wildcard, and the first hit wins, so singles shadow ranges and ranges
/// shadow the wildcard.
pub fn step(dfa: &Automaton, state: i32, r: char) -> i32 {
    if state < 0 {
        return -1;
    }
    for e in &dfa.nodes[state as usize].edges {
        let hit = match &e.kind {
            EdgeKind::Rune(er) => *er == r,
            EdgeKind::Class { limits, negate } => *negate != in_class(r, limits),
            EdgeKind::Wild => true,
            EdgeKind::Nil => false,
        };
        if hit {
            return e.dst;
        }
    }
    -1
}

pub struct Scanner<'a, I: Iterator<Item = char>> {
    family: &'a CompiledFamily,
    input: I,
    buf: Vec<char>,
    n: usize,
    at_eof: bool,
    text: String,
    state: Vec<i32>,
}

impl<'a, I: Iterator<Item = char>> Scanner<'a, I> {
    pub fn new(family: &'a CompiledFamily, input: I) -> Scanner<'a, I> {
        Scanner {
            family,
            input,
            buf: Vec::new(),
            n: 0,
            at_eof: false,
            text: String::new(),
            state: vec![0; family.dfas.len()],
        }
    }

    /// Matched text of the token most recently returned by [`Scanner::next_action`].
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Advance one token: the winning rule ordinal, or -1 at end of stream.
    /// End of stream is reported again on every later call. Runes no rule
    /// matches are dropped one at a time and scanning restarts after them.
    pub fn next_action(&mut self) -> i32 {
        let mut matchi = 0usize;
        let mut matchn = 0usize;
        for s in self.state.iter_mut() {
            *s = 0;
        }
        loop {
            if self.at_eof && self.n == 0 && self.buf.is_empty() {
                return -1;
            }
            if self.n == self.buf.len() && !self.at_eof {
                match self.input.next() {
                    Some(r) => self.buf.push(r),
                    None => self.at_eof = true,
                }
            }
            let mut jammed = true;
            if !self.at_eof {
                let r = self.buf[self.n];
                self.n += 1;
                for i in 0..self.state.len() {
                    if self.state[i] == -1 {
                        continue;
                    }
                    let next = step(&self.family.dfas[i], self.state[i], r);
                    self.state[i] = next;
                    if next == -1 {
                        continue;
                    }
                    jammed = false;
                    // The DFAs advance in lockstep, so matchn only grows; an
                    // equal-length accept never displaces a lower ordinal.
                    if self.family.dfas[i].nodes[next as usize].accept && matchn < self.n {
                        matchi = i;
                        matchn = self.n;
                    }
                }
            }
            if jammed {
                self.n = 0;
                if matchn == 0 {
                    if self.at_eof {
                        return -1;
                    }
                    self.buf.remove(0);
                    for s in self.state.iter_mut() {
                        *s = 0;
                    }
                } else {
                    self.text = self.buf[..matchn].iter().collect();
                    self.buf.drain(..matchn);
                    return matchi as i32;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automata::{dfa, regex};

    fn family(patterns: &[&str]) -> CompiledFamily {
        let dfas = patterns
            .iter()
            .map(|p| {
                let (nfa, alphabet) = regex::parse(p).unwrap();
                dfa::subset_construct(&nfa, &alphabet)
            })
            .collect();
        CompiledFamily { dfas }
    }

    fn tokens(fam: &CompiledFamily, input: &str) -> Vec<(i32, String)> {
        let mut sc = Scanner::new(fam, input.chars());
        let mut out = Vec::new();
        loop {
            let i = sc.next_action();
            if i < 0 {
                return out;
            }
            out.push((i, sc.text().to_string()));
        }
    }

    #[test]
    fn longest_match_beats_lower_ordinal() {
        let fam = family(&["if", "[a-z]+"]);
        assert_eq!(tokens(&fam, "iffy"), vec![(1, "iffy".to_string())]);
    }

    #[test]
    fn equal_length_goes_to_lowest_ordinal() {
        let fam = family(&["if", "[a-z]+"]);
        assert_eq!(tokens(&fam, "if"), vec![(0, "if".to_string())]);
    }

    #[test]
    fn unmatchable_runes_are_skipped() {
        let fam = family(&["[a-z]+"]);
        assert_eq!(
            tokens(&fam, "ab!cd"),
            vec![(0, "ab".to_string()), (0, "cd".to_string())]
        );
    }

    #[test]
    fn end_of_stream_repeats() {
        let fam = family(&["a"]);
        let mut sc = Scanner::new(&fam, "a".chars());
        assert_eq!(sc.next_action(), 0);
        assert_eq!(sc.next_action(), -1);
        assert_eq!(sc.next_action(), -1);
    }

    #[test]
    fn backtracks_to_last_accept() {
        // /a(ba)*/ overshoots past "aba" and must back up to the last
        // accepting length before the next token starts.
        let fam = family(&["a(ba)*", "b", "x"]);
        assert_eq!(
            tokens(&fam, "ababx"),
            vec![
                (0, "aba".to_string()),
                (1, "b".to_string()),
                (2, "x".to_string())
            ]
        );
    }

    #[test]
    fn lookahead_pending_at_end_of_stream_is_dropped() {
        // The attempt is still alive when the reader runs dry, so the
        // scanner emits the recorded match and then reports end of stream
        // without rescanning the leftover lookahead.
        let fam = family(&["a(ba)*", "b"]);
        assert_eq!(tokens(&fam, "abab"), vec![(0, "aba".to_string())]);
    }

    #[test]
    fn empty_matches_are_never_emitted() {
        let fam = family(&["a*"]);
        assert_eq!(tokens(&fam, "bbb"), Vec::<(i32, String)>::new());
        assert_eq!(tokens(&fam, "baa"), vec![(0, "aa".to_string())]);
    }
}

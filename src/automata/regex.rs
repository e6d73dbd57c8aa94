// src/automata/regex.rs

//! Recursive-descent regex parser producing a Thompson epsilon-NFA and the
//! regex's alphabet. Supported syntax: literals, `\`-escapes of punctuation
//! and `abfnrtv`, `.`, `(..)`, `[..]` classes with `^` negation and ranges,
//! and the `* + ?` closures with alternation via `|`.

use crate::automata::alphabet::Alphabet;
use crate::automata::{Automaton, EdgeKind};
use crate::error::{Error, Result};

const PUNCT: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

fn is_punct(c: char) -> bool {
    PUNCT.contains(c)
}

fn escape(c: char) -> Option<char> {
    match c {
        'a' => Some('\x07'),
        'b' => Some('\x08'),
        'f' => Some('\x0C'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        'v' => Some('\x0B'),
        _ => None,
    }
}

/// Compile one regex into an epsilon-NFA plus its derived alphabet. The
/// returned automaton is shortlisted: reachable nodes only, start at 0,
/// exactly one accepting end node.
pub fn parse(pattern: &str) -> Result<(Automaton, Alphabet)> {
    let mut p = Parser {
        s: pattern.chars().collect(),
        pos: 0,
        nfa: Automaton::default(),
        alphabet: Alphabet::new(),
        nlpar: 0,
    };
    let (start, end) = p.alternation()?;
    p.nfa.nodes[end].accept = true;
    let nfa = p.nfa.shortlist(start);
    log::debug!("regex {:?}: {} reachable NFA nodes", pattern, nfa.len());
    Ok((nfa, p.alphabet))
}

struct Parser {
    s: Vec<char>,
    pos: usize,
    nfa: Automaton,
    alphabet: Alphabet,
    nlpar: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.s.get(self.pos).copied()
    }

    fn nil_edge(&mut self, u: usize, v: usize) {
        self.nfa.add_edge(u, EdgeKind::Nil, v as i32);
    }

    fn rune_edge(&mut self, u: usize, v: usize, r: char) {
        self.alphabet.sing.insert(r);
        self.nfa.add_edge(u, EdgeKind::Rune(r), v as i32);
    }

    /// Current rune with any backslash escape resolved. Leaves `pos` on the
    /// final rune of the escape; the caller advances past it.
    fn maybe_escape(&mut self) -> Result<char> {
        let mut c = self.s[self.pos];
        if c == '\\' {
            self.pos += 1;
            if self.pos == self.s.len() {
                return Err(Error::ExtraneousBackslash);
            }
            c = self.s[self.pos];
            if is_punct(c) {
                // stands for itself
            } else if let Some(e) = escape(c) {
                c = e;
            } else {
                return Err(Error::BadEscape);
            }
        }
        Ok(c)
    }

    fn char_class(&mut self) -> Result<(usize, usize)> {
        let start = self.nfa.add_node();
        let end = self.nfa.add_node();
        let mut limits: Vec<char> = Vec::new();
        let mut negate = false;
        if self.peek() == Some('^') {
            negate = true;
            self.pos += 1;
        }
        // A one-rune range goes into the edge's limit pairs like any other,
        // but the regex-wide alphabet records it as a singleton.
        fn singleton(limits: &mut Vec<char>, alphabet: &mut Alphabet, c: char) {
            limits.push(c);
            limits.push(c);
            alphabet.sing.insert(c);
        }
        let mut left = '\0';
        let mut left_live = false;
        let mut saw_dash = false;
        let mut first = true;
        while self.pos < self.s.len() && self.s[self.pos] != ']' {
            let c = self.maybe_escape()?;
            if c == '-' && !first {
                saw_dash = true;
            } else if c == '-' {
                singleton(&mut limits, &mut self.alphabet, '-');
            } else {
                if saw_dash {
                    if !left_live || left > c {
                        return Err(Error::BadRange);
                    }
                    limits.push(left);
                    limits.push(c);
                    if left == c {
                        self.alphabet.sing.insert(c);
                    } else {
                        self.alphabet.insert_limits(left, c);
                    }
                    left_live = false;
                } else {
                    if left_live {
                        singleton(&mut limits, &mut self.alphabet, left);
                    }
                    left = c;
                    left_live = true;
                }
                saw_dash = false;
            }
            first = false;
            self.pos += 1;
        }
        if left_live {
            singleton(&mut limits, &mut self.alphabet, left);
        }
        if saw_dash {
            singleton(&mut limits, &mut self.alphabet, '-');
        }
        self.nfa
            .add_edge(start, EdgeKind::Class { limits, negate }, end as i32);
        Ok((start, end))
    }

    fn term(&mut self) -> Result<(usize, usize)> {
        if self.pos == self.s.len() || self.s[self.pos] == '|' {
            let end = self.nfa.add_node();
            return Ok((end, end));
        }
        match self.s[self.pos] {
            '*' | '+' | '?' => Err(Error::BareClosure),
            ')' => {
                if self.nlpar == 0 {
                    return Err(Error::UnmatchedRParen);
                }
                let end = self.nfa.add_node();
                Ok((end, end))
            }
            '(' => {
                self.nlpar += 1;
                self.pos += 1;
                let (start, end) = self.alternation()?;
                if self.pos == self.s.len() || self.s[self.pos] != ')' {
                    return Err(Error::UnmatchedLParen);
                }
                self.nlpar -= 1;
                self.pos += 1;
                Ok((start, end))
            }
            '.' => {
                let start = self.nfa.add_node();
                let end = self.nfa.add_node();
                self.nfa.add_edge(start, EdgeKind::Wild, end as i32);
                self.pos += 1;
                Ok((start, end))
            }
            ']' => Err(Error::UnmatchedRBracket),
            '[' => {
                self.pos += 1;
                let (start, end) = self.char_class()?;
                if self.pos == self.s.len() || self.s[self.pos] != ']' {
                    return Err(Error::UnmatchedLBracket);
                }
                self.pos += 1;
                Ok((start, end))
            }
            _ => {
                let start = self.nfa.add_node();
                let end = self.nfa.add_node();
                let r = self.maybe_escape()?;
                self.rune_edge(start, end, r);
                self.pos += 1;
                Ok((start, end))
            }
        }
    }

    fn closure(&mut self) -> Result<(usize, usize)> {
        let (start, end) = self.term()?;
        if start == end || self.pos == self.s.len() {
            return Ok((start, end));
        }
        match self.s[self.pos] {
            '*' => {
                self.nil_edge(end, start);
                let nend = self.nfa.add_node();
                self.nil_edge(end, nend);
                self.pos += 1;
                Ok((end, nend))
            }
            '+' => {
                self.nil_edge(end, start);
                let nend = self.nfa.add_node();
                self.nil_edge(end, nend);
                self.pos += 1;
                Ok((start, nend))
            }
            '?' => {
                self.nil_edge(start, end);
                self.pos += 1;
                Ok((start, end))
            }
            _ => Ok((start, end)),
        }
    }

    fn cat(&mut self) -> Result<(usize, usize)> {
        let mut acc: Option<(usize, usize)> = None;
        loop {
            let (nstart, nend) = self.closure()?;
            match acc {
                None => acc = Some((nstart, nend)),
                Some((s0, e0)) if nstart != nend => {
                    // Splice: the running end adopts the next fragment's
                    // start edges, so the fragments share a node.
                    self.nfa.nodes[e0].edges = self.nfa.nodes[nstart].edges.clone();
                    acc = Some((s0, nend));
                }
                _ => {}
            }
            if nstart == nend {
                return Ok(acc.expect("first fragment recorded"));
            }
        }
    }

    fn alternation(&mut self) -> Result<(usize, usize)> {
        let (mut start, mut end) = self.cat()?;
        while self.pos < self.s.len() && self.s[self.pos] == '|' {
            self.pos += 1;
            let (nstart, nend) = self.cat()?;
            let tmp = self.nfa.add_node();
            self.nil_edge(tmp, start);
            self.nil_edge(tmp, nstart);
            start = tmp;
            let tmp = self.nfa.add_node();
            self.nil_edge(end, tmp);
            self.nil_edge(nend, tmp);
            end = tmp;
        }
        Ok((start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_of_mixed_classes() {
        let (_, alphabet) = parse("[0-9]*[Ee][2-5]*").unwrap();
        assert_eq!(alphabet.sorted_singles(), vec!['E', 'e']);
        assert_eq!(alphabet.lim, vec!['0', '1', '2', '5', '6', '9']);
    }

    #[test]
    fn sentinel_nodes_are_dropped() {
        let (nfa, _) = parse("a").unwrap();
        assert_eq!(nfa.len(), 2);
        assert!(nfa.nodes[1].accept);
    }

    #[test]
    fn dash_is_literal_at_class_edges() {
        let (nfa, _) = parse("[-a]").unwrap();
        match &nfa.nodes[0].edges[0].kind {
            EdgeKind::Class { limits, negate } => {
                assert!(!negate);
                assert_eq!(limits, &vec!['-', '-', 'a', 'a']);
            }
            other => panic!("expected class edge, got {other:?}"),
        }
        let (nfa, _) = parse("[a-]").unwrap();
        match &nfa.nodes[0].edges[0].kind {
            EdgeKind::Class { limits, .. } => {
                assert_eq!(limits, &vec!['a', 'a', '-', '-'])
            }
            other => panic!("expected class edge, got {other:?}"),
        }
    }

    #[test]
    fn escapes_resolve() {
        let (nfa, alphabet) = parse("\\n").unwrap();
        assert!(matches!(nfa.nodes[0].edges[0].kind, EdgeKind::Rune('\n')));
        assert!(alphabet.sing.contains(&'\n'));
        let (nfa, _) = parse("\\*").unwrap();
        assert!(matches!(nfa.nodes[0].edges[0].kind, EdgeKind::Rune('*')));
    }

    #[test]
    fn malformed_patterns_are_rejected() {
        assert!(matches!(parse("[z-a]"), Err(Error::BadRange)));
        assert!(matches!(parse("*a"), Err(Error::BareClosure)));
        assert!(matches!(parse("(a"), Err(Error::UnmatchedLParen)));
        assert!(matches!(parse("a)"), Err(Error::UnmatchedRParen)));
        assert!(matches!(parse("[ab"), Err(Error::UnmatchedLBracket)));
        assert!(matches!(parse("]a"), Err(Error::UnmatchedRBracket)));
        assert!(matches!(parse("a\\"), Err(Error::ExtraneousBackslash)));
        assert!(matches!(parse("\\q"), Err(Error::BadEscape)));
    }

    #[test]
    fn groups_and_alternation_parse() {
        assert!(parse("(a|b)*c").is_ok());
        assert!(parse("a|").is_ok());
        assert!(parse("(a)(b)").is_ok());
    }
}

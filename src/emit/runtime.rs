// src/emit/runtime.rs
// The constant text the emitted file embeds. Everything here is standard
// library only so the generated scanner stands alone.

pub const RUNTIME_TYPES: &str = r##"
/// One compiled rule: per-state accept flags and transition functions. A
/// transition returning -1 means the automaton is dead.
#[derive(Clone, Copy)]
pub struct Dfa {
    pub acc: &'static [bool],
    pub f: &'static [fn(char) -> i32],
}

/// The DFAs of one rule family, indexed by rule ordinal.
pub struct Family {
    pub a: &'static [Dfa],
}

"##;

pub const RUNTIME_DRIVER: &str = r##"
pub struct Lexer {
    input: Box<dyn std::io::Read>,
    buf: Vec<char>,
    n: usize,
    at_eof: bool,
    text: String,
    fam: &'static Family,
    state: Vec<i32>,
}

impl Lexer {
    pub fn new<R: std::io::Read + 'static>(input: R) -> Lexer {
        Lexer::frame(Box::new(input), 0)
    }

    /// A scanner over in-memory text, bound to the given family. Nested
    /// families re-lex the matched text through this.
    pub fn from_str(text: &str, family: usize) -> Lexer {
        Lexer::frame(Box::new(std::io::Cursor::new(text.as_bytes().to_vec())), family)
    }

    fn frame(input: Box<dyn std::io::Read>, family: usize) -> Lexer {
        let fam = &FAMILIES[family];
        Lexer {
            input,
            buf: Vec::new(),
            n: 0,
            at_eof: false,
            text: String::new(),
            fam,
            state: vec![0; fam.a.len()],
        }
    }

    /// Matched text of the most recent token.
    pub fn text(&self) -> &str {
        &self.text
    }

    fn read_byte(&mut self) -> Option<u8> {
        let mut b = [0u8; 1];
        loop {
            match self.input.read(&mut b) {
                Ok(0) => return None,
                Ok(_) => return Some(b[0]),
                Err(ref e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(_) => return None,
            }
        }
    }

    /// One rune of UTF-8; malformed input decodes to U+FFFD.
    fn read_rune(&mut self) -> Option<char> {
        let first = self.read_byte()?;
        let need = match first {
            b if b < 0x80 => return Some(first as char),
            b if b >= 0xF0 => 3,
            b if b >= 0xE0 => 2,
            b if b >= 0xC0 => 1,
            _ => return Some('\u{FFFD}'),
        };
        let mut bytes = [first, 0, 0, 0];
        for i in 1..=need {
            match self.read_byte() {
                Some(b) => bytes[i] = b,
                None => return Some('\u{FFFD}'),
            }
        }
        match std::str::from_utf8(&bytes[..need + 1]) {
            Ok(s) => s.chars().next(),
            Err(_) => Some('\u{FFFD}'),
        }
    }

    /// Run every DFA of the family in lockstep over the lookahead buffer and
    /// return the winning rule ordinal: longest match first, lowest ordinal
    /// on equal length, -1 at end of stream. A rune no rule matches is
    /// dropped and scanning restarts after it.
    fn next_action(&mut self) -> i32 {
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
                match self.read_rune() {
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
                    let d = &self.fam.a[i];
                    self.state[i] = d.f[self.state[i] as usize](r);
                    if self.state[i] == -1 {
                        continue;
                    }
                    jammed = false;
                    // The DFAs advance in lockstep, so matchn can only grow.
                    if d.acc[self.state[i] as usize] && matchn < self.n {
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

"##;

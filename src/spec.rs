// src/spec.rs

//! Spec-file parser. A spec is a sequence of rule blocks, then optional
//! trailing user code:
//!
//! ```text
//! /[0-9]+/ { return 1; }
//! /"[^"]*"/ < { return 2; }
//!     /[^"]+/ { }
//! > { }
//! //
//! fn main() { ... }
//! ```
//!
//! A rule block is `DELIM regex DELIM [<] action` where `DELIM` is the
//! block's first rune (conventionally `/`). A backslash right before the
//! delimiter keeps it inside the regex. An empty regex ends rule parsing and
//! the rest of the file is user code, captured verbatim. `<` before an action
//! opens a nested family, closed later by a `>` block whose action becomes
//! the family's close action. Actions are brace-balanced; the count is
//! naive, so a stray `{` inside a string literal in an action ends the block
//! early (known limitation).

use std::io::Read;

use crate::error::{Error, Result};

/// One rule. `index` is the ordinal within the family (source order, lower
/// wins length ties); -1 marks the close action, which has no regex and no
/// DFA.
#[derive(Debug, Clone)]
pub struct Rule {
    pub index: i32,
    pub regex: Vec<char>,
    pub action: String,
    /// Family opened by this rule when its action was preceded by `<`.
    pub nested_family: Option<usize>,
}

/// An ordered set of rules compiled into one multi-DFA scanner.
#[derive(Debug, Clone, Default)]
pub struct Family {
    pub rules: Vec<Rule>,
}

/// A parsed spec: families in discovery order (0 is the top level) plus the
/// trailing user code.
#[derive(Debug, Default)]
pub struct SpecFile {
    pub families: Vec<Family>,
    pub user_code: String,
}

impl SpecFile {
    pub fn parse<R: Read>(input: R) -> Result<SpecFile> {
        SpecParser {
            input: Runes::new(input),
            r: '\0',
            spec: SpecFile::default(),
        }
        .run()
    }

    pub fn parse_str(s: &str) -> Result<SpecFile> {
        SpecFile::parse(s.as_bytes())
    }
}

/// Incremental UTF-8 rune reader over any byte source. Malformed sequences
/// decode to U+FFFD.
pub struct Runes<R: Read> {
    inner: R,
}

impl<R: Read> Runes<R> {
    pub fn new(inner: R) -> Runes<R> {
        Runes { inner }
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut b = [0u8; 1];
        loop {
            match self.inner.read(&mut b) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(b[0])),
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::Io(e)),
            }
        }
    }

    pub fn next_rune(&mut self) -> Result<Option<char>> {
        let first = match self.read_byte()? {
            Some(b) => b,
            None => return Ok(None),
        };
        let need = match first {
            b if b < 0x80 => return Ok(Some(first as char)),
            b if b >= 0xF0 => 3,
            b if b >= 0xE0 => 2,
            b if b >= 0xC0 => 1,
            _ => return Ok(Some('\u{FFFD}')),
        };
        let mut buf = [first, 0, 0, 0];
        for slot in buf.iter_mut().take(need + 1).skip(1) {
            match self.read_byte()? {
                Some(b) => *slot = b,
                None => return Ok(Some('\u{FFFD}')),
            }
        }
        Ok(Some(match std::str::from_utf8(&buf[..need + 1]) {
            Ok(s) => s.chars().next().unwrap_or('\u{FFFD}'),
            Err(_) => '\u{FFFD}',
        }))
    }
}

struct SpecParser<R: Read> {
    input: Runes<R>,
    r: char,
    spec: SpecFile,
}

impl<R: Read> SpecParser<R> {
    /// Pull the next rune into `self.r`; true means EOF.
    fn read(&mut self) -> Result<bool> {
        match self.input.next_rune()? {
            Some(r) => {
                self.r = r;
                Ok(false)
            }
            None => Ok(true),
        }
    }

    fn skipws(&mut self) -> Result<bool> {
        while !self.read()? {
            if !matches!(self.r, ' ' | '\n' | '\t' | '\r') {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Read a brace-balanced action block starting at `self.r`, which must
    /// be `{`. Returns the block including its braces.
    fn read_action(&mut self) -> Result<String> {
        if self.r != '{' {
            return Err(Error::ExpectedLBrace);
        }
        let mut buf = String::from('{');
        let mut nesting = 1usize;
        loop {
            if self.read()? {
                return Err(Error::UnmatchedLBrace);
            }
            buf.push(self.r);
            if self.r == '{' {
                nesting += 1;
            } else if self.r == '}' {
                nesting -= 1;
                if nesting == 0 {
                    break;
                }
            }
        }
        Ok(buf)
    }

    /// Parse the rules of one family; recursion handles nesting. Returns
    /// true when the empty-regex marker was hit and user code follows.
    fn parse_family(&mut self) -> Result<bool> {
        let family = self.spec.families.len();
        self.spec.families.push(Family::default());
        let mut rulen = 0i32;
        loop {
            if self.skipws()? {
                return Err(Error::UnexpectedEof);
            }
            if self.r == '>' {
                if family == 0 {
                    return Err(Error::UnmatchedRAngle);
                }
                if self.skipws()? {
                    return Err(Error::UnexpectedEof);
                }
                let action = self.read_action()?;
                self.spec.families[family].rules.push(Rule {
                    index: -1,
                    regex: Vec::new(),
                    action,
                    nested_family: None,
                });
                return Ok(false);
            }
            let delim = self.r;
            if self.read()? {
                return Err(Error::UnexpectedEof);
            }
            let mut regex: Vec<char> = Vec::new();
            loop {
                if self.r == delim && regex.last() != Some(&'\\') {
                    break;
                }
                if self.r == '\n' {
                    return Err(Error::UnexpectedNewline);
                }
                regex.push(self.r);
                if self.read()? {
                    return Err(Error::UnexpectedEof);
                }
            }
            if regex.is_empty() {
                // Empty regex: rules are done, user code follows.
                if family != 0 {
                    return Err(Error::UnmatchedLAngle);
                }
                self.spec.families[0].rules.push(Rule {
                    index: -1,
                    regex: Vec::new(),
                    action: String::new(),
                    nested_family: None,
                });
                return Ok(true);
            }
            if self.skipws()? {
                return Err(Error::MissingAction);
            }
            let mut nested = None;
            if self.r == '<' {
                if self.skipws()? {
                    return Err(Error::MissingAction);
                }
                nested = Some(self.spec.families.len());
            }
            let action = self.read_action()?;
            self.spec.families[family].rules.push(Rule {
                index: rulen,
                regex,
                action,
                nested_family: nested,
            });
            rulen += 1;
            if nested.is_some() {
                self.parse_family()?;
            }
        }
    }

    fn run(mut self) -> Result<SpecFile> {
        self.parse_family()?;
        // User code: skip leading whitespace, then keep the rest verbatim.
        let mut code = String::new();
        if !self.skipws()? {
            code.push(self.r);
            while !self.read()? {
                code.push(self.r);
            }
        }
        self.spec.user_code = code;
        Ok(self.spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_get_source_order_ordinals() {
        let spec = SpecFile::parse_str("/a/ { A }\n/b/ { B }\n//\ncode").unwrap();
        assert_eq!(spec.families.len(), 1);
        let rules = &spec.families[0].rules;
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[0].index, 0);
        assert_eq!(rules[1].index, 1);
        assert_eq!(rules[2].index, -1);
        assert_eq!(spec.user_code, "code");
    }

    #[test]
    fn nested_family_is_discovered_in_order() {
        let text = "/\"[^\"]*\"/ < { outer }\n/[^\"]+/ { inner }\n> { close }\n//\n";
        let spec = SpecFile::parse_str(text).unwrap();
        assert_eq!(spec.families.len(), 2);
        assert_eq!(spec.families[0].rules[0].nested_family, Some(1));
        let inner = &spec.families[1].rules;
        assert_eq!(inner[0].index, 0);
        assert_eq!(inner[1].index, -1);
        assert_eq!(inner[1].action, "{ close }");
    }

    #[test]
    fn escaped_delimiter_stays_in_regex() {
        let spec = SpecFile::parse_str("/a\\// { }\n//\n").unwrap();
        assert_eq!(spec.families[0].rules[0].regex, vec!['a', '\\', '/']);
    }

    #[test]
    fn braces_nest_inside_actions() {
        let spec = SpecFile::parse_str("/a/ { if x { y } }\n//\n").unwrap();
        assert_eq!(spec.families[0].rules[0].action, "{ if x { y } }");
    }

    #[test]
    fn any_delimiter_works() {
        let spec = SpecFile::parse_str("#a+# { }\n//\n").unwrap();
        assert_eq!(spec.families[0].rules[0].regex, vec!['a', '+']);
    }
}

// src/lib.rs

//! relex generates lexers. A spec file pairs regular expressions with Rust
//! action blocks; the generator compiles each regex to a DFA and emits a
//! self-contained scanner that runs all DFAs of a family in lockstep and
//! reports the longest match, breaking ties toward the earliest rule.
//!
//! ```text
//! /[0-9]+/    { return 1; }
//! /[a-z]+/    { return 2; }
//! /[ \t\n]+/  { }
//! //
//! fn main() {
//!     let mut lx = Lexer::new(std::io::stdin());
//!     while lx.lex() >= 0 {
//!         println!("{}", lx.text());
//!     }
//! }
//! ```
//!
//! Families nest: marking a rule's action with `<` opens a sub-lexer that
//! re-scans the matched text, closed by a `>` block. The crate also ships
//! [`scanner::Scanner`], an in-memory driver with the same matching
//! semantics as the emitted runtime; the tests and the fuzz tool run it as
//! the reference oracle.

pub mod automata;
pub mod emit;
pub mod error;
pub mod generate;
pub mod scanner;
pub mod spec;
pub mod tables;

pub use error::{Error, Result};

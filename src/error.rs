// src/error.rs

use std::fmt;
use std::io;

/// Everything that aborts the generator, from spec syntax through I/O.
#[derive(Debug)]
pub enum Error {
    UnmatchedLParen,
    UnmatchedRParen,
    UnmatchedLBracket,
    UnmatchedRBracket,
    BadRange,
    ExtraneousBackslash,
    BareClosure,
    BadEscape,
    ExpectedLBrace,
    UnmatchedLBrace,
    UnexpectedEof,
    UnexpectedNewline,
    UnmatchedLAngle,
    UnmatchedRAngle,
    MissingAction,
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnmatchedLParen => write!(f, "unmatched '('"),
            Error::UnmatchedRParen => write!(f, "unmatched ')'"),
            Error::UnmatchedLBracket => write!(f, "unmatched '['"),
            Error::UnmatchedRBracket => write!(f, "unmatched ']'"),
            Error::BadRange => write!(f, "bad range in character class"),
            Error::ExtraneousBackslash => write!(f, "extraneous backslash"),
            Error::BareClosure => write!(f, "closure applies to nothing"),
            Error::BadEscape => write!(f, "illegal backslash escape"),
            Error::ExpectedLBrace => write!(f, "expected '{{'"),
            Error::UnmatchedLBrace => write!(f, "unmatched '{{'"),
            Error::UnexpectedEof => write!(f, "unexpected EOF"),
            Error::UnexpectedNewline => write!(f, "unexpected newline in regex"),
            Error::UnmatchedLAngle => write!(f, "unmatched '<'"),
            Error::UnmatchedRAngle => write!(f, "unmatched '>'"),
            Error::MissingAction => write!(f, "pattern lacks an action"),
            Error::Io(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

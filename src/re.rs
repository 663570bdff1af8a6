// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::error;
use std::fmt;

use crate::backtrack::Backtrack;
use crate::captures::Catches;
use crate::input::{ByteInput, Utf8Input};
use crate::program::{Program, DEFAULT_SIZE_LIMIT};

/// An error that occurred while compiling a pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// A `(` or `<` group is never closed.
    UnbalancedGroup,
    /// A `[` set has no terminating `]`.
    UnterminatedSet,
    /// A `{` repetition without leading digits or a closing `}`.
    BadRepetition,
    /// A `:` at the end of its context, with no metacharacter byte.
    DanglingMeta,
    /// The pattern needs more command-table entries than the limit
    /// allows.
    CompiledTooBig(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::UnbalancedGroup => write!(f, "unclosed group"),
            Error::UnterminatedSet => write!(f, "character set missing ']'"),
            Error::BadRepetition => write!(f, "malformed {{}} repetition"),
            Error::DanglingMeta => write!(f, "':' with no metacharacter"),
            Error::CompiledTooBig(limit) => {
                write!(f, "compiled pattern exceeds {} table entries", limit)
            }
        }
    }
}

impl error::Error for Error {}

/// A compiled regular expression.
///
/// A `Regexp4` owns its compiled command table and holds no search
/// state, so one instance can be shared freely between searches and
/// threads. See the crate documentation for the pattern syntax.
///
/// # Example
///
/// ```
/// use regexp4::Regexp4;
///
/// let re = Regexp4::new("<:a>=<:d+>;").unwrap();
/// let caught = re.search("x=42;");
/// assert_eq!(caught.count(), 1);
/// assert_eq!(caught.get(1), "x");
/// assert_eq!(caught.get(2), "42");
/// ```
#[derive(Clone, Debug)]
pub struct Regexp4 {
    prog: Program,
}

impl Regexp4 {
    /// Compiles a pattern whose `.`-style wildcards and negated classes
    /// step over whole UTF-8 code points.
    pub fn new(re: &str) -> Result<Regexp4, Error> {
        Regexp4::with_size_limit(re, DEFAULT_SIZE_LIMIT, false)
    }

    /// Compiles a pattern that treats the text as a plain byte string.
    pub fn single_byte(re: &str) -> Result<Regexp4, Error> {
        Regexp4::with_size_limit(re, DEFAULT_SIZE_LIMIT, true)
    }

    /// Compiles a pattern with an explicit command-table entry limit,
    /// byte-oriented when `bytes` is set.
    pub fn with_size_limit(re: &str, size_limit: usize, bytes: bool) -> Result<Regexp4, Error> {
        let prog = if bytes {
            Program::bytes(re, size_limit)?
        } else {
            Program::unicode(re, size_limit)?
        };
        Ok(Regexp4 { prog })
    }

    /// The original pattern string.
    pub fn as_str(&self) -> &str {
        &self.prog.original
    }

    /// Scans `text` from every candidate start position and returns the
    /// match count together with the captures taken.
    ///
    /// Under the `#$` and `#?` global modes the count is 1 or 0; under
    /// `#~` the scan advances one code unit per match, so overlapping
    /// matches are counted.
    pub fn search<'t>(&self, text: &'t str) -> Catches<'t> {
        let mut catches = Catches::new(text);
        let count = if self.prog.bytes {
            Backtrack::exec(&self.prog, ByteInput::new(text), &mut catches)
        } else {
            Backtrack::exec(&self.prog, Utf8Input::new(text), &mut catches)
        };
        catches.set_count(count);
        catches
    }

    /// The match count alone.
    pub fn matches(&self, text: &str) -> usize {
        self.search(text).count()
    }

    /// True iff the pattern matches anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.matches(text) > 0
    }
}

/// Compiles `pattern` (UTF-8 mode) and returns how many times it
/// matches in `text`; a pattern that fails to compile counts 0.
///
/// This is the engine's historical one-shot entry point; compile once
/// with [`Regexp4::new`] when the pattern is reused or when compile
/// errors matter.
///
/// # Example
///
/// ```
/// assert_eq!(regexp4::regexp4("aaa", "a+"), 1);
/// assert_eq!(regexp4::regexp4("aaa", "#~a+"), 3);
/// ```
pub fn regexp4(text: &str, pattern: &str) -> usize {
    match Regexp4::new(pattern) {
        Ok(re) => re.matches(text),
        Err(_) => 0,
    }
}

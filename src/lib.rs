// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A compact backtracking regular-expression engine with its own small
//! surface syntax, capture groups, back-references and capture
//! templates.
//!
//! Patterns compile into a flat table of commands; matching walks that
//! table recursively, backtracking through repetition counts and
//! alternation branches. Text is searched either as UTF-8 (the
//! default, where `.` and negated classes step over whole code points)
//! or byte by byte ([`Regexp4::single_byte`]).
//!
//! # Syntax
//!
//! ```text
//! (...)      group
//! <...>      capturing group ("hook"); captures are numbered from 1
//!            in opening order, restarting at each candidate position
//! [...]      character set; a leading ^ inverts it; a-b ranges, :X
//!            metacharacters and . are recognized inside
//! |          alternation at the current grouping depth
//! .          any single code unit
//! :X         metacharacter: :a alpha, :d digit, :w alphanumeric,
//!            :s whitespace (capitals negate and, in UTF-8 mode, swallow
//!            a whole code point), :& any multi-byte code point (UTF-8
//!            mode), anything else is that literal byte
//! @N         the text of the latest capture with id N
//! a-b        inclusive byte range
//! ? + *      repeat 0-1, 1-or-more, 0-or-more times
//! {m} {m,} {m,n}  counted repetition
//! ##         a literal #
//! ```
//!
//! An element may be followed by `#` and a run of flags: `^` anchor to
//! the start of the text, `$` require the match to end at the end of
//! the text, `?` stop at the first match, `~` advance the scan one code
//! unit per match, `*`/`/` turn ASCII case folding on/off, `!` negate
//! the element. A flag run at the very start of the pattern applies to
//! the whole search.
//!
//! Negation has two faces: a `^` set inverts its membership test, while
//! `!` on a repeated element turns the loop into "consume one code unit
//! for every position where the element does not match".
//!
//! # Example
//!
//! ```
//! use regexp4::Regexp4;
//!
//! let re = Regexp4::new("<:w+> <:w+>").unwrap();
//! let caught = re.search("hello world");
//! assert_eq!(caught.count(), 1);
//! assert_eq!(caught.get(1), "hello");
//! assert_eq!(caught.get(2), "world");
//! assert_eq!(caught.put("#2, #1##"), "world, hello#");
//! assert_eq!(caught.rpl("there", 2), "hello there");
//! ```
//!
//! Back-references match the text a hook captured earlier in the same
//! attempt:
//!
//! ```
//! assert_eq!(regexp4::regexp4("abcabc", "<:w+>@1"), 1);
//! ```
//!
//! # Caveats
//!
//! This is a backtracking engine: pathological patterns can take
//! exponential time, and nothing bounds a runaway search but the
//! caller. Case folding is ASCII-only by design. At most
//! [`MAX_CATCHS`] captures are kept per search; hooks opened beyond
//! that are silently dropped.

#![deny(missing_docs)]

pub use crate::captures::{Catches, MAX_CATCHS};
pub use crate::re::{regexp4, Error, Regexp4};

mod backtrack;
mod captures;
mod compile;
mod input;
mod inst;
mod program;
mod re;

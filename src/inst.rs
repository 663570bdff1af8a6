// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use bitflags::bitflags;

/// InstIdx represents the index of a command in a compiled table.
pub type InstIdx = usize;

/// The repetition bound standing in for "unbounded" (`+`, `*`, `{m,}`).
pub const INF: u32 = 1 << 30;

bitflags! {
    /// Modifier bits attached to a single element or, through the `#`
    /// prefix of the whole pattern, to the outer search.
    ///
    /// `ALPHA`, `OMEGA`, `LONELY` and `FWD_BY_CHAR` only have an effect
    /// at the pattern level; `COMMUNISM` and `NEGATIVE` are honored per
    /// element, and `COMMUNISM` is inherited by subelements when set on
    /// a frame.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Mods: u8 {
        /// Try matches only at the very start of the text (`#^`).
        const ALPHA = 1;
        /// Report a match only when it ends at the end of the text (`#$`).
        const OMEGA = 2;
        /// Stop at the first successful match (`#?`).
        const LONELY = 4;
        /// Advance the outer scan one code unit per match instead of
        /// skipping the matched span (`#~`).
        const FWD_BY_CHAR = 8;
        /// ASCII case-insensitive comparisons (`#*`, revoked by `#/`).
        const COMMUNISM = 16;
        /// Invert the element: a set inverts its verdict, a looped
        /// element consumes one code unit per position where it does
        /// not match (`#!`, or a leading `^` inside a set).
        const NEGATIVE = 128;
    }
}

/// The kind of a pattern element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    /// An alternation container; each branch is one path element.
    Path,
    /// A non-capturing parenthesized group.
    Group,
    /// A capturing angle-bracketed group.
    Hook,
    /// A square-bracketed character set.
    Set,
    /// `@N`, matching the text of the latest capture with id N.
    Backref,
    /// A two-byte `:X` metacharacter.
    Meta,
    /// A three-byte `a-b` range.
    Rangeab,
    /// One multi-byte UTF-8 code point treated as a unit.
    Utf8,
    /// The `.` wildcard, one code unit wide.
    Point,
    /// A literal run of bytes.
    Simple,
}

/// A pattern element: a view into the pattern buffer plus the modifiers
/// and repetition counts read off its suffix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Elem {
    /// Byte offset of the element's text in the pattern.
    pub start: usize,
    /// Byte length of the element's text.
    pub len: usize,
    /// What the element is.
    pub kind: Kind,
    /// Modifier bits in effect for this element.
    pub mods: Mods,
    /// Fewest repetitions that still match.
    pub loops_min: u32,
    /// Most repetitions taken, `INF` when unbounded.
    pub loops_max: u32,
}

impl Elem {
    /// The placeholder carried by commands that frame no element of
    /// their own (`*End`, `End`).
    pub fn none() -> Elem {
        Elem {
            start: 0,
            len: 0,
            kind: Kind::Simple,
            mods: Mods::empty(),
            loops_min: 1,
            loops_max: 1,
        }
    }
}

/// A command in a compiled table.
///
/// `*Ini` commands open a frame that the matching `*End` closes; the
/// entries in between are the frame's children. The remaining commands
/// are atomic matchers, and `End` terminates the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cmd {
    /// Opens an alternation frame.
    PathIni,
    /// Opens one branch of an alternation; its close-index chains to the
    /// next branch.
    PathEle,
    /// Closes an alternation frame.
    PathEnd,
    /// Opens a non-capturing group and looping frame.
    GroupIni,
    /// Closes a group frame.
    GroupEnd,
    /// Opens a capturing frame; its bounds become a capture.
    HookIni,
    /// Closes a capturing frame.
    HookEnd,
    /// Opens a character-set frame.
    SetIni,
    /// Closes a character-set frame.
    SetEnd,
    /// Matches the text of an earlier capture.
    Backref,
    /// Matches a two-byte `:X` metacharacter.
    Meta,
    /// Matches a byte in an `a-b` range.
    Rangeab,
    /// Matches one multi-byte code point literally.
    Utf8,
    /// Matches any single code unit.
    Point,
    /// Matches a literal run of bytes.
    Simple,
    /// Terminates the table.
    End,
}

/// One slot of the command table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entry {
    /// The command.
    pub cmd: Cmd,
    /// The element the command matches or frames.
    pub elem: Elem,
    /// For `*Ini` commands, the index of the matching `*End`; for
    /// `PathEle`, the index of the next branch or of `PathEnd`; for
    /// every other command, the entry's own index.
    pub close: InstIdx,
}

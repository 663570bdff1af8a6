// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::compile::Compiler;
use crate::inst::{Entry, Mods};
use crate::Error;

/// The default cap on command-table entries per compiled pattern.
pub const DEFAULT_SIZE_LIMIT: usize = 1024;

/// Program represents a compiled pattern. Once a pattern is compiled,
/// its representation is immutable and shared by every search; all
/// mutable search state lives in the matching engine, one set per call.
#[derive(Clone, Debug)]
pub struct Program {
    /// The original pattern string. Elements in the table reference it
    /// by byte span.
    pub original: String,
    /// The flat command table, terminated by `Cmd::End`.
    pub table: Vec<Entry>,
    /// Global modifiers read off the pattern's leading `#` prefix;
    /// these drive the outer scan rather than any one element.
    pub mods: Mods,
    /// True iff the program matches byte by byte rather than by UTF-8
    /// code point.
    pub bytes: bool,
}

impl Program {
    /// Compiles a pattern that matches UTF-8 code points.
    pub fn unicode(re: &str, size_limit: usize) -> Result<Program, Error> {
        Program::new(re, size_limit, false)
    }

    /// Compiles a pattern that matches byte by byte.
    pub fn bytes(re: &str, size_limit: usize) -> Result<Program, Error> {
        Program::new(re, size_limit, true)
    }

    fn new(re: &str, size_limit: usize, bytes: bool) -> Result<Program, Error> {
        let (mods, table) = Compiler::new(re, !bytes, size_limit).compile()?;
        Ok(Program {
            original: re.to_owned(),
            table,
            mods,
            bytes,
        })
    }
}

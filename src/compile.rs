// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::input::utf8_meter;
use crate::inst::{Cmd, Elem, Entry, InstIdx, Kind, Mods, INF};
use crate::Error;

/// A pattern compiler.
///
/// The compiler cuts the pattern into elements and emits a flat command
/// table. Paired `*Ini`/`*End` entries encode the nesting, so no tree is
/// ever materialized; the cursor types below are views into the pattern
/// buffer that shrink as elements are cut off their front.
pub struct Compiler<'p> {
    pattern: &'p [u8],
    utf8: bool,
    size_limit: usize,
    table: Vec<Entry>,
}

/// A shrinking window into the pattern, plus everything learned about
/// the element most recently cut from it.
#[derive(Clone, Copy, Debug)]
struct Scan {
    start: usize,
    len: usize,
    kind: Kind,
    mods: Mods,
    loops_min: u32,
    loops_max: u32,
    index: InstIdx,
}

/// Drops `len` bytes off the front of the window.
#[inline]
fn fwd(scan: &mut Scan, len: usize) {
    scan.start += len;
    scan.len -= len;
}

/// Splits off the first `len` bytes of `rexp` as an element of `kind`.
fn cut_by_len(rexp: &mut Scan, len: usize, kind: Kind) -> Scan {
    let mut track = *rexp;
    track.kind = kind;
    track.len = len;
    fwd(rexp, len);
    track
}

/// Parses a leading ASCII decimal run, returning the value (saturating)
/// and the number of digits consumed.
pub(crate) fn leading_decimal(bytes: &[u8]) -> (usize, usize) {
    let mut value: usize = 0;
    let mut digits = 0;
    while digits < bytes.len() && bytes[digits].is_ascii_digit() {
        value = value
            .saturating_mul(10)
            .saturating_add((bytes[digits] - b'0') as usize);
        digits += 1;
    }
    (value, digits)
}

impl<'p> Compiler<'p> {
    /// Creates a new compiler for `pattern`, decoding it as UTF-8 when
    /// `utf8` is set and capping the emitted table at `size_limit`
    /// entries.
    pub fn new(pattern: &'p str, utf8: bool, size_limit: usize) -> Compiler<'p> {
        Compiler {
            pattern: pattern.as_bytes(),
            utf8,
            size_limit,
            table: Vec::new(),
        }
    }

    /// Compiles the pattern into its global modifiers and command table.
    pub fn compile(mut self) -> Result<(Mods, Vec<Entry>), Error> {
        let mut rexp = Scan {
            start: 0,
            len: self.pattern.len(),
            kind: Kind::Path,
            mods: Mods::empty(),
            loops_min: 1,
            loops_max: 1,
            index: 0,
        };
        let init_mods = rexp.mods;
        rexp.mods = self.read_mods(&mut rexp, init_mods);
        let mods = rexp.mods;

        if self.is_path(&rexp) {
            self.gen_paths(rexp)?;
        } else {
            self.gen_tracks(&mut rexp)?;
        }
        self.append(None, Cmd::End)?;
        Ok((mods, self.table))
    }

    /// Appends one entry, recording its index back into the scan so the
    /// frame can be closed later. The close-index starts out pointing at
    /// the entry itself.
    fn append(&mut self, scan: Option<&mut Scan>, cmd: Cmd) -> Result<(), Error> {
        let index = self.table.len();
        let elem = match scan {
            Some(scan) => {
                scan.index = index;
                Elem {
                    start: scan.start,
                    len: scan.len,
                    kind: scan.kind,
                    mods: scan.mods,
                    loops_min: scan.loops_min,
                    loops_max: scan.loops_max,
                }
            }
            None => Elem::none(),
        };
        self.table.push(Entry { cmd, elem, close: index });
        if self.table.len() > self.size_limit {
            return Err(Error::CompiledTooBig(self.size_limit));
        }
        Ok(())
    }

    /// Points the close-index of the entry at `index` to the next entry
    /// to be appended.
    fn close(&mut self, index: InstIdx) {
        self.table[index].close = self.table.len();
    }

    /// Emits an alternation frame: one `PathEle` per branch.
    fn gen_paths(&mut self, mut rexp: Scan) -> Result<(), Error> {
        self.append(Some(&mut rexp), Cmd::PathIni)?;

        while let Some(mut track) = self.cut_by_type(&mut rexp, Kind::Path)? {
            self.append(Some(&mut track), Cmd::PathEle)?;
            self.gen_tracks(&mut track)?;
            self.close(track.index);
        }

        self.close(rexp.index);
        self.append(None, Cmd::PathEnd)
    }

    /// Emits the commands of one branch-free pattern stretch.
    fn gen_tracks(&mut self, rexp: &mut Scan) -> Result<(), Error> {
        while let Some(mut track) = self.tracker(rexp)? {
            match track.kind {
                Kind::Hook => {
                    self.append(Some(&mut track), Cmd::HookIni)?;
                    if self.is_path(&track) {
                        self.gen_paths(track)?;
                    } else {
                        let mut body = track;
                        self.gen_tracks(&mut body)?;
                    }
                    self.close(track.index);
                    self.append(None, Cmd::HookEnd)?;
                }
                Kind::Group => {
                    self.append(Some(&mut track), Cmd::GroupIni)?;
                    if self.is_path(&track) {
                        self.gen_paths(track)?;
                    } else {
                        let mut body = track;
                        self.gen_tracks(&mut body)?;
                    }
                    self.close(track.index);
                    self.append(None, Cmd::GroupEnd)?;
                }
                Kind::Set => self.gen_set(track)?,
                Kind::Backref => self.append(Some(&mut track), Cmd::Backref)?,
                Kind::Meta => self.append(Some(&mut track), Cmd::Meta)?,
                Kind::Rangeab => self.append(Some(&mut track), Cmd::Rangeab)?,
                Kind::Utf8 => self.append(Some(&mut track), Cmd::Utf8)?,
                Kind::Point => self.append(Some(&mut track), Cmd::Point)?,
                _ => self.append(Some(&mut track), Cmd::Simple)?,
            }
        }
        Ok(())
    }

    /// Emits a character-set frame. A leading `^` toggles NEGATIVE on
    /// the frame element.
    fn gen_set(&mut self, mut rexp: Scan) -> Result<(), Error> {
        if rexp.len > 0 && self.pattern[rexp.start] == b'^' {
            fwd(&mut rexp, 1);
            rexp.mods.toggle(Mods::NEGATIVE);
        }

        self.append(Some(&mut rexp), Cmd::SetIni)?;

        while let Some(mut track) = self.tracker_set(&mut rexp)? {
            let cmd = match track.kind {
                Kind::Meta => Cmd::Meta,
                Kind::Rangeab => Cmd::Rangeab,
                Kind::Utf8 => Cmd::Utf8,
                Kind::Point => Cmd::Point,
                _ => Cmd::Simple,
            };
            self.append(Some(&mut track), cmd)?;
        }

        self.close(rexp.index);
        self.append(None, Cmd::SetEnd)
    }

    /// True when the window holds a `|` alternation at grouping depth 0.
    /// `(` and `<` open a level, `)` and `>` close one; sets and `:X`
    /// pairs are skipped atomically.
    fn is_path(&self, rexp: &Scan) -> bool {
        let mut deep = 0i32;
        let mut i = 0;
        loop {
            i += self.walk_meta(rexp.start + i, rexp.len - i);
            if i >= rexp.len {
                return false;
            }
            match self.pattern[rexp.start + i] {
                b'(' | b'<' => deep += 1,
                b')' | b'>' => deep -= 1,
                b'[' => i += self.walk_set(rexp.start + i, rexp.len - i),
                b'|' if deep == 0 => return true,
                _ => {}
            }
            i += 1;
        }
    }

    /// Cuts the next element off the front of `rexp`, then reads its
    /// repetition suffix and `#` modifier suffix.
    fn tracker(&self, rexp: &mut Scan) -> Result<Option<Scan>, Error> {
        if rexp.len == 0 {
            return Ok(None);
        }

        let b = self.pattern[rexp.start];
        let mut track = if self.utf8 && b & 0x80 != 0 {
            let width = utf8_meter(self.pattern, rexp.start).min(rexp.len);
            cut_by_len(rexp, width, Kind::Utf8)
        } else {
            match b {
                b':' => {
                    if rexp.len < 2 {
                        return Err(Error::DanglingMeta);
                    }
                    cut_by_len(rexp, 2, Kind::Meta)
                }
                b'.' => cut_by_len(rexp, 1, Kind::Point),
                b'@' => {
                    let tail = &self.pattern[rexp.start + 1..rexp.start + rexp.len];
                    let (_, digits) = leading_decimal(tail);
                    cut_by_len(rexp, 1 + digits, Kind::Backref)
                }
                b'(' => self
                    .cut_by_type(rexp, Kind::Group)?
                    .expect("BUG: group cut on a non-empty window"),
                b'<' => self
                    .cut_by_type(rexp, Kind::Hook)?
                    .expect("BUG: hook cut on a non-empty window"),
                b'[' => self
                    .cut_by_type(rexp, Kind::Set)?
                    .expect("BUG: set cut on a non-empty window"),
                _ => self.cut_simple(rexp),
            }
        };

        self.read_loops(rexp, &mut track)?;
        track.mods = self.read_mods(rexp, track.mods);
        Ok(Some(track))
    }

    /// Cuts a maximal literal run. The run ends just before the next
    /// structural byte; a repetition or modifier suffix beyond offset 1
    /// gives its preceding byte back, so the suffix applies to that one
    /// atom. A `-` at offset 1 cuts a three-byte range instead.
    fn cut_simple(&self, rexp: &mut Scan) -> Scan {
        for i in 1..rexp.len {
            let b = self.pattern[rexp.start + i];
            if self.utf8 && b & 0x80 != 0 {
                return cut_by_len(rexp, i, Kind::Simple);
            }
            match b {
                b'(' | b'<' | b'[' | b'@' | b':' | b'.' => {
                    return cut_by_len(rexp, i, Kind::Simple);
                }
                b'?' | b'+' | b'*' | b'{' | b'#' => {
                    let len = if i == 1 { 1 } else { i - 1 };
                    return cut_by_len(rexp, len, Kind::Simple);
                }
                b'-' => {
                    return if i == 1 && rexp.len >= 3 {
                        cut_by_len(rexp, 3, Kind::Rangeab)
                    } else if i == 1 {
                        // "a-" at the very end of the window
                        cut_by_len(rexp, rexp.len, Kind::Simple)
                    } else {
                        cut_by_len(rexp, i - 1, Kind::Simple)
                    };
                }
                _ => {}
            }
        }
        cut_by_len(rexp, rexp.len, Kind::Simple)
    }

    /// Cuts a bracketed frame (group, hook, set) or the next alternation
    /// branch off the front of `rexp`. Frames lose their opening byte;
    /// branches keep everything up to the `|`. `Ok(None)` means the
    /// window is exhausted.
    fn cut_by_type(&self, rexp: &mut Scan, kind: Kind) -> Result<Option<Scan>, Error> {
        if rexp.len == 0 {
            return Ok(None);
        }

        let mut track = *rexp;
        track.kind = kind;
        let mut deep = 0i32;
        let mut i = 0;
        loop {
            i += self.walk_meta(rexp.start + i, rexp.len - i);
            if i >= rexp.len {
                break;
            }
            match self.pattern[rexp.start + i] {
                b'(' | b'<' => deep += 1,
                b')' | b'>' => deep -= 1,
                b'[' => {
                    i += self.walk_set(rexp.start + i, rexp.len - i);
                    if i >= rexp.len {
                        break;
                    }
                }
                _ => {}
            }

            let at = self.pattern[rexp.start + i];
            let cut = match kind {
                Kind::Hook | Kind::Group => deep == 0,
                Kind::Set => at == b']',
                _ => deep == 0 && at == b'|',
            };
            if cut {
                track.len = i;
                fwd(rexp, i + 1);
                if kind != Kind::Path {
                    fwd(&mut track, 1);
                }
                return Ok(Some(track));
            }
            i += 1;
        }

        match kind {
            // the last branch runs to the end of the window
            Kind::Path => {
                fwd(rexp, rexp.len);
                Ok(Some(track))
            }
            Kind::Set => Err(Error::UnterminatedSet),
            _ => Err(Error::UnbalancedGroup),
        }
    }

    /// Cuts the next element of a set body. Set elements take no
    /// repetition or modifier suffixes of their own.
    fn tracker_set(&self, rexp: &mut Scan) -> Result<Option<Scan>, Error> {
        if rexp.len == 0 {
            return Ok(None);
        }

        let b = self.pattern[rexp.start];
        let mut track = if self.utf8 && b & 0x80 != 0 {
            let width = utf8_meter(self.pattern, rexp.start).min(rexp.len);
            cut_by_len(rexp, width, Kind::Utf8)
        } else {
            match b {
                b':' => {
                    if rexp.len < 2 {
                        return Err(Error::DanglingMeta);
                    }
                    cut_by_len(rexp, 2, Kind::Meta)
                }
                b'.' => cut_by_len(rexp, 1, Kind::Point),
                _ => self.cut_set_simple(rexp),
            }
        };

        track.loops_min = 1;
        track.loops_max = 1;
        Ok(Some(track))
    }

    /// The literal-run cutter for set bodies: runs break at `:X` pairs,
    /// at `.`, at multi-byte code points and at `-` ranges, and nowhere
    /// else.
    fn cut_set_simple(&self, rexp: &mut Scan) -> Scan {
        for i in 1..rexp.len {
            let b = self.pattern[rexp.start + i];
            if (self.utf8 && b & 0x80 != 0) || b == b':' || b == b'.' {
                return cut_by_len(rexp, i, Kind::Simple);
            }
            if b == b'-' {
                return if i == 1 && rexp.len >= 3 {
                    cut_by_len(rexp, 3, Kind::Rangeab)
                } else if i == 1 {
                    cut_by_len(rexp, rexp.len, Kind::Simple)
                } else {
                    cut_by_len(rexp, i - 1, Kind::Simple)
                };
            }
        }
        cut_by_len(rexp, rexp.len, Kind::Simple)
    }

    /// Reads an optional repetition suffix into the track's loop counts.
    fn read_loops(&self, rexp: &mut Scan, track: &mut Scan) -> Result<(), Error> {
        track.loops_min = 1;
        track.loops_max = 1;
        if rexp.len == 0 {
            return Ok(());
        }

        match self.pattern[rexp.start] {
            b'?' => {
                fwd(rexp, 1);
                track.loops_min = 0;
                track.loops_max = 1;
            }
            b'+' => {
                fwd(rexp, 1);
                track.loops_min = 1;
                track.loops_max = INF;
            }
            b'*' => {
                fwd(rexp, 1);
                track.loops_min = 0;
                track.loops_max = INF;
            }
            b'{' => {
                fwd(rexp, 1);
                let (min, digits) =
                    leading_decimal(&self.pattern[rexp.start..rexp.start + rexp.len]);
                if digits == 0 {
                    return Err(Error::BadRepetition);
                }
                track.loops_min = min.min(INF as usize) as u32;
                fwd(rexp, digits);

                if rexp.len > 0 && self.pattern[rexp.start] == b',' {
                    fwd(rexp, 1);
                    if rexp.len > 0 && self.pattern[rexp.start] == b'}' {
                        track.loops_max = INF;
                    } else {
                        let (max, digits) =
                            leading_decimal(&self.pattern[rexp.start..rexp.start + rexp.len]);
                        if digits == 0 {
                            return Err(Error::BadRepetition);
                        }
                        track.loops_max = max.min(INF as usize) as u32;
                        fwd(rexp, digits);
                    }
                } else {
                    track.loops_max = track.loops_min;
                }

                if rexp.len == 0 || self.pattern[rexp.start] != b'}' {
                    return Err(Error::BadRepetition);
                }
                fwd(rexp, 1);
            }
            _ => {}
        }
        Ok(())
    }

    /// Reads an optional `#`-flag run, folding the flags into `mods`.
    /// NEGATIVE never carries over from the surrounding element; only an
    /// explicit `!` sets it.
    fn read_mods(&self, rexp: &mut Scan, mods: Mods) -> Mods {
        let mut mods = mods;
        mods.remove(Mods::NEGATIVE);
        if rexp.len == 0 || self.pattern[rexp.start] != b'#' {
            return mods;
        }

        let mut pos = 1;
        while pos < rexp.len {
            match self.pattern[rexp.start + pos] {
                b'^' => mods.insert(Mods::ALPHA),
                b'$' => mods.insert(Mods::OMEGA),
                b'?' => mods.insert(Mods::LONELY),
                b'~' => mods.insert(Mods::FWD_BY_CHAR),
                b'*' => mods.insert(Mods::COMMUNISM),
                b'/' => mods.remove(Mods::COMMUNISM),
                b'!' => mods.insert(Mods::NEGATIVE),
                _ => break,
            }
            pos += 1;
        }
        fwd(rexp, pos);
        mods
    }

    /// Skips a run of `:X` pairs starting at `start`, returning how many
    /// bytes to step over.
    fn walk_meta(&self, start: usize, len: usize) -> usize {
        let mut i = 0;
        while i < len {
            if self.pattern[start + i] != b':' {
                return i;
            }
            i += 2;
        }
        len
    }

    /// Returns the offset of the `]` terminating the set that starts at
    /// `start`, skipping `:X` pairs, or `len` when the set never closes.
    fn walk_set(&self, start: usize, len: usize) -> usize {
        let mut i = 0;
        loop {
            i += self.walk_meta(start + i, len - i);
            if i >= len {
                return len;
            }
            if self.pattern[start + i] == b']' {
                return i;
            }
            i += 1;
        }
    }
}

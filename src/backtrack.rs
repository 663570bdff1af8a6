// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

// This is the backtracking matching engine. The compiled table is walked
// recursively: every command that succeeds hands control to the command
// at its close-index plus one, and the continuation of the enclosing
// frames is threaded along explicitly so that loop counts and
// alternation branches can be retried when a later command fails.
//
// Worst-case running time is exponential in the pattern size, as it is
// for any backtracker of this kind; callers with untrusted patterns
// must bound their inputs.

use memchr::memchr;

use crate::captures::Catches;
use crate::compile::leading_decimal;
use crate::input::Input;
use crate::inst::{Cmd, InstIdx, Kind, Mods};
use crate::program::Program;

/// A backtracking matching engine.
///
/// All search state is owned per call: the text cursor, the capture
/// store being filled, and a scratch stack of loop checkpoints.
#[derive(Debug)]
pub struct Backtrack<'r, 'c, 't, I> {
    prog: &'r Program,
    input: I,
    text: Text,
    catches: &'c mut Catches<'t>,
    marks: Vec<usize>,
}

/// The cursor of the current outer attempt: a window of `len` bytes
/// into the text starting at `base`, `pos` of them consumed.
#[derive(Clone, Copy, Debug)]
struct Text {
    base: usize,
    pos: usize,
    len: usize,
}

/// What happens after the current command succeeds. The chain lives on
/// the call stack, one node per open frame.
#[derive(Clone, Copy)]
enum Cont<'a> {
    /// The pattern is exhausted: report the match.
    Done,
    /// Continue with the command at this index, then the parent.
    Trek(InstIdx, &'a Cont<'a>),
    /// A group or hook body just reached its frame's end: decide
    /// whether to loop again or to leave the frame.
    Loop {
        frame: InstIdx,
        count: u32,
        /// Text position when this body iteration began, for detecting
        /// iterations that consume nothing.
        start: usize,
        /// Capture slot of the enclosing hook, if the frame captures.
        slot: Option<usize>,
        parent: &'a Cont<'a>,
    },
}

/// The state restored when a choice point abandons one alternative:
/// text position, capture count and the capture id counter.
#[derive(Clone, Copy)]
struct Saved {
    pos: usize,
    caps: usize,
    idx: usize,
}

impl<'r, 'c, 't, I: Input> Backtrack<'r, 'c, 't, I> {
    /// Runs the outer scan over the whole input, filling `catches` and
    /// returning the match count (1 or 0 under the OMEGA and LONELY
    /// global modes).
    pub fn exec(prog: &'r Program, input: I, catches: &'c mut Catches<'t>) -> usize {
        if input.as_bytes().is_empty() || prog.original.is_empty() {
            return 0;
        }
        let len = input.as_bytes().len();
        let mut b = Backtrack {
            prog,
            input,
            text: Text { base: 0, pos: 0, len },
            catches,
            marks: Vec::new(),
        };
        b.scan()
    }

    /// One iteration per candidate start position: try a match, honor
    /// the global modifiers, then advance by `forward` code units or by
    /// the matched length.
    fn scan(&mut self) -> usize {
        let total = self.input.as_bytes().len();
        let bound = if self.prog.mods.contains(Mods::ALPHA) {
            1
        } else {
            total
        };

        let mut result = 0;
        let mut i = 0;
        while i < bound {
            let mut forward = self.input.width(i);
            self.catches.restart();
            let mark = self.catches.mark();
            self.text = Text { base: i, pos: 0, len: total - i };

            if self.trek(0, &Cont::Done) {
                if self.prog.mods.contains(Mods::OMEGA) {
                    if self.text.pos == self.text.len {
                        return 1;
                    }
                    if I::UTF8 {
                        self.catches.clear();
                    }
                } else if self.prog.mods.contains(Mods::LONELY) {
                    return 1;
                } else if self.prog.mods.contains(Mods::FWD_BY_CHAR) || self.text.pos == 0 {
                    result += 1;
                } else {
                    forward = self.text.pos;
                    result += 1;
                }
            } else {
                self.catches.rewind(mark, 1);
            }
            i += forward;
        }
        result
    }

    /// Dispatches the command at `index`. Reaching any frame-closing
    /// command means the current frame's body is done, so control
    /// resumes with the continuation.
    fn trek(&mut self, index: InstIdx, cont: &Cont<'_>) -> bool {
        match self.prog.table[index].cmd {
            Cmd::End
            | Cmd::PathEle
            | Cmd::PathEnd
            | Cmd::GroupEnd
            | Cmd::HookEnd
            | Cmd::SetEnd => self.resume(cont),
            Cmd::PathIni => self.walker(index, cont),
            Cmd::GroupIni => {
                if self.elem_mods(index).contains(Mods::NEGATIVE) {
                    self.negate(index, None, cont)
                } else {
                    self.loop_group(index, 0, None, cont)
                }
            }
            Cmd::HookIni => {
                let saved = self.save();
                let slot = self.catches.open(self.abs());
                let ok = if self.elem_mods(index).contains(Mods::NEGATIVE) {
                    self.negate(index, slot, cont)
                } else {
                    self.loop_group(index, 0, slot, cont)
                };
                if !ok {
                    self.restore(saved);
                }
                ok
            }
            _ => self.looper(index, cont),
        }
    }

    /// Re-enters the continuation chain after a command or a frame body
    /// has succeeded.
    fn resume(&mut self, cont: &Cont<'_>) -> bool {
        match *cont {
            Cont::Done => true,
            Cont::Trek(index, parent) => self.trek(index, parent),
            Cont::Loop { frame, count, start, slot, parent } => {
                if self.text.pos == start {
                    // the body consumed nothing, so every further
                    // iteration would too: the count is as good as the
                    // bound
                    let max = self.prog.table[frame].elem.loops_max;
                    self.leave_loop(frame, count.max(max), slot, parent)
                } else {
                    self.loop_group(frame, count, slot, parent)
                }
            }
        }
    }

    /// The alternation walker: try each branch in source order against
    /// the continuation past the frame, restoring state between tries.
    fn walker(&mut self, index: InstIdx, cont: &Cont<'_>) -> bool {
        let saved = self.save();
        let after = Cont::Trek(self.prog.table[index].close + 1, cont);
        let mut ele = index + 1;
        while self.prog.table[ele].cmd == Cmd::PathEle {
            if self.trek(ele + 1, &after) {
                return true;
            }
            self.restore(saved);
            ele = self.prog.table[ele].close;
        }
        false
    }

    /// The group/hook loop, greedy: take one more body iteration when
    /// the bound allows, and fall back to leaving the frame with the
    /// iterations already taken when that fails.
    fn loop_group(
        &mut self,
        frame: InstIdx,
        count: u32,
        slot: Option<usize>,
        parent: &Cont<'_>,
    ) -> bool {
        if count < self.prog.table[frame].elem.loops_max {
            let saved = self.save();
            let again = Cont::Loop {
                frame,
                count: count + 1,
                start: self.text.pos,
                slot,
                parent,
            };
            if self.trek(frame + 1, &again) {
                return true;
            }
            self.restore(saved);
        }
        self.leave_loop(frame, count, slot, parent)
    }

    /// Leaves a group/hook frame after `count` body iterations: close
    /// the capture at the current position and continue past the frame.
    fn leave_loop(
        &mut self,
        frame: InstIdx,
        count: u32,
        slot: Option<usize>,
        parent: &Cont<'_>,
    ) -> bool {
        if count < self.prog.table[frame].elem.loops_min {
            return false;
        }
        let saved = self.save();
        if let Some(slot) = slot {
            self.catches.close(slot, self.abs());
        }
        if self.trek(self.prog.table[frame].close + 1, parent) {
            return true;
        }
        self.restore(saved);
        false
    }

    /// A negated group/hook: probe the body at successive positions,
    /// consuming one code unit per position where it does not match,
    /// and stop at the first position where it does.
    fn negate(&mut self, frame: InstIdx, slot: Option<usize>, cont: &Cont<'_>) -> bool {
        let elem = self.prog.table[frame].elem;
        let saved = self.save();

        let mut loops = 0;
        let mut probe = self.text.pos;
        while loops < elem.loops_max && probe < self.text.len {
            self.text.pos = probe;
            if self.trek(frame + 1, &Cont::Done) {
                break;
            }
            probe += self.width_at(probe);
            loops += 1;
        }
        self.text.pos = probe;

        if loops >= elem.loops_min {
            if let Some(slot) = slot {
                self.catches.close(slot, self.abs());
            }
            if self.trek(self.prog.table[frame].close + 1, cont) {
                return true;
            }
        }
        self.restore(saved);
        false
    }

    /// The atomic looper. Positive elements are consumed greedily up to
    /// the bound, then given back one repetition at a time while the
    /// continuation keeps failing. Negative elements consume one code
    /// unit per failed probe and stop at the first hit, like negated
    /// groups.
    fn looper(&mut self, index: InstIdx, cont: &Cont<'_>) -> bool {
        let elem = self.prog.table[index].elem;
        let close = self.prog.table[index].close + 1;
        let saved = self.save();

        if elem.mods.contains(Mods::NEGATIVE) {
            let mut loops = 0;
            while loops < elem.loops_max
                && self.text.pos < self.text.len
                && self.match_atom(index) == 0
            {
                self.text.pos += self.width_here();
                loops += 1;
            }
            if loops >= elem.loops_min && self.trek(close, cont) {
                return true;
            }
            self.restore(saved);
            false
        } else {
            let base = self.marks.len();
            self.marks.push(self.text.pos);
            let mut loops: u32 = 0;
            while loops < elem.loops_max && self.text.pos < self.text.len {
                let steps = self.match_atom(index);
                if steps == 0 {
                    break;
                }
                self.text.pos += steps;
                self.marks.push(self.text.pos);
                loops += 1;
            }

            let mut ok = false;
            for taken in (elem.loops_min..=loops).rev() {
                self.restore(saved);
                self.text.pos = self.marks[base + taken as usize];
                if self.trek(close, cont) {
                    ok = true;
                    break;
                }
            }
            self.marks.truncate(base);
            if !ok {
                self.restore(saved);
            }
            ok
        }
    }

    /// The atomic matchers: how many bytes the element at `index` eats
    /// at the cursor, 0 when it does not match there.
    fn match_atom(&self, index: InstIdx) -> usize {
        match self.prog.table[index].elem.kind {
            Kind::Point => self.width_here(),
            Kind::Set => self.match_set(index),
            Kind::Backref => self.match_backref(index),
            Kind::Rangeab => self.match_range(index),
            Kind::Meta => self.match_meta(index),
            _ => self.match_text(index),
        }
    }

    /// Length-bounded byte equality for literal runs and UTF-8 atoms.
    fn match_text(&self, index: InstIdx) -> usize {
        let elem = &self.prog.table[index].elem;
        let lit = &self.prog.original.as_bytes()[elem.start..elem.start + elem.len];
        let text = self.rest();
        if text.len() < lit.len() {
            return 0;
        }
        let head = &text[..lit.len()];
        let eq = if elem.mods.contains(Mods::COMMUNISM) {
            head.eq_ignore_ascii_case(lit)
        } else {
            head == lit
        };
        if eq {
            lit.len()
        } else {
            0
        }
    }

    /// `:X` dispatch. Positive classes eat one byte; negated classes
    /// and `:&` eat a whole code unit, so `:A` steps over an entire
    /// multi-byte code point. Any other X means literal equality.
    fn match_meta(&self, index: InstIdx) -> usize {
        let elem = &self.prog.table[index].elem;
        let meta = self.prog.original.as_bytes()[elem.start + 1];
        let byte = self.byte_here();
        match meta {
            b'a' => byte.is_ascii_alphabetic() as usize,
            b'A' => {
                if byte.is_ascii_alphabetic() {
                    0
                } else {
                    self.width_here()
                }
            }
            b'd' => byte.is_ascii_digit() as usize,
            b'D' => {
                if byte.is_ascii_digit() {
                    0
                } else {
                    self.width_here()
                }
            }
            b'w' => byte.is_ascii_alphanumeric() as usize,
            b'W' => {
                if byte.is_ascii_alphanumeric() {
                    0
                } else {
                    self.width_here()
                }
            }
            b's' => byte.is_ascii_whitespace() as usize,
            b'S' => {
                if byte.is_ascii_whitespace() {
                    0
                } else {
                    self.width_here()
                }
            }
            b'&' if I::UTF8 => {
                if byte & 0x80 != 0 {
                    self.width_here()
                } else {
                    0
                }
            }
            _ => (byte == meta) as usize,
        }
    }

    /// `a-b` comparison on the byte at the cursor, folded under
    /// COMMUNISM.
    fn match_range(&self, index: InstIdx) -> usize {
        let elem = &self.prog.table[index].elem;
        let range = &self.prog.original.as_bytes()[elem.start..elem.start + elem.len];
        let byte = self.byte_here();
        let hit = if elem.mods.contains(Mods::COMMUNISM) {
            let b = byte.to_ascii_lowercase();
            b >= range[0].to_ascii_lowercase() && b <= range[2].to_ascii_lowercase()
        } else {
            byte >= range[0] && byte <= range[2]
        };
        hit as usize
    }

    /// A set succeeds when any child matches the code unit at the
    /// cursor, consuming whatever that child consumes (one code unit).
    /// Inverted sets go through the negative looper instead.
    fn match_set(&self, index: InstIdx) -> usize {
        let byte = self.byte_here();
        let mut child = index + 1;
        while self.prog.table[child].cmd != Cmd::SetEnd {
            let steps = match self.prog.table[child].cmd {
                Cmd::Rangeab | Cmd::Meta | Cmd::Utf8 | Cmd::Point => self.match_atom(child),
                _ => {
                    let elem = &self.prog.table[child].elem;
                    let lit = &self.prog.original.as_bytes()[elem.start..elem.start + elem.len];
                    let hit = if elem.mods.contains(Mods::COMMUNISM) {
                        lit.iter().any(|b| b.eq_ignore_ascii_case(&byte))
                    } else {
                        memchr(byte, lit).is_some()
                    };
                    hit as usize
                }
            };
            if steps > 0 {
                return steps;
            }
            child += 1;
        }
        0
    }

    /// `@N`: length-bounded equality against the latest closed capture
    /// with id N. COMMUNISM folds the comparison in single-byte mode
    /// only.
    fn match_backref(&self, index: InstIdx) -> usize {
        let elem = &self.prog.table[index].elem;
        let pat = self.prog.original.as_bytes();
        let (id, _) = leading_decimal(&pat[elem.start + 1..elem.start + elem.len]);
        let (start, len) = match self.catches.last_id(id) {
            Some(span) => span,
            None => return 0,
        };
        if len == 0 {
            return 0;
        }
        let caught = &self.input.as_bytes()[start..start + len];
        let text = self.rest();
        if text.len() < len {
            return 0;
        }
        let head = &text[..len];
        let eq = if !I::UTF8 && elem.mods.contains(Mods::COMMUNISM) {
            head.eq_ignore_ascii_case(caught)
        } else {
            head == caught
        };
        if eq {
            len
        } else {
            0
        }
    }

    #[inline]
    fn elem_mods(&self, index: InstIdx) -> Mods {
        self.prog.table[index].elem.mods
    }

    #[inline]
    fn save(&self) -> Saved {
        Saved {
            pos: self.text.pos,
            caps: self.catches.mark(),
            idx: self.catches.next_id(),
        }
    }

    #[inline]
    fn restore(&mut self, saved: Saved) {
        self.text.pos = saved.pos;
        self.catches.rewind(saved.caps, saved.idx);
    }

    /// The absolute byte offset of the cursor in the whole text.
    #[inline]
    fn abs(&self) -> usize {
        self.text.base + self.text.pos
    }

    /// The unconsumed remainder of the current window.
    #[inline]
    fn rest(&self) -> &[u8] {
        &self.input.as_bytes()[self.abs()..self.text.base + self.text.len]
    }

    /// The byte at the cursor; callers guarantee `pos < len`.
    #[inline]
    fn byte_here(&self) -> u8 {
        self.input.as_bytes()[self.abs()]
    }

    #[inline]
    fn width_here(&self) -> usize {
        self.input.width(self.abs())
    }

    #[inline]
    fn width_at(&self, pos: usize) -> usize {
        self.input.width(self.text.base + pos)
    }
}

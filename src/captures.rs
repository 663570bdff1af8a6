// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::str;

use memchr::memchr;

use crate::compile::leading_decimal;

/// The most capture slots one search will hold, the whole-input slot
/// included. Captures opened beyond the cap are silently dropped.
pub const MAX_CATCHS: usize = 16;

/// One capture: where it starts in the text, how long it is once its
/// hook has closed, and the id its hook was assigned.
#[derive(Clone, Copy, Debug)]
struct Slot {
    start: usize,
    len: Option<usize>,
    id: usize,
}

/// The captures and match count produced by one search.
///
/// Slot 0 always holds the whole input under id 0; hooks fill slots 1
/// and up in the order they open, with ids counted from 1 and restarting
/// at every candidate start position, so the same hook produces the same
/// id across repeated matches. Readers mirror the engine's accessors:
/// any index outside `1..=tot()` (slot 0 included) yields an
/// empty/zero/`None` sentinel.
#[derive(Clone, Debug)]
pub struct Catches<'t> {
    text: &'t [u8],
    slots: Vec<Slot>,
    idx: usize,
    count: usize,
}

impl<'t> Catches<'t> {
    pub(crate) fn new(text: &'t str) -> Catches<'t> {
        let text = text.as_bytes();
        Catches {
            text,
            slots: vec![Slot { start: 0, len: Some(text.len()), id: 0 }],
            idx: 1,
            count: 0,
        }
    }

    /// Starts a fresh outer attempt: capture ids restart at 1.
    pub(crate) fn restart(&mut self) {
        self.idx = 1;
    }

    /// The current number of slots, used to rewind failed branches.
    pub(crate) fn mark(&self) -> usize {
        self.slots.len()
    }

    /// The id the next hook will take.
    pub(crate) fn next_id(&self) -> usize {
        self.idx
    }

    /// Rewinds to a previously observed (slot count, id counter) pair.
    pub(crate) fn rewind(&mut self, mark: usize, idx: usize) {
        self.slots.truncate(mark);
        self.idx = idx;
    }

    /// Drops every capture, keeping the whole-input slot.
    pub(crate) fn clear(&mut self) {
        self.slots.truncate(1);
    }

    /// Opens a capture at `start`, returning its slot, or `None` when
    /// the store is full (the capture is then dropped, not an error).
    pub(crate) fn open(&mut self, start: usize) -> Option<usize> {
        if self.slots.len() < MAX_CATCHS {
            let slot = self.slots.len();
            self.slots.push(Slot { start, len: None, id: self.idx });
            self.idx += 1;
            Some(slot)
        } else {
            None
        }
    }

    /// Closes the capture in `slot` at text offset `end`.
    pub(crate) fn close(&mut self, slot: usize, end: usize) {
        let s = &mut self.slots[slot];
        s.len = Some(end - s.start);
    }

    /// The latest slot captured under `id`, as (start, len), or `None`
    /// when no such capture has closed yet.
    pub(crate) fn last_id(&self, id: usize) -> Option<(usize, usize)> {
        let slot = self.slots[1..].iter().rev().find(|s| s.id == id)?;
        Some((slot.start, slot.len?))
    }

    pub(crate) fn set_count(&mut self, count: usize) {
        self.count = count;
    }

    /// The number of matches the search found. Under the `#?` or `#$`
    /// global modes this is 1 or 0.
    pub fn count(&self) -> usize {
        self.count
    }

    /// The number of captures taken by the search.
    pub fn tot(&self) -> usize {
        self.slots.len() - 1
    }

    /// The byte offset where capture `i` starts, when `i` names one.
    pub fn gps(&self, i: usize) -> Option<usize> {
        if i > 0 && i < self.slots.len() {
            Some(self.slots[i].start)
        } else {
            None
        }
    }

    /// The byte length of capture `i`, 0 out of range.
    pub fn len(&self, i: usize) -> usize {
        if i > 0 && i < self.slots.len() {
            self.slots[i].len.unwrap_or(0)
        } else {
            0
        }
    }

    /// The raw bytes of capture `i`, empty out of range.
    pub fn get_bytes(&self, i: usize) -> &'t [u8] {
        match self.gps(i) {
            Some(start) => &self.text[start..start + self.len(i)],
            None => &[],
        }
    }

    /// The text of capture `i` when its span is valid UTF-8 (always the
    /// case in UTF-8 mode), "" otherwise.
    pub fn get(&self, i: usize) -> &'t str {
        str::from_utf8(self.get_bytes(i)).unwrap_or("")
    }

    /// One copy of the searched text with every capture of `id`
    /// replaced by `rpl`, in capture order.
    pub fn rpl(&self, rpl: &str, id: usize) -> String {
        let mut out = Vec::with_capacity(self.text.len() + rpl.len());
        let mut last = 0;
        for slot in &self.slots[1..] {
            if slot.id != id {
                continue;
            }
            // nested same-id captures overlap the span already written
            if last > slot.start {
                last = slot.start;
            }
            out.extend_from_slice(&self.text[last..slot.start]);
            out.extend_from_slice(rpl.as_bytes());
            last = slot.start + slot.len.unwrap_or(0);
        }
        out.extend_from_slice(&self.text[last..]);
        String::from_utf8_lossy(&out).into_owned()
    }

    /// Renders `template`, substituting each `#N` by the bytes of
    /// capture N and each `##` by a literal `#`. Indices with no capture
    /// substitute nothing.
    pub fn put(&self, template: &str) -> String {
        let tpl = template.as_bytes();
        let mut out = Vec::with_capacity(tpl.len());
        let mut at = 0;
        while at < tpl.len() {
            match memchr(b'#', &tpl[at..]) {
                None => {
                    out.extend_from_slice(&tpl[at..]);
                    break;
                }
                Some(off) => {
                    out.extend_from_slice(&tpl[at..at + off]);
                    at += off + 1;
                    if tpl.get(at) == Some(&b'#') {
                        out.push(b'#');
                        at += 1;
                    } else {
                        let (index, digits) = leading_decimal(&tpl[at..]);
                        out.extend_from_slice(self.get_bytes(index));
                        at += digits;
                    }
                }
            }
        }
        String::from_utf8_lossy(&out).into_owned()
    }
}

// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use regexp4::{regexp4, Error, Regexp4, MAX_CATCHS};

// One test per scenario: how often the pattern matches in the text,
// searching in UTF-8 mode.
macro_rules! cnt {
    ($name:ident, $re:expr, $text:expr, $count:expr) => {
        #[test]
        fn $name() {
            assert_eq!(
                regexp4($text, $re),
                $count,
                "pattern {:?} over {:?}",
                $re,
                $text
            );
        }
    };
}

// The same, searching byte by byte.
macro_rules! bcnt {
    ($name:ident, $re:expr, $text:expr, $count:expr) => {
        #[test]
        fn $name() {
            let re = Regexp4::single_byte($re).unwrap();
            assert_eq!(
                re.matches($text),
                $count,
                "byte pattern {:?} over {:?}",
                $re,
                $text
            );
        }
    };
}

// Count plus the full list of captures, in slot order.
macro_rules! caps {
    ($name:ident, $re:expr, $text:expr, $count:expr, [$($cap:expr),*]) => {
        #[test]
        fn $name() {
            let re = Regexp4::new($re).unwrap();
            let caught = re.search($text);
            assert_eq!(caught.count(), $count, "count of {:?} over {:?}", $re, $text);
            let expect: &[&str] = &[$($cap),*];
            assert_eq!(caught.tot(), expect.len(), "tot of {:?} over {:?}", $re, $text);
            for (i, want) in expect.iter().enumerate() {
                assert_eq!(caught.get(i + 1), *want, "capture {} of {:?}", i + 1, $re);
            }
        }
    };
}

macro_rules! noparse {
    ($name:ident, $re:expr) => {
        #[test]
        fn $name() {
            assert!(
                Regexp4::new($re).is_err(),
                "{:?} should fail to compile",
                $re
            );
        }
    };
}

// literals and repetition
cnt!(lit, "foo.bar", "foo.bar", 1);
cnt!(lit_miss, "foo", "FooBar", 0);
cnt!(plus_whole, "a+", "aaa", 1);
cnt!(question, "a?b", "ab", 1);
cnt!(question_empty, "a?b", "b", 1);
cnt!(point_each, ".?", "hola", 4);
cnt!(star_whole, ".*", "hola", 1);
cnt!(counted, "a{2}ab", "aaab", 1);
cnt!(counted_range, "a{2,3}b", "aaab", 1);
cnt!(counted_open, "h{1,}", "hola", 1);
cnt!(counted_open_more, "h{2,}", "hhhola", 1);
cnt!(counted_zero, "a{0}b", "b", 1);
cnt!(min_above_max, "a{2,1}b", "ab", 0);

// backtracking through repetitions and branches
cnt!(greedy_gives_back, "a+a", "aaa", 1);
cnt!(branch_retried, "(a|ab)c", "abc", 1);
cnt!(group_loop_gives_back, "(a+)ab", "aaab", 1);
cnt!(empty_body_loop, "(a?){3}", "b", 1);
cnt!(empty_body_star, "(a?)*", "b", 1);

// alternation
cnt!(alt_simple, "a|b", "xay", 1);
cnt!(alt_grouped, "h(ola|ello)", "hola hello", 2);
cnt!(alt_nested, "<a(b|c)>d", "acd", 1);
cnt!(alt_empty_tail, "x|", "abc", 0);
cnt!(alt_empty_head, "|x", "abc", 3);

// metacharacters
cnt!(meta_digit_alpha, ":d:a", "1a2b3c", 3);
cnt!(meta_space, ":s", "hola mundo", 1);
cnt!(meta_literal, ":b", "hola mundo", 0);
cnt!(meta_nondigit, ":D+", "añb", 1);

// sets
cnt!(set_member, "[abc]", "xay", 1);
cnt!(set_negated, "[^abc]", "xy", 2);
cnt!(set_range, "0x[0-9A-F]+", "0x1F", 1);
cnt!(set_range_folded, "#*0X[0-9a-f]+", "0x1f", 1);
cnt!(set_neg_plus, "[^aeiou]+", "tres", 2);
cnt!(set_neg_star, "[^aeiou]*", "tres", 3);
cnt!(set_neg_all_vowels, "[^aeiou]*", "aeiou", 5);
cnt!(set_neg_counted, "[^y]{2}", "xxxyy", 1);
cnt!(set_point, "[.]", "qqq", 3);
cnt!(set_lower, "[a-z]+", "hello", 1);
cnt!(set_lower_folded, "#*[a-z]+", "heLLo", 1);

// ranges outside sets
cnt!(range_hit, "a-c", "b", 1);
cnt!(range_scan, "a-c", "a-c b", 3);
cnt!(range_miss, "a-c", "xyz", 0);

// global modifiers
cnt!(alpha_hit, "#^a", "abc", 1);
cnt!(alpha_miss, "#^b", "abc", 0);
cnt!(omega_tail, "#$c", "abc", 1);
cnt!(anchored_both, "#^$abc", "abc", 1);
cnt!(anchored_both_short, "#^$ab", "abc", 0);
cnt!(lonely_first, "#?a", "aaa", 1);
cnt!(fwd_by_char, "#~a+", "aaa", 3);
cnt!(fold_on, "#*foo", "FooBar", 1);
cnt!(fold_group, "#*(ab){2}", "AbAb", 1);
cnt!(fold_off_suffix, "#*a#/", "A", 0);
cnt!(fold_off_suffix_lower, "#*a#/", "a", 1);
cnt!(literal_hash, "##a", "#a", 1);

// negation as a mode
cnt!(neg_atom, "a*#!a", "xxxa", 1);
cnt!(neg_group, "(ab)*#!ab", "xxxab", 1);

// back-references
cnt!(backref_undefined, "@1", "abc", 0);
cnt!(backref_pairs, "<:a+>=@1", "ab=ab cd=cd", 2);
caps!(backref_capture, "<:w+>@1", "abcabc", 1, ["abc"]);
caps!(backref_spaced, "<:w+> @1", "abc abc", 1, ["abc"]);

// captures
caps!(two_words, "<:w+> <:w+>", "hello world", 1, ["hello", "world"]);
caps!(assignment, "<:a>=<:d+>;", "x=42;", 1, ["x", "42"]);
caps!(every_word, "<:w+>", "ab ab", 2, ["ab", "ab"]);
caps!(alt_hooks, "<x>|<y>", "xy", 2, ["x", "y"]);
caps!(alt_hooks_second, "<x>|<y>", "y", 1, ["y"]);

// UTF-8 metering
cnt!(utf8_point, "ni.o", "niño", 1);
cnt!(utf8_point_single, ".", "ñ", 1);
cnt!(utf8_any_multibyte, "ni:&o", "niño", 1);
cnt!(utf8_neg_meta, "ni:Ao", "niño", 1);
cnt!(utf8_literal, "niño", "el niño", 1);
cnt!(utf8_amp, ":&", "añb", 1);

// byte-oriented searching
bcnt!(byte_point, ".", "ñ", 2);
bcnt!(byte_literal_multibyte, "ñ", "añb", 1);
bcnt!(byte_amp_literal, ":&", "a&b", 1);
bcnt!(byte_amp_no_meta, ":&", "añb", 0);
bcnt!(byte_open_bound, "h{2,}", "hhh", 1);

// boundaries
cnt!(empty_text, "a", "", 0);
cnt!(empty_pattern, "", "abc", 0);

// malformed patterns are compile errors, and the one-shot entry point
// counts them as no match
noparse!(open_group, "(a");
noparse!(open_hook, "<a");
noparse!(crossed_group, "<a(b>");
noparse!(open_set, "[ab");
noparse!(brace_no_digits, "a{x}");
noparse!(brace_unclosed, "a{2");
noparse!(dangling_meta, "ab:");
cnt!(bad_pattern_counts_zero, "(a", "aaa", 0);

#[test]
fn capture_positions() {
    let re = Regexp4::new("<:w+> <:w+>").unwrap();
    let caught = re.search("hello world");
    assert_eq!(caught.gps(1), Some(0));
    assert_eq!(caught.len(1), 5);
    assert_eq!(caught.gps(2), Some(6));
    assert_eq!(caught.len(2), 5);
    assert_eq!(caught.gps(0), None);
    assert_eq!(caught.gps(9), None);
    assert_eq!(caught.len(9), 0);
    assert_eq!(caught.get(9), "");
}

#[test]
fn nested_hooks_span_loops() {
    let re = Regexp4::new("<<a>b>{2}").unwrap();
    let caught = re.search("abab");
    assert_eq!(caught.count(), 1);
    assert_eq!(caught.tot(), 3);
    assert_eq!(caught.get(1), "abab");
    assert_eq!(caught.get(2), "a");
    assert_eq!(caught.get(3), "a");
}

#[test]
fn group_loop_reopens_hooks() {
    let re = Regexp4::new("(<:a><:d>){2}").unwrap();
    let caught = re.search("a1b2");
    assert_eq!(caught.count(), 1);
    assert_eq!(caught.tot(), 4);
    let got: Vec<&str> = (1..=4).map(|i| caught.get(i)).collect();
    assert_eq!(got, vec!["a", "1", "b", "2"]);
}

#[test]
fn utf8_set_captures() {
    let re = Regexp4::new("<[:&:a]+>").unwrap();
    let caught = re.search("café ole");
    assert_eq!(caught.count(), 2);
    assert_eq!(caught.get(1), "café");
    assert_eq!(caught.get(2), "ole");
}

#[test]
fn put_template() {
    let re = Regexp4::new("<:a>=<:d+>;").unwrap();
    let caught = re.search("x=42;");
    assert_eq!(caught.put("##N=#2"), "#N=42");
    assert_eq!(caught.put("#1 := #2"), "x := 42");
    assert_eq!(caught.put("#7 and #0"), " and ");
}

#[test]
fn rpl_every_match_of_an_id() {
    let re = Regexp4::new("<:w+>").unwrap();
    let caught = re.search("ab ab");
    assert_eq!(caught.count(), 2);
    assert_eq!(caught.rpl("X", 1), "X X");
    // an id nothing captured leaves the text alone
    assert_eq!(caught.rpl("X", 7), "ab ab");
}

#[test]
fn omega_keeps_captures_in_byte_mode() {
    let re = Regexp4::single_byte("#$<ab>c?").unwrap();
    let caught = re.search("abcab");
    assert_eq!(caught.count(), 1);
    assert_eq!(caught.tot(), 2);
}

#[test]
fn omega_clears_captures_in_utf8_mode() {
    let re = Regexp4::new("#$<ab>c?").unwrap();
    let caught = re.search("abcab");
    assert_eq!(caught.count(), 1);
    assert_eq!(caught.tot(), 1);
    assert_eq!(caught.gps(1), Some(3));
}

#[test]
fn capture_cap_drops_excess() {
    let re = Regexp4::new(&"<a>".repeat(20)).unwrap();
    let haystack = "a".repeat(20);
    let caught = re.search(&haystack);
    assert_eq!(caught.count(), 1);
    assert_eq!(caught.tot(), MAX_CATCHS - 1);
}

#[test]
fn size_limit_is_enforced() {
    assert_eq!(
        Regexp4::with_size_limit("(a)(b)", 3, false).unwrap_err(),
        Error::CompiledTooBig(3)
    );
    assert!(Regexp4::with_size_limit("(a)(b)", 16, false).is_ok());
}

#[test]
fn fold_backref_single_byte_only() {
    let byte = Regexp4::single_byte("#*<:a+>=@1").unwrap();
    assert_eq!(byte.matches("ab=AB"), 1);
    let utf8 = Regexp4::new("#*<:a+>=@1").unwrap();
    assert_eq!(utf8.matches("ab=AB"), 0);
}

#[test]
fn error_variants() {
    assert_eq!(Regexp4::new("(a").unwrap_err(), Error::UnbalancedGroup);
    assert_eq!(Regexp4::new("[a").unwrap_err(), Error::UnterminatedSet);
    assert_eq!(Regexp4::new("a{,}").unwrap_err(), Error::BadRepetition);
    assert_eq!(Regexp4::new("a:").unwrap_err(), Error::DanglingMeta);
}

#[test]
fn pattern_round_trip() {
    let re = Regexp4::new("<:w+> <:w+>").unwrap();
    assert_eq!(re.as_str(), "<:w+> <:w+>");
    assert!(re.is_match("hello world"));
    assert!(!re.is_match("hello"));
}

#[test]
fn search_state_is_per_call() {
    let re = Regexp4::new("<:w+>").unwrap();
    let first = re.search("one");
    let second = re.search("two");
    assert_eq!(first.get(1), "one");
    assert_eq!(second.get(1), "two");
}

use std::collections::HashSet;

use super::*;
use crate::error::{ErrorKind, MaskError, SyntaxError};
use crate::limits::Limits;
use crate::transport::PackedBuffer;

fn pattern(mask: &str) -> Pattern {
    Pattern::new(mask).expect("mask should compile")
}

fn collect_all(mask: &str) -> Vec<String> {
    let mut p = pattern(mask);
    let mut out: Vec<String> = Vec::new();
    let emitted = p.collect(&mut out).expect("collect should succeed");
    assert_eq!(emitted, p.count());
    assert_eq!(out.len() as u64, p.count());
    out
}

#[test]
fn test_literal_only_mask() {
    let p = pattern("just/a/literal.txt");
    assert_eq!(p.count(), 1);
    assert_eq!(collect_all("just/a/literal.txt"), ["just/a/literal.txt"]);
}

#[test]
fn test_empty_mask_yields_one_empty_string() {
    assert_eq!(pattern("").count(), 1);
    assert_eq!(collect_all(""), [""]);
}

#[test]
fn test_alternatives_in_declared_order() {
    let p = pattern("(a|b|c)");
    assert_eq!(p.count(), 3);
    assert_eq!(collect_all("(a|b|c)"), ["a", "b", "c"]);
}

#[test]
fn test_class_power() {
    let out = collect_all("[a-c]{2}");
    assert_eq!(out.len(), 9);
    let unique: HashSet<&String> = out.iter().collect();
    assert_eq!(unique.len(), 9);
    for a in ['a', 'b', 'c'] {
        for b in ['a', 'b', 'c'] {
            assert!(out.contains(&format!("{a}{b}")));
        }
    }
}

#[test]
fn test_class_zero_to_two() {
    let out = collect_all("[0-1]{0,2}");
    assert_eq!(out, ["", "0", "1", "00", "01", "10", "11"]);
}

#[test]
fn test_zero_zero_modifier() {
    for mask in ["(a|b){0,0}", "[a-z]{0,0}", "[num]{0}"] {
        let p = pattern(mask);
        assert_eq!(p.nodes()[0].count(), 1, "{mask}");
        assert_eq!(collect_all(mask), [""], "{mask}");
    }
}

#[test]
fn test_composition_law() {
    let a = "(x|y|z)";
    let b = "[0-3]{1,2}";
    let ab = format!("{a}{b}");
    assert_eq!(pattern(&ab).count(), pattern(a).count() * pattern(b).count());

    let out = collect_all(&ab);
    let expected: Vec<String> = collect_all(a)
        .iter()
        .flat_map(|x| collect_all(b).into_iter().map(move |y| format!("{x}{y}")))
        .collect();
    assert_eq!(out, expected);
}

#[test]
fn test_tail_varies_fastest() {
    let out = collect_all("[a-b]-(1|2)");
    assert_eq!(out, ["a-1", "a-2", "b-1", "b-2"]);
}

#[test]
fn test_collect_is_reproducible() {
    let mut p = pattern("(lo|hi)[hex]{1,2}_[0-2]");
    let mut first: Vec<String> = Vec::new();
    p.collect(&mut first).unwrap();
    p.seek(17).unwrap();
    p.reset();
    let mut second: Vec<String> = Vec::new();
    p.collect(&mut second).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_collect_restarts_from_any_cursor_state() {
    let mut p = pattern("[a-c](x|y)");
    p.seek(3).unwrap();
    let mut out: Vec<String> = Vec::new();
    p.collect(&mut out).unwrap();
    assert_eq!(out, ["ax", "ay", "bx", "by", "cx", "cy"]);
}

#[test]
fn test_every_output_is_a_combination() {
    let p = pattern("id(a|bb)[0-1]{0,1}z");
    let alternatives = ["a", "bb"];
    let suffixes = ["", "0", "1"];
    let out = collect_all("id(a|bb)[0-1]{0,1}z");
    assert_eq!(out.len() as u64, p.count());
    for s in &out {
        let body = s
            .strip_prefix("id")
            .and_then(|s| s.strip_suffix('z'))
            .expect("literal segments are kept");
        assert!(
            alternatives
                .iter()
                .any(|alt| body.strip_prefix(alt).is_some_and(|rest| suffixes.contains(&rest))),
            "{s} is not a combination"
        );
    }
}

#[test]
fn test_distinct_combinations_may_repeat_text() {
    // (a|aa){2} has four combinations but only three distinct strings
    let out = collect_all("(a|aa){2}");
    assert_eq!(out, ["aa", "aaa", "aaa", "aaaa"]);
}

#[test]
fn test_combinations_match_collect() {
    let mask = "[x-z]{0,2}(-|+)";
    let p = pattern(mask);
    let lazy: Vec<String> = p.combinations().collect();
    assert_eq!(lazy, collect_all(mask));
}

#[test]
fn test_partitions_concatenate_to_full_run() {
    let mask = "(a|b|c)[num]";
    let full = collect_all(mask);
    let mut p = pattern(mask);
    let mut joined: Vec<String> = Vec::new();
    for range in p.partition(7) {
        p.collect_range(range, &mut joined).unwrap();
    }
    assert_eq!(joined, full);
}

#[test]
fn test_independent_workers() {
    let mask = "[alpha]{2}";
    let full = collect_all(mask);
    let ranges: Vec<_> = pattern(mask).partition(4).collect();
    let chunks: Vec<Vec<String>> = std::thread::scope(|s| {
        let handles: Vec<_> = ranges
            .into_iter()
            .map(|range| {
                s.spawn(move || {
                    let mut worker = pattern(mask);
                    let mut out: Vec<String> = Vec::new();
                    worker.collect_range(range, &mut out).unwrap();
                    out
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(chunks.concat(), full);
}

#[test]
fn test_packed_collect() {
    let mut p = pattern("(a|bcd)[0-1]");
    let mut packed = PackedBuffer::new();
    assert_eq!(p.collect(&mut packed), Ok(4));
    assert_eq!(packed.stride(), 4);
    assert_eq!(packed.as_bytes(), b"a0\0\0a1\0\0bcd0bcd1");
    assert_eq!(packed.lengths(), [2, 2, 4, 4]);
}

#[test]
fn test_bytes_bucket() {
    let mut p = pattern("é(1|2)");
    let mut out: Vec<Vec<u8>> = Vec::new();
    p.collect(&mut out).unwrap();
    assert_eq!(out, ["é1".as_bytes(), "é2".as_bytes()]);
}

#[test]
fn test_mask_consumed_by_node_parse() {
    let mask = "a(b|c){1,2}[d-e]f";
    let mut rest = mask;
    let mut count = 1;
    while !rest.is_empty() {
        let (node, remaining) = Node::parse(rest).unwrap();
        assert!(remaining.len() < rest.len());
        count *= node.count();
        rest = remaining;
    }
    assert_eq!(count, pattern(mask).count());
}

#[test]
fn test_long_chain_drops_cleanly() {
    let mask = "[a-b]x".repeat(5_000);
    assert_eq!(
        Pattern::new(&mask).err().map(|e| e.kind()),
        Some(ErrorKind::Overflow)
    );
    let limits = Limits {
        max_node_values: 1,
        max_total: 1,
    };
    assert!(Pattern::with_limits(&"abc".repeat(1_000), limits).is_ok());
    let p = pattern(&"lit(a)".repeat(20_000));
    assert_eq!(p.nodes().len(), 40_000);
    assert_eq!(p.count(), 1);
    drop(p);
}

#[test]
fn test_construction_errors() {
    assert_eq!(pattern_err("(a|b").kind(), ErrorKind::Syntax);
    assert_eq!(pattern_err("[a]{2,1}").kind(), ErrorKind::Range);
    assert_eq!(pattern_err("[|]").kind(), ErrorKind::Range);
    assert_eq!(pattern_err("[alnum]{12}").kind(), ErrorKind::Overflow);
    assert_eq!(
        pattern_err("ok[nope|num]"),
        MaskError::Syntax {
            position: 3,
            reason: SyntaxError::UnknownClass("nope".into())
        }
    );
    assert_eq!(pattern_err("(|)").kind(), ErrorKind::Syntax);
}

#[test]
fn test_backslash_paths() {
    assert_eq!(collect_all(r"a\b[0-1]"), [r"a\b0", r"a\b1"]);
    let out = collect_all(r"World\Maps\[num]");
    assert_eq!(out.len(), 10);
    assert_eq!(out[0], r"World\Maps\0");
    assert_eq!(out[9], r"World\Maps\9");
    assert_eq!(collect_all(r"dir\"), [r"dir\"]);
    assert_eq!(collect_all(r"(C:\|D:\)x"), [r"C:\x", r"D:\x"]);
}

#[test]
fn test_class_of_plain_letters() {
    assert_eq!(collect_all("[abc]"), ["a", "b", "c"]);
    assert_eq!(collect_all("id-[xyz]{2}").len(), 9);
}

fn pattern_err(mask: &str) -> MaskError {
    Pattern::new(mask).expect_err("mask should not compile")
}

//! End-to-end scanning scenarios: spec text through the parser and both
//! automata stages, tokens drained from the reference scanner.

use relex::generate::{compile_spec, Options};
use relex::scanner::{CompiledFamily, Scanner};
use relex::spec::SpecFile;

fn compile(spec_text: &str) -> Vec<CompiledFamily> {
    let spec = SpecFile::parse_str(spec_text).expect("spec parses");
    compile_spec(&spec, &mut Options::new()).expect("spec compiles")
}

fn tokens(families: &[CompiledFamily], family: usize, input: &str) -> Vec<(i32, String)> {
    let mut sc = Scanner::new(&families[family], input.chars());
    let mut out = Vec::new();
    loop {
        let i = sc.next_action();
        if i < 0 {
            return out;
        }
        out.push((i, sc.text().to_string()));
    }
}

#[test]
fn numbers_spaces_and_words() {
    let fams = compile("/[0-9]+/ { }\n/[ \\t\\n]+/ { }\n/[A-Za-z]+/ { }\n//\n");
    assert_eq!(
        tokens(&fams, 0, "abc 123 "),
        vec![
            (2, "abc".to_string()),
            (1, " ".to_string()),
            (0, "123".to_string()),
            (1, " ".to_string()),
        ]
    );
}

#[test]
fn keyword_versus_identifier() {
    let fams = compile("/if/ { }\n/[a-z]+/ { }\n//\n");
    // "iffy" is longer as an identifier; the bare keyword then wins its tie.
    assert_eq!(
        tokens(&fams, 0, "iffy if"),
        vec![(1, "iffy".to_string()), (0, "if".to_string())]
    );
}

#[test]
fn star_takes_the_longest_run() {
    let fams = compile("/a*/ { }\n/a/ { }\n//\n");
    assert_eq!(tokens(&fams, 0, "aaa"), vec![(0, "aaa".to_string())]);
}

#[test]
fn negated_class_skips_digits() {
    let fams = compile("/[^0-9]/ { }\n//\n");
    assert_eq!(
        tokens(&fams, 0, "x1y"),
        vec![(0, "x".to_string()), (0, "y".to_string())]
    );
}

#[test]
fn dot_matches_non_ascii_runes() {
    let fams = compile("/./ { }\n//\n");
    assert_eq!(
        tokens(&fams, 0, "αβ"),
        vec![(0, "α".to_string()), (0, "β".to_string())]
    );
}

#[test]
fn nested_family_relexes_matched_text() {
    let text = "/\"[^\"]*\"/ < { }\n/[^\"]+/ { }\n> { }\n//\n";
    let spec = SpecFile::parse_str(text).unwrap();
    assert_eq!(spec.families[0].rules[0].nested_family, Some(1));
    let fams = compile(text);

    // The outer family takes the whole quoted string in one token.
    let outer = tokens(&fams, 0, "\"hi\"");
    assert_eq!(outer, vec![(0, "\"hi\"".to_string())]);

    // A nested frame over the matched text yields the body between the
    // quotes; the quotes themselves match nothing inside and are skipped.
    let inner = tokens(&fams, 1, "\"hi\"");
    assert_eq!(inner, vec![(0, "hi".to_string())]);
}

#[test]
fn token_streams_are_deterministic() {
    let text = "/[0-9]+/ { }\n/[a-z]+/ { }\n//\n";
    let first = tokens(&compile(text), 0, "a0b1c2");
    let second = tokens(&compile(text), 0, "a0b1c2");
    assert_eq!(first, second);
}

#[test]
fn longest_match_requires_backtracking() {
    let fams = compile("/a(ba)*/ { }\n/b/ { }\n/x/ { }\n//\n");
    // The first rule overshoots past "aba" and backs up to length 3.
    assert_eq!(
        tokens(&fams, 0, "ababx"),
        vec![
            (0, "aba".to_string()),
            (1, "b".to_string()),
            (2, "x".to_string())
        ]
    );
}

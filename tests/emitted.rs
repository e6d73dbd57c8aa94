//! Structural checks over the generated source: tables, dispatch arms,
//! standalone substitution, and the error hook toggle.

use relex::generate::{generate, Options};

fn emit(spec: &str, standalone: bool, error_hook: bool) -> String {
    let mut opts = Options::new();
    opts.standalone = standalone;
    opts.error_hook = error_hook;
    let mut out = Vec::new();
    generate(spec.as_bytes(), &mut out, &mut opts).expect("generation succeeds");
    String::from_utf8(out).expect("emitted source is UTF-8")
}

const SMALL: &str = "/a/ { return 0; }\n//\nfn main() {}\n";

#[test]
fn tables_and_entry_point_are_present() {
    let src = emit(SMALL, false, true);
    assert!(src.contains("static ACC_0_0: [bool; 2] = [false, true];"));
    assert!(src.contains("static FUN_0_0: [fn(char) -> i32; 2] ="));
    assert!(src.contains("static FAMILIES: [Family; 1]"));
    assert!(src.contains("pub fn lex(&mut self) -> i32"));
    assert!(src.contains("pub fn error(&mut self, msg: &str)"));
    assert!(src.contains("fn main() {}"));
}

#[test]
fn transition_functions_check_singles_before_ranges() {
    let src = emit("/[0-9]*[Ee][2-5]*/ { return 0; }\n//\n", false, true);
    // Per state: a rune match, then range comparisons, then the catch-all.
    let state_fn = src
        .split("|r| {")
        .nth(1)
        .expect("at least one transition function");
    let match_pos = state_fn.find("match r").expect("singles emitted");
    let range_pos = state_fn.find("<= r && r <=").expect("ranges emitted");
    assert!(match_pos < range_pos);
}

#[test]
fn error_hook_suppressed_on_request() {
    let src = emit(SMALL, false, false);
    assert!(src.contains("pub fn lex"));
    assert!(!src.contains("pub fn error"));
}

#[test]
fn standalone_substitutes_nn_fun() {
    let spec = "/a/ { }\n//\nfn main() { let f = NN_FUN; }\n";
    let src = emit(spec, true, true);
    assert!(!src.contains("NN_FUN"));
    assert!(src.contains("(|yylex: &mut Lexer| { yylex.family_0(); })"));
    assert!(!src.contains("pub fn lex"));
    assert!(!src.contains("pub fn error"));
}

#[test]
fn nested_families_get_their_own_dispatch() {
    let spec = "/\"[^\"]*\"/ < { }\n/[^\"]+/ { }\n> { close(); }\n//\n";
    let src = emit(spec, false, true);
    assert!(src.contains("fn family_0(&mut self) -> i32"));
    assert!(src.contains("fn family_1(&mut self) -> i32"));
    assert!(src.contains("Lexer::from_str(self.text(), 1)"));
    assert!(src.contains("nested.family_1();"));
    assert!(src.contains("{ close(); }"));
    assert!(src.contains("static FAMILIES: [Family; 2]"));
}

#[test]
fn actions_are_embedded_with_their_rule_comment() {
    let src = emit("/ab?/ { count += 1; }\n//\n", false, true);
    assert!(src.contains("0 => { // /ab?/"));
    assert!(src.contains("{ count += 1; }"));
}

#[test]
fn output_is_deterministic() {
    let spec = "/[a-f]+[0-9Xx]/ { return 1; }\n/x|y/ { return 2; }\n//\n";
    assert_eq!(emit(spec, false, true), emit(spec, false, true));
}

#[test]
fn dot_sinks_receive_both_graphs() {
    let mut opts = Options::new();
    opts.nfa_dot = Some(Box::new(Vec::<u8>::new()));
    opts.dfa_dot = Some(Box::new(Vec::<u8>::new()));
    // Sinks are write-only through the options; here we only prove the run
    // succeeds with both attached and still emits the scanner.
    let mut out = Vec::new();
    generate("/ab/ { }\n//\n".as_bytes(), &mut out, &mut opts).unwrap();
    assert!(!out.is_empty());
}

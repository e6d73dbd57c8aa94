// src/bin/fuzz_scan.rs
// Generate random regexes from the supported subset plus random inputs, run
// the reference scanner, and compare against an independent regex engine.
// The oracle derives the longest matching prefix from anchored whole-prefix
// matches, so it does not depend on that engine's alternation preference.
//
//   FUZZ_ITERS=500 FUZZ_SEED=7 FUZZ_LEN=48 cargo run --bin fuzz_scan

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;

use relex::automata::{dfa, regex as rex};
use relex::scanner::{CompiledFamily, Scanner};

fn main() {
    let iters: usize = env_or("FUZZ_ITERS", 300);
    let len: usize = env_or("FUZZ_LEN", 32);
    let seed: u64 = env_or("FUZZ_SEED", 42);
    eprintln!("[fuzz] iters={iters} len={len} seed={seed}");

    let mut rng = StdRng::seed_from_u64(seed);
    for i in 0..iters {
        let count = rng.random_range(1..=3);
        let patterns: Vec<String> = (0..count).map(|_| gen_pattern(&mut rng, 0)).collect();
        let refs: Vec<&str> = patterns.iter().map(|p| p.as_str()).collect();
        let input = gen_input(&mut rng, len);
        if !check_once(i, &refs, &input) {
            std::process::exit(1);
        }
    }
    eprintln!("[fuzz] all {iters} iterations matched");
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn check_once(iter: usize, patterns: &[&str], input: &str) -> bool {
    let fam = compile(patterns);
    let got = scanner_stream(&fam, input);
    let want = oracle_stream(patterns, &fam, input);
    if got == want {
        return true;
    }
    eprintln!("[fuzz] iter {iter}: MISMATCH");
    eprintln!("  patterns: {patterns:?}");
    eprintln!("  input:    {input:?}");
    let n = got.len().min(want.len());
    let first = (0..n).find(|&i| got[i] != want[i]).unwrap_or(n);
    for i in first.saturating_sub(2)..(first + 4).min(got.len().max(want.len())) {
        eprintln!("  #{i:04} got={:?} want={:?}", got.get(i), want.get(i));
    }
    false
}

fn compile(patterns: &[&str]) -> CompiledFamily {
    CompiledFamily {
        dfas: patterns
            .iter()
            .map(|p| {
                let (nfa, alphabet) = rex::parse(p).expect("generated pattern parses");
                dfa::subset_construct(&nfa, &alphabet)
            })
            .collect(),
    }
}

fn scanner_stream(fam: &CompiledFamily, input: &str) -> Vec<(usize, String)> {
    let mut sc = Scanner::new(fam, input.chars());
    let mut out = Vec::new();
    loop {
        let i = sc.next_action();
        if i < 0 {
            return out;
        }
        out.push((i as usize, sc.text().to_string()));
    }
}

/// Token stream per the precedence contract, computed rune by rune: the
/// longest prefix any rule matches wins, lowest ordinal on equal length,
/// and an unmatchable rune is dropped. Match lengths and tie-breaks come
/// from the independent engine; the compiled DFAs are consulted only to
/// model the end-of-stream rule. An attempt that keeps a DFA alive through
/// the last rune reads past the end, and once that happens the scanner
/// reports end of stream and drops whatever lookahead is left, so the
/// stream ends after such an attempt whether or not it produced a token.
fn oracle_stream(patterns: &[&str], fam: &CompiledFamily, input: &str) -> Vec<(usize, String)> {
    let res: Vec<Regex> = patterns
        .iter()
        .map(|p| Regex::new(&format!("^(?s:{p})$")).expect("oracle accepts the pattern"))
        .collect();
    let chars: Vec<char> = input.chars().collect();
    let mut out = Vec::new();
    let mut k = 0;
    while k < chars.len() {
        let mut best_len = 0usize;
        let mut best_rule = 0usize;
        for m in 1..=chars.len() - k {
            let prefix: String = chars[k..k + m].iter().collect();
            for (i, re) in res.iter().enumerate() {
                if re.is_match(&prefix) {
                    if m > best_len {
                        best_len = m;
                        best_rule = i;
                    }
                    break;
                }
            }
        }
        let hits_eof = attempt_survives_to_end(fam, &chars[k..]);
        if best_len > 0 {
            out.push((best_rule, chars[k..k + best_len].iter().collect()));
            k += best_len;
        } else if !hits_eof {
            k += 1;
        }
        if hits_eof {
            break;
        }
    }
    out
}

/// True when a match attempt starting here keeps at least one DFA alive
/// through the last rune, so the scanner reads past the end of the input.
fn attempt_survives_to_end(fam: &CompiledFamily, rest: &[char]) -> bool {
    let mut states: Vec<i32> = vec![0; fam.dfas.len()];
    for &c in rest {
        let mut any = false;
        for (i, st) in states.iter_mut().enumerate() {
            if *st != -1 {
                *st = relex::scanner::step(&fam.dfas[i], *st, c);
                if *st != -1 {
                    any = true;
                }
            }
        }
        if !any {
            return false;
        }
    }
    true
}

// ---------- generators ----------

const LITERALS: &[char] = &['a', 'b', 'c', 'x', '0', '1', '2', ' ', '!', '-', 'α'];
const INPUT_CHARS: &[char] = &[
    'a', 'b', 'c', 'x', 'y', '0', '1', '2', '3', ' ', '!', '-', 'α', '\n',
];
const CLASSES: &[&str] = &[
    "[abc]", "[a-c]", "[0-2]", "[a-cx]", "[^ab]", "[^0-2x]", "[b-c0-1]",
];

fn gen_pattern(rng: &mut StdRng, depth: usize) -> String {
    let branches = if depth == 0 {
        rng.random_range(1..=3)
    } else {
        rng.random_range(1..=2)
    };
    let parts: Vec<String> = (0..branches).map(|_| gen_cat(rng, depth)).collect();
    parts.join("|")
}

fn gen_cat(rng: &mut StdRng, depth: usize) -> String {
    let n = rng.random_range(1..=4);
    let mut out = String::new();
    for _ in 0..n {
        out.push_str(&gen_closed(rng, depth));
    }
    out
}

fn gen_closed(rng: &mut StdRng, depth: usize) -> String {
    let mut atom = gen_atom(rng, depth);
    if rng.random_bool(0.35) {
        let op = ["*", "+", "?"][rng.random_range(0..3)];
        atom.push_str(op);
    }
    atom
}

fn gen_atom(rng: &mut StdRng, depth: usize) -> String {
    match rng.random_range(0..10) {
        0..=4 => gen_literal(rng),
        5 | 6 => CLASSES[rng.random_range(0..CLASSES.len())].to_string(),
        7 => ".".to_string(),
        8 if depth < 2 => format!("({})", gen_pattern(rng, depth + 1)),
        _ => gen_literal(rng),
    }
}

fn gen_literal(rng: &mut StdRng) -> String {
    let c = LITERALS[rng.random_range(0..LITERALS.len())];
    if c.is_ascii_punctuation() {
        format!("\\{c}")
    } else {
        c.to_string()
    }
}

fn gen_input(rng: &mut StdRng, len: usize) -> String {
    let n = rng.random_range(0..=len);
    (0..n)
        .map(|_| INPUT_CHARS[rng.random_range(0..INPUT_CHARS.len())])
        .collect()
}

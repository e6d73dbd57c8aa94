// src/main.rs

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};
use clap::{Arg, ArgAction, Command as Cli};

use relex::generate::{generate, Options};

fn main() {
    if let Err(e) = run() {
        eprintln!("relex: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let matches = Cli::new("relex")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Generate a Rust lexer from regex/action rules")
        .arg(
            Arg::new("spec")
                .help("Spec file; stdin if absent")
                .index(1),
        )
        .arg(
            Arg::new("standalone")
                .short('s')
                .action(ArgAction::SetTrue)
                .help("Standalone code: NN_FUN substitution, no lex() entry point"),
        )
        .arg(
            Arg::new("custom-error")
                .short('e')
                .action(ArgAction::SetTrue)
                .help("Custom error hook: suppress the default error() method"),
        )
        .arg(
            Arg::new("run")
                .short('r')
                .action(ArgAction::SetTrue)
                .help("Build and run the generated program, then discard it"),
        )
        .arg(
            Arg::new("nfadot")
                .long("nfadot")
                .value_name("PATH")
                .help("Write the NFA graphs in DOT format"),
        )
        .arg(
            Arg::new("dfadot")
                .long("dfadot")
                .value_name("PATH")
                .help("Write the DFA graphs in DOT format"),
        )
        .arg(
            Arg::new("tables")
                .long("tables")
                .value_name("PATH")
                .help("Write the compiled DFA tables as JSON"),
        )
        .get_matches();

    let mut opts = Options::new();
    opts.standalone = matches.get_flag("standalone");
    opts.error_hook = !matches.get_flag("custom-error");
    opts.nfa_dot = open_sink(matches.get_one::<String>("nfadot"))?;
    opts.dfa_dot = open_sink(matches.get_one::<String>("dfadot"))?;
    opts.tables = open_sink(matches.get_one::<String>("tables"))?;

    let autorun = matches.get_flag("run");
    let spec_path = matches.get_one::<String>("spec").cloned();

    let input: Box<dyn io::Read> = match &spec_path {
        Some(p) => {
            if p.ends_with(".rs") {
                bail!("input filename ends with .rs: {p}");
            }
            Box::new(File::open(p).with_context(|| format!("open {p}"))?)
        }
        None => Box::new(io::stdin()),
    };

    if autorun {
        let dir = tempfile::TempDir::new().context("create temp dir")?;
        let src = dir.path().join("program.rs");
        {
            let mut out =
                BufWriter::new(File::create(&src).with_context(|| format!("create {src:?}"))?);
            generate(input, &mut out, &mut opts)?;
            out.flush()?;
        }
        build_and_run(&src, dir.path())?;
        return Ok(());
    }

    match &spec_path {
        Some(p) => {
            let out_path = output_path(p);
            // On failure the partial file stays behind; only -r cleans up.
            let mut out = BufWriter::new(
                File::create(&out_path).with_context(|| format!("create {out_path:?}"))?,
            );
            generate(input, &mut out, &mut opts)?;
            out.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            generate(input, &mut out, &mut opts)?;
            out.flush()?;
        }
    }
    Ok(())
}

/// `foo.relex` becomes `foo.nn.rs` next to it.
fn output_path(spec: &str) -> PathBuf {
    let path = Path::new(spec);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(spec);
    path.with_file_name(format!("{stem}.nn.rs"))
}

fn open_sink(path: Option<&String>) -> Result<Option<Box<dyn Write>>> {
    let Some(path) = path else {
        return Ok(None);
    };
    if path.ends_with(".relex") {
        bail!("diagnostic path ends with .relex: {path}");
    }
    let f = File::create(path).with_context(|| format!("create {path}"))?;
    Ok(Some(Box::new(BufWriter::new(f))))
}

fn build_and_run(src: &Path, dir: &Path) -> Result<()> {
    let bin = dir.join("program");
    let status = Command::new("rustc")
        .arg("--edition")
        .arg("2021")
        .arg("-O")
        .arg(src)
        .arg("-o")
        .arg(&bin)
        .status()
        .context("run rustc")?;
    if !status.success() {
        bail!("rustc failed with {status}");
    }
    let status = Command::new(&bin)
        .status()
        .context("run generated program")?;
    if !status.success() {
        bail!("generated program exited with {status}");
    }
    Ok(())
}

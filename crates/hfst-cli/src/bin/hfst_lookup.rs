// hfst-lookup: Look up words in an HFST optimized-lookup transducer.
//
// Reads words from the command line, or from stdin one per line, and prints
// every analysis as `word<TAB>output<TAB>weight`. Words without analyses
// print `word<TAB>word+?<TAB>inf`. Each word's block ends with a blank line.
//
// Usage:
//   hfst-lookup [-f FST] [--json] [-v] [WORD...]
//
// Options:
//   -f, --fst PATH    Transducer file (default: $HFST_FST_PATH)
//       --json        One JSON object per analysis
//   -v, --verbose     Debug logging on stderr
//   -h, --help        Print help

use std::io::{self, BufRead, Write};

use hfst_lookup::{LookupState, Transducer};

fn print_help() {
    println!("hfst-lookup: Look up words in an HFST optimized-lookup transducer.");
    println!();
    println!("Usage: hfst-lookup [-f FST] [--json] [-v] [WORD...]");
    println!();
    println!("If WORD arguments are given, looks up each word.");
    println!("Otherwise reads words from stdin (one per line).");
    println!();
    println!("Options:");
    println!("  -f, --fst PATH    Transducer file (default: ${})", hfst_cli::FST_PATH_ENV);
    println!("      --json        Print one JSON object per analysis");
    println!("  -v, --verbose     Debug logging on stderr");
    println!("  -h, --help        Print this help");
}

fn lookup(
    transducer: &Transducer,
    state: &mut LookupState,
    word: &str,
    json: bool,
    out: &mut impl Write,
) -> io::Result<()> {
    let analyses = transducer.analyze_with(state, word);

    if json {
        for analysis in &analyses {
            let line = serde_json::json!({ "input": word, "analysis": analysis });
            writeln!(out, "{line}")?;
        }
        return Ok(());
    }

    if analyses.is_empty() {
        writeln!(out, "{word}\t{word}+?\tinf")?;
    } else {
        for analysis in &analyses {
            writeln!(out, "{word}\t{analysis}")?;
        }
    }
    writeln!(out)
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let opts = hfst_cli::parse_args(&args).unwrap_or_else(|e| hfst_cli::fatal(&e));

    if opts.help {
        print_help();
        return;
    }

    hfst_cli::init_logging(opts.verbose);

    let path = hfst_cli::resolve_fst_path(opts.fst_path.as_deref())
        .unwrap_or_else(|e| hfst_cli::fatal(&e));
    let transducer = hfst_cli::load_transducer(&path).unwrap_or_else(|e| hfst_cli::fatal(&e));
    tracing::debug!(path = %path.display(), limits = ?transducer.limits(), "transducer ready");

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut state = LookupState::new();

    let result = if opts.words.is_empty() {
        let stdin = io::stdin();
        let mut result = Ok(());
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    eprintln!("error reading stdin: {e}");
                    break;
                }
            };
            let word = line.trim();
            if word.is_empty() {
                continue;
            }
            result = lookup(&transducer, &mut state, word, opts.json, &mut out);
            if result.is_err() {
                break;
            }
        }
        result
    } else {
        opts.words
            .iter()
            .try_for_each(|word| lookup(&transducer, &mut state, word, opts.json, &mut out))
    };

    if let Err(e) = result.and_then(|()| out.flush()) {
        if e.kind() != io::ErrorKind::BrokenPipe {
            hfst_cli::fatal(&format!("write failed: {e}"));
        }
    }
}

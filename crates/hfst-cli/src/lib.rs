// hfst-cli: shared utilities for the lookup tool.

use std::path::{Path, PathBuf};
use std::process;

use hfst_lookup::Transducer;
use tracing_subscriber::EnvFilter;

/// Environment variable naming the transducer file when `-f` is not given.
pub const FST_PATH_ENV: &str = "HFST_FST_PATH";

/// Command line options shared by the lookup tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    pub fst_path: Option<String>,
    pub json: bool,
    pub verbose: bool,
    pub help: bool,
    /// Positional arguments, in order.
    pub words: Vec<String>,
}

/// Parse command line arguments (without the program name).
///
/// Accepts `-f PATH`, `--fst PATH`, `--fst=PATH`, `--json`, `-v`/`--verbose`
/// and `-h`/`--help`. A lone `--` ends option parsing.
pub fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut opts = Options::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--" => {
                opts.words.extend(iter.by_ref().cloned());
                break;
            }
            "-f" | "--fst" => match iter.next() {
                Some(path) => opts.fst_path = Some(path.clone()),
                None => return Err(format!("{arg} requires a value")),
            },
            "--json" => opts.json = true,
            "-v" | "--verbose" => opts.verbose = true,
            "-h" | "--help" => opts.help = true,
            _ => {
                if let Some(path) = arg.strip_prefix("--fst=") {
                    opts.fst_path = Some(path.to_string());
                } else if arg.starts_with('-') && arg.len() > 1 {
                    return Err(format!("unknown option: {arg}"));
                } else {
                    opts.words.push(arg.clone());
                }
            }
        }
    }

    Ok(opts)
}

/// Resolve the transducer path: the `-f` argument, then `HFST_FST_PATH`.
pub fn resolve_fst_path(fst_path: Option<&str>) -> Result<PathBuf, String> {
    if let Some(p) = fst_path {
        return Ok(PathBuf::from(p));
    }
    match std::env::var(FST_PATH_ENV) {
        Ok(p) if !p.is_empty() => Ok(PathBuf::from(p)),
        _ => Err(format!(
            "no transducer given; use -f PATH or set {FST_PATH_ENV}"
        )),
    }
}

/// Read and decode a transducer file.
pub fn load_transducer(path: &Path) -> Result<Transducer, String> {
    let data =
        std::fs::read(path).map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    Transducer::from_bytes(&data).map_err(|e| format!("failed to load {}: {}", path.display(), e))
}

/// Install a stderr log subscriber.
///
/// `RUST_LOG` takes precedence; otherwise the level is `warn`, or `debug`
/// when `verbose` is set.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Print an error message and exit with code 1.
pub fn fatal(msg: &str) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}

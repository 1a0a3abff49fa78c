//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `bindkit_core` linkage by printing the core version.
//! - Print canonical keys for signatures given on the command line.
//! - Without signatures, run one commit/release cycle on the in-memory registry.
//! - With `--log-dir <dir>`, write the core's rolling logs under `<dir>`.

use bindkit_core::{BindingSession, InMemoryRegistry, LoggingConfig, TypeSignature};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

const LOG_DIR_FLAG: &str = "--log-dir";

#[derive(Debug, Default, PartialEq, Eq)]
struct CliArgs {
    log_dir: Option<PathBuf>,
    signatures: Vec<String>,
}

fn main() -> ExitCode {
    println!("bindkit_core version={}", bindkit_core::core_version());

    match parse_args(std::env::args().skip(1)).and_then(run) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: CliArgs) -> Result<(), String> {
    if let Some(log_dir) = args.log_dir {
        let log_dir = absolute(log_dir)?;
        bindkit_core::init_logging(&LoggingConfig::with_default_level(&log_dir))?;
        println!("logging dir={}", log_dir.display());
    }

    let result = if args.signatures.is_empty() {
        run_demo()
    } else {
        print_keys(&args.signatures)
    };
    result.map_err(|err| err.to_string())
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliArgs, String> {
    let mut parsed = CliArgs::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == LOG_DIR_FLAG {
            let dir = args
                .next()
                .ok_or_else(|| format!("`{LOG_DIR_FLAG}` needs a directory"))?;
            parsed.log_dir = Some(PathBuf::from(dir));
        } else if let Some(dir) = arg.strip_prefix("--log-dir=") {
            parsed.log_dir = Some(PathBuf::from(dir));
        } else {
            parsed.signatures.push(arg);
        }
    }
    if parsed
        .log_dir
        .as_ref()
        .is_some_and(|dir| dir.as_os_str().is_empty())
    {
        return Err(format!("`{LOG_DIR_FLAG}` must not be empty"));
    }
    Ok(parsed)
}

fn absolute(dir: PathBuf) -> Result<PathBuf, String> {
    if dir.is_absolute() {
        return Ok(dir);
    }
    let cwd = std::env::current_dir()
        .map_err(|err| format!("cannot resolve `{}`: {err}", dir.display()))?;
    Ok(cwd.join(dir))
}

fn print_keys(signatures: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    for text in signatures {
        let signature = TypeSignature::parse(text)?;
        println!("{text} => {}", signature.canonical_key()?);
    }
    Ok(())
}

fn run_demo() -> Result<(), Box<dyn std::error::Error>> {
    let registry = Arc::new(InMemoryRegistry::new());
    let mut session = BindingSession::new();
    session.declare_by_names(["A", "B"]).to("demo.AbService");
    session
        .declare_by_type_literal(&TypeSignature::parse("java.util.List<demo.Foo>")?)?
        .to("demo.FooList");

    let handle = session.commit(registry.clone())?;
    println!("committed entries={} registry_size={}", handle.len(), registry.len());

    let wanted = TypeSignature::parse("java.util.List<demo.Foo>")?;
    println!(
        "lookup {} => {} entries",
        wanted.canonical_key()?,
        registry.lookup_type(&wanted)?.len()
    );

    handle.release()?;
    println!(
        "released active={} registry_size={}",
        handle.is_active(),
        registry.len()
    );
    Ok(())
}

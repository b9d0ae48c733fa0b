//! Command-line interface for solcheck.

use std::collections::{HashSet, VecDeque};
use std::io::{IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser};

use crate::ast;
use crate::evm::EvmVersion;
use crate::report::{self, ReportItem};
use crate::resolve::{ImportResolver, Remapping};
use crate::task::{analyze_units, TaskRegistry};
use crate::tasks;
use crate::unit::SourceUnit;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_USAGE: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// File identifier used for standard input.
const STDIN_FILE_NAME: &str = "<stdin>";

/// Rule-based static analysis for Solidity source files.
///
/// Analyzes the given Solidity input files (or standard input if `-` is
/// used as a file name) and prints the findings. Imports are read from
/// the filesystem automatically; their paths can be remapped with
/// `context:prefix=path` tokens given alongside the input files.
#[derive(Parser)]
#[command(name = "solcheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input files, remapping tokens (`context:prefix=path`), or `-` for
    /// standard input
    pub inputs: Vec<String>,

    /// EVM version the rules should assume
    #[arg(long, value_name = "version")]
    pub evm_version: Option<String>,

    /// Print the syntax tree of each input instead of running analysis
    #[arg(long)]
    pub ast: bool,

    /// Output format: pretty or json
    #[arg(long, default_value = "pretty")]
    pub format: String,

    /// Force colored output
    #[arg(long, conflicts_with = "no_color")]
    pub color: bool,

    /// Disable colored output, bypassing terminal auto-detection
    #[arg(long)]
    pub no_color: bool,

    /// Skip missing input files instead of failing
    #[arg(long)]
    pub ignore_missing: bool,

    /// Show licensing information and exit
    #[arg(long)]
    pub license: bool,
}

/// What a run produced, threaded back to the caller instead of a
/// process-wide output flag.
pub struct RunOutcome {
    pub has_findings: bool,
    pub total_findings: usize,
}

/// Run the analyzer. Returns the process exit code.
pub fn run(cli: &Cli) -> anyhow::Result<i32> {
    if cli.license {
        println!("{}", include_str!("../LICENSE"));
        return Ok(EXIT_SUCCESS);
    }

    if cli.no_color {
        colored::control::set_override(false);
    } else if cli.color {
        colored::control::set_override(true);
    }

    if cli.format != "pretty" && cli.format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty' or 'json'",
            cli.format
        );
        return Ok(EXIT_USAGE);
    }

    let evm = match &cli.evm_version {
        Some(name) => match name.parse::<EvmVersion>() {
            Ok(version) => version,
            Err(e) => {
                eprintln!("Error: {}", e);
                return Ok(EXIT_USAGE);
            }
        },
        None => EvmVersion::default(),
    };

    // Interactive invocation without arguments: show help instead of
    // silently blocking on stdin.
    if cli.inputs.is_empty() && std::io::stdin().is_terminal() {
        let mut command = Cli::command();
        command.print_help()?;
        println!();
        return Ok(EXIT_USAGE);
    }

    // Partition the input tokens into remappings, paths, and the stdin
    // marker.
    let mut remappings = Vec::new();
    let mut paths = Vec::new();
    let mut read_stdin = false;
    for token in &cli.inputs {
        if token == "-" {
            read_stdin = true;
        } else if token.contains('=') {
            match Remapping::parse(token) {
                Some(remapping) => remappings.push(remapping),
                None => {
                    eprintln!("Error: invalid remapping {:?}", token);
                    return Ok(EXIT_USAGE);
                }
            }
        } else {
            paths.push(PathBuf::from(token));
        }
    }

    let mut resolver = ImportResolver::new(remappings);
    let mut sources: Vec<(String, String)> = Vec::new();
    for path in &paths {
        if !path.exists() {
            if cli.ignore_missing {
                eprintln!("{} is not found. Skipping.", path.display());
                continue;
            }
            eprintln!("Error: {} is not found", path.display());
            return Ok(EXIT_ERROR);
        }
        if !path.is_file() {
            if cli.ignore_missing {
                eprintln!("{} is not a valid file. Skipping.", path.display());
                continue;
            }
            eprintln!("Error: {} is not a valid file", path.display());
            return Ok(EXIT_ERROR);
        }
        let text = std::fs::read_to_string(path)?;
        if let Some(dir) = path.canonicalize()?.parent() {
            resolver.allow_dir(dir);
        }
        sources.push((path.to_string_lossy().to_string(), text));
    }
    if read_stdin {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        sources.push((STDIN_FILE_NAME.to_string(), text));
    }
    if sources.is_empty() {
        eprintln!(
            "No input files given. If you wish to use the standard input please specify \"-\" explicitly."
        );
        return Ok(EXIT_USAGE);
    }

    let (units, had_load_errors) = load_units(sources, &resolver, evm)?;

    if cli.ast {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        for unit in &units {
            writeln!(out)?;
            writeln!(out, "======= {} =======", unit.path())?;
            ast::write_ast(&mut out, unit)?;
        }
        return Ok(if had_load_errors { EXIT_ERROR } else { EXIT_SUCCESS });
    }

    let registry = tasks::builtin_registry();
    let outcome = analyze_and_report(&units, &registry, &cli.format, evm)?;

    if cli.format == "pretty" {
        println!();
        if outcome.has_findings {
            println!("{} finding(s) reported.", outcome.total_findings);
        } else {
            println!("No findings.");
        }
    }

    Ok(if had_load_errors { EXIT_ERROR } else { EXIT_SUCCESS })
}

/// Parse the gathered sources and pull in resolvable imports.
///
/// Units whose trees contain syntax errors are reported and dropped; the
/// engine is never invoked on a partial tree. Returns the units in load
/// order plus whether any unit had to be dropped.
fn load_units(
    sources: Vec<(String, String)>,
    resolver: &ImportResolver,
    evm: EvmVersion,
) -> anyhow::Result<(Vec<SourceUnit>, bool)> {
    let mut loaded: HashSet<String> = HashSet::new();
    for (path, _) in &sources {
        loaded.insert(path.clone());
        if let Ok(canonical) = Path::new(path).canonicalize() {
            loaded.insert(canonical.to_string_lossy().to_string());
        }
    }

    let mut queue: VecDeque<(String, String)> = sources.into();
    let mut units = Vec::new();
    let mut had_errors = false;

    while let Some((path, text)) = queue.pop_front() {
        let unit = SourceUnit::parse(path, text, evm)?;
        if unit.has_parse_errors() {
            eprintln!(
                "Error: {}: source contains syntax errors; skipping analysis",
                unit.path()
            );
            had_errors = true;
            continue;
        }

        if unit.path() != STDIN_FILE_NAME {
            for import in unit.imports()? {
                match resolver.resolve(Path::new(unit.path()), &import) {
                    Ok(target) => {
                        let key = target.to_string_lossy().to_string();
                        if loaded.insert(key.clone()) {
                            let text = std::fs::read_to_string(&target)?;
                            queue.push_back((key, text));
                        }
                    }
                    Err(e) => {
                        eprintln!(
                            "Warning: {}: cannot read import {:?}: {}",
                            unit.path(),
                            import,
                            e
                        );
                    }
                }
            }
        }
        units.push(unit);
    }

    Ok((units, had_errors))
}

/// Run the engine over every unit and render the findings.
fn analyze_and_report(
    units: &[SourceUnit],
    registry: &TaskRegistry,
    format: &str,
    evm: EvmVersion,
) -> anyhow::Result<RunOutcome> {
    let per_unit = analyze_units(units, registry)?;

    let mut total = 0;
    let mut reports: Vec<(String, Vec<ReportItem>)> = Vec::new();
    for (unit, mut findings) in units.iter().zip(per_unit) {
        report::sort_findings(&mut findings);
        report::dedup_findings(&mut findings);
        total += findings.len();
        reports.push((unit.path().to_string(), findings));
    }

    match format {
        "json" => report::write_json(evm, &reports)?,
        _ => {
            for (path, findings) in &reports {
                report::write_pretty(path, findings);
            }
        }
    }

    Ok(RunOutcome {
        has_findings: total > 0,
        total_findings: total,
    })
}

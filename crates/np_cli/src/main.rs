use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use np_ast::{NpSyntax, Signature};
use np_desugar::desugar_source;
use np_parser::rewrite_source;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Suffix appended to the input path when no output is given.
const OUTPUT_SUFFIX: &str = ".go";

#[derive(Parser)]
#[command(name = "np", about = "go-named-params: Go with named parameters")]
struct Cli {
    /// Log every rewritten construct to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite named parameters and emit standard Go.
    Rewrite {
        /// Input source file.
        input: PathBuf,
        /// Output file (`<input>.go` if omitted, `-` for stdout).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// How call sites are rewritten.
        #[arg(long, value_enum, default_value_t = Engine::Tags)]
        engine: Engine,
        #[command(flatten)]
        syntax: SyntaxArgs,
    },
    /// Rewrite the file in memory and report any structural errors.
    Check {
        input: PathBuf,
        #[command(flatten)]
        syntax: SyntaxArgs,
    },
    /// List the named-parameter definitions in a file.
    Signatures {
        input: PathBuf,
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Engine {
    /// Depth-tagged text, rewritten one nesting level at a time.
    Tags,
    /// Tree of parenthesized groups, rewritten bottom-up.
    Tree,
}

#[derive(Args)]
struct SyntaxArgs {
    /// JSON file with rewrite settings.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    no_directives: bool,
    #[arg(long)]
    no_definitions: bool,
    #[arg(long)]
    no_invocations: bool,
}

impl SyntaxArgs {
    fn load(&self) -> Result<NpSyntax> {
        let mut syntax = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("invalid config {}", path.display()))?
            }
            None => NpSyntax::default(),
        };
        if self.no_directives {
            syntax.directives = false;
        }
        if self.no_definitions {
            syntax.definitions = false;
        }
        if self.no_invocations {
            syntax.invocations = false;
        }
        Ok(syntax)
    }
}

#[derive(Serialize)]
struct SignatureReport<'a> {
    #[serde(flatten)]
    signature: &'a Signature,
    mangled_name: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Rewrite {
            input,
            output,
            engine,
            syntax,
        } => {
            let syntax = syntax.load()?;
            let target = output.unwrap_or_else(|| default_output(&input));
            let written = run_rewrite(&input, &target, engine, &syntax)?;
            if let Some(path) = written {
                eprintln!("Wrote {}", path.display());
            }
        }
        Commands::Check { input, syntax } => {
            let syntax = syntax.load()?;
            let source = read_source(&input)?;
            rewrite_source(&source, &input.display().to_string(), &syntax)?;
            eprintln!("OK: {}", input.display());
        }
        Commands::Signatures { input, json } => {
            let source = read_source(&input)?;
            let filename = input.display().to_string();
            let result = rewrite_source(&source, &filename, &NpSyntax::default())?;
            let reports: Vec<_> = result
                .definitions
                .iter()
                .map(|signature| SignatureReport {
                    signature,
                    mangled_name: signature.mangled_name(),
                })
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                for report in &reports {
                    let params: Vec<_> = report
                        .signature
                        .params
                        .iter()
                        .map(|p| format!("{}: {}", p.name, p.detail))
                        .collect();
                    println!(
                        "{filename}:{}: {}({}) -> {}",
                        report.signature.line,
                        report.signature.base_name,
                        params.join(", "),
                        report.mangled_name
                    );
                }
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn default_output(input: &Path) -> PathBuf {
    let mut path: OsString = input.as_os_str().to_owned();
    path.push(OUTPUT_SUFFIX);
    PathBuf::from(path)
}

fn read_source(input: &Path) -> Result<String> {
    std::fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))
}

/// Rewrite `input` into `target` (`-` is stdout). The target is only touched
/// once the whole file has been rewritten. Returns the path written, if any.
fn run_rewrite(
    input: &Path,
    target: &Path,
    engine: Engine,
    syntax: &NpSyntax,
) -> Result<Option<PathBuf>> {
    let source = read_source(input)?;
    let filename = input.display().to_string();

    let output = match engine {
        Engine::Tags => rewrite_source(&source, &filename, syntax)?.output,
        Engine::Tree => desugar_source(&source, &filename, syntax)?,
    };

    let (input_lines, output_lines) = (source.lines().count(), output.lines().count());
    if input_lines != output_lines {
        tracing::warn!(
            input_lines,
            output_lines,
            "line count changed; compiler positions will not match {filename}"
        );
    }

    if target == Path::new("-") {
        print!("{output}");
        return Ok(None);
    }
    std::fs::write(target, &output)
        .with_context(|| format!("failed to write {}", target.display()))?;
    Ok(Some(target.to_path_buf()))
}

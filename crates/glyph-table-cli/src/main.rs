use std::{
    collections::HashMap,
    io::{self, BufWriter, IsTerminal, Write},
    path::{Path, PathBuf},
};

use clap::{Parser, Subcommand};

use glyph_table::{
    Diagnostics, Generated, SourceConfig, SourceFile, SymbolOutput, TableCompiler, TableError,
    UnicodeSelector,
};

mod config_file;

use config_file::{ConfigError, load_config_file};

/// Generates glyph and operator tables from TeX and Unicode sources
#[derive(Parser, Debug)]
#[command(version, about = "Generates glyph and operator tables from TeX and Unicode sources", long_about = None)]
struct Args {
    /// Reads the input locations from a TOML file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Resolves relative input locations against this directory
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Logs more about what is read (-v for files, -vv for skipped rows)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Shows the source line of every diagnostic
    #[arg(long)]
    annotate: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Writes the resolved symbol table
    Symbols {
        /// Which part of the table to write
        #[arg(long, default_value_t = SymbolOutput::Table)]
        mode: SymbolOutput,
    },
    /// Writes the `\let` aliases of the math-class sources
    Aliases,
    /// Writes a table for the commented slots of a fontinst encoding file
    Etx {
        /// The encoding file to read
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Writes the large and text operator arrays
    Operators,
    /// Writes named symbols (`lmp1`) or a math alphabet from the Unicode Database
    Unicode {
        /// `lmp1` or an alphabet such as `blackboard-bold`
        #[arg(value_name = "SELECTOR")]
        selector: UnicodeSelector,
    },
}

fn main() {
    let args = Args::parse();
    init_logger(args.verbose);

    let mut sources = match args.config {
        Some(ref path) => load_config_file(path)
            .unwrap_or_else(|e| exit_config_error(e, path))
            .sources,
        None => SourceConfig::default(),
    };
    if let Some(ref root) = args.data_dir {
        sources.rebase(root);
    }

    let compiler = TableCompiler::new(sources);
    let result = match args.command {
        Command::Symbols { mode } => compiler.symbols(mode),
        Command::Aliases => compiler.aliases(),
        Command::Etx { ref file } => compiler.etx(file),
        Command::Operators => compiler.operators(),
        Command::Unicode { selector } => compiler.unicode(selector),
    };
    let Generated {
        output,
        diagnostics,
    } = result.unwrap_or_else(|e| exit_table_error(e));

    log::info!(
        "{} lines generated, {} warnings",
        output.lines().count(),
        diagnostics.len()
    );
    report_diagnostics(&diagnostics, args.annotate);
    let mut stdout = BufWriter::new(io::stdout().lock());
    stdout
        .write_all(output.as_bytes())
        .and_then(|()| stdout.flush())
        .unwrap_or_else(|e| exit_io_error(e));
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// Print the diagnostics to stderr, one line each or as annotated source excerpts.
fn report_diagnostics(diagnostics: &Diagnostics, annotate: bool) {
    let with_color = io::stderr().is_terminal();
    let mut sources: HashMap<&str, Option<SourceFile>> = HashMap::new();
    for diagnostic in diagnostics {
        if annotate
            && let Some(report) = diagnostic.to_report(with_color)
            && let Some(location) = &diagnostic.location
            && let Some(source) = sources
                .entry(location.file.as_str())
                .or_insert_with(|| SourceFile::load(Path::new(&location.file)).ok())
        {
            let cache = (location.file.as_str(), ariadne::Source::from(source.text()));
            if report.eprint(cache).is_ok() {
                continue;
            }
        }
        eprintln!("{}", diagnostic);
    }
}

fn exit_table_error(e: TableError) -> ! {
    eprintln!("Error: {}", e);
    std::process::exit(1);
}

fn exit_config_error(e: ConfigError, fp: &Path) -> ! {
    eprintln!("Configuration error in '{}': {}", fp.display(), e);
    std::process::exit(2);
}

fn exit_io_error(e: io::Error) -> ! {
    eprintln!("IO Error: {}", e);
    std::process::exit(1);
}

//! docwiki - DocBook to DokuWiki converter

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use docwiki::xref::IndexReport;
use docwiki::{
    BuildConfig, BuildReport, CorpusStore, CrossRefIndex, LinkConfig, LinkReport, MatchMode,
    build_corpus, index_corpus, link_corpus, open_document,
};

const DEFAULT_INDEX: &str = "indexed_pages.csv";

#[derive(Parser)]
#[command(name = "docwiki")]
#[command(version, about = "DocBook to DokuWiki converter", long_about = None)]
#[command(after_help = "EXAMPLES:
    docwiki build kompendium.xml pages      Write one namespace per chapter
    docwiki index pages -o index.csv        Index page headings
    docwiki link pages --index index.csv    Link headings across pages
    docwiki all kompendium.xml pages        Build, index and link")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Only show warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Show per-page progress
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a DocBook file into a page corpus
    Build {
        #[arg(value_name = "SOURCE")]
        source: PathBuf,
        #[arg(value_name = "OUT_DIR")]
        out_dir: PathBuf,
    },
    /// Index the top-level heading of every page
    Index {
        #[arg(value_name = "OUT_DIR")]
        out_dir: PathBuf,
        /// Index file to write
        #[arg(short, long, default_value = DEFAULT_INDEX)]
        output: PathBuf,
        /// Print the index as JSON instead of writing a file
        #[arg(long)]
        json: bool,
    },
    /// Rewrite heading mentions into links using an index file
    Link {
        #[arg(value_name = "OUT_DIR")]
        out_dir: PathBuf,
        /// Index file to read
        #[arg(long, default_value = DEFAULT_INDEX)]
        index: PathBuf,
        /// Also link headings found inside longer words
        #[arg(long)]
        substring: bool,
    },
    /// Build, index and link in one run
    All {
        #[arg(value_name = "SOURCE")]
        source: PathBuf,
        #[arg(value_name = "OUT_DIR")]
        out_dir: PathBuf,
        /// Index file to write
        #[arg(short, long, default_value = DEFAULT_INDEX)]
        output: PathBuf,
        /// Also link headings found inside longer words
        #[arg(long)]
        substring: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let result = match cli.command {
        Command::Build { source, out_dir } => {
            build(&source, &out_dir).and_then(|r| check_failures(r.failures.len()))
        }
        Command::Index {
            out_dir,
            output,
            json,
        } => index(&out_dir, &output, json).and_then(|r| check_failures(r.failures.len())),
        Command::Link {
            out_dir,
            index,
            substring,
        } => link(&out_dir, &index, substring).and_then(|r| check_failures(r.failures.len())),
        Command::All {
            source,
            out_dir,
            output,
            substring,
        } => run_all(&source, &out_dir, &output, substring),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(quiet: bool, verbose: bool) {
    let level = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn build(source: &Path, out_dir: &Path) -> Result<BuildReport, String> {
    let doc = open_document(source).map_err(|e| e.to_string())?;
    let report = build_corpus(&doc, out_dir, BuildConfig::default());

    for collision in &report.collisions {
        log::warn!(
            "Name {:?} used twice in {:?}, renamed to {:?}",
            collision.slug,
            collision.namespace.join(":"),
            collision.assigned
        );
    }
    Ok(report)
}

fn index(out_dir: &Path, output: &Path, json: bool) -> Result<IndexReport, String> {
    let store = CorpusStore::new(out_dir);
    let report = index_corpus(&store).map_err(|e| e.to_string())?;

    if json {
        let text = serde_json::to_string_pretty(report.index.entries())
            .map_err(|e| e.to_string())?;
        println!("{text}");
    } else {
        report.index.save(output).map_err(|e| e.to_string())?;
        log::info!("Index written to {}", output.display());
    }
    Ok(report)
}

fn link(out_dir: &Path, index_path: &Path, substring: bool) -> Result<LinkReport, String> {
    let index = CrossRefIndex::load(index_path).map_err(|e| e.to_string())?;
    link_with(out_dir, &index, substring)
}

fn link_with(
    out_dir: &Path,
    index: &CrossRefIndex,
    substring: bool,
) -> Result<LinkReport, String> {
    let mode = if substring {
        MatchMode::Substring
    } else {
        MatchMode::WordBoundary
    };
    let config = LinkConfig::new().with_match_mode(mode);
    let store = CorpusStore::new(out_dir).with_extension(config.extension.clone());
    link_corpus(&store, index, &config).map_err(|e| e.to_string())
}

/// Build, index and link. Page failures in one phase do not stop the
/// next; they are counted and reported at the end.
fn run_all(source: &Path, out_dir: &Path, output: &Path, substring: bool) -> Result<(), String> {
    let built = build(source, out_dir)?;
    let indexed = index(out_dir, output, false)?;
    let linked = link_with(out_dir, &indexed.index, substring)?;
    check_failures(built.failures.len() + indexed.failures.len() + linked.failures.len())
}

fn check_failures(failed: usize) -> Result<(), String> {
    if failed == 0 {
        Ok(())
    } else {
        Err(format!("{failed} page(s) could not be processed, see log"))
    }
}

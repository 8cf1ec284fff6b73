use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use docsearch_core::{Hits, InvertedIndex, SearchMode};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "docsearch")]
#[command(about = "Boolean, ranked and phrase search over a folder of text files", long_about = None)]
struct Cli {
    /// Folder whose .txt files are indexed
    #[arg(long, default_value = "data")]
    data: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    And,
    Or,
    Not,
}

impl From<Mode> for SearchMode {
    fn from(m: Mode) -> Self {
        match m {
            Mode::And => SearchMode::And,
            Mode::Or => SearchMode::Or,
            Mode::Not => SearchMode::Not,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Boolean search, optionally ranked by TF-IDF
    Search {
        query: String,
        #[arg(long, value_enum, default_value_t = Mode::And)]
        mode: Mode,
        #[arg(long, default_value_t = false)]
        rank: bool,
        /// Print JSON instead of one path per line
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Exact phrase search
    Phrase {
        phrase: String,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print document, term and token counts
    Stats,
    /// Walk through every operation against the indexed folder
    Demo,
}

#[derive(Serialize)]
struct HitOut<'a> {
    path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<f64>,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let (mut index, report) = InvertedIndex::build_index(&cli.data);
    for (path, err) in &report.failed {
        eprintln!("skipped {}: {err}", path.display());
    }
    if index.is_empty() {
        bail!("no documents indexed from '{}', check that it contains .txt files", cli.data);
    }
    tracing::info!(documents = index.len(), "index ready");

    match cli.command {
        Commands::Search { query, mode, rank, json } => {
            let hits = index.search(&query, mode.into(), rank)?;
            print_hits(&hits, json)?;
        }
        Commands::Phrase { phrase, json } => {
            let hits = Hits::Unranked(index.phrase_search(&phrase));
            print_hits(&hits, json)?;
        }
        Commands::Stats => {
            println!("{}", serde_json::to_string_pretty(&index.stats())?);
        }
        Commands::Demo => demo(&mut index, &cli.data)?,
    }
    Ok(())
}

fn print_hits(hits: &Hits<'_>, json: bool) -> Result<()> {
    if json {
        let out: Vec<HitOut<'_>> = hits
            .entries()
            .into_iter()
            .map(|(path, score)| HitOut { path, score })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    for (path, score) in hits.entries() {
        match score {
            Some(score) => println!("{score:.6}\t{path}"),
            None => println!("{path}"),
        }
    }
    Ok(())
}

fn section(title: &str, hits: &Hits<'_>) -> Result<()> {
    println!("== {title}");
    println!("files found: {}", hits.len());
    print_hits(hits, false)?;
    println!();
    Ok(())
}

fn demo(index: &mut InvertedIndex, data: &str) -> Result<()> {
    println!("index contains {} documents\n", index.len());

    section("search NOT 'suraj'", &index.search("suraj", SearchMode::Not, false)?)?;
    section("search AND 'suraj'", &index.search("suraj", SearchMode::And, false)?)?;

    let target = format!("{data}/mit.txt");
    if let Err(e) = index.delete_path(&target) {
        println!("delete: {e}");
    }
    section("after delete, search AND 'suraj'", &index.search("suraj", SearchMode::And, false)?)?;

    if let Err(e) = index.update_document(&target) {
        println!("update: {e}");
    }
    section("after update, search AND 'suraj'", &index.search("suraj", SearchMode::And, false)?)?;

    section("search OR 'suraj appropriate'", &index.search("suraj appropriate", SearchMode::Or, false)?)?;
    for mode in [SearchMode::And, SearchMode::Or] {
        match index.search("suraj appropriate", mode, true) {
            Ok(hits) => section(&format!("search {mode} 'suraj appropriate' ranked"), &hits)?,
            Err(e) => println!("== search {mode} 'suraj appropriate' ranked\nranking failed: {e}\n"),
        }
    }

    let phrase = Hits::Unranked(index.phrase_search("Free Software Foundation"));
    section("phrase 'Free Software Foundation'", &phrase)?;
    Ok(())
}

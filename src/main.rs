use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use docvec::config::{DocvecConfig, Overrides, State};
use docvec::{
    persistence, source, CorpusIndex, DocumentEmbedder, RecommendationTable, StopWords, Tokenizer,
    Vocabulary,
};

#[derive(Parser)]
#[command(name = "docvec")]
#[command(version = "0.1")]
#[command(about = "Recommend similar documents from averaged word vectors", long_about = None)]
struct Cli {
    /// Word vector file, one `<word> <float> ...` entry per line
    vocabulary: PathBuf,

    /// Corpus root; each document's topic is its parent folder
    corpus: PathBuf,

    /// Directory for the article and recommendation snapshots
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Recommendations per document
    #[arg(short = 'n', long)]
    top_n: Option<usize>,

    /// Worker threads (defaults to one per core)
    #[arg(long)]
    threads: Option<usize>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Print the resolved configuration and exit
    #[arg(long)]
    show_config: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "docvec=debug" } else { "docvec=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(state: &State) -> Result<serde_json::Value> {
    let start = Instant::now();
    let stopwords = StopWords::english();

    let vocabulary = Vocabulary::open(&state.vocabulary_path, &stopwords).with_context(|| {
        format!(
            "Failed to load vocabulary '{}'",
            state.vocabulary_path.display()
        )
    })?;

    let raw = source::scan(&state.corpus_root, state.extension.as_deref()).with_context(|| {
        format!("Failed to read corpus '{}'", state.corpus_root.display())
    })?;

    let embedder = DocumentEmbedder::new(Tokenizer::new(&stopwords), &vocabulary);
    let corpus = CorpusIndex::build(raw, &embedder).context("Failed to index corpus")?;
    let (table, report) = RecommendationTable::build(&corpus, state.top_n);

    persistence::save_articles(&corpus, &state.articles_path).with_context(|| {
        format!("Failed to write '{}'", state.articles_path.display())
    })?;
    persistence::save_recommendations(&table, &state.recommended_path).with_context(|| {
        format!("Failed to write '{}'", state.recommended_path.display())
    })?;

    tracing::info!("Finished in {:?}", start.elapsed());

    Ok(serde_json::json!({
        "vocabulary": {
            "words": vocabulary.len(),
            "dimensions": vocabulary.dimensions(),
        },
        "documents_processed": corpus.len(),
        "documents_skipped_empty_embedding": corpus.skipped_count(),
        "recommendations_computed": report.recommendations,
        "short_lists": report.short,
        "requested_results_count": state.top_n,
        "articles_path": state.articles_path.display().to_string(),
        "recommended_path": state.recommended_path.display().to_string(),
    }))
}

fn main() -> Result<()> {
    let args = Cli::parse();
    let overrides = Overrides {
        output_dir: args.output_dir,
        top_n: args.top_n,
        threads: args.threads,
        verbose: args.verbose,
    };
    let state = State::new(&args.vocabulary, &args.corpus, DocvecConfig::load()?, overrides)?;

    if args.show_config {
        state.print_config();
        return Ok(());
    }

    init_tracing(state.verbose);

    if let Some(threads) = state.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure worker threads")?;
    }

    let status = run(&state)?;
    println!("{}", serde_json::to_string(&status)?);

    Ok(())
}

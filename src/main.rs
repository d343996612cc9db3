//! # Transcript Search CLI (`tsx`)
//!
//! ## Usage
//!
//! ```bash
//! tsx --config ./config/tsx.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `tsx search "<query>"` | Ranked, highlighted search with filters and paging |
//! | `tsx chunk <id>` | Print one transcript chunk as JSON |
//! | `tsx read <id>` | Stream a whole transcript and print metadata and content |
//! | `tsx serve` | Start the HTTP API |
//!
//! `search`, `chunk`, and `read` accept `--remote <url>` to query a running
//! server instead of loading the corpus locally.
//!
//! Logs go to stderr; set `RUST_LOG` (e.g. `RUST_LOG=debug`) for more detail.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use transcript_search::render::MarkStyle;
use transcript_search::{chunk, config, read, search, server};
use transcript_search_core::scoring::SortOrder;
use transcript_search_core::search::{SearchFilters, SearchRequest};

/// Transcript Search CLI: accent-insensitive search and incremental
/// retrieval over long-form transcripts.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/tsx.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "tsx",
    about = "Transcript Search: accent-insensitive search and chunked retrieval over transcripts",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/tsx.toml`. When the file does not exist the
    /// built-in defaults and sample corpus are used.
    #[arg(long, global = true, default_value = "./config/tsx.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the corpus.
    ///
    /// Matching ignores accents and case. Results carry a snippet around the
    /// first match with every occurrence in the window highlighted.
    Search {
        /// The search query string.
        query: String,

        /// Page number (1-based).
        #[arg(long, allow_negative_numbers = true)]
        page: Option<i64>,

        /// Results per page (1-100). Defaults to `[search].default_page_size`.
        #[arg(long, allow_negative_numbers = true)]
        page_size: Option<i64>,

        /// Keep only channels containing this text (accent-insensitive).
        #[arg(long)]
        channel: Option<String>,

        /// Only documents published on or after this date (YYYY-MM-DD or RFC 3339).
        #[arg(long)]
        after: Option<String>,

        /// Only documents published on or before this date (YYYY-MM-DD or RFC 3339).
        #[arg(long)]
        before: Option<String>,

        /// Sort order: `relevance`, `date-desc`, or `date-asc`.
        #[arg(long, default_value = "relevance")]
        sort: String,

        /// Print the raw JSON response.
        #[arg(long)]
        json: bool,

        /// Highlight style: `auto`, `ansi`, or `tags`.
        #[arg(long, default_value = "auto")]
        marks: String,

        /// Base URL of a running `tsx serve`.
        #[arg(long)]
        remote: Option<String>,
    },

    /// Print one chunk of a transcript as JSON.
    ///
    /// Follow `nextOffset` from the output to read the next chunk; it is
    /// null at the end of the transcript.
    Chunk {
        /// Document id.
        id: String,

        /// Character offset to start from.
        #[arg(long, allow_negative_numbers = true)]
        offset: Option<i64>,

        /// Maximum characters to return. Defaults to `[chunking].default_limit`.
        #[arg(long, allow_negative_numbers = true)]
        limit: Option<i64>,

        /// Report match positions of this query inside the chunk.
        #[arg(long, short)]
        q: Option<String>,

        /// Base URL of a running `tsx serve`.
        #[arg(long)]
        remote: Option<String>,
    },

    /// Stream a whole transcript and print its metadata and content.
    Read {
        /// Document id.
        id: String,

        /// Highlight every occurrence of this text.
        #[arg(long)]
        highlight: Option<String>,

        /// Highlight style: `auto`, `ansi`, or `tags`.
        #[arg(long, default_value = "auto")]
        marks: String,

        /// Base URL of a running `tsx serve`.
        #[arg(long)]
        remote: Option<String>,
    },

    /// Start the HTTP API.
    ///
    /// Binds to `[server].bind` and serves `POST /api/v1/search`,
    /// `GET /api/v1/transcripts/{id}`, and `GET /health`.
    Serve,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let cfg = config::load_or_minimal(&cli.config)?;

    match cli.command {
        Commands::Search {
            query,
            page,
            page_size,
            channel,
            after,
            before,
            sort,
            json,
            marks,
            remote,
        } => {
            let sort: SortOrder = sort.parse().map_err(anyhow::Error::msg)?;
            let filters = SearchFilters {
                channel_id: channel,
                published_after: after,
                published_before: before,
            }
            .cleaned();
            let req = SearchRequest {
                query,
                page,
                page_size,
                filters: (!filters.is_empty()).then_some(filters),
                sort,
            };
            let marks = MarkStyle::from_flag(&marks)?;
            search::run_search(&cfg, &req, remote.as_deref(), json, marks).await?;
        }
        Commands::Chunk {
            id,
            offset,
            limit,
            q,
            remote,
        } => {
            chunk::run_chunk(&cfg, &id, offset, limit, q.as_deref(), remote.as_deref()).await?;
        }
        Commands::Read {
            id,
            highlight,
            marks,
            remote,
        } => {
            let marks = MarkStyle::from_flag(&marks)?;
            read::run_read(&cfg, &id, highlight.as_deref(), remote.as_deref(), marks).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}

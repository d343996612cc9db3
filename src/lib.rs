//! # Transcript Search
//!
//! Accent-insensitive search and incremental retrieval over a corpus of
//! long-form transcripts.
//!
//! The algorithms (matching, snippets, scoring, pagination, chunk cursor,
//! metadata extraction, client cache) live in
//! [`transcript_search_core`]; this crate wires them to configuration, a
//! corpus on disk, an HTTP API, and the `tsx` command line.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌───────────────┐   ┌────────────────┐
//! │ corpus.json │──▶│ InMemoryStore │──▶│ search / chunk │
//! └─────────────┘   └───────────────┘   └───────┬────────┘
//!                                               │
//!                           ┌───────────────────┤
//!                           ▼                   ▼
//!                      ┌──────────┐       ┌──────────┐
//!                      │   CLI    │       │   HTTP   │
//!                      │  (tsx)   │       │  (axum)  │
//!                      └──────────┘       └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! tsx search "indice invertido"           # search the sample corpus
//! tsx chunk vid-003 --offset 0 --limit 100 # one window as JSON
//! tsx read vid-004 --highlight indice      # stream a whole transcript
//! tsx serve                                # start the HTTP API
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`corpus`] | Corpus loading and the sample corpus |
//! | [`server`] | HTTP API |
//! | [`client`] | HTTP client for a running server |
//! | [`search`] | `tsx search` |
//! | [`chunk`] | `tsx chunk` |
//! | [`read`] | `tsx read` |
//! | [`render`] | Terminal rendering of highlights |

pub mod chunk;
pub mod client;
pub mod config;
pub mod corpus;
pub mod read;
pub mod render;
pub mod search;
pub mod server;

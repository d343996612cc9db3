//! `tsx search`: run a query and print ranked, highlighted results.

use anyhow::Result;

use transcript_search_core::models::SearchResponse;
use transcript_search_core::search::{search, SearchRequest};

use crate::client::{ApiClient, DEFAULT_TIMEOUT};
use crate::config::Config;
use crate::corpus::load_corpus;
use crate::render::{format_number, MarkStyle};

/// Run `req` against the configured corpus, or against `remote` when given.
pub async fn execute_search(
    config: &Config,
    req: &SearchRequest,
    remote: Option<&str>,
) -> Result<SearchResponse> {
    let resp = match remote {
        Some(url) => ApiClient::new(url, DEFAULT_TIMEOUT)?.search(req).await?,
        None => {
            let store = load_corpus(config)?;
            search(&store, req, &config.search.params()).await?
        }
    };
    Ok(resp)
}

/// CLI entry point: search and print to stdout.
pub async fn run_search(
    config: &Config,
    req: &SearchRequest,
    remote: Option<&str>,
    json: bool,
    marks: MarkStyle,
) -> Result<()> {
    let resp = execute_search(config, req, remote).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&resp)?);
        return Ok(());
    }

    print!("{}", format_results(&resp, marks));
    Ok(())
}

/// Human-readable listing followed by the page summary.
pub fn format_results(resp: &SearchResponse, marks: MarkStyle) -> String {
    if resp.total_hits == 0 {
        return "No results.\n".to_string();
    }

    let mut out = String::new();
    let first_rank = (resp.page - 1) * resp.page_size;
    for (i, result) in resp.results.iter().enumerate() {
        let date = result
            .published_at
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());

        out.push_str(&format!(
            "{}. [{:.2}] {} / {}\n",
            first_rank + i + 1,
            result.score,
            result.channel,
            result.title
        ));
        out.push_str(&format!("    published: {}\n", date));
        out.push_str(&format!(
            "    matches: {}  length: {} chars\n",
            result.match_positions.len(),
            format_number(result.length_chars as u64)
        ));
        out.push_str(&format!(
            "    excerpt: \"{}\"\n",
            marks.render(result.snippet.replace('\n', " ").trim())
        ));
        out.push_str(&format!("    id: {}\n\n", result.id));
    }

    if resp.results.is_empty() {
        out.push_str("No results on this page.\n");
    }
    out.push_str(&format!(
        "{} results · avg length {} chars · page {}/{}\n",
        format_number(resp.total_hits as u64),
        format_number(resp.stats.avg_length),
        resp.page,
        resp.page_count
    ));
    out
}

//! Corpus provisioning.
//!
//! The corpus is a JSON array of documents loaded once at startup into an
//! [`InMemoryStore`]. When `[corpus].path` is unset a small built-in sample
//! corpus is served instead, which is enough to try every endpoint.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::{info, warn};

use transcript_search_core::models::Document;
use transcript_search_core::store::memory::InMemoryStore;

use crate::config::Config;

/// Build the store described by `config`.
pub fn load_corpus(config: &Config) -> Result<InMemoryStore> {
    match config.corpus.path {
        Some(ref path) => load_corpus_file(path),
        None => {
            let store = sample_corpus();
            info!(documents = store.len(), "serving built-in sample corpus");
            Ok(store)
        }
    }
}

/// Read a JSON array of documents from disk.
///
/// Documents with an empty id are rejected. A repeated id replaces the
/// earlier document in place.
pub fn load_corpus_file(path: &Path) -> Result<InMemoryStore> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read corpus file: {}", path.display()))?;
    let docs: Vec<Document> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse corpus file: {}", path.display()))?;

    let mut store = InMemoryStore::new();
    for (i, doc) in docs.into_iter().enumerate() {
        if doc.id.trim().is_empty() {
            bail!("corpus document #{} has an empty id", i);
        }
        let before = store.len();
        let id = doc.id.clone();
        store.insert(doc);
        if store.len() == before {
            warn!(id = %id, "duplicate document id in corpus, keeping the later one");
        }
    }

    info!(documents = store.len(), path = %path.display(), "corpus loaded");
    Ok(store)
}

fn ts(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Built-in demo corpus.
pub fn sample_corpus() -> InMemoryStore {
    vec![
        Document {
            id: "vid-001".to_string(),
            title: "Introdução ao Buscador de Transcrições".to_string(),
            channel: "Canal Dev BR".to_string(),
            published_at: ts("2025-08-15T12:00:00Z"),
            text: "Bem-vindo ao buscador de transcrições. Este vídeo explica como pesquisar \
                   por palavras-chave, aplicar filtros por canal e data, e visualizar \
                   transcrições completas com carregamento incremental. Você pode buscar por \
                   termos como 'Next.js', 'índice invertido' ou 'relevância'. Também mostramos \
                   como os resultados são ordenados por relevância, mais recentes e mais \
                   antigos. No final, há uma demonstração prática com exemplos reais para \
                   você acompanhar passo a passo."
                .to_string(),
        },
        Document {
            id: "vid-002".to_string(),
            title: "Estratégias de Indexação e Ranking".to_string(),
            channel: "Dados & Busca".to_string(),
            published_at: ts("2025-05-02T09:30:00Z"),
            text: "Nesta sessão, cobrimos estratégias de indexação, normalização de texto, \
                   tokenização e ranqueamento. Discutimos BM25, TF-IDF e considerações de \
                   performance para bancos de dados de transcrições longas. Também abordamos \
                   técnicas de snippet para destacar as ocorrências do termo pesquisado no \
                   contexto, com <mark>realce</mark> seguro."
                .to_string(),
        },
        Document {
            id: "vid-003".to_string(),
            title: "Paginação, Chunks e Lazy Loading".to_string(),
            channel: "Canal Dev BR".to_string(),
            published_at: ts("2024-12-20T18:45:00Z"),
            text: "Falamos sobre paginação de resultados e carregamento incremental de \
                   transcrições grandes por chunk. Mostramos como utilizar offset, limit e \
                   como calcular o nextOffset até atingir o fim da transcrição. Também \
                   exemplificamos a sinalização de 'Fim da transcrição.' quando não há mais \
                   conteúdo para carregar."
                .to_string(),
        },
        Document {
            id: "vid-004".to_string(),
            title: "Normalização de Texto na Prática".to_string(),
            channel: "Dados & Busca".to_string(),
            published_at: ts("2025-02-10T15:00:00Z"),
            text: "<metadata><channel><title>Dados & Busca</title>\
                   <youtube_id>UCdadosebusca</youtube_id></channel>\
                   <video_id>n0rm4l1z4c40</video_id><chunk_id>1</chunk_id>\
                   <start_ts>00:00:00</start_ts><end_ts>00:18:42</end_ts></metadata>\
                   <content>Hoje o assunto é normalização de texto.\\nRemovemos acentos com \
                   decomposição NFD e comparamos tudo em minúsculas.\\nAssim, 'Índice' e \
                   'indice' são o mesmo termo para o buscador.</content>"
                .to_string(),
        },
    ]
    .into_iter()
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use transcript_search_core::store::Store;
    use transcript_search_core::transcript::parse_transcript;

    #[tokio::test]
    async fn test_sample_corpus() {
        let store = sample_corpus();
        assert_eq!(store.len(), 4);
        let doc = store.get_document("vid-004").await.unwrap().unwrap();
        let parsed = parse_transcript(&doc.text);
        assert_eq!(parsed.video_id.as_deref(), Some("n0rm4l1z4c40"));
        assert!(parsed.content.contains('\n'));
    }

    #[tokio::test]
    async fn test_load_corpus_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(
            f,
            r#"[
                {{"id": "a", "title": "A", "channel": "C", "publishedAt": "2025-01-01T00:00:00Z", "text": "um"}},
                {{"id": "b", "title": "B", "channel": "C", "text": "dois"}},
                {{"id": "a", "title": "A2", "channel": "C", "text": "três"}}
            ]"#
        )
        .unwrap();

        let store = load_corpus_file(f.path()).unwrap();
        assert_eq!(store.len(), 2);
        let a = store.get_document("a").await.unwrap().unwrap();
        assert_eq!(a.title, "A2");
        let b = store.get_document("b").await.unwrap().unwrap();
        assert!(b.published_at.is_none());
    }

    #[test]
    fn test_load_corpus_errors() {
        assert!(load_corpus_file(Path::new("/no/such/corpus.json")).is_err());

        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"[{{"id": " ", "title": "", "channel": "", "text": ""}}]"#).unwrap();
        let err = load_corpus_file(f.path()).unwrap_err();
        assert!(err.to_string().contains("empty id"));

        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "{{ not json").unwrap();
        assert!(load_corpus_file(f.path()).is_err());
    }

    #[test]
    fn test_unset_path_uses_sample() {
        let store = load_corpus(&Config::minimal()).unwrap();
        assert_eq!(store.len(), 4);
    }
}

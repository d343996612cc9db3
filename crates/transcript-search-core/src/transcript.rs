//! Metadata extraction from tagged transcript text.
//!
//! Transcripts may start with a tagged header:
//!
//! ```text
//! <metadata>
//!   <channel><title>...</title><youtube_id>...</youtube_id></channel>
//!   <video_id>...</video_id><chunk_id>...</chunk_id>
//!   <start_ts>...</start_ts><end_ts>...</end_ts>
//! </metadata>
//! <content>...</content>
//! ```
//!
//! Extraction is a flat, first-match scan per tag name: the first `<tag>`
//! pairs with the first `</tag>` after it. Same-named nested tags are not
//! supported. Missing tags become `None`; nothing here ever fails.

use serde::{Deserialize, Serialize};

const YOUTUBE_CHANNEL_URL: &str = "https://www.youtube.com/channel/";
const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// Fields pulled out of the first chunk of a transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTranscript {
    pub channel_title: Option<String>,
    pub youtube_id: Option<String>,
    pub video_id: Option<String>,
    pub chunk_id: Option<String>,
    pub start_ts: Option<String>,
    pub end_ts: Option<String>,
    /// Body of the `<content>` block with `\n` escapes expanded. Empty when
    /// the block is missing.
    pub content: String,
    /// Whether a closed `<metadata>` or `<content>` block was found, even
    /// an empty one.
    #[serde(default)]
    pub tagged: bool,
}

impl ParsedTranscript {
    /// True when the text carried a metadata header or a content block.
    pub fn is_tagged(&self) -> bool {
        self.tagged
    }

    pub fn channel_url(&self) -> Option<String> {
        self.youtube_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(|id| format!("{}{}", YOUTUBE_CHANNEL_URL, id))
    }

    pub fn watch_url(&self) -> Option<String> {
        self.video_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(|id| format!("{}{}", YOUTUBE_WATCH_URL, id))
    }
}

/// Trimmed body of the first `<tag>...</tag>` pair in `text`.
///
/// ```rust
/// use transcript_search_core::transcript::extract_tag;
///
/// assert_eq!(extract_tag("<a> x </a><a>y</a>", "a").as_deref(), Some("x"));
/// assert_eq!(extract_tag("<a>open", "a"), None);
/// ```
pub fn extract_tag(text: &str, tag: &str) -> Option<String> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);
    let start = text.find(&open)? + open.len();
    let len = text[start..].find(&close)?;
    Some(text[start..start + len].trim().to_string())
}

/// Replace the two-character escape `\n` with a line break.
pub fn unescape_newlines(s: &str) -> String {
    s.replace("\\n", "\n")
}

/// Parse a transcript chunk. Untagged text yields all-`None` metadata and
/// empty content.
pub fn parse_transcript(raw: &str) -> ParsedTranscript {
    let metadata = extract_tag(raw, "metadata");
    let content = extract_tag(raw, "content");
    let tagged = metadata.is_some() || content.is_some();
    let channel = metadata.as_deref().and_then(|m| extract_tag(m, "channel"));
    let in_metadata = |tag: &str| metadata.as_deref().and_then(|m| extract_tag(m, tag));
    let in_channel = |tag: &str| channel.as_deref().and_then(|c| extract_tag(c, tag));

    ParsedTranscript {
        channel_title: in_channel("title"),
        youtube_id: in_channel("youtube_id"),
        video_id: in_metadata("video_id"),
        chunk_id: in_metadata("chunk_id"),
        start_ts: in_metadata("start_ts"),
        end_ts: in_metadata("end_ts"),
        content: content.map(|c| unescape_newlines(&c)).unwrap_or_default(),
        tagged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAGGED: &str = "<metadata><channel><title>Dados & Busca</title>\
        <youtube_id>UC123</youtube_id></channel><video_id>abc-9</video_id>\
        <chunk_id>7</chunk_id><start_ts>00:00:00</start_ts><end_ts>00:42:10</end_ts>\
        </metadata><content> Linha um\\nLinha dois </content>";

    #[test]
    fn test_full_header() {
        let p = parse_transcript(TAGGED);
        assert_eq!(p.channel_title.as_deref(), Some("Dados & Busca"));
        assert_eq!(p.youtube_id.as_deref(), Some("UC123"));
        assert_eq!(p.video_id.as_deref(), Some("abc-9"));
        assert_eq!(p.chunk_id.as_deref(), Some("7"));
        assert_eq!(p.start_ts.as_deref(), Some("00:00:00"));
        assert_eq!(p.end_ts.as_deref(), Some("00:42:10"));
        assert_eq!(p.content, "Linha um\nLinha dois");
        assert!(p.is_tagged());
    }

    #[test]
    fn test_derived_links() {
        let p = parse_transcript(TAGGED);
        assert_eq!(
            p.channel_url().as_deref(),
            Some("https://www.youtube.com/channel/UC123")
        );
        assert_eq!(
            p.watch_url().as_deref(),
            Some("https://www.youtube.com/watch?v=abc-9")
        );
        assert_eq!(ParsedTranscript::default().watch_url(), None);
    }

    #[test]
    fn test_plain_text_is_noop() {
        let p = parse_transcript("apenas texto corrido, sem marcação");
        assert_eq!(p, ParsedTranscript::default());
        assert!(!p.is_tagged());
    }

    #[test]
    fn test_partial_header() {
        let p = parse_transcript("<metadata><video_id>v1</video_id></metadata>");
        assert_eq!(p.video_id.as_deref(), Some("v1"));
        assert_eq!(p.channel_title, None);
        assert_eq!(p.end_ts, None);
        assert_eq!(p.content, "");
    }

    #[test]
    fn test_channel_fields_outside_metadata_ignored() {
        let p = parse_transcript("<channel><title>x</title></channel><content>c</content>");
        assert_eq!(p.channel_title, None);
        assert_eq!(p.content, "c");
    }

    #[test]
    fn test_multiline_content() {
        let p = parse_transcript("<content>\nprimeira\nsegunda\n</content>");
        assert_eq!(p.content, "primeira\nsegunda");
    }

    #[test]
    fn test_nested_same_tag_takes_first_close() {
        assert_eq!(
            extract_tag("<b>outer <b>inner</b> tail</b>", "b").as_deref(),
            Some("outer <b>inner")
        );
    }

    #[test]
    fn test_empty_blocks_still_count_as_tagged() {
        for raw in ["<content></content>", "<content>   </content>", "<metadata></metadata>"] {
            let p = parse_transcript(raw);
            assert!(p.is_tagged(), "{} not tagged", raw);
            assert_eq!(p.content, "");
        }
    }

    #[test]
    fn test_unclosed_content_block() {
        let p = parse_transcript("<content>cortado no meio do chunk");
        assert_eq!(p.content, "");
        assert!(!p.is_tagged());
    }

    #[test]
    fn test_serializes_camel_case_nulls() {
        let v = serde_json::to_value(parse_transcript("x")).unwrap();
        assert!(v["channelTitle"].is_null());
        assert!(v["youtubeId"].is_null());
        assert_eq!(v["content"], "");
    }
}

//! Citation list for a live batch.
//!
//! Keeps only fragments that carry a web citation and copies their
//! `title`/`uri` verbatim, in input order. No deduplication and no URI
//! validation happen here.

use crate::gemini::GroundingChunk;
use crate::models::SourceRecord;

pub fn extract_sources(chunks: &[GroundingChunk]) -> Vec<SourceRecord> {
    chunks
        .iter()
        .filter_map(|chunk| chunk.web.as_ref())
        .map(|web| SourceRecord {
            title: web.title.clone().unwrap_or_default(),
            uri: web.uri.clone().unwrap_or_default(),
        })
        .collect()
}

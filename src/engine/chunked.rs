//! Caller-level sharding: encode and decode independent chunks of one input
//! on blocking worker tasks, all sharing a single read-only codec.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use crate::engine::bits::EncodedBits;
use crate::engine::codec::HuffmanCodec;
use crate::engine::error::CodingError;

pub async fn encode_chunked<S>(
    codec: Arc<HuffmanCodec<S>>,
    symbols: Arc<[S]>,
    chunk_size: usize,
) -> Result<Vec<EncodedBits>>
where
    S: Eq + Hash + Clone + Debug + Send + Sync + 'static,
{
    if chunk_size == 0 {
        return Err(CodingError::InvalidChunkSize.into());
    }

    let mut handles = Vec::new();
    for start in (0..symbols.len()).step_by(chunk_size) {
        let end = (start + chunk_size).min(symbols.len());
        let codec = Arc::clone(&codec);
        let symbols = Arc::clone(&symbols);
        handles.push(tokio::task::spawn_blocking(move || {
            codec.encode(&symbols[start..end])
        }));
    }
    debug!(chunks = handles.len(), chunk_size, "encoding chunks");

    let mut chunks = Vec::with_capacity(handles.len());
    for (i, handle) in handles.into_iter().enumerate() {
        let bits = handle
            .await
            .with_context(|| format!("encode worker for chunk {} failed", i))?
            .with_context(|| format!("chunk {}", i))?;
        chunks.push(bits);
    }
    Ok(chunks)
}

/// Decodes every chunk concurrently and joins the results in chunk order.
pub async fn decode_chunked<S>(
    codec: Arc<HuffmanCodec<S>>,
    chunks: Vec<EncodedBits>,
) -> Result<Vec<S>>
where
    S: Eq + Hash + Clone + Debug + Send + Sync + 'static,
{
    let handles: Vec<_> = chunks
        .into_iter()
        .map(|bits| {
            let codec = Arc::clone(&codec);
            tokio::task::spawn_blocking(move || codec.decode(&bits))
        })
        .collect();
    debug!(chunks = handles.len(), "decoding chunks");

    let mut out = Vec::new();
    for (i, handle) in handles.into_iter().enumerate() {
        let symbols = handle
            .await
            .with_context(|| format!("decode worker for chunk {} failed", i))?
            .with_context(|| format!("chunk {}", i))?;
        out.extend(symbols);
    }
    Ok(out)
}

//! Progressive console streaming
//!
//! The server returns console text in chunks: each response carries the
//! text, the byte offset to resume from, and a flag for whether more output
//! is pending. The poll loop here is explicit, with the chunk source, the
//! clock, and the output sink all injectable so tests can drive it without
//! a server or real delays.

use async_trait::async_trait;
use std::io::Write;
use std::time::Duration;
use tracing::debug;

use crate::api::JobApi;
use crate::error::Result;

/// One chunk of progressive console output
#[derive(Debug, Clone, Default)]
pub struct ConsoleChunk {
    /// Text returned by the server, possibly empty
    pub text: String,
    /// Byte offset to resume from on the next fetch
    pub size: u64,
    /// Whether the server has, or still expects, more output
    pub more: bool,
}

/// Clock dependency for the poll loop
#[async_trait]
pub trait Sleep: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Production clock backed by the tokio timer
pub struct TokioSleep;

#[async_trait]
impl Sleep for TokioSleep {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Stream a job's console output until the server reports nothing pending
///
/// Prints only newly arrived non-empty text, polling at the given refresh
/// interval, and finishes with a flush of any trailing text. This blocks
/// until the remote build stops producing output; completion is bounded by
/// the server, not by a client-side timeout.
pub async fn stream_console<A, S, W>(
    api: &A,
    name: &str,
    refresh: Duration,
    clock: &S,
    out: &mut W,
) -> Result<()>
where
    A: JobApi + ?Sized,
    S: Sleep + ?Sized,
    W: Write,
{
    let mut chunk = api.console_chunk(name, 0).await?;

    while chunk.more {
        write_text(out, &chunk.text)?;
        clock.sleep(refresh).await;
        debug!(name, start = chunk.size, "fetching next console chunk");
        chunk = api.console_chunk(name, chunk.size).await?;
    }

    // trailing output buffered after the last poll
    write_text(out, &chunk.text)?;
    Ok(())
}

fn write_text<W: Write>(out: &mut W, text: &str) -> Result<()> {
    if !text.trim_end_matches(['\r', '\n']).is_empty() {
        out.write_all(text.as_bytes())?;
        out.flush()?;
    }
    Ok(())
}

// Relay: copy the child's stdout channel into every sink in arrival order

use std::io;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{trace, warn};

use crate::domain::constants::RELAY_CHUNK_SIZE;

/// Destination for relayed bytes (console, output file, ...)
pub type Sink<'a> = &'a mut (dyn AsyncWrite + Send + Unpin);

/// What a finished relay moved
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelaySummary {
    pub bytes: u64,
    pub chunks: u64,
    /// Read error that ended the loop instead of a clean end-of-stream
    pub read_anomaly: Option<String>,
}

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Sink write failed: {0}")]
    Sink(#[source] io::Error),
}

/// Write `bytes` verbatim to every sink, flushing each one
pub async fn write_to_sinks(sinks: &mut [Sink<'_>], bytes: &[u8]) -> Result<(), RelayError> {
    for sink in sinks.iter_mut() {
        sink.write_all(bytes).await.map_err(RelayError::Sink)?;
        sink.flush().await.map_err(RelayError::Sink)?;
    }
    Ok(())
}

/// Relay `reader` into `sinks` until end-of-stream
///
/// Reads at most `RELAY_CHUNK_SIZE` bytes at a time and forwards exactly the
/// bytes read: no text decoding, no terminators, no buffering beyond one chunk.
///
/// A read error ends the loop like end-of-stream does; it is reported through
/// `RelaySummary::read_anomaly` rather than as an error.
///
/// # Errors
/// - RelayError::Sink if any sink rejects a write
pub async fn relay<R>(reader: &mut R, sinks: &mut [Sink<'_>]) -> Result<RelaySummary, RelayError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = [0u8; RELAY_CHUNK_SIZE];
    let mut summary = RelaySummary::default();

    loop {
        let n = match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!(error = %e, bytes = summary.bytes, "Channel read failed, ending relay");
                summary.read_anomaly = Some(e.to_string());
                break;
            }
        };

        write_to_sinks(sinks, &buf[..n]).await?;
        summary.bytes += n as u64;
        summary.chunks += 1;
        trace!(chunk_len = n, total = summary.bytes, "Relayed chunk");
    }

    Ok(summary)
}

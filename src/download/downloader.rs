//! Streamed file transfer with progress reporting

use crate::core::progress::{ProgressRenderer, ProgressState};
use crate::error::{StreamError, TransferError};
use crate::platform::client::TubeClient;
use futures_util::TryStreamExt;
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::io::StreamReader;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Read buffer size
pub const CHUNK_SIZE: usize = 32 * 1024;

/// Position of one transfer within its batch, and its display name
#[derive(Debug, Clone)]
pub struct TransferLabel {
    pub name: String,
    pub item_index: usize,
    pub item_count: usize,
}

impl TransferLabel {
    pub fn new(name: impl Into<String>, item_index: usize, item_count: usize) -> Self {
        Self {
            name: name.into(),
            item_index,
            item_count,
        }
    }
}

/// Copy `source` into `sink` in fixed-size chunks, reporting progress.
///
/// Each chunk is fully written before the next read. A zero-length read ends
/// the stream. Returns the number of bytes written.
pub async fn copy_with_progress<R, W, P>(
    source: &mut R,
    sink: &mut W,
    total: Option<u64>,
    label: &TransferLabel,
    renderer: &P,
    cancel: &CancellationToken,
) -> Result<u64, StreamError>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
    P: ProgressRenderer + ?Sized,
{
    let mut state = ProgressState::new(total, &label.name, label.item_index, label.item_count);
    let mut buffer = vec![0u8; CHUNK_SIZE];

    let result = loop {
        let read = tokio::select! {
            biased;
            _ = cancel.cancelled() => break Err(StreamError::Cancelled),
            read = source.read(&mut buffer) => read,
        };

        let n = match read {
            Ok(0) => break Ok(state.bytes_written),
            Ok(n) => n,
            Err(e) => break Err(StreamError::ReadData(e)),
        };

        if let Err(e) = sink.write_all(&buffer[..n]).await {
            break Err(StreamError::WriteToFile(e));
        }
        state.bytes_written += n as u64;
        renderer.render(&state);
    };

    if result.is_ok() {
        renderer.render(&state);
        debug!("{}", state);
    }
    renderer.finish();

    result
}

/// Download the variant at `path` into `sink`.
///
/// The content length, when the server sends one, becomes the progress total.
pub async fn fetch_variant<W, P>(
    client: &TubeClient,
    path: &str,
    sink: &mut W,
    label: &TransferLabel,
    renderer: &P,
) -> Result<u64, TransferError>
where
    W: AsyncWrite + Unpin + ?Sized,
    P: ProgressRenderer + ?Sized,
{
    info!("Downloading {} from {}", label.name, path);
    let response = client.get_ok(path).await.map_err(TransferError::Fetch)?;
    let total = response.content_length();
    debug!("Content length: {:?}", total);

    let body = StreamReader::new(response.bytes_stream().map_err(io::Error::other));
    tokio::pin!(body);
    let written = copy_with_progress(
        &mut body,
        sink,
        total,
        label,
        renderer,
        client.cancellation(),
    )
    .await
    .map_err(TransferError::Copy)?;

    sink.flush()
        .await
        .map_err(|e| TransferError::Copy(StreamError::WriteToFile(e)))?;

    info!("Download completed: {} bytes", written);
    Ok(written)
}

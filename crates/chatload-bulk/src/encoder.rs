//! The ordered streaming encoder.
//!
//! Producers hand records through a bounded queue to a single consumer
//! task that owns the output buffer. Ownership of a record transfers into
//! the queue; nothing touches it after enqueueing. Because the consumer
//! is the sole writer and never reorders, the stream order is exactly the
//! enqueue order.

use crate::record::BulkRecord;
use chatload_population::Population;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Depth of the hand-off queue between producers and the consumer.
pub const ENCODER_QUEUE_DEPTH: usize = 100;

/// Errors from the encoding pipeline.
#[derive(Error, Debug)]
pub enum EncodeError {
    /// The consumer went away while records were still being enqueued.
    #[error("encoder consumer closed before the stream was complete")]
    ConsumerClosed,

    /// The consumer task panicked or was cancelled.
    #[error("encoder consumer failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Metrics from one encode run.
#[derive(Debug, Clone, Default)]
pub struct EncodeMetrics {
    pub records_written: u64,
    pub records_failed: u64,
    pub bytes_written: u64,
    pub duration: Duration,
}

/// A finished bulk-import stream.
#[derive(Debug, Clone)]
pub struct EncodedStream {
    /// Newline-delimited tagged records, in enqueue order.
    pub data: Vec<u8>,
    pub metrics: EncodeMetrics,
}

struct ConsumerOutput {
    buffer: Vec<u8>,
    written: u64,
    failed: u64,
}

/// Ordered record encoder: a bounded queue draining into one serializing
/// consumer task.
pub struct RecordEncoder {
    tx: mpsc::Sender<BulkRecord>,
    consumer: JoinHandle<ConsumerOutput>,
}

impl RecordEncoder {
    /// Spawn the consumer task and return the producer handle.
    pub fn spawn() -> Self {
        let (tx, mut rx) = mpsc::channel::<BulkRecord>(ENCODER_QUEUE_DEPTH);
        let consumer = tokio::spawn(async move {
            let mut output = ConsumerOutput {
                buffer: Vec::new(),
                written: 0,
                failed: 0,
            };
            while let Some(record) = rx.recv().await {
                match serde_json::to_vec(&record) {
                    Ok(line) => {
                        output.buffer.extend_from_slice(&line);
                        output.buffer.push(b'\n');
                        output.written += 1;
                    }
                    Err(e) => {
                        // One bad record does not abort the stream.
                        error!("failed to serialize bulk-import record: {e}");
                        output.failed += 1;
                    }
                }
            }
            output
        });
        Self { tx, consumer }
    }

    /// Enqueue one record. The order of calls is the order on the wire.
    pub async fn send(&self, record: BulkRecord) -> Result<(), EncodeError> {
        self.tx
            .send(record)
            .await
            .map_err(|_| EncodeError::ConsumerClosed)
    }

    /// Close the queue and wait until every enqueued record has been
    /// consumed. The buffer is final only once this returns.
    pub async fn finish(self) -> Result<(Vec<u8>, u64, u64), EncodeError> {
        drop(self.tx);
        let output = self.consumer.await?;
        Ok((output.buffer, output.written, output.failed))
    }
}

/// Encode a distributed population into the ordered bulk-import stream:
/// one version marker, then teams, channels and users in generation
/// order.
pub async fn encode_population(population: &Population) -> Result<EncodedStream, EncodeError> {
    let start = Instant::now();
    let encoder = RecordEncoder::spawn();

    encoder.send(BulkRecord::version()).await?;
    for team in &population.teams {
        encoder.send(BulkRecord::team(team.clone())).await?;
    }
    for channel in &population.channels {
        encoder.send(BulkRecord::channel(channel.clone())).await?;
    }
    for user in &population.users {
        encoder.send(BulkRecord::user(user.clone())).await?;
    }

    let (data, written, failed) = encoder.finish().await?;
    let metrics = EncodeMetrics {
        records_written: written,
        records_failed: failed,
        bytes_written: data.len() as u64,
        duration: start.elapsed(),
    };

    info!(
        "encoded {} bulk-import records ({} bytes) in {:?}",
        metrics.records_written, metrics.bytes_written, metrics.duration
    );

    Ok(EncodedStream { data, metrics })
}

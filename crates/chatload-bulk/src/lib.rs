//! Ordered bulk-import stream encoding.
//!
//! Serializes a distributed population into the newline-delimited
//! bulk-import artifact: one version marker, then every team, channel and
//! user in generation order, each as a tagged JSON record. The order is
//! part of the output contract; a single consumer task owns the output
//! buffer and writes records exactly as they were enqueued.

pub mod encoder;
pub mod record;

pub use encoder::{encode_population, EncodeError, EncodeMetrics, EncodedStream, RecordEncoder};
pub use record::{BulkRecord, PostImport, IMPORT_VERSION};

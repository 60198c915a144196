//! Audit log sinks
//!
//! A sink persists one batch of descriptors per triggering event. The diff
//! pass never talks to a sink directly; callers hand the finished batch to
//! [`submit_batch`].

use std::io::Write;
use std::sync::Mutex;

use crate::errors::{AuditError, Result};
use crate::model::ChangeDescriptor;

/// Destination for audit entries
pub trait LogSink {
    /// Persist a batch of entries atomically
    ///
    /// # Errors
    ///
    /// Returns `Sink` if the batch could not be stored.
    fn add_log_entries(&self, entries: Vec<ChangeDescriptor>) -> Result<()>;
}

/// Submit a batch, skipping the sink entirely when there is nothing to log
///
/// Returns the number of entries handed over.
///
/// # Errors
///
/// Propagates the sink's error.
pub fn submit_batch(sink: &dyn LogSink, batch: Vec<ChangeDescriptor>) -> Result<usize> {
    if batch.is_empty() {
        return Ok(0);
    }
    let count = batch.len();
    sink.add_log_entries(batch)?;
    tracing::debug!(descriptor_count = count, "batch submitted");
    Ok(count)
}

/// Sink that keeps every batch in memory
#[derive(Debug, Default)]
pub struct InMemoryLogSink {
    batches: Mutex<Vec<Vec<ChangeDescriptor>>>,
}

impl InMemoryLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All entries across batches, in submission order
    pub fn entries(&self) -> Vec<ChangeDescriptor> {
        self.batches().into_iter().flatten().collect()
    }

    pub fn batches(&self) -> Vec<Vec<ChangeDescriptor>> {
        match self.batches.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn batch_count(&self) -> usize {
        match self.batches.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}

impl LogSink for InMemoryLogSink {
    fn add_log_entries(&self, entries: Vec<ChangeDescriptor>) -> Result<()> {
        let mut guard = self.batches.lock().map_err(|_| AuditError::Sink {
            message: "in-memory sink lock poisoned".to_string(),
        })?;
        guard.push(entries);
        Ok(())
    }
}

/// Sink writing one JSON object per entry, newline separated
///
/// A batch is serialized in full before anything is written, so a
/// serialization failure leaves the writer untouched.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: Mutex<W>,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Recover the underlying writer
    ///
    /// # Errors
    ///
    /// Returns `Sink` if a previous write panicked while holding the lock.
    pub fn into_inner(self) -> Result<W> {
        self.writer.into_inner().map_err(|_| AuditError::Sink {
            message: "json-lines sink lock poisoned".to_string(),
        })
    }
}

impl<W: Write> LogSink for JsonLinesSink<W> {
    fn add_log_entries(&self, entries: Vec<ChangeDescriptor>) -> Result<()> {
        let mut buf = Vec::new();
        for entry in &entries {
            serde_json::to_writer(&mut buf, entry)?;
            buf.push(b'\n');
        }

        let mut writer = self.writer.lock().map_err(|_| AuditError::Sink {
            message: "json-lines sink lock poisoned".to_string(),
        })?;
        writer
            .write_all(&buf)
            .and_then(|()| writer.flush())
            .map_err(|e| AuditError::Sink {
                message: e.to_string(),
            })
    }
}

//! Ordered multi-key writes with compensation.
//!
//! The store has no transactions. A [`WriteSequence`] applies its steps in
//! order and, when one fails, undoes the completed steps that carry a
//! compensating operation, newest first. The outcome says whether the store
//! is back where it started.

use std::fmt;

use folio_store::{ObjectStore, StoreError, StoreResult};
use serde_json::Value;
use tracing::{debug, warn};

/// A single store mutation.
#[derive(Clone, Debug, PartialEq)]
pub enum StoreOp {
    Put { key: String, value: Value },
    Delete { key: String },
}

impl StoreOp {
    pub fn put(key: impl Into<String>, value: Value) -> Self {
        Self::Put {
            key: key.into(),
            value,
        }
    }

    pub fn delete(key: impl Into<String>) -> Self {
        Self::Delete { key: key.into() }
    }

    pub fn key(&self) -> &str {
        match self {
            Self::Put { key, .. } | Self::Delete { key } => key,
        }
    }

    async fn apply(&self, store: &dyn ObjectStore) -> StoreResult<()> {
        match self {
            Self::Put { key, value } => store.put(key, value.clone()).await,
            Self::Delete { key } => store.delete(key).await.map(|_| ()),
        }
    }
}

impl fmt::Display for StoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Put { key, .. } => write!(f, "put {key}"),
            Self::Delete { key } => write!(f, "delete {key}"),
        }
    }
}

/// One step of a [`WriteSequence`].
#[derive(Clone, Debug)]
pub struct WriteStep {
    pub label: String,
    pub op: StoreOp,
    pub compensation: Option<StoreOp>,
}

/// Why a sequence stopped.
#[derive(Debug, thiserror::Error)]
#[error("{sequence}: step '{step}' ({key}) failed: {source}")]
pub struct SequenceFailure {
    /// Label of the sequence.
    pub sequence: String,
    /// Label of the failed step.
    pub step: String,
    /// Key the failed step wrote to.
    pub key: String,
    #[source]
    pub source: StoreError,
    /// True when every completed step was undone.
    pub compensated: bool,
}

/// An ordered list of writes applied best-effort.
#[derive(Clone, Debug)]
pub struct WriteSequence {
    label: String,
    steps: Vec<WriteStep>,
}

impl WriteSequence {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            steps: Vec::new(),
        }
    }

    /// Append a step that is not undone if a later step fails.
    pub fn step(mut self, label: impl Into<String>, op: StoreOp) -> Self {
        self.steps.push(WriteStep {
            label: label.into(),
            op,
            compensation: None,
        });
        self
    }

    /// Append a step undone by `compensation` if a later step fails.
    pub fn compensated_step(
        mut self,
        label: impl Into<String>,
        op: StoreOp,
        compensation: StoreOp,
    ) -> Self {
        self.steps.push(WriteStep {
            label: label.into(),
            op,
            compensation: Some(compensation),
        });
        self
    }

    pub fn steps(&self) -> &[WriteStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Apply every step in order.
    pub async fn run(&self, store: &dyn ObjectStore) -> Result<(), SequenceFailure> {
        for (index, step) in self.steps.iter().enumerate() {
            debug!(sequence = %self.label, step = %step.label, op = %step.op, "applying step");
            if let Err(source) = step.op.apply(store).await {
                let compensated = self.compensate(store, &self.steps[..index]).await;
                return Err(SequenceFailure {
                    sequence: self.label.clone(),
                    step: step.label.clone(),
                    key: step.op.key().to_string(),
                    source,
                    compensated,
                });
            }
        }
        Ok(())
    }

    async fn compensate(&self, store: &dyn ObjectStore, completed: &[WriteStep]) -> bool {
        let mut restored = true;
        for step in completed.iter().rev() {
            let Some(compensation) = &step.compensation else {
                warn!(sequence = %self.label, step = %step.label, "completed step has no compensation");
                restored = false;
                continue;
            };
            match compensation.apply(store).await {
                Ok(()) => {
                    warn!(sequence = %self.label, step = %step.label, op = %compensation, "step compensated")
                }
                Err(e) => {
                    warn!(
                        sequence = %self.label,
                        step = %step.label,
                        op = %compensation,
                        error = %e,
                        "compensation failed"
                    );
                    restored = false;
                }
            }
        }
        restored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FaultyStore;
    use serde_json::json;

    #[tokio::test]
    async fn applies_steps_in_order() {
        let store = FaultyStore::new();
        WriteSequence::new("two puts")
            .step("first", StoreOp::put("a/x", json!(1)))
            .step("second", StoreOp::put("b/y", json!(2)))
            .run(&store)
            .await
            .unwrap();
        assert_eq!(store.get("a/x").await.unwrap(), Some(json!(1)));
        assert_eq!(store.get("b/y").await.unwrap(), Some(json!(2)));
    }

    #[tokio::test]
    async fn failed_step_undoes_completed_steps() {
        let store = FaultyStore::new();
        store.fail_puts_under("files");
        let failure = WriteSequence::new("create")
            .compensated_step("record", StoreOp::put("pages/p", json!({})), StoreOp::delete("pages/p"))
            .step("content", StoreOp::put("files/f", json!({})))
            .run(&store)
            .await
            .unwrap_err();
        assert!(failure.compensated);
        assert_eq!(failure.step, "content");
        assert_eq!(failure.key, "files/f");
        assert_eq!(store.get("pages/p").await.unwrap(), None);
    }

    #[tokio::test]
    async fn failed_compensation_is_reported() {
        let store = FaultyStore::new();
        store.fail_puts_under("files");
        store.fail_deletes_under("pages");
        let failure = WriteSequence::new("create")
            .compensated_step("record", StoreOp::put("pages/p", json!({})), StoreOp::delete("pages/p"))
            .step("content", StoreOp::put("files/f", json!({})))
            .run(&store)
            .await
            .unwrap_err();
        assert!(!failure.compensated);
        assert!(store.get("pages/p").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn uncompensated_completed_step_is_not_restored() {
        let store = FaultyStore::new();
        store.fail_puts_under("files");
        let failure = WriteSequence::new("plain")
            .step("record", StoreOp::put("pages/p", json!({})))
            .step("content", StoreOp::put("files/f", json!({})))
            .run(&store)
            .await
            .unwrap_err();
        assert!(!failure.compensated);
    }

    #[tokio::test]
    async fn first_step_failure_is_trivially_compensated() {
        let store = FaultyStore::new();
        store.fail_puts_under("files");
        let failure = WriteSequence::new("single")
            .step("content", StoreOp::put("files/f", json!({})))
            .run(&store)
            .await
            .unwrap_err();
        assert!(failure.compensated);
    }

    #[test]
    fn op_display() {
        assert_eq!(StoreOp::put("pages/p", json!(null)).to_string(), "put pages/p");
        assert_eq!(StoreOp::delete("files/f").to_string(), "delete files/f");
    }
}

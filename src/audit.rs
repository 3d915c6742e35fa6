#[cfg(test)]
use mockall::automock;
use {
    crate::models::UserId,
    async_trait::async_trait,
    serde::Serialize,
    std::sync::Mutex,
    uuid::Uuid,
};

/// One audit action per logical transition in the lifecycle. The engine
/// emits exactly one record per transition, never one per internal
/// sub-step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AuditAction {
    RfqCreate,
    RfqUpdate,
    RfqPublish,
    RfqCancel,
    RfqDelete,
    RfqAward,
    BidSubmit,
    BidUpdate,
    BidCancel,
    BidWithdraw,
    BidsReveal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum AuditEntity {
    Tender(Uuid),
    Bid(Uuid),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AuditRecord {
    pub actor:       UserId,
    pub action:      AuditAction,
    pub description: String,
    pub entity:      AuditEntity,
}

/// Delivery side of the audit collaborator. Retention and querying belong
/// to the collaborator, not to this engine.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AuditSink: Send + Sync + 'static {
    async fn record(&self, record: AuditRecord);
}

/// Writes audit records to the `audit` tracing target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(&self, record: AuditRecord) {
        tracing::info!(
            target: "audit",
            actor = %record.actor,
            action = %record.action,
            entity = serde_json::to_string(&record.entity).unwrap_or_default(),
            "{}",
            record.description,
        );
    }
}

/// Buffers audit records in memory. Tests use this to assert exactly-once
/// emission per transition.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    records: Mutex<Vec<AuditRecord>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().expect("audit lock poisoned").clone()
    }

    pub fn count(&self, action: AuditAction) -> usize {
        self.records()
            .iter()
            .filter(|r| r.action == action)
            .count()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn record(&self, record: AuditRecord) {
        self.records.lock().expect("audit lock poisoned").push(record);
    }
}

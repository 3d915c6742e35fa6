use {
    super::repository::{
        Database,
        Repository,
    },
    crate::{
        audit::{
            AuditAction,
            AuditEntity,
            AuditRecord,
            AuditSink,
        },
        kernel::clock::Clock,
        models::Actor,
        notification::NotificationEvent,
    },
    rust_decimal::Decimal,
    rust_decimal_macros::dec,
    std::sync::Arc,
    time::Duration,
    tokio::sync::broadcast,
};

pub mod amend_bid;
pub mod award_tender;
pub mod cancel_bid;
pub mod create_tender;
pub mod get_bid;
pub mod get_tender;
pub mod get_tender_bids;
pub mod get_tenders;
pub mod get_vendor_bids;
pub mod publish_tender;
pub mod remove_tender;
pub mod submit_bid;
pub mod sweep_expired;
pub mod update_tender;
pub mod verification;
pub mod visibility;

/// Window after submission during which cancelling a bid is a hard delete
/// rather than a recorded withdrawal.
pub const BID_CANCEL_GRACE_WINDOW: Duration = Duration::minutes(5);

/// Statutory VAT applied to VAT-registered vendors.
pub const DEFAULT_VAT_RATE: Decimal = dec!(0.18);

pub struct Config {
    pub grace_window: Duration,
    pub vat_rate:     Decimal,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grace_window: BID_CANCEL_GRACE_WINDOW,
            vat_rate:     DEFAULT_VAT_RATE,
        }
    }
}

pub struct ServiceInner {
    config:       Config,
    repo:         Arc<Repository>,
    clock:        Arc<dyn Clock>,
    audit:        Arc<dyn AuditSink>,
    event_sender: broadcast::Sender<NotificationEvent>,
}

#[derive(Clone)]
pub struct Service(Arc<ServiceInner>);

impl std::ops::Deref for Service {
    type Target = ServiceInner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Service {
    pub fn new(
        db: impl Database,
        config: Config,
        clock: Arc<dyn Clock>,
        audit: Arc<dyn AuditSink>,
        event_sender: broadcast::Sender<NotificationEvent>,
    ) -> Self {
        Self(Arc::new(ServiceInner {
            config,
            repo: Arc::new(Repository::new(db)),
            clock,
            audit,
            event_sender,
        }))
    }

    /// Rebuild the in-memory working set from storage after a restart.
    pub async fn hydrate(&self) -> anyhow::Result<()> {
        self.repo.load_state().await
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.event_sender.subscribe()
    }

    pub(super) fn notify(&self, event: NotificationEvent) {
        // Fire and forget; nobody listening is not an error.
        let _ = self.event_sender.send(event);
    }

    pub(super) async fn record_audit(
        &self,
        actor: &Actor,
        action: AuditAction,
        description: String,
        entity: AuditEntity,
    ) {
        self.audit
            .record(AuditRecord {
                actor: actor.id,
                action,
                description,
                entity,
            })
            .await;
    }
}

use {
    super::{
        verification,
        Service,
    },
    crate::{
        audit::{
            AuditAction,
            AuditEntity,
        },
        error::CoreError,
        models::Actor,
        tender::entities,
    },
};

#[derive(Clone, Debug)]
pub struct RemoveTenderInput {
    pub actor:     Actor,
    pub tender_id: entities::TenderId,
}

impl Service {
    /// Owner withdraws a tender. With no bids on record the row is hard
    /// deleted; once bids exist the tender is cancelled instead so the
    /// bid history survives.
    #[tracing::instrument(
        skip_all,
        fields(tender_id = %input.tender_id),
        err(level = tracing::Level::TRACE)
    )]
    pub async fn remove_tender(
        &self,
        input: RemoveTenderInput,
    ) -> Result<entities::RemoveOutcome, CoreError> {
        let tender_id = input.tender_id;
        let lock = self.repo.get_or_create_tender_lock(tender_id).await;
        let result = self.remove_tender_for_lock(input, lock).await;
        self.repo.remove_tender_lock(&tender_id).await;
        result
    }

    async fn remove_tender_for_lock(
        &self,
        input: RemoveTenderInput,
        lock: entities::TenderLock,
    ) -> Result<entities::RemoveOutcome, CoreError> {
        let _lock = lock.lock().await;
        let tender = self.repo.get_tender(input.tender_id).await?;
        verification::ensure_owner_or_admin(&tender, &input.actor)?;
        if tender.status.is_terminal() {
            return Err(CoreError::InvalidState(format!(
                "Tender {} is already finalized",
                tender.reference
            )));
        }

        if tender.bid_count == 0 {
            self.repo.remove_tender(tender.id).await?;
            self.record_audit(
                &input.actor,
                AuditAction::RfqDelete,
                format!("Deleted tender {}", tender.reference),
                AuditEntity::Tender(tender.id),
            )
            .await;
            return Ok(entities::RemoveOutcome::Deleted);
        }

        let now = self.clock.now();
        self.repo
            .update_tender_status(tender.id, entities::TenderStatus::Cancelled, now)
            .await?;
        self.record_audit(
            &input.actor,
            AuditAction::RfqCancel,
            format!("Cancelled tender {}", tender.reference),
            AuditEntity::Tender(tender.id),
        )
        .await;
        Ok(entities::RemoveOutcome::Cancelled)
    }
}

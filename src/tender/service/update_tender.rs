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
pub struct UpdateTenderInput {
    pub actor:     Actor,
    pub tender_id: entities::TenderId,
    pub patch:     entities::TenderUpdate,
}

impl Service {
    #[tracing::instrument(
        skip_all,
        fields(tender_id = %input.tender_id),
        err(level = tracing::Level::TRACE)
    )]
    pub async fn update_tender(
        &self,
        input: UpdateTenderInput,
    ) -> Result<entities::Tender, CoreError> {
        let tender_id = input.tender_id;
        let lock = self.repo.get_or_create_tender_lock(tender_id).await;
        let result = self.update_tender_for_lock(input, lock).await;
        self.repo.remove_tender_lock(&tender_id).await;
        result
    }

    async fn update_tender_for_lock(
        &self,
        input: UpdateTenderInput,
        lock: entities::TenderLock,
    ) -> Result<entities::Tender, CoreError> {
        let _lock = lock.lock().await;
        let tender = self.repo.get_tender(input.tender_id).await?;
        verification::ensure_owner_or_admin(&tender, &input.actor)?;

        match tender.status {
            entities::TenderStatus::Closed | entities::TenderStatus::Awarded => {
                return Err(CoreError::InvalidState(
                    "Cannot edit a closed or awarded tender".to_string(),
                ));
            }
            entities::TenderStatus::Cancelled => {
                return Err(CoreError::InvalidState(
                    "Cannot edit a cancelled tender".to_string(),
                ));
            }
            entities::TenderStatus::Draft | entities::TenderStatus::Open => {}
        }
        // Vendors must not find themselves bidding against specifications
        // that changed under them.
        if tender.bid_count > 0 && tender.status != entities::TenderStatus::Draft {
            return Err(CoreError::Conflict(
                "Cannot edit a tender that already has bids".to_string(),
            ));
        }

        let now = self.clock.now();
        let updated = self
            .repo
            .update_tender(input.tender_id, input.patch, now)
            .await?;
        self.record_audit(
            &input.actor,
            AuditAction::RfqUpdate,
            format!("Updated tender {}", updated.reference),
            AuditEntity::Tender(updated.id),
        )
        .await;
        Ok(updated)
    }
}

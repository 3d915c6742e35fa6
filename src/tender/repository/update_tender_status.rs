use {
    super::Repository,
    crate::{
        error::CoreError,
        tender::entities,
    },
    time::OffsetDateTime,
};

impl Repository {
    /// Single entry point for tender status changes; every transition is
    /// validated against the status machine here.
    pub async fn update_tender_status(
        &self,
        id: entities::TenderId,
        new_status: entities::TenderStatus,
        now: OffsetDateTime,
    ) -> Result<entities::Tender, CoreError> {
        let tender = self.get_tender(id).await?;
        if !tender.status.can_transition_to(new_status) {
            return Err(CoreError::InvalidState(format!(
                "Tender {} cannot move from {:?} to {:?}",
                tender.reference, tender.status, new_status
            )));
        }
        self.db.update_tender_status(id, new_status, now).await?;
        let mut tenders = self.in_memory_store.tenders.write().await;
        let stored = tenders.get_mut(&id).ok_or(CoreError::TenderNotFound)?;
        stored.status = new_status;
        stored.update_time = now;
        Ok(stored.clone())
    }
}

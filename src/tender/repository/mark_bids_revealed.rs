use {
    super::Repository,
    crate::{
        error::CoreError,
        tender::entities,
    },
    time::OffsetDateTime,
};

impl Repository {
    pub async fn mark_bids_revealed(
        &self,
        tender_id: entities::TenderId,
        now: OffsetDateTime,
    ) -> Result<(), CoreError> {
        self.db.mark_bids_revealed(tender_id, now).await?;
        let mut bids = self.in_memory_store.bids.write().await;
        if let Some(list) = bids.get_mut(&tender_id) {
            for bid in list.iter_mut() {
                bid.revealed = true;
            }
        }
        drop(bids);
        let mut tenders = self.in_memory_store.tenders.write().await;
        if let Some(tender) = tenders.get_mut(&tender_id) {
            tender.bids_revealed_at = Some(now);
        }
        Ok(())
    }
}

use {
    super::Repository,
    crate::{
        error::CoreError,
        tender::entities,
    },
};

impl Repository {
    /// Soft withdrawal: the row persists with status `withdrawn` for the
    /// audit trail, but stops counting as an active bid.
    pub async fn withdraw_bid(&self, bid: entities::Bid) -> Result<entities::Bid, CoreError> {
        self.db.withdraw_bid(&bid).await?;
        let mut bids = self.in_memory_store.bids.write().await;
        if let Some(list) = bids.get_mut(&bid.tender_id) {
            if let Some(stored) = list.iter_mut().find(|stored| stored.id == bid.id) {
                *stored = bid.clone();
            }
        }
        drop(bids);
        let mut tenders = self.in_memory_store.tenders.write().await;
        if let Some(tender) = tenders.get_mut(&bid.tender_id) {
            tender.bid_count = tender.bid_count.saturating_sub(1);
        }
        Ok(bid)
    }
}

use {
    super::Repository,
    crate::{
        error::CoreError,
        tender::entities,
    },
};

impl Repository {
    /// Grace-window hard delete: the row disappears and the counter drops,
    /// as if the bid was never submitted.
    pub async fn remove_bid(&self, bid: &entities::Bid) -> Result<(), CoreError> {
        self.db.remove_bid(bid.id, bid.tender_id).await?;
        let mut bids = self.in_memory_store.bids.write().await;
        if let Some(list) = bids.get_mut(&bid.tender_id) {
            list.retain(|stored| stored.id != bid.id);
        }
        drop(bids);
        let mut tenders = self.in_memory_store.tenders.write().await;
        if let Some(tender) = tenders.get_mut(&bid.tender_id) {
            tender.bid_count = tender.bid_count.saturating_sub(1);
        }
        Ok(())
    }
}

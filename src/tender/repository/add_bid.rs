use {
    super::Repository,
    crate::{
        error::CoreError,
        tender::entities,
    },
};

impl Repository {
    /// Insert plus counter increment; the database does both in one
    /// transaction and memory follows only after it commits.
    pub async fn add_bid(&self, bid: entities::Bid) -> Result<entities::Bid, CoreError> {
        self.db.add_bid(&bid).await?;
        self.in_memory_store
            .bids
            .write()
            .await
            .entry(bid.tender_id)
            .or_insert_with(Vec::new)
            .push(bid.clone());
        let mut tenders = self.in_memory_store.tenders.write().await;
        if let Some(tender) = tenders.get_mut(&bid.tender_id) {
            tender.bid_count += 1;
        }
        Ok(bid)
    }
}

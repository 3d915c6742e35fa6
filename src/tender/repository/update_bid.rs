use {
    super::Repository,
    crate::{
        error::CoreError,
        tender::entities,
    },
};

impl Repository {
    pub async fn update_bid(&self, bid: entities::Bid) -> Result<entities::Bid, CoreError> {
        self.db.update_bid(&bid).await?;
        let mut bids = self.in_memory_store.bids.write().await;
        let list = bids.get_mut(&bid.tender_id).ok_or(CoreError::BidNotFound)?;
        let stored = list
            .iter_mut()
            .find(|stored| stored.id == bid.id)
            .ok_or(CoreError::BidNotFound)?;
        *stored = bid.clone();
        Ok(bid)
    }
}

use {
    super::Repository,
    crate::{
        error::CoreError,
        tender::entities,
    },
};

impl Repository {
    pub async fn get_bid(&self, bid_id: entities::BidId) -> Result<entities::Bid, CoreError> {
        self.in_memory_store
            .bids
            .read()
            .await
            .values()
            .flatten()
            .find(|bid| bid.id == bid_id)
            .cloned()
            .ok_or(CoreError::BidNotFound)
    }
}

use {
    super::Repository,
    crate::{
        models::UserId,
        tender::entities,
    },
};

impl Repository {
    /// The duplicate check behind the one-bid-per-vendor rule. Withdrawn
    /// rows count: a vendor who withdrew stays blocked, only a
    /// grace-window hard delete clears the way for a fresh bid.
    pub async fn get_vendor_bid(
        &self,
        tender_id: entities::TenderId,
        vendor: UserId,
    ) -> Option<entities::Bid> {
        self.in_memory_store
            .bids
            .read()
            .await
            .get(&tender_id)
            .and_then(|bids| bids.iter().find(|bid| bid.vendor == vendor).cloned())
    }
}

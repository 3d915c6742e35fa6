use {
    super::Repository,
    crate::{
        models::UserId,
        tender::entities,
    },
};

impl Repository {
    /// A vendor's bids across all tenders, newest first.
    pub async fn get_vendor_bids(&self, vendor: UserId) -> Vec<entities::Bid> {
        let mut bids: Vec<entities::Bid> = self
            .in_memory_store
            .bids
            .read()
            .await
            .values()
            .flatten()
            .filter(|bid| bid.vendor == vendor)
            .cloned()
            .collect();
        bids.sort_by(|a, b| b.creation_time.cmp(&a.creation_time));
        bids
    }
}

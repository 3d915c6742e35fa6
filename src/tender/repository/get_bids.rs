use {
    super::Repository,
    crate::tender::entities,
};

impl Repository {
    /// All bid rows for a tender, withdrawn ones included.
    pub async fn get_bids(&self, tender_id: entities::TenderId) -> Vec<entities::Bid> {
        self.in_memory_store
            .bids
            .read()
            .await
            .get(&tender_id)
            .cloned()
            .unwrap_or_default()
    }
}

use {
    super::Repository,
    crate::{
        error::CoreError,
        tender::entities,
    },
};

impl Repository {
    /// Hard delete. Only legal for tenders that never collected a bid;
    /// the service cancels instead once bids exist.
    pub async fn remove_tender(&self, id: entities::TenderId) -> Result<(), CoreError> {
        self.db.remove_tender(id).await?;
        self.in_memory_store.tenders.write().await.remove(&id);
        self.in_memory_store.bids.write().await.remove(&id);
        Ok(())
    }
}

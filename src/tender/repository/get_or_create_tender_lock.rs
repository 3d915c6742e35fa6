use {
    super::Repository,
    crate::tender::entities,
};

impl Repository {
    pub async fn get_or_create_tender_lock(
        &self,
        tender_id: entities::TenderId,
    ) -> entities::TenderLock {
        self.in_memory_store
            .tender_lock
            .lock()
            .await
            .entry(tender_id)
            .or_default()
            .clone()
    }
}

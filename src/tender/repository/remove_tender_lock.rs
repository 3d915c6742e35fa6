use {
    super::Repository,
    crate::tender::entities,
    std::sync::Arc,
};

impl Repository {
    pub async fn remove_tender_lock(&self, tender_id: &entities::TenderId) {
        let mut mutex_guard = self.in_memory_store.tender_lock.lock().await;
        let tender_lock = mutex_guard.get(tender_id);
        if let Some(tender_lock) = tender_lock {
            // Whenever there is no task borrowing the lock for this tender, we can remove it from the locks HashMap.
            if Arc::strong_count(tender_lock) == 1 {
                mutex_guard.remove(tender_id);
            }
        }
    }
}

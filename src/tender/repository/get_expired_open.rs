use {
    super::Repository,
    crate::tender::entities,
    time::OffsetDateTime,
};

impl Repository {
    /// Candidates for the lazy expiry sweep: still stored as `open`, but
    /// their closing time has passed.
    pub async fn get_expired_open(&self, now: OffsetDateTime) -> Vec<entities::TenderId> {
        self.in_memory_store
            .tenders
            .read()
            .await
            .values()
            .filter(|tender| {
                tender.status == entities::TenderStatus::Open && tender.is_expired(now)
            })
            .map(|tender| tender.id)
            .collect()
    }
}

use {
    super::Repository,
    crate::{
        error::CoreError,
        kernel::entities::ReferenceId,
        tender::entities,
    },
    time::OffsetDateTime,
    uuid::Uuid,
};

impl Repository {
    pub async fn add_tender(
        &self,
        spec: entities::TenderCreate,
        now: OffsetDateTime,
    ) -> Result<entities::Tender, CoreError> {
        let reference = self.next_reference(now).await;
        let tender = entities::Tender::new(Uuid::new_v4(), reference, spec, now);
        self.db.add_tender(&tender).await?;
        self.in_memory_store
            .tenders
            .write()
            .await
            .insert(tender.id, tender.clone());
        Ok(tender)
    }

    async fn next_reference(&self, now: OffsetDateTime) -> ReferenceId {
        let year = now.year();
        let mut sequences = self.in_memory_store.reference_sequences.lock().await;
        let sequence = sequences.entry(year).or_insert(0);
        *sequence += 1;
        ReferenceId::new(year, *sequence)
    }
}

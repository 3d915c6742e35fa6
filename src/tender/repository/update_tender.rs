use {
    super::Repository,
    crate::{
        error::CoreError,
        tender::entities,
    },
    time::OffsetDateTime,
};

impl Repository {
    pub async fn update_tender(
        &self,
        id: entities::TenderId,
        patch: entities::TenderUpdate,
        now: OffsetDateTime,
    ) -> Result<entities::Tender, CoreError> {
        let mut updated = self.get_tender(id).await?;
        updated.apply(patch, now);
        self.db.update_tender(&updated).await?;
        self.in_memory_store
            .tenders
            .write()
            .await
            .insert(id, updated.clone());
        Ok(updated)
    }
}

use {
    super::Repository,
    crate::{
        error::CoreError,
        tender::entities,
    },
};

impl Repository {
    pub async fn get_tender(
        &self,
        id: entities::TenderId,
    ) -> Result<entities::Tender, CoreError> {
        self.in_memory_store
            .tenders
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(CoreError::TenderNotFound)
    }
}

use {
    super::Service,
    crate::{
        error::CoreError,
        models::Actor,
        tender::entities,
    },
};

#[derive(Clone, Debug)]
pub struct GetTendersInput {
    pub actor:  Actor,
    pub filter: entities::TenderFilter,
}

impl Service {
    /// Listing read model. The expiry sweep runs first so statuses are
    /// accurate without a background scheduler. Browsing never surfaces
    /// drafts, cancelled tenders, or private tenders the actor was not
    /// invited to; owners and admins see their own regardless.
    #[tracing::instrument(skip_all, err(level = tracing::Level::TRACE))]
    pub async fn get_tenders(
        &self,
        input: GetTendersInput,
    ) -> Result<Vec<entities::TenderView>, CoreError> {
        self.sweep_expired().await?;
        let tenders = self.repo.get_tenders(&input.filter).await;
        Ok(tenders
            .iter()
            .filter(|tender| Self::listable(tender, &input.actor))
            .map(|tender| {
                let privileged = tender.is_owner(&input.actor) || input.actor.is_admin();
                entities::TenderView::new(tender, privileged || tender.show_budget)
            })
            .collect())
    }

    fn listable(tender: &entities::Tender, actor: &Actor) -> bool {
        if tender.is_owner(actor) || actor.is_admin() {
            return true;
        }
        if matches!(
            tender.status,
            entities::TenderStatus::Draft | entities::TenderStatus::Cancelled
        ) {
            return false;
        }
        !tender.private || tender.is_invited(actor.id)
    }
}

use {
    super::{
        verification,
        visibility,
        Service,
    },
    crate::{
        error::CoreError,
        models::Actor,
        tender::entities,
    },
};

#[derive(Clone, Debug)]
pub struct GetTenderBidsInput {
    pub actor:     Actor,
    pub tender_id: entities::TenderId,
}

impl Service {
    /// Buyer-side view of a tender's bids, pricing redacted per the sealed
    /// gate. The first call that finds the tender unsealed flips every bid
    /// to `revealed` and audits the reveal once. While sealed the bids
    /// come back in submission order; price-ordering them would leak the
    /// very numbers the seal hides.
    #[tracing::instrument(
        skip_all,
        fields(tender_id = %input.tender_id),
        err(level = tracing::Level::TRACE)
    )]
    pub async fn get_tender_bids(
        &self,
        input: GetTenderBidsInput,
    ) -> Result<Vec<entities::BidView>, CoreError> {
        let tender_id = input.tender_id;
        let lock = self.repo.get_or_create_tender_lock(tender_id).await;
        let result = self.get_tender_bids_for_lock(input, lock).await;
        self.repo.remove_tender_lock(&tender_id).await;
        result
    }

    async fn get_tender_bids_for_lock(
        &self,
        input: GetTenderBidsInput,
        lock: entities::TenderLock,
    ) -> Result<Vec<entities::BidView>, CoreError> {
        let _lock = lock.lock().await;
        let tender = self.repo.get_tender(input.tender_id).await?;
        verification::ensure_owner_or_admin(&tender, &input.actor)?;

        let now = self.clock.now();
        let tender = if tender.status == entities::TenderStatus::Open && tender.is_expired(now) {
            self.repo
                .update_tender_status(tender.id, entities::TenderStatus::Closed, now)
                .await?
        } else {
            tender
        };
        self.reveal_if_due(&tender, &input.actor, now).await?;

        let bids = self.repo.get_bids(tender.id).await;
        let mut views: Vec<entities::BidView> = bids
            .iter()
            .map(|bid| visibility::bid_view(&tender, bid, &input.actor, now))
            .collect();
        if visibility::tender_unsealed(&tender, now) {
            views.sort_by(|a, b| {
                a.total_price
                    .revealed()
                    .cmp(&b.total_price.revealed())
                    .then(a.creation_time.cmp(&b.creation_time))
            });
        } else {
            views.sort_by_key(|view| view.creation_time);
        }
        Ok(views)
    }
}

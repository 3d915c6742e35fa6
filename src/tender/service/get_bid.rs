use {
    super::{
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
pub struct GetBidInput {
    pub actor:  Actor,
    pub bid_id: entities::BidId,
}

impl Service {
    /// Single-bid view for the bid's vendor, the tender owner, or an
    /// admin. Pricing goes through the same sealed gate as the tender-wide
    /// listing, and an owner/admin query that finds the tender unsealed
    /// triggers the same one-time reveal.
    #[tracing::instrument(
        skip_all,
        fields(bid_id = %input.bid_id),
        err(level = tracing::Level::TRACE)
    )]
    pub async fn get_bid(&self, input: GetBidInput) -> Result<entities::BidView, CoreError> {
        let bid = self.repo.get_bid(input.bid_id).await?;
        let tender_id = bid.tender_id;
        let lock = self.repo.get_or_create_tender_lock(tender_id).await;
        let result = self.get_bid_for_lock(input, lock).await;
        self.repo.remove_tender_lock(&tender_id).await;
        result
    }

    async fn get_bid_for_lock(
        &self,
        input: GetBidInput,
        lock: entities::TenderLock,
    ) -> Result<entities::BidView, CoreError> {
        let _lock = lock.lock().await;
        let bid = self.repo.get_bid(input.bid_id).await?;
        let tender = self.repo.get_tender(bid.tender_id).await?;

        let privileged = tender.is_owner(&input.actor) || input.actor.is_admin();
        if bid.vendor != input.actor.id && !privileged {
            return Err(CoreError::Forbidden);
        }

        let now = self.clock.now();
        let tender = if tender.status == entities::TenderStatus::Open && tender.is_expired(now) {
            self.repo
                .update_tender_status(tender.id, entities::TenderStatus::Closed, now)
                .await?
        } else {
            tender
        };
        if privileged {
            self.reveal_if_due(&tender, &input.actor, now).await?;
        }
        Ok(visibility::bid_view(&tender, &bid, &input.actor, now))
    }
}

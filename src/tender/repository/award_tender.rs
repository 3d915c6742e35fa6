use {
    super::Repository,
    crate::{
        error::CoreError,
        tender::entities,
    },
    time::OffsetDateTime,
};

impl Repository {
    /// Applies the award as one unit: tender to `awarded`, the winning bid
    /// to `won`, every other pending bid to `lost`. The database flip runs
    /// in a single transaction and memory is only touched after it
    /// commits, so no reader observes a half-applied award.
    pub async fn award_tender(
        &self,
        tender_id: entities::TenderId,
        winning_bid_id: entities::BidId,
        remarks: Option<String>,
        now: OffsetDateTime,
    ) -> Result<(entities::Tender, entities::Bid, Vec<entities::Bid>), CoreError> {
        let mut tender = self.get_tender(tender_id).await?;
        let winner = self
            .get_bids(tender_id)
            .await
            .into_iter()
            .find(|bid| bid.id == winning_bid_id)
            .ok_or_else(|| {
                CoreError::InvalidBid("Bid does not belong to this tender".to_string())
            })?;

        tender.status = entities::TenderStatus::Awarded;
        tender.award = Some(entities::AwardInfo {
            bid_id: winning_bid_id,
            vendor: winner.vendor,
            time: now,
            remarks,
        });
        tender.update_time = now;
        self.db.award_tender(&tender, winning_bid_id).await?;

        self.in_memory_store
            .tenders
            .write()
            .await
            .insert(tender_id, tender.clone());

        let mut winner_after = winner;
        let mut losers = Vec::new();
        let mut bids = self.in_memory_store.bids.write().await;
        if let Some(list) = bids.get_mut(&tender_id) {
            for bid in list.iter_mut() {
                if bid.id == winning_bid_id {
                    bid.status = entities::BidStatus::Won;
                    bid.update_time = now;
                    winner_after = bid.clone();
                } else if bid.status.is_pending() {
                    bid.status = entities::BidStatus::Lost;
                    bid.update_time = now;
                    losers.push(bid.clone());
                }
            }
        }
        Ok((tender, winner_after, losers))
    }
}

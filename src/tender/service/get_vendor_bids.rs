use {
    super::{
        verification,
        Service,
    },
    crate::{
        error::CoreError,
        models::Actor,
        tender::entities,
    },
};

#[derive(Clone, Debug)]
pub struct GetVendorBidsInput {
    pub actor: Actor,
}

/// Dashboard rollup for a vendor. Bids on cancelled tenders stay out of
/// the numbers; nothing was winnable there.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BidStats {
    pub total:   usize,
    pub pending: usize,
    pub won:     usize,
    pub lost:    usize,
}

impl Service {
    #[tracing::instrument(skip_all, err(level = tracing::Level::TRACE))]
    pub async fn get_vendor_bids(
        &self,
        input: GetVendorBidsInput,
    ) -> Result<(Vec<entities::Bid>, BidStats), CoreError> {
        verification::ensure_vendor(&input.actor)?;
        let bids = self.repo.get_vendor_bids(input.actor.id).await;

        let mut stats = BidStats::default();
        for bid in &bids {
            let tender = self.repo.get_tender(bid.tender_id).await?;
            if tender.status == entities::TenderStatus::Cancelled {
                continue;
            }
            stats.total += 1;
            match bid.status {
                entities::BidStatus::Pending => stats.pending += 1,
                entities::BidStatus::Won => stats.won += 1,
                entities::BidStatus::Lost => stats.lost += 1,
                entities::BidStatus::UnderReview | entities::BidStatus::Withdrawn => {}
            }
        }
        Ok((bids, stats))
    }
}

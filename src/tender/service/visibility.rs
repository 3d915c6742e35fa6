use {
    super::Service,
    crate::{
        audit::{
            AuditAction,
            AuditEntity,
        },
        error::CoreError,
        models::Actor,
        tender::entities,
    },
    time::OffsetDateTime,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PricingAccess {
    Sealed,
    Visible,
}

/// Whether a tender's pricing is currently unsealed for its owner and
/// admins. Vendors never gain access to other vendors' numbers through
/// this; they only ever see their own.
pub fn tender_unsealed(tender: &entities::Tender, now: OffsetDateTime) -> bool {
    !tender.sealed || tender.status != entities::TenderStatus::Open || tender.is_expired(now)
}

/// The sealed-bid gate, computed live on every query. A vendor always sees
/// their own bid; the owner and admins see pricing only once the tender is
/// unsealed for them.
pub fn pricing_access(
    tender: &entities::Tender,
    bid: &entities::Bid,
    actor: &Actor,
    now: OffsetDateTime,
) -> PricingAccess {
    if bid.vendor == actor.id {
        return PricingAccess::Visible;
    }
    if !(tender.is_owner(actor) || actor.is_admin()) {
        return PricingAccess::Sealed;
    }
    if tender_unsealed(tender, now) {
        PricingAccess::Visible
    } else {
        PricingAccess::Sealed
    }
}

pub fn bid_view(
    tender: &entities::Tender,
    bid: &entities::Bid,
    actor: &Actor,
    now: OffsetDateTime,
) -> entities::BidView {
    match pricing_access(tender, bid, actor, now) {
        PricingAccess::Visible => entities::BidView::revealed(bid),
        PricingAccess::Sealed => entities::BidView::redacted(bid),
    }
}

impl Service {
    /// Side effect of the first query that crosses from redacted to
    /// visible for a tender: every bid is flagged `revealed` and one
    /// `bids_reveal` audit record is emitted for the tender. Callers must
    /// hold the tender lock so the crossing happens exactly once.
    pub(super) async fn reveal_if_due(
        &self,
        tender: &entities::Tender,
        actor: &Actor,
        now: OffsetDateTime,
    ) -> Result<(), CoreError> {
        if tender.bids_revealed_at.is_some() || !tender_unsealed(tender, now) {
            return Ok(());
        }
        self.repo.mark_bids_revealed(tender.id, now).await?;
        self.record_audit(
            actor,
            AuditAction::BidsReveal,
            format!("Bids revealed for tender {}", tender.reference),
            AuditEntity::Tender(tender.id),
        )
        .await;
        Ok(())
    }
}

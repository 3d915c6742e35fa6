use {
    super::{
        verification,
        Service,
    },
    crate::{
        audit::{
            AuditAction,
            AuditEntity,
        },
        error::CoreError,
        models::Actor,
        notification::NotificationEvent,
        tender::entities,
    },
};

#[derive(Clone, Debug)]
pub struct AwardTenderInput {
    pub actor:          Actor,
    pub tender_id:      entities::TenderId,
    pub winning_bid_id: entities::BidId,
    pub remarks:        Option<String>,
}

impl Service {
    /// The terminal transition of the lifecycle: tender to `awarded`, the
    /// chosen bid to `won`, every other pending bid to `lost`, all as one
    /// unit. Sealing is what forces buyers to wait: a sealed tender can
    /// only be awarded once its closing time has passed (whatever the
    /// stored status says), a non-sealed one at any time while open or
    /// closed.
    #[tracing::instrument(
        skip_all,
        fields(tender_id = %input.tender_id, winning_bid_id = %input.winning_bid_id),
        err(level = tracing::Level::TRACE)
    )]
    pub async fn award_tender(
        &self,
        input: AwardTenderInput,
    ) -> Result<entities::Tender, CoreError> {
        let tender_id = input.tender_id;
        let lock = self.repo.get_or_create_tender_lock(tender_id).await;
        let result = self.award_tender_for_lock(input, lock).await;
        self.repo.remove_tender_lock(&tender_id).await;
        result
    }

    async fn award_tender_for_lock(
        &self,
        input: AwardTenderInput,
        lock: entities::TenderLock,
    ) -> Result<entities::Tender, CoreError> {
        let _lock = lock.lock().await;
        let tender = self.repo.get_tender(input.tender_id).await?;
        verification::ensure_owner_or_admin(&tender, &input.actor)?;

        // Award is one-shot; a repeat attempt reads as an invalid state,
        // not as a complaint about the already-won bid.
        if tender.status.is_terminal() {
            return Err(CoreError::InvalidState(format!(
                "Tender {} is already finalized",
                tender.reference
            )));
        }
        if tender.status == entities::TenderStatus::Draft {
            return Err(CoreError::InvalidState(
                "Cannot award a draft tender".to_string(),
            ));
        }
        let now = self.clock.now();
        if tender.sealed && !tender.is_expired(now) {
            return Err(CoreError::TooEarly {
                closes_at: tender.closing_time,
            });
        }

        let winner = self
            .repo
            .get_bids(tender.id)
            .await
            .into_iter()
            .find(|bid| bid.id == input.winning_bid_id)
            .ok_or_else(|| {
                CoreError::InvalidBid("Bid does not belong to this tender".to_string())
            })?;
        if !winner.status.is_pending() {
            return Err(CoreError::InvalidBid(
                "Winning bid is no longer pending".to_string(),
            ));
        }

        let (awarded, winner, losers) = self
            .repo
            .award_tender(tender.id, winner.id, input.remarks.clone(), now)
            .await?;

        self.record_audit(
            &input.actor,
            AuditAction::RfqAward,
            format!(
                "Awarded tender {} to vendor {}",
                awarded.reference, winner.vendor
            ),
            AuditEntity::Tender(awarded.id),
        )
        .await;
        self.notify(NotificationEvent::TenderAwarded {
            recipient: winner.vendor,
            tender_id: awarded.id,
            bid_id:    winner.id,
            message:   format!("Your bid for \"{}\" has been accepted", awarded.title),
        });
        for loser in &losers {
            self.notify(NotificationEvent::TenderLost {
                recipient: loser.vendor,
                tender_id: awarded.id,
                bid_id:    loser.id,
                message:   format!(
                    "The tender \"{}\" has been awarded to another vendor",
                    awarded.title
                ),
            });
        }
        Ok(awarded)
    }
}

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
};

#[derive(Clone, Debug)]
pub struct CancelBidInput {
    pub actor:  Actor,
    pub bid_id: entities::BidId,
    pub reason: Option<String>,
}

impl Service {
    /// Time-boxed dual path: inside the grace window the bid row is hard
    /// deleted as if it never existed; after it, the bid is soft-withdrawn
    /// and the row persists. Elapsed time alone picks the path, so no
    /// vendor can choose the lenient one late.
    #[tracing::instrument(
        skip_all,
        fields(bid_id = %input.bid_id, outcome),
        err(level = tracing::Level::TRACE)
    )]
    pub async fn cancel_bid(
        &self,
        input: CancelBidInput,
    ) -> Result<entities::CancelOutcome, CoreError> {
        let bid = self.repo.get_bid(input.bid_id).await?;
        if bid.vendor != input.actor.id {
            return Err(CoreError::Forbidden);
        }
        let tender_id = bid.tender_id;
        let lock = self.repo.get_or_create_tender_lock(tender_id).await;
        let result = self.cancel_bid_for_lock(input, lock).await;
        self.repo.remove_tender_lock(&tender_id).await;
        result
    }

    async fn cancel_bid_for_lock(
        &self,
        input: CancelBidInput,
        lock: entities::TenderLock,
    ) -> Result<entities::CancelOutcome, CoreError> {
        let _lock = lock.lock().await;
        let bid = self.repo.get_bid(input.bid_id).await?;
        let tender = self.repo.get_tender(bid.tender_id).await?;
        let now = self.clock.now();

        // Once the tender stops accepting bids the set is frozen; a
        // last-second cancellation must not race the buyer's award.
        if !tender.can_accept_bids(now) {
            if tender.status == entities::TenderStatus::Open && tender.is_expired(now) {
                self.repo
                    .update_tender_status(tender.id, entities::TenderStatus::Closed, now)
                    .await?;
            }
            return Err(CoreError::InvalidState(
                "Cannot cancel a bid once the tender has closed".to_string(),
            ));
        }
        if !bid.status.is_pending() {
            return Err(CoreError::InvalidState(
                "Only a pending bid can be cancelled".to_string(),
            ));
        }

        if now - bid.creation_time <= self.config.grace_window {
            self.repo.remove_bid(&bid).await?;
            tracing::Span::current().record("outcome", "cancelled");
            self.record_audit(
                &input.actor,
                AuditAction::BidCancel,
                format!(
                    "Cancelled bid for tender {} within the grace window",
                    tender.reference
                ),
                AuditEntity::Bid(bid.id),
            )
            .await;
            return Ok(entities::CancelOutcome::Cancelled);
        }

        let mut withdrawn = bid;
        withdrawn.status = entities::BidStatus::Withdrawn;
        withdrawn.withdrawn_at = Some(now);
        withdrawn.withdrawal_reason = input.reason.clone();
        withdrawn.update_time = now;
        let withdrawn = self.repo.withdraw_bid(withdrawn).await?;
        tracing::Span::current().record("outcome", "withdrawn");
        self.record_audit(
            &input.actor,
            AuditAction::BidWithdraw,
            format!("Withdrew bid for tender {}", tender.reference),
            AuditEntity::Bid(withdrawn.id),
        )
        .await;
        Ok(entities::CancelOutcome::Withdrawn)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::tender::{
            entities::{
                BidStatus,
                CancelOutcome,
            },
            service::{
                create_tender::CreateTenderInput,
                submit_bid::SubmitBidInput,
                tests::{
                    bid_spec,
                    buyer,
                    closing_in_one_hour,
                    mock_db_ok,
                    tender_spec,
                    vendor,
                    Harness,
                },
            },
        },
        time::Duration,
    };

    async fn tender_with_bid(harness: &Harness) -> (entities::Tender, entities::Bid, Actor) {
        let owner = buyer();
        let tender = harness
            .service
            .create_tender(CreateTenderInput {
                actor: owner,
                spec:  tender_spec(&owner, closing_in_one_hour()),
            })
            .await
            .unwrap();
        let bidder = vendor();
        let bid = harness
            .service
            .submit_bid(SubmitBidInput {
                actor:      bidder,
                bid_create: bid_spec(tender.id, &bidder),
            })
            .await
            .unwrap();
        (tender, bid, bidder)
    }

    #[tokio::test]
    async fn inside_the_grace_window_the_bid_is_hard_deleted() {
        let harness = Service::new_with_mocks(mock_db_ok());
        let (tender, bid, bidder) = tender_with_bid(&harness).await;
        harness.clock.advance(Duration::minutes(4) + Duration::seconds(59));

        let outcome = harness
            .service
            .cancel_bid(CancelBidInput {
                actor:  bidder,
                bid_id: bid.id,
                reason: None,
            })
            .await
            .unwrap();
        assert_eq!(outcome, CancelOutcome::Cancelled);

        // the row is gone and the counter is back to zero
        assert!(harness.service.repo.get_bids(tender.id).await.is_empty());
        let stored = harness.service.repo.get_tender(tender.id).await.unwrap();
        assert_eq!(stored.bid_count, 0);
        assert_eq!(harness.audit.count(crate::audit::AuditAction::BidCancel), 1);
    }

    #[tokio::test]
    async fn after_the_grace_window_the_bid_is_soft_withdrawn() {
        let harness = Service::new_with_mocks(mock_db_ok());
        let (tender, bid, bidder) = tender_with_bid(&harness).await;
        harness.clock.advance(Duration::minutes(5) + Duration::seconds(1));

        let outcome = harness
            .service
            .cancel_bid(CancelBidInput {
                actor:  bidder,
                bid_id: bid.id,
                reason: Some("Found a supplier problem".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(outcome, CancelOutcome::Withdrawn);

        // the row persists for audit, but no longer counts
        let bids = harness.service.repo.get_bids(tender.id).await;
        assert_eq!(bids.len(), 1);
        assert_eq!(bids[0].status, BidStatus::Withdrawn);
        assert_eq!(
            bids[0].withdrawal_reason.as_deref(),
            Some("Found a supplier problem")
        );
        let stored = harness.service.repo.get_tender(tender.id).await.unwrap();
        assert_eq!(stored.bid_count, 0);
        assert_eq!(
            harness.audit.count(crate::audit::AuditAction::BidWithdraw),
            1
        );
    }

    #[tokio::test]
    async fn exactly_at_the_window_boundary_still_cancels() {
        let harness = Service::new_with_mocks(mock_db_ok());
        let (tender, bid, bidder) = tender_with_bid(&harness).await;
        harness.clock.advance(Duration::minutes(5));

        let outcome = harness
            .service
            .cancel_bid(CancelBidInput {
                actor:  bidder,
                bid_id: bid.id,
                reason: None,
            })
            .await
            .unwrap();
        assert_eq!(outcome, CancelOutcome::Cancelled);
        assert!(harness.service.repo.get_bids(tender.id).await.is_empty());
    }

    #[tokio::test]
    async fn cancelled_bid_frees_the_vendor_to_resubmit() {
        let harness = Service::new_with_mocks(mock_db_ok());
        let (tender, bid, bidder) = tender_with_bid(&harness).await;
        harness.clock.advance(Duration::minutes(3));

        harness
            .service
            .cancel_bid(CancelBidInput {
                actor:  bidder,
                bid_id: bid.id,
                reason: None,
            })
            .await
            .unwrap();

        // a fresh row, not a resurrection of the old one
        let fresh = harness
            .service
            .submit_bid(SubmitBidInput {
                actor:      bidder,
                bid_create: bid_spec(tender.id, &bidder),
            })
            .await
            .unwrap();
        assert_ne!(fresh.id, bid.id);
        let stored = harness.service.repo.get_tender(tender.id).await.unwrap();
        assert_eq!(stored.bid_count, 1);
    }

    #[tokio::test]
    async fn withdrawal_blocks_resubmission() {
        let harness = Service::new_with_mocks(mock_db_ok());
        let (tender, bid, bidder) = tender_with_bid(&harness).await;
        harness.clock.advance(Duration::minutes(10));

        harness
            .service
            .cancel_bid(CancelBidInput {
                actor:  bidder,
                bid_id: bid.id,
                reason: None,
            })
            .await
            .unwrap();

        let result = harness
            .service
            .submit_bid(SubmitBidInput {
                actor:      bidder,
                bid_create: bid_spec(tender.id, &bidder),
            })
            .await;
        assert_eq!(result.unwrap_err(), CoreError::DuplicateBid);
    }

    #[tokio::test]
    async fn withdrawn_bid_cannot_be_cancelled_again() {
        let harness = Service::new_with_mocks(mock_db_ok());
        let (_, bid, bidder) = tender_with_bid(&harness).await;
        harness.clock.advance(Duration::minutes(10));

        harness
            .service
            .cancel_bid(CancelBidInput {
                actor:  bidder,
                bid_id: bid.id,
                reason: None,
            })
            .await
            .unwrap();
        let result = harness
            .service
            .cancel_bid(CancelBidInput {
                actor:  bidder,
                bid_id: bid.id,
                reason: None,
            })
            .await;
        assert!(matches!(result.unwrap_err(), CoreError::InvalidState(_)));
    }

    #[tokio::test]
    async fn closed_tender_freezes_its_bids() {
        let harness = Service::new_with_mocks(mock_db_ok());
        let (tender, bid, bidder) = tender_with_bid(&harness).await;
        harness.clock.advance(Duration::hours(2));

        let result = harness
            .service
            .cancel_bid(CancelBidInput {
                actor:  bidder,
                bid_id: bid.id,
                reason: None,
            })
            .await;
        assert!(matches!(result.unwrap_err(), CoreError::InvalidState(_)));

        // still there, still counted
        assert_eq!(harness.service.repo.get_bids(tender.id).await.len(), 1);
        let stored = harness.service.repo.get_tender(tender.id).await.unwrap();
        assert_eq!(stored.bid_count, 1);
    }

    #[tokio::test]
    async fn counter_always_matches_the_non_withdrawn_rows() {
        let harness = Service::new_with_mocks(mock_db_ok());
        let owner = buyer();
        let tender = harness
            .service
            .create_tender(CreateTenderInput {
                actor: owner,
                spec:  tender_spec(&owner, closing_in_one_hour()),
            })
            .await
            .unwrap();
        let (v1, v2) = (vendor(), vendor());
        let first = harness
            .service
            .submit_bid(SubmitBidInput {
                actor:      v1,
                bid_create: bid_spec(tender.id, &v1),
            })
            .await
            .unwrap();
        harness
            .service
            .submit_bid(SubmitBidInput {
                actor:      v2,
                bid_create: bid_spec(tender.id, &v2),
            })
            .await
            .unwrap();

        let active = |bids: &[entities::Bid]| {
            bids.iter()
                .filter(|b| b.status != BidStatus::Withdrawn)
                .count() as u32
        };
        let stored = harness.service.repo.get_tender(tender.id).await.unwrap();
        assert_eq!(stored.bid_count, 2);
        assert_eq!(
            active(&harness.service.repo.get_bids(tender.id).await),
            stored.bid_count
        );

        // soft withdrawal drops the counter but keeps the row
        harness.clock.advance(Duration::minutes(10));
        harness
            .service
            .cancel_bid(CancelBidInput {
                actor:  v1,
                bid_id: first.id,
                reason: None,
            })
            .await
            .unwrap();
        let stored = harness.service.repo.get_tender(tender.id).await.unwrap();
        assert_eq!(stored.bid_count, 1);
        assert_eq!(
            active(&harness.service.repo.get_bids(tender.id).await),
            stored.bid_count
        );

        // a failed cancellation (already withdrawn) changes nothing
        let _ = harness
            .service
            .cancel_bid(CancelBidInput {
                actor:  v1,
                bid_id: first.id,
                reason: None,
            })
            .await;
        let stored = harness.service.repo.get_tender(tender.id).await.unwrap();
        assert_eq!(stored.bid_count, 1);
        assert_eq!(
            active(&harness.service.repo.get_bids(tender.id).await),
            stored.bid_count
        );
    }

    #[tokio::test]
    async fn another_vendor_cannot_cancel_the_bid() {
        let harness = Service::new_with_mocks(mock_db_ok());
        let (_, bid, _) = tender_with_bid(&harness).await;

        let result = harness
            .service
            .cancel_bid(CancelBidInput {
                actor:  vendor(),
                bid_id: bid.id,
                reason: None,
            })
            .await;
        assert_eq!(result.unwrap_err(), CoreError::Forbidden);
    }
}

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
pub struct SubmitBidInput {
    pub actor:      Actor,
    pub bid_create: entities::BidCreate,
}

impl Service {
    #[tracing::instrument(
        skip_all,
        fields(tender_id = %input.bid_create.tender_id, bid_id),
        err(level = tracing::Level::TRACE)
    )]
    pub async fn submit_bid(&self, input: SubmitBidInput) -> Result<entities::Bid, CoreError> {
        verification::ensure_vendor(&input.actor)?;
        if input.bid_create.vendor != input.actor.id {
            return Err(CoreError::Forbidden);
        }
        let tender_id = input.bid_create.tender_id;
        let lock = self.repo.get_or_create_tender_lock(tender_id).await;
        let result = self.submit_bid_for_lock(input, lock).await;
        self.repo.remove_tender_lock(&tender_id).await;
        result
    }

    async fn submit_bid_for_lock(
        &self,
        input: SubmitBidInput,
        lock: entities::TenderLock,
    ) -> Result<entities::Bid, CoreError> {
        let _lock = lock.lock().await;
        let tender = self.repo.get_tender(input.bid_create.tender_id).await?;
        let now = self.clock.now();

        if !tender.can_accept_bids(now) {
            // A rejected submission is also the trigger that lazily closes
            // a stale `open` tender past its deadline.
            if tender.status == entities::TenderStatus::Open && tender.is_expired(now) {
                self.repo
                    .update_tender_status(tender.id, entities::TenderStatus::Closed, now)
                    .await?;
            }
            return Err(CoreError::TenderClosed);
        }
        if tender.private && !tender.is_invited(input.bid_create.vendor) {
            return Err(CoreError::Forbidden);
        }
        if self
            .repo
            .get_vendor_bid(tender.id, input.bid_create.vendor)
            .await
            .is_some()
        {
            return Err(CoreError::DuplicateBid);
        }
        verification::validate_bid_pricing(
            input.bid_create.unit_price,
            input.bid_create.quantity,
            input.bid_create.delivery_timeline_days,
        )?;

        let pricing = entities::BidPricing::compute(
            input.bid_create.unit_price,
            input.bid_create.quantity,
            input.bid_create.vat_registered,
            self.config.vat_rate,
        );
        let bid = entities::Bid::new(input.bid_create, pricing, now);
        let bid = self.repo.add_bid(bid).await?;
        tracing::Span::current().record("bid_id", bid.id.to_string());

        self.record_audit(
            &input.actor,
            AuditAction::BidSubmit,
            format!("Submitted bid for tender {}", tender.reference),
            AuditEntity::Bid(bid.id),
        )
        .await;
        self.notify(NotificationEvent::BidReceived {
            recipient: tender.created_by,
            tender_id: tender.id,
            bid_id:    bid.id,
            message:   format!("New bid received for \"{}\"", tender.title),
        });
        self.notify(NotificationEvent::BidSubmitted {
            recipient: bid.vendor,
            tender_id: tender.id,
            bid_id:    bid.id,
            message:   format!("Your bid for \"{}\" has been submitted", tender.title),
        });
        Ok(bid)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::tender::{
            entities::{
                BidStatus,
                TenderStatus,
            },
            service::{
                create_tender::CreateTenderInput,
                tests::{
                    bid_spec,
                    buyer,
                    closing_in_one_hour,
                    mock_db_ok,
                    tender_spec,
                    vendor,
                },
            },
        },
        rust_decimal_macros::dec,
        time::Duration,
    };

    async fn open_tender(
        harness: &crate::tender::service::tests::Harness,
        owner: &Actor,
    ) -> entities::Tender {
        harness
            .service
            .create_tender(CreateTenderInput {
                actor: *owner,
                spec:  tender_spec(owner, closing_in_one_hour()),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn submission_creates_a_pending_bid_and_counts_it() {
        let mut harness = Service::new_with_mocks(mock_db_ok());
        let owner = buyer();
        let tender = open_tender(&harness, &owner).await;
        let bidder = vendor();

        let mut spec = bid_spec(tender.id, &bidder);
        spec.vat_registered = true;
        let bid = harness
            .service
            .submit_bid(SubmitBidInput {
                actor:      bidder,
                bid_create: spec,
            })
            .await
            .unwrap();

        assert_eq!(bid.status, BidStatus::Pending);
        assert_eq!(bid.pricing.subtotal, dec!(1000));
        assert_eq!(bid.pricing.vat_amount, dec!(180.00));
        assert_eq!(bid.pricing.total_price, dec!(1180.00));

        let stored = harness.service.repo.get_tender(tender.id).await.unwrap();
        assert_eq!(stored.bid_count, 1);

        // buyer is notified, vendor gets a confirmation
        let first = harness.events.try_recv().unwrap();
        assert!(matches!(
            first,
            NotificationEvent::BidReceived { recipient, .. } if recipient == owner.id
        ));
        let second = harness.events.try_recv().unwrap();
        assert!(matches!(
            second,
            NotificationEvent::BidSubmitted { recipient, .. } if recipient == bidder.id
        ));
        assert_eq!(harness.audit.count(crate::audit::AuditAction::BidSubmit), 1);
    }

    #[tokio::test]
    async fn second_bid_by_the_same_vendor_is_a_duplicate() {
        let harness = Service::new_with_mocks(mock_db_ok());
        let owner = buyer();
        let tender = open_tender(&harness, &owner).await;
        let bidder = vendor();

        harness
            .service
            .submit_bid(SubmitBidInput {
                actor:      bidder,
                bid_create: bid_spec(tender.id, &bidder),
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

        // exactly one bid persisted, counter untouched by the rejection
        assert_eq!(harness.service.repo.get_bids(tender.id).await.len(), 1);
        let stored = harness.service.repo.get_tender(tender.id).await.unwrap();
        assert_eq!(stored.bid_count, 1);
    }

    #[tokio::test]
    async fn expired_tender_rejects_and_lazily_closes() {
        let harness = Service::new_with_mocks(mock_db_ok());
        let owner = buyer();
        let tender = open_tender(&harness, &owner).await;
        harness.clock.advance(Duration::hours(2));

        let bidder = vendor();
        let result = harness
            .service
            .submit_bid(SubmitBidInput {
                actor:      bidder,
                bid_create: bid_spec(tender.id, &bidder),
            })
            .await;
        assert_eq!(result.unwrap_err(), CoreError::TenderClosed);

        let stored = harness.service.repo.get_tender(tender.id).await.unwrap();
        assert_eq!(stored.status, TenderStatus::Closed);
        assert_eq!(stored.bid_count, 0);
    }

    #[tokio::test]
    async fn draft_tender_accepts_no_bids() {
        let harness = Service::new_with_mocks(mock_db_ok());
        let owner = buyer();
        let mut spec = tender_spec(&owner, closing_in_one_hour());
        spec.initial_status = TenderStatus::Draft;
        let tender = harness
            .service
            .create_tender(CreateTenderInput { actor: owner, spec })
            .await
            .unwrap();

        let bidder = vendor();
        let result = harness
            .service
            .submit_bid(SubmitBidInput {
                actor:      bidder,
                bid_create: bid_spec(tender.id, &bidder),
            })
            .await;
        assert_eq!(result.unwrap_err(), CoreError::TenderClosed);
    }

    #[tokio::test]
    async fn private_tender_requires_an_invite() {
        let harness = Service::new_with_mocks(mock_db_ok());
        let owner = buyer();
        let invited = vendor();
        let uninvited = vendor();

        let mut spec = tender_spec(&owner, closing_in_one_hour());
        spec.private = true;
        spec.invited_vendors = [invited.id].into_iter().collect();
        let tender = harness
            .service
            .create_tender(CreateTenderInput { actor: owner, spec })
            .await
            .unwrap();

        let result = harness
            .service
            .submit_bid(SubmitBidInput {
                actor:      uninvited,
                bid_create: bid_spec(tender.id, &uninvited),
            })
            .await;
        assert_eq!(result.unwrap_err(), CoreError::Forbidden);

        assert!(harness
            .service
            .submit_bid(SubmitBidInput {
                actor:      invited,
                bid_create: bid_spec(tender.id, &invited),
            })
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn non_positive_pricing_is_rejected() {
        let harness = Service::new_with_mocks(mock_db_ok());
        let owner = buyer();
        let tender = open_tender(&harness, &owner).await;
        let bidder = vendor();

        let mut spec = bid_spec(tender.id, &bidder);
        spec.unit_price = dec!(0);
        let result = harness
            .service
            .submit_bid(SubmitBidInput {
                actor:      bidder,
                bid_create: spec,
            })
            .await;
        assert!(matches!(result.unwrap_err(), CoreError::InvalidInput(_)));

        let stored = harness.service.repo.get_tender(tender.id).await.unwrap();
        assert_eq!(stored.bid_count, 0);
    }

    #[tokio::test]
    async fn concurrent_duplicate_submissions_persist_exactly_one_bid() {
        let harness = Service::new_with_mocks(mock_db_ok());
        let owner = buyer();
        let tender = open_tender(&harness, &owner).await;
        let bidder = vendor();

        let first = harness.service.clone();
        let second = harness.service.clone();
        let (r1, r2) = tokio::join!(
            first.submit_bid(SubmitBidInput {
                actor:      bidder,
                bid_create: bid_spec(tender.id, &bidder),
            }),
            second.submit_bid(SubmitBidInput {
                actor:      bidder,
                bid_create: bid_spec(tender.id, &bidder),
            }),
        );

        // one submission lands, the other is a duplicate
        assert!(r1.is_ok() != r2.is_ok());
        assert_eq!(
            r1.err().or(r2.err()),
            Some(CoreError::DuplicateBid)
        );
        assert_eq!(harness.service.repo.get_bids(tender.id).await.len(), 1);
        let stored = harness.service.repo.get_tender(tender.id).await.unwrap();
        assert_eq!(stored.bid_count, 1);
    }

    #[tokio::test]
    async fn missing_tender_is_not_found() {
        let harness = Service::new_with_mocks(mock_db_ok());
        let bidder = vendor();
        let result = harness
            .service
            .submit_bid(SubmitBidInput {
                actor:      bidder,
                bid_create: bid_spec(uuid::Uuid::new_v4(), &bidder),
            })
            .await;
        assert_eq!(result.unwrap_err(), CoreError::TenderNotFound);
    }
}

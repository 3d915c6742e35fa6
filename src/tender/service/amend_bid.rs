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
        tender::entities,
    },
};

#[derive(Clone, Debug)]
pub struct AmendBidInput {
    pub actor:  Actor,
    pub bid_id: entities::BidId,
    pub patch:  entities::BidUpdate,
}

impl Service {
    /// Vendor reworks a still-pending bid while the tender accepts bids.
    /// Totals are recomputed from scratch. No event goes to the buyer:
    /// iterative edits before the deadline are expected and notifying each
    /// one would be noise.
    #[tracing::instrument(
        skip_all,
        fields(bid_id = %input.bid_id),
        err(level = tracing::Level::TRACE)
    )]
    pub async fn amend_bid(&self, input: AmendBidInput) -> Result<entities::Bid, CoreError> {
        let bid = self.repo.get_bid(input.bid_id).await?;
        if bid.vendor != input.actor.id {
            return Err(CoreError::Forbidden);
        }
        let tender_id = bid.tender_id;
        let lock = self.repo.get_or_create_tender_lock(tender_id).await;
        let result = self.amend_bid_for_lock(input, lock).await;
        self.repo.remove_tender_lock(&tender_id).await;
        result
    }

    async fn amend_bid_for_lock(
        &self,
        input: AmendBidInput,
        lock: entities::TenderLock,
    ) -> Result<entities::Bid, CoreError> {
        let _lock = lock.lock().await;
        let bid = self.repo.get_bid(input.bid_id).await?;
        let tender = self.repo.get_tender(bid.tender_id).await?;
        let now = self.clock.now();

        if !tender.can_accept_bids(now) {
            if tender.status == entities::TenderStatus::Open && tender.is_expired(now) {
                self.repo
                    .update_tender_status(tender.id, entities::TenderStatus::Closed, now)
                    .await?;
            }
            return Err(CoreError::TenderClosed);
        }
        if !bid.status.is_pending() {
            return Err(CoreError::InvalidState(
                "Only a pending bid can be amended".to_string(),
            ));
        }

        let unit_price = input.patch.unit_price.unwrap_or(bid.pricing.unit_price);
        let quantity = input.patch.quantity.unwrap_or(bid.pricing.quantity);
        let vat_registered = input
            .patch
            .vat_registered
            .unwrap_or(bid.pricing.vat_registered);
        let delivery_timeline_days = input
            .patch
            .delivery_timeline_days
            .unwrap_or(bid.delivery_timeline_days);
        verification::validate_bid_pricing(unit_price, quantity, delivery_timeline_days)?;

        let mut updated = bid.clone();
        updated.pricing = entities::BidPricing::compute(
            unit_price,
            quantity,
            vat_registered,
            self.config.vat_rate,
        );
        updated.delivery_timeline_days = delivery_timeline_days;
        if let Some(warranty_months) = input.patch.warranty_months {
            updated.warranty_months = warranty_months;
        }
        if let Some(warranty_terms) = input.patch.warranty_terms {
            updated.warranty_terms = warranty_terms;
        }
        if let Some(remarks) = input.patch.remarks {
            updated.remarks = remarks;
        }
        if let Some(technical_notes) = input.patch.technical_notes {
            updated.technical_notes = technical_notes;
        }
        updated.update_time = now;

        let updated = self.repo.update_bid(updated).await?;
        self.record_audit(
            &input.actor,
            AuditAction::BidUpdate,
            format!("Updated bid for tender {}", tender.reference),
            AuditEntity::Bid(updated.id),
        )
        .await;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::tender::service::{
            create_tender::CreateTenderInput,
            submit_bid::SubmitBidInput,
            tests::{
                bid_spec,
                buyer,
                closing_in_one_hour,
                mock_db_ok,
                tender_spec,
                vendor,
            },
        },
        rust_decimal_macros::dec,
        time::Duration,
    };

    async fn tender_with_bid(
        harness: &crate::tender::service::tests::Harness,
    ) -> (entities::Tender, entities::Bid, Actor) {
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
    async fn amendment_recomputes_totals() {
        let mut harness = Service::new_with_mocks(mock_db_ok());
        let (_, bid, bidder) = tender_with_bid(&harness).await;
        while harness.events.try_recv().is_ok() {}

        let updated = harness
            .service
            .amend_bid(AmendBidInput {
                actor:  bidder,
                bid_id: bid.id,
                patch:  entities::BidUpdate {
                    unit_price: Some(dec!(90)),
                    vat_registered: Some(true),
                    ..Default::default()
                },
            })
            .await
            .unwrap();

        assert_eq!(updated.pricing.subtotal, dec!(900));
        assert_eq!(updated.pricing.vat_amount, dec!(162.00));
        assert_eq!(updated.pricing.total_price, dec!(1062.00));

        // deliberately no buyer notification on amendment
        assert!(harness.events.try_recv().is_err());
        assert_eq!(harness.audit.count(crate::audit::AuditAction::BidUpdate), 1);
    }

    #[tokio::test]
    async fn only_the_owning_vendor_can_amend() {
        let harness = Service::new_with_mocks(mock_db_ok());
        let (_, bid, _) = tender_with_bid(&harness).await;

        let result = harness
            .service
            .amend_bid(AmendBidInput {
                actor:  vendor(),
                bid_id: bid.id,
                patch:  entities::BidUpdate::default(),
            })
            .await;
        assert_eq!(result.unwrap_err(), CoreError::Forbidden);
    }

    #[tokio::test]
    async fn amendment_after_the_deadline_is_rejected() {
        let harness = Service::new_with_mocks(mock_db_ok());
        let (_, bid, bidder) = tender_with_bid(&harness).await;
        harness.clock.advance(Duration::hours(2));

        let result = harness
            .service
            .amend_bid(AmendBidInput {
                actor:  bidder,
                bid_id: bid.id,
                patch:  entities::BidUpdate {
                    unit_price: Some(dec!(1)),
                    ..Default::default()
                },
            })
            .await;
        assert_eq!(result.unwrap_err(), CoreError::TenderClosed);

        // pricing unchanged by the rejected amendment
        let stored = harness.service.repo.get_bid(bid.id).await.unwrap();
        assert_eq!(stored.pricing, bid.pricing);
    }

    #[tokio::test]
    async fn amended_pricing_must_stay_positive() {
        let harness = Service::new_with_mocks(mock_db_ok());
        let (_, bid, bidder) = tender_with_bid(&harness).await;

        let result = harness
            .service
            .amend_bid(AmendBidInput {
                actor:  bidder,
                bid_id: bid.id,
                patch:  entities::BidUpdate {
                    quantity: Some(0),
                    ..Default::default()
                },
            })
            .await;
        assert!(matches!(result.unwrap_err(), CoreError::InvalidInput(_)));
    }
}

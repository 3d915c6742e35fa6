use {
    super::Service,
    crate::{
        error::CoreError,
        models::Actor,
        tender::entities,
    },
};

#[derive(Clone, Debug)]
pub struct GetTenderInput {
    pub actor:     Actor,
    pub tender_id: entities::TenderId,
}

impl Service {
    /// Single-tender read. Repairs a stale `open` past its deadline, gates
    /// private tenders to the invited set, and seals the budget for
    /// vendors unless the buyer chose to show it.
    #[tracing::instrument(
        skip_all,
        fields(tender_id = %input.tender_id),
        err(level = tracing::Level::TRACE)
    )]
    pub async fn get_tender(
        &self,
        input: GetTenderInput,
    ) -> Result<entities::TenderView, CoreError> {
        let tender = self.repo.get_tender(input.tender_id).await?;
        let now = self.clock.now();
        let tender = self.close_if_expired(tender, now).await?;

        let privileged = tender.is_owner(&input.actor) || input.actor.is_admin();
        if tender.private && !privileged && !tender.is_invited(input.actor.id) {
            return Err(CoreError::Forbidden);
        }
        let budget_visible = privileged || tender.show_budget;
        Ok(entities::TenderView::new(&tender, budget_visible))
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::tender::{
            entities::{
                SealedAmount,
                TenderStatus,
            },
            service::{
                create_tender::CreateTenderInput,
                tests::{
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

    #[tokio::test]
    async fn budget_is_sealed_for_vendors_unless_shown() {
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

        let vendor_view = harness
            .service
            .get_tender(GetTenderInput {
                actor:     vendor(),
                tender_id: tender.id,
            })
            .await
            .unwrap();
        assert_eq!(vendor_view.budget, Some(SealedAmount::Sealed));

        let owner_view = harness
            .service
            .get_tender(GetTenderInput {
                actor:     owner,
                tender_id: tender.id,
            })
            .await
            .unwrap();
        assert_eq!(owner_view.budget, Some(SealedAmount::Revealed(dec!(50000))));
    }

    #[tokio::test]
    async fn private_tender_is_hidden_from_the_uninvited() {
        let harness = Service::new_with_mocks(mock_db_ok());
        let owner = buyer();
        let invited = vendor();
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
            .get_tender(GetTenderInput {
                actor:     vendor(),
                tender_id: tender.id,
            })
            .await;
        assert_eq!(result.unwrap_err(), CoreError::Forbidden);

        assert!(harness
            .service
            .get_tender(GetTenderInput {
                actor:     invited,
                tender_id: tender.id,
            })
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn reading_an_expired_tender_repairs_its_status() {
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
        harness.clock.advance(Duration::hours(2));

        let view = harness
            .service
            .get_tender(GetTenderInput {
                actor:     owner,
                tender_id: tender.id,
            })
            .await
            .unwrap();
        assert_eq!(view.status, TenderStatus::Closed);
        let stored = harness.service.repo.get_tender(tender.id).await.unwrap();
        assert_eq!(stored.status, TenderStatus::Closed);
    }
}

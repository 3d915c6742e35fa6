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
pub struct PublishTenderInput {
    pub actor:     Actor,
    pub tender_id: entities::TenderId,
}

impl Service {
    /// `draft -> open`. Any other starting status is refused by the
    /// transition check.
    #[tracing::instrument(
        skip_all,
        fields(tender_id = %input.tender_id),
        err(level = tracing::Level::TRACE)
    )]
    pub async fn publish_tender(
        &self,
        input: PublishTenderInput,
    ) -> Result<entities::Tender, CoreError> {
        let tender_id = input.tender_id;
        let lock = self.repo.get_or_create_tender_lock(tender_id).await;
        let result = self.publish_tender_for_lock(input, lock).await;
        self.repo.remove_tender_lock(&tender_id).await;
        result
    }

    async fn publish_tender_for_lock(
        &self,
        input: PublishTenderInput,
        lock: entities::TenderLock,
    ) -> Result<entities::Tender, CoreError> {
        let _lock = lock.lock().await;
        let tender = self.repo.get_tender(input.tender_id).await?;
        verification::ensure_owner_or_admin(&tender, &input.actor)?;
        if tender.status != entities::TenderStatus::Draft {
            return Err(CoreError::InvalidState(
                "Only a draft tender can be published".to_string(),
            ));
        }
        let now = self.clock.now();
        let published = self
            .repo
            .update_tender_status(input.tender_id, entities::TenderStatus::Open, now)
            .await?;
        self.record_audit(
            &input.actor,
            AuditAction::RfqPublish,
            format!("Published tender {}", published.reference),
            AuditEntity::Tender(published.id),
        )
        .await;
        Ok(published)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::tender::{
            entities::TenderStatus,
            service::{
                create_tender::CreateTenderInput,
                tests::{
                    buyer,
                    closing_in_one_hour,
                    mock_db_ok,
                    tender_spec,
                },
            },
        },
    };

    #[tokio::test]
    async fn draft_publishes_to_open() {
        let harness = Service::new_with_mocks(mock_db_ok());
        let owner = buyer();
        let mut spec = tender_spec(&owner, closing_in_one_hour());
        spec.initial_status = TenderStatus::Draft;
        let tender = harness
            .service
            .create_tender(CreateTenderInput { actor: owner, spec })
            .await
            .unwrap();

        let published = harness
            .service
            .publish_tender(PublishTenderInput {
                actor:     owner,
                tender_id: tender.id,
            })
            .await
            .unwrap();
        assert_eq!(published.status, TenderStatus::Open);
        assert_eq!(harness.audit.count(crate::audit::AuditAction::RfqPublish), 1);
    }

    #[tokio::test]
    async fn open_tender_cannot_be_published_again() {
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

        let result = harness
            .service
            .publish_tender(PublishTenderInput {
                actor:     owner,
                tender_id: tender.id,
            })
            .await;
        assert!(matches!(result.unwrap_err(), CoreError::InvalidState(_)));
    }
}

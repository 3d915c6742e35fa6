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
pub struct CreateTenderInput {
    pub actor: Actor,
    pub spec:  entities::TenderCreate,
}

impl Service {
    #[tracing::instrument(
        skip_all,
        fields(tender_id, reference),
        err(level = tracing::Level::TRACE)
    )]
    pub async fn create_tender(
        &self,
        input: CreateTenderInput,
    ) -> Result<entities::Tender, CoreError> {
        verification::ensure_buyer(&input.actor)?;
        if input.spec.created_by != input.actor.id && !input.actor.is_admin() {
            return Err(CoreError::Forbidden);
        }
        let now = self.clock.now();
        verification::validate_tender_create(&input.spec, now)?;

        let tender = self.repo.add_tender(input.spec, now).await?;
        tracing::Span::current().record("tender_id", tender.id.to_string());
        tracing::Span::current().record("reference", tender.reference.as_str());

        self.record_audit(
            &input.actor,
            AuditAction::RfqCreate,
            format!("Created tender {} - {}", tender.reference, tender.title),
            AuditEntity::Tender(tender.id),
        )
        .await;

        if tender.private {
            for invited in &tender.invited_vendors {
                self.notify(NotificationEvent::PrivateInvite {
                    recipient: *invited,
                    tender_id: tender.id,
                    message:   format!("You have been invited to bid on: {}", tender.title),
                });
            }
        }
        Ok(tender)
    }
}

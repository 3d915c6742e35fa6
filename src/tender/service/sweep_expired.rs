use {
    super::Service,
    crate::{
        error::CoreError,
        tender::entities,
    },
    time::OffsetDateTime,
};

impl Service {
    /// Moves every `open` tender whose closing time has passed to
    /// `closed`. Idempotent: already-closed tenders are skipped, so the
    /// sweep can be invoked from any read path (or an external scheduler)
    /// as often as needed.
    #[tracing::instrument(skip_all, err(level = tracing::Level::TRACE))]
    pub async fn sweep_expired(&self) -> Result<Vec<entities::TenderId>, CoreError> {
        let now = self.clock.now();
        let candidates = self.repo.get_expired_open(now).await;
        let mut closed = Vec::new();
        for tender_id in candidates {
            let lock = self.repo.get_or_create_tender_lock(tender_id).await;
            let result = self.close_expired_for_lock(tender_id, now, lock).await;
            self.repo.remove_tender_lock(&tender_id).await;
            if result? {
                closed.push(tender_id);
            }
        }
        if !closed.is_empty() {
            tracing::info!(count = closed.len(), "Closed expired tenders");
        }
        Ok(closed)
    }

    /// Read-time repair for one tender: a stale `open` past its deadline
    /// is closed before the caller acts on it.
    pub(super) async fn close_if_expired(
        &self,
        tender: entities::Tender,
        now: OffsetDateTime,
    ) -> Result<entities::Tender, CoreError> {
        if !(tender.status == entities::TenderStatus::Open && tender.is_expired(now)) {
            return Ok(tender);
        }
        let lock = self.repo.get_or_create_tender_lock(tender.id).await;
        let result = async {
            let _lock = lock.lock().await;
            let fresh = self.repo.get_tender(tender.id).await?;
            if fresh.status == entities::TenderStatus::Open && fresh.is_expired(now) {
                self.repo
                    .update_tender_status(fresh.id, entities::TenderStatus::Closed, now)
                    .await
            } else {
                Ok(fresh)
            }
        }
        .await;
        self.repo.remove_tender_lock(&tender.id).await;
        result
    }

    async fn close_expired_for_lock(
        &self,
        tender_id: entities::TenderId,
        now: OffsetDateTime,
        lock: entities::TenderLock,
    ) -> Result<bool, CoreError> {
        let _lock = lock.lock().await;
        // Re-check under the lock; a concurrent sweep, award, or removal
        // may have moved the tender already.
        match self.repo.get_tender(tender_id).await {
            Ok(tender)
                if tender.status == entities::TenderStatus::Open && tender.is_expired(now) =>
            {
                self.repo
                    .update_tender_status(tender_id, entities::TenderStatus::Closed, now)
                    .await?;
                Ok(true)
            }
            _ => Ok(false),
        }
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
        time::Duration,
    };

    #[tokio::test]
    async fn sweep_closes_only_expired_open_tenders() {
        let harness = Service::new_with_mocks(mock_db_ok());
        let owner = buyer();
        let expiring = harness
            .service
            .create_tender(CreateTenderInput {
                actor: owner,
                spec:  tender_spec(&owner, closing_in_one_hour()),
            })
            .await
            .unwrap();
        let long_running = harness
            .service
            .create_tender(CreateTenderInput {
                actor: owner,
                spec:  tender_spec(&owner, closing_in_one_hour() + Duration::days(1)),
            })
            .await
            .unwrap();

        harness.clock.advance(Duration::hours(2));
        let closed = harness.service.sweep_expired().await.unwrap();
        assert_eq!(closed, vec![expiring.id]);

        let stored = harness.service.repo.get_tender(expiring.id).await.unwrap();
        assert_eq!(stored.status, TenderStatus::Closed);
        let stored = harness
            .service
            .repo
            .get_tender(long_running.id)
            .await
            .unwrap();
        assert_eq!(stored.status, TenderStatus::Open);
    }

    #[tokio::test]
    async fn sweep_is_idempotent() {
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
        let first = harness.service.sweep_expired().await.unwrap();
        assert_eq!(first, vec![tender.id]);
        let second = harness.service.sweep_expired().await.unwrap();
        assert!(second.is_empty());

        let stored = harness.service.repo.get_tender(tender.id).await.unwrap();
        assert_eq!(stored.status, TenderStatus::Closed);
    }
}

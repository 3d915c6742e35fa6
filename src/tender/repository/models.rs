#[cfg(test)]
use mockall::automock;
use {
    super::entities,
    crate::{
        error::CoreError,
        kernel::{
            db::DB,
            entities::ReferenceId,
        },
        models::UserId,
    },
    async_trait::async_trait,
    rust_decimal::Decimal,
    sqlx::{
        types::Json,
        FromRow,
    },
    std::{
        fmt::Debug,
        str::FromStr,
    },
    time::OffsetDateTime,
    tracing::instrument,
    uuid::Uuid,
};

#[derive(Clone, Copy, Debug, PartialEq, sqlx::Type)]
#[sqlx(type_name = "tender_status", rename_all = "lowercase")]
pub enum TenderStatus {
    Draft,
    Open,
    Closed,
    Awarded,
    Cancelled,
}

impl From<entities::TenderStatus> for TenderStatus {
    fn from(status: entities::TenderStatus) -> Self {
        match status {
            entities::TenderStatus::Draft => TenderStatus::Draft,
            entities::TenderStatus::Open => TenderStatus::Open,
            entities::TenderStatus::Closed => TenderStatus::Closed,
            entities::TenderStatus::Awarded => TenderStatus::Awarded,
            entities::TenderStatus::Cancelled => TenderStatus::Cancelled,
        }
    }
}

impl From<TenderStatus> for entities::TenderStatus {
    fn from(status: TenderStatus) -> Self {
        match status {
            TenderStatus::Draft => entities::TenderStatus::Draft,
            TenderStatus::Open => entities::TenderStatus::Open,
            TenderStatus::Closed => entities::TenderStatus::Closed,
            TenderStatus::Awarded => entities::TenderStatus::Awarded,
            TenderStatus::Cancelled => entities::TenderStatus::Cancelled,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, sqlx::Type)]
#[sqlx(type_name = "bid_status", rename_all = "snake_case")]
pub enum BidStatus {
    Pending,
    UnderReview,
    Won,
    Lost,
    Withdrawn,
}

impl From<entities::BidStatus> for BidStatus {
    fn from(status: entities::BidStatus) -> Self {
        match status {
            entities::BidStatus::Pending => BidStatus::Pending,
            entities::BidStatus::UnderReview => BidStatus::UnderReview,
            entities::BidStatus::Won => BidStatus::Won,
            entities::BidStatus::Lost => BidStatus::Lost,
            entities::BidStatus::Withdrawn => BidStatus::Withdrawn,
        }
    }
}

impl From<BidStatus> for entities::BidStatus {
    fn from(status: BidStatus) -> Self {
        match status {
            BidStatus::Pending => entities::BidStatus::Pending,
            BidStatus::UnderReview => entities::BidStatus::UnderReview,
            BidStatus::Won => entities::BidStatus::Won,
            BidStatus::Lost => entities::BidStatus::Lost,
            BidStatus::Withdrawn => entities::BidStatus::Withdrawn,
        }
    }
}

#[derive(Clone, FromRow, Debug)]
pub struct Tender {
    pub id:                Uuid,
    pub reference:         String,
    pub title:             String,
    pub description:       String,
    pub items:             Json<Vec<entities::TenderItem>>,
    pub category:          String,
    pub budget:            Option<Decimal>,
    pub show_budget:       bool,
    pub closing_time:      OffsetDateTime,
    pub status:            TenderStatus,
    pub sealed:            bool,
    pub private:           bool,
    pub invited_vendors:   Json<Vec<UserId>>,
    pub created_by:        Uuid,
    pub organization:      Option<String>,
    pub delivery_location: Option<String>,
    pub delivery_deadline: Option<OffsetDateTime>,
    pub terms:             Option<String>,
    pub awarded_bid:       Option<Uuid>,
    pub awarded_to:        Option<Uuid>,
    pub awarded_at:        Option<OffsetDateTime>,
    pub award_remarks:     Option<String>,
    pub bid_count:         i32,
    pub bids_revealed_at:  Option<OffsetDateTime>,
    pub creation_time:     OffsetDateTime,
    pub update_time:       OffsetDateTime,
}

impl Tender {
    pub fn get_tender_entity(&self) -> anyhow::Result<entities::Tender> {
        let award = match (self.awarded_bid, self.awarded_to, self.awarded_at) {
            (Some(bid_id), Some(vendor), Some(time)) => Some(entities::AwardInfo {
                bid_id,
                vendor,
                time,
                remarks: self.award_remarks.clone(),
            }),
            (None, None, None) => None,
            _ => anyhow::bail!("Inconsistent award columns for tender {}", self.id),
        };
        Ok(entities::Tender {
            id: self.id,
            reference: ReferenceId::from(self.reference.clone()),
            title: self.title.clone(),
            description: self.description.clone(),
            items: self.items.0.clone(),
            category: entities::Category::from_str(&self.category)
                .map_err(|_| anyhow::anyhow!("Unknown category {}", self.category))?,
            budget: self.budget,
            show_budget: self.show_budget,
            closing_time: self.closing_time,
            status: self.status.into(),
            sealed: self.sealed,
            private: self.private,
            invited_vendors: self.invited_vendors.0.iter().copied().collect(),
            created_by: self.created_by,
            organization: self.organization.clone(),
            delivery_location: self.delivery_location.clone(),
            delivery_deadline: self.delivery_deadline,
            terms: self.terms.clone(),
            award,
            bid_count: u32::try_from(self.bid_count).unwrap_or(0),
            bids_revealed_at: self.bids_revealed_at,
            creation_time: self.creation_time,
            update_time: self.update_time,
        })
    }
}

#[derive(Clone, FromRow, Debug)]
pub struct Bid {
    pub id:                     Uuid,
    pub tender_id:              Uuid,
    pub vendor:                 Uuid,
    pub unit_price:             Decimal,
    pub quantity:               i32,
    pub subtotal:               Decimal,
    pub vat_registered:         bool,
    pub vat_amount:             Decimal,
    pub total_price:            Decimal,
    pub delivery_timeline_days: i32,
    pub warranty_months:        i32,
    pub warranty_terms:         Option<String>,
    pub remarks:                Option<String>,
    pub technical_notes:        Option<String>,
    pub status:                 BidStatus,
    pub revealed:               bool,
    pub withdrawn_at:           Option<OffsetDateTime>,
    pub withdrawal_reason:      Option<String>,
    pub creation_time:          OffsetDateTime,
    pub update_time:            OffsetDateTime,
}

impl Bid {
    pub fn get_bid_entity(&self) -> anyhow::Result<entities::Bid> {
        Ok(entities::Bid {
            id:                     self.id,
            tender_id:              self.tender_id,
            vendor:                 self.vendor,
            pricing:                entities::BidPricing {
                unit_price:     self.unit_price,
                quantity:       u32::try_from(self.quantity)
                    .map_err(|_| anyhow::anyhow!("Negative quantity for bid {}", self.id))?,
                subtotal:       self.subtotal,
                vat_registered: self.vat_registered,
                vat_amount:     self.vat_amount,
                total_price:    self.total_price,
            },
            delivery_timeline_days: u32::try_from(self.delivery_timeline_days)
                .map_err(|_| anyhow::anyhow!("Negative delivery timeline for bid {}", self.id))?,
            warranty_months:        u32::try_from(self.warranty_months).unwrap_or(0),
            warranty_terms:         self.warranty_terms.clone(),
            remarks:                self.remarks.clone(),
            technical_notes:        self.technical_notes.clone(),
            status:                 self.status.into(),
            revealed:               self.revealed,
            withdrawn_at:           self.withdrawn_at,
            withdrawal_reason:      self.withdrawal_reason.clone(),
            creation_time:          self.creation_time,
            update_time:            self.update_time,
        })
    }
}

fn unavailable(e: sqlx::Error, context: &str) -> CoreError {
    tracing::Span::current().record("result", "error");
    tracing::error!(error = e.to_string(), "DB: {}", context);
    CoreError::TemporarilyUnavailable
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait Database: Debug + Send + Sync + 'static {
    async fn add_tender(&self, tender: &entities::Tender) -> Result<(), CoreError>;
    async fn update_tender(&self, tender: &entities::Tender) -> Result<(), CoreError>;
    async fn update_tender_status(
        &self,
        id: entities::TenderId,
        status: entities::TenderStatus,
        update_time: OffsetDateTime,
    ) -> Result<(), CoreError>;
    async fn remove_tender(&self, id: entities::TenderId) -> Result<(), CoreError>;
    async fn award_tender(
        &self,
        tender: &entities::Tender,
        winning_bid: entities::BidId,
    ) -> Result<(), CoreError>;
    async fn add_bid(&self, bid: &entities::Bid) -> Result<(), CoreError>;
    async fn update_bid(&self, bid: &entities::Bid) -> Result<(), CoreError>;
    async fn remove_bid(
        &self,
        bid_id: entities::BidId,
        tender_id: entities::TenderId,
    ) -> Result<(), CoreError>;
    async fn withdraw_bid(&self, bid: &entities::Bid) -> Result<(), CoreError>;
    async fn mark_bids_revealed(
        &self,
        tender_id: entities::TenderId,
        at: OffsetDateTime,
    ) -> Result<(), CoreError>;
    async fn get_tenders(&self) -> Result<Vec<Tender>, CoreError>;
    async fn get_bids(&self) -> Result<Vec<Bid>, CoreError>;
}

#[async_trait]
impl Database for DB {
    #[instrument(
        target = "metrics",
        name = "db_add_tender",
        fields(category = "db_queries", result = "success", name = "add_tender"),
        skip_all
    )]
    async fn add_tender(&self, tender: &entities::Tender) -> Result<(), CoreError> {
        sqlx::query(
            "INSERT INTO tender (id, reference, title, description, items, category, budget, \
             show_budget, closing_time, status, sealed, private, invited_vendors, created_by, \
             organization, delivery_location, delivery_deadline, terms, bid_count, creation_time, \
             update_time) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, \
             $18, $19, $20, $21)",
        )
        .bind(tender.id)
        .bind(tender.reference.as_str())
        .bind(&tender.title)
        .bind(&tender.description)
        .bind(Json(&tender.items))
        .bind(tender.category.to_string())
        .bind(tender.budget)
        .bind(tender.show_budget)
        .bind(tender.closing_time)
        .bind(TenderStatus::from(tender.status))
        .bind(tender.sealed)
        .bind(tender.private)
        .bind(Json(tender.invited_vendors.iter().copied().collect::<Vec<_>>()))
        .bind(tender.created_by)
        .bind(&tender.organization)
        .bind(&tender.delivery_location)
        .bind(tender.delivery_deadline)
        .bind(&tender.terms)
        .bind(tender.bid_count as i32)
        .bind(tender.creation_time)
        .bind(tender.update_time)
        .execute(self)
        .await
        .map_err(|e| unavailable(e, "Failed to insert tender"))?;
        Ok(())
    }

    #[instrument(
        target = "metrics",
        name = "db_update_tender",
        fields(category = "db_queries", result = "success", name = "update_tender"),
        skip_all
    )]
    async fn update_tender(&self, tender: &entities::Tender) -> Result<(), CoreError> {
        sqlx::query(
            "UPDATE tender SET title = $2, description = $3, items = $4, category = $5, \
             budget = $6, show_budget = $7, closing_time = $8, sealed = $9, private = $10, \
             invited_vendors = $11, delivery_location = $12, delivery_deadline = $13, \
             terms = $14, update_time = $15 WHERE id = $1",
        )
        .bind(tender.id)
        .bind(&tender.title)
        .bind(&tender.description)
        .bind(Json(&tender.items))
        .bind(tender.category.to_string())
        .bind(tender.budget)
        .bind(tender.show_budget)
        .bind(tender.closing_time)
        .bind(tender.sealed)
        .bind(tender.private)
        .bind(Json(tender.invited_vendors.iter().copied().collect::<Vec<_>>()))
        .bind(&tender.delivery_location)
        .bind(tender.delivery_deadline)
        .bind(&tender.terms)
        .bind(tender.update_time)
        .execute(self)
        .await
        .map_err(|e| unavailable(e, "Failed to update tender"))?;
        Ok(())
    }

    #[instrument(
        target = "metrics",
        name = "db_update_tender_status",
        fields(category = "db_queries", result = "success", name = "update_tender_status"),
        skip_all
    )]
    async fn update_tender_status(
        &self,
        id: entities::TenderId,
        status: entities::TenderStatus,
        update_time: OffsetDateTime,
    ) -> Result<(), CoreError> {
        sqlx::query("UPDATE tender SET status = $2, update_time = $3 WHERE id = $1")
            .bind(id)
            .bind(TenderStatus::from(status))
            .bind(update_time)
            .execute(self)
            .await
            .map_err(|e| unavailable(e, "Failed to update tender status"))?;
        Ok(())
    }

    #[instrument(
        target = "metrics",
        name = "db_remove_tender",
        fields(category = "db_queries", result = "success", name = "remove_tender"),
        skip_all
    )]
    async fn remove_tender(&self, id: entities::TenderId) -> Result<(), CoreError> {
        sqlx::query("DELETE FROM tender WHERE id = $1")
            .bind(id)
            .execute(self)
            .await
            .map_err(|e| unavailable(e, "Failed to delete tender"))?;
        Ok(())
    }

    #[instrument(
        target = "metrics",
        name = "db_award_tender",
        fields(category = "db_queries", result = "success", name = "award_tender"),
        skip_all
    )]
    async fn award_tender(
        &self,
        tender: &entities::Tender,
        winning_bid: entities::BidId,
    ) -> Result<(), CoreError> {
        let award = tender.award.as_ref().ok_or_else(|| {
            tracing::error!(tender_id = %tender.id, "Awarded tender is missing award info");
            CoreError::TemporarilyUnavailable
        })?;
        let mut tx = self
            .begin()
            .await
            .map_err(|e| unavailable(e, "Failed to begin award transaction"))?;
        sqlx::query(
            "UPDATE tender SET status = 'awarded', awarded_bid = $2, awarded_to = $3, \
             awarded_at = $4, award_remarks = $5, update_time = $4 WHERE id = $1",
        )
        .bind(tender.id)
        .bind(award.bid_id)
        .bind(award.vendor)
        .bind(award.time)
        .bind(&award.remarks)
        .execute(&mut *tx)
        .await
        .map_err(|e| unavailable(e, "Failed to mark tender awarded"))?;
        sqlx::query("UPDATE bid SET status = 'won', update_time = $2 WHERE id = $1")
            .bind(winning_bid)
            .bind(award.time)
            .execute(&mut *tx)
            .await
            .map_err(|e| unavailable(e, "Failed to mark winning bid"))?;
        sqlx::query(
            "UPDATE bid SET status = 'lost', update_time = $3 \
             WHERE tender_id = $1 AND id <> $2 AND status = 'pending'",
        )
        .bind(tender.id)
        .bind(winning_bid)
        .bind(award.time)
        .execute(&mut *tx)
        .await
        .map_err(|e| unavailable(e, "Failed to mark losing bids"))?;
        tx.commit()
            .await
            .map_err(|e| unavailable(e, "Failed to commit award transaction"))?;
        Ok(())
    }

    #[instrument(
        target = "metrics",
        name = "db_add_bid",
        fields(category = "db_queries", result = "success", name = "add_bid"),
        skip_all
    )]
    async fn add_bid(&self, bid: &entities::Bid) -> Result<(), CoreError> {
        let mut tx = self
            .begin()
            .await
            .map_err(|e| unavailable(e, "Failed to begin bid transaction"))?;
        sqlx::query(
            "INSERT INTO bid (id, tender_id, vendor, unit_price, quantity, subtotal, \
             vat_registered, vat_amount, total_price, delivery_timeline_days, warranty_months, \
             warranty_terms, remarks, technical_notes, status, revealed, creation_time, \
             update_time) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
             $17, $18)",
        )
        .bind(bid.id)
        .bind(bid.tender_id)
        .bind(bid.vendor)
        .bind(bid.pricing.unit_price)
        .bind(bid.pricing.quantity as i32)
        .bind(bid.pricing.subtotal)
        .bind(bid.pricing.vat_registered)
        .bind(bid.pricing.vat_amount)
        .bind(bid.pricing.total_price)
        .bind(bid.delivery_timeline_days as i32)
        .bind(bid.warranty_months as i32)
        .bind(&bid.warranty_terms)
        .bind(&bid.remarks)
        .bind(&bid.technical_notes)
        .bind(BidStatus::from(bid.status))
        .bind(bid.revealed)
        .bind(bid.creation_time)
        .bind(bid.update_time)
        .execute(&mut *tx)
        .await
        .map_err(|e| match &e {
            // The unique (tender_id, vendor) index is the last line of
            // defense against two concurrent submissions by one vendor.
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                CoreError::DuplicateBid
            }
            _ => unavailable(e, "Failed to insert bid"),
        })?;
        sqlx::query("UPDATE tender SET bid_count = bid_count + 1 WHERE id = $1")
            .bind(bid.tender_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| unavailable(e, "Failed to increment bid count"))?;
        tx.commit()
            .await
            .map_err(|e| unavailable(e, "Failed to commit bid transaction"))?;
        Ok(())
    }

    #[instrument(
        target = "metrics",
        name = "db_update_bid",
        fields(category = "db_queries", result = "success", name = "update_bid"),
        skip_all
    )]
    async fn update_bid(&self, bid: &entities::Bid) -> Result<(), CoreError> {
        sqlx::query(
            "UPDATE bid SET unit_price = $2, quantity = $3, subtotal = $4, vat_registered = $5, \
             vat_amount = $6, total_price = $7, delivery_timeline_days = $8, \
             warranty_months = $9, warranty_terms = $10, remarks = $11, technical_notes = $12, \
             update_time = $13 WHERE id = $1",
        )
        .bind(bid.id)
        .bind(bid.pricing.unit_price)
        .bind(bid.pricing.quantity as i32)
        .bind(bid.pricing.subtotal)
        .bind(bid.pricing.vat_registered)
        .bind(bid.pricing.vat_amount)
        .bind(bid.pricing.total_price)
        .bind(bid.delivery_timeline_days as i32)
        .bind(bid.warranty_months as i32)
        .bind(&bid.warranty_terms)
        .bind(&bid.remarks)
        .bind(&bid.technical_notes)
        .bind(bid.update_time)
        .execute(self)
        .await
        .map_err(|e| unavailable(e, "Failed to update bid"))?;
        Ok(())
    }

    #[instrument(
        target = "metrics",
        name = "db_remove_bid",
        fields(category = "db_queries", result = "success", name = "remove_bid"),
        skip_all
    )]
    async fn remove_bid(
        &self,
        bid_id: entities::BidId,
        tender_id: entities::TenderId,
    ) -> Result<(), CoreError> {
        let mut tx = self
            .begin()
            .await
            .map_err(|e| unavailable(e, "Failed to begin bid removal transaction"))?;
        sqlx::query("DELETE FROM bid WHERE id = $1")
            .bind(bid_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| unavailable(e, "Failed to delete bid"))?;
        sqlx::query("UPDATE tender SET bid_count = GREATEST(bid_count - 1, 0) WHERE id = $1")
            .bind(tender_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| unavailable(e, "Failed to decrement bid count"))?;
        tx.commit()
            .await
            .map_err(|e| unavailable(e, "Failed to commit bid removal transaction"))?;
        Ok(())
    }

    #[instrument(
        target = "metrics",
        name = "db_withdraw_bid",
        fields(category = "db_queries", result = "success", name = "withdraw_bid"),
        skip_all
    )]
    async fn withdraw_bid(&self, bid: &entities::Bid) -> Result<(), CoreError> {
        let mut tx = self
            .begin()
            .await
            .map_err(|e| unavailable(e, "Failed to begin withdrawal transaction"))?;
        sqlx::query(
            "UPDATE bid SET status = 'withdrawn', withdrawn_at = $2, withdrawal_reason = $3, \
             update_time = $2 WHERE id = $1",
        )
        .bind(bid.id)
        .bind(bid.withdrawn_at)
        .bind(&bid.withdrawal_reason)
        .execute(&mut *tx)
        .await
        .map_err(|e| unavailable(e, "Failed to withdraw bid"))?;
        sqlx::query("UPDATE tender SET bid_count = GREATEST(bid_count - 1, 0) WHERE id = $1")
            .bind(bid.tender_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| unavailable(e, "Failed to decrement bid count"))?;
        tx.commit()
            .await
            .map_err(|e| unavailable(e, "Failed to commit withdrawal transaction"))?;
        Ok(())
    }

    #[instrument(
        target = "metrics",
        name = "db_mark_bids_revealed",
        fields(category = "db_queries", result = "success", name = "mark_bids_revealed"),
        skip_all
    )]
    async fn mark_bids_revealed(
        &self,
        tender_id: entities::TenderId,
        at: OffsetDateTime,
    ) -> Result<(), CoreError> {
        let mut tx = self
            .begin()
            .await
            .map_err(|e| unavailable(e, "Failed to begin reveal transaction"))?;
        sqlx::query("UPDATE bid SET revealed = TRUE, update_time = $2 WHERE tender_id = $1")
            .bind(tender_id)
            .bind(at)
            .execute(&mut *tx)
            .await
            .map_err(|e| unavailable(e, "Failed to mark bids revealed"))?;
        sqlx::query("UPDATE tender SET bids_revealed_at = $2 WHERE id = $1")
            .bind(tender_id)
            .bind(at)
            .execute(&mut *tx)
            .await
            .map_err(|e| unavailable(e, "Failed to stamp reveal time"))?;
        tx.commit()
            .await
            .map_err(|e| unavailable(e, "Failed to commit reveal transaction"))?;
        Ok(())
    }

    #[instrument(
        target = "metrics",
        name = "db_get_tenders",
        fields(category = "db_queries", result = "success", name = "get_tenders"),
        skip_all
    )]
    async fn get_tenders(&self) -> Result<Vec<Tender>, CoreError> {
        sqlx::query_as("SELECT * FROM tender")
            .fetch_all(self)
            .await
            .map_err(|e| unavailable(e, "Failed to fetch tenders"))
    }

    #[instrument(
        target = "metrics",
        name = "db_get_bids",
        fields(category = "db_queries", result = "success", name = "get_bids"),
        skip_all
    )]
    async fn get_bids(&self) -> Result<Vec<Bid>, CoreError> {
        sqlx::query_as("SELECT * FROM bid")
            .fetch_all(self)
            .await
            .map_err(|e| unavailable(e, "Failed to fetch bids"))
    }
}

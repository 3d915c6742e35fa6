use {
    super::bid::{
        BidId,
        SealedAmount,
    },
    crate::{
        kernel::entities::ReferenceId,
        models::{
            Actor,
            UserId,
        },
    },
    rust_decimal::Decimal,
    serde::{
        Deserialize,
        Serialize,
    },
    std::{
        collections::HashSet,
        sync::Arc,
    },
    time::OffsetDateTime,
    tokio::sync::Mutex,
    uuid::Uuid,
};

pub type TenderId = Uuid;

/// Serializes every workflow touching one tender's status, bid set, and bid
/// counter.
pub type TenderLock = Arc<Mutex<()>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenderStatus {
    Draft,
    Open,
    Closed,
    Awarded,
    Cancelled,
}

impl TenderStatus {
    /// `awarded` and `cancelled` accept no further mutation of the tender
    /// or its bids.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TenderStatus::Awarded | TenderStatus::Cancelled)
    }

    pub fn can_transition_to(&self, next: TenderStatus) -> bool {
        matches!(
            (self, next),
            (TenderStatus::Draft, TenderStatus::Open)
                | (TenderStatus::Open, TenderStatus::Closed)
                | (TenderStatus::Open, TenderStatus::Cancelled)
                | (TenderStatus::Open, TenderStatus::Awarded)
                | (TenderStatus::Closed, TenderStatus::Cancelled)
                | (TenderStatus::Closed, TenderStatus::Awarded)
        )
    }
}

/// Closed category list. Presentation of these labels belongs to the
/// listing surface; the engine only validates membership.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum Category {
    #[serde(rename = "IT & Electronics")]
    #[strum(serialize = "IT & Electronics")]
    ItElectronics,
    #[serde(rename = "Construction & Raw Materials")]
    #[strum(serialize = "Construction & Raw Materials")]
    ConstructionRawMaterials,
    #[serde(rename = "Office Stationery")]
    #[strum(serialize = "Office Stationery")]
    OfficeStationery,
    #[serde(rename = "Vehicles & Spare Parts")]
    #[strum(serialize = "Vehicles & Spare Parts")]
    VehiclesSpareParts,
    #[serde(rename = "Furniture")]
    #[strum(serialize = "Furniture")]
    Furniture,
    #[serde(rename = "Medical Equipment")]
    #[strum(serialize = "Medical Equipment")]
    MedicalEquipment,
    #[serde(rename = "Catering & Food")]
    #[strum(serialize = "Catering & Food")]
    CateringFood,
    #[serde(rename = "Cleaning & Maintenance")]
    #[strum(serialize = "Cleaning & Maintenance")]
    CleaningMaintenance,
    #[serde(rename = "Security Services")]
    #[strum(serialize = "Security Services")]
    SecurityServices,
    #[serde(rename = "Printing & Publishing")]
    #[strum(serialize = "Printing & Publishing")]
    PrintingPublishing,
    #[serde(rename = "Consulting Services")]
    #[strum(serialize = "Consulting Services")]
    ConsultingServices,
    #[serde(rename = "Other")]
    #[strum(serialize = "Other")]
    Other,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TenderItem {
    pub name:           String,
    pub quantity:       u32,
    pub unit:           String,
    pub specifications: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AwardInfo {
    pub bid_id:  BidId,
    pub vendor:  UserId,
    pub time:    OffsetDateTime,
    pub remarks: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tender {
    pub id:                TenderId,
    pub reference:         ReferenceId,
    pub title:             String,
    pub description:       String,
    pub items:             Vec<TenderItem>,
    pub category:          Category,
    pub budget:            Option<Decimal>,
    pub show_budget:       bool,
    pub closing_time:      OffsetDateTime,
    pub status:            TenderStatus,
    pub sealed:            bool,
    pub private:           bool,
    pub invited_vendors:   HashSet<UserId>,
    pub created_by:        UserId,
    pub organization:      Option<String>,
    pub delivery_location: Option<String>,
    pub delivery_deadline: Option<OffsetDateTime>,
    pub terms:             Option<String>,
    pub award:             Option<AwardInfo>,
    /// Count of non-withdrawn bids, maintained incrementally alongside
    /// every bid insert/remove/withdraw.
    pub bid_count:         u32,
    /// Set the first time this tender's bids became visible unredacted.
    pub bids_revealed_at:  Option<OffsetDateTime>,
    pub creation_time:     OffsetDateTime,
    pub update_time:       OffsetDateTime,
}

impl Tender {
    pub fn new(id: TenderId, reference: ReferenceId, spec: TenderCreate, now: OffsetDateTime) -> Self {
        Self {
            id,
            reference,
            title: spec.title,
            description: spec.description,
            items: spec.items,
            category: spec.category,
            budget: spec.budget,
            show_budget: spec.show_budget,
            closing_time: spec.closing_time,
            status: spec.initial_status,
            sealed: spec.sealed,
            private: spec.private,
            invited_vendors: spec.invited_vendors,
            created_by: spec.created_by,
            organization: spec.organization,
            delivery_location: spec.delivery_location,
            delivery_deadline: spec.delivery_deadline,
            terms: spec.terms,
            award: None,
            bid_count: 0,
            bids_revealed_at: None,
            creation_time: now,
            update_time: now,
        }
    }

    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        now >= self.closing_time
    }

    pub fn can_accept_bids(&self, now: OffsetDateTime) -> bool {
        self.status == TenderStatus::Open && !self.is_expired(now)
    }

    pub fn is_owner(&self, actor: &Actor) -> bool {
        self.created_by == actor.id
    }

    pub fn is_invited(&self, vendor: UserId) -> bool {
        self.invited_vendors.contains(&vendor)
    }

    pub fn apply(&mut self, patch: TenderUpdate, now: OffsetDateTime) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(items) = patch.items {
            self.items = items;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(budget) = patch.budget {
            self.budget = budget;
        }
        if let Some(show_budget) = patch.show_budget {
            self.show_budget = show_budget;
        }
        if let Some(closing_time) = patch.closing_time {
            self.closing_time = closing_time;
        }
        if let Some(sealed) = patch.sealed {
            self.sealed = sealed;
        }
        if let Some(private) = patch.private {
            self.private = private;
        }
        if let Some(invited_vendors) = patch.invited_vendors {
            self.invited_vendors = invited_vendors;
        }
        if let Some(delivery_location) = patch.delivery_location {
            self.delivery_location = delivery_location;
        }
        if let Some(delivery_deadline) = patch.delivery_deadline {
            self.delivery_deadline = delivery_deadline;
        }
        if let Some(terms) = patch.terms {
            self.terms = terms;
        }
        self.update_time = now;
    }
}

#[derive(Clone, Debug)]
pub struct TenderCreate {
    pub title:             String,
    pub description:       String,
    pub items:             Vec<TenderItem>,
    pub category:          Category,
    pub budget:            Option<Decimal>,
    pub show_budget:       bool,
    pub closing_time:      OffsetDateTime,
    pub sealed:            bool,
    pub private:           bool,
    pub invited_vendors:   HashSet<UserId>,
    pub created_by:        UserId,
    pub organization:      Option<String>,
    pub delivery_location: Option<String>,
    pub delivery_deadline: Option<OffsetDateTime>,
    pub terms:             Option<String>,
    /// `draft` or `open`, the creator's choice.
    pub initial_status:    TenderStatus,
}

/// Field patch for `update`. `None` leaves a field untouched; optional
/// fields are cleared by passing `Some(None)`.
#[derive(Clone, Debug, Default)]
pub struct TenderUpdate {
    pub title:             Option<String>,
    pub description:       Option<String>,
    pub items:             Option<Vec<TenderItem>>,
    pub category:          Option<Category>,
    pub budget:            Option<Option<Decimal>>,
    pub show_budget:       Option<bool>,
    pub closing_time:      Option<OffsetDateTime>,
    pub sealed:            Option<bool>,
    pub private:           Option<bool>,
    pub invited_vendors:   Option<HashSet<UserId>>,
    pub delivery_location: Option<Option<String>>,
    pub delivery_deadline: Option<Option<OffsetDateTime>>,
    pub terms:             Option<Option<String>>,
}

/// Outcome of the owner withdrawing a tender: gone entirely, or kept as a
/// cancelled record because bids already exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoveOutcome {
    Deleted,
    Cancelled,
}

/// A tender as surfaced to a requesting party. Identical to the entity
/// except that the budget is sealed for vendors unless the buyer opted to
/// show it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TenderView {
    pub id:                TenderId,
    pub reference:         ReferenceId,
    pub title:             String,
    pub description:       String,
    pub items:             Vec<TenderItem>,
    pub category:          Category,
    pub budget:            Option<SealedAmount>,
    pub closing_time:      OffsetDateTime,
    pub status:            TenderStatus,
    pub sealed:            bool,
    pub private:           bool,
    pub created_by:        UserId,
    pub organization:      Option<String>,
    pub delivery_location: Option<String>,
    pub delivery_deadline: Option<OffsetDateTime>,
    pub terms:             Option<String>,
    pub award:             Option<AwardInfo>,
    pub bid_count:         u32,
    pub creation_time:     OffsetDateTime,
}

impl TenderView {
    pub fn new(tender: &Tender, budget_visible: bool) -> Self {
        Self {
            id:                tender.id,
            reference:         tender.reference.clone(),
            title:             tender.title.clone(),
            description:       tender.description.clone(),
            items:             tender.items.clone(),
            category:          tender.category,
            budget:            tender.budget.map(|amount| {
                if budget_visible {
                    SealedAmount::Revealed(amount)
                } else {
                    SealedAmount::Sealed
                }
            }),
            closing_time:      tender.closing_time,
            status:            tender.status,
            sealed:            tender.sealed,
            private:           tender.private,
            created_by:        tender.created_by,
            organization:      tender.organization.clone(),
            delivery_location: tender.delivery_location.clone(),
            delivery_deadline: tender.delivery_deadline,
            terms:             tender.terms.clone(),
            award:             tender.award.clone(),
            bid_count:         tender.bid_count,
            creation_time:     tender.creation_time,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct TenderFilter {
    pub status:     Option<TenderStatus>,
    pub category:   Option<Category>,
    pub created_by: Option<UserId>,
    /// Case-insensitive substring match over title, reference, and
    /// description.
    pub search:     Option<String>,
}

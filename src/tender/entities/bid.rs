use {
    super::tender::TenderId,
    crate::models::UserId,
    rust_decimal::Decimal,
    serde::{
        Deserialize,
        Serialize,
    },
    time::OffsetDateTime,
    uuid::Uuid,
};

pub type BidId = Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BidStatus {
    Pending,
    UnderReview,
    Won,
    Lost,
    Withdrawn,
}

impl BidStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, BidStatus::Pending)
    }

    pub fn is_finalized(&self) -> bool {
        matches!(self, BidStatus::Won | BidStatus::Lost | BidStatus::Withdrawn)
    }
}

/// Pricing totals are always recomputed from unit price, quantity, and the
/// VAT flag; caller-supplied totals are never trusted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BidPricing {
    pub unit_price:     Decimal,
    pub quantity:       u32,
    pub subtotal:       Decimal,
    pub vat_registered: bool,
    pub vat_amount:     Decimal,
    pub total_price:    Decimal,
}

impl BidPricing {
    pub fn compute(
        unit_price: Decimal,
        quantity: u32,
        vat_registered: bool,
        vat_rate: Decimal,
    ) -> Self {
        let subtotal = unit_price * Decimal::from(quantity);
        let vat_amount = if vat_registered {
            (subtotal * vat_rate).round_dp(2)
        } else {
            Decimal::ZERO
        };
        Self {
            unit_price,
            quantity,
            subtotal,
            vat_registered,
            vat_amount,
            total_price: subtotal + vat_amount,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    pub id:                     BidId,
    pub tender_id:              TenderId,
    pub vendor:                 UserId,
    pub pricing:                BidPricing,
    pub delivery_timeline_days: u32,
    pub warranty_months:        u32,
    pub warranty_terms:         Option<String>,
    pub remarks:                Option<String>,
    pub technical_notes:        Option<String>,
    pub status:                 BidStatus,
    /// True once any party has been permitted to see the unredacted
    /// pricing. Tracked for audit; the visibility gate itself is computed
    /// live on every query.
    pub revealed:               bool,
    pub withdrawn_at:           Option<OffsetDateTime>,
    pub withdrawal_reason:      Option<String>,
    pub creation_time:          OffsetDateTime,
    pub update_time:            OffsetDateTime,
}

impl Bid {
    pub fn new(spec: BidCreate, pricing: BidPricing, now: OffsetDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            tender_id: spec.tender_id,
            vendor: spec.vendor,
            pricing,
            delivery_timeline_days: spec.delivery_timeline_days,
            warranty_months: spec.warranty_months,
            warranty_terms: spec.warranty_terms,
            remarks: spec.remarks,
            technical_notes: spec.technical_notes,
            status: BidStatus::Pending,
            revealed: false,
            withdrawn_at: None,
            withdrawal_reason: None,
            creation_time: now,
            update_time: now,
        }
    }
}

#[derive(Clone, Debug)]
pub struct BidCreate {
    pub tender_id:              TenderId,
    pub vendor:                 UserId,
    pub unit_price:             Decimal,
    pub quantity:               u32,
    pub vat_registered:         bool,
    pub delivery_timeline_days: u32,
    pub warranty_months:        u32,
    pub warranty_terms:         Option<String>,
    pub remarks:                Option<String>,
    pub technical_notes:        Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct BidUpdate {
    pub unit_price:             Option<Decimal>,
    pub quantity:               Option<u32>,
    pub vat_registered:         Option<bool>,
    pub delivery_timeline_days: Option<u32>,
    pub warranty_months:        Option<u32>,
    pub warranty_terms:         Option<Option<String>>,
    pub remarks:                Option<Option<String>>,
    pub technical_notes:        Option<Option<String>>,
}

/// Outcome of the time-boxed cancellation workflow. Chosen solely by
/// elapsed time at the moment of the call, never by the vendor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CancelOutcome {
    /// Hard delete within the grace window, as if the bid never existed
    Cancelled,
    /// Soft withdrawal after the grace window; the row persists for audit
    Withdrawn,
}

/// A price the requester may or may not be allowed to see. `Sealed` is a
/// distinct marker rather than a null or zero so a consumer can never
/// confuse "price is zero" with "price is sealed".
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "amount", rename_all = "lowercase")]
pub enum SealedAmount {
    Sealed,
    Revealed(Decimal),
}

impl SealedAmount {
    pub fn revealed(&self) -> Option<Decimal> {
        match self {
            SealedAmount::Sealed => None,
            SealedAmount::Revealed(amount) => Some(*amount),
        }
    }
}

/// A bid as surfaced to a requesting party, with pricing redacted per the
/// visibility gate. Non-pricing fields are always visible to parties
/// allowed to see the bid at all.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BidView {
    pub id:                     BidId,
    pub tender_id:              TenderId,
    pub vendor:                 UserId,
    pub status:                 BidStatus,
    pub unit_price:             SealedAmount,
    pub subtotal:               SealedAmount,
    pub vat_amount:             SealedAmount,
    pub total_price:            SealedAmount,
    pub delivery_timeline_days: u32,
    pub warranty_months:        u32,
    pub creation_time:          OffsetDateTime,
}

impl BidView {
    pub fn redacted(bid: &Bid) -> Self {
        Self {
            id:                     bid.id,
            tender_id:              bid.tender_id,
            vendor:                 bid.vendor,
            status:                 bid.status,
            unit_price:             SealedAmount::Sealed,
            subtotal:               SealedAmount::Sealed,
            vat_amount:             SealedAmount::Sealed,
            total_price:            SealedAmount::Sealed,
            delivery_timeline_days: bid.delivery_timeline_days,
            warranty_months:        bid.warranty_months,
            creation_time:          bid.creation_time,
        }
    }

    pub fn revealed(bid: &Bid) -> Self {
        Self {
            unit_price: SealedAmount::Revealed(bid.pricing.unit_price),
            subtotal: SealedAmount::Revealed(bid.pricing.subtotal),
            vat_amount: SealedAmount::Revealed(bid.pricing.vat_amount),
            total_price: SealedAmount::Revealed(bid.pricing.total_price),
            ..Self::redacted(bid)
        }
    }
}

use {
    super::entities,
    std::collections::HashMap,
    tokio::sync::{
        Mutex,
        RwLock,
    },
};

mod add_bid;
mod add_tender;
mod award_tender;
mod get_bid;
mod get_bids;
mod get_expired_open;
mod get_or_create_tender_lock;
mod get_tender;
mod get_tenders;
mod get_vendor_bid;
mod get_vendor_bids;
mod load_state;
mod mark_bids_revealed;
mod models;
mod remove_bid;
mod remove_tender;
mod remove_tender_lock;
mod update_bid;
mod update_tender;
mod update_tender_status;
mod withdraw_bid;

pub use models::*;

/// Authoritative working set for live lifecycle decisions. Every write
/// goes to the database first and is applied here only on success, so a
/// storage failure leaves no partial state behind.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    pub tenders:             RwLock<HashMap<entities::TenderId, entities::Tender>>,
    pub bids:                RwLock<HashMap<entities::TenderId, Vec<entities::Bid>>>,
    pub tender_lock:         Mutex<HashMap<entities::TenderId, entities::TenderLock>>,
    pub reference_sequences: Mutex<HashMap<i32, u32>>,
}

#[derive(Debug)]
pub struct Repository {
    pub in_memory_store: InMemoryStore,
    pub db:              Box<dyn Database>,
}

impl Repository {
    pub fn new(db: impl Database) -> Self {
        Self {
            in_memory_store: InMemoryStore::default(),
            db:              Box::new(db),
        }
    }
}

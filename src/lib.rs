//! Core engine for a sealed-bid procurement marketplace.
//!
//! Buyers publish tenders (requests for quotation), vendors submit bids
//! against them, and the engine enforces the lifecycle rules: when a tender
//! accepts bids, when bids may be amended or withdrawn, when sealed pricing
//! becomes visible, and how an award finalizes the whole thing. Transport,
//! authentication, and presentation live outside this crate; callers hand
//! every workflow an already-authenticated [`models::Actor`].

pub mod audit;
pub mod error;
pub mod kernel;
pub mod models;
pub mod notification;
pub mod telemetry;
pub mod tender;

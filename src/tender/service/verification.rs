use {
    crate::{
        error::CoreError,
        models::{
            Actor,
            Role,
        },
        tender::entities,
    },
    rust_decimal::Decimal,
    time::OffsetDateTime,
};

pub(super) fn ensure_buyer(actor: &Actor) -> Result<(), CoreError> {
    match actor.role {
        Role::Buyer | Role::Admin => Ok(()),
        Role::Vendor => Err(CoreError::Forbidden),
    }
}

pub(super) fn ensure_vendor(actor: &Actor) -> Result<(), CoreError> {
    match actor.role {
        Role::Vendor => Ok(()),
        _ => Err(CoreError::Forbidden),
    }
}

pub(super) fn ensure_owner_or_admin(
    tender: &entities::Tender,
    actor: &Actor,
) -> Result<(), CoreError> {
    if tender.is_owner(actor) || actor.is_admin() {
        Ok(())
    } else {
        Err(CoreError::Forbidden)
    }
}

pub(super) fn validate_tender_create(
    spec: &entities::TenderCreate,
    now: OffsetDateTime,
) -> Result<(), CoreError> {
    if spec.title.trim().is_empty() {
        return Err(CoreError::InvalidInput("Title is required".to_string()));
    }
    if spec.description.trim().is_empty() {
        return Err(CoreError::InvalidInput("Description is required".to_string()));
    }
    if spec.items.is_empty() {
        return Err(CoreError::InvalidInput(
            "At least one line item is required".to_string(),
        ));
    }
    for item in &spec.items {
        if item.name.trim().is_empty() {
            return Err(CoreError::InvalidInput("Item name is required".to_string()));
        }
        if item.quantity == 0 {
            return Err(CoreError::InvalidInput(
                "Item quantity must be positive".to_string(),
            ));
        }
    }
    if spec.closing_time <= now {
        return Err(CoreError::InvalidInput(
            "Closing time must be in the future".to_string(),
        ));
    }
    match spec.initial_status {
        entities::TenderStatus::Draft | entities::TenderStatus::Open => Ok(()),
        _ => Err(CoreError::InvalidInput(
            "A tender starts as draft or open".to_string(),
        )),
    }
}

pub(super) fn validate_bid_pricing(
    unit_price: Decimal,
    quantity: u32,
    delivery_timeline_days: u32,
) -> Result<(), CoreError> {
    if unit_price <= Decimal::ZERO {
        return Err(CoreError::InvalidInput(
            "Unit price must be positive".to_string(),
        ));
    }
    if quantity == 0 {
        return Err(CoreError::InvalidInput(
            "Quantity must be positive".to_string(),
        ));
    }
    if delivery_timeline_days == 0 {
        return Err(CoreError::InvalidInput(
            "Delivery timeline must be positive".to_string(),
        ));
    }
    Ok(())
}

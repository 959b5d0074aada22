// --- File: crates/hallbook_deposit/src/logic.rs ---
//! Damage deposit authorization.
//!
//! This module drives exactly one state machine edge: pending (or unset)
//! to authorized, by placing a manual-capture hold against the payment
//! method saved at checkout. Capture and release stay manual operator
//! actions; an expired hold is reported back by the provider and mirrored
//! by an operator, not by this code.

use hallbook_common::services::{BoxedError, CreateAuthorizationRequest, PaymentService};
use hallbook_store::{Booking, BookingRepository, DepositStatus};
use std::collections::HashMap;
use tracing::{info, warn};

use crate::error::DepositError;

/// Vendor status meaning the hold is placed and waiting for capture.
const STATUS_REQUIRES_CAPTURE: &str = "requires_capture";

/// What one authorization attempt did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepositOutcome {
    /// The hold is placed; carries the provider authorization id.
    Authorized(String),
    /// The provider did not put the intent into a captureable state; the
    /// deposit stays pending and the next pass retries.
    Declined(String),
    /// Nothing to do: already authorized, past the state machine, or no
    /// saved payment method to charge.
    Skipped,
}

/// Place the deferred deposit hold for one booking.
///
/// Safe to call from overlapping passes: the store transition is
/// conditional, and an attempt that loses the race reports `Skipped`.
pub async fn authorize_deposit(
    store: &dyn BookingRepository,
    payments: &dyn PaymentService<Error = BoxedError>,
    booking: &Booking,
    currency: &str,
) -> Result<DepositOutcome, DepositError> {
    if !booking.deposit.status.awaiting_authorization() {
        return Ok(DepositOutcome::Skipped);
    }

    let Some(payment_method) = booking.deposit.payment_method.clone() else {
        warn!(
            "Booking {} has no saved payment method, cannot place deposit hold",
            booking.reference
        );
        return Ok(DepositOutcome::Skipped);
    };

    // Record that an attempt is underway. Unset means checkout never got
    // this far; once we try, the deposit is pending until it authorizes.
    store
        .transition_deposit(booking.id, &[DepositStatus::Unset], DepositStatus::Pending, None)
        .await?;

    // Attaching the intent to a customer record is nice for the Stripe
    // dashboard but not required for the hold itself.
    let customer = match payments
        .find_or_create_customer(&booking.customer_email, &booking.customer_name)
        .await
    {
        Ok(c) => Some(c.id),
        Err(e) => {
            warn!(
                "Customer lookup for booking {} failed, authorizing without: {}",
                booking.reference, e
            );
            None
        }
    };

    let mut metadata = HashMap::new();
    metadata.insert("hallbook_reference".to_string(), booking.reference.clone());

    let created = payments
        .create_authorization(CreateAuthorizationRequest {
            amount: booking.deposit.amount_cents,
            currency: currency.to_string(),
            payment_method: payment_method.clone(),
            customer,
            description: Some(format!("Damage deposit for booking {}", booking.reference)),
            metadata: Some(metadata),
        })
        .await
        .map_err(|e| DepositError::ServiceError(e.to_string()))?;

    let confirmed = payments
        .confirm_authorization(&created.id, &payment_method)
        .await
        .map_err(|e| DepositError::ServiceError(e.to_string()))?;

    if confirmed.status != STATUS_REQUIRES_CAPTURE {
        warn!(
            "Deposit hold for booking {} ended in status '{}', leaving deposit pending",
            booking.reference, confirmed.status
        );
        return Ok(DepositOutcome::Declined(confirmed.status));
    }

    let transitioned = store
        .transition_deposit(
            booking.id,
            &[DepositStatus::Unset, DepositStatus::Pending],
            DepositStatus::Authorized,
            Some(confirmed.id.clone()),
        )
        .await?;
    if !transitioned {
        // Another pass got there first; the provider hold is idempotent
        // enough for the duplicate to be released by the expiry.
        warn!(
            "Deposit for booking {} was already advanced by a concurrent pass",
            booking.reference
        );
        return Ok(DepositOutcome::Skipped);
    }

    info!(
        "Deposit of {} {} authorized for booking {} (authorization {})",
        booking.deposit.amount_cents, currency, booking.reference, confirmed.id
    );
    Ok(DepositOutcome::Authorized(confirmed.id))
}

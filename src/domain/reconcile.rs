use crate::processor::PaymentIntent;

pub const DEFAULT_FAILURE_REASON: &str = "Payment failed";

/// What a processor-reported intent means for the local payment and order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// Payment completed; the linked order becomes confirmed and paid.
    Completed,
    /// Payment failed; the order is left as it is.
    Failed { reason: String },
    /// Still in flight on the processor side; nothing to persist.
    Unchanged,
}

pub fn reconcile(intent: &PaymentIntent) -> Reconciliation {
    let reason = || {
        intent
            .last_error
            .as_deref()
            .map(str::trim)
            .filter(|msg| !msg.is_empty())
            .unwrap_or(DEFAULT_FAILURE_REASON)
            .to_string()
    };

    match intent.status.as_str() {
        "succeeded" => Reconciliation::Completed,
        "payment_failed" | "canceled" => Reconciliation::Failed { reason: reason() },
        "requires_payment_method" if intent.last_error.is_some() => {
            Reconciliation::Failed { reason: reason() }
        }
        _ => Reconciliation::Unchanged,
    }
}

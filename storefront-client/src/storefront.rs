//! Customer flow: Validator -> Pricing -> `POST /orders`

use shared::order::{DraftOrder, Order, Pricing, validate};

use crate::{ApiConfig, ClientError, ClientResult, HttpClient};

pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// One submission attempt
///
/// The idempotency key is fixed when the attempt is created, so resubmitting
/// the same value after a network failure cannot create a second order.
#[derive(Debug, Clone)]
pub struct OrderSubmission {
    pub draft: DraftOrder,
    pub idempotency_key: String,
}

impl OrderSubmission {
    pub fn new(draft: DraftOrder) -> Self {
        Self {
            draft,
            idempotency_key: uuid::Uuid::new_v4().to_string(),
        }
    }
}

/// Server answer to a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submitted {
    pub order: Order,
    /// `true` when the server returned an order created by an earlier attempt
    pub replayed: bool,
}

impl HttpClient {
    /// Validate and price locally, then submit
    ///
    /// A local rejection returns [`ClientError::Rejected`] without any
    /// network call. The locally computed total is sent along and checked by
    /// the server.
    pub async fn submit_order(
        &self,
        config: &ApiConfig,
        pricing: &Pricing,
        submission: &OrderSubmission,
    ) -> ClientResult<Submitted> {
        let validated = validate(&submission.draft)?;
        let quote = pricing
            .quote(&validated)
            .map_err(|error| ClientError::Api { status: 400, error })?;

        let mut draft = submission.draft.clone();
        draft.total_amount = Some(quote.total);
        draft.status = None;

        let (status, order): (u16, Order) = self
            .post(
                config,
                "/orders",
                &draft,
                &[(IDEMPOTENCY_KEY_HEADER, submission.idempotency_key.as_str())],
            )
            .await?;

        tracing::info!(order_id = order.id, replayed = status == 200, "Order submitted");
        Ok(Submitted {
            order,
            replayed: status == 200,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Failure;
    use shared::order::RejectReason;

    #[test]
    fn test_submission_keys_are_unique() {
        let a = OrderSubmission::new(DraftOrder::default());
        let b = OrderSubmission::new(DraftOrder::default());
        assert_ne!(a.idempotency_key, b.idempotency_key);
    }

    #[tokio::test]
    async fn test_local_rejection_never_hits_the_network() {
        let client = HttpClient::new().unwrap();
        // Nothing listens here; a network attempt would be a Retry failure
        let config = ApiConfig::new("http://127.0.0.1:9");
        let submission = OrderSubmission::new(DraftOrder::default());

        let err = client
            .submit_order(&config, &Pricing::default(), &submission)
            .await
            .unwrap_err();
        assert_eq!(err.classify(), Failure::Validation(RejectReason::MissingField));
    }
}

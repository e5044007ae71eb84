//! Outbound orders and their outcomes.

use serde::Serialize;
use serde_json::Value;

use super::id::MarketId;

/// One order to place against a marketplace endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BetRequest {
    pub market_id: MarketId,
    pub option_index: u8,
    /// Collateral in whole currency units.
    pub amount: f64,
    pub endpoint: String,
}

/// Outcome of one order attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BetResponse {
    pub market_id: MarketId,
    pub option_index: u8,
    pub amount: f64,
    pub endpoint: String,
    pub success: bool,
    /// Parsed response body when the adapter answered with JSON.
    pub response: Option<Value>,
    pub error: Option<String>,
    /// HTTP status, absent for transport failures.
    pub status_code: Option<u16>,
}

impl BetResponse {
    pub fn succeeded(request: &BetRequest, response: Value, status_code: Option<u16>) -> Self {
        Self::from_request(request, true, Some(response), None, status_code)
    }

    pub fn failed(request: &BetRequest, error: impl Into<String>, status_code: Option<u16>) -> Self {
        Self::from_request(request, false, None, Some(error.into()), status_code)
    }

    fn from_request(
        request: &BetRequest,
        success: bool,
        response: Option<Value>,
        error: Option<String>,
        status_code: Option<u16>,
    ) -> Self {
        Self {
            market_id: request.market_id,
            option_index: request.option_index,
            amount: request.amount,
            endpoint: request.endpoint.clone(),
            success,
            response,
            error,
            status_code,
        }
    }
}

/// Aggregate of a batch of isolated orders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionResult {
    pub total_amount: f64,
    pub total_requests: usize,
    pub successful: Vec<BetResponse>,
    pub failed: Vec<BetResponse>,
    pub strategy_label: String,
}

impl ExecutionResult {
    /// Split responses by outcome, preserving order within each group.
    pub fn from_responses(
        total_amount: f64,
        responses: Vec<BetResponse>,
        strategy_label: impl Into<String>,
    ) -> Self {
        let total_requests = responses.len();
        let (successful, failed) = responses.into_iter().partition(|r| r.success);
        Self {
            total_amount,
            total_requests,
            successful,
            failed,
            strategy_label: strategy_label.into(),
        }
    }

    /// Fraction of requests that succeeded, 0 for an empty batch.
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.successful.len() as f64 / self.total_requests as f64
        }
    }

    #[must_use]
    pub fn total_executed_amount(&self) -> f64 {
        self.successful.iter().map(|r| r.amount).sum()
    }
}

use thiserror::Error;

/// Result type for estimation operations
pub type EstimationResult<T> = Result<T, EstimationError>;

/// Errors that can occur in the estimation domain
#[derive(Debug, Error)]
pub enum EstimationError {
    /// Request shape is invalid (e.g. requirements missing)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not enough configurations to compare
    #[error("Comparison error: {0}")]
    Comparison(String),

    /// Estimation not found
    #[error("Estimation not found: {0}")]
    NotFound(String),

    /// Pricing store lookup failed. Absorbed by the resolver, never surfaced by calculations.
    #[error("Pricing store error: {0}")]
    PricingStore(String),

    /// Estimation repository error
    #[error("Repository error: {0}")]
    Repository(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl EstimationError {
    /// Stable error code, matching the codes downstream clients already handle
    pub fn code(&self) -> &'static str {
        match self {
            EstimationError::Validation(_) => "CALC_001",
            EstimationError::Comparison(_) => "CALC_002",
            EstimationError::NotFound(_) => "CALC_003",
            EstimationError::PricingStore(_) => "CALC_500",
            EstimationError::Repository(_) => "CALC_501",
            EstimationError::Internal(_) => "CALC_599",
        }
    }

    /// Whether the error is caused by the caller's request
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            EstimationError::Validation(_)
                | EstimationError::Comparison(_)
                | EstimationError::NotFound(_)
        )
    }
}

impl From<validator::ValidationErrors> for EstimationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        EstimationError::Validation(errors.to_string())
    }
}

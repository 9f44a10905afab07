/// Errors from validating input at the simulation boundary.
///
/// Every variant is raised before any state is touched, so a rejected call
/// leaves the simulation exactly as it was.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    #[error("invalid world bounds {value}: must be a finite number in 0..=10000")]
    InvalidBounds { value: f64 },
    #[error("invalid entity count {value}: must be a finite, non-negative integer")]
    InvalidCount { value: f64 },
    #[error("entity count {requested} exceeds max_entities ({limit}); raise max_entities in the config")]
    CountExceedsLimit { requested: usize, limit: usize },
}

use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

/// Errors raised while validating a stock adjustment.
#[derive(Debug, Error)]
pub enum StockFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("delta must not be zero")]
    ZeroDelta,
}

/// Payload of `POST /v1/stocks/adjust`.
#[derive(Debug, Deserialize, Validate)]
pub struct AdjustStockForm {
    #[validate(range(min = 1))]
    pub store_id: i32,
    #[validate(range(min = 1))]
    pub product_id: i32,
    /// Units added, negative to remove units.
    pub delta: i32,
}

/// Checked stock adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockAdjustment {
    pub store_id: i32,
    pub product_id: i32,
    pub delta: i32,
}

impl AdjustStockForm {
    pub fn into_adjustment(self) -> Result<StockAdjustment, StockFormError> {
        self.validate()?;

        if self.delta == 0 {
            return Err(StockFormError::ZeroDelta);
        }

        Ok(StockAdjustment {
            store_id: self.store_id,
            product_id: self.product_id,
            delta: self.delta,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_ids() {
        let form = AdjustStockForm {
            store_id: 0,
            product_id: 3,
            delta: 1,
        };
        assert!(matches!(
            form.into_adjustment(),
            Err(StockFormError::Validation(_))
        ));
    }

    #[test]
    fn accepts_negative_delta() {
        let form = AdjustStockForm {
            store_id: 2,
            product_id: 3,
            delta: -4,
        };
        assert_eq!(
            form.into_adjustment().unwrap(),
            StockAdjustment {
                store_id: 2,
                product_id: 3,
                delta: -4,
            }
        );
    }
}

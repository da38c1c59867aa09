use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Legal monthly minimum wage (SMMLV) in force during one calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WageEntry {
    pub year: i32,
    pub amount: Decimal,
}

impl WageEntry {
    pub fn new(
        year: i32,
        amount: Decimal,
    ) -> Self {
        Self { year, amount }
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{FinancialDerived, FinancialInputs};

/// Descriptive fields of a contract; they never feed the derivation chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceDetails {
    pub contract_number: String,
    pub contracting_entity: String,
    pub contract_object: String,
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceRecord {
    pub id: i64,
    pub details: ExperienceDetails,
    pub inputs: FinancialInputs,
    pub derived: FinancialDerived,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// For creating new records (no id or timestamps)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExperienceRecord {
    pub details: ExperienceDetails,
    pub inputs: FinancialInputs,
    pub derived: FinancialDerived,
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;
    use crate::calculations::AdditionList;

    #[test]
    fn record_bundle_serializes_decimals_as_strings() {
        let mut additions = AdditionList::new();
        let id = additions.push_amount(dec!(2500000));
        let record = NewExperienceRecord {
            details: ExperienceDetails {
                contract_number: "OBRA-017".to_string(),
                ..Default::default()
            },
            inputs: FinancialInputs {
                initial_value: dec!(5000000),
                participation_percent: Some(dec!(50)),
                termination_date: NaiveDate::from_ymd_opt(2023, 12, 31),
                additions,
            },
            derived: FinancialDerived {
                termination_year: 2023,
                final_affected_value: dec!(7500000),
                wage_unit_value: dec!(7.5),
                participation_wage_unit_value: dec!(3.75),
                current_value: dec!(4875000),
            },
        };

        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(
            value["inputs"],
            json!({
                "initial_value": "5000000",
                "participation_percent": "50",
                "termination_date": "2023-12-31",
                "additions": [{ "id": id.to_string(), "amount": "2500000" }],
            })
        );
        assert_eq!(value["derived"]["wage_unit_value"], json!("7.5"));
    }
}

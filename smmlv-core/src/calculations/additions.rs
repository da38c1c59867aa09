//! Editable list of contract additions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::or_zero;
use crate::{Addition, AdditionId};

/// Ordered additions with unique ids.
///
/// Removing keeps the relative order of the remaining items. Operations on
/// an unknown id are no-ops.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdditionList {
    items: Vec<Addition>,
}

impl AdditionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a zero-amount addition and returns its fresh id.
    pub fn add(&mut self) -> AdditionId {
        let id = AdditionId::new();
        self.items.push(Addition {
            id,
            amount: Decimal::ZERO,
        });
        id
    }

    /// Appends an addition with a known amount and returns its fresh id.
    pub fn push_amount(
        &mut self,
        amount: Decimal,
    ) -> AdditionId {
        let id = self.add();
        self.update(id, amount);
        id
    }

    pub fn remove(
        &mut self,
        id: AdditionId,
    ) {
        self.items.retain(|item| item.id != id);
    }

    pub fn update(
        &mut self,
        id: AdditionId,
        amount: Decimal,
    ) {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.amount = amount;
        }
    }

    pub fn get(
        &self,
        id: AdditionId,
    ) -> Option<&Addition> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn items(&self) -> &[Addition] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Algebraic sum of every amount; zero for an empty list.
    pub fn total(&self) -> Decimal {
        self.items.iter().fold(Decimal::ZERO, |acc, item| {
            or_zero(acc.checked_add(item.amount), "additions_total")
        })
    }
}

impl FromIterator<Decimal> for AdditionList {
    fn from_iter<I: IntoIterator<Item = Decimal>>(iter: I) -> Self {
        let mut list = Self::new();
        for amount in iter {
            list.push_amount(amount);
        }
        list
    }
}

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One financial claim or line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EconomyLine {
    pub id: String,
    pub description: String,
    pub amount: Decimal,
    pub party: Option<String>,
    pub interest_from_date: Option<NaiveDate>,
}

impl EconomyLine {
    pub fn new(id: impl Into<String>, description: impl Into<String>, amount: Decimal) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            amount,
            party: None,
            interest_from_date: None,
        }
    }

    pub fn with_party(mut self, party: impl Into<String>) -> Self {
        self.party = Some(party.into());
        self
    }

    fn party_key(&self) -> Option<&str> {
        self.party.as_deref().filter(|p| !p.trim().is_empty())
    }
}

/// Totals derived from the economy lines. Never authored directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EconomySummary {
    pub total_amount: Decimal,
    /// Present only when at least one line names a party.
    pub per_party: Option<BTreeMap<String, Decimal>>,
}

impl EconomySummary {
    pub fn from_lines(lines: &[EconomyLine]) -> Self {
        let total_amount = lines.iter().map(|line| line.amount).sum();

        let mut per_party: BTreeMap<String, Decimal> = BTreeMap::new();
        for line in lines {
            if let Some(party) = line.party_key() {
                *per_party.entry(party.to_string()).or_default() += line.amount;
            }
        }

        Self {
            total_amount,
            per_party: (!per_party.is_empty()).then_some(per_party),
        }
    }
}

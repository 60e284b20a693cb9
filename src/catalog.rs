// 🗂️ Filter Catalog - The known card brands, statuses and decline reasons
//
// Closed vocabularies used at the boundary: record validation and the static
// filter options the dashboard offers. The engines themselves never consult
// this module, so a new brand or reason only needs an entry here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// CARD BRAND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardBrand {
    Visa,
    Mastercard,
    #[serde(rename = "American Express")]
    AmericanExpress,
    Discover,
}

impl CardBrand {
    pub const ALL: [CardBrand; 4] = [
        CardBrand::Visa,
        CardBrand::Mastercard,
        CardBrand::AmericanExpress,
        CardBrand::Discover,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CardBrand::Visa => "Visa",
            CardBrand::Mastercard => "Mastercard",
            CardBrand::AmericanExpress => "American Express",
            CardBrand::Discover => "Discover",
        }
    }
}

// ============================================================================
// TRANSACTION STATUS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionStatus {
    Approved,
    Declined,
}

impl TransactionStatus {
    pub const ALL: [TransactionStatus; 2] = [TransactionStatus::Approved, TransactionStatus::Declined];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Approved => crate::transaction::APPROVED,
            TransactionStatus::Declined => crate::transaction::DECLINED,
        }
    }
}

// ============================================================================
// DECLINE REASON
// ============================================================================

/// Decline reason codes, written as "NN-Description".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeclineReason {
    #[serde(rename = "01-Insufficient funds")]
    InsufficientFunds,
    #[serde(rename = "02-Invalid card number")]
    InvalidCardNumber,
    #[serde(rename = "03-Suspected fraud")]
    SuspectedFraud,
    #[serde(rename = "04-Expired card")]
    ExpiredCard,
    #[serde(rename = "05-Do not honor")]
    DoNotHonor,
    #[serde(rename = "06-Card reported lost or stolen")]
    LostOrStolen,
}

impl DeclineReason {
    pub const ALL: [DeclineReason; 6] = [
        DeclineReason::InsufficientFunds,
        DeclineReason::InvalidCardNumber,
        DeclineReason::SuspectedFraud,
        DeclineReason::ExpiredCard,
        DeclineReason::DoNotHonor,
        DeclineReason::LostOrStolen,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeclineReason::InsufficientFunds => "01-Insufficient funds",
            DeclineReason::InvalidCardNumber => "02-Invalid card number",
            DeclineReason::SuspectedFraud => "03-Suspected fraud",
            DeclineReason::ExpiredCard => "04-Expired card",
            DeclineReason::DoNotHonor => "05-Do not honor",
            DeclineReason::LostOrStolen => "06-Card reported lost or stolen",
        }
    }
}

// ============================================================================
// PARSING
// ============================================================================

/// Returned when a string is not part of a closed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownValue {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownValue {}

macro_rules! vocabulary {
    ($ty:ty, $kind:literal) => {
        impl FromStr for $ty {
            type Err = UnknownValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty>::ALL
                    .into_iter()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| UnknownValue {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

vocabulary!(CardBrand, "card brand");
vocabulary!(TransactionStatus, "status");
vocabulary!(DeclineReason, "decline reason");

// ============================================================================
// FILTER OPTIONS
// ============================================================================

/// Static filter values offered to the dashboard. Configuration data, not
/// derived from the loaded transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub card_brands: Vec<String>,
    pub statuses: Vec<String>,
    pub decline_reasons: Vec<String>,
}

impl FilterOptions {
    pub fn known() -> Self {
        FilterOptions {
            card_brands: CardBrand::ALL.iter().map(|b| b.as_str().to_string()).collect(),
            statuses: TransactionStatus::ALL.iter().map(|s| s.as_str().to_string()).collect(),
            decline_reasons: DeclineReason::ALL.iter().map(|r| r.as_str().to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_values() {
        assert_eq!("American Express".parse::<CardBrand>(), Ok(CardBrand::AmericanExpress));
        assert_eq!("Declined".parse::<TransactionStatus>(), Ok(TransactionStatus::Declined));
        assert_eq!(
            "03-Suspected fraud".parse::<DeclineReason>(),
            Ok(DeclineReason::SuspectedFraud)
        );
    }

    #[test]
    fn test_parse_is_exact() {
        let err = "visa".parse::<CardBrand>().unwrap_err();
        assert_eq!(err.to_string(), "unknown card brand 'visa'");
        assert!("Pending".parse::<TransactionStatus>().is_err());
        assert!("03".parse::<DeclineReason>().is_err());
    }

    #[test]
    fn test_serde_names_match_display() {
        for brand in CardBrand::ALL {
            assert_eq!(serde_json::to_value(brand).unwrap(), brand.to_string());
        }
        for reason in DeclineReason::ALL {
            assert_eq!(serde_json::to_value(reason).unwrap(), reason.as_str());
        }
    }

    #[test]
    fn test_filter_options() {
        let options = FilterOptions::known();

        assert_eq!(options.card_brands, vec!["Visa", "Mastercard", "American Express", "Discover"]);
        assert_eq!(options.statuses, vec!["Approved", "Declined"]);
        assert_eq!(options.decline_reasons.len(), 6);

        let json = serde_json::to_value(&options).unwrap();
        assert!(json.get("cardBrands").is_some());
        assert!(json.get("declineReasons").is_some());
    }
}

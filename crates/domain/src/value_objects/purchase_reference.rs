use std::fmt::Display;
use std::str::FromStr;

use anyhow::{anyhow, bail};

const PURPOSE_TAG: &str = "sub";
const NO_PROMO: &str = "none";
const DELIMITER: char = ':';

/// Self-describing token for a pending purchase. It carries everything
/// needed to apply the sale once the provider confirmation arrives,
/// because the confirmation event may be the only context available.
///
/// Wire form: `sub:{user_id}:{tariff_id}:{final_price}:{duration_days}:{promo|none}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseReference {
    pub user_id: i64,
    pub tariff_id: i32,
    pub final_price_minor: i32,
    pub duration_days: i32,
    pub promo_code: Option<String>,
}

impl PurchaseReference {
    pub fn new(
        user_id: i64,
        tariff_id: i32,
        final_price_minor: i32,
        duration_days: i32,
        promo_code: Option<&str>,
    ) -> anyhow::Result<Self> {
        let promo_code = match promo_code {
            Some(code) => {
                let code = code.trim().to_uppercase();
                if code.is_empty() || code == NO_PROMO.to_uppercase() {
                    bail!("promo code must not be empty or the reserved sentinel");
                }
                if code.contains(DELIMITER) {
                    bail!("promo code must not contain the reference delimiter");
                }
                Some(code)
            }
            None => None,
        };

        Ok(Self {
            user_id,
            tariff_id,
            final_price_minor,
            duration_days,
            promo_code,
        })
    }
}

impl Display for PurchaseReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{PURPOSE_TAG}:{}:{}:{}:{}:{}",
            self.user_id,
            self.tariff_id,
            self.final_price_minor,
            self.duration_days,
            self.promo_code.as_deref().unwrap_or(NO_PROMO)
        )
    }
}

impl FromStr for PurchaseReference {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = raw.split(DELIMITER).collect();
        let [tag, user_id, tariff_id, final_price, duration, promo] = parts.as_slice() else {
            bail!("purchase reference must have exactly six fields");
        };

        if *tag != PURPOSE_TAG {
            bail!("unknown purchase reference tag: {tag}");
        }

        let promo_code = if *promo == NO_PROMO {
            None
        } else if promo.is_empty() {
            bail!("promo field must not be empty");
        } else {
            Some(promo.to_uppercase())
        };

        Ok(Self {
            user_id: user_id
                .parse()
                .map_err(|_| anyhow!("invalid user id in purchase reference"))?,
            tariff_id: tariff_id
                .parse()
                .map_err(|_| anyhow!("invalid tariff id in purchase reference"))?,
            final_price_minor: final_price
                .parse()
                .map_err(|_| anyhow!("invalid price in purchase reference"))?,
            duration_days: duration
                .parse()
                .map_err(|_| anyhow!("invalid duration in purchase reference"))?,
            promo_code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_without_promo() {
        let reference = PurchaseReference::new(42, 1, 500, 30, None).unwrap();
        assert_eq!(reference.to_string(), "sub:42:1:500:30:none");
    }

    #[test]
    fn round_trips_with_promo() {
        let reference = PurchaseReference::new(42, 7, 450, 30, Some("sale10")).unwrap();
        let encoded = reference.to_string();
        assert_eq!(encoded, "sub:42:7:450:30:SALE10");

        let decoded: PurchaseReference = encoded.parse().unwrap();
        assert_eq!(decoded, reference);
        assert_eq!(decoded.promo_code.as_deref(), Some("SALE10"));
    }

    #[test]
    fn decodes_the_no_promo_sentinel_as_absent() {
        let decoded: PurchaseReference = "sub:42:1:500:30:none".parse().unwrap();
        assert_eq!(decoded.promo_code, None);
        assert_eq!(decoded.user_id, 42);
        assert_eq!(decoded.final_price_minor, 500);
        assert_eq!(decoded.duration_days, 30);
    }

    #[test]
    fn rejects_wrong_tag_and_arity() {
        assert!("pay:42:1:500:30:none".parse::<PurchaseReference>().is_err());
        assert!("sub:42:1:500:30".parse::<PurchaseReference>().is_err());
        assert!(
            "sub:42:1:500:30:none:extra"
                .parse::<PurchaseReference>()
                .is_err()
        );
        assert!("sub:forty:1:500:30:none".parse::<PurchaseReference>().is_err());
    }

    #[test]
    fn rejects_promo_codes_that_break_the_encoding() {
        assert!(PurchaseReference::new(1, 1, 100, 30, Some("BAD:CODE")).is_err());
        assert!(PurchaseReference::new(1, 1, 100, 30, Some("none")).is_err());
        assert!(PurchaseReference::new(1, 1, 100, 30, Some("  ")).is_err());
    }
}

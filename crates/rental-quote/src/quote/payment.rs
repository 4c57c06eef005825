use crate::config::PricingConfig;
use serde::Serialize;

/// Split of a total into the amount due at booking and the balance due at arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentBreakdown {
    /// False when no total could be computed; every amount is then zero.
    pub computable: bool,
    pub deposit_percent: u8,
    pub deposit: u32,
    pub balance_due: u32,
    /// Refundable, collected separately; never part of the total.
    pub security_deposit: u32,
}

impl PaymentBreakdown {
    pub fn from_total(total: Option<u32>, pricing: &PricingConfig) -> Self {
        let Some(total) = total else {
            return Self::not_computable(pricing);
        };

        let deposit = percent_of(total, pricing.deposit_percent);
        Self {
            computable: true,
            deposit_percent: pricing.deposit_percent,
            deposit,
            balance_due: total - deposit,
            security_deposit: pricing.security_deposit,
        }
    }

    pub fn not_computable(pricing: &PricingConfig) -> Self {
        Self {
            computable: false,
            deposit_percent: pricing.deposit_percent,
            deposit: 0,
            balance_due: 0,
            security_deposit: pricing.security_deposit,
        }
    }
}

/// `round(amount * percent / 100)`, halves rounded up. Never exceeds `amount` for percent <= 100.
pub fn percent_of(amount: u32, percent: u8) -> u32 {
    let percent = u64::from(percent.min(100));
    let scaled = (u64::from(amount) * percent * 2 + 100) / 200;
    u32::try_from(scaled).unwrap_or(amount)
}

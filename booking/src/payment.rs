//! Payment method selection and simulated payment instructions.
//!
//! No payment is processed. The wizard records the client's choice and shows
//! instructions for settling at the shop.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pix key shown on the simulated Pix instructions
pub const EXAMPLE_PIX_KEY: &str = "chave.pix.exemplo@email.com";

/// QR code image shown on the simulated Pix instructions
pub const STATIC_PIX_QR_CODE_URL: &str =
    "https://storage.googleapis.com/genai-downloads/images/example_qr_code.png";

/// How the client intends to pay
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Instant bank transfer
    Pix,
    /// Credit card at the shop terminal
    CreditCard,
    /// Debit card at the shop terminal
    DebitCard,
    /// Cash at the counter
    Cash,
}

impl PaymentMethod {
    /// Every method, in display order
    pub const ALL: [Self; 4] = [Self::Pix, Self::CreditCard, Self::DebitCard, Self::Cash];

    /// Label shown to clients and in the shop notice
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pix => "Pix",
            Self::CreditCard => "Credit card",
            Self::DebitCard => "Debit card",
            Self::Cash => "Cash",
        }
    }

    /// Simulated instructions for this method
    #[must_use]
    pub const fn instructions(self) -> PaymentInstructions {
        match self {
            Self::Pix => PaymentInstructions::Pix {
                key: EXAMPLE_PIX_KEY,
                qr_code_url: STATIC_PIX_QR_CODE_URL,
            },
            Self::CreditCard | Self::DebitCard => PaymentInstructions::CardAtShop,
            Self::Cash => PaymentInstructions::CashAtShop,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What the client sees after picking a method
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PaymentInstructions {
    /// Scan the QR code or copy the key
    Pix {
        /// Pix key
        key: &'static str,
        /// QR code image
        qr_code_url: &'static str,
    },
    /// Pay with the card terminal on arrival
    CardAtShop,
    /// Pay in cash on arrival
    CashAtShop,
}

impl fmt::Display for PaymentInstructions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pix { key, .. } => write!(
                f,
                "Scan the QR code or use the key {key} (example only, no real payment is processed)"
            ),
            Self::CardAtShop => f.write_str("Card payment is simulated; pay at the shop terminal"),
            Self::CashAtShop => f.write_str("Pay in cash at the shop"),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code

    use super::*;

    #[test]
    fn pix_carries_key_and_qr_code() {
        match PaymentMethod::Pix.instructions() {
            PaymentInstructions::Pix { key, qr_code_url } => {
                assert_eq!(key, EXAMPLE_PIX_KEY);
                assert!(qr_code_url.ends_with(".png"));
            },
            other => unreachable!("unexpected {other:?}"),
        }
    }

    #[test]
    fn cards_share_terminal_instructions() {
        assert_eq!(
            PaymentMethod::CreditCard.instructions(),
            PaymentMethod::DebitCard.instructions()
        );
        assert!(PaymentMethod::Cash.instructions().to_string().contains("cash"));
    }

    #[test]
    fn serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::CreditCard).unwrap(),
            r#""credit_card""#
        );
        let cash: PaymentMethod = serde_json::from_str(r#""cash""#).unwrap();
        assert_eq!(cash, PaymentMethod::Cash);
    }
}

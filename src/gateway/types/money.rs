//! Money types for API boundary enforcement
//!
//! `StrictDecimal` is the only way a decimal amount enters the service.

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

// ============================================================================
// StrictDecimal: Format-Validated Decimal at Serde Layer
// ============================================================================

/// Strict format Decimal - validates format during deserialization
///
/// This type provides format validation at the Serde layer:
/// - Rejects JSON numbers (binary floats lose precision)
/// - Rejects `.5` (must be `0.5`)
/// - Rejects `5.` (must be `5.0` or `5`)
/// - Rejects empty strings
/// - Rejects scientific notation and a leading `+`
/// - Rejects values that cannot be held without rounding
///
/// The sign is accepted here. Non-positive amounts and negative balances are
/// rejected by the account service and the transfer engine, which name the
/// offending value in their error.
#[derive(Debug, Clone, Copy)]
pub struct StrictDecimal(Decimal);

impl StrictDecimal {
    /// Get the inner Decimal value
    pub fn inner(self) -> Decimal {
        self.0
    }
}

impl std::ops::Deref for StrictDecimal {
    type Target = Decimal;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'de> Deserialize<'de> for StrictDecimal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        // Only accept JSON strings for strict format control
        let s = String::deserialize(deserializer)?;

        if s.is_empty() {
            return Err(D::Error::custom("Amount cannot be empty"));
        }

        if s.starts_with('+') {
            return Err(D::Error::custom("Invalid format: + prefix not allowed"));
        }

        let unsigned = s.strip_prefix('-').unwrap_or(&s);

        if unsigned.starts_with('.') {
            return Err(D::Error::custom("Invalid format: use 0.5 not .5"));
        }

        if unsigned.ends_with('.') {
            return Err(D::Error::custom("Invalid format: use 5.0 not 5."));
        }

        if unsigned.contains('e') || unsigned.contains('E') {
            return Err(D::Error::custom(
                "Invalid format: scientific notation not allowed",
            ));
        }

        // `from_str` would round digits past the 28th; refuse instead
        let d = Decimal::from_str_exact(&s).map_err(|e| match e {
            rust_decimal::Error::Underflow => {
                D::Error::custom("Invalid decimal: too many digits to represent exactly")
            }
            e => D::Error::custom(format!("Invalid decimal: {}", e)),
        })?;

        Ok(StrictDecimal(d))
    }
}

impl Serialize for StrictDecimal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Serialize as string to preserve precision
        serializer.serialize_str(&self.0.to_string())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_decimal_valid_string() {
        let d: StrictDecimal = serde_json::from_str(r#""100.00""#).unwrap();
        assert_eq!(d.inner().to_string(), "100.00");
    }

    #[test]
    fn test_strict_decimal_keeps_scale() {
        let d: StrictDecimal = serde_json::from_str(r#""0.10""#).unwrap();
        assert_eq!(d.scale(), 2);
        assert_eq!(serde_json::to_string(&d).unwrap(), r#""0.10""#);
    }

    #[test]
    fn test_strict_decimal_rejects_json_number() {
        let result: Result<StrictDecimal, _> = serde_json::from_str("1.5");
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("expected a string")
        );
    }

    #[test]
    fn test_strict_decimal_rejects_dot_prefix() {
        for json in [r#"".5""#, r#""-.5""#] {
            let result: Result<StrictDecimal, _> = serde_json::from_str(json);
            assert!(result.unwrap_err().to_string().contains("use 0.5 not .5"));
        }
    }

    #[test]
    fn test_strict_decimal_rejects_dot_suffix() {
        let result: Result<StrictDecimal, _> = serde_json::from_str(r#""5.""#);
        assert!(result.unwrap_err().to_string().contains("use 5.0 not 5."));
    }

    #[test]
    fn test_strict_decimal_passes_sign_through() {
        let d: StrictDecimal = serde_json::from_str(r#""-1.5""#).unwrap();
        assert!(d.is_sign_negative());
    }

    #[test]
    fn test_strict_decimal_rejects_scientific_notation() {
        let result: Result<StrictDecimal, _> = serde_json::from_str(r#""1.5e8""#);
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("scientific notation")
        );
    }

    #[test]
    fn test_strict_decimal_rejects_inexact_value() {
        let result: Result<StrictDecimal, _> =
            serde_json::from_str(r#""1.00000000000000000000000000009""#);
        assert!(result.unwrap_err().to_string().contains("too many digits"));

        let d: StrictDecimal = serde_json::from_str(r#""0.0000000000000000000000000001""#).unwrap();
        assert_eq!(d.inner(), Decimal::new(1, 28));
    }

    #[test]
    fn test_strict_decimal_rejects_empty_and_garbage() {
        let result: Result<StrictDecimal, _> = serde_json::from_str(r#""""#);
        assert!(result.unwrap_err().to_string().contains("cannot be empty"));

        let result: Result<StrictDecimal, _> = serde_json::from_str(r#""12abc""#);
        assert!(result.unwrap_err().to_string().contains("Invalid decimal"));

        let result: Result<StrictDecimal, _> = serde_json::from_str(r#""+1""#);
        assert!(result.unwrap_err().to_string().contains("+ prefix"));
    }
}

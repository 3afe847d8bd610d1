//! # Transaction Record
//!
//! A delivery-order transaction as returned by the transaction source.
//!
//! Fields are kept close to the wire: the timestamp and amount stay raw so a
//! malformed, null or missing value only disqualifies the record from the
//! measures that need it, never the whole payload. `user_name` is the one
//! required field.
//!
//! # Examples
//!
//! ```
//! use delivery_reports::domain::entities::transaction::TransactionRecord;
//! use serde_json::json;
//!
//! let record = TransactionRecord::new("alice", "2025-01-01 09:15:00", json!("1.10"))
//!     .with_pickup_address("Block 3, Salmiya");
//!
//! assert_eq!(record.order_time().unwrap().hour(), 9);
//! assert_eq!(record.pickup_address(), Some("Block 3, Salmiya"));
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{Amount, OrderTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Address block attached to the pickup or delivery leg of an order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskLocation {
    /// Free-text address.
    #[serde(default)]
    pub address: Option<String>,
}

/// A single delivery-order transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    user_name: String,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    amount: Value,
    #[serde(default)]
    pickup_task: Option<TaskLocation>,
    #[serde(default)]
    delivery_task: Option<TaskLocation>,
}

impl TransactionRecord {
    /// Creates a record without addresses.
    #[must_use]
    pub fn new(user_name: impl Into<String>, created_at: impl Into<String>, amount: Value) -> Self {
        Self {
            user_name: user_name.into(),
            created_at: Some(created_at.into()),
            amount,
            pickup_task: None,
            delivery_task: None,
        }
    }

    /// Sets the pickup address.
    #[must_use]
    pub fn with_pickup_address(mut self, address: impl Into<String>) -> Self {
        self.pickup_task = Some(TaskLocation {
            address: Some(address.into()),
        });
        self
    }

    /// Sets the delivery address.
    #[must_use]
    pub fn with_delivery_address(mut self, address: impl Into<String>) -> Self {
        self.delivery_task = Some(TaskLocation {
            address: Some(address.into()),
        });
        self
    }

    /// Returns the user the order was placed for.
    #[inline]
    #[must_use]
    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    /// Returns the raw creation timestamp, if present.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }

    /// Returns the raw amount value.
    #[inline]
    #[must_use]
    pub fn raw_amount(&self) -> &Value {
        &self.amount
    }

    /// Parses the creation timestamp.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimestamp` if `created_at` is missing or
    /// malformed.
    pub fn order_time(&self) -> DomainResult<OrderTime> {
        match &self.created_at {
            Some(raw) => OrderTime::parse(raw),
            None => Err(DomainError::invalid_timestamp("", OrderTime::FORMAT)),
        }
    }

    /// Parses the amount.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAmount` if the amount is not numeric.
    pub fn amount(&self) -> DomainResult<Amount> {
        Amount::from_json(&self.amount)
    }

    /// Returns the pickup address, if any.
    #[must_use]
    pub fn pickup_address(&self) -> Option<&str> {
        self.pickup_task.as_ref().and_then(|t| t.address.as_deref())
    }

    /// Returns the delivery address, if any.
    #[must_use]
    pub fn delivery_address(&self) -> Option<&str> {
        self.delivery_task.as_ref().and_then(|t| t.address.as_deref())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_wire_shape() {
        let payload = json!({
            "user_name": "bob",
            "created_at": "2025-01-01 23:50:00",
            "amount": 2.9,
            "pickup_task": {"address": "Hawally, Block 1"},
            "delivery_task": {"address": null}
        });
        let record: TransactionRecord = serde_json::from_value(payload).unwrap();
        assert_eq!(record.user_name(), "bob");
        assert_eq!(record.order_time().unwrap().hour(), 23);
        assert_eq!(record.amount().unwrap().abs().to_string(), "2.9");
        assert_eq!(record.pickup_address(), Some("Hawally, Block 1"));
        assert_eq!(record.delivery_address(), None);
    }

    #[test]
    fn missing_optional_fields_default() {
        let payload = json!({"user_name": "carol", "created_at": "2025-01-01 00:00:00"});
        let record: TransactionRecord = serde_json::from_value(payload).unwrap();
        assert!(record.amount().is_err());
        assert!(record.pickup_address().is_none());
    }

    #[test]
    fn null_or_missing_timestamp_fails_lazily() {
        for payload in [
            json!({"user_name": "erin", "created_at": null, "amount": "1.00"}),
            json!({"user_name": "erin", "amount": "1.00"}),
        ] {
            let record: TransactionRecord = serde_json::from_value(payload).unwrap();
            assert_eq!(record.created_at(), None);
            assert!(matches!(
                record.order_time(),
                Err(DomainError::InvalidTimestamp { .. })
            ));
            assert!(record.amount().is_ok());
        }
    }

    #[test]
    fn missing_user_is_rejected() {
        let payload = json!({"created_at": "2025-01-01 00:00:00", "amount": 1});
        assert!(serde_json::from_value::<TransactionRecord>(payload).is_err());
    }

    #[test]
    fn malformed_values_fail_lazily() {
        let record = TransactionRecord::new("dave", "yesterday", json!("bad"));
        assert!(record.order_time().is_err());
        assert!(record.amount().is_err());
    }
}

//! Expense entity
//!
//! A financial entry owned by exactly one user. The owner reference is set once at
//! creation and no change set can carry a new one.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Stored expense record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    /// Owner reference
    pub user: Uuid,
    pub name: String,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
}

/// Validated input for a new expense
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub name: String,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
}

/// Validated partial update. Only the provided fields are merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseChanges {
    pub name: Option<String>,
    pub amount: Option<Decimal>,
    pub date: Option<DateTime<Utc>>,
}

impl ExpenseChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.amount.is_none() && self.date.is_none()
    }
}

impl Expense {
    /// Build a new expense owned by `owner` with a fresh id
    pub fn create(owner: Uuid, input: NewExpense) -> Self {
        Self {
            id: Uuid::new_v4(),
            user: owner,
            name: input.name,
            amount: input.amount,
            date: input.date,
        }
    }

    /// Merge a change set; id and owner are carried over untouched
    pub fn apply(&self, changes: ExpenseChanges) -> Self {
        Self {
            id: self.id,
            user: self.user,
            name: changes.name.unwrap_or_else(|| self.name.clone()),
            amount: changes.amount.unwrap_or(self.amount),
            date: changes.date.unwrap_or(self.date),
        }
    }
}

/// Whether `amount` comes back unchanged after being written as a JSON number.
/// Responses carry amounts as f64, so anything else would be reported wrongly.
pub fn amount_fits_json(amount: Decimal) -> bool {
    amount
        .to_f64()
        .and_then(|value| value.to_string().parse::<Decimal>().ok())
        .map_or(false, |back| back == amount)
}

/// Parse an RFC 3339 timestamp or a plain `YYYY-MM-DD` date (midnight UTC)
pub fn parse_date(input: &str) -> Result<DateTime<Utc>, String> {
    let input = input.trim();

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(input) {
        return Ok(timestamp.with_timezone(&Utc));
    }

    let day = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date: {}", input))?;
    let midnight = day
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| format!("Invalid date: {}", input))?;

    Ok(Utc.from_utc_datetime(&midnight))
}

/// Serde helper for optional date fields in request bodies
pub fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn coffee() -> NewExpense {
        NewExpense {
            name: "Coffee".to_string(),
            amount: dec!(4.5),
            date: parse_date("2024-01-01").unwrap(),
        }
    }

    #[test]
    fn test_create_sets_owner() {
        let owner = Uuid::new_v4();
        let expense = Expense::create(owner, coffee());

        assert_eq!(expense.user, owner);
        assert_eq!(expense.name, "Coffee");
        assert_eq!(expense.amount, dec!(4.5));
    }

    #[test]
    fn test_apply_merges_only_provided_fields() {
        let expense = Expense::create(Uuid::new_v4(), coffee());
        let updated = expense.apply(ExpenseChanges {
            amount: Some(dec!(5.25)),
            ..Default::default()
        });

        assert_eq!(updated.id, expense.id);
        assert_eq!(updated.user, expense.user);
        assert_eq!(updated.name, "Coffee");
        assert_eq!(updated.amount, dec!(5.25));
        assert_eq!(updated.date, expense.date);
    }

    #[test]
    fn test_apply_is_repeatable() {
        let expense = Expense::create(Uuid::new_v4(), coffee());
        let changes = ExpenseChanges {
            name: Some("Tea".to_string()),
            ..Default::default()
        };

        let once = expense.apply(changes.clone());
        let twice = once.apply(changes);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_parse_plain_date() {
        let date = parse_date("2024-01-01").unwrap();
        assert_eq!(date.to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let date = parse_date("2024-03-10T12:00:00+02:00").unwrap();
        assert_eq!(date.to_rfc3339(), "2024-03-10T10:00:00+00:00");
    }

    #[test]
    fn test_parse_invalid_date() {
        assert!(parse_date("yesterday").is_err());
        assert!(parse_date("2024-13-01").is_err());
    }

    #[test]
    fn test_amount_serializes_as_number() {
        let expense = Expense::create(Uuid::new_v4(), coffee());
        let json = serde_json::to_value(&expense).unwrap();

        assert_eq!(json["amount"].as_f64(), Some(4.5));
        assert_eq!(json["name"], "Coffee");
        assert!(json["date"].as_str().unwrap().starts_with("2024-01-01T00:00:00"));
    }

    #[test]
    fn test_amount_fits_json() {
        assert!(amount_fits_json(dec!(4.5)));
        assert!(amount_fits_json(dec!(-12.25)));
        assert!(amount_fits_json(Decimal::ZERO));

        assert!(!amount_fits_json(dec!(12345678901234567.89)));
        assert!(!amount_fits_json(Decimal::MAX));
    }
}

//! Converts the raw strings of a submitted transaction form into typed values.

use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    database_id::{CategoryId, TransactionId},
    transaction::TransactionDraft,
};

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// The fields of the transaction create and edit forms.
///
/// Every field is kept as submitted so that parsing can report which field
/// was malformed. Missing fields are `None`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TransactionFormData {
    pub id: Option<String>,
    pub amount: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub transaction_date: Option<String>,
}

/// Parse `form` into a [TransactionDraft].
///
/// Missing or empty numbers become zero and a missing or empty date becomes
/// `None`, validation reports those later.
///
/// # Errors
/// Returns [Error::InvalidForm] if a number or the date is malformed.
pub fn parse_transaction_form(form: &TransactionFormData) -> Result<TransactionDraft, Error> {
    let amount = match non_empty(&form.amount) {
        None => 0.0,
        Some(amount) => amount
            .parse::<f64>()
            .ok()
            .filter(|amount| amount.is_finite())
            .ok_or_else(|| Error::InvalidForm("invalid amount format".to_owned()))?,
    };

    let category_id = match non_empty(&form.category_id) {
        None => 0,
        Some(category_id) => category_id
            .parse::<CategoryId>()
            .map_err(|_| Error::InvalidForm("invalid category ID format".to_owned()))?,
    };

    let id = non_empty(&form.id)
        .map(|id| {
            id.parse::<TransactionId>()
                .map_err(|_| Error::InvalidForm("invalid ID format".to_owned()))
        })
        .transpose()?;

    let transaction_date = non_empty(&form.transaction_date)
        .map(|date| {
            parse_date(date)
                .map_err(|_| Error::InvalidForm("invalid date format. Use YYYY-MM-DD".to_owned()))
        })
        .transpose()?;

    Ok(TransactionDraft {
        id,
        amount,
        description: form.description.clone().unwrap_or_default(),
        category_id,
        transaction_date,
    })
}

/// Parse a date formatted as YYYY-MM-DD.
pub(crate) fn parse_date(text: &str) -> Result<Date, time::error::Parse> {
    Date::parse(text, DATE_FORMAT)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod parse_transaction_form_tests {
    use time::macros::date;

    use crate::{
        Error,
        transaction::{TransactionDraft, TransactionFormData, parse_transaction_form},
    };

    fn form(amount: &str, category_id: &str, transaction_date: &str) -> TransactionFormData {
        TransactionFormData {
            id: None,
            amount: Some(amount.to_owned()),
            description: Some("Lunch".to_owned()),
            category_id: Some(category_id.to_owned()),
            transaction_date: Some(transaction_date.to_owned()),
        }
    }

    #[test]
    fn parses_complete_form() {
        let got = parse_transaction_form(&TransactionFormData {
            id: Some("7".to_owned()),
            ..form("12.50", "3", "2024-01-15")
        });

        assert_eq!(
            got,
            Ok(TransactionDraft {
                id: Some(7),
                amount: 12.5,
                description: "Lunch".to_owned(),
                category_id: 3,
                transaction_date: Some(date!(2024 - 01 - 15)),
            })
        );
    }

    #[test]
    fn missing_fields_become_zero_values() {
        let got = parse_transaction_form(&TransactionFormData::default());

        assert_eq!(got, Ok(TransactionDraft::default()));
    }

    #[test]
    fn empty_fields_become_zero_values() {
        let got = parse_transaction_form(&form("", "", ""));

        assert_eq!(
            got,
            Ok(TransactionDraft {
                description: "Lunch".to_owned(),
                ..Default::default()
            })
        );
    }

    #[test]
    fn description_is_passed_through() {
        let got = parse_transaction_form(&TransactionFormData {
            description: Some("  spaced out  ".to_owned()),
            ..form("1", "1", "2024-01-15")
        })
        .unwrap();

        assert_eq!(got.description, "  spaced out  ");
    }

    #[test]
    fn non_numeric_amount_fails() {
        for amount in ["abc", "12,50", "NaN", "inf"] {
            let got = parse_transaction_form(&form(amount, "1", "2024-01-15"));

            assert_eq!(
                got,
                Err(Error::InvalidForm("invalid amount format".to_owned())),
                "want error for amount {amount:?}"
            );
        }
    }

    #[test]
    fn negative_amount_parses() {
        let got = parse_transaction_form(&form("-5", "1", "2024-01-15")).unwrap();

        assert_eq!(got.amount, -5.0);
    }

    #[test]
    fn non_integer_category_id_fails() {
        let got = parse_transaction_form(&form("1", "1.5", "2024-01-15"));

        assert_eq!(
            got,
            Err(Error::InvalidForm("invalid category ID format".to_owned()))
        );
    }

    #[test]
    fn non_integer_id_fails() {
        let got = parse_transaction_form(&TransactionFormData {
            id: Some("seven".to_owned()),
            ..form("1", "1", "2024-01-15")
        });

        assert_eq!(got, Err(Error::InvalidForm("invalid ID format".to_owned())));
    }

    #[test]
    fn malformed_date_fails() {
        for date in ["15/01/2024", "2024-1-15", "2024-02-30", "yesterday"] {
            let got = parse_transaction_form(&form("1", "1", date));

            assert_eq!(
                got,
                Err(Error::InvalidForm(
                    "invalid date format. Use YYYY-MM-DD".to_owned()
                )),
                "want error for date {date:?}"
            );
        }
    }
}

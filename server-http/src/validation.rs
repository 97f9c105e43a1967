use crate::models::{FieldError, ItemRequest, ProcessReceiptRequest};
use chrono::{NaiveDate, NaiveTime};
use receipts::domain::ParseAmountError;
use receipts::{Amount, LineItem, PurchaseRecord};
use regex::Regex;
use std::sync::LazyLock;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

static RETAILER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w\s\-&]+$").expect("valid retailer regex"));
static DESCRIPTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w\s\-]+$").expect("valid description regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Required { field: String },
    Blank { field: String },
    InvalidCharacters { field: String, allowed: &'static str },
    InvalidDate { field: String, value: String },
    InvalidTime { field: String, value: String },
    InvalidAmount { field: String, value: String },
    NotPositive { field: String },
}

impl ValidationError {
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::Blank { field }
            | ValidationError::InvalidCharacters { field, .. }
            | ValidationError::InvalidDate { field, .. }
            | ValidationError::InvalidTime { field, .. }
            | ValidationError::InvalidAmount { field, .. }
            | ValidationError::NotPositive { field } => field,
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Required { field } => write!(f, "Field '{}' is required", field),
            ValidationError::Blank { field } => write!(f, "Field '{}' must not be blank", field),
            ValidationError::InvalidCharacters { field, allowed } => {
                write!(f, "Field '{}' may only contain {}", field, allowed)
            }
            ValidationError::InvalidDate { field, value } => {
                write!(f, "Field '{}' value '{}' is not a YYYY-MM-DD date", field, value)
            }
            ValidationError::InvalidTime { field, value } => {
                write!(f, "Field '{}' value '{}' is not a 24h HH:MM time", field, value)
            }
            ValidationError::InvalidAmount { field, value } => {
                write!(
                    f,
                    "Field '{}' value '{}' must be a decimal with two fraction digits",
                    field, value
                )
            }
            ValidationError::NotPositive { field } => {
                write!(f, "Field '{}' must be greater than zero", field)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<&ValidationError> for FieldError {
    fn from(err: &ValidationError) -> Self {
        FieldError {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

pub struct ReceiptValidator;

impl ReceiptValidator {
    /// Validate every field and build a PurchaseRecord, or report all failures
    pub fn from_request(req: ProcessReceiptRequest) -> Result<PurchaseRecord, Vec<ValidationError>> {
        let mut errors = Vec::new();

        Self::check_text(
            &mut errors,
            "retailer",
            &req.retailer,
            &RETAILER_PATTERN,
            "letters, digits, spaces, '_', '-' and '&'",
        );
        Self::check_date(&mut errors, &req.purchase_date);
        Self::check_time(&mut errors, &req.purchase_time);

        if req.items.is_empty() {
            errors.push(ValidationError::Required {
                field: "items".to_string(),
            });
        }

        let items: Vec<Option<LineItem>> = req
            .items
            .into_iter()
            .enumerate()
            .map(|(index, item)| Self::check_item(&mut errors, index, item))
            .collect();

        let total = Self::check_amount(&mut errors, "total".to_string(), &req.total);

        if !errors.is_empty() {
            return Err(errors);
        }

        match (items.into_iter().collect::<Option<Vec<_>>>(), total) {
            (Some(items), Some(total)) => Ok(PurchaseRecord {
                retailer: req.retailer,
                purchase_date: req.purchase_date,
                purchase_time: req.purchase_time,
                items,
                total,
            }),
            // Every None above pushed an error
            _ => Err(errors),
        }
    }

    fn check_item(
        errors: &mut Vec<ValidationError>,
        index: usize,
        item: ItemRequest,
    ) -> Option<LineItem> {
        let description_ok = Self::check_text(
            errors,
            &format!("items[{}].shortDescription", index),
            &item.short_description,
            &DESCRIPTION_PATTERN,
            "letters, digits, spaces, '_' and '-'",
        );
        let price = Self::check_amount(errors, format!("items[{}].price", index), &item.price);

        match (description_ok, price) {
            (true, Some(price)) => Some(LineItem::new(item.short_description, price)),
            _ => None,
        }
    }

    fn check_text(
        errors: &mut Vec<ValidationError>,
        field: &str,
        value: &str,
        pattern: &Regex,
        allowed: &'static str,
    ) -> bool {
        let error = if value.is_empty() {
            ValidationError::Required {
                field: field.to_string(),
            }
        } else if value.trim().is_empty() {
            ValidationError::Blank {
                field: field.to_string(),
            }
        } else if !pattern.is_match(value) {
            ValidationError::InvalidCharacters {
                field: field.to_string(),
                allowed,
            }
        } else {
            return true;
        };

        errors.push(error);
        false
    }

    fn check_date(errors: &mut Vec<ValidationError>, value: &str) {
        let field = "purchaseDate".to_string();
        if value.is_empty() {
            errors.push(ValidationError::Required { field });
        } else if NaiveDate::parse_from_str(value, DATE_FORMAT).is_err() {
            errors.push(ValidationError::InvalidDate {
                field,
                value: value.to_string(),
            });
        }
    }

    fn check_time(errors: &mut Vec<ValidationError>, value: &str) {
        let field = "purchaseTime".to_string();
        if value.is_empty() {
            errors.push(ValidationError::Required { field });
        } else if NaiveTime::parse_from_str(value, TIME_FORMAT).is_err() {
            errors.push(ValidationError::InvalidTime {
                field,
                value: value.to_string(),
            });
        }
    }

    fn check_amount(errors: &mut Vec<ValidationError>, field: String, value: &str) -> Option<Amount> {
        if value.is_empty() {
            errors.push(ValidationError::Required { field });
            return None;
        }

        match value.parse::<Amount>() {
            Ok(amount) if amount.is_positive() => Some(amount),
            Ok(_) => {
                errors.push(ValidationError::NotPositive { field });
                None
            }
            Err(ParseAmountError::Format(_) | ParseAmountError::Overflow(_)) => {
                errors.push(ValidationError::InvalidAmount {
                    field,
                    value: value.to_string(),
                });
                None
            }
        }
    }
}

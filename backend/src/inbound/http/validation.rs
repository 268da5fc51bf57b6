//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every payload failure becomes an `invalid_request` error whose details
//! name the offending field and a machine-readable code.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::domain::{
    AccountValidationError, Error, PasswordError, RecipeValidationError, field_error,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    Required,
    Blank,
    Invalid,
    MaxLength,
    MinLength,
    MinValue,
    MaxValue,
    DecimalPlaces,
    ReadOnly,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Blank => "blank",
            Self::Invalid => "invalid",
            Self::MaxLength => "max_length",
            Self::MinLength => "min_length",
            Self::MinValue => "min_value",
            Self::MaxValue => "max_value",
            Self::DecimalPlaces => "decimal_places",
            Self::ReadOnly => "read_only",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) const EMAIL: FieldName = FieldName::new("email");
pub(crate) const NAME: FieldName = FieldName::new("name");
pub(crate) const PASSWORD: FieldName = FieldName::new("password");
pub(crate) const PRICE: FieldName = FieldName::new("price");
pub(crate) const TAGS: FieldName = FieldName::new("tags");

fn coded(field: FieldName, code: ErrorCode, message: impl Into<String>) -> Error {
    field_error(field.as_str(), code.as_str(), message)
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    coded(field, ErrorCode::Required, format!("{name}: this field is required"))
}

pub(crate) fn read_only_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    coded(field, ErrorCode::ReadOnly, format!("{name}: this field is read-only"))
}

/// Unwrap a required payload field.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn account_error(field: FieldName, err: &AccountValidationError) -> Error {
    let code = match err {
        AccountValidationError::EmptyEmail => ErrorCode::Required,
        AccountValidationError::EmptyName => ErrorCode::Blank,
        AccountValidationError::EmailTooLong { .. } | AccountValidationError::NameTooLong { .. } => {
            ErrorCode::MaxLength
        }
        AccountValidationError::MalformedEmail => ErrorCode::Invalid,
    };
    coded(field, code, err.to_string())
}

pub(crate) fn password_error(err: &PasswordError) -> Error {
    let code = match err {
        PasswordError::Blank => ErrorCode::Blank,
        PasswordError::TooShort { .. } => ErrorCode::MinLength,
        PasswordError::Hashing(_) | PasswordError::MalformedHash => ErrorCode::Invalid,
    };
    coded(PASSWORD, code, err.to_string())
}

fn recipe_code(err: &RecipeValidationError) -> ErrorCode {
    match err {
        RecipeValidationError::EmptyTitle | RecipeValidationError::EmptyTagName => {
            ErrorCode::Blank
        }
        RecipeValidationError::TitleTooLong { .. }
        | RecipeValidationError::LinkTooLong { .. }
        | RecipeValidationError::TagNameTooLong { .. } => ErrorCode::MaxLength,
        RecipeValidationError::NegativeTime | RecipeValidationError::NegativePrice => {
            ErrorCode::MinValue
        }
        RecipeValidationError::PriceTooPrecise { .. } => ErrorCode::DecimalPlaces,
        RecipeValidationError::PriceTooLarge { .. } => ErrorCode::MaxValue,
    }
}

pub(crate) fn recipe_error(err: &RecipeValidationError) -> Error {
    field_error(err.field(), recipe_code(err).as_str(), err.to_string())
}

/// Tag names nested in a recipe payload report under `tags`.
pub(crate) fn nested_tag_error(index: usize, err: &RecipeValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(serde_json::json!({
        "field": TAGS.as_str(),
        "index": index,
        "code": recipe_code(err).as_str(),
    }))
}

/// Parse a decimal price given either as a JSON string or number.
pub(crate) fn parse_price(raw: &serde_json::Value) -> Result<Decimal, Error> {
    let parsed = match raw {
        serde_json::Value::String(text) => Decimal::from_str(text.trim()).ok(),
        serde_json::Value::Number(number) => Decimal::from_str(&number.to_string()).ok(),
        _ => None,
    };
    parsed.ok_or_else(|| coded(PRICE, ErrorCode::Invalid, "price: a valid number is required"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn details(error: &Error) -> (String, String) {
        let details = error.details().expect("field details");
        (
            details["field"].as_str().unwrap_or_default().to_owned(),
            details["code"].as_str().unwrap_or_default().to_owned(),
        )
    }

    #[rstest]
    #[case(PasswordError::TooShort { min: 5 }, "min_length")]
    #[case(PasswordError::Blank, "blank")]
    fn password_errors_point_at_password(#[case] err: PasswordError, #[case] code: &str) {
        assert_eq!(
            details(&password_error(&err)),
            ("password".to_owned(), code.to_owned())
        );
    }

    #[rstest]
    #[case(RecipeValidationError::NegativeTime, "time_minute", "min_value")]
    #[case(RecipeValidationError::PriceTooPrecise { scale: 2 }, "price", "decimal_places")]
    #[case(RecipeValidationError::EmptyTitle, "title", "blank")]
    fn recipe_errors_use_wire_field_names(
        #[case] err: RecipeValidationError,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        assert_eq!(
            details(&recipe_error(&err)),
            (field.to_owned(), code.to_owned())
        );
    }

    #[rstest]
    #[case(json!("5.50"), "5.50")]
    #[case(json!(12), "12")]
    #[case(json!(" 3.2 "), "3.2")]
    fn prices_parse_from_strings_and_numbers(#[case] raw: serde_json::Value, #[case] expected: &str) {
        assert_eq!(parse_price(&raw).expect("price").to_string(), expected);
    }

    #[rstest]
    #[case(json!("five"))]
    #[case(json!(null))]
    #[case(json!([1]))]
    fn unparseable_prices_are_field_errors(#[case] raw: serde_json::Value) {
        let error = parse_price(&raw).expect_err("invalid price");
        assert_eq!(details(&error), ("price".to_owned(), "invalid".to_owned()));
    }

    #[rstest]
    fn nested_tag_errors_carry_the_index() {
        let error = nested_tag_error(2, &RecipeValidationError::EmptyTagName);
        let details = error.details().expect("details");
        assert_eq!(details["field"], "tags");
        assert_eq!(details["index"], 2);
        assert_eq!(details["code"], "blank");
    }

    #[rstest]
    fn read_only_fields_are_named() {
        let error = read_only_field_error(FieldName::new("id"));
        assert_eq!(details(&error), ("id".to_owned(), "read_only".to_owned()));
    }
}

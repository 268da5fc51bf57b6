//! Recipe and tag data model.
//!
//! Every recipe and tag belongs to exactly one account. The types here carry
//! the owner so stores can scope each query to the caller.

use std::fmt;

use rust_decimal::Decimal;

use super::account::AccountId;

/// Maximum length of titles, links and tag names.
pub const RECIPE_FIELD_MAX: usize = 255;
/// Number of decimal places stored for prices.
pub const PRICE_SCALE: u32 = 2;
/// Prices are stored with at most five digits, so this bound is exclusive.
pub const PRICE_LIMIT: i64 = 1000;

/// Validation errors for recipe and tag fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeValidationError {
    EmptyTitle,
    TitleTooLong { max: usize },
    NegativeTime,
    NegativePrice,
    PriceTooPrecise { scale: u32 },
    PriceTooLarge { limit: i64 },
    LinkTooLong { max: usize },
    EmptyTagName,
    TagNameTooLong { max: usize },
}

impl fmt::Display for RecipeValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be blank"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::NegativeTime => write!(f, "time_minute must not be negative"),
            Self::NegativePrice => write!(f, "price must not be negative"),
            Self::PriceTooPrecise { scale } => {
                write!(f, "price must have no more than {scale} decimal places")
            }
            Self::PriceTooLarge { limit } => write!(f, "price must be less than {limit}"),
            Self::LinkTooLong { max } => write!(f, "link must be at most {max} characters"),
            Self::EmptyTagName => write!(f, "tag name must not be blank"),
            Self::TagNameTooLong { max } => {
                write!(f, "tag name must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for RecipeValidationError {}

impl RecipeValidationError {
    /// Payload field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle | Self::TitleTooLong { .. } => "title",
            Self::NegativeTime => "time_minute",
            Self::NegativePrice | Self::PriceTooPrecise { .. } | Self::PriceTooLarge { .. } => {
                "price"
            }
            Self::LinkTooLong { .. } => "link",
            Self::EmptyTagName | Self::TagNameTooLong { .. } => "name",
        }
    }
}

macro_rules! integer_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(i64);

        impl $name {
            pub fn new(id: i64) -> Self {
                Self(id)
            }

            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

integer_id!(
    /// Database-assigned recipe identifier.
    RecipeId
);
integer_id!(
    /// Database-assigned tag identifier.
    TagId
);

fn bounded_text(
    raw: &str,
    empty: RecipeValidationError,
    too_long: RecipeValidationError,
) -> Result<String, RecipeValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(empty);
    }
    if trimmed.chars().count() > RECIPE_FIELD_MAX {
        return Err(too_long);
    }
    Ok(trimmed.to_owned())
}

/// Recipe title, trimmed and non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeTitle(String);

impl RecipeTitle {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, RecipeValidationError> {
        bounded_text(
            raw.as_ref(),
            RecipeValidationError::EmptyTitle,
            RecipeValidationError::TitleTooLong {
                max: RECIPE_FIELD_MAX,
            },
        )
        .map(Self)
    }
}

impl AsRef<str> for RecipeTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Tag name, trimmed and non-blank. Unique per owner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagName(String);

impl TagName {
    /// # Examples
    /// ```
    /// use recipe_backend::domain::TagName;
    ///
    /// assert_eq!(TagName::new("  Vegan ").unwrap().as_ref(), "Vegan");
    /// assert!(TagName::new("   ").is_err());
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, RecipeValidationError> {
        bounded_text(
            raw.as_ref(),
            RecipeValidationError::EmptyTagName,
            RecipeValidationError::TagNameTooLong {
                max: RECIPE_FIELD_MAX,
            },
        )
        .map(Self)
    }
}

impl AsRef<str> for TagName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Preparation time in whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeMinutes(i32);

impl TimeMinutes {
    pub fn new(minutes: i32) -> Result<Self, RecipeValidationError> {
        if minutes < 0 {
            return Err(RecipeValidationError::NegativeTime);
        }
        Ok(Self(minutes))
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

/// Non-negative price with two decimal places and at most five digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Price(Decimal);

impl Price {
    /// Validate a decimal and rescale it to two places.
    ///
    /// # Examples
    /// ```
    /// use recipe_backend::domain::Price;
    /// use rust_decimal::Decimal;
    ///
    /// let price = Price::new(Decimal::new(55, 1)).unwrap();
    /// assert_eq!(price.get().to_string(), "5.50");
    /// ```
    pub fn new(value: Decimal) -> Result<Self, RecipeValidationError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(RecipeValidationError::NegativePrice);
        }
        if value.scale() > PRICE_SCALE {
            return Err(RecipeValidationError::PriceTooPrecise { scale: PRICE_SCALE });
        }
        if value >= Decimal::from(PRICE_LIMIT) {
            return Err(RecipeValidationError::PriceTooLarge { limit: PRICE_LIMIT });
        }
        let mut scaled = value.abs();
        scaled.rescale(PRICE_SCALE);
        Ok(Self(scaled))
    }

    pub fn get(self) -> Decimal {
        self.0
    }
}

/// Link to the recipe source. May be blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeLink(String);

impl RecipeLink {
    pub fn new(raw: impl Into<String>) -> Result<Self, RecipeValidationError> {
        let raw = raw.into();
        if raw.chars().count() > RECIPE_FIELD_MAX {
            return Err(RecipeValidationError::LinkTooLong {
                max: RECIPE_FIELD_MAX,
            });
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for RecipeLink {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Tag owned by a single account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: TagId,
    pub owner: AccountId,
    pub name: TagName,
}

/// Order tags for presentation: case-insensitive name, then id.
///
/// Storage adapters must agree with this ordering.
pub fn sort_tags_for_listing(tags: &mut [Tag]) {
    tags.sort_by_cached_key(|tag| (tag.name.as_ref().to_lowercase(), tag.id));
}

/// Scalar recipe fields, validated and ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeFields {
    pub title: RecipeTitle,
    pub time_minutes: TimeMinutes,
    pub price: Price,
    pub link: RecipeLink,
    pub description: String,
}

/// Partial update of [`RecipeFields`]; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFieldsPatch {
    pub title: Option<RecipeTitle>,
    pub time_minutes: Option<TimeMinutes>,
    pub price: Option<Price>,
    pub link: Option<RecipeLink>,
    pub description: Option<String>,
}

impl RecipeFields {
    /// Apply a patch in place.
    pub fn apply(&mut self, patch: RecipeFieldsPatch) {
        let RecipeFieldsPatch {
            title,
            time_minutes,
            price,
            link,
            description,
        } = patch;
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(time_minutes) = time_minutes {
            self.time_minutes = time_minutes;
        }
        if let Some(price) = price {
            self.price = price;
        }
        if let Some(link) = link {
            self.link = link;
        }
        if let Some(description) = description {
            self.description = description;
        }
    }
}

/// Persisted recipe with its tags ordered by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub id: RecipeId,
    pub owner: AccountId,
    pub fields: RecipeFields,
    pub tags: Vec<Tag>,
}

/// Deduplicate tag names, preserving first occurrence order.
pub fn dedup_tag_names(names: Vec<TagName>) -> Vec<TagName> {
    let mut seen = std::collections::HashSet::new();
    names
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

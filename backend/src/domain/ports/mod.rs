//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`*Command`, `*Query`, [`TokenIssuer`]) are called by
//! inbound adapters. Driven ports (`*Repository`) are implemented by the
//! persistence adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod account_repository;
mod recipe_command;
mod recipe_repository;
mod tag_command;
mod tag_repository;
mod token_issuer;
mod token_repository;

#[cfg(test)]
pub use account_command::{MockAccountCommand, MockAccountQuery};
pub use account_command::{AccountCommand, AccountQuery, ProfileUpdate, SignupRequest};
#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{AccountRepository, AccountRepositoryError};
#[cfg(test)]
pub use recipe_command::{MockRecipeCommand, MockRecipeQuery};
pub use recipe_command::{RecipeCommand, RecipePatch, RecipeQuery, RecipeReplacement};
#[cfg(test)]
pub use recipe_repository::MockRecipeRepository;
pub use recipe_repository::{RecipeRepository, RecipeRepositoryError, RecipeWrite};
#[cfg(test)]
pub use tag_command::{MockTagCommand, MockTagQuery};
pub use tag_command::{TagCommand, TagQuery};
#[cfg(test)]
pub use tag_repository::MockTagRepository;
pub use tag_repository::{TagRepository, TagRepositoryError};
#[cfg(test)]
pub use token_issuer::MockTokenIssuer;
pub use token_issuer::{INVALID_CREDENTIALS, INVALID_TOKEN, TokenIssuer};
#[cfg(test)]
pub use token_repository::MockTokenRepository;
pub use token_repository::{TokenRepository, TokenRepositoryError};

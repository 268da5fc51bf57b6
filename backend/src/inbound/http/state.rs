//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, AccountQuery, AccountRepository, RecipeCommand, RecipeQuery,
    RecipeRepository, TagCommand, TagQuery, TagRepository, TokenIssuer, TokenRepository,
};
use crate::domain::{AccountService, RecipeService, TagService, TokenService};
use crate::outbound::memory::MemoryStore;
use crate::outbound::persistence::{
    DbPool, DieselAccountRepository, DieselRecipeRepository, DieselTagRepository,
    DieselTokenRepository,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub profiles: Arc<dyn AccountQuery>,
    pub tokens: Arc<dyn TokenIssuer>,
    pub recipes: Arc<dyn RecipeCommand>,
    pub recipes_query: Arc<dyn RecipeQuery>,
    pub tags: Arc<dyn TagCommand>,
    pub tags_query: Arc<dyn TagQuery>,
}

impl HttpState {
    /// Wire the domain services over a set of repository adapters.
    pub fn from_repositories<A, T, R, G>(
        accounts: Arc<A>,
        tokens: Arc<T>,
        recipes: Arc<R>,
        tags: Arc<G>,
    ) -> Self
    where
        A: AccountRepository + 'static,
        T: TokenRepository + 'static,
        R: RecipeRepository + 'static,
        G: TagRepository + 'static,
    {
        let account_service = Arc::new(AccountService::new(Arc::clone(&accounts)));
        let recipe_service = Arc::new(RecipeService::new(recipes));
        let tag_service = Arc::new(TagService::new(tags));
        Self {
            accounts: account_service.clone(),
            profiles: account_service,
            tokens: Arc::new(TokenService::new(accounts, tokens)),
            recipes: recipe_service.clone(),
            recipes_query: recipe_service,
            tags: tag_service.clone(),
            tags_query: tag_service,
        }
    }

    /// State backed by a single in-memory store.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use recipe_backend::inbound::http::state::HttpState;
    /// use recipe_backend::outbound::memory::MemoryStore;
    ///
    /// let state = HttpState::in_memory(Arc::new(MemoryStore::new()));
    /// let _tokens = state.tokens.clone();
    /// ```
    pub fn in_memory(store: Arc<MemoryStore>) -> Self {
        Self::from_repositories(store.clone(), store.clone(), store.clone(), store)
    }

    /// State backed by the Diesel repositories sharing `pool`.
    pub fn with_pool(pool: &DbPool) -> Self {
        Self::from_repositories(
            Arc::new(DieselAccountRepository::new(pool.clone())),
            Arc::new(DieselTokenRepository::new(pool.clone())),
            Arc::new(DieselRecipeRepository::new(pool.clone())),
            Arc::new(DieselTagRepository::new(pool.clone())),
        )
    }
}

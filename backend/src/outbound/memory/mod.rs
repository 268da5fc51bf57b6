//! In-memory repositories for local runs and tests.
//!
//! A single [`MemoryStore`] implements every repository port over one mutex
//! guarded state, so uniqueness checks and tag resolution happen atomically.
//! A poisoned lock surfaces as a connection error.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, RecipeRepository, RecipeRepositoryError,
    RecipeWrite, TagRepository, TagRepositoryError, TokenRepository, TokenRepositoryError,
};
use crate::domain::{
    Account, AccountId, Email, NewAccount, Recipe, RecipeFields, RecipeId, Tag, TagId, TagName,
    TokenDigest, sort_tags_for_listing,
};

const POISONED: &str = "in-memory store lock poisoned";

#[derive(Debug, Clone)]
struct StoredRecipe {
    owner: AccountId,
    fields: RecipeFields,
    tags: Vec<TagId>,
}

#[derive(Debug, Default)]
struct State {
    last_account_id: i64,
    last_recipe_id: i64,
    last_tag_id: i64,
    accounts: BTreeMap<AccountId, Account>,
    tokens: HashMap<AccountId, TokenDigest>,
    recipes: BTreeMap<RecipeId, StoredRecipe>,
    tags: BTreeMap<TagId, Tag>,
}

impl State {
    fn email_taken(&self, email: &Email, except: Option<AccountId>) -> bool {
        self.accounts
            .values()
            .any(|account| account.email() == email && Some(account.id()) != except)
    }

    fn owned_tag(&self, owner: AccountId, id: TagId) -> Option<&Tag> {
        self.tags.get(&id).filter(|tag| tag.owner == owner)
    }

    fn resolve_tags(&mut self, owner: AccountId, names: &[TagName]) -> Vec<TagId> {
        names
            .iter()
            .map(|name| {
                let existing = self
                    .tags
                    .values()
                    .find(|tag| tag.owner == owner && &tag.name == name)
                    .map(|tag| tag.id);
                existing.unwrap_or_else(|| {
                    self.last_tag_id += 1;
                    let id = TagId::new(self.last_tag_id);
                    self.tags.insert(
                        id,
                        Tag {
                            id,
                            owner,
                            name: name.clone(),
                        },
                    );
                    id
                })
            })
            .collect()
    }

    fn materialise(&self, id: RecipeId, stored: &StoredRecipe) -> Recipe {
        let mut tags: Vec<Tag> = stored
            .tags
            .iter()
            .filter_map(|tag_id| self.tags.get(tag_id).cloned())
            .collect();
        sort_tags_for_listing(&mut tags);
        Recipe {
            id,
            owner: stored.owner,
            fields: stored.fields.clone(),
            tags,
        }
    }
}

/// Process-local store implementing all repository ports.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, &'static str> {
        self.state.lock().map_err(|_| POISONED)
    }
}

#[async_trait]
impl AccountRepository for MemoryStore {
    async fn insert(&self, account: &NewAccount) -> Result<Account, AccountRepositoryError> {
        let mut state = self.lock().map_err(AccountRepositoryError::connection)?;
        if state.email_taken(&account.email, None) {
            return Err(AccountRepositoryError::duplicate_email(
                account.email.as_ref(),
            ));
        }
        state.last_account_id += 1;
        let id = AccountId::new(state.last_account_id);
        let stored = Account::new(
            id,
            account.email.clone(),
            account.name.clone(),
            account.password_hash.clone(),
            account.flags,
        );
        state.accounts.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AccountRepositoryError> {
        let state = self.lock().map_err(AccountRepositoryError::connection)?;
        Ok(state.accounts.get(&id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        let state = self.lock().map_err(AccountRepositoryError::connection)?;
        Ok(state
            .accounts
            .values()
            .find(|account| account.email() == email)
            .cloned())
    }

    async fn update(&self, account: &Account) -> Result<(), AccountRepositoryError> {
        let mut state = self.lock().map_err(AccountRepositoryError::connection)?;
        if !state.accounts.contains_key(&account.id()) {
            return Err(AccountRepositoryError::not_found(account.id().get()));
        }
        if state.email_taken(account.email(), Some(account.id())) {
            return Err(AccountRepositoryError::duplicate_email(
                account.email().as_ref(),
            ));
        }
        state.accounts.insert(account.id(), account.clone());
        Ok(())
    }
}

#[async_trait]
impl TokenRepository for MemoryStore {
    async fn replace(
        &self,
        account: AccountId,
        digest: &TokenDigest,
    ) -> Result<(), TokenRepositoryError> {
        let mut state = self.lock().map_err(TokenRepositoryError::connection)?;
        state.tokens.insert(account, digest.clone());
        Ok(())
    }

    async fn resolve(
        &self,
        digest: &TokenDigest,
    ) -> Result<Option<AccountId>, TokenRepositoryError> {
        let state = self.lock().map_err(TokenRepositoryError::connection)?;
        Ok(state
            .tokens
            .iter()
            .find(|(_, stored)| *stored == digest)
            .map(|(account, _)| *account))
    }
}

#[async_trait]
impl RecipeRepository for MemoryStore {
    async fn list(&self, owner: AccountId) -> Result<Vec<Recipe>, RecipeRepositoryError> {
        let state = self.lock().map_err(RecipeRepositoryError::connection)?;
        Ok(state
            .recipes
            .iter()
            .rev()
            .filter(|(_, stored)| stored.owner == owner)
            .map(|(id, stored)| state.materialise(*id, stored))
            .collect())
    }

    async fn find(
        &self,
        owner: AccountId,
        id: RecipeId,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let state = self.lock().map_err(RecipeRepositoryError::connection)?;
        Ok(state
            .recipes
            .get(&id)
            .filter(|stored| stored.owner == owner)
            .map(|stored| state.materialise(id, stored)))
    }

    async fn insert(
        &self,
        owner: AccountId,
        recipe: &RecipeWrite,
    ) -> Result<Recipe, RecipeRepositoryError> {
        let mut state = self.lock().map_err(RecipeRepositoryError::connection)?;
        let tags = match &recipe.tags {
            Some(names) => state.resolve_tags(owner, names),
            None => Vec::new(),
        };
        state.last_recipe_id += 1;
        let id = RecipeId::new(state.last_recipe_id);
        let stored = StoredRecipe {
            owner,
            fields: recipe.fields.clone(),
            tags,
        };
        let created = state.materialise(id, &stored);
        state.recipes.insert(id, stored);
        Ok(created)
    }

    async fn update(
        &self,
        owner: AccountId,
        id: RecipeId,
        recipe: &RecipeWrite,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut state = self.lock().map_err(RecipeRepositoryError::connection)?;
        let Some(current) = state
            .recipes
            .get(&id)
            .filter(|stored| stored.owner == owner)
            .cloned()
        else {
            return Ok(None);
        };
        let tags = match &recipe.tags {
            Some(names) => state.resolve_tags(owner, names),
            None => current.tags,
        };
        let stored = StoredRecipe {
            owner,
            fields: recipe.fields.clone(),
            tags,
        };
        let updated = state.materialise(id, &stored);
        state.recipes.insert(id, stored);
        Ok(Some(updated))
    }

    async fn delete(&self, owner: AccountId, id: RecipeId) -> Result<bool, RecipeRepositoryError> {
        let mut state = self.lock().map_err(RecipeRepositoryError::connection)?;
        let owned = state
            .recipes
            .get(&id)
            .is_some_and(|stored| stored.owner == owner);
        if owned {
            state.recipes.remove(&id);
        }
        Ok(owned)
    }
}

#[async_trait]
impl TagRepository for MemoryStore {
    async fn list(&self, owner: AccountId) -> Result<Vec<Tag>, TagRepositoryError> {
        let state = self.lock().map_err(TagRepositoryError::connection)?;
        let mut tags: Vec<Tag> = state
            .tags
            .values()
            .filter(|tag| tag.owner == owner)
            .cloned()
            .collect();
        sort_tags_for_listing(&mut tags);
        Ok(tags)
    }

    async fn find(&self, owner: AccountId, id: TagId) -> Result<Option<Tag>, TagRepositoryError> {
        let state = self.lock().map_err(TagRepositoryError::connection)?;
        Ok(state.owned_tag(owner, id).cloned())
    }

    async fn rename(
        &self,
        owner: AccountId,
        id: TagId,
        name: &TagName,
    ) -> Result<Option<Tag>, TagRepositoryError> {
        let mut state = self.lock().map_err(TagRepositoryError::connection)?;
        if state.owned_tag(owner, id).is_none() {
            return Ok(None);
        }
        let clash = state
            .tags
            .values()
            .any(|tag| tag.owner == owner && tag.id != id && &tag.name == name);
        if clash {
            return Err(TagRepositoryError::duplicate_name(name.as_ref()));
        }
        let Some(tag) = state.tags.get_mut(&id) else {
            return Ok(None);
        };
        tag.name = name.clone();
        Ok(Some(tag.clone()))
    }

    async fn delete(&self, owner: AccountId, id: TagId) -> Result<bool, TagRepositoryError> {
        let mut state = self.lock().map_err(TagRepositoryError::connection)?;
        if state.owned_tag(owner, id).is_none() {
            return Ok(false);
        }
        state.tags.remove(&id);
        for recipe in state.recipes.values_mut() {
            recipe.tags.retain(|tag_id| *tag_id != id);
        }
        Ok(true)
    }
}

//! Catalog store: the recipe collection and the favorite set.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use mireceta_core::config::{CatalogSettings, StorageKeys};
use mireceta_core::recipe::{
    DifficultyFilter, FavoriteStats, NewRecipe, Recipe, RecipePatch, query, seed,
};
use mireceta_core::storage::{JsonStorageExt, KeyValueStorage};
use mireceta_core::{Subscribers, SubscriptionId};

struct CatalogState {
    recipes: Vec<Recipe>,
    /// Insertion-ordered, no duplicates.
    favorites: Vec<String>,
}

/// Owns the recipes and the favorite ids, persists them and notifies
/// subscribers after every change.
///
/// All mutations run to completion under one lock and write through to
/// storage before returning. Each mutation queues its snapshot under that
/// lock and delivers it after the lock is released, so listeners see
/// snapshots in commit order even when threads race, and always before the
/// mutating call returns.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use mireceta_application::CatalogStore;
/// use mireceta_core::config::{CatalogSettings, StorageKeys};
/// use mireceta_infrastructure::MemoryStorage;
///
/// let catalog = CatalogStore::new(
///     Arc::new(MemoryStorage::new()),
///     StorageKeys::default(),
///     &CatalogSettings::default(),
/// );
/// assert_eq!(catalog.list_all().len(), 3);
/// ```
pub struct CatalogStore {
    storage: Arc<dyn KeyValueStorage>,
    keys: StorageKeys,
    state: Mutex<CatalogState>,
    recipe_subscribers: Subscribers<Vec<Recipe>>,
    favorite_subscribers: Subscribers<Vec<String>>,
}

impl CatalogStore {
    /// Loads the catalog from storage, seeding the sample recipes when the
    /// stored collection is empty and seeding is enabled.
    pub fn new(
        storage: Arc<dyn KeyValueStorage>,
        keys: StorageKeys,
        settings: &CatalogSettings,
    ) -> Self {
        let mut recipes: Vec<Recipe> = load_or_default(storage.as_ref(), &keys.recipes);
        let mut favorites: Vec<String> = load_or_default(storage.as_ref(), &keys.favorites);
        dedup_in_order(&mut favorites);

        let needs_seed = recipes.is_empty() && settings.seed_samples;
        if needs_seed {
            recipes = seed::sample_recipes();
            tracing::info!("[CatalogStore] Seeded {} sample recipes", recipes.len());
        } else {
            tracing::debug!("[CatalogStore] Loaded {} recipes", recipes.len());
        }

        let store = Self {
            storage,
            keys,
            state: Mutex::new(CatalogState { recipes, favorites }),
            recipe_subscribers: Subscribers::new(),
            favorite_subscribers: Subscribers::new(),
        };

        if needs_seed {
            let state = store.lock_state();
            store.persist_recipes(&state.recipes);
        }
        store
    }

    fn lock_state(&self) -> MutexGuard<'_, CatalogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist_recipes(&self, recipes: &[Recipe]) {
        if let Err(e) = self.storage.set_json(&self.keys.recipes, recipes) {
            tracing::warn!("[CatalogStore] Failed to persist recipes: {}", e);
        }
    }

    fn persist_favorites(&self, favorites: &[String]) {
        if let Err(e) = self.storage.set_json(&self.keys.favorites, favorites) {
            tracing::warn!("[CatalogStore] Failed to persist favorites: {}", e);
        }
    }

    // ============================================================================
    // Subscriptions
    // ============================================================================

    /// Subscribes to the recipe collection. The listener receives the current
    /// collection right away and every new snapshot after each change.
    pub fn subscribe_recipes<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&Vec<Recipe>) + Send + Sync + 'static,
    {
        let id = {
            let state = self.lock_state();
            self.recipe_subscribers
                .subscribe_and_replay(listener, state.recipes.clone())
        };
        self.recipe_subscribers.flush();
        id
    }

    /// Subscribes to the favorite id list, replaying the current list first.
    pub fn subscribe_favorites<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&Vec<String>) + Send + Sync + 'static,
    {
        let id = {
            let state = self.lock_state();
            self.favorite_subscribers
                .subscribe_and_replay(listener, state.favorites.clone())
        };
        self.favorite_subscribers.flush();
        id
    }

    /// Removes a recipe or favorites listener. Returns false if unknown.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.recipe_subscribers.unsubscribe(id) || self.favorite_subscribers.unsubscribe(id)
    }

    // ============================================================================
    // Recipes
    // ============================================================================

    /// Snapshot of every recipe in collection order.
    pub fn list_all(&self) -> Vec<Recipe> {
        self.lock_state().recipes.clone()
    }

    pub fn get_by_id(&self, id: &str) -> Option<Recipe> {
        self.lock_state()
            .recipes
            .iter()
            .find(|recipe| recipe.id == id)
            .cloned()
    }

    /// Stores a new recipe with a fresh id and creation timestamp.
    ///
    /// Does not validate `new`; that is the form's job.
    pub fn add(&self, new: NewRecipe) -> Recipe {
        let recipe = {
            let mut state = self.lock_state();
            let now = Utc::now();
            let id = next_recipe_id(&state.recipes, now);
            let recipe = Recipe::from_new(id, now, new);
            state.recipes.push(recipe.clone());
            self.persist_recipes(&state.recipes);
            self.recipe_subscribers.publish(state.recipes.clone());
            recipe
        };

        tracing::debug!("[CatalogStore] Added recipe {} ({})", recipe.id, recipe.name);
        self.recipe_subscribers.flush();
        recipe
    }

    /// Merges `patch` into the recipe with `id`. Returns false if not found.
    pub fn update(&self, id: &str, patch: RecipePatch) -> bool {
        {
            let mut state = self.lock_state();
            let Some(recipe) = state.recipes.iter_mut().find(|recipe| recipe.id == id) else {
                return false;
            };
            recipe.apply(patch);
            self.persist_recipes(&state.recipes);
            self.recipe_subscribers.publish(state.recipes.clone());
        }

        tracing::debug!("[CatalogStore] Updated recipe {}", id);
        self.recipe_subscribers.flush();
        true
    }

    /// Removes the recipe with `id` and drops it from the favorites.
    ///
    /// Both collections change under the same lock, so no snapshot ever shows
    /// a favorite pointing at a removed recipe. Returns false if not found.
    pub fn delete(&self, id: &str) -> bool {
        {
            let mut state = self.lock_state();
            let Some(index) = state.recipes.iter().position(|recipe| recipe.id == id) else {
                return false;
            };
            state.recipes.remove(index);

            let was_favorite = remove_id(&mut state.favorites, id);

            self.persist_recipes(&state.recipes);
            self.recipe_subscribers.publish(state.recipes.clone());
            if was_favorite {
                self.persist_favorites(&state.favorites);
                self.favorite_subscribers.publish(state.favorites.clone());
            }
        }

        tracing::debug!("[CatalogStore] Deleted recipe {}", id);
        self.recipe_subscribers.flush();
        self.favorite_subscribers.flush();
        true
    }

    /// Case-insensitive search over name, description and ingredients.
    /// A blank query returns the whole collection.
    pub fn search(&self, query: &str) -> Vec<Recipe> {
        let state = self.lock_state();
        query::search(&state.recipes, query)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Recipes of exactly the given difficulty; `All` returns everything.
    pub fn filter_by_difficulty(&self, filter: impl Into<DifficultyFilter>) -> Vec<Recipe> {
        let filter = filter.into();
        let state = self.lock_state();
        query::filter_by_difficulty(&state.recipes, filter)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Search and difficulty filter combined, as the browse view applies them.
    pub fn search_and_filter(
        &self,
        query: &str,
        filter: impl Into<DifficultyFilter>,
    ) -> Vec<Recipe> {
        let filter = filter.into();
        let state = self.lock_state();
        query::search_and_filter(&state.recipes, query, filter)
            .into_iter()
            .cloned()
            .collect()
    }

    // ============================================================================
    // Favorites
    // ============================================================================

    /// Marks `id` as a favorite. No-op if it already is one.
    pub fn add_favorite(&self, id: &str) {
        {
            let mut state = self.lock_state();
            if state.favorites.iter().any(|fav| fav == id) {
                return;
            }
            state.favorites.push(id.to_string());
            self.persist_favorites(&state.favorites);
            self.favorite_subscribers.publish(state.favorites.clone());
        }
        self.favorite_subscribers.flush();
    }

    /// Unmarks `id` as a favorite. No-op if it is not one.
    pub fn remove_favorite(&self, id: &str) {
        {
            let mut state = self.lock_state();
            if !remove_id(&mut state.favorites, id) {
                return;
            }
            self.persist_favorites(&state.favorites);
            self.favorite_subscribers.publish(state.favorites.clone());
        }
        self.favorite_subscribers.flush();
    }

    /// Flips the favorite mark of `id` and returns the new state.
    pub fn toggle_favorite(&self, id: &str) -> bool {
        let now_favorite = {
            let mut state = self.lock_state();
            let was_favorite = remove_id(&mut state.favorites, id);
            if !was_favorite {
                state.favorites.push(id.to_string());
            }
            self.persist_favorites(&state.favorites);
            self.favorite_subscribers.publish(state.favorites.clone());
            !was_favorite
        };
        self.favorite_subscribers.flush();
        now_favorite
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.lock_state().favorites.iter().any(|fav| fav == id)
    }

    /// Snapshot of the favorite ids in the order they were added.
    pub fn favorite_ids(&self) -> Vec<String> {
        self.lock_state().favorites.clone()
    }

    /// Favorite recipes in collection order.
    pub fn list_favorite_recipes(&self) -> Vec<Recipe> {
        let state = self.lock_state();
        state
            .recipes
            .iter()
            .filter(|recipe| state.favorites.contains(&recipe.id))
            .cloned()
            .collect()
    }

    /// Count, average preparation time and most common difficulty of the
    /// favorite recipes.
    pub fn favorite_stats(&self) -> FavoriteStats {
        let state = self.lock_state();
        query::favorite_stats(
            state
                .recipes
                .iter()
                .filter(|recipe| state.favorites.contains(&recipe.id)),
        )
    }
}

impl std::fmt::Debug for CatalogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock_state();
        f.debug_struct("CatalogStore")
            .field("recipes", &state.recipes.len())
            .field("favorites", &state.favorites.len())
            .finish()
    }
}

/// Reads a JSON value, treating missing or unreadable data as empty.
fn load_or_default<T>(storage: &dyn KeyValueStorage, key: &str) -> T
where
    T: serde::de::DeserializeOwned + Default,
{
    match storage.get_json::<T>(key) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(e) => {
            tracing::warn!("[CatalogStore] Ignoring unreadable '{}': {}", key, e);
            T::default()
        }
    }
}

fn dedup_in_order(ids: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    ids.retain(|id| seen.insert(id.clone()));
}

/// Removes `id` from `ids`. Returns true if it was present.
fn remove_id(ids: &mut Vec<String>, id: &str) -> bool {
    match ids.iter().position(|fav| fav == id) {
        Some(index) => {
            ids.remove(index);
            true
        }
        None => false,
    }
}

/// Timestamp-based id, bumped past any id already in use.
fn next_recipe_id(recipes: &[Recipe], now: DateTime<Utc>) -> String {
    let mut candidate = now.timestamp_millis();
    loop {
        let id = candidate.to_string();
        if !recipes.iter().any(|recipe| recipe.id == id) {
            return id;
        }
        candidate += 1;
    }
}

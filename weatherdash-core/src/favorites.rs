use tracing::warn;

use crate::{error::StoreError, model::FavoriteLocation, storage::KeyValueStore};

pub const FAVORITES_KEY: &str = "favorites";
pub const MAX_FAVORITES: usize = 5;

/// Recent locations, most recent first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Favorites {
    entries: Vec<FavoriteLocation>,
}

impl Favorites {
    /// Read the list from storage. Missing, unreadable or corrupt data yields an empty list.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let raw = match store.get(FAVORITES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Self::default(),
            Err(e) => {
                warn!(error = %e, "Could not read favorites, starting empty");
                return Self::default();
            }
        };

        match serde_json::from_str::<Vec<FavoriteLocation>>(&raw) {
            Ok(mut entries) => {
                entries.truncate(MAX_FAVORITES);
                Self { entries }
            }
            Err(e) => {
                warn!(error = %e, "Stored favorites are corrupt, starting empty");
                Self::default()
            }
        }
    }

    /// Insert at the front. Returns `false` when the place is already listed;
    /// the existing entry keeps its position.
    pub fn add(&mut self, location: FavoriteLocation) -> bool {
        if self.entries.iter().any(|f| f.same_place(&location)) {
            return false;
        }

        self.entries.insert(0, location);
        self.entries.truncate(MAX_FAVORITES);
        true
    }

    pub fn list(&self) -> &[FavoriteLocation] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&FavoriteLocation> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn persist(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.entries).map_err(|source| StoreError::Encode {
            key: FAVORITES_KEY.to_string(),
            source,
        })?;
        store.set(FAVORITES_KEY, &json)
    }
}

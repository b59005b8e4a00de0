use std::fmt;

use tracing::warn;

use crate::{error::StoreError, storage::KeyValueStore};

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Stored preference, or light when absent or unrecognized.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(THEME_KEY) {
            Ok(Some(value)) if value.trim() == "dark" => Theme::Dark,
            Ok(_) => Theme::Light,
            Err(e) => {
                warn!(error = %e, "Could not read theme preference");
                Theme::Light
            }
        }
    }

    pub fn persist(self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        store.set(THEME_KEY, self.as_str())
    }

    /// Switch to the other theme and store it. Returns the new theme.
    pub fn toggle_and_persist(self, store: &mut dyn KeyValueStore) -> Result<Self, StoreError> {
        let next = self.toggled();
        next.persist(store)?;
        Ok(next)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn defaults_to_light() {
        assert_eq!(Theme::load(&MemoryStore::new()), Theme::Light);
        let junk = MemoryStore::new().with_entry(THEME_KEY, "purple");
        assert_eq!(Theme::load(&junk), Theme::Light);
    }

    #[test]
    fn toggle_and_persist_round_trips() {
        let mut store = MemoryStore::new();
        let dark = Theme::load(&store).toggle_and_persist(&mut store).unwrap();
        assert_eq!(dark, Theme::Dark);
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("dark"));

        let light = Theme::load(&store).toggle_and_persist(&mut store).unwrap();
        assert_eq!(light, Theme::Light);
        assert_eq!(Theme::load(&store), Theme::Light);
    }

    #[test]
    fn toggle_persists() {
        let mut store = MemoryStore::new();
        Theme::Light.toggled().persist(&mut store).unwrap();
        assert_eq!(Theme::load(&store), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }
}

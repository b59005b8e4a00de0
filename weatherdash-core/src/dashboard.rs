//! Application state and the lookup pipeline.
//!
//! Every lookup is tagged with a sequence number when dispatched. A response
//! is only applied if no newer lookup has been dispatched since; older ones
//! are reported as [`LookupOutcome::Superseded`] and change nothing.

use tracing::{debug, info, warn};

use crate::{
    config::DEFAULT_CITY,
    error::{StoreError, WeatherError},
    favorites::Favorites,
    model::{LocationQuery, RawWeather, UnitSystem, WeatherView},
    normalize::normalize,
    provider::WeatherSource,
    storage::KeyValueStore,
    theme::Theme,
};

/// A dispatched lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupTicket {
    seq: u64,
    query: LocationQuery,
    units: UnitSystem,
}

impl LookupTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn query(&self) -> &LocationQuery {
        &self.query
    }

    pub fn units(&self) -> UnitSystem {
        self.units
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// The view now on display.
    Displayed(WeatherView),
    /// A newer lookup was dispatched before this one completed.
    Superseded { seq: u64, latest: u64 },
}

/// Coordinates when the host granted them, otherwise the default city.
pub fn startup_query(coordinates: Option<(f64, f64)>, default_city: &str) -> LocationQuery {
    match coordinates {
        Some((latitude, longitude)) => LocationQuery::coordinates(latitude, longitude),
        None => LocationQuery::city(default_city)
            .unwrap_or_else(|| LocationQuery::City(DEFAULT_CITY.to_string())),
    }
}

#[derive(Debug)]
pub struct Dashboard<W, S> {
    source: W,
    store: S,
    units: UnitSystem,
    favorites: Favorites,
    theme: Theme,
    current: Option<WeatherView>,
    dispatched: u64,
}

impl<W: WeatherSource, S: KeyValueStore> Dashboard<W, S> {
    /// Loads favorites and theme from `store`.
    pub fn new(source: W, store: S, units: UnitSystem) -> Self {
        let favorites = Favorites::load(&store);
        let theme = Theme::load(&store);

        Self {
            source,
            store,
            units,
            favorites,
            theme,
            current: None,
            dispatched: 0,
        }
    }

    pub fn units(&self) -> UnitSystem {
        self.units
    }

    /// Applies to lookups dispatched from now on.
    pub fn set_units(&mut self, units: UnitSystem) {
        self.units = units;
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn toggle_theme(&mut self) -> Result<Theme, StoreError> {
        self.theme = self.theme.toggle_and_persist(&mut self.store)?;
        Ok(self.theme)
    }

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    pub fn current_view(&self) -> Option<&WeatherView> {
        self.current.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn dispatch(&mut self, query: LocationQuery) -> LookupTicket {
        self.dispatched += 1;
        debug!(seq = self.dispatched, %query, "Lookup dispatched");

        LookupTicket {
            seq: self.dispatched,
            query,
            units: self.units,
        }
    }

    pub async fn fetch(&self, ticket: &LookupTicket) -> Result<RawWeather, WeatherError> {
        self.source.fetch(&ticket.query, ticket.units).await
    }

    /// Apply a fetched response unless a newer lookup has been dispatched.
    pub fn complete(
        &mut self,
        ticket: LookupTicket,
        fetched: Result<RawWeather, WeatherError>,
    ) -> Result<LookupOutcome, WeatherError> {
        if ticket.seq < self.dispatched {
            debug!(
                seq = ticket.seq,
                latest = self.dispatched,
                "Discarding superseded lookup"
            );
            return Ok(LookupOutcome::Superseded {
                seq: ticket.seq,
                latest: self.dispatched,
            });
        }

        let raw = fetched?;
        let view = normalize(&raw.current, &raw.forecast, ticket.units);

        match raw.current.favorite_location() {
            Some(location) => {
                if self.favorites.add(location) {
                    if let Err(e) = self.favorites.persist(&mut self.store) {
                        warn!(error = %e, "Failed to persist favorites");
                    }
                }
            }
            None => debug!("Response has no name or coordinates, not recorded as favorite"),
        }

        info!(location = %view.location_label(), seq = ticket.seq, "Displaying weather");
        self.current = Some(view.clone());
        Ok(LookupOutcome::Displayed(view))
    }

    pub async fn lookup(&mut self, query: LocationQuery) -> Result<LookupOutcome, WeatherError> {
        let ticket = self.dispatch(query);
        let fetched = self.fetch(&ticket).await;
        self.complete(ticket, fetched)
    }
}

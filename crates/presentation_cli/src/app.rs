//! Wiring of stores, adapters and services from configuration

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use application::ports::{GeocoderPort, StationStorePort};
use application::{LocationResolver, RouteEstimator, StationLocator};
use infrastructure::{
    AppConfig, ConnectionPool, OneMapRoutingAdapter, PlacesGeocoderAdapter,
    SqliteResolvedLocationStore, SqliteStationStore, UnconfiguredGeocoder, create_pool,
};
use tracing::{info, warn};

/// Shared handles for one command invocation
pub struct App {
    pub config: AppConfig,
    pool: Arc<ConnectionPool>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("pool", &"<ConnectionPool>")
            .finish()
    }
}

impl App {
    /// Validate the configuration and open the database
    pub fn open(config: AppConfig) -> Result<Self> {
        if let Err(errors) = config.validate() {
            bail!("Invalid configuration:\n  {}", errors.join("\n  "));
        }

        let pool = create_pool(&config.database)
            .with_context(|| format!("Failed to open database {}", config.database.path))?;

        Ok(Self {
            config,
            pool: Arc::new(pool),
        })
    }

    pub fn station_store(&self) -> SqliteStationStore {
        SqliteStationStore::new(Arc::clone(&self.pool))
    }

    pub fn resolved_store(&self) -> SqliteResolvedLocationStore {
        SqliteResolvedLocationStore::new(Arc::clone(&self.pool))
    }

    /// Load the station set once and build the locator
    pub async fn locator(&self) -> Result<StationLocator> {
        let stations = self
            .station_store()
            .load_all()
            .await
            .context("Failed to load stations")?;

        if stations.is_empty() {
            warn!("Station table is empty; every item will be flagged. Run import-stations first");
        }

        let locator = StationLocator::new(stations);
        Ok(match self.config.locator.prefilter_k {
            Some(k) => locator.with_prefilter(k),
            None => locator,
        })
    }

    /// Routing-backed estimator, or the geometric fallback when routing is off
    pub fn estimator(&self) -> Result<RouteEstimator> {
        let routing = &self.config.routing;
        if !routing.enabled {
            info!("Routing disabled, using distance estimates");
            return Ok(RouteEstimator::estimate_only());
        }

        let Ok(routing_config) = routing.to_routing_config() else {
            warn!("Routing credentials not configured, using distance estimates");
            return Ok(RouteEstimator::estimate_only());
        };

        let adapter =
            OneMapRoutingAdapter::new(&routing_config, self.config.retry.to_retry_config())
                .context("Failed to create routing client")?;
        Ok(RouteEstimator::with_routing(Arc::new(adapter)))
    }

    /// Places geocoder, or one that fails on use when no key is configured
    ///
    /// Items with a known coordinate never geocode, so a missing key only
    /// matters once a lookup is actually needed.
    pub fn geocoder(&self) -> Result<Arc<dyn GeocoderPort>> {
        let places_config = match self.config.places.to_places_config() {
            Ok(places_config) => places_config,
            Err(reason) => {
                info!(%reason, "Geocoding not configured, only known coordinates resolve");
                return Ok(Arc::new(UnconfiguredGeocoder::new(reason)));
            },
        };

        let geocoder =
            PlacesGeocoderAdapter::new(&places_config, self.config.retry.to_retry_config())
                .context("Failed to create geocoding client")?;
        Ok(Arc::new(geocoder))
    }

    /// Full resolver: geocoder, stations and estimator
    pub async fn resolver(&self) -> Result<LocationResolver> {
        Ok(LocationResolver::new(
            self.geocoder()?,
            self.locator().await?,
            self.estimator()?,
        ))
    }
}

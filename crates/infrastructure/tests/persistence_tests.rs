//! Integration tests for the SQLite stores on an on-disk database
//!
//! Covers reopening a database between runs and resuming a batch from the
//! rows a previous run wrote.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use application::ports::{
    GeocodeQuery, GeocodedPlace, GeocoderPort, ResolvedLocationStorePort, StationStorePort,
};
use application::{
    ApplicationError, BatchConfig, BatchRunner, LocationResolver, RouteEstimator, StationLocator,
};
use async_trait::async_trait;
use domain::entities::{PointOfInterest, Station};
use domain::value_objects::{DistanceSource, GeoLocation, StationId};
use infrastructure::{
    DatabaseConfig, SqliteResolvedLocationStore, SqliteStationStore, create_pool,
    read_stations,
};

// ============================================================================
// Test Helpers
// ============================================================================

/// Geocoder that places every query at the same coordinate and counts calls
#[derive(Debug, Default)]
struct FixedGeocoder {
    calls: AtomicUsize,
}

#[async_trait]
impl GeocoderPort for FixedGeocoder {
    async fn geocode(
        &self,
        query: &GeocodeQuery,
    ) -> Result<Option<GeocodedPlace>, ApplicationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Some(GeocodedPlace {
            location: GeoLocation::new(1.3, 103.8).unwrap(),
            display_name: query.name.clone(),
            provider_id: None,
        }))
    }
}

fn file_config(dir: &tempfile::TempDir) -> DatabaseConfig {
    DatabaseConfig {
        path: dir.path().join("walk.db").to_string_lossy().into_owned(),
        ..Default::default()
    }
}

fn test_station() -> Station {
    Station::new(
        StationId::new("test-station").unwrap(),
        "Test Station",
        GeoLocation::new(1.3010, 103.8010).unwrap(),
    )
}

fn items() -> Vec<PointOfInterest> {
    vec![
        PointOfInterest::new("p1", "Test Cafe"),
        PointOfInterest::new("p2", "Noodle Bar"),
        PointOfInterest::new("p3", "Kopi Corner"),
    ]
}

fn runner(
    pool: &Arc<infrastructure::ConnectionPool>,
    geocoder: Arc<FixedGeocoder>,
    config: BatchConfig,
) -> BatchRunner {
    let resolver = LocationResolver::new(
        geocoder,
        StationLocator::new(vec![test_station()]),
        RouteEstimator::estimate_only(),
    );
    BatchRunner::new(
        resolver,
        Arc::new(SqliteResolvedLocationStore::new(Arc::clone(pool))),
    )
    .with_config(config)
}

// ============================================================================
// Station Store Tests
// ============================================================================

#[tokio::test]
async fn stations_survive_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let config = file_config(&dir);

    {
        let pool = Arc::new(create_pool(&config).unwrap());
        let store = SqliteStationStore::new(pool);
        store.upsert_many(&[test_station()]).await.unwrap();
    }

    let pool = Arc::new(create_pool(&config).unwrap());
    let stations = SqliteStationStore::new(pool).load_all().await.unwrap();

    assert_eq!(stations, vec![test_station()]);
}

#[tokio::test]
async fn imported_file_lands_in_store() {
    let dir = tempfile::tempdir().unwrap();
    let json_path = dir.path().join("stations.json");
    std::fs::write(
        &json_path,
        r#"[
            {"id": "ns1", "name": "Jurong East", "latitude": 1.333, "longitude": 103.742},
            {"id": "ew24", "name": "Jurong East", "latitude": 1.333, "longitude": 103.742},
            {"id": "tbd", "name": "Future Station"}
        ]"#,
    )
    .unwrap();

    let pool = Arc::new(create_pool(&file_config(&dir)).unwrap());
    let store = SqliteStationStore::new(pool);
    let stations = read_stations(&json_path).unwrap();

    assert_eq!(store.upsert_many(&stations).await.unwrap(), 3);
    assert_eq!(store.count().await.unwrap(), 3);

    let loaded = store.load_all().await.unwrap();
    assert_eq!(loaded.iter().filter(|s| s.has_location()).count(), 2);
}

// ============================================================================
// Batch Resume Tests
// ============================================================================

#[tokio::test]
async fn batch_writes_rows_and_second_run_skips_them() {
    let dir = tempfile::tempdir().unwrap();
    let pool = Arc::new(create_pool(&file_config(&dir)).unwrap());

    let first_geocoder = Arc::new(FixedGeocoder::default());
    let report = runner(&pool, Arc::clone(&first_geocoder), BatchConfig::for_testing())
        .run(&items())
        .await
        .unwrap();

    assert_eq!(report.resolved, 3);
    assert_eq!(report.estimated, 3);
    assert_eq!(first_geocoder.calls.load(Ordering::SeqCst), 3);

    let store = SqliteResolvedLocationStore::new(Arc::clone(&pool));
    let saved = store.get("p1").await.unwrap().expect("row");
    assert_eq!(saved.walking_distance_meters, 204);
    assert_eq!(saved.source, DistanceSource::Estimated);

    let second_geocoder = Arc::new(FixedGeocoder::default());
    let report = runner(&pool, Arc::clone(&second_geocoder), BatchConfig::for_testing())
        .run(&items())
        .await
        .unwrap();

    assert_eq!(report.skipped, 3);
    assert_eq!(report.resolved, 0);
    assert_eq!(second_geocoder.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn chain_outlets_sharing_a_name_get_their_own_rows() {
    let dir = tempfile::tempdir().unwrap();
    let pool = Arc::new(create_pool(&file_config(&dir)).unwrap());

    let outlets = vec![
        PointOfInterest::new("yakun-bugis", "Ya Kun Kaya Toast"),
        PointOfInterest::new("yakun-jurong", "Ya Kun Kaya Toast"),
    ];
    let first = runner(&pool, Arc::new(FixedGeocoder::default()), BatchConfig::for_testing())
        .run(&outlets[..1])
        .await
        .unwrap();
    assert_eq!(first.resolved, 1);

    let geocoder = Arc::new(FixedGeocoder::default());
    let report = runner(&pool, Arc::clone(&geocoder), BatchConfig::for_testing())
        .run(&outlets)
        .await
        .unwrap();

    assert_eq!(report.skipped, 1);
    assert_eq!(report.resolved, 1);
    assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);

    let store = SqliteResolvedLocationStore::new(pool);
    let existing = store.load_existing().await.unwrap();
    let ids: Vec<&str> = existing.iter().map(|e| e.poi_id.as_str()).collect();
    assert_eq!(ids, vec!["yakun-bugis", "yakun-jurong"]);
}

#[tokio::test]
async fn partitions_cover_the_input_once() {
    let dir = tempfile::tempdir().unwrap();
    let pool = Arc::new(create_pool(&file_config(&dir)).unwrap());

    for offset in [0, 2] {
        let config = BatchConfig {
            offset,
            limit: Some(2),
            ..BatchConfig::for_testing()
        };
        runner(&pool, Arc::new(FixedGeocoder::default()), config)
            .run(&items())
            .await
            .unwrap();
    }

    let store = SqliteResolvedLocationStore::new(pool);
    let existing = store.load_existing().await.unwrap();
    let ids: Vec<&str> = existing.iter().map(|e| e.poi_id.as_str()).collect();
    assert_eq!(ids, vec!["p1", "p2", "p3"]);
}

#[tokio::test]
async fn rerun_without_skip_overwrites_rows() {
    let dir = tempfile::tempdir().unwrap();
    let pool = Arc::new(create_pool(&file_config(&dir)).unwrap());

    runner(&pool, Arc::new(FixedGeocoder::default()), BatchConfig::for_testing())
        .run(&items())
        .await
        .unwrap();

    let geocoder = Arc::new(FixedGeocoder::default());
    let config = BatchConfig {
        skip_existing: false,
        ..BatchConfig::for_testing()
    };
    let report = runner(&pool, Arc::clone(&geocoder), config)
        .run(&items())
        .await
        .unwrap();

    assert_eq!(report.resolved, 3);
    assert_eq!(report.skipped, 0);
    assert_eq!(geocoder.calls.load(Ordering::SeqCst), 3);

    let store = SqliteResolvedLocationStore::new(pool);
    assert_eq!(store.load_existing().await.unwrap().len(), 3);
}

//! Rating persistence, aggregation and transfer through the public API.

use std::sync::Arc;

use gridbook::{DriverRating, MemoryStore, RatingStore, StatsError};

fn rating(driver: &str, team: &str, value: f64) -> DriverRating {
    DriverRating {
        driver_id: driver.to_string(),
        driver_name: driver.to_string(),
        constructor_id: team.to_string(),
        constructor_name: team.to_string(),
        rating: value,
    }
}

fn store() -> RatingStore {
    RatingStore::new(Arc::new(MemoryStore::new()))
}

#[test]
fn averages_split_stints_across_a_mid_season_transfer() {
    let store = store();
    store.save_race_ratings("2024", "1", "Bahrain Grand Prix", "2024-03-02",
        vec![rating("sainz", "ferrari", 8.0)]);
    store.save_race_ratings("2024", "2", "Saudi Arabian Grand Prix", "2024-03-09",
        vec![rating("sainz", "ferrari", 10.0)]);
    store.save_race_ratings("2024", "3", "Australian Grand Prix", "2024-03-24",
        vec![rating("sainz", "williams", 6.0)]);

    let averages = store.calculate_averages("2024");

    assert_eq!(averages.len(), 2);
    assert_eq!(averages[0].constructor_id, "ferrari");
    assert_eq!(averages[0].average, 9.0);
    assert_eq!(averages[0].total_races, 2);
    assert_eq!(averages[1].constructor_id, "williams");
    assert_eq!(averages[1].average, 6.0);
    assert_eq!(averages[1].total_races, 1);
}

#[test]
fn quick_ratings_back_fill_when_no_races_are_rated() {
    let store = store();
    store.save_quick_ratings("2024", vec![
        rating("max", "red_bull", 9.5),
        rating("lando", "mclaren", 8.0),
    ]);

    let averages = store.calculate_averages("2024");

    assert_eq!(averages.len(), 2);
    assert_eq!(averages[0].driver_id, "max");
    assert_eq!(averages[0].total_races, 1);
    assert_eq!(averages[0].average, 9.5);
}

#[test]
fn export_import_round_trips_a_season() {
    let source = store();
    source.save_race_ratings("2024", "1", "Bahrain Grand Prix", "2024-03-02",
        vec![rating("max", "red_bull", 9.0), rating("lando", "mclaren", 8.5)]);
    source.save_race_ratings("2024", "2", "Saudi Arabian Grand Prix", "2024-03-09",
        vec![rating("max", "red_bull", 8.0)]);
    source.save_quick_ratings("2024", vec![rating("oscar", "mclaren", 7.5)]);

    let exported = source.export_ratings("2024").unwrap();

    let target = store();
    let summary = target.import_ratings(&exported).unwrap();

    assert_eq!(summary.season, "2024");
    assert_eq!(summary.races_imported, 2);
    assert_eq!(summary.quick_ratings_imported, 1);
    assert!(summary.message.contains("2024"));

    assert_eq!(target.season_ratings("2024"), source.season_ratings("2024"));
    assert_eq!(target.quick_ratings("2024"), source.quick_ratings("2024"));
    assert_eq!(target.calculate_averages("2024"), source.calculate_averages("2024"));
}

#[test]
fn import_replaces_the_season_without_merging() {
    let store = store();
    store.save_race_ratings("2024", "5", "Miami Grand Prix", "2024-05-05",
        vec![rating("checo", "red_bull", 4.5)]);

    let exported = {
        let other = RatingStore::new(Arc::new(MemoryStore::new()));
        other.save_race_ratings("2024", "1", "Bahrain Grand Prix", "2024-03-02",
            vec![rating("max", "red_bull", 9.0)]);
        other.export_ratings("2024").unwrap()
    };
    store.import_ratings(&exported).unwrap();

    let season = store.season_ratings("2024").unwrap();
    assert_eq!(season.races.len(), 1);
    assert_eq!(season.races[0].round, "1");
}

#[test]
fn malformed_import_rejects_without_touching_state() {
    let store = store();
    store.save_race_ratings("2024", "1", "Bahrain Grand Prix", "2024-03-02",
        vec![rating("max", "red_bull", 9.0)]);
    let before = store.season_ratings("2024");

    let err = store.import_ratings(r#"{"notSeason": true}"#).unwrap_err();
    assert!(matches!(err, StatsError::Import { .. }));

    let garbled = store.import_ratings("{ this is not json").unwrap_err();
    assert!(matches!(garbled, StatsError::Import { .. }));

    assert_eq!(store.season_ratings("2024"), before);
}

#[test]
fn clearing_one_season_leaves_the_others() {
    let store = store();
    store.save_race_ratings("2023", "1", "Bahrain Grand Prix", "2023-03-05",
        vec![rating("max", "red_bull", 10.0)]);
    store.save_race_ratings("2024", "1", "Bahrain Grand Prix", "2024-03-02",
        vec![rating("max", "red_bull", 9.0)]);
    store.save_quick_ratings("2023", vec![rating("max", "red_bull", 10.0)]);
    store.save_quick_ratings("2024", vec![rating("max", "red_bull", 9.0)]);

    store.clear_season_ratings("2023");

    assert!(store.season_ratings("2023").is_none());
    assert!(store.quick_ratings("2023").is_empty());
    assert!(store.season_ratings("2024").is_some());
    assert_eq!(store.quick_ratings("2024").len(), 1);
}

#[test]
fn matrix_reports_round_ordered_columns_and_sparse_rows() {
    let store = store();
    store.save_race_ratings("2024", "10", "Belgian Grand Prix", "2024-07-28",
        vec![rating("max", "red_bull", 8.0)]);
    store.save_race_ratings("2024", "2", "Saudi Arabian Grand Prix", "2024-03-09",
        vec![rating("max", "red_bull", 9.0), rating("lando", "mclaren", 7.0)]);

    let matrix = store.race_by_race_matrix("2024");

    let rounds: Vec<u32> = matrix.races.iter().map(|r| r.round).collect();
    assert_eq!(rounds, vec![2, 10]);
    assert_eq!(matrix.races[1].name, "Belgian");
    assert_eq!(matrix.races[1].country_code, Some("BE"));

    let max_row = matrix.drivers.iter().find(|r| r.driver_id == "max").unwrap();
    assert_eq!(max_row.average, 8.5);
    assert_eq!(max_row.ratings_by_round.get(&2), Some(&9.0));
    assert_eq!(max_row.ratings_by_round.get(&10), Some(&8.0));

    let lando_row = matrix.drivers.iter().find(|r| r.driver_id == "lando").unwrap();
    assert_eq!(lando_row.ratings_by_round.len(), 1);
}

#[test]
fn ratings_snap_onto_the_half_point_scale() {
    let store = store();
    store.save_race_ratings("2024", "1", "Bahrain Grand Prix", "2024-03-02", vec![
        rating("max", "red_bull", 0.0),   // unrated -> default 5.0
        rating("lando", "mclaren", 9.3),  // snapped to 9.5
        rating("oscar", "mclaren", 11.0), // clamped to 10.0
    ]);

    let season = store.season_ratings("2024").unwrap();
    let values: Vec<f64> = season.races[0].ratings.iter().map(|r| r.rating).collect();
    assert_eq!(values, vec![5.0, 9.5, 10.0]);
}

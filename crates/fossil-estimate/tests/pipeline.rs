//! End-to-end tests: CSV on disk -> request -> JSON-shaped response.

use std::io::Write;
use std::path::{Path, PathBuf};

use fossil_estimate::{
    CategoryField, EmptyInputMode, EstimateError, PipelineConfig, PipelineContext, Request,
    Response, estimate, handle, train,
};
use fossil_io::IoError;
use fossil_rf::RandomForestConfig;
use tempfile::NamedTempFile;

const HEADER: &str = "Fossil Family,Body part,Original Cost,Adjusted Cost\n";

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn write_csv(content: &str) -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(content.as_bytes()).unwrap();
    f.flush().unwrap();
    f
}

fn fixture_config(n_trees: usize) -> PipelineConfig {
    PipelineConfig::new(fixture_path("transactions.csv"))
        .with_forest(RandomForestConfig::new(n_trees).unwrap())
}

#[test]
fn two_identical_pairs_bracket_the_median() {
    let f = write_csv(&format!(
        "{HEADER}Theropoda,Skull,$900,\"$1,000.00\"\nTheropoda,Skull,$2500,\"$3,000.00\"\n"
    ));
    let response = handle(
        PipelineConfig::new(f.path()),
        &Request::estimate("Theropoda", "Skull"),
    );
    let Response::Success(success) = response else {
        panic!("expected success, got {response:?}");
    };
    assert!((1000.0..=3000.0).contains(&success.band.median));
    assert_eq!(success.available_families, vec!["Theropoda"]);
    assert_eq!(success.available_body_parts, vec!["Skull"]);
}

#[test]
fn bounds_are_ordered_for_every_vocabulary_pair() {
    let ctx = PipelineContext::load(fixture_config(50)).unwrap();
    let ensemble = train(ctx.table(), &RandomForestConfig::new(50).unwrap()).unwrap();
    let vocabulary = ctx.table().vocabulary();
    for family in vocabulary.families() {
        for body_part in vocabulary.body_parts() {
            let band = estimate(&ensemble, family, body_part).unwrap();
            assert!(
                band.lower_bound <= band.median && band.median <= band.upper_bound,
                "{family}/{body_part}: {band:?}"
            );
        }
    }
}

#[test]
fn fixed_seed_is_reproducible() {
    let request = Request::estimate("Theropoda", "Skull");
    let first = handle(fixture_config(40), &request);
    let second = handle(fixture_config(40), &request);
    assert!(!first.is_error());
    assert_eq!(first, second);
}

#[test]
fn thread_count_does_not_change_the_band() {
    let request = Request::estimate("Ceratopsidae", "Skull");
    let run_with = |threads: usize| {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap()
            .install(|| handle(fixture_config(40), &request))
    };
    assert_eq!(run_with(1), run_with(4));
}

#[test]
fn one_tree_gives_degenerate_band() {
    let response = PipelineContext::load(fixture_config(1))
        .unwrap()
        .run(&Request::estimate("Sauropoda", "Femur"))
        .unwrap();
    assert_eq!(response.band.lower_bound, response.band.median);
    assert_eq!(response.band.upper_bound, response.band.median);
}

#[test]
fn expensive_pairs_rank_above_cheap_ones() {
    let ctx = PipelineContext::load(fixture_config(60)).unwrap();
    let skull = ctx.run(&Request::estimate("Theropoda", "Skull")).unwrap();
    let tooth = ctx.run(&Request::estimate("Hadrosauridae", "Tooth")).unwrap();
    assert!(skull.band.median > tooth.band.median);
}

#[test]
fn unknown_family_is_rejected_with_choices() {
    let err = PipelineContext::load(fixture_config(5))
        .unwrap()
        .run(&Request::estimate("Pterosauria", "Skull"))
        .unwrap_err();
    match &err {
        EstimateError::UnknownCategory {
            field, available, ..
        } => {
            assert_eq!(field.name(), "family");
            assert_eq!(*field, CategoryField::Family);
            assert!(available.contains(&"Theropoda".to_string()));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("Pterosauria"));
}

#[test]
fn options_need_no_valid_pair() {
    let response = handle(fixture_config(5), &Request::Options);
    let Response::Success(success) = response else {
        panic!("expected success, got {response:?}");
    };
    assert_eq!(success.band.median, 0.0);
    assert_eq!(success.band.lower_bound, 0.0);
    assert_eq!(success.band.upper_bound, 0.0);
    assert_eq!(success.available_families.len(), 6);
    assert_eq!(success.available_body_parts.len(), 6);
}

#[test]
fn options_only_mode_tolerates_empty_input() {
    let config = fixture_config(5).with_empty_input(EmptyInputMode::OptionsOnly);
    let response = handle(config, &Request::estimate("", "Skull"));
    assert!(!response.is_error());
}

#[test]
fn preview_returns_first_records_in_file_order() {
    let response = PipelineContext::load(fixture_config(5))
        .unwrap()
        .run(&Request::Preview { limit: 3 })
        .unwrap();
    let records = response.records.unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].family, "Theropoda");
    assert_eq!(records[1].family, "Ceratopsidae");
    assert_eq!(records[2].body_part, "Tooth");
}

#[test]
fn nan_bootstrap_fraction_is_an_error_not_a_zero_band() {
    let config = PipelineConfig::new(fixture_path("transactions.csv")).with_forest(
        RandomForestConfig::new(20)
            .unwrap()
            .with_bootstrap_fraction(f64::NAN),
    );
    let response = handle(config, &Request::estimate("Theropoda", "Skull"));
    let Response::Error { error } = response else {
        panic!("expected error, got {response:?}");
    };
    assert!(error.starts_with("model training failed"), "{error}");
}

#[test]
fn unparseable_cost_is_a_data_format_error() {
    let f = write_csv(&format!("{HEADER}Theropoda,Skull,$100,N/A\n"));
    let err = PipelineContext::load(PipelineConfig::new(f.path())).unwrap_err();
    assert!(matches!(
        err,
        EstimateError::DataFormat(IoError::InvalidCost { .. })
    ));
}

#[test]
fn missing_file_message_has_no_path() {
    let response = handle(
        PipelineConfig::new("/definitely/not/here/fossils.csv"),
        &Request::Options,
    );
    let Response::Error { error } = response else {
        panic!("expected error, got {response:?}");
    };
    assert!(!error.contains("/definitely"));
    assert!(!error.contains("fossils.csv"));
}

#[test]
fn success_json_has_expected_keys() {
    let response = handle(fixture_config(10), &Request::estimate("Mosasauridae", "Skull"));
    let json: serde_json::Value = serde_json::from_str(&response.to_json().unwrap()).unwrap();
    let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
    for key in [
        "median",
        "lowerBound",
        "upperBound",
        "availableFamilies",
        "availableBodyParts",
    ] {
        assert!(keys.contains(&key), "missing {key} in {json}");
    }
}

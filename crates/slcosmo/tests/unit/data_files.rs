//! Tests for reading and writing TDC2 sample files on disk.

use std::fs;

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use tempfile::tempdir;

use slcosmo::data::read_tdc2_files;
use slcosmo::{generate_mock_lenses, read_tdc2_file, write_tdc2_file, DataError, MockConfig, SLCosmo};

#[test]
fn written_files_read_back_identically() {
    let dir = tempdir().unwrap();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(5);
    let config = MockConfig {
        quad_fraction: 0.5,
        ..MockConfig::new(6, 20)
    };
    let data = generate_mock_lenses(&config, &mut rng).unwrap();

    let paths: Vec<_> = data
        .lenses
        .iter()
        .enumerate()
        .map(|(k, lens)| {
            write_tdc2_file(lens, &dir.path().join(format!("mock_time_delays_{}.txt", k)))
                .unwrap()
        })
        .collect();

    let loaded = read_tdc2_files(&paths).unwrap();
    assert_eq!(loaded.len(), data.lenses.len());
    for (ensemble, original) in loaded.iter().zip(&data.lenses) {
        assert_eq!(&ensemble.lens, original);
        assert!(ensemble.source.is_some());
    }
}

#[test]
fn file_and_memory_pipelines_agree() {
    let dir = tempdir().unwrap();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(6);
    let data = generate_mock_lenses(&MockConfig::new(5, 30), &mut rng).unwrap();

    let paths: Vec<_> = data
        .lenses
        .iter()
        .enumerate()
        .map(|(k, lens)| write_tdc2_file(lens, &dir.path().join(format!("lens_{}.txt", k))).unwrap())
        .collect();

    let from_files = SLCosmo::new()
        .num_prior_samples(200)
        .load_lenses(&paths)
        .unwrap()
        .infer()
        .unwrap();
    let from_memory = SLCosmo::new()
        .num_prior_samples(200)
        .with_lenses(data.lenses)
        .infer()
        .unwrap();

    assert_eq!(from_files.weights, from_memory.weights);
    assert_eq!(from_files.estimate, from_memory.estimate);
    assert_eq!(from_files.true_h0, None);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let err = read_tdc2_file(&dir.path().join("nope.txt")).unwrap_err();
    assert!(matches!(err, DataError::Io(_)), "{}", err);
}

#[test]
fn inconsistent_header_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.txt");
    // Quad header but only the AB pair measured.
    fs::write(
        &path,
        "# Nim: 4\n# Q: 400000\n# DeltaFP_AB: 1000\n# DeltaFP_AB_err: 40\n20 21 22\n",
    )
    .unwrap();

    let err = read_tdc2_file(&path).unwrap_err();
    assert!(
        matches!(err, DataError::MissingField(ref f) if f == "DeltaFP_AC"),
        "{}",
        err
    );
}

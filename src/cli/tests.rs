use clap::Parser;
use indoc::indoc;
use tempfile::{tempdir, TempDir};

use super::*;
use crate::offsets::InputSpecError;

/// A directory standing in for a MIRIAD dataset.
fn dataset(dir: &TempDir) -> PathBuf {
    let dataset = dir.path().join("c1234.uv");
    std::fs::create_dir_all(&dataset).unwrap();
    dataset
}

fn one_source(dataset: PathBuf) -> Args {
    Args {
        dataset,
        ra: Some(vec!["19:39:25.03".to_string()]),
        dec: Some(vec!["-63:42:45.6".to_string()]),
        flux: Some(vec![1.0]),
        size: Some(vec!["10,5,45".to_string()]),
        alpha: Some(vec![-0.7]),
        ..Default::default()
    }
}

#[test]
fn test_parse_repeated_sources() {
    let args = Args::try_parse_from([
        "source_adder",
        "c1234.uv",
        "--ra",
        "19:39:25.03",
        "--dec",
        "-63:42:45.6",
        "--flux",
        "1.5",
        "--size",
        "10,5,45",
        "--alpha",
        "-0.7",
        "--ra",
        "19:40:00.0",
        "--dec",
        "-63:40:00",
        "--flux",
        "0.5",
        "--size",
        "0,0,0",
        "--alpha",
        "0",
        "--test",
        "-vv",
    ])
    .unwrap();
    assert_eq!(args.dataset, PathBuf::from("c1234.uv"));
    assert_eq!(args.args_file, None);
    assert_eq!(
        args.ra,
        Some(vec!["19:39:25.03".to_string(), "19:40:00.0".to_string()])
    );
    assert_eq!(
        args.dec,
        Some(vec!["-63:42:45.6".to_string(), "-63:40:00".to_string()])
    );
    assert_eq!(args.flux, Some(vec![1.5, 0.5]));
    assert_eq!(args.alpha, Some(vec![-0.7, 0.0]));
    assert!(args.test);
    assert!(!args.five_second_rounding);
    assert_eq!(args.verbosity, 2);
}

#[test]
fn test_into_params_defaults() {
    let dir = tempdir().unwrap();
    let dataset = dataset(&dir);
    let params = one_source(dataset.clone()).into_params().unwrap();
    assert_eq!(params.dataset, dataset);
    assert_eq!(params.output, dir.path().join("c1234.uv.sourceadd"));
    assert_eq!(params.work_dir, dir.path());
    assert!(!params.test_mode);
    assert!(!params.five_second_rounding);
    assert!(params.progress_bars);
    match params.sources {
        SourceSelection::Injected(specs) => {
            assert_eq!(specs.len(), 1);
            assert_eq!((specs[0].bmaj, specs[0].bmin, specs[0].bpa), (10.0, 5.0, 45.0));
        }
        SourceSelection::File(_) => panic!("expected injected sources"),
    }
}

#[test]
fn test_dataset_must_exist() {
    let dir = tempdir().unwrap();
    let result = one_source(dir.path().join("nothing_here.uv")).into_params();
    assert!(matches!(result, Err(CliError::NoDataset(_))));
}

#[test]
fn test_source_file() {
    let dir = tempdir().unwrap();
    let dataset = dataset(&dir);
    let source_file = dir.path().join("sources.txt");

    let args = Args {
        dataset: dataset.clone(),
        source_file: Some(source_file.clone()),
        ..Default::default()
    };
    let result = args.clone().into_params();
    assert!(matches!(result, Err(CliError::SourceFileMissing(_))));

    std::fs::write(&source_file, "1,0,0,0,0,0,0,0,0,0\n").unwrap();
    let params = args.into_params().unwrap();
    assert_eq!(params.sources, SourceSelection::File(source_file.clone()));

    // A source file and new source parameters don't mix.
    let args = Args {
        source_file: Some(source_file),
        ..one_source(dataset)
    };
    assert!(matches!(
        args.into_params(),
        Err(CliError::SourceFileAndParams)
    ));
}

#[test]
fn test_incomplete_source_parameters() {
    let dir = tempdir().unwrap();
    let args = Args {
        alpha: None,
        ..one_source(dataset(&dir))
    };
    assert!(matches!(
        args.into_params(),
        Err(CliError::NotEnoughSourceInfo)
    ));

    let args = Args {
        dataset: PathBuf::new(),
        ..Default::default()
    };
    assert!(matches!(args.into_params(), Err(CliError::NoDataset(_))));
}

#[test]
fn test_mismatched_source_parameters() {
    let dir = tempdir().unwrap();
    let args = Args {
        flux: Some(vec![1.0, 2.0]),
        ..one_source(dataset(&dir))
    };
    assert!(matches!(
        args.into_params(),
        Err(CliError::InputSpec(InputSpecError::MismatchedCounts {
            ra: 1,
            flux: 2,
            ..
        }))
    ));

    let args = Args {
        size: Some(vec!["10,5".to_string()]),
        ..one_source(dataset(&dir))
    };
    assert!(matches!(
        args.into_params(),
        Err(CliError::InputSpec(InputSpecError::BadSize { index: 0, .. }))
    ));
}

#[test]
fn test_toml_arguments_file() {
    let dir = tempdir().unwrap();
    let dataset = dataset(&dir);
    let arg_file = dir.path().join("args.toml");
    std::fs::write(
        &arg_file,
        indoc! {r#"
            ra = ["19:39:25.03"]
            dec = ["-63:42:45.6"]
            flux = [1.0]
            size = ["10,5,45"]
            alpha = [-0.7]
            out = "from_file.uv"
            five_second_rounding = true
        "#},
    )
    .unwrap();

    let args = Args {
        dataset: dataset.clone(),
        args_file: Some(arg_file),
        out: Some(PathBuf::from("from_cli.uv")),
        ..Default::default()
    }
    .merge()
    .unwrap();
    assert_eq!(args.dataset, dataset);
    assert_eq!(args.args_file, None);
    // The command line wins.
    assert_eq!(args.out, Some(PathBuf::from("from_cli.uv")));
    assert_eq!(args.ra, Some(vec!["19:39:25.03".to_string()]));
    assert_eq!(args.alpha, Some(vec![-0.7]));
    assert!(args.five_second_rounding);
    assert!(!args.test);

    let params = args.into_params().unwrap();
    assert!(params.five_second_rounding);
    assert_eq!(params.output, PathBuf::from("from_cli.uv"));
}

#[test]
fn test_json_arguments_file() {
    let dir = tempdir().unwrap();
    let arg_file = dir.path().join("args.json");
    std::fs::write(
        &arg_file,
        r#"{"source_file": "sources.txt", "test": true, "work_dir": "/scratch"}"#,
    )
    .unwrap();
    let args = Args {
        args_file: Some(arg_file),
        ..Default::default()
    }
    .merge()
    .unwrap();
    assert_eq!(args.source_file, Some(PathBuf::from("sources.txt")));
    assert_eq!(args.work_dir, Some(PathBuf::from("/scratch")));
    assert!(args.test);
}

#[test]
fn test_bad_arguments_files() {
    let dir = tempdir().unwrap();

    let arg_file = dir.path().join("args.yaml");
    std::fs::write(&arg_file, "test: true\n").unwrap();
    let result = Args {
        args_file: Some(arg_file),
        ..Default::default()
    }
    .merge();
    assert!(
        matches!(&result, Err(CliError::ArgFileType { valid, .. }) if valid == "toml, json"),
        "{result:?}"
    );

    let arg_file = dir.path().join("args.toml");
    std::fs::write(&arg_file, "flux = \"lots\"\n").unwrap();
    let result = Args {
        args_file: Some(arg_file),
        ..Default::default()
    }
    .merge();
    assert!(matches!(
        result,
        Err(CliError::ArgFileDecode { kind: "toml", .. })
    ));
}

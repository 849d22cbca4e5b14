use chart_golden::cli::Args;
use chart_golden::config::RunOptions;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

fn make_args(args: &[&str]) -> Vec<OsString> {
    let mut res = vec![OsString::from("chart-golden")];
    res.extend(args.iter().map(OsString::from));
    res
}

#[test]
fn test_basic_args() {
    let args = make_args(&["./charts/app"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.chart, PathBuf::from("./charts/app"));
    assert_eq!(parsed.tests_dir, PathBuf::from("tests"));
    assert_eq!(parsed.helm, PathBuf::from("helm"));
    assert_eq!(parsed.release, "myrel");
    assert_eq!(parsed.namespace, "jx");
    assert!(!parsed.regenerate);
    assert!(!parsed.fail_fast);
    assert!(!parsed.verbose);
}

#[test]
fn test_all_flags() {
    let args = make_args(&[
        "--regenerate",
        "--fail-fast",
        "--keep-output",
        "--verbose",
        "--helm",
        "/usr/local/bin/helm3",
        "--release",
        "demo",
        "--namespace",
        "apps",
        "./charts/app",
        "./charts/app/unit",
    ]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert!(parsed.regenerate);
    assert!(parsed.fail_fast);
    assert!(parsed.keep_output);
    assert!(parsed.verbose);
    assert_eq!(parsed.tests_dir, PathBuf::from("./charts/app/unit"));

    let helm = parsed.helm_options();
    assert_eq!(helm.binary, PathBuf::from("/usr/local/bin/helm3"));
    assert_eq!(helm.release, "demo");
    assert_eq!(helm.namespace, "apps");
}

#[test]
fn test_short_flags() {
    let args = make_args(&["-v", "./charts/app"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert!(parsed.verbose);
}

#[test]
fn test_regenerate_from_environment() {
    let parsed = Args::try_parse_from(make_args(&["./charts/app"])).unwrap();

    let options = parsed.run_options(RunOptions::from_env_value(Some("true")));
    assert!(options.regenerate);

    let options = parsed.run_options(RunOptions::from_env_value(None));
    assert!(!options.regenerate);
}

#[test]
fn test_missing_args() {
    let args = make_args(&[]);
    assert!(Args::try_parse_from(args).is_err());
}

#[test]
fn test_too_many_args() {
    let args = make_args(&["./charts/app", "./tests", "extra"]);
    assert!(Args::try_parse_from(args).is_err());
}

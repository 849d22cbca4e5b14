//! chart-golden's main application entry point.
//! Handles command-line argument parsing and runs every test case of a chart.

use chart_golden::{
    cli::{get_args, Args},
    config::RunOptions,
    error::{default_error_handler, Result},
    helm::HelmRunner,
    logger::init_logger,
    test_case::{assert_chart_path_exists, UnitTester},
};

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    match run(args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => default_error_handler(err),
    }
}

/// Main application logic execution.
///
/// # Returns
/// * `Result<bool>` - Whether every test case passed
///
/// # Flow
/// 1. Resolves the chart directory
/// 2. Loads the test cases of the tests directory
/// 3. Runs them with helm, comparing or regenerating
/// 4. Prints a report per test case and a summary
fn run(args: Args) -> Result<bool> {
    let options = args.run_options(RunOptions::from_env());
    let helm = args.helm_options();
    let runner = HelmRunner::new(helm.clone());

    let chart = assert_chart_path_exists(&args.chart)?;
    let tester = UnitTester::new()?;
    let tests = tester.load_tests(&chart, &args.tests_dir)?;
    let reports = tester.run_tests(&runner, &tests, &helm, &options);

    for report in &reports {
        print!("{}", report);
    }
    let failed = reports.iter().filter(|r| !r.passed()).count();
    println!(
        "\ntest result: {}. {} passed; {} failed",
        if failed == 0 { "ok" } else { "FAILED" },
        reports.len() - failed,
        failed
    );

    if args.keep_output {
        println!("Generated output kept in {}", tester.keep().display());
    }
    Ok(failed == 0)
}

use std::path::PathBuf;

use clap::Parser;

use fleetseed_cli::{Cli, CliError, StoreKind, Targets, Task};

fn parse(args: &[&str]) -> Cli {
    let mut argv = vec!["fleetseed"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).expect("arguments parse")
}

#[test]
fn default_deal_count_is_a_fifth_of_cars() {
    let cli = parse(&["-r", "10", "--populate-cars", "--populate-deals"]);
    let Task::Populate(plan) = cli.task(7).expect("task") else {
        panic!("expected populate task");
    };
    assert_eq!(plan.cars, 10);
    assert_eq!(plan.deals, 2);
    assert_eq!(plan.seed, 7);
    assert_eq!(
        plan.targets,
        Targets {
            cars: true,
            categories: false,
            deals: true,
        }
    );
}

#[test]
fn explicit_zero_deals_is_respected() {
    let cli = parse(&["--random-cars", "25", "--random-deals", "0", "--seed", "99"]);
    let Task::Populate(plan) = cli.task(7).expect("task") else {
        panic!("expected populate task");
    };
    assert_eq!(plan.deals, 0);
    assert_eq!(plan.seed, 99);
}

#[test]
fn deals_without_cars_are_rejected() {
    let cli = parse(&["-d", "3"]);
    let err = cli.task(1).expect_err("must fail");
    assert!(matches!(err, CliError::InvalidConfig(_)));
}

#[test]
fn cleanup_short_circuits_population() {
    let cli = parse(&["--cleanup", "deals", "-r", "5", "--populate-cars"]);
    assert_eq!(cli.task(1).expect("task"), Task::Cleanup("deals".to_string()));
}

#[test]
fn export_uses_out_dir() {
    let cli = parse(&["--export", "cars", "--out-dir", "dumps"]);
    assert_eq!(
        cli.task(1).expect("task"),
        Task::Export {
            collection: "cars".to_string(),
            out_dir: PathBuf::from("dumps"),
        }
    );
}

#[test]
fn cleanup_and_export_conflict() {
    let result = Cli::try_parse_from(["fleetseed", "--cleanup", "cars", "--export", "cars"]);
    assert!(result.is_err());
}

#[test]
fn rejects_nested_collection_names() {
    let cli = parse(&["--cleanup", "cars/car1"]);
    assert!(matches!(cli.task(1), Err(CliError::InvalidConfig(_))));
}

#[test]
fn defaults_are_applied() {
    let cli = parse(&[]);
    assert_eq!(cli.random_cars, 0);
    assert_eq!(cli.store, StoreKind::Firestore);
    assert_eq!(cli.assets_dir, PathBuf::from("assets/categories"));
    assert_eq!(cli.out_dir, PathBuf::from("."));
    assert!(!cli.dry_run);
    assert!(!cli.no_images);
}

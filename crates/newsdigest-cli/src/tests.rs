use super::*;

#[test]
fn parses_run_with_defaults() {
    let cli = Cli::try_parse_from(["newsdigest", "run"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Run {
            ref companies,
            format: OutputFormat::Text,
            output: None,
        } if companies.is_empty()
    ));
}

#[test]
fn parses_repeated_company_flags_in_order() {
    let cli = Cli::try_parse_from([
        "newsdigest",
        "run",
        "--company",
        "BASF",
        "--company",
        "Evonik",
    ])
    .unwrap();
    let Commands::Run { companies, .. } = cli.command else {
        panic!("expected run command");
    };
    assert_eq!(companies, vec!["BASF", "Evonik"]);
}

#[test]
fn parses_json_format_and_output_path() {
    let cli = Cli::try_parse_from([
        "newsdigest",
        "run",
        "--format",
        "json",
        "--output",
        "digest.json",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Commands::Run {
            format: OutputFormat::Json,
            output: Some(ref p),
            ..
        } if p == &PathBuf::from("digest.json")
    ));
}

#[test]
fn rejects_unknown_format() {
    assert!(Cli::try_parse_from(["newsdigest", "run", "--format", "pdf"]).is_err());
}

#[test]
fn parses_config_command() {
    let cli = Cli::try_parse_from(["newsdigest", "config"]).unwrap();
    assert!(matches!(cli.command, Commands::Config));
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["newsdigest"]).is_err());
}

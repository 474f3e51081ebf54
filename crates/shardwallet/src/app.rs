use clap::{Arg, ArgAction, Command, value_parser};

fn fixture_arg() -> Arg {
    Arg::new("fixture")
        .long("fixture")
        .short('f')
        .help("Chain fixture (JSON) describing accounts, shardwallets and oracles")
        .required(true)
}

fn shardwallet_arg() -> Arg {
    Arg::new("shardwallet")
        .long("shardwallet")
        .help("Shardwallet address (overrides config)")
}

fn shard_arg() -> Arg {
    Arg::new("shard")
        .long("shard")
        .short('s')
        .help("Shard id (default: the lowest owned shard)")
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .help("Output in JSON format")
        .action(ArgAction::SetTrue)
}

pub fn build_cli() -> Command {
    Command::new("shardwallet")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect and claim shardwallet shards")
        .long_about("A shardwallet pools funds and splits them among the holders of its shard tokens. This tool lists the shards an account owns, previews what each would pay out in ETH and WETH with a USD estimate, and claims funds.")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("shards")
                .about("List the shards owned by the connected account")
                .arg(fixture_arg())
                .arg(shardwallet_arg())
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("balances")
                .about("Show claimable balances of a shard with USD estimates")
                .arg(fixture_arg())
                .arg(shardwallet_arg())
                .arg(shard_arg())
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("price")
                .about("Show the ETH/USD price used for conversions")
                .arg(fixture_arg())
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("claim")
                .about("Claim a percentage of a shard's balances")
                .arg(fixture_arg())
                .arg(shardwallet_arg())
                .arg(shard_arg())
                .arg(
                    Arg::new("percent")
                        .long("percent")
                        .short('p')
                        .help("Percentage of each balance to claim (0-100)")
                        .value_parser(value_parser!(u32).range(0..=100))
                        .default_value("100"),
                ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_build() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_cli_requires_subcommand() {
        let result = build_cli().try_get_matches_from(vec!["shardwallet"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_balances_args() {
        let matches = build_cli()
            .try_get_matches_from(vec![
                "shardwallet",
                "-v",
                "balances",
                "--fixture",
                "chain.json",
                "--shard",
                "10",
                "--json",
            ])
            .unwrap();
        assert!(matches.get_flag("verbose"));
        let sub = matches.subcommand_matches("balances").unwrap();
        assert_eq!(sub.get_one::<String>("fixture").unwrap(), "chain.json");
        assert_eq!(sub.get_one::<String>("shard").unwrap(), "10");
        assert!(sub.get_flag("json"));
    }

    #[test]
    fn test_cli_fixture_required() {
        let result = build_cli().try_get_matches_from(vec!["shardwallet", "shards"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_claim_percent() {
        let matches = build_cli()
            .try_get_matches_from(vec!["shardwallet", "claim", "-f", "chain.json"])
            .unwrap();
        let sub = matches.subcommand_matches("claim").unwrap();
        assert_eq!(*sub.get_one::<u32>("percent").unwrap(), 100);

        let result = build_cli().try_get_matches_from(vec![
            "shardwallet",
            "claim",
            "-f",
            "chain.json",
            "--percent",
            "101",
        ]);
        assert!(result.is_err());
    }
}

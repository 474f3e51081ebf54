use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::ArgMatches;
use serde::Serialize;
use tracing::{error, info, warn};

use shardwallet_core::chain::{ChainFixture, MemoryChain};
use shardwallet_core::claims::BalancesSnapshot;
use shardwallet_core::config::ShardwalletConfig;
use shardwallet_core::display::{self, Conversion};
use shardwallet_core::errors::ShardwalletError;
use shardwallet_core::events;
use shardwallet_core::price::PriceSnapshot;
use shardwallet_core::state::{FetchFailure, FetchStage, ShardwalletStore};
use shardwallet_core::types::{Address, ClaimFraction, Currency, ShardId};
use shardwallet_core::wallet::{MemoryWallet, WalletSession};

use crate::progress::Progress;
use crate::table::{BalanceRow, TableFormatter};

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Report a failure to the user and the log, and hand it back for `?`.
fn fail<E: ShardwalletError>(context: &str, error: E) -> Box<dyn std::error::Error> {
    eprintln!("❌ {}: {}", context, error);
    events::log_app_error(&error);
    Box::new(error)
}

/// Load configuration with warning on errors.
///
/// Falls back to defaults if config loading fails, but notifies the user via:
/// - stderr message for immediate visibility
/// - structured log event `cli.config.load_failed` for debugging
fn load_config_with_warning() -> ShardwalletConfig {
    match ShardwalletConfig::load_hierarchy() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Could not load config: {}. Using defaults.\n\
                 Tip: Check ~/.shardwallet/config.toml and ./.shardwallet/config.toml for syntax errors.",
                e
            );
            warn!(
                event = "cli.config.load_failed",
                error = %e,
                "Config load failed, using defaults"
            );
            ShardwalletConfig::default()
        }
    }
}

fn parse_shard(matches: &ArgMatches) -> Result<Option<ShardId>, Box<dyn std::error::Error>> {
    matches
        .try_get_one::<String>("shard")
        .ok()
        .flatten()
        .map(|s| s.parse::<ShardId>().map_err(|e| fail("Invalid --shard", e)))
        .transpose()
}

/// A store connected to the in-memory chain described by `--fixture`.
struct FixtureSession {
    path: PathBuf,
    chain: Arc<MemoryChain>,
    config: ShardwalletConfig,
    account: Address,
    store: ShardwalletStore,
    progress: Progress,
}

impl FixtureSession {
    async fn open(matches: &ArgMatches) -> Result<Self, Box<dyn std::error::Error>> {
        let path = PathBuf::from(
            matches
                .get_one::<String>("fixture")
                .ok_or("--fixture is required")?,
        );
        let fixture = ChainFixture::load(&path).map_err(|e| fail("Failed to load fixture", e))?;

        let mut config = load_config_with_warning();
        if let Some(address) = matches.try_get_one::<String>("shardwallet").ok().flatten() {
            let address = address
                .parse::<Address>()
                .map_err(|e| fail("Invalid --shardwallet", e))?;
            config.shardwallet.address = Some(address);
        }

        let chain = Arc::new(MemoryChain::new(fixture));
        let wallet = WalletSession::new(Some(Arc::new(MemoryWallet::new(chain.clone()))));
        let store = ShardwalletStore::new(wallet.clone(), &config);
        let progress = Progress::new(&store);

        if !wallet.connect().await {
            eprintln!("❌ Wallet connection failed");
            return Err("Wallet connection failed".into());
        }
        let Some(account) = wallet.state().account else {
            eprintln!("❌ The fixture exposes no accounts");
            return Err("No account available".into());
        };

        info!(
            event = "cli.session.open_completed",
            account = %account,
            shardwallet = %config.shardwallet_address(),
            chain_id = chain.chain_id()
        );

        Ok(Self {
            path,
            chain,
            config,
            account,
            store,
            progress,
        })
    }

    fn shardwallet(&self) -> Address {
        self.config.shardwallet_address()
    }

    /// Wait for shard enumeration. A failed enumeration is an error.
    async fn load_directory(&mut self) -> CommandResult {
        self.progress.wait_until(Progress::directory_settled).await?;
        if let Some(failure) = self.progress.failure(FetchStage::Shards) {
            eprintln!("❌ Failed to list shards: {}", failure.message);
            error!(event = "cli.shards_failed", error = %failure.message);
            return Err(failure.message.clone().into());
        }
        Ok(())
    }

    /// Wait for the preview of `shard`, or of the default selection.
    ///
    /// Returns the previewed shard, `None` when the account owns none.
    async fn load_balances(
        &mut self,
        shard: Option<ShardId>,
    ) -> Result<Option<ShardId>, Box<dyn std::error::Error>> {
        self.load_directory().await?;

        let selected = self.store.view().selected_shard;
        self.progress
            .wait_until(|p| p.balances_settled(selected))
            .await?;

        let Some(wanted) = shard else {
            return Ok(selected);
        };
        if selected != Some(wanted) {
            self.progress.reset_balances();
            self.store
                .select_shard(wanted)
                .map_err(|e| fail("Cannot select shard", e))?;
            self.progress
                .wait_until(|p| p.balances_settled(Some(wanted)))
                .await?;
        }
        Ok(Some(wanted))
    }
}

pub fn run_command(matches: &ArgMatches) -> CommandResult {
    events::log_app_startup(matches.subcommand_name().unwrap_or_default());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(async {
        match matches.subcommand() {
            Some(("shards", sub_matches)) => handle_shards_command(sub_matches).await,
            Some(("balances", sub_matches)) => handle_balances_command(sub_matches).await,
            Some(("price", sub_matches)) => handle_price_command(sub_matches).await,
            Some(("claim", sub_matches)) => handle_claim_command(sub_matches).await,
            _ => {
                error!(event = "cli.command_unknown");
                Err("Unknown command".into())
            }
        }
    });

    events::log_app_shutdown();
    result
}

async fn handle_shards_command(matches: &ArgMatches) -> CommandResult {
    let json_output = matches.get_flag("json");

    info!(event = "cli.shards_started", json_output = json_output);

    let mut session = FixtureSession::open(matches).await?;
    session.load_directory().await?;
    let view = session.store.view();

    if json_output {
        #[derive(Serialize)]
        struct ShardsResponse {
            account: Address,
            shardwallet: Address,
            shard_ids: Vec<ShardId>,
            selected_shard: Option<ShardId>,
        }

        let response = ShardsResponse {
            account: session.account,
            shardwallet: session.shardwallet(),
            shard_ids: view.shard_ids.clone(),
            selected_shard: view.selected_shard,
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else if view.shard_ids.is_empty() {
        println!(
            "No shards owned by {} in {}.",
            session.account,
            session.shardwallet()
        );
    } else {
        println!(
            "Shards owned by {} in {}:",
            session.account,
            session.shardwallet()
        );
        for id in &view.shard_ids {
            let marker = if view.selected_shard == Some(*id) { "*" } else { " " };
            println!("{} {}", marker, id);
        }
    }

    info!(event = "cli.shards_completed", count = view.shard_ids.len());

    Ok(())
}

#[derive(Serialize)]
struct BalanceEntry {
    currency: &'static str,
    address: Address,
    amount: String,
    formatted: String,
    usd: Option<String>,
}

fn balance_entries(
    balances: &BalancesSnapshot,
    currencies: &[Currency],
    price: Option<&PriceSnapshot>,
) -> Vec<BalanceEntry> {
    currencies
        .iter()
        .filter_map(|currency| {
            let amount = balances.get(&currency.address)?;
            let usd = match display::convert_balance(amount, currency, price) {
                Conversion::Usd(cents) => Some(display::format_usd(cents)),
                Conversion::Unavailable | Conversion::NotPriced => None,
            };
            Some(BalanceEntry {
                currency: currency.name,
                address: currency.address,
                amount: amount.to_string(),
                formatted: display::format_units(amount, currency.decimals),
                usd,
            })
        })
        .collect()
}

fn price_line(price: Option<&PriceSnapshot>, failure: Option<&FetchFailure>) -> String {
    match (price, failure) {
        (Some(price), _) => display::price_description(price),
        (None, Some(failure)) => format!("USD conversions unavailable: {}", failure.message),
        (None, None) => "USD conversions unavailable.".to_string(),
    }
}

async fn handle_balances_command(matches: &ArgMatches) -> CommandResult {
    let json_output = matches.get_flag("json");
    let shard = parse_shard(matches)?;

    info!(
        event = "cli.balances_started",
        shard = ?shard,
        json_output = json_output
    );

    let mut session = FixtureSession::open(matches).await?;
    let selected = session.load_balances(shard).await?;
    session.progress.wait_until(Progress::price_settled).await?;

    let Some(shard) = selected else {
        if json_output {
            println!("null");
        } else {
            println!(
                "No shards owned by {} in {}.",
                session.account,
                session.shardwallet()
            );
        }
        return Ok(());
    };

    if let Some(failure) = session.progress.failure(FetchStage::Balances) {
        eprintln!("❌ Failed to load balances of shard {}: {}", shard, failure.message);
        error!(event = "cli.balances_failed", shard = %shard, error = %failure.message);
        return Err(failure.message.clone().into());
    }

    let view = session.store.view();
    let balances = view
        .balances
        .as_ref()
        .ok_or("Balances are not available")?;
    let price = view.price.as_ref();
    let entries = balance_entries(balances, session.store.currencies(), price);
    let total = display::claim_preview(
        balances,
        session.store.currencies(),
        ClaimFraction::FULL,
        price,
    );

    if json_output {
        #[derive(Serialize)]
        struct BalancesResponse<'a> {
            shardwallet: Address,
            account: Address,
            shard: ShardId,
            balances: Vec<BalanceEntry>,
            total_usd: Option<String>,
            price: Option<&'a PriceSnapshot>,
            price_error: Option<&'a str>,
        }

        let response = BalancesResponse {
            shardwallet: session.shardwallet(),
            account: session.account,
            shard,
            balances: entries,
            total_usd: total.cents().map(display::format_usd),
            price,
            price_error: session
                .progress
                .failure(FetchStage::Price)
                .map(|f| f.message.as_str()),
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!("Shard {} in {}:", shard, session.shardwallet());
        let rows: Vec<BalanceRow> = entries
            .into_iter()
            .map(|e| BalanceRow {
                currency: e.currency.to_string(),
                amount: e.formatted,
                usd: e.usd.unwrap_or_else(|| "-".to_string()),
            })
            .collect();
        TableFormatter::new(&rows).print_table(&rows);
        if let Conversion::Usd(_) = total {
            println!("Total claimable: {}", total);
        }
        println!(
            "{}",
            price_line(price, session.progress.failure(FetchStage::Price))
        );
    }

    info!(event = "cli.balances_completed", shard = %shard);

    Ok(())
}

async fn handle_price_command(matches: &ArgMatches) -> CommandResult {
    let json_output = matches.get_flag("json");

    info!(event = "cli.price_started", json_output = json_output);

    let mut session = FixtureSession::open(matches).await?;
    session.progress.wait_until(Progress::price_settled).await?;

    if let Some(failure) = session.progress.failure(FetchStage::Price) {
        eprintln!("❌ Failed to read the ETH/USD price: {}", failure.message);
        error!(event = "cli.price_failed", error = %failure.message);
        return Err(failure.message.clone().into());
    }
    let price = session.store.view().price.ok_or("Price is not available")?;

    let now = Utc::now();
    let max_age = session.config.max_price_age();
    let stale = price.is_stale(now, max_age);
    let age_secs = price.age(now).num_seconds();
    let usd = display::unit_price(&price);

    if json_output {
        #[derive(Serialize)]
        struct PriceResponse {
            oracle: Address,
            rate: String,
            decimals: u8,
            updated_at: DateTime<Utc>,
            usd: String,
            age_secs: i64,
            stale: bool,
        }

        let response = PriceResponse {
            oracle: session.config.oracle_address(),
            rate: price.rate.to_string(),
            decimals: price.decimals,
            updated_at: price.updated_at,
            usd: usd.to_string(),
            age_secs,
            stale,
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!("ETH/USD: {}", usd);
        println!(
            "Updated: {} ({}s ago)",
            price.updated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            age_secs
        );
    }

    if stale {
        eprintln!(
            "Warning: the price answer is {}s old (limit {}s). Conversions may be inaccurate.",
            age_secs,
            max_age.as_secs()
        );
        warn!(
            event = "cli.price_stale",
            age_secs = age_secs,
            max_age_secs = max_age.as_secs()
        );
    }

    info!(event = "cli.price_completed", stale = stale);

    Ok(())
}

async fn handle_claim_command(matches: &ArgMatches) -> CommandResult {
    let percent = *matches
        .get_one::<u32>("percent")
        .ok_or("--percent is required")?;
    let fraction = ClaimFraction::from_percent(percent).map_err(|e| fail("Invalid --percent", e))?;
    let shard = parse_shard(matches)?;

    info!(
        event = "cli.claim_started",
        shard = ?shard,
        fraction_micros = fraction.micros()
    );

    let mut session = FixtureSession::open(matches).await?;
    let Some(shard) = session.load_balances(shard).await? else {
        eprintln!(
            "❌ No shards owned by {} in {}",
            session.account,
            session.shardwallet()
        );
        return Err("No shard to claim from".into());
    };
    session.progress.wait_until(Progress::price_settled).await?;

    let view = session.store.view();
    let estimate = view
        .balances
        .as_ref()
        .map(|balances| {
            display::claim_preview(
                balances,
                session.store.currencies(),
                fraction,
                view.price.as_ref(),
            )
        })
        .unwrap_or(Conversion::Unavailable);
    match estimate {
        Conversion::Usd(_) => println!("Claiming {} of shard {} (~{})", fraction, shard, estimate),
        Conversion::Unavailable | Conversion::NotPriced => {
            println!("Claiming {} of shard {}", fraction, shard)
        }
    }

    let receipt = session
        .store
        .claim(fraction)
        .await
        .map_err(|e| fail("Claim failed", e))?;

    println!("✅ Claim confirmed in block {}", receipt.block_number);
    println!("   Transaction: {}", receipt.tx_hash);

    session
        .chain
        .fixture()
        .save(&session.path)
        .map_err(|e| fail("Failed to save fixture", e))?;

    info!(
        event = "cli.claim_completed",
        shard = %shard,
        tx_hash = %receipt.tx_hash,
        block_number = receipt.block_number
    );

    Ok(())
}

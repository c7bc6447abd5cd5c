use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use safe_harbor::config::{self, Config};
use safe_harbor::infrastructure::abi::parse_address;
use safe_harbor::infrastructure::{create_provider, EthereumProvider, ProviderConfig};
use safe_harbor::modules::adopters::scan_adopters;
use safe_harbor::modules::export;
use safe_harbor::{AgreementQuery, QueryOutcome, QueryTarget};

#[derive(Debug, Parser)]
#[command(
    name = "safe-harbor",
    version,
    about = "Check Safe Harbor V2 adoption and agreement details"
)]
struct Args {
    /// <RPC_URL> <AGREEMENT_ADDRESS>; omit both for the demonstration run
    #[arg(value_name = "ARGS")]
    positional: Vec<String>,

    /// Treat the address as a protocol and resolve its agreement through this registry
    #[arg(long, value_name = "REGISTRY")]
    registry: Option<String>,

    /// List historical adopters from the registry (takes only <RPC_URL>)
    #[arg(long)]
    adopters: bool,

    /// First block of the adopter log scan
    #[arg(long, default_value_t = 0)]
    from_block: u64,

    /// Print JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Exit status for malformed invocations
const USAGE_EXIT: u8 = 2;

/// What an invocation asks for
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Demo,
    Query {
        rpc: &'a str,
        address: &'a str,
        registry: Option<&'a str>,
    },
    Adopters {
        rpc: &'a str,
        registry: Option<&'a str>,
    },
}

impl Args {
    /// `None` when the flags and positional arguments do not form a valid
    /// invocation
    fn command(&self) -> Option<Command<'_>> {
        let registry = self.registry.as_deref();
        match (self.adopters, self.positional.as_slice()) {
            (true, [rpc]) => Some(Command::Adopters {
                rpc: rpc.as_str(),
                registry,
            }),
            (false, []) if registry.is_none() => Some(Command::Demo),
            (false, [rpc, address]) => Some(Command::Query {
                rpc: rpc.as_str(),
                address: address.as_str(),
                registry,
            }),
            _ => None,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let Some(command) = args.command() else {
        print_usage();
        return ExitCode::from(USAGE_EXIT);
    };
    let config = config::load();

    let result = match command {
        Command::Adopters { rpc, registry } => {
            let registry = registry.unwrap_or(&config.registry);
            run_adopters(rpc, registry, args.from_block, args.json).await
        }
        Command::Demo => run_demo(&config, args.json).await,
        Command::Query {
            rpc,
            address,
            registry,
        } => {
            let target = match registry {
                Some(registry) => QueryTarget::registry(registry, address),
                None => QueryTarget::direct(address),
            };
            match target {
                Ok(target) => run_query(rpc, target, args.json).await,
                Err(err) => Err(err.into()),
            }
        }
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,safe_harbor={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  safe-harbor <rpc_url> <agreement_address>");
    eprintln!("  safe-harbor --registry <registry> <rpc_url> <protocol_address>");
    eprintln!("  safe-harbor --adopters [--registry <registry>] <rpc_url>");
    eprintln!("  safe-harbor            (demonstration run)");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  safe-harbor https://sepolia.gateway.tenderly.co 0xef726071a86b2B31caa035eE3e69c567762c7364");
    eprintln!("  safe-harbor https://gateway.tenderly.co/public/mainnet 0x1234...");
}

async fn connect(rpc: &str) -> Result<Box<dyn EthereumProvider>> {
    let endpoint = ProviderConfig::from_endpoint(rpc)?;
    let provider = create_provider(endpoint)
        .await
        .with_context(|| format!("Failed to connect to {}", rpc))?;
    info!(endpoint = %provider.endpoint_name(), "connected");
    Ok(provider)
}

/// Query one target; `Ok(true)` on any successful outcome, including no adoption
async fn run_query(rpc: &str, target: QueryTarget, json: bool) -> Result<bool> {
    if !json {
        println!("Safe Harbor V2 Agreement Details");
        println!("========================================");
        println!("RPC: {}", rpc);
    }
    let provider = connect(rpc).await?;
    let outcome = AgreementQuery::new(provider.as_ref())
        .run(target)
        .await
        .context("Error querying agreement")?;
    print_outcome(&outcome, json)?;
    Ok(true)
}

fn print_outcome(outcome: &QueryOutcome, json: bool) -> Result<()> {
    if json {
        println!("{}", export::outcome_to_json(outcome).context("Failed to serialize outcome")?);
        return Ok(());
    }
    match outcome {
        QueryOutcome::NoAdoption { protocol } => print!("{}", export::render_no_adoption(*protocol)),
        QueryOutcome::Adopted(report) => print!("{}", export::render_report(report)),
    }
    Ok(())
}

async fn run_demo(config: &Config, json: bool) -> Result<bool> {
    let mut all_ok = true;
    for entry in &config.demo {
        if !json {
            println!();
            println!("--- {} ---", entry.display_label());
        }
        let outcome = match entry.target(&config.registry) {
            Ok(target) => run_query(&entry.rpc, target, json).await,
            Err(err) => Err(err.into()),
        };
        if let Err(err) = outcome {
            eprintln!("Error ({}): {err:#}", entry.display_label());
            all_ok = false;
        }
    }
    Ok(all_ok)
}

async fn run_adopters(rpc: &str, registry: &str, from_block: u64, json: bool) -> Result<bool> {
    let registry = parse_address(registry)?;
    let provider = connect(rpc).await?;
    let adopters = scan_adopters(provider.as_ref(), registry, from_block)
        .await
        .context("Error scanning adopters")?;

    if json {
        println!("{}", export::adopters_to_json(&adopters).context("Failed to serialize adopters")?);
    } else {
        print!("{}", export::render_adopters(&adopters));
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RPC: &str = "https://sepolia.gateway.tenderly.co";
    const AGREEMENT: &str = "0xef726071a86b2B31caa035eE3e69c567762c7364";
    const REGISTRY: &str = "0x1eaCD100B0546E433fbf4d773109cAD482c34686";

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("safe-harbor").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_demo_and_direct_query() {
        assert_eq!(parse(&[]).command(), Some(Command::Demo));
        assert_eq!(
            parse(&[RPC, AGREEMENT]).command(),
            Some(Command::Query {
                rpc: RPC,
                address: AGREEMENT,
                registry: None
            })
        );
    }

    #[test]
    fn test_registry_query_and_adopters() {
        assert_eq!(
            parse(&["--registry", REGISTRY, RPC, AGREEMENT]).command(),
            Some(Command::Query {
                rpc: RPC,
                address: AGREEMENT,
                registry: Some(REGISTRY)
            })
        );
        assert_eq!(
            parse(&["--adopters", "--from-block", "100", RPC]).command(),
            Some(Command::Adopters {
                rpc: RPC,
                registry: None
            })
        );
    }

    #[test]
    fn test_usage_errors() {
        // A registry with nothing to resolve is not a demo run
        assert_eq!(parse(&["--registry", REGISTRY]).command(), None);
        assert_eq!(parse(&[RPC]).command(), None);
        assert_eq!(parse(&[RPC, AGREEMENT, "extra"]).command(), None);
        assert_eq!(parse(&["--adopters"]).command(), None);
        assert_eq!(parse(&["--adopters", RPC, REGISTRY]).command(), None);
    }

    #[test]
    fn test_verbosity_flag_counts() {
        let args = parse(&["-vv", "--json"]);
        assert_eq!(args.verbose, 2);
        assert!(args.json);
    }
}

use anyhow::{bail, Context, Result};
use chain_signatures::{AddressKind, ChainSignaturesConfig, ChainSignaturesError, DerivedAddresses};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Chain signatures operations tool
#[derive(Parser, Debug)]
#[command(name = "chainsig", version)]
#[command(about = "Inspect chain signature configuration and derived addresses")]
struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve the chain signatures configuration and print it
    Config {
        /// Configuration file (YAML, TOML or JSON); environment is used when omitted
        #[arg(short, long, env = "CHAIN_SIGNATURES_CONFIG")]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Print the addresses in a derived addresses JSON document
    Addresses {
        /// Path to the JSON document
        file: PathBuf,

        /// Address kinds that must be present (btc, evm)
        #[arg(long = "require", value_parser = parse_address_kind)]
        require: Vec<AddressKind>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

fn parse_address_kind(value: &str) -> Result<AddressKind, String> {
    value
        .parse()
        .map_err(|e: ChainSignaturesError| e.to_string())
}

fn main() -> Result<()> {
    // clap reads CHAIN_SIGNATURES_CONFIG, so .env goes first
    load_env_file(dotenvy::dotenv())?;

    let args = Args::parse();
    init_tracing(args.verbose);

    match args.command {
        Command::Config { config, format } => {
            let config = ChainSignaturesConfig::load(config.as_deref())
                .context("Failed to resolve chain signatures configuration")?;
            write_config(&config, format, &mut io::stdout(), &mut io::stderr())
        }
        Command::Addresses { file, require } => write_addresses(&file, &require, &mut io::stdout()),
    }
}

/// A missing `.env` is fine; a malformed one stops startup
fn load_env_file<T>(result: dotenvy::Result<T>) -> Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e).context("Failed to load .env"),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let app_env = env::var("CHAIN_SIGNATURES_ENV").unwrap_or_default();
    let is_production = app_env == "production";

    let default_filter = format!("chainsig={level},chain_signatures={level}");
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    if is_production {
        // Structured JSON logging for production
        let layer = fmt::layer()
            .with_target(false)
            .with_ansi(false)
            .json()
            .with_writer(io::stderr);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer)
            .init();
    } else {
        let layer = fmt::layer().with_target(true).with_writer(io::stderr);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer)
            .init();
    }
}

fn write_config(
    config: &ChainSignaturesConfig,
    format: OutputFormat,
    out: &mut impl Write,
    warnings: &mut impl Write,
) -> Result<()> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(config)?,
        OutputFormat::Yaml => serde_yaml::to_string(config)?,
    };
    writeln!(out, "{}", rendered.trim_end())?;

    if let Some(implied) = config.network_mismatch() {
        writeln!(
            warnings,
            "{} contract {} looks like a {} deployment but network is {}",
            "warning:".bright_yellow(),
            config.contract.as_str().bright_white(),
            implied,
            config.near_network_id
        )?;
    }

    Ok(())
}

fn write_addresses(file: &Path, require: &[AddressKind], out: &mut impl Write) -> Result<()> {
    let name = file.display();
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {name}"))?;
    let addresses = DerivedAddresses::from_json(&contents)
        .with_context(|| format!("Failed to parse addresses in {name}"))?;

    if addresses.is_empty() {
        writeln!(out, "{}", "no derived addresses".dimmed())?;
    }
    for (kind, address) in addresses.iter() {
        writeln!(out, "{:>4}  {}", kind.as_str().bright_cyan(), address)?;
    }

    let missing: Vec<_> = require
        .iter()
        .filter(|kind| addresses.get(**kind).is_none())
        .map(|kind| kind.as_str())
        .collect();
    if !missing.is_empty() {
        bail!("missing required addresses: {}", missing.join(", "));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chain_signatures::{ChainSignatureContract, NearNetworkId};
    use clap::CommandFactory;
    use tempfile::NamedTempFile;

    fn write_temp(suffix: &str, contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn run_addresses(json: &str, require: &[AddressKind]) -> (Result<()>, String) {
        let file = write_temp(".json", json);
        let mut out = Vec::new();
        let result = write_addresses(file.path(), require, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    fn run_config(config: &ChainSignaturesConfig, format: OutputFormat) -> (String, String) {
        let mut out = Vec::new();
        let mut warnings = Vec::new();
        write_config(config, format, &mut out, &mut warnings).unwrap();
        let out = String::from_utf8(out).unwrap();
        (out, String::from_utf8(warnings).unwrap())
    }

    // =============================================================================
    // ARGUMENT PARSING
    // =============================================================================

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_require_flags() {
        let argv = [
            "chainsig",
            "addresses",
            "addrs.json",
            "--require",
            "btc",
            "--require",
            "ethereum",
        ];
        let args = Args::try_parse_from(argv).unwrap();

        match args.command {
            Command::Addresses { require, .. } => {
                assert_eq!(require, vec![AddressKind::Btc, AddressKind::Evm]);
            }
            Command::Config { .. } => unreachable!("parsed the wrong subcommand"),
        }
    }

    #[test]
    fn test_rejects_unknown_address_kind() {
        let argv = ["chainsig", "addresses", "addrs.json", "--require", "sol"];
        assert!(Args::try_parse_from(argv).is_err());
    }

    // =============================================================================
    // .ENV LOADING
    // =============================================================================

    #[test]
    fn test_missing_env_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let result = dotenvy::from_path(dir.path().join("absent.env"));

        assert!(load_env_file(result).is_ok());
    }

    #[test]
    fn test_malformed_env_file_is_reported() {
        let file = write_temp(".env", "CHAINSIG_TEST_MALFORMED=dev ment\n");
        let result = dotenvy::from_path(file.path());
        let error = load_env_file(result).unwrap_err();

        assert!(error.to_string().contains("Failed to load .env"));
    }

    #[test]
    fn test_valid_env_file_loads() {
        let file = write_temp(".env", "CHAINSIG_TEST_VALID=testnet\n");
        assert!(load_env_file(dotenvy::from_path(file.path())).is_ok());
    }

    // =============================================================================
    // ADDRESSES COMMAND
    // =============================================================================

    #[test]
    fn test_missing_required_address_fails() {
        let (result, out) = run_addresses(r#"{"btc":"bc1q"}"#, &[AddressKind::Evm]);

        let message = result.unwrap_err().to_string();
        assert_eq!(message, "missing required addresses: evm");
        assert!(out.contains("bc1q"));
    }

    #[test]
    fn test_present_required_address_passes() {
        let json = r#"{"btc":"bc1q","evm":"0xabc"}"#;
        let (result, out) = run_addresses(json, &[AddressKind::Btc, AddressKind::Evm]);

        assert!(result.is_ok());
        assert!(out.contains("bc1q"));
        assert!(out.contains("0xabc"));
    }

    #[test]
    fn test_empty_document_is_reported() {
        let (result, out) = run_addresses("{}", &[]);

        assert!(result.is_ok());
        assert!(out.contains("no derived addresses"));
    }

    #[test]
    fn test_empty_document_fails_requirements() {
        let (result, _) = run_addresses("{}", &[AddressKind::Btc, AddressKind::Evm]);

        let message = result.unwrap_err().to_string();
        assert_eq!(message, "missing required addresses: btc, evm");
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        let (result, out) = run_addresses(r#"{"btc":42}"#, &[]);

        assert!(result.is_err());
        assert!(out.is_empty());
    }

    // =============================================================================
    // CONFIG COMMAND
    // =============================================================================

    #[test]
    fn test_config_renders_yaml() {
        let config = ChainSignaturesConfig::for_network(NearNetworkId::Testnet);
        let (out, warnings) = run_config(&config, OutputFormat::Yaml);

        assert!(out.contains("nearNetworkId: testnet"));
        assert!(out.contains("contract: v1.signer-prod.testnet"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_config_renders_json() {
        let config = ChainSignaturesConfig::for_network(NearNetworkId::Mainnet);
        let (out, warnings) = run_config(&config, OutputFormat::Json);

        let parsed = ChainSignaturesConfig::from_json(&out).unwrap();
        assert_eq!(parsed, config);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_config_warns_on_network_mismatch() {
        let contract = ChainSignatureContract::for_network(NearNetworkId::Testnet);
        let config = ChainSignaturesConfig::new(NearNetworkId::Mainnet, contract);
        let (out, warnings) = run_config(&config, OutputFormat::Json);

        assert!(out.contains("\"nearNetworkId\": \"mainnet\""));
        assert!(warnings.contains("warning:"));
        assert!(warnings.contains("looks like a testnet"));
        assert!(warnings.contains("network is mainnet"));
    }
}

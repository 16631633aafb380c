use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::{json, Value};

use eth_account_sync::backend::BlockbookConnector;
use eth_account_sync::config::BackendConfig;
use eth_account_sync::GetAccountInfo;

use std::io::Read;
use std::str::FromStr;
use std::time::Duration;

/// `ADDRESS:BLOCK:TRANSACTIONS` as given on the command line.
#[derive(Clone, Debug)]
struct AccountArg {
    address: String,
    block: u64,
    transactions: u64,
}

impl FromStr for AccountArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut parts = s.rsplitn(3, ':');
        let (Some(transactions), Some(block), Some(address)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(format!("expected ADDRESS:BLOCK:TRANSACTIONS, got \"{s}\""));
        };

        Ok(Self {
            address: address.to_string(),
            block: block.parse().map_err(|e| format!("block: {e}"))?,
            transactions: transactions.parse().map_err(|e| format!("transactions: {e}"))?,
        })
    }
}

#[derive(Parser)]
#[command(author, version, about = GetAccountInfo::INFO)]
struct Args {
    #[arg(long, default_value = "eth")]
    coin: String,

    /// Account to reconcile, repeatable
    #[arg(long = "account", value_name = "ADDRESS:BLOCK:TRANSACTIONS", conflicts_with = "request")]
    accounts: Vec<AccountArg>,

    /// Raw JSON request, `-` for stdin
    #[arg(long, value_name = "FILE")]
    request: Option<String>,

    /// Answer with an array even for a single --account
    #[arg(long)]
    bundle: bool,

    /// Backend url (tcp://host:port or ssl://host:port), tried in order
    #[arg(long = "backend-url", required = true)]
    backend_urls: Vec<String>,

    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    #[arg(long, default_value_t = 10)]
    connect_timeout_secs: u64,

    #[arg(long)]
    pretty: bool,
}

impl Args {
    fn payload(&self) -> Result<Value> {
        if let Some(path) = &self.request {
            let raw = if path == "-" {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            } else {
                std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?
            };
            return serde_json::from_str(&raw).context("request is not valid JSON");
        }

        let accounts: Vec<Value> = self
            .accounts
            .iter()
            .map(|a| json!({ "address": a.address, "block": a.block, "transactions": a.transactions }))
            .collect();

        match accounts.as_slice() {
            [] => bail!("pass at least one --account or a --request"),
            [single] if !self.bundle => Ok(json!({ "coin": self.coin, "account": single })),
            _ => Ok(json!({ "coin": self.coin, "accounts": accounts })),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let payload = args.payload()?;
    let method = GetAccountInfo::new(&payload)?;
    log::info!("[MAIN] Network: {}", method.network());

    let config = BackendConfig::new(method.network(), args.backend_urls.as_slice())?
        .with_request_timeout(Duration::from_secs(args.timeout_secs))
        .with_connect_timeout(Duration::from_secs(args.connect_timeout_secs));
    let connector = BlockbookConnector::new(config);

    let response = method.run(&connector).await?;

    let out = if args.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{out}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_arg_keeps_colons_in_the_address() {
        let arg: AccountArg = "0xA:100:5".parse().unwrap();
        assert_eq!((arg.address.as_str(), arg.block, arg.transactions), ("0xA", 100, 5));

        let arg: AccountArg = "ns:0xA:1:2".parse().unwrap();
        assert_eq!(arg.address, "ns:0xA");
    }

    #[test]
    fn account_arg_rejects_garbage() {
        assert!("0xA:100".parse::<AccountArg>().is_err());
        assert!("0xA:x:5".parse::<AccountArg>().is_err());
    }

    #[test]
    fn single_account_is_sent_unbundled_unless_asked() {
        let args = Args::parse_from([
            "eth-account-sync",
            "--account",
            "0xA:100:5",
            "--backend-url",
            "tcp://127.0.0.1:9130",
        ]);
        let payload = args.payload().unwrap();
        assert_eq!(payload["account"]["address"], "0xA");

        let args = Args::parse_from([
            "eth-account-sync",
            "--account",
            "0xA:100:5",
            "--bundle",
            "--backend-url",
            "tcp://127.0.0.1:9130",
        ]);
        assert_eq!(args.payload().unwrap()["accounts"][0]["block"], 100);
    }
}

//! # cartkit
//!
//! Runs a cart script and prints what happened.
//!
//! ## Usage
//! ```bash
//! # Read the script from stdin
//! echo "add Laptop 1 2500.00
//! coupon SAVE10
//! total" | cartkit
//!
//! # Read from a file, print the final cart as JSON
//! cartkit --script order.txt --json
//!
//! # Without any coupon lookup (every coupon is rejected)
//! cartkit --script order.txt --no-coupons
//! ```
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  env ──► CliConfig ──► tracing subscriber (stderr)                     │
//! │                   └──► CouponTable (file or built-in)                  │
//! │                                │                                        │
//! │  script ──► Runner ──► Cart::with_lookup(table) ──► stdout             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod runner;
mod script;

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use cartkit_core::{Cart, CouponLookup};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::CliConfig;
use crate::runner::Runner;

const AFTER_HELP: &str = "\
Script commands:
  add <name> <quantity> <unit_price>
  remove <name> [quantity]
  coupon <code>
  clear | list | total

Environment:
  CARTKIT_CURRENCY_SYMBOL  Amount prefix (default: $)
  CARTKIT_COUPONS          JSON coupon table path
  CARTKIT_LOG              Log filter (default: warn)";

#[derive(Debug, Parser)]
#[command(
    name = "cartkit",
    about = "Run a shopping cart script",
    long_about = None,
    after_help = AFTER_HELP
)]
struct Args {
    /// Read the script from PATH instead of stdin
    #[arg(short, long, value_name = "PATH")]
    script: Option<PathBuf>,

    /// Print the final cart as JSON
    #[arg(long)]
    json: bool,

    /// Build the cart without a coupon lookup
    #[arg(long)]
    no_coupons: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = CliConfig::load().context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .with_writer(io::stderr)
        .with_target(true)
        .init();

    let script = match &args.script {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("reading script from stdin")?;
            buffer
        }
    };

    let cart = if args.no_coupons {
        Cart::new()
    } else {
        let table: Box<dyn CouponLookup> = Box::new(config.coupon_table()?);
        Cart::with_lookup(table)
    };
    info!(
        coupons = !args.no_coupons,
        currency = %config.currency_symbol,
        "Starting cart script"
    );

    let mut runner = Runner::new(cart, config, io::stdout().lock());
    runner.run(&script)?;
    info!(
        items = runner.cart().item_count(),
        total = %runner.cart().total(),
        "Script finished"
    );
    if args.json {
        runner.write_report()?;
    }

    Ok(())
}

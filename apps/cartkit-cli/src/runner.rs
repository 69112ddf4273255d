//! Executes cart scripts against a `Cart` and writes the results.

use std::io::Write;

use anyhow::{Context, Result};
use cartkit_core::{Cart, CartSummary, LineItemSnapshot};
use serde::Serialize;
use tracing::debug;

use crate::config::CliConfig;
use crate::script::{parse_line, Command};

/// Final state printed by `--json`.
#[derive(Debug, Serialize)]
pub struct Report {
    pub items: Vec<LineItemSnapshot>,
    pub summary: CartSummary,
}

/// Runs script lines against one cart.
pub struct Runner<W: Write> {
    cart: Cart,
    config: CliConfig,
    out: W,
}

impl<W: Write> Runner<W> {
    pub fn new(cart: Cart, config: CliConfig, out: W) -> Self {
        Runner { cart, config, out }
    }

    /// Runs every line of `script`, stopping at the first failing line.
    pub fn run(&mut self, script: &str) -> Result<()> {
        for (index, line) in script.lines().enumerate() {
            let line_number = index + 1;
            let Some(command) = parse_line(line).with_context(|| format!("line {line_number}"))?
            else {
                continue;
            };

            debug!(line = line_number, ?command, "Executing");
            self.execute(command)
                .with_context(|| format!("line {line_number}: {}", line.trim()))?;
        }

        Ok(())
    }

    fn execute(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Add {
                name,
                quantity,
                unit_price,
            } => self.cart.add_item(&name, quantity, unit_price)?,
            Command::Remove { name, quantity } => self.cart.remove_item(&name, quantity)?,
            Command::Coupon { code } => {
                let status = if self.cart.apply_coupon(&code) {
                    "applied"
                } else {
                    "rejected"
                };
                writeln!(self.out, "coupon {code}: {status}")?;
            }
            Command::Clear => self.cart.clear(),
            Command::List => self.write_listing()?,
            Command::Total => self.write_totals()?,
        }

        Ok(())
    }

    fn write_listing(&mut self) -> Result<()> {
        let items = self.cart.list_items();
        if items.is_empty() {
            writeln!(self.out, "(cart is empty)")?;
            return Ok(());
        }

        for item in items {
            writeln!(
                self.out,
                "{:<24} {:>5} x {:>10} = {:>12}",
                item.name,
                item.quantity,
                format!("{}{}", self.config.currency_symbol, item.unit_price.amount()),
                self.config.format_money(item.extended_price),
            )?;
        }
        Ok(())
    }

    fn write_totals(&mut self) -> Result<()> {
        let summary = self.cart.summary();

        writeln!(self.out, "subtotal: {}", self.config.format_money(summary.subtotal))?;
        if let Some(applied) = &summary.coupon {
            writeln!(
                self.out,
                "discount: -{} ({} {} {})",
                self.config.format_money(summary.discount),
                applied.code,
                applied.coupon.kind,
                applied.coupon.value
            )?;
        }
        writeln!(self.out, "total: {}", self.config.format_money(summary.total))?;
        Ok(())
    }

    /// Items and totals as they stand now.
    pub fn report(&self) -> Report {
        Report {
            items: self.cart.list_items(),
            summary: self.cart.summary(),
        }
    }

    /// Writes `report()` as pretty JSON.
    pub fn write_report(&mut self) -> Result<()> {
        let report = self.report();
        serde_json::to_writer_pretty(&mut self.out, &report).context("writing JSON report")?;
        writeln!(self.out)?;
        Ok(())
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartkit_core::{CouponLookup, CouponTable};
    use rust_decimal_macros::dec;

    fn runner() -> Runner<Vec<u8>> {
        let table: Box<dyn CouponLookup> = Box::new(CouponTable::default());
        Runner::new(Cart::with_lookup(table), CliConfig::default(), Vec::new())
    }

    fn output(runner: Runner<Vec<u8>>) -> String {
        String::from_utf8(runner.into_output()).unwrap()
    }

    #[test]
    fn test_full_scenario() {
        let mut runner = runner();
        runner
            .run(
                "add Laptop 1 2500.00\n\
                 add Mouse 2 75.00\n\
                 coupon SAVE10\n\
                 total\n\
                 remove Mouse 1\n\
                 total\n",
            )
            .unwrap();

        assert_eq!(runner.cart().total().amount(), dec!(2317.50));
        let out = output(runner);
        assert_eq!(
            out,
            "coupon SAVE10: applied\n\
             subtotal: $2650.00\n\
             discount: -$265.00 (SAVE10 percentage 10)\n\
             total: $2385.00\n\
             subtotal: $2575.00\n\
             discount: -$257.50 (SAVE10 percentage 10)\n\
             total: $2317.50\n"
        );
    }

    #[test]
    fn test_rejected_coupon_and_listing() {
        let mut runner = runner();
        runner
            .run("list\nadd \"Green Tea\" 2 3.50\ncoupon NOPE\nlist\ntotal")
            .unwrap();

        let out = output(runner);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "(cart is empty)");
        assert_eq!(lines[1], "coupon NOPE: rejected");
        assert!(lines[2].starts_with("Green Tea"));
        assert!(lines[2].ends_with("$7.00"));
        assert_eq!(lines[3], "subtotal: $7.00");
        assert_eq!(lines[4], "total: $7.00");
    }

    #[test]
    fn test_errors_carry_line_numbers() {
        let mut runner = runner();
        let err = runner
            .run("add Pera 1 1.00\n\nadd Pera 1 abc")
            .unwrap_err();

        let message = format!("{err:#}");
        assert!(message.starts_with("line 3: add Pera 1 abc"), "{message}");
        assert!(message.contains("unit_price has invalid format"), "{message}");

        // Lines before the failure were applied.
        assert_eq!(runner.cart().item("Pera").unwrap().quantity(), 1);
    }

    #[test]
    fn test_oversized_lines_are_rejected_not_fatal() {
        let mut runner = runner();
        runner.run("add Caneta 1 2.00").unwrap();

        let err = runner
            .run("add Ouro 9223372036854775807 100000000000")
            .unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("extended_price must be between"), "{message}");

        let err = runner
            .run("add Caneta 9223372036854775807 0.00")
            .unwrap_err();
        assert!(format!("{err:#}").contains("quantity must be between"));

        runner.run("total").unwrap();
        let out = output(runner);
        assert_eq!(out, "subtotal: $2.00\ntotal: $2.00\n");
    }

    #[test]
    fn test_syntax_errors() {
        let mut runner = runner();
        let err = runner.run("checkout").unwrap_err();
        assert_eq!(format!("{err:#}"), "line 1: unknown command 'checkout'");
    }

    #[test]
    fn test_json_report() {
        let mut runner = runner();
        runner.run("add Pão 2 2.50\ncoupon 5OFF").unwrap();
        runner.write_report().unwrap();

        let out = output(runner);
        let json_start = out.find('{').unwrap();
        let report: serde_json::Value = serde_json::from_str(&out[json_start..]).unwrap();

        assert_eq!(report["items"][0]["name"], "Pão");
        assert_eq!(report["items"][0]["extended_price"], "5.00");
        assert_eq!(report["summary"]["subtotal"], "5.00");
        assert_eq!(report["summary"]["total"], "0.00");
        assert_eq!(report["summary"]["coupon"]["code"], "5OFF");
    }
}

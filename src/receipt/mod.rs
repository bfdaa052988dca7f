//! Receipt
//!
//! A receipt is a finalized, printable projection of a completed or
//! historical sale. Fresh checkouts synthesise it from the pre-checkout
//! cart (the creation response may omit item names); historical sales map
//! directly since the backend includes names there. Rendering is pure:
//! same receipt in, same document out, which is what makes reprint trivial.

use std::io;

use jiff::civil::{Date, DateTime};
use rust_decimal::Decimal;
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use crate::{api::sales::SaleRecord, cart::Cart};

pub mod export;

/// Printed width of the receipt document.
const RECEIPT_WIDTH: usize = 40;

/// Cashier shown on historical receipts, which only carry a user id.
const FALLBACK_CASHIER: &str = "Staff";

/// The pharmacy's letterhead details.
#[derive(Debug, Clone)]
pub struct StoreProfile {
    /// Business name, printed in caps.
    pub name: String,
    /// Street address line.
    pub address: String,
    /// Phone line.
    pub phone: String,
}

impl Default for StoreProfile {
    fn default() -> Self {
        Self {
            name: "PharmaLink".to_string(),
            address: "Dipolog City, Zamboanga".to_string(),
            phone: "Tel: (065) 123-4567".to_string(),
        }
    }
}

/// One printed item line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLine {
    /// Item name.
    pub name: String,
    /// Units sold.
    pub quantity: u32,
    /// Price per unit at sale time.
    pub unit_price: Decimal,
    /// `unit_price * quantity`.
    pub subtotal: Decimal,
}

/// A printable record of one sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Sale id, printed as the receipt number.
    pub id: i64,
    /// When the sale was made.
    pub issued_at: DateTime,
    /// Who rang it up.
    pub cashier: String,
    /// Item lines.
    pub lines: Vec<ReceiptLine>,
    /// Grand total.
    pub total: Decimal,
}

impl Receipt {
    /// Synthesise a receipt from the cart that was just checked out.
    ///
    /// Names, quantities, prices and subtotals come from the cart
    /// snapshot, never from the checkout response body.
    #[must_use]
    pub fn from_cart(cart: &Cart, sale_id: i64, issued_at: DateTime, cashier: &str) -> Self {
        let lines = cart
            .iter()
            .map(|line| ReceiptLine {
                name: line.item().name.clone(),
                quantity: line.quantity(),
                unit_price: line.item().price,
                subtotal: line.subtotal(),
            })
            .collect();

        Self {
            id: sale_id,
            issued_at,
            cashier: cashier.to_string(),
            lines,
            total: cart.total(),
        }
    }

    /// Map a historical sale to a receipt. Pure; no network call.
    #[must_use]
    pub fn from_sale(sale: &SaleRecord) -> Self {
        let lines = sale
            .items
            .iter()
            .map(|line| ReceiptLine {
                name: line
                    .medicine_name
                    .clone()
                    .unwrap_or_else(|| "(unnamed item)".to_string()),
                quantity: line.quantity,
                unit_price: line.unit_price,
                subtotal: line.sub_total,
            })
            .collect();

        Self {
            id: sale.id,
            issued_at: parse_backend_datetime(&sale.transaction_date).unwrap_or_default(),
            cashier: FALLBACK_CASHIER.to_string(),
            lines,
            total: sale.total_amount,
        }
    }

    /// Write the fixed business-document layout.
    ///
    /// # Errors
    ///
    /// Returns an error only when the underlying writer fails.
    pub fn write_to(&self, mut out: impl io::Write, store: &StoreProfile) -> io::Result<()> {
        writeln!(out, "{}", centred(&store.name.to_uppercase()))?;
        writeln!(out, "{}", centred(&store.address))?;
        writeln!(out, "{}", centred(&store.phone))?;
        writeln!(out, "{}", rule())?;

        writeln!(out, "Rcpt #: {}", self.id)?;
        writeln!(out, "Date: {}", self.issued_at.strftime("%Y-%m-%d %H:%M:%S"))?;
        writeln!(out, "Cashier: {}", self.cashier)?;
        writeln!(out, "{}", rule())?;

        writeln!(out, "{}", self.items_table())?;
        writeln!(out, "{}", rule())?;

        let total = format!("P {:.2}", self.total);
        writeln!(out, "TOTAL{total:>width$}", width = RECEIPT_WIDTH - 5)?;
        writeln!(out)?;
        writeln!(out, "{}", centred("-- THIS IS YOUR OFFICIAL RECEIPT --"))?;
        writeln!(out, "{}", centred("Thank you for your purchase!"))?;

        Ok(())
    }

    /// Render to a string; convenience over [`Self::write_to`].
    #[must_use]
    pub fn render(&self, store: &StoreProfile) -> String {
        let mut out = Vec::new();

        // Writing to a Vec cannot fail.
        let _ = self.write_to(&mut out, store);

        String::from_utf8_lossy(&out).into_owned()
    }

    fn items_table(&self) -> String {
        let mut builder = Builder::default();

        builder.push_record(["Item", "Qty", "Amt"]);

        for line in &self.lines {
            builder.push_record([
                line.name.clone(),
                line.quantity.to_string(),
                format!("{:.2}", line.subtotal),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::blank());
        table.modify(Columns::new(1..), Alignment::right());

        table.to_string()
    }
}

fn centred(text: &str) -> String {
    format!("{text:^RECEIPT_WIDTH$}").trim_end().to_string()
}

fn rule() -> String {
    "-".repeat(RECEIPT_WIDTH)
}

/// Parse a backend timestamp, which .NET serialises without an offset,
/// tolerating date-only strings.
pub(crate) fn parse_backend_datetime(value: &str) -> Option<DateTime> {
    if let Ok(datetime) = value.parse::<DateTime>() {
        return Some(datetime);
    }

    value
        .parse::<Date>()
        .ok()
        .map(|date| date.to_datetime(jiff::civil::time(0, 0, 0, 0)))
}

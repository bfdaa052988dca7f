//! CSV export of sales history.
//!
//! The export mirrors whatever slice of history the caller hands in; it
//! does not refetch. Amounts keep two decimal places and timestamps the
//! backend sends in an unparseable shape become empty date/time cells
//! rather than poisoning the row.

use std::fmt::Write;

use crate::api::sales::SaleRecord;

use super::parse_backend_datetime;

/// Header row of the sales export.
pub const CSV_HEADER: &str = "Receipt ID,Date,Time,Items Count,Total Amount,Cashier ID";

/// Render sales as CSV, one row per sale plus the header.
///
/// Zero sales still produce the header so the file is well formed.
#[must_use]
pub fn sales_csv(sales: &[SaleRecord]) -> String {
    let mut csv = String::new();

    csv.push_str(CSV_HEADER);
    csv.push('\n');

    for sale in sales {
        let (date, time) = match parse_backend_datetime(&sale.transaction_date) {
            Some(at) => (
                at.strftime("%Y-%m-%d").to_string(),
                at.strftime("%H:%M:%S").to_string(),
            ),
            None => (String::new(), String::new()),
        };

        // Infallible for String, but write! keeps the row building uniform.
        let _ = writeln!(
            csv,
            "{},{},{},{},{:.2},{}",
            sale.id,
            date,
            time,
            sale.items.len(),
            sale.total_amount,
            sale.user_id,
        );
    }

    csv
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::api::sales::SaleLine;

    use super::*;

    fn sale(id: i64, date: &str, total_cents: i64, items: usize) -> SaleRecord {
        SaleRecord {
            id,
            user_id: 3,
            total_amount: Decimal::new(total_cents, 2),
            transaction_date: date.to_string(),
            items: (0..items)
                .map(|index| SaleLine {
                    id: i64::try_from(index).unwrap_or_default() + 1,
                    medicine_name: Some("Paracetamol".to_string()),
                    quantity: 1,
                    unit_price: Decimal::new(500, 2),
                    sub_total: Decimal::new(500, 2),
                })
                .collect(),
        }
    }

    #[test]
    fn exports_one_row_per_sale() {
        let csv = sales_csv(&[
            sale(41, "2026-08-30T10:15:00", 2250, 2),
            sale(42, "2026-08-30T11:00:00", 500, 1),
        ]);

        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.first().copied(), Some(CSV_HEADER));
        assert_eq!(lines.get(1).copied(), Some("41,2026-08-30,10:15:00,2,22.50,3"));
        assert_eq!(lines.get(2).copied(), Some("42,2026-08-30,11:00:00,1,5.00,3"));
    }

    #[test]
    fn zero_sales_still_produce_the_header() {
        assert_eq!(sales_csv(&[]), format!("{CSV_HEADER}\n"));
    }

    #[test]
    fn unparseable_dates_leave_empty_cells() {
        let csv = sales_csv(&[sale(7, "not-a-date", 500, 1)]);

        assert_eq!(csv.lines().nth(1), Some("7,,,1,5.00,3"));
    }
}

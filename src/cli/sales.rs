use std::{fs, path::PathBuf};

use clap::{Args, Subcommand};
use jiff::civil::Date;

use crate::{
    api::sales::{SaleRecord, SalesQuery},
    checkout::CheckoutService,
    context::AppContext,
    receipt::{Receipt, StoreProfile, export},
    session::SessionIdentity,
};

/// History pages walked when resolving a sale id or exporting everything.
const EXPORT_PAGE_SIZE: u32 = 100;

#[derive(Debug, Args)]
pub(crate) struct SalesCommand {
    #[command(subcommand)]
    command: SalesSubcommand,
}

#[derive(Debug, Subcommand)]
enum SalesSubcommand {
    /// List one page of sales history
    List(ListArgs),
    /// Export sales history as CSV
    Export(ExportArgs),
    /// Reprint the receipt of a past sale
    Receipt(IdArg),
    /// Void a sale (administrator only)
    Void(IdArg),
}

#[derive(Debug, Args)]
struct ListArgs {
    /// 1-based page index
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Records per page
    #[arg(long, default_value_t = 10)]
    page_size: u32,

    #[command(flatten)]
    range: DateRange,
}

#[derive(Debug, Args)]
struct ExportArgs {
    #[command(flatten)]
    range: DateRange,

    /// Write the CSV here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct DateRange {
    /// Earliest transaction date (ISO, e.g. 2026-08-01)
    #[arg(long)]
    from: Option<Date>,

    /// Latest transaction date (ISO, e.g. 2026-08-30)
    #[arg(long)]
    to: Option<Date>,
}

#[derive(Debug, Args)]
struct IdArg {
    /// Sale id
    #[arg(long)]
    id: i64,
}

pub(crate) async fn run(
    context: &AppContext,
    identity: &SessionIdentity,
    command: SalesCommand,
) -> Result<(), String> {
    match command.command {
        SalesSubcommand::List(args) => list(context, args).await,
        SalesSubcommand::Export(args) => export_csv(context, args).await,
        SalesSubcommand::Receipt(args) => reprint(context, args.id).await,
        SalesSubcommand::Void(args) => {
            let checkout = CheckoutService::new(std::sync::Arc::clone(&context.sales));

            checkout
                .void_sale(args.id, identity.role)
                .await
                .map_err(|error| error.to_string())?;

            println!("sale {} voided", args.id);
            Ok(())
        }
    }
}

async fn list(context: &AppContext, args: ListArgs) -> Result<(), String> {
    let query = SalesQuery {
        page_number: args.page,
        page_size: args.page_size,
        start_date: args.range.from,
        end_date: args.range.to,
    };

    let page = context
        .sales
        .list_sales(&query)
        .await
        .map_err(|error| format!("failed to list sales: {error}"))?;

    for sale in &page.data {
        println!(
            "{:>6}  {}  {:>2} items  P {:>8.2}  cashier {}",
            sale.id,
            sale.transaction_date,
            sale.items.len(),
            sale.total_amount,
            sale.user_id,
        );
    }

    println!(
        "page {}/{} ({} sales)",
        page.meta.current_page, page.meta.total_pages, page.meta.total_count,
    );

    Ok(())
}

async fn export_csv(context: &AppContext, args: ExportArgs) -> Result<(), String> {
    let sales = fetch_all(context, args.range).await?;
    let csv = export::sales_csv(&sales);

    match args.output {
        Some(path) => {
            fs::write(&path, csv)
                .map_err(|error| format!("failed to write {}: {error}", path.display()))?;

            println!("exported {} sales to {}", sales.len(), path.display());
        }
        None => print!("{csv}"),
    }

    Ok(())
}

async fn reprint(context: &AppContext, id: i64) -> Result<(), String> {
    let sale = find_sale(context, id).await?;
    let receipt = Receipt::from_sale(&sale);

    print!("{}", receipt.render(&StoreProfile::default()));

    Ok(())
}

async fn fetch_all(context: &AppContext, range: DateRange) -> Result<Vec<SaleRecord>, String> {
    let mut query = SalesQuery {
        page_size: EXPORT_PAGE_SIZE,
        start_date: range.from,
        end_date: range.to,
        ..SalesQuery::default()
    };
    let mut sales = Vec::new();

    loop {
        let page = context
            .sales
            .list_sales(&query)
            .await
            .map_err(|error| format!("failed to fetch sales: {error}"))?;

        sales.extend(page.data);

        if page.meta.current_page >= page.meta.total_pages {
            return Ok(sales);
        }

        query.page_number = page.meta.current_page + 1;
    }
}

async fn find_sale(context: &AppContext, id: i64) -> Result<SaleRecord, String> {
    let mut query = SalesQuery {
        page_size: EXPORT_PAGE_SIZE,
        ..SalesQuery::default()
    };

    loop {
        let page = context
            .sales
            .list_sales(&query)
            .await
            .map_err(|error| format!("failed to look up sale {id}: {error}"))?;

        if let Some(sale) = page.data.into_iter().find(|sale| sale.id == id) {
            return Ok(sale);
        }

        if page.meta.current_page >= page.meta.total_pages {
            return Err(format!("no sale with id {id}"));
        }

        query.page_number = page.meta.current_page + 1;
    }
}

use clap::{Args, Subcommand};
use rust_decimal::Decimal;

use crate::{
    api::medicines::{MedicineQuery, NewMedicine},
    context::AppContext,
};

#[derive(Debug, Args)]
pub(crate) struct MedicinesCommand {
    #[command(subcommand)]
    command: MedicinesSubcommand,
}

#[derive(Debug, Subcommand)]
enum MedicinesSubcommand {
    /// List one page of the catalog
    List(ListArgs),
    /// Add a medicine
    Add(MedicineArgs),
    /// Replace a medicine
    Update(UpdateArgs),
    /// Delete a medicine
    Delete(IdArg),
    /// Add stock to a medicine
    Restock(RestockArgs),
}

#[derive(Debug, Args)]
struct ListArgs {
    /// 1-based page index
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Records per page
    #[arg(long, default_value_t = 10)]
    page_size: u32,

    /// Name search term
    #[arg(long)]
    search: Option<String>,

    /// Restrict to one category id
    #[arg(long)]
    category: Option<i64>,

    /// Backend filter, e.g. `expired` or `lowstock`
    #[arg(long)]
    filter: Option<String>,
}

#[derive(Debug, Args)]
struct MedicineArgs {
    /// Display name
    #[arg(long)]
    name: String,

    /// Owning category id
    #[arg(long)]
    category: i64,

    /// Unit price
    #[arg(long)]
    price: Decimal,

    /// Units in stock
    #[arg(long)]
    stock: u32,

    /// Expiry date (ISO, e.g. 2027-03-01)
    #[arg(long)]
    expiry: String,

    /// Free-text description
    #[arg(long)]
    description: Option<String>,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    /// Medicine id
    #[arg(long)]
    id: i64,

    #[command(flatten)]
    medicine: MedicineArgs,
}

#[derive(Debug, Args)]
struct IdArg {
    /// Medicine id
    #[arg(long)]
    id: i64,
}

#[derive(Debug, Args)]
struct RestockArgs {
    /// Medicine id
    #[arg(long)]
    id: i64,

    /// Units to add
    #[arg(long)]
    amount: u32,
}

impl MedicineArgs {
    fn into_payload(self) -> NewMedicine {
        NewMedicine {
            name: self.name,
            category_id: self.category,
            price: self.price,
            stock_quantity: self.stock,
            expiry_date: self.expiry,
            description: self.description,
        }
    }
}

pub(crate) async fn run(context: &AppContext, command: MedicinesCommand) -> Result<(), String> {
    match command.command {
        MedicinesSubcommand::List(args) => list(context, args).await,
        MedicinesSubcommand::Add(args) => {
            context
                .medicines
                .create_medicine(&args.into_payload())
                .await
                .map_err(|error| format!("failed to add medicine: {error}"))?;

            println!("medicine added");
            Ok(())
        }
        MedicinesSubcommand::Update(args) => {
            context
                .medicines
                .update_medicine(args.id, &args.medicine.into_payload())
                .await
                .map_err(|error| format!("failed to update medicine: {error}"))?;

            println!("medicine {} updated", args.id);
            Ok(())
        }
        MedicinesSubcommand::Delete(args) => {
            context
                .medicines
                .delete_medicine(args.id)
                .await
                .map_err(|error| format!("failed to delete medicine: {error}"))?;

            println!("medicine {} deleted", args.id);
            Ok(())
        }
        MedicinesSubcommand::Restock(args) => {
            context
                .medicines
                .restock(args.id, args.amount)
                .await
                .map_err(|error| format!("failed to restock: {error}"))?;

            println!("added {} units to medicine {}", args.amount, args.id);
            Ok(())
        }
    }
}

async fn list(context: &AppContext, args: ListArgs) -> Result<(), String> {
    let query = MedicineQuery {
        page_number: args.page,
        page_size: args.page_size,
        search_term: args.search,
        category_id: args.category,
        filter: args.filter,
    };

    let page = context
        .medicines
        .list_medicines(&query)
        .await
        .map_err(|error| format!("failed to list medicines: {error}"))?;

    for medicine in &page.data {
        println!(
            "{:>5}  {:<30}  stock {:>5}  P {:>8.2}  expires {}",
            medicine.id, medicine.name, medicine.stock_quantity, medicine.price, medicine.expiry_date,
        );
    }

    println!(
        "page {}/{} ({} medicines)",
        page.meta.current_page, page.meta.total_pages, page.meta.total_count,
    );

    Ok(())
}

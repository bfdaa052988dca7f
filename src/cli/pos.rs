use std::io::{self, Write as _};

use clap::Args;
use jiff::Zoned;

use crate::{
    api::medicines::{Medicine, MedicineQuery},
    cart::Cart,
    checkout::CheckoutService,
    context::AppContext,
    receipt::StoreProfile,
    session::SessionIdentity,
};

/// Catalog pages walked when resolving item ids.
const LOOKUP_PAGE_SIZE: u32 = 100;

#[derive(Debug, Args)]
pub(crate) struct SellArgs {
    /// Item to sell as `ID` or `ID:QTY`; repeatable
    #[arg(long = "item", value_name = "ID[:QTY]", required = true)]
    items: Vec<String>,
}

pub(crate) async fn run(
    context: &AppContext,
    identity: &SessionIdentity,
    args: SellArgs,
) -> Result<(), String> {
    let mut cart = Cart::new();

    for spec in &args.items {
        let (id, quantity) = parse_item(spec)?;
        let medicine = find_medicine(context, id).await?;

        for _ in 0..quantity {
            cart.add(&medicine).map_err(|error| error.to_string())?;
        }
    }

    let checkout = CheckoutService::new(std::sync::Arc::clone(&context.sales));

    let receipt = checkout
        .checkout(&cart, Zoned::now().datetime(), &identity.username)
        .await
        .map_err(|error| error.to_string())?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    receipt
        .write_to(&mut out, &StoreProfile::default())
        .and_then(|()| out.flush())
        .map_err(|error| format!("failed to print receipt: {error}"))?;

    Ok(())
}

fn parse_item(spec: &str) -> Result<(i64, u32), String> {
    let (id, quantity) = match spec.split_once(':') {
        Some((id, quantity)) => (id, quantity),
        None => (spec, "1"),
    };

    let id = id
        .parse::<i64>()
        .map_err(|_| format!("invalid item spec `{spec}`: expected ID or ID:QTY"))?;
    let quantity = quantity
        .parse::<u32>()
        .map_err(|_| format!("invalid item spec `{spec}`: expected ID or ID:QTY"))?;

    if quantity == 0 {
        return Err(format!("invalid item spec `{spec}`: quantity must be at least 1"));
    }

    Ok((id, quantity))
}

async fn find_medicine(context: &AppContext, id: i64) -> Result<Medicine, String> {
    let mut query = MedicineQuery {
        page_size: LOOKUP_PAGE_SIZE,
        ..MedicineQuery::default()
    };

    loop {
        let page = context
            .medicines
            .list_medicines(&query)
            .await
            .map_err(|error| format!("failed to look up medicine {id}: {error}"))?;

        if let Some(medicine) = page.data.into_iter().find(|medicine| medicine.id == id) {
            return Ok(medicine);
        }

        if page.meta.current_page >= page.meta.total_pages {
            return Err(format!("no medicine with id {id}"));
        }

        query.page_number = page.meta.current_page + 1;
    }
}

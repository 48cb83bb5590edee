//! List catalog items.

use anyhow::Result;

use crate::context::Context;

/// Run the catalog command.
pub async fn run(ctx: &Context) -> Result<()> {
    let catalog = ctx.config.build_catalog()?;

    if ctx.output.is_json() {
        ctx.output.json(&catalog.items());
        return Ok(());
    }

    ctx.output.header(&format!("Catalog: {}", ctx.config.shop.name));

    let widths = [10, 16, 12, 30];
    ctx.output
        .table_row(&["ID", "NAME", "PRICE", "DESCRIPTION"], &widths);
    ctx.output.info(&"-".repeat(74));

    for item in catalog.items() {
        let price = item.price.display();
        ctx.output.table_row(
            &[
                item.item_id.as_str(),
                &item.name,
                &price,
                item.description.as_deref().unwrap_or(""),
            ],
            &widths,
        );
    }

    ctx.output.info("");
    ctx.output
        .info(&format!("Total: {} item(s)", catalog.len()));

    Ok(())
}

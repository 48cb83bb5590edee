//! Interactive shop shell.

use anyhow::{bail, Result};
use dialoguer::{Confirm, Input, Select};

use super::run::{print_step, print_summary};
use super::ShellArgs;
use crate::context::Context;
use crate::session::{Operation, SessionRunner};

const ACTIONS: [&str; 8] = [
    "Add item to cart",
    "View cart",
    "Checkout",
    "Generate discount code",
    "Statistics",
    "Switch user",
    "Reset shop",
    "Quit",
];

/// Run the shell command.
pub async fn run(args: ShellArgs, ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        bail!("The shell is interactive and does not support --json");
    }

    let mut runner = SessionRunner::new(&ctx.config)?;
    let mut user = args.user;
    let mut count = 0;

    ctx.output.header(&format!("Cadence shell: {}", ctx.config.shop.name));
    ctx.output.info("Carts, orders and codes live only for this session.");

    loop {
        let choice = Select::new()
            .with_prompt(format!("[{}] What next?", user))
            .items(&ACTIONS)
            .default(0)
            .interact()?;

        let operation = match choice {
            0 => {
                let item = pick_item(&runner)?;
                let quantity: i64 = Input::new()
                    .with_prompt("Quantity")
                    .default(1)
                    .interact_text()?;
                Operation::Add {
                    user: user.clone(),
                    item,
                    quantity,
                }
            }
            1 => Operation::Cart { user: user.clone() },
            2 => {
                let code: String = Input::new()
                    .with_prompt("Discount code (blank for none)")
                    .allow_empty(true)
                    .interact_text()?;
                let code = code.trim();
                Operation::Checkout {
                    user: user.clone(),
                    code: (!code.is_empty()).then(|| code.to_string()),
                }
            }
            3 => Operation::Generate,
            4 => Operation::Stats,
            5 => {
                user = Input::new()
                    .with_prompt("User id")
                    .with_initial_text(user.clone())
                    .interact_text()?;
                continue;
            }
            6 => {
                let confirmed = Confirm::new()
                    .with_prompt("Drop every cart, order and discount code?")
                    .default(false)
                    .interact()?;
                if !confirmed {
                    continue;
                }
                Operation::Reset
            }
            _ => break,
        };

        count += 1;
        let result = runner.execute(&operation);
        print_step(ctx, count, count, &result);
    }

    print_summary(ctx, &runner.finish());
    Ok(())
}

fn pick_item(runner: &SessionRunner) -> Result<String> {
    let items = runner.shop().catalog().items();
    let labels: Vec<String> = items
        .iter()
        .map(|item| format!("{}  {}  {}", item.item_id, item.name, item.price.display()))
        .collect();

    let choice = Select::new()
        .with_prompt("Item")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(items[choice].item_id.to_string())
}

//! Replay a session script against a fresh shop.

use anyhow::{bail, Result};
use cadence_observability::{Outcome, SessionMetrics};
use serde_json::Value;

use super::RunArgs;
use crate::context::Context;
use crate::output::{format_duration_us, outcome_badge};
use crate::session::{SessionRunner, SessionScript, StepResult};

/// Run the run command.
pub async fn run(args: RunArgs, ctx: &Context) -> Result<()> {
    let path = ctx.resolve_path(&args.script);
    let script = SessionScript::load(&path)?;
    let mut runner = SessionRunner::new(&ctx.config)?;

    ctx.output.header(&format!("Running: {}", args.script));
    ctx.output.kv("Shop", &ctx.config.shop.name);
    ctx.output.kv("Steps", &script.steps.len().to_string());
    ctx.output.kv(
        "Cadence",
        &format!(
            "every {} orders, {}% off",
            ctx.config.shop.nth_order, ctx.config.shop.discount_percent
        ),
    );

    let progress = ctx.output.progress(script.steps.len() as u64, "Running");
    let mut results = Vec::with_capacity(script.steps.len());
    let mut stopped = false;

    for step in &script.steps {
        progress.set_message(step.describe());
        let result = runner.execute(step);
        progress.inc(1);

        let failed = result.outcome.is_failure();
        results.push(result);
        if failed && args.stop_on_error {
            stopped = true;
            break;
        }
    }

    progress.finish_and_clear();

    let metrics = runner.finish();

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "results": results,
            "metrics": metrics,
        }));
    } else {
        for (i, result) in results.iter().enumerate() {
            print_step(ctx, i + 1, script.steps.len(), result);
        }
        print_summary(ctx, &metrics);
    }

    if stopped {
        bail!(
            "Stopped after step {} of {}",
            results.len(),
            script.steps.len()
        );
    }

    Ok(())
}

/// Print one step result in human form.
pub fn print_step(ctx: &Context, num: usize, total: usize, result: &StepResult) {
    ctx.output.step(
        num,
        total,
        &format!(
            "{} [{}] {}",
            result.operation.describe(),
            outcome_badge(result.outcome),
            result.headline()
        ),
    );

    let Some(ref response) = result.response else {
        return;
    };

    match result.operation.name() {
        "add" | "cart" => {
            ctx.output.kv("Items", &count_items(response).to_string());
            ctx.output.kv("Subtotal", &money(&response["subtotal"]));
        }
        "checkout" => {
            let order = &response["order"];
            ctx.output.kv("Order", order["orderId"].as_str().unwrap_or("-"));
            ctx.output.kv("Subtotal", &money(&order["subtotal"]));
            if let Some(code) = order["discountCode"].as_str() {
                ctx.output.kv(
                    "Discount",
                    &format!("-{} ({})", money(&order["discountAmount"]), code),
                );
            }
            if let Some(rejected) = response.get("rejectedCode") {
                ctx.output.kv(
                    "Code not applied",
                    &format!(
                        "{} ({})",
                        rejected["code"].as_str().unwrap_or("-"),
                        rejected["reason"].as_str().unwrap_or("-")
                    ),
                );
            }
            ctx.output.kv("Total", &money(&order["total"]));
        }
        "generate" => {
            if let Some(code) = response["code"].as_str() {
                ctx.output.kv("Code", code);
            }
            ctx.output
                .kv("Order count", &response["currentOrderCount"].to_string());
            ctx.output
                .kv("Next discount at", &response["nextDiscountAt"].to_string());
        }
        "stats" => {
            ctx.output.kv("Orders", &response["orderCount"].to_string());
            ctx.output
                .kv("Items purchased", &response["totalItemsPurchased"].to_string());
            ctx.output
                .kv("Revenue", &money(&response["totalPurchaseAmount"]));
            ctx.output
                .kv("Discounts given", &money(&response["totalDiscountAmount"]));
            if let Some(codes) = response["discountCodes"].as_array() {
                for code in codes {
                    ctx.output.list_item(&format!(
                        "{} [{}]",
                        code["code"].as_str().unwrap_or("-"),
                        code["status"].as_str().unwrap_or("-")
                    ));
                }
            }
        }
        _ => {}
    }
}

/// Print the session metrics summary.
pub fn print_summary(ctx: &Context, metrics: &SessionMetrics) {
    ctx.output.header("Summary");
    for (name, summary) in &metrics.summary {
        ctx.output.kv(
            name,
            &format!(
                "{}x, avg {}, {} rejected, {} failed",
                summary.count,
                format_duration_us(summary.avg_duration_us()),
                summary.rejected,
                summary.failed
            ),
        );
    }

    let failures = metrics.failures();
    let line = format!(
        "{} operation(s) in {}",
        metrics.operation_count(),
        format_duration_us(metrics.total_duration_us)
    );
    if failures == 0 {
        ctx.output.success(&line);
    } else {
        ctx.output
            .warn(&format!("{}, {} {}", line, failures, outcome_badge(Outcome::Error)));
    }
}

fn count_items(view: &Value) -> i64 {
    view["items"]
        .as_array()
        .map(|items| items.iter().filter_map(|i| i["quantity"].as_i64()).sum())
        .unwrap_or(0)
}

fn money(value: &Value) -> String {
    value
        .as_f64()
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| "-".to_string())
}

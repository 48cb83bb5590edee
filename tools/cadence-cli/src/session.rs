//! Shop sessions: scripted operations replayed against an in-memory shop.

use std::path::Path;

use anyhow::{bail, Context as _, Result};
use cadence_commerce::{CommerceError, Shop};
use cadence_observability::{
    MetricsCollector, OperationId, Outcome, SessionMetrics, StructuredLogger,
};
use serde::{Deserialize, Serialize};

use crate::config::CliConfig;

/// One shop operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Operation {
    /// Add an item to a user's cart.
    Add {
        user: String,
        item: String,
        #[serde(default = "default_quantity")]
        quantity: i64,
    },
    /// Show a user's cart.
    Cart { user: String },
    /// Check out a user's cart, optionally with a discount code.
    Checkout {
        user: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<String>,
    },
    /// Manually request a discount code.
    Generate,
    /// Show store statistics.
    Stats,
    /// Drop all carts, orders and codes.
    Reset,
}

fn default_quantity() -> i64 {
    1
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Add { .. } => "add",
            Operation::Cart { .. } => "cart",
            Operation::Checkout { .. } => "checkout",
            Operation::Generate => "generate",
            Operation::Stats => "stats",
            Operation::Reset => "reset",
        }
    }

    /// Short description for progress and prompts.
    pub fn describe(&self) -> String {
        match self {
            Operation::Add {
                user,
                item,
                quantity,
            } => format!("add {} x{} for {}", item, quantity, user),
            Operation::Cart { user } => format!("cart of {}", user),
            Operation::Checkout { user, code: Some(code) } => {
                format!("checkout {} with {}", user, code)
            }
            Operation::Checkout { user, code: None } => format!("checkout {}", user),
            Operation::Generate => "generate discount".to_string(),
            Operation::Stats => "statistics".to_string(),
            Operation::Reset => "reset".to_string(),
        }
    }
}

/// An ordered list of operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionScript {
    #[serde(default, rename = "step")]
    pub steps: Vec<Operation>,
}

impl SessionScript {
    /// Load a script from a TOML or JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read session script: {}", path.display()))?;
        let json = path.extension().map_or(false, |e| e == "json");
        Self::parse(&content, json)
            .with_context(|| format!("Failed to parse session script: {}", path.display()))
    }

    /// Parse a script. JSON may be a bare array of steps.
    pub fn parse(content: &str, json: bool) -> Result<Self> {
        let script: Self = if json {
            match serde_json::from_str::<Vec<Operation>>(content) {
                Ok(steps) => Self { steps },
                Err(_) => serde_json::from_str(content)?,
            }
        } else {
            toml::from_str(content)?
        };

        if script.steps.is_empty() {
            bail!("session script has no steps");
        }
        Ok(script)
    }
}

/// Result of one executed operation.
#[derive(Debug, Clone, Serialize)]
pub struct StepResult {
    pub operation: Operation,
    pub outcome: Outcome,
    /// Serialized shop response, absent on error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Stable error code (`empty_cart`, `item_not_found`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<&'static str>,
    pub duration_us: u64,
}

impl StepResult {
    /// Main line shown for the step in human output.
    pub fn headline(&self) -> String {
        if let Some(ref error) = self.error {
            return error.clone();
        }
        let message = self
            .response
            .as_ref()
            .and_then(|r| r.get("message"))
            .and_then(|m| m.as_str());
        match message {
            Some(m) => m.to_string(),
            None => "done".to_string(),
        }
    }
}

/// Runs operations against one shop, logging and timing each.
pub struct SessionRunner {
    shop: Shop,
    logger: StructuredLogger,
    metrics: MetricsCollector,
}

impl SessionRunner {
    /// Build a fresh shop from the configuration.
    pub fn new(config: &CliConfig) -> Result<Self> {
        let shop = config.build_shop()?;
        let logger = StructuredLogger::new(OperationId::generate())
            .with_shop(shop.config().name.clone())
            .with_min_level(config.logging.level)
            .with_format(config.logging.format);
        Ok(Self::with_parts(shop, logger))
    }

    pub fn with_parts(shop: Shop, logger: StructuredLogger) -> Self {
        Self {
            shop,
            logger,
            metrics: MetricsCollector::new(),
        }
    }

    pub fn shop(&self) -> &Shop {
        &self.shop
    }

    /// Execute one operation.
    pub fn execute(&mut self, operation: &Operation) -> StepResult {
        let logger = self.logger.for_operation(operation.name());
        let timer = self
            .metrics
            .start(operation.name(), logger.operation_id().clone());

        let result = self.dispatch(operation);

        let (outcome, response, error) = match result {
            Ok((outcome, response)) => (outcome, Some(response), None),
            Err(e) => (Outcome::Error, None, Some(e)),
        };

        let detail = error.as_ref().map(|e| e.to_string());
        let recorded = self.metrics.finish(timer, outcome, detail.clone());
        let duration_us = recorded.duration_us;

        let builder = match outcome {
            Outcome::Error => logger.warn_builder("operation failed"),
            _ => logger.info_builder("operation complete"),
        };
        builder
            .field("step", operation.describe())
            .field("outcome", outcome.as_str())
            .field_opt("error", detail.clone())
            .field_i64("duration_us", duration_us as i64)
            .emit();

        StepResult {
            operation: operation.clone(),
            outcome,
            response,
            error_code: error.as_ref().map(CommerceError::code),
            error: detail,
            duration_us,
        }
    }

    fn dispatch(
        &self,
        operation: &Operation,
    ) -> Result<(Outcome, serde_json::Value), CommerceError> {
        let shop = &self.shop;
        match operation {
            Operation::Add {
                user,
                item,
                quantity,
            } => {
                let view = shop.add_to_cart(user, item, *quantity)?;
                Ok((Outcome::Ok, to_value(&view)))
            }
            Operation::Cart { user } => {
                let view = shop.cart_view(user)?;
                Ok((Outcome::Ok, to_value(&view)))
            }
            Operation::Checkout { user, code } => {
                let receipt = shop.checkout(user, code.as_deref())?;
                let outcome = if receipt.rejected_code.is_some() {
                    Outcome::Rejected
                } else {
                    Outcome::Ok
                };
                Ok((outcome, to_value(&receipt)))
            }
            Operation::Generate => {
                let report = shop.admin_generate_discount()?;
                let outcome = if report.success {
                    Outcome::Ok
                } else {
                    Outcome::Rejected
                };
                Ok((outcome, to_value(&report)))
            }
            Operation::Stats => {
                let stats = shop.admin_statistics()?;
                Ok((Outcome::Ok, to_value(&stats)))
            }
            Operation::Reset => {
                shop.reset()?;
                Ok((Outcome::Ok, serde_json::json!({ "message": "Shop state reset" })))
            }
        }
    }

    /// Finish the session and return its metrics.
    pub fn finish(self) -> SessionMetrics {
        self.metrics.finalize()
    }
}

fn to_value<T: Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or(serde_json::Value::Null)
}

/// A sample session exercising the discount cadence.
pub fn generate_sample_session() -> String {
    let mut out = String::from("# Cadence session script. Run with `cadence run session.toml`.\n");
    for i in 1..=5 {
        out.push_str(&format!(
            "\n[[step]]\nop = \"add\"\nuser = \"user{i}\"\nitem = \"item002\"\nquantity = 1\n\n[[step]]\nop = \"checkout\"\nuser = \"user{i}\"\n",
            i = i
        ));
    }
    out.push_str(
        r#"
[[step]]
op = "generate"

[[step]]
op = "add"
user = "user6"
item = "item001"
quantity = 2

[[step]]
op = "checkout"
user = "user6"
code = "DISCOUNT1"

[[step]]
op = "stats"
"#,
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_commerce::ShopConfig;
    use cadence_observability::LogLevel;

    fn runner() -> SessionRunner {
        let shop = Shop::seeded(ShopConfig::default()).unwrap();
        let logger = StructuredLogger::new(OperationId::generate()).with_min_level(LogLevel::Error);
        SessionRunner::with_parts(shop, logger)
    }

    #[test]
    fn test_parse_toml_script() {
        let script = SessionScript::parse(
            r#"
[[step]]
op = "add"
user = "user1"
item = "item001"

[[step]]
op = "checkout"
user = "user1"
code = "DISCOUNT1"

[[step]]
op = "stats"
"#,
            false,
        )
        .unwrap();

        assert_eq!(
            script.steps,
            vec![
                Operation::Add {
                    user: "user1".into(),
                    item: "item001".into(),
                    quantity: 1,
                },
                Operation::Checkout {
                    user: "user1".into(),
                    code: Some("DISCOUNT1".into()),
                },
                Operation::Stats,
            ]
        );
    }

    #[test]
    fn test_parse_json_array_and_object() {
        let array = r#"[{"op": "generate"}, {"op": "reset"}]"#;
        assert_eq!(SessionScript::parse(array, true).unwrap().steps.len(), 2);

        let object = r#"{"step": [{"op": "cart", "user": "u"}]}"#;
        assert_eq!(SessionScript::parse(object, true).unwrap().steps.len(), 1);
    }

    #[test]
    fn test_parse_rejects_empty_and_unknown() {
        assert!(SessionScript::parse("", false).is_err());
        assert!(SessionScript::parse(r#"[{"op": "refund"}]"#, true).is_err());
    }

    #[test]
    fn test_sample_session_runs_clean() {
        let script = SessionScript::parse(&generate_sample_session(), false).unwrap();
        let mut runner = runner();

        let results: Vec<StepResult> = script.steps.iter().map(|s| runner.execute(s)).collect();
        assert!(results.iter().all(|r| r.outcome != Outcome::Error));

        // Fifth checkout mints DISCOUNT1, so the manual request is refused.
        let generate = results
            .iter()
            .find(|r| r.operation == Operation::Generate)
            .unwrap();
        assert_eq!(generate.outcome, Outcome::Rejected);

        let last_checkout = &results[results.len() - 2];
        let response = last_checkout.response.as_ref().unwrap();
        assert_eq!(response["order"]["discountCode"], "DISCOUNT1");

        let metrics = runner.finish();
        assert_eq!(metrics.operation_count(), script.steps.len());
        assert_eq!(metrics.summary["checkout"].count, 6);
        assert_eq!(metrics.failures(), 0);
    }

    #[test]
    fn test_errors_are_reported_not_raised() {
        let mut runner = runner();
        let result = runner.execute(&Operation::Checkout {
            user: "nobody".into(),
            code: None,
        });
        assert_eq!(result.outcome, Outcome::Error);
        assert_eq!(result.error_code, Some("empty_cart"));
        assert!(result.response.is_none());
        assert_eq!(runner.finish().failures(), 1);
    }

    #[test]
    fn test_headline_uses_message() {
        let mut runner = runner();
        runner.execute(&Operation::Add {
            user: "u".into(),
            item: "item002".into(),
            quantity: 1,
        });
        let result = runner.execute(&Operation::Checkout {
            user: "u".into(),
            code: None,
        });
        assert_eq!(result.headline(), "Order placed successfully");
    }
}

//! Discount registry: issuance cadence and single-use redemption.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::ShopConfig;
use crate::discount::DiscountCode;
use crate::error::CommerceError;
use crate::ids::OrderId;
use crate::money::Money;

/// Result of an issuance attempt. None of these are errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum IssueOutcome {
    /// A new code was minted.
    Issued {
        code: String,
        order_count: u64,
        next_threshold: u64,
    },
    /// The order count is a multiple of N but an unused code already exists.
    AlreadyOutstanding {
        code: String,
        order_count: u64,
        next_threshold: u64,
    },
    /// The order count is not a positive multiple of N.
    NotYetEligible {
        order_count: u64,
        next_threshold: u64,
        orders_remaining: u64,
    },
}

impl IssueOutcome {
    /// The freshly minted code, if any.
    pub fn issued_code(&self) -> Option<&str> {
        match self {
            IssueOutcome::Issued { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Check if a new code was minted.
    pub fn is_issued(&self) -> bool {
        matches!(self, IssueOutcome::Issued { .. })
    }
}

/// Why a supplied code was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// No such code was ever issued.
    Unknown,
    /// The code was already redeemed.
    AlreadyUsed,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::Unknown => "not found",
            RejectReason::AlreadyUsed => "already used",
        }
    }
}

/// Result of checking a code presented at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redemption {
    /// The code is unused; `amount` is the discount it yields.
    Applied { code: String, amount: Money },
    /// The code could not be applied; checkout continues without discount.
    Rejected { code: String, reason: RejectReason },
}

/// Tracks every issued code and the single outstanding one.
#[derive(Debug, Clone)]
pub struct DiscountRegistry {
    codes: Vec<DiscountCode>,
    index: HashMap<String, usize>,
    outstanding: Option<usize>,
    sequence: u64,
    nth_order: u64,
    discount_percent: u32,
    code_prefix: String,
}

impl DiscountRegistry {
    /// Create an empty registry using the cadence settings of `config`.
    pub fn new(config: &ShopConfig) -> Self {
        Self {
            codes: Vec::new(),
            index: HashMap::new(),
            outstanding: None,
            sequence: 0,
            nth_order: config.nth_order.max(1),
            discount_percent: config.discount_percent,
            code_prefix: config.code_prefix.clone(),
        }
    }

    /// The current unused code, if one exists.
    pub fn outstanding(&self) -> Option<&DiscountCode> {
        self.outstanding.and_then(|pos| self.codes.get(pos))
    }

    /// Issuance cadence.
    pub fn nth_order(&self) -> u64 {
        self.nth_order
    }

    /// Try to mint a code for the given global order count.
    ///
    /// Issuance requires `order_count` to be a positive multiple of N and no
    /// unused code to exist. Called automatically after every checkout and
    /// on manual admin requests.
    pub fn issue(&mut self, order_count: u64) -> IssueOutcome {
        let n = self.nth_order;

        if order_count == 0 || order_count % n != 0 {
            let next_threshold = (order_count / n + 1) * n;
            debug!(order_count, next_threshold, "discount issuance not yet eligible");
            return IssueOutcome::NotYetEligible {
                order_count,
                next_threshold,
                orders_remaining: next_threshold - order_count,
            };
        }

        if let Some(existing) = self.outstanding() {
            debug!(order_count, code = %existing.code, "unused discount code already exists");
            return IssueOutcome::AlreadyOutstanding {
                code: existing.code.clone(),
                order_count,
                next_threshold: order_count + n,
            };
        }

        let code = self.next_code();
        let pos = self.codes.len();
        self.codes.push(DiscountCode::new(code.clone()));
        self.index.insert(code.clone(), pos);
        self.outstanding = Some(pos);

        info!(order_count, code = %code, "discount code issued");

        IssueOutcome::Issued {
            code,
            order_count,
            next_threshold: order_count + n,
        }
    }

    /// Check whether `code` can be applied to an order worth `subtotal`.
    ///
    /// Nothing is mutated; pair with [`consume`](Self::consume) once the
    /// order is recorded. An unknown or used code yields
    /// `Redemption::Rejected`, never an error; the only error is arithmetic
    /// overflow computing the discount.
    pub fn check(&self, code: &str, subtotal: Money) -> Result<Redemption, CommerceError> {
        let Some(record) = self.get(code) else {
            debug!(code, "discount code not found");
            return Ok(Redemption::Rejected {
                code: code.to_string(),
                reason: RejectReason::Unknown,
            });
        };

        if record.is_used() {
            debug!(code, "discount code already used");
            return Ok(Redemption::Rejected {
                code: code.to_string(),
                reason: RejectReason::AlreadyUsed,
            });
        }

        let amount = subtotal
            .try_percentage(self.discount_percent)
            .ok_or(CommerceError::Overflow)?;

        Ok(Redemption::Applied {
            code: code.to_string(),
            amount,
        })
    }

    /// Redeem `code` for `order_id`.
    ///
    /// This is the only transition from unused to used. Returns false, and
    /// changes nothing, if the code is unknown or already used.
    pub fn consume(&mut self, code: &str, order_id: &OrderId) -> bool {
        let Some(pos) = self.index.get(code).copied() else {
            return false;
        };
        let Some(record) = self.codes.get_mut(pos) else {
            return false;
        };
        if !record.mark_used(order_id.clone()) {
            return false;
        }

        if self.outstanding == Some(pos) {
            self.outstanding = None;
        }

        info!(code, order = %order_id, "discount code redeemed");
        true
    }

    /// Look up a code.
    pub fn get(&self, code: &str) -> Option<&DiscountCode> {
        self.index.get(code).and_then(|&pos| self.codes.get(pos))
    }

    /// Every issued code in issuance order.
    pub fn codes(&self) -> &[DiscountCode] {
        &self.codes
    }

    /// Forget every code and restart the sequence.
    pub fn reset(&mut self) {
        self.codes.clear();
        self.index.clear();
        self.outstanding = None;
        self.sequence = 0;
    }

    fn next_code(&mut self) -> String {
        loop {
            self.sequence += 1;
            let candidate = format!("{}{}", self.code_prefix, self.sequence);
            if !self.index.contains_key(&candidate) {
                return candidate;
            }
        }
    }
}

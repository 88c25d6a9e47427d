//! Deposit form. No payment backend: confirming credits the balance.

use crate::{
    config::DepositConfig,
    currency::format_brl,
    error::{CasinoError, CasinoResult},
    ledger::Session,
    types::Credits,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Pix,
    Boleto,
    Card,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DepositReceipt {
    pub amount:  Credits,
    pub method:  PaymentMethod,
    pub message: String,
}

pub struct DepositForm {
    limits: DepositConfig,
    amount: Option<Credits>,
    method: Option<PaymentMethod>,
}

impl DepositForm {
    pub fn new(limits: DepositConfig) -> Self {
        Self { limits, amount: None, method: None }
    }

    pub fn amount(&self) -> Option<Credits> {
        self.amount
    }

    pub fn method(&self) -> Option<PaymentMethod> {
        self.method
    }

    /// Accept typed input. Empty input clears the amount; anything
    /// non-numeric or outside the limits is rejected and leaves the
    /// previous amount in place.
    pub fn enter_amount(&mut self, raw: &str) -> CasinoResult<()> {
        let raw = raw.trim();
        if raw.is_empty() {
            self.amount = None;
            return Ok(());
        }
        let value: f64 = raw
            .replace(',', ".")
            .parse()
            .map_err(|_| CasinoError::invalid(format!("'{raw}' is not an amount")))?;
        self.check_bounds(value)?;
        self.amount = Some(value);
        Ok(())
    }

    pub fn pick_quick_value(&mut self, value: Credits) -> CasinoResult<()> {
        if !self.limits.quick_values.iter().any(|v| (v - value).abs() < f64::EPSILON) {
            return Err(CasinoError::invalid(format!("{value} is not a quick value")));
        }
        self.amount = Some(value);
        Ok(())
    }

    pub fn select_method(&mut self, method: PaymentMethod) {
        self.method = Some(method);
    }

    pub fn is_ready(&self) -> bool {
        self.amount.is_some() && self.method.is_some()
    }

    /// Credit the amount and reset the form.
    pub fn submit(&mut self, session: &mut Session) -> CasinoResult<DepositReceipt> {
        let (Some(amount), Some(method)) = (self.amount, self.method) else {
            return Err(CasinoError::invalid("choose an amount and a payment method"));
        };
        session.credit(amount)?;
        self.amount = None;
        self.method = None;
        log::info!("deposit of {amount:.2} via {method:?}");
        Ok(DepositReceipt {
            amount,
            method,
            message: format!("Payment completed! {} deposited.", format_brl(amount)),
        })
    }

    fn check_bounds(&self, value: f64) -> CasinoResult<()> {
        if !value.is_finite() || value < self.limits.min || value > self.limits.max {
            return Err(CasinoError::invalid(format!(
                "deposit must be between {} and {}",
                format_brl(self.limits.min),
                format_brl(self.limits.max)
            )));
        }
        Ok(())
    }
}

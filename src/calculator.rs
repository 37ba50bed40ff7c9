//! State and rules of the tip calculator page.
//!
//! All inputs are kept as the text the user typed. Numbers are read leniently:
//! blank or unparsable text counts as zero, so the summary is always defined.

use crate::client::{ClientError, TipCalculationsApi};
use crate::models::{TipCalculation, TipCalculationDraft};
use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::error;

pub const PRESET_PERCENTAGES: [u32; 5] = [10, 15, 18, 20, 25];
pub const TOAST_DURATION: Duration = Duration::from_secs(3);
pub const SUBMITTED_MESSAGE: &str = "Tip calculation submitted successfully!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TipMode {
    #[default]
    PercentageDriven,
    AmountDriven,
}

impl TipMode {
    /// New tip text after a bill or percentage change, `None` when the tip is
    /// user-entered and must be left alone.
    fn derive_tip(self, bill: f64, percentage: f64) -> Option<String> {
        match self {
            TipMode::PercentageDriven => {
                Some(format_amount(round_cents(bill * percentage / 100.0)))
            }
            TipMode::AmountDriven => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub bill: f64,
    pub tip: f64,
    pub total: f64,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Please fill in all required fields")]
    MissingRequiredFields,
    #[error("Failed to submit tip calculation")]
    Rejected(#[from] ClientError),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalculatorForm {
    customer_name: String,
    mobile_number: String,
    bill_amount: String,
    tip_percentage: String,
    tip_amount: String,
    mode: TipMode,
    selected_preset: Option<u32>,
}

impl CalculatorForm {
    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn mobile_number(&self) -> &str {
        &self.mobile_number
    }

    pub fn bill_amount(&self) -> &str {
        &self.bill_amount
    }

    pub fn tip_percentage(&self) -> &str {
        &self.tip_percentage
    }

    pub fn tip_amount(&self) -> &str {
        &self.tip_amount
    }

    pub fn mode(&self) -> TipMode {
        self.mode
    }

    pub fn selected_preset(&self) -> Option<u32> {
        self.selected_preset
    }

    pub fn set_customer_name(&mut self, value: impl Into<String>) {
        self.customer_name = value.into();
    }

    pub fn set_mobile_number(&mut self, value: impl Into<String>) {
        self.mobile_number = value.into();
    }

    pub fn set_bill_amount(&mut self, value: impl Into<String>) {
        self.bill_amount = value.into();
        self.recompute();
    }

    /// A typed percentage is never a preset, even if it matches one.
    pub fn set_tip_percentage(&mut self, value: impl Into<String>) {
        self.tip_percentage = value.into();
        self.selected_preset = None;
        self.recompute();
    }

    pub fn set_tip_amount(&mut self, value: impl Into<String>) {
        self.tip_amount = value.into();
    }

    pub fn select_preset(&mut self, percentage: u32) {
        self.mode = TipMode::PercentageDriven;
        self.selected_preset = Some(percentage);
        self.tip_percentage = percentage.to_string();
        self.recompute();
    }

    pub fn set_mode(&mut self, mode: TipMode) {
        self.mode = mode;
        self.recompute();
    }

    pub fn summary(&self) -> Summary {
        let bill = parse_number(&self.bill_amount);
        let tip = parse_number(&self.tip_amount);
        Summary {
            bill,
            tip,
            total: bill + tip,
        }
    }

    /// Builds the create request. The percentage is always recomputed from the
    /// tip and bill, whatever the percentage field shows.
    pub fn submission(&self) -> Result<TipCalculationDraft, SubmitError> {
        let Summary { bill, tip, .. } = self.summary();
        if self.customer_name.is_empty() || self.mobile_number.is_empty() || bill <= 0.0 {
            return Err(SubmitError::MissingRequiredFields);
        }

        Ok(TipCalculationDraft {
            customer_name: Some(self.customer_name.clone()),
            mobile_number: Some(self.mobile_number.clone()),
            bill_amount: Some(round_cents(bill)),
            tip_amount: Some(round_cents(tip)),
            total_amount: Some(round_cents(bill + tip)),
            tip_percentage: Some((tip / bill * 100.0).round() as i64),
            date: None,
        })
    }

    /// Clears every field and the preset; the mode is kept.
    pub fn reset(&mut self) {
        *self = Self {
            mode: self.mode,
            ..Self::default()
        };
    }

    fn recompute(&mut self) {
        let bill = parse_number(&self.bill_amount);
        let percentage = parse_number(&self.tip_percentage);
        if let Some(tip) = self.mode.derive_tip(bill, percentage) {
            self.tip_amount = tip;
        }
    }
}

/// A saved calculation as the history list shows it.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub id: String,
    pub customer_name: String,
    pub mobile_number: String,
    pub bill_amount: f64,
    pub tip_amount: f64,
    pub total_amount: f64,
    pub tip_percentage: i64,
    pub date: String,
}

impl From<TipCalculation> for HistoryEntry {
    fn from(record: TipCalculation) -> Self {
        Self {
            date: format_history_date(&record.date.with_timezone(&Local)),
            id: record.id,
            customer_name: record.customer_name,
            mobile_number: record.mobile_number,
            bill_amount: record.bill_amount,
            tip_amount: record.tip_amount,
            total_amount: record.total_amount,
            tip_percentage: record.tip_percentage,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Toast {
    shown_at: Option<Instant>,
}

impl Toast {
    pub fn show(&mut self, now: Instant) {
        self.shown_at = Some(now);
    }

    pub fn dismiss(&mut self) {
        self.shown_at = None;
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        self.shown_at
            .is_some_and(|shown| now.saturating_duration_since(shown) < TOAST_DURATION)
    }
}

/// The calculator page: form, history and notifications, talking to the API.
pub struct CalculatorPage<A> {
    api: A,
    form: CalculatorForm,
    history: Vec<HistoryEntry>,
    toast: Toast,
    notice: Option<String>,
}

impl<A: TipCalculationsApi> CalculatorPage<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            form: CalculatorForm::default(),
            history: Vec::new(),
            toast: Toast::default(),
            notice: None,
        }
    }

    pub fn form(&self) -> &CalculatorForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut CalculatorForm {
        &mut self.form
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Blocking message the user still has to acknowledge.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn acknowledge_notice(&mut self) {
        self.notice = None;
    }

    pub fn toast_visible(&self, now: Instant) -> bool {
        self.toast.is_visible(now)
    }

    pub fn dismiss_toast(&mut self) {
        self.toast.dismiss();
    }

    /// Loads the history once; a failure is logged and the list stays empty.
    pub async fn load_history(&mut self) {
        match self.api.list_recent().await {
            Ok(records) => {
                self.history = records.into_iter().map(HistoryEntry::from).collect();
            }
            Err(err) => error!("failed to fetch history: {err}"),
        }
    }

    pub async fn submit(&mut self, now: Instant) -> Result<(), SubmitError> {
        let draft = match self.form.submission() {
            Ok(draft) => draft,
            Err(err) => {
                self.notice = Some(err.to_string());
                return Err(err);
            }
        };

        match self.api.create(&draft).await {
            Ok(record) => {
                self.history.insert(0, HistoryEntry::from(record));
                self.toast.show(now);
                self.form.reset();
                Ok(())
            }
            Err(err) => {
                error!("error submitting tip calculation: {err}");
                let err = SubmitError::from(err);
                self.notice = Some(err.to_string());
                Err(err)
            }
        }
    }
}

pub fn parse_number(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn format_amount(value: f64) -> String {
    // Avoid "-0.00".
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value:.2}")
}

/// "Month Day, Year", e.g. "March 7, 2026".
pub fn format_history_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    date.format("%B %-d, %Y").to_string()
}

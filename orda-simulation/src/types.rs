use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndustryPick {
    pub industry_name: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndustryAnalysis {
    #[serde(default)]
    pub industries: Vec<IndustryPick>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StockPick {
    pub name: String,
    pub ticker: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StockAnalysis {
    #[serde(default)]
    pub related_stocks: Vec<StockPick>,
}

impl StockAnalysis {
    /// Ticker to display name.
    pub fn tickers(&self) -> BTreeMap<String, String> {
        self.related_stocks
            .iter()
            .map(|s| (s.ticker.clone(), s.name.clone()))
            .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TickerStatus {
    Up,
    Down,
    Flat,
    Error,
}

impl TickerStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TickerStatus::Up => "up",
            TickerStatus::Down => "down",
            TickerStatus::Flat => "flat",
            TickerStatus::Error => "error",
        }
    }
}

/// Outcome of one holding over the evaluation window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TickerResult {
    pub status: TickerStatus,
    pub return_rate: f64,
    pub investment: f64,
    pub final_value: f64,
    pub profit_loss: f64,
    pub start_price: f64,
    pub end_price: f64,
    pub start_date: String,
    pub end_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TickerResult {
    /// The investment is returned untouched.
    pub fn failed(investment: f64, message: impl Into<String>) -> Self {
        Self {
            status: TickerStatus::Error,
            return_rate: 0.0,
            investment,
            final_value: investment,
            profit_loss: 0.0,
            start_price: 0.0,
            end_price: 0.0,
            start_date: String::new(),
            end_date: String::new(),
            message: Some(message.into()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: String,
    pub close: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub ticker: String,
    pub name: String,
    pub points: Vec<ChartPoint>,
}

/// Closing-price lines around an event, for the client to draw.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StockChart {
    pub event_date: String,
    pub start_date: String,
    pub end_date: String,
    pub series: Vec<ChartSeries>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndustryRequest {
    pub issue_name: String,
    pub issue_description: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StockRequest {
    pub issue_name: String,
    pub issue_date: String,
    pub industry_name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub issue_name: String,
    pub issue_date: String,
    pub tickers: BTreeMap<String, String>,
    #[serde(default)]
    pub predictions: BTreeMap<String, String>,
    #[serde(default)]
    pub investments: BTreeMap<String, f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub total_investment: f64,
    pub total_final_value: f64,
    pub total_profit_loss: f64,
    pub prediction_accuracy: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalculationOutcome {
    pub issue_name: String,
    pub tickers: BTreeMap<String, String>,
    pub investment_results: BTreeMap<String, TickerResult>,
    pub predictions: BTreeMap<String, String>,
    pub chart: StockChart,
    #[serde(flatten)]
    pub summary: SimulationSummary,
    pub ai_commentary: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

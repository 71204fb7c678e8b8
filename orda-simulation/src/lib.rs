//! The "past issue" investment game.
//!
//! A player picks a historical event, the advisor proposes industries and
//! then stocks, the player stakes money with up/down/flat predictions and
//! the outcome is scored against real closing prices two weeks later.

mod advisor;
mod error;
mod game;
mod price;
mod prompts;
mod types;

pub use advisor::{SimulationAdvisor, COMMENTARY_FALLBACK};
pub use error::SimulationError;
pub use game::{
    evaluate_holding, parse_event_date, summarize, validate, InvestmentLimits, SimulationService,
};
pub use price::{DailyClose, PriceSource, YahooFinanceSource, YAHOO_CHART_URL};
pub use types::{
    CalculationOutcome, CalculationRequest, ChartPoint, ChartSeries, IndustryAnalysis,
    IndustryPick, IndustryRequest, SimulationSummary, StockAnalysis, StockChart, StockPick,
    StockRequest, TickerResult, TickerStatus, ValidationResponse,
};

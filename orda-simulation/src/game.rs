use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use orda_core::round_to;

use crate::{
    CalculationOutcome, CalculationRequest, ChartPoint, ChartSeries, DailyClose, PriceSource,
    SimulationAdvisor, SimulationError, SimulationSummary, StockChart, TickerResult, TickerStatus,
    ValidationResponse,
};

const DATE_FORMAT: &str = "%Y-%m-%d";
const CHART_HISTORY_DAYS: i64 = 60;
const HOLDING_DAYS: i64 = 14;
const DOWNLOAD_MARGIN_DAYS: i64 = 30;
/// Moves within this many percent count as flat.
const FLAT_BAND: f64 = 0.1;
const INVALID_DATE: &str = "잘못된 날짜 형식";
const PREDICTIONS: [&str; 3] = ["up", "down", "flat"];

/// Bounds on the player's total stake.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InvestmentLimits {
    pub min_total: f64,
    pub max_total: f64,
}

impl Default for InvestmentLimits {
    fn default() -> Self {
        Self {
            min_total: 10_000.0,
            max_total: 100_000_000.0,
        }
    }
}

pub fn parse_event_date(value: &str) -> Result<NaiveDate, SimulationError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| SimulationError::InvalidDate(value.to_string()))
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Scores one holding from its closes around `event`.
///
/// Entry is the last close on or before the event. Exit is the last close
/// within two weeks after it, or the first later close when that window is
/// empty.
pub fn evaluate_holding(
    ticker: &str,
    closes: &[DailyClose],
    event: NaiveDate,
    investment: f64,
) -> Result<TickerResult, SimulationError> {
    if closes.is_empty() {
        return Err(SimulationError::NoData(ticker.to_string()));
    }
    let start = closes
        .iter()
        .filter(|c| c.date <= event)
        .last()
        .ok_or_else(|| SimulationError::NoDataBeforeEvent(ticker.to_string()))?;

    let after: Vec<&DailyClose> = closes.iter().filter(|c| c.date > event).collect();
    let horizon = event + Duration::days(HOLDING_DAYS);
    let end = after
        .iter()
        .filter(|c| c.date <= horizon)
        .last()
        .or_else(|| after.first())
        .copied()
        .ok_or_else(|| SimulationError::NoDataAfterEvent(ticker.to_string()))?;

    if !(start.close.is_finite() && start.close > 0.0 && end.close.is_finite()) {
        return Err(SimulationError::InvalidPrice(ticker.to_string()));
    }
    let return_rate = (end.close - start.close) / start.close * 100.0;
    let (final_value, profit_loss) = if investment == 0.0 {
        (0.0, 0.0)
    } else {
        let final_value = investment * (1.0 + return_rate / 100.0);
        (final_value, final_value - investment)
    };
    let status = if return_rate > FLAT_BAND {
        TickerStatus::Up
    } else if return_rate < -FLAT_BAND {
        TickerStatus::Down
    } else {
        TickerStatus::Flat
    };

    Ok(TickerResult {
        status,
        return_rate: round_to(return_rate, 2),
        investment,
        final_value: round_to(final_value, 2),
        profit_loss: round_to(profit_loss, 2),
        start_price: round_to(start.close, 2),
        end_price: round_to(end.close, 2),
        start_date: format_date(start.date),
        end_date: format_date(end.date),
        message: None,
    })
}

/// Totals and the share of predictions that matched the outcome.
pub fn summarize(
    results: &BTreeMap<String, TickerResult>,
    investments: &BTreeMap<String, f64>,
    predictions: &BTreeMap<String, String>,
) -> SimulationSummary {
    let total_investment: f64 = investments.values().sum();
    let total_final_value: f64 = results.values().map(|r| r.final_value).sum();
    let prediction_accuracy = if predictions.is_empty() {
        0.0
    } else {
        let correct = predictions
            .iter()
            .filter(|(ticker, prediction)| {
                results
                    .get(*ticker)
                    .is_some_and(|r| r.status.as_str() == prediction.as_str())
            })
            .count();
        correct as f64 / predictions.len() as f64 * 100.0
    };
    SimulationSummary {
        total_investment,
        total_final_value,
        total_profit_loss: total_final_value - total_investment,
        prediction_accuracy,
    }
}

pub fn validate(request: &CalculationRequest, limits: &InvestmentLimits) -> ValidationResponse {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if parse_event_date(&request.issue_date).is_err() {
        errors.push(format!("{INVALID_DATE}: {}", request.issue_date));
    }

    let total: f64 = request.investments.values().sum();
    if total < limits.min_total || total > limits.max_total {
        errors.push(format!(
            "총 투자금은 {:.0}원 이상 {:.0}원 이하여야 합니다. (현재 {:.0}원)",
            limits.min_total, limits.max_total, total
        ));
    }

    for (ticker, amount) in &request.investments {
        if *amount < 0.0 {
            errors.push(format!("{ticker}: 투자금은 음수일 수 없습니다."));
        } else if *amount == 0.0 {
            warnings.push(format!("{ticker}: 투자금이 0원입니다."));
        } else if !request.predictions.contains_key(ticker) {
            warnings.push(format!("{ticker}: 투자했지만 예측이 없습니다."));
        }
    }

    for ticker in request.tickers.keys().chain(request.investments.keys()) {
        if !(ticker.ends_with(".KS") || ticker.ends_with(".KQ")) {
            let message = format!("{ticker}: 종목 코드는 .KS 또는 .KQ로 끝나야 합니다.");
            if !errors.contains(&message) {
                errors.push(message);
            }
        }
    }

    for (ticker, prediction) in &request.predictions {
        if !PREDICTIONS.contains(&prediction.as_str()) {
            errors.push(format!(
                "{ticker}: 예측은 up, down, flat 중 하나여야 합니다. ({prediction})"
            ));
        }
    }

    ValidationResponse {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}

/// Price-driven half of the game plus the advisor calls.
pub struct SimulationService {
    advisor: SimulationAdvisor,
    prices: Arc<dyn PriceSource>,
    limits: InvestmentLimits,
}

impl SimulationService {
    pub fn new(advisor: SimulationAdvisor, prices: Arc<dyn PriceSource>, limits: InvestmentLimits) -> Self {
        Self {
            advisor,
            prices,
            limits,
        }
    }

    pub fn advisor(&self) -> &SimulationAdvisor {
        &self.advisor
    }

    pub fn limits(&self) -> &InvestmentLimits {
        &self.limits
    }

    /// Close series from two months before the event up to the day after
    /// it, or two weeks after it when `show_future` is set.
    pub async fn stock_chart(
        &self,
        event_date: &str,
        tickers: &BTreeMap<String, String>,
        show_future: bool,
    ) -> StockChart {
        let Ok(event) = parse_event_date(event_date) else {
            tracing::warn!(event_date, "chart skipped for invalid date");
            return StockChart {
                event_date: event_date.to_string(),
                ..StockChart::default()
            };
        };
        let start = event - Duration::days(CHART_HISTORY_DAYS);
        let end = if show_future {
            event + Duration::days(HOLDING_DAYS)
        } else {
            event + Duration::days(1)
        };

        let mut series = Vec::new();
        for (ticker, name) in tickers {
            match self.prices.daily_closes(ticker, start, end).await {
                Ok(closes) if !closes.is_empty() => series.push(ChartSeries {
                    ticker: ticker.clone(),
                    name: name.clone(),
                    points: closes
                        .iter()
                        .map(|c| ChartPoint {
                            date: format_date(c.date),
                            close: round_to(c.close, 2),
                        })
                        .collect(),
                }),
                Ok(_) => tracing::warn!(ticker, "no prices for chart"),
                Err(err) => tracing::warn!(ticker, error = %err, "chart prices failed"),
            }
        }

        StockChart {
            event_date: format_date(event),
            start_date: format_date(start),
            end_date: format_date(end),
            series,
        }
    }

    pub async fn get_investment_results(
        &self,
        event_date: &str,
        tickers: &BTreeMap<String, String>,
        investments: &BTreeMap<String, f64>,
    ) -> BTreeMap<String, TickerResult> {
        let invested = |ticker: &str| investments.get(ticker).copied().unwrap_or(0.0);
        let Ok(event) = parse_event_date(event_date) else {
            return tickers
                .keys()
                .map(|t| (t.clone(), TickerResult::failed(invested(t), INVALID_DATE)))
                .collect();
        };
        let start = event - Duration::days(DOWNLOAD_MARGIN_DAYS);
        let end = event + Duration::days(DOWNLOAD_MARGIN_DAYS);

        let mut results = BTreeMap::new();
        for ticker in tickers.keys() {
            let investment = invested(ticker);
            let outcome = match self.prices.daily_closes(ticker, start, end).await {
                Ok(closes) => evaluate_holding(ticker, &closes, event, investment),
                Err(err) => Err(err),
            };
            let result = outcome.unwrap_or_else(|err| {
                tracing::warn!(ticker, error = %err, "holding evaluation failed");
                TickerResult::failed(investment, err.to_string())
            });
            results.insert(ticker.clone(), result);
        }
        results
    }

    /// Scores the player's picks, draws the full chart and asks for
    /// feedback.
    pub async fn calculate_result(&self, request: &CalculationRequest) -> CalculationOutcome {
        let results = self
            .get_investment_results(&request.issue_date, &request.tickers, &request.investments)
            .await;
        let chart = self
            .stock_chart(&request.issue_date, &request.tickers, true)
            .await;
        let ai_commentary = self
            .advisor
            .generate_investment_commentary(&request.issue_name, &results, &request.predictions)
            .await;
        let summary = summarize(&results, &request.investments, &request.predictions);

        CalculationOutcome {
            issue_name: request.issue_name.clone(),
            tickers: request.tickers.clone(),
            investment_results: results,
            predictions: request.predictions.clone(),
            chart,
            summary,
            ai_commentary,
        }
    }

    pub fn validate(&self, request: &CalculationRequest) -> ValidationResponse {
        validate(request, &self.limits)
    }
}

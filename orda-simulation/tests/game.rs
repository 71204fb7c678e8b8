use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use orda_core::{LlmRequest, LlmResponse, OrdaError, Runnable};
use orda_simulation::{
    evaluate_holding, summarize, validate, CalculationRequest, DailyClose, InvestmentLimits,
    PriceSource, SimulationAdvisor, SimulationError, SimulationService, TickerResult,
    TickerStatus, COMMENTARY_FALLBACK,
};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn closes(points: &[(&str, f64)]) -> Vec<DailyClose> {
    points
        .iter()
        .map(|(d, c)| DailyClose {
            date: date(d),
            close: *c,
        })
        .collect()
}

#[test]
fn holding_uses_last_close_within_two_weeks() {
    let series = closes(&[
        ("2020-03-02", 100.0),
        ("2020-03-05", 110.0),
        ("2020-03-06", 112.0),
        ("2020-03-19", 99.0),
        ("2020-03-20", 121.0),
        ("2020-03-30", 150.0),
    ]);
    let result = evaluate_holding("005930.KS", &series, date("2020-03-05"), 1_000_000.0).unwrap();

    assert_eq!(result.start_date, "2020-03-05");
    assert_eq!(result.end_date, "2020-03-19");
    assert_eq!(result.start_price, 110.0);
    assert_eq!(result.end_price, 99.0);
    assert_eq!(result.return_rate, -10.0);
    assert_eq!(result.status, TickerStatus::Down);
    assert_eq!(result.final_value, 900_000.0);
    assert_eq!(result.profit_loss, -100_000.0);
}

#[test]
fn holding_falls_back_to_first_close_after_window() {
    let series = closes(&[("2020-01-10", 50.0), ("2020-02-10", 60.0)]);
    let result = evaluate_holding("000660.KS", &series, date("2020-01-15"), 0.0).unwrap();
    assert_eq!(result.end_date, "2020-02-10");
    assert_eq!(result.return_rate, 20.0);
    assert_eq!(result.status, TickerStatus::Up);
    assert_eq!(result.final_value, 0.0);
    assert_eq!(result.profit_loss, 0.0);
}

#[test]
fn small_moves_are_flat() {
    let series = closes(&[("2021-06-01", 1000.0), ("2021-06-02", 1000.5)]);
    let result = evaluate_holding("035420.KS", &series, date("2021-06-01"), 10_000.0).unwrap();
    assert_eq!(result.status, TickerStatus::Flat);
    assert_eq!(result.return_rate, 0.05);
}

#[test]
fn missing_prices_are_errors() {
    let event = date("2020-03-05");
    assert!(matches!(
        evaluate_holding("A.KS", &[], event, 1.0),
        Err(SimulationError::NoData(_))
    ));
    assert!(matches!(
        evaluate_holding("A.KS", &closes(&[("2020-03-06", 1.0)]), event, 1.0),
        Err(SimulationError::NoDataBeforeEvent(_))
    ));
    assert!(matches!(
        evaluate_holding("A.KS", &closes(&[("2020-03-04", 1.0)]), event, 1.0),
        Err(SimulationError::NoDataAfterEvent(_))
    ));
}

#[test]
fn unusable_base_price_is_an_error() {
    let event = date("2020-03-05");
    for start in [0.0, -5.0, f64::NAN] {
        let series = closes(&[("2020-03-05", start), ("2020-03-06", 10.0)]);
        assert!(matches!(
            evaluate_holding("X.KS", &series, event, 1_000.0),
            Err(SimulationError::InvalidPrice(t)) if t == "X.KS"
        ));
    }
    let series = closes(&[("2020-03-05", 10.0), ("2020-03-06", f64::INFINITY)]);
    assert!(matches!(
        evaluate_holding("X.KS", &series, event, 1_000.0),
        Err(SimulationError::InvalidPrice(_))
    ));
}

fn result(status: TickerStatus, final_value: f64) -> TickerResult {
    TickerResult {
        status,
        final_value,
        ..TickerResult::failed(0.0, "")
    }
}

fn map<V: Clone>(pairs: &[(&str, V)]) -> BTreeMap<String, V> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

#[test]
fn summary_counts_matching_predictions() {
    let results = map(&[
        ("A.KS", result(TickerStatus::Up, 120.0)),
        ("B.KQ", result(TickerStatus::Down, 40.0)),
    ]);
    let investments = map(&[("A.KS", 100.0), ("B.KQ", 50.0)]);
    let predictions = map(&[("A.KS", "up".to_string()), ("B.KQ", "up".to_string())]);

    let summary = summarize(&results, &investments, &predictions);
    assert_eq!(summary.total_investment, 150.0);
    assert_eq!(summary.total_final_value, 160.0);
    assert_eq!(summary.total_profit_loss, 10.0);
    assert_eq!(summary.prediction_accuracy, 50.0);

    let none = summarize(&results, &investments, &BTreeMap::new());
    assert_eq!(none.prediction_accuracy, 0.0);
}

fn request(investments: &[(&str, f64)], predictions: &[(&str, &str)], date: &str) -> CalculationRequest {
    CalculationRequest {
        issue_name: "코로나19".to_string(),
        issue_date: date.to_string(),
        tickers: investments
            .iter()
            .map(|(t, _)| (t.to_string(), format!("{t} 이름")))
            .collect(),
        predictions: predictions
            .iter()
            .map(|(t, p)| (t.to_string(), p.to_string()))
            .collect(),
        investments: map(investments),
    }
}

#[test]
fn validation_reports_errors_and_warnings() {
    let limits = InvestmentLimits::default();

    let ok = validate(
        &request(&[("005930.KS", 500_000.0)], &[("005930.KS", "up")], "2020-03-05"),
        &limits,
    );
    assert!(ok.valid, "{:?}", ok.errors);
    assert!(ok.warnings.is_empty());

    let bad = validate(
        &request(
            &[("005930", 5_000.0), ("000660.KS", -1.0), ("035720.KQ", 0.0), ("068270.KS", 100.0)],
            &[("005930", "sideways")],
            "2020/03/05",
        ),
        &limits,
    );
    assert!(!bad.valid);
    assert!(bad.errors.iter().any(|e| e.contains("잘못된 날짜 형식")));
    assert!(bad.errors.iter().any(|e| e.contains("총 투자금")));
    assert!(bad.errors.iter().any(|e| e.starts_with("000660.KS") && e.contains("음수")));
    assert!(bad.errors.iter().any(|e| e.starts_with("005930:") && e.contains(".KS")));
    assert!(bad.errors.iter().any(|e| e.contains("sideways")));
    assert!(bad.warnings.iter().any(|w| w.starts_with("035720.KQ")));
    assert!(bad.warnings.iter().any(|w| w.starts_with("068270.KS") && w.contains("예측")));
}

struct TablePrices;

#[async_trait::async_trait]
impl PriceSource for TablePrices {
    async fn daily_closes(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyClose>, SimulationError> {
        let all = match ticker {
            "005930.KS" => closes(&[
                ("2020-01-02", 55_000.0),
                ("2020-03-04", 50_000.0),
                ("2020-03-05", 50_000.0),
                ("2020-03-18", 45_000.0),
                ("2020-03-27", 47_000.0),
            ]),
            "000660.KS" => closes(&[("2020-03-05", 90_000.0), ("2020-03-12", 99_000.0)]),
            "000000.KQ" => closes(&[("2020-03-05", 0.0), ("2020-03-06", 1_000.0)]),
            _ => {
                return Err(SimulationError::PriceApi {
                    ticker: ticker.to_string(),
                    message: "No data found, symbol may be delisted".to_string(),
                })
            }
        };
        Ok(all.into_iter().filter(|c| c.date >= start && c.date < end).collect())
    }
}

#[derive(Default)]
struct CommentLlm {
    prompts: Mutex<Vec<String>>,
    fail: bool,
}

#[async_trait::async_trait]
impl Runnable<LlmRequest, LlmResponse> for CommentLlm {
    async fn invoke(&self, input: LlmRequest) -> Result<LlmResponse, OrdaError> {
        self.prompts.lock().unwrap().push(input.messages[1].content.clone());
        if self.fail {
            return Err(OrdaError::Timeout(std::time::Duration::from_secs(30)));
        }
        Ok(LlmResponse {
            content: "## 총평\n좋은 시도였습니다.".to_string(),
        })
    }
}

fn game(llm: Arc<CommentLlm>) -> SimulationService {
    SimulationService::new(
        SimulationAdvisor::new(llm),
        Arc::new(TablePrices),
        InvestmentLimits::default(),
    )
}

#[tokio::test]
async fn calculate_result_scores_each_pick() {
    let llm = Arc::new(CommentLlm::default());
    let service = game(llm.clone());
    let req = request(
        &[("005930.KS", 1_000_000.0), ("000660.KS", 500_000.0), ("999999.KQ", 200_000.0)],
        &[("005930.KS", "down"), ("000660.KS", "down")],
        "2020-03-05",
    );

    let outcome = service.calculate_result(&req).await;

    let samsung = &outcome.investment_results["005930.KS"];
    assert_eq!(samsung.status, TickerStatus::Down);
    assert_eq!(samsung.return_rate, -10.0);
    assert_eq!(samsung.final_value, 900_000.0);

    let hynix = &outcome.investment_results["000660.KS"];
    assert_eq!(hynix.status, TickerStatus::Up);
    assert_eq!(hynix.final_value, 550_000.0);

    let missing = &outcome.investment_results["999999.KQ"];
    assert_eq!(missing.status, TickerStatus::Error);
    assert_eq!(missing.final_value, 200_000.0);
    assert!(missing.message.as_deref().unwrap().contains("delisted"));

    assert_eq!(outcome.summary.total_investment, 1_700_000.0);
    assert_eq!(outcome.summary.total_final_value, 1_650_000.0);
    assert_eq!(outcome.summary.total_profit_loss, -50_000.0);
    assert_eq!(outcome.summary.prediction_accuracy, 50.0);
    assert_eq!(outcome.ai_commentary, "## 총평\n좋은 시도였습니다.");

    // chart runs to two weeks after the event
    assert_eq!(outcome.chart.end_date, "2020-03-19");
    assert_eq!(outcome.chart.series.len(), 2);
    let samsung_points = &outcome.chart.series[1].points;
    assert_eq!(samsung_points.last().unwrap().date, "2020-03-18");

    let prompt = llm.prompts.lock().unwrap()[0].clone();
    assert!(prompt.contains("코로나19"));
    assert!(prompt.contains("\"005930.KS\""));
}

#[tokio::test]
async fn zero_base_price_counts_as_error_in_summary() {
    let service = game(Arc::new(CommentLlm::default()));
    let req = request(
        &[("000000.KQ", 300_000.0), ("000660.KS", 500_000.0)],
        &[("000000.KQ", "up"), ("000660.KS", "up")],
        "2020-03-05",
    );

    let outcome = service.calculate_result(&req).await;

    let broken = &outcome.investment_results["000000.KQ"];
    assert_eq!(broken.status, TickerStatus::Error);
    assert_eq!(broken.return_rate, 0.0);
    assert_eq!(broken.final_value, 300_000.0);
    assert!(broken.message.as_deref().unwrap().starts_with("000000.KQ"));
    assert!(serde_json::to_value(broken).unwrap()["return_rate"].is_number());

    assert_eq!(outcome.summary.total_final_value, 850_000.0);
    assert_eq!(outcome.summary.total_profit_loss, 50_000.0);
    assert_eq!(outcome.summary.prediction_accuracy, 50.0);
}

#[tokio::test]
async fn invalid_date_fails_every_ticker() {
    let service = game(Arc::new(CommentLlm::default()));
    let tickers = map(&[("005930.KS", "삼성전자".to_string())]);
    let investments = map(&[("005930.KS", 10_000.0)]);

    let results = service
        .get_investment_results("05-03-2020", &tickers, &investments)
        .await;
    assert_eq!(results["005930.KS"].status, TickerStatus::Error);
    assert_eq!(results["005930.KS"].message.as_deref(), Some("잘못된 날짜 형식"));
    assert_eq!(results["005930.KS"].final_value, 10_000.0);

    let chart = service.stock_chart("05-03-2020", &tickers, false).await;
    assert!(chart.series.is_empty());
}

#[tokio::test]
async fn pre_event_chart_stops_after_event_day() {
    let service = game(Arc::new(CommentLlm::default()));
    let tickers = map(&[("005930.KS", "삼성전자".to_string())]);

    let chart = service.stock_chart("2020-03-05", &tickers, false).await;
    assert_eq!(chart.start_date, "2020-01-05");
    assert_eq!(chart.end_date, "2020-03-06");
    let dates: Vec<&str> = chart.series[0].points.iter().map(|p| p.date.as_str()).collect();
    assert_eq!(dates, vec!["2020-03-04", "2020-03-05"]);
}

#[tokio::test]
async fn commentary_failure_uses_fallback_text() {
    let llm = Arc::new(CommentLlm {
        fail: true,
        ..CommentLlm::default()
    });
    let service = game(llm);
    let text = service
        .advisor()
        .generate_investment_commentary("x", &BTreeMap::new(), &BTreeMap::new())
        .await;
    assert_eq!(text, COMMENTARY_FALLBACK);
}

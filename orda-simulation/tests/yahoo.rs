use chrono::NaiveDate;
use orda_simulation::{PriceSource, SimulationError, YahooFinanceSource};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[tokio::test]
async fn parses_chart_closes_in_exchange_time() {
    let server = MockServer::start().await;
    // 2020-03-04..06 00:00 KST expressed in UTC seconds
    let body = json!({
        "chart": {
            "result": [{
                "meta": { "gmtoffset": 32400 },
                "timestamp": [1583247600, 1583334000, 1583420400],
                "indicators": { "quote": [{ "close": [57400.0, null, 55900.0] }] }
            }],
            "error": null
        }
    });
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/005930.KS"))
        .and(query_param("interval", "1d"))
        .and(query_param("period1", "1583280000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;

    let source = YahooFinanceSource::with_base_url(server.uri()).unwrap();
    let closes = source
        .daily_closes("005930.KS", date("2020-03-04"), date("2020-03-10"))
        .await
        .unwrap();

    assert_eq!(closes.len(), 2);
    assert_eq!(closes[0].date, date("2020-03-04"));
    assert_eq!(closes[0].close, 57400.0);
    assert_eq!(closes[1].date, date("2020-03-06"));
}

#[tokio::test]
async fn chart_error_is_reported_per_ticker() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/000000.KS"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "chart": {
                "result": null,
                "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" }
            }
        })))
        .mount(&server)
        .await;

    let source = YahooFinanceSource::with_base_url(server.uri()).unwrap();
    let err = source
        .daily_closes("000000.KS", date("2020-03-04"), date("2020-03-10"))
        .await
        .unwrap_err();
    match err {
        SimulationError::PriceApi { ticker, message } => {
            assert_eq!(ticker, "000000.KS");
            assert!(message.contains("delisted"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

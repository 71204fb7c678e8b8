use orda_core::OrdaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("price request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("price API error for {ticker}: {message}")]
    PriceApi { ticker: String, message: String },
    #[error("{0}: 가격 데이터를 가져오지 못했습니다.")]
    NoData(String),
    #[error("{0}: 이벤트 날짜 이전 데이터가 없습니다.")]
    NoDataBeforeEvent(String),
    #[error("{0}: 이벤트 이후 데이터가 없습니다.")]
    NoDataAfterEvent(String),
    #[error("{0}: 가격 데이터가 유효하지 않습니다.")]
    InvalidPrice(String),
    #[error("invalid date '{0}'")]
    InvalidDate(String),
    #[error("LLM call failed: {0}")]
    Llm(#[from] OrdaError),
}

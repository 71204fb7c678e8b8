use std::collections::BTreeMap;
use std::sync::Arc;

use orda_core::{JsonOutputParser, Runnable, RunnableExt, StrOutputParser};
use orda_llm::{models, ChatModel, Llm};
use orda_prompt::{vars, ChatPromptTemplate, PromptVars};
use serde_json::json;

use crate::prompts::{
    COMMENTARY_HUMAN, COMMENTARY_SYSTEM, INDUSTRY_HUMAN, INDUSTRY_SYSTEM, STOCK_HUMAN,
    STOCK_SYSTEM,
};
use crate::{IndustryAnalysis, StockAnalysis, TickerResult};

pub const COMMENTARY_FALLBACK: &str = "결과 분석 코멘트를 생성하는 데 실패했습니다.";

/// The three model calls of the game: industries for an event, stocks for
/// an industry and feedback on the player's picks.
pub struct SimulationAdvisor {
    industries: Arc<dyn Runnable<PromptVars, IndustryAnalysis> + Send + Sync>,
    stocks: Arc<dyn Runnable<PromptVars, StockAnalysis> + Send + Sync>,
    commentary: Arc<dyn Runnable<PromptVars, String> + Send + Sync>,
}

impl SimulationAdvisor {
    pub fn new(llm: Arc<dyn Llm>) -> Self {
        let industries = ChatPromptTemplate::system_human(INDUSTRY_SYSTEM, INDUSTRY_HUMAN)
            .then(ChatModel::new(llm.clone(), models::GPT_4O).temperature(0.1).json())
            .then(JsonOutputParser::<IndustryAnalysis>::new());
        let stocks = ChatPromptTemplate::system_human(STOCK_SYSTEM, STOCK_HUMAN)
            .then(ChatModel::new(llm.clone(), models::GPT_4O).temperature(0.3).json())
            .then(JsonOutputParser::<StockAnalysis>::new());
        let commentary = ChatPromptTemplate::system_human(COMMENTARY_SYSTEM, COMMENTARY_HUMAN)
            .then(ChatModel::new(llm, models::GPT_4O).temperature(0.5))
            .then(StrOutputParser);
        Self {
            industries: Arc::new(industries),
            stocks: Arc::new(stocks),
            commentary: Arc::new(commentary),
        }
    }

    /// `None` when the call fails or names no industry.
    pub async fn analyze_issue_for_industries(
        &self,
        issue_name: &str,
        issue_description: &str,
    ) -> Option<IndustryAnalysis> {
        let input = vars([
            ("issue_name", issue_name),
            ("issue_description", issue_description),
        ]);
        match self.industries.invoke(input).await {
            Ok(analysis) if !analysis.industries.is_empty() => Some(analysis),
            Ok(_) => {
                tracing::warn!(issue_name, "industry analysis returned no industries");
                None
            }
            Err(err) => {
                tracing::error!(issue_name, error = %err, "industry analysis failed");
                None
            }
        }
    }

    /// `None` when the call fails or names no stock.
    pub async fn analyze_industry_for_stocks(
        &self,
        issue_name: &str,
        industry_name: &str,
    ) -> Option<StockAnalysis> {
        let input = vars([("issue_name", issue_name), ("industry_name", industry_name)]);
        match self.stocks.invoke(input).await {
            Ok(analysis) if !analysis.related_stocks.is_empty() => Some(analysis),
            Ok(_) => {
                tracing::warn!(industry_name, "stock analysis returned no stocks");
                None
            }
            Err(err) => {
                tracing::error!(industry_name, error = %err, "stock analysis failed");
                None
            }
        }
    }

    pub async fn generate_investment_commentary(
        &self,
        issue_name: &str,
        results: &BTreeMap<String, TickerResult>,
        predictions: &BTreeMap<String, String>,
    ) -> String {
        let payload = json!({ "predictions": predictions, "results": results });
        let rendered = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string());
        let input = vars([("issue_name", issue_name.to_string()), ("results", rendered)]);
        match self.commentary.invoke(input).await {
            Ok(text) => text,
            Err(err) => {
                tracing::error!(issue_name, error = %err, "commentary generation failed");
                COMMENTARY_FALLBACK.to_string()
            }
        }
    }
}

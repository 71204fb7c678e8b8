use std::sync::Arc;

use orda_core::{
    round_to, Embedding, JsonOutputParser, Runnable, RunnableExt, StrOutputParser, Value,
    VectorStore,
};
use orda_llm::{models, ChatModel, Llm};
use orda_news::ScoredIssue;
use orda_prompt::{vars, ChatPromptTemplate, PromptVars};

use crate::prompts::{
    rerank_system, EXPLAIN_HUMAN, EXPLAIN_SYSTEM, RERANK_HUMAN, VERIFY_HUMAN, VERIFY_SYSTEM,
};
use crate::scoring::{apply_verification, calculate_rag_confidence, combine_results, resort};
use crate::{
    AiCandidate, Candidate, EnrichedIssue, FullAnalysis, IndustryInfo, PastIssueInfo,
    RagConfidence, RagError, SearchMode, Verification, VectorCandidate,
};

pub const DEFAULT_TOP_K: usize = 10;
pub const VERIFIED_CANDIDATES: usize = 3;

const NO_REASON: &str = "AI가 분석 근거를 생성하지 않음";
const VERIFY_FAILED: &str = "검증 중 오류 발생";

type JsonChain = Arc<dyn Runnable<PromptVars, Value> + Send + Sync>;
type VerifyChain = Arc<dyn Runnable<PromptVars, Verification> + Send + Sync>;
type TextChain = Arc<dyn Runnable<PromptVars, String> + Send + Sync>;

/// Relates news to the industry and past-issue knowledge base.
///
/// Each lookup is a vector search, a `gpt-4o` rerank of the hits and a
/// `gpt-4o-mini` grounding check of the best few reasons.
pub struct RagService {
    embedder: Arc<dyn Embedding>,
    industry_store: Arc<dyn VectorStore>,
    past_issue_store: Arc<dyn VectorStore>,
    industry_reranker: JsonChain,
    past_issue_reranker: JsonChain,
    verifier: VerifyChain,
    explainer: TextChain,
}

fn reranker(llm: &Arc<dyn Llm>, mode: SearchMode) -> JsonChain {
    let chain = ChatPromptTemplate::system_human(&rerank_system(mode.task_description()), RERANK_HUMAN)
        .then(ChatModel::new(llm.clone(), models::GPT_4O).temperature(0.0).json())
        .then(JsonOutputParser::<Value>::new());
    Arc::new(chain)
}

impl RagService {
    pub fn new(
        embedder: Arc<dyn Embedding>,
        industry_store: Arc<dyn VectorStore>,
        past_issue_store: Arc<dyn VectorStore>,
        llm: Arc<dyn Llm>,
    ) -> Self {
        let verifier = ChatPromptTemplate::system_human(VERIFY_SYSTEM, VERIFY_HUMAN)
            .then(ChatModel::new(llm.clone(), models::GPT_4O_MINI).temperature(0.0).json())
            .then(JsonOutputParser::<Verification>::new());
        let explainer = ChatPromptTemplate::system_human(EXPLAIN_SYSTEM, EXPLAIN_HUMAN)
            .then(ChatModel::new(llm.clone(), models::GPT_4O).temperature(0.2))
            .then(StrOutputParser);
        Self {
            industry_reranker: reranker(&llm, SearchMode::Industry),
            past_issue_reranker: reranker(&llm, SearchMode::PastIssue),
            verifier: Arc::new(verifier),
            explainer: Arc::new(explainer),
            embedder,
            industry_store,
            past_issue_store,
        }
    }

    fn store(&self, mode: SearchMode) -> &Arc<dyn VectorStore> {
        match mode {
            SearchMode::Industry => &self.industry_store,
            SearchMode::PastIssue => &self.past_issue_store,
        }
    }

    /// Embeds `query` and searches one namespace. Failures are logged and
    /// produce no candidates.
    pub async fn vector_search(
        &self,
        query: &str,
        mode: SearchMode,
        top_k: usize,
    ) -> Vec<VectorCandidate> {
        match self.embedder.embed(query).await {
            Ok(embedding) => self.search_embedded(&embedding, mode, top_k).await,
            Err(err) => {
                tracing::error!(%mode, error = %err, "query embedding failed");
                Vec::new()
            }
        }
    }

    async fn search_embedded(
        &self,
        embedding: &[f32],
        mode: SearchMode,
        top_k: usize,
    ) -> Vec<VectorCandidate> {
        let hits = match self.store(mode).search(embedding, top_k).await {
            Ok(hits) => hits,
            Err(err) => {
                tracing::error!(%mode, error = %err, "vector search failed");
                return Vec::new();
            }
        };

        let mut candidates: Vec<VectorCandidate> = Vec::new();
        for hit in hits {
            let doc = &hit.document;
            let Some(name) = doc.metadata_str("name").filter(|n| !n.is_empty()) else {
                continue;
            };
            if candidates.iter().any(|c| c.name == name) {
                continue;
            }
            let period = match mode {
                SearchMode::PastIssue => Some(format!(
                    "{} ~ {}",
                    doc.metadata_str("start_date").unwrap_or_default(),
                    doc.metadata_str("end_date").unwrap_or_default()
                )),
                SearchMode::Industry => None,
            };
            candidates.push(VectorCandidate {
                name,
                similarity: round_to(f64::from(hit.score) * 100.0, 1),
                description: doc.metadata_str("description").unwrap_or_default(),
                period,
            });
        }
        tracing::debug!(%mode, count = candidates.len(), "vector candidates");
        candidates
    }

    /// Asks the model to score each vector hit against the news. Failures
    /// yield no verdicts.
    pub async fn ai_rerank(
        &self,
        news: &str,
        candidates: &[VectorCandidate],
        mode: SearchMode,
    ) -> Vec<AiCandidate> {
        if candidates.is_empty() {
            return Vec::new();
        }
        let names: Vec<&str> = candidates.iter().map(|c| c.name.as_str()).collect();
        let input = vars([
            ("news", news.to_string()),
            ("candidate_list", names.join(", ")),
            ("field", mode.field_name().to_string()),
        ]);
        let chain = match mode {
            SearchMode::Industry => &self.industry_reranker,
            SearchMode::PastIssue => &self.past_issue_reranker,
        };
        match chain.invoke(input).await {
            Ok(value) => parse_rerank(&value, mode),
            Err(err) => {
                tracing::error!(%mode, error = %err, "rerank failed");
                Vec::new()
            }
        }
    }

    /// Checks that `reason` is supported by the news text.
    pub async fn verify_reasoning(&self, news: &str, item: &str, reason: &str) -> Verification {
        if reason.is_empty() {
            return Verification::ungrounded(NO_REASON);
        }
        let input = vars([
            ("news", news.to_string()),
            ("item", item.to_string()),
            ("reason", reason.to_string()),
        ]);
        match self.verifier.invoke(input).await {
            Ok(verification) => verification,
            Err(err) => {
                tracing::warn!(item, error = %err, "verification failed");
                Verification::ungrounded(VERIFY_FAILED)
            }
        }
    }

    /// Verifies the best few candidates and drops the rest.
    pub async fn apply_verification_layer(
        &self,
        news: &str,
        combined: Vec<Candidate>,
    ) -> Vec<Candidate> {
        let mut verified = Vec::with_capacity(VERIFIED_CANDIDATES);
        for mut candidate in combined.into_iter().take(VERIFIED_CANDIDATES) {
            let verification = self
                .verify_reasoning(news, &candidate.name, &candidate.ai_reason)
                .await;
            tracing::debug!(
                name = %candidate.name,
                grounded = verification.is_grounded,
                "candidate verified"
            );
            apply_verification(&mut candidate, verification);
            verified.push(candidate);
        }
        resort(verified)
    }

    async fn related(&self, query: &str, embedding: &[f32], mode: SearchMode) -> Vec<Candidate> {
        let hits = self.search_embedded(embedding, mode, DEFAULT_TOP_K).await;
        let verdicts = self.ai_rerank(query, &hits, mode).await;
        let combined = combine_results(&hits, &verdicts);
        self.apply_verification_layer(query, combined).await
    }

    async fn analyze_query(
        &self,
        query: &str,
    ) -> Result<(Vec<Candidate>, Vec<Candidate>, RagConfidence), RagError> {
        let embedding = self.embedder.embed(query).await?;
        let industries = self.related(query, &embedding, SearchMode::Industry).await;
        let past_issues = self.related(query, &embedding, SearchMode::PastIssue).await;
        let confidence = calculate_rag_confidence(&industries, &past_issues);
        Ok((industries, past_issues, confidence))
    }

    pub async fn analyze_issue(&self, issue: &ScoredIssue) -> Result<EnrichedIssue, RagError> {
        let query = format!("{}\n{}", issue.issue.title, issue.issue.body());
        let (industries, past_issues, confidence) = self.analyze_query(&query).await?;
        Ok(EnrichedIssue {
            issue: issue.clone(),
            industries,
            past_issues,
            confidence,
            error: None,
        })
    }

    /// Enriches every issue in order. A failed issue is kept with empty
    /// relations and its error message.
    pub async fn analyze_issues_with_rag(&self, issues: &[ScoredIssue]) -> Vec<EnrichedIssue> {
        tracing::info!(count = issues.len(), "rag analysis started");
        let mut enriched = Vec::with_capacity(issues.len());
        for (position, issue) in issues.iter().enumerate() {
            match self.analyze_issue(issue).await {
                Ok(result) => {
                    tracing::info!(
                        position = position + 1,
                        consistency = result.confidence.consistency_score,
                        peak = result.confidence.peak_relevance_score,
                        "issue analyzed"
                    );
                    enriched.push(result);
                }
                Err(err) => {
                    tracing::error!(position = position + 1, error = %err, "issue analysis failed");
                    enriched.push(EnrichedIssue {
                        issue: issue.clone(),
                        industries: Vec::new(),
                        past_issues: Vec::new(),
                        confidence: RagConfidence::default(),
                        error: Some(err.to_string()),
                    });
                }
            }
        }
        enriched
    }

    /// Relates free text to the knowledge base and explains the result.
    pub async fn comprehensive_analysis(
        &self,
        content: &str,
        max_past_issues: usize,
        max_industries: usize,
    ) -> Result<FullAnalysis, RagError> {
        let (industries, past_issues, confidence) = self.analyze_query(content).await?;
        let industries: Vec<Candidate> = industries.into_iter().take(max_industries).collect();
        let past_issues: Vec<Candidate> = past_issues.into_iter().take(max_past_issues).collect();

        let input = vars([
            ("news", content.to_string()),
            ("industries", describe_candidates(&industries)),
            ("past_issues", describe_candidates(&past_issues)),
        ]);
        let explanation = self.explainer.invoke(input).await?;

        Ok(FullAnalysis {
            explanation,
            confidence: (confidence.consistency_score / 10.0).clamp(0.0, 1.0),
            past_issues: past_issues
                .into_iter()
                .map(|c| PastIssueInfo {
                    issue_name: c.name,
                    contents: c.description,
                    similarity_score: c.final_score,
                })
                .collect(),
            industries: industries
                .into_iter()
                .map(|c| IndustryInfo {
                    industry_name: c.name,
                    description: c.description,
                    similarity_score: c.final_score,
                })
                .collect(),
        })
    }
}

fn describe_candidates(candidates: &[Candidate]) -> String {
    if candidates.is_empty() {
        return "(검색 결과 없음)".to_string();
    }
    candidates
        .iter()
        .map(|c| {
            let mut line = format!("- {} (점수 {:.1})", c.name, c.final_score);
            if let Some(period) = &c.period {
                line.push_str(&format!(" [{period}]"));
            }
            if !c.ai_reason.is_empty() {
                line.push_str(&format!(": {}", c.ai_reason));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn lenient_number(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn parse_rerank(value: &Value, mode: SearchMode) -> Vec<AiCandidate> {
    let Some(entries) = value.get("candidates").and_then(Value::as_array) else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| {
            let name = entry.get(mode.field_name())?.as_str()?.to_string();
            Some(AiCandidate {
                name,
                score: lenient_number(entry.get("score")),
                reason: entry
                    .get("reason")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            })
        })
        .collect()
}

//! Pure scoring steps of the analysis: merging vector and model scores and
//! summarising them into confidence figures.

use std::collections::HashMap;

use orda_core::{mean, round_to};

use crate::{AiCandidate, Candidate, EnrichedIssue, RagConfidence, VectorCandidate};

pub const VECTOR_WEIGHT: f64 = 0.3;
pub const AI_WEIGHT: f64 = 0.7;
pub const UNGROUNDED_PENALTY: f64 = 0.5;

fn sort_by_final_score(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
}

/// Joins vector hits with the reranker's verdicts by name.
///
/// Names the reranker invents are ignored; hits it skips keep an AI score
/// of zero.
pub fn combine_results(vector: &[VectorCandidate], ai: &[AiCandidate]) -> Vec<Candidate> {
    let verdicts: HashMap<&str, &AiCandidate> =
        ai.iter().map(|c| (c.name.as_str(), c)).collect();

    let mut combined: Vec<Candidate> = vector
        .iter()
        .map(|hit| {
            let vector_score = (hit.similarity / 10.0).min(10.0);
            let (ai_score, ai_reason) = verdicts
                .get(hit.name.as_str())
                .map(|v| (v.score, v.reason.clone()))
                .unwrap_or((0.0, String::new()));
            Candidate {
                name: hit.name.clone(),
                vector_score,
                ai_score,
                ai_reason,
                description: hit.description.clone(),
                period: hit.period.clone(),
                final_score: round_to(vector_score * VECTOR_WEIGHT + ai_score * AI_WEIGHT, 1),
                verification: None,
            }
        })
        .collect();
    sort_by_final_score(&mut combined);
    combined
}

/// Halves the score of a candidate whose reasoning was not grounded.
pub fn apply_verification(candidate: &mut Candidate, verification: crate::Verification) {
    if !verification.is_grounded {
        candidate.final_score = round_to(candidate.final_score * UNGROUNDED_PENALTY, 1);
    }
    candidate.verification = Some(verification);
}

pub(crate) fn resort(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    sort_by_final_score(&mut candidates);
    candidates
}

pub fn calculate_rag_confidence(industries: &[Candidate], past_issues: &[Candidate]) -> RagConfidence {
    let mut averages = Vec::new();
    let mut peaks = Vec::new();
    for list in [industries, past_issues] {
        let scores: Vec<f64> = list.iter().map(|c| c.final_score).collect();
        if let Some(avg) = mean(&scores) {
            averages.push(avg);
            peaks.push(scores.iter().copied().fold(f64::MIN, f64::max));
        }
    }
    RagConfidence {
        consistency_score: round_to(mean(&averages).unwrap_or(0.0), 1),
        peak_relevance_score: round_to(mean(&peaks).unwrap_or(0.0), 1),
    }
}

/// Mean consistency over a batch, two decimals.
pub fn average_confidence(issues: &[EnrichedIssue]) -> f64 {
    let scores: Vec<f64> = issues
        .iter()
        .map(|i| i.confidence.consistency_score)
        .collect();
    round_to(mean(&scores).unwrap_or(0.0), 2)
}

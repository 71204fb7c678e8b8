pub(crate) fn rerank_system(task_description: &str) -> String {
    format!(
        "너는 뉴스와의 관련성을 판단하는 전문 애널리스트다. 주어진 뉴스 내용과 후보 리스트를 분석하여, {task_description}해야 한다. 출력은 JSON 형식이어야 한다."
    )
}

pub(crate) const RERANK_HUMAN: &str = r#"[뉴스 내용]
{{news}}

[후보 리스트]
{{candidate_list}}

위 뉴스 내용과 관련성이 높은 순서대로 후보들의 순위를 다시 정렬하고, 각 후보에 대해 관련성 점수(1-10점)와 간단한 이유를 제시해주세요.

출력 형식 (JSON):
{
  "candidates": [
    {"{{field}}": "후보명", "score": 점수, "reason": "관련성 이유"}, ...
  ]
}"#;

pub(crate) const VERIFY_SYSTEM: &str = "너는 매우 꼼꼼한 팩트체커(Fact-Checker)다. '분석 근거'가 '원본 뉴스' 내용에 기반하는지 확인하고, 결과는 반드시 JSON으로만 응답해야 한다.";

pub(crate) const VERIFY_HUMAN: &str = r#"[원본 뉴스]
{{news}}

[분석 대상]: {{item}}
[분석 근거]: {{reason}}

'분석 근거'가 '원본 뉴스'에 기반하면 `is_grounded`를 `true`로, 근거 문장을 `supporting_quote`에 넣고 `unverified_reason`은 빈 문자열("")로 설정해.
만약 '원본 뉴스'에서 근거를 찾을 수 없거나 과도한 추론이라면 `is_grounded`를 `false`로, `supporting_quote`는 비워두고, 실패 이유를 `unverified_reason`에 간결하게 작성해줘. (예: "뉴스에 언급되지 않은 내용", "과도한 추론", "내용 불일치")

JSON 출력 형식:
{
    "is_grounded": boolean,
    "supporting_quote": "인용문",
    "unverified_reason": "실패 이유"
}"#;

pub(crate) const EXPLAIN_SYSTEM: &str = "너는 한국 주식시장 전문 애널리스트다. 뉴스와 검색된 관련 산업, 유사한 과거 이슈를 근거로 개인 투자자가 이해하기 쉬운 한국어 분석을 작성한다. 제공된 자료에 없는 사실은 만들어내지 않는다.";

pub(crate) const EXPLAIN_HUMAN: &str = "[뉴스 내용]
{{news}}

[관련 산업]
{{industries}}

[유사한 과거 이슈]
{{past_issues}}

위 자료를 바탕으로 이 뉴스가 주식시장에 미칠 영향을 3~5문장으로 설명해주세요. 어떤 산업이 왜 영향을 받는지, 과거 유사 사례에서 시장이 어떻게 반응했는지를 포함해주세요.";

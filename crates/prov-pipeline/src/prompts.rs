//! Prompt text for the generative stages.

use std::fmt::Write as _;

use prov_llm::SearchSnippet;

use crate::knowledge::SubjectQuery;

pub const HYPOTHESIS_PREAMBLE: &str = "\
You are a corporate ownership research assistant with expertise in global markets, \
especially European and Nordic companies.

Given a product and brand, identify the ultimate financial beneficiary (the company that \
ultimately profits), the country where profits go, the ownership structure, and your \
confidence level.

Consider European ownership structures and subsidiaries of global companies operating in \
Europe. If this appears to be a retailer's store brand, research that retailer's ownership.

Respond in JSON format:
{
  \"financial_beneficiary\": \"<company>\",
  \"beneficiary_country\": \"<country>\",
  \"confidence_score\": <0-100>,
  \"ownership_structure_type\": \"<direct/subsidiary/licensing/franchise>\",
  \"reasoning\": \"<brief explanation>\"
}
";

pub const VERIFICATION_PREAMBLE: &str = "\
You are a corporate ownership verification agent. Your job is to check if a given ownership \
claim is true using real, credible, and verifiable sources.

- Search for official company websites, annual reports, SEC filings, or reputable news outlets.
- NEVER invent or fabricate sources, URLs, or evidence. If you cannot find real, credible \
sources, you must return an empty sources array and set verification_status to \"contradicted\".
- If the brand or company does not exist or cannot be found in official or reputable sources, \
you must return:
  \"verification_status\": \"contradicted\",
  \"sources\": [],
  \"evidence_found\": \"No credible sources found for this brand\",
  \"confidence_adjustment\": -60,
  \"reasoning\": \"No real evidence for this brand or company exists in public records or reputable sources.\"

Return ONLY valid JSON in this exact format:
{
  \"verification_status\": \"confirmed|contradicted|insufficient_evidence\",
  \"evidence_found\": \"Brief description of sources found\",
  \"confidence_adjustment\": 10,
  \"sources\": [\"url1\", \"url2\"],
  \"reasoning\": \"Why we're more/less confident after verification\"
}
";

pub const ASSESSMENT_TASK: &str = "\
TASK:
1. Determine if the existing ownership result is accurate based on the web search results
2. Provide a verification status: \"confirmed\", \"contradicted\", \"mixed_evidence\", or \"insufficient_evidence\"
3. Classify each piece of evidence as supporting, contradicting, neutral, or missing
4. Provide detailed reasoning

OUTPUT FORMAT (JSON):
Respond with ONLY valid JSON inside triple backticks.

```json
{
  \"verification_status\": \"confirmed|contradicted|mixed_evidence|insufficient_evidence\",
  \"confidence_assessment\": {
    \"original_confidence\": number,
    \"verified_confidence\": number,
    \"confidence_change\": \"increased|decreased|unchanged\"
  },
  \"evidence_analysis\": {
    \"supporting_evidence\": [\"evidence point 1\"],
    \"contradicting_evidence\": [\"contradicting point 1\"],
    \"neutral_evidence\": [\"neutral point 1\"],
    \"missing_evidence\": [\"missing info 1\"]
  },
  \"summary\": \"Brief summary of verification findings\",
  \"reasoning\": \"Detailed reasoning for the verification decision\"
}
```
";

pub fn hypothesis(query: &SubjectQuery) -> String {
    let mut prompt = String::from(HYPOTHESIS_PREAMBLE);
    let _ = write!(prompt, "\nProduct: {}\nBrand: {}", query.product, query.brand);
    if let Some(source) = query.data_source {
        let _ = write!(prompt, "\nData Source: {source}");
    }
    if let Some(region) = query.region_hint.as_deref() {
        let _ = write!(prompt, "\nRegion Hint: {region}");
    }
    prompt.push_str("\n\nAnswer:");
    prompt
}

pub fn verification(product: &str, beneficiary: &str, country: Option<&str>) -> String {
    let country = country.unwrap_or("an unknown country");
    format!("{VERIFICATION_PREAMBLE}\nOwnership claim: \"{product} is owned by {beneficiary} in {country}\"\n")
}

pub fn assessment(brand: &str, existing: &serde_json::Value, snippets: &[SearchSnippet]) -> String {
    let mut prompt = format!(
        "You are an expert corporate ownership analyst. Analyze the following web search results \
         to determine the ownership of {brand}.\n\nEXISTING RESULT:\n{}\n\nWEB SEARCH RESULTS:\n",
        serde_json::to_string_pretty(existing).unwrap_or_default()
    );
    if snippets.is_empty() {
        prompt.push_str("(no web search results available)\n");
    }
    for (i, snippet) in snippets.iter().enumerate() {
        let _ = write!(prompt, "Result {} ({}): {}\n\n", i + 1, snippet.source, snippet.content);
    }
    prompt.push('\n');
    prompt.push_str(ASSESSMENT_TASK);
    prompt
}

//! Opportunity-finder prompt

/// Niche context for keyword generation.
#[derive(Debug, Clone, PartialEq)]
pub struct OpportunityRequest {
    pub niche: String,
    pub sub_niche: Option<String>,
    pub business_model: Option<String>,
    pub language_name: String,
}

const RULES: &str = "\
Rules:
- Each keyword is a phrase of 1 to 3 words.
- Do not use intent modifiers such as \"best\", \"top\", \"buy\", \"cheap\", \"review\", \"near me\", \"how to\" or years.
- Do not include brand names or trademarks.
- Output at most 10 keywords, separated by commas, on a single line.
- The first 5 keywords must be the ones with the highest commercial value.
- Output only the comma-separated keywords. No numbering, no quotes, no explanations.";

/// Build the single system message sent to the text-generation provider.
pub fn build_opportunity_prompt(request: &OpportunityRequest) -> String {
    let mut context = vec![format!("Niche: {}", request.niche.trim())];

    if let Some(sub_niche) = request
        .sub_niche
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        context.push(format!("Sub-niche: {sub_niche}"));
    }
    if let Some(model) = request
        .business_model
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        context.push(format!("Business model: {model}"));
    }

    format!(
        "You are an SEO keyword researcher. Suggest seed keywords with search demand for the business described below.\n\n{}\n\nWrite every keyword in {}.\n\n{}",
        context.join("\n"),
        request.language_name.trim(),
        RULES
    )
}

/// A builder for rendering prompts with context.
pub struct PromptRenderer<'a> {
    template: &'a str,
    replacements: Vec<(&'a str, String)>,
}

impl<'a> PromptRenderer<'a> {
    pub fn new(template: &'a str) -> Self {
        Self {
            template,
            replacements: Vec::new(),
        }
    }

    pub fn set(mut self, key: &'a str, value: impl Into<String>) -> Self {
        self.replacements.push((key, value.into()));
        self
    }

    pub fn render(self) -> String {
        let mut result = self.template.to_string();
        for (key, value) in self.replacements {
            result = result.replace(key, &value);
        }

        if let Some(start) = result.find("{{")
            && let Some(end) = result[start..].find("}}")
        {
            let placeholder = &result[start..start + end + 2];
            tracing::error!("[PROMPT RENDER ERROR] Unreplaced placeholder found in output: {}", placeholder);
        }

        result
    }
}

pub const QUESTION_SYSTEM: &str = "You are a precise question-answering system.
Rules:
1. Respond ONLY with the answer, no extra text or formatting
2. Match the question's language exactly
3. Never use markdown or special characters
4. Stop generation immediately after answer";

pub const QUESTION_TEMPLATE: &str = "Question: {{QUESTION}}";

pub const RECOMMENDATION_SYSTEM: &str = "You are a cautious cryptocurrency market analyst.
Rules:
1. Base the assessment only on the market data provided
2. Give a short verdict (buy, hold or avoid) followed by at most three reasons
3. Mention the main risk in one sentence
4. Never invent numbers that are not in the data";

pub const RECOMMENDATION_TEMPLATE: &str = "Cryptocurrency: {{COIN}}

Market data:
{{MARKET_DATA}}

Should an investor consider {{COIN}} right now?";

pub fn question_prompt(question: &str) -> String {
    PromptRenderer::new(QUESTION_TEMPLATE)
        .set("{{QUESTION}}", question)
        .render()
}

pub fn recommendation_prompt(coin: &str, market_data: &str) -> String {
    PromptRenderer::new(RECOMMENDATION_TEMPLATE)
        .set("{{COIN}}", coin)
        .set("{{MARKET_DATA}}", market_data)
        .render()
}

//! Rough token and cost estimates.
//!
//! Used by callers to budget prompts and to price a call from its reported
//! `tokens_used`. These are estimates, not billing figures.

/// Characters per token assumed by [`estimate_tokens`].
const CHARS_PER_TOKEN: usize = 4;

/// Output tokens assumed per input token when pricing a total count.
const OUTPUT_RATIO: f64 = 2.0;

/// USD prices per 1K tokens for one model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPricing {
    /// Price per 1K input tokens
    pub input_per_1k: f64,
    /// Price per 1K output tokens
    pub output_per_1k: f64,
}

const GPT_4O: ModelPricing = ModelPricing {
    input_per_1k: 0.005,
    output_per_1k: 0.015,
};

const GPT_35_TURBO: ModelPricing = ModelPricing {
    input_per_1k: 0.0005,
    output_per_1k: 0.0015,
};

/// Returns the price table entry for `model`; unknown models are priced as `gpt-4o`.
#[must_use]
pub fn pricing_for(model: &str) -> ModelPricing {
    match model {
        "gpt-3.5-turbo" => GPT_35_TURBO,
        _ => GPT_4O,
    }
}

/// Estimates the token count of `text` at one token per four characters.
#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / CHARS_PER_TOKEN
}

/// Estimates the USD cost of `tokens`, rounded to four decimal places.
///
/// The count is treated as input and twice as many output tokens are assumed.
///
/// # Examples
///
/// ```
/// use liquidbooks_ai::llm::calculate_cost;
///
/// assert_eq!(calculate_cost(1000, "gpt-4o"), 0.035);
/// ```
#[must_use]
pub fn calculate_cost(tokens: u64, model: &str) -> f64 {
    let rates = pricing_for(model);
    let tokens = tokens as f64;

    let input_cost = tokens * rates.input_per_1k / 1000.0;
    let output_cost = tokens * OUTPUT_RATIO * rates.output_per_1k / 1000.0;

    ((input_cost + output_cost) * 10_000.0).round() / 10_000.0
}

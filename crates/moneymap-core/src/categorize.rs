//! Transaction categorization
//!
//! Three-tier fallback, first match wins:
//! 1. A usable category from the statement's own category column is kept
//!    verbatim.
//! 2. Text-analytics entities/key phrases (batched, 25 per call) are matched
//!    against per-category keyword lists.
//! 3. Local keyword matching against the same lists; as a last resort a
//!    constrained LLM call whose reply is validated against the closed set.
//!
//! Remote failures at any tier degrade to the next tier with a warning.
//! The categorizer never returns an error.

use tracing::{debug, warn};

use crate::ai::{LlmBackend, LlmClient};
use crate::analytics::{AnalyticsClient, TextAnalytics, TextSignals, MAX_BATCH_SIZE};
use crate::models::Category;

/// Keyword lists per category, in fixed match-priority order.
///
/// Matching is case-insensitive substring: a description (or an analytics
/// entity/key phrase from it) containing any keyword takes that category.
const KEYWORDS: [(Category, &[&str]); 8] = [
    (
        Category::FoodAndDining,
        &[
            "restaurant", "cafe", "coffee", "starbucks", "mcdonald", "chipotle", "doordash",
            "grubhub", "uber eats", "whole foods", "grocery", "groceries", "safeway",
            "trader joe", "kroger", "pizza", "burger", "taco", "deli", "bakery", "dining",
        ],
    ),
    (
        Category::Transportation,
        &[
            "uber", "lyft", "gas station", "shell", "chevron", "exxon", "parking", "transit",
            "metro", "toll", "car wash", "fuel",
        ],
    ),
    (
        Category::Housing,
        &["rent", "mortgage", "apartment", "hoa", "property management"],
    ),
    (
        Category::Utilities,
        &[
            "electric", "water bill", "internet", "comcast", "xfinity", "verizon", "at&t",
            "t-mobile", "utility", "utilities", "sewer", "phone bill",
        ],
    ),
    (
        Category::Entertainment,
        &[
            "netflix", "spotify", "hulu", "disney", "hbo", "cinema", "movie", "theater",
            "steam", "playstation", "xbox", "concert", "twitch",
        ],
    ),
    (
        Category::Shopping,
        &[
            "amazon", "target", "walmart", "costco", "ebay", "etsy", "best buy", "mall",
            "clothing", "nordstrom", "ikea",
        ],
    ),
    (
        Category::HealthAndMedical,
        &[
            "pharmacy", "cvs", "walgreens", "doctor", "dental", "medical", "clinic",
            "hospital", "gym", "fitness", "urgent care",
        ],
    ),
    (
        Category::Travel,
        &[
            "airline", "airlines", "hotel", "airbnb", "flight", "delta", "united",
            "southwest", "expedia", "booking.com", "marriott", "hilton",
        ],
    ),
];

/// Match a single text against the keyword lists in priority order
fn match_keywords(text: &str) -> Option<Category> {
    let lower = text.to_lowercase();
    for (category, keywords) in KEYWORDS {
        if keywords.iter().any(|kw| lower.contains(kw)) {
            return Some(category);
        }
    }
    None
}

/// Match analytics signals (entities + key phrases) for one description
fn match_signals(signals: &TextSignals) -> Option<Category> {
    for (category, keywords) in KEYWORDS {
        let hit = signals
            .entities
            .iter()
            .chain(signals.key_phrases.iter())
            .any(|text| {
                let lower = text.to_lowercase();
                keywords.iter().any(|kw| lower.contains(kw))
            });
        if hit {
            return Some(category);
        }
    }
    None
}

/// Transaction categorizer with optional remote collaborators
pub struct Categorizer {
    analytics: Option<AnalyticsClient>,
    llm: Option<LlmClient>,
}

impl Categorizer {
    pub fn new(analytics: Option<AnalyticsClient>, llm: Option<LlmClient>) -> Self {
        Self { analytics, llm }
    }

    /// Purely local categorizer (keyword lists only)
    pub fn local() -> Self {
        Self {
            analytics: None,
            llm: None,
        }
    }

    /// Categorize a batch of descriptions, one category per input in order.
    ///
    /// `source_categories` carries the statement's own category column per
    /// row (None or "Other" means it needs inference).
    pub async fn categorize_batch(
        &self,
        descriptions: &[String],
        source_categories: &[Option<String>],
    ) -> Vec<Category> {
        debug_assert_eq!(descriptions.len(), source_categories.len());

        let mut results: Vec<Option<Category>> = source_categories
            .iter()
            .map(|source| {
                source
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("other"))
                    .map(Category::from_loose)
            })
            .collect();

        // Tier 2: analytics signals for the rows still unresolved
        let pending: Vec<usize> = (0..descriptions.len())
            .filter(|&i| results[i].is_none())
            .collect();
        if !pending.is_empty() {
            if let Some(ref analytics) = self.analytics {
                for chunk in pending.chunks(MAX_BATCH_SIZE) {
                    let texts: Vec<String> =
                        chunk.iter().map(|&i| descriptions[i].clone()).collect();
                    match analytics.analyze(&texts).await {
                        Ok(signals) => {
                            for (&i, sig) in chunk.iter().zip(signals.iter()) {
                                if let Some(cat) = match_signals(sig) {
                                    results[i] = Some(cat);
                                }
                            }
                        }
                        Err(e) => {
                            warn!("Text analytics unavailable, falling back to local rules: {}", e);
                            break;
                        }
                    }
                }
            }
        }

        // Tier 3: local keywords, then the LLM as a last resort
        for i in 0..descriptions.len() {
            if results[i].is_none() {
                results[i] = match_keywords(&descriptions[i]);
            }
            if results[i].is_none() {
                results[i] = Some(self.ask_llm(&descriptions[i]).await);
            }
        }

        results.into_iter().map(|c| c.unwrap_or(Category::Other)).collect()
    }

    /// Categorize one description
    pub async fn categorize(&self, description: &str, source_category: Option<&str>) -> Category {
        self.categorize_batch(
            &[description.to_string()],
            &[source_category.map(str::to_string)],
        )
        .await[0]
    }

    /// Constrained LLM categorization, validated against the closed set
    async fn ask_llm(&self, description: &str) -> Category {
        let Some(ref llm) = self.llm else {
            return Category::Other;
        };

        let system = format!(
            "You are a transaction categorizer. Valid categories: {}. \
             Respond with ONLY the category name, nothing else.",
            Category::MATCH_ORDER
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        let messages = [crate::models::ChatMessage::user(format!(
            "Transaction description: {}",
            description
        ))];

        match llm.chat(&system, &messages).await {
            Ok(reply) => {
                let category = Category::from_loose(&reply);
                debug!(description, reply = %reply, category = %category, "LLM categorization");
                category
            }
            Err(e) => {
                warn!("LLM categorization failed for '{}': {}", description, e);
                Category::Other
            }
        }
    }
}

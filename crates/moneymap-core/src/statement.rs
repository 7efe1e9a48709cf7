//! Bank statement parsing
//!
//! CSV statements are parsed locally: tolerant header matching, per-row
//! date/amount parsing, batched categorization, subscription detection,
//! insights, and the optimization score, assembled into one
//! [`SpendingReport`]. The legacy PDF path delegates the whole extraction
//! to the LLM in a single call and parses its JSON reply.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use csv::ReaderBuilder;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::ai::{parsing, LlmBackend, LlmClient};
use crate::categorize::Categorizer;
use crate::error::{Error, Result};
use crate::insights::{
    generate_insights, optimization_score, SUBSCRIPTION_THRESHOLD, SUBSCRIPTION_THRESHOLD_PDF,
};
use crate::models::{Category, SpendingReport, Subscription, Transaction};

/// Known subscription services and markers, matched case-insensitively
/// against transaction descriptions.
const SUBSCRIPTION_KEYWORDS: &[&str] = &[
    "netflix",
    "spotify",
    "hulu",
    "disney+",
    "disney plus",
    "hbo",
    "apple music",
    "apple tv",
    "youtube premium",
    "amazon prime",
    "audible",
    "patreon",
    "adobe",
    "dropbox",
    "icloud",
    "playstation plus",
    "xbox game pass",
    "subscription",
];

/// Accepted header names per field, compared case-insensitively
const DATE_HEADERS: &[&str] = &["date", "transaction date", "posted date"];
const DESCRIPTION_HEADERS: &[&str] = &["description", "memo", "details"];
const AMOUNT_HEADERS: &[&str] = &["amount", "transaction amount"];
const CATEGORY_HEADERS: &[&str] = &["category"];

fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers.iter().position(|h| {
        let h = h.trim().to_lowercase();
        names.iter().any(|n| h == *n)
    })
}

/// Parse a date string: ISO first, then month/day/year formats.
/// Returns None when nothing matches; callers default to today.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    for fmt in ["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }
    None
}

/// Parse an amount string, stripping currency symbols and separators.
/// Parenthesized amounts are treated as negative.
fn parse_amount(s: &str) -> Result<f64> {
    let cleaned: String = s
        .trim()
        .replace(['$', ',', ' '], "")
        .replace('(', "-")
        .replace(')', "");

    cleaned
        .parse::<f64>()
        .map_err(|_| Error::Statement(format!("Unable to parse amount: {}", s)))
}

/// Detect subscriptions among the transactions, deduplicated by name
/// (first occurrence wins, frequency fixed to monthly).
fn extract_subscriptions(transactions: &[Transaction]) -> Vec<Subscription> {
    let mut subscriptions: Vec<Subscription> = Vec::new();
    for tx in transactions {
        let lower = tx.description.to_lowercase();
        if SUBSCRIPTION_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            if subscriptions
                .iter()
                .any(|s| s.name.eq_ignore_ascii_case(&tx.description))
            {
                continue;
            }
            subscriptions.push(Subscription {
                name: tx.description.clone(),
                amount: tx.amount.abs(),
                frequency: "monthly".to_string(),
            });
        }
    }
    subscriptions
}

/// Descriptions appearing at least twice, first-seen order
fn extract_repeat_purchases(transactions: &[Transaction]) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for tx in transactions {
        *counts.entry(tx.description.to_lowercase()).or_insert(0) += 1;
    }
    let mut seen: Vec<String> = Vec::new();
    for tx in transactions {
        let key = tx.description.to_lowercase();
        if counts.get(&key).copied().unwrap_or(0) >= 2
            && !seen.iter().any(|s| s.eq_ignore_ascii_case(&tx.description))
        {
            seen.push(tx.description.clone());
        }
    }
    seen
}

fn report_period(transactions: &[Transaction]) -> String {
    let min = transactions.iter().map(|t| t.date).min();
    let max = transactions.iter().map(|t| t.date).max();
    match (min, max) {
        (Some(start), Some(end)) => format!("{} to {}", start, end),
        _ => {
            let today = Utc::now().date_naive();
            format!("{} to {}", today, today)
        }
    }
}

/// Assemble the final report from parsed transactions
fn build_report(
    user_id: &str,
    transactions: Vec<Transaction>,
    subscription_threshold: usize,
) -> SpendingReport {
    let mut total_income = 0.0;
    let mut total_spending = 0.0;
    let mut category_breakdown: HashMap<String, f64> = HashMap::new();

    for tx in &transactions {
        if tx.amount >= 0.0 {
            total_income += tx.amount;
        } else {
            let expense = tx.amount.abs();
            total_spending += expense;
            *category_breakdown
                .entry(tx.category.as_str().to_string())
                .or_insert(0.0) += expense;
        }
    }

    let subscriptions = extract_subscriptions(&transactions);
    let repeat_purchases = extract_repeat_purchases(&transactions);
    let insights = generate_insights(&category_breakdown, &subscriptions, subscription_threshold);
    let score = optimization_score(total_income, total_spending, insights.len());

    SpendingReport {
        user_id: user_id.to_string(),
        report_id: format!("report_{}", Utc::now().timestamp_millis()),
        period: report_period(&transactions),
        total_spending,
        total_income,
        category_breakdown,
        subscriptions,
        repeat_purchases,
        insights,
        optimization_score: score,
        transactions,
    }
}

/// Parse a CSV bank statement into a spending report.
///
/// Rows missing a date or amount value are skipped; unparseable dates
/// default to today (logged, not an error); malformed non-empty amounts
/// are an error. An empty file yields an empty report with score 50.
pub async fn parse_csv_statement(
    data: &[u8],
    user_id: &str,
    categorizer: &Categorizer,
) -> Result<SpendingReport> {
    let text = String::from_utf8_lossy(data);
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = match rdr.headers() {
        Ok(h) => h.clone(),
        Err(_) => return Ok(build_report(user_id, Vec::new(), SUBSCRIPTION_THRESHOLD)),
    };

    let date_col = find_column(&headers, DATE_HEADERS);
    let desc_col = find_column(&headers, DESCRIPTION_HEADERS);
    let amount_col = find_column(&headers, AMOUNT_HEADERS);
    let category_col = find_column(&headers, CATEGORY_HEADERS);

    let (Some(date_col), Some(amount_col)) = (date_col, amount_col) else {
        // Header row exists but carries no usable columns: empty report
        return Ok(build_report(user_id, Vec::new(), SUBSCRIPTION_THRESHOLD));
    };

    struct Row {
        date: NaiveDate,
        description: String,
        amount: f64,
        source_category: Option<String>,
    }

    let mut rows: Vec<Row> = Vec::new();
    for result in rdr.records() {
        let record = result?;

        let date_str = record.get(date_col).unwrap_or("").trim();
        let amount_str = record.get(amount_col).unwrap_or("").trim();
        if date_str.is_empty() || amount_str.is_empty() {
            continue;
        }

        let date = match parse_date(date_str) {
            Some(d) => d,
            None => {
                let today = Utc::now().date_naive();
                debug!(date = date_str, "Unparseable date, defaulting to today");
                today
            }
        };
        let amount = parse_amount(amount_str)?;

        let description = desc_col
            .and_then(|c| record.get(c))
            .unwrap_or("")
            .trim()
            .to_string();
        let source_category = category_col
            .and_then(|c| record.get(c))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        rows.push(Row {
            date,
            description,
            amount,
            source_category,
        });
    }

    let descriptions: Vec<String> = rows.iter().map(|r| r.description.clone()).collect();
    let sources: Vec<Option<String>> = rows.iter().map(|r| r.source_category.clone()).collect();
    let categories = categorizer.categorize_batch(&descriptions, &sources).await;

    let transactions: Vec<Transaction> = rows
        .into_iter()
        .zip(categories)
        .map(|(row, category)| Transaction {
            date: row.date,
            description: row.description,
            amount: row.amount,
            category,
            merchant: None,
        })
        .collect();

    debug!("Parsed {} statement transactions", transactions.len());
    Ok(build_report(user_id, transactions, SUBSCRIPTION_THRESHOLD))
}

/// Extraction shape the LLM is asked to return for PDF statements
#[derive(Debug, Deserialize)]
struct PdfExtraction {
    #[serde(default)]
    transactions: Vec<PdfTransaction>,
}

#[derive(Debug, Deserialize)]
struct PdfTransaction {
    #[serde(default)]
    date: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    amount: f64,
    #[serde(default)]
    category: String,
}

/// Legacy PDF path: delegate the whole extraction to the LLM.
///
/// The reply must contain a JSON object; an unparsable reply surfaces as an
/// invalid-data error carrying the raw content.
pub async fn parse_pdf_statement(
    data: &[u8],
    user_id: &str,
    llm: &LlmClient,
) -> Result<SpendingReport> {
    let system = "You are a financial assistant. Analyze the following bank statement. \
                  Extract all transactions (date, description, amount, category), \
                  summarize total income, total expenses, and provide a breakdown by category. \
                  Return a JSON object with: transactions (list of {date, description, amount, \
                  category}), total_income, total_expenses, categories (dict).";

    let content = String::from_utf8_lossy(data).to_string();
    let messages = [crate::models::ChatMessage::user(content)];
    let reply = llm.chat(system, &messages).await?;

    let extraction: PdfExtraction = parsing::parse_object(&reply)?;

    let today = Utc::now().date_naive();
    let transactions: Vec<Transaction> = extraction
        .transactions
        .into_iter()
        .map(|t| {
            let date = parse_date(&t.date).unwrap_or_else(|| {
                warn!(date = %t.date, "PDF transaction date unparseable, defaulting to today");
                today
            });
            Transaction {
                date,
                description: t.description,
                amount: t.amount,
                category: Category::from_loose(&t.category),
                merchant: None,
            }
        })
        .collect();

    Ok(build_report(user_id, transactions, SUBSCRIPTION_THRESHOLD_PDF))
}

//! News coverage section

use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashSet;

use super::{SectionContext, bullet, bullet_list, paragraph};
use crate::domain::{AgentPayload, lenient};
use crate::format;
use crate::guardrails::Rejection;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawNews {
    #[serde(deserialize_with = "lenient::records")]
    articles: Vec<Option<RawArticle>>,
    #[serde(deserialize_with = "lenient::record")]
    sentiment_analysis: Option<RawNewsSentiment>,
    #[serde(deserialize_with = "lenient::text")]
    summary: Option<String>,
    #[serde(deserialize_with = "lenient::text_list")]
    key_insights: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawArticle {
    #[serde(deserialize_with = "lenient::text")]
    title: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    source: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    published_date: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawNewsSentiment {
    #[serde(deserialize_with = "lenient::text")]
    overall_sentiment: Option<String>,
    #[serde(deserialize_with = "lenient::text_list")]
    sentiment_trend: Vec<String>,
    #[serde(deserialize_with = "lenient::text_list")]
    key_themes: Vec<String>,
    #[serde(deserialize_with = "lenient::text")]
    market_impact_assessment: Option<String>,
}

#[derive(Debug)]
struct Article {
    title: String,
    source: String,
    published: NaiveDate,
    snippet: String,
}

fn vet_article(raw: RawArticle, ctx: &SectionContext<'_>) -> Result<Article, Rejection> {
    let title = ctx.require(ctx.guardrails.text("title", raw.title.as_deref()))?;
    let source = ctx.require(ctx.guardrails.text("source", raw.source.as_deref()))?;
    let published = ctx.require(
        ctx.guardrails
            .article_date(raw.published_date.as_deref(), ctx.request.as_of),
    )?;
    let snippet = raw
        .content
        .as_deref()
        .map(|c| format::truncate_snippet(c, ctx.guardrails.config().snippet_chars))
        .unwrap_or_default();

    Ok(Article {
        title,
        source,
        published,
        snippet,
    })
}

/// Recent, distinct articles, freshest first, capped
fn vet_articles(raw: Vec<Option<RawArticle>>, ctx: &SectionContext<'_>) -> Result<Vec<Article>, Rejection> {
    let returned = raw.len();
    let mut seen = HashSet::new();
    let mut articles = Vec::new();

    for item in raw {
        let Some(item) = item else {
            ctx.log_rejection(&Rejection::Malformed("article is not an object".to_string()));
            continue;
        };
        match vet_article(item, ctx) {
            Ok(article) if seen.insert(article.title.to_lowercase()) => articles.push(article),
            Ok(article) => {
                ctx.log_rejection(&Rejection::Inconsistent(format!(
                    "duplicate article '{}'",
                    article.title
                )));
            }
            Err(reason) => ctx.log_rejection(&reason),
        }
    }

    if articles.is_empty() {
        return Err(Rejection::Exhausted {
            collection: "articles",
            returned,
        });
    }

    articles.sort_by(|a, b| b.published.cmp(&a.published));
    articles.truncate(ctx.guardrails.config().max_articles);
    Ok(articles)
}

/// Render the news section
///
/// At least one article has to survive the recency and placeholder checks.
pub fn render(payload: AgentPayload, ctx: &SectionContext<'_>) -> Result<String, Rejection> {
    let raw: RawNews = payload.decode()?;
    let articles = vet_articles(raw.articles, ctx)?;

    let mut out = String::new();
    out.push_str("### Recent News Articles\n");
    for article in &articles {
        out.push_str(&format!("- **{}**\n", article.title));
        out.push_str(&format!("  - Source: {}\n", article.source));
        out.push_str(&format!("  - Date: {}\n", format::date(article.published)));
        if !article.snippet.is_empty() {
            out.push_str(&format!("  - Content: {}\n", article.snippet));
        }
        out.push('\n');
    }

    out.push_str("### Sentiment Analysis\n");
    match &raw.sentiment_analysis {
        Some(sentiment) => {
            bullet(
                &mut out,
                "Overall Sentiment",
                ctx.text_or_na(sentiment.overall_sentiment.as_deref()),
            );
            bullet(
                &mut out,
                "Sentiment Trend",
                format::list(&ctx.guardrails.list(&sentiment.sentiment_trend)),
            );
            bullet(
                &mut out,
                "Key Themes",
                format::list(&ctx.guardrails.list(&sentiment.key_themes)),
            );
            bullet(
                &mut out,
                "Market Impact",
                ctx.text_or_na(sentiment.market_impact_assessment.as_deref()),
            );
            out.push('\n');
        }
        None => out.push_str("Sentiment data unavailable.\n\n"),
    }

    paragraph(&mut out, "### Summary", &ctx.text_or_na(raw.summary.as_deref()));
    bullet_list(
        &mut out,
        "### Key Insights",
        &ctx.guardrails.list(&raw.key_insights),
    );

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GuardrailConfig;
    use crate::domain::ReportKind;
    use crate::guardrails::Guardrails;
    use crate::sections::test_support::request;
    use serde_json::{Value, json};

    // as-of date in test_support is 2025-06-30
    fn render_with(guardrails: &Guardrails, body: Value) -> Result<String, Rejection> {
        let req = request(ReportKind::News);
        let ctx = SectionContext::new(&req, guardrails);
        render(AgentPayload::new(ReportKind::News, body), &ctx)
    }

    fn article(title: &str, date: &str) -> Value {
        json!({
            "title": title,
            "source": "Reuters",
            "published_date": date,
            "content": "Shares moved after the announcement."
        })
    }

    #[test]
    fn test_articles_sorted_capped_and_deduplicated() {
        let body = json!({
            "articles": [
                article("Older story", "2025-04-01"),
                article("Fresh story", "2025-06-28"),
                article("fresh STORY", "2025-06-27"),
                article("Middle story", "2025-05-15"),
                article("Another story", "2025-05-01"),
            ],
            "summary": "Busy quarter."
        });
        let md = render_with(&Guardrails::default(), body).unwrap();

        let fresh = md.find("Fresh story").unwrap();
        let middle = md.find("Middle story").unwrap();
        let another = md.find("Another story").unwrap();
        assert!(fresh < middle && middle < another);
        assert!(!md.contains("Older story"));
        assert!(!md.contains("fresh STORY"));
        assert!(md.contains("  - Date: 2025-06-28\n"));
        assert!(md.contains("Sentiment data unavailable."));
    }

    #[test]
    fn test_stale_only_article_rejects_section() {
        let config = GuardrailConfig {
            news_max_age_days: 365,
            ..Default::default()
        };
        let guardrails = Guardrails::new(config).unwrap();
        // 400 days before 2025-06-30
        let body = json!({"articles": [article("Old news", "2024-05-26")]});
        let err = render_with(&guardrails, body).unwrap_err();
        assert_eq!(
            err,
            Rejection::Exhausted {
                collection: "articles",
                returned: 1
            }
        );
    }

    #[test]
    fn test_stale_article_dropped_alongside_fresh_one() {
        let body = json!({"articles": [
            article("Old news", "2024-05-26"),
            article("New news", "2025-06-01"),
        ]});
        let md = render_with(&Guardrails::default(), body).unwrap();
        assert!(md.contains("New news"));
        assert!(!md.contains("Old news"));
    }

    #[test]
    fn test_placeholder_and_undated_articles_dropped() {
        let body = json!({"articles": [
            article("[Headline]", "2025-06-01"),
            article("Real headline", "sometime last week"),
            {"title": "Dateless"},
            "not an object",
        ]});
        let err = render_with(&Guardrails::default(), body).unwrap_err();
        assert!(matches!(err, Rejection::Exhausted { returned: 4, .. }));
    }

    #[test]
    fn test_fabricated_source_drops_article() {
        let mut placeholder = article("Apple expands buyback", "2025-06-10");
        placeholder["source"] = json!("Source Name");
        let mut sentinel = article("Apple opens new campus", "2025-06-12");
        sentinel["source"] = json!("N/A");
        let mut missing = article("Apple trims guidance", "2025-06-14");
        missing.as_object_mut().unwrap().remove("source");

        let body = json!({"articles": [
            placeholder,
            sentinel,
            missing,
            article("Apple ships new chips", "2025-06-05"),
        ]});
        let md = render_with(&Guardrails::default(), body).unwrap();
        assert!(md.contains("Apple ships new chips"));
        assert!(!md.contains("buyback"));
        assert!(!md.contains("campus"));
        assert!(!md.contains("guidance"));
        assert!(!md.contains("Source: N/A"));

        let mut only = article("Apple expands buyback", "2025-06-10");
        only["source"] = json!("Source Name");
        let err = render_with(&Guardrails::default(), json!({"articles": [only]})).unwrap_err();
        assert!(matches!(err, Rejection::Exhausted { returned: 1, .. }));
    }

    #[test]
    fn test_no_articles_rejects_section() {
        let err = render_with(&Guardrails::default(), json!({"summary": "Nothing"})).unwrap_err();
        assert!(matches!(err, Rejection::Exhausted { returned: 0, .. }));
    }

    #[test]
    fn test_long_content_is_truncated() {
        let mut item = article("Long read", "2025-06-20");
        item["content"] = json!("word ".repeat(100));
        let md = render_with(&Guardrails::default(), json!({"articles": [item]})).unwrap();
        let line = md.lines().find(|l| l.starts_with("  - Content: ")).unwrap();
        let snippet = line.trim_start_matches("  - Content: ");
        assert!(snippet.ends_with("..."));
        assert!(snippet.chars().count() <= 240);
    }
}

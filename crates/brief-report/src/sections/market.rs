//! Cross-ticker market conditions section

use serde::Deserialize;

use super::{SectionContext, bullet, bullet_list, paragraph};
use crate::domain::{AgentPayload, lenient};
use crate::format;
use crate::guardrails::{Rejection, positive};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMarket {
    #[serde(deserialize_with = "lenient::record")]
    market_overview: Option<RawOverview>,
    #[serde(deserialize_with = "lenient::records")]
    major_indices: Vec<Option<RawIndex>>,
    #[serde(deserialize_with = "lenient::records")]
    economic_indicators: Vec<Option<RawIndicator>>,
    #[serde(deserialize_with = "lenient::records")]
    sector_performance: Vec<Option<RawSector>>,
    #[serde(deserialize_with = "lenient::text")]
    outlook: Option<String>,
    #[serde(deserialize_with = "lenient::text_list")]
    key_insights: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawOverview {
    #[serde(deserialize_with = "lenient::text")]
    overall_market_sentiment: Option<String>,
    #[serde(deserialize_with = "lenient::number")]
    vix_level: Option<f64>,
    #[serde(deserialize_with = "lenient::text")]
    market_breadth: Option<String>,
    #[serde(deserialize_with = "lenient::text_list")]
    key_drivers: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawIndex {
    #[serde(deserialize_with = "lenient::text")]
    name: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    symbol: Option<String>,
    #[serde(deserialize_with = "lenient::number")]
    current_value: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    change_percent: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawIndicator {
    #[serde(deserialize_with = "lenient::text")]
    name: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    value: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    change: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    significance: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSector {
    #[serde(deserialize_with = "lenient::text")]
    sector_name: Option<String>,
    #[serde(deserialize_with = "lenient::number")]
    performance_percent: Option<f64>,
    #[serde(deserialize_with = "lenient::text")]
    trend: Option<String>,
    #[serde(deserialize_with = "lenient::text_list")]
    leading_stocks: Vec<String>,
}

fn index_line(raw: &RawIndex, ctx: &SectionContext<'_>) -> Result<String, Rejection> {
    let name = ctx.require(ctx.guardrails.text("index name", raw.name.as_deref()))?;
    let value = ctx.require(positive("current_value", raw.current_value))?;
    let change = ctx.require(
        ctx.guardrails
            .config()
            .index_change
            .check_opt("change_percent", raw.change_percent),
    )?;

    let label = match ctx.guardrails.text_opt(raw.symbol.as_deref()) {
        Some(symbol) => format!("{name} ({symbol})"),
        None => name,
    };
    Ok(format!(
        "- **{label}:** {} ({})\n",
        format::ratio(value),
        format::signed_percent(change)
    ))
}

fn indicator_line(raw: &RawIndicator, ctx: &SectionContext<'_>) -> Result<String, Rejection> {
    let name = ctx.require(ctx.guardrails.text("indicator name", raw.name.as_deref()))?;
    let value = ctx.require(ctx.guardrails.text("indicator value", raw.value.as_deref()))?;

    let mut line = format!("- **{name}:** {value}");
    if let Some(change) = ctx.guardrails.text_opt(raw.change.as_deref()) {
        line.push_str(&format!(" ({change})"));
    }
    if let Some(significance) = ctx.guardrails.text_opt(raw.significance.as_deref()) {
        line.push_str(&format!(" - {significance}"));
    }
    line.push('\n');
    Ok(line)
}

fn sector_lines(raw: &RawSector, ctx: &SectionContext<'_>) -> Result<String, Rejection> {
    let name = ctx.require(ctx.guardrails.text("sector_name", raw.sector_name.as_deref()))?;
    let change = ctx.require(
        ctx.guardrails
            .config()
            .sector_change
            .check_opt("performance_percent", raw.performance_percent),
    )?;

    let mut lines = format!("- **{name}:** {}", format::signed_percent(change));
    if let Some(trend) = ctx.guardrails.text_opt(raw.trend.as_deref()) {
        lines.push_str(&format!(" ({trend})"));
    }
    lines.push('\n');
    lines.push_str(&format!(
        "  - Leading Stocks: {}\n",
        format::list(&ctx.guardrails.list(&raw.leading_stocks))
    ));
    Ok(lines)
}

/// Vet every record of a list with `line`, keeping the ones that pass
fn vetted_lines<T>(
    raw: &[Option<T>],
    ctx: &SectionContext<'_>,
    line: impl Fn(&T, &SectionContext<'_>) -> Result<String, Rejection>,
) -> Vec<String> {
    raw.iter()
        .filter_map(|item| {
            let Some(item) = item else {
                ctx.log_rejection(&Rejection::Malformed("record is not an object".to_string()));
                return None;
            };
            line(item, ctx).map_err(|reason| ctx.log_rejection(&reason)).ok()
        })
        .collect()
}

fn write_lines(out: &mut String, heading: &str, lines: &[String]) {
    out.push_str(heading);
    out.push('\n');
    if lines.is_empty() {
        out.push_str(format::NOT_AVAILABLE);
        out.push('\n');
    }
    for line in lines {
        out.push_str(line);
    }
    out.push('\n');
}

/// Render the market conditions section
///
/// Requires the overall market sentiment and at least one plausible major
/// index.
pub fn render(payload: AgentPayload, ctx: &SectionContext<'_>) -> Result<String, Rejection> {
    let raw: RawMarket = payload.decode()?;
    let overview = raw.market_overview.unwrap_or_default();

    let sentiment = ctx.require(
        ctx.guardrails
            .text("overall_market_sentiment", overview.overall_market_sentiment.as_deref()),
    )?;

    let indices = vetted_lines(&raw.major_indices, ctx, index_line);
    if indices.is_empty() {
        return Err(Rejection::Exhausted {
            collection: "major indices",
            returned: raw.major_indices.len(),
        });
    }

    let vix = ctx.keep(
        ctx.guardrails
            .config()
            .vix
            .check_opt("vix_level", overview.vix_level),
    );

    let mut out = String::new();
    out.push_str("## Market Overview\n");
    bullet(&mut out, "Overall Sentiment", &sentiment);
    bullet(&mut out, "VIX Level", format::or_na(vix, format::ratio));
    bullet(
        &mut out,
        "Market Breadth",
        ctx.text_or_na(overview.market_breadth.as_deref()),
    );
    bullet(
        &mut out,
        "Key Drivers",
        format::list(&ctx.guardrails.list(&overview.key_drivers)),
    );
    out.push('\n');

    write_lines(&mut out, "## Major Indices", &indices);
    write_lines(
        &mut out,
        "## Economic Indicators",
        &vetted_lines(&raw.economic_indicators, ctx, indicator_line),
    );
    write_lines(
        &mut out,
        "## Sector Performance",
        &vetted_lines(&raw.sector_performance, ctx, sector_lines),
    );

    paragraph(&mut out, "## Outlook", &ctx.text_or_na(raw.outlook.as_deref()));
    bullet_list(
        &mut out,
        "## Key Insights",
        &ctx.guardrails.list(&raw.key_insights),
    );

    Ok(out)
}

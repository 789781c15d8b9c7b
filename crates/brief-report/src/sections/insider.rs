//! Insider trading section

use chrono::NaiveDate;
use serde::Deserialize;

use super::{QUALITY_NOTE, SectionContext, bullet, bullet_list, paragraph};
use crate::domain::{AgentPayload, lenient};
use crate::format;
use crate::guardrails::{Rejection, finite, positive};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawInsider {
    #[serde(deserialize_with = "lenient::records")]
    recent_transactions: Vec<Option<RawTransaction>>,
    #[serde(deserialize_with = "lenient::record")]
    activity_summary: Option<RawActivitySummary>,
    #[serde(deserialize_with = "lenient::text")]
    significance_assessment: Option<String>,
    #[serde(deserialize_with = "lenient::text_list")]
    key_insights: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTransaction {
    #[serde(deserialize_with = "lenient::text")]
    name: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    title: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    transaction_type: Option<String>,
    #[serde(deserialize_with = "lenient::number")]
    shares: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    price: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    value: Option<f64>,
    #[serde(deserialize_with = "lenient::text")]
    transaction_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawActivitySummary {
    #[serde(deserialize_with = "lenient::number")]
    total_buy_volume: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    total_sell_volume: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    net_insider_activity: Option<f64>,
    #[serde(deserialize_with = "lenient::text_list")]
    key_insiders: Vec<String>,
    #[serde(deserialize_with = "lenient::text")]
    activity_trend: Option<String>,
}

#[derive(Debug)]
struct Transaction {
    name: String,
    title: String,
    kind: String,
    shares: Option<f64>,
    price: Option<f64>,
    value: Option<f64>,
    date: NaiveDate,
}

fn vet_transaction(raw: RawTransaction, ctx: &SectionContext<'_>) -> Result<Transaction, Rejection> {
    let name = ctx.require(ctx.guardrails.text("name", raw.name.as_deref()))?;
    let date = ctx.require(
        ctx.guardrails
            .filing_date(raw.transaction_date.as_deref(), ctx.request.as_of),
    )?;

    Ok(Transaction {
        name,
        title: ctx.text_or_na(raw.title.as_deref()),
        kind: ctx.text_or_na(raw.transaction_type.as_deref()),
        shares: ctx.keep(positive("shares", raw.shares)),
        price: ctx.keep(positive("price", raw.price)),
        value: ctx.keep(finite("value", raw.value)),
        date,
    })
}

fn write_summary(out: &mut String, raw: &RawActivitySummary, ctx: &SectionContext<'_>) {
    out.push_str("### Activity Summary\n");

    let net = ctx.keep(finite("net_insider_activity", raw.net_insider_activity));
    let trend = ctx.guardrails.text_opt(raw.activity_trend.as_deref());

    if let (Some(net), Some(trend)) = (net, trend.as_deref()) {
        if let Err(reason) = ctx.require(ctx.guardrails.direction("activity_trend", trend, net)) {
            ctx.log_rejection(&reason);
            out.push_str(QUALITY_NOTE);
            out.push_str("\n\n");
            return;
        }
    }

    let volume = |field, value| ctx.keep(finite(field, value)).filter(|v| *v >= 0.0);
    bullet(
        out,
        "Total Buy Volume",
        format::or_na(volume("total_buy_volume", raw.total_buy_volume), format::integer),
    );
    bullet(
        out,
        "Total Sell Volume",
        format::or_na(volume("total_sell_volume", raw.total_sell_volume), format::integer),
    );
    if let Some(net) = net {
        bullet(out, "Net Insider Activity", format::currency(net));
    }
    bullet(
        out,
        "Key Insiders",
        format::list(&ctx.guardrails.list(&raw.key_insiders)),
    );
    bullet(
        out,
        "Activity Trend",
        trend.unwrap_or_else(|| format::NOT_AVAILABLE.to_string()),
    );
    out.push('\n');
}

/// Render the insider section
///
/// An empty transaction list is a legitimate answer. A non-empty one where
/// nothing survives the name and recency checks is not.
pub fn render(payload: AgentPayload, ctx: &SectionContext<'_>) -> Result<String, Rejection> {
    let raw: RawInsider = payload.decode()?;
    let policy = ctx.guardrails.config();

    let returned = raw.recent_transactions.len();
    let mut transactions = Vec::new();
    for item in raw.recent_transactions {
        let Some(item) = item else {
            ctx.log_rejection(&Rejection::Malformed(
                "transaction is not an object".to_string(),
            ));
            continue;
        };
        match vet_transaction(item, ctx) {
            Ok(txn) => transactions.push(txn),
            Err(reason) => ctx.log_rejection(&reason),
        }
    }

    if returned > 0 && transactions.is_empty() {
        return Err(Rejection::Exhausted {
            collection: "insider transactions",
            returned,
        });
    }

    transactions.sort_by(|a, b| b.date.cmp(&a.date));
    transactions.truncate(policy.max_transactions);

    let mut out = String::new();
    out.push_str("### Recent Transactions\n");
    if transactions.is_empty() {
        out.push_str(&format!(
            "No insider transactions reported within the last {} days.\n\n",
            policy.insider_max_age_days
        ));
    }
    for txn in &transactions {
        out.push_str(&format!("- **{}** ({})\n", txn.name, txn.title));
        out.push_str(&format!("  - Type: {}\n", txn.kind));
        out.push_str(&format!(
            "  - Shares: {}\n",
            format::or_na(txn.shares, format::integer)
        ));
        out.push_str(&format!(
            "  - Price: {}\n",
            format::or_na(txn.price, format::currency)
        ));
        out.push_str(&format!(
            "  - Value: {}\n",
            format::or_na(txn.value, format::currency)
        ));
        out.push_str(&format!("  - Date: {}\n\n", format::date(txn.date)));
    }

    if let Some(summary) = &raw.activity_summary {
        write_summary(&mut out, summary, ctx);
    }

    paragraph(
        &mut out,
        "### Significance Assessment",
        &ctx.text_or_na(raw.significance_assessment.as_deref()),
    );
    bullet_list(
        &mut out,
        "### Key Insights",
        &ctx.guardrails.list(&raw.key_insights),
    );

    Ok(out)
}

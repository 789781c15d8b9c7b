//! Volatility and risk section

use serde::Deserialize;

use super::{SectionContext, bullet, bullet_list, paragraph};
use crate::domain::{AgentPayload, lenient};
use crate::format;
use crate::guardrails::{Rejection, finite};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawVolatility {
    #[serde(deserialize_with = "lenient::record")]
    metrics: Option<RawMetrics>,
    #[serde(deserialize_with = "lenient::record")]
    risk_assessment: Option<RawRiskAssessment>,
    #[serde(deserialize_with = "lenient::text")]
    outlook: Option<String>,
    #[serde(deserialize_with = "lenient::text_list")]
    key_insights: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMetrics {
    #[serde(deserialize_with = "lenient::number")]
    historical_volatility: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    beta: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    sharpe_ratio: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    max_drawdown: Option<f64>,
    #[serde(deserialize_with = "lenient::text")]
    volatility_regime: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRiskAssessment {
    #[serde(deserialize_with = "lenient::text")]
    overall_risk_level: Option<String>,
    #[serde(deserialize_with = "lenient::text_list")]
    volatility_trends: Vec<String>,
    #[serde(deserialize_with = "lenient::text_list")]
    risk_factors: Vec<String>,
    #[serde(deserialize_with = "lenient::text_list")]
    hedging_recommendations: Vec<String>,
}

/// Render the volatility section
///
/// Historical volatility and max drawdown are required.
pub fn render(payload: AgentPayload, ctx: &SectionContext<'_>) -> Result<String, Rejection> {
    let raw: RawVolatility = payload.decode()?;
    let policy = ctx.guardrails.config();

    let metrics = raw.metrics.unwrap_or_default();
    let volatility = ctx.require(
        policy
            .historical_volatility
            .check_opt("historical_volatility", metrics.historical_volatility),
    )?;
    let drawdown = ctx.require(
        policy
            .max_drawdown
            .check_opt("max_drawdown", metrics.max_drawdown),
    )?;
    let beta = ctx.keep(policy.beta.check_opt("beta", metrics.beta));
    let sharpe = ctx.keep(finite("sharpe_ratio", metrics.sharpe_ratio));

    let mut out = String::new();
    out.push_str("### Volatility Metrics\n");
    bullet(&mut out, "Historical Volatility", format::percent(volatility));
    let beta_label = match ctx.request.benchmark.as_deref() {
        Some(benchmark) => format!("Beta vs {benchmark}"),
        None => "Beta".to_string(),
    };
    bullet(&mut out, &beta_label, format::or_na(beta, format::ratio));
    bullet(&mut out, "Sharpe Ratio", format::or_na(sharpe, format::ratio));
    bullet(&mut out, "Max Drawdown", format::percent(drawdown));
    bullet(
        &mut out,
        "Volatility Regime",
        ctx.text_or_na(metrics.volatility_regime.as_deref()),
    );
    out.push('\n');

    if let Some(risk) = &raw.risk_assessment {
        out.push_str("### Risk Assessment\n");
        bullet(
            &mut out,
            "Overall Risk Level",
            ctx.text_or_na(risk.overall_risk_level.as_deref()),
        );
        bullet(
            &mut out,
            "Volatility Trends",
            format::list(&ctx.guardrails.list(&risk.volatility_trends)),
        );
        bullet(
            &mut out,
            "Risk Factors",
            format::list(&ctx.guardrails.list(&risk.risk_factors)),
        );
        bullet(
            &mut out,
            "Hedging Recommendations",
            format::list(&ctx.guardrails.list(&risk.hedging_recommendations)),
        );
        out.push('\n');
    }

    paragraph(&mut out, "### Outlook", &ctx.text_or_na(raw.outlook.as_deref()));
    bullet_list(
        &mut out,
        "### Key Insights",
        &ctx.guardrails.list(&raw.key_insights),
    );

    Ok(out)
}

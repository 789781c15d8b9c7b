//! Markdown sections, one per (ticker, report kind)
//!
//! Each renderer decodes an [`AgentPayload`] into its lenient schema, vets
//! every field through the [`Guardrails`] and writes Markdown. A renderer
//! returns `Err` only when the whole section has to be replaced by the
//! unavailable marker; optional blocks that fail their checks render
//! [`QUALITY_NOTE`] in place.

pub mod historical;
pub mod insider;
pub mod market;
pub mod news;
pub mod sentiment;
pub mod volatility;

use chrono::NaiveDate;
use std::fmt::Debug;
use tracing::{debug, warn};

use crate::domain::{AgentPayload, ReportKind, ReportRequest, Ticker};
use crate::format;
use crate::guardrails::{Guardrails, Outcome, Rejection};

/// Text written in place of a section that could not be produced
pub const UNAVAILABLE_MARKER: &str = "_Report unavailable: the data did not pass quality checks._";

/// Text written in place of an optional block that failed its checks
pub const QUALITY_NOTE: &str = "Data unavailable or did not meet quality checks.";

/// Content of one section
#[derive(Debug, Clone, PartialEq)]
pub enum SectionBody {
    Rendered(String),
    /// The agent call failed or the payload was rejected as a whole
    Unavailable { reason: String },
}

/// One slot of a report bundle
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSection {
    pub kind: ReportKind,
    /// `None` for the cross-ticker market conditions report
    pub subject: Option<Ticker>,
    pub as_of: NaiveDate,
    pub body: SectionBody,
}

impl ReportSection {
    pub fn rendered(request: &ReportRequest, markdown: String) -> Self {
        Self::with_body(request, SectionBody::Rendered(markdown))
    }

    pub fn unavailable(request: &ReportRequest, reason: impl Into<String>) -> Self {
        Self::with_body(
            request,
            SectionBody::Unavailable {
                reason: reason.into(),
            },
        )
    }

    fn with_body(request: &ReportRequest, body: SectionBody) -> Self {
        Self {
            kind: request.kind,
            subject: request.subject.ticker().cloned(),
            as_of: request.as_of,
            body,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self.body, SectionBody::Rendered(_))
    }

    /// Markdown for this slot
    ///
    /// Per-ticker sections get a `## TICKER (as of date)` heading and a
    /// trailing rule; the cross-ticker section is written bare under the
    /// bundle title.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();

        if let Some(ticker) = &self.subject {
            out.push_str(&format!(
                "## {ticker} (as of {})\n\n",
                format::date(self.as_of)
            ));
        }

        match &self.body {
            SectionBody::Rendered(markdown) => out.push_str(markdown.trim_end()),
            SectionBody::Unavailable { .. } => out.push_str(UNAVAILABLE_MARKER),
        }
        out.push_str("\n\n");

        if self.subject.is_some() {
            out.push_str("---\n\n");
        }
        out
    }
}

/// Everything a renderer needs besides the payload
#[derive(Debug, Clone, Copy)]
pub struct SectionContext<'a> {
    pub request: &'a ReportRequest,
    pub guardrails: &'a Guardrails,
}

impl<'a> SectionContext<'a> {
    pub fn new(request: &'a ReportRequest, guardrails: &'a Guardrails) -> Self {
        Self {
            request,
            guardrails,
        }
    }

    /// Vetted value of an optional field; clamps and rejections are logged
    pub(crate) fn keep<T: Debug>(&self, outcome: Outcome<T>) -> Option<T> {
        match outcome {
            Outcome::Accepted(value) => Some(value),
            Outcome::Clamped { value, original } => {
                self.log_clamp(&value, &original);
                Some(value)
            }
            Outcome::Rejected(reason) => {
                self.log_rejection(&reason);
                None
            }
        }
    }

    /// Vetted value of a field the section cannot do without
    pub(crate) fn require<T: Debug>(&self, outcome: Outcome<T>) -> Result<T, Rejection> {
        match outcome {
            Outcome::Accepted(value) => Ok(value),
            Outcome::Clamped { value, original } => {
                self.log_clamp(&value, &original);
                Ok(value)
            }
            Outcome::Rejected(reason) => Err(reason),
        }
    }

    /// Usable text of an optional field, or N/A
    pub(crate) fn text_or_na(&self, raw: Option<&str>) -> String {
        self.guardrails
            .text_opt(raw)
            .unwrap_or_else(|| format::NOT_AVAILABLE.to_string())
    }

    /// Log a value or block that was left out of the section
    pub(crate) fn log_rejection(&self, reason: &Rejection) {
        warn!(
            subject = %self.request.subject,
            kind = %self.request.kind,
            "Dropped: {reason}"
        );
    }

    fn log_clamp<T: Debug>(&self, value: &T, original: &T) {
        debug!(
            subject = %self.request.subject,
            kind = %self.request.kind,
            "Clamped {original:?} to {value:?}"
        );
    }
}

/// Render a payload into the Markdown body of its section
pub fn render(payload: AgentPayload, ctx: &SectionContext<'_>) -> Result<String, Rejection> {
    if payload.kind != ctx.request.kind {
        return Err(Rejection::Inconsistent(format!(
            "expected a {} payload, got {}",
            ctx.request.kind, payload.kind
        )));
    }

    match payload.kind {
        ReportKind::Historical => historical::render(payload, ctx),
        ReportKind::Volatility => volatility::render(payload, ctx),
        ReportKind::News => news::render(payload, ctx),
        ReportKind::Insider => insider::render(payload, ctx),
        ReportKind::Sentiment => sentiment::render(payload, ctx),
        ReportKind::MarketConditions => market::render(payload, ctx),
    }
}

/// `- **Label:** value`
pub(crate) fn bullet(out: &mut String, label: &str, value: impl AsRef<str>) {
    out.push_str(&format!("- **{label}:** {}\n", value.as_ref()));
}

/// Heading followed by a paragraph
pub(crate) fn paragraph(out: &mut String, heading: &str, text: &str) {
    out.push_str(&format!("{heading}\n{text}\n\n"));
}

/// Heading followed by one bullet per item; nothing when the list is empty
pub(crate) fn bullet_list(out: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    out.push_str(heading);
    out.push('\n');
    for item in items {
        out.push_str(&format!("- {item}\n"));
    }
    out.push('\n');
}

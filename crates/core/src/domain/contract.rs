use crate::domain::message::MessageContent;
use crate::domain::portfolio::{
    AllocationSlice, PortfolioResult, Recommendation, RecommendationDetail,
};
use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const DEFAULT_PORTFOLIO_HEADLINE: &str = "Here is your recommended portfolio.";
const PERCENTAGE_SUM_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    Text,
    Portfolio,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response_type: ResponseType,
    pub content: String,
    #[serde(default)]
    pub portfolio_data: Option<WirePortfolio>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WirePortfolio {
    pub risk_profile: String,
    pub projected_return_estimate: String,
    #[serde(alias = "allocation")]
    pub lump_sum_allocation: Vec<WireSlice>,
    #[serde(default)]
    pub monthly_sip_allocation: Option<Vec<WireSlice>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireSlice {
    pub asset_class: String,
    pub percentage: f64,
    pub amount: f64,
    #[serde(default)]
    pub recommendations: Vec<WireRecommendation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireRecommendation {
    pub name: String,
    #[serde(default)]
    pub details: Option<RecommendationDetail>,
    #[serde(default)]
    pub weight: Option<RecommendationDetail>,
}

impl ChatResponse {
    /// The declared `response_type` decides the message kind; a text reply that happens to
    /// carry `portfolio_data` is still text.
    pub fn validate_and_into_content(self) -> anyhow::Result<MessageContent> {
        match self.response_type {
            ResponseType::Text => Ok(MessageContent::text(self.content)),
            ResponseType::Portfolio => {
                let data = self
                    .portfolio_data
                    .context("response_type=portfolio but portfolio_data is null")?;
                let payload = data.validate_and_into_portfolio()?;

                let headline = self.content.trim();
                let headline = if headline.is_empty() {
                    DEFAULT_PORTFOLIO_HEADLINE
                } else {
                    headline
                };
                Ok(MessageContent::portfolio(headline, payload))
            }
        }
    }
}

impl WirePortfolio {
    pub fn validate_and_into_portfolio(self) -> anyhow::Result<PortfolioResult> {
        ensure!(
            !self.lump_sum_allocation.is_empty(),
            "portfolio allocation must be non-empty"
        );

        let lump_sum_allocation = validate_slices("lump_sum", self.lump_sum_allocation)?;
        let monthly_sip_allocation =
            validate_slices("monthly_sip", self.monthly_sip_allocation.unwrap_or_default())?;

        Ok(PortfolioResult {
            risk_profile: self.risk_profile.trim().to_string(),
            projected_return_estimate: self.projected_return_estimate.trim().to_string(),
            lump_sum_allocation,
            monthly_sip_allocation,
        })
    }
}

fn validate_slices(view: &str, slices: Vec<WireSlice>) -> anyhow::Result<Vec<AllocationSlice>> {
    let mut seen = BTreeSet::<String>::new();
    let mut out = Vec::with_capacity(slices.len());
    for slice in slices {
        out.push(slice.validate_and_into_slice(&mut seen)?);
    }

    if !out.is_empty() {
        let sum: f64 = out.iter().map(|s| s.percentage).sum();
        if (sum - 1.0).abs() > PERCENTAGE_SUM_TOLERANCE {
            tracing::warn!(view, sum, "allocation percentages do not sum to 1.0");
        }
    }

    Ok(out)
}

impl WireSlice {
    fn validate_and_into_slice(
        self,
        seen_classes: &mut BTreeSet<String>,
    ) -> anyhow::Result<AllocationSlice> {
        let asset_class = self.asset_class.trim().to_string();
        ensure!(!asset_class.is_empty(), "asset_class must be non-empty");
        ensure!(
            seen_classes.insert(asset_class.clone()),
            "duplicate asset_class: {asset_class}"
        );

        ensure!(
            self.percentage.is_finite() && (0.0..=1.0).contains(&self.percentage),
            "percentage must be between 0 and 1 (got {})",
            self.percentage
        );
        ensure!(
            self.amount.is_finite(),
            "amount must be finite (asset_class={asset_class})"
        );

        let recommendations = self
            .recommendations
            .into_iter()
            .map(|r| Recommendation {
                name: r.name.trim().to_string(),
                detail: r.details.or(r.weight),
            })
            .collect();

        Ok(AllocationSlice {
            asset_class,
            percentage: self.percentage,
            amount: self.amount,
            recommendations,
        })
    }
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioResult {
    pub risk_profile: String,
    /// Pre-formatted by the backend (e.g. "9-11% p.a."); displayed as-is.
    pub projected_return_estimate: String,
    /// Never empty once decoded.
    pub lump_sum_allocation: Vec<AllocationSlice>,
    /// Empty when the backend offers no recurring plan.
    pub monthly_sip_allocation: Vec<AllocationSlice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationSlice {
    pub asset_class: String,
    /// Share of the whole, 0..=1.
    pub percentage: f64,
    pub amount: f64,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub name: String,
    pub detail: Option<RecommendationDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecommendationDetail {
    Weight(f64),
    Text(String),
}

impl std::fmt::Display for RecommendationDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Weight(w) => write!(f, "{w}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationView {
    LumpSum,
    MonthlySip,
}

impl AllocationView {
    pub fn label(self) -> &'static str {
        match self {
            Self::LumpSum => "Lump Sum",
            Self::MonthlySip => "Monthly SIP",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSlice {
    pub label: String,
    pub percent: f64,
}

impl PortfolioResult {
    /// Views a user may switch between. The SIP view is only offered when it has slices.
    pub fn views(&self) -> Vec<AllocationView> {
        let mut out = vec![AllocationView::LumpSum];
        if !self.monthly_sip_allocation.is_empty() {
            out.push(AllocationView::MonthlySip);
        }
        out
    }

    pub fn allocation(&self, view: AllocationView) -> Option<&[AllocationSlice]> {
        match view {
            AllocationView::LumpSum => Some(&self.lump_sum_allocation),
            AllocationView::MonthlySip if self.monthly_sip_allocation.is_empty() => None,
            AllocationView::MonthlySip => Some(&self.monthly_sip_allocation),
        }
    }

    pub fn chart_slices(&self, view: AllocationView) -> Vec<ChartSlice> {
        self.allocation(view)
            .unwrap_or_default()
            .iter()
            .map(|slice| ChartSlice {
                label: slice.asset_class.clone(),
                percent: slice.percentage * 100.0,
            })
            .collect()
    }

    pub fn total_amount(&self, view: AllocationView) -> f64 {
        self.allocation(view)
            .unwrap_or_default()
            .iter()
            .map(|slice| slice.amount)
            .sum()
    }
}

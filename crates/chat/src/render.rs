use advisor_core::domain::message::{Message, MessageContent, Origin};
use advisor_core::domain::portfolio::{AllocationSlice, AllocationView, PortfolioResult};
use std::fmt::Write;

const BAR_WIDTH: usize = 20;

pub const WELCOME: &str = "\
==============================================
  Investment Advisor
  Plan lump-sum and monthly SIP investments
  by describing your goals in plain words.
==============================================
Press Enter (or type `start`) to begin, `/quit` to exit.";

pub const CHAT_HEADER: &str = "\
---- chat ----  (`/back` for the welcome screen, `/quit` to exit)";

pub const TYPING: &str = "assistant is typing...";

pub fn message(msg: &Message) -> String {
    let who = match msg.origin {
        Origin::User => "you",
        Origin::Assistant => "advisor",
    };
    let time = msg.sent_at.format("%H:%M");

    match &msg.content {
        MessageContent::PlainText { body } => format!("[{time}] {who}: {body}"),
        MessageContent::PortfolioResult { body, payload } => {
            format!("[{time}] {who}: {body}\n{}", portfolio(payload))
        }
    }
}

pub fn portfolio(p: &PortfolioResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  Risk profile:     {}", p.risk_profile);
    let _ = writeln!(out, "  Projected return: {}", p.projected_return_estimate);

    for view in p.views() {
        let Some(slices) = p.allocation(view) else {
            continue;
        };
        let _ = writeln!(
            out,
            "  [{}] total {}",
            view.label(),
            rupees(p.total_amount(view))
        );
        for slice in slices {
            out.push_str(&allocation_slice(slice));
        }
    }

    if p.views().len() == 1 {
        let _ = writeln!(out, "  ({} plan not offered)", AllocationView::MonthlySip.label());
    }
    out.trim_end().to_string()
}

fn allocation_slice(slice: &AllocationSlice) -> String {
    let mut out = String::new();
    let percent = slice.percentage * 100.0;
    let _ = writeln!(
        out,
        "    {:<14} {} {:>5.1}%  {}",
        slice.asset_class,
        bar(percent),
        percent,
        rupees(slice.amount)
    );
    for rec in &slice.recommendations {
        match &rec.detail {
            Some(detail) => {
                let _ = writeln!(out, "      - {} ({detail})", rec.name);
            }
            None => {
                let _ = writeln!(out, "      - {}", rec.name);
            }
        }
    }
    out
}

fn bar(percent: f64) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

/// Rupees with Indian digit grouping (last three digits, then pairs), at most two
/// decimals and no trailing zeros: 100000 -> "₹1,00,000".
fn rupees(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let len = int_part.len();
    let mut grouped = String::with_capacity(len + len / 2);
    for (i, ch) in int_part.chars().enumerate() {
        let remaining = len - i;
        if i > 0 && remaining >= 3 && (remaining == 3 || (remaining - 3) % 2 == 0) {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    if frac_part.is_empty() {
        format!("₹{sign}{grouped}")
    } else {
        format!("₹{sign}{grouped}.{frac_part}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::domain::portfolio::{Recommendation, RecommendationDetail};

    fn slice(asset_class: &str, percentage: f64, amount: f64) -> AllocationSlice {
        AllocationSlice {
            asset_class: asset_class.to_string(),
            percentage,
            amount,
            recommendations: vec![Recommendation {
                name: format!("{asset_class} Fund"),
                detail: Some(RecommendationDetail::Text("core holding".to_string())),
            }],
        }
    }

    #[test]
    fn rupees_use_indian_grouping() {
        assert_eq!(rupees(0.0), "₹0");
        assert_eq!(rupees(999.5), "₹999.5");
        assert_eq!(rupees(1_000.0), "₹1,000");
        assert_eq!(rupees(100_000.0), "₹1,00,000");
        assert_eq!(rupees(1_234_567.891), "₹12,34,567.89");
        assert_eq!(rupees(-1500.0), "₹-1,500");
    }

    #[test]
    fn bar_is_proportional() {
        assert_eq!(bar(50.0), format!("{}{}", "#".repeat(10), ".".repeat(10)));
        assert_eq!(bar(0.0), ".".repeat(BAR_WIDTH));
        assert_eq!(bar(140.0), "#".repeat(BAR_WIDTH));
    }

    #[test]
    fn portfolio_without_sip_shows_one_view() {
        let p = PortfolioResult {
            risk_profile: "Conservative".to_string(),
            projected_return_estimate: "6-7% p.a.".to_string(),
            lump_sum_allocation: vec![slice("Debt", 0.8, 8000.0), slice("Gold", 0.2, 2000.0)],
            monthly_sip_allocation: vec![],
        };
        let out = portfolio(&p);
        assert!(out.contains("[Lump Sum] total ₹10,000"));
        assert!(!out.contains("[Monthly SIP]"));
        assert!(out.contains("Monthly SIP plan not offered"));
        assert!(out.contains("- Debt Fund (core holding)"));
    }

    #[test]
    fn portfolio_with_sip_shows_both_views() {
        let p = PortfolioResult {
            risk_profile: "Aggressive".to_string(),
            projected_return_estimate: "12% p.a.".to_string(),
            lump_sum_allocation: vec![slice("Equity", 1.0, 50_000.0)],
            monthly_sip_allocation: vec![slice("Index", 1.0, 2_000.0)],
        };
        let out = portfolio(&p);
        assert!(out.contains("[Lump Sum] total ₹50,000"));
        assert!(out.contains("[Monthly SIP] total ₹2,000"));
    }

    #[test]
    fn user_message_line() {
        let line = message(&Message::user("hello"));
        assert!(line.ends_with("you: hello"));
    }
}

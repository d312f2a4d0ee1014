use super::super::domain::{
    ComplianceCategory, ComplianceStatus, ScoringError, StoreSnapshot, StoreType,
};
use super::super::status::{days_overdue, worst_status, StatusClassifier};
use super::config::PriorityWeights;
use super::{PriorityBreakdown, PriorityContext};
use chrono::Duration;

pub(crate) struct ScoredFactors {
    pub breakdown: PriorityBreakdown,
    pub reasons: Vec<String>,
    pub overall_status: ComplianceStatus,
}

pub(crate) fn score_store(
    store: &StoreSnapshot,
    context: &PriorityContext,
    weights: &PriorityWeights,
) -> Result<ScoredFactors, ScoringError> {
    let classifier = StatusClassifier::new(context.orange_threshold_days)?;
    let now = context.now;
    let statuses = classifier.item_statuses(&store.compliance_items, now)?;

    let mut breakdown = PriorityBreakdown::default();
    let mut reasons = Vec::new();

    let red_categories: Vec<ComplianceCategory> = store
        .compliance_items
        .iter()
        .zip(&statuses)
        .filter(|(_, status)| **status == ComplianceStatus::Red)
        .map(|(item, _)| item.category)
        .collect();

    if !red_categories.is_empty() {
        let count = red_categories.len();
        breakdown.red_items = weights.red_item * count as u32;
        let labels = red_categories
            .iter()
            .map(|category| category.label())
            .collect::<Vec<_>>()
            .join(", ");
        reasons.push(format!(
            "{count} RED compliance item{} ({labels})",
            plural(count)
        ));
    }

    let overdue: Vec<i64> = store
        .corrective_actions
        .iter()
        .filter(|action| action.status.is_outstanding())
        .map(|action| days_overdue(action.due_date, now))
        .filter(|days| *days > 0)
        .collect();

    if !overdue.is_empty() {
        let count = overdue.len();
        let extended = overdue
            .iter()
            .filter(|days| **days > weights.extended_overdue_after_days)
            .count();
        breakdown.overdue_actions =
            weights.overdue_action * count as u32 + weights.extended_overdue_action * extended as u32;
        let max_overdue = overdue.iter().copied().max().unwrap_or_default();
        reasons.push(format!(
            "{count} overdue action{} ({max_overdue} days)",
            plural(count)
        ));
    }

    if store.store_type == StoreType::FoodAndBeverage
        && red_categories
            .iter()
            .any(|category| ComplianceCategory::FOOD_AND_BEVERAGE_CRITICAL.contains(category))
    {
        breakdown.food_and_beverage_fire_issues = weights.food_and_beverage_fire_issue;
        reasons.push("F&B with fire suppression/extraction issues".to_string());
    }

    let lookback_start = now - Duration::days(weights.repeat_offender_lookback_days);
    let recent_reds = store
        .red_events
        .iter()
        .filter(|event| **event >= lookback_start && **event <= now)
        .count();
    if store.repeat_offender || recent_reds >= weights.repeat_offender_red_events {
        breakdown.repeat_offender = weights.repeat_offender;
        reasons.push("Repeat offender (multiple compliance failures)".to_string());
    }

    if store.high_foot_traffic {
        breakdown.high_foot_traffic = weights.high_foot_traffic;
        reasons.push("High foot traffic zone".to_string());
    }

    if context.peak_periods.iter().any(|period| period.contains(now)) {
        breakdown.peak_period = weights.peak_period;
        reasons.push("Currently in peak period".to_string());
    }

    Ok(ScoredFactors {
        breakdown,
        reasons,
        overall_status: worst_status(statuses),
    })
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

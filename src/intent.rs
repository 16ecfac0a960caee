//! Intent Router - maps free-text questions onto one of the fixed report templates
//!
//! Routing is a plain keyword decision list: rules are evaluated in order over the
//! case-folded message and the first rule whose predicate holds wins. There is no
//! scoring and no language model involved, so the same text always routes the same way.

use crate::template::{DateRange, ReportTemplate};
use serde::Serialize;
use tracing::debug;

/// Event fired on vehicle detail page views
pub const VEHICLE_PAGEVIEW_EVENT: &str = "asc_item_pageviews";

/// Custom dimension carrying new / used / cpo
pub const ITEM_CONDITION_DIMENSION: &str = "customEvent:item_condition";

/// Conjunction of keyword groups: every group must have at least one keyword present.
#[derive(Debug, Clone, Serialize)]
pub struct KeywordPredicate {
    groups: Vec<Vec<String>>,
}

impl KeywordPredicate {
    pub fn any_of(keywords: &[&str]) -> Self {
        Self {
            groups: vec![Self::group(keywords)],
        }
    }

    pub fn and_any_of(mut self, keywords: &[&str]) -> Self {
        self.groups.push(Self::group(keywords));
        self
    }

    fn group(keywords: &[&str]) -> Vec<String> {
        keywords.iter().map(|k| k.to_lowercase()).collect()
    }

    /// `text` must already be case-folded
    pub fn matches(&self, text: &str) -> bool {
        self.groups
            .iter()
            .all(|group| group.iter().any(|keyword| text.contains(keyword.as_str())))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IntentRule {
    pub name: String,
    pub predicate: KeywordPredicate,
    pub template: ReportTemplate,
}

impl IntentRule {
    pub fn new(name: &str, predicate: KeywordPredicate, template: ReportTemplate) -> Self {
        Self {
            name: name.to_string(),
            predicate,
            template,
        }
    }
}

/// Ordered, first-match-wins rule list
#[derive(Debug, Clone)]
pub struct IntentRouter {
    rules: Vec<IntentRule>,
}

impl Default for IntentRouter {
    fn default() -> Self {
        Self::new(dealership_rules())
    }
}

impl IntentRouter {
    pub fn new(rules: Vec<IntentRule>) -> Self {
        Self { rules }
    }

    /// First rule matching the message, if any
    pub fn route(&self, text: &str) -> Option<&IntentRule> {
        let folded = text.to_lowercase();
        let rule = self.rules.iter().find(|rule| rule.predicate.matches(&folded));
        match rule {
            Some(rule) => debug!("Routed message to report '{}'", rule.name),
            None => debug!("No report template matches message"),
        }
        rule
    }

    pub fn select_template(&self, text: &str) -> Option<ReportTemplate> {
        self.route(text).map(|rule| rule.template.clone())
    }
}

/// The dealership report set. The three traffic rules share a guard and are
/// ordered most specific first so that city beats device beats the plain date report.
pub fn dealership_rules() -> Vec<IntentRule> {
    let traffic: &[&str] = &["active users", "traffic"];
    let last_week = DateRange::days_ago_to_yesterday(7);
    let last_month = DateRange::days_ago_to_yesterday(30);

    vec![
        IntentRule::new(
            "traffic_by_city",
            KeywordPredicate::any_of(traffic).and_any_of(&["city", "florida", "location"]),
            ReportTemplate::new(&["city"], &["activeUsers", "sessions"], last_week.clone())
                .with_limit(20),
        ),
        IntentRule::new(
            "traffic_by_device",
            KeywordPredicate::any_of(traffic).and_any_of(&["device", "mobile", "desktop"]),
            ReportTemplate::new(
                &["deviceCategory"],
                &["activeUsers", "sessions", "bounceRate"],
                last_week.clone(),
            ),
        ),
        IntentRule::new(
            "traffic_by_date",
            KeywordPredicate::any_of(traffic),
            ReportTemplate::new(&["date"], &["activeUsers", "sessions"], last_week),
        ),
        IntentRule::new(
            "vehicle_inventory",
            KeywordPredicate::any_of(&["vehicle", "inventory", VEHICLE_PAGEVIEW_EVENT]),
            ReportTemplate::new(
                &["eventName", ITEM_CONDITION_DIMENSION],
                &["eventCount"],
                last_month.clone(),
            )
            .with_limit(50),
        ),
        IntentRule::new(
            "campaign_sources",
            KeywordPredicate::any_of(&["campaign", "marketing", "source"]),
            ReportTemplate::new(
                &["sessionSource", "sessionMedium"],
                &["sessions", "conversions"],
                last_month,
            )
            .with_limit(20),
        ),
    ]
}

use serde::{Deserialize, Serialize};

/// Fixed additive weights for each priority factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityWeights {
    pub red_item: u32,
    pub overdue_action: u32,
    pub extended_overdue_action: u32,
    pub food_and_beverage_fire_issue: u32,
    pub repeat_offender: u32,
    pub high_foot_traffic: u32,
    pub peak_period: u32,
    /// Actions overdue by more than this many days attract the extended weight.
    pub extended_overdue_after_days: i64,
    pub repeat_offender_lookback_days: i64,
    pub repeat_offender_red_events: usize,
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            red_item: 50,
            overdue_action: 30,
            extended_overdue_action: 10,
            food_and_beverage_fire_issue: 25,
            repeat_offender: 20,
            high_foot_traffic: 15,
            peak_period: 10,
            extended_overdue_after_days: 7,
            repeat_offender_lookback_days: 90,
            repeat_offender_red_events: 2,
        }
    }
}

use serde::{Deserialize, Serialize};

/// Per-zone counts gathered over one time window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneMetrics {
    pub restaurant_criticals: u32,
    pub high_footfall_reds: u32,
    pub next_72_hours_risk: u32,
    pub overdue_critical_actions: u32,
    pub total_reds: u32,
}

impl ZoneMetrics {
    pub fn risk_score(&self) -> i64 {
        i64::from(self.restaurant_criticals) * 5
            + i64::from(self.high_footfall_reds) * 4
            + i64::from(self.next_72_hours_risk) * 4
            + i64::from(self.overdue_critical_actions) * 3
            + i64::from(self.total_reds) * 2
    }

    pub(crate) fn absorb(&mut self, other: &ZoneMetrics) {
        self.restaurant_criticals += other.restaurant_criticals;
        self.high_footfall_reds += other.high_footfall_reds;
        self.next_72_hours_risk += other.next_72_hours_risk;
        self.overdue_critical_actions += other.overdue_critical_actions;
        self.total_reds += other.total_reds;
    }

    /// One-line explanation of what pushes the zone up the radar.
    pub fn driving_factors(&self, zone: &str) -> String {
        let mut factors = Vec::new();
        if self.restaurant_criticals > 0 {
            factors.push(format!(
                "{} Restaurant Critical{}",
                self.restaurant_criticals,
                if self.restaurant_criticals == 1 { "" } else { "s" }
            ));
        }
        if self.high_footfall_reds > 0 {
            factors.push(format!(
                "{} High-footfall Red{}",
                self.high_footfall_reds,
                if self.high_footfall_reds == 1 { "" } else { "s" }
            ));
        }
        if self.next_72_hours_risk > 0 {
            factors.push(format!(
                "{} 72h expir{}",
                self.next_72_hours_risk,
                if self.next_72_hours_risk == 1 { "y" } else { "ies" }
            ));
        }

        if factors.is_empty() {
            format!("{zone}: All clear")
        } else {
            format!("{zone}: {}", factors.join(" + "))
        }
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Clock, CoreError, CoreResult};

/// How close a departure is, from the operator's point of view
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EligibilityTier {
    /// Past, or inside the critical window. Cannot be booked here.
    Blocked,
    /// Short notice. Only groups of a minimum size run.
    Urgent,
    /// Any group size, may grow over time.
    Standard,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EligibilityResult {
    pub eligible: bool,
    pub tier: EligibilityTier,
    pub reason: Option<String>,
    pub days_until: i64,
}

/// Lead-time thresholds, in whole days
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct EligibilityRules {
    /// Departures fewer than this many days away are blocked
    pub critical_days: i64,
    /// Departures up to and including this many days away are urgent
    pub urgent_days: i64,
    /// Smallest group accepted inside the urgent window
    pub urgent_min_pax: u32,
}

impl Default for EligibilityRules {
    fn default() -> Self {
        Self {
            critical_days: 3,
            urgent_days: 5,
            urgent_min_pax: 4,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EligibilityPolicy {
    rules: EligibilityRules,
}

impl EligibilityPolicy {
    pub fn new(rules: EligibilityRules) -> CoreResult<Self> {
        if rules.critical_days < 0 {
            return Err(CoreError::ConfigError(format!(
                "critical_days must not be negative, got {}",
                rules.critical_days
            )));
        }
        if rules.urgent_days < rules.critical_days {
            return Err(CoreError::ConfigError(format!(
                "urgent_days ({}) must not be below critical_days ({})",
                rules.urgent_days, rules.critical_days
            )));
        }
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &EligibilityRules {
        &self.rules
    }

    /// Classify a departure relative to `today`.
    ///
    /// Both dates are calendar dates, so the difference is already a whole
    /// number of days and a departure later today counts as day 0.
    pub fn evaluate(
        &self,
        departure_date: NaiveDate,
        passenger_count: u32,
        today: NaiveDate,
    ) -> EligibilityResult {
        let days_until = days_until(departure_date, today);
        let result = self.classify(days_until, passenger_count);

        if !result.eligible {
            debug!(
                %departure_date,
                days_until,
                passenger_count,
                tier = ?result.tier,
                "departure not eligible"
            );
        }
        result
    }

    /// Same as [`evaluate`](Self::evaluate) with today taken from `clock`.
    pub fn evaluate_now(
        &self,
        clock: &dyn Clock,
        departure_date: NaiveDate,
        passenger_count: u32,
    ) -> EligibilityResult {
        self.evaluate(departure_date, passenger_count, clock.today())
    }

    fn classify(&self, days_until: i64, passenger_count: u32) -> EligibilityResult {
        let rules = &self.rules;

        if days_until < 0 {
            return blocked(days_until, "departure date is in the past");
        }

        if days_until < rules.critical_days {
            return blocked(
                days_until,
                "too close to departure; requires out-of-band coordination",
            );
        }

        if days_until <= rules.urgent_days {
            let eligible = passenger_count >= rules.urgent_min_pax;
            let reason = (!eligible).then(|| {
                format!(
                    "urgent window ({} days to departure) requires a minimum group size of {}",
                    days_until, rules.urgent_min_pax
                )
            });
            return EligibilityResult {
                eligible,
                tier: EligibilityTier::Urgent,
                reason,
                days_until,
            };
        }

        EligibilityResult {
            eligible: true,
            tier: EligibilityTier::Standard,
            reason: None,
            days_until,
        }
    }
}

fn blocked(days_until: i64, reason: &str) -> EligibilityResult {
    EligibilityResult {
        eligible: false,
        tier: EligibilityTier::Blocked,
        reason: Some(reason.to_string()),
        days_until,
    }
}

/// Whole days from `today` to `departure_date`; negative when in the past.
pub fn days_until(departure_date: NaiveDate, today: NaiveDate) -> i64 {
    departure_date.signed_duration_since(today).num_days()
}

/// Parse a `YYYY-MM-DD` departure date.
pub fn parse_departure_date(input: &str) -> CoreResult<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CoreError::ValidationError(
            "departure_date is required".to_string(),
        ));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| {
        CoreError::ValidationError(format!(
            "departure_date must be a YYYY-MM-DD date, got {:?}",
            trimmed
        ))
    })
}

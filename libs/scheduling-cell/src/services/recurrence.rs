use chrono::{Datelike, Duration, Months, NaiveDate};
use tracing::debug;
use uuid::Uuid;

use crate::models::{
    GeneratedSlotRequest, RecurrenceEnds, RecurrenceSpec, SchedulingError, TimeSlotTemplate,
};

/// Hard stop for the day-by-day scan, measured from the start date. Keeps
/// count-mode generation bounded when the pattern never reaches its target.
const SAFETY_HORIZON_MONTHS: u32 = 24;

/// Expands a weekly recurrence pattern into concrete calendar dates and slot
/// creation requests. Pure computation, no I/O and no shared state, so it is
/// safe to call once per keystroke from a live preview.
pub struct RecurrenceService;

impl RecurrenceService {
    pub fn new() -> Self {
        Self
    }

    /// Enumerate the calendar dates matched by `spec`, ascending and
    /// duplicate-free.
    ///
    /// A date is included when all three hold:
    /// - its weekday is one of `spec.working_days` (0 = Sunday .. 6 = Saturday),
    /// - `floor(days_from_start / 7)` is a multiple of `repeat_every_weeks`,
    /// - it is not in `spec.excluded_dates`.
    ///
    /// In date mode the scan stops at the earlier of `ends.end_date` and
    /// `spec.end_date`; in count mode it stops after `count` matches or at the
    /// safety horizon, whichever comes first. Hitting the horizon silently
    /// truncates the result rather than erroring.
    ///
    /// Degenerate input (empty `working_days`, `repeat_every_weeks` < 1, a
    /// missing or zero count) yields an empty result instead of an error, so
    /// partially-filled form state can be previewed as-is. Write paths are
    /// expected to run [`RecurrenceService::validate_spec`] first.
    pub fn generate_working_dates(&self, spec: &RecurrenceSpec) -> Vec<NaiveDate> {
        if spec.repeat_every_weeks < 1 {
            return Vec::new();
        }

        let start = spec.start_date;
        let safety_horizon = start + Months::new(SAFETY_HORIZON_MONTHS);

        let count_cap = match spec.ends {
            RecurrenceEnds::Count { count } => Some(count.unwrap_or(0).max(0) as usize),
            RecurrenceEnds::Date { .. } => None,
        };

        let scan_end = match spec.ends {
            // The earlier of the two caps governs; both are re-checked below.
            RecurrenceEnds::Date { end_date } => match end_date {
                Some(ends_on) => ends_on.min(spec.end_date),
                None => spec.end_date,
            },
            RecurrenceEnds::Count { .. } => safety_horizon,
        };

        let mut results = Vec::new();
        let mut cursor = start;

        while cursor <= scan_end {
            if let Some(cap) = count_cap {
                if results.len() >= cap {
                    break;
                }
            }

            let days_from_start = (cursor - start).num_days();
            let weeks_from_start = days_from_start / 7;
            let weekday = cursor.weekday().num_days_from_sunday() as i32;

            if weeks_from_start % spec.repeat_every_weeks as i64 == 0
                && spec.working_days.contains(&weekday)
                && !spec.excluded_dates.contains(&cursor)
            {
                results.push(cursor);
            }

            cursor += Duration::days(1);
        }

        // Re-clamp against the explicit end date even though the scan bound
        // above already honors it; both checks are kept intentionally.
        if let RecurrenceEnds::Date {
            end_date: Some(ends_on),
        } = spec.ends
        {
            results.retain(|date| *date <= ends_on);
        }

        debug!(
            "Recurrence from {} matched {} dates (interval {} weeks)",
            start,
            results.len(),
            spec.repeat_every_weeks
        );

        results
    }

    /// Number of slots a submission of `spec` with `templates` would create.
    /// Preview arithmetic only, nothing is persisted.
    pub fn calculate_slot_count(
        &self,
        spec: &RecurrenceSpec,
        templates: &[TimeSlotTemplate],
    ) -> usize {
        self.generate_working_dates(spec).len() * templates.len()
    }

    /// Cross-product of matched dates and templates, one creation request per
    /// pair. Output is ordered by date ascending, then by template input
    /// order, and every request is marked available.
    pub fn build_slot_requests(
        &self,
        spec: &RecurrenceSpec,
        templates: &[TimeSlotTemplate],
        doctor_id: Uuid,
        facility_id: Uuid,
    ) -> Vec<GeneratedSlotRequest> {
        let dates = self.generate_working_dates(spec);
        let mut requests = Vec::with_capacity(dates.len() * templates.len());

        for slot_date in dates {
            for template in templates {
                requests.push(GeneratedSlotRequest {
                    doctor_id,
                    facility_id,
                    slot_date,
                    start_time: template.start_time,
                    end_time: template.end_time,
                    is_available: true,
                    slot_type: template.slot_type,
                });
            }
        }

        requests
    }

    /// Structural validation for write paths. The generator itself tolerates
    /// degenerate input by returning nothing; callers that persist its output
    /// reject such input up front instead.
    pub fn validate_spec(&self, spec: &RecurrenceSpec) -> Result<(), SchedulingError> {
        if spec.repeat_every_weeks < 1 {
            return Err(SchedulingError::ValidationError(
                "Repeat interval must be at least 1 week".to_string(),
            ));
        }

        if spec.working_days.is_empty() {
            return Err(SchedulingError::ValidationError(
                "At least one working day must be selected".to_string(),
            ));
        }

        if let Some(day) = spec
            .working_days
            .iter()
            .find(|day| **day < 0 || **day > 6)
        {
            return Err(SchedulingError::ValidationError(format!(
                "Working day {} is out of range (0 = Sunday .. 6 = Saturday)",
                day
            )));
        }

        if let RecurrenceEnds::Count { count } = spec.ends {
            if count.unwrap_or(0) < 1 {
                return Err(SchedulingError::ValidationError(
                    "Occurrence count must be at least 1".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Validation for the time-of-day templates applied to each date.
    pub fn validate_templates(&self, templates: &[TimeSlotTemplate]) -> Result<(), SchedulingError> {
        if templates.is_empty() {
            return Err(SchedulingError::ValidationError(
                "At least one time slot template is required".to_string(),
            ));
        }

        for template in templates {
            if template.start_time >= template.end_time {
                return Err(SchedulingError::ValidationError(
                    "Template start time must be before end time".to_string(),
                ));
            }
        }

        Ok(())
    }
}

impl Default for RecurrenceService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SlotType;
    use chrono::NaiveTime;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn weekday_spec() -> RecurrenceSpec {
        RecurrenceSpec {
            start_date: date(2025, 1, 6), // a Monday
            end_date: date(2025, 1, 12),
            working_days: vec![1, 2, 3, 4, 5],
            repeat_every_weeks: 1,
            ends: RecurrenceEnds::Date {
                end_date: Some(date(2025, 1, 12)),
            },
            excluded_dates: vec![],
        }
    }

    #[test]
    fn weekly_pattern_covers_monday_to_friday() {
        let service = RecurrenceService::new();
        let dates = service.generate_working_dates(&weekday_spec());

        assert_eq!(
            dates,
            vec![
                date(2025, 1, 6),
                date(2025, 1, 7),
                date(2025, 1, 8),
                date(2025, 1, 9),
                date(2025, 1, 10),
            ]
        );
    }

    #[test]
    fn biweekly_pattern_skips_the_off_week() {
        let service = RecurrenceService::new();
        let mut spec = weekday_spec();
        spec.repeat_every_weeks = 2;
        spec.end_date = date(2025, 1, 26);
        spec.ends = RecurrenceEnds::Date {
            end_date: Some(date(2025, 1, 26)),
        };

        let dates = service.generate_working_dates(&spec);

        // Week of Jan 6 matches, week of Jan 13 is the off week, week of
        // Jan 20 matches again.
        assert!(dates.contains(&date(2025, 1, 6)));
        assert!(!dates.iter().any(|d| (date(2025, 1, 13)..=date(2025, 1, 19)).contains(d)));
        assert!(dates.contains(&date(2025, 1, 20)));
        assert_eq!(dates.len(), 10);
    }

    #[test]
    fn count_mode_stops_after_n_matches() {
        let service = RecurrenceService::new();
        let spec = RecurrenceSpec {
            start_date: date(2025, 1, 6),
            end_date: date(2025, 1, 12), // ignored in count mode
            working_days: vec![1],
            repeat_every_weeks: 1,
            ends: RecurrenceEnds::Count { count: Some(3) },
            excluded_dates: vec![],
        };

        let dates = service.generate_working_dates(&spec);

        assert_eq!(
            dates,
            vec![date(2025, 1, 6), date(2025, 1, 13), date(2025, 1, 20)]
        );
    }

    #[test]
    fn excluded_dates_are_skipped() {
        let service = RecurrenceService::new();
        let mut spec = weekday_spec();
        spec.excluded_dates = vec![date(2025, 1, 8)];

        let dates = service.generate_working_dates(&spec);

        assert_eq!(
            dates,
            vec![
                date(2025, 1, 6),
                date(2025, 1, 7),
                date(2025, 1, 9),
                date(2025, 1, 10),
            ]
        );
    }

    #[test]
    fn two_templates_produce_date_major_ordering() {
        let service = RecurrenceService::new();
        let templates = vec![
            TimeSlotTemplate {
                start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
                slot_type: SlotType::Regular,
            },
            TimeSlotTemplate {
                start_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
                slot_type: SlotType::Consultation,
            },
        ];

        let requests = service.build_slot_requests(
            &weekday_spec(),
            &templates,
            Uuid::new_v4(),
            Uuid::new_v4(),
        );

        assert_eq!(requests.len(), 10);
        // First two entries share the first date, in template input order.
        assert_eq!(requests[0].slot_date, date(2025, 1, 6));
        assert_eq!(requests[0].slot_type, SlotType::Regular);
        assert_eq!(requests[1].slot_date, date(2025, 1, 6));
        assert_eq!(requests[1].slot_type, SlotType::Consultation);
        assert_eq!(requests[2].slot_date, date(2025, 1, 7));
        assert!(requests.iter().all(|r| r.is_available));
    }

    #[test]
    fn zero_interval_yields_empty_not_panic() {
        let service = RecurrenceService::new();
        let mut spec = weekday_spec();
        spec.repeat_every_weeks = 0;

        assert!(service.generate_working_dates(&spec).is_empty());
    }
}

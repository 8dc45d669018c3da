use serde::Serialize;

use crate::filter::FilteredView;

/// The three headline numbers shown above the charts.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct KpiSummary {
    /// Sum of session costs, truncated to a whole currency amount for
    /// display.
    pub total_cost: i64,
    /// Mean session duration in hours, rounded to 1 decimal.
    pub average_duration: f64,
    /// Mean participant count, rounded to 2 decimals.
    pub average_participants: f64,
}

/// A categorical key mapped to a summed measure, in presentation order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GroupedAggregate {
    pub entries: Vec<(String, f64)>,
}

/// Compute the KPI block over a filtered view.
///
/// The filter stage halts on empty views before this runs, so a
/// non-empty view may be assumed; an empty one still yields zeros rather
/// than NaN.
pub fn summarize(view: &FilteredView) -> KpiSummary {
    let records = view.records();
    let count = records.len() as f64;

    let total_cost: f64 = records.iter().map(|r| r.cost).sum();
    let (duration_sum, participant_sum) = records
        .iter()
        .fold((0.0, 0.0), |(d, p), r| (d + r.duration, p + r.participants));

    let (average_duration, average_participants) = if records.is_empty() {
        (0.0, 0.0)
    } else {
        (
            round_to(duration_sum / count, 1),
            round_to(participant_sum / count, 2),
        )
    };

    KpiSummary {
        total_cost: total_cost as i64,
        average_duration,
        average_participants,
    }
}

/// Total session cost per therapy type, ordered ascending by the summed
/// cost. Ties keep their first-appearance order (the sort is stable).
pub fn cost_by_therapy_type(view: &FilteredView) -> GroupedAggregate {
    let mut grouped = group_sum(view, |r| (&r.therapy_type, r.cost));
    grouped
        .entries
        .sort_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    grouped
}

/// Total session duration per therapist, keys in the order they first
/// appear in the view. Deliberately not sorted by value.
pub fn duration_by_therapist(view: &FilteredView) -> GroupedAggregate {
    group_sum(view, |r| (&r.therapist, r.duration))
}

fn group_sum<'a, F>(view: &'a FilteredView, select: F) -> GroupedAggregate
where
    F: Fn(&'a crate::dataset::SessionRecord) -> (&'a str, f64),
{
    let mut entries: Vec<(String, f64)> = Vec::new();
    for record in view.records() {
        let (key, measure) = select(record);
        match entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, sum)) => *sum += measure,
            None => entries.push((key.to_string(), measure)),
        }
    }
    GroupedAggregate { entries }
}

fn round_to(value: f64, places: u32) -> f64 {
    let shift = 10f64.powi(places as i32);
    (value * shift).round() / shift
}

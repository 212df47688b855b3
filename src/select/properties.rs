use log::info;

use crate::config::ConflictSection;
use crate::data::model::ConflictDataset;

// ---------------------------------------------------------------------------
// Stage 1: conflict-property filter
// ---------------------------------------------------------------------------

/// Keep the events matching all non-empty conflict criteria, ANDed together.
///
/// * `min_nr_casualties` is an inclusive lower bound on `best`
/// * `type_of_conflict` is an exact match on `type_of_violence`
/// * `country` is an exact match
///
/// An empty criterion constrains nothing: that predicate is skipped.
pub fn filter_properties(dataset: ConflictDataset, criteria: &ConflictSection) -> ConflictDataset {
    info!("filtering on conflict properties");

    match criteria.min_nr_casualties {
        Some(min) => info!("...filtering 'best' with lower bound {min}"),
        None => info!("...passing 'best' as it is empty"),
    }
    match criteria.type_of_conflict {
        Some(code) => info!("...filtering 'type_of_violence' with value {code}"),
        None => info!("...passing 'type_of_violence' as it is empty"),
    }
    if criteria.country.is_empty() {
        info!("...passing 'country' as it is empty");
    } else {
        info!("...filtering 'country' with value {}", criteria.country);
    }

    dataset.retain_events(|ev| {
        criteria.min_nr_casualties.map_or(true, |min| ev.best >= min)
            && criteria
                .type_of_conflict
                .map_or(true, |code| ev.type_of_violence == code)
            && (criteria.country.is_empty() || ev.country == criteria.country)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ConflictEvent;
    use geo::Point;
    use std::collections::BTreeMap;

    fn event(best: i64, type_of_violence: i32, country: &str) -> ConflictEvent {
        ConflictEvent {
            point: Point::new(0.0, 0.0),
            best,
            type_of_violence,
            country: country.to_string(),
            year: 2000,
            extra: BTreeMap::new(),
        }
    }

    fn dataset() -> ConflictDataset {
        ConflictDataset::from_events(vec![
            event(0, 1, "Ethiopia"),
            event(10, 1, "Kenya"),
            event(25, 2, "Kenya"),
            event(50, 3, "Somalia"),
        ])
    }

    #[test]
    fn casualty_bound_is_inclusive() {
        let criteria = ConflictSection {
            min_nr_casualties: Some(10),
            ..Default::default()
        };
        let out = filter_properties(dataset(), &criteria);
        assert_eq!(out.len(), 3);
        assert!(out.events.iter().all(|ev| ev.best >= 10));
    }

    #[test]
    fn violence_type_is_an_exact_match() {
        let criteria = ConflictSection {
            type_of_conflict: Some(1),
            ..Default::default()
        };
        let out = filter_properties(dataset(), &criteria);
        assert_eq!(out.len(), 2);
        assert!(out.events.iter().all(|ev| ev.type_of_violence == 1));
    }

    #[test]
    fn criteria_are_anded() {
        let criteria = ConflictSection {
            min_nr_casualties: Some(10),
            type_of_conflict: Some(1),
            country: "Kenya".to_string(),
        };
        let out = filter_properties(dataset(), &criteria);
        assert_eq!(out.len(), 1);
        assert_eq!(out.events[0].best, 10);
    }

    #[test]
    fn empty_criteria_are_no_ops() {
        let out = filter_properties(dataset(), &ConflictSection::default());
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn filter_is_idempotent() {
        let criteria = ConflictSection {
            min_nr_casualties: Some(10),
            type_of_conflict: Some(1),
            ..Default::default()
        };
        let once = filter_properties(dataset(), &criteria);
        let twice = filter_properties(once.clone(), &criteria);
        assert_eq!(once.len(), twice.len());
        assert!(once
            .events
            .iter()
            .zip(twice.events.iter())
            .all(|(a, b)| a.best == b.best && a.country == b.country));
    }
}

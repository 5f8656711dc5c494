//! Date aggregation: union of every producer's resolved candidates.

use crate::types::{DateSet, ResolvedCandidate};

/// Merge resolved candidates into a deduplicated, ascending [`DateSet`].
///
/// Candidates that did not resolve are ignored. When the same date comes
/// from several candidates, the strongest provenance wins.
pub fn aggregate<'a, I>(candidates: I) -> DateSet
where
    I: IntoIterator<Item = &'a ResolvedCandidate>,
{
    let mut set = DateSet::new();
    for candidate in candidates {
        if let Some(date) = candidate.resolved {
            set.insert(date, candidate.provenance);
        }
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Provenance, RawDateCandidate, ResolvedDate, Strategy};
    use chrono::NaiveDate;

    fn resolved(text: &str, date: Option<(i32, u32, u32)>, provenance: Provenance) -> ResolvedCandidate {
        ResolvedCandidate {
            candidate: RawDateCandidate::new(text, 0, text.len(), Strategy::Pattern),
            resolved: date.map(|(y, m, d)| ResolvedDate::new(NaiveDate::from_ymd_opt(y, m, d).unwrap())),
            provenance,
            description: None,
        }
    }

    #[test]
    fn test_empty_input_is_empty_set() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn test_dedupes_and_sorts() {
        let candidates = vec![
            resolved("next week", Some((2024, 11, 12)), Provenance::Synthesized),
            resolved("11/12/2024", Some((2024, 11, 12)), Provenance::Explicit),
            resolved("this is", None, Provenance::Synthesized),
            resolved("March", Some((2024, 3, 1)), Provenance::Synthesized),
        ];
        let set = aggregate(&candidates);
        assert_eq!(set.to_iso_strings(), vec!["2024-03-01", "2024-11-12"]);
        let nov_12 = ResolvedDate::new(NaiveDate::from_ymd_opt(2024, 11, 12).unwrap());
        assert_eq!(set.provenance(&nov_12), Some(Provenance::Explicit));
    }
}

//! Chronological ordering shared by trip and itinerary listings.
//!
//! Every listing sorts through [`chronological_order`]. Storage adapters that
//! order in SQL use the same key: anchor ascending with nulls last, then
//! creation time, then identifier.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Sort key of a listed entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    /// Anchor instant; `None` sorts after every present anchor.
    pub anchor: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub id: Uuid,
}

/// Entities that can be listed chronologically.
pub trait Chronological {
    fn sort_key(&self) -> SortKey;
}

/// Total order over sort keys.
///
/// # Examples
/// ```
/// use std::cmp::Ordering;
///
/// use chrono::{TimeZone, Utc};
/// use tripshare::domain::{chronological_order, SortKey};
/// use uuid::Uuid;
///
/// let created_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let dated = SortKey { anchor: Some(created_at), created_at, id: Uuid::nil() };
/// let undated = SortKey { anchor: None, created_at, id: Uuid::nil() };
/// assert_eq!(chronological_order(&dated, &undated), Ordering::Less);
/// ```
#[must_use]
pub fn chronological_order(a: &SortKey, b: &SortKey) -> Ordering {
    let anchor = match (a.anchor, b.anchor) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    anchor
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Sort a slice of entities in place.
pub fn sort_chronologically<T: Chronological>(entries: &mut [T]) {
    entries.sort_by(|a, b| chronological_order(&a.sort_key(), &b.sort_key()));
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::TimeZone;
    use rstest::rstest;

    use super::*;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, day, 0, 0, 0)
            .single()
            .expect("valid date")
    }

    fn key(anchor: Option<DateTime<Utc>>, created_day: u32, id: u128) -> SortKey {
        SortKey {
            anchor,
            created_at: at(created_day),
            id: Uuid::from_u128(id),
        }
    }

    impl Chronological for SortKey {
        fn sort_key(&self) -> SortKey {
            *self
        }
    }

    #[test]
    fn null_anchors_sort_last() {
        let mut keys = vec![key(None, 1, 1), key(Some(at(2)), 1, 2), key(Some(at(1)), 1, 3)];
        sort_chronologically(&mut keys);
        let anchors: Vec<_> = keys.iter().map(|k| k.anchor).collect();
        assert_eq!(anchors, vec![Some(at(1)), Some(at(2)), None]);
    }

    #[rstest]
    #[case(key(Some(at(3)), 2, 9), key(Some(at(3)), 1, 9), Ordering::Greater)]
    #[case(key(None, 1, 1), key(None, 1, 2), Ordering::Less)]
    #[case(key(Some(at(3)), 1, 5), key(Some(at(3)), 1, 5), Ordering::Equal)]
    fn ties_break_on_creation_then_id(
        #[case] left: SortKey,
        #[case] right: SortKey,
        #[case] expected: Ordering,
    ) {
        assert_eq!(chronological_order(&left, &right), expected);
    }
}

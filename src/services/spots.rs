//! Deterministic spot naming.
//!
//! Spots are laid out in blocks of ten per letter: `A0..A9`, `B0..B9`, ... `Z9`.
//! Generation continues after the spots an event already owns, so repeated
//! calls never hand out the same name twice.

use crate::models::{DomainError, Event, Spot};

const LETTERS: usize = 26;
const DIGITS: usize = 10;

/// Largest number of spots the naming scheme can address.
pub const MAX_SPOTS: usize = LETTERS * DIGITS;

/// Name of the spot at `index` (0-based), or `None` past [`MAX_SPOTS`].
pub fn spot_name(index: usize) -> Option<String> {
    if index >= MAX_SPOTS {
        return None;
    }
    let letter = char::from(b'A' + (index / DIGITS) as u8);
    let digit = index % DIGITS;
    Some(format!("{letter}{digit}"))
}

/// Appends `count` freshly named spots to `event` and returns copies of them.
///
/// Nothing is appended when the count is not positive or when the batch would
/// run past [`MAX_SPOTS`].
pub fn generate_spots(event: &mut Event, count: i64) -> Result<Vec<Spot>, DomainError> {
    if count <= 0 {
        return Err(DomainError::InvalidSpotCount);
    }

    let start = event.spots.len();
    let end = usize::try_from(count)
        .ok()
        .and_then(|count| start.checked_add(count))
        .filter(|end| *end <= MAX_SPOTS)
        .ok_or(DomainError::SpotLimitExceeded { max: MAX_SPOTS })?;

    let mut created = Vec::with_capacity(end - start);
    for index in start..end {
        let name = spot_name(index).ok_or(DomainError::SpotLimitExceeded { max: MAX_SPOTS })?;
        created.push(Spot::new(event, name)?);
    }

    event.spots.extend(created.iter().cloned());
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::{NewEvent, Rating};
    use chrono::{Duration, Utc};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;
    use std::collections::HashSet;

    fn event() -> Event {
        Event::new(NewEvent {
            name: "Event Test".to_string(),
            location: "Location Test".to_string(),
            organization: "Organization Test".to_string(),
            rating: Rating::L12,
            date: Utc::now() + Duration::days(3),
            image_url: "image_url".to_string(),
            capacity: 300,
            price: dec!(80),
            partner_id: 2,
        })
        .unwrap()
    }

    #[test]
    fn names_advance_letter_every_ten_spots() {
        assert_eq!(spot_name(0).as_deref(), Some("A0"));
        assert_eq!(spot_name(9).as_deref(), Some("A9"));
        assert_eq!(spot_name(10).as_deref(), Some("B0"));
        assert_eq!(spot_name(259).as_deref(), Some("Z9"));
        assert_eq!(spot_name(260), None);
    }

    #[test]
    fn rejects_non_positive_count_and_leaves_event_untouched() {
        let mut event = event();

        assert_eq!(generate_spots(&mut event, 0), Err(DomainError::InvalidSpotCount));
        assert_eq!(generate_spots(&mut event, -4), Err(DomainError::InvalidSpotCount));
        assert!(event.spots.is_empty());
    }

    #[test]
    fn refuses_to_run_past_the_naming_limit() {
        let mut event = event();
        generate_spots(&mut event, 255).unwrap();

        let err = generate_spots(&mut event, 6).unwrap_err();

        assert_eq!(err, DomainError::SpotLimitExceeded { max: MAX_SPOTS });
        assert_eq!(event.spots.len(), 255);
    }

    #[test]
    fn second_batch_continues_after_the_first() {
        let mut event = event();

        generate_spots(&mut event, 3).unwrap();
        let second = generate_spots(&mut event, 9).unwrap();

        let names: Vec<_> = second.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["A3", "A4", "A5", "A6", "A7", "A8", "A9", "B0", "B1"]);
        assert_eq!(event.spots.len(), 12);
    }

    proptest! {
        #[test]
        fn any_count_up_to_limit_yields_distinct_valid_names(count in 1i64..=260) {
            let mut event = event();

            let created = generate_spots(&mut event, count).unwrap();

            prop_assert_eq!(created.len() as i64, count);
            prop_assert_eq!(&event.spots, &created);
            let unique: HashSet<_> = created.iter().map(|s| s.name.clone()).collect();
            prop_assert_eq!(unique.len(), created.len());
            for spot in &created {
                prop_assert_eq!(spot.validate(), Ok(()));
                prop_assert_eq!(spot.event_id, event.id);
            }
        }
    }
}

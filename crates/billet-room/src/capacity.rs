//! Room capacity arithmetic.
//!
//! Pure functions over loaded records. Capacity counts people, not
//! requests: a request for three friends takes three places.

use std::fmt;

use billet_types::{AccommodationRequest, RequestId, Room, RoomType};

/// Places left in a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreeSpace {
    /// The room type is infinite; everything fits.
    Unbounded,
    /// Capacity minus current occupants. Negative when a room was
    /// over-filled before its capacity was lowered.
    Limited(i64),
}

impl FreeSpace {
    /// Whether `occupants` more people fit.
    pub fn fits(self, occupants: usize) -> bool {
        match self {
            Self::Unbounded => true,
            Self::Limited(free) => {
                i64::try_from(occupants).is_ok_and(|n| n <= free)
            }
        }
    }

    /// The remaining places, or `None` when unbounded.
    pub fn limited(self) -> Option<i64> {
        match self {
            Self::Unbounded => None,
            Self::Limited(free) => Some(free),
        }
    }
}

impl fmt::Display for FreeSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbounded => write!(f, "unbounded"),
            Self::Limited(free) => write!(f, "{free}"),
        }
    }
}

/// The room's capacity: its own override, else its type's. `None` for
/// infinite room types, which ignore overrides.
pub fn effective_capacity(room: &Room, room_type: &RoomType) -> Option<u32> {
    if room_type.is_infinite {
        return None;
    }
    Some(room.capacity_override.unwrap_or(room_type.capacity))
}

/// People living in the room across all its requests.
pub fn occupant_count(inhabitants: &[AccommodationRequest]) -> usize {
    inhabitants.iter().map(|r| r.occupant_count()).sum()
}

/// Whether any request lives in the room.
pub fn is_occupied(inhabitants: &[AccommodationRequest]) -> bool {
    !inhabitants.is_empty()
}

/// Free places in `room`, ignoring the request `excluding` if it is among
/// `inhabitants`.
///
/// Pass the request being assigned as `excluding` so that re-occupying a
/// room it already counts toward doesn't count it twice.
pub fn free_space(
    room: &Room,
    room_type: &RoomType,
    inhabitants: &[AccommodationRequest],
    excluding: Option<RequestId>,
) -> FreeSpace {
    let Some(capacity) = effective_capacity(room, room_type) else {
        return FreeSpace::Unbounded;
    };
    let taken: usize = inhabitants
        .iter()
        .filter(|r| Some(r.id) != excluding)
        .map(|r| r.occupant_count())
        .sum();
    FreeSpace::Limited(i64::from(capacity) - taken as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use billet_types::{ProjectId, RoomTypeDraft, RoomTypeId, Subject, UserId};

    fn room_type(capacity: u32, infinite: bool) -> RoomType {
        RoomType::from_draft(RoomTypeDraft {
            id: Some(RoomTypeId(1)),
            project_id: ProjectId(1),
            name: "Cabin".into(),
            capacity,
            is_infinite: infinite,
            ..RoomTypeDraft::default()
        })
    }

    fn room() -> Room {
        Room::new(ProjectId(1), RoomTypeId(1), "Cabin 1")
    }

    fn request(id: u64, people: u64) -> AccommodationRequest {
        let mut req = AccommodationRequest::new(
            ProjectId(1),
            (0..people)
                .map(|p| Subject::new(UserId(id * 10 + p), "someone"))
                .collect(),
        );
        req.id = RequestId(id);
        req
    }

    #[test]
    fn test_free_space_is_capacity_minus_occupants() {
        let inhabitants = vec![request(1, 2), request(2, 1)];
        let free = free_space(&room(), &room_type(4, false), &inhabitants, None);
        assert_eq!(free, FreeSpace::Limited(1));
        assert!(free.fits(1));
        assert!(!free.fits(2));
    }

    #[test]
    fn test_excluded_request_is_not_counted() {
        let inhabitants = vec![request(1, 2), request(2, 1)];
        let free = free_space(
            &room(),
            &room_type(4, false),
            &inhabitants,
            Some(RequestId(1)),
        );
        assert_eq!(free, FreeSpace::Limited(3));
    }

    #[test]
    fn test_infinite_type_always_fits() {
        let inhabitants: Vec<_> = (1..=50).map(|i| request(i, 3)).collect();
        let free = free_space(&room(), &room_type(0, true), &inhabitants, None);
        assert_eq!(free, FreeSpace::Unbounded);
        assert!(free.fits(usize::MAX));
        assert_eq!(free.limited(), None);
    }

    #[test]
    fn test_overfilled_room_goes_negative() {
        let inhabitants = vec![request(1, 3)];
        let free = free_space(&room(), &room_type(2, false), &inhabitants, None);
        assert_eq!(free, FreeSpace::Limited(-1));
        assert!(!free.fits(0));
    }

    #[test]
    fn test_capacity_override_wins_over_type() {
        let mut r = room();
        r.capacity_override = Some(6);
        assert_eq!(effective_capacity(&r, &room_type(2, false)), Some(6));
        assert_eq!(effective_capacity(&r, &room_type(2, true)), None);
    }

    #[test]
    fn test_occupancy_helpers() {
        assert!(!is_occupied(&[]));
        assert_eq!(occupant_count(&[]), 0);

        let inhabitants = vec![request(1, 2), request(2, 3)];
        assert!(is_occupied(&inhabitants));
        assert_eq!(occupant_count(&inhabitants), 5);
    }

    #[test]
    fn test_display() {
        assert_eq!(FreeSpace::Unbounded.to_string(), "unbounded");
        assert_eq!(FreeSpace::Limited(-2).to_string(), "-2");
    }
}

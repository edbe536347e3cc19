//! Room name specs: `"101, 102, 201-203"`.
//!
//! Parsing is split in two pure steps. [`parse_room_names`] turns the spec
//! into names; [`rooms_from_names`] turns names into unsaved [`Room`]s.

use billet_types::{ProjectId, Room, RoomTypeId};

use crate::AccommodationError;

/// One comma-separated piece of a spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameToken {
    Literal(String),
    /// Inclusive, `start < end`.
    Range { start: i32, end: i32 },
}

impl NameToken {
    /// Parses a single token. Blank tokens yield `None`.
    ///
    /// `A-B` is a range only if both sides are 32-bit integers and
    /// `A < B`; anything else (`"5-3"`, `"B-12"`, `"-4"`) is a literal name.
    /// Bounds past `i32` make the whole token a literal too.
    pub fn parse(raw: &str) -> Option<Self> {
        let token = raw.trim();
        if token.is_empty() {
            return None;
        }
        if let Some((start, end)) = token.split_once('-') {
            if let (Ok(start), Ok(end)) =
                (start.trim().parse::<i32>(), end.trim().parse::<i32>())
            {
                if start < end {
                    return Some(Self::Range { start, end });
                }
            }
        }
        Some(Self::Literal(token.to_string()))
    }

    /// How many names this token expands to.
    pub fn count(&self) -> u64 {
        match self {
            Self::Literal(_) => 1,
            Self::Range { start, end } => u64::from(end.abs_diff(*start)) + 1,
        }
    }

    fn push_names(self, out: &mut Vec<String>) {
        match self {
            Self::Literal(name) => out.push(name),
            Self::Range { start, end } => {
                out.extend((start..=end).map(|n| n.to_string()))
            }
        }
    }
}

/// Expands a spec into room names, in spec order.
///
/// # Errors
/// [`AccommodationError::InvalidArgument`] if the spec has no names at
/// all, or would expand to more than `limit` names. The limit is checked
/// before anything is expanded.
pub fn parse_room_names(
    spec: &str,
    limit: usize,
) -> Result<Vec<String>, AccommodationError> {
    let tokens: Vec<NameToken> =
        spec.split(',').filter_map(NameToken::parse).collect();
    if tokens.is_empty() {
        return Err(AccommodationError::InvalidArgument(
            "room name spec contains no names".into(),
        ));
    }

    let total = tokens
        .iter()
        .try_fold(0u64, |acc, t| acc.checked_add(t.count()))
        .unwrap_or(u64::MAX);
    if total > limit as u64 {
        return Err(AccommodationError::InvalidArgument(format!(
            "room name spec expands to {total} rooms, limit is {limit}"
        )));
    }

    let mut names = Vec::with_capacity(total as usize);
    for token in tokens {
        token.push_names(&mut names);
    }
    Ok(names)
}

/// Builds unsaved rooms of one type from names.
pub fn rooms_from_names(
    project: ProjectId,
    room_type: RoomTypeId,
    names: impl IntoIterator<Item = String>,
) -> Vec<Room> {
    names
        .into_iter()
        .map(|name| Room::new(project, room_type, name))
        .collect()
}

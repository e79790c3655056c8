pub mod post;
pub mod user;

use derive_where::derive_where;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, marker::PhantomData};

/// A store-assigned row id, tagged with the kind of record it identifies.
///
/// Serializes as a bare integer.
#[derive_where(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<Marker>(i64, #[serde(skip)] PhantomData<Marker>);

impl<Marker> Id<Marker> {
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self(id, PhantomData)
    }

    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }
}

impl<Marker> Display for Id<Marker> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<Marker> From<i64> for Id<Marker> {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl<Marker> From<Id<Marker>> for i64 {
    fn from(value: Id<Marker>) -> Self {
        value.get()
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{Id, post::PostMarker, user::UserMarker};

    #[test]
    fn id_is_a_bare_integer_on_the_wire() {
        let id = Id::<UserMarker>::new(42);

        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
        assert_eq!(serde_json::from_str::<Id<UserMarker>>("42").unwrap(), id);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn id_conversions() {
        let id: Id<PostMarker> = 7.into();
        assert_eq!(id.get(), 7);
        assert_eq!(i64::from(id), 7);
        assert!(Id::<PostMarker>::new(1) < Id::new(2));
    }
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the underlying UUID.
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a stock item.
    StockItemId
);

uuid_id!(
    /// Unique identifier for a sale ledger entry.
    ///
    /// Kept distinct from [`StockItemId`] so the two can never be mixed up
    /// at a call site.
    SaleId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_item_id_new_creates_unique_ids() {
        let id1 = StockItemId::new();
        let id2 = StockItemId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn sale_id_from_uuid_preserves_value() {
        let uuid = Uuid::new_v4();
        let id = SaleId::from_uuid(uuid);
        assert_eq!(id.as_uuid(), uuid);
    }

    #[test]
    fn parse_from_str() {
        let uuid = Uuid::new_v4();
        let id: StockItemId = uuid.to_string().parse().unwrap();
        assert_eq!(id.as_uuid(), uuid);

        assert!("not-a-uuid".parse::<SaleId>().is_err());
    }

    #[test]
    fn serializes_as_bare_uuid_string() {
        let id = SaleId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_uuid()));
    }
}

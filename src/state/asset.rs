use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum CreatureType {
    Fire,
    Water,
    Grass,
    Electric,
    Psychic,
    Dragon,
    Ghost,
    Normal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stat {
    pub name: String,
    pub value: u16,
    pub full_mark: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum TxKind {
    List,
    Sale,
    Offer,
}

/// Historical activity on an asset. Generated with the catalog, never appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TxKind,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub from: String,
    pub to: String,
    pub date: NaiveDate,
}

/// How an asset is offered. An auction always has a deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "ListingFields", from = "ListingFields")]
pub enum Listing {
    FixedPrice,
    Auction {
        /// Deadline, unix milliseconds
        ends_at_ms: i64,
    },
}

// Wire shape: {"isAuction": bool, "auctionEndsAt": ms?}
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListingFields {
    is_auction: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    auction_ends_at: Option<i64>,
}

impl From<Listing> for ListingFields {
    fn from(listing: Listing) -> Self {
        Self {
            is_auction: listing.is_auction(),
            auction_ends_at: listing.ends_at_ms(),
        }
    }
}

impl From<ListingFields> for Listing {
    fn from(fields: ListingFields) -> Self {
        match (fields.is_auction, fields.auction_ends_at) {
            (true, Some(ends_at_ms)) => Listing::Auction { ends_at_ms },
            // An auction without a deadline cannot be shown or bid on
            _ => Listing::FixedPrice,
        }
    }
}

impl Listing {
    pub fn is_auction(&self) -> bool {
        matches!(self, Self::Auction { .. })
    }

    pub fn ends_at_ms(&self) -> Option<i64> {
        match self {
            Self::Auction { ends_at_ms } => Some(*ends_at_ms),
            Self::FixedPrice => None,
        }
    }
}

/// Catalog entry. Immutable once generated; ownership lives in `Session`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    #[serde(rename = "type")]
    pub creature_type: CreatureType,
    pub rarity: Rarity,
    /// Price in SOL, always positive
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Display only, not authoritative
    pub owner: String,
    pub level: u8,
    pub stats: Vec<Stat>,
    #[serde(flatten)]
    pub listing: Listing,
    pub history: Vec<Transaction>,
}

impl Asset {
    pub fn is_auction(&self) -> bool {
        self.listing.is_auction()
    }

    pub fn auction_ends_at(&self) -> Option<i64> {
        self.listing.ends_at_ms()
    }

    /// Time left on the auction. None for fixed-price listings.
    pub fn countdown(&self, now_ms: i64) -> Option<Countdown> {
        self.auction_ends_at()
            .map(|ends_at_ms| Countdown::until(ends_at_ms, now_ms))
    }
}

/// Auction time remaining, refreshed once per second by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    Running { hours: i64, minutes: i64, seconds: i64 },
    Ended,
}

impl Countdown {
    pub fn until(ends_at_ms: i64, now_ms: i64) -> Self {
        let diff = ends_at_ms - now_ms;
        if diff <= 0 {
            return Self::Ended;
        }
        let total_secs = diff / 1000;
        Self::Running {
            hours: total_secs / 3600,
            minutes: (total_secs % 3600) / 60,
            seconds: total_secs % 60,
        }
    }

    pub fn is_ended(&self) -> bool {
        matches!(self, Self::Ended)
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running {
                hours,
                minutes,
                seconds,
            } => write!(f, "{}h {}m {}s", hours, minutes, seconds),
            Self::Ended => write!(f, "Ended"),
        }
    }
}

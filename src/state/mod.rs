mod asset;
mod session;

pub use asset::{Asset, Countdown, CreatureType, Listing, Rarity, Stat, Transaction, TxKind};
pub use session::{LockedSession, Session, SessionView};

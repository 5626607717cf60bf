//! Seedable mock catalog.
//!
//! One asset per roster entry. Everything except name, dex number and id is
//! drawn from the RNG, so a seed plus `now_ms` fully determines the output.

use chrono::{DateTime, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use strum::IntoEnumIterator;

use crate::state::{Asset, CreatureType, Listing, Rarity, Stat, Transaction, TxKind};

/// (dex number, name)
const ROSTER: [(u16, &str); 40] = [
    (25, "Pikachu"),
    (6, "Charizard"),
    (1, "Bulbasaur"),
    (7, "Squirtle"),
    (150, "Mewtwo"),
    (94, "Gengar"),
    (133, "Eevee"),
    (143, "Snorlax"),
    (448, "Lucario"),
    (384, "Rayquaza"),
    (149, "Dragonite"),
    (445, "Garchomp"),
    (282, "Gardevoir"),
    (248, "Tyranitar"),
    (249, "Lugia"),
    (250, "Ho-Oh"),
    (382, "Kyogre"),
    (383, "Groudon"),
    (145, "Zapdos"),
    (146, "Moltres"),
    (144, "Articuno"),
    (59, "Arcanine"),
    (130, "Gyarados"),
    (65, "Alakazam"),
    (68, "Machamp"),
    (74, "Geodude"),
    (131, "Lapras"),
    (132, "Ditto"),
    (134, "Vaporeon"),
    (135, "Jolteon"),
    (136, "Flareon"),
    (197, "Umbreon"),
    (196, "Espeon"),
    (212, "Scizor"),
    (214, "Heracross"),
    (257, "Blaziken"),
    (260, "Swampert"),
    (254, "Sceptile"),
    (373, "Salamence"),
    (376, "Metagross"),
];

const DESCRIPTIONS: [&str; 7] = [
    "Known for its lightning-fast speed and electric personality.",
    "A powerful creature that dominates the battlefield with fire.",
    "A loyal companion with a mysterious past and hidden potential.",
    "Ancient power flows through this legendary beast.",
    "A rare specimen found only in the deep digital abyss of Solana.",
    "Evolves under specific conditions, showcasing unique adaptability.",
    "Its presence alone changes the atmosphere of the battle.",
];

const STAT_NAMES: [&str; 5] = ["HP", "ATK", "DEF", "SPD", "SPC"];
const STAT_FULL_MARK: u16 = 150;

const ARTWORK_BASE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork";

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

const AUCTION_MAX_MS: i64 = 2 * 86_400_000;
/// How far back generated history may reach (~11.5 days)
const HISTORY_MAX_AGE_MS: i64 = 1_000_000_000;

/// Generate the full catalog.
pub fn generate(seed: u64, now_ms: i64) -> Vec<Asset> {
    let mut rng = StdRng::seed_from_u64(seed);
    ROSTER
        .iter()
        .enumerate()
        .map(|(index, (dex, name))| generate_asset(&mut rng, index, *dex, name, now_ms))
        .collect()
}

fn generate_asset(rng: &mut StdRng, index: usize, dex: u16, name: &str, now_ms: i64) -> Asset {
    let is_auction = rng.gen_bool(0.3);
    let types: Vec<CreatureType> = CreatureType::iter().collect();
    let rarities: Vec<Rarity> = Rarity::iter().collect();

    // 0.50 plus up to 5 (auction) or 50 (fixed), in cents
    let span_cents: i64 = if is_auction { 500 } else { 5000 };
    let price = Decimal::new(50 + rng.gen_range(0..span_cents), 2);

    let listing = if is_auction {
        Listing::Auction {
            ends_at_ms: now_ms + rng.gen_range(0..AUCTION_MAX_MS),
        }
    } else {
        Listing::FixedPrice
    };

    Asset {
        id: format!("pokemarket-{}", index + 1),
        name: name.to_string(),
        description: DESCRIPTIONS.choose(rng).copied().unwrap_or_default().to_string(),
        image: format!("{}/{}.png", ARTWORK_BASE, dex),
        creature_type: types.choose(rng).copied().unwrap_or(CreatureType::Normal),
        rarity: rarities.choose(rng).copied().unwrap_or(Rarity::Common),
        price,
        owner: if rng.gen_bool(0.5) {
            "Marketplace".to_string()
        } else {
            "8xQt...9Lp2".to_string()
        },
        level: rng.gen_range(1..=99),
        stats: generate_stats(rng),
        listing,
        history: generate_history(rng, now_ms),
    }
}

fn generate_stats(rng: &mut StdRng) -> Vec<Stat> {
    STAT_NAMES
        .iter()
        .map(|name| Stat {
            name: name.to_string(),
            value: rng.gen_range(50..150),
            full_mark: STAT_FULL_MARK,
        })
        .collect()
}

fn generate_history(rng: &mut StdRng, now_ms: i64) -> Vec<Transaction> {
    let kinds = [TxKind::List, TxKind::Sale, TxKind::Offer];
    (0..3)
        .map(|_| {
            let at_ms = now_ms - rng.gen_range(0..HISTORY_MAX_AGE_MS);
            Transaction {
                id: format!("tx-{}", base36(rng, 9)),
                kind: kinds.choose(rng).copied().unwrap_or(TxKind::List),
                price: Decimal::new(rng.gen_range(0..1000), 2),
                from: short_address(rng),
                to: short_address(rng),
                date: DateTime::<Utc>::from_timestamp_millis(at_ms)
                    .map(|dt| dt.date_naive())
                    .unwrap_or(NaiveDate::MIN),
            }
        })
        .collect()
}

fn base36(rng: &mut StdRng, len: usize) -> String {
    (0..len)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

/// "abcd...wxyz"
fn short_address(rng: &mut StdRng) -> String {
    format!("{}...{}", base36(rng, 4), base36(rng, 4))
}

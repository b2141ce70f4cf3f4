//! Items, the quality table, random loot and the player's inventory.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::LootConfig;

// ── Quality table ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Quality {
    Poor,
    Normal,
    Rare,
    SuperRare,
    Unique,
}

#[derive(Debug)]
pub struct QualityInfo {
    pub name: &'static str,
    /// Display colour as RGB.
    pub color: (u8, u8, u8),
    pub stat_multiplier: i32,
    /// Relative drop weight; the table sums to 100.
    pub drop_weight: u32,
    pub prefixes: &'static [&'static str],
}

static QUALITY_TABLE: [QualityInfo; 5] = [
    QualityInfo {
        name: "poor",
        color: (150, 150, 150),
        stat_multiplier: 1,
        drop_weight: 40,
        prefixes: &["Broken", "Rusty", "Worn"],
    },
    QualityInfo {
        name: "normal",
        color: (255, 255, 255),
        stat_multiplier: 2,
        drop_weight: 35,
        prefixes: &["Common", "Standard", "Simple"],
    },
    QualityInfo {
        name: "rare",
        color: (0, 100, 255),
        stat_multiplier: 3,
        drop_weight: 15,
        prefixes: &["Fine", "Superior", "Engraved"],
    },
    QualityInfo {
        name: "super rare",
        color: (163, 53, 238),
        stat_multiplier: 4,
        drop_weight: 8,
        prefixes: &["Exquisite", "Masterwork", "Ornate"],
    },
    QualityInfo {
        name: "unique",
        color: (255, 128, 0),
        stat_multiplier: 5,
        drop_weight: 2,
        prefixes: &["Unbelievable", "God-Tier", "Glitch-Forged"],
    },
];

impl Quality {
    /// Worst to best.
    pub const ALL: [Quality; 5] = [
        Quality::Poor,
        Quality::Normal,
        Quality::Rare,
        Quality::SuperRare,
        Quality::Unique,
    ];

    pub fn info(self) -> &'static QualityInfo {
        &QUALITY_TABLE[self as usize]
    }

    /// Map a roll onto a tier.  Tiers are taken from the top of the table:
    /// the roll must exceed `1 - (weight of this tier and everything better)`.
    /// Rolls above 1.0 (from a high difficulty) land on the best tier.
    pub fn from_roll(roll: f64) -> Quality {
        let total: u32 = QUALITY_TABLE.iter().map(|q| q.drop_weight).sum();
        let mut better_or_equal = 0;
        for quality in Quality::ALL.iter().rev() {
            better_or_equal += quality.info().drop_weight;
            let threshold = 1.0 - f64::from(better_or_equal) / f64::from(total);
            if roll > threshold {
                return *quality;
            }
        }
        Quality::Poor
    }

    /// Roll a tier; every point of difficulty above 1.0 shifts the roll up by 0.1.
    pub fn roll(rng: &mut impl Rng, difficulty: f32) -> Quality {
        let roll = rng.gen::<f64>() + f64::from(difficulty - 1.0) * 0.1;
        Quality::from_roll(roll)
    }
}

// ── Items ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    Weapon,
    Head,
    Chest,
    Legs,
}

impl Slot {
    pub const ALL: [Slot; 4] = [Slot::Weapon, Slot::Head, Slot::Chest, Slot::Legs];

    fn base_names(self) -> &'static [&'static str] {
        match self {
            Slot::Weapon => &["Sword", "Axe", "Mace", "Dagger"],
            Slot::Head => &["Helmet", "Cap", "Coif"],
            Slot::Chest => &["Chainmail", "Plate Armor", "Leather Tunic"],
            Slot::Legs => &["Greaves", "Pants", "Leggings"],
        }
    }

    fn label(self) -> &'static str {
        match self {
            Slot::Weapon => "weapon",
            Slot::Head => "head",
            Slot::Chest => "chest",
            Slot::Legs => "legs",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatBonus {
    Damage(i32),
    MaxHealth(i32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    Heal(i32),
    RestoreStamina(i32),
}

#[derive(Clone, Debug, PartialEq)]
pub enum ItemKind {
    Equipment { slot: Slot, bonus: StatBonus },
    Consumable(Effect),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    pub name: String,
    pub description: String,
    pub quality: Quality,
    pub kind: ItemKind,
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.quality.info().name)
    }
}

fn scaled(base: i32, quality: Quality, difficulty: f32) -> i32 {
    let raw = (base * quality.info().stat_multiplier) as f32 * difficulty;
    raw.round().max(1.0) as i32
}

/// Generate one random item.  A higher `difficulty` improves the quality roll
/// and scales the item's numbers.
pub fn generate_item(rng: &mut impl Rng, difficulty: f32, config: &LootConfig) -> Item {
    let quality = Quality::roll(rng, difficulty);
    if rng.gen_bool(config.equipment_chance) {
        generate_equipment(rng, quality, difficulty)
    } else {
        generate_consumable(rng, quality, difficulty)
    }
}

fn pick<'a>(rng: &mut impl Rng, names: &'a [&'a str]) -> &'a str {
    names.choose(rng).copied().unwrap_or_default()
}

fn generate_equipment(rng: &mut impl Rng, quality: Quality, difficulty: f32) -> Item {
    let slot = Slot::ALL[rng.gen_range(0..Slot::ALL.len())];
    let base = pick(rng, slot.base_names());
    let prefix = pick(rng, quality.info().prefixes);

    let bonus = match slot {
        Slot::Weapon => StatBonus::Damage(scaled(rng.gen_range(1..=3), quality, difficulty)),
        _ => StatBonus::MaxHealth(scaled(rng.gen_range(2..=5), quality, difficulty)),
    };

    Item {
        name: format!("{prefix} {base}"),
        description: format!("A {} {}.", quality.info().name, slot.label()),
        quality,
        kind: ItemKind::Equipment { slot, bonus },
    }
}

fn generate_consumable(rng: &mut impl Rng, quality: Quality, difficulty: f32) -> Item {
    let prefix = pick(rng, quality.info().prefixes);
    let amount = scaled(rng.gen_range(10..=20), quality, difficulty);
    let (base, effect) = if rng.gen_bool(0.5) {
        ("Health Potion", Effect::Heal(amount))
    } else {
        ("Stamina Potion", Effect::RestoreStamina(amount))
    };

    Item {
        name: format!("{prefix} {base}"),
        description: format!("A {} consumable.", quality.info().name),
        quality,
        kind: ItemKind::Consumable(effect),
    }
}

/// Roll the drop for a defeated enemy.
pub fn roll_drop(rng: &mut impl Rng, difficulty: f32, config: &LootConfig) -> Option<Item> {
    if rng.gen_bool(config.drop_chance) {
        Some(generate_item(rng, difficulty, config))
    } else {
        None
    }
}

/// Contents of a freshly opened chest.
pub fn chest_loot(rng: &mut impl Rng, difficulty: f32, config: &LootConfig) -> Vec<Item> {
    let (lo, hi) = config.chest_items;
    let count = rng.gen_range(lo..=hi);
    (0..count).map(|_| generate_item(rng, difficulty, config)).collect()
}

// ── Inventory & equipment ────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Inventory {
    pub items: Vec<Item>,
    pub capacity: usize,
}

impl Inventory {
    pub fn new(capacity: usize) -> Self {
        Inventory {
            items: Vec::new(),
            capacity,
        }
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// Store an item, or hand it back when there is no room.
    pub fn add(&mut self, item: Item) -> Result<(), Item> {
        if self.is_full() {
            tracing::debug!(item = %item, "inventory is full");
            return Err(item);
        }
        tracing::info!(item = %item, description = %item.description, "picked up");
        self.items.push(item);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Option<Item> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Equipment {
    pub weapon: Option<Item>,
    pub head: Option<Item>,
    pub chest: Option<Item>,
    pub legs: Option<Item>,
}

impl Equipment {
    fn slot_mut(&mut self, slot: Slot) -> &mut Option<Item> {
        match slot {
            Slot::Weapon => &mut self.weapon,
            Slot::Head => &mut self.head,
            Slot::Chest => &mut self.chest,
            Slot::Legs => &mut self.legs,
        }
    }

    /// Equip an item into its slot, returning whatever was there before.
    /// Non-equipment is handed straight back.
    pub fn equip(&mut self, item: Item) -> Option<Item> {
        match item.kind {
            ItemKind::Equipment { slot, .. } => self.slot_mut(slot).replace(item),
            ItemKind::Consumable(_) => Some(item),
        }
    }

    fn worn(&self) -> impl Iterator<Item = &Item> {
        [&self.weapon, &self.head, &self.chest, &self.legs]
            .into_iter()
            .flatten()
    }

    pub fn damage_bonus(&self) -> i32 {
        self.worn()
            .map(|item| match item.kind {
                ItemKind::Equipment { bonus: StatBonus::Damage(d), .. } => d,
                _ => 0,
            })
            .sum()
    }

    pub fn max_health_bonus(&self) -> i32 {
        self.worn()
            .map(|item| match item.kind {
                ItemKind::Equipment { bonus: StatBonus::MaxHealth(h), .. } => h,
                _ => 0,
            })
            .sum()
    }
}

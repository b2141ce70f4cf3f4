//! Chests, campfires and portals.

use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{ItemPickup, ObjectKind, Player, WorldObject};
use crate::geometry::Collidable;
use crate::level::Level;
use crate::loot::{self, Item};

#[derive(Clone, Debug, PartialEq)]
pub enum Interaction {
    /// Nothing within reach.
    Nothing,
    /// Fresh chest; names of the items it produced.
    ChestOpened(Vec<String>),
    /// The chest was already open.
    ChestEmpty,
    CampfireRested,
    CampfireSpent,
    /// The player asked to leave for the next level.
    Portal,
}

/// Open a chest.  Only the first call yields loot; later calls return an
/// empty list and leave the chest as it is.
pub fn open_chest(object: &mut WorldObject, depth: u32, rng: &mut impl Rng, config: &GameConfig) -> Vec<Item> {
    match &mut object.kind {
        ObjectKind::Chest { opened } if !*opened => {
            *opened = true;
            let items = loot::chest_loot(rng, depth as f32, &config.loot);
            tracing::info!(count = items.len(), "chest opened");
            items
        }
        _ => Vec::new(),
    }
}

/// Restore health and stamina, once per campfire.
pub fn rest_at_campfire(object: &mut WorldObject, player: &mut Player) -> bool {
    match &mut object.kind {
        ObjectKind::Campfire { used } if !*used => {
            *used = true;
            player.health = player.effective_max_health();
            player.stamina = player.max_stamina;
            tracing::info!("campfire activated, stats restored");
            true
        }
        _ => false,
    }
}

/// Act on the first object the player is touching.
pub fn interact(player: &mut Player, level: &mut Level, rng: &mut impl Rng, config: &GameConfig) -> Interaction {
    let depth = level.depth;
    let Some(index) = level.objects.iter().position(|o| player.collides_with(o)) else {
        return Interaction::Nothing;
    };

    match level.objects[index].kind {
        ObjectKind::Chest { opened: true } => Interaction::ChestEmpty,
        ObjectKind::Chest { opened: false } => {
            let items = open_chest(&mut level.objects[index], depth, rng, config);
            let (cx, cy) = level.objects[index].body.center();
            let names = items.iter().map(Item::to_string).collect();
            for item in items {
                // Whatever does not fit stays on the floor next to the chest.
                if let Err(item) = player.inventory.add(item) {
                    level.pickups.push(ItemPickup::at(cx, cy, item));
                }
            }
            Interaction::ChestOpened(names)
        }
        ObjectKind::Campfire { .. } => {
            if rest_at_campfire(&mut level.objects[index], player) {
                Interaction::CampfireRested
            } else {
                Interaction::CampfireSpent
            }
        }
        ObjectKind::Portal => Interaction::Portal,
    }
}

/// Move every pickup the player touches into the inventory while there is
/// room.  Returns the names of the collected items.
pub fn collect_pickups(player: &mut Player, level: &mut Level) -> Vec<String> {
    let mut collected = Vec::new();
    let mut remaining = Vec::with_capacity(level.pickups.len());

    for pickup in std::mem::take(&mut level.pickups) {
        if !player.collides_with(&pickup) || player.inventory.is_full() {
            remaining.push(pickup);
            continue;
        }
        let ItemPickup { body, item } = pickup;
        let name = item.to_string();
        match player.inventory.add(item) {
            Ok(()) => collected.push(name),
            Err(item) => remaining.push(ItemPickup { body, item }),
        }
    }

    level.pickups = remaining;
    collected
}

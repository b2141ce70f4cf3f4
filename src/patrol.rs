//! Enemy patrol: walk back and forth between `start` and `start + range`.

use crate::entities::Enemy;

/// Advance one enemy by one tick.  The position never leaves
/// `[start, start + range]`; hitting either end flips the direction.
pub fn step(enemy: &mut Enemy) {
    let patrol = &mut enemy.patrol;
    let end = patrol.start + patrol.range;

    enemy.body.x += patrol.direction * patrol.speed;

    if enemy.body.x > end {
        enemy.body.x = end;
        patrol.direction = -1.0;
    } else if enemy.body.x < patrol.start {
        enemy.body.x = patrol.start;
        patrol.direction = 1.0;
    }
}

pub fn step_all(enemies: &mut [Enemy]) {
    enemies.iter_mut().for_each(step);
}

//! Area skills: who gets caught and who does not

mod common;

use combat_core::prelude::*;
use common::{npc, untouched, World};
use std::collections::BTreeSet;

fn struck(world: &World) -> BTreeSet<u64> {
    let actions = world.log.actions();
    assert_eq!(actions.len(), 1);
    actions[0].defenders.iter().map(|d| d.defender.0).collect()
}

#[test]
fn test_radius_catches_neighbours_only() {
    let world = World::lowest_rolls();
    let attacker = world.deploy(npc(1), 0.0, 0.0);
    world.deploy(npc(2), 3.0, 0.0);
    let near = world.deploy(npc(3), -6.0, 6.0);
    let far = world.deploy(npc(4), 9.0, 9.0);
    let indoors = world.deploy_in(npc(5), Position::new(1.0, 1.0), Some(77));
    let mut wall = Destructible::new(ObjectId(6), "wall", 100);
    wall.attackable = false;
    let wall = world.deploy(wall, 2.0, 2.0);
    let barricade = world.deploy(Destructible::new(ObjectId(7), "barricade", 100), -2.0, 0.0);

    assert!(world.attack(1, "area_slam", 2) > 0.0);

    assert_eq!(struck(&world), BTreeSet::from([2, 3]));
    assert!(!untouched(&near));
    assert!(untouched(&far));
    assert!(untouched(&indoors));
    assert!(untouched(&wall));

    let barricade = barricade.lock();
    assert!(barricade.defenders().contains(&ObjectId(1)));
    drop(barricade);

    // Area hits accumulate defenders behind the primary target
    let guard = attacker.lock();
    let actor = guard.as_creature().unwrap();
    assert_eq!(actor.defenders()[0], ObjectId(2));
    assert!(actor.has_defender(ObjectId(3)));
    assert!(actor.has_defender(ObjectId(7)));
    assert!(!actor.has_defender(ObjectId(1)));
}

#[test]
fn test_cone_follows_attack_direction() {
    let world = World::lowest_rolls();
    world.deploy(npc(1), 0.0, 0.0);
    world.deploy(npc(2), 4.0, 0.0);
    let inside = world.deploy(npc(3), 20.0, 5.0);
    let wide = world.deploy(npc(4), 10.0, 10.0);
    let beyond = world.deploy(npc(5), 40.0, 0.0);
    let behind = world.deploy(npc(6), -5.0, 0.0);

    assert!(world.attack(1, "cone_blast", 2) > 0.0);

    assert_eq!(struck(&world), BTreeSet::from([2, 3]));
    assert!(!untouched(&inside));
    for handle in [&wide, &beyond, &behind] {
        assert!(untouched(handle));
    }
}

#[test]
fn test_area_skips_incapacitated_and_immune() {
    let world = World::lowest_rolls();
    world.deploy(npc(1), 0.0, 0.0);
    world.deploy(npc(2), 3.0, 0.0);

    let mut downed = npc(3);
    downed.ham.bar_mut(HamPool::Health).current = 0;
    let downed = world.deploy(downed, 1.0, 1.0);

    let mut shielded = Creature::player(ObjectId(4), "shielded", PlayerData::new(Faction::Rebel));
    if let Some(data) = shielded.player_data_mut() {
        data.immune = true;
    }
    let shielded = world.deploy(shielded, -1.0, 1.0);

    assert!(world.attack(1, "area_slam", 2) > 0.0);
    assert_eq!(struck(&world), BTreeSet::from([2]));
    assert!(downed.lock().defenders().is_empty());
    assert!(untouched(&shielded));
}

#[test]
fn test_failed_primary_skips_area() {
    let world = World::lowest_rolls();
    world.deploy(npc(1), 0.0, 0.0);
    let mut downed = npc(2);
    downed.dead = true;
    world.deploy(downed, 3.0, 0.0);
    let bystander = world.deploy(npc(3), 1.0, 1.0);

    assert_eq!(world.attack(1, "area_slam", 2), 0.0);
    assert!(world.log.actions().is_empty());
    assert!(untouched(&bystander));
}

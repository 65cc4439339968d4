//! Applying one damage portion to one body location

use super::armor::armor_reduction;
use crate::config::UnarmedConstants;
use crate::env::CombatRng;
use crate::object::{Creature, Notice};
use crate::types::BodyLocation;

/// Everything `apply_damage` needs besides the two creatures
pub struct ApplyContext<'a> {
    pub skill: &'a str,
    pub unarmed: &'a UnarmedConstants,
    pub rng: &'a dyn CombatRng,
}

fn fly_text_key(location: BodyLocation, rng: &dyn CombatRng) -> &'static str {
    match location {
        BodyLocation::Head => "hit_head",
        BodyLocation::RightArm => "hit_rarm",
        BodyLocation::Hands | BodyLocation::LeftArm => "hit_larm",
        BodyLocation::Chest => "hit_body",
        BodyLocation::Legs | BodyLocation::Feet => {
            if rng.coin_flip() {
                "hit_lleg"
            } else {
                "hit_rleg"
            }
        }
    }
}

/// Land `damage` on `location` and return the amount armor absorbed
///
/// The damage left after armor (never negative) is recorded on the target's
/// ledger and taken from the location's pool. A wound roll may then add a
/// wound and a shock wound, wear the target's armor there, and (one time in
/// ten) wear the attacker's weapon.
pub fn apply_damage(
    ctx: &ApplyContext<'_>,
    attacker: &mut Creature,
    target: &mut Creature,
    damage: i32,
    location: BodyLocation,
) -> i32 {
    let reduction = armor_reduction(
        attacker.weapon.as_ref(),
        ctx.unarmed.armor_piercing,
        target,
        damage,
        location,
    );
    let dealt = (damage - reduction).max(0);
    let pool = location.pool();

    target.ledger.record(attacker.id, ctx.skill, dealt);
    target.ham.inflict(pool, dealt);

    if attacker.is_player() {
        attacker.notify(Notice::FlyText {
            subject: target.id,
            file: "combat_effects",
            key: fly_text_key(location, ctx.rng).to_string(),
        });
    }

    if reduction > 0 {
        target.notify(Notice::CombatSpam {
            attacker: target.id,
            defender: target.id,
            key: "armor_damaged".to_string(),
            damage: reduction,
        });
    }

    let wounds_ratio = attacker
        .weapon
        .as_ref()
        .map_or(ctx.unarmed.wounds_ratio, |w| w.wounds_ratio);
    let wound_chance = wounds_ratio + wounds_ratio * target.bf_ratio();

    if wound_chance > ctx.rng.percentile() as f32 {
        target.ham.add_wounds(pool, 1);
        target.shock_wounds += 1;

        for key in ["wounded", "shock_wound"] {
            target.notify(Notice::CombatSpam {
                attacker: attacker.id,
                defender: target.id,
                key: key.to_string(),
                damage: 1,
            });
        }

        if let Some(armor) = target.armor.at_mut(location) {
            armor.degrade();
        }

        if let Some(weapon) = attacker.weapon.as_mut() {
            if ctx.rng.below(10) == 1 {
                weapon.degrade();
            }
        }
    }

    reduction
}

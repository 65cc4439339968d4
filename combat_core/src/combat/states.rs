//! Secondary combat states rolled by attack skills
//!
//! Knockdown, posture-down and posture-up are gated by a per-target recovery
//! timer: while it runs the attacker is told the effect failed and nothing is
//! rolled. Otherwise the target resists with a percentile roll; the effect
//! lands when the roll is below 5 or above the target's defense.
//!
//! A player striking a target that is already knocked down or prone with a
//! knockdown or posture-down skill usually helps it back up instead.
//!
//! Stun, blind and dizzy use the same roll without a timer. Intimidate lands
//! on a roll at or below the skill's chance.

use crate::config::CombatConstants;
use crate::env::CombatRng;
use crate::object::{CombatState, Creature, Notice};
use crate::skill::StateChances;
use crate::types::Posture;

/// Rolls at or below this always land
const GUARANTEED_ROLL: i32 = 5;
const EQUILIBRIUM_CAP: i32 = 100;
/// Percent chance a grounded target is jolted upright by a player's strike
const STAND_UP_CHANCE: i32 = 80;

fn resisted(roll: i32, defense: i32) -> bool {
    !(roll < GUARANTEED_ROLL || roll > defense)
}

/// Shared inputs for one target's state rolls
pub struct StateRoll<'a> {
    pub constants: &'a CombatConstants,
    pub rng: &'a dyn CombatRng,
    pub now: u64,
}

impl StateRoll<'_> {
    fn resists(&self, target: &Creature, defense_mod: &str) -> bool {
        let defense = target.shock_reduced(target.skill_mod(defense_mod));
        resisted(self.rng.percentile(), defense)
    }

    /// Knocked-down or crouched/prone targets may spring back up
    fn equilibrium(&self, target: &mut Creature) {
        let equilibrium = target.skill_mod("combat_equillibrium").min(EQUILIBRIUM_CAP);
        if equilibrium <= 0 {
            return;
        }
        if equilibrium / 2 > self.rng.percentile() {
            target.posture = Posture::Upright;
            target.notify(Notice::system("cbt_spam", "recover_posture"));
        }
    }

    /// Returns true when the target was already grounded and no roll follows
    fn jolted_up(&self, attacker: &Creature, target: &mut Creature) -> bool {
        if !attacker.is_player() || !matches!(target.posture, Posture::KnockedDown | Posture::Prone) {
            return false;
        }
        if STAND_UP_CHANCE > self.rng.percentile() {
            target.posture = Posture::Upright;
        }
        true
    }

    fn knockdown(&self, attacker: &mut Creature, target: &mut Creature) {
        if self.jolted_up(attacker, target) {
            return;
        }
        if !target.recovery.knockdown_ready(self.now) {
            attacker.notify(Notice::system_about("cbt_spam", "knockdown_fail", target.id));
            return;
        }
        if self.resists(target, "knockdown_defense") {
            return;
        }

        target.mounted = false;
        target.posture = Posture::KnockedDown;
        target.recovery.knockdown_ready_at = self.now + self.constants.recovery.knockdown_ms;
        target.notify(Notice::system("cbt_spam", "posture_knocked_down"));
        self.equilibrium(target);
    }

    fn posture_down(&self, attacker: &mut Creature, target: &mut Creature) {
        if self.jolted_up(attacker, target) {
            return;
        }
        if !target.recovery.posture_down_ready(self.now) {
            attacker.notify(Notice::system_about("cbt_spam", "posture_change_fail", target.id));
            return;
        }
        if self.resists(target, "posture_change_down_defense") {
            return;
        }

        let lowered = match target.posture {
            Posture::Upright => Posture::Crouched,
            Posture::Crouched => Posture::Prone,
            _ => return,
        };
        target.mounted = false;
        target.posture = lowered;
        target.recovery.posture_down_ready_at = self.now + self.constants.recovery.posture_down_ms;
        target.notify(Notice::system("cbt_spam", "posture_down"));
        self.equilibrium(target);
    }

    fn posture_up(&self, attacker: &mut Creature, target: &mut Creature) {
        if !target.recovery.posture_up_ready(self.now) {
            attacker.notify(Notice::system_about("cbt_spam", "posture_change_fail", target.id));
            return;
        }
        if self.resists(target, "posture_change_up_defense") {
            return;
        }

        let raised = match target.posture {
            Posture::Prone => Posture::Crouched,
            Posture::Crouched => Posture::Upright,
            _ => return,
        };
        target.mounted = false;
        target.posture = raised;
        target.recovery.posture_up_ready_at = self.now + self.constants.recovery.posture_up_ms;
        target.notify(Notice::system("cbt_spam", "posture_up"));
    }

    fn timed(&self, target: &mut Creature, state: CombatState, defense_mod: &str, duration_ms: u64, key: &str) {
        if self.resists(target, defense_mod) {
            return;
        }
        target.status.apply(state, self.now, duration_ms);
        target.notify(Notice::system("cbt_spam", key));
    }

    /// Roll every state `chances` enables, then refresh the target's state bits
    pub fn apply(&self, attacker: &mut Creature, target: &mut Creature, chances: &StateChances) {
        let durations = &self.constants.states;

        if chances.knockdown > 0 {
            self.knockdown(attacker, target);
        }
        if chances.posture_down > 0 {
            self.posture_down(attacker, target);
        }
        if chances.posture_up > 0 {
            self.posture_up(attacker, target);
        }
        if chances.stun > 0 {
            self.timed(target, CombatState::Stunned, "stun_defense", durations.stun_ms, "go_stunned");
        }
        if chances.blind > 0 {
            self.timed(target, CombatState::Blinded, "blind_defense", durations.blind_ms, "go_blind");
        }
        if chances.dizzy > 0 {
            self.timed(target, CombatState::Dizzied, "dizzy_defense", durations.dizzy_ms, "go_dizzy");
        }
        if chances.intimidate > 0 && self.rng.percentile() <= chances.intimidate {
            target
                .status
                .apply(CombatState::Intimidated, self.now, durations.intimidate_ms);
            target.notify(Notice::system("cbt_spam", "go_intimidated"));
        }

        target.status.update(self.now);
    }
}

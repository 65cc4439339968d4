//! Non-creature objects that can be shot at (turrets, barricades, lairs)

use crate::types::ObjectId;

#[derive(Debug, Clone)]
pub struct Destructible {
    pub id: ObjectId,
    pub name: String,
    pub condition_damage: i32,
    pub max_condition: i32,
    pub destroyed: bool,
    pub attackable: bool,
    defenders: Vec<ObjectId>,
}

impl Destructible {
    pub fn new(id: ObjectId, name: impl Into<String>, max_condition: i32) -> Self {
        Destructible {
            id,
            name: name.into(),
            condition_damage: 0,
            max_condition,
            destroyed: false,
            attackable: true,
            defenders: Vec::new(),
        }
    }

    /// Accumulate condition damage; returns true when this hit destroyed it
    pub fn inflict(&mut self, damage: i32) -> bool {
        if self.destroyed {
            return false;
        }
        self.condition_damage = (self.condition_damage + damage.max(0)).min(self.max_condition);
        if self.condition_damage >= self.max_condition {
            self.destroyed = true;
            return true;
        }
        false
    }

    pub fn defenders(&self) -> &[ObjectId] {
        &self.defenders
    }

    pub fn add_defender(&mut self, id: ObjectId) {
        if !self.defenders.contains(&id) {
            self.defenders.push(id);
        }
    }

    pub fn clear_defenders(&mut self) {
        self.defenders.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destroyed_at_max_condition() {
        let mut turret = Destructible::new(ObjectId(40), "turret", 100);
        assert!(!turret.inflict(60));
        assert!(turret.inflict(60));
        assert!(turret.destroyed);
        assert_eq!(turret.condition_damage, 100);
        assert!(!turret.inflict(10));
    }
}

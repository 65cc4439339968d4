//! Skill configuration loading

use super::ConfigError;
use crate::skill::{Skill, SkillKind, SkillRegistry};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Container for skill configurations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillsConfig {
    #[serde(rename = "skills")]
    pub skills: Vec<Skill>,
}

impl SkillsConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        for skill in &self.skills {
            if skill.speed_ratio <= 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "skill '{}' has non-positive speed_ratio",
                    skill.name
                )));
            }
            if let SkillKind::Attack(attack) = &skill.kind {
                if attack.pool_chances.total() > 100 {
                    return Err(ConfigError::ValidationError(format!(
                        "skill '{}' pool chances sum above 100",
                        skill.name
                    )));
                }
            }
        }
        Ok(())
    }

    fn into_registry(self) -> Result<SkillRegistry, ConfigError> {
        self.validate()?;
        Ok(self.skills.into_iter().collect())
    }
}

/// Load skill configurations from a TOML file
pub fn load_skill_configs(path: &Path) -> Result<SkillRegistry, ConfigError> {
    let config: SkillsConfig = super::load_toml(path)?;
    config.into_registry()
}

/// Load skill configurations from a TOML string
pub fn parse_skill_configs(content: &str) -> Result<SkillRegistry, ConfigError> {
    let config: SkillsConfig = super::parse_toml(content)?;
    config.into_registry()
}

/// Get default skill configurations
pub fn default_skills() -> SkillRegistry {
    let toml = include_str!("../../config/skills.toml");
    parse_skill_configs(toml).unwrap_or_else(|_| std::iter::once(Skill::basic_attack()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skill::AreaShape;
    use crate::types::Posture;

    #[test]
    fn test_parse_skills() {
        let toml = r#"
[[skills]]
name = "cone_blast"
speed_ratio = 1.5
animation = "fire_flame_thrower_medium"

[skills.cost]
action = 2.0
mind = 0.5

[skills.kind.attack]
damage_ratio = 2.5

[skills.kind.attack.pool_chances]
health = 100

[skills.kind.attack.area.cone]
range = 32.0
angle = 60.0

[skills.kind.attack.states]
knockdown = 20

[[skills]]
name = "kneel"
speed = 0.5

[skills.kind.posture]
posture = "kneeled"
"#;

        let skills = parse_skill_configs(toml).unwrap();
        assert_eq!(skills.len(), 2);

        let blast = skills.get("cone_blast").unwrap();
        assert!((blast.speed_ratio - 1.5).abs() < f32::EPSILON);
        assert!((blast.cost.action - 2.0).abs() < f32::EPSILON);
        assert_eq!(
            blast.area(),
            Some(AreaShape::Cone {
                range: 32.0,
                angle: 60.0
            })
        );
        let attack = blast.attack().unwrap();
        assert_eq!(attack.states.knockdown, 20);
        assert_eq!(attack.pool_chances.pools_affected(), 1);
        assert_eq!(attack.combat_spam_miss, "miss");

        let kneel = skills.get("kneel").unwrap();
        assert!(kneel.is_self_skill());
        match &kneel.kind {
            SkillKind::Posture(p) => assert_eq!(p.posture, Posture::Kneeled),
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn test_rejects_overweight_pools() {
        let toml = r#"
[[skills]]
name = "greedy"

[skills.kind.attack.pool_chances]
health = 60
action = 60
"#;
        let err = parse_skill_configs(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_default_skills_loads_all() {
        let skills = default_skills();

        let expected = [
            "attack",
            "headhit1",
            "legshot1",
            "knockdownattack",
            "intimidate1",
            "cone_blast",
            "area_slam",
            "healdamage",
            "stand",
            "kneel",
            "prone",
            "berserk1",
        ];
        assert_eq!(skills.len(), expected.len(), "Expected {} skills from config", expected.len());

        for name in expected {
            assert!(skills.get(name).is_some(), "Missing skill: {}", name);
        }
    }
}

use crate::{ConditionGroup, Effect, EffectFamily, Trigger};
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// One trigger-scoped unit of logic belonging to an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    #[serde(default)]
    pub id: String,
    pub trigger: Trigger,
    #[serde(default)]
    pub condition_groups: Vec<ConditionGroup>,
    #[serde(default)]
    pub effects: Vec<Effect>,
    #[serde(default)]
    pub random_groups: Vec<RandomGroup>,
    #[serde(default = "default_true")]
    pub blueprint_compatible: bool,
}

impl Rule {
    pub fn new(id: &str, trigger: Trigger) -> Self {
        Self {
            id: id.to_string(),
            trigger,
            condition_groups: Vec::new(),
            effects: Vec::new(),
            random_groups: Vec::new(),
            blueprint_compatible: true,
        }
    }

    pub fn with_conditions(mut self, group: ConditionGroup) -> Self {
        self.condition_groups.push(group);
        self
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_random_group(mut self, group: RandomGroup) -> Self {
        self.random_groups.push(group);
        self
    }

    pub fn has_conditions(&self) -> bool {
        self.condition_groups
            .iter()
            .any(|group| !group.conditions.is_empty())
    }

    /// Every effect of the rule, direct ones first, then random group members.
    pub fn all_effects(&self) -> impl Iterator<Item = &Effect> {
        self.effects
            .iter()
            .chain(self.random_groups.iter().flat_map(|group| group.effects.iter()))
    }

    pub fn contains_family(&self, family: EffectFamily) -> bool {
        self.all_effects()
            .any(|effect| effect.kind().map(|kind| kind.family()) == Some(family))
    }
}

/// Odds entry of a random group. The UI stores either a number or a
/// variable name here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Odds {
    Number(f64),
    Text(String),
}

impl Odds {
    /// Literal value, if the entry is numeric.
    pub fn literal(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => text.trim().parse::<f64>().ok(),
        }
    }
}

fn default_numerator() -> Odds {
    Odds::Number(1.0)
}

fn default_denominator() -> Odds {
    Odds::Number(4.0)
}

/// Probability-gated bundle of effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomGroup {
    #[serde(default)]
    pub id: String,
    #[serde(default = "default_numerator")]
    pub chance_numerator: Odds,
    #[serde(default = "default_denominator")]
    pub chance_denominator: Odds,
    #[serde(default)]
    pub effects: Vec<Effect>,
}

impl RandomGroup {
    pub fn new(id: &str, numerator: f64, denominator: f64) -> Self {
        Self {
            id: id.to_string(),
            chance_numerator: Odds::Number(numerator),
            chance_denominator: Odds::Number(denominator),
            effects: Vec::new(),
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rule_deserializes_from_ui_shape() {
        let rule: Rule = serde_json::from_value(json!({
            "id": "r1",
            "trigger": "hand_played",
            "conditionGroups": [],
            "effects": [{ "id": "e1", "type": "add_mult", "params": { "value": 5 } }],
            "randomGroups": [{ "id": "g1", "chance_numerator": "var1", "chance_denominator": 4, "effects": [] }]
        }))
        .expect("rule");
        assert_eq!(rule.trigger, Trigger::HandPlayed);
        assert!(rule.blueprint_compatible);
        assert_eq!(rule.random_groups[0].chance_numerator.literal(), None);
        assert_eq!(rule.random_groups[0].chance_denominator.literal(), Some(4.0));
    }
}

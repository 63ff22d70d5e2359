use crate::allocator::{ConfigBlock, ConfigOrigin, ConfigValue, ConfigVar, VariableAllocator};
use crate::effects::EffectOutput;
use crate::hooks::HookRequest;
use crate::options::{GenerateOptions, ObjectKind};
use crate::random_groups::ProbabilitySlots;
use jokerforge_core::{UserVariable, UserVariableType};
use tracing::warn;

/// Namespace every persisted per-item slot lives under.
pub const EXTRA: &str = "card.ability.extra";

/// Code collected from passive rules.
#[derive(Debug, Default, Clone)]
pub struct PassiveParts {
    pub add_to_deck: Vec<String>,
    pub remove_from_deck: Vec<String>,
    /// Blocks placed at the top of `calculate`.
    pub calculate: Vec<String>,
}

impl PassiveParts {
    pub fn is_empty(&self) -> bool {
        self.add_to_deck.is_empty() && self.remove_from_deck.is_empty() && self.calculate.is_empty()
    }
}

/// State of one item's generation pass. Created per item and dropped with
/// it, so naming counters never leak between items.
#[derive(Debug)]
pub struct CompileSession<'a> {
    pub options: &'a GenerateOptions,
    pub object: ObjectKind,
    pub key: String,
    pub full_key: String,
    pub user_vars: &'a [UserVariable],
    pub allocator: VariableAllocator,
    pub config: ConfigBlock,
    pub probabilities: ProbabilitySlots,
    /// Game variable expressions surfaced to the description.
    pub display: Vec<String>,
    pub hooks: Vec<HookRequest>,
    pub passive: PassiveParts,
    pub warnings: Vec<String>,
}

impl<'a> CompileSession<'a> {
    pub fn new(
        options: &'a GenerateOptions,
        object: ObjectKind,
        key: &str,
        user_vars: &'a [UserVariable],
    ) -> Self {
        let mut config = ConfigBlock::new();
        for var in user_vars {
            config.insert(user_variable_slot(var));
        }
        Self {
            options,
            object,
            key: key.to_string(),
            full_key: options.full_key(object, key),
            user_vars,
            allocator: VariableAllocator::with_reserved(user_vars.iter().map(|var| var.name.clone())),
            config,
            probabilities: ProbabilitySlots::default(),
            display: Vec::new(),
            hooks: Vec::new(),
            passive: PassiveParts::default(),
            warnings: Vec::new(),
        }
    }

    pub fn extra(&self, name: &str) -> String {
        format!("{}.{}", EXTRA, name)
    }

    pub fn find_user_var(&self, name: &str) -> Option<&'a UserVariable> {
        self.user_vars.iter().find(|var| var.name == name)
    }

    /// Logs a degraded-generation warning once per item.
    pub fn warn(&mut self, message: String) {
        if self.warnings.contains(&message) {
            return;
        }
        warn!(item = %self.full_key, "{}", message);
        self.warnings.push(message);
    }

    /// Merges the slots and description expressions an effect introduced.
    pub fn absorb(&mut self, output: &EffectOutput) {
        self.config.extend(output.config.iter().cloned());
        for expr in &output.display {
            if !self.display.contains(expr) {
                self.display.push(expr.clone());
            }
        }
    }
}

fn user_variable_slot(var: &UserVariable) -> ConfigVar {
    let (value, origin) = match var.var_type {
        UserVariableType::Number => (
            ConfigValue::Number(var.initial_number()),
            ConfigOrigin::UserNumber,
        ),
        UserVariableType::Suit => (
            ConfigValue::Text(var.initial_suit().name().to_string()),
            ConfigOrigin::UserTyped,
        ),
        UserVariableType::Rank => (
            ConfigValue::Text(var.initial_rank().base_value().to_string()),
            ConfigOrigin::UserTyped,
        ),
        UserVariableType::Pokerhand => (
            ConfigValue::Text(var.initial_poker_hand().to_string()),
            ConfigOrigin::UserTyped,
        ),
    };
    ConfigVar {
        name: var.name.clone(),
        value,
        origin,
    }
}

use crate::Params;
use serde::{Deserialize, Serialize};

/// One declarative action a rule performs once its guard passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Effect {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub effect_type: String,
    #[serde(default)]
    pub params: Params,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_message: Option<String>,
}

impl Effect {
    pub fn new(id: &str, effect_type: &str, params: Params) -> Self {
        Self {
            id: id.to_string(),
            effect_type: effect_type.to_string(),
            params,
            custom_message: None,
        }
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.custom_message = Some(message.to_string());
        self
    }

    /// `None` for effect types this build does not know.
    pub fn kind(&self) -> Option<EffectKind> {
        EffectKind::from_keyword(&self.effect_type)
    }

    /// Blank custom messages count as absent.
    pub fn message_override(&self) -> Option<&str> {
        self.custom_message
            .as_deref()
            .map(str::trim)
            .filter(|message| !message.is_empty())
    }
}

/// Assembly strategy an effect kind routes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectFamily {
    Regular,
    Retrigger,
    Delete,
    Probability,
    /// Only meaningful on `passive` rules.
    Passive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    AddChips,
    AddMult,
    ApplyXMult,
    ApplyXChips,
    ApplyExpMult,
    ApplyExpChips,
    AddDollars,
    SetDollars,
    Balance,
    SwapChipsMult,
    ShowMessage,
    RetriggerCards,
    DestroyCard,
    AddCardToDeck,
    AddCardToHand,
    CopyTriggeredCard,
    CopyPlayedCard,
    EditCard,
    IncrementRank,
    PermanentBonus,
    DestroySelf,
    DrawCards,
    CreateJoker,
    DestroyJoker,
    CopyJoker,
    SetSellValue,
    CreateConsumable,
    DestroyConsumable,
    CopyConsumable,
    LevelUpHand,
    EditHand,
    EditDiscard,
    EditHandSize,
    EditJokerSlots,
    EditConsumableSlots,
    DisableBossBlind,
    CreateTag,
    SetFlag,
    ModifyInternalVariable,
    ChangeSuitVariable,
    ChangeRankVariable,
    ChangePokerhandVariable,
    FixProbability,
    ModProbability,
    EditSelectedCards,
    DestroySelectedCards,
    CombineRanks,
    CombineSuits,
    AllowDuplicates,
    AllowDebt,
    FreeRerolls,
    DiscountItems,
    CopyJokerAbility,
    AllCardsScore,
    ReduceFlushStraight,
    Shortcut,
}

impl EffectKind {
    pub const ALL: [EffectKind; 56] = [
        EffectKind::AddChips,
        EffectKind::AddMult,
        EffectKind::ApplyXMult,
        EffectKind::ApplyXChips,
        EffectKind::ApplyExpMult,
        EffectKind::ApplyExpChips,
        EffectKind::AddDollars,
        EffectKind::SetDollars,
        EffectKind::Balance,
        EffectKind::SwapChipsMult,
        EffectKind::ShowMessage,
        EffectKind::RetriggerCards,
        EffectKind::DestroyCard,
        EffectKind::AddCardToDeck,
        EffectKind::AddCardToHand,
        EffectKind::CopyTriggeredCard,
        EffectKind::CopyPlayedCard,
        EffectKind::EditCard,
        EffectKind::IncrementRank,
        EffectKind::PermanentBonus,
        EffectKind::DestroySelf,
        EffectKind::DrawCards,
        EffectKind::CreateJoker,
        EffectKind::DestroyJoker,
        EffectKind::CopyJoker,
        EffectKind::SetSellValue,
        EffectKind::CreateConsumable,
        EffectKind::DestroyConsumable,
        EffectKind::CopyConsumable,
        EffectKind::LevelUpHand,
        EffectKind::EditHand,
        EffectKind::EditDiscard,
        EffectKind::EditHandSize,
        EffectKind::EditJokerSlots,
        EffectKind::EditConsumableSlots,
        EffectKind::DisableBossBlind,
        EffectKind::CreateTag,
        EffectKind::SetFlag,
        EffectKind::ModifyInternalVariable,
        EffectKind::ChangeSuitVariable,
        EffectKind::ChangeRankVariable,
        EffectKind::ChangePokerhandVariable,
        EffectKind::FixProbability,
        EffectKind::ModProbability,
        EffectKind::EditSelectedCards,
        EffectKind::DestroySelectedCards,
        EffectKind::CombineRanks,
        EffectKind::CombineSuits,
        EffectKind::AllowDuplicates,
        EffectKind::AllowDebt,
        EffectKind::FreeRerolls,
        EffectKind::DiscountItems,
        EffectKind::CopyJokerAbility,
        EffectKind::AllCardsScore,
        EffectKind::ReduceFlushStraight,
        EffectKind::Shortcut,
    ];

    pub fn from_keyword(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "add_chips" => Some(Self::AddChips),
            "add_mult" => Some(Self::AddMult),
            "apply_x_mult" | "x_mult" | "xmult" => Some(Self::ApplyXMult),
            "apply_x_chips" | "x_chips" | "xchips" => Some(Self::ApplyXChips),
            "apply_exp_mult" | "e_mult" => Some(Self::ApplyExpMult),
            "apply_exp_chips" | "e_chips" => Some(Self::ApplyExpChips),
            "add_dollars" | "add_money" => Some(Self::AddDollars),
            "set_dollars" | "edit_dollars" => Some(Self::SetDollars),
            "balance" | "balance_chips_mult" => Some(Self::Balance),
            "swap_chips_mult" | "swap" => Some(Self::SwapChipsMult),
            "show_message" | "message" => Some(Self::ShowMessage),
            "retrigger_cards" | "retrigger" => Some(Self::RetriggerCards),
            "destroy_card" | "delete_triggered_card" => Some(Self::DestroyCard),
            "add_card_to_deck" | "create_playing_card" => Some(Self::AddCardToDeck),
            "add_card_to_hand" => Some(Self::AddCardToHand),
            "copy_triggered_card" | "copy_scored_card" => Some(Self::CopyTriggeredCard),
            "copy_played_card" => Some(Self::CopyPlayedCard),
            "edit_card" | "edit_triggered_card" => Some(Self::EditCard),
            "increment_rank" => Some(Self::IncrementRank),
            "permanent_bonus" | "perma_bonus" => Some(Self::PermanentBonus),
            "destroy_self" => Some(Self::DestroySelf),
            "draw_cards" => Some(Self::DrawCards),
            "create_joker" | "add_joker" => Some(Self::CreateJoker),
            "destroy_joker" => Some(Self::DestroyJoker),
            "copy_joker" => Some(Self::CopyJoker),
            "set_sell_value" | "edit_sell_value" => Some(Self::SetSellValue),
            "create_consumable" | "add_consumable" => Some(Self::CreateConsumable),
            "destroy_consumable" => Some(Self::DestroyConsumable),
            "copy_consumable" => Some(Self::CopyConsumable),
            "level_up_hand" | "upgrade_hand" => Some(Self::LevelUpHand),
            "edit_hand" | "edit_hands" => Some(Self::EditHand),
            "edit_discard" | "edit_discards" => Some(Self::EditDiscard),
            "edit_hand_size" => Some(Self::EditHandSize),
            "edit_joker_slots" => Some(Self::EditJokerSlots),
            "edit_consumable_slots" => Some(Self::EditConsumableSlots),
            "disable_boss_blind" | "disable_boss" => Some(Self::DisableBossBlind),
            "create_tag" | "add_tag" => Some(Self::CreateTag),
            "set_flag" => Some(Self::SetFlag),
            "modify_internal_variable" | "modify_variable" => Some(Self::ModifyInternalVariable),
            "change_suit_variable" => Some(Self::ChangeSuitVariable),
            "change_rank_variable" => Some(Self::ChangeRankVariable),
            "change_pokerhand_variable" => Some(Self::ChangePokerhandVariable),
            "fix_probability" => Some(Self::FixProbability),
            "mod_probability" => Some(Self::ModProbability),
            "edit_selected_cards" | "edit_cards" => Some(Self::EditSelectedCards),
            "destroy_selected_cards" | "destroy_cards" => Some(Self::DestroySelectedCards),
            "combine_ranks" => Some(Self::CombineRanks),
            "combine_suits" => Some(Self::CombineSuits),
            "allow_duplicates" | "showman" => Some(Self::AllowDuplicates),
            "allow_debt" => Some(Self::AllowDebt),
            "free_rerolls" => Some(Self::FreeRerolls),
            "discount_items" => Some(Self::DiscountItems),
            "copy_joker_ability" | "blueprint" => Some(Self::CopyJokerAbility),
            "all_cards_score" | "splash" => Some(Self::AllCardsScore),
            "reduce_flush_straight" | "four_fingers" => Some(Self::ReduceFlushStraight),
            "shortcut" => Some(Self::Shortcut),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::AddChips => "add_chips",
            Self::AddMult => "add_mult",
            Self::ApplyXMult => "apply_x_mult",
            Self::ApplyXChips => "apply_x_chips",
            Self::ApplyExpMult => "apply_exp_mult",
            Self::ApplyExpChips => "apply_exp_chips",
            Self::AddDollars => "add_dollars",
            Self::SetDollars => "set_dollars",
            Self::Balance => "balance",
            Self::SwapChipsMult => "swap_chips_mult",
            Self::ShowMessage => "show_message",
            Self::RetriggerCards => "retrigger_cards",
            Self::DestroyCard => "destroy_card",
            Self::AddCardToDeck => "add_card_to_deck",
            Self::AddCardToHand => "add_card_to_hand",
            Self::CopyTriggeredCard => "copy_triggered_card",
            Self::CopyPlayedCard => "copy_played_card",
            Self::EditCard => "edit_card",
            Self::IncrementRank => "increment_rank",
            Self::PermanentBonus => "permanent_bonus",
            Self::DestroySelf => "destroy_self",
            Self::DrawCards => "draw_cards",
            Self::CreateJoker => "create_joker",
            Self::DestroyJoker => "destroy_joker",
            Self::CopyJoker => "copy_joker",
            Self::SetSellValue => "set_sell_value",
            Self::CreateConsumable => "create_consumable",
            Self::DestroyConsumable => "destroy_consumable",
            Self::CopyConsumable => "copy_consumable",
            Self::LevelUpHand => "level_up_hand",
            Self::EditHand => "edit_hand",
            Self::EditDiscard => "edit_discard",
            Self::EditHandSize => "edit_hand_size",
            Self::EditJokerSlots => "edit_joker_slots",
            Self::EditConsumableSlots => "edit_consumable_slots",
            Self::DisableBossBlind => "disable_boss_blind",
            Self::CreateTag => "create_tag",
            Self::SetFlag => "set_flag",
            Self::ModifyInternalVariable => "modify_internal_variable",
            Self::ChangeSuitVariable => "change_suit_variable",
            Self::ChangeRankVariable => "change_rank_variable",
            Self::ChangePokerhandVariable => "change_pokerhand_variable",
            Self::FixProbability => "fix_probability",
            Self::ModProbability => "mod_probability",
            Self::EditSelectedCards => "edit_selected_cards",
            Self::DestroySelectedCards => "destroy_selected_cards",
            Self::CombineRanks => "combine_ranks",
            Self::CombineSuits => "combine_suits",
            Self::AllowDuplicates => "allow_duplicates",
            Self::AllowDebt => "allow_debt",
            Self::FreeRerolls => "free_rerolls",
            Self::DiscountItems => "discount_items",
            Self::CopyJokerAbility => "copy_joker_ability",
            Self::AllCardsScore => "all_cards_score",
            Self::ReduceFlushStraight => "reduce_flush_straight",
            Self::Shortcut => "shortcut",
        }
    }

    pub fn family(self) -> EffectFamily {
        match self {
            Self::RetriggerCards => EffectFamily::Retrigger,
            Self::DestroyCard => EffectFamily::Delete,
            Self::FixProbability | Self::ModProbability => EffectFamily::Probability,
            Self::CombineRanks
            | Self::CombineSuits
            | Self::AllowDuplicates
            | Self::AllowDebt
            | Self::FreeRerolls
            | Self::DiscountItems
            | Self::CopyJokerAbility
            | Self::AllCardsScore
            | Self::ReduceFlushStraight
            | Self::Shortcut => EffectFamily::Passive,
            _ => EffectFamily::Regular,
        }
    }

    /// Kinds that also have a passive (add/remove from deck) rendition.
    pub fn has_passive_form(self) -> bool {
        self.family() == EffectFamily::Passive
            || matches!(
                self,
                Self::EditHand
                    | Self::EditDiscard
                    | Self::EditHandSize
                    | Self::EditJokerSlots
                    | Self::EditConsumableSlots
            )
    }
}

//! Shared patches of game functions requested by passive effects.
//!
//! Every hook kind is written once per mod. Each requesting item is looked
//! up by key, so the patch is active only while one of them is owned.

use crate::lua::{indent, join_guards, lua_string};
use jokerforge_core::Suit;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HookKind {
    CombineRanks,
    CombineSuits,
    AllowDuplicates,
    ReduceFlushStraight,
    Shortcut,
}

/// Item-specific part of a hook.
#[derive(Debug, Clone, PartialEq)]
pub enum HookDetail {
    None,
    Suits(Suit, Suit),
    Ranks { sources: Vec<u8>, target: u8 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct HookRequest {
    pub kind: HookKind,
    /// Full key of the requesting item (`j_prefix_key`).
    pub item_key: String,
    pub detail: HookDetail,
}

impl HookRequest {
    pub fn simple(kind: HookKind, item_key: &str) -> Self {
        Self {
            kind,
            item_key: item_key.to_string(),
            detail: HookDetail::None,
        }
    }
}

fn owned(key: &str) -> String {
    format!("next(SMODS.find_card({}))", lua_string(key))
}

fn any_owned(requests: &[&HookRequest]) -> String {
    let mut keys: Vec<&str> = requests.iter().map(|r| r.item_key.as_str()).collect();
    keys.dedup();
    let checks: Vec<String> = keys.into_iter().map(owned).collect();
    checks.join(" or ")
}

/// Wraps `target` so it returns `value` while any requester is owned.
fn override_when_owned(target: &str, params: &str, value: &str, requests: &[&HookRequest]) -> String {
    let saved = format!("{}_ref", target.replace(['.', ':'], "_").to_lowercase());
    format!(
        "local {saved} = {target}\nfunction {target}({params})\n    if {check} then\n        return {value}\n    end\n    return {saved}({params})\nend",
        saved = saved,
        target = target,
        params = params,
        check = any_owned(requests),
        value = value
    )
}

fn combine_suits(requests: &[&HookRequest]) -> String {
    let checks: Vec<String> = requests
        .iter()
        .filter_map(|request| match request.detail {
            HookDetail::Suits(a, b) => Some(format!(
                "{} and ((self.base.suit == {a} and suit == {b}) or (self.base.suit == {b} and suit == {a}))",
                owned(&request.item_key),
                a = lua_string(a.name()),
                b = lua_string(b.name())
            )),
            _ => None,
        })
        .collect();
    format!(
        "local card_is_suit_ref = Card.is_suit\nfunction Card:is_suit(suit, bypass_debuff, flush_calc)\n    local ret = card_is_suit_ref(self, suit, bypass_debuff, flush_calc)\n    if not ret and not SMODS.has_no_suit(self) then\n        ret = {}\n    end\n    return ret\nend",
        join_guards(&checks, "or")
    )
}

fn combine_ranks(requests: &[&HookRequest]) -> String {
    let mut branches = Vec::new();
    for request in requests {
        if let HookDetail::Ranks { sources, target } = &request.detail {
            let matches: Vec<String> = sources.iter().map(|id| format!("id == {}", id)).collect();
            branches.push(format!(
                "if {} and ({}) then\n    return {}\nend",
                owned(&request.item_key),
                matches.join(" or "),
                target
            ));
        }
    }
    format!(
        "local card_get_id_ref = Card.get_id\nfunction Card:get_id()\n    local id = card_get_id_ref(self)\n    if id and id > 0 then\n{}\n    end\n    return id\nend",
        indent(&branches.join("\n"), 2)
    )
}

fn render_kind(kind: HookKind, requests: &[&HookRequest]) -> String {
    match kind {
        HookKind::CombineRanks => combine_ranks(requests),
        HookKind::CombineSuits => combine_suits(requests),
        HookKind::AllowDuplicates => {
            override_when_owned("SMODS.showman", "card_key", "true", requests)
        }
        HookKind::ReduceFlushStraight => {
            override_when_owned("SMODS.four_fingers", "hand_type", "4", requests)
        }
        HookKind::Shortcut => override_when_owned("SMODS.shortcut", "", "true", requests),
    }
}

/// `hooks.lua`, or `None` when no item asked for a hook.
pub fn render_hooks(requests: &[HookRequest]) -> Option<String> {
    if requests.is_empty() {
        return None;
    }
    let mut by_kind: BTreeMap<HookKind, Vec<&HookRequest>> = BTreeMap::new();
    for request in requests {
        by_kind.entry(request.kind).or_default().push(request);
    }
    let sections: Vec<String> = by_kind
        .into_iter()
        .map(|(kind, requests)| render_kind(kind, &requests))
        .collect();
    Some(format!("{}\n", sections.join("\n\n")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_requests_no_file() {
        assert_eq!(render_hooks(&[]), None);
    }

    #[test]
    fn one_hook_references_every_requester() {
        let requests = vec![
            HookRequest::simple(HookKind::AllowDuplicates, "j_mod_a"),
            HookRequest::simple(HookKind::AllowDuplicates, "j_mod_b"),
        ];
        let text = render_hooks(&requests).unwrap_or_default();
        assert_eq!(text.matches("function SMODS.showman(").count(), 1);
        assert!(text.contains(
            "if next(SMODS.find_card(\"j_mod_a\")) or next(SMODS.find_card(\"j_mod_b\")) then"
        ));
        assert!(text.contains("return smods_showman_ref(card_key)"));
    }

    #[test]
    fn suit_pairs_check_both_directions() {
        let requests = vec![HookRequest {
            kind: HookKind::CombineSuits,
            item_key: "j_mod_smear".to_string(),
            detail: HookDetail::Suits(Suit::Spades, Suit::Clubs),
        }];
        let text = render_hooks(&requests).unwrap_or_default();
        assert!(text.contains("(self.base.suit == \"Spades\" and suit == \"Clubs\")"));
        assert!(text.contains("(self.base.suit == \"Clubs\" and suit == \"Spades\")"));
    }

    #[test]
    fn rank_hook_maps_sources_to_target() {
        let requests = vec![HookRequest {
            kind: HookKind::CombineRanks,
            item_key: "j_mod_royal".to_string(),
            detail: HookDetail::Ranks {
                sources: vec![11, 12],
                target: 13,
            },
        }];
        let text = render_hooks(&requests).unwrap_or_default();
        assert!(text.contains(
            "        if next(SMODS.find_card(\"j_mod_royal\")) and (id == 11 or id == 12) then\n            return 13\n        end"
        ));
    }
}

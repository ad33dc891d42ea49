//! Reward shaping from the delta between two snapshots.
//!
//! Rules are a flat table; each fires independently and contributions are
//! summed, so evaluation order is irrelevant. A rule's contribution is
//! `weight × scale × measure`, where `measure` is 0 when the rule does not
//! fire, 1 when it does, or a magnitude (victory-point gain).
//!
//! All player-relative rules look at the player who was to move in `pre`.

use crate::error::SchemaViolation;
use crate::kinds::DevCardKind;
use crate::snapshot::{count, GameSnapshot, Player};

/// What a rule sees: one player before and after, plus the post snapshot.
pub struct RuleContext<'a> {
    pub pre: &'a Player,
    pub post: &'a Player,
    pub post_snapshot: &'a GameSnapshot,
}

pub struct RewardRule {
    pub name: &'static str,
    /// Multiple of the base weight `W`.
    pub scale: f64,
    pub measure: fn(&RuleContext<'_>) -> Result<f64, SchemaViolation>,
}

fn fired(condition: bool) -> Result<f64, SchemaViolation> {
    Ok(if condition { 1.0 } else { 0.0 })
}

fn drew(ctx: &RuleContext<'_>, card: DevCardKind) -> Result<f64, SchemaViolation> {
    const MAP: &str = "player.development_cards_drawn_this_turn";
    let before = count(&ctx.pre.development_cards_drawn_this_turn, MAP, card.name())?;
    let after = count(&ctx.post.development_cards_drawn_this_turn, MAP, card.name())?;
    fired(after > before)
}

pub const REWARD_RULES: &[RewardRule] = &[
    RewardRule {
        name: "victory_points",
        scale: 1.0,
        measure: |ctx| Ok((ctx.post.victory_points - ctx.pre.victory_points).max(0) as f64),
    },
    RewardRule {
        name: "city_placed",
        scale: 2.0,
        measure: |ctx| fired(ctx.post.num_unplaced_cities < ctx.pre.num_unplaced_cities),
    },
    RewardRule {
        name: "settlement_placed",
        scale: 2.0,
        measure: |ctx| {
            fired(ctx.post.num_unplaced_settlements < ctx.pre.num_unplaced_settlements)
        },
    },
    RewardRule {
        name: "road_placed",
        scale: 0.25,
        measure: |ctx| fired(ctx.post.num_unplaced_roads < ctx.pre.num_unplaced_roads),
    },
    RewardRule {
        name: "drew_road_building",
        scale: 0.5,
        measure: |ctx| drew(ctx, DevCardKind::RoadBuilding),
    },
    RewardRule {
        name: "drew_monopoly",
        scale: 0.5,
        measure: |ctx| drew(ctx, DevCardKind::Monopoly),
    },
    RewardRule {
        name: "drew_year_of_plenty",
        scale: 0.5,
        measure: |ctx| drew(ctx, DevCardKind::YearOfPlenty),
    },
    RewardRule {
        name: "drew_knight",
        scale: 0.5,
        measure: |ctx| drew(ctx, DevCardKind::Knight),
    },
    RewardRule {
        name: "drew_victory_point",
        scale: 0.5,
        measure: |ctx| drew(ctx, DevCardKind::VictoryPoint),
    },
    RewardRule {
        name: "gained_longest_road",
        scale: 2.0,
        measure: |ctx| fired(ctx.post.longest_road && !ctx.pre.longest_road),
    },
    RewardRule {
        name: "gained_largest_army",
        scale: 2.0,
        measure: |ctx| fired(ctx.post.largest_army && !ctx.pre.largest_army),
    },
    RewardRule {
        name: "rejected_action",
        scale: -0.125,
        measure: |ctx| fired(!ctx.post_snapshot.last_action_successful),
    },
];

/// Per-rule contributions of one transition. Zero contributions are omitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RewardBreakdown {
    pub components: Vec<(&'static str, f64)>,
}

impl RewardBreakdown {
    pub fn total(&self) -> f64 {
        self.components.iter().map(|(_, v)| v).sum()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.components
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RewardShaper {
    weight: f64,
    rules: &'static [RewardRule],
}

impl RewardShaper {
    pub fn new(weight: f64) -> Self {
        Self {
            weight,
            rules: REWARD_RULES,
        }
    }

    /// Shaper over a custom rule table.
    pub fn with_rules(weight: f64, rules: &'static [RewardRule]) -> Self {
        Self { weight, rules }
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Total shaped reward for the transition `pre → post`.
    pub fn shape(&self, pre: &GameSnapshot, post: &GameSnapshot) -> Result<f64, SchemaViolation> {
        Ok(self.breakdown(pre, post)?.total())
    }

    pub fn breakdown(
        &self,
        pre: &GameSnapshot,
        post: &GameSnapshot,
    ) -> Result<RewardBreakdown, SchemaViolation> {
        let player_id = pre.game.current_player_id;
        let ctx = RuleContext {
            pre: pre.player(player_id)?,
            post: post.player(player_id)?,
            post_snapshot: post,
        };

        let mut breakdown = RewardBreakdown::default();
        for rule in self.rules {
            let measure = (rule.measure)(&ctx)?;
            if measure != 0.0 {
                breakdown
                    .components
                    .push((rule.name, self.weight * rule.scale * measure));
            }
        }
        Ok(breakdown)
    }
}

impl Default for RewardShaper {
    fn default() -> Self {
        Self::new(8.0)
    }
}

impl std::fmt::Debug for RewardRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RewardRule")
            .field("name", &self.name)
            .field("scale", &self.scale)
            .finish()
    }
}

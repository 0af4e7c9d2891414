use super::{Policy, PolicyContext, log_discard_decision, log_draw_decision};
use crate::bot::{BotKind, ValueFunction};
use golf_core::model::action::{DiscardChoice, DrawSource, DrawnCard};
use rand::RngCore;

/// Plays by comparing network values of the views each choice leads to.
pub struct LearnedValuePolicy {
    function: ValueFunction,
}

impl LearnedValuePolicy {
    pub fn new(function: ValueFunction) -> Self {
        Self { function }
    }

    pub fn function(&self) -> &ValueFunction {
        &self.function
    }
}

impl Policy for LearnedValuePolicy {
    fn choose_draw(&mut self, ctx: &PolicyContext<'_>, _rng: &mut dyn RngCore) -> DrawSource {
        let Some(top) = ctx.top_discard_slot() else {
            log_draw_decision(ctx, BotKind::Value, DrawSource::Stock, "empty_discard");
            return DrawSource::Stock;
        };

        let (discard_value, _) = self.function.best_exchange(ctx.observation, ctx.hand, top);
        if self.function.evaluate(ctx.observation) > discard_value {
            log_draw_decision(ctx, BotKind::Value, DrawSource::Stock, "keep_current");
            return DrawSource::Stock;
        }

        // Would an unknown card from the stock likely do better?
        let (mut better, mut no_better) = (0usize, 0usize);
        for slot in ctx.observation.unknown_slots() {
            let (value, _) = self.function.best_exchange(ctx.observation, ctx.hand, slot);
            if value > discard_value {
                better += 1;
            } else {
                no_better += 1;
            }
        }
        let (source, reason) = if better > no_better {
            (DrawSource::Stock, "stock_odds")
        } else {
            (DrawSource::DiscardPile, "discard_value")
        };
        log_draw_decision(ctx, BotKind::Value, source, reason);
        source
    }

    fn choose_discard(
        &mut self,
        ctx: &PolicyContext<'_>,
        drawn: DrawnCard,
        _rng: &mut dyn RngCore,
    ) -> DiscardChoice {
        let slot = drawn.card.face().slot();
        let (value, position) = self.function.best_exchange(ctx.observation, ctx.hand, slot);
        let (choice, reason) = if drawn.came_from_discard() {
            (DiscardChoice::Exchange(position), "forced_exchange")
        } else if value > self.function.evaluate(ctx.observation) {
            (DiscardChoice::Exchange(position), "improves_value")
        } else {
            (DiscardChoice::ReturnToPile, "no_gain")
        };
        log_discard_decision(ctx, BotKind::Value, drawn, choice, reason);
        choice
    }

    fn label(&self) -> &str {
        BotKind::Value.label()
    }
}

use super::{Policy, PolicyContext, log_discard_decision, log_draw_decision};
use crate::bot::BotKind;
use golf_core::model::action::{DiscardChoice, DrawSource, DrawnCard};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

/// Uniformly random legal play.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPolicy;

impl RandomPolicy {
    pub const fn new() -> Self {
        Self
    }
}

impl Policy for RandomPolicy {
    fn choose_draw(&mut self, ctx: &PolicyContext<'_>, rng: &mut dyn RngCore) -> DrawSource {
        let source = if rng.gen_bool(0.5) {
            DrawSource::Stock
        } else {
            DrawSource::DiscardPile
        };
        log_draw_decision(ctx, BotKind::Random, source, "coin");
        source
    }

    fn choose_discard(
        &mut self,
        ctx: &PolicyContext<'_>,
        drawn: DrawnCard,
        rng: &mut dyn RngCore,
    ) -> DiscardChoice {
        let options: Vec<DiscardChoice> = DiscardChoice::all()
            .filter(|choice| {
                !(drawn.came_from_discard() && *choice == DiscardChoice::ReturnToPile)
            })
            .collect();
        let choice = options
            .choose(rng)
            .copied()
            .unwrap_or(DiscardChoice::ReturnToPile);
        log_discard_decision(ctx, BotKind::Random, drawn, choice, "uniform");
        choice
    }

    fn label(&self) -> &str {
        BotKind::Random.label()
    }
}

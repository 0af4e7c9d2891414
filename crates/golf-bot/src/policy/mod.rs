mod heuristic;
mod learned;
mod random;

pub use golf_core::game::policy::{Policy, PolicyContext};
pub use heuristic::HeuristicPolicy;
pub use learned::LearnedValuePolicy;
pub use random::RandomPolicy;

use crate::bot::{BotKind, ValueFunction};
use golf_core::model::action::{DiscardChoice, DrawSource, DrawnCard};
use rand::RngCore;
use tracing::{Level, event};

/// The policy variants a seat can be given.
pub enum BotPolicy {
    Random(RandomPolicy),
    Heuristic(HeuristicPolicy),
    Value(LearnedValuePolicy),
}

impl BotPolicy {
    pub fn random() -> Self {
        BotPolicy::Random(RandomPolicy::new())
    }

    pub fn heuristic() -> Self {
        BotPolicy::Heuristic(HeuristicPolicy::new())
    }

    pub fn value(function: ValueFunction) -> Self {
        BotPolicy::Value(LearnedValuePolicy::new(function))
    }

    pub fn kind(&self) -> BotKind {
        match self {
            BotPolicy::Random(_) => BotKind::Random,
            BotPolicy::Heuristic(_) => BotKind::Heuristic,
            BotPolicy::Value(_) => BotKind::Value,
        }
    }
}

impl Policy for BotPolicy {
    fn choose_draw(&mut self, ctx: &PolicyContext<'_>, rng: &mut dyn RngCore) -> DrawSource {
        match self {
            BotPolicy::Random(policy) => policy.choose_draw(ctx, rng),
            BotPolicy::Heuristic(policy) => policy.choose_draw(ctx, rng),
            BotPolicy::Value(policy) => policy.choose_draw(ctx, rng),
        }
    }

    fn choose_discard(
        &mut self,
        ctx: &PolicyContext<'_>,
        drawn: DrawnCard,
        rng: &mut dyn RngCore,
    ) -> DiscardChoice {
        match self {
            BotPolicy::Random(policy) => policy.choose_discard(ctx, drawn, rng),
            BotPolicy::Heuristic(policy) => policy.choose_discard(ctx, drawn, rng),
            BotPolicy::Value(policy) => policy.choose_discard(ctx, drawn, rng),
        }
    }

    fn label(&self) -> &str {
        self.kind().label()
    }
}

pub(crate) fn log_draw_decision(
    ctx: &PolicyContext<'_>,
    kind: BotKind,
    chosen: DrawSource,
    reason: &'static str,
) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }

    let top = ctx
        .top_discard
        .map(|card| card.to_string())
        .unwrap_or_else(|| "none".to_string());
    event!(
        target: "golf_bot::draw",
        Level::DEBUG,
        seat = %ctx.seat,
        round = ctx.round_number,
        kind = %kind,
        top_discard = %top,
        stock_remaining = ctx.stock_remaining,
        hidden = ctx.hand.hidden_count(),
        reason,
        source = ?chosen
    );
}

pub(crate) fn log_discard_decision(
    ctx: &PolicyContext<'_>,
    kind: BotKind,
    drawn: DrawnCard,
    chosen: DiscardChoice,
    reason: &'static str,
) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }

    event!(
        target: "golf_bot::discard",
        Level::DEBUG,
        seat = %ctx.seat,
        round = ctx.round_number,
        kind = %kind,
        drawn = %drawn.card,
        from_discard = drawn.came_from_discard(),
        hidden = ctx.hand.hidden_count(),
        reason,
        choice = %chosen
    );
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::PolicyContext;
    use golf_core::model::card::{Card, CardFace};
    use golf_core::model::discard::DiscardPile;
    use golf_core::model::hand::Hand;
    use golf_core::model::observation::Observation;
    use golf_core::model::player::Seat;

    /// Observer's hand and the discard pile; the opponent holds only
    /// face-down cards.
    pub struct Table {
        pub hand: Hand,
        pub discard: DiscardPile,
        pub observation: Observation,
    }

    impl Table {
        pub fn new(faces: [CardFace; 6], shown: &[usize], top: CardFace) -> Self {
            let mut hand = Hand::new(faces.map(Card::face_down));
            for slot in shown {
                hand.reveal(*slot);
            }
            let opponent = Hand::new([Card::face_down(top); 6]);
            let mut discard = DiscardPile::new();
            discard.push(Card::face_up(top));
            let observation = Observation::project(&hand, [&opponent], &discard);
            Self {
                hand,
                discard,
                observation,
            }
        }

        pub fn context(&self) -> PolicyContext<'_> {
            PolicyContext {
                seat: Seat::new(0),
                round_number: 0,
                player_count: 2,
                hand: &self.hand,
                top_discard: self.discard.top(),
                observation: &self.observation,
                stock_remaining: 30,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::Table;
    use super::{BotPolicy, Policy};
    use crate::bot::{BotKind, StateEncoding, ValueFunction};
    use golf_core::model::action::{DrawSource, DrawnCard};
    use golf_core::model::card::{Card, CardFace};
    use golf_core::model::rank::Rank;
    use golf_core::model::suit::Suit;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn faces() -> [CardFace; 6] {
        [Rank::Ace, Rank::Two, Rank::Three, Rank::Four, Rank::Five, Rank::Six]
            .map(|rank| CardFace::ranked(rank, Suit::Diamonds))
    }

    #[test]
    fn variants_report_their_kind() {
        let policies = [
            BotPolicy::random(),
            BotPolicy::heuristic(),
            BotPolicy::value(ValueFunction::seeded(StateEncoding::OneHotHand, 5, 1)),
        ];
        let labels: Vec<_> = policies.iter().map(|p| p.label().to_string()).collect();
        assert_eq!(labels, ["random", "heuristic", "value"]);
        assert_eq!(policies[2].kind(), BotKind::Value);
    }

    #[test]
    fn delegates_to_inner_policy() {
        let table = Table::new(faces(), &[0, 1], CardFace::ranked(Rank::Ten, Suit::Spades));
        let mut policy = BotPolicy::heuristic();
        let mut rng = StdRng::seed_from_u64(4);
        let ctx = table.context();
        assert_eq!(policy.choose_draw(&ctx, &mut rng), DrawSource::Stock);

        let drawn = DrawnCard {
            card: Card::face_up(CardFace::ranked(Rank::Ace, Suit::Spades)),
            source: DrawSource::Stock,
        };
        let choice = policy.choose_discard(&ctx, drawn, &mut rng);
        assert_eq!(choice, golf_core::model::action::DiscardChoice::Exchange(1));
    }
}

use super::{Policy, PolicyContext, log_discard_decision, log_draw_decision};
use crate::bot::BotKind;
use golf_core::model::action::{DiscardChoice, DrawSource, DrawnCard};
use golf_core::model::score::card_score;
use rand::RngCore;
use rand::seq::SliceRandom;

/// Greedy play close to how a casual human plays.
///
/// Takes the face-up card unless its rank sits in 7..=12, then swaps the
/// drawn card over the first face-up card that scores worse. With nothing to
/// improve it gambles on a face-down slot, or throws the card away when that
/// is allowed.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicPolicy;

impl HeuristicPolicy {
    pub const fn new() -> Self {
        Self
    }
}

impl Policy for HeuristicPolicy {
    fn choose_draw(&mut self, ctx: &PolicyContext<'_>, _rng: &mut dyn RngCore) -> DrawSource {
        let (source, reason) = match ctx.top_discard.map(|card| card.face().value()) {
            Some(value) if 6 < value && value < 13 => (DrawSource::Stock, "high_discard"),
            Some(_) => (DrawSource::DiscardPile, "low_discard"),
            None => (DrawSource::Stock, "empty_discard"),
        };
        log_draw_decision(ctx, BotKind::Heuristic, source, reason);
        source
    }

    fn choose_discard(
        &mut self,
        ctx: &PolicyContext<'_>,
        drawn: DrawnCard,
        rng: &mut dyn RngCore,
    ) -> DiscardChoice {
        let drawn_score = card_score(drawn.card.face());
        let improvement = ctx
            .hand
            .visible()
            .find(|(_, face)| drawn_score < card_score(*face))
            .map(|(slot, _)| slot);
        if let Some(slot) = improvement {
            let choice = DiscardChoice::Exchange(slot);
            log_discard_decision(ctx, BotKind::Heuristic, drawn, choice, "improves_visible");
            return choice;
        }

        let mut options: Vec<DiscardChoice> =
            ctx.hand.hidden_slots().map(DiscardChoice::Exchange).collect();
        if !drawn.came_from_discard() {
            options.push(DiscardChoice::ReturnToPile);
        }
        let choice = options
            .choose(rng)
            .copied()
            .unwrap_or(DiscardChoice::ReturnToPile);
        log_discard_decision(ctx, BotKind::Heuristic, drawn, choice, "gamble");
        choice
    }

    fn label(&self) -> &str {
        BotKind::Heuristic.label()
    }
}

#[cfg(test)]
mod tests {
    use super::HeuristicPolicy;
    use crate::policy::Policy;
    use crate::policy::fixtures::Table;
    use golf_core::model::action::{DiscardChoice, DrawSource, DrawnCard};
    use golf_core::model::card::{Card, CardFace, Joker};
    use golf_core::model::rank::Rank;
    use golf_core::model::suit::Suit;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn hand() -> [CardFace; 6] {
        [
            CardFace::ranked(Rank::Three, Suit::Clubs),
            CardFace::ranked(Rank::Nine, Suit::Clubs),
            CardFace::ranked(Rank::Queen, Suit::Clubs),
            CardFace::ranked(Rank::Four, Suit::Clubs),
            CardFace::ranked(Rank::Five, Suit::Clubs),
            CardFace::ranked(Rank::Six, Suit::Clubs),
        ]
    }

    fn draw_for(top: CardFace) -> DrawSource {
        let table = Table::new(hand(), &[0, 1], top);
        let mut rng = StdRng::seed_from_u64(0);
        HeuristicPolicy::new().choose_draw(&table.context(), &mut rng)
    }

    #[test]
    fn draw_threshold_follows_rank() {
        assert_eq!(draw_for(CardFace::ranked(Rank::Six, Suit::Hearts)), DrawSource::DiscardPile);
        assert_eq!(draw_for(CardFace::ranked(Rank::Seven, Suit::Hearts)), DrawSource::Stock);
        assert_eq!(draw_for(CardFace::ranked(Rank::Queen, Suit::Hearts)), DrawSource::Stock);
        assert_eq!(draw_for(CardFace::ranked(Rank::King, Suit::Hearts)), DrawSource::DiscardPile);
        assert_eq!(draw_for(CardFace::Joker(Joker::Red)), DrawSource::DiscardPile);
    }

    #[test]
    fn replaces_first_worse_visible_card() {
        let table = Table::new(hand(), &[0, 1, 2], CardFace::ranked(Rank::Two, Suit::Hearts));
        let mut rng = StdRng::seed_from_u64(0);
        let drawn = DrawnCard {
            card: Card::face_up(CardFace::ranked(Rank::Five, Suit::Hearts)),
            source: DrawSource::Stock,
        };
        let choice = HeuristicPolicy::new().choose_discard(&table.context(), drawn, &mut rng);
        assert_eq!(choice, DiscardChoice::Exchange(1));

        let king = DrawnCard {
            card: Card::face_up(CardFace::ranked(Rank::King, Suit::Hearts)),
            source: DrawSource::Stock,
        };
        let choice = HeuristicPolicy::new().choose_discard(&table.context(), king, &mut rng);
        assert_eq!(choice, DiscardChoice::Exchange(0));
    }

    #[test]
    fn gambles_on_hidden_slots_when_nothing_improves() {
        let table = Table::new(hand(), &[0, 1, 2], CardFace::ranked(Rank::Two, Suit::Hearts));
        let mut rng = StdRng::seed_from_u64(17);
        let drawn = DrawnCard {
            card: Card::face_up(CardFace::ranked(Rank::Jack, Suit::Hearts)),
            source: DrawSource::DiscardPile,
        };
        for _ in 0..100 {
            let choice = HeuristicPolicy::new().choose_discard(&table.context(), drawn, &mut rng);
            assert!(matches!(choice, DiscardChoice::Exchange(3..=5)), "{choice}");
        }
    }
}

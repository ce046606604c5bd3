//! Briscola rules: dealing, trick resolution, scoring, and the search
//! engine's state contract.
//!
//! Seats are numbered 0..n (n = 2 or 4) and score onto two sides by seat
//! parity. The undealt deck is never stored: after each trick the remaining
//! cards are reconstructed from what is visible and reshuffled, which is
//! indistinguishable from keeping a fixed deck order and keeps clones cheap.

use crate::card::{new_deck, Card, Suit};
use brisca_search::{GameState, ScoreMode};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

const CARDS_PER_HAND: usize = 3;

/// Scoring side of a seat. Seats alternate between the two teams.
pub fn team_of(seat: u8) -> usize {
    (seat % 2) as usize
}

#[derive(Debug, Error)]
pub enum RulesError {
    #[error("invalid number of players: {0} (must be 2 or 4)")]
    InvalidPlayerCount(u8),
}

/// A full-information Briscola position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BriscolaState {
    pub num_players: u8,
    /// Seat whose turn it is.
    pub player_to_move: u8,
    /// Seat that led the current trick.
    pub player_starting: u8,
    /// Cards held by each seat.
    pub hands: Vec<Vec<Card>>,
    /// Cards played to the current trick, in play order.
    pub table: Vec<(u8, Card)>,
    /// Cards from completed tricks.
    pub discarded: Vec<Card>,
    /// The exposed trump indicator, dealt last.
    pub last_card: Card,
    pub trump_suit: Suit,
    /// Team totals, indexed by seat parity.
    pub score: [i32; 2],
}

impl BriscolaState {
    /// Shuffle and deal a fresh game: three cards per seat, then expose the
    /// trump indicator.
    pub fn new(num_players: u8, rng: &mut ChaCha8Rng) -> Result<Self, RulesError> {
        if num_players != 2 && num_players != 4 {
            return Err(RulesError::InvalidPlayerCount(num_players));
        }

        let mut deck = new_deck();
        deck.shuffle(rng);

        let mut hands = Vec::with_capacity(num_players as usize);
        for _ in 0..num_players {
            let cut = deck.len() - CARDS_PER_HAND;
            hands.push(deck.split_off(cut));
        }
        let last_card = deck[deck.len() - 1];

        Ok(Self {
            num_players,
            player_to_move: 0,
            player_starting: 0,
            hands,
            table: Vec::with_capacity(num_players as usize),
            discarded: Vec::with_capacity(40),
            last_card,
            trump_suit: last_card.suit,
            score: [0, 0],
        })
    }

    pub fn next_player(&self, seat: u8) -> u8 {
        (seat + 1) % self.num_players
    }

    /// Seat that plays last in the current trick, to the right of the leader.
    /// It receives the trump indicator on the final deal.
    pub fn closing_player(&self) -> u8 {
        (self.player_starting + self.num_players - 1) % self.num_players
    }

    /// Winner of the completed trick and the points it contains. The first
    /// card leads; a trump displaces a non-trump winner; within the winning
    /// card's suit a higher rank takes over.
    ///
    /// # Panics
    /// Panics if the trick is not complete.
    pub fn trick_winner(&self) -> (u8, i32) {
        assert_eq!(
            self.table.len(),
            self.num_players as usize,
            "trick must be complete to score it"
        );
        let (mut win_seat, mut win_card) = self.table[0];
        let mut points = win_card.points();
        for &(seat, card) in &self.table[1..] {
            points += card.points();
            if card.suit == self.trump_suit && win_card.suit != self.trump_suit {
                win_seat = seat;
                win_card = card;
            }
            if card.suit == win_card.suit && card.rank > win_card.rank {
                win_seat = seat;
                win_card = card;
            }
        }
        (win_seat, points)
    }

    /// Sweep the finished trick into the discard pile and deal one card per
    /// seat from the reconstructed deck. On the final deal the closing seat
    /// takes the trump indicator instead of a deck card.
    fn deal_round(&mut self, rng: &mut ChaCha8Rng) {
        self.discarded.extend(self.table.iter().map(|&(_, c)| c));
        self.table.clear();

        let mut dealt: Vec<Card> = self.discarded.clone();
        dealt.push(self.last_card);
        for hand in &self.hands {
            dealt.extend_from_slice(hand);
        }

        let mut deck: Vec<Card> = new_deck()
            .into_iter()
            .filter(|c| !dealt.contains(c))
            .collect();
        if deck.is_empty() {
            return;
        }
        deck.shuffle(rng);

        let last_deal = deck.len() + 1 == self.num_players as usize;
        let closing = self.closing_player();
        if last_deal {
            self.hands[closing as usize].push(self.last_card);
        }
        for seat in 0..self.num_players {
            if !last_deal || seat != closing {
                let card = deck
                    .pop()
                    .expect("deck holds one card per seat being dealt");
                self.hands[seat as usize].push(card);
            }
        }
    }
}

impl GameState for BriscolaState {
    type Move = Card;
    type Player = u8;

    fn player_to_move(&self) -> u8 {
        self.player_to_move
    }

    fn clone_and_randomize(&self, observer: u8, rng: &mut ChaCha8Rng) -> Self {
        let mut st = self.clone();

        // The observer sees their own hand, the table, the discard pile, and
        // the trump indicator.
        let mut seen: Vec<Card> = st.hands[observer as usize].clone();
        seen.extend_from_slice(&st.discarded);
        seen.extend(st.table.iter().map(|&(_, c)| c));
        seen.push(st.last_card);

        let mut pool: Vec<Card> = new_deck()
            .into_iter()
            .filter(|c| !seen.contains(c))
            .collect();
        pool.shuffle(rng);
        // The trump indicator is public but may sit in an opponent's hand
        // after the final deal. Keeping it at the back means it is only dealt
        // out when the hidden cards do not cover every opponent hand.
        pool.push(st.last_card);

        let mut cursor = 0usize;
        for seat in 0..st.num_players {
            if seat == observer {
                continue;
            }
            let k = st.hands[seat as usize].len();
            st.hands[seat as usize] = pool[cursor..cursor + k].to_vec();
            cursor += k;
        }
        st
    }

    fn legal_moves(&self) -> Vec<Card> {
        self.hands[self.player_to_move as usize].clone()
    }

    /// # Panics
    /// Panics if `mv` is not in the moving seat's hand: that is a caller
    /// contract violation, not a recoverable condition.
    fn do_move(&mut self, mv: &Card, rng: &mut ChaCha8Rng) {
        let seat = self.player_to_move as usize;
        let idx = match self.hands[seat].iter().position(|c| c == mv) {
            Some(i) => i,
            None => panic!("played card {} not in hand of seat {}", mv, seat),
        };
        self.hands[seat].remove(idx);
        self.table.push((self.player_to_move, *mv));
        self.player_to_move = self.next_player(self.player_to_move);

        if self.table.len() == self.num_players as usize {
            let (winner, points) = self.trick_winner();
            self.score[team_of(winner)] += points;
            self.player_starting = winner;
            self.player_to_move = winner;
            self.deal_round(rng);
        }
    }

    fn result(&self, player: u8, mode: ScoreMode) -> f64 {
        let team = team_of(player);
        let diff = self.score[team] - self.score[1 - team];
        match mode {
            ScoreMode::Points => f64::from(diff),
            ScoreMode::Wins => {
                if diff > 0 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

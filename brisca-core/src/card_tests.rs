use crate::card::{new_deck, Card, Rank, Suit};

#[test]
fn display_matches_rank_and_suit_letters() {
    assert_eq!(Card::new(Rank::Two, Suit::Bastoni).to_string(), "2B");
    assert_eq!(Card::new(Rank::Ace, Suit::Coppe).to_string(), "AC");
    assert_eq!(Card::new(Rank::Three, Suit::Coppe).to_string(), "3C");
    assert_eq!(Card::new(Rank::Queen, Suit::Coppe).to_string(), "QC");
    assert_eq!(Card::new(Rank::King, Suit::Coppe).to_string(), "KC");
    assert_eq!(Card::new(Rank::Jack, Suit::Coppe).to_string(), "JC");
    assert_eq!(Card::new(Rank::Seven, Suit::Ori).to_string(), "7O");
    assert_eq!(Card::new(Rank::Five, Suit::Spade).to_string(), "5S");
}

#[test]
fn point_values() {
    assert_eq!(Rank::Jack.points(), 2);
    assert_eq!(Rank::Queen.points(), 3);
    assert_eq!(Rank::King.points(), 4);
    assert_eq!(Rank::Three.points(), 10);
    assert_eq!(Rank::Ace.points(), 11);
    assert_eq!(Rank::Two.points(), 0);
    assert_eq!(Rank::Seven.points(), 0);
}

#[test]
fn trick_order_puts_three_and_ace_above_figures() {
    assert!(Rank::Ace > Rank::Three);
    assert!(Rank::Three > Rank::King);
    assert!(Rank::King > Rank::Queen);
    assert!(Rank::Queen > Rank::Jack);
    assert!(Rank::Jack > Rank::Seven);
    assert!(Rank::Four > Rank::Two);
}

#[test]
fn deck_has_40_unique_cards_worth_120_points() {
    let deck = new_deck();
    assert_eq!(deck.len(), 40);

    let total: i32 = deck.iter().map(|c| c.points()).sum();
    assert_eq!(total, 120);

    for (i, a) in deck.iter().enumerate() {
        for b in &deck[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

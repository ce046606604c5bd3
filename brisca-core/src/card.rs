//! Cards, suits, and the 40-card Briscola deck.

use std::fmt;

/// The four Italian suits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suit {
    Ori,
    Bastoni,
    Spade,
    Coppe,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Ori, Suit::Bastoni, Suit::Spade, Suit::Coppe];

    fn letter(self) -> char {
        match self {
            Suit::Ori => 'O',
            Suit::Bastoni => 'B',
            Suit::Spade => 'S',
            Suit::Coppe => 'C',
        }
    }
}

/// Card ranks in trick-taking order: the three and the ace outrank the
/// figures. Discriminants encode the strength used when comparing cards of
/// the same suit, so the derived `Ord` is the trick order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    Two = 2,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Jack = 8,
    Queen = 9,
    King = 10,
    Three = 11,
    Ace = 12,
}

impl Rank {
    pub const ALL: [Rank; 10] = [
        Rank::Two,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Three,
        Rank::Ace,
    ];

    /// Card points: figures are worth 2/3/4, the three 10, the ace 11.
    /// Everything else is worth nothing. The deck totals 120 points.
    pub fn points(self) -> i32 {
        match self {
            Rank::Jack => 2,
            Rank::Queen => 3,
            Rank::King => 4,
            Rank::Three => 10,
            Rank::Ace => 11,
            _ => 0,
        }
    }

    fn letter(self) -> char {
        match self {
            Rank::Two => '2',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Three => '3',
            Rank::Ace => 'A',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub fn points(self) -> i32 {
        self.rank.points()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.letter(), self.suit.letter())
    }
}

/// All 40 cards, unshuffled.
pub fn new_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(40);
    for rank in Rank::ALL {
        for suit in Suit::ALL {
            deck.push(Card::new(rank, suit));
        }
    }
    deck
}

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Suit};

/// Poker hand categories in ascending strength.
///
/// Serialized with the short hand codes shown to players (`"three_kind"`, ...).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "high_card")]
    HighCard = 0,
    #[serde(rename = "pair")]
    OnePair = 1,
    #[serde(rename = "two_pair")]
    TwoPair = 2,
    #[serde(rename = "three_kind")]
    ThreeOfAKind = 3,
    #[serde(rename = "straight")]
    Straight = 4,
    #[serde(rename = "flush")]
    Flush = 5,
    #[serde(rename = "full_house")]
    FullHouse = 6,
    #[serde(rename = "four_kind")]
    FourOfAKind = 7,
    #[serde(rename = "straight_flush")]
    StraightFlush = 8,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::HighCard,
        Category::OnePair,
        Category::TwoPair,
        Category::ThreeOfAKind,
        Category::Straight,
        Category::Flush,
        Category::FullHouse,
        Category::FourOfAKind,
        Category::StraightFlush,
    ];

    /// Strength level 1 (high card) ..= 9 (straight flush).
    pub fn rank_level(self) -> u8 {
        self as u8 + 1
    }

    pub fn code(self) -> &'static str {
        match self {
            Category::HighCard => "high_card",
            Category::OnePair => "pair",
            Category::TwoPair => "two_pair",
            Category::ThreeOfAKind => "three_kind",
            Category::Straight => "straight",
            Category::Flush => "flush",
            Category::FullHouse => "full_house",
            Category::FourOfAKind => "four_kind",
            Category::StraightFlush => "straight_flush",
        }
    }
}

/// Score of a five-card hand.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct HandScore {
    pub category: Category,
    // kickers: ordered high -> low for tiebreaks, zero padded
    pub kickers: [u8; 5],
}

impl HandScore {
    pub fn rank_level(&self) -> u8 {
        self.category.rank_level()
    }
}

impl Ord for HandScore {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_hands(self, other)
    }
}

impl PartialOrd for HandScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Category first, then kickers lexicographically. Absent kickers are zero.
pub fn compare_hands(a: &HandScore, b: &HandScore) -> Ordering {
    match a.category.cmp(&b.category) {
        Ordering::Equal => a.kickers.cmp(&b.kickers),
        ord => ord,
    }
}

/// Scores exactly five cards.
pub fn evaluate_five(cards: &[Card; 5]) -> HandScore {
    let mut rank_counts = [0u8; 15]; // 2..14 used
    let mut suit_counts = [0u8; 4];
    let mut rank_mask: u16 = 0;
    for &c in cards.iter() {
        let r = c.rank.value();
        rank_counts[r as usize] += 1;
        suit_counts[suit_index(c.suit)] += 1;
        rank_mask |= 1u16 << r;
    }

    let flush = suit_counts.iter().any(|&n| n == 5);
    let straight_high = if rank_mask.count_ones() == 5 {
        straight_high_from_mask(rank_mask)
    } else {
        None
    };

    // (count, value) ordered by count desc, then value desc
    let mut groups: Vec<(u8, u8)> = (2..=14u8)
        .rev()
        .filter(|&r| rank_counts[r as usize] > 0)
        .map(|r| (rank_counts[r as usize], r))
        .collect();
    groups.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)));

    if let (Some(high), true) = (straight_high, flush) {
        return score(Category::StraightFlush, &[high]);
    }
    if groups[0].0 == 4 {
        return score(Category::FourOfAKind, &[groups[0].1, groups[1].1]);
    }
    if groups[0].0 == 3 && groups[1].0 == 2 {
        return score(Category::FullHouse, &[groups[0].1, groups[1].1]);
    }
    if flush {
        return score(Category::Flush, &values_desc(&groups));
    }
    if let Some(high) = straight_high {
        return score(Category::Straight, &[high]);
    }
    if groups[0].0 == 3 {
        return score(
            Category::ThreeOfAKind,
            &[groups[0].1, groups[1].1, groups[2].1],
        );
    }
    if groups[0].0 == 2 && groups[1].0 == 2 {
        // groups are value-ordered within equal counts, so [0] is the high pair
        return score(Category::TwoPair, &[groups[0].1, groups[1].1, groups[2].1]);
    }
    if groups[0].0 == 2 {
        return score(
            Category::OnePair,
            &[groups[0].1, groups[1].1, groups[2].1, groups[3].1],
        );
    }
    score(Category::HighCard, &values_desc(&groups))
}

/// Best five-card score among all 21 subsets of seven cards.
pub fn best_of_seven(cards: &[Card; 7]) -> HandScore {
    let mut best = evaluate_five(&[cards[0], cards[1], cards[2], cards[3], cards[4]]);
    // each subset is the seven cards minus one excluded pair (i, j)
    for i in 0..7 {
        for j in (i + 1)..7 {
            let mut five = [cards[0]; 5];
            let mut k = 0;
            for (idx, &c) in cards.iter().enumerate() {
                if idx != i && idx != j {
                    five[k] = c;
                    k += 1;
                }
            }
            let candidate = evaluate_five(&five);
            if compare_hands(&candidate, &best).is_gt() {
                best = candidate;
            }
        }
    }
    best
}

/// Best score for two hole cards on a five-card board.
pub fn best_with_board(hole: &[Card; 2], board: &[Card; 5]) -> HandScore {
    best_of_seven(&[
        hole[0], hole[1], board[0], board[1], board[2], board[3], board[4],
    ])
}

fn score(category: Category, values: &[u8]) -> HandScore {
    let mut kickers = [0u8; 5];
    for (slot, &v) in kickers.iter_mut().zip(values) {
        *slot = v;
    }
    HandScore { category, kickers }
}

fn values_desc(groups: &[(u8, u8)]) -> Vec<u8> {
    let mut v: Vec<u8> = groups.iter().map(|&(_, r)| r).collect();
    v.sort_unstable_by(|a, b| b.cmp(a));
    v
}

fn suit_index(s: Suit) -> usize {
    match s {
        Suit::Clubs => 0,
        Suit::Diamonds => 1,
        Suit::Hearts => 2,
        Suit::Spades => 3,
    }
}

fn straight_high_from_mask(mask: u16) -> Option<u8> {
    // Treat Ace as 14 and optionally as 1
    let mut m = mask;
    if (m & (1 << 14)) != 0 {
        m |= 1 << 1;
    }
    // Sliding 5-bit window from Ace(14) down to 5
    for high in (5..=14u16).rev() {
        let window = 0b1_1111u16 << (high - 4);
        if (m & window) == window {
            return Some(high as u8);
        }
    }
    None
}

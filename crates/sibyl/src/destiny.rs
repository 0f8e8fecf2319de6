//! Destiny (birth) card lookup.
//!
//! Every calendar day, including 29 February, maps to one card of a 52-card
//! deck through its solar value `55 - (2 * month + day)`. The value 0 occurs
//! only on 31 December and is the Joker.

use crate::error::ChartError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const DAYS_IN_MONTH: [u32; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
const SOLAR_VALUE_BASE: u32 = 55;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Hearts,
    Clubs,
    Diamonds,
    Spades,
}

impl Suit {
    pub fn name(self) -> &'static str {
        match self {
            Suit::Hearts => "Hearts",
            Suit::Clubs => "Clubs",
            Suit::Diamonds => "Diamonds",
            Suit::Spades => "Spades",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Suit::Hearts => "♥",
            Suit::Clubs => "♣",
            Suit::Diamonds => "♦",
            Suit::Spades => "♠",
        }
    }

    fn temperament(self) -> &'static str {
        match self {
            Suit::Hearts => "Hearts lead with feeling: relationships, family and emotional bonds shape the path.",
            Suit::Clubs => "Clubs live through the mind: curiosity, conversation and a restless hunger for knowledge.",
            Suit::Diamonds => "Diamonds weigh everything by value: resources, trade and what is truly worth keeping.",
            Suit::Spades => "Spades are drawn to work and wisdom: discipline, health and the deeper lessons of effort.",
        }
    }
}

/// A, 2..10, J, Q, K
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rank(u8);

impl Rank {
    fn from_value(value: u8) -> Option<Self> {
        (1..=13).contains(&value).then_some(Rank(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn label(self) -> String {
        match self.0 {
            1 => "A".to_string(),
            11 => "J".to_string(),
            12 => "Q".to_string(),
            13 => "K".to_string(),
            n => n.to_string(),
        }
    }

    fn trait_text(self) -> &'static str {
        match self.0 {
            1 => "The Ace carries the spark of desire and new beginnings.",
            2 => "The Two seeks partnership and cooperation.",
            3 => "The Three creates, but must guard against indecision.",
            4 => "The Four builds stability and honest foundations.",
            5 => "The Five is a traveller, hungry for change and experience.",
            6 => "The Six answers to responsibility and the law of cause and effect.",
            7 => "The Seven is tested by challenge and rewarded with spiritual insight.",
            8 => "The Eight holds power and the strength to direct it.",
            9 => "The Nine completes cycles and learns to let go.",
            10 => "The Ten reaches for success and leads through achievement.",
            11 => "The Jack is youthful, inventive and quick-witted.",
            12 => "The Queen nurtures and serves with quiet authority.",
            _ => "The King rules by mastery and sets the standard for others.",
        }
    }
}

/// Entry of the calendar table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardCode {
    Joker,
    Card { rank: Rank, suit: Suit },
}

impl CardCode {
    /// Card for a solar value in 0..=52
    fn from_solar_value(value: u32) -> Option<Self> {
        if value == 0 {
            return Some(CardCode::Joker);
        }
        if value > 52 {
            return None;
        }
        let index = value - 1;
        let suit = match index / 13 {
            0 => Suit::Hearts,
            1 => Suit::Clubs,
            2 => Suit::Diamonds,
            _ => Suit::Spades,
        };
        let rank = Rank::from_value((index % 13) as u8 + 1)?;
        Some(CardCode::Card { rank, suit })
    }
}

lazy_static::lazy_static! {
    /// "month-day" -> card, one entry per day of a leap year
    static ref DESTINY_CALENDAR: HashMap<String, CardCode> = build_calendar();
}

fn build_calendar() -> HashMap<String, CardCode> {
    let mut calendar = HashMap::with_capacity(366);
    for (month_index, &days) in DAYS_IN_MONTH.iter().enumerate() {
        let month = month_index as u32 + 1;
        for day in 1..=days {
            let solar_value = SOLAR_VALUE_BASE - (2 * month + day);
            if let Some(code) = CardCode::from_solar_value(solar_value) {
                calendar.insert(calendar_key(month, day), code);
            }
        }
    }
    calendar
}

fn calendar_key(month: u32, day: u32) -> String {
    format!("{}-{}", month, day)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinyCard {
    pub rank: String,
    pub suit: String,
    pub suit_symbol: String,
    pub description: String,
}

impl DestinyCard {
    fn from_code(code: CardCode) -> Self {
        match code {
            CardCode::Joker => DestinyCard {
                rank: "Joker".to_string(),
                suit: "Joker".to_string(),
                suit_symbol: "🃏".to_string(),
                description: "The Joker stands outside the deck: free to play any card, \
                              bound to none."
                    .to_string(),
            },
            CardCode::Card { rank, suit } => DestinyCard {
                rank: rank.label(),
                suit: suit.name().to_string(),
                suit_symbol: suit.symbol().to_string(),
                description: format!("{} {}", suit.temperament(), rank.trait_text()),
            },
        }
    }

    pub fn is_joker(&self) -> bool {
        self.rank == "Joker"
    }
}

/// Destiny card for a calendar day; days not on the calendar fail with `InvalidDate`
pub fn get_destiny_card(month: u32, day: u32) -> Result<DestinyCard, ChartError> {
    DESTINY_CALENDAR
        .get(&calendar_key(month, day))
        .copied()
        .map(DestinyCard::from_code)
        .ok_or(ChartError::InvalidDate { month, day })
}

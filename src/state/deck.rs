//! The fixed 52-card Lotería deck: uniform draws and board sampling.

use rand::seq::{IndexedRandom, index};

/// A card identifier in `1..=52`.
pub type Card = u8;

/// Number of cards in the deck.
pub const DECK_SIZE: u8 = 52;
/// Number of cells on a player board.
pub const BOARD_SIZE: usize = 16;

/// Draw one card uniformly at random among the cards not yet called.
///
/// Returns `None` once every card of the deck appears in `called`.
pub fn draw_uncalled(called: &[Card]) -> Option<Card> {
    let available: Vec<Card> = (1..=DECK_SIZE)
        .filter(|card| !called.contains(card))
        .collect();

    available.choose(&mut rand::rng()).copied()
}

/// Sample a fresh 16-card board uniformly without replacement from the deck.
///
/// Boards are independent of any session's call history; the order of the
/// returned cards defines the board positions `0..16`.
pub fn generate_board() -> Vec<Card> {
    let mut rng = rand::rng();
    index::sample(&mut rng, DECK_SIZE as usize, BOARD_SIZE)
        .into_iter()
        .map(|i| (i + 1) as Card)
        .collect()
}

//! egui presentation layer. Panels read [`state::UiState`] and hand user
//! intent back as [`state::UiIntent`]; they never touch the network.

pub mod panels;
pub mod state;
pub mod theme;

#[cfg(test)]
mod tests;

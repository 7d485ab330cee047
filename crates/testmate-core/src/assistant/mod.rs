mod history;
mod turn;

pub use history::{sort_newest_first, HistoryReader};
pub use turn::{PersistencePolicy, TurnHandler, TurnSettings};

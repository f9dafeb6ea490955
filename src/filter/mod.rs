mod filter_engine;
mod filter_state;
mod filtered_set;

pub use filter_engine::apply;
pub use filter_state::FilterState;
pub use filtered_set::FilteredSet;

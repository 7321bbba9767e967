//! Page items on spreads and master spreads, and the reading order of the
//! stories they hold.

mod item;
mod parser;
mod pasteboard;

pub use item::{Spread, SpreadItem, SpreadItemKind, State, TextPath, TextThread};
pub use parser::{MASTER_SPREAD, SPREAD, parse_spread};
pub use pasteboard::{PasteboardItem, VisibilityFilter, ordered_pasteboard_items, ordered_story_ids};

//! Display-name helpers shared by table names and guest bindings.

mod utils;

pub use utils::{MAX_NAME_WIDTH, display_width, sanitize_label};

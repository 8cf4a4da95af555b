pub mod button;
pub mod card;
pub mod input;
pub mod label;
pub mod modal;
pub mod pagination;
pub mod spinner;
pub mod table;
pub mod toaster;

// Re-export component symbols so callers can `use crate::components::ui::Button` etc.
pub use button::*;
pub use card::*;
pub use input::*;
pub use label::*;
pub use modal::*;
pub use pagination::*;
pub use spinner::*;
pub use table::*;
pub use toaster::*;

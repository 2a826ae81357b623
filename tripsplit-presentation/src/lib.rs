#![warn(clippy::uninlined_format_args)]

pub mod currency;
pub mod summary_presenter;
pub mod text_table;

pub use currency::CurrencyFormat;
pub use summary_presenter::{SETTLED_MESSAGE, SummaryPresenter};
pub use text_table::{Alignment, TextTableBuilder};

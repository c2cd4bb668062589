mod app;
pub mod components;
pub mod environment;
mod intent;
pub mod reducer;

pub use app::{run, Args};
pub use intent::{Intent, IntentError};

/// Handy macro for future localization
#[macro_export]
macro_rules! loc {
    ($x:expr $(,)?) => {
        $x
    };
}

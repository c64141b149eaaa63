pub mod filter;
pub mod preference;
pub mod question;
pub mod session;

pub use filter::FilterState;
pub use preference::{PreferenceStatus, UserPreference};
pub use question::{parse_tags, Question};
pub use session::{Note, ProgressRecord, Session};

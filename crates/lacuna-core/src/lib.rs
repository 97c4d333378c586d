pub mod extract;
pub mod rating;
pub mod session;

pub use extract::{extract_holes, segment_content, ContentSegment, HoleMatch};
pub use rating::{ParseRatingError, Rating};
pub use session::{SessionError, SessionFile, SessionStore, StoredUser};

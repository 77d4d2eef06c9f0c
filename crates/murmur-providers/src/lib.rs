//! Reply generators for Murmur.
//!
//! - [`traits::ReplyGenerator`] — trait every assistant backend implements
//! - [`canned::CannedReplyGenerator`] — delayed random canned replies
//! - [`canned::create_generator`] — builder from the `reply` config section

pub mod canned;
pub mod traits;

pub use canned::{create_generator, CannedReplyGenerator, CANNED_REPLIES};
pub use traits::{ReplyError, ReplyGenerator};

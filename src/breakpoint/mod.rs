//! Breakpoint records and the spatial index used to match them.
//!
//! A breakpoint joins two breakends, each with a chromosome, position and
//! strand. Two calls describe the same rearrangement when both breakends fall
//! within a window of each other, in either breakend order.

mod index;
mod matcher;
mod record;
mod window;

pub use index::{BreakpointIndex, IndexError};
pub use matcher::{match_record, Matcher};
pub use record::{Breakend, BreakpointRecord, BreakpointRecordBuilder, InvalidRecordError, Strand};
pub use window::MatchWindow;

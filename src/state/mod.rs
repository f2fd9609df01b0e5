//! Read/write-split state slices.
//!
//! Each independent piece of state is one observable cell with a dedicated
//! reader and writer ("Query" vs "Command"), so UI layers subscribe narrowly
//! and unrelated slices never invalidate each other. Slices are injected as
//! explicit handles, never reached through a global.

pub mod cell;
pub mod error;
pub mod schedule;
pub mod search;

pub use cell::{Callback, Cell, ReadHandle, WriteHandle};
pub use error::StateError;
pub use schedule::{ScheduleEntry, ScheduleStore, SchedulesMap, TableId};
pub use search::{OptionsSnapshot, SearchInfo, SearchOptions, SearchScope};

//! Note scheduling and mixing.
//!
//! A caller builds a [`note::NoteExpression`], pairs it with any
//! [`source::SignalSource`] voice in a [`event::ScheduledNote`], and hands
//! it to the [`mixer::ScheduledMixer`]. The mixer activates notes when its
//! sample cursor reaches their start, sums active voices into the output
//! buffer, and retires voices that finish or are cancelled.

pub mod event;
pub mod mixer;
pub mod note;
pub mod source;

pub use event::{NoteHandle, NoteState, ScheduledNote};
pub use mixer::ScheduledMixer;
pub use note::NoteExpression;
pub use source::SignalSource;

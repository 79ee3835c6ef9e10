use serde::{Deserialize, Serialize};

use crate::diagnostics::qualified_name;
use crate::errors::TraceError;

/// A single frame of a built [`StackTrace`].
///
/// `stack_index` counts from 1 at the oldest captured frame up to N at the
/// newest, so it runs in the opposite direction to the list position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackFrame {
    pub stack_index: usize,
    pub module_name: String,
    pub function_name: String,
    pub arity: usize,
    pub source_file: String,
    pub source_line: usize,
}

impl StackFrame {
    /// Namespace-style module path, see [`qualified_name::resolve`].
    pub fn qualified_module(&self) -> String {
        qualified_name::resolve(&self.module_name)
    }

    /// `source_line` is only meaningful when this returns true.
    pub fn has_location(&self) -> bool {
        !self.source_file.is_empty()
    }
}

/// An immutable snapshot of a call stack, most recent frame first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackTrace {
    reason: String,
    frames: Vec<StackFrame>,
}

impl StackTrace {
    pub(crate) fn from_parts(reason: String, frames: Vec<StackFrame>) -> Self {
        Self { reason, frames }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn frames(&self) -> &[StackFrame] {
        &self.frames
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StackFrame> {
        self.frames.iter()
    }

    pub fn size(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame at 0-based list position `position`; 0 is the most recent call.
    pub fn try_frame_at_position(&self, position: usize) -> Result<&StackFrame, TraceError> {
        self.frames
            .get(position)
            .ok_or(TraceError::FrameNotFound { position })
    }

    /// Frame whose `stack_index` equals `stack_index`; 1 is the oldest visible call.
    pub fn try_frame_at_stack_index(&self, stack_index: usize) -> Result<&StackFrame, TraceError> {
        self.frames
            .iter()
            .find(|frame| frame.stack_index == stack_index)
            .ok_or(TraceError::StackIndexNotFound { stack_index })
    }

    /// Like [`StackTrace::try_frame_at_position`], but a missing frame is a
    /// caller bug and panics.
    #[track_caller]
    pub fn frame_at_position(&self, position: usize) -> &StackFrame {
        match self.try_frame_at_position(position) {
            Ok(frame) => frame,
            Err(err) => panic!("{err}"),
        }
    }

    /// Like [`StackTrace::try_frame_at_stack_index`], but a missing frame is a
    /// caller bug and panics.
    #[track_caller]
    pub fn frame_at_stack_index(&self, stack_index: usize) -> &StackFrame {
        match self.try_frame_at_stack_index(stack_index) {
            Ok(frame) => frame,
            Err(err) => panic!("{err}"),
        }
    }

    /// Returns a copy of this trace carrying a different reason.
    pub fn with_reason(&self, reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            frames: self.frames.clone(),
        }
    }

    /// Returns a new trace with every frame passed through `f`.
    ///
    /// The stack indices of the result are reassigned from position, so `f`
    /// cannot break the `N, N-1, .., 1` sequence.
    pub fn with_frames_mapped<F>(&self, mut f: F) -> Self
    where
        F: FnMut(StackFrame) -> StackFrame,
    {
        let total = self.frames.len();
        let frames = self
            .frames
            .iter()
            .cloned()
            .enumerate()
            .map(|(position, frame)| StackFrame {
                stack_index: total - position,
                ..f(frame)
            })
            .collect();
        Self {
            reason: self.reason.clone(),
            frames,
        }
    }

    pub fn to_json(&self) -> Result<String, TraceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl<'a> IntoIterator for &'a StackTrace {
    type Item = &'a StackFrame;
    type IntoIter = std::slice::Iter<'a, StackFrame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

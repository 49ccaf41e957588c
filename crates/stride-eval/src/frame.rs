//! Frames and the timeline they form.

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use stride_types::StructuredError;

/// Outcome of one recorded step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FrameStatus {
    Success,
    Error,
}

/// One recorded execution checkpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Virtual time: the frame's index in its timeline.
    pub time: u64,
    /// Source line of the step.
    pub line: u32,
    pub status: FrameStatus,
    /// Every variable visible at this point.
    pub variables: BTreeMap<String, Value>,
    pub description: String,
    /// Present only on the `Error` frame that ends a failed run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<StructuredError>,
}

/// The ordered frames of one evaluation run.
///
/// Built by a [`TimelineBuilder`] and never changed afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    frames: Vec<Frame>,
}

impl Timeline {
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn last(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// `Error` if the run ended in a fault, `Success` otherwise (including
    /// an empty timeline).
    pub fn status(&self) -> FrameStatus {
        match self.last() {
            Some(frame) if frame.status == FrameStatus::Error => FrameStatus::Error,
            _ => FrameStatus::Success,
        }
    }

    /// The latest frame at or before virtual time `time`.
    pub fn frame_at_time(&self, time: u64) -> Option<&Frame> {
        let after = self.frames.partition_point(|f| f.time <= time);
        after.checked_sub(1).map(|i| &self.frames[i])
    }

    /// The error that ended the run, if any.
    pub fn error(&self) -> Option<&StructuredError> {
        self.last().and_then(|frame| frame.error.as_ref())
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a Frame;
    type IntoIter = std::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

/// Write-only view of a timeline under construction.
///
/// Times are assigned here, one per frame starting at zero. Recording an
/// error frame consumes the builder, so nothing can follow it.
#[derive(Debug, Default)]
pub struct TimelineBuilder {
    frames: Vec<Frame>,
}

impl TimelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    fn next_time(&self) -> u64 {
        self.frames.len() as u64
    }

    /// Append a successful step and return its time.
    pub fn push(
        &mut self,
        line: u32,
        variables: BTreeMap<String, Value>,
        description: impl Into<String>,
    ) -> u64 {
        let time = self.next_time();
        self.frames.push(Frame {
            time,
            line,
            status: FrameStatus::Success,
            variables,
            description: description.into(),
            error: None,
        });
        time
    }

    /// Append the terminal error frame and seal the timeline.
    pub fn fail(mut self, variables: BTreeMap<String, Value>, error: StructuredError) -> Timeline {
        let time = self.next_time();
        self.frames.push(Frame {
            time,
            line: error.line(),
            status: FrameStatus::Error,
            variables,
            description: error.message.clone(),
            error: Some(error),
        });
        self.finish()
    }

    /// Seal the timeline.
    pub fn finish(self) -> Timeline {
        Timeline {
            frames: self.frames,
        }
    }
}

//! Schedule types: timed blocks and the day schedule built from them.

mod clock;
mod generator;

pub use clock::{format_clock, parse_clock, resolve_window};
pub use generator::{GeneratedSchedule, ScheduleGenerator, BREAK_THRESHOLD_MIN, LOOP_CAP};

use serde::{Deserialize, Serialize};

use crate::subject::Priority;

/// Type of schedule block.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    /// Weekday study session
    Study,
    /// Weekend mock test
    Test,
    /// Weekend revision session
    Revision,
    /// Break between sessions
    Break,
}

/// A scheduled block on the day timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleBlock {
    pub id: String,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    pub subject: String,
    /// Absent on breaks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// Start clock, `HH:MM`.
    pub time: String,
    /// Minutes.
    pub duration: u32,
    #[serde(default)]
    pub completed: bool,
}

impl ScheduleBlock {
    pub fn is_break(&self) -> bool {
        self.block_type == BlockType::Break
    }
}

/// An ordered day of blocks, serialized as a plain array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DaySchedule {
    pub blocks: Vec<ScheduleBlock>,
}

impl DaySchedule {
    pub fn new(blocks: Vec<ScheduleBlock>) -> Self {
        Self { blocks }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn total_minutes(&self) -> u32 {
        self.blocks.iter().map(|b| b.duration).sum()
    }

    /// Minutes of non-break work.
    pub fn work_minutes(&self) -> u32 {
        self.blocks
            .iter()
            .filter(|b| !b.is_break())
            .map(|b| b.duration)
            .sum()
    }

    pub fn completed_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.completed).count()
    }

    /// Flip `completed` on the block with `id`. Returns the new value, or
    /// `None` if no block has that id.
    pub fn toggle_complete(&mut self, id: &str) -> Option<bool> {
        let block = self.blocks.iter_mut().find(|b| b.id == id)?;
        block.completed = !block.completed;
        Some(block.completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(id: &str, block_type: BlockType, duration: u32) -> ScheduleBlock {
        ScheduleBlock {
            id: id.into(),
            block_type,
            subject: "MTH101".into(),
            priority: (block_type != BlockType::Break).then_some(Priority::Medium),
            time: "09:00".into(),
            duration,
            completed: false,
        }
    }

    #[test]
    fn block_json_shape() {
        let b = block("a", BlockType::Break, 10);
        let json = serde_json::to_value(&b).unwrap();
        assert_eq!(json["type"], "break");
        assert!(json.get("priority").is_none());

        let s = block("b", BlockType::Study, 30);
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["type"], "study");
        assert_eq!(json["priority"], "Medium");
    }

    #[test]
    fn day_schedule_is_a_plain_array() {
        let day = DaySchedule::new(vec![block("a", BlockType::Study, 30)]);
        let json = serde_json::to_value(&day).unwrap();
        assert!(json.is_array());
        let back: DaySchedule = serde_json::from_value(json).unwrap();
        assert_eq!(back, day);
    }

    #[test]
    fn toggle_and_totals() {
        let mut day = DaySchedule::new(vec![
            block("a", BlockType::Study, 30),
            block("b", BlockType::Break, 10),
            block("c", BlockType::Study, 20),
        ]);
        assert_eq!(day.total_minutes(), 60);
        assert_eq!(day.work_minutes(), 50);

        assert_eq!(day.toggle_complete("c"), Some(true));
        assert_eq!(day.completed_count(), 1);
        assert_eq!(day.toggle_complete("c"), Some(false));
        assert_eq!(day.toggle_complete("missing"), None);
    }
}

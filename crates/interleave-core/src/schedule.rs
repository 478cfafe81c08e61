//! Timed study schedules built on top of a generated topic sequence.

use serde::{Deserialize, Serialize};

/// One thing to study: a subject, optionally narrowed to one of its topics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyUnit {
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

impl StudyUnit {
    pub fn label(&self) -> String {
        match &self.topic {
            Some(topic) => format!("{}: {}", self.subject, topic),
            None => self.subject.clone(),
        }
    }
}

/// What to do during a block, rotating through the three phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activity {
    #[serde(rename = "Learn new concepts")]
    LearnNewConcepts,
    #[serde(rename = "Practice problems")]
    PracticeProblems,
    #[serde(rename = "Review & self-test")]
    ReviewAndSelfTest,
}

impl Activity {
    pub fn for_block(index: usize) -> Self {
        match index % 3 {
            0 => Activity::LearnNewConcepts,
            1 => Activity::PracticeProblems,
            _ => Activity::ReviewAndSelfTest,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ScheduleEntry {
    #[serde(rename_all = "camelCase")]
    Study {
        order: usize,
        subject: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        topic: Option<String>,
        activity: Activity,
        minutes: u32,
        start_minute: u32,
    },
    #[serde(rename_all = "camelCase")]
    Break {
        after_block: usize,
        minutes: u32,
        start_minute: u32,
    },
}

/// Options for [`build_schedule`].
#[derive(Debug, Clone)]
pub struct ScheduleOptions {
    pub total_minutes: u32,
    pub breaks_enabled: bool,
    /// Insert a break after every this many blocks.
    pub break_every: usize,
    pub break_minutes: u32,
}

impl ScheduleOptions {
    pub fn new(total_minutes: u32, breaks_enabled: bool) -> Self {
        Self {
            total_minutes,
            breaks_enabled,
            break_every: 4,
            break_minutes: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub block_count: usize,
    pub block_minutes: u32,
    pub break_count: usize,
    pub total_scheduled_minutes: u32,
    pub entries: Vec<ScheduleEntry>,
}

/// Lay out `sequence` as equal-length blocks of `floor(total / blocks)`
/// minutes, with optional breaks between groups of blocks.
pub fn build_schedule(sequence: &[StudyUnit], options: &ScheduleOptions) -> Schedule {
    let block_count = sequence.len();
    let block_minutes = if block_count == 0 {
        0
    } else {
        options.total_minutes / block_count as u32
    };
    let break_every = options.break_every.max(1);

    let mut entries = Vec::with_capacity(block_count + block_count / break_every);
    let mut clock = 0u32;
    let mut break_count = 0usize;

    for (i, unit) in sequence.iter().enumerate() {
        entries.push(ScheduleEntry::Study {
            order: i + 1,
            subject: unit.subject.clone(),
            topic: unit.topic.clone(),
            activity: Activity::for_block(i),
            minutes: block_minutes,
            start_minute: clock,
        });
        clock += block_minutes;

        let is_last = i + 1 == block_count;
        if options.breaks_enabled && (i + 1) % break_every == 0 && !is_last {
            entries.push(ScheduleEntry::Break {
                after_block: i + 1,
                minutes: options.break_minutes,
                start_minute: clock,
            });
            clock += options.break_minutes;
            break_count += 1;
        }
    }

    Schedule {
        block_count,
        block_minutes,
        break_count,
        total_scheduled_minutes: clock,
        entries,
    }
}

// ── Stat presentation ──
//
// Cosmetic count-up for the hero stats. Runs as a detached task on a
// ~60fps interval and stops itself once the final value is shown.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::model::AggregateStats;
use crate::render::{RenderTarget, STAT_DATA, STAT_PROJECTS, STAT_UPTIME, SharedTarget, lock};

/// Interval between animation frames.
pub const FRAME: Duration = Duration::from_millis(16);

const COUNT_UP_DURATION: Duration = Duration::from_millis(1500);
const UPTIME_DELAY: Duration = Duration::from_millis(500);
const DATA_DELAY: Duration = Duration::from_millis(1000);

/// Frame values of a count-up from `start` to `end` over `duration`.
///
/// Every frame adds `(end - start) / (duration / FRAME)`. Frames below
/// `end` yield the floored value; the first frame at or past `end`
/// yields exactly `end` and is the last.
#[derive(Debug, Clone)]
pub struct CountUp {
    current: f64,
    increment: f64,
    end: u32,
    done: bool,
}

pub fn count_up_frames(start: u32, end: u32, duration: Duration) -> CountUp {
    let millis = f64::from(u32::try_from(duration.as_millis()).unwrap_or(u32::MAX));
    let frames = millis / f64::from(u32::try_from(FRAME.as_millis()).unwrap_or(16));

    let increment = if start >= end || frames < 1.0 {
        f64::INFINITY
    } else {
        (f64::from(end) - f64::from(start)) / frames
    };

    CountUp {
        current: f64::from(start),
        increment,
        end,
        done: false,
    }
}

impl Iterator for CountUp {
    type Item = u32;

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::as_conversions
    )]
    fn next(&mut self) -> Option<u32> {
        if self.done {
            return None;
        }
        self.current += self.increment;
        if self.current < f64::from(self.end) {
            Some(self.current.floor() as u32)
        } else {
            self.done = true;
            Some(self.end)
        }
    }
}

/// Count region `element_id` up from `start` to `end` over `duration`.
///
/// Returns `None` without spawning anything if the target has no such
/// region. The task cannot be cancelled; it ends after the final frame.
pub fn animate<T: RenderTarget + 'static>(
    target: &SharedTarget<T>,
    element_id: &str,
    start: u32,
    end: u32,
    duration: Duration,
) -> Option<JoinHandle<()>> {
    if !lock(target).has_region(element_id) {
        return None;
    }

    let target = Arc::clone(target);
    let element_id = element_id.to_owned();
    let frames = count_up_frames(start, end, duration);

    Some(tokio::spawn(async move {
        let mut interval = tokio::time::interval(FRAME);
        interval.tick().await; // consume the immediate first tick

        for value in frames {
            interval.tick().await;
            lock(&target).set_text(&element_id, &value.to_string());
        }
    }))
}

/// Show `text` in region `element_id` after `delay`.
fn set_text_after<T: RenderTarget + 'static>(
    target: &SharedTarget<T>,
    element_id: &'static str,
    text: String,
    delay: Duration,
) -> Option<JoinHandle<()>> {
    if !lock(target).has_region(element_id) {
        return None;
    }

    let target = Arc::clone(target);
    Some(tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        lock(&target).set_text(element_id, &text);
    }))
}

/// Start-up stat sequence: count the active projects up over 1.5s, then
/// reveal uptime at 0.5s and data processed at 1s.
pub fn present_stats<T: RenderTarget + 'static>(
    target: &SharedTarget<T>,
    stats: &AggregateStats,
) -> Vec<JoinHandle<()>> {
    [
        animate(
            target,
            STAT_PROJECTS,
            0,
            stats.active_projects,
            COUNT_UP_DURATION,
        ),
        set_text_after(
            target,
            STAT_UPTIME,
            stats.system_uptime.clone(),
            UPTIME_DELAY,
        ),
        set_text_after(target, STAT_DATA, stats.data_processed.clone(), DATA_DELAY),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Write the final stat values immediately, without animation.
pub fn present_stats_now<T: RenderTarget + ?Sized>(target: &mut T, stats: &AggregateStats) {
    target.set_text(STAT_PROJECTS, &stats.active_projects.to_string());
    target.set_text(STAT_UPTIME, &stats.system_uptime);
    target.set_text(STAT_DATA, &stats.data_processed);
}

use crate::config::Config;
use crate::updater::{self, SharedReport};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, Timelike, Utc, Weekday};
use odds_processor::types::League;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

const CHECK_EVERY: Duration = Duration::from_secs(60);

/// Late ticks inside this window still fire the slot
const GRACE_MINUTES: u32 = 59;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub weekday: Weekday,
    pub hour: u32,
    pub minute: u32,
    /// Label for log lines, not a filter on what gets updated
    pub league: League,
}

/// Tuesday evening after Monday night football, Wednesday afternoon for
/// college lines. Every slot runs a full update of all leagues; `league`
/// only names the slot in the logs.
pub const SLOTS: [Slot; 2] = [
    Slot {
        weekday: Weekday::Tue,
        hour: 18,
        minute: 0,
        league: League::Nfl,
    },
    Slot {
        weekday: Weekday::Wed,
        hour: 14,
        minute: 0,
        league: League::Cfb,
    },
];

pub struct Scheduler {
    offset: FixedOffset,
    slots: Vec<Slot>,
    last_fired: Vec<Option<NaiveDate>>,
}

impl Scheduler {
    pub fn new(offset: FixedOffset, slots: &[Slot]) -> Self {
        Self {
            offset,
            slots: slots.to_vec(),
            last_fired: vec![None; slots.len()],
        }
    }

    /// Slots that should run at `now`. Each slot fires at most once per
    /// local date.
    pub fn due(&mut self, now: DateTime<Utc>) -> Vec<Slot> {
        let local = now.with_timezone(&self.offset);
        let today = local.date_naive();
        let minute_of_day = local.hour() * 60 + local.minute();

        let mut due = Vec::new();
        for (slot, last) in self.slots.iter().zip(self.last_fired.iter_mut()) {
            if local.weekday() != slot.weekday || *last == Some(today) {
                continue;
            }
            let start = slot.hour * 60 + slot.minute;
            if (start..=start + GRACE_MINUTES).contains(&minute_of_day) {
                *last = Some(today);
                due.push(*slot);
            }
        }
        due
    }
}

impl Slot {
    pub fn time(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0)
    }
}

/// Tick every minute and run a full update whenever a slot comes due.
pub async fn run_forever(config: Config, latest: SharedReport) {
    let mut scheduler = Scheduler::new(config.utc_offset, &SLOTS);
    let mut ticker = interval(CHECK_EVERY);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!("⏰ Scheduler active");
    for slot in &SLOTS {
        if let Some(time) = slot.time() {
            info!("📅 {} updates: every {} at {}", slot.league, slot.weekday, time.format("%H:%M"));
        }
    }

    loop {
        ticker.tick().await;
        for slot in scheduler.due(Utc::now()) {
            info!("🏈 {} {} update triggered", slot.weekday, slot.league);
            match updater::run_update(&config).await {
                Ok(report) => {
                    *latest.write().await = Some(report);
                }
                Err(e) => error!("Scheduled update failed: {:#}", e),
            }
        }
    }
}

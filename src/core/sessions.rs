use chrono::{NaiveTime, Timelike};

pub const SESSION_START_HOUR: u32 = 7;
pub const CYCLE_DURATION: i64 = 80;
pub const CYCLE_COUNT: usize = 7;

/// The trading session split into fixed-length cycles, starting at
/// `start_hour` on the exchange clock of the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionWindow {
    pub start_hour: u32,
    pub cycle_minutes: i64,
    pub cycle_count: usize,
}

impl Default for SessionWindow {
    fn default() -> Self {
        Self {
            start_hour: SESSION_START_HOUR,
            cycle_minutes: CYCLE_DURATION,
            cycle_count: CYCLE_COUNT,
        }
    }
}

impl SessionWindow {
    /// Minutes elapsed since session open; negative before the open.
    pub fn minutes_since_start(&self, time: NaiveTime) -> i64 {
        (time.hour() as i64 - self.start_hour as i64) * 60 + time.minute() as i64
    }

    /// Floor-divided cycle number, possibly outside the session.
    pub fn raw_cycle(&self, time: NaiveTime) -> i64 {
        self.minutes_since_start(time).div_euclid(self.cycle_minutes)
    }

    /// Cycle index for a time of day, `None` outside the session.
    pub fn cycle_for(&self, time: NaiveTime) -> Option<usize> {
        let cycle = self.raw_cycle(time);
        if cycle >= 0 && (cycle as usize) < self.cycle_count {
            Some(cycle as usize)
        } else {
            None
        }
    }

    pub fn cycles(&self) -> std::ops::Range<usize> {
        0..self.cycle_count
    }

    /// Display range such as "08:20 - 09:40".
    pub fn label(&self, cycle: usize) -> String {
        let start = self.start_hour as i64 * 60 + cycle as i64 * self.cycle_minutes;
        let end = start + self.cycle_minutes;
        format!(
            "{:02}:{:02} - {:02}:{:02}",
            start / 60,
            start % 60,
            end / 60,
            end % 60
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn session_open_is_cycle_zero() {
        let w = SessionWindow::default();
        assert_eq!(w.cycle_for(at(7, 0)), Some(0));
        assert_eq!(w.cycle_for(at(8, 19)), Some(0));
    }

    #[test]
    fn boundary_belongs_to_next_cycle() {
        let w = SessionWindow::default();
        assert_eq!(w.cycle_for(at(8, 20)), Some(1));
        assert_eq!(w.cycle_for(at(11, 0)), Some(3));
        assert_eq!(w.cycle_for(at(16, 19)), Some(6));
    }

    #[test]
    fn outside_session_is_excluded() {
        let w = SessionWindow::default();
        assert_eq!(w.raw_cycle(at(6, 59)), -1);
        assert_eq!(w.cycle_for(at(6, 59)), None);
        assert_eq!(w.raw_cycle(at(16, 20)), 7);
        assert_eq!(w.cycle_for(at(16, 20)), None);
        assert_eq!(w.cycle_for(at(0, 0)), None);
    }

    #[test]
    fn labels_cover_the_session() {
        let w = SessionWindow::default();
        let labels: Vec<String> = w.cycles().map(|c| w.label(c)).collect();
        assert_eq!(
            labels,
            vec![
                "07:00 - 08:20",
                "08:20 - 09:40",
                "09:40 - 11:00",
                "11:00 - 12:20",
                "12:20 - 13:40",
                "13:40 - 15:00",
                "15:00 - 16:20",
            ]
        );
    }
}

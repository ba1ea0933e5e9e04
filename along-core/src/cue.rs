//! Time-indexed caption table and the lookup that syncs it to playback.

use crate::error::{CoreError, Result};
use std::time::Duration;

/// A single timestamped caption line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricCue {
    /// Offset from the start of the media
    pub time: Duration,
    pub text: String,
}

impl LyricCue {
    #[must_use]
    pub fn new(time: Duration, text: impl Into<String>) -> Self {
        Self {
            time,
            text: text.into(),
        }
    }
}

/// The caption timeline played with the song.
const BUILTIN_TIMELINE: [(u64, &str); 8] = [
    (0, "Hôm nay là Valentine đó 🌷"),
    (10, "Nhưng mình nghĩ, không chỉ dành cho tình yêu đâu."),
    (20, "Có những người mình quý theo cách rất hiền."),
    (30, "Và bạn là một trong số đó."),
    (40, "Nếu hôm nay mệt, cứ nghe bài này nha."),
    (50, "Không cần trả lời, không cần suy nghĩ."),
    (60, "Chỉ là… nghe cùng nhau một chút thôi."),
    (70, "Come along with me 💛"),
];

/// Immutable cue table, non-empty and strictly ascending by time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueTable {
    cues: Vec<LyricCue>,
}

impl CueTable {
    /// Build a table from cues that are already in playback order.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyCueTable`] for an empty list and
    /// [`CoreError::UnorderedCue`] when a cue does not start strictly after its
    /// predecessor.
    pub fn new(cues: Vec<LyricCue>) -> Result<Self> {
        if cues.is_empty() {
            return Err(CoreError::EmptyCueTable);
        }
        if let Some(index) = cues
            .windows(2)
            .position(|pair| pair[1].time <= pair[0].time)
        {
            return Err(CoreError::UnorderedCue { index: index + 1 });
        }
        Ok(Self { cues })
    }

    /// The timeline bundled with the greeting.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            cues: BUILTIN_TIMELINE
                .iter()
                .map(|(secs, text)| LyricCue::new(Duration::from_secs(*secs), *text))
                .collect(),
        }
    }

    /// Parse LRC text (`[mm:ss.xx]text` lines) into a cue table.
    ///
    /// ID tags are skipped except `[offset:ms]`, which shifts every cue.
    /// Lines carrying several timestamps produce one cue per timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::LrcParseError`] if no timed line is found, or the
    /// errors of [`CueTable::new`] if two lines share a timestamp.
    pub fn parse_lrc(input: &str) -> Result<Self> {
        let mut offset_ms: i64 = 0;
        let mut cues = Vec::new();

        for line in input.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some((tag, value)) = parse_id_tag(line) {
                if tag.eq_ignore_ascii_case("offset") {
                    offset_ms = value.parse().map_err(|_| CoreError::LrcParseError {
                        reason: format!("invalid offset `{value}`"),
                    })?;
                }
                continue;
            }

            if let Some(parsed) = parse_lyric_line(line) {
                cues.extend(parsed);
            }
        }

        if cues.is_empty() {
            return Err(CoreError::LrcParseError {
                reason: "no timed lines found".into(),
            });
        }

        if offset_ms != 0 {
            for cue in &mut cues {
                cue.time = apply_offset(cue.time, offset_ms);
            }
        }

        cues.sort_by_key(|cue| cue.time);
        Self::new(cues)
    }

    /// Index of the cue active at `position`: the last cue with
    /// `time <= position`, or `None` before the first cue.
    #[must_use]
    pub fn active_index(&self, position: Duration) -> Option<usize> {
        self.cues
            .partition_point(|cue| cue.time <= position)
            .checked_sub(1)
    }

    /// Same as [`CueTable::active_index`] for a position in floating seconds.
    ///
    /// Negative or non-finite positions are before every cue.
    #[must_use]
    pub fn active_index_secs(&self, position_secs: f64) -> Option<usize> {
        crate::time::duration_from_secs_f64(position_secs).and_then(|p| self.active_index(p))
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&LyricCue> {
        self.cues.get(index)
    }

    #[must_use]
    pub fn last(&self) -> &LyricCue {
        // Construction guarantees at least one cue.
        &self.cues[self.cues.len() - 1]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cues.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, LyricCue> {
        self.cues.iter()
    }
}

impl Default for CueTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Parse an ID tag like [ti:Title] or [offset:500]
fn parse_id_tag(line: &str) -> Option<(&str, &str)> {
    let content = line.strip_prefix('[')?;
    let end = content.find(']')?;
    let content = &content[..end];
    let (tag, value) = content.split_once(':')?;

    // A numeric tag is a timestamp, not an ID tag
    if tag.is_empty() || tag.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    Some((tag.trim(), value.trim()))
}

/// Parse a lyric line like [00:12.34]Hello or [00:12.34][00:15.67]Same lyrics
fn parse_lyric_line(line: &str) -> Option<Vec<LyricCue>> {
    let mut remaining = line;
    let mut timestamps = Vec::new();

    while let Some(rest) = remaining.strip_prefix('[') {
        let Some(end) = rest.find(']') else {
            break;
        };
        let Some(time) = parse_timestamp(&rest[..end]) else {
            break;
        };
        timestamps.push(time);
        remaining = &rest[end + 1..];
    }

    if timestamps.is_empty() {
        return None;
    }

    let text = remaining.trim();
    Some(
        timestamps
            .into_iter()
            .map(|time| LyricCue::new(time, text))
            .collect(),
    )
}

/// Parse a timestamp like "00:12.34", "00:12:34" (hundredths) or "00:12"
fn parse_timestamp(s: &str) -> Option<Duration> {
    let parts: Vec<&str> = s.trim().split(':').collect();

    match parts.as_slice() {
        [minutes, seconds] => {
            let minutes: u64 = minutes.parse().ok()?;
            let seconds: f64 = seconds.parse().ok()?;
            let seconds = Duration::try_from_secs_f64(seconds).ok()?;
            Duration::from_secs(minutes.checked_mul(60)?).checked_add(seconds)
        }
        [minutes, seconds, hundredths] => {
            let minutes: u64 = minutes.parse().ok()?;
            let seconds: u64 = seconds.parse().ok()?;
            let hundredths: u64 = hundredths.parse().ok()?;
            let millis = minutes
                .checked_mul(60_000)?
                .checked_add(seconds.checked_mul(1000)?)?
                .checked_add(hundredths.checked_mul(10)?)?;
            Some(Duration::from_millis(millis))
        }
        _ => None,
    }
}

/// Apply a millisecond offset to a duration (can be negative), saturating
/// at both ends
fn apply_offset(duration: Duration, offset_ms: i64) -> Duration {
    let shift = Duration::from_millis(offset_ms.unsigned_abs());
    if offset_ms >= 0 {
        duration.saturating_add(shift)
    } else {
        duration.saturating_sub(shift)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> CueTable {
        CueTable::new(vec![
            LyricCue::new(Duration::from_secs(0), "A"),
            LyricCue::new(Duration::from_secs(10), "B"),
            LyricCue::new(Duration::from_secs(20), "C"),
        ])
        .unwrap()
    }

    #[test]
    fn test_active_index_between_cues() {
        let table = abc();
        assert_eq!(table.active_index(Duration::from_secs(15)), Some(1));
        assert_eq!(table.active_index(Duration::from_secs(5)), Some(0));
    }

    #[test]
    fn test_active_index_negative_is_none() {
        assert_eq!(abc().active_index_secs(-1.0), None);
    }

    #[test]
    fn test_active_index_exact_boundaries() {
        let table = abc();
        assert_eq!(table.active_index(Duration::ZERO), Some(0));
        assert_eq!(table.active_index(Duration::from_secs(10)), Some(1));
        assert_eq!(
            table.active_index(Duration::from_millis(19_999)),
            Some(1)
        );
        assert_eq!(table.active_index(Duration::from_secs(20)), Some(2));
        assert_eq!(table.active_index(Duration::from_secs(3600)), Some(2));
    }

    #[test]
    fn test_active_index_before_late_first_cue() {
        let table = CueTable::new(vec![LyricCue::new(Duration::from_secs(3), "late")]).unwrap();
        assert_eq!(table.active_index(Duration::from_secs(2)), None);
        assert_eq!(table.active_index(Duration::from_secs(3)), Some(0));
    }

    #[test]
    fn test_active_index_matches_linear_scan() {
        let table = CueTable::builtin();
        for tenth in 0..900u64 {
            let position = Duration::from_millis(tenth * 100);
            let expected = table
                .iter()
                .enumerate()
                .rev()
                .find(|(_, cue)| cue.time <= position)
                .map(|(i, _)| i);
            assert_eq!(table.active_index(position), expected, "at {position:?}");
        }
    }

    #[test]
    fn test_builtin_timeline() {
        let table = CueTable::builtin();
        assert_eq!(table.len(), 8);
        assert_eq!(table.last().time, Duration::from_secs(70));
        assert_eq!(table.last().text, "Come along with me 💛");
    }

    #[test]
    fn test_new_rejects_empty() {
        assert!(matches!(CueTable::new(vec![]), Err(CoreError::EmptyCueTable)));
    }

    #[test]
    fn test_new_rejects_duplicate_time() {
        let result = CueTable::new(vec![
            LyricCue::new(Duration::from_secs(1), "a"),
            LyricCue::new(Duration::from_secs(1), "b"),
        ]);
        assert!(matches!(result, Err(CoreError::UnorderedCue { index: 1 })));
    }

    #[test]
    fn test_new_rejects_descending() {
        let result = CueTable::new(vec![
            LyricCue::new(Duration::from_secs(1), "a"),
            LyricCue::new(Duration::from_secs(5), "b"),
            LyricCue::new(Duration::from_secs(2), "c"),
        ]);
        assert!(matches!(result, Err(CoreError::UnorderedCue { index: 2 })));
    }

    #[test]
    fn test_parse_lrc_sorts_lines() {
        let input = r"
[ti:Come Along With Me]
[00:15.00]Third
[00:05.00]First
[00:10.00]Second
";
        let table = CueTable::parse_lrc(input).unwrap();
        let texts: Vec<_> = table.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, ["First", "Second", "Third"]);
    }

    #[test]
    fn test_parse_lrc_offset() {
        let input = "[offset:-500]\n[00:10.00]Test";
        let table = CueTable::parse_lrc(input).unwrap();
        assert_eq!(table.last().time, Duration::from_millis(9500));
    }

    #[test]
    fn test_parse_lrc_multi_timestamp_line() {
        let table = CueTable::parse_lrc("[00:05.00][00:15.00]Repeated").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1).unwrap().time, Duration::from_secs(15));
        assert_eq!(table.get(1).unwrap().text, "Repeated");
    }

    #[test]
    fn test_parse_lrc_hundredths_format() {
        let table = CueTable::parse_lrc("[00:12:34]Hello").unwrap();
        assert_eq!(table.last().time, Duration::from_millis(12_340));
    }

    #[test]
    fn test_parse_lrc_without_timed_lines() {
        let result = CueTable::parse_lrc("[ti:Only tags]\nplain text");
        assert!(matches!(result, Err(CoreError::LrcParseError { .. })));
    }

    #[test]
    fn test_parse_lrc_overflowing_timestamps_are_rejected() {
        let result = CueTable::parse_lrc("[307445734561825861:00.00]x");
        assert!(matches!(result, Err(CoreError::LrcParseError { .. })));

        let result = CueTable::parse_lrc("[307445734561825861:00:00]x");
        assert!(matches!(result, Err(CoreError::LrcParseError { .. })));
    }

    #[test]
    fn test_parse_lrc_skips_overflowing_line() {
        let table = CueTable::parse_lrc("[999999999999999999:59.00]huge\n[00:02.00]ok").unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.last().text, "ok");
    }

    #[test]
    fn test_parse_lrc_huge_offset_does_not_overflow() {
        let table = CueTable::parse_lrc(&format!("[offset:{}]\n[00:01.00]x", i64::MAX)).unwrap();
        assert!(table.last().time > Duration::from_secs(1));

        let table = CueTable::parse_lrc(&format!("[offset:{}]\n[00:01.00]x", i64::MIN)).unwrap();
        assert_eq!(table.last().time, Duration::ZERO);
    }

    #[test]
    fn test_parse_lrc_bad_offset() {
        let result = CueTable::parse_lrc("[offset:soon]\n[00:01.00]x");
        assert!(matches!(result, Err(CoreError::LrcParseError { .. })));
    }
}

//! JSON Lines event stream adapter.
//!
//! Each input line holds one [`DisplayEvent`] plus an optional RFC 3339
//! `time` field. Timed events are placed on a monotonic clock anchored at the
//! first timestamp seen, so a recorded stream replays with its original
//! durations. Lines without `time` use the wall clock.

use std::io::Write;
use std::time::Instant;

use chrono::{DateTime, FixedOffset};
use prettify::callback::{DisplayEvent, EventTracker};
use prettify::error::{Error, Result};
use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

/// One decoded input line.
#[derive(Debug, Deserialize)]
struct WireEvent {
    #[serde(flatten)]
    event: DisplayEvent,
    #[serde(default)]
    time: Option<String>,
}

/// Maps recorded timestamps onto [`Instant`]s.
#[derive(Debug, Default)]
pub struct ReplayClock {
    anchor: Option<(DateTime<FixedOffset>, Instant)>,
}

impl ReplayClock {
    /// Create a clock with no anchor yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the instant for an event recorded at `stamp`.
    pub fn instant_for(&mut self, stamp: DateTime<FixedOffset>) -> Instant {
        let (base, base_instant) = *self.anchor.get_or_insert_with(|| (stamp, Instant::now()));
        let offset = stamp.signed_duration_since(base);
        match offset.to_std() {
            Ok(forward) => base_instant + forward,
            // Out-of-order stamps before the anchor
            Err(_) => offset
                .abs()
                .to_std()
                .ok()
                .and_then(|back| base_instant.checked_sub(back))
                .unwrap_or(base_instant),
        }
    }
}

/// Decode one line. `line_no` is 1-based and only used for errors.
fn decode_line(
    line: &str,
    line_no: usize,
    clock: &mut ReplayClock,
) -> Result<(DisplayEvent, Instant)> {
    let wire: WireEvent =
        serde_json::from_str(line).map_err(|source| Error::decode(line_no, source))?;

    let at = match wire.time {
        Some(value) => {
            let stamp = DateTime::parse_from_rfc3339(value.trim()).map_err(|_| {
                Error::InvalidTimestamp {
                    line: line_no,
                    value: value.clone(),
                }
            })?;
            clock.instant_for(stamp)
        }
        None => Instant::now(),
    };

    Ok((wire.event, at))
}

/// Feed every event of `reader` to `tracker`. Undecodable lines are skipped.
///
/// Returns the number of events handled.
pub async fn run_stream<R, W>(reader: R, tracker: &mut EventTracker<W>) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = reader.lines();
    let mut clock = ReplayClock::new();
    let mut line_no = 0;
    let mut handled = 0;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }

        match decode_line(&line, line_no, &mut clock) {
            Ok((event, at)) => {
                debug!("Line {}: {}", line_no, event.event_type());
                tracker.handle_at(&event, at)?;
                handled += 1;
            }
            Err(e) if e.is_recoverable() => warn!("Skipping input: {}", e),
            Err(e) => return Err(e),
        }
    }

    Ok(handled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use prettify::callback::PrettifyConfig;
    use std::time::Duration;

    fn tracker() -> EventTracker<Vec<u8>> {
        let config = PrettifyConfig {
            use_colors: false,
            width: Some(60),
            ..PrettifyConfig::default()
        };
        EventTracker::new(Vec::new(), config)
    }

    fn stamp(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn test_replay_clock_keeps_offsets() {
        let mut clock = ReplayClock::new();
        let first = clock.instant_for(stamp("2026-01-01T10:00:00Z"));
        let later = clock.instant_for(stamp("2026-01-01T10:00:01.250Z"));
        assert_eq!(later - first, Duration::from_millis(1_250));
    }

    #[test]
    fn test_replay_clock_handles_earlier_stamp() {
        let mut clock = ReplayClock::new();
        let first = clock.instant_for(stamp("2026-01-01T10:00:05Z"));
        let earlier = clock.instant_for(stamp("2026-01-01T10:00:04Z"));
        assert!(earlier <= first);
    }

    #[test]
    fn test_decode_line_errors() {
        let mut clock = ReplayClock::new();
        let err = decode_line("{not json", 4, &mut clock).unwrap_err();
        assert!(matches!(err, Error::Decode { line: 4, .. }));

        let err = decode_line(
            r#"{"event_type":"play_started","name":"x","time":"yesterday"}"#,
            7,
            &mut clock,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidTimestamp { line: 7, .. }));
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn test_run_stream_renders_and_skips_bad_lines() {
        let input = concat!(
            r#"{"event_type":"run_started","engine_version":"2.15.3","time":"2026-01-01T10:00:00Z"}"#,
            "\n",
            r#"{"event_type":"play_started","name":"Deploy","time":"2026-01-01T10:00:00Z"}"#,
            "\n",
            "garbage\n",
            "\n",
            r#"{"event_type":"task_started","task":{"name":"Install package","action":"apt"},"time":"2026-01-01T10:00:00Z"}"#,
            "\n",
            r#"{"event_type":"task_result","host":"web1","task":{"name":"Install package","action":"apt"},"outcome":{"status":"ok","changed":true},"time":"2026-01-01T10:00:00.120Z"}"#,
            "\n",
        );

        let mut tracker = tracker();
        let handled = run_stream(input.as_bytes(), &mut tracker).await.unwrap();
        assert_eq!(handled, 4);

        let output = String::from_utf8(tracker.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[1], "PLAY [Deploy]");
        let last = lines.last().copied().unwrap_or_default();
        assert!(last.starts_with("  ~ Install package ..."));
        assert!(last.ends_with("...120ms CHANGED    "));
        assert_eq!(last.chars().count(), 60);
    }
}

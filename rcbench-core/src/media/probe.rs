//! FFprobe integration for clip geometry and frame counts
//!
//! This module runs ffprobe against a clip, deserializes the JSON it prints
//! and resolves width, height, frame rate, duration and frame count. When the
//! container does not report a frame count, it is estimated from duration and
//! frame rate.

use serde::Deserialize;
use std::ffi::OsString;

use super::info::ClipInfo;
use crate::config::ClipSpec;
use crate::error::{CoreError, CoreResult, command_failed_error};
use crate::external::ProcessRunner;

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    #[serde(default)]
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<i64>,
    height: Option<i64>,
    avg_frame_rate: Option<String>,
    nb_frames: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

/// Fields resolved from one ffprobe response.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeFields {
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
    pub duration_s: f64,
    pub frames: u64,
    pub frames_estimated: bool,
}

/// Parses a `num/den` rate. A zero denominator yields `default_fps`.
///
/// A bare number is accepted as `num/1`. Returns `None` for text that is not
/// a rate at all.
pub fn parse_frame_rate(rate: &str, default_fps: f64) -> Option<f64> {
    let rate = rate.trim();
    let (num, den) = rate.split_once('/').unwrap_or((rate, "1"));
    let num: f64 = num.trim().parse().ok()?;
    let den: f64 = den.trim().parse().ok()?;
    if den == 0.0 {
        return Some(default_fps);
    }
    let fps = num / den;
    fps.is_finite().then_some(fps)
}

/// Resolves the frame count from the reported `nb_frames` field.
///
/// Absent, `N/A`, empty or zero counts are estimated as
/// `round(duration × frame_rate)` when both are positive. Otherwise the
/// reported integer is used; `None` means there was nothing usable.
pub fn resolve_frame_count(
    reported: Option<&str>,
    duration_s: f64,
    frame_rate: f64,
) -> Option<(u64, bool)> {
    let reported = reported.map(str::trim).unwrap_or("");
    let unreported = matches!(reported, "" | "0" | "N/A");

    if unreported && duration_s > 0.0 && frame_rate > 0.0 {
        return Some(((duration_s * frame_rate).round_ties_even() as u64, true));
    }
    if reported.is_empty() {
        return None;
    }
    reported.parse::<u64>().ok().map(|n| (n, false))
}

/// Parses ffprobe JSON into resolved clip fields.
pub fn parse_probe_output(json: &str, default_fps: f64) -> CoreResult<ProbeFields> {
    let output: ProbeOutput = serde_json::from_str(json)
        .map_err(|e| CoreError::JsonParse(format!("ffprobe output: {e}")))?;

    let stream = output
        .streams
        .first()
        .ok_or_else(|| CoreError::Probe("no video stream reported".to_string()))?;

    let dimension = |value: Option<i64>, what: &str| -> CoreResult<u32> {
        let value = value.ok_or_else(|| CoreError::Probe(format!("missing {what}")))?;
        u32::try_from(value).map_err(|_| CoreError::Probe(format!("invalid {what}: {value}")))
    };
    let width = dimension(stream.width, "width")?;
    let height = dimension(stream.height, "height")?;

    let rate_text = stream.avg_frame_rate.as_deref().unwrap_or("0/0");
    let frame_rate = parse_frame_rate(rate_text, default_fps)
        .ok_or_else(|| CoreError::Probe(format!("invalid frame rate '{rate_text}'")))?;

    let duration_s = match output.format.as_ref().and_then(|f| f.duration.as_deref()) {
        Some(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| CoreError::Probe(format!("invalid duration '{text}'")))?,
        None => 0.0,
    };

    let (frames, frames_estimated) =
        resolve_frame_count(stream.nb_frames.as_deref(), duration_s, frame_rate).ok_or_else(
            || {
                CoreError::Probe(format!(
                    "frame count '{}' unusable and cannot be estimated",
                    stream.nb_frames.as_deref().unwrap_or("")
                ))
            },
        )?;

    Ok(ProbeFields {
        width,
        height,
        frame_rate,
        duration_s,
        frames,
        frames_estimated,
    })
}

/// Queries clip metadata through an external ffprobe.
pub struct ClipProber<'a, R: ProcessRunner> {
    runner: &'a R,
    ffprobe: String,
    default_fps: f64,
}

impl<'a, R: ProcessRunner> ClipProber<'a, R> {
    pub fn new(runner: &'a R, ffprobe: impl Into<String>, default_fps: f64) -> Self {
        Self {
            runner,
            ffprobe: ffprobe.into(),
            default_fps,
        }
    }

    fn probe_args(clip: &ClipSpec) -> Vec<OsString> {
        let mut args: Vec<OsString> = [
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height,avg_frame_rate,nb_frames",
            "-show_entries",
            "format=duration",
            "-of",
            "json",
        ]
        .into_iter()
        .map(OsString::from)
        .collect();
        args.push(clip.path.clone().into_os_string());
        args
    }

    /// Resolves a clip's metadata. Any failure is fatal for that clip.
    pub fn probe(&self, clip: &ClipSpec) -> CoreResult<ClipInfo> {
        log::debug!("Probing {} ({})", clip.id, clip.path.display());

        let output = self.runner.run(&self.ffprobe, &Self::probe_args(clip))?;
        if !output.succeeded() {
            log::error!("ffprobe failed for {}: {}", clip.path.display(), output.stderr.trim());
            return Err(command_failed_error(
                format!("{} ({})", self.ffprobe, clip.path.display()),
                output.code,
                output.stderr.trim().to_string(),
            ));
        }

        let fields = parse_probe_output(&output.stdout, self.default_fps).map_err(|e| {
            CoreError::Probe(format!("{}: {}", clip.path.display(), e))
        })?;

        if fields.frames_estimated {
            log::warn!(
                "{}: frame count not reported, estimated {} from {:.3}s at {:.3} fps",
                clip.id,
                fields.frames,
                fields.duration_s,
                fields.frame_rate
            );
        }

        Ok(ClipInfo {
            clip_id: clip.id.clone(),
            path: clip.path.clone(),
            width: fields.width,
            height: fields.height,
            frame_rate: fields.frame_rate,
            duration_s: fields.duration_s,
            frames: fields.frames,
            frames_estimated: fields.frames_estimated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::{MockProcessRunner, ProcessOutput};

    const REPORTED: &str = r#"{
        "programs": [],
        "streams": [
            { "width": 1280, "height": 720, "avg_frame_rate": "30/1", "nb_frames": "300" }
        ],
        "format": { "duration": "10.000000" }
    }"#;

    #[test]
    fn test_parse_frame_rate() {
        assert_eq!(parse_frame_rate("30/1", 25.0), Some(30.0));
        assert!((parse_frame_rate("30000/1001", 25.0).unwrap() - 29.97003).abs() < 1e-5);
        assert_eq!(parse_frame_rate("0/0", 25.0), Some(25.0));
        assert_eq!(parse_frame_rate("24", 25.0), Some(24.0));
        assert_eq!(parse_frame_rate("abc", 25.0), None);
    }

    #[test]
    fn test_resolve_frame_count_reported() {
        assert_eq!(resolve_frame_count(Some("300"), 10.0, 30.0), Some((300, false)));
    }

    #[test]
    fn test_resolve_frame_count_fallback() {
        assert_eq!(resolve_frame_count(Some("N/A"), 10.0, 30.0), Some((300, true)));
        assert_eq!(resolve_frame_count(Some("0"), 10.0, 29.97), Some((300, true)));
        assert_eq!(resolve_frame_count(None, 10.0, 30.0), Some((300, true)));
    }

    #[test]
    fn test_resolve_frame_count_ties_round_to_even() {
        assert_eq!(resolve_frame_count(Some("N/A"), 10.02, 25.0), Some((250, true)));
        assert_eq!(resolve_frame_count(Some("N/A"), 0.5, 25.0), Some((12, true)));
        assert_eq!(resolve_frame_count(Some("N/A"), 0.54, 25.0), Some((14, true)));
    }

    #[test]
    fn test_resolve_frame_count_unusable() {
        assert_eq!(resolve_frame_count(Some("N/A"), 0.0, 30.0), None);
        assert_eq!(resolve_frame_count(None, 10.0, 0.0), None);
        // A reported zero with nothing to estimate from stays zero.
        assert_eq!(resolve_frame_count(Some("0"), 0.0, 30.0), Some((0, false)));
    }

    #[test]
    fn test_parse_probe_output() {
        let fields = parse_probe_output(REPORTED, 30.0).unwrap();
        assert_eq!(fields.width, 1280);
        assert_eq!(fields.height, 720);
        assert_eq!(fields.frame_rate, 30.0);
        assert_eq!(fields.duration_s, 10.0);
        assert_eq!(fields.frames, 300);
        assert!(!fields.frames_estimated);
    }

    #[test]
    fn test_parse_probe_output_na_frames() {
        let json = r#"{"streams":[{"width":1280,"height":720,"avg_frame_rate":"30/1","nb_frames":"N/A"}],
                       "format":{"duration":"10.0"}}"#;
        let fields = parse_probe_output(json, 30.0).unwrap();
        assert_eq!(fields.frames, 300);
        assert!(fields.frames_estimated);
    }

    #[test]
    fn test_parse_probe_output_zero_denominator_uses_default() {
        let json = r#"{"streams":[{"width":640,"height":360,"avg_frame_rate":"0/0"}],
                       "format":{"duration":"4.0"}}"#;
        let fields = parse_probe_output(json, 25.0).unwrap();
        assert_eq!(fields.frame_rate, 25.0);
        assert_eq!(fields.frames, 100);
    }

    #[test]
    fn test_parse_probe_output_malformed() {
        assert!(matches!(parse_probe_output("not json", 30.0), Err(CoreError::JsonParse(_))));
        assert!(matches!(
            parse_probe_output(r#"{"streams":[]}"#, 30.0),
            Err(CoreError::Probe(_))
        ));
        assert!(matches!(
            parse_probe_output(
                r#"{"streams":[{"height":720,"avg_frame_rate":"30/1","nb_frames":"3"}]}"#,
                30.0,
            ),
            Err(CoreError::Probe(_))
        ));
        assert!(matches!(
            parse_probe_output(
                r#"{"streams":[{"width":1,"height":1,"avg_frame_rate":"30/1","nb_frames":"3"}],"format":{"duration":"x"}}"#,
                30.0
            ),
            Err(CoreError::Probe(_))
        ));
    }

    #[test]
    fn test_prober_runs_ffprobe_with_json_output() {
        let runner = MockProcessRunner::new();
        runner.expect("ffprobe", ProcessOutput::success(REPORTED));
        let prober = ClipProber::new(&runner, "ffprobe", 30.0);

        let info = prober.probe(&ClipSpec::new("T1", "traffic_720p30.mp4")).unwrap();
        assert_eq!(info.clip_id, "T1");
        assert_eq!(info.frames, 300);

        let calls = runner.get_received_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1.last().map(String::as_str), Some("traffic_720p30.mp4"));
        assert!(calls[0].1.contains(&"json".to_string()));
    }

    #[test]
    fn test_prober_nonzero_exit_is_error() {
        let runner = MockProcessRunner::new();
        runner.expect(
            "ffprobe",
            ProcessOutput {
                code: Some(1),
                stdout: String::new(),
                stderr: "missing.mp4: No such file or directory".to_string(),
            },
        );
        let prober = ClipProber::new(&runner, "ffprobe", 30.0);
        let err = prober.probe(&ClipSpec::new("X", "missing.mp4")).unwrap_err();
        assert!(matches!(err, CoreError::CommandFailed { .. }));
    }
}

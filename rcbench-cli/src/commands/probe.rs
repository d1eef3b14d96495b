//! Implementation of the 'probe' subcommand.
//!
//! Shows what the measurement pass would use to normalize a clip: its
//! geometry, frame rate, duration and frame count. The frame rate default and
//! ffprobe binary resolve the same way they do for `run`.

use rcbench_core::config::{BenchConfig, ClipSpec};
use rcbench_core::external::{ProcessRunner, SystemProcessRunner};
use rcbench_core::media::{ClipInfo, ClipProber};
use rcbench_core::terminal;

use super::load_config;
use crate::cli::ProbeArgs;
use crate::error::CliResult;

/// ffprobe binary and default frame rate for a probe. Flags win over config.
pub fn probe_settings(args: &ProbeArgs, config: &BenchConfig) -> (String, f64) {
    let ffprobe = args
        .ffprobe
        .clone()
        .unwrap_or_else(|| config.tools.ffprobe.clone());
    let fps = args.default_fps.unwrap_or(config.default_frame_rate);
    (ffprobe, fps)
}

/// Probes one clip with `runner`.
pub fn probe_clip<R: ProcessRunner>(
    runner: &R,
    args: &ProbeArgs,
    config: &BenchConfig,
) -> CliResult<ClipInfo> {
    let (ffprobe, fps) = probe_settings(args, config);
    let prober = ClipProber::new(runner, ffprobe, fps);
    let id = args
        .path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "clip".to_string());
    prober.probe(&ClipSpec::new(id, args.path.clone()))
}

pub fn print_clip_info(info: &ClipInfo) {
    terminal::print_section("Clip");
    terminal::print_status("Path", &info.path.display().to_string(), false);
    terminal::print_status("Resolution", &format!("{}x{}", info.width, info.height), true);
    terminal::print_status("Megapixels", &format!("{:.4}", info.megapixels()), false);
    terminal::print_status("Frame rate", &format!("{:.3} fps", info.frame_rate), false);
    terminal::print_status("Duration", &format!("{:.3} s", info.duration_s), false);
    let frames = if info.frames_estimated {
        format!("{} (estimated)", info.frames)
    } else {
        info.frames.to_string()
    };
    terminal::print_status("Frames", &frames, true);
}

/// Entry point for `rcbench probe`.
pub fn run_probe(args: ProbeArgs) -> CliResult<()> {
    let config = load_config(args.config.as_deref())?;
    let info = probe_clip(&SystemProcessRunner, &args, &config)?;
    print_clip_info(&info);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcbench_core::external::{MockProcessRunner, ProcessOutput};
    use std::path::PathBuf;

    const NO_RATE: &str = r#"{"streams":[{"width":640,"height":360,"avg_frame_rate":"0/0","nb_frames":"N/A"}],"format":{"duration":"2.0"}}"#;

    fn args(default_fps: Option<f64>, ffprobe: Option<&str>) -> ProbeArgs {
        ProbeArgs {
            path: PathBuf::from("clips/sample.mp4"),
            default_fps,
            ffprobe: ffprobe.map(str::to_string),
            config: None,
        }
    }

    #[test]
    fn test_probe_clip_uses_default_fps_for_zero_denominator() {
        let runner = MockProcessRunner::new();
        runner.expect("ffprobe", ProcessOutput::success(NO_RATE));

        let info = probe_clip(&runner, &args(Some(25.0), None), &BenchConfig::default()).unwrap();
        assert_eq!(info.clip_id, "sample");
        assert_eq!(info.frame_rate, 25.0);
        assert_eq!(info.frames, 50);
        assert!(info.frames_estimated);
    }

    #[test]
    fn test_probe_follows_configured_frame_rate_and_tool() {
        let mut config = BenchConfig {
            default_frame_rate: 24.0,
            ..Default::default()
        };
        config.tools.ffprobe = "/opt/ffmpeg/bin/ffprobe".to_string();

        let runner = MockProcessRunner::new();
        runner.expect("/opt/ffmpeg/bin/ffprobe", ProcessOutput::success(NO_RATE));

        let info = probe_clip(&runner, &args(None, None), &config).unwrap();
        assert_eq!(info.frame_rate, 24.0);
        assert_eq!(info.frames, 48);
    }

    #[test]
    fn test_probe_flags_override_config() {
        let config = BenchConfig {
            default_frame_rate: 24.0,
            ..Default::default()
        };
        let (ffprobe, fps) = probe_settings(&args(Some(50.0), Some("ffprobe7")), &config);
        assert_eq!(ffprobe, "ffprobe7");
        assert_eq!(fps, 50.0);
    }
}

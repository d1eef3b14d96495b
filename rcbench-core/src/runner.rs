// ============================================================================
// rcbench-core/src/runner.rs
// ============================================================================
//
// VARIANT RUNNER: One Measured Encode
//
// Builds the argument list for a single (clip, variant, repeat) encode wrapped
// in `time -v`, runs it through a ProcessRunner and hands back the captured
// text. The text is never interpreted here; see `report` for that.
//
// KEY COMPONENTS:
// - OutputSink: where the encoded bitstream goes
// - VariantRunner: argument construction, invocation and audit logging
// - RunReport: raw report text plus a success flag

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{EncodeSettings, ToolPaths, Variant};
use crate::error::{CoreError, CoreResult};
use crate::external::{ProcessRunner, format_args_for_log};
use crate::media::ClipInfo;
use crate::utils::sanitize_name;

/// Null device used when encoded output is discarded.
pub const NULL_SINK: &str = "/dev/null";

/// Destination of the encoder's output bitstream.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OutputSink {
    /// Write to the null device
    #[default]
    Discard,
    /// Keep one file per (clip, variant) under this directory
    Scratch(PathBuf),
}

impl OutputSink {
    /// Output path for a clip/variant pair.
    pub fn target(&self, clip_id: &str, variant_name: &str) -> PathBuf {
        match self {
            Self::Discard => PathBuf::from(NULL_SINK),
            Self::Scratch(dir) => {
                dir.join(format!("{}__{}.mp4", clip_id, sanitize_name(variant_name)))
            }
        }
    }
}

/// Raw outcome of one measured run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Combined stdout and stderr of the wrapped encode
    pub text: String,
    /// True if the wrapper exited with status zero
    pub succeeded: bool,
}

/// Per-repeat audit log file name.
pub fn repeat_log_name(clip_id: &str, variant_name: &str, repeat: usize) -> String {
    format!("log__{}__{}__r{}.txt", clip_id, sanitize_name(variant_name), repeat)
}

/// Executes measured encodes for a fixed set of tools and settings.
pub struct VariantRunner<'a, R: ProcessRunner> {
    runner: &'a R,
    tools: &'a ToolPaths,
    encode: &'a EncodeSettings,
    sink: OutputSink,
    log_dir: Option<PathBuf>,
}

impl<'a, R: ProcessRunner> VariantRunner<'a, R> {
    pub fn new(runner: &'a R, tools: &'a ToolPaths, encode: &'a EncodeSettings) -> Self {
        Self {
            runner,
            tools,
            encode,
            sink: OutputSink::Discard,
            log_dir: None,
        }
    }

    pub fn with_sink(mut self, sink: OutputSink) -> Self {
        self.sink = sink;
        self
    }

    /// Enables per-repeat report logs under `dir`.
    pub fn with_log_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.log_dir = dir;
        self
    }

    /// Arguments passed to the time wrapper, starting with `-v`.
    pub fn build_args(&self, clip_path: &Path, clip_id: &str, variant: &Variant) -> Vec<OsString> {
        let enc = self.encode;
        let (qp, fps, gop) = (enc.qp.to_string(), enc.fps.to_string(), enc.gop.to_string());
        let mut args: Vec<OsString> = vec![
            "-v".into(),
            self.tools.ffmpeg.as_str().into(),
            "-y".into(),
            "-i".into(),
            clip_path.as_os_str().to_owned(),
        ];
        args.extend(
            [
                "-c:v",
                enc.codec.as_str(),
                "-qp",
                qp.as_str(),
                "-r",
                fps.as_str(),
                "-g",
                gop.as_str(),
                "-profile:v",
                enc.profile.as_str(),
                "-pix_fmt",
                enc.pix_fmt.as_str(),
                "-x264-params",
                variant.x264_params.as_str(),
                "-f",
                "mp4",
            ]
            .into_iter()
            .map(OsString::from),
        );
        args.push(self.sink.target(clip_id, &variant.name).into_os_string());
        args
    }

    /// Runs one measured encode and returns its report text.
    ///
    /// A wrapper that starts but exits non-zero is reported with
    /// `succeeded == false`. A failure to start is an error; callers treat
    /// both as a repeat with no measurements.
    pub fn run(&self, clip: &ClipInfo, variant: &Variant, repeat: usize) -> CoreResult<RunReport> {
        if let OutputSink::Scratch(dir) = &self.sink {
            fs::create_dir_all(dir)?;
        }

        let args = self.build_args(&clip.path, &clip.clip_id, variant);
        log::info!(
            "RUN [{} / {} / r{}]: {} {}",
            clip.clip_id,
            variant.name,
            repeat,
            self.tools.time,
            format_args_for_log(&args)
        );

        let output = self.runner.run(&self.tools.time, &args)?;
        let report = RunReport {
            text: output.combined(),
            succeeded: output.succeeded(),
        };

        if !report.succeeded {
            log::warn!(
                "Encode of {} with '{}' (repeat {}) exited with {:?}",
                clip.clip_id,
                variant.name,
                repeat,
                output.code
            );
        }

        if let Some(dir) = &self.log_dir {
            if let Err(e) = self.write_log(dir, &clip.clip_id, variant, repeat, &report.text) {
                log::warn!("Could not write report log for {}: {}", clip.clip_id, e);
            }
        }

        Ok(report)
    }

    fn write_log(
        &self,
        dir: &Path,
        clip_id: &str,
        variant: &Variant,
        repeat: usize,
        text: &str,
    ) -> CoreResult<()> {
        fs::create_dir_all(dir).map_err(|e| {
            CoreError::PathError(format!("cannot create log directory {}: {}", dir.display(), e))
        })?;
        let path = dir.join(repeat_log_name(clip_id, &variant.name, repeat));
        fs::write(&path, text)?;
        log::debug!("Wrote report log {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::{MockProcessRunner, ProcessOutput};

    fn clip() -> ClipInfo {
        ClipInfo {
            clip_id: "T1".to_string(),
            path: PathBuf::from("traffic_720p30.mp4"),
            width: 1280,
            height: 720,
            frame_rate: 30.0,
            duration_s: 10.0,
            frames: 300,
            frames_estimated: false,
        }
    }

    fn variant() -> Variant {
        Variant::new("me", "CABAC + hex + p16x16", "cabac=1:me=hex:subme=6:partitions=p16x16,none")
    }

    fn strings(args: &[OsString]) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn test_build_args_discard() {
        let runner = MockProcessRunner::new();
        let tools = ToolPaths::default();
        let encode = EncodeSettings::default();
        let vr = VariantRunner::new(&runner, &tools, &encode);

        let args = strings(&vr.build_args(Path::new("traffic_720p30.mp4"), "T1", &variant()));
        let expected: Vec<String> = [
            "-v", "ffmpeg", "-y", "-i", "traffic_720p30.mp4", "-c:v", "libx264", "-qp", "30",
            "-r", "30", "-g", "60", "-profile:v", "high", "-pix_fmt", "yuv420p",
            "-x264-params", "cabac=1:me=hex:subme=6:partitions=p16x16,none", "-f", "mp4",
            "/dev/null",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        assert_eq!(args, expected);
    }

    #[test]
    fn test_scratch_sink_target_is_sanitized() {
        let sink = OutputSink::Scratch(PathBuf::from("exp_logs"));
        assert_eq!(
            sink.target("T1", "CABAC + dia + p8x8,b8x8,i8x8"),
            PathBuf::from("exp_logs/T1__CABAC_+_dia_+_p8x8,b8x8,i8x8.mp4")
        );
    }

    #[test]
    fn test_repeat_log_name() {
        assert_eq!(
            repeat_log_name("P1", "CAVLC + dia + p16x16", 2),
            "log__P1__CAVLC_+_dia_+_p16x16__r2.txt"
        );
    }

    #[test]
    fn test_run_returns_combined_text_and_writes_log() {
        let dir = tempfile::tempdir().unwrap();
        let runner = MockProcessRunner::new();
        runner.expect(
            "/usr/bin/time",
            ProcessOutput {
                code: Some(0),
                stdout: "frame=300".to_string(),
                stderr: "\tUser time (seconds): 9.87\n".to_string(),
            },
        );
        let tools = ToolPaths::default();
        let encode = EncodeSettings::default();
        let vr = VariantRunner::new(&runner, &tools, &encode)
            .with_log_dir(Some(dir.path().to_path_buf()));

        let report = vr.run(&clip(), &variant(), 1).unwrap();
        assert!(report.succeeded);
        assert!(report.text.contains("User time"));

        let log_path = dir.path().join("log__T1__CABAC_+_hex_+_p16x16__r1.txt");
        assert_eq!(fs::read_to_string(log_path).unwrap(), report.text);
    }

    #[test]
    fn test_run_nonzero_exit_is_not_an_error() {
        let runner = MockProcessRunner::new();
        runner.expect(
            "/usr/bin/time",
            ProcessOutput {
                code: Some(1),
                stdout: String::new(),
                stderr: "Conversion failed!\n".to_string(),
            },
        );
        let tools = ToolPaths::default();
        let encode = EncodeSettings::default();
        let vr = VariantRunner::new(&runner, &tools, &encode);

        let report = vr.run(&clip(), &variant(), 3).unwrap();
        assert!(!report.succeeded);
    }

    #[test]
    fn test_run_creates_scratch_dir() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = dir.path().join("out");
        let runner = MockProcessRunner::new();
        runner.expect("/usr/bin/time", ProcessOutput::success(""));
        let tools = ToolPaths::default();
        let encode = EncodeSettings::default();
        let vr = VariantRunner::new(&runner, &tools, &encode)
            .with_sink(OutputSink::Scratch(scratch.clone()));

        vr.run(&clip(), &variant(), 1).unwrap();
        assert!(scratch.is_dir());
        let calls = runner.get_received_calls();
        assert!(calls[0].1.last().unwrap().ends_with("T1__CABAC_+_hex_+_p16x16.mp4"));
    }
}

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TranscodeError};

/// Frame rate assumed when the probe reports none
pub const DEFAULT_FPS: f64 = 30.0;

/// Video stream properties, read once per video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    pub fps: f64,

    /// Estimated as `ceil(fps * duration)`; the decoded count may differ
    pub frame_count: u64,

    /// Duration in seconds
    pub duration: f64,
}

impl VideoInfo {
    pub fn new(width: u32, height: u32, fps: f64, duration: f64) -> Self {
        Self {
            width,
            height,
            fps,
            frame_count: estimate_frame_count(fps, duration),
            duration,
        }
    }
}

/// Estimated number of frames for a stream of `duration` seconds
pub fn estimate_frame_count(fps: f64, duration: f64) -> u64 {
    let frames = (fps * duration).ceil();
    if frames.is_finite() && frames > 0.0 {
        frames as u64
    } else {
        0
    }
}

/// Parse an ffprobe rate such as `"30000/1001"`, `"25/1"` or `"29.97"`
///
/// A zero denominator yields the numerator.
pub fn parse_frame_rate(rate: &str) -> Option<f64> {
    let rate = rate.trim();
    match rate.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                Some(num)
            } else {
                Some(num / den)
            }
        }
        None => rate.parse().ok(),
    }
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
    format: Option<FfprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
}

/// Build [`VideoInfo`] from `ffprobe -print_format json -show_streams -show_format` output
pub fn parse_probe_output(path: &Path, json: &[u8]) -> Result<VideoInfo> {
    let parse_error = |reason: String| TranscodeError::ProbeParse {
        path: path.to_path_buf(),
        reason,
    };

    let probe: FfprobeOutput = serde_json::from_slice(json)
        .map_err(|e| parse_error(format!("malformed ffprobe output: {}", e)))?;

    let stream = probe
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| parse_error("No video stream found".to_string()))?;

    let fps = match stream.r_frame_rate.as_deref() {
        None => DEFAULT_FPS,
        Some(rate) => parse_frame_rate(rate)
            .filter(|fps| fps.is_finite() && *fps > 0.0)
            .ok_or_else(|| parse_error(format!("invalid frame rate: {:?}", rate)))?,
    };

    let (width, height) = match (stream.width, stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        (w, h) => {
            return Err(parse_error(format!("invalid dimensions: {:?}x{:?}", w, h)).into());
        }
    };

    let duration = probe
        .format
        .and_then(|f| f.duration)
        .and_then(|d| d.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d >= 0.0)
        .unwrap_or(0.0);

    Ok(VideoInfo::new(width, height, fps, duration))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CutoutError;

    fn probe(json: &str) -> Result<VideoInfo> {
        parse_probe_output(Path::new("clip.mp4"), json.as_bytes())
    }

    #[test]
    fn test_frame_rate_parsing() {
        let ntsc = parse_frame_rate("30000/1001").unwrap();
        assert!((ntsc - 29.97).abs() < 0.01);
        assert_eq!(parse_frame_rate("25/1"), Some(25.0));
        assert_eq!(parse_frame_rate("29.97"), Some(29.97));
        assert_eq!(parse_frame_rate("24/0"), Some(24.0));
        assert_eq!(parse_frame_rate("abc"), None);
        assert_eq!(parse_frame_rate("30/x"), None);
    }

    #[test]
    fn test_frame_count_estimate() {
        assert_eq!(estimate_frame_count(30.0, 2.0), 60);
        assert_eq!(estimate_frame_count(29.97, 1.0), 30);
        assert_eq!(estimate_frame_count(30.0, 0.0), 0);
    }

    #[test]
    fn test_probe_output() {
        let info = probe(r#"{
            "streams": [
                {"codec_type": "audio", "r_frame_rate": "0/0"},
                {"codec_type": "video", "width": 1920, "height": 1080, "r_frame_rate": "30000/1001"}
            ],
            "format": {"duration": "10.000000"}
        }"#).unwrap();

        assert_eq!(info.width, 1920);
        assert_eq!(info.height, 1080);
        assert!((info.fps - 29.97).abs() < 0.01);
        assert_eq!(info.duration, 10.0);
        assert_eq!(info.frame_count, 300);
    }

    #[test]
    fn test_probe_two_seconds_at_thirty() {
        let info = probe(r#"{
            "streams": [{"codec_type": "video", "width": 640, "height": 480, "r_frame_rate": "30/1"}],
            "format": {"duration": "2.0"}
        }"#).unwrap();
        assert_eq!(info.frame_count, 60);
    }

    #[test]
    fn test_probe_defaults() {
        let info = probe(r#"{
            "streams": [{"codec_type": "video", "width": 320, "height": 240}]
        }"#).unwrap();
        assert_eq!(info.fps, DEFAULT_FPS);
        assert_eq!(info.duration, 0.0);
        assert_eq!(info.frame_count, 0);
    }

    #[test]
    fn test_probe_without_video_stream() {
        let result = probe(r#"{"streams": [{"codec_type": "audio"}], "format": {}}"#);
        match result {
            Err(CutoutError::Transcode(TranscodeError::ProbeParse { reason, .. })) => {
                assert!(reason.contains("No video stream"));
            }
            other => panic!("Expected ProbeParse error, got {:?}", other),
        }
    }

    #[test]
    fn test_probe_malformed() {
        assert!(probe("not json").is_err());
        assert!(probe(r#"{"streams": [{"codec_type": "video", "width": 10, "height": 10, "r_frame_rate": "0/0"}]}"#).is_err());
        assert!(probe(r#"{"streams": [{"codec_type": "video", "r_frame_rate": "25/1"}]}"#).is_err());
    }
}

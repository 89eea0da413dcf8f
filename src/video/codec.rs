//! Encoder argument profiles for each output format.

use std::path::Path;

use crate::config::{OutputFormat, ProcessOptions, Quality};

/// File name pattern used for extracted and matted frames
pub const FRAME_PATTERN: &str = "frame_%06d.png";

const GIF_FILTER: &str =
    "[0:v] split [a][b];[a] palettegen=reserve_transparent=on:transparency_color=ffffff [p];[b][p] paletteuse";
const GIF_FILTER_LOW: &str =
    "[0:v] split [a][b];[a] palettegen=max_colors=64:reserve_transparent=on:transparency_color=ffffff [p];[b][p] paletteuse";

/// Codec arguments for `format` at `quality`, placed between the input and output
pub fn codec_args(options: &ProcessOptions) -> Vec<String> {
    let args: Vec<&str> = match options.format {
        OutputFormat::WebM => {
            let (bitrate, crf) = match options.quality {
                Quality::Low => ("1M", "40"),
                Quality::Medium => ("2M", "30"),
                Quality::High => ("4M", "20"),
            };
            // VP9 only keeps the alpha plane with alt-ref frames disabled
            vec![
                "-c:v", "libvpx-vp9",
                "-pix_fmt", "yuva420p",
                "-auto-alt-ref", "0",
                "-b:v", bitrate,
                "-crf", crf,
            ]
        }
        OutputFormat::Mov => {
            let profile = match options.quality {
                Quality::Low | Quality::Medium => "4444",
                Quality::High => "4444xq",
            };
            vec![
                "-c:v", "prores_ks",
                "-profile:v", profile,
                "-pix_fmt", "yuva444p10le",
            ]
        }
        OutputFormat::Gif => {
            let filter = match options.quality {
                Quality::Low => GIF_FILTER_LOW,
                Quality::Medium | Quality::High => GIF_FILTER,
            };
            vec!["-filter_complex", filter]
        }
    };

    args.into_iter().map(String::from).collect()
}

/// Full ffmpeg argument list encoding `frame_dir` into `dest`
pub fn encode_args(frame_dir: &Path, dest: &Path, fps: f64, options: &ProcessOptions) -> Vec<String> {
    let mut args = vec![
        "-y".to_string(),
        "-framerate".to_string(),
        fps.to_string(),
        "-i".to_string(),
        frame_dir.join(FRAME_PATTERN).display().to_string(),
    ];
    args.extend(codec_args(options));
    args.push(dest.display().to_string());
    args
}

/// ffmpeg arguments writing every decoded frame of `video` into `dest_dir`
pub fn extract_args(video: &Path, dest_dir: &Path) -> Vec<String> {
    vec![
        "-i".to_string(),
        video.display().to_string(),
        "-vsync".to_string(),
        "0".to_string(),
        dest_dir.join(FRAME_PATTERN).display().to_string(),
    ]
}

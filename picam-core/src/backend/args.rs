//! Deterministic mapping from [`CameraConfig`] to capture-tool argument
//! lists.
//!
//! Flag names and keyword tables follow the raspicam tools:
//! <https://www.raspberrypi.org/app/uploads/2013/07/RaspiCam-Documentation.pdf>

use crate::config::{CameraConfig, ExposureMode, ImageEffect, MeteringMode, WhiteBalance};

pub fn white_balance_keyword(value: u8) -> Option<&'static str> {
    Some(match WhiteBalance::try_from(value).ok()? {
        WhiteBalance::Off => "off",
        WhiteBalance::Auto => "auto",
        WhiteBalance::Sun => "sun",
        WhiteBalance::Flash => "flash",
        WhiteBalance::Shade => "cloudshade",
        WhiteBalance::Clouds => "cloudshade",
        WhiteBalance::Horizon => "horizon",
        WhiteBalance::Tungsten => "tungsten",
        WhiteBalance::Fluorescent => "fluorescent",
        WhiteBalance::Incandescent => "incandescent",
    })
}

pub fn exposure_mode_keyword(value: u8) -> Option<&'static str> {
    Some(match ExposureMode::try_from(value).ok()? {
        ExposureMode::Off => "off",
        ExposureMode::Auto => "auto",
        ExposureMode::Snow => "snow",
        ExposureMode::Beach => "beach",
        ExposureMode::Night => "night",
        ExposureMode::Sports => "sports",
        ExposureMode::Backlight => "backlight",
        ExposureMode::Spotlight => "spotlight",
        ExposureMode::VeryLong => "verylong",
        ExposureMode::FixedFps => "fixedfps",
        ExposureMode::Fireworks => "fireworks",
        ExposureMode::AntiShake => "antishake",
        ExposureMode::NightPreview => "nightpreview",
    })
}

pub fn metering_mode_keyword(value: u8) -> Option<&'static str> {
    Some(match MeteringMode::try_from(value).ok()? {
        MeteringMode::Spot => "spot",
        MeteringMode::Matrix => "matrix",
        MeteringMode::Average => "average",
        MeteringMode::Backlit => "backlit",
    })
}

/// `None` for [`ImageEffect::None`] — the tool's default needs no flag.
pub fn image_effect_keyword(value: u8) -> Option<&'static str> {
    match ImageEffect::try_from(value).ok()? {
        ImageEffect::None => None,
        ImageEffect::Negative => Some("negative"),
        ImageEffect::Solarise => Some("solarise"),
        ImageEffect::Whiteboard => Some("whiteboard"),
        ImageEffect::Blackboard => Some("blackboard"),
        ImageEffect::Sketch => Some("sketch"),
        ImageEffect::Denoise => Some("denoise"),
        ImageEffect::Emboss => Some("emboss"),
        ImageEffect::OilPaint => Some("oilpaint"),
        ImageEffect::GraphiteSketch => Some("gpen"),
        ImageEffect::CrossHatchSketch => Some("hatch"),
        ImageEffect::Pastel => Some("pastel"),
        ImageEffect::Watercolor => Some("watercolour"),
        ImageEffect::Film => Some("film"),
        ImageEffect::Blur => Some("blur"),
        ImageEffect::Saturate => Some("saturation"),
    }
}

fn push(args: &mut Vec<String>, key: &str, value: impl ToString) {
    args.push(key.to_string());
    args.push(value.to_string());
}

/// Flags shared by the still and video tools: exposure, color, tone,
/// geometry. Unknown enum discriminants contribute no flag.
fn common_args(args: &mut Vec<String>, config: &CameraConfig) {
    push(args, "-ev", config.ev);
    push(args, "-ISO", config.iso);
    push(args, "-co", config.contrast);
    push(args, "-sh", config.sharpness);
    push(args, "-br", config.brightness);
    push(args, "-sa", config.saturation);
    if let Some(keyword) = white_balance_keyword(config.white_balance) {
        push(args, "-awb", keyword);
    }
    if config.shutter_speed_us != CameraConfig::SHUTTER_SPEED_AUTO {
        push(args, "-ss", config.shutter_speed_us);
    }
    if let Some(keyword) = exposure_mode_keyword(config.exposure_mode) {
        push(args, "-ex", keyword);
    }
    if let Some(keyword) = metering_mode_keyword(config.metering_mode) {
        push(args, "-mm", keyword);
    }
    push(args, "-w", config.image_size_width);
    push(args, "-h", config.image_size_height);
    if let Some(keyword) = image_effect_keyword(config.image_effect) {
        push(args, "-ifx", keyword);
    }
    push(args, "-rot", config.image_rotation);
}

/// Argument list for the still tool, minus the output flag.
pub fn still_args(config: &CameraConfig) -> Vec<String> {
    let mut args = Vec::new();
    common_args(&mut args, config);
    push(&mut args, "-q", config.jpg_quality);
    args
}

/// Argument list for the video tool, minus duration and output.
pub fn video_args(config: &CameraConfig) -> Vec<String> {
    let mut args = Vec::new();
    common_args(&mut args, config);
    push(&mut args, "-b", config.video_bit_rate);
    push(&mut args, "-fps", config.video_frame_rate);
    args
}

// ── Tests ─────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn pair_of<'a>(args: &'a [String], key: &str) -> Option<&'a str> {
        args.iter()
            .position(|a| a == key)
            .and_then(|i| args.get(i + 1))
            .map(|s| s.as_str())
    }

    #[test]
    fn default_still_args() {
        let args = still_args(&CameraConfig::default());
        assert_eq!(pair_of(&args, "-ev"), Some("0"));
        assert_eq!(pair_of(&args, "-ISO"), Some("100"));
        assert_eq!(pair_of(&args, "-br"), Some("50"));
        assert_eq!(pair_of(&args, "-awb"), Some("auto"));
        assert_eq!(pair_of(&args, "-ex"), Some("auto"));
        assert_eq!(pair_of(&args, "-mm"), Some("matrix"));
        assert_eq!(pair_of(&args, "-q"), Some("75"));
        assert_eq!(pair_of(&args, "-w"), Some("3280"));
        assert_eq!(pair_of(&args, "-h"), Some("2464"));
        // auto shutter and no effect contribute no flags
        assert_eq!(pair_of(&args, "-ss"), None);
        assert_eq!(pair_of(&args, "-ifx"), None);
    }

    #[test]
    fn negative_values_format_as_signed() {
        let config = CameraConfig {
            ev: -7,
            contrast: -40,
            ..CameraConfig::default()
        };
        let args = still_args(&config);
        assert_eq!(pair_of(&args, "-ev"), Some("-7"));
        assert_eq!(pair_of(&args, "-co"), Some("-40"));
    }

    #[test]
    fn manual_shutter_and_effect_emit_flags() {
        let config = CameraConfig {
            shutter_speed_us: 250_000,
            image_effect: crate::config::ImageEffect::Emboss as u8,
            ..CameraConfig::default()
        };
        let args = still_args(&config);
        assert_eq!(pair_of(&args, "-ss"), Some("250000"));
        assert_eq!(pair_of(&args, "-ifx"), Some("emboss"));
    }

    #[test]
    fn video_args_carry_rate_controls() {
        let config = CameraConfig {
            video_bit_rate: 8_000_000,
            video_frame_rate: 25,
            ..CameraConfig::default()
        };
        let args = video_args(&config);
        assert_eq!(pair_of(&args, "-b"), Some("8000000"));
        assert_eq!(pair_of(&args, "-fps"), Some("25"));
        // stills-only quality flag is absent
        assert_eq!(pair_of(&args, "-q"), None);
    }

    #[test]
    fn unknown_discriminants_are_skipped() {
        let config = CameraConfig {
            white_balance: 0xEE,
            exposure_mode: 0xEE,
            metering_mode: 0xEE,
            image_effect: 0xEE,
            ..CameraConfig::default()
        };
        let args = still_args(&config);
        assert_eq!(pair_of(&args, "-awb"), None);
        assert_eq!(pair_of(&args, "-ex"), None);
        assert_eq!(pair_of(&args, "-mm"), None);
        assert_eq!(pair_of(&args, "-ifx"), None);
    }

    #[test]
    fn keyword_tables() {
        assert_eq!(white_balance_keyword(WhiteBalance::Shade as u8), Some("cloudshade"));
        assert_eq!(white_balance_keyword(WhiteBalance::Clouds as u8), Some("cloudshade"));
        assert_eq!(exposure_mode_keyword(ExposureMode::NightPreview as u8), Some("nightpreview"));
        assert_eq!(metering_mode_keyword(MeteringMode::Backlit as u8), Some("backlit"));
        assert_eq!(image_effect_keyword(ImageEffect::GraphiteSketch as u8), Some("gpen"));
        assert_eq!(image_effect_keyword(ImageEffect::Watercolor as u8), Some("watercolour"));
        assert_eq!(image_effect_keyword(ImageEffect::None as u8), None);
        assert_eq!(image_effect_keyword(0xFF), None);
    }
}

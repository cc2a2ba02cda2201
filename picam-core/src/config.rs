//! Camera configuration: fields, limits, clamping and the packed wire
//! layout.
//!
//! Numeric fields are clamped into their documented range before they are
//! stored; enum-valued fields are stored verbatim as raw discriminants so
//! that a peer speaking a newer dialect never loses information in transit.
//! The typed enums below exist for the capture argument builder and never
//! panic on unknown values.

use crate::error::CameraError;

// ── CameraConfig ─────────────────────────────────────────────────

/// The full camera state as seen by every handle role.
///
/// Plain data; all fields are fixed-width integers. Constructed with
/// [`Default::default`] when a handle opens and mutated only through the
/// local driver's setters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraConfig {
    /// Exposure compensation, [`EV_MIN`](Self::EV_MIN)..=[`EV_MAX`](Self::EV_MAX).
    pub ev: i8,
    /// Sensor sensitivity, 0 disables the override.
    pub iso: u16,
    pub contrast: i8,
    pub sharpness: i8,
    pub brightness: u8,
    pub saturation: i8,
    /// Raw [`WhiteBalance`] discriminant.
    pub white_balance: u8,
    /// Shutter time in microseconds; 0 means automatic.
    pub shutter_speed_us: u64,
    /// Raw [`ExposureMode`] discriminant.
    pub exposure_mode: u8,
    /// Raw [`MeteringMode`] discriminant.
    pub metering_mode: u8,
    pub jpg_quality: u8,
    /// Raw [`ImageEffect`] discriminant.
    pub image_effect: u8,
    /// Rotation in degrees, 0..=359.
    pub image_rotation: u16,
    pub image_size_width: u16,
    pub image_size_height: u16,
    /// H.264 target bit rate in bits per second.
    pub video_bit_rate: u32,
    /// Video frame rate in frames per second.
    pub video_frame_rate: u8,
}

impl CameraConfig {
    pub const EV_MIN: i8 = -10;
    pub const EV_MAX: i8 = 10;
    pub const EV_DEFAULT: i8 = 0;

    pub const ISO_MIN: u16 = 0;
    pub const ISO_MAX: u16 = 800;
    pub const ISO_DEFAULT: u16 = 100;

    pub const CONTRAST_MIN: i8 = -100;
    pub const CONTRAST_MAX: i8 = 100;
    pub const CONTRAST_DEFAULT: i8 = 0;

    pub const SHARPNESS_MIN: i8 = -100;
    pub const SHARPNESS_MAX: i8 = 100;
    pub const SHARPNESS_DEFAULT: i8 = 0;

    pub const BRIGHTNESS_MIN: u8 = 0;
    pub const BRIGHTNESS_MAX: u8 = 100;
    pub const BRIGHTNESS_DEFAULT: u8 = 50;

    pub const SATURATION_MIN: i8 = -100;
    pub const SATURATION_MAX: i8 = 100;
    pub const SATURATION_DEFAULT: i8 = 0;

    /// 0 selects automatic shutter timing.
    pub const SHUTTER_SPEED_AUTO: u64 = 0;

    pub const JPG_QUALITY_MIN: u8 = 0;
    pub const JPG_QUALITY_MAX: u8 = 100;
    pub const JPG_QUALITY_DEFAULT: u8 = 75;

    /// Sensor limits of the Pi camera module v2.
    pub const IMAGE_WIDTH_MAX: u16 = 3280;
    pub const IMAGE_HEIGHT_MAX: u16 = 2464;

    pub const IMAGE_ROTATION_MIN: u16 = 0;
    pub const IMAGE_ROTATION_MAX: u16 = 359;
    pub const IMAGE_ROTATION_DEFAULT: u16 = 0;

    pub const VIDEO_BIT_RATE_MIN: u32 = 1;
    pub const VIDEO_BIT_RATE_DEFAULT: u32 = 17_000_000;

    pub const VIDEO_FRAME_RATE_MIN: u8 = 2;
    pub const VIDEO_FRAME_RATE_MAX: u8 = 30;
    pub const VIDEO_FRAME_RATE_DEFAULT: u8 = 30;

    /// Encoded size of the packed wire layout, in bytes.
    pub const WIRE_SIZE: usize = 31;

    // ── Clamping ──────────────────────────────────────────────────

    pub fn clamp_ev(value: i8) -> i8 {
        value.clamp(Self::EV_MIN, Self::EV_MAX)
    }

    pub fn clamp_iso(value: u16) -> u16 {
        value.clamp(Self::ISO_MIN, Self::ISO_MAX)
    }

    pub fn clamp_contrast(value: i8) -> i8 {
        value.clamp(Self::CONTRAST_MIN, Self::CONTRAST_MAX)
    }

    pub fn clamp_sharpness(value: i8) -> i8 {
        value.clamp(Self::SHARPNESS_MIN, Self::SHARPNESS_MAX)
    }

    pub fn clamp_brightness(value: u8) -> u8 {
        value.clamp(Self::BRIGHTNESS_MIN, Self::BRIGHTNESS_MAX)
    }

    pub fn clamp_saturation(value: i8) -> i8 {
        value.clamp(Self::SATURATION_MIN, Self::SATURATION_MAX)
    }

    /// Shutter speed is unbounded; 0 keeps automatic timing.
    pub fn clamp_shutter_speed(value: u64) -> u64 {
        value
    }

    pub fn clamp_jpg_quality(value: u8) -> u8 {
        value.clamp(Self::JPG_QUALITY_MIN, Self::JPG_QUALITY_MAX)
    }

    pub fn clamp_image_width(value: u16) -> u16 {
        value.min(Self::IMAGE_WIDTH_MAX)
    }

    pub fn clamp_image_height(value: u16) -> u16 {
        value.min(Self::IMAGE_HEIGHT_MAX)
    }

    pub fn clamp_image_rotation(value: u16) -> u16 {
        value.clamp(Self::IMAGE_ROTATION_MIN, Self::IMAGE_ROTATION_MAX)
    }

    pub fn clamp_video_bit_rate(value: u32) -> u32 {
        value.max(Self::VIDEO_BIT_RATE_MIN)
    }

    pub fn clamp_video_frame_rate(value: u8) -> u8 {
        value.clamp(Self::VIDEO_FRAME_RATE_MIN, Self::VIDEO_FRAME_RATE_MAX)
    }

    /// A copy with every numeric field clamped into its declared range.
    /// Enum-valued fields pass through untouched.
    pub fn clamped(self) -> Self {
        Self {
            ev: Self::clamp_ev(self.ev),
            iso: Self::clamp_iso(self.iso),
            contrast: Self::clamp_contrast(self.contrast),
            sharpness: Self::clamp_sharpness(self.sharpness),
            brightness: Self::clamp_brightness(self.brightness),
            saturation: Self::clamp_saturation(self.saturation),
            white_balance: self.white_balance,
            shutter_speed_us: Self::clamp_shutter_speed(self.shutter_speed_us),
            exposure_mode: self.exposure_mode,
            metering_mode: self.metering_mode,
            jpg_quality: Self::clamp_jpg_quality(self.jpg_quality),
            image_effect: self.image_effect,
            image_rotation: Self::clamp_image_rotation(self.image_rotation),
            image_size_width: Self::clamp_image_width(self.image_size_width),
            image_size_height: Self::clamp_image_height(self.image_size_height),
            video_bit_rate: Self::clamp_video_bit_rate(self.video_bit_rate),
            video_frame_rate: Self::clamp_video_frame_rate(self.video_frame_rate),
        }
    }

    // ── Wire layout ───────────────────────────────────────────────

    /// Serialize into the fixed packed layout: fields in declaration
    /// order, multi-byte fields big-endian.
    ///
    /// ```text
    /// offset  0: i8  ev
    /// offset  1: u16 iso
    /// offset  3: i8  contrast
    /// offset  4: i8  sharpness
    /// offset  5: i8  brightness (single byte, same bit pattern as u8)
    /// offset  6: i8  saturation
    /// offset  7: u8  white_balance
    /// offset  8: u64 shutter_speed_us
    /// offset 16: u8  exposure_mode
    /// offset 17: u8  metering_mode
    /// offset 18: u8  jpg_quality
    /// offset 19: u8  image_effect
    /// offset 20: u16 image_rotation
    /// offset 22: u16 image_size_width
    /// offset 24: u16 image_size_height
    /// offset 26: u32 video_bit_rate
    /// offset 30: u8  video_frame_rate
    /// ```
    pub fn to_wire(&self) -> [u8; Self::WIRE_SIZE] {
        let mut buf = [0u8; Self::WIRE_SIZE];
        buf[0] = self.ev as u8;
        buf[1..3].copy_from_slice(&self.iso.to_be_bytes());
        buf[3] = self.contrast as u8;
        buf[4] = self.sharpness as u8;
        buf[5] = self.brightness;
        buf[6] = self.saturation as u8;
        buf[7] = self.white_balance;
        buf[8..16].copy_from_slice(&self.shutter_speed_us.to_be_bytes());
        buf[16] = self.exposure_mode;
        buf[17] = self.metering_mode;
        buf[18] = self.jpg_quality;
        buf[19] = self.image_effect;
        buf[20..22].copy_from_slice(&self.image_rotation.to_be_bytes());
        buf[22..24].copy_from_slice(&self.image_size_width.to_be_bytes());
        buf[24..26].copy_from_slice(&self.image_size_height.to_be_bytes());
        buf[26..30].copy_from_slice(&self.video_bit_rate.to_be_bytes());
        buf[30] = self.video_frame_rate;
        buf
    }

    /// Inverse of [`to_wire`](Self::to_wire). Rejects any payload whose
    /// length is not exactly [`WIRE_SIZE`](Self::WIRE_SIZE).
    pub fn from_wire(buf: &[u8]) -> Result<Self, CameraError> {
        if buf.len() != Self::WIRE_SIZE {
            return Err(CameraError::Undefined);
        }

        Ok(Self {
            ev: buf[0] as i8,
            iso: u16::from_be_bytes([buf[1], buf[2]]),
            contrast: buf[3] as i8,
            sharpness: buf[4] as i8,
            brightness: buf[5],
            saturation: buf[6] as i8,
            white_balance: buf[7],
            shutter_speed_us: u64::from_be_bytes([
                buf[8], buf[9], buf[10], buf[11], buf[12], buf[13], buf[14], buf[15],
            ]),
            exposure_mode: buf[16],
            metering_mode: buf[17],
            jpg_quality: buf[18],
            image_effect: buf[19],
            image_rotation: u16::from_be_bytes([buf[20], buf[21]]),
            image_size_width: u16::from_be_bytes([buf[22], buf[23]]),
            image_size_height: u16::from_be_bytes([buf[24], buf[25]]),
            video_bit_rate: u32::from_be_bytes([buf[26], buf[27], buf[28], buf[29]]),
            video_frame_rate: buf[30],
        })
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            ev: Self::EV_DEFAULT,
            iso: Self::ISO_DEFAULT,
            contrast: Self::CONTRAST_DEFAULT,
            sharpness: Self::SHARPNESS_DEFAULT,
            brightness: Self::BRIGHTNESS_DEFAULT,
            saturation: Self::SATURATION_DEFAULT,
            white_balance: WhiteBalance::Auto as u8,
            shutter_speed_us: Self::SHUTTER_SPEED_AUTO,
            exposure_mode: ExposureMode::Auto as u8,
            metering_mode: MeteringMode::Matrix as u8,
            jpg_quality: Self::JPG_QUALITY_DEFAULT,
            image_effect: ImageEffect::None as u8,
            image_rotation: Self::IMAGE_ROTATION_DEFAULT,
            image_size_width: Self::IMAGE_WIDTH_MAX,
            image_size_height: Self::IMAGE_HEIGHT_MAX,
            video_bit_rate: Self::VIDEO_BIT_RATE_DEFAULT,
            video_frame_rate: Self::VIDEO_FRAME_RATE_DEFAULT,
        }
    }
}

// ── Enums ─────────────────────────────────────────────────────────

/// Automatic white balance modes understood by the capture tool.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhiteBalance {
    Off = 0,
    Auto = 1,
    Sun = 2,
    Flash = 3,
    Shade = 4,
    Clouds = 5,
    Horizon = 6,
    Tungsten = 7,
    Fluorescent = 8,
    Incandescent = 9,
}

impl TryFrom<u8> for WhiteBalance {
    type Error = CameraError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(WhiteBalance::Off),
            1 => Ok(WhiteBalance::Auto),
            2 => Ok(WhiteBalance::Sun),
            3 => Ok(WhiteBalance::Flash),
            4 => Ok(WhiteBalance::Shade),
            5 => Ok(WhiteBalance::Clouds),
            6 => Ok(WhiteBalance::Horizon),
            7 => Ok(WhiteBalance::Tungsten),
            8 => Ok(WhiteBalance::Fluorescent),
            9 => Ok(WhiteBalance::Incandescent),
            _ => Err(CameraError::Undefined),
        }
    }
}

/// Exposure programs understood by the capture tool.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExposureMode {
    Off = 0,
    Auto = 1,
    Snow = 2,
    Beach = 3,
    Night = 4,
    Sports = 5,
    Backlight = 6,
    Spotlight = 7,
    VeryLong = 8,
    FixedFps = 9,
    Fireworks = 10,
    AntiShake = 11,
    NightPreview = 12,
}

impl TryFrom<u8> for ExposureMode {
    type Error = CameraError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ExposureMode::Off),
            1 => Ok(ExposureMode::Auto),
            2 => Ok(ExposureMode::Snow),
            3 => Ok(ExposureMode::Beach),
            4 => Ok(ExposureMode::Night),
            5 => Ok(ExposureMode::Sports),
            6 => Ok(ExposureMode::Backlight),
            7 => Ok(ExposureMode::Spotlight),
            8 => Ok(ExposureMode::VeryLong),
            9 => Ok(ExposureMode::FixedFps),
            10 => Ok(ExposureMode::Fireworks),
            11 => Ok(ExposureMode::AntiShake),
            12 => Ok(ExposureMode::NightPreview),
            _ => Err(CameraError::Undefined),
        }
    }
}

/// Light metering modes.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeteringMode {
    Spot = 0,
    Matrix = 1,
    Average = 2,
    Backlit = 3,
}

impl TryFrom<u8> for MeteringMode {
    type Error = CameraError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(MeteringMode::Spot),
            1 => Ok(MeteringMode::Matrix),
            2 => Ok(MeteringMode::Average),
            3 => Ok(MeteringMode::Backlit),
            _ => Err(CameraError::Undefined),
        }
    }
}

/// Still image post-processing effects.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageEffect {
    None = 0,
    Negative = 1,
    Solarise = 2,
    Whiteboard = 3,
    Blackboard = 4,
    Sketch = 5,
    Denoise = 6,
    Emboss = 7,
    OilPaint = 8,
    GraphiteSketch = 9,
    CrossHatchSketch = 10,
    Pastel = 11,
    Watercolor = 12,
    Film = 13,
    Blur = 14,
    Saturate = 15,
}

impl TryFrom<u8> for ImageEffect {
    type Error = CameraError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ImageEffect::None),
            1 => Ok(ImageEffect::Negative),
            2 => Ok(ImageEffect::Solarise),
            3 => Ok(ImageEffect::Whiteboard),
            4 => Ok(ImageEffect::Blackboard),
            5 => Ok(ImageEffect::Sketch),
            6 => Ok(ImageEffect::Denoise),
            7 => Ok(ImageEffect::Emboss),
            8 => Ok(ImageEffect::OilPaint),
            9 => Ok(ImageEffect::GraphiteSketch),
            10 => Ok(ImageEffect::CrossHatchSketch),
            11 => Ok(ImageEffect::Pastel),
            12 => Ok(ImageEffect::Watercolor),
            13 => Ok(ImageEffect::Film),
            14 => Ok(ImageEffect::Blur),
            15 => Ok(ImageEffect::Saturate),
            _ => Err(CameraError::Undefined),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = CameraConfig::default();
        assert_eq!(config.ev, 0);
        assert_eq!(config.iso, 100);
        assert_eq!(config.brightness, 50);
        assert_eq!(config.white_balance, WhiteBalance::Auto as u8);
        assert_eq!(config.metering_mode, MeteringMode::Matrix as u8);
        assert_eq!(config.jpg_quality, 75);
        assert_eq!(config.image_size_width, 3280);
        assert_eq!(config.image_size_height, 2464);
        assert_eq!(config.shutter_speed_us, 0);
        assert_eq!(config.video_frame_rate, 30);
    }

    #[test]
    fn clamping() {
        assert_eq!(CameraConfig::clamp_ev(11), 10);
        assert_eq!(CameraConfig::clamp_ev(-20), -10);
        assert_eq!(CameraConfig::clamp_ev(5), 5);
        assert_eq!(CameraConfig::clamp_iso(1600), 800);
        assert_eq!(CameraConfig::clamp_contrast(-128), -100);
        assert_eq!(CameraConfig::clamp_brightness(200), 100);
        assert_eq!(CameraConfig::clamp_jpg_quality(101), 100);
        assert_eq!(CameraConfig::clamp_image_width(4000), 3280);
        assert_eq!(CameraConfig::clamp_image_height(3000), 2464);
        assert_eq!(CameraConfig::clamp_image_rotation(360), 359);
        assert_eq!(CameraConfig::clamp_video_bit_rate(0), 1);
        assert_eq!(CameraConfig::clamp_video_frame_rate(0), 2);
        assert_eq!(CameraConfig::clamp_video_frame_rate(60), 30);
        // unbounded
        assert_eq!(CameraConfig::clamp_shutter_speed(u64::MAX), u64::MAX);
    }

    #[test]
    fn clamped_leaves_enums_verbatim() {
        let config = CameraConfig {
            ev: 99,
            white_balance: 0xEE,
            image_effect: 0xDD,
            ..CameraConfig::default()
        };
        let clamped = config.clamped();
        assert_eq!(clamped.ev, 10);
        assert_eq!(clamped.white_balance, 0xEE);
        assert_eq!(clamped.image_effect, 0xDD);
    }

    #[test]
    fn wire_roundtrip() {
        let config = CameraConfig {
            ev: -3,
            iso: 400,
            contrast: -100,
            sharpness: 100,
            brightness: 72,
            saturation: -15,
            white_balance: WhiteBalance::Tungsten as u8,
            shutter_speed_us: 1_000_000,
            exposure_mode: ExposureMode::Night as u8,
            metering_mode: MeteringMode::Spot as u8,
            jpg_quality: 90,
            image_effect: ImageEffect::Sketch as u8,
            image_rotation: 270,
            image_size_width: 1920,
            image_size_height: 1080,
            video_bit_rate: 8_000_000,
            video_frame_rate: 25,
        };

        let decoded = CameraConfig::from_wire(&config.to_wire()).unwrap();
        assert_eq!(decoded, config);
    }

    #[test]
    fn wire_golden_layout() {
        let config = CameraConfig {
            ev: -1,
            iso: 0x0190, // 400
            contrast: 2,
            sharpness: -2,
            brightness: 50,
            saturation: -3,
            white_balance: 7,
            shutter_speed_us: 0x0102_0304_0506_0708,
            exposure_mode: 4,
            metering_mode: 0,
            jpg_quality: 75,
            image_effect: 15,
            image_rotation: 0x0167,      // 359
            image_size_width: 0x0CD0,    // 3280
            image_size_height: 0x09A0,   // 2464
            video_bit_rate: 0x0103_5DE0,
            video_frame_rate: 30,
        };

        let wire = config.to_wire();
        #[rustfmt::skip]
        let expected: [u8; CameraConfig::WIRE_SIZE] = [
            0xFF,                                           // ev = -1
            0x01, 0x90,                                     // iso
            0x02,                                           // contrast
            0xFE,                                           // sharpness = -2
            0x32,                                           // brightness = 50
            0xFD,                                           // saturation = -3
            0x07,                                           // white balance
            0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, // shutter
            0x04,                                           // exposure mode
            0x00,                                           // metering mode
            0x4B,                                           // jpg quality = 75
            0x0F,                                           // image effect
            0x01, 0x67,                                     // rotation
            0x0C, 0xD0,                                     // width
            0x09, 0xA0,                                     // height
            0x01, 0x03, 0x5D, 0xE0,                         // bit rate
            0x1E,                                           // frame rate = 30
        ];
        assert_eq!(wire, expected);
    }

    #[test]
    fn from_wire_rejects_wrong_length() {
        assert!(CameraConfig::from_wire(&[0u8; 30]).is_err());
        assert!(CameraConfig::from_wire(&[0u8; 32]).is_err());
        assert!(CameraConfig::from_wire(&[]).is_err());
    }

    #[test]
    fn enum_discriminant_roundtrips() {
        for value in 0..=9u8 {
            assert_eq!(WhiteBalance::try_from(value).unwrap() as u8, value);
        }
        for value in 0..=12u8 {
            assert_eq!(ExposureMode::try_from(value).unwrap() as u8, value);
        }
        for value in 0..=3u8 {
            assert_eq!(MeteringMode::try_from(value).unwrap() as u8, value);
        }
        for value in 0..=15u8 {
            assert_eq!(ImageEffect::try_from(value).unwrap() as u8, value);
        }
        assert!(WhiteBalance::try_from(10).is_err());
        assert!(ExposureMode::try_from(13).is_err());
        assert!(MeteringMode::try_from(4).is_err());
        assert!(ImageEffect::try_from(16).is_err());
    }
}

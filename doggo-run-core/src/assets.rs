//! Asset Manifest and Image Cleanup
//!
//! The textures the client loads, the solid-colour fallback each one gets
//! when its file is missing, and the near-white background stripping
//! applied to every loaded image. Works on raw RGBA8 buffers so the rules
//! stay testable without a renderer.

use serde::Serialize;

/// Channel value above which a pixel counts as "near white".
pub const NEAR_WHITE_MIN: u8 = 235;
/// Maximum channel spread for a near-white pixel.
pub const NEAR_WHITE_MAX_SPREAD: u8 = 8;
/// Edge of the top-left square sampled after stripping.
pub const CORNER_SAMPLE: usize = 10;
/// Transparent corner pixels needed before the trimmed image is adopted.
pub const CORNER_THRESHOLD: usize = 5;

/// One texture the game uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct AssetEntry {
    /// Texture key the game refers to
    pub key: &'static str,
    /// File under the asset directory; `None` for generated textures
    pub file: Option<&'static str>,
    /// Fallback colour as 0xRRGGBB
    pub fallback_color: u32,
    /// Fallback square edge (px)
    pub fallback_size: u32,
}

/// Every texture, in load order.
pub const MANIFEST: [AssetEntry; 9] = [
    AssetEntry { key: "dog", file: Some("momi.png"), fallback_color: 0xff6b6b, fallback_size: 64 },
    AssetEntry { key: "dogfood", file: Some("food.png"), fallback_color: 0xffd93d, fallback_size: 32 },
    AssetEntry { key: "enemy1", file: Some("dog1.png"), fallback_color: 0x6bcf7f, fallback_size: 48 },
    AssetEntry { key: "enemy2", file: Some("dog2.png"), fallback_color: 0x4ecdc4, fallback_size: 48 },
    AssetEntry { key: "enemy3", file: Some("dog3.png"), fallback_color: 0x45b7d1, fallback_size: 48 },
    AssetEntry { key: "enemy4", file: Some("dog4.png"), fallback_color: 0x96ceb4, fallback_size: 48 },
    AssetEntry { key: "tiles", file: None, fallback_color: 0x8b4513, fallback_size: 32 },
    AssetEntry { key: "bg-layer1", file: None, fallback_color: 0x87ceeb, fallback_size: 128 },
    AssetEntry { key: "bg-layer2", file: None, fallback_color: 0x98d8e8, fallback_size: 128 },
];

/// Look up a manifest entry by key.
pub fn entry(key: &str) -> Option<&'static AssetEntry> {
    MANIFEST.iter().find(|e| e.key == key)
}

/// Split 0xRRGGBB into channels.
pub fn rgb_bytes(color: u32) -> [u8; 3] {
    [(color >> 16) as u8, (color >> 8) as u8, color as u8]
}

/// Solid RGBA8 square for a missing texture.
pub fn fallback_pixels(entry: &AssetEntry) -> Vec<u8> {
    let [r, g, b] = rgb_bytes(entry.fallback_color);
    let count = (entry.fallback_size * entry.fallback_size) as usize;
    let mut pixels = Vec::with_capacity(count * 4);
    for _ in 0..count {
        pixels.extend_from_slice(&[r, g, b, 255]);
    }
    pixels
}

#[inline]
fn is_near_white(r: u8, g: u8, b: u8) -> bool {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    r > NEAR_WHITE_MIN && g > NEAR_WHITE_MIN && b > NEAR_WHITE_MIN && max - min < NEAR_WHITE_MAX_SPREAD
}

/// Make near-white pixels fully transparent. Returns how many were changed.
pub fn strip_near_white(rgba: &mut [u8]) -> usize {
    let mut stripped = 0;
    for px in rgba.chunks_exact_mut(4) {
        if is_near_white(px[0], px[1], px[2]) {
            px[3] = 0;
            stripped += 1;
        }
    }
    stripped
}

/// Transparent pixels in the top-left sample square.
pub fn corner_transparency(rgba: &[u8], width: usize, height: usize) -> usize {
    let mut count = 0;
    for y in 0..height.min(CORNER_SAMPLE) {
        for x in 0..width.min(CORNER_SAMPLE) {
            let alpha = rgba.get((y * width + x) * 4 + 3).copied();
            if alpha == Some(0) {
                count += 1;
            }
        }
    }
    count
}

/// Strip the background and keep the result only if the corner turned
/// transparent. Returns true if `rgba` was replaced.
pub fn trim_background(rgba: &mut Vec<u8>, width: usize, height: usize) -> bool {
    let mut trimmed = rgba.clone();
    strip_near_white(&mut trimmed);

    if corner_transparency(&trimmed, width, height) > CORNER_THRESHOLD {
        *rgba = trimmed;
        true
    } else {
        false
    }
}

/// Loading screen progress.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadProgress {
    /// Files requested
    pub total: usize,
    /// Files finished (loaded or failed)
    pub done: usize,
    /// Keys that failed to load
    pub missing: Vec<String>,
}

impl LoadProgress {
    /// Track `total` files.
    pub fn new(total: usize) -> Self {
        Self { total, ..Self::default() }
    }

    /// A file loaded.
    pub fn loaded(&mut self) {
        self.done = (self.done + 1).min(self.total);
    }

    /// A file failed.
    pub fn failed(&mut self, key: &str) {
        self.missing.push(key.to_string());
        self.loaded();
    }

    /// Progress in [0, 1]. Nothing to load counts as done.
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.done as f32 / self.total as f32
        }
    }

    /// `"NN%"`, rounded down.
    pub fn percent_text(&self) -> String {
        format!("{}%", (self.fraction() * 100.0).floor() as u32)
    }

    /// Every file is settled.
    pub fn is_complete(&self) -> bool {
        self.done >= self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(width: usize, height: usize, rgb: [u8; 3]) -> Vec<u8> {
        let mut v = Vec::new();
        for _ in 0..width * height {
            v.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
        }
        v
    }

    #[test]
    fn test_manifest_lookup() {
        let dog = entry("dog").unwrap();
        assert_eq!(dog.file, Some("momi.png"));
        assert_eq!(dog.fallback_size, 64);
        assert_eq!(entry("enemy4").unwrap().fallback_color, 0x96ceb4);
        assert!(entry("tiles").unwrap().file.is_none());
        assert!(entry("cat").is_none());
    }

    #[test]
    fn test_fallback_pixels() {
        let food = entry("dogfood").unwrap();
        let pixels = fallback_pixels(food);
        assert_eq!(pixels.len(), 32 * 32 * 4);
        assert_eq!(&pixels[..4], &[0xff, 0xd9, 0x3d, 255]);
    }

    #[test]
    fn test_strip_near_white() {
        let mut px = vec![
            240, 240, 240, 255, // stripped
            236, 250, 240, 255, // spread 14, kept
            235, 255, 255, 255, // channel not above 235, kept
            255, 255, 250, 255, // stripped
        ];
        assert_eq!(strip_near_white(&mut px), 2);
        assert_eq!(px[3], 0);
        assert_eq!(px[7], 255);
        assert_eq!(px[11], 255);
        assert_eq!(px[15], 0);
    }

    #[test]
    fn test_trim_adopted_for_white_background() {
        let mut img = image(16, 16, [250, 250, 250]);
        assert!(trim_background(&mut img, 16, 16));
        assert_eq!(corner_transparency(&img, 16, 16), 100);
    }

    #[test]
    fn test_trim_rejected_for_opaque_corner() {
        let mut img = image(16, 16, [120, 60, 30]);
        let before = img.clone();
        assert!(!trim_background(&mut img, 16, 16));
        assert_eq!(img, before);
    }

    #[test]
    fn test_corner_sample_small_image() {
        let mut img = image(3, 2, [255, 255, 255]);
        strip_near_white(&mut img);
        assert_eq!(corner_transparency(&img, 3, 2), 6);
    }

    #[test]
    fn test_load_progress() {
        let mut progress = LoadProgress::new(6);
        assert_eq!(progress.percent_text(), "0%");
        progress.loaded();
        progress.failed("enemy2");
        assert_eq!(progress.percent_text(), "33%");
        assert!(!progress.is_complete());
        for _ in 0..10 {
            progress.loaded();
        }
        assert!(progress.is_complete());
        assert_eq!(progress.missing, vec!["enemy2".to_string()]);
        assert_eq!(LoadProgress::new(0).fraction(), 1.0);
    }
}

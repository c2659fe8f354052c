use std::io::Write;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::Result;
use crate::model::{Atlas, Frame, Rect};

/// Build the frame index `{ "frames": { name: { x, y, w, h } } }`.
/// Names appear in the order of `atlas.frames`.
pub fn to_json_index(atlas: &Atlas) -> Value {
    let mut frames = serde_json::Map::new();
    for fr in &atlas.frames {
        frames.insert(
            fr.key.clone(),
            json!({"x": fr.frame.x, "y": fr.frame.y, "w": fr.frame.w, "h": fr.frame.h}),
        );
    }
    json!({ "frames": frames })
}

/// The frame index as read back by consumers.
///
/// Serializes to the same shape as [`to_json_index`]; entry order is preserved
/// in both directions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AtlasIndex {
    #[serde(
        serialize_with = "serialize_frames",
        deserialize_with = "deserialize_frames"
    )]
    pub frames: Vec<Frame>,
}

impl AtlasIndex {
    pub fn from_atlas(atlas: &Atlas) -> Self {
        Self {
            frames: atlas.frames.clone(),
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Pretty JSON with two-space indentation.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn get(&self, key: &str) -> Option<&Rect> {
        self.frames.iter().find(|f| f.key == key).map(|f| &f.frame)
    }
}

#[allow(clippy::ptr_arg)]
fn serialize_frames<S: Serializer>(
    frames: &Vec<Frame>,
    s: S,
) -> std::result::Result<S::Ok, S::Error> {
    let mut map = s.serialize_map(Some(frames.len()))?;
    for f in frames {
        map.serialize_entry(&f.key, &f.frame)?;
    }
    map.end()
}

fn deserialize_frames<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<Vec<Frame>, D::Error> {
    struct FramesVisitor;

    impl<'de> Visitor<'de> for FramesVisitor {
        type Value = Vec<Frame>;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            f.write_str("a map of sprite name to {x, y, w, h}")
        }

        fn visit_map<A: MapAccess<'de>>(
            self,
            mut access: A,
        ) -> std::result::Result<Self::Value, A::Error> {
            let mut frames: Vec<Frame> = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((key, frame)) = access.next_entry::<String, Rect>()? {
                if frames.iter().any(|f| f.key == key) {
                    return Err(de::Error::custom(format!("duplicate frame name '{key}'")));
                }
                frames.push(Frame { key, frame });
            }
            Ok(frames)
        }
    }

    d.deserialize_map(FramesVisitor)
}

/// Encode `rgba` as PNG with the strongest compression the encoder offers.
pub fn write_png<W: Write>(rgba: &RgbaImage, writer: W) -> Result<()> {
    let encoder = PngEncoder::new_with_quality(writer, CompressionType::Best, FilterType::Adaptive);
    encoder.write_image(
        rgba.as_raw(),
        rgba.width(),
        rgba.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(())
}

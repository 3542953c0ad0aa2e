//! Deterministic per-source series colors.
//!
//! Each source gets a stable hue so the rendering collaborator draws it
//! consistently across runs: the first hash byte of the name is scaled
//! into a channel, and the channel is picked by a substring match on the
//! source name. Pure function of the name, never of content.

use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;

/// RGB color tag attached to each output series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Fallback hue for sources matching no known family
const FALLBACK: Rgb = Rgb { r: 0, g: 0, b: 255 };

/// Derive the series color for a source name.
pub fn color_for_source(name: &str) -> Rgb {
    let upper = name.to_uppercase();
    if upper.contains("IIS") {
        Rgb {
            r: 0,
            g: shade(hash_byte(name)),
            b: 0,
        }
    } else if upper.contains("EVTX") {
        Rgb {
            r: shade(hash_byte(name)),
            g: 0,
            b: 0,
        }
    } else if name.starts_with("GenericLog:") {
        yellow_shade(hash_byte(name))
    } else {
        FALLBACK
    }
}

fn hash_byte(name: &str) -> u8 {
    Sha256::digest(name.as_bytes())[0]
}

/// Scale a hash byte into the [50, 255] channel range.
fn shade(byte: u8) -> u8 {
    (50.0 + (byte as f64 / 255.0) * (255.0 - 50.0)) as u8
}

/// Yellow family uses a slightly wider scale and a +40 red offset.
fn yellow_shade(byte: u8) -> Rgb {
    let value = (50.0 + (byte as f64 / 255.0) * (255.0 - 10.0)) as u16;
    Rgb {
        r: (value + 40).min(255) as u8,
        g: value.min(255) as u8,
        b: 50,
    }
}

//! Supported output aspect ratios.

use std::fmt;
use std::str::FromStr;

use clipfocus_common::error::ClipfocusError;
use serde::{Deserialize, Serialize};

/// Output aspect ratio, fixed for the duration of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AspectRatio {
    /// 1:1 square.
    Square,
    /// 4:3 classic landscape.
    Classic,
    /// 16:9 widescreen.
    Widescreen,
    /// 9:16 vertical / social.
    Vertical,
    /// 3:4 portrait.
    Portrait,
}

impl AspectRatio {
    /// Every supported ratio, in menu order.
    pub const ALL: [AspectRatio; 5] = [
        AspectRatio::Square,
        AspectRatio::Classic,
        AspectRatio::Widescreen,
        AspectRatio::Vertical,
        AspectRatio::Portrait,
    ];

    /// Width component of the ratio.
    pub fn numerator(self) -> u32 {
        match self {
            AspectRatio::Square => 1,
            AspectRatio::Classic => 4,
            AspectRatio::Widescreen => 16,
            AspectRatio::Vertical => 9,
            AspectRatio::Portrait => 3,
        }
    }

    /// Height component of the ratio.
    pub fn denominator(self) -> u32 {
        match self {
            AspectRatio::Square => 1,
            AspectRatio::Classic => 3,
            AspectRatio::Widescreen => 9,
            AspectRatio::Vertical => 16,
            AspectRatio::Portrait => 4,
        }
    }

    /// Width divided by height.
    pub fn value(self) -> f64 {
        self.numerator() as f64 / self.denominator() as f64
    }

    /// Canonical `W:H` label.
    pub fn label(self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Classic => "4:3",
            AspectRatio::Widescreen => "16:9",
            AspectRatio::Vertical => "9:16",
            AspectRatio::Portrait => "3:4",
        }
    }
}

impl FromStr for AspectRatio {
    type Err = ClipfocusError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().replace(['/', 'x', 'X'], ":");
        AspectRatio::ALL
            .into_iter()
            .find(|ratio| ratio.label() == normalized)
            .ok_or_else(|| ClipfocusError::unsupported_aspect_ratio(raw.trim()))
    }
}

impl TryFrom<String> for AspectRatio {
    type Error = ClipfocusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AspectRatio> for String {
    fn from(value: AspectRatio) -> Self {
        value.label().to_string()
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_labels() {
        for ratio in AspectRatio::ALL {
            assert_eq!(ratio.label().parse::<AspectRatio>().unwrap(), ratio);
        }
    }

    #[test]
    fn test_parse_alternate_separators() {
        assert_eq!("9/16".parse::<AspectRatio>().unwrap(), AspectRatio::Vertical);
        assert_eq!(" 16x9 ".parse::<AspectRatio>().unwrap(), AspectRatio::Widescreen);
    }

    #[test]
    fn test_unsupported_label() {
        let err = "21:9".parse::<AspectRatio>().unwrap_err();
        assert!(matches!(
            err,
            ClipfocusError::UnsupportedAspectRatio { ref label } if label == "21:9"
        ));
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&AspectRatio::Portrait).unwrap();
        assert_eq!(json, "\"3:4\"");
        let back: AspectRatio = serde_json::from_str("\"4:3\"").unwrap();
        assert_eq!(back, AspectRatio::Classic);
        assert!(serde_json::from_str::<AspectRatio>("\"2:1\"").is_err());
    }

    #[test]
    fn test_values() {
        assert!((AspectRatio::Vertical.value() - 0.5625).abs() < 1e-12);
        assert!((AspectRatio::Widescreen.value() - 16.0 / 9.0).abs() < 1e-12);
    }
}

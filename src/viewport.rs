//! Viewport sizes for screenshot capture.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A width-by-height pixel dimension used to size the browser window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewportSpec {
    /// Viewport width in pixels.
    pub width: u32,
    /// Viewport height in pixels.
    pub height: u32,
}

impl ViewportSpec {
    /// Create a viewport spec.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Screenshot file name for this viewport, `screenshot-{w}x{h}.png`.
    pub fn file_name(&self) -> String {
        format!("screenshot-{}x{}.png", self.width, self.height)
    }
}

impl fmt::Display for ViewportSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for ViewportSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        let (w, h) = lower
            .split_once('x')
            .ok_or_else(|| Error::InvalidViewport(s.to_string()))?;

        let width: u32 = w
            .trim()
            .parse()
            .map_err(|_| Error::InvalidViewport(s.to_string()))?;
        let height: u32 = h
            .trim()
            .parse()
            .map_err(|_| Error::InvalidViewport(s.to_string()))?;

        if width == 0 || height == 0 {
            return Err(Error::InvalidViewport(s.to_string()));
        }

        Ok(Self { width, height })
    }
}

/// Default capture sizes: desktop, tablet, phone.
pub fn default_viewports() -> Vec<ViewportSpec> {
    vec![
        ViewportSpec::new(1920, 1080),
        ViewportSpec::new(768, 1024),
        ViewportSpec::new(375, 812),
    ]
}

/// Parse an ordered list of `WxH` tokens, preserving order.
pub fn parse_viewports(tokens: &[String]) -> crate::Result<Vec<ViewportSpec>> {
    tokens.iter().map(|t| t.parse()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let vp: ViewportSpec = "1920x1080".parse().unwrap();
        assert_eq!(vp, ViewportSpec::new(1920, 1080));

        // Uppercase separator is accepted
        let vp: ViewportSpec = "375X812".parse().unwrap();
        assert_eq!(vp, ViewportSpec::new(375, 812));
    }

    #[test]
    fn test_parse_invalid() {
        assert!("1920".parse::<ViewportSpec>().is_err());
        assert!("1920x".parse::<ViewportSpec>().is_err());
        assert!("x1080".parse::<ViewportSpec>().is_err());
        assert!("wide x tall".parse::<ViewportSpec>().is_err());
        assert!("-800x600".parse::<ViewportSpec>().is_err());
    }

    #[test]
    fn test_parse_rejects_zero() {
        assert!("0x600".parse::<ViewportSpec>().is_err());
        assert!("800x0".parse::<ViewportSpec>().is_err());
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            ViewportSpec::new(768, 1024).file_name(),
            "screenshot-768x1024.png"
        );
    }

    #[test]
    fn test_default_viewports() {
        let defaults = default_viewports();
        assert_eq!(defaults.len(), 3);
        assert_eq!(defaults[0], ViewportSpec::new(1920, 1080));
        assert_eq!(defaults[2], ViewportSpec::new(375, 812));
    }

    #[test]
    fn test_parse_viewports_preserves_order() {
        let tokens = vec!["800x600".to_string(), "320x480".to_string()];
        let parsed = parse_viewports(&tokens).unwrap();
        assert_eq!(parsed[0], ViewportSpec::new(800, 600));
        assert_eq!(parsed[1], ViewportSpec::new(320, 480));
    }

    #[test]
    fn test_parse_viewports_rejects_bad_token() {
        let tokens = vec!["800x600".to_string(), "bogus".to_string()];
        assert!(parse_viewports(&tokens).is_err());
    }
}

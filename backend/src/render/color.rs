use crate::error::{BadgeError, BadgeResult};
use regex::Regex;

/// Parses `#RGB`, `#RRGGBB` or `#RRGGBBAA` into RGBA components.
pub fn parse_color(value: &str) -> BadgeResult<[u8; 4]> {
    let re = Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$")
        .map_err(|e| BadgeError::Internal(format!("Regex error: {}", e)))?;
    let hex = re
        .captures(value.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| BadgeError::InvalidInput(format!("invalid color '{}'", value)))?;

    let channel = |s: &str| u8::from_str_radix(s, 16).unwrap_or(0);
    let rgba = match hex.len() {
        3 => {
            let expand = |i: usize| channel(&hex[i..=i].repeat(2));
            [expand(0), expand(1), expand(2), 255]
        }
        6 => [channel(&hex[0..2]), channel(&hex[2..4]), channel(&hex[4..6]), 255],
        _ => [
            channel(&hex[0..2]),
            channel(&hex[2..4]),
            channel(&hex[4..6]),
            channel(&hex[6..8]),
        ],
    };
    Ok(rgba)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_all_hex_forms() {
        assert_eq!(parse_color("#000000").unwrap(), [0, 0, 0, 255]);
        assert_eq!(parse_color("#fA0").unwrap(), [255, 170, 0, 255]);
        assert_eq!(parse_color("#1e90ff80").unwrap(), [30, 144, 255, 128]);
    }

    #[test]
    fn rejects_everything_else() {
        for bad in ["", "black", "#12", "#12345", "123456", "#gggggg", "rgb(0,0,0)"] {
            assert!(
                matches!(parse_color(bad), Err(BadgeError::InvalidInput(_))),
                "{bad} should be rejected"
            );
        }
    }
}

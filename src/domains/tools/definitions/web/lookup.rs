//! Reference lookups: HTTP status codes, colour notations, user agents.

use serde::Deserialize;
use serde_json::{Value, json};

use super::CATEGORY;
use crate::domains::tools::context::ToolContext;
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::registry::ToolDefinition;
use crate::domains::tools::support::{number, parse_int_prefix, round_half_up, static_regex};

static_regex!(RGB_TRIPLE, r"(\d+),\s*(\d+),\s*(\d+)");
static_regex!(
    HSL_TRIPLE,
    r"(-?\d+(?:\.\d+)?)\s*,\s*(\d+(?:\.\d+)?)%?\s*,\s*(\d+(?:\.\d+)?)%?"
);
static_regex!(UA_CHROME, r"Chrome/([\d.]+)");
static_regex!(UA_FIREFOX, r"Firefox/([\d.]+)");
static_regex!(UA_VERSION, r"Version/([\d.]+)");
static_regex!(UA_BOT, r"(?i)bot|crawler|spider|crawl");

const STATUS_NAMES: &[(u16, &str)] = &[
    (100, "Continue"),
    (101, "Switching Protocols"),
    (200, "OK"),
    (201, "Created"),
    (202, "Accepted"),
    (204, "No Content"),
    (301, "Moved Permanently"),
    (302, "Found"),
    (304, "Not Modified"),
    (400, "Bad Request"),
    (401, "Unauthorized"),
    (403, "Forbidden"),
    (404, "Not Found"),
    (405, "Method Not Allowed"),
    (409, "Conflict"),
    (422, "Unprocessable Entity"),
    (429, "Too Many Requests"),
    (500, "Internal Server Error"),
    (501, "Not Implemented"),
    (502, "Bad Gateway"),
    (503, "Service Unavailable"),
    (504, "Gateway Timeout"),
];

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "http_status_lookup",
            CATEGORY,
            "Look up HTTP status code meaning",
            json!({
                "type": "object",
                "properties": { "code": { "type": "number" } },
                "required": ["code"]
            }),
            http_status_lookup,
        ),
        ToolDefinition::new(
            "color_converter",
            CATEGORY,
            "Convert colors between HEX, RGB, HSL",
            json!({
                "type": "object",
                "properties": {
                    "color": {
                        "type": "string",
                        "description": "Color value e.g. #FF5733 or rgb(255,87,51) or hsl(11,100%,60%)"
                    },
                    "from": { "type": "string", "enum": ["hex", "rgb", "hsl"] }
                },
                "required": ["color", "from"]
            }),
            color_converter,
        ),
        ToolDefinition::new(
            "parse_user_agent",
            CATEGORY,
            "Parse and analyze a User-Agent string",
            json!({
                "type": "object",
                "properties": { "user_agent": { "type": "string" } },
                "required": ["user_agent"]
            }),
            parse_user_agent,
        ),
    ]
}

// ============================================================================
// http_status_lookup
// ============================================================================

#[derive(Debug, Deserialize)]
struct StatusParams {
    code: f64,
}

fn http_status_lookup(params: StatusParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let code = params.code;
    let name = STATUS_NAMES
        .iter()
        .find(|(known, _)| f64::from(*known) == code)
        .map(|(_, name)| *name);
    let category = if code < 200.0 {
        "Informational"
    } else if code < 300.0 {
        "Success"
    } else if code < 400.0 {
        "Redirection"
    } else if code < 500.0 {
        "Client Error"
    } else {
        "Server Error"
    };

    Ok(json!({
        "code": number(code),
        "name": name.unwrap_or("Unknown"),
        "category": category,
        "description": match name {
            Some(name) => format!("{code} {name}"),
            None => "Unknown status code".to_string(),
        },
    }))
}

// ============================================================================
// color_converter
// ============================================================================

#[derive(Debug, Deserialize)]
struct ColorParams {
    color: String,
    from: String,
}

/// Parse `color` in the `from` notation and render it in all three.
fn color_converter(params: ColorParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let (r, g, b) = match params.from.as_str() {
        "hex" => parse_hex(&params.color)?,
        "rgb" => parse_rgb(&params.color)?,
        "hsl" => parse_hsl(&params.color)?,
        other => return Ok(json!({ "error": format!("Unsupported color format: {other}") })),
    };
    let (h, s, l) = rgb_to_hsl(r, g, b);

    Ok(json!({
        "hex": format!("#{r:02X}{g:02X}{b:02X}"),
        "rgb": format!("rgb({r}, {g}, {b})"),
        "hsl": format!("hsl({h}, {s}%, {l}%)"),
        "values": { "r": r, "g": g, "b": b, "h": h, "s": s, "l": l },
    }))
}

/// `#RRGGBB`, `RRGGBB` or the three-digit shorthand.
pub(crate) fn parse_hex(color: &str) -> ToolResult<(u32, u32, u32)> {
    let invalid = || ToolError::invalid_arguments(format!("Invalid hex color: {color}"));
    let hex = color.replacen('#', "", 1);
    let hex: String = if hex.chars().count() == 3 {
        hex.chars().flat_map(|c| [c, c]).collect()
    } else {
        hex
    };
    let chars: Vec<char> = hex.chars().collect();
    let channel = |start: usize| -> ToolResult<u32> {
        let pair: String = chars.iter().skip(start).take(2).collect();
        parse_int_prefix(&pair, 16)
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(invalid)
    };
    Ok((channel(0)?, channel(2)?, channel(4)?))
}

fn parse_rgb(color: &str) -> ToolResult<(u32, u32, u32)> {
    let caps = RGB_TRIPLE
        .captures(color)
        .ok_or_else(|| ToolError::invalid_arguments(format!("Invalid rgb color: {color}")))?;
    let channel = |i: usize| -> ToolResult<u32> {
        caps[i]
            .parse()
            .map_err(|_| ToolError::invalid_arguments(format!("Invalid rgb color: {color}")))
    };
    Ok((channel(1)?, channel(2)?, channel(3)?))
}

fn parse_hsl(color: &str) -> ToolResult<(u32, u32, u32)> {
    let invalid = || ToolError::invalid_arguments(format!("Invalid hsl color: {color}"));
    let caps = HSL_TRIPLE.captures(color).ok_or_else(invalid)?;
    let component = |i: usize| caps[i].parse::<f64>().map_err(|_| invalid());
    let h = component(1)?.rem_euclid(360.0);
    let s = (component(2)? / 100.0).clamp(0.0, 1.0);
    let l = (component(3)? / 100.0).clamp(0.0, 1.0);

    let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let sector = h / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r1, g1, b1) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = l - chroma / 2.0;
    let to_byte = |v: f64| round_half_up((v + m) * 255.0) as u32;
    Ok((to_byte(r1), to_byte(g1), to_byte(b1)))
}

/// Hue in degrees, saturation and lightness in percent, all rounded.
fn rgb_to_hsl(r: u32, g: u32, b: u32) -> (i64, i64, i64) {
    let (rn, gn, bn) = (f64::from(r) / 255.0, f64::from(g) / 255.0, f64::from(b) / 255.0);
    let max = rn.max(gn).max(bn);
    let min = rn.min(gn).min(bn);
    let l = (max + min) / 2.0;
    let delta = max - min;
    let s = if delta == 0.0 {
        0.0
    } else if l < 0.5 {
        delta / (max + min)
    } else {
        delta / (2.0 - max - min)
    };
    let h = if delta == 0.0 {
        0.0
    } else if max == rn {
        ((gn - bn) / delta + 6.0) % 6.0 * 60.0
    } else if max == gn {
        ((bn - rn) / delta + 2.0) * 60.0
    } else {
        ((rn - gn) / delta + 4.0) * 60.0
    };
    let round = |v: f64| round_half_up(v) as i64;
    (round(h), round(s * 100.0), round(l * 100.0))
}

// ============================================================================
// parse_user_agent
// ============================================================================

#[derive(Debug, Deserialize)]
struct UserAgentParams {
    user_agent: String,
}

/// Substring heuristics, checked in order; the first hit wins.
fn parse_user_agent(params: UserAgentParams, _ctx: &mut ToolContext) -> ToolResult<Value> {
    let ua = params.user_agent.as_str();
    let first_match = |candidates: &[(&str, &'static str)]| {
        candidates
            .iter()
            .find(|(needle, _)| ua.contains(*needle))
            .map(|(_, label)| *label)
            .unwrap_or("Unknown")
    };

    let browser = first_match(&[
        ("Chrome", "Chrome"),
        ("Firefox", "Firefox"),
        ("Safari", "Safari"),
        ("Edge", "Edge"),
        ("Opera", "Opera"),
    ]);
    let os = first_match(&[
        ("Windows", "Windows"),
        ("Mac OS", "macOS"),
        ("Linux", "Linux"),
        ("Android", "Android"),
        ("iOS", "iOS"),
    ]);
    let device = if ua.contains("Mobile") {
        "Mobile"
    } else if ua.contains("Tablet") {
        "Tablet"
    } else {
        "Desktop"
    };
    let version = [&*UA_CHROME, &*UA_FIREFOX, &*UA_VERSION]
        .iter()
        .find_map(|re| re.captures(ua))
        .map(|caps| caps[1].to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    Ok(json!({
        "browser": browser,
        "browser_version": version,
        "os": os,
        "device_type": device,
        "is_bot": UA_BOT.is_match(ua),
        "raw": ua,
    }))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::testing::{ok, run};

    #[test]
    fn test_status_lookup() {
        let out = ok("http_status_lookup", json!({ "code": 404 }));
        assert_eq!(out["name"], "Not Found");
        assert_eq!(out["category"], "Client Error");
        assert_eq!(out["description"], "404 Not Found");

        let out = ok("http_status_lookup", json!({ "code": 299 }));
        assert_eq!(out["name"], "Unknown");
        assert_eq!(out["category"], "Success");
        assert_eq!(out["description"], "Unknown status code");
    }

    #[test]
    fn test_color_from_hex() {
        let out = ok("color_converter", json!({ "color": "#FF5733", "from": "hex" }));
        assert_eq!(out["rgb"], "rgb(255, 87, 51)");
        assert_eq!(out["hsl"], "hsl(11, 100%, 60%)");
        assert_eq!(out["values"]["h"], 11);
    }

    #[test]
    fn test_color_hex_shorthand() {
        let out = ok("color_converter", json!({ "color": "#0f0", "from": "hex" }));
        assert_eq!(out["hex"], "#00FF00");
        assert_eq!(out["hsl"], "hsl(120, 100%, 50%)");
    }

    #[test]
    fn test_color_from_rgb_and_hsl() {
        let out = ok("color_converter", json!({ "color": "rgb(0, 0, 255)", "from": "rgb" }));
        assert_eq!(out["hex"], "#0000FF");

        let out = ok("color_converter", json!({ "color": "hsl(11, 100%, 60%)", "from": "hsl" }));
        assert_eq!(out["hex"], "#FF5833");
    }

    #[test]
    fn test_color_invalid_input_is_thrown() {
        let err = run("color_converter", json!({ "color": "#zz", "from": "hex" })).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
        assert!(run("color_converter", json!({ "color": "red", "from": "rgb" })).is_err());
    }

    #[test]
    fn test_grey_has_no_hue() {
        assert_eq!(rgb_to_hsl(128, 128, 128), (0, 0, 50));
    }

    #[test]
    fn test_user_agent_chrome_on_windows() {
        let ua = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.6099.109 Safari/537.36";
        let out = ok("parse_user_agent", json!({ "user_agent": ua }));
        assert_eq!(out["browser"], "Chrome");
        assert_eq!(out["browser_version"], "120.0.6099.109");
        assert_eq!(out["os"], "Windows");
        assert_eq!(out["device_type"], "Desktop");
        assert_eq!(out["is_bot"], false);
    }

    #[test]
    fn test_user_agent_bot() {
        let out = ok("parse_user_agent", json!({ "user_agent": "Googlebot/2.1" }));
        assert_eq!(out["is_bot"], true);
        assert_eq!(out["browser"], "Unknown");
        assert_eq!(out["browser_version"], "Unknown");
    }
}

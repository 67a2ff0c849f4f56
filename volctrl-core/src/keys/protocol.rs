//! Infrared protocol identifiers
//!
//! Numbering follows the IRMP decoder family so that bindings learned
//! with one decoder build stay valid with another.

/// Protocol tag for NEC frames
pub const PROTOCOL_NEC: u8 = 2;

const NAMES: [&str; 31] = [
    "UNKNOWN", "SIRCS", "NEC", "SAMSUNG", "MATSUSH", "KASEIKYO", "RECS80", "RC5", "DENON", "RC6",
    "SAMSG32", "APPLE", "RECS80EX", "NUBERT", "BANG OLU", "GRUNDIG", "NOKIA", "SIEMENS", "FDC",
    "RCCAR", "JVC", "RC6A", "NIKON", "RUWIDO", "IR60", "KATHREIN", "NETBOX", "NEC16", "NEC42",
    "LEGO", "THOMSON",
];

/// Display name of a protocol tag
pub fn protocol_name(protocol: u8) -> &'static str {
    NAMES.get(protocol as usize).copied().unwrap_or(NAMES[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_names() {
        assert_eq!(protocol_name(PROTOCOL_NEC), "NEC");
        assert_eq!(protocol_name(7), "RC5");
        assert_eq!(protocol_name(30), "THOMSON");
    }

    #[test]
    fn test_unknown_tag() {
        assert_eq!(protocol_name(0), "UNKNOWN");
        assert_eq!(protocol_name(200), "UNKNOWN");
    }

    #[test]
    fn test_names_fit_column() {
        assert!(NAMES.iter().all(|n| n.len() < 9));
    }
}

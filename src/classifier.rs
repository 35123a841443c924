// src/classifier.rs

use crate::pinout_models::PinGroup;
use regex::Regex;
use std::sync::LazyLock;

static ALL_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").unwrap());
static ANALOG_NUMBERED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^A\d+").unwrap());

/// Name-pattern rules in precedence order. The first rule with a matching token wins.
const TOKEN_RULES: [(&[&str], PinGroup); 4] = [
    // A bare "V" is deliberately broad: any name containing V, e.g. "VSPI", lands in Power.
    (&["GND", "V", "3.3V", "5V", "VIN", "VCC"], PinGroup::Power),
    (&["SDA", "SCL", "I2C"], PinGroup::Communication),
    (&["MOSI", "MISO", "SCK", "SPI"], PinGroup::Communication),
    (&["TX", "RX", "UART"], PinGroup::Communication),
];

/// Classifies a pin by name. Matching is case-sensitive; unmatched names are `Other`.
pub fn classify(pin_name: &str) -> PinGroup {
    if let Some((_, group)) = TOKEN_RULES
        .iter()
        .find(|(tokens, _)| tokens.iter().any(|t| pin_name.contains(t)))
    {
        return *group;
    }

    if pin_name.contains("GPIO")
        || pin_name.contains('D')
        || ALL_DIGITS.is_match(pin_name)
        || ANALOG_NUMBERED.is_match(pin_name)
        || pin_name.contains("PWM")
    {
        return PinGroup::Digital;
    }

    PinGroup::Other
}

use micropinouts::PinGroup;
use micropinouts::classifier::classify;

#[test]
fn test_power_pins() {
    for name in ["GND", "VCC", "VIN", "3.3V", "5V", "3V3", "VBAT"] {
        assert_eq!(classify(name), PinGroup::Power, "{name}");
    }
}

#[test]
fn test_bare_v_rule_is_broad() {
    // Known broad rule: any name containing "V" is power, even SPI pins.
    assert_eq!(classify("VSPI"), PinGroup::Power);
    assert_eq!(classify("VSPI_MOSI"), PinGroup::Power);
    assert_eq!(classify("DEV"), PinGroup::Power);
}

#[test]
fn test_communication_pins() {
    for name in ["SDA", "SCL", "I2C_SDA", "MOSI", "MISO", "SCK", "SPI_CS", "TX", "RX0", "UART1"] {
        assert_eq!(classify(name), PinGroup::Communication, "{name}");
    }
}

#[test]
fn test_communication_wins_over_digital() {
    // Both contain "D", but the communication rules come first.
    assert_eq!(classify("SDA"), PinGroup::Communication);
    assert_eq!(classify("RXD"), PinGroup::Communication);
    assert_eq!(classify("TXD0"), PinGroup::Communication);
}

#[test]
fn test_digital_pins() {
    for name in ["D2", "GPIO5", "13", "A0", "A12", "PWM3", "DAC"] {
        assert_eq!(classify(name), PinGroup::Digital, "{name}");
    }
}

#[test]
fn test_other_pins() {
    for name in ["", "NC", "RST", "AREF", "EN", "gnd", "a0", "ピン", "🔌"] {
        assert_eq!(classify(name), PinGroup::Other, "{name:?}");
    }
}

#[test]
fn test_colors() {
    assert_eq!(classify("GND").color(), "#ff6b6b");
    assert_eq!(classify("SDA").color(), "#96ceb4");
    assert_eq!(classify("D2").color(), "#4ecdc4");
    assert_eq!(classify("NC").color(), "#64748b");
    assert_eq!(PinGroup::Pwm.name(), "PWM");
    assert_eq!(PinGroup::Pwm.css_class(), "group-pwm");
}

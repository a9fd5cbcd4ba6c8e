use zebra_strip::*;

fn printer(name: &str, state: PrinterState) -> PrinterInfo {
    PrinterInfo {
        name: name.to_string(),
        state,
    }
}

fn id(name: &str) -> Option<PrinterId> {
    Some(PrinterId(name.to_string()))
}

#[test]
fn test_default_pattern_matches_zebra() {
    let printers = vec![
        printer("HP_LaserJet", PrinterState::Idle),
        printer("ZEBRA_GK420d", PrinterState::Idle),
    ];
    assert_eq!(find_printer(&printers, None), id("ZEBRA_GK420d"));
}

#[test]
fn test_preferred_name_is_case_insensitive_substring() {
    let printers = vec![
        printer("Zebra_GK420d", PrinterState::Idle),
        printer("Zebra_ZD421_Office", PrinterState::Idle),
    ];
    assert_eq!(find_printer(&printers, Some("zd421")), id("Zebra_ZD421_Office"));
    assert_eq!(find_printer(&printers, Some("OFFICE")), id("Zebra_ZD421_Office"));
    assert_eq!(find_printer(&printers, Some("brother")), None);
}

#[test]
fn test_idle_printer_preferred() {
    let printers = vec![
        printer("Zebra_busy", PrinterState::Printing),
        printer("Zebra_free", PrinterState::Idle),
    ];
    assert_eq!(find_printer(&printers, None), id("Zebra_free"));
}

#[test]
fn test_busy_printer_used_when_none_idle() {
    let printers = vec![
        printer("Zebra_old", PrinterState::Disabled),
        printer("Zebra_busy", PrinterState::Printing),
        printer("Zebra_other", PrinterState::Unknown),
    ];
    assert_eq!(find_printer(&printers, None), id("Zebra_busy"));
}

#[test]
fn test_no_printers() {
    assert_eq!(find_printer(&[], None), None);
    assert_eq!(
        find_printer(&[printer("Zebra", PrinterState::Disabled)], None),
        None
    );
}

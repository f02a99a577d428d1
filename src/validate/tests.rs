use super::*;

// ── email ─────────────────────────────────────────────────────

#[test]
fn test_valid_emails() {
    assert!(is_valid_email("maria@x.com"));
    assert!(is_valid_email("first.last+tag@studio-one.com.br"));
    assert!(is_valid_email("a_b-c@d.e"));
}

#[test]
fn test_invalid_emails() {
    for bad in [
        "",
        "maria",
        "maria@",
        "@x.com",
        "maria@x",
        "maria@@x.com",
        "maria x@x.com",
        "maria@x_y.com",
        "Digite o email",
    ] {
        assert!(!is_valid_email(bad), "accepted {bad:?}");
    }
}

// ── phone ─────────────────────────────────────────────────────

#[test]
fn test_valid_phones() {
    assert!(is_valid_phone("11987654321"));
    assert!(is_valid_phone("(11) 98765-4321"));
    assert!(is_valid_phone("(11)98765-4321"));
    assert!(is_valid_phone("11-8765-4321"));
    assert!(is_valid_phone("1187654321"));
}

#[test]
fn test_invalid_phones() {
    assert!(!is_valid_phone(""));
    assert!(!is_valid_phone("987654321"));
    assert!(!is_valid_phone("(11) 9 8765-4321"));
    assert!(!is_valid_phone("call me"));
}

// ── sanitize / is_present ─────────────────────────────────────

#[test]
fn test_sanitize_trims_only() {
    assert_eq!(sanitize("  Maria Silva \n"), "Maria Silva");
    assert_eq!(sanitize("O'Brien; DROP"), "O'Brien; DROP");
    assert_eq!(sanitize("   "), "");
}

#[test]
fn test_is_present() {
    assert!(is_present("a", DEFAULT_MAX_LEN));
    assert!(!is_present("", DEFAULT_MAX_LEN));
    assert!(is_present(&"x".repeat(100), DEFAULT_MAX_LEN));
    assert!(!is_present(&"x".repeat(101), DEFAULT_MAX_LEN));
    assert!(is_present("abc", 3));
    assert!(!is_present("abcd", 3));
}

#[test]
fn test_is_present_counts_characters() {
    // 3 characters, 6 bytes
    assert!(is_present("ãéí", 3));
}

// ── format_phone ──────────────────────────────────────────────

#[test]
fn test_format_phone_progressive() {
    assert_eq!(format_phone(""), "");
    assert_eq!(format_phone("1"), "(1");
    assert_eq!(format_phone("11"), "(11");
    assert_eq!(format_phone("119"), "(11) 9");
    assert_eq!(format_phone("1198"), "(11) 9 8");
    assert_eq!(format_phone("1198765"), "(11) 9 8765");
    assert_eq!(format_phone("11987654"), "(11) 9 8765-4");
    assert_eq!(format_phone("11987654321"), "(11) 9 8765-4321");
}

#[test]
fn test_format_phone_strips_non_digits() {
    assert_eq!(format_phone("+55 (11) 98765"), "(55) 1 1987-65");
    assert_eq!(format_phone("abc"), "");
}

#[test]
fn test_format_phone_drops_extra_digits() {
    assert_eq!(format_phone("119876543210"), "(11) 9 8765-4321");
}

#[test]
fn test_format_phone_idempotent() {
    assert_eq!(format_phone("(11) 9 8765-4321"), "(11) 9 8765-4321");
    for input in ["1", "119", "1198765", "11987654", "11987654321", "12ab34 56"] {
        let once = format_phone(input);
        assert_eq!(format_phone(&once), once, "not a fixed point for {input:?}");
    }
}

// ── normalize_phone ───────────────────────────────────────────

#[test]
fn test_normalize_phone() {
    assert_eq!(normalize_phone("11987654321"), "(11) 9 8765-4321");
    assert_eq!(normalize_phone("(11) 98765-4321"), "(11) 9 8765-4321");
    assert_eq!(normalize_phone("(11) 9 8765-4321"), "(11) 9 8765-4321");
    assert_eq!(normalize_phone("ask at reception"), "ask at reception");
    assert_eq!(normalize_phone("ramal 22"), "ramal 22");
    assert_eq!(normalize_phone(""), "");
}

#![allow(clippy::unwrap_used)]

use super::*;

fn make_client(name: &str) -> Client {
    Client {
        id: None,
        client_id: "AUT-1234".into(),
        name: name.into(),
        email: String::new(),
        phone: String::new(),
        observation: String::new(),
        date_added: "05/03/2024".into(),
    }
}

// ── Client ────────────────────────────────────────────────────

#[test]
fn test_client_matches_is_case_insensitive() {
    let client = make_client("Ana Paula");
    assert!(client.matches("an"));
    assert!(client.matches("AN"));
    assert!(client.matches("paula"));
    assert!(!client.matches("bruno"));
}

#[test]
fn test_client_matches_every_column() {
    let mut client = make_client("Ana");
    client.email = "ana@studio.com".into();
    client.phone = "(11) 9 8765-4321".into();
    client.observation = "prefers WhatsApp".into();

    assert!(client.matches("aut-12"));
    assert!(client.matches("studio"));
    assert!(client.matches("8765"));
    assert!(client.matches("whatsapp"));
    assert!(client.matches("03/2024"));
}

#[test]
fn test_client_matches_non_ascii() {
    let client = make_client("ÂNGELA");
    assert!(client.matches("ângela"));
}

#[test]
fn test_client_date_added_parsed() {
    let client = make_client("Ana");
    let date = client.date_added_parsed().unwrap();
    assert_eq!(date, chrono::NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());

    let mut bad = make_client("Ana");
    bad.date_added = "2024-03-05".into();
    assert!(bad.date_added_parsed().is_none());
}

#[test]
fn test_client_display() {
    assert_eq!(format!("{}", make_client("Ana")), "Ana (AUT-1234)");
}

#[test]
fn test_client_draft_from_client() {
    let mut client = make_client("Ana");
    client.email = "ana@x.com".into();
    let draft = ClientDraft::from(&client);
    assert_eq!(draft.name, "Ana");
    assert_eq!(draft.email, "ana@x.com");
    assert!(draft.phone.is_empty());
}

// ── Budget ────────────────────────────────────────────────────

fn make_budget(client_name: Option<&str>) -> Budget {
    Budget {
        id: None,
        budget_id: "ART-4321".into(),
        client_id: "AUT-1234".into(),
        client_name: client_name.map(String::from),
        date: "31/12/2023".into(),
        kind: "Logo".into(),
        completion: String::new(),
        deadline: String::new(),
        service: String::new(),
    }
}

#[test]
fn test_budget_client_label() {
    assert_eq!(make_budget(Some("Maria")).client_label(), "Maria");
    // Client gone: fall back to the stored identifier
    assert_eq!(make_budget(None).client_label(), "AUT-1234");

    let mut orphan = make_budget(None);
    orphan.client_id.clear();
    assert_eq!(orphan.client_label(), "—");
}

#[test]
fn test_budget_date_parsed() {
    let budget = make_budget(None);
    assert_eq!(
        budget.date_parsed(),
        chrono::NaiveDate::from_ymd_opt(2023, 12, 31)
    );
}

#[test]
fn test_budget_draft_builder() {
    let draft = BudgetDraft::new("Maria Silva")
        .with_kind("Logo")
        .with_completion("10/01/2025")
        .with_deadline("15 days")
        .with_service("Branding");
    assert_eq!(draft.client_ref, "Maria Silva");
    assert_eq!(draft.kind, "Logo");
    assert_eq!(draft.completion, "10/01/2025");
    assert_eq!(draft.deadline, "15 days");
    assert_eq!(draft.service, "Branding");
}

#[test]
fn test_budget_draft_from_budget_references_identifier() {
    let draft = BudgetDraft::from(&make_budget(Some("Maria")));
    assert_eq!(draft.client_ref, "AUT-1234");
}

// ── Dates & kinds ─────────────────────────────────────────────

#[test]
fn test_today_uses_stored_format() {
    let today = today();
    assert!(parse_date(&today).is_some(), "unparseable: {today}");
    assert_eq!(today.len(), 10);
}

#[test]
fn test_record_kind_display() {
    assert_eq!(format!("{}", RecordKind::Client), "Client");
    assert_eq!(RecordKind::Budget.as_str(), "Budget");
}

#![allow(clippy::unwrap_used)]

use super::form::*;
use crate::config::Config;
use crate::db::Database;
use crate::error::RecordError;
use crate::models::{BudgetDraft, ClientDraft};

fn open_temp() -> (tempfile::TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(&Config::in_dir(dir.path())).unwrap();
    (dir, db)
}

fn type_text(form: &mut Form, text: &str) {
    for c in text.chars() {
        form.push_char(c);
    }
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

// ── Field editing ────────────────────────────────────────────

#[test]
fn test_phone_field_formats_while_typing() {
    let mut form = Form::add_client();
    form.focus = 2;
    type_text(&mut form, "119");
    assert_eq!(form.fields[2].value, "(11) 9");
    type_text(&mut form, "87654321");
    assert_eq!(form.fields[2].value, "(11) 9 8765-4321");
}

#[test]
fn test_phone_field_ignores_non_digits() {
    let mut form = Form::add_client();
    form.focus = 2;
    type_text(&mut form, "(11) abc 9");
    assert_eq!(form.fields[2].value, "(11) 9");
}

#[test]
fn test_phone_backspace_removes_a_digit() {
    let mut form = Form::add_client();
    form.focus = 2;
    type_text(&mut form, "119");
    form.backspace();
    assert_eq!(form.fields[2].value, "(11");
    form.backspace();
    form.backspace();
    assert_eq!(form.fields[2].value, "");
    form.backspace();
    assert_eq!(form.fields[2].value, "");
}

#[test]
fn test_text_field_takes_anything() {
    let mut form = Form::add_client();
    type_text(&mut form, "José d'Ávila");
    form.backspace();
    assert_eq!(form.fields[0].value, "José d'Ávil");
}

#[test]
fn test_focus_wraps_both_ways() {
    let mut form = Form::add_budget("");
    form.prev_field();
    assert_eq!(form.focus, form.fields.len() - 1);
    form.next_field();
    assert_eq!(form.focus, 0);
}

#[test]
fn test_typing_clears_error() {
    let mut form = Form::add_client();
    form.error = Some("Name is required".into());
    form.push_char('A');
    assert!(form.error.is_none());
}

// ── Client completion ────────────────────────────────────────

#[test]
fn test_suggestions_match_substring_case_insensitively() {
    let form = {
        let mut f = Form::add_budget("");
        type_text(&mut f, "ANA");
        f
    };
    let known = names(&["Ana Souza", "Bruno", "Mariana"]);
    assert_eq!(form.suggestions(&known), ["Ana Souza", "Mariana"]);
}

#[test]
fn test_suggestions_skip_exact_match_and_empty_input() {
    let known = names(&["Bruno"]);
    let empty = Form::add_budget("");
    assert!(empty.suggestions(&known).is_empty());

    let exact = Form::add_budget("bruno");
    assert!(exact.suggestions(&known).is_empty());
}

#[test]
fn test_suggestions_only_on_client_field() {
    let mut form = Form::add_budget("ana");
    form.next_field();
    assert!(form.suggestions(&names(&["Ana Souza"])).is_empty());
}

#[test]
fn test_accept_suggestion() {
    let known = names(&["Maria Silva", "Mariana"]);
    let mut form = Form::add_budget("mari");
    assert!(form.accept_suggestion(&known));
    assert_eq!(form.fields[0].value, "Maria Silva");
    // Now an exact match: nothing left to complete
    assert!(!form.accept_suggestion(&known));
}

// ── Drafts ───────────────────────────────────────────────────

#[test]
fn test_client_draft_from_fields() {
    let mut form = Form::add_client();
    type_text(&mut form, "Ana");
    form.next_field();
    type_text(&mut form, "ana@x.com");
    form.next_field();
    type_text(&mut form, "11987654321");
    form.next_field();
    type_text(&mut form, "VIP");

    let draft = form.client_draft();
    assert_eq!(draft.name, "Ana");
    assert_eq!(draft.email, "ana@x.com");
    assert_eq!(draft.phone, "(11) 9 8765-4321");
    assert_eq!(draft.observation, "VIP");
}

#[test]
fn test_edit_budget_form_refers_to_client_by_identifier() {
    let (_dir, db) = open_temp();
    let client_id = db.add_client(&ClientDraft::new("Maria Silva")).unwrap();
    db.add_budget(&BudgetDraft::new(&client_id).with_kind("Logo"))
        .unwrap();
    let budget = db.list_budgets().unwrap().remove(0);

    let form = Form::edit_budget(&budget);
    assert_eq!(form.fields[0].value, client_id);
    assert_eq!(form.fields[1].value, "Logo");
    assert_eq!(form.title(), format!(" Edit budget {} ", budget.budget_id));
}

// ── Submit ───────────────────────────────────────────────────

#[test]
fn test_submit_add_client() {
    let (_dir, db) = open_temp();
    let mut form = Form::add_client();
    type_text(&mut form, "Ana");

    let status = form.submit(&db).unwrap();
    assert!(status.starts_with("Added client AUT-"));
    assert_eq!(db.list_clients(None).unwrap().len(), 1);
}

#[test]
fn test_submit_validation_error_writes_nothing() {
    let (_dir, db) = open_temp();
    let mut form = Form::add_client();
    form.next_field();
    type_text(&mut form, "not-an-email");

    let err = form.submit(&db).unwrap_err();
    assert!(matches!(err, RecordError::MissingField("Name")));
    assert!(err.is_validation());
    assert!(db.list_clients(None).unwrap().is_empty());
}

#[test]
fn test_submit_edit_client() {
    let (_dir, db) = open_temp();
    let client_id = db.add_client(&ClientDraft::new("Ana")).unwrap();
    let client = db.get_client(&client_id).unwrap().unwrap();

    let mut form = Form::edit_client(&client);
    assert_eq!(form.fields[0].value, "Ana");
    type_text(&mut form, " Souza");
    assert_eq!(form.submit(&db).unwrap(), format!("Updated client {client_id}"));
    assert_eq!(db.get_client(&client_id).unwrap().unwrap().name, "Ana Souza");
}

#[test]
fn test_submit_add_budget_by_name() {
    let (_dir, db) = open_temp();
    let client_id = db.add_client(&ClientDraft::new("Maria Silva")).unwrap();

    let mut form = Form::add_budget("");
    type_text(&mut form, "maria silva");
    let status = form.submit(&db).unwrap();
    assert!(status.starts_with("Added budget ART-"));

    let budgets = db.list_budgets().unwrap();
    assert_eq!(budgets[0].client_id, client_id);
    assert_eq!(budgets[0].client_name.as_deref(), Some("Maria Silva"));
}

#[test]
fn test_submit_add_budget_unknown_client() {
    let (_dir, db) = open_temp();
    let form = Form::add_budget("Nobody");
    let err = form.submit(&db).unwrap_err();
    assert!(matches!(err, RecordError::UnknownClient(ref r) if r == "Nobody"));
}

#[test]
fn test_submit_edit_after_delete_is_not_found() {
    let (_dir, db) = open_temp();
    let client_id = db.add_client(&ClientDraft::new("Ana")).unwrap();
    let client = db.get_client(&client_id).unwrap().unwrap();
    let form = Form::edit_client(&client);
    db.delete_client(&client_id).unwrap();

    let err = form.submit(&db).unwrap_err();
    assert!(matches!(err, RecordError::NotFound { .. }));
    assert!(!err.is_validation());
}

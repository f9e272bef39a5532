mod common;

use std::cell::RefCell;

use common::{user, temp_home, EffectLog, RecordingNavigator, RecordingNotifier, ScriptedTransport};
use refurnish::config::{AdminVerification, Config};
use refurnish::errors::ClientError;
use refurnish::flows::product::product_schema;
use refurnish::flows::{AddProductForm, LoginForm, SignupForm, SignupResult};
use refurnish::forms::{
    Busy, Effects, FormController, FormPhase, SelectedFile, SubmissionOutcome, SubmitOutcome,
    UploadOutcome, View,
};
use refurnish::session::{FileSessionStore, Session};
use refurnish::utils::paths;
use serde_json::json;

fn filled_product_form(session: &Session) -> AddProductForm {
    let mut form = AddProductForm::new();
    form.set_field(session, "title", "Teak Bed").unwrap();
    form.set_field(session, "type", "Bed").unwrap();
    form.set_field(session, "description", "Solid wood, queen size").unwrap();
    form.set_field(session, "year", "2015").unwrap();
    form
}

fn logged_in(admin: bool) -> Session {
    let mut session = Session::in_memory();
    session.login(user(admin)).unwrap();
    session
}

#[test]
fn add_product_notifies_then_navigates_once_after_upload() {
    let session = logged_in(false);
    let transport = ScriptedTransport::new()
        .reply_json(200, json!({"fileUrl": "bed-123.png"}))
        .reply_json(200, json!({"message": "ok"}));
    let log = RefCell::new(EffectLog::default());
    let mut notifier = RecordingNotifier(&log);
    let mut navigator = RecordingNavigator(&log);

    let mut form = filled_product_form(&session);
    let upload = form
        .upload_image(&transport, SelectedFile::new("bed.png", vec![1, 2, 3]), &mut notifier)
        .unwrap();
    assert_eq!(upload, UploadOutcome::Stored("bed-123.png".into()));

    let report = form
        .submit(
            &transport,
            &session,
            &mut Effects::new(&mut notifier, &mut navigator),
        )
        .unwrap()
        .completed()
        .unwrap();

    assert!(report.outcome.is_success());
    assert_eq!(
        log.borrow().events,
        vec!["notify:Nice", "ack", "navigate:/myproducts"]
    );
    assert_eq!(transport.paths(), vec!["/util/uploadfile", "/product/add"]);
    let sent = transport.sent();
    let body = sent[1].json().unwrap();
    assert_eq!(body["image"], "bed-123.png");
    assert_eq!(body["year"], 2015);
    assert_eq!(body["price"], "");
    assert_eq!(body["user_id"], "u1");
    assert_eq!(body["user_name"], "Asha");
}

#[test]
fn submit_without_upload_sends_empty_image() {
    let session = logged_in(false);
    let transport = ScriptedTransport::new().reply_json(200, json!({}));
    let log = RefCell::new(EffectLog::default());
    let mut notifier = RecordingNotifier(&log);
    let mut navigator = RecordingNavigator(&log);

    let mut form = filled_product_form(&session);
    form.submit(
        &transport,
        &session,
        &mut Effects::new(&mut notifier, &mut navigator),
    )
    .unwrap();

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].json().unwrap()["image"], "");
}

#[test]
fn failed_upload_toasts_and_keeps_image_empty() {
    let session = logged_in(false);
    let transport = ScriptedTransport::new().reply_json(500, json!({}));
    let log = RefCell::new(EffectLog::default());
    let mut notifier = RecordingNotifier(&log);

    let mut form = filled_product_form(&session);
    let outcome = form
        .upload_image(&transport, SelectedFile::new("bed.png", vec![0]), &mut notifier)
        .unwrap();

    assert!(matches!(outcome, UploadOutcome::Failed(_)));
    assert_eq!(log.borrow().events, vec!["notify:File upload failed", "ack"]);
    assert_eq!(form.controller().values().text("image"), "");
    assert!(form.controller().can_submit());
}

#[test]
fn blank_form_is_blocked_without_a_request() {
    let session = logged_in(false);
    let transport = ScriptedTransport::new();
    let log = RefCell::new(EffectLog::default());
    let mut notifier = RecordingNotifier(&log);
    let mut navigator = RecordingNavigator(&log);

    let mut form = AddProductForm::new();
    let outcome = form
        .submit(
            &transport,
            &session,
            &mut Effects::new(&mut notifier, &mut navigator),
        )
        .unwrap();

    let SubmitOutcome::Invalid(errors) = outcome else {
        panic!("expected validation to block the submission");
    };
    assert_eq!(errors.get("title").unwrap().message, "Product Name is Required");
    assert_eq!(
        errors.get("year").unwrap().message,
        "Year of Purchase is Required"
    );
    assert!(errors.get("image").is_none());
    assert!(transport.sent().is_empty());
    assert!(log.borrow().events.is_empty());
    assert!(form.controller().status("description").touched);
}

#[test]
fn out_of_range_year_blocks_submission() {
    let session = logged_in(false);
    let transport = ScriptedTransport::new().reply_json(200, json!({}));
    let log = RefCell::new(EffectLog::default());
    let mut notifier = RecordingNotifier(&log);
    let mut navigator = RecordingNavigator(&log);

    let mut form = filled_product_form(&session);
    form.set_field(&session, "year", "2024").unwrap();
    let outcome = form
        .submit(
            &transport,
            &session,
            &mut Effects::new(&mut notifier, &mut navigator),
        )
        .unwrap();
    let SubmitOutcome::Invalid(errors) = outcome else {
        panic!("2024 must be rejected");
    };
    assert_eq!(errors.get("year").unwrap().message, "Please enter a valid year");
    assert!(transport.sent().is_empty());

    form.set_field(&session, "year", "1950").unwrap();
    let outcome = form
        .submit(
            &transport,
            &session,
            &mut Effects::new(&mut notifier, &mut navigator),
        )
        .unwrap();
    assert!(outcome.completed().is_some());
    assert_eq!(transport.sent().len(), 1);
}

#[test]
fn submit_is_rejected_while_an_upload_is_in_flight() {
    let mut controller = FormController::new(product_schema());
    for (key, value) in [
        ("title", "Teak Bed"),
        ("type", "Bed"),
        ("description", "Solid wood"),
        ("year", "2015"),
    ] {
        controller.set_field(key, value).unwrap();
    }
    controller.begin_upload("image").unwrap().unwrap();

    let mut sent = 0;
    let outcome = controller.submit(|_| sent += 1);
    assert!(matches!(
        outcome,
        SubmitOutcome::Rejected(Busy {
            current: FormPhase::Uploading,
            ..
        })
    ));
    assert_eq!(sent, 0);

    controller.finish_upload("image", Ok("late.png".into()));
    let values = controller.submit(|values| values).completed().unwrap();
    assert_eq!(values.text("image"), "late.png");
}

#[test]
fn price_is_admin_only() {
    let user_session = logged_in(false);
    let mut form = AddProductForm::new();
    assert!(matches!(
        form.set_field(&user_session, "price", "1200"),
        Err(ClientError::AdminOnly(_))
    ));
    assert!(form
        .visible_fields(&user_session)
        .iter()
        .all(|field| field.key != "price"));

    let admin_session = logged_in(true);
    assert!(form.set_field(&admin_session, "price", "1200").is_ok());
}

#[test]
fn add_product_requires_a_session() {
    let session = Session::in_memory();
    let transport = ScriptedTransport::new();
    let log = RefCell::new(EffectLog::default());
    let mut notifier = RecordingNotifier(&log);
    let mut navigator = RecordingNavigator(&log);

    let mut form = filled_product_form(&session);
    let result = form.submit(
        &transport,
        &session,
        &mut Effects::new(&mut notifier, &mut navigator),
    );
    assert!(matches!(result, Err(ClientError::LoginRequired(_))));
    assert!(transport.sent().is_empty());
}

#[test]
fn rejected_login_writes_nothing_and_stays_put() {
    let home = temp_home();
    let session_path = paths::session_file_in(&home);
    let mut session = Session::new(Box::new(FileSessionStore::new(session_path.clone())));
    let transport = ScriptedTransport::new().reply_json(401, json!({"message": "no"}));
    let log = RefCell::new(EffectLog::default());
    let mut notifier = RecordingNotifier(&log);
    let mut navigator = RecordingNavigator(&log);

    let mut form = LoginForm::new();
    form.set_field("email", "asha@example.com").unwrap();
    form.set_field("password", "wrong").unwrap();
    let report = form
        .submit(
            &transport,
            &mut session,
            &mut Effects::new(&mut notifier, &mut navigator),
        )
        .completed()
        .unwrap();

    assert_eq!(report.outcome, SubmissionOutcome::Unauthorized);
    assert_eq!(report.notice.title, "Invalid Credentials");
    assert_eq!(log.borrow().events, vec!["notify:Invalid Credentials", "ack"]);
    assert!(!session.is_logged_in());
    assert!(!session_path.exists());
}

#[test]
fn successful_login_persists_user_then_goes_home() {
    let home = temp_home();
    let session_path = paths::session_file_in(&home);
    let mut session = Session::new(Box::new(FileSessionStore::new(session_path.clone())));
    let transport = ScriptedTransport::new().reply_json(
        200,
        json!({"_id": "u1", "name": "Asha", "email": "asha@example.com", "isAdmin": false}),
    );
    let log = RefCell::new(EffectLog::default());
    let mut notifier = RecordingNotifier(&log);
    let mut navigator = RecordingNavigator(&log);

    let mut form = LoginForm::new();
    form.set_field("email", "asha@example.com").unwrap();
    form.set_field("password", "secret1").unwrap();
    let report = form
        .submit(
            &transport,
            &mut session,
            &mut Effects::new(&mut notifier, &mut navigator),
        )
        .completed()
        .unwrap();

    assert_eq!(report.navigated_to, Some(View::Home));
    assert_eq!(
        log.borrow().events,
        vec!["notify:Login Successful", "ack", "navigate:/"]
    );
    assert_eq!(session.user().unwrap().id, "u1");
    let restored = Session::restore(Box::new(FileSessionStore::new(session_path))).unwrap();
    assert_eq!(restored.user().unwrap().name, "Asha");
}

#[test]
fn login_with_unreadable_user_is_a_failure() {
    let mut session = Session::in_memory();
    let transport = ScriptedTransport::new().reply_json(200, json!({"unexpected": true}));
    let log = RefCell::new(EffectLog::default());
    let mut notifier = RecordingNotifier(&log);
    let mut navigator = RecordingNavigator(&log);

    let mut form = LoginForm::new();
    form.set_field("email", "asha@example.com").unwrap();
    form.set_field("password", "secret1").unwrap();
    let report = form
        .submit(
            &transport,
            &mut session,
            &mut Effects::new(&mut notifier, &mut navigator),
        )
        .completed()
        .unwrap();

    assert!(!report.outcome.is_success());
    assert_eq!(report.navigated_to, None);
    assert!(!session.is_logged_in());
}

fn fill_signup(form: &mut SignupForm) {
    form.set_field("name", "Meera").unwrap();
    form.set_field("email", "meera@example.com").unwrap();
    form.set_field("password", "secret1").unwrap();
}

#[test]
fn wrong_admin_code_never_reaches_the_backend() {
    let config = Config {
        admin_verification: AdminVerification::Client,
        admin_code: Some("let-me-in".into()),
        ..Config::default()
    };
    let transport = ScriptedTransport::new();
    let log = RefCell::new(EffectLog::default());
    let mut notifier = RecordingNotifier(&log);
    let mut navigator = RecordingNavigator(&log);

    let mut form = SignupForm::admin(&config);
    form.set_field("admincode", "guess").unwrap();
    fill_signup(&mut form);
    let result = form
        .submit(&transport, &mut Effects::new(&mut notifier, &mut navigator))
        .completed()
        .unwrap();

    assert_eq!(result, SignupResult::AdminCodeRejected);
    assert!(transport.sent().is_empty());
    assert_eq!(
        log.borrow().events,
        vec!["notify:Oops!!", "ack", "navigate:/adminsignup"]
    );
}

#[test]
fn matching_admin_code_is_stripped_from_the_request() {
    let config = Config {
        admin_verification: AdminVerification::Client,
        admin_code: Some("let-me-in".into()),
        ..Config::default()
    };
    let transport = ScriptedTransport::new().reply_json(200, json!({}));
    let log = RefCell::new(EffectLog::default());
    let mut notifier = RecordingNotifier(&log);
    let mut navigator = RecordingNavigator(&log);

    let mut form = SignupForm::admin(&config);
    form.set_field("admincode", "let-me-in").unwrap();
    fill_signup(&mut form);
    form.submit(&transport, &mut Effects::new(&mut notifier, &mut navigator));

    let body = transport.sent()[0].json().unwrap().clone();
    assert!(body.get("admincode").is_none());
    assert_eq!(body["isAdmin"], true);
    assert_eq!(
        log.borrow().events,
        vec!["notify:Nice", "ack", "navigate:/login"]
    );
}

#[test]
fn server_verification_forwards_the_code() {
    let transport = ScriptedTransport::new().reply_json(403, json!({}));
    let log = RefCell::new(EffectLog::default());
    let mut notifier = RecordingNotifier(&log);
    let mut navigator = RecordingNavigator(&log);

    let mut form = SignupForm::admin(&Config::default());
    form.set_field("admincode", "anything").unwrap();
    fill_signup(&mut form);
    let result = form
        .submit(&transport, &mut Effects::new(&mut notifier, &mut navigator))
        .completed()
        .unwrap();

    let SignupResult::Submitted(report) = result else {
        panic!("server mode always submits");
    };
    assert!(!report.outcome.is_success());
    let body = transport.sent()[0].json().unwrap().clone();
    assert_eq!(body["admincode"], "anything");
    assert_eq!(log.borrow().events, vec!["notify:Oops!!", "ack"]);
}

#[test]
fn user_signup_uploads_avatar_and_goes_to_login() {
    let transport = ScriptedTransport::new()
        .reply_json(200, json!({"fileUrl": "meera.jpg"}))
        .reply_json(200, json!({}));
    let log = RefCell::new(EffectLog::default());
    let mut notifier = RecordingNotifier(&log);
    let mut navigator = RecordingNavigator(&log);

    let mut form = SignupForm::user();
    fill_signup(&mut form);
    form.upload_avatar(&transport, SelectedFile::new("meera.jpg", vec![9]), &mut notifier)
        .unwrap();
    let result = form
        .submit(&transport, &mut Effects::new(&mut notifier, &mut navigator))
        .completed()
        .unwrap();

    let SignupResult::Submitted(report) = result else {
        panic!("user signup always submits");
    };
    assert_eq!(report.navigated_to, Some(View::Login));
    let body = transport.sent()[1].json().unwrap().clone();
    assert_eq!(body["avatar"], "meera.jpg");
    assert_eq!(body["isAdmin"], false);
}

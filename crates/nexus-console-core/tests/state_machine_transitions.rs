use nexus_console_core::{
    request_transition, session_transition, RequestAction, RequestSlot, RequestStatus,
    SessionAction, SessionStatus,
};

#[test]
fn request_happy_path_transitions() {
    let (s1, _) =
        request_transition(RequestStatus::Idle, RequestAction::Start).expect("idle -> start");
    assert_eq!(s1, RequestStatus::InFlight);
    let (s2, t) = request_transition(s1, RequestAction::Succeed).expect("in flight -> succeed");
    assert_eq!(s2, RequestStatus::Succeeded);
    assert_eq!(t.reason, "response received");
    let (s3, _) = request_transition(s2, RequestAction::Start).expect("succeeded -> start");
    assert_eq!(s3, RequestStatus::InFlight);
    let (s4, _) = request_transition(s3, RequestAction::Fail).expect("in flight -> fail");
    assert_eq!(s4, RequestStatus::Failed);
}

#[test]
fn request_cannot_restart_while_in_flight() {
    let err = request_transition(RequestStatus::InFlight, RequestAction::Start)
        .expect_err("must fail");
    assert!(err.to_string().contains("illegal request transition"));
    let err = request_transition(RequestStatus::InFlight, RequestAction::Reject)
        .expect_err("must fail");
    assert!(err.to_string().contains("illegal request transition"));
}

#[test]
fn request_outcome_requires_in_flight() {
    let err =
        request_transition(RequestStatus::Idle, RequestAction::Succeed).expect_err("must fail");
    assert!(err.to_string().contains("illegal request transition"));
}

#[test]
fn session_lifecycle_transitions() {
    let (s1, _) = session_transition(SessionStatus::Uninitialized, SessionAction::BeginInit)
        .expect("begin init");
    assert_eq!(s1, SessionStatus::Initializing);
    let (s2, _) = session_transition(s1, SessionAction::InitSucceeded).expect("init ok");
    assert_eq!(s2, SessionStatus::Ready);
    let (s3, _) = session_transition(s2, SessionAction::Teardown).expect("teardown");
    assert_eq!(s3, SessionStatus::Uninitialized);
}

#[test]
fn session_double_init_is_rejected() {
    let err = session_transition(SessionStatus::Ready, SessionAction::BeginInit)
        .expect_err("must fail");
    assert!(err.to_string().contains("illegal session transition"));
    let err = session_transition(SessionStatus::Initializing, SessionAction::BeginInit)
        .expect_err("must fail");
    assert!(err.to_string().contains("illegal session transition"));
}

#[test]
fn slot_clears_previous_outcome_on_start() {
    let mut slot: RequestSlot<u32> = RequestSlot::default();
    slot.start().expect("start");
    slot.fail("boom").expect("fail");
    assert_eq!(slot.error(), Some("boom"));
    slot.start().expect("restart");
    assert!(slot.error().is_none());
    slot.succeed(7).expect("succeed");
    assert_eq!(slot.result(), Some(&7));
    assert_eq!(slot.status(), RequestStatus::Succeeded);
}

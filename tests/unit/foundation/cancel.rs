use super::*;

#[test]
fn clones_share_cancellation() {
    let a = CancelToken::new();
    let b = a.clone();
    assert!(b.check().is_ok());
    a.cancel();
    assert!(matches!(b.check(), Err(ReelError::Cancelled)));
}

#[test]
fn zero_budget_times_out() {
    let t = CancelToken::new().with_budget(Duration::ZERO);
    assert!(matches!(
        t.check(),
        Err(ReelError::RenderTimeout { budget }) if budget == Duration::ZERO
    ));
}

#[test]
fn cancellation_wins_over_timeout() {
    let t = CancelToken::new().with_budget(Duration::ZERO);
    t.cancel();
    assert!(matches!(t.check(), Err(ReelError::Cancelled)));
}

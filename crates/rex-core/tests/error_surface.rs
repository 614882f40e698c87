use rex_core::errors::{ensure_finite, ErrorInfo, RexError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("turn", 12)
        .with_context("reason", "example")
}

#[test]
fn non_convergence_surface() {
    let err = RexError::NonConvergence(sample_info("N001", "iteration cap"));
    assert_eq!(err.info().code, "N001");
    assert!(err.info().context.contains_key("turn"));
}

#[test]
fn insufficient_samples_surface() {
    let err = RexError::InsufficientSamples(sample_info("I001", "crossing at edge"));
    assert_eq!(err.info().code, "I001");
    assert_eq!(err.info().context.get("turn").map(String::as_str), Some("12"));
}

#[test]
fn no_fixed_point_surface() {
    let err = RexError::NoFixedPoint(sample_info("F001", "empty sector"));
    assert_eq!(err.info().code, "F001");
}

#[test]
fn display_includes_context_and_hint() {
    let err = RexError::InvalidInput(
        ErrorInfo::new("V001", "bad array")
            .with_context("len", 0)
            .with_hint("track more turns"),
    );
    let text = err.to_string();
    assert!(text.starts_with("invalid input: bad array (code: V001)"));
    assert!(text.contains("len=0"));
    assert!(text.contains("hint: track more turns"));
}

#[test]
fn errors_serialize_with_family_tag() {
    let err = RexError::Tracking(ErrorInfo::new("T001", "engine failure"));
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["family"], "Tracking");
    assert_eq!(json["detail"]["code"], "T001");
    let back: RexError = serde_json::from_value(json).unwrap();
    assert_eq!(back, err);
}

#[test]
fn ensure_finite_rejects_empty_and_nan() {
    let empty = ensure_finite("x", &[]).unwrap_err();
    assert_eq!(empty.info().code, "empty-samples");
    let nan = ensure_finite("px", &[0.0, f64::NAN]).unwrap_err();
    assert_eq!(nan.info().code, "non-finite-sample");
    assert_eq!(nan.info().context.get("index").map(String::as_str), Some("1"));
    assert!(ensure_finite("x", &[0.0, 1.0]).is_ok());
}

#[test]
fn trellis_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/trellis_error_pass.rs");
}

//! Integration test harness

mod integration {
    mod api_tests;
}

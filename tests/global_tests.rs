//! Tests for the process-wide shared store.
//!
//! Kept in their own test binary so no other test touches the instance.

use dotcfg::ConfigStore;
use dotcfg::config::global;

#[test]
fn install_once_then_share() {
    let store = ConfigStore::from_iter([("app.name", "shared")]);
    global::install(store).expect("first install succeeds");

    {
        let shared = global::instance().lock().unwrap();
        assert_eq!(shared.get::<String>("app.name").unwrap(), "shared");
    }

    global::instance()
        .lock()
        .unwrap()
        .set("app.port", "8080");
    assert_eq!(
        global::instance().lock().unwrap().get::<i64>("app.port").unwrap(),
        8080
    );

    let rejected = global::install(ConfigStore::from_iter([("other", "x")])).unwrap_err();
    assert!(rejected.contains("other"));
    assert!(!global::instance().lock().unwrap().contains("other"));
}

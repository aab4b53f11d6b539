use std::cell::RefCell as StdRefCell;
use std::rc::Rc;
use sprig_core::signal::Source;

#[test]
fn computed_tracks_its_dependencies() {
    let count = Source::new(2);
    let doubled = {
        let count = count.clone();
        Source::computed(move || count.get() * 2)
    };

    assert_eq!(doubled.get(), 4);

    count.set(5);
    assert_eq!(doubled.get(), 10);
}

#[test]
fn computed_notifies_subscribers_on_recompute() {
    let count = Source::new(1);
    let label = {
        let count = count.clone();
        Source::computed(move || format!("count is {}", count.get()))
    };

    let seen: Rc<StdRefCell<Vec<String>>> = Rc::new(StdRefCell::new(vec![]));
    {
        let seen_cb = seen.clone();
        let _sub = label.subscribe(move |v| seen_cb.borrow_mut().push(v.clone()));
    }

    count.set(2);
    count.set(3);
    assert_eq!(
        &*seen.borrow(),
        &vec!["count is 2".to_string(), "count is 3".to_string()]
    );
}

#[test]
fn map_derives_from_the_current_value() {
    let count = Source::new(4);
    let parity = count.map(|v| if v % 2 == 0 { "even" } else { "odd" });

    assert_eq!(parity.get(), "even");

    count.set(7);
    assert_eq!(parity.get(), "odd");
}

#[test]
fn map_chains() {
    let base = Source::new(1);
    let tripled = base.map(|v| v * 3);
    let described = tripled.map(|v| format!("={v}"));

    base.set(3);
    assert_eq!(tripled.get(), 9);
    assert_eq!(described.get(), "=9");
}

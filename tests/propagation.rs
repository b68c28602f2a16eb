use std::{cell::RefCell, rc::Rc};

use lazytest::{Detail, SharedFailure, prelude::*};

struct Guard {
    name: &'static str,
    log: Rc<RefCell<Vec<String>>>,
}

impl Drop for Guard {
    fn drop(&mut self) {
        self.log.borrow_mut().push(format!("dropped {}", self.name));
    }
}

fn innermost(log: &Rc<RefCell<Vec<String>>>) -> Result<(), AssertionFailed> {
    let _guard = Guard {
        name: "innermost",
        log: Rc::clone(log),
    };
    log.borrow_mut().push("checking".to_owned());
    expect(1).to_equal(2)?;
    log.borrow_mut().push("unreachable".to_owned());
    Ok(())
}

fn middle(log: &Rc<RefCell<Vec<String>>>) -> Result<(), AssertionFailed> {
    let _guard = Guard {
        name: "middle",
        log: Rc::clone(log),
    };
    innermost(log).note("in middle")
}

#[test]
fn intermediate_scopes_are_unwound_in_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let failure = middle(&log).unwrap_err();
    log.borrow_mut().push("handled".to_owned());

    assert_eq!(
        *log.borrow(),
        ["checking", "dropped innermost", "dropped middle", "handled"]
    );
    assert_eq!(failure.notes(), ["in middle"]);
}

#[test]
fn failure_converts_into_boxed_errors() {
    fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        expect("yes").to_equal("no")?;
        Ok(())
    }

    let error = run().unwrap_err();
    let failure = error.downcast::<AssertionFailed>().unwrap();
    assert_eq!(failure.detail(), Some(&Detail::mismatch(&"no", &"yes")));
}

#[test]
fn shared_failures_are_identical_not_just_equal() {
    let shared: SharedFailure = expect(3)
        .to_satisfy("be zero", |value| *value == 0)
        .unwrap_err()
        .into_shared();
    let clone = SharedFailure::clone(&shared);
    assert!(SharedFailure::ptr_eq(&shared, &clone));
    assert!(std::ptr::eq(shared.detail().unwrap(), clone.detail().unwrap()));

    let separate: AssertionFailed = (*shared).clone();
    assert_eq!(separate.detail(), shared.detail());
    assert!(!std::ptr::eq(separate.detail().unwrap(), shared.detail().unwrap()));
}

#[test]
fn ensure_reports_the_condition_text() {
    fn sorted(values: &[u8]) -> Result<(), AssertionFailed> {
        ensure!(values.windows(2).all(|pair| pair[0] <= pair[1]));
        Ok(())
    }

    assert!(sorted(&[1, 2, 2]).is_ok());
    let failure = sorted(&[2, 1]).unwrap_err();
    let text = failure.detail().unwrap().to_string();
    assert!(text.starts_with("condition `values.windows(2)"));
    assert!(text.ends_with("` does not hold"));
}

#[test]
fn absent_detail_survives_propagation() {
    fn bare() -> Result<(), AssertionFailed<Option<u8>>> {
        fail!()
    }

    fn empty() -> Result<(), AssertionFailed<Option<u8>>> {
        Err(AssertionFailed::with_detail(None))
    }

    fn outer(f: fn() -> Result<(), AssertionFailed<Option<u8>>>) -> lazytest::Result<(), Option<u8>> {
        f()?;
        Ok(())
    }

    assert_eq!(outer(bare).unwrap_err().detail(), None);
    assert_eq!(outer(empty).unwrap_err().detail(), Some(&None));
}

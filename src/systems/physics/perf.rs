use std::cell::RefCell;

thread_local! {
    pub static PERF_QUERY_CALLS: RefCell<u64> = RefCell::new(0);
    pub static PERF_QUERY_CONTACTS: RefCell<u64> = RefCell::new(0);
}

#[inline]
pub(crate) fn count_query(contacts: usize) {
    PERF_QUERY_CALLS.with(|c| *c.borrow_mut() += 1);
    PERF_QUERY_CONTACTS.with(|c| *c.borrow_mut() += contacts as u64);
}

pub fn reset_query_perf_counters() {
    PERF_QUERY_CALLS.with(|c| *c.borrow_mut() = 0);
    PERF_QUERY_CONTACTS.with(|c| *c.borrow_mut() = 0);
}

/// Returns `(queries, contacts)` since the last reset and zeroes both.
pub fn take_query_perf_counters() -> (u64, u64) {
    let calls = PERF_QUERY_CALLS.with(|c| c.replace(0));
    let contacts = PERF_QUERY_CONTACTS.with(|c| c.replace(0));
    (calls, contacts)
}

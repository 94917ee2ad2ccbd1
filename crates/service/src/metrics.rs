use once_cell::sync::Lazy;
use prometheus::{register_int_counter, IntCounter};

// Prometheus metrics (default registry)
pub static READS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("todo_reads_total", "Total todo reads served")
        .expect("register reads_total")
});

pub static WRITES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("todo_writes_total", "Total todo writes applied in memory")
        .expect("register writes_total")
});

pub static VALIDATION_REJECTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "todo_validation_rejects_total",
        "Total writes rejected for exceeding the content limit"
    )
    .expect("register validation_rejects_total")
});

pub static PERSIST_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "todo_persist_failures_total",
        "Total failures writing the durable artifact"
    )
    .expect("register persist_failures_total")
});

pub static RELOAD_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "todo_reload_failures_total",
        "Total failed reloads before serving a read"
    )
    .expect("register reload_failures_total")
});

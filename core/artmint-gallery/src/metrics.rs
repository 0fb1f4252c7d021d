//! Gallery metrics

use lazy_static::lazy_static;
use prometheus::{register_counter_vec, register_int_gauge, CounterVec, IntGauge};

lazy_static! {
    /// Gallery mutations by kind
    pub static ref GALLERY_OPS: CounterVec = register_counter_vec!(
        "artmint_gallery_operations_total",
        "Total number of gallery mutations",
        &["op"]
    ).unwrap();

    /// Artworks currently held
    pub static ref GALLERY_SIZE: IntGauge = register_int_gauge!(
        "artmint_gallery_artworks",
        "Number of artworks in the gallery"
    ).unwrap();
}

pub fn record_op(op: &str) {
    GALLERY_OPS.with_label_values(&[op]).inc();
}

pub fn set_size(size: usize) {
    GALLERY_SIZE.set(size as i64);
}

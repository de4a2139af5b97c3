/// Installs the global test tracing subscriber. Later calls are no-ops.
///
/// The filter comes from `RUST_LOG`, and output goes through the libtest
/// capture so passing tests stay quiet.
pub fn init_test_logger() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

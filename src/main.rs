fn main() {
    let state = clinic_lib::run();
    tracing::info!(
        path = %state.db_path().display(),
        healthy = %clinic_lib::commands::health_check(),
        "Clinic records ready"
    );
}

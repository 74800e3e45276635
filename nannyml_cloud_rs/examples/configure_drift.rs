//! Enable Kolmogorov-Smirnov drift detection on categorical and continuous
//! columns of a model.
//!
//! ```sh
//! NML_CLOUD_URL=https://nannyml.example.com NML_CLOUD_API_TOKEN=... \
//!     cargo run --example configure_drift -- 42
//! ```

use nannyml_cloud::{ColumnToggle, NannyMl, Thresholded, UnivariateDriftMethod};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), nannyml_cloud::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let model_id: i64 = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .ok_or_else(|| nannyml_cloud::Error::Config("usage: configure_drift <model-id>".into()))?;

    let nml = NannyMl::from_env()?;
    let rc = nml
        .edit_runtime_config(model_id, |rc| {
            let ks = rc.univariate_drift_method(UnivariateDriftMethod::KolmogorovSmirnov)?;
            ks.enable_categorical();
            ks.enable_continuous();
            Ok(())
        })
        .await?;

    for method in rc.univariate_drift_methods() {
        println!("{} threshold={:?}", method.method(), method.threshold());
    }
    Ok(())
}

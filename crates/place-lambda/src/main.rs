use std::sync::Arc;

use lambda_runtime::{service_fn, Error, LambdaEvent};
use place_lambda::context::AppContext;
use place_lambda::handler::{self, ExtractRequest};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .without_time()
        .init();

    // One context per execution environment: AWS clients, env config, and
    // the cached API key all live for the lifetime of the process.
    let ctx = Arc::new(AppContext::from_env().await.map_err(Error::from)?);

    lambda_runtime::run(service_fn(move |event: LambdaEvent<ExtractRequest>| {
        let ctx = Arc::clone(&ctx);
        async move { handler::handle(&ctx, event).await }
    }))
    .await
}

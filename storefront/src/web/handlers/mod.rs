// storefront/src/web/handlers/mod.rs

pub mod cart_handlers;
pub mod checkout_handlers;
pub mod product_handlers;

use cartflow::{ContextData, PipelineResult};
use tracing::warn;

use crate::errors::AppError;
use crate::state::AppState;

/// Runs the pipeline registered for `TData`. A run stopped early by a handler
/// is an error here: every storefront flow is expected to complete.
pub(crate) async fn run_to_completion<TData>(
  app_state: &AppState,
  ctx_data: ContextData<TData>,
) -> Result<(), AppError>
where
  TData: 'static + Send + Sync,
{
  match app_state.flows.run(ctx_data).await? {
    PipelineResult::Completed => Ok(()),
    PipelineResult::Stopped => {
      warn!(flow = std::any::type_name::<TData>(), "Pipeline was stopped by a handler.");
      Err(AppError::PipelineHaltedByHandler)
    }
  }
}

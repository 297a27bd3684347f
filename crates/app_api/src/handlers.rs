use tracing::warn;
use usage_app::{Result, resolve_instant};
use usage_core::Deadline;

use crate::{
    AccountResponse, AppContext, CreateAccountRequest, CurrentCycleUsageRequest,
    CycleHistoryRequest, CycleHistoryResponse, CurrentCycleUsageResponse, HealthResponse,
    UpdateAccountRequest,
};

pub fn cycle_history(
    ctx: &AppContext,
    req: CycleHistoryRequest,
    deadline: &Deadline,
) -> Result<CycleHistoryResponse> {
    req.validate()?;
    let cycles = ctx.app_state.services.history.cycle_history(
        &req.account_id,
        &req.phone_number,
        deadline,
    )?;
    Ok(CycleHistoryResponse { cycles })
}

pub fn current_cycle_usage(
    ctx: &AppContext,
    req: CurrentCycleUsageRequest,
    deadline: &Deadline,
) -> Result<CurrentCycleUsageResponse> {
    req.validate()?;
    let instant = resolve_instant(req.as_of.as_deref())?;
    let usage = ctx.app_state.services.usage.current_cycle_usage(
        &req.account_id,
        &req.phone_number,
        instant,
        deadline,
    )?;
    Ok(CurrentCycleUsageResponse { usage })
}

pub fn create_account(
    ctx: &AppContext,
    req: CreateAccountRequest,
    deadline: &Deadline,
) -> Result<AccountResponse> {
    let account = ctx
        .app_state
        .services
        .accounts
        .create_account(req.into(), deadline)?;
    Ok(account.into())
}

pub fn update_account(
    ctx: &AppContext,
    id: &str,
    req: UpdateAccountRequest,
    deadline: &Deadline,
) -> Result<AccountResponse> {
    let account = ctx
        .app_state
        .services
        .accounts
        .update_account(id, req.into(), deadline)?;
    Ok(account.into())
}

pub fn health(ctx: &AppContext, deadline: &Deadline) -> HealthResponse {
    match ctx.app_state.health_check(deadline) {
        Ok(()) => HealthResponse::healthy(),
        Err(err) => {
            warn!(error = %err, "health check failed");
            HealthResponse::unhealthy(err.to_string())
        }
    }
}

//! Request handlers. Thin adapters: validate the boundary, call the store
//! or the ledger engine, shape the response. No balance math happens here.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use crate::auth;
use crate::db::{AccountPatch, NewAccount, NewTrader, ProfilePatch, TraderPatch};
use crate::error::{Error, Result};
use crate::ledger::ServiceOrder;
use crate::models::{Account, ChatMessage, Role, Trader, Transaction, TransactionKind};
use crate::server::AppState;

use super::models::*;
use super::{AdminUser, CurrentUser};

// ---- auth ----

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisteredResponse>)> {
    if body.first_name.trim().is_empty() || body.last_name.trim().is_empty() {
        return Err(Error::Validation("first and last name are required".to_string()));
    }
    if body.email.trim().is_empty() {
        return Err(Error::Validation("email is required".to_string()));
    }
    if body.password != body.confirm_password {
        return Err(Error::Validation("passwords do not match".to_string()));
    }
    if state.db.get_account_by_email(&body.email).await?.is_some() {
        return Err(Error::Validation("email already registered".to_string()));
    }

    let password_hash = auth::hash_password(&body.password)?;
    let account = state
        .db
        .insert_account(NewAccount {
            first_name: body.first_name.trim().to_string(),
            last_name: body.last_name.trim().to_string(),
            email: body.email,
            password_hash,
            currency: body.currency.unwrap_or_else(|| "USD".to_string()),
            role: Role::User,
        })
        .await?;

    info!(account = %account.id, "account registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisteredResponse {
            id: account.id,
            email: account.email,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let account = state
        .db
        .get_account_by_email(&body.email)
        .await?
        .filter(|a| auth::verify_password(&body.password, &a.password_hash))
        .ok_or_else(|| Error::Unauthorized("invalid email or password".to_string()))?;

    if !account.is_active {
        return Err(Error::Unauthorized("account is deactivated".to_string()));
    }

    state.db.touch_last_login(&account.id).await?;
    let token = auth::issue_token(
        &account.id,
        account.role,
        &state.config.jwt_secret,
        state.config.token_ttl_days,
    )?;

    info!(user = %account.display_name(), "login");
    Ok(Json(AuthResponse {
        id: account.id,
        first_name: account.first_name,
        last_name: account.last_name,
        email: account.email,
        role: account.role,
        currency: account.currency,
        account_type: account.account_type,
        wallet_balance: account.wallet_balance,
        token,
    }))
}

// ---- accounts ----

pub async fn get_profile(CurrentUser(account): CurrentUser) -> Json<Account> {
    Json(account)
}

pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>> {
    let updated = state
        .db
        .update_profile(
            &account.id,
            ProfilePatch {
                first_name: body.first_name,
                last_name: body.last_name,
                currency: body.currency,
            },
        )
        .await?;

    Ok(Json(ProfileResponse {
        message: "profile updated".to_string(),
        user: updated,
    }))
}

pub async fn list_accounts(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
) -> Result<Json<Vec<Account>>> {
    Ok(Json(state.db.list_accounts().await?))
}

pub async fn get_account(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<Account>> {
    let account = state
        .db
        .get_account(&id)
        .await?
        .ok_or(Error::NotFound("account"))?;
    Ok(Json(account))
}

pub async fn update_account(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<String>,
    Json(body): Json<AdminUpdateRequest>,
) -> Result<Json<ProfileResponse>> {
    // Password resets go through the same explicit hashing step as
    // registration.
    let password_hash = match body.password {
        Some(password) => Some(auth::hash_password(&password)?),
        None => None,
    };

    let updated = state
        .db
        .admin_update_account(
            &id,
            AccountPatch {
                first_name: body.first_name,
                last_name: body.last_name,
                email: body.email,
                wallet_balance: body.wallet_balance,
                trading_balance: body.trading_balance,
                total_profits: body.total_profits,
                account_type: body.account_type,
                role: body.role,
                is_active: body.is_active,
                password_hash,
            },
        )
        .await?;

    Ok(Json(ProfileResponse {
        message: "account updated".to_string(),
        user: updated,
    }))
}

pub async fn delete_account(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.db.delete_account(&id).await?;
    Ok(Json(MessageResponse {
        message: "account deleted".to_string(),
    }))
}

// ---- traders ----

pub async fn list_traders(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
) -> Result<Json<Vec<Trader>>> {
    Ok(Json(state.db.list_public_traders().await?))
}

pub async fn list_all_traders(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
) -> Result<Json<Vec<Trader>>> {
    Ok(Json(state.db.list_all_traders().await?))
}

pub async fn get_trader(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Trader>> {
    let trader = state
        .db
        .get_trader(&id)
        .await?
        .ok_or(Error::NotFound("trader"))?;
    Ok(Json(trader))
}

pub async fn create_trader(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Json(body): Json<NewTraderRequest>,
) -> Result<(StatusCode, Json<Trader>)> {
    let trader = state
        .db
        .insert_trader(NewTrader {
            name: body.name,
            avatar: body.avatar,
            strategy: body.strategy.unwrap_or_else(|| "Institutional".to_string()),
            roi: body.roi,
            win_rate: body.win_rate,
            max_drawdown: body.max_drawdown.unwrap_or_else(|| "-0.0%".to_string()),
            is_public: body.is_public.unwrap_or(true),
            is_trending: body.is_trending.unwrap_or(false),
        })
        .await?;

    info!(trader = %trader.display_name(), "trader created");
    Ok((StatusCode::CREATED, Json(trader)))
}

pub async fn update_trader(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateTraderRequest>,
) -> Result<Json<Trader>> {
    let trader = state
        .db
        .update_trader(
            &id,
            TraderPatch {
                name: body.name,
                avatar: body.avatar,
                strategy: body.strategy,
                roi: body.roi,
                win_rate: body.win_rate,
                max_drawdown: body.max_drawdown,
                is_public: body.is_public,
                is_trending: body.is_trending,
            },
        )
        .await?;
    Ok(Json(trader))
}

pub async fn delete_trader(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.db.remove_trader(&id).await?;
    Ok(Json(MessageResponse {
        message: "trader removed".to_string(),
    }))
}

// ---- copy trading ----

pub async fn copy_start(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
    Json(body): Json<CopyStartRequest>,
) -> Result<Json<CopyResponse>> {
    let outcome = state
        .ledger
        .start_copying(&account.id, &body.trader_id, body.amount)
        .await?;

    Ok(Json(CopyResponse {
        message: "mirroring started".to_string(),
        trading_balance: outcome.trading_balance,
        copied_traders: outcome.copied_traders,
    }))
}

pub async fn copy_stop(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
    Json(body): Json<CopyStopRequest>,
) -> Result<Json<CopyResponse>> {
    let outcome = state
        .ledger
        .stop_copying(&account.id, &body.trader_id)
        .await?;

    Ok(Json(CopyResponse {
        message: "position closed, funds returned to trading balance".to_string(),
        trading_balance: outcome.trading_balance,
        copied_traders: outcome.copied_traders,
    }))
}

// ---- ledger ----

pub async fn deposit(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
    Json(body): Json<DepositRequest>,
) -> Result<(StatusCode, Json<Transaction>)> {
    let entry = state
        .ledger
        .deposit(
            &account.id,
            body.amount,
            &body.method,
            body.reference_id,
            &body.proof_image,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn withdraw(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
    Json(body): Json<WithdrawRequest>,
) -> Result<(StatusCode, Json<Transaction>)> {
    let entry = state
        .ledger
        .request_withdrawal(&account.id, body.amount, &body.method, &body.payout_address)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn purchase(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
    Json(body): Json<PurchaseRequest>,
) -> Result<Json<PurchaseResponse>> {
    let outcome = state
        .ledger
        .purchase(
            &account.id,
            body.amount,
            body.plan_name,
            body.signal_type,
            body.description,
        )
        .await?;

    Ok(Json(PurchaseResponse {
        message: "purchase successful".to_string(),
        new_balance: outcome.wallet_balance,
        trading_balance: outcome.trading_balance,
        transaction: outcome.transaction,
    }))
}

pub async fn service_purchase(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
    Json(body): Json<ServicePurchaseRequest>,
) -> Result<(StatusCode, Json<PurchaseResponse>)> {
    let order = match body.kind.as_str() {
        "account_upgrade" => {
            let plan = body
                .details
                .plan_name
                .as_deref()
                .ok_or_else(|| Error::Validation("planName is required".to_string()))?
                .parse()
                .map_err(|_| Error::Validation("unknown account plan".to_string()))?;
            ServiceOrder::AccountUpgrade {
                plan,
                price: body.amount,
            }
        }
        "signal_purchase" => {
            let signal_type = body
                .details
                .signal_type
                .clone()
                .ok_or_else(|| Error::Validation("signalType is required".to_string()))?;
            ServiceOrder::SignalPurchase {
                signal_type,
                price: body.amount,
            }
        }
        "trading_fund" => ServiceOrder::TradingFund { amount: body.amount },
        "trading_sell" => ServiceOrder::TradingSell { amount: body.amount },
        other => {
            return Err(Error::Validation(format!("unknown purchase type: {other}")));
        }
    };

    let outcome = state
        .ledger
        .service_purchase(&account.id, order, body.description)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PurchaseResponse {
            message: "operation successful".to_string(),
            new_balance: outcome.wallet_balance,
            trading_balance: outcome.trading_balance,
            transaction: outcome.transaction,
        }),
    ))
}

pub async fn my_transactions(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
) -> Result<Json<Vec<Transaction>>> {
    Ok(Json(state.db.list_transactions_for(&account.id).await?))
}

pub async fn list_transactions(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
) -> Result<Json<Vec<Transaction>>> {
    Ok(Json(state.db.list_all_transactions().await?))
}

pub async fn update_status(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Json(body): Json<StatusUpdateRequest>,
) -> Result<Json<Transaction>> {
    let entry = state
        .ledger
        .transition_status(&body.transaction_id, body.status)
        .await?;
    Ok(Json(entry))
}

pub async fn inject_entry(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Json(body): Json<InjectRequest>,
) -> Result<(StatusCode, Json<Transaction>)> {
    let entry = state
        .ledger
        .inject_entry(
            &body.account_id,
            body.amount,
            body.kind.unwrap_or(TransactionKind::Deposit),
            body.method,
            body.date,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn topup_profit(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Json(body): Json<ProfitTopupRequest>,
) -> Result<(StatusCode, Json<ProfitTopupResponse>)> {
    let entry = state
        .ledger
        .topup_profit(&body.account_id, body.amount, body.description)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ProfitTopupResponse {
            message: "profit successfully injected".to_string(),
            transaction: entry,
        }),
    ))
}

// ---- chat & contact ----

pub async fn chat_history(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
    Path(room): Path<String>,
) -> Result<Json<Vec<ChatMessage>>> {
    // Users see their own room; support staff see any.
    if !account.is_admin() && room != account.id {
        return Err(Error::Forbidden("cannot read another user's chat"));
    }
    Ok(Json(state.db.chat_history(&room).await?))
}

pub async fn post_chat_message(
    State(state): State<AppState>,
    CurrentUser(account): CurrentUser,
    Json(body): Json<ChatMessageRequest>,
) -> Result<(StatusCode, Json<ChatMessage>)> {
    if body.body.trim().is_empty() {
        return Err(Error::Validation("message body is required".to_string()));
    }

    let room = match body.room {
        Some(room) if account.is_admin() => room,
        Some(room) if room != account.id => {
            return Err(Error::Forbidden("cannot post to another user's chat"));
        }
        _ => account.id.clone(),
    };

    let message = state
        .db
        .insert_chat_message(&room, &account.id, body.body.trim(), account.is_admin())
        .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn submit_contact(
    State(state): State<AppState>,
    Json(body): Json<ContactRequest>,
) -> Result<(StatusCode, Json<ContactResponse>)> {
    if body.name.trim().is_empty() || body.email.trim().is_empty() || body.message.trim().is_empty()
    {
        return Err(Error::Validation(
            "name, email, and message are required".to_string(),
        ));
    }

    // Store first: the message must survive even if the notification fails.
    state
        .db
        .insert_contact_message(&body.name, &body.email, &body.message)
        .await?;

    state
        .notifier
        .contact_submitted(&body.name, &body.email, &body.message);

    Ok((
        StatusCode::CREATED,
        Json(ContactResponse {
            success: true,
            message: "thank you, your message has been received".to_string(),
        }),
    ))
}

// ---- keep-alive ----

pub async fn ping() -> &'static str {
    "pong"
}

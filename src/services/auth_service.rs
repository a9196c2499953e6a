use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::{OsRng, RngCore};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use sea_orm::ActiveValue::NotSet;

use crate::{
    audit,
    domain::validation,
    dto::auth::{
        Claims, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse,
        ResendConfirmationRequest,
    },
    entity::users::{ActiveModel as UserActive, Column as UserCol, Entity as Users, Model as UserModel},
    error::{AppError, AppResult},
    middleware::auth::ROLE_ADMIN,
    notify::{EmailMessage, dispatch_email},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_ACTIVE: &str = "active";

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// 32 random bytes, URL-safe base64 without padding.
pub fn generate_confirmation_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

pub fn issue_token(state: &AppState, user: &UserModel) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::minutes(state.config.jwt_expire_minutes))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        role: user.role.clone(),
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

fn confirmation_email(state: &AppState, email: &str, name: &str, token: &str) -> EmailMessage {
    let url = format!(
        "{}api/auth/confirm-email?token={token}",
        state.config.public_base_url
    );
    EmailMessage::new(
        email,
        "Confirm your email address",
        format!(
            "<p>Hi {name},</p><p>Please confirm your account by opening <a href=\"{url}\">this link</a>. \
             It expires in {} hours.</p>",
            state.config.confirmation_ttl_hours
        ),
    )
}

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<RegisterResponse>> {
    let email = validation::normalize_email(&payload.email)?;
    validation::registration_password(&payload.password)?;
    let role = validation::registration_role(&payload.role)?;
    let name = validation::non_empty(&payload.name, "Name")?;

    let exist = Users::find()
        .filter(UserCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?;
    if exist.is_some() {
        return Err(AppError::BadRequest("Email is already taken".to_string()));
    }

    let password_hash = hash_password(&payload.password)?;
    let token = generate_confirmation_token();
    let expires = Utc::now() + Duration::hours(state.config.confirmation_ttl_hours);

    let user = UserActive {
        id: NotSet,
        email: Set(email.clone()),
        password_hash: Set(password_hash),
        name: Set(name),
        role: Set(role),
        status: Set(STATUS_PENDING.into()),
        phone: Set(payload.phone),
        address: Set(payload.address),
        specialties: Set(payload.specialties),
        bio: Set(payload.bio),
        email_confirmed: Set(false),
        confirmation_token: Set(Some(token.clone())),
        confirmation_expires_at: Set(Some(expires.into())),
        email_confirmed_at: Set(None),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    dispatch_email(
        state.notifier.clone(),
        confirmation_email(state, &user.email, &user.name, &token),
    );

    audit::record(
        state,
        Some(user.id),
        "user_register",
        "users",
        serde_json::json!({ "user_id": user.id, "role": user.role }),
    )
    .await;
    tracing::info!(user_id = user.id, "user registered, awaiting email confirmation");

    Ok(ApiResponse::success(
        "User registered successfully. Please check your email to confirm your account.",
        RegisterResponse {
            user_id: user.id,
            email: user.email,
            status: "pending_confirmation".into(),
        },
        Some(Meta::empty()),
    ))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { email, password } = payload;
    let user = Users::find()
        .filter(UserCol::Email.eq(email.trim().to_lowercase()))
        .one(&state.orm)
        .await?;

    let user = match user {
        Some(u) => u,
        None => return Err(AppError::Unauthorized("Incorrect email or password".into())),
    };

    if !verify_password(&password, &user.password_hash)? {
        return Err(AppError::Unauthorized("Incorrect email or password".into()));
    }

    let token = issue_token(state, &user)?;

    audit::record(
        state,
        Some(user.id),
        "user_login",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Logged in",
        LoginResponse {
            access_token: token,
            token_type: "bearer".into(),
        },
        Some(Meta::empty()),
    ))
}

pub async fn confirm_email(
    state: &AppState,
    token: &str,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let user = Users::find()
        .filter(UserCol::ConfirmationToken.eq(token))
        .filter(UserCol::EmailConfirmed.eq(false))
        .one(&state.orm)
        .await?;

    let now = Utc::now();
    let user = match user {
        Some(u) if u.confirmation_expires_at.is_some_and(|exp| exp > now) => u,
        _ => {
            return Err(AppError::BadRequest(
                "The confirmation link is invalid or expired".into(),
            ));
        }
    };

    let mut active: UserActive = user.into();
    active.email_confirmed = Set(true);
    active.status = Set(STATUS_ACTIVE.into());
    active.confirmation_token = Set(None);
    active.confirmation_expires_at = Set(None);
    active.email_confirmed_at = Set(Some(now.into()));
    let user = active.update(&state.orm).await?;

    tracing::info!(user_id = user.id, "email confirmed");

    Ok(ApiResponse::success(
        "Email confirmed",
        serde_json::json!({ "email": user.email, "status": user.status }),
        Some(Meta::empty()),
    ))
}

pub async fn resend_confirmation(
    state: &AppState,
    payload: ResendConfirmationRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let email = payload.email.trim().to_lowercase();
    let user = Users::find()
        .filter(UserCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    if user.email_confirmed {
        return Err(AppError::BadRequest("Email is already confirmed".into()));
    }

    let token = generate_confirmation_token();
    let expires = Utc::now() + Duration::hours(state.config.confirmation_ttl_hours);

    let mut active: UserActive = user.into();
    active.confirmation_token = Set(Some(token.clone()));
    active.confirmation_expires_at = Set(Some(expires.into()));
    let user = active.update(&state.orm).await?;

    dispatch_email(
        state.notifier.clone(),
        confirmation_email(state, &user.email, &user.name, &token),
    );

    Ok(ApiResponse::message_only("Confirmation email sent"))
}

/// Insert a pre-confirmed account; used by the seed binary for staff users.
pub async fn ensure_account(
    state: &AppState,
    email: &str,
    password: &str,
    name: &str,
    role: &str,
) -> AppResult<UserModel> {
    let email = validation::normalize_email(email)?;
    if let Some(existing) = Users::find()
        .filter(UserCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?
    {
        return Ok(existing);
    }

    let user = UserActive {
        id: NotSet,
        email: Set(email),
        password_hash: Set(hash_password(password)?),
        name: Set(name.to_string()),
        role: Set(role.to_string()),
        status: Set(STATUS_ACTIVE.into()),
        phone: Set(None),
        address: Set(None),
        specialties: Set(None),
        bio: Set(None),
        email_confirmed: Set(true),
        confirmation_token: Set(None),
        confirmation_expires_at: Set(None),
        email_confirmed_at: Set(Some(Utc::now().into())),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if role == ROLE_ADMIN {
        tracing::info!(user_id = user.id, "admin account created");
    }
    Ok(user)
}
